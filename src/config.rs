//! Surface configuration and TOML loading.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration for a terminal surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub selection: SelectionConfig,
    pub behavior: BehaviorConfig,
    pub timing: TimingConfig,
}

/// Selection behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Codepoints that delimit words for double-click selection. NUL
    /// (the empty cell) is always a separator regardless of this set.
    pub word_separators: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            word_separators: " \t'\"()[]{}<>=,;:`|".to_owned(),
        }
    }
}

/// General surface behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Snap the view back to the live screen when the program writes.
    pub jump_on_change: bool,
    /// Render newline/autowrap markers with substitute glyphs
    /// (diagnostic aid).
    pub debug_markers: bool,
    /// Rows scrolled per wheel notch when reporting is off.
    pub wheel_step: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            jump_on_change: true,
            debug_markers: false,
            wheel_step: 4,
        }
    }
}

/// Timer intervals, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Window for double/triple click detection.
    pub double_click_ms: u64,
    /// Hover settle time before link detection runs.
    pub hover_delay_ms: u64,
    /// Quiet window before a pending resize is applied.
    pub resize_settle_ms: u64,
    /// Step interval for drag auto-scroll at the grid edge.
    pub autoscroll_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 350,
            hover_delay_ms: 50,
            resize_settle_ms: 200,
            autoscroll_ms: 50,
        }
    }
}

impl SurfaceConfig {
    /// Parse a configuration document, with unspecified fields filled
    /// from defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::Parse)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded surface config from {}", path.display());
        Ok(config)
    }
}

/// Configuration loading failure.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config read failed: {e}"),
            Self::Parse(e) => write!(f, "config parse failed: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = SurfaceConfig::default();
        assert!(config.selection.word_separators.contains(' '));
        assert!(config.behavior.jump_on_change);
        assert!(!config.behavior.debug_markers);
        assert_eq!(config.behavior.wheel_step, 4);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = SurfaceConfig::from_toml_str(
            "[behavior]\njump_on_change = false\n\n[timing]\nhover_delay_ms = 80\n",
        )
        .unwrap();
        assert!(!config.behavior.jump_on_change);
        assert_eq!(config.timing.hover_delay_ms, 80);
        // untouched sections keep defaults
        assert_eq!(config.timing.double_click_ms, 350);
        assert!(config.selection.word_separators.contains('('));
    }

    #[test]
    fn bad_toml_reports_parse_error() {
        let err = SurfaceConfig::from_toml_str("behavior = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
