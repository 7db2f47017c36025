//! Terminal-application-controlled surface modes.

use bitflags::bitflags;

bitflags! {
    /// Toggles set by the terminal application through the state layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SurfaceMode: u8 {
        /// Global inverse video (DECSCNM).
        const INVERSE_VIDEO   = 1 << 0;
        /// Wrap pasted text in `ESC[200~` / `ESC[201~`.
        const BRACKETED_PASTE = 1 << 1;
        /// Alternate screen is active (wheel emulates arrow keys).
        const ALT_SCREEN      = 1 << 2;
        /// Terminal application asked for the cursor to be hidden.
        const HIDE_CURSOR     = 1 << 3;
    }
}

/// Pointer-event reporting mode selected by the terminal application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseMode {
    #[default]
    Off,
    /// Press-only protocol, buttons 1–3, no modifiers.
    X10,
    /// Press and release.
    Normal,
    /// Press, release, and motion while a button is held.
    ButtonMotion,
    /// Press, release, and all motion.
    AnyMotion,
}

impl MouseMode {
    /// Whether motion events are reported, given the held-button state.
    pub fn reports_motion(self, button_held: bool) -> bool {
        match self {
            Self::Off | Self::X10 | Self::Normal => false,
            Self::ButtonMotion => button_held,
            Self::AnyMotion => true,
        }
    }
}

/// Wire encoding for mouse reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseEncoding {
    /// Single-byte coordinates, range-limited to 223.
    #[default]
    Default,
    /// UTF-8-style continuation bytes for coordinates above 95.
    Utf8,
    /// Decimal parameters, `CSI <` prefix, `m` terminator on release.
    Sgr,
    /// Decimal parameters with the legacy +32 button bias.
    Urxvt,
}

/// Pointer modifier state as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };

    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_gating() {
        assert!(!MouseMode::Off.reports_motion(true));
        assert!(!MouseMode::Normal.reports_motion(true));
        assert!(!MouseMode::ButtonMotion.reports_motion(false));
        assert!(MouseMode::ButtonMotion.reports_motion(true));
        assert!(MouseMode::AnyMotion.reports_motion(false));
    }
}
