//! Hover-link location: span lookup delegation, classification, and
//! suspension.
//!
//! The terminal-state layer owns the text; [`crate::source::CellSource::link_at`]
//! hands back the candidate span under a cell. This module decides
//! whether the span is actually a link, tracks the current hover
//! state, and lets modal UI surfaces suspend detection while they are
//! up.

use std::sync::LazyLock;

use regex::Regex;

use crate::index::Rect;
use crate::source::CellSource;

/// What a hovered span was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Url,
    /// Local absolute path (including `file://`).
    Path,
    Email,
}

/// The link currently under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverLink {
    pub text: String,
    pub kind: LinkKind,
    /// Bounding cells, buffer coordinates.
    pub rect: Rect,
}

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?|ftp)://\S+$").expect("URL regex is valid")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email regex is valid")
});

/// Classify a candidate span, or reject it.
pub fn classify(text: &str) -> Option<LinkKind> {
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("mailto:") {
        return Some(LinkKind::Email);
    }
    if lower.starts_with("file://") || text.starts_with('/') {
        return Some(LinkKind::Path);
    }
    if URL_RE.is_match(&lower) {
        return Some(LinkKind::Url);
    }
    if EMAIL_RE.is_match(text) {
        return Some(LinkKind::Email);
    }
    None
}

/// Saturating suspension counter: zero is the enforced floor, so an
/// unbalanced pop can never unsuspend early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverSuspension(u32);

impl HoverSuspension {
    /// Detection starts suspended until the pointer first enters the
    /// surface.
    pub fn new() -> Self {
        Self(1)
    }

    pub fn push(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    pub fn pop(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn suspended(self) -> bool {
        self.0 > 0
    }
}

impl Default for HoverSuspension {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks the hover link and its suspension state.
#[derive(Debug, Default)]
pub struct LinkLocator {
    current: Option<HoverLink>,
    suspension: HoverSuspension,
}

impl LinkLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&HoverLink> {
        self.current.as_ref()
    }

    pub fn suspension(&mut self) -> &mut HoverSuspension {
        &mut self.suspension
    }

    pub fn suspended(&self) -> bool {
        self.suspension.suspended()
    }

    /// Recompute the hover link for the cell under the pointer.
    /// Returns true when the stored link changed (text or geometry).
    pub fn probe<S: CellSource + ?Sized>(&mut self, source: &S, col: i32, row: i32) -> bool {
        if self.suspension.suspended() {
            return self.clear();
        }
        let hit = source
            .link_at(col, row)
            .and_then(|(text, rect)| classify(&text).map(|kind| HoverLink { text, kind, rect }));
        match hit {
            Some(link) => {
                if self.current.as_ref() == Some(&link) {
                    false
                } else {
                    log::debug!("hover link: {:?} {}", link.kind, link.text);
                    self.current = Some(link);
                    true
                }
            }
            None => self.clear(),
        }
    }

    /// Drop the hover link. Returns true when one was shown.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }
}
