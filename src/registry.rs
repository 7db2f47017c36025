//! Selection ownership shared between widget instances.
//!
//! The host application owns one registry and hands a shared handle to
//! every surface it creates. Taking a selection target reports the
//! previous owner so the host can deliver the loss, with no
//! process-global state involved.

use std::cell::RefCell;
use std::rc::Rc;

/// Which system selection a text went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardTarget {
    /// Select-to-copy primary selection.
    Primary,
    /// Explicit clipboard.
    Clipboard,
}

/// Identifies one surface within a registry.
pub type SurfaceId = u32;

/// Tracks, per target, which surface owns the current selection text.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    next_id: SurfaceId,
    primary: Option<(SurfaceId, String)>,
    clipboard: Option<(SurfaceId, String)>,
}

/// Handle shared by the host and its surfaces. The core is
/// single-threaded by design, so a plain `Rc<RefCell<_>>` is the right
/// shape.
pub type SharedRegistry = Rc<RefCell<SurfaceRegistry>>;

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh registry in a shareable handle.
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Allocate an id for a new surface.
    pub fn register(&mut self) -> SurfaceId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn slot(&mut self, target: ClipboardTarget) -> &mut Option<(SurfaceId, String)> {
        match target {
            ClipboardTarget::Primary => &mut self.primary,
            ClipboardTarget::Clipboard => &mut self.clipboard,
        }
    }

    /// Claim a target for `id`. Returns the previous owner when it was
    /// a different surface, so the host can notify it of the loss.
    pub fn take(
        &mut self,
        id: SurfaceId,
        target: ClipboardTarget,
        text: String,
    ) -> Option<SurfaceId> {
        let previous = self.slot(target).replace((id, text));
        match previous {
            Some((owner, _)) if owner != id => Some(owner),
            _ => None,
        }
    }

    /// Drop ownership of a target if `id` still holds it.
    pub fn release(&mut self, id: SurfaceId, target: ClipboardTarget) {
        let slot = self.slot(target);
        if slot.as_ref().is_some_and(|(owner, _)| *owner == id) {
            *slot = None;
        }
    }

    pub fn owner(&self, target: ClipboardTarget) -> Option<SurfaceId> {
        match target {
            ClipboardTarget::Primary => self.primary.as_ref().map(|(id, _)| *id),
            ClipboardTarget::Clipboard => self.clipboard.as_ref().map(|(id, _)| *id),
        }
    }

    /// Current text held for a target.
    pub fn text(&self, target: ClipboardTarget) -> Option<&str> {
        match target {
            ClipboardTarget::Primary => self.primary.as_ref().map(|(_, s)| s.as_str()),
            ClipboardTarget::Clipboard => self.clipboard.as_ref().map(|(_, s)| s.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_reports_previous_owner() {
        let mut reg = SurfaceRegistry::new();
        let a = reg.register();
        let b = reg.register();

        assert_eq!(reg.take(a, ClipboardTarget::Primary, "one".into()), None);
        assert_eq!(reg.text(ClipboardTarget::Primary), Some("one"));

        // same owner replacing its own text: no loss
        assert_eq!(reg.take(a, ClipboardTarget::Primary, "two".into()), None);

        // another surface takes over: the first owner is reported
        assert_eq!(reg.take(b, ClipboardTarget::Primary, "three".into()), Some(a));
        assert_eq!(reg.owner(ClipboardTarget::Primary), Some(b));
    }

    #[test]
    fn targets_are_independent() {
        let mut reg = SurfaceRegistry::new();
        let a = reg.register();
        reg.take(a, ClipboardTarget::Primary, "p".into());
        assert_eq!(reg.text(ClipboardTarget::Clipboard), None);
        reg.take(a, ClipboardTarget::Clipboard, "c".into());
        assert_eq!(reg.text(ClipboardTarget::Primary), Some("p"));
    }

    #[test]
    fn release_only_for_owner() {
        let mut reg = SurfaceRegistry::new();
        let a = reg.register();
        let b = reg.register();
        reg.take(a, ClipboardTarget::Primary, "p".into());
        reg.release(b, ClipboardTarget::Primary);
        assert_eq!(reg.owner(ClipboardTarget::Primary), Some(a));
        reg.release(a, ClipboardTarget::Primary);
        assert_eq!(reg.owner(ClipboardTarget::Primary), None);
    }
}
