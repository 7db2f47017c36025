//! The single host-facing notification interface.
//!
//! One observer is injected at surface construction and receives every
//! outbound effect: bytes for the PTY, repaint scheduling, clipboard
//! hand-off, embedded block placement, link lifecycle, and the
//! terminal-state notifications the surface merely forwards.

use crate::link::HoverLink;
use crate::registry::ClipboardTarget;

/// Implemented by the hosting widget.
///
/// Only [`SurfaceObserver::pty_write`] is mandatory; everything else
/// defaults to a no-op so hosts subscribe to what they render.
pub trait SurfaceObserver {
    /// Raw bytes for the running terminal program (mouse reports,
    /// pasted text, wheel arrow emulation).
    fn pty_write(&mut self, bytes: &[u8]);

    /// Exactly one pending recompute-and-repaint exists at a time; the
    /// host should drive `render` on its next tick.
    fn repaint_requested(&mut self) {}

    /// Selection became visible or stopped being visible.
    fn selection_changed(&mut self, active: bool) {
        let _ = active;
    }

    /// Selected text is ready for a system selection target.
    fn clipboard_set(&mut self, target: ClipboardTarget, text: &str) {
        let _ = (target, text);
    }

    /// An embedded block object should be shown at / moved to a cell
    /// origin (viewport coordinates).
    fn block_placed(&mut self, id: u16, col: i32, row: i32) {
        let _ = (id, col, row);
    }

    /// An embedded block object left the viewport and should be torn
    /// down.
    fn block_removed(&mut self, id: u16) {
        let _ = id;
    }

    /// The pointer settled over a link.
    fn link_hovered(&mut self, link: &HoverLink) {
        let _ = link;
    }

    /// The hover link went away.
    fn link_dismissed(&mut self) {}

    /// A settled resize was applied to the grid.
    fn grid_resized(&mut self, width: usize, height: usize) {
        let _ = (width, height);
    }

    // Terminal-state passthrough.

    fn bell(&mut self) {}

    fn title_changed(&mut self, title: &str) {
        let _ = title;
    }

    fn exited(&mut self) {}
}
