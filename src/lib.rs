//! Interactive surface for terminal emulator widgets.
//!
//! This crate sits between a terminal-state layer (which owns the cell
//! grid and the PTY) and a presentation layer (which draws pixels). It
//! provides the pieces with real invariants:
//!
//! - [`differ::GridDiffer`]: attribute-level cell diffing producing
//!   minimal per-row update spans plus selection-overlay geometry;
//! - [`selection::SelectionModel`]: stream and box selection with
//!   word/line extension and byte-faithful text reconstruction;
//! - [`report`]: the four mouse-report wire encodings;
//! - [`link::LinkLocator`]: debounced hover-link detection.
//!
//! The terminal-state layer is consumed through [`source::CellSource`];
//! outbound effects reach the host through [`observer::SurfaceObserver`].
//! [`surface::TermSurface`] wires it all together.

pub mod cell;
pub mod color;
pub mod config;
pub mod differ;
pub mod index;
pub mod link;
pub mod mode;
pub mod observer;
pub mod registry;
pub mod report;
pub mod sched;
pub mod selection;
pub mod source;
pub mod surface;

#[cfg(test)]
pub(crate) mod testgrid;

pub use cell::{BlockRef, Cell, CellFlags};
pub use color::Color;
pub use config::{ConfigError, SurfaceConfig};
pub use differ::{
    BlockPlacement, Damage, DisplayCell, GridDiffer, RowSpan, SelectionOverlay, SelectionShape,
    ViewState,
};
pub use index::{Point, Rect};
pub use link::{HoverLink, LinkKind, LinkLocator};
pub use mode::{Modifiers, MouseEncoding, MouseMode, SurfaceMode};
pub use observer::SurfaceObserver;
pub use registry::{ClipboardTarget, SharedRegistry, SurfaceId, SurfaceRegistry};
pub use report::{MouseButton, PointerEvent, PointerKind, encode};
pub use selection::{SelectionCorner, SelectionKind, SelectionModel, SelectionPhase};
pub use source::{CellSource, FrozenView};
pub use surface::TermSurface;
