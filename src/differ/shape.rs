//! Highlight shape classification for the selection overlay.
//!
//! The presentation picks a highlight skin asset by shape; the
//! precedence below must be reproduced exactly for visual parity.

use crate::index::Point;
use crate::selection::SelectionKind;

/// Shape of the selection highlight, for the presentation's skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionShape {
    /// Single visual band: one row, full-width on both ends, or any
    /// box selection.
    Oneline,
    /// Two rows whose runs don't meet: the top run starts right of
    /// where the bottom run ends.
    Disjoint,
    /// Top row starts at column zero.
    TopFull,
    /// Bottom row ends at the last column.
    BottomFull,
    Multiline,
}

/// Classify canonical endpoints. `start`/`end` must already be ordered
/// (see `SelectionModel::canonical`).
pub fn classify(kind: SelectionKind, start: Point, end: Point, width: usize) -> SelectionShape {
    let last_col = width as i32 - 1;
    if kind == SelectionKind::Box {
        return SelectionShape::Oneline;
    }
    if start.row == end.row || (start.col == 0 && end.col == last_col) {
        return SelectionShape::Oneline;
    }
    if start.row == end.row - 1 && start.col > end.col {
        return SelectionShape::Disjoint;
    }
    if start.col == 0 {
        return SelectionShape::TopFull;
    }
    if end.col == last_col {
        return SelectionShape::BottomFull;
    }
    SelectionShape::Multiline
}
