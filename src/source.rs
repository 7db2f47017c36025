//! Contract with the terminal-state layer that owns the screen buffer.

use crate::cell::Cell;
use crate::index::Rect;

/// Read access to the screen buffer owned by the terminal-state layer.
///
/// Row indices are 0-based from the top of the live screen; negative
/// indices address scrollback (-1 is the row directly above the
/// screen). Rows may be shorter than the grid width (trailing cells
/// are implicitly blank) and an absent row reads as all-blank.
///
/// Bulk reads must happen inside a freeze bracket so the source cannot
/// compact or move rows mid-iteration; [`CellSource::frozen`] returns a
/// guard that releases the bracket on drop, including on early return.
/// Brackets may nest.
pub trait CellSource {
    /// Fetch one row of cells, or `None` if the index is outside the
    /// retained buffer.
    fn row(&self, index: i32) -> Option<&[Cell]>;

    /// Number of scrollback rows currently retained.
    fn backscroll_limit(&self) -> usize {
        0
    }

    /// Enter a read-stable bracket. Prefer [`CellSource::frozen`].
    fn freeze(&self) {}

    /// Leave a read-stable bracket.
    fn thaw(&self) {}

    /// Span lookup for hover-link detection: the word-like run of text
    /// under the given cell together with its bounding rectangle.
    /// Classification of the returned string happens in this crate.
    fn link_at(&self, col: i32, row: i32) -> Option<(String, Rect)> {
        let _ = (col, row);
        None
    }

    /// Scoped read-stable view over this source.
    fn frozen(&self) -> FrozenView<'_, Self>
    where
        Self: Sized,
    {
        FrozenView::new(self)
    }
}

/// RAII freeze/thaw bracket around a [`CellSource`].
pub struct FrozenView<'a, S: CellSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: CellSource + ?Sized> FrozenView<'a, S> {
    pub fn new(source: &'a S) -> Self {
        source.freeze();
        Self { source }
    }

    /// Fetch one row; see [`CellSource::row`].
    pub fn row(&self, index: i32) -> Option<&[Cell]> {
        self.source.row(index)
    }
}

impl<S: CellSource + ?Sized> Drop for FrozenView<'_, S> {
    fn drop(&mut self) {
        self.source.thaw();
    }
}
