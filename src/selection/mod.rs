//! Selection geometry: stream/box kinds, the drag lifecycle, word and
//! line expansion across soft-wrapped rows, endpoint fix-ups, and
//! invalidation on buffer changes.

mod text;

pub use text::selection_text;

use crate::cell::CellFlags;
use crate::index::Point;
use crate::source::{CellSource, FrozenView};

/// Selection geometry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionKind {
    /// Reading order: partial first/last rows, full interior rows.
    #[default]
    Stream,
    /// Rectangular: column range × row range.
    Box,
}

/// Lifecycle of a selection.
///
/// `Armed` and `Dragging` are the building states (pointer held);
/// `Dragging` and `Settled` are the visible ones. Stretching a settled
/// selection by an endpoint handle re-enters `Dragging` directly, which
/// is why visibility and building are not a single linear progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPhase {
    #[default]
    Idle,
    /// Pointer pressed, no real movement yet; nothing highlighted.
    Armed,
    /// Pointer dragging a visible selection.
    Dragging,
    /// Pointer released over a non-empty selection.
    Settled,
}

/// Endpoint handle of a settled selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCorner {
    TopLeft,
    BottomRight,
}

/// The selection state machine.
///
/// `anchor` and `cursor` are stored exactly as produced by input and
/// are never pre-ordered; [`SelectionModel::canonical`] derives the
/// ordered pair per kind.
#[derive(Debug, Default)]
pub struct SelectionModel {
    kind: SelectionKind,
    phase: SelectionPhase,
    anchor: Point,
    cursor: Point,
    grabbed: Option<SelectionCorner>,
}

/// NUL (the empty cell) is always a separator; the rest of the set is
/// configurable.
pub fn is_word_separator(separators: &str, ch: char) -> bool {
    ch == '\0' || separators.contains(ch)
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    /// Whether the selection overlay is visible.
    pub fn active(&self) -> bool {
        matches!(self.phase, SelectionPhase::Dragging | SelectionPhase::Settled)
    }

    /// Whether the pointer is currently building the selection.
    pub fn building(&self) -> bool {
        matches!(self.phase, SelectionPhase::Armed | SelectionPhase::Dragging)
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Ordered endpoints. Box kind sorts the axes independently (the
    /// endpoints are rectangle corners, not a path); stream kind swaps
    /// both endpoints together when the pair is against reading order.
    pub fn canonical(&self) -> (Point, Point) {
        let (mut a, mut b) = (self.anchor, self.cursor);
        match self.kind {
            SelectionKind::Box => {
                if a.row > b.row {
                    std::mem::swap(&mut a.row, &mut b.row);
                }
                if a.col > b.col {
                    std::mem::swap(&mut a.col, &mut b.col);
                }
            }
            SelectionKind::Stream => {
                if a.row > b.row || (a.row == b.row && b.col < a.col) {
                    std::mem::swap(&mut a, &mut b);
                }
            }
        }
        (a, b)
    }

    /// Whether a cell lies inside the (active) selection.
    pub fn contains(&self, p: Point) -> bool {
        if !self.active() {
            return false;
        }
        let (a, b) = self.canonical();
        Self::contains_in(self.kind, a, b, p)
    }

    fn contains_in(kind: SelectionKind, a: Point, b: Point, p: Point) -> bool {
        match kind {
            SelectionKind::Box => {
                p.row >= a.row && p.row <= b.row && p.col >= a.col && p.col <= b.col
            }
            SelectionKind::Stream => {
                (p.row > a.row || (p.row == a.row && p.col >= a.col))
                    && (p.row < b.row || (p.row == b.row && p.col <= b.col))
            }
        }
    }

    // --- Drag lifecycle ---

    /// First press: arm a zero-size selection at `p`.
    pub fn begin<S: CellSource + ?Sized>(&mut self, source: &S, p: Point, kind: SelectionKind) {
        self.kind = kind;
        self.phase = SelectionPhase::Armed;
        self.anchor = p;
        self.cursor = p;
        self.grabbed = None;
        self.double_width_fix(source);
    }

    /// Drag update: track the live pointer cell.
    pub fn extend<S: CellSource + ?Sized>(&mut self, source: &S, width: usize, p: Point) {
        if !self.building() {
            return;
        }
        if self.phase == SelectionPhase::Armed && p != self.anchor {
            self.phase = SelectionPhase::Dragging;
            log::debug!("selection visible at {p:?}");
        }
        self.grabbed = None;
        self.cursor = p;
        self.double_width_fix(source);
        if self.kind == SelectionKind::Stream {
            self.newline_extend_fix(source, width);
        }
    }

    /// Grab an endpoint handle of a settled selection and resume
    /// dragging it. The opposite corner becomes the fixed anchor.
    pub fn begin_stretch<S: CellSource + ?Sized>(
        &mut self,
        source: &S,
        corner: SelectionCorner,
        p: Point,
    ) {
        if !self.active() {
            return;
        }
        let (mut a, mut b) = (self.anchor, self.cursor);
        match self.kind {
            SelectionKind::Box => match corner {
                SelectionCorner::TopLeft => {
                    if a.row < b.row {
                        std::mem::swap(&mut a.row, &mut b.row);
                    }
                    if a.col < b.col {
                        std::mem::swap(&mut a.col, &mut b.col);
                    }
                }
                SelectionCorner::BottomRight => {
                    if a.row > b.row {
                        std::mem::swap(&mut a.row, &mut b.row);
                    }
                    if a.col > b.col {
                        std::mem::swap(&mut a.col, &mut b.col);
                    }
                }
            },
            SelectionKind::Stream => match corner {
                SelectionCorner::TopLeft => {
                    if a.row < b.row || (a.row == b.row && b.col > a.col) {
                        std::mem::swap(&mut a, &mut b);
                    }
                }
                SelectionCorner::BottomRight => {
                    if a.row > b.row || (a.row == b.row && b.col < a.col) {
                        std::mem::swap(&mut a, &mut b);
                    }
                }
            },
        }
        self.anchor = a;
        self.cursor = p;
        self.phase = SelectionPhase::Dragging;
        self.grabbed = Some(corner);
        self.double_width_fix(source);
    }

    /// Pointer release. Zero-size selections and presses without a real
    /// drag deactivate. Returns whether the selection is still visible.
    pub fn finish<S: CellSource + ?Sized>(
        &mut self,
        source: &S,
        width: usize,
        p: Option<Point>,
    ) -> bool {
        match self.phase {
            SelectionPhase::Armed => self.phase = SelectionPhase::Idle,
            SelectionPhase::Dragging => {
                if self.anchor == self.cursor {
                    self.phase = SelectionPhase::Idle;
                } else {
                    if let Some(p) = p {
                        self.cursor = p;
                    }
                    self.double_width_fix(source);
                    if self.kind == SelectionKind::Stream {
                        self.newline_extend_fix(source, width);
                    }
                    self.phase = SelectionPhase::Settled;
                }
            }
            SelectionPhase::Idle | SelectionPhase::Settled => {}
        }
        self.grabbed = None;
        self.active()
    }

    /// Explicit cancel (terminal application cleared the screen, view
    /// reset, …).
    pub fn cancel(&mut self) {
        if self.phase != SelectionPhase::Idle {
            log::debug!("selection cancelled");
        }
        self.phase = SelectionPhase::Idle;
        self.grabbed = None;
    }

    /// Hide the highlight but keep a drag in progress re-activatable.
    fn deactivate(&mut self) {
        self.phase = match self.phase {
            SelectionPhase::Dragging => SelectionPhase::Armed,
            _ => SelectionPhase::Idle,
        };
    }

    // --- Word / line expansion ---

    /// Double-click: select the word around `p`, crossing row
    /// boundaries only over autowrap continuations.
    pub fn select_word<S: CellSource + ?Sized>(&mut self, source: &S, separators: &str, p: Point) {
        self.phase = SelectionPhase::Settled;
        self.grabbed = None;
        self.anchor = p;
        self.cursor = p;

        let view = FrozenView::new(source);
        let Some(mut cells) = view.row(p.row) else {
            return;
        };
        let mut w = cells.len() as i32;
        if w == 0 {
            return;
        }

        // Leftward scan.
        let mut x = p.col.min(w - 1);
        let mut y = p.row;
        'left: loop {
            while x >= 0 {
                let mut xi = x as usize;
                if cells[xi].is_wide_spacer() && x > 0 {
                    x -= 1;
                    xi = x as usize;
                }
                if is_word_separator(separators, cells[xi].ch) {
                    break 'left;
                }
                self.anchor = Point::new(x, y);
                x -= 1;
            }
            match view.row(y - 1) {
                Some(prev)
                    if prev.last().is_some_and(|c| c.flags.contains(CellFlags::AUTOWRAP)) =>
                {
                    y -= 1;
                    cells = prev;
                    w = cells.len() as i32;
                    x = w - 1;
                }
                _ => break,
            }
        }

        // Rightward scan, restarting from the clicked row.
        if y != p.row {
            let Some(row) = view.row(p.row) else {
                return;
            };
            cells = row;
            w = cells.len() as i32;
        }
        y = p.row;
        x = self.cursor.col;
        'right: loop {
            while x < w {
                let mut xi = x as usize;
                if cells[xi].is_wide_spacer() && x < w - 1 {
                    // the pair's spacer column still belongs to the word
                    self.cursor = Point::new(x, y);
                    x += 1;
                    xi = x as usize;
                }
                if is_word_separator(separators, cells[xi].ch) {
                    break 'right;
                }
                self.cursor = Point::new(x, y);
                x += 1;
            }
            if !cells.last().is_some_and(|c| c.flags.contains(CellFlags::AUTOWRAP)) {
                break;
            }
            y += 1;
            x = 0;
            match view.row(y) {
                Some(row) => {
                    cells = row;
                    w = cells.len() as i32;
                }
                None => break,
            }
        }
    }

    /// Triple-click: select the full visual line through `p`, extending
    /// across autowrap continuations in both directions.
    pub fn select_line<S: CellSource + ?Sized>(&mut self, source: &S, width: usize, p: Point) {
        self.phase = SelectionPhase::Settled;
        self.grabbed = None;
        self.anchor = Point::new(0, p.row);
        self.cursor = Point::new(width as i32 - 1, p.row);

        let view = FrozenView::new(source);

        let mut y = p.row;
        while let Some(prev) = view.row(y - 1) {
            if !prev.last().is_some_and(|c| c.flags.contains(CellFlags::AUTOWRAP)) {
                break;
            }
            y -= 1;
        }
        self.anchor.row = y;

        let mut y = p.row;
        while let Some(cells) = view.row(y) {
            if !cells.last().is_some_and(|c| c.flags.contains(CellFlags::AUTOWRAP)) {
                self.cursor.col = (cells.len() as i32 - 1).max(0);
                break;
            }
            y += 1;
        }
        self.cursor.row = y;
    }

    /// Double-click-drag: clicking inside the selection dissolves it,
    /// clicking outside grows it to the union with the word at `p`.
    pub fn extend_word_to<S: CellSource + ?Sized>(
        &mut self,
        source: &S,
        separators: &str,
        p: Point,
    ) {
        let previous = if self.active() {
            let (a, b) = self.canonical();
            if Self::contains_in(self.kind, a, b, p) {
                self.phase = SelectionPhase::Idle;
                return;
            }
            Some((a, b))
        } else {
            None
        };

        self.select_word(source, separators, p);

        if let Some((old_a, old_b)) = previous {
            match self.kind {
                SelectionKind::Box => {
                    self.anchor = Point::new(old_a.col.min(self.anchor.col), old_a.row.min(self.anchor.row));
                    self.cursor = Point::new(old_b.col.max(self.cursor.col), old_b.row.max(self.cursor.row));
                }
                SelectionKind::Stream => {
                    if self.anchor >= old_a {
                        self.anchor = old_a;
                    }
                    if self.cursor <= old_b {
                        self.cursor = old_b;
                    }
                }
            }
        }
    }

    // --- Invalidation from the terminal-state layer ---

    /// Rows `first..=last` scrolled by `direction`. A selection fully
    /// inside the range rides along; a partial overlap, or a shift that
    /// escapes the range, deactivates.
    pub fn scrolled(&mut self, direction: i32, first: i32, last: i32) {
        if !self.active() {
            return;
        }
        let lo = self.anchor.row.min(self.cursor.row);
        let hi = self.anchor.row.max(self.cursor.row);
        if first <= lo && last >= hi {
            self.anchor.row += direction;
            self.cursor.row += direction;
            let lo = lo + direction;
            let hi = hi + direction;
            if !(first <= lo && last >= hi) {
                log::debug!("selection scrolled out of {first}..={last}");
                self.deactivate();
            }
        } else if !(first > hi || last < lo) {
            self.deactivate();
        }
    }

    /// `count` cells were rewritten in place starting at `origin`
    /// (wrapping at `width`). Overlap with the selection deactivates.
    pub fn content_changed(&mut self, width: usize, origin: Point, count: usize) {
        if !self.active() || count == 0 {
            return;
        }
        let w = width as i32;
        if w <= 0 {
            return;
        }
        let (a, b) = self.canonical();
        match self.kind {
            SelectionKind::Box => {
                let mut x = origin.col.clamp(0, w - 1);
                let mut y = origin.row;
                let mut n = count as i32;
                while n > 0 {
                    let d = n.min(w - x);
                    if y > b.row {
                        break;
                    }
                    if y >= a.row && !(x > b.col || x + d - 1 < a.col) {
                        self.deactivate();
                        break;
                    }
                    n -= d;
                    x = 0;
                    y += 1;
                }
            }
            SelectionKind::Stream => {
                let sel_start = i64::from(a.row) * i64::from(w) + i64::from(a.col);
                let sel_len = i64::from(b.col - a.col) + i64::from(w) * i64::from(b.row - a.row);
                let chg_start = i64::from(origin.row) * i64::from(w) + i64::from(origin.col);
                let chg_len = count as i64;
                if !(chg_start > sel_start + sel_len || sel_start > chg_start + chg_len) {
                    self.deactivate();
                }
            }
        }
    }

    // --- Text reconstruction ---

    /// Reconstruct the selected region as text.
    ///
    /// A selection anchored with both endpoints at the origin yields
    /// the active hover link instead; a "select nothing" click after a
    /// link click still produces the link as clipboard text.
    pub fn to_text<S: CellSource + ?Sized>(
        &self,
        source: &S,
        width: usize,
        link_fallback: Option<&str>,
    ) -> Option<String> {
        if self.kind == SelectionKind::Box && self.active() {
            let (a, b) = self.canonical();
            let mut out = String::new();
            for y in a.row..=b.row {
                let line = selection_text(source, width, Point::new(a.col, y), Point::new(b.col, y));
                out.push_str(&line);
                if !line.ends_with('\n') {
                    out.push('\n');
                }
            }
            return Some(out);
        }

        let (a, b) = if self.active() {
            (self.anchor, self.cursor)
        } else {
            (Point::ORIGIN, Point::ORIGIN)
        };
        if a == Point::ORIGIN && b == Point::ORIGIN {
            return link_fallback.map(str::to_owned);
        }
        if a == b {
            return None;
        }
        let (a, b) = self.canonical();
        let s = selection_text(source, width, a, b);
        if s.is_empty() { None } else { Some(s) }
    }

    // --- Endpoint fix-ups ---

    /// Nudge endpoints off the spacer half of a double-width pair so a
    /// wide glyph is never split. Direction depends on which endpoint
    /// and on the selection's orientation.
    fn double_width_fix<S: CellSource + ?Sized>(&mut self, source: &S) {
        let view = FrozenView::new(source);
        let forward = self.cursor.row > self.anchor.row
            || (self.cursor.row == self.anchor.row && self.cursor.col >= self.anchor.col);

        if let Some(cells) = view.row(self.cursor.row) {
            let w = cells.len() as i32;
            let x = self.cursor.col;
            if forward {
                if x >= 0 && x < w - 1 {
                    let c = &cells[x as usize];
                    if c.ch != '\0' && c.flags.contains(CellFlags::DOUBLE_WIDTH) {
                        self.cursor.col += 1;
                    }
                }
            } else if x > 0 && x < w && cells[x as usize].is_wide_spacer() {
                self.cursor.col -= 1;
            }
        }

        if let Some(cells) = view.row(self.anchor.row) {
            let w = cells.len() as i32;
            let x = self.anchor.col;
            if forward {
                if x > 0 && x < w && cells[x as usize].is_wide_spacer() {
                    self.anchor.col -= 1;
                }
            } else if x >= 0 && x < w - 1 {
                let c = &cells[x as usize];
                if c.ch != '\0' && c.flags.contains(CellFlags::DOUBLE_WIDTH) {
                    self.anchor.col += 1;
                }
            }
        }
    }

    /// When the reconstructed last row already terminates in a newline,
    /// snap the cursor column to the last grid column so the implicit
    /// blank tail is included. Skipped while stretching from the
    /// top-left handle.
    fn newline_extend_fix<S: CellSource + ?Sized>(&mut self, source: &S, width: usize) {
        if self.grabbed == Some(SelectionCorner::TopLeft) || width == 0 {
            return;
        }
        if self.cursor.row < self.anchor.row {
            return;
        }
        if self.cursor.row == self.anchor.row && self.anchor.col > self.cursor.col {
            return;
        }
        let x1 = if self.cursor.row == self.anchor.row {
            self.anchor.col
        } else {
            0
        };
        let last = selection_text(
            source,
            width,
            Point::new(x1, self.cursor.row),
            Point::new(self.cursor.col, self.cursor.row),
        );
        if last.ends_with('\n') {
            self.cursor.col = width as i32 - 1;
            self.double_width_fix(source);
        }
    }
}
