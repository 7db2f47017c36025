//! In-memory [`CellSource`] fixture for tests.

use std::cell::Cell as Counter;

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, CellFlags};
use crate::index::{Point, Rect};
use crate::source::CellSource;

/// Simple screen + scrollback backing store. Scrollback row 0 is the
/// row directly above the screen (buffer row −1).
pub struct TestGrid {
    pub width: usize,
    rows: Vec<Vec<Cell>>,
    scrollback: Vec<Vec<Cell>>,
    freezes: Counter<i32>,
    links: Vec<(Rect, String)>,
}

impl TestGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: (0..height).map(|_| vec![Cell::default(); width]).collect(),
            scrollback: Vec::new(),
            freezes: Counter::new(0),
            links: Vec::new(),
        }
    }

    /// Grid sized to the given lines, one screen row per line.
    pub fn from_lines(width: usize, lines: &[&str]) -> Self {
        let mut grid = Self::new(width, lines.len());
        for (y, line) in lines.iter().enumerate() {
            grid.put_str(0, y as i32, line);
        }
        grid
    }

    fn row_storage(&mut self, row: i32) -> &mut Vec<Cell> {
        if row >= 0 {
            &mut self.rows[row as usize]
        } else {
            &mut self.scrollback[(-row - 1) as usize]
        }
    }

    /// Write text, laying down spacer cells after wide glyphs.
    pub fn put_str(&mut self, col: usize, row: i32, text: &str) {
        let width = self.width;
        let cells = self.row_storage(row);
        let mut x = col;
        for ch in text.chars() {
            if x >= width {
                break;
            }
            let wide = ch.width().unwrap_or(1) == 2;
            cells[x] = Cell::glyph(ch);
            if wide {
                cells[x].flags |= CellFlags::DOUBLE_WIDTH;
                if x + 1 < width {
                    cells[x + 1] = Cell::glyph('\0');
                    cells[x + 1].flags |= CellFlags::DOUBLE_WIDTH;
                }
                x += 2;
            } else {
                x += 1;
            }
        }
    }

    pub fn cell_mut(&mut self, col: usize, row: i32) -> &mut Cell {
        &mut self.row_storage(row)[col]
    }

    /// Mark the row's last cell as continuing onto the next row.
    pub fn mark_autowrap(&mut self, row: i32) {
        let cells = self.row_storage(row);
        if let Some(last) = cells.last_mut() {
            last.flags |= CellFlags::AUTOWRAP;
        }
    }

    /// Push one scrollback row above the screen (most recent first).
    pub fn push_scrollback(&mut self, line: &str) {
        let mut cells = vec![Cell::default(); self.width];
        for (x, ch) in line.chars().enumerate().take(self.width) {
            cells[x] = Cell::glyph(ch);
        }
        self.scrollback.push(cells);
    }

    /// Shorten a screen row below the grid width.
    pub fn truncate_row(&mut self, row: i32, len: usize) {
        self.row_storage(row).truncate(len);
    }

    pub fn add_link(&mut self, rect: Rect, text: &str) {
        self.links.push((rect, text.to_owned()));
    }

    /// Freeze/thaw brackets must balance once all views are dropped.
    pub fn freeze_balanced(&self) -> bool {
        self.freezes.get() == 0
    }
}

impl CellSource for TestGrid {
    fn row(&self, index: i32) -> Option<&[Cell]> {
        if index >= 0 {
            self.rows.get(index as usize).map(Vec::as_slice)
        } else {
            self.scrollback.get((-index - 1) as usize).map(Vec::as_slice)
        }
    }

    fn backscroll_limit(&self) -> usize {
        self.scrollback.len()
    }

    fn freeze(&self) {
        self.freezes.set(self.freezes.get() + 1);
    }

    fn thaw(&self) {
        self.freezes.set(self.freezes.get() - 1);
    }

    fn link_at(&self, col: i32, row: i32) -> Option<(String, Rect)> {
        self.links
            .iter()
            .find(|(rect, _)| rect.contains(Point::new(col, row)))
            .map(|(rect, text)| (text.clone(), *rect))
    }
}
