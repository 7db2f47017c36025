//! Text reconstruction from a selected cell range.

use crate::cell::{Cell, CellFlags};
use crate::index::Point;
use crate::source::{CellSource, FrozenView};

/// Reconstruct the text covered by the reading-order range
/// `start..=end` (`start ≤ end` canonically; one call per row for box
/// selections).
///
/// Blank runs are deferred rather than emitted: they only materialize
/// as spaces when later non-blank content forces them to, so a line
/// that simply ends short never produces trailing padding. Newline
/// markers terminate the row, tab markers restore a real tab, and
/// double-width pairs collapse to their single glyph.
pub fn selection_text<S: CellSource + ?Sized>(
    source: &S,
    width: usize,
    start: Point,
    end: Point,
) -> String {
    let view = FrozenView::new(source);
    let grid_w = width as i32;
    let mut out = String::new();

    for y in start.row..=end.row {
        let Some(cells) = view.row(y) else {
            continue;
        };
        let w = (cells.len() as i32).min(grid_w);
        if w == 0 {
            continue;
        }
        if y == start.row && start.col >= w {
            out.push('\n');
            continue;
        }

        let mut sx = start.col.max(0);
        let mut ex = if end.col >= w { w - 1 } else { end.col };
        if start.row != end.row {
            if y == start.row {
                ex = w - 1;
            } else if y == end.row {
                sx = 0;
            } else {
                sx = 0;
                ex = w - 1;
            }
        }

        // First column of a pending blank run, or -1.
        let mut deferred: i32 = -1;
        let mut x = sx;
        while x <= ex {
            if cells[x as usize].is_wide_spacer() {
                if x < ex {
                    x += 1;
                } else {
                    break;
                }
            }
            if x >= w {
                break;
            }
            let cell = &cells[x as usize];
            if cell.flags.contains(CellFlags::NEWLINE) {
                deferred = -1;
                if y != end.row || x != ex {
                    out.push('\n');
                }
                break;
            } else if cell.flags.contains(CellFlags::TAB) {
                out.push('\t');
                x = ((x + 8) / 8) * 8;
            } else if cell.is_blank() {
                if deferred < 0 {
                    deferred = x;
                }
                x += 1;
            } else {
                if deferred >= 0 {
                    for _ in deferred..x {
                        out.push(' ');
                    }
                    deferred = -1;
                }
                out.push(cell.ch);
                if x == w - 1 && x != end.col && !cell.flags.contains(CellFlags::AUTOWRAP) {
                    out.push('\n');
                }
                x += 1;
            }
        }

        if deferred >= 0 {
            if y == end.row {
                if row_continues_past(cells, w, ex) {
                    // The line visually goes on beyond the selection, so
                    // the selected blanks are real spaces.
                    let mut x = deferred;
                    while x <= ex {
                        if cells[x as usize].is_wide_spacer() {
                            if x < w - 1 {
                                x += 1;
                            } else {
                                break;
                            }
                        }
                        if x >= w {
                            break;
                        }
                        out.push(' ');
                        x += 1;
                    }
                } else {
                    out.push('\n');
                }
            } else {
                out.push('\n');
            }
        }
    }

    out
}

/// Any non-blank content (or line markers) to the right of `ex` on this
/// row?
fn row_continues_past(cells: &[Cell], w: i32, ex: i32) -> bool {
    let mut x = ex + 1;
    while x < w {
        if cells[x as usize].is_wide_spacer() {
            if x < w - 1 {
                x += 1;
            } else {
                break;
            }
        }
        let cell = &cells[x as usize];
        if !cell.is_blank() || cell.flags.intersects(CellFlags::NEWLINE | CellFlags::TAB) {
            return true;
        }
        x += 1;
    }
    false
}
