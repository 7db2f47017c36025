//! Cell-grid differencing: resolve every visible cell's effective
//! attributes, compare against the last-rendered state, and emit one
//! dirty span per row.

mod shape;

pub use shape::{SelectionShape, classify};

use std::collections::HashMap;

use crate::cell::{Cell, CellFlags};
use crate::color::Color;
use crate::index::Point;
use crate::selection::SelectionModel;
use crate::source::{CellSource, FrozenView};

/// Last-rendered projection of one grid position, used only to decide
/// whether anything actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub fg_ext: bool,
    pub bg_ext: bool,
    pub underline: bool,
    pub strike: bool,
    pub double_width: bool,
}

impl DisplayCell {
    fn blank(inverse_video: bool) -> Self {
        Self {
            ch: '\0',
            fg: Color::DEFAULT,
            bg: if inverse_video { Color::INVERSE_BG } else { Color::INVISIBLE },
            fg_ext: false,
            bg_ext: false,
            underline: false,
            strike: false,
            double_width: false,
        }
    }

    fn block_placeholder() -> Self {
        Self {
            ch: '\0',
            fg: Color::INVISIBLE,
            bg: Color::INVISIBLE,
            fg_ext: false,
            bg_ext: false,
            underline: false,
            strike: false,
            double_width: false,
        }
    }
}

impl Default for DisplayCell {
    fn default() -> Self {
        Self::blank(false)
    }
}

/// Per-frame view parameters supplied by the surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewState {
    pub width: usize,
    pub height: usize,
    /// Rows scrolled back into history.
    pub scroll: usize,
    pub inverse_video: bool,
    /// Cursor cell in viewport coordinates.
    pub cursor: Point,
    pub cursor_visible: bool,
}

/// Contiguous dirty column range of one viewport row, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub row: usize,
    pub first: usize,
    pub last: usize,
}

/// Viewport origin for an embedded block object this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlacement {
    pub id: u16,
    pub col: i32,
    pub row: i32,
}

/// Geometry handed to the presentation for the highlight skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOverlay {
    /// Canonical endpoints in buffer coordinates.
    pub start: Point,
    pub end: Point,
    /// Viewport row of the overlay's first band.
    pub first_viewport_row: i32,
    pub rows: i32,
    /// Unhighlighted cells left of the start on the top band.
    pub top_inset: i32,
    /// Unhighlighted cells right of the end on the bottom band.
    pub bottom_inset: i32,
    pub shape: SelectionShape,
}

/// Everything one differ pass produces.
#[derive(Debug, Default)]
pub struct Damage {
    pub spans: Vec<RowSpan>,
    pub blocks_placed: Vec<BlockPlacement>,
    pub blocks_removed: Vec<u16>,
    pub overlay: Option<SelectionOverlay>,
    /// Cursor cell (viewport coordinates) when it should be shown.
    pub cursor: Option<Point>,
}

/// The differencing renderer. Holds one [`DisplayCell`] per grid
/// position plus the set of embedded blocks placed last pass.
pub struct GridDiffer {
    width: usize,
    height: usize,
    display: Vec<DisplayCell>,
    active_blocks: HashMap<u16, (i32, i32)>,
    /// Set on (re)allocation: the next pass repaints everything.
    structural: bool,
    /// Render newline/autowrap markers with substitute glyphs.
    pub debug_markers: bool,
}

impl GridDiffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            display: vec![DisplayCell::default(); width * height],
            active_blocks: HashMap::new(),
            structural: true,
            debug_markers: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate for a new grid geometry; the next pass is a full
    /// repaint.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.display = vec![DisplayCell::default(); width * height];
        self.structural = true;
    }

    /// Force the next pass to repaint everything (palette or theme
    /// changed under us).
    pub fn invalidate(&mut self) {
        self.structural = true;
    }

    /// One differencing pass over the viewport.
    pub fn apply<S: CellSource + ?Sized>(
        &mut self,
        source: &S,
        view: &ViewState,
        selection: &SelectionModel,
    ) -> Damage {
        if view.width != self.width || view.height != self.height {
            self.resize(view.width, view.height);
        }

        let mut damage = Damage::default();
        let inverse = view.inverse_video;
        let previous_blocks = std::mem::take(&mut self.active_blocks);

        {
            let frozen = FrozenView::new(source);
            for y in 0..self.height {
                let cells = frozen.row(y as i32 - view.scroll as i32);
                let mut first: i32 = -1;
                let mut last: i32 = -1;

                for x in 0..self.width {
                    let resolved = match cells.and_then(|c| c.get(x)) {
                        None => DisplayCell::blank(inverse),
                        Some(cell) => self.resolve(cell, inverse, x, y, &mut damage),
                    };

                    let idx = y * self.width + x;
                    if self.structural || self.display[idx] != resolved {
                        if first < 0 {
                            first = x as i32;
                        }
                        last = x as i32;
                    }
                    // A clean spacer right after a dirty glyph half:
                    // redraw the pair together.
                    if resolved.double_width
                        && resolved.ch == '\0'
                        && first >= 0
                        && last == x as i32 - 1
                    {
                        last = x as i32;
                    }
                    self.display[idx] = resolved;
                }

                if first >= 0 {
                    damage.spans.push(RowSpan {
                        row: y,
                        first: first as usize,
                        last: last as usize,
                    });
                }
            }
        }
        self.structural = false;

        for id in previous_blocks.into_keys() {
            if !self.active_blocks.contains_key(&id) {
                damage.blocks_removed.push(id);
            }
        }

        if view.cursor_visible && view.scroll == 0 {
            damage.cursor = Some(view.cursor);
        }

        if selection.active() {
            let (a, b) = selection.canonical();
            damage.overlay = Some(SelectionOverlay {
                start: a,
                end: b,
                first_viewport_row: a.row + view.scroll as i32,
                rows: b.row - a.row + 1,
                top_inset: a.col.max(0),
                bottom_inset: (self.width as i32 - 1 - b.col).max(0),
                shape: classify(selection.kind(), a, b, self.width),
            });
        }

        damage
    }

    fn resolve(
        &mut self,
        cell: &Cell,
        inverse_video: bool,
        x: usize,
        y: usize,
        damage: &mut Damage,
    ) -> DisplayCell {
        if let Some(block) = cell.block {
            let origin = (x as i32 - i32::from(block.dx), y as i32 - i32::from(block.dy));
            if !self.active_blocks.contains_key(&block.id) {
                self.active_blocks.insert(block.id, origin);
                damage.blocks_placed.push(BlockPlacement {
                    id: block.id,
                    col: origin.0,
                    row: origin.1,
                });
            }
            return DisplayCell::block_placeholder();
        }

        if cell.flags.contains(CellFlags::INVISIBLE) {
            let mut dc = DisplayCell::blank(inverse_video);
            dc.double_width = cell.flags.contains(CellFlags::DOUBLE_WIDTH);
            return dc;
        }

        resolve_visible(cell, inverse_video, self.debug_markers)
    }
}

/// Resolve a visible cell's effective colors and attributes.
fn resolve_visible(cell: &Cell, inverse_video: bool, debug_markers: bool) -> DisplayCell {
    let mut ch = cell.ch;
    let mut fg = cell.fg;
    let mut bg = cell.bg;
    let mut fg_ext = cell.flags.contains(CellFlags::FG_256);
    let mut bg_ext = cell.flags.contains(CellFlags::BG_256);
    let inverse = cell.flags.contains(CellFlags::INVERSE) ^ inverse_video;

    if fg == Color::DEFAULT && inverse {
        fg = Color::INVERSE_BG;
    }
    if bg == Color::DEFAULT {
        if inverse {
            bg = Color::INVERSE;
        } else if !bg_ext {
            bg = Color::INVISIBLE;
        }
    }
    if cell.flags.contains(CellFlags::INTENSE_FG) && !fg_ext {
        fg = fg.intense();
    }
    if cell.flags.contains(CellFlags::INTENSE_BG) && !bg_ext {
        bg = bg.intense();
    }
    if inverse {
        std::mem::swap(&mut fg, &mut bg);
        std::mem::swap(&mut fg_ext, &mut bg_ext);
    }
    if cell.flags.contains(CellFlags::BOLD) && !fg_ext {
        fg = fg.bold();
    }
    if cell.flags.contains(CellFlags::FAINT) && !fg_ext {
        fg = fg.faint();
    }

    let mut underline = cell.flags.contains(CellFlags::UNDERLINE);
    let mut strike = cell.flags.contains(CellFlags::STRIKETHROUGH);
    if debug_markers {
        strike = cell.flags.contains(CellFlags::NEWLINE);
        underline = cell.flags.contains(CellFlags::AUTOWRAP);
        if cell.flags.intersects(CellFlags::NEWLINE | CellFlags::AUTOWRAP) {
            fg = Color::WHITE;
            bg = Color::YELLOW;
            ch = '!';
        }
    }

    DisplayCell {
        ch,
        fg,
        bg,
        fg_ext,
        bg_ext,
        underline,
        strike,
        double_width: cell.flags.contains(CellFlags::DOUBLE_WIDTH),
    }
}
