//! Terminal grid cell representation with attributes and flags.

use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    /// Bitflags for cell text attributes and layout markers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u16 {
        const BOLD          = 0b0000_0000_0000_0001;
        const FAINT         = 0b0000_0000_0000_0010;
        const INVERSE       = 0b0000_0000_0000_0100;
        const UNDERLINE     = 0b0000_0000_0000_1000;
        const STRIKETHROUGH = 0b0000_0000_0001_0000;
        const INVISIBLE     = 0b0000_0000_0010_0000;
        const INTENSE_FG    = 0b0000_0000_0100_0000;
        const INTENSE_BG    = 0b0000_0000_1000_0000;
        /// Foreground indexes the 256-color table instead of the palette.
        const FG_256        = 0b0000_0001_0000_0000;
        /// Background indexes the 256-color table instead of the palette.
        const BG_256        = 0b0000_0010_0000_0000;
        /// First half of a width-2 glyph, or the spacer half when the
        /// codepoint is NUL.
        const DOUBLE_WIDTH  = 0b0000_0100_0000_0000;
        /// The row's last character continues onto the next row without
        /// an explicit newline.
        const AUTOWRAP      = 0b0000_1000_0000_0000;
        /// Explicit line break recorded at this cell.
        const NEWLINE       = 0b0001_0000_0000_0000;
        /// Tab jump recorded at this cell.
        const TAB           = 0b0010_0000_0000_0000;
    }
}

/// Reference from a placeholder cell into an embedded block object.
///
/// `dx`/`dy` give this cell's offset inside the block footprint so the
/// block origin can be recovered from any covered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
    pub id: u16,
    pub dx: u8,
    pub dy: u8,
}

/// A single grid cell. Owned by the terminal-state layer; this crate
/// only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Displayed codepoint; NUL means empty.
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub flags: CellFlags,
    pub block: Option<BlockRef>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: '\0',
            fg: Color::DEFAULT,
            bg: Color::DEFAULT,
            flags: CellFlags::empty(),
            block: None,
        }
    }
}

impl Cell {
    /// Cell holding a plain glyph with default colors.
    pub fn glyph(ch: char) -> Self {
        Self { ch, ..Self::default() }
    }

    /// True for cells that read as blank in text reconstruction.
    pub fn is_blank(&self) -> bool {
        self.ch == '\0' || self.ch == ' '
    }

    /// True for the second (placeholder) half of a double-width pair.
    pub fn is_wide_spacer(&self) -> bool {
        self.ch == '\0' && self.flags.contains(CellFlags::DOUBLE_WIDTH)
    }
}
