//! Palette-index color model shared by cells and the differ.
//!
//! Colors are indices into a host-owned palette laid out in blocks of
//! twelve: the base block holds the default/named colors plus the
//! rendering sentinels, and fixed offsets select the bold, faint, and
//! intense variants of the same entry. Cells marked with an
//! extended-palette flag bypass this layout and index a 256-color table
//! directly.

/// Index into the widget palette (or the 256-color table when the cell
/// carries an extended-palette flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color(pub u16);

/// Number of entries in one palette block.
pub const BLOCK: u16 = 12;

impl Color {
    /// Default foreground/background; resolved against inverse-video
    /// and extended-palette rules by the differ.
    pub const DEFAULT: Self = Self(0);
    pub const BLACK: Self = Self(1);
    pub const RED: Self = Self(2);
    pub const GREEN: Self = Self(3);
    pub const YELLOW: Self = Self(4);
    pub const BLUE: Self = Self(5);
    pub const MAGENTA: Self = Self(6);
    pub const CYAN: Self = Self(7);
    pub const WHITE: Self = Self(8);
    /// Fully transparent; used for blank cells and block placeholders.
    pub const INVISIBLE: Self = Self(9);
    /// Inverse-video foreground-on-background substitute.
    pub const INVERSE: Self = Self(10);
    /// Background used instead of [`Self::INVISIBLE`] under global
    /// inverse video.
    pub const INVERSE_BG: Self = Self(11);

    /// Offset to the bold variant block.
    pub const BOLD_OFFSET: u16 = BLOCK;
    /// Offset to the faint variant block.
    pub const FAINT_OFFSET: u16 = 2 * BLOCK;
    /// Offset to the intense (bright) half of the palette.
    pub const INTENSE_OFFSET: u16 = 4 * BLOCK;

    /// Shift into the bold block.
    pub fn bold(self) -> Self {
        Self(self.0 + Self::BOLD_OFFSET)
    }

    /// Shift into the faint block.
    pub fn faint(self) -> Self {
        Self(self.0 + Self::FAINT_OFFSET)
    }

    /// Shift into the intense half.
    pub fn intense(self) -> Self {
        Self(self.0 + Self::INTENSE_OFFSET)
    }
}
