//! Mouse report encoding: the four competing wire protocols.
//!
//! Encoding is a pure function of the event and the active
//! mode/encoding pair. The encoder is stateless: motion reports must
//! echo the originally pressed button, so the caller supplies the held
//! button on the event.

use std::io::Write as _;

use crate::mode::{MouseEncoding, MouseMode};

/// Pointer buttons as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Extra buttons, 0-based beyond Right.
    Other(u8),
}

impl MouseButton {
    /// Protocol button index: 0 = left, 1 = middle, 2 = right.
    pub fn index(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
            Self::Other(n) => 3 + n,
        }
    }
}

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Release,
    Motion,
    Wheel { down: bool },
}

/// One pointer event in cell coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// The pressed button, or the held button for motion. `None`
    /// motion under any-motion mode reports the no-button code.
    pub button: Option<MouseButton>,
    /// Meta/alt modifier, the only modifier encoded on the wire.
    pub alt: bool,
    pub col: i32,
    pub row: i32,
}

/// Largest cell coordinate representable by the single-byte encoding.
const DEFAULT_COORD_LIMIT: i32 = 0xff - 0x20;

/// Encode a pointer event, or decline.
///
/// `None` means the event is not reported under the active mode: off,
/// a release under X10, unreported motion, or a single-byte coordinate
/// overflow. Declining is documented behavior, never an error.
pub fn encode(event: &PointerEvent, mode: MouseMode, encoding: MouseEncoding) -> Option<Vec<u8>> {
    if mode == MouseMode::Off {
        return None;
    }

    let meta = if event.alt { 8 } else { 0 };
    let code = match event.kind {
        PointerKind::Press => {
            let btn = event.button.map_or(0, MouseButton::index);
            if mode == MouseMode::X10 && encoding == MouseEncoding::Default {
                if btn > 2 {
                    return None;
                }
                // X10 has no modifier bits
                btn
            } else {
                clamp_button(btn, encoding) | meta
            }
        }
        PointerKind::Release => {
            if mode == MouseMode::X10 {
                return None;
            }
            match encoding {
                // SGR releases identify the button; the terminator
                // carries the release.
                MouseEncoding::Sgr => event.button.map_or(3, MouseButton::index) | meta,
                _ => 3 | meta,
            }
        }
        PointerKind::Motion => {
            if !mode.reports_motion(event.button.is_some()) {
                return None;
            }
            let btn = event.button.map_or(3, MouseButton::index);
            (clamp_button(btn, encoding) | meta) | 32
        }
        PointerKind::Wheel { down } => 64 + u8::from(down),
    };

    let release = event.kind == PointerKind::Release;
    let col = event.col + 1;
    let row = event.row + 1;

    match encoding {
        MouseEncoding::Default => {
            if event.col >= DEFAULT_COORD_LIMIT || event.row >= DEFAULT_COORD_LIMIT {
                return None;
            }
            Some(vec![
                0x1b,
                b'[',
                b'M',
                code + 32,
                (col + 32) as u8,
                (row + 32) as u8,
            ])
        }
        MouseEncoding::Utf8 => {
            let mut buf = vec![0x1b, b'[', b'M', code + 32];
            push_utf8_coord(&mut buf, col + 32);
            push_utf8_coord(&mut buf, row + 32);
            Some(buf)
        }
        MouseEncoding::Sgr => {
            let mut buf = Vec::with_capacity(16);
            let suffix = if release { 'm' } else { 'M' };
            let _ = write!(buf, "\x1b[<{code};{col};{row}{suffix}");
            Some(buf)
        }
        MouseEncoding::Urxvt => {
            let mut buf = Vec::with_capacity(16);
            let _ = write!(buf, "\x1b[{};{col};{row}M", u16::from(code) + 32);
            Some(buf)
        }
    }
}

/// Extra buttons collapse to 0 everywhere except SGR, which can carry
/// them.
fn clamp_button(btn: u8, encoding: MouseEncoding) -> u8 {
    if btn > 2 && encoding != MouseEncoding::Sgr { 0 } else { btn }
}

/// One byte up to 127, then the two-byte UTF-8-style continuation form
/// (14-bit range).
fn push_utf8_coord(buf: &mut Vec<u8>, v: i32) {
    if v <= 127 {
        buf.push(v as u8);
    } else {
        buf.push(0xc0 | ((v >> 6) as u8));
        buf.push(0x80 | ((v & 0x3f) as u8));
    }
}
