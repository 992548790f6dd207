//! ANSI escape sequence generation.

pub mod sequences;

pub use sequences::*;

use crate::style::{Attributes, RenderStyle};
use std::io::{self, Write};

fn write_u32_decimal(w: &mut impl Write, n: u32) -> io::Result<()> {
    // Fast paths for common small values (most cursor positions)
    if n < 10 {
        return w.write_all(&[b'0' + n as u8]);
    }
    if n < 100 {
        return w.write_all(&[b'0' + (n / 10) as u8, b'0' + (n % 10) as u8]);
    }

    let mut buf = [0u8; 10]; // max u32 is 4294967295 (10 digits)
    let mut i = buf.len();
    let mut val = n;
    while val > 0 {
        i -= 1;
        buf[i] = b'0' + (val % 10) as u8;
        val /= 10;
    }
    w.write_all(&buf[i..])
}

/// Write one color parameter: `base + n` for the 8 basic colors,
/// `base + 60 + n` for the bright ones, `base + 8;5;n` beyond.
fn write_color(w: &mut impl Write, base: u32, color: u16) -> io::Result<()> {
    let color = u32::from(color);
    match color {
        0..=7 => write_u32_decimal(w, base + color),
        8..=15 => write_u32_decimal(w, base + 60 + color - 8),
        _ => {
            write_u32_decimal(w, base + 8)?;
            w.write_all(b";5;")?;
            write_u32_decimal(w, color)
        }
    }
}

/// Write the absolute SGR sequence for a negotiated style.
///
/// The sequence starts with a reset, so it does not depend on whatever
/// style was active before it.
pub fn write_style(w: &mut impl Write, style: &RenderStyle) -> io::Result<()> {
    const CODES: [(Attributes, &[u8]); 6] = [
        (Attributes::BOLD, b";1"),
        (Attributes::DIM, b";2"),
        (Attributes::ITALIC, b";3"),
        (Attributes::UNDERLINE, b";4"),
        (Attributes::BLINK, b";5"),
        (Attributes::INVERSE, b";7"),
    ];

    w.write_all(b"\x1b[0")?;
    for (attr, code) in CODES {
        if style.attrs.contains(attr) {
            w.write_all(code)?;
        }
    }
    w.write_all(b";")?;
    write_color(w, 30, style.fg)?;
    w.write_all(b";")?;
    write_color(w, 40, style.bg)?;
    w.write_all(b"m")
}

/// SGR sequence for a negotiated style, as a string.
#[must_use]
pub fn style_sequence(style: &RenderStyle) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_style(&mut buf, style);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write cursor position sequence (0-indexed in, 1-indexed on the wire).
pub fn write_cursor_position(w: &mut impl Write, row: u32, col: u32) -> io::Result<()> {
    w.write_all(b"\x1b[")?;
    write_u32_decimal(w, row.saturating_add(1))?;
    w.write_all(b";")?;
    write_u32_decimal(w, col.saturating_add(1))?;
    w.write_all(b"H")
}
