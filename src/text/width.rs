//! Display width of characters and strings in terminal columns.

use unicode_width::UnicodeWidthChar;

/// Width of a character in terminal columns.
///
/// Control characters are zero-width; everything else follows the Unicode
/// East Asian Width tables with ambiguous characters counted as narrow.
#[inline]
#[must_use]
pub fn char_width(c: char) -> usize {
    // ASCII printable fast path
    if (' '..='~').contains(&c) {
        return 1;
    }
    if c < ' ' || c == '\x7f' {
        return 0;
    }
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Width of a string in terminal columns.
///
/// Always equals the sum of [`char_width`] over the string's characters, so
/// clipping and measuring agree on every input.
#[must_use]
pub fn display_width(s: &str) -> usize {
    if s.bytes().all(|b| (0x20..0x7f).contains(&b)) {
        return s.len();
    }
    s.chars().map(char_width).sum()
}
