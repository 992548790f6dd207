//! Styled text: plain strings with inline style-switch markers.
//!
//! A marker is [`STYLE_BEGIN`], the decimal [`StyleId`] index, then
//! [`STYLE_END`]. Everything else is literal text drawn in the most recently
//! selected style:
//!
//! ```text
//! "\x0e2\x0fOFFSET\x0e0\x0f 00 01 02"
//! ```
//!
//! A raw string is validated once by [`StyledText::parse`]; after that,
//! decoding cannot fail.

use super::width::{char_width, display_width};
use crate::error::{Error, Result};
use crate::style::StyleId;
use std::fmt::Write as _;

/// Opens a style marker (ASCII shift-out).
pub const STYLE_BEGIN: char = '\x0e';
/// Closes a style marker (ASCII shift-in).
pub const STYLE_END: char = '\x0f';

/// A run of literal text drawn in one style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Style in effect for this run.
    pub style: StyleId,
    /// Literal text, never empty.
    pub text: &'a str,
    /// Byte offset of `text` inside the raw string.
    pub offset: usize,
}

/// Validated styled text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyledText {
    raw: String,
}

impl StyledText {
    /// Empty styled text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a raw marker-encoded string.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        validate(&raw)?;
        Ok(Self { raw })
    }

    /// Styled text holding `text` as a literal.
    ///
    /// Marker characters inside `text` are removed.
    #[must_use]
    pub fn plain(text: &str) -> Self {
        let mut out = Self::new();
        out.push_str(text);
        out
    }

    /// Switch to `style` for the text that follows.
    pub fn switch(&mut self, style: StyleId) -> &mut Self {
        self.raw.push(STYLE_BEGIN);
        let _ = write!(self.raw, "{}", style.0);
        self.raw.push(STYLE_END);
        self
    }

    /// Append literal text in the current style.
    ///
    /// Marker characters inside `text` are removed.
    pub fn push_str(&mut self, text: &str) -> &mut Self {
        self.raw
            .extend(text.chars().filter(|&c| c != STYLE_BEGIN && c != STYLE_END));
        self
    }

    /// Append literal text in `style`.
    pub fn push(&mut self, style: StyleId, text: &str) -> &mut Self {
        self.switch(style).push_str(text)
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, style: StyleId, text: &str) -> Self {
        self.push(style, text);
        self
    }

    /// The raw, marker-encoded string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if there is no raw content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Decode into chunks, starting in `initial` until the first marker.
    ///
    /// The iterator borrows the text and can be recreated at will.
    #[must_use]
    pub fn chunks(&self, initial: StyleId) -> Chunks<'_> {
        Chunks {
            raw: &self.raw,
            pos: 0,
            style: initial,
        }
    }

    /// Display width of the literal text, ignoring markers.
    #[must_use]
    pub fn width(&self) -> usize {
        self.chunks(StyleId::DEFAULT)
            .map(|chunk| display_width(chunk.text))
            .sum()
    }

    /// Map a display column to a raw byte index.
    ///
    /// Returns the index of the first literal character starting at or past
    /// `column` together with the column it starts on, or `(None, width)` if
    /// the text ends first.
    #[must_use]
    pub fn index_for_column(&self, column: usize) -> (Option<usize>, usize) {
        let mut reached = 0;
        for chunk in self.chunks(StyleId::DEFAULT) {
            for (i, c) in chunk.text.char_indices() {
                if reached >= column {
                    return (Some(chunk.offset + i), reached);
                }
                reached += char_width(c);
            }
        }
        (None, reached)
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

/// Iterator over the chunks of a [`StyledText`].
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    raw: &'a str,
    pos: usize,
    style: StyleId,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = &self.raw[self.pos..];
            if rest.is_empty() {
                return None;
            }
            if let Some(marker) = rest.strip_prefix(STYLE_BEGIN) {
                let end = marker.find(STYLE_END)?;
                if let Ok(index) = marker[..end].parse::<u16>() {
                    self.style = StyleId(index);
                }
                self.pos += STYLE_BEGIN.len_utf8() + end + STYLE_END.len_utf8();
                continue;
            }
            let len = rest.find(STYLE_BEGIN).unwrap_or(rest.len());
            let chunk = Chunk {
                style: self.style,
                text: &rest[..len],
                offset: self.pos,
            };
            self.pos += len;
            return Some(chunk);
        }
    }
}

fn validate(raw: &str) -> Result<()> {
    let mut pos = 0;
    while pos < raw.len() {
        let rest = &raw[pos..];
        let Some(next) = rest.find([STYLE_BEGIN, STYLE_END]) else {
            return Ok(());
        };
        let at = pos + next;
        if raw[at..].starts_with(STYLE_END) {
            return Err(Error::Markup {
                offset: at,
                reason: "style end marker without a begin marker",
            });
        }
        let body_start = at + STYLE_BEGIN.len_utf8();
        let Some(len) = raw[body_start..].find(STYLE_END) else {
            return Err(Error::Markup {
                offset: at,
                reason: "unterminated style marker",
            });
        };
        let body = &raw[body_start..body_start + len];
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Markup {
                offset: at,
                reason: "style marker must hold a decimal style index",
            });
        }
        if body.parse::<u16>().is_err() {
            return Err(Error::Markup {
                offset: at,
                reason: "style index out of range",
            });
        }
        pos = body_start + len + STYLE_END.len_utf8();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: StyleId = StyleId(1);
    const B: StyleId = StyleId(2);

    fn collect(text: &StyledText, initial: StyleId) -> Vec<(StyleId, &str)> {
        text.chunks(initial).map(|c| (c.style, c.text)).collect()
    }

    #[test]
    fn test_plain_text_single_chunk() {
        let text = StyledText::plain("hello");
        assert_eq!(collect(&text, A), vec![(A, "hello")]);
        assert_eq!(text.width(), 5);
    }

    #[test]
    fn test_markers_switch_style() {
        let text = StyledText::new().with(A, "ab").with(B, "cd");
        assert_eq!(text.as_str(), "\x0e1\x0fab\x0e2\x0fcd");
        assert_eq!(collect(&text, StyleId::DEFAULT), vec![(A, "ab"), (B, "cd")]);
        assert_eq!(text.width(), 4);
    }

    #[test]
    fn test_initial_style_before_first_marker() {
        let text = StyledText::parse("xy\x0e2\x0fz").unwrap();
        assert_eq!(collect(&text, A), vec![(A, "xy"), (B, "z")]);
    }

    #[test]
    fn test_no_empty_chunks() {
        let text = StyledText::parse("\x0e1\x0f\x0e2\x0f\x0e1\x0f").unwrap();
        assert!(text.chunks(StyleId::DEFAULT).next().is_none());
        assert_eq!(text.width(), 0);
    }

    #[test]
    fn test_chunks_restartable() {
        let text = StyledText::new().with(A, "one").with(B, "two");
        let first = collect(&text, StyleId::DEFAULT);
        let second = collect(&text, StyleId::DEFAULT);
        assert_eq!(first, second);
    }

    #[test]
    fn test_chunk_offsets_point_into_raw() {
        let text = StyledText::new().with(A, "ab").with(B, "cd");
        for chunk in text.chunks(StyleId::DEFAULT) {
            assert_eq!(&text.as_str()[chunk.offset..chunk.offset + chunk.text.len()], chunk.text);
        }
    }

    #[test]
    fn test_parse_errors() {
        let err = StyledText::parse("ab\x0e1").unwrap_err();
        assert!(matches!(err, Error::Markup { offset: 2, .. }));

        assert!(StyledText::parse("\x0f").is_err());
        assert!(StyledText::parse("\x0e\x0f").is_err());
        assert!(StyledText::parse("\x0ex1\x0f").is_err());
        assert!(StyledText::parse("\x0e99999\x0f").is_err());
        assert!(StyledText::parse("\x0e1\x0f ok \x0f").is_err());
    }

    #[test]
    fn test_plain_strips_markers() {
        let text = StyledText::plain("a\x0eb\x0fc");
        assert_eq!(text.as_str(), "abc");
    }

    #[test]
    fn test_index_for_column() {
        let text = StyledText::new().with(A, "ab").with(B, "cd");
        // "\x0e1\x0f" is 3 bytes
        assert_eq!(text.index_for_column(0), (Some(3), 0));
        assert_eq!(text.index_for_column(1), (Some(4), 1));
        assert_eq!(text.index_for_column(2), (Some(8), 2));
        assert_eq!(text.index_for_column(4), (None, 4));
        assert_eq!(text.index_for_column(10), (None, 4));
    }

    #[test]
    fn test_index_for_column_wide_chars() {
        let text = StyledText::plain("漢x");
        assert_eq!(text.index_for_column(1), (Some(3), 2));
        assert_eq!(text.width(), 3);
    }
}
