//! Decoding raw terminal bytes into key events.
//!
//! Handles plain and UTF-8 characters, C0 control keys, `ESC`-prefixed Alt
//! keys, and the CSI/SS3 sequences xterm-style terminals send for cursor,
//! editing and function keys (with the `1;N` modifier parameter).

// One match arm per terminal sequence reads better than merged arms
#![allow(clippy::match_same_arms)]

use crate::input::keyboard::{KeyCode, KeyEvent, KeyModifiers};

/// Error type for key decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Input buffer is empty.
    Empty,
    /// Incomplete escape sequence (need more bytes).
    Incomplete,
    /// Unrecognized escape sequence; the bytes should be skipped.
    Unrecognized(Vec<u8>),
    /// Invalid UTF-8 in input; skip one byte.
    InvalidUtf8,
}

/// Result of decoding: the key and the number of bytes consumed.
pub type DecodeResult = Result<(KeyEvent, usize), DecodeError>;

/// Stateless decoder for terminal key input.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyDecoder;

impl KeyDecoder {
    /// Create a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decode one key from the front of `input`.
    ///
    /// Call repeatedly, advancing past the consumed bytes, until
    /// `Err(DecodeError::Empty)` or `Err(DecodeError::Incomplete)`.
    pub fn decode(&self, input: &[u8]) -> DecodeResult {
        let Some(&first) = input.first() else {
            return Err(DecodeError::Empty);
        };

        match first {
            0x1b => self.decode_escape(input),
            0x00 => Ok((KeyEvent::key(KeyCode::Null), 1)),
            b'\t' => Ok((KeyEvent::key(KeyCode::Tab), 1)),
            b'\r' | b'\n' => Ok((KeyEvent::key(KeyCode::Enter), 1)),
            0x08 | 0x7f => Ok((KeyEvent::key(KeyCode::Backspace), 1)),
            0x01..=0x1a => {
                // Ctrl+A through Ctrl+Z
                let c = (first - 1 + b'a') as char;
                Ok((KeyEvent::with_ctrl(KeyCode::Char(c)), 1))
            }
            0x20..=0x7e => Ok((KeyEvent::char(first as char), 1)),
            0x80..=0xff => self.decode_utf8(input),
            _ => Err(DecodeError::Unrecognized(vec![first])),
        }
    }

    /// Resolve an incomplete `ESC`-prefixed input once no more bytes arrive.
    ///
    /// Terminals send a bare `ESC` for the Escape key, which is also the
    /// prefix of every sequence; the caller resolves it on read timeout. A
    /// stale `ESC` followed by a printable byte (`ESC [`, `ESC O`) is that
    /// byte with Alt, and anything else leaves a lone Escape. Returns `None`
    /// unless `input` starts with `ESC` and decodes as incomplete.
    #[must_use]
    pub fn flush_escape(&self, input: &[u8]) -> Option<(KeyEvent, usize)> {
        if input.first() != Some(&0x1b)
            || !matches!(self.decode(input), Err(DecodeError::Incomplete))
        {
            return None;
        }
        match input.get(1) {
            Some(&next @ 0x20..=0x7e) => Some((
                KeyEvent::new(KeyCode::Char(next as char), KeyModifiers::ALT),
                2,
            )),
            _ => Some((KeyEvent::key(KeyCode::Esc), 1)),
        }
    }

    fn decode_escape(&self, input: &[u8]) -> DecodeResult {
        let Some(&second) = input.get(1) else {
            return Err(DecodeError::Incomplete);
        };

        match second {
            b'[' => self.decode_csi(input),
            b'O' => self.decode_ss3(input),
            0x1b => Ok((KeyEvent::key(KeyCode::Esc), 1)),
            0x20..=0x7e => Ok((
                KeyEvent::new(KeyCode::Char(second as char), KeyModifiers::ALT),
                2,
            )),
            _ => Ok((KeyEvent::key(KeyCode::Esc), 1)),
        }
    }

    fn decode_csi(&self, input: &[u8]) -> DecodeResult {
        // Final byte is in 0x40..=0x7e
        let Some(end) = input
            .iter()
            .skip(2)
            .position(|b| (0x40..=0x7e).contains(b))
            .map(|i| i + 2)
        else {
            return Err(DecodeError::Incomplete);
        };

        let params = &input[2..end];
        let consumed = end + 1;
        let code = match input[end] {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'Z' => KeyCode::BackTab,
            b'~' => return self.decode_tilde(params, &input[..consumed]),
            // A bare `ESC [` followed by a key is Alt-[ typed before it
            _ if end == 2 && !(b'@'..=b'Z').contains(&input[end]) => {
                return Ok((KeyEvent::new(KeyCode::Char('['), KeyModifiers::ALT), 2));
            }
            _ => return Err(DecodeError::Unrecognized(input[..consumed].to_vec())),
        };
        Ok((KeyEvent::new(code, modifiers(params)), consumed))
    }

    fn decode_tilde(&self, params: &[u8], seq: &[u8]) -> DecodeResult {
        let num: u8 = std::str::from_utf8(params)
            .ok()
            .and_then(|s| s.split(';').next())
            .and_then(|p| p.parse().ok())
            .unwrap_or(0);

        let code = match num {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            11..=15 => KeyCode::F(num - 10),
            17..=21 => KeyCode::F(num - 11),
            23..=26 => KeyCode::F(num - 12),
            28 | 29 => KeyCode::F(num - 13),
            31..=34 => KeyCode::F(num - 14),
            _ => return Err(DecodeError::Unrecognized(seq.to_vec())),
        };
        Ok((KeyEvent::new(code, modifiers(params)), seq.len()))
    }

    fn decode_ss3(&self, input: &[u8]) -> DecodeResult {
        let Some(&key) = input.get(2) else {
            return Err(DecodeError::Incomplete);
        };

        let code = match key {
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'R' => KeyCode::F(3),
            b'S' => KeyCode::F(4),
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'M' => KeyCode::Enter,
            _ => return Err(DecodeError::Unrecognized(input[..3].to_vec())),
        };
        Ok((KeyEvent::key(code), 3))
    }

    fn decode_utf8(&self, input: &[u8]) -> DecodeResult {
        let first = input[0];
        let expected_len = if first & 0b1110_0000 == 0b1100_0000 {
            2
        } else if first & 0b1111_0000 == 0b1110_0000 {
            3
        } else if first & 0b1111_1000 == 0b1111_0000 {
            4
        } else {
            return Err(DecodeError::InvalidUtf8);
        };

        let available = &input[1..expected_len.min(input.len())];
        if available.iter().any(|b| !(0x80..=0xbf).contains(b)) {
            return Err(DecodeError::InvalidUtf8);
        }
        if input.len() < expected_len {
            return Err(DecodeError::Incomplete);
        }

        let s =
            std::str::from_utf8(&input[..expected_len]).map_err(|_| DecodeError::InvalidUtf8)?;
        let c = s.chars().next().ok_or(DecodeError::InvalidUtf8)?;
        Ok((KeyEvent::char(c), expected_len))
    }
}

/// Modifiers from CSI parameters of the form `1;N`, where
/// `N = 1 + shift + 2*alt + 4*ctrl`.
fn modifiers(params: &[u8]) -> KeyModifiers {
    let Some(n) = std::str::from_utf8(params)
        .ok()
        .and_then(|s| s.split(';').nth(1))
        .and_then(|p| p.parse::<u8>().ok())
    else {
        return KeyModifiers::empty();
    };
    let n = n.saturating_sub(1);
    let mut mods = KeyModifiers::empty();
    if n & 1 != 0 {
        mods |= KeyModifiers::SHIFT;
    }
    if n & 2 != 0 {
        mods |= KeyModifiers::ALT;
    }
    if n & 4 != 0 {
        mods |= KeyModifiers::CTRL;
    }
    mods
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(input: &[u8]) -> (KeyEvent, usize) {
        KeyDecoder::new().decode(input).unwrap()
    }

    #[test]
    fn test_decode_char() {
        assert_eq!(key(b"q"), (KeyEvent::char('q'), 1));
    }

    #[test]
    fn test_decode_control_keys() {
        assert_eq!(key(&[0x06]).0, KeyEvent::with_ctrl(KeyCode::Char('f')));
        assert_eq!(key(&[0x02]).0, KeyEvent::with_ctrl(KeyCode::Char('b')));
        assert_eq!(key(b"\t").0.code, KeyCode::Tab);
        assert_eq!(key(b"\r").0.code, KeyCode::Enter);
        assert_eq!(key(&[0x7f]).0.code, KeyCode::Backspace);
    }

    #[test]
    fn test_lone_escape_is_incomplete() {
        let decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(b"\x1b"), Err(DecodeError::Incomplete));
        assert_eq!(
            decoder.flush_escape(b"\x1b"),
            Some((KeyEvent::key(KeyCode::Esc), 1))
        );
        assert_eq!(decoder.flush_escape(b"q"), None);
        assert_eq!(decoder.flush_escape(b"\x1b[A"), None);
    }

    #[test]
    fn test_stale_escape_prefix_flushes_as_alt() {
        let decoder = KeyDecoder::new();
        let alt = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT);
        assert_eq!(decoder.decode(b"\x1b["), Err(DecodeError::Incomplete));
        assert_eq!(decoder.flush_escape(b"\x1b["), Some((alt('['), 2)));
        assert_eq!(decoder.flush_escape(b"\x1bO"), Some((alt('O'), 2)));
        assert_eq!(
            decoder.flush_escape(b"\x1b[1;"),
            Some((alt('['), 2))
        );
    }

    #[test]
    fn test_alt_bracket_keeps_following_key() {
        let decoder = KeyDecoder::new();
        let (event, consumed) = key(b"\x1b[j");
        assert_eq!(consumed, 2);
        assert_eq!(event, KeyEvent::new(KeyCode::Char('['), KeyModifiers::ALT));
        assert_eq!(decoder.decode(b"j"), Ok((KeyEvent::char('j'), 1)));
        // Sequences with parameters are still skipped whole
        assert_eq!(
            decoder.decode(b"\x1b[2j"),
            Err(DecodeError::Unrecognized(b"\x1b[2j".to_vec()))
        );
    }

    #[test]
    fn test_decode_arrows_and_modifiers() {
        assert_eq!(key(b"\x1b[A"), (KeyEvent::key(KeyCode::Up), 3));
        let (event, consumed) = key(b"\x1b[1;5B");
        assert_eq!(consumed, 6);
        assert_eq!(event, KeyEvent::with_ctrl(KeyCode::Down));
        assert_eq!(key(b"\x1bOA").0.code, KeyCode::Up);
    }

    #[test]
    fn test_decode_tilde_keys() {
        assert_eq!(key(b"\x1b[5~").0.code, KeyCode::PageUp);
        assert_eq!(key(b"\x1b[6~").0.code, KeyCode::PageDown);
        assert_eq!(key(b"\x1b[3~").0.code, KeyCode::Delete);
        assert_eq!(key(b"\x1b[15~").0.code, KeyCode::F(5));
        assert_eq!(key(b"\x1b[24~").0.code, KeyCode::F(12));
    }

    #[test]
    fn test_decode_alt_key() {
        let (event, consumed) = key(b"\x1bx");
        assert_eq!(consumed, 2);
        assert!(event.alt());
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(key("日".as_bytes()), (KeyEvent::char('日'), 3));
        assert_eq!(
            KeyDecoder::new().decode(&"日".as_bytes()[..2]),
            Err(DecodeError::Incomplete)
        );
    }

    #[test]
    fn test_broken_utf8_is_rejected_early() {
        let decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(&[0xe4, b'q']), Err(DecodeError::InvalidUtf8));
        assert_eq!(
            decoder.decode(&[0xf0, b'q', b'j']),
            Err(DecodeError::InvalidUtf8)
        );
        assert_eq!(decoder.decode(&[0xf0, 0x9f, b'j']), Err(DecodeError::InvalidUtf8));
        assert_eq!(decoder.decode(&[0xf0, 0x9f]), Err(DecodeError::Incomplete));
    }

    #[test]
    fn test_unrecognized_sequence_reports_bytes() {
        assert_eq!(
            KeyDecoder::new().decode(b"\x1b[99~rest"),
            Err(DecodeError::Unrecognized(b"\x1b[99~".to_vec()))
        );
        assert_eq!(
            KeyDecoder::new().decode(b"\x1b[<0;1;1M"),
            Err(DecodeError::Unrecognized(b"\x1b[<0;1;1M".to_vec()))
        );
    }

    #[test]
    fn test_sequence_of_keys() {
        let decoder = KeyDecoder::new();
        let mut input: &[u8] = b"j\x1b[6~k";
        let mut keys = Vec::new();
        while let Ok((event, consumed)) = decoder.decode(input) {
            keys.push(event.code);
            input = &input[consumed..];
        }
        assert_eq!(keys, [KeyCode::Char('j'), KeyCode::PageDown, KeyCode::Char('k')]);
    }
}
