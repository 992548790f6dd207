//! Fuzz target for the key decoder.
//!
//! Feeds escape-heavy byte streams through the decode loop the ANSI driver
//! runs and checks that it always makes progress.

#![no_main]

use arbitrary::Arbitrary;
use ebfe_tui::input::{DecodeError, KeyDecoder};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Chunk {
    /// ESC followed by arbitrary bytes.
    Escape(Vec<u8>),
    /// ESC [ <params> <final>
    Csi { params: Vec<u8>, final_byte: u8 },
    /// ESC O <final>
    Ss3(u8),
    /// Raw bytes.
    Raw(Vec<u8>),
}

impl Chunk {
    fn extend_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::Escape(bytes) => {
                out.push(0x1b);
                out.extend(bytes.iter().take(16));
            }
            Self::Csi { params, final_byte } => {
                out.extend_from_slice(b"\x1b[");
                out.extend(params.iter().take(16));
                out.push(*final_byte);
            }
            Self::Ss3(final_byte) => out.extend_from_slice(&[0x1b, b'O', *final_byte]),
            Self::Raw(bytes) => out.extend(bytes.iter().take(64)),
        }
    }
}

fuzz_target!(|chunks: Vec<Chunk>| {
    let mut input = Vec::new();
    for chunk in chunks.iter().take(32) {
        chunk.extend_into(&mut input);
    }

    let decoder = KeyDecoder::new();
    let mut pos = 0;
    while pos < input.len() {
        let rest = &input[pos..];
        let consumed = match decoder.decode(rest) {
            Ok((_, n)) => n,
            Err(DecodeError::Unrecognized(bytes)) => bytes.len().max(1),
            Err(DecodeError::InvalidUtf8) => 1,
            Err(DecodeError::Incomplete) => match decoder.flush_escape(rest) {
                Some((_, n)) => n,
                None => break,
            },
            Err(DecodeError::Empty) => break,
        };
        assert!(consumed > 0, "decoder stalled at {pos}");
        assert!(consumed <= rest.len(), "decoder overran input at {pos}");
        pos += consumed;
    }
});
