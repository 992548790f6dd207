//! Keyboard input.
//!
//! Key event types shared by every driver, and the byte decoder the ANSI
//! driver uses to turn terminal input into keys.

mod decoder;
mod keyboard;

pub use decoder::{DecodeError, DecodeResult, KeyDecoder};
pub use keyboard::{KeyCode, KeyEvent, KeyModifiers};
