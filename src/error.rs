//! Error types for the toolkit.

use crate::window::WindowId;
use std::fmt;
use std::io;

/// Result type alias for toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for toolkit operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error from terminal or store operations.
    Io(io::Error),
    /// Malformed style description.
    StyleSheet { token: String, reason: String },
    /// Malformed style marker inside styled text.
    Markup { offset: usize, reason: &'static str },
    /// Container item with bounds that can never be satisfied.
    InvalidItem {
        weight: u32,
        min_size: u32,
        max_size: u32,
    },
    /// Style name that was never registered in the style sheet.
    UnknownStyle(String),
    /// Item index past the end of a container.
    IndexOutOfRange { index: usize, len: usize },
    /// Window that is not an item of the container.
    NoSuchWindow(WindowId),
    /// The driver has no more input to deliver.
    Disconnected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::StyleSheet { token, reason } => {
                write!(f, "style sheet error at {token:?}: {reason}")
            }
            Self::Markup { offset, reason } => {
                write!(f, "styled text error at byte {offset}: {reason}")
            }
            Self::InvalidItem {
                weight,
                min_size,
                max_size,
            } => write!(
                f,
                "invalid item: weight={weight} min_size={min_size} max_size={max_size}"
            ),
            Self::UnknownStyle(name) => write!(f, "unknown style: {name}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "item index {index} out of range for {len} items")
            }
            Self::NoSuchWindow(id) => write!(f, "window {id} is not an item here"),
            Self::Disconnected => write!(f, "driver input ended"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
