//! `ebfe_tui` - retained-mode windowing for character-cell terminals
//!
//! A small UI toolkit: windows queue incremental draw updates ("strips"),
//! containers lay children out along one axis by weight and bounds, focus
//! moves depth-first through the tree, and an [`Application`] pumps
//! messages from a pluggable [`Driver`]. The [`hex`] module builds the
//! `ebfe` hex editor on top of it.
//!
//! [`Application`]: app::Application
//! [`Driver`]: driver::Driver

// Crate-level lint configuration
#![warn(unsafe_code)] // Unsafe code needs justification (required for termios FFI)
#![allow(clippy::cast_possible_truncation)] // Intentional coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_possible_wrap)] // Intentional coordinate conversions
#![allow(clippy::module_name_repetitions)] // Allow window::WindowCore etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::format_push_string)] // format! with push_str is fine
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod ansi;
pub mod app;
pub mod container;
pub mod driver;
pub mod error;
pub mod hex;
pub mod input;
pub mod log;
pub mod style;
pub mod terminal;
pub mod text;
pub mod window;

// Re-export core types at crate root
pub use app::Application;
pub use container::{Axis, Container, ItemOptions};
pub use driver::{CursorMode, Driver, Message};
pub use error::{Error, Result};
pub use log::{LogLevel, LogSink};
pub use style::{Attributes, RenderStyle, StyleCaps, StyleId, StyleSheet};
pub use text::StyledText;
pub use window::{Response, Strip, Updates, Window, WindowCore, WindowId};

// Re-export input types
pub use input::{KeyCode, KeyEvent, KeyModifiers};

// Re-export terminal types
pub use terminal::{RawModeGuard, Terminal, is_tty, terminal_size};
