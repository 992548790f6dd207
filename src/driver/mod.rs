//! Terminal I/O adapters.
//!
//! The toolkit core never touches a terminal. Everything it needs from one
//! goes through [`Driver`]: the screen size, the style capabilities, a
//! blocking message source, and a sink for rendered strips.
//!
//! Two drivers ship with the crate:
//!
//! - [`AnsiDriver`]: raw-mode tty with SGR styling.
//! - [`HeadlessDriver`]: scripted messages and an in-memory cell grid, for
//!   tests and non-interactive runs.

mod ansi;
mod headless;

pub use ansi::{AnsiDriver, AnsiOptions};
pub use headless::{HeadlessCell, HeadlessDriver};

use crate::error::Result;
use crate::input::KeyEvent;
use crate::style::{RenderStyle, StyleCaps};
use crate::window::Updates;

/// Caret shape requested from the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorMode {
    #[default]
    Hidden,
    Block,
    Underline,
    Bar,
}

/// One unit of driver input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    /// The screen changed size.
    Resize { width: u32, height: u32 },
    /// A key was pressed.
    Key(KeyEvent),
    /// Nothing happened for one idle period.
    Timeout,
}

/// Contract between the application loop and a terminal backend.
pub trait Driver {
    /// Driver-specific precomputed form of a [`RenderStyle`].
    type Style;

    /// Current screen size as `(width, height)`.
    fn screen_size(&mut self) -> Result<(u32, u32)>;

    /// What the driver can render.
    fn style_caps(&self) -> StyleCaps;

    /// Precompute a negotiated style.
    fn build_style(&mut self, style: &RenderStyle) -> Self::Style;

    /// Block until the next message. Idle periods produce
    /// [`Message::Timeout`] at a steady cadence.
    fn next_message(&mut self) -> Result<Message>;

    /// Start a frame.
    fn prepare_render(&mut self) -> Result<()>;

    /// Draw one strip. Failures for individual cells are swallowed.
    fn render_text(&mut self, text: &str, style: &Self::Style, col: i32, row: i32);

    /// Finish a frame. Flush failures propagate.
    fn finish_render(&mut self) -> Result<()>;

    /// Render a whole update batch, one [`render_text`](Self::render_text)
    /// per strip. Strips whose style has no entry in `styles` use the first
    /// one.
    fn render(&mut self, updates: &Updates, styles: &[Self::Style]) -> Result<()> {
        self.prepare_render()?;
        for (row, strip) in updates.strips() {
            let Some(style) = styles.get(strip.style.index()).or_else(|| styles.first()) else {
                continue;
            };
            self.render_text(&strip.text, style, strip.col, row);
        }
        self.finish_render()
    }

    /// Place and shape the caret. Drivers without caret control ignore it.
    fn set_cursor(&mut self, _mode: CursorMode, _row: u32, _col: u32) -> Result<()> {
        Ok(())
    }
}
