//! Driver for ANSI/xterm-style terminals.
//!
//! Output is accumulated into one frame buffer between
//! [`prepare_render`](Driver::prepare_render) and
//! [`finish_render`](Driver::finish_render) and written with a single
//! `write_all`, wrapped in a synchronized-update bracket.

use super::{CursorMode, Driver, Message};
use crate::ansi::{self, sequences};
use crate::error::{Error, Result};
use crate::input::{DecodeError, KeyDecoder};
use crate::style::{Attributes, RenderStyle, StyleCaps};
use crate::terminal::{Terminal, is_tty, read_available, terminal_size, wait_readable};
use std::io::{self, Stdin, Stdout, Write};
use std::os::unix::io::AsRawFd;
use std::time::Duration;

/// Options for [`AnsiDriver`].
#[derive(Clone, Copy, Debug)]
pub struct AnsiOptions {
    /// Draw on the alternate screen and restore the primary one on exit.
    pub use_alt_screen: bool,
    /// Hide the caret until a window asks for it.
    pub hide_cursor: bool,
    /// Compare the window size on every idle period and report changes.
    pub poll_resize: bool,
    /// Idle period after which a [`Message::Timeout`] is delivered.
    pub tick: Duration,
    /// Fixed screen size; `None` asks the terminal.
    pub size: Option<(u32, u32)>,
    /// Size used when the terminal cannot report one.
    pub fallback_size: (u32, u32),
    /// Colors advertised for foreground and background.
    pub colors: u16,
}

impl Default for AnsiOptions {
    fn default() -> Self {
        Self {
            use_alt_screen: true,
            hide_cursor: true,
            poll_resize: true,
            tick: Duration::from_millis(100),
            size: None,
            fallback_size: (80, 24),
            colors: 256,
        }
    }
}

/// Raw-mode terminal driver.
///
/// Reads keys from `input` and writes frames to `writer`. Raw mode is only
/// entered when `input` is a tty, so pipes work for scripted runs.
pub struct AnsiDriver<W: Write, R: AsRawFd = Stdin> {
    terminal: Terminal<W>,
    input: R,
    options: AnsiOptions,
    decoder: KeyDecoder,
    pending: Vec<u8>,
    size: (u32, u32),
    frame: Vec<u8>,
}

impl AnsiDriver<Stdout, Stdin> {
    /// Driver on the process's stdin and stdout.
    pub fn stdio(options: AnsiOptions) -> Result<Self> {
        Self::new(io::stdout(), io::stdin(), options)
    }
}

impl<W: Write, R: AsRawFd> AnsiDriver<W, R> {
    /// Set up the terminal: raw mode, alternate screen, hidden caret, clear.
    pub fn new(writer: W, input: R, options: AnsiOptions) -> Result<Self> {
        let mut terminal = Terminal::new(writer);
        if is_tty(&input) {
            terminal.enter_raw_mode(&input)?;
        }
        if options.use_alt_screen {
            terminal.enter_alt_screen()?;
        }
        if options.hide_cursor {
            terminal.set_cursor_mode(CursorMode::Hidden)?;
        }
        terminal.clear()?;
        terminal.flush()?;

        let mut driver = Self {
            terminal,
            input,
            options,
            decoder: KeyDecoder::new(),
            pending: Vec::new(),
            size: options.fallback_size,
            frame: Vec::with_capacity(8192),
        };
        driver.size = driver.query_size();
        Ok(driver)
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &AnsiOptions {
        &self.options
    }

    fn query_size(&self) -> (u32, u32) {
        self.options.size.unwrap_or_else(|| {
            terminal_size(&io::stdout()).unwrap_or(self.options.fallback_size)
        })
    }

    /// Decode one key from the pending bytes, dropping garbage.
    fn decode_pending(&mut self) -> Option<Message> {
        loop {
            match self.decoder.decode(&self.pending) {
                Ok((key, used)) => {
                    self.pending.drain(..used);
                    return Some(Message::Key(key));
                }
                Err(DecodeError::Unrecognized(bytes)) => {
                    let skip = bytes.len().clamp(1, self.pending.len());
                    self.pending.drain(..skip);
                }
                Err(DecodeError::InvalidUtf8) => {
                    self.pending.drain(..1);
                }
                Err(DecodeError::Empty | DecodeError::Incomplete) => return None,
            }
        }
    }

    /// What an idle period means: a stale Escape prefix, a resize, or a
    /// tick.
    fn idle_message(&mut self) -> Message {
        if let Some((key, used)) = self.decoder.flush_escape(&self.pending) {
            self.pending.drain(..used);
            return Message::Key(key);
        }
        // A UTF-8 character cut short never completes
        self.pending.clear();
        if self.options.poll_resize {
            let size = self.query_size();
            if size != self.size {
                self.size = size;
                return Message::Resize {
                    width: size.0,
                    height: size.1,
                };
            }
        }
        Message::Timeout
    }
}

impl<W: Write, R: AsRawFd> Driver for AnsiDriver<W, R> {
    type Style = String;

    fn screen_size(&mut self) -> Result<(u32, u32)> {
        self.size = self.query_size();
        Ok(self.size)
    }

    fn style_caps(&self) -> StyleCaps {
        StyleCaps {
            attrs: Attributes::all(),
            fg_count: self.options.colors,
            bg_count: self.options.colors,
            fg_default: 7,
            bg_default: 0,
        }
    }

    fn build_style(&mut self, style: &RenderStyle) -> String {
        ansi::style_sequence(style)
    }

    fn next_message(&mut self) -> Result<Message> {
        let mut buf = [0u8; 256];
        loop {
            if let Some(message) = self.decode_pending() {
                return Ok(message);
            }
            if !wait_readable(&self.input, self.options.tick)? {
                return Ok(self.idle_message());
            }
            let n = read_available(&self.input, &mut buf)?;
            if n == 0 {
                return Err(Error::Disconnected);
            }
            self.pending.extend_from_slice(&buf[..n]);
        }
    }

    fn prepare_render(&mut self) -> Result<()> {
        self.frame.clear();
        self.frame.extend_from_slice(sequences::sync::BEGIN.as_bytes());
        Ok(())
    }

    fn render_text(&mut self, text: &str, style: &String, col: i32, row: i32) {
        let (Ok(row), Ok(col)) = (u32::try_from(row), u32::try_from(col)) else {
            return;
        };
        // Writing into a Vec cannot fail
        let _ = ansi::write_cursor_position(&mut self.frame, row, col);
        self.frame.extend_from_slice(style.as_bytes());
        self.frame.extend_from_slice(text.as_bytes());
    }

    fn finish_render(&mut self) -> Result<()> {
        self.frame.extend_from_slice(sequences::RESET.as_bytes());
        self.frame.extend_from_slice(sequences::sync::END.as_bytes());
        self.terminal.write_all(&self.frame)?;
        self.terminal.flush()?;
        Ok(())
    }

    fn set_cursor(&mut self, mode: CursorMode, row: u32, col: u32) -> Result<()> {
        if mode != CursorMode::Hidden {
            self.terminal.move_cursor(row, col)?;
        }
        self.terminal.set_cursor_mode(mode)?;
        self.terminal.flush()?;
        Ok(())
    }
}
