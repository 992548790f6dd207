//! Terminal control: raw mode, screen modes and caret state.

mod raw;

pub use raw::{RawModeGuard, is_tty, read_available, terminal_size, wait_readable};

use crate::ansi::{self, sequences};
use crate::driver::CursorMode;
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;

/// Terminal state manager.
///
/// Tracks which screen modes are active so that [`cleanup`](Self::cleanup)
/// (also run on drop) undoes exactly what was done.
pub struct Terminal<W: Write> {
    writer: W,
    alt_screen: bool,
    cursor_visible: bool,
    cursor_mode: CursorMode,
    raw_mode_guard: Option<RawModeGuard>,
}

impl<W: Write> Terminal<W> {
    /// Create a new terminal with the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            alt_screen: false,
            cursor_visible: true,
            cursor_mode: CursorMode::Block,
            raw_mode_guard: None,
        }
    }

    /// Check if terminal is in raw mode.
    #[must_use]
    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode_guard.is_some()
    }

    /// Enter raw mode on the input side of the terminal.
    pub fn enter_raw_mode<F: AsRawFd>(&mut self, input: &F) -> io::Result<()> {
        if self.raw_mode_guard.is_none() {
            self.raw_mode_guard = Some(RawModeGuard::new(input)?);
        }
        Ok(())
    }

    /// Restore the terminal's original line discipline.
    pub fn exit_raw_mode(&mut self) {
        self.raw_mode_guard = None;
    }

    /// Enter alternate screen buffer.
    pub fn enter_alt_screen(&mut self) -> io::Result<()> {
        if !self.alt_screen {
            self.writer.write_all(sequences::ALT_SCREEN_ON.as_bytes())?;
            self.alt_screen = true;
        }
        Ok(())
    }

    /// Leave alternate screen buffer.
    pub fn leave_alt_screen(&mut self) -> io::Result<()> {
        if self.alt_screen {
            self.writer
                .write_all(sequences::ALT_SCREEN_OFF.as_bytes())?;
            self.alt_screen = false;
        }
        Ok(())
    }

    /// Show or hide the caret, setting its shape when shown.
    pub fn set_cursor_mode(&mut self, mode: CursorMode) -> io::Result<()> {
        let visible = mode != CursorMode::Hidden;
        if visible != self.cursor_visible {
            let seq = if visible {
                sequences::CURSOR_SHOW
            } else {
                sequences::CURSOR_HIDE
            };
            self.writer.write_all(seq.as_bytes())?;
            self.cursor_visible = visible;
        }
        if visible && mode != self.cursor_mode {
            let seq = match mode {
                CursorMode::Underline => sequences::cursor_style::UNDERLINE,
                CursorMode::Bar => sequences::cursor_style::BAR,
                CursorMode::Block | CursorMode::Hidden => sequences::cursor_style::BLOCK,
            };
            self.writer.write_all(seq.as_bytes())?;
            self.cursor_mode = mode;
        }
        Ok(())
    }

    /// Move cursor to (`row`, `col`), 0-indexed.
    pub fn move_cursor(&mut self, row: u32, col: u32) -> io::Result<()> {
        ansi::write_cursor_position(&mut self.writer, row, col)
    }

    /// Clear the screen.
    pub fn clear(&mut self) -> io::Result<()> {
        self.writer.write_all(sequences::CLEAR_SCREEN.as_bytes())?;
        self.writer.write_all(sequences::CURSOR_HOME.as_bytes())
    }

    /// Write raw bytes.
    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)
    }

    /// Flush the output.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Begin synchronized update (for flicker-free rendering).
    pub fn begin_sync(&mut self) -> io::Result<()> {
        self.writer.write_all(sequences::sync::BEGIN.as_bytes())
    }

    /// End synchronized update.
    pub fn end_sync(&mut self) -> io::Result<()> {
        self.writer.write_all(sequences::sync::END.as_bytes())
    }

    /// Cleanup terminal on exit.
    pub fn cleanup(&mut self) -> io::Result<()> {
        self.set_cursor_mode(CursorMode::Block)?;
        self.writer
            .write_all(sequences::cursor_style::DEFAULT.as_bytes())?;
        self.writer.write_all(sequences::RESET.as_bytes())?;
        self.leave_alt_screen()?;
        self.exit_raw_mode();
        self.flush()
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
