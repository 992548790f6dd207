//! In-memory driver for tests and non-interactive runs.

use super::{CursorMode, Driver, Message};
use crate::error::{Error, Result};
use crate::input::KeyEvent;
use crate::style::{RenderStyle, StyleCaps};
use crate::text::char_width;
use std::collections::VecDeque;

/// One captured screen cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeadlessCell {
    pub ch: char,
    pub style: RenderStyle,
}

impl Default for HeadlessCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: RenderStyle::default(),
        }
    }
}

/// Driver that replays scripted messages and captures rendered cells.
///
/// Once the script runs out, [`next_message`](Driver::next_message) fails
/// with [`Error::Disconnected`], which ends the application loop.
#[derive(Clone, Debug)]
pub struct HeadlessDriver {
    width: u32,
    height: u32,
    caps: StyleCaps,
    script: VecDeque<Message>,
    cells: Vec<HeadlessCell>,
    frames: usize,
    cursor: (CursorMode, u32, u32),
}

impl HeadlessDriver {
    /// Create a driver with a blank `width` x `height` screen.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            caps: StyleCaps::default(),
            script: VecDeque::new(),
            cells: vec![HeadlessCell::default(); (width as usize) * (height as usize)],
            frames: 0,
            cursor: (CursorMode::Hidden, 0, 0),
        }
    }

    /// Report `caps` instead of the 8-color default.
    #[must_use]
    pub fn with_caps(mut self, caps: StyleCaps) -> Self {
        self.caps = caps;
        self
    }

    /// Queue a message. A queued resize takes effect on the grid when it is
    /// delivered.
    pub fn push(&mut self, message: Message) -> &mut Self {
        self.script.push_back(message);
        self
    }

    /// Queue one key message per event.
    pub fn push_keys<I>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<KeyEvent>,
    {
        self.script
            .extend(keys.into_iter().map(|k| Message::Key(k.into())));
        self
    }

    /// Messages not yet delivered.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.script.len()
    }

    /// Number of completed frames.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Last caret request.
    #[must_use]
    pub fn cursor(&self) -> (CursorMode, u32, u32) {
        self.cursor
    }

    /// Captured cell, if inside the screen.
    #[must_use]
    pub fn cell(&self, row: u32, col: u32) -> Option<&HeadlessCell> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get((row as usize) * (self.width as usize) + col as usize)
    }

    /// One screen row as text.
    #[must_use]
    pub fn row_text(&self, row: u32) -> String {
        (0..self.width)
            .filter_map(|col| self.cell(row, col))
            .map(|cell| cell.ch)
            .filter(|&ch| ch != '\0')
            .collect()
    }

    /// The whole screen as text, one line per row.
    #[must_use]
    pub fn screen_text(&self) -> String {
        (0..self.height)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn resize_grid(&mut self, width: u32, height: u32) {
        let mut cells = vec![HeadlessCell::default(); (width as usize) * (height as usize)];
        for row in 0..height.min(self.height) {
            for col in 0..width.min(self.width) {
                if let Some(&cell) = self.cell(row, col) {
                    cells[(row as usize) * (width as usize) + col as usize] = cell;
                }
            }
        }
        self.cells = cells;
        self.width = width;
        self.height = height;
    }
}

impl Driver for HeadlessDriver {
    type Style = RenderStyle;

    fn screen_size(&mut self) -> Result<(u32, u32)> {
        Ok((self.width, self.height))
    }

    fn style_caps(&self) -> StyleCaps {
        self.caps
    }

    fn build_style(&mut self, style: &RenderStyle) -> RenderStyle {
        *style
    }

    fn next_message(&mut self) -> Result<Message> {
        let message = self.script.pop_front().ok_or(Error::Disconnected)?;
        if let Message::Resize { width, height } = message {
            self.resize_grid(width, height);
        }
        Ok(message)
    }

    fn prepare_render(&mut self) -> Result<()> {
        Ok(())
    }

    fn render_text(&mut self, text: &str, style: &RenderStyle, col: i32, row: i32) {
        let (Ok(row), Ok(mut col)) = (u32::try_from(row), u32::try_from(col)) else {
            return;
        };
        if row >= self.height {
            return;
        }
        let stride = self.width as usize;
        for ch in text.chars() {
            let width = char_width(ch) as u32;
            if width == 0 {
                continue;
            }
            if col + width > self.width {
                break;
            }
            let base = (row as usize) * stride + col as usize;
            self.cells[base] = HeadlessCell { ch, style: *style };
            // Continuation cells of a wide character hold NUL
            for extra in 1..width as usize {
                self.cells[base + extra] = HeadlessCell {
                    ch: '\0',
                    style: *style,
                };
            }
            col += width;
        }
    }

    fn finish_render(&mut self) -> Result<()> {
        self.frames += 1;
        Ok(())
    }

    fn set_cursor(&mut self, mode: CursorMode, row: u32, col: u32) -> Result<()> {
        self.cursor = (mode, row, col);
        Ok(())
    }
}
