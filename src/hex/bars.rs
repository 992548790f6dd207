//! One-row title and status bars.

use crate::style::{StyleId, StyleSheet};
use crate::text::display_width;
use crate::window::{Window, WindowCore};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Source of the text shown at the right end of the title bar.
pub type Clock = Box<dyn Fn() -> String>;

/// Local wall-clock time, the default title bar clock.
#[must_use]
pub fn wall_clock() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Title with a spinner that turns on every tick and an optional clock,
/// right-aligned and dropped when it does not fit.
pub struct TitleBar {
    core: WindowCore,
    title: String,
    tick: usize,
    style: StyleId,
    clock: Option<Clock>,
}

impl TitleBar {
    pub fn new(title: impl Into<String>, sheet: &StyleSheet) -> Self {
        Self {
            core: WindowCore::new(),
            title: title.into(),
            tick: 0,
            style: sheet.id_or_default("normal_title"),
            clock: None,
        }
    }

    /// Show `clock` at the right end.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> String + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Replace or remove the clock and redraw.
    pub fn set_clock(&mut self, clock: Option<Clock>) {
        self.clock = clock;
        self.refresh_all();
    }

    fn text(&self) -> String {
        let spinner = SPINNER[self.tick % SPINNER.len()];
        let mut text = format!("[{spinner}] {}", self.title);
        let width = self.core.width() as usize;
        let mut clock = self.clock.as_ref().map(|clock| clock()).unwrap_or_default();
        if display_width(&text) + display_width(&clock) >= width {
            clock.clear();
        }
        let pad = width.saturating_sub(display_width(&text) + display_width(&clock));
        text.extend(std::iter::repeat_n(' ', pad));
        text.push_str(&clock);
        text
    }
}

impl Window for TitleBar {
    fn core(&self) -> &WindowCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WindowCore {
        &mut self.core
    }

    fn refresh_strip(&mut self, row: i32, col: i32, width: u32) {
        let text = self.text();
        self.core
            .write_clipped(row, 0, self.style, &text, col, width);
    }

    fn handle_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.refresh(0, 1, 1, 1);
        if self.clock.is_some() {
            // The clock lives in the right half
            let half = self.width() / 2;
            self.refresh(0, half as i32, 1, self.width() - half);
        }
    }
}

/// Single line of status text.
pub struct StatusLine {
    core: WindowCore,
    text: String,
    style: StyleId,
}

impl StatusLine {
    pub fn new(sheet: &StyleSheet) -> Self {
        Self {
            core: WindowCore::new(),
            text: String::new(),
            style: sheet.id_or_default("status"),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text, redrawing only if it changed.
    pub fn set_text(&mut self, text: String) {
        if text != self.text {
            self.text = text;
            self.refresh_all();
        }
    }
}

impl Window for StatusLine {
    fn core(&self) -> &WindowCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WindowCore {
        &mut self.core
    }

    fn refresh_strip(&mut self, row: i32, col: i32, width: u32) {
        let line = format!("{:<w$}", self.text, w = self.core.width() as usize);
        self.core
            .write_clipped(row, 0, self.style, &line, col, width);
    }
}
