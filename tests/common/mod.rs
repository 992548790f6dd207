//! Shared windows and helpers for integration tests.

#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry
#![allow(dead_code)]

use ebfe_tui::driver::{Driver, HeadlessDriver};
use ebfe_tui::style::{RenderStyle, StyleId};
use ebfe_tui::window::{Strip, Updates, Window, WindowCore};

/// Leaf that fills its area with one character.
pub struct Fill {
    pub core: WindowCore,
    pub ch: char,
    pub style: StyleId,
}

impl Fill {
    pub fn new(ch: char) -> Self {
        Self {
            core: WindowCore::new(),
            ch,
            style: StyleId::DEFAULT,
        }
    }

    pub fn focusable(ch: char) -> Self {
        Self {
            core: WindowCore::focusable(),
            ..Self::new(ch)
        }
    }

    pub fn boxed(self) -> Box<dyn Window> {
        Box::new(self)
    }
}

impl Window for Fill {
    fn core(&self) -> &WindowCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WindowCore {
        &mut self.core
    }

    fn refresh_strip(&mut self, row: i32, col: i32, width: u32) {
        let ch = if self.core.in_focus() {
            self.ch.to_ascii_uppercase()
        } else {
            self.ch
        };
        let text: String = std::iter::repeat_n(ch, width as usize).collect();
        self.core.write(row, col, self.style, &text);
    }

    fn on_focus_enter(&mut self) {
        self.refresh_all();
    }

    fn on_focus_leave(&mut self) {
        self.refresh_all();
    }
}

/// Paint a batch onto a fresh headless screen and return its text.
pub fn paint(updates: &Updates, width: u32, height: u32) -> String {
    let mut driver = HeadlessDriver::new(width, height);
    driver
        .render(updates, &[RenderStyle::default()])
        .expect("headless render cannot fail");
    driver.screen_text()
}

/// Every strip of a batch, row by row.
pub fn strips(updates: &Updates) -> Vec<(i32, Strip)> {
    updates
        .strips()
        .map(|(row, strip)| (row, strip.clone()))
        .collect()
}
