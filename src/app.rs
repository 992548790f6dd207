//! The application: a root window, its style sheet and the message loop.
//!
//! ```
//! use ebfe_tui::app::Application;
//! use ebfe_tui::container::Container;
//! use ebfe_tui::driver::HeadlessDriver;
//! use ebfe_tui::error::Error;
//! use ebfe_tui::style::StyleSheet;
//! use ebfe_tui::window::Window;
//!
//! let mut app = Application::new(Container::vertical(), StyleSheet::new());
//! let mut driver = HeadlessDriver::new(10, 3);
//! // An exhausted script ends the loop.
//! assert!(matches!(app.run(&mut driver), Err(Error::Disconnected)));
//! assert_eq!(app.root().height(), 3);
//! ```

use crate::driver::{CursorMode, Driver, Message};
use crate::error::Result;
use crate::input::{KeyCode, KeyEvent};
use crate::log::{LogLevel, LogSink};
use crate::style::{RenderStyle, StyleCaps, StyleSheet};
use crate::window::{Response, Window};

/// Root window plus everything needed to drive it from a [`Driver`].
pub struct Application<W: Window> {
    root: W,
    styles: StyleSheet,
    log: Option<Box<dyn LogSink>>,
    screen: (u32, u32),
    cursor: Option<(CursorMode, u32, u32)>,
}

impl<W: Window> Application<W> {
    /// Wrap `root`. Styles referenced by the window tree must come from
    /// `styles`.
    pub fn new(root: W, styles: StyleSheet) -> Self {
        Self {
            root,
            styles,
            log: None,
            screen: (0, 0),
            cursor: None,
        }
    }

    /// Install a log sink.
    #[must_use]
    pub fn with_log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.log = Some(Box::new(sink));
        self
    }

    #[must_use]
    pub fn root(&self) -> &W {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut W {
        &mut self.root
    }

    #[must_use]
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Negotiate the style sheet against a driver's capabilities, one
    /// render style per [`StyleId`](crate::style::StyleId).
    #[must_use]
    pub fn generate_style_map(&self, caps: &StyleCaps) -> Vec<RenderStyle> {
        self.styles.negotiate(caps)
    }

    /// Run the message loop until a window answers a key with
    /// [`Response::Quit`].
    ///
    /// Driver errors end the loop with `Err`, including
    /// [`Error::Disconnected`](crate::error::Error::Disconnected) once input
    /// runs out.
    pub fn run<D: Driver>(&mut self, driver: &mut D) -> Result<i32> {
        let caps = driver.style_caps();
        let styles: Vec<D::Style> = self
            .generate_style_map(&caps)
            .iter()
            .map(|style| driver.build_style(style))
            .collect();
        self.log(LogLevel::Debug, || {
            format!("negotiated {} styles against {caps:?}", styles.len())
        });

        let (width, height) = driver.screen_size()?;
        self.handle_resize(width, height);

        loop {
            let updates = self.root.fetch_updates();
            if !updates.is_empty() {
                driver.render(&updates, &styles)?;
            }
            self.update_cursor(driver)?;

            let message = driver.next_message()?;
            if let Some(code) = self.dispatch(message)? {
                self.log(LogLevel::Info, || format!("quit with code {code}"));
                return Ok(code);
            }
        }
    }

    /// Route one message to its handler. Returns the exit code when the
    /// loop should end.
    pub fn dispatch(&mut self, message: Message) -> Result<Option<i32>> {
        match message {
            Message::Resize { width, height } => {
                self.handle_resize(width, height);
                Ok(None)
            }
            Message::Key(key) => self.handle_key(&key),
            Message::Timeout => {
                self.handle_timeout();
                Ok(None)
            }
        }
    }

    /// Resize the root to the screen.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.log(LogLevel::Debug, || format!("resize to {width}x{height}"));
        self.screen = (width, height);
        self.root.resize(width, height);
    }

    /// Offer a key to the root; an ignored `Tab` moves focus to the next
    /// leaf.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<Option<i32>> {
        self.log(LogLevel::Debug, || format!("key {}", key.name()));
        match self.root.handle_key(key)? {
            Response::Quit(code) => Ok(Some(code)),
            Response::Consumed => Ok(None),
            Response::Ignored => {
                if key.code == KeyCode::Tab && key.modifiers.is_empty() {
                    let moved = self.root.cycle_focus(true, true);
                    self.log(LogLevel::Debug, || format!("focus cycled: {moved}"));
                }
                Ok(None)
            }
        }
    }

    /// Forward the periodic tick through the window tree.
    pub fn handle_timeout(&mut self) {
        self.root.handle_tick();
    }

    fn update_cursor<D: Driver>(&mut self, driver: &mut D) -> Result<()> {
        let (width, height) = self.screen;
        let wanted = self
            .root
            .cursor()
            .and_then(|cursor| {
                let row = u32::try_from(cursor.row).ok().filter(|&r| r < height)?;
                let col = u32::try_from(cursor.col).ok().filter(|&c| c < width)?;
                Some((cursor.mode, row, col))
            })
            .unwrap_or((CursorMode::Hidden, 0, 0));
        if self.cursor != Some(wanted) {
            driver.set_cursor(wanted.0, wanted.1, wanted.2)?;
            self.cursor = Some(wanted);
        }
        Ok(())
    }

    fn log(&self, level: LogLevel, message: impl FnOnce() -> String) {
        if let Some(sink) = &self.log {
            sink.log(level, &message());
        }
    }
}
