//! The hex editor built on the toolkit.
//!
//! [`Editor`] is the root window: a vertical container holding a
//! [`TitleBar`], one [`StreamView`] per opened URI and a [`StatusLine`].

mod bars;
mod store;
mod view;

pub use bars::{Clock, StatusLine, TitleBar, wall_clock};
pub use store::{Block, ByteStore, MemoryStore};
pub use view::{BYTES_PER_LINE, StreamView, offset_label};

use crate::container::{Container, ItemOptions};
use crate::error::Result;
use crate::input::KeyEvent;
use crate::style::StyleSheet;
use crate::window::{Cursor, Response, Updates, Window, WindowCore, WindowId};

/// Title shown in the title bar.
pub const TITLE: &str = "ebfe - Exuberant Binary File Editor";

/// URI opened when none is given.
pub const DEFAULT_URI: &str = "mem://0";

/// Style sheet used unless the user supplies one.
pub const DEFAULT_STYLES: &str = "\
normal_title     attr=bold fg=red bg=white
hex_offset       fg=cyan
hex_offset_focus attr=bold|reverse fg=cyan
hex_pending      fg=yellow
hex_absent       attr=dim fg=blue
status           attr=reverse
";

/// Root window of the editor.
pub struct Editor {
    layout: Container,
    status: usize,
}

impl Editor {
    /// Lay out `streams` between a title bar and a status line and focus the
    /// first stream.
    pub fn new(streams: Vec<StreamView>, sheet: &StyleSheet) -> Result<Self> {
        let mut layout = Container::vertical();
        layout.add(Box::new(TitleBar::new(TITLE, sheet)), ItemOptions::new().fixed(1))?;
        for stream in streams {
            layout.add(Box::new(stream), ItemOptions::new())?;
        }
        let status = layout.add(Box::new(StatusLine::new(sheet)), ItemOptions::new().fixed(1))?;
        layout.cycle_focus(true, false);

        let mut editor = Self { layout, status };
        editor.update_status();
        Ok(editor)
    }

    /// Open every URI (or [`DEFAULT_URI`]) into a stream view.
    ///
    /// The first half of each store is resident up front; the rest trickles
    /// in one row per tick.
    pub fn open(uris: &[String], sheet: &StyleSheet) -> Result<Self> {
        let default = [DEFAULT_URI.to_string()];
        let uris = if uris.is_empty() { &default[..] } else { uris };

        let mut streams = Vec::with_capacity(uris.len());
        for uri in uris {
            let mut store = MemoryStore::from_uri(uri)?.with_trickle(BYTES_PER_LINE);
            store.load(0, store.size() / 2);
            streams.push(StreamView::new(store, uri.clone(), sheet));
        }
        Self::new(streams, sheet)
    }

    /// The underlying layout.
    #[must_use]
    pub fn layout(&self) -> &Container {
        &self.layout
    }

    /// Stream view on the focus chain.
    #[must_use]
    pub fn active_stream(&self) -> Option<&StreamView> {
        self.layout
            .focused_window()
            .and_then(|window| window.as_any().downcast_ref())
    }

    /// Current status line text.
    #[must_use]
    pub fn status(&self) -> &str {
        self.layout
            .window_as::<StatusLine>(self.status)
            .map_or("", StatusLine::text)
    }

    /// Show `clock` at the right end of the title bar, or hide it.
    pub fn set_clock(&mut self, clock: Option<Clock>) {
        self.layout
            .with_window::<TitleBar, _>(0, |title| title.set_clock(clock));
    }

    fn update_status(&mut self) {
        let text = self
            .active_stream()
            .map(|s| format!(" {}  {}", s.uri(), offset_label(s.offset())))
            .unwrap_or_default();
        self.layout
            .with_window::<StatusLine, _>(self.status, |status| status.set_text(text));
    }
}

impl Window for Editor {
    fn core(&self) -> &WindowCore {
        self.layout.core()
    }

    fn core_mut(&mut self) -> &mut WindowCore {
        self.layout.core_mut()
    }

    fn refresh_strip(&mut self, row: i32, col: i32, width: u32) {
        self.layout.refresh_strip(row, col, width);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.layout.resize(width, height);
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<Response> {
        let response = match self.layout.handle_key(key)? {
            Response::Ignored if key.is_char('q') || key.is_char('Q') || key.is_esc() => {
                Response::Quit(0)
            }
            response => response,
        };
        self.update_status();
        Ok(response)
    }

    fn handle_tick(&mut self) {
        self.layout.handle_tick();
    }

    fn cursor(&self) -> Option<Cursor> {
        self.layout.cursor()
    }

    fn fetch_updates(&mut self) -> Updates {
        self.layout.fetch_updates()
    }

    fn focus(&mut self, flag: bool) -> bool {
        self.layout.focus(flag)
    }

    fn accepts_focus(&self) -> bool {
        self.layout.accepts_focus()
    }

    fn has_focus(&self) -> bool {
        self.layout.has_focus()
    }

    fn clear_focus(&mut self) {
        self.layout.clear_focus();
    }

    fn cycle_focus(&mut self, in_depth: bool, wrap_around: bool) -> bool {
        let moved = self.layout.cycle_focus(in_depth, wrap_around);
        self.update_status();
        moved
    }

    fn focus_to(&mut self, target: WindowId) -> bool {
        let moved = self.layout.focus_to(target);
        self.update_status();
        moved
    }

    fn contains(&self, target: WindowId) -> bool {
        self.layout.contains(target)
    }
}
