//! Windows: rectangles that queue incremental draw updates.
//!
//! A window never paints to the terminal. It answers
//! [`refresh_strip`](Window::refresh_strip) requests by writing strips into
//! its [`WindowCore`], and whoever owns the window drains them with
//! [`fetch_updates`](Window::fetch_updates) exactly once per render cycle.
//!
//! # Examples
//!
//! ```
//! use ebfe_tui::style::StyleId;
//! use ebfe_tui::window::{Strip, Window, WindowCore};
//!
//! struct Label {
//!     core: WindowCore,
//!     text: String,
//! }
//!
//! impl Window for Label {
//!     fn core(&self) -> &WindowCore { &self.core }
//!     fn core_mut(&mut self) -> &mut WindowCore { &mut self.core }
//!
//!     fn refresh_strip(&mut self, row: i32, col: i32, width: u32) {
//!         let line = format!("{:<w$}", self.text, w = self.core.width() as usize);
//!         self.core.write_clipped(row, 0, StyleId::DEFAULT, &line, col, width);
//!     }
//! }
//!
//! let mut label = Label { core: WindowCore::new(), text: "hi".into() };
//! label.resize(4, 1);
//! let updates = label.fetch_updates();
//! assert_eq!(updates.row(0), &[Strip::new("hi  ", StyleId::DEFAULT, 0)]);
//! assert!(label.fetch_updates().is_empty());
//! ```

mod clip;
mod updates;

pub use clip::ColumnSpan;
pub use updates::{Strip, Updates};

use crate::driver::CursorMode;
use crate::error::Result;
use crate::input::KeyEvent;
use crate::style::StyleId;
use crate::text::{StyledText, char_width, display_width};
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a window, unique for the life of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of handling a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// The key meant nothing here; the caller may try something else.
    Ignored,
    /// The key was handled.
    Consumed,
    /// Leave the message loop with this exit code.
    Quit(i32),
}

/// Caret placement requested by a window, in its own coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub row: i32,
    pub col: i32,
    pub mode: CursorMode,
}

/// State shared by every window: size, flags and the pending update batch.
#[derive(Debug)]
pub struct WindowCore {
    id: WindowId,
    width: u32,
    height: u32,
    can_have_focus: bool,
    in_focus: bool,
    visible: bool,
    updates: Updates,
}

impl Default for WindowCore {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowCore {
    /// A zero-sized, visible, non-focusable window core.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: WindowId::next(),
            width: 0,
            height: 0,
            can_have_focus: false,
            in_focus: false,
            visible: true,
            updates: Updates::new(),
        }
    }

    /// A zero-sized core that can receive focus.
    #[must_use]
    pub fn focusable() -> Self {
        Self {
            can_have_focus: true,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn id(&self) -> WindowId {
        self.id
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn can_have_focus(&self) -> bool {
        self.can_have_focus
    }

    pub fn set_can_have_focus(&mut self, can_have_focus: bool) {
        self.can_have_focus = can_have_focus;
    }

    #[must_use]
    pub fn in_focus(&self) -> bool {
        self.in_focus
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Mark the window visible or hidden. Containers call this when an item
    /// is concealed or revealed.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_in_focus(&mut self, in_focus: bool) {
        self.in_focus = in_focus;
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Queue `text` at (`row`, `col`), clipped to the window width.
    pub fn write(&mut self, row: i32, col: i32, style: StyleId, text: &str) {
        self.write_clipped(row, col, style, text, 0, u32::MAX);
    }

    /// Queue `text` at (`row`, `col`), clipped to
    /// `[clip_col, clip_col + clip_width) ∩ [0, width)`.
    ///
    /// Rows outside the window and text that clips away entirely are
    /// dropped silently. A wide character cut by a clip edge is replaced by
    /// blanks over its visible columns.
    pub fn write_clipped(
        &mut self,
        row: i32,
        col: i32,
        style: StyleId,
        text: &str,
        clip_col: i32,
        clip_width: u32,
    ) {
        if row < 0 || i64::from(row) >= i64::from(self.height) {
            return;
        }
        let Some(span) =
            ColumnSpan::new(clip_col, clip_width).intersect(&ColumnSpan::new(0, self.width))
        else {
            return;
        };
        let start = i64::from(span.col);
        let end = i64::from(span.end());

        let mut out = String::new();
        let mut out_col: Option<i64> = None;
        let mut x = i64::from(col);
        for c in text.chars() {
            let w = char_width(c) as i64;
            let next = x + w;
            if x > end || (x == end && w > 0) {
                break;
            }
            if x >= start && next <= end {
                if w > 0 || out_col.is_some() {
                    out_col.get_or_insert(x);
                    out.push(c);
                }
            } else if w > 0 && next > start && x < end {
                let from = x.max(start);
                let to = next.min(end);
                out_col.get_or_insert(from);
                out.extend(std::iter::repeat_n(' ', (to - from) as usize));
            }
            x = next;
        }

        if let Some(strip_col) = out_col {
            if !out.is_empty() {
                self.updates
                    .push(row, Strip::new(out, style, strip_col as i32));
            }
        }
    }

    /// Queue styled text at (`row`, `col`), clipped to the window width.
    ///
    /// `style` applies until the text's first marker.
    pub fn put(&mut self, row: i32, col: i32, style: StyleId, text: &StyledText) {
        self.put_clipped(row, col, style, text, 0, u32::MAX);
    }

    /// Queue styled text, one [`write_clipped`](Self::write_clipped) per
    /// chunk, advancing the column by each chunk's display width.
    pub fn put_clipped(
        &mut self,
        row: i32,
        col: i32,
        style: StyleId,
        text: &StyledText,
        clip_col: i32,
        clip_width: u32,
    ) {
        let mut x = col;
        for chunk in text.chunks(style) {
            self.write_clipped(row, x, chunk.style, chunk.text, clip_col, clip_width);
            x = x.saturating_add(display_width(chunk.text) as i32);
        }
    }

    /// Merge a child's drained updates, shifted into this window's
    /// coordinates.
    pub fn integrate(&mut self, row_offset: i32, col_offset: i32, updates: Updates) {
        self.updates.integrate(row_offset, col_offset, updates);
    }

    /// Take the pending batch, leaving an empty one behind.
    pub fn fetch_updates(&mut self) -> Updates {
        std::mem::take(&mut self.updates)
    }

    /// True if strips are waiting to be drained.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        !self.updates.is_empty()
    }
}

/// Upcasting helper so concrete windows can be recovered from trait objects.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A node of the window tree.
///
/// Implementors provide storage ([`core`](Self::core)) and content
/// ([`refresh_strip`](Self::refresh_strip)); everything else has a default.
/// Containers override the focus-traversal methods.
pub trait Window: AsAny {
    fn core(&self) -> &WindowCore;
    fn core_mut(&mut self) -> &mut WindowCore;

    /// Emit content for `width` columns of `row`, starting at `col`.
    ///
    /// Must write exactly the requested range and must not block.
    fn refresh_strip(&mut self, row: i32, col: i32, width: u32);

    /// Called by [`resize`](Self::resize) when the new area is positive.
    fn on_resize(&mut self) {
        self.refresh_all();
    }

    /// Called when the window gains focus.
    fn on_focus_enter(&mut self) {}

    /// Called when the window loses focus.
    fn on_focus_leave(&mut self) {}

    /// Handle a key press.
    fn handle_key(&mut self, _key: &KeyEvent) -> Result<Response> {
        Ok(Response::Ignored)
    }

    /// Periodic tick, driven by the driver's idle timeout.
    fn handle_tick(&mut self) {}

    /// Caret request, in window coordinates.
    fn cursor(&self) -> Option<Cursor> {
        None
    }

    fn id(&self) -> WindowId {
        self.core().id()
    }

    fn width(&self) -> u32 {
        self.core().width()
    }

    fn height(&self) -> u32 {
        self.core().height()
    }

    /// Redraw a region, one [`refresh_strip`](Self::refresh_strip) per row.
    ///
    /// The region is clamped to the window.
    fn refresh(&mut self, start_row: i32, start_col: i32, height: u32, width: u32) {
        let rows = ColumnSpan::new(start_row, height)
            .intersect(&ColumnSpan::new(0, self.height()));
        let cols = ColumnSpan::new(start_col, width)
            .intersect(&ColumnSpan::new(0, self.width()));
        let (Some(rows), Some(cols)) = (rows, cols) else {
            return;
        };
        for row in rows.col..rows.end() {
            self.refresh_strip(row, cols.col, cols.width);
        }
    }

    /// Redraw the whole window.
    fn refresh_all(&mut self) {
        let (width, height) = (self.width(), self.height());
        self.refresh(0, 0, height, width);
    }

    /// Change the window size; a positive area triggers
    /// [`on_resize`](Self::on_resize), which by default redraws everything.
    fn resize(&mut self, width: u32, height: u32) {
        self.core_mut().set_size(width, height);
        if width > 0 && height > 0 {
            self.on_resize();
        }
    }

    /// Request focus (`true`) or drop it (`false`).
    ///
    /// Focus is only granted to capable, visible windows. Returns the
    /// resulting focus state.
    fn focus(&mut self, flag: bool) -> bool {
        let core = self.core();
        let target = flag && core.can_have_focus() && core.is_visible();
        if target == core.in_focus() {
            return target;
        }
        self.core_mut().set_in_focus(target);
        if target {
            self.on_focus_enter();
        } else {
            self.on_focus_leave();
        }
        target
    }

    /// Drain the pending update batch.
    fn fetch_updates(&mut self) -> Updates {
        self.core_mut().fetch_updates()
    }

    /// True if this window or a descendant could take focus right now.
    fn accepts_focus(&self) -> bool {
        self.core().can_have_focus() && self.core().is_visible()
    }

    /// True if this window is on the focus chain.
    fn has_focus(&self) -> bool {
        self.core().in_focus()
    }

    /// Drop focus from this window and everything under it.
    fn clear_focus(&mut self) {
        self.focus(false);
    }

    /// Advance focus depth-first.
    ///
    /// A leaf takes focus when it does not have it and gives it up (reporting
    /// exhaustion) when it does. Returns true if focus now rests inside.
    fn cycle_focus(&mut self, _in_depth: bool, _wrap_around: bool) -> bool {
        if self.has_focus() {
            self.focus(false);
            false
        } else {
            self.focus(true)
        }
    }

    /// Focus the window with id `target` if it is this window or below it.
    fn focus_to(&mut self, target: WindowId) -> bool {
        target == self.id() && self.focus(true)
    }

    /// True if `target` is this window or one of its descendants.
    fn contains(&self, target: WindowId) -> bool {
        target == self.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: StyleId = StyleId(3);

    struct Fill {
        core: WindowCore,
        ch: char,
        entered: u32,
        left: u32,
    }

    impl Fill {
        fn new(ch: char) -> Self {
            Self {
                core: WindowCore::focusable(),
                ch,
                entered: 0,
                left: 0,
            }
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
            let text: String = std::iter::repeat_n(self.ch, width as usize).collect();
            self.core.write(row, col, S, &text);
        }
        fn on_focus_enter(&mut self) {
            self.entered += 1;
        }
        fn on_focus_leave(&mut self) {
            self.left += 1;
        }
    }

    fn sized(width: u32, height: u32) -> WindowCore {
        let mut core = WindowCore::new();
        core.set_size(width, height);
        core
    }

    #[test]
    fn test_write_scenario_negative_col() {
        let mut core = sized(40, 1);
        core.write_clipped(0, -2, S, "HELLO", 0, 40);
        // Characters keep their columns: H and E fall left of column 0 and
        // only they are cut. See "Clipping example" in DESIGN.md.
        assert_eq!(core.fetch_updates().row(0), &[Strip::new("LLO", S, 0)]);
    }

    #[test]
    fn test_write_clips_right_edge() {
        let mut core = sized(5, 1);
        core.write(0, 3, S, "abcdef");
        assert_eq!(core.fetch_updates().row(0), &[Strip::new("ab", S, 3)]);
    }

    #[test]
    fn test_write_clip_window() {
        let mut core = sized(20, 1);
        core.write_clipped(0, 0, S, "0123456789", 4, 3);
        assert_eq!(core.fetch_updates().row(0), &[Strip::new("456", S, 4)]);
    }

    #[test]
    fn test_write_outside_rows_dropped() {
        let mut core = sized(10, 2);
        core.write(-1, 0, S, "x");
        core.write(2, 0, S, "x");
        assert!(core.fetch_updates().is_empty());
    }

    #[test]
    fn test_write_fully_clipped_dropped() {
        let mut core = sized(10, 1);
        core.write(0, 10, S, "x");
        core.write(0, -3, S, "ab");
        core.write(0, 0, S, "");
        assert!(!core.has_updates());
    }

    #[test]
    fn test_write_zero_size_window() {
        let mut core = sized(0, 0);
        core.write(0, 0, S, "x");
        assert!(!core.has_updates());
    }

    #[test]
    fn test_wide_char_cut_by_clip_edge() {
        let mut core = sized(10, 1);
        core.write_clipped(0, 0, S, "漢字x", 1, 3);
        // 漢 covers 0..2 (cut), 字 covers 2..4 (kept), x at 4 is outside
        assert_eq!(core.fetch_updates().row(0), &[Strip::new(" 字", S, 1)]);

        core.write_clipped(0, 0, S, "a漢", 0, 2);
        assert_eq!(core.fetch_updates().row(0), &[Strip::new("a ", S, 0)]);
    }

    #[test]
    fn test_put_advances_by_chunk_width() {
        let mut core = sized(10, 1);
        let text = StyledText::new().with(StyleId(1), "ab").with(StyleId(2), "cd");
        core.put(0, 1, S, &text);
        assert_eq!(
            core.fetch_updates().row(0),
            &[Strip::new("ab", StyleId(1), 1), Strip::new("cd", StyleId(2), 3)]
        );
    }

    #[test]
    fn test_put_initial_style() {
        let mut core = sized(10, 1);
        let text = StyledText::parse("xy\x0e1\x0fz").unwrap();
        core.put_clipped(0, 0, S, &text, 1, 2);
        assert_eq!(
            core.fetch_updates().row(0),
            &[Strip::new("y", S, 1), Strip::new("z", StyleId(1), 2)]
        );
    }

    #[test]
    fn test_fetch_updates_drains_once() {
        let mut fill = Fill::new('#');
        fill.resize(3, 2);
        let first = fill.fetch_updates();
        assert_eq!(first.len(), 2);
        assert!(fill.fetch_updates().is_empty());
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut fill = Fill::new('#');
        fill.resize(4, 3);
        let _ = fill.fetch_updates();
        fill.refresh_all();
        let a = fill.fetch_updates();
        fill.refresh_all();
        let b = fill.fetch_updates();
        assert_eq!(a, b);
        assert_eq!(a.row(2), &[Strip::new("####", S, 0)]);
    }

    #[test]
    fn test_refresh_region_is_clamped() {
        let mut fill = Fill::new('#');
        fill.resize(4, 3);
        let _ = fill.fetch_updates();
        fill.refresh(-1, 2, 3, 10);
        let updates = fill.fetch_updates();
        let rows: Vec<i32> = updates.rows().map(|(r, _)| r).collect();
        assert_eq!(rows, vec![0, 1]);
        assert_eq!(updates.row(0), &[Strip::new("##", S, 2)]);
    }

    #[test]
    fn test_zero_area_resize_draws_nothing() {
        let mut fill = Fill::new('#');
        fill.resize(5, 0);
        assert_eq!(fill.width(), 5);
        assert!(fill.fetch_updates().is_empty());
    }

    #[test]
    fn test_focus_transitions_fire_hooks() {
        let mut fill = Fill::new('#');
        assert!(fill.focus(true));
        assert!(fill.focus(true));
        assert_eq!(fill.entered, 1);
        assert!(!fill.focus(false));
        assert_eq!(fill.left, 1);
    }

    #[test]
    fn test_focus_requires_capability_and_visibility() {
        let mut fill = Fill::new('#');
        fill.core_mut().set_visible(false);
        assert!(!fill.focus(true));

        fill.core_mut().set_visible(true);
        fill.core_mut().set_can_have_focus(false);
        assert!(!fill.focus(true));
        assert_eq!(fill.entered, 0);
    }

    #[test]
    fn test_leaf_cycle_focus_toggles() {
        let mut fill = Fill::new('#');
        assert!(fill.cycle_focus(true, true));
        assert!(fill.has_focus());
        assert!(!fill.cycle_focus(true, true));
        assert!(!fill.has_focus());
    }

    #[test]
    fn test_window_ids_are_unique() {
        let a = WindowCore::new();
        let b = WindowCore::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_downcast_through_trait_object() {
        let boxed: Box<dyn Window> = Box::new(Fill::new('x'));
        assert_eq!(boxed.as_ref().as_any().downcast_ref::<Fill>().map(|f| f.ch), Some('x'));
    }
}
