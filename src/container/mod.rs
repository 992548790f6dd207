//! Containers: windows that arrange child windows along one axis.
//!
//! A [`Container`] owns its children. Every call it forwards to a child
//! (resize, refresh, keys, ticks, focus changes) is followed by draining the
//! child's updates into the container's own batch, shifted by the child's
//! position, so a single [`fetch_updates`](Window::fetch_updates) on the root
//! collects the whole tree.
//!
//! # Examples
//!
//! ```
//! use ebfe_tui::container::{Container, ItemOptions};
//! use ebfe_tui::window::Window;
//! # use ebfe_tui::style::StyleId;
//! # use ebfe_tui::window::WindowCore;
//! # struct Blank(WindowCore);
//! # impl Window for Blank {
//! #     fn core(&self) -> &WindowCore { &self.0 }
//! #     fn core_mut(&mut self) -> &mut WindowCore { &mut self.0 }
//! #     fn refresh_strip(&mut self, _: i32, _: i32, _: u32) {}
//! # }
//!
//! let mut column = Container::vertical();
//! column.add(Box::new(Blank(WindowCore::new())), ItemOptions::new().min(1).max(1)).unwrap();
//! column.add(Box::new(Blank(WindowCore::new())), ItemOptions::new()).unwrap();
//! column.resize(80, 24);
//!
//! assert_eq!(column.placement(0).map(|p| p.size), Some(1));
//! assert_eq!(column.placement(1).map(|p| p.size), Some(23));
//! ```

mod focus;
mod layout;

pub use layout::{Constraint, Placement, layout};

use crate::error::{Error, Result};
use crate::input::KeyEvent;
use crate::style::StyleId;
use crate::window::{ColumnSpan, Cursor, Response, Window, WindowCore, WindowId};

/// Main axis of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Items side by side; sizes are widths.
    Horizontal,
    /// Items stacked; sizes are heights.
    Vertical,
}

/// Options for [`Container::add`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ItemOptions {
    index: Option<usize>,
    constraint: Constraint,
}

impl ItemOptions {
    /// Append, weight 1, no bounds, visible.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at `index` instead of appending.
    #[must_use]
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn weight(mut self, weight: u32) -> Self {
        self.constraint.weight = weight;
        self
    }

    #[must_use]
    pub fn min(mut self, min_size: u32) -> Self {
        self.constraint.min_size = min_size;
        self
    }

    #[must_use]
    pub fn max(mut self, max_size: u32) -> Self {
        self.constraint.max_size = max_size;
        self
    }

    /// Fixed size: `min == max == size`.
    #[must_use]
    pub fn fixed(self, size: u32) -> Self {
        self.min(size).max(size)
    }

    #[must_use]
    pub fn concealed(mut self, concealed: bool) -> Self {
        self.constraint.concealed = concealed;
        self
    }
}

struct Item {
    window: Box<dyn Window>,
    constraint: Constraint,
    placement: Placement,
}

/// A window arranging ordered child items along one axis.
pub struct Container {
    core: WindowCore,
    axis: Axis,
    items: Vec<Item>,
    focus: Option<usize>,
    fill: char,
    fill_style: StyleId,
}

impl Container {
    /// Create an empty container.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            core: WindowCore::new(),
            axis,
            items: Vec::new(),
            focus: None,
            fill: ' ',
            fill_style: StyleId::DEFAULT,
        }
    }

    #[must_use]
    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    #[must_use]
    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    /// Character and style for space no item covers. The character must be
    /// one column wide.
    #[must_use]
    pub fn with_fill(mut self, fill: char, style: StyleId) -> Self {
        self.fill = fill;
        self.fill_style = style;
        self
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of items, concealed ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a window as a new item and return its index.
    ///
    /// Inserting at or before the focused item shifts the focus index so it
    /// keeps pointing at the same window.
    pub fn add(&mut self, mut window: Box<dyn Window>, options: ItemOptions) -> Result<usize> {
        let constraint = options.constraint;
        if constraint.weight == 0 || constraint.min_size > constraint.max_size {
            return Err(Error::InvalidItem {
                weight: constraint.weight,
                min_size: constraint.min_size,
                max_size: constraint.max_size,
            });
        }
        let len = self.items.len();
        let index = options.index.unwrap_or(len);
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        if let Some(f) = self.focus {
            if index <= f {
                self.focus = Some(f + 1);
            }
        }
        window.core_mut().set_visible(!constraint.concealed);
        if window.has_focus() {
            if constraint.concealed || self.focus.is_some() {
                window.clear_focus();
            } else {
                self.focus = Some(index);
            }
        }

        self.items.insert(
            index,
            Item {
                window,
                constraint,
                placement: Placement::default(),
            },
        );
        if !constraint.concealed {
            self.relayout();
        }
        Ok(index)
    }

    /// Remove the item at `index` and hand its window back, unfocused.
    pub fn remove_at(&mut self, index: usize) -> Result<Box<dyn Window>> {
        let len = self.items.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let mut item = self.items.remove(index);
        match self.focus {
            Some(f) if f == index => self.focus = None,
            Some(f) if f > index => self.focus = Some(f - 1),
            _ => {}
        }
        item.window.clear_focus();
        let _ = item.window.fetch_updates();
        self.relayout();
        Ok(item.window)
    }

    /// Conceal or reveal the item holding `window`.
    ///
    /// With `toggle`, `visible` is ignored and the current state flips.
    /// Concealing the focused item moves focus on first. Returns the new
    /// visibility.
    pub fn set_item_visibility(
        &mut self,
        window: WindowId,
        visible: bool,
        toggle: bool,
    ) -> Result<bool> {
        let index = self.index_of(window).ok_or(Error::NoSuchWindow(window))?;
        let visible = if toggle {
            self.items[index].constraint.concealed
        } else {
            visible
        };
        if self.items[index].constraint.concealed == !visible {
            return Ok(visible);
        }

        self.items[index].constraint.concealed = !visible;
        if !visible && self.focus == Some(index) {
            self.cycle(false, true);
        }
        self.items[index].window.core_mut().set_visible(visible);
        self.relayout();
        Ok(visible)
    }

    /// Computed placement of an item.
    #[must_use]
    pub fn placement(&self, index: usize) -> Option<Placement> {
        self.items.get(index).map(|item| item.placement)
    }

    /// Constraint of an item.
    #[must_use]
    pub fn constraint(&self, index: usize) -> Option<Constraint> {
        self.items.get(index).map(|item| item.constraint)
    }

    #[must_use]
    pub fn window(&self, index: usize) -> Option<&dyn Window> {
        self.items.get(index).map(|item| item.window.as_ref())
    }

    /// Concrete type of an item's window, if it matches `T`.
    #[must_use]
    pub fn window_as<T: Window + 'static>(&self, index: usize) -> Option<&T> {
        self.items
            .get(index)
            .and_then(|item| item.window.as_ref().as_any().downcast_ref())
    }

    /// Mutate an item's window through its concrete type.
    ///
    /// Updates the window queues inside `f` are collected afterwards.
    pub fn with_window<T: Window + 'static, R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let window = self
            .items
            .get_mut(index)?
            .window
            .as_mut()
            .as_any_mut()
            .downcast_mut::<T>()?;
        let result = f(window);
        self.collect(index);
        Some(result)
    }

    /// Index of the item holding `window`.
    #[must_use]
    pub fn index_of(&self, window: WindowId) -> Option<usize> {
        self.items.iter().position(|item| item.window.id() == window)
    }

    /// Index of the item on the focus chain.
    #[must_use]
    pub fn focus_index(&self) -> Option<usize> {
        self.focus
    }

    /// Window of the item on the focus chain.
    #[must_use]
    pub fn focused_window(&self) -> Option<&dyn Window> {
        self.focus.and_then(|i| self.window(i))
    }

    fn extent(&self) -> u32 {
        match self.axis {
            Axis::Horizontal => self.core.width(),
            Axis::Vertical => self.core.height(),
        }
    }

    /// Offset of item `index` in container coordinates, as (row, col).
    fn offset(&self, index: usize) -> (i32, i32) {
        let pos = self.items[index].placement.pos as i32;
        match self.axis {
            Axis::Horizontal => (0, pos),
            Axis::Vertical => (pos, 0),
        }
    }

    /// Move a child's pending updates into this container's batch.
    fn collect(&mut self, index: usize) {
        let updates = self.items[index].window.fetch_updates();
        if updates.is_empty() || self.items[index].constraint.concealed {
            return;
        }
        let (row, col) = self.offset(index);
        self.core.integrate(row, col, updates);
    }

    /// Non-concealed item covering main-axis `offset`.
    fn item_at(&self, offset: u32) -> Option<usize> {
        self.items
            .iter()
            .position(|item| !item.constraint.concealed && item.placement.contains(offset))
    }

    fn fill_strip(&mut self, row: i32, col: i32, width: u32) {
        let text: String = std::iter::repeat_n(self.fill, width as usize).collect();
        self.core.write(row, col, self.fill_style, &text);
    }

    fn relayout(&mut self) {
        let constraints: Vec<Constraint> = self.items.iter().map(|item| item.constraint).collect();
        let extent = self.extent();
        let placements = layout(&constraints, extent, self.focus);
        let (width, height) = (self.core.width(), self.core.height());

        for (index, placement) in placements.into_iter().enumerate() {
            let item = &mut self.items[index];
            item.placement = placement;
            let (w, h) = if item.constraint.concealed {
                (0, 0)
            } else {
                match self.axis {
                    Axis::Horizontal => (placement.size, height),
                    Axis::Vertical => (width, placement.size),
                }
            };
            item.window.resize(w, h);
            self.collect(index);
        }

        let covered = self
            .items
            .iter()
            .filter(|item| !item.constraint.concealed)
            .map(|item| item.placement.end())
            .max()
            .unwrap_or(0);
        if covered < extent {
            let tail = extent - covered;
            match self.axis {
                Axis::Horizontal => self.refresh(0, covered as i32, height, tail),
                Axis::Vertical => self.refresh(covered as i32, 0, tail, width),
            }
        }
    }
}

impl Window for Container {
    fn core(&self) -> &WindowCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WindowCore {
        &mut self.core
    }

    fn refresh_strip(&mut self, row: i32, col: i32, width: u32) {
        match self.axis {
            Axis::Vertical => {
                let child = u32::try_from(row).ok().and_then(|r| self.item_at(r));
                match child {
                    Some(index) => {
                        let pos = self.items[index].placement.pos as i32;
                        self.items[index].window.refresh_strip(row - pos, col, width);
                        self.collect(index);
                    }
                    None => self.fill_strip(row, col, width),
                }
            }
            Axis::Horizontal => {
                let Some(span) =
                    ColumnSpan::new(col, width).intersect(&ColumnSpan::new(0, self.core.width()))
                else {
                    return;
                };
                let end = span.end();
                let mut x = span.col;
                while x < end {
                    if let Some(index) = self.item_at(x as u32) {
                        let placement = self.items[index].placement;
                        let pos = placement.pos as i32;
                        let seg_end = end.min(placement.end() as i32);
                        self.items[index]
                            .window
                            .refresh_strip(row, x - pos, (seg_end - x) as u32);
                        self.collect(index);
                        x = seg_end;
                    } else {
                        let next = self
                            .items
                            .iter()
                            .filter(|item| !item.constraint.concealed && item.placement.size > 0)
                            .map(|item| item.placement.pos as i32)
                            .filter(|&pos| pos > x)
                            .min()
                            .unwrap_or(end)
                            .min(end);
                        self.fill_strip(row, x, (next - x) as u32);
                        x = next;
                    }
                }
            }
        }
    }

    /// Always re-lays out, so children shrink along with a zero-area
    /// container.
    fn resize(&mut self, width: u32, height: u32) {
        self.core.set_size(width, height);
        self.relayout();
    }

    fn on_resize(&mut self) {
        self.relayout();
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<Response> {
        let Some(index) = self.focus else {
            return Ok(Response::Ignored);
        };
        let response = self.items[index].window.handle_key(key);
        self.collect(index);
        response
    }

    fn handle_tick(&mut self) {
        for index in 0..self.items.len() {
            if self.items[index].constraint.concealed {
                continue;
            }
            self.items[index].window.handle_tick();
            self.collect(index);
        }
    }

    fn cursor(&self) -> Option<Cursor> {
        let index = self.focus?;
        let cursor = self.items[index].window.cursor()?;
        let (row, col) = self.offset(index);
        Some(Cursor {
            row: cursor.row + row,
            col: cursor.col + col,
            ..cursor
        })
    }

    fn focus(&mut self, flag: bool) -> bool {
        if !flag {
            self.clear_focus();
            return false;
        }
        self.has_focus() || self.cycle(true, false)
    }

    fn accepts_focus(&self) -> bool {
        self.core.is_visible()
            && self
                .items
                .iter()
                .any(|item| !item.constraint.concealed && item.window.accepts_focus())
    }

    fn has_focus(&self) -> bool {
        self.focus.is_some()
    }

    fn clear_focus(&mut self) {
        if let Some(index) = self.focus.take() {
            self.items[index].window.clear_focus();
            self.collect(index);
        }
    }

    fn cycle_focus(&mut self, in_depth: bool, wrap_around: bool) -> bool {
        self.cycle(in_depth, wrap_around)
    }

    fn focus_to(&mut self, target: WindowId) -> bool {
        self.focus_path(target)
    }

    fn contains(&self, target: WindowId) -> bool {
        target == self.core.id() || self.items.iter().any(|item| item.window.contains(target))
    }
}
