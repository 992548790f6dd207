//! Depth-first focus traversal.
//!
//! Only leaves carry `in_focus`. A container records which item is on the
//! focus chain in its focus index, so the chain from the root to the focused
//! leaf is a sequence of indices.

use super::Container;
use crate::window::{Window, WindowId};

impl Container {
    /// Advance focus to the next focusable leaf.
    ///
    /// With `in_depth`, focus first moves inside the focused item; when that
    /// item is exhausted (or without `in_depth`), it moves to the following
    /// non-concealed items in order. Reaching the end fails unless
    /// `wrap_around`, which retries once from the first item.
    pub(super) fn cycle(&mut self, in_depth: bool, wrap_around: bool) -> bool {
        let mut start = 0;
        if let Some(current) = self.focus {
            let child = &mut self.items[current].window;
            if in_depth && child.has_focus() && child.cycle_focus(true, false) {
                self.collect(current);
                return true;
            }
            self.items[current].window.clear_focus();
            self.collect(current);
            self.focus = None;
            start = current + 1;
        }

        for index in start..self.items.len() {
            let item = &mut self.items[index];
            if item.constraint.concealed || !item.window.accepts_focus() {
                continue;
            }
            let taken = item.window.cycle_focus(in_depth, false);
            self.collect(index);
            if taken {
                self.focus = Some(index);
                return true;
            }
        }

        wrap_around && self.cycle(in_depth, false)
    }

    /// Put focus on `target`, which may be this container or any window
    /// below it.
    ///
    /// The previously focused sibling on each level of the path loses focus
    /// and every container on the path updates its focus index.
    pub(super) fn focus_path(&mut self, target: WindowId) -> bool {
        if target == self.core.id() {
            return self.has_focus() || self.cycle(true, false);
        }
        let Some(index) = self
            .items
            .iter()
            .position(|item| !item.constraint.concealed && item.window.contains(target))
        else {
            return false;
        };

        let taken = self.items[index].window.focus_to(target);
        self.collect(index);
        if !taken {
            return false;
        }
        if let Some(previous) = self.focus.filter(|&p| p != index) {
            self.items[previous].window.clear_focus();
            self.collect(previous);
        }
        self.focus = Some(index);
        true
    }
}
