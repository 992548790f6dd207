//! Focus traversal across nested containers.

mod common;

use common::{Fill, paint};
use ebfe_tui::container::{Container, ItemOptions};
use ebfe_tui::window::{Window, WindowId};
use proptest::prelude::*;

/// Count focused leaves in a two-level tree of `Fill`s.
fn focused_leaves(root: &Container) -> usize {
    (0..root.len())
        .map(|i| {
            if let Some(inner) = root.window_as::<Container>(i) {
                (0..inner.len())
                    .filter(|&j| inner.window(j).is_some_and(|w| w.has_focus()))
                    .count()
            } else {
                usize::from(root.window(i).is_some_and(|w| w.has_focus()))
            }
        })
        .sum()
}

/// `[a, [b, c], d]` with every leaf focusable.
fn tree() -> (Container, Vec<WindowId>) {
    let mut inner = Container::horizontal();
    inner.add(Fill::focusable('b').boxed(), ItemOptions::new()).unwrap();
    inner.add(Fill::focusable('c').boxed(), ItemOptions::new()).unwrap();
    let b = inner.window(0).unwrap().id();
    let c = inner.window(1).unwrap().id();

    let mut root = Container::vertical();
    root.add(Fill::focusable('a').boxed(), ItemOptions::new()).unwrap();
    root.add(Box::new(inner), ItemOptions::new()).unwrap();
    root.add(Fill::focusable('d').boxed(), ItemOptions::new()).unwrap();
    let a = root.window(0).unwrap().id();
    let d = root.window(2).unwrap().id();
    (root, vec![a, b, c, d])
}

#[test]
fn test_concealed_item_is_skipped() {
    let mut root = Container::vertical();
    root.add(Fill::focusable('a').boxed(), ItemOptions::new()).unwrap();
    root.add(Fill::focusable('b').boxed(), ItemOptions::new().concealed(true))
        .unwrap();
    root.add(Fill::focusable('c').boxed(), ItemOptions::new()).unwrap();
    let a = root.window(0).unwrap().id();
    assert!(root.focus_to(a));

    assert!(root.cycle_focus(true, true));
    assert_eq!(root.focus_index(), Some(2));
    assert!(!root.window(1).unwrap().has_focus());
}

#[test]
fn test_depth_first_order_with_wrap() {
    let (mut root, ids) = tree();
    let mut order = Vec::new();
    for _ in 0..5 {
        assert!(root.cycle_focus(true, true));
        let focused = ids
            .iter()
            .position(|&id| {
                (0..root.len()).any(|i| {
                    root.window(i).is_some_and(|w| w.id() == id && w.has_focus())
                        || root.window_as::<Container>(i).is_some_and(|inner| {
                            (0..inner.len())
                                .any(|j| inner.window(j).is_some_and(|w| w.id() == id && w.has_focus()))
                        })
                })
            })
            .unwrap();
        order.push(focused);
    }
    assert_eq!(order, [0, 1, 2, 3, 0]);
}

#[test]
fn test_concealing_focused_item_moves_focus_first() {
    let (mut root, ids) = tree();
    root.resize(4, 3);
    assert!(root.focus_to(ids[3]));
    let d = ids[3];

    assert!(!root.set_item_visibility(d, false, false).unwrap());
    assert_eq!(root.focus_index(), Some(0));
    assert_eq!(focused_leaves(&root), 1);
    assert_eq!(root.placement(2).unwrap().size, 0);
    assert_eq!(root.placement(1).unwrap().end(), 3);
}

#[test]
fn test_toggle_visibility_round_trip() {
    let (mut root, ids) = tree();
    root.resize(4, 4);
    let a = ids[0];
    assert!(!root.set_item_visibility(a, true, true).unwrap());
    assert!(root.set_item_visibility(a, true, true).unwrap());
    assert_eq!(root.placement(0).unwrap().size, 1);
}

#[test]
fn test_visibility_of_unknown_window_fails() {
    let (mut root, ids) = tree();
    // `b` lives in the nested container, not directly in root
    assert!(root.set_item_visibility(ids[1], false, false).is_err());
}

#[test]
fn test_focus_redraw_reaches_root() {
    let (mut root, ids) = tree();
    root.resize(4, 3);
    let _ = root.fetch_updates();

    assert!(root.focus_to(ids[2]));
    let screen = paint(&root.fetch_updates(), 4, 3);
    assert_eq!(screen, "    \n  CC\n    ");
}

#[test]
fn test_insert_before_focus_keeps_focused_window() {
    let (mut root, ids) = tree();
    assert!(root.focus_to(ids[3]));
    root.add(Fill::focusable('z').boxed(), ItemOptions::new().at(0))
        .unwrap();
    assert_eq!(root.focus_index(), Some(3));
    assert_eq!(root.focused_window().unwrap().id(), ids[3]);

    root.remove_at(0).unwrap();
    assert_eq!(root.focus_index(), Some(2));
    let removed = root.remove_at(2).unwrap();
    assert!(!removed.has_focus());
    assert_eq!(root.focus_index(), None);
}

proptest! {
    /// Any sequence of cycles and jumps leaves at most one focused leaf.
    #[test]
    fn at_most_one_focused_leaf(ops in prop::collection::vec((0u8..3, 0usize..4), 0..40)) {
        let (mut root, ids) = tree();
        for (op, target) in ops {
            match op {
                0 => { root.cycle_focus(true, true); }
                1 => { root.cycle_focus(false, false); }
                _ => { root.focus_to(ids[target]); }
            }
            prop_assert!(focused_leaves(&root) <= 1);
            prop_assert_eq!(root.has_focus(), focused_leaves(&root) == 1);
        }
    }

    /// Cycling N times with wrap through N focusable siblings returns to the
    /// starting item.
    #[test]
    fn wrap_cycle_returns_to_start(n in 1usize..8, start in 0usize..8) {
        let mut root = Container::horizontal();
        for _ in 0..n {
            root.add(Fill::focusable('x').boxed(), ItemOptions::new()).unwrap();
        }
        let start = start % n;
        let id = root.window(start).unwrap().id();
        prop_assert!(root.focus_to(id));
        for _ in 0..n {
            prop_assert!(root.cycle_focus(true, true));
        }
        prop_assert_eq!(root.focus_index(), Some(start));
    }
}
