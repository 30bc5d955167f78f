// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Switchyard Tree: the widget hierarchy as seen by input routing.
//!
//! This crate holds what an input dispatcher needs to know about widgets and
//! nothing more: who is whose parent, in which order children were arranged,
//! where each widget sits on screen, and which widgets are windows.
//!
//! - Represents widgets as generational handles in an arena, so stored
//!   references can go stale but can never dangle or be revived by slot reuse.
//! - Groups widgets under windows. Top-level windows are kept in back-to-front
//!   order, and windows may own native child windows (dialogs, popups).
//! - Hit tests a screen point depth first, last-arranged child first.
//! - Produces strong [`WidgetPath`]s for a single dispatch and weak
//!   [`WeakWidgetPath`]s that can be stored across frames and re-resolved.
//!
//! ## Not a layout engine
//!
//! Layout and painting live elsewhere. Upstream code arranges widgets and then
//! writes the resulting local bounds and transforms into this tree.
//!
//! ## API overview
//!
//! - [`Tree`]: the arena.
//! - [`LocalWidget`]: per-widget local data (bounds, transform, flags).
//! - [`WidgetFlags`]: visibility, hit testing, and focus controls.
//! - [`WidgetId`]: generational handle of a widget.
//! - [`Geometry`]: screen placement of a widget within a resolved path.
//! - [`WidgetPath`] / [`WeakWidgetPath`]: root window → leaf chains.
//!
//! Key operations:
//! - [`Tree::insert`] and [`Tree::insert_window`] → [`WidgetId`]
//! - [`Tree::remove`], [`Tree::reparent`], [`Tree::set_window_owner`], [`Tree::bring_to_front`]
//! - [`Tree::hit_test_window`] and [`Tree::locate_window_under`]
//! - [`Tree::path_to`] builds the path to a specific widget.
//! - [`WeakWidgetPath::resolve`] re-validates a stored path under an [`InterruptedPathPolicy`].
//! - [`Tree::next_depth_first`] and [`Tree::prev_depth_first`] provide depth-first traversal.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use switchyard_tree::{InterruptedPathPolicy, LocalWidget, PathResolution, Tree};
//!
//! let mut tree = Tree::new();
//! let window = tree.insert_window(
//!     None,
//!     LocalWidget {
//!         local_bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
//!         ..LocalWidget::default()
//!     },
//! );
//! let button = tree.insert(
//!     Some(window),
//!     LocalWidget {
//!         local_bounds: Rect::new(0.0, 0.0, 50.0, 20.0),
//!         ..LocalWidget::default()
//!     },
//! );
//!
//! let stored = tree
//!     .locate_window_under(Point::new(5.0, 5.0), &tree.windows_back_to_front())
//!     .to_weak();
//!
//! tree.remove(button);
//! let (path, resolution) = stored.resolve(&tree, InterruptedPathPolicy::Truncate);
//! assert_eq!(resolution, PathResolution::Truncated);
//! assert_eq!(path.last_widget(), Some(window));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod path;
mod tree;
mod types;
mod util;

pub use path::{ArrangedWidget, InterruptedPathPolicy, PathResolution, WeakWidgetPath, WidgetPath};
pub use tree::Tree;
pub use types::{Geometry, LocalWidget, WidgetFlags, WidgetId};
