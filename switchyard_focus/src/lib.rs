// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=switchyard_focus --heading-base-level=0

//! Switchyard Focus: what changes when keyboard focus moves, and where it moves to.
//!
//! The crate has no notion of a widget tree. It works on root-to-leaf key
//! slices and on flat lists of candidates, so it can be shared by any layer
//! that owns the real hierarchy.
//!
//! - [`FocusCause`] records why focus moved.
//! - [`FocusTransition`] compares the old and new focus paths and reports the
//!   common ancestor depth, the leaf that loses focus, the leaf that receives
//!   it, and every widget whose "has a focused descendant" status flips.
//! - [`Navigation`], [`FocusCandidate`] and [`NavigationPolicy`] pick the next
//!   focus target for Tab, Shift+Tab and the arrow keys.
//!   [`ReadingOrderPolicy`] is the stock policy.
//!
//! ## Example
//!
//! ```rust
//! use switchyard_focus::FocusTransition;
//!
//! // Focus moves from window 1 > panel 2 > field 3 to window 1 > panel 2 > field 4.
//! let t = FocusTransition::between(&[1_u32, 2, 3], &[1, 2, 4]);
//! assert_eq!(t.common_depth, 2);
//! assert_eq!(t.lost, Some(3));
//! assert_eq!(t.received, Some(4));
//! assert_eq!(t.changing.as_slice(), &[3, 4]);
//! ```
//!
//! ```rust
//! use kurbo::Rect;
//! use switchyard_focus::{FocusCandidate, Navigation, NavigationPolicy, ReadingOrderPolicy};
//!
//! let fields = [
//!     FocusCandidate::new(10_u32, Rect::new(0.0, 0.0, 50.0, 20.0)),
//!     FocusCandidate::new(11_u32, Rect::new(0.0, 30.0, 50.0, 50.0)),
//! ];
//! let policy = ReadingOrderPolicy::default();
//! assert_eq!(policy.next(Some(10), Navigation::Next, &fields), Some(11));
//! assert_eq!(policy.next(Some(11), Navigation::Next, &fields), Some(10));
//! assert_eq!(policy.next(None, Navigation::Prev, &fields), Some(11));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod navigation;
mod transition;

pub use navigation::{FocusCandidate, Navigation, NavigationPolicy, ReadingOrderPolicy, WrapMode};
pub use transition::FocusTransition;

/// Why keyboard focus changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusCause {
    /// A pointer press on, or inside, the new focus target.
    Mouse,
    /// Keyboard navigation such as Tab or an arrow key.
    Navigation,
    /// Set by code.
    SetDirectly,
    /// Focus was cleared.
    Cleared,
    /// The window holding the target was activated.
    WindowActivate,
}
