// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter/leave transitions between two root-to-leaf paths.

use smallvec::SmallVec;

/// A single hover notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer entered this widget.
    Enter(K),
    /// The pointer left this widget.
    Leave(K),
}

/// Compute the minimal set of notifications to move from `old` to `new`.
///
/// Leaves come first, innermost to outermost, followed by enters, outermost
/// to innermost. Widgets shared by both paths from the root are untouched.
pub fn transition<K: Copy + PartialEq>(old: &[K], new: &[K]) -> SmallVec<[HoverEvent<K>; 8]> {
    let shared = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut out = SmallVec::new();
    out.extend(old[shared..].iter().rev().map(|&k| HoverEvent::Leave(k)));
    out.extend(new[shared..].iter().map(|&k| HoverEvent::Enter(k)));
    out
}
