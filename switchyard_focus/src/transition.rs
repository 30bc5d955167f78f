// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use smallvec::SmallVec;

/// The difference between two focus paths.
///
/// Paths are root-to-leaf. Keys shared by both paths from the root down make
/// up the common ancestor chain; everything below it changes status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusTransition<K> {
    /// Number of leading keys the two paths share.
    pub common_depth: usize,
    /// Leaf of the old path, unless it is also the new leaf.
    pub lost: Option<K>,
    /// Leaf of the new path, unless it is also the old leaf.
    pub received: Option<K>,
    /// Widgets below the common ancestor: the old path's tail (leaf to root),
    /// then the new path's tail (root to leaf).
    pub changing: SmallVec<[K; 8]>,
}

impl<K: Copy + PartialEq> FocusTransition<K> {
    /// Compare `old` and `new` root-to-leaf paths.
    pub fn between(old: &[K], new: &[K]) -> Self {
        let common_depth = old
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let same = old.len() == new.len() && common_depth == old.len();
        let mut changing = SmallVec::new();
        changing.extend(old[common_depth..].iter().rev().copied());
        changing.extend(new[common_depth..].iter().copied());
        Self {
            common_depth,
            lost: if same { None } else { old.last().copied() },
            received: if same { None } else { new.last().copied() },
            changing,
        }
    }

    /// Whether nothing changes.
    pub fn is_noop(&self) -> bool {
        self.lost.is_none() && self.received.is_none()
    }
}
