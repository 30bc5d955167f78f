// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route construction.
//!
//! Routes are built from a root-to-leaf sequence of `(key, data)` pairs, such
//! as the widgets of a resolved widget path with their geometry.

use alloc::vec::Vec;

use crate::types::{Dispatch, Phase};

/// Leaf to root.
pub fn bubble<K, G>(path: impl IntoIterator<Item = (K, G)>) -> Vec<Dispatch<K, G>> {
    let mut out: Vec<Dispatch<K, G>> = path
        .into_iter()
        .map(|(node, geometry)| Dispatch {
            phase: Phase::Bubble,
            node,
            geometry,
        })
        .collect();
    out.reverse();
    out
}

/// Root to leaf as [`Phase::Preview`], then leaf to root as [`Phase::Bubble`].
pub fn tunnel_and_bubble<K: Clone, G: Clone>(
    path: impl IntoIterator<Item = (K, G)>,
) -> Vec<Dispatch<K, G>> {
    let steps: Vec<(K, G)> = path.into_iter().collect();
    let mut out = Vec::with_capacity(steps.len() * 2);
    out.extend(steps.iter().cloned().map(|(node, geometry)| Dispatch {
        phase: Phase::Preview,
        node,
        geometry,
    }));
    out.extend(steps.into_iter().rev().map(|(node, geometry)| Dispatch {
        phase: Phase::Bubble,
        node,
        geometry,
    }));
    out
}

/// A single bubble entry, for events aimed at exactly one widget.
pub fn direct<K, G>(node: K, geometry: G) -> Vec<Dispatch<K, G>> {
    alloc::vec![Dispatch {
        phase: Phase::Bubble,
        node,
        geometry,
    }]
}
