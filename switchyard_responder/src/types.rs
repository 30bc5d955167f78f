// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route entries and propagation control.

/// Propagation phase of a dispatch entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root to leaf, before the bubble. Lets ancestors intercept input.
    Preview,
    /// Leaf to root.
    Bubble,
}

/// One step of a route: deliver to `node` in `phase`.
///
/// `G` carries whatever per-widget data the handler needs alongside the key,
/// typically the widget's screen geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch<K, G = ()> {
    /// Propagation phase.
    pub phase: Phase,
    /// Widget to deliver to.
    pub node: K,
    /// Per-widget data.
    pub geometry: G,
}

/// What a handler wants the dispatcher to do next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep walking the route.
    Continue,
    /// Stop here.
    Stop,
}
