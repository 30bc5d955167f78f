// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the widget tree: identifiers, flags, and local geometry.

use kurbo::{Affine, Point, Rect};

use crate::util::transform_rect_bbox;

/// Identifier for a widget in the tree (generational).
///
/// A `WidgetId` never keeps its widget alive. Once the widget is removed the id
/// goes stale, and it stays stale even if the slot is later reused, because
/// reuse bumps the slot generation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) u32, pub(crate) u32);

impl WidgetId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot generation this id was minted with.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Widget flags controlling visibility, hit testing, and focus.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// Widget is visible. Hidden widgets and their subtrees are skipped by
        /// hit testing and never resolve in a path.
        const VISIBLE      = 0b0000_0001;
        /// Widget itself can be the target of a hit test.
        ///
        /// A visible widget without this flag is transparent: its children are
        /// still eligible.
        const HIT_TESTABLE = 0b0000_0010;
        /// Widget accepts keyboard focus.
        const FOCUSABLE    = 0b0000_0100;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::HIT_TESTABLE
    }
}

/// Arranged geometry for a widget, as supplied by the layout layer.
#[derive(Clone, Debug)]
pub struct LocalWidget {
    /// Local (untransformed) bounds.
    pub local_bounds: Rect,
    /// Local transform relative to the parent's space.
    ///
    /// For windows this places the window on screen.
    pub local_transform: Affine,
    /// Visibility, hit testing, and focus flags.
    pub flags: WidgetFlags,
}

impl Default for LocalWidget {
    fn default() -> Self {
        Self {
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            flags: WidgetFlags::default(),
        }
    }
}

/// Screen-space placement of a widget at the time a path was resolved.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
    /// Maps the widget's local space to screen space.
    pub transform: Affine,
    /// Local bounds of the widget.
    pub bounds: Rect,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            bounds: Rect::ZERO,
        }
    }
}

impl Geometry {
    /// Create geometry from a local-to-screen transform and local bounds.
    pub const fn new(transform: Affine, bounds: Rect) -> Self {
        Self { transform, bounds }
    }

    /// Convert a screen-space point into this widget's local space.
    pub fn to_local(&self, screen: Point) -> Point {
        self.transform.inverse() * screen
    }

    /// Whether a screen-space point lies inside the widget's local bounds.
    ///
    /// Bounds are half-open: the far edges are outside.
    pub fn contains(&self, screen: Point) -> bool {
        self.bounds.contains(self.to_local(screen))
    }

    /// Conservative screen-space bounding box.
    pub fn screen_rect(&self) -> Rect {
        transform_rect_bbox(self.transform, self.bounds)
    }
}
