// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip timing and placement.
//!
//! [`TooltipTimer`] is fed the widget currently offering a tooltip under the
//! cursor (or `None`) together with a timestamp in milliseconds. It opens a
//! tooltip once the same source has been hovered for the configured delay and
//! closes it as soon as the source changes. Opacity ramps from 0 to 1 over the
//! fade-in duration.
//!
//! [`TooltipTimer::place`] computes where the tooltip window goes: offset from
//! the cursor, flipped to stay inside an optional work area, and pushed out of
//! an optional force-field rectangle. The direction of that push is remembered
//! while the tooltip stays open so cursor jitter cannot make it jump sides.
//!
//! ```
//! use switchyard_event_state::tooltip::{TooltipChange, TooltipTimer};
//!
//! let mut timer: TooltipTimer<u32> = TooltipTimer::new(150, 100);
//! assert_eq!(timer.update(Some(7), 1_000), TooltipChange::None);
//! assert_eq!(timer.update(Some(7), 1_149), TooltipChange::None);
//! assert_eq!(timer.update(Some(7), 1_150), TooltipChange::Opened(7));
//! assert_eq!(timer.opacity(1_200), 0.5);
//! assert_eq!(timer.update(None, 1_300), TooltipChange::Closed(7));
//! ```

use kurbo::{Point, Rect, Size, Vec2};

/// Side a tooltip was pushed to when it overlapped a force field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RepelDirection {
    /// Not pushed yet.
    #[default]
    Undetermined,
    /// Pushed to the right of the force field.
    Right,
    /// Pushed below the force field.
    Down,
}

/// What changed after a [`TooltipTimer::update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TooltipChange<K> {
    /// Nothing to do.
    None,
    /// Show a tooltip for this source.
    Opened(K),
    /// Hide the tooltip of this source.
    Closed(K),
    /// Hide the tooltip of the first source and show one for the second.
    Replaced(K, K),
}

#[derive(Clone, Debug)]
enum Phase<K> {
    Idle,
    Pending { source: K, since: u64 },
    Shown { source: K, shown_at: u64 },
}

/// Offsets used by [`TooltipTimer::place`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TooltipOffsets {
    /// Offset of the tooltip's top-left corner from the cursor.
    pub from_cursor: Vec2,
    /// Gap kept between a force field and a tooltip pushed out of it.
    pub from_force_field: Vec2,
}

impl Default for TooltipOffsets {
    fn default() -> Self {
        Self {
            from_cursor: Vec2::new(12.0, 8.0),
            from_force_field: Vec2::new(4.0, 3.0),
        }
    }
}

/// Delay, fade-in, and placement state of a single tooltip.
#[derive(Clone, Debug)]
pub struct TooltipTimer<K> {
    phase: Phase<K>,
    repel: RepelDirection,
    /// Hover time before a tooltip opens, in milliseconds.
    pub delay: u64,
    /// Time to reach full opacity, in milliseconds.
    pub fade_in: u64,
}

impl<K: Clone + PartialEq> TooltipTimer<K> {
    /// Create a timer with the given delay and fade-in duration.
    pub fn new(delay: u64, fade_in: u64) -> Self {
        Self {
            phase: Phase::Idle,
            repel: RepelDirection::Undetermined,
            delay,
            fade_in,
        }
    }

    /// Feed the current tooltip source under the cursor.
    pub fn update(&mut self, hovered: Option<K>, now: u64) -> TooltipChange<K> {
        let Some(hovered) = hovered else {
            return match self.reset() {
                Some(source) => TooltipChange::Closed(source),
                None => TooltipChange::None,
            };
        };
        let same_source = match &self.phase {
            Phase::Shown { source, .. } | Phase::Pending { source, .. } => *source == hovered,
            Phase::Idle => false,
        };
        if same_source && self.is_open() {
            return TooltipChange::None;
        }
        let closed = if same_source {
            None
        } else {
            let closed = self.reset();
            self.phase = Phase::Pending {
                source: hovered.clone(),
                since: now,
            };
            closed
        };
        let opened = match self.phase {
            Phase::Pending { since, .. } if now.saturating_sub(since) >= self.delay => {
                self.phase = Phase::Shown {
                    source: hovered.clone(),
                    shown_at: now,
                };
                true
            }
            _ => false,
        };
        match (closed, opened) {
            (Some(old), true) => TooltipChange::Replaced(old, hovered),
            (Some(old), false) => TooltipChange::Closed(old),
            (None, true) => TooltipChange::Opened(hovered),
            (None, false) => TooltipChange::None,
        }
    }

    /// Close any tooltip and restart from idle. Returns the source whose
    /// tooltip was showing, if any.
    pub fn reset(&mut self) -> Option<K> {
        self.repel = RepelDirection::Undetermined;
        match core::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Shown { source, .. } => Some(source),
            Phase::Pending { .. } | Phase::Idle => None,
        }
    }

    /// Source of the tooltip currently showing.
    pub fn source(&self) -> Option<&K> {
        match &self.phase {
            Phase::Shown { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Source still waiting for its delay to elapse.
    pub fn pending(&self) -> Option<&K> {
        match &self.phase {
            Phase::Pending { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Whether a tooltip is showing.
    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Shown { .. })
    }

    /// Timestamp at which the showing tooltip opened.
    pub fn shown_at(&self) -> Option<u64> {
        match self.phase {
            Phase::Shown { shown_at, .. } => Some(shown_at),
            _ => None,
        }
    }

    /// Opacity of the tooltip at `now`, in `0.0..=1.0`.
    pub fn opacity(&self, now: u64) -> f64 {
        let Phase::Shown { shown_at, .. } = self.phase else {
            return 0.0;
        };
        if self.fade_in == 0 {
            return 1.0;
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "Millisecond durations are far below f64 precision limits."
        )]
        let t = now.saturating_sub(shown_at) as f64 / self.fade_in as f64;
        t.clamp(0.0, 1.0)
    }

    /// Cached push direction.
    pub fn repel_direction(&self) -> RepelDirection {
        self.repel
    }

    /// Compute the tooltip's top-left corner in screen space.
    ///
    /// The tooltip starts at `cursor + offsets.from_cursor`. With a work area
    /// it flips to the other side of the cursor on an axis where it would
    /// overflow, then is clamped inside. With a force field it is pushed right
    /// or down out of the field, whichever is shorter the first time, then the
    /// same way for as long as this tooltip stays open.
    pub fn place(
        &mut self,
        cursor: Point,
        size: Size,
        offsets: TooltipOffsets,
        work_area: Option<Rect>,
        force_field: Option<Rect>,
    ) -> Point {
        let mut pos = cursor + offsets.from_cursor;
        if let Some(area) = work_area {
            if pos.x + size.width > area.x1 {
                pos.x = cursor.x - offsets.from_cursor.x - size.width;
            }
            if pos.y + size.height > area.y1 {
                pos.y = cursor.y - offsets.from_cursor.y - size.height;
            }
            pos.x = pos.x.min(area.x1 - size.width).max(area.x0);
            pos.y = pos.y.min(area.y1 - size.height).max(area.y0);
        }
        if let Some(field) = force_field {
            let shift_x = field.x1 + offsets.from_force_field.x - pos.x;
            let shift_y = field.y1 + offsets.from_force_field.y - pos.y;
            if shift_x > 0.0 && shift_y > 0.0 {
                let right = match self.repel {
                    RepelDirection::Right => true,
                    RepelDirection::Down => false,
                    RepelDirection::Undetermined => shift_x < shift_y,
                };
                if right {
                    pos.x += shift_x;
                    self.repel = RepelDirection::Right;
                } else {
                    pos.y += shift_y;
                    self.repel = RepelDirection::Down;
                }
            }
        }
        pos
    }
}

impl<K: Clone + PartialEq> Default for TooltipTimer<K> {
    fn default() -> Self {
        Self::new(150, 100)
    }
}
