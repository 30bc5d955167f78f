// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable input policy.

use kurbo::{Rect, Vec2};
use switchyard_event_state::tooltip::TooltipOffsets;

/// Distance a pressed pointer must travel before a drag is detected, in pixels.
pub const DRAG_TRIGGER_DISTANCE: f64 = 5.0;
/// Hover time before a tooltip opens, in milliseconds.
pub const TOOLTIP_DELAY_MS: u64 = 150;
/// Tooltip fade-in duration, in milliseconds.
pub const TOOLTIP_FADE_IN_MS: u64 = 100;
/// Offset of a tooltip from the cursor.
pub const TOOLTIP_OFFSET_FROM_CURSOR: Vec2 = Vec2::new(12.0, 8.0);
/// Gap between a tooltip and a force field it was pushed out of.
pub const TOOLTIP_OFFSET_FROM_FORCE_FIELD: Vec2 = Vec2::new(4.0, 3.0);
/// Shortest pointer move that counts toward the motion throttle, in pixels.
pub const THROTTLE_MIN_MOVE_DISTANCE: f64 = 2.0;
/// Pointer speed that engages the motion throttle, in pixels per second.
pub const THROTTLE_VELOCITY_THRESHOLD: f64 = 400.0;
/// How long the motion throttle outlives the last fast move, in milliseconds.
pub const THROTTLE_DECAY_MS: u64 = 100;
/// Deferred focus changes applied per tick.
pub const MAX_DEFERRED_FOCUS_CHANGES: usize = 16;

/// Input policy of an [`Application`](crate::Application).
///
/// ```
/// use switchyard_app::InputSettings;
///
/// let settings = InputSettings::default()
///     .with_drag_trigger_distance(8.0)
///     .with_tooltip_delay(500);
/// assert_eq!(settings.tooltip_delay, 500);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InputSettings {
    /// See [`DRAG_TRIGGER_DISTANCE`].
    pub drag_trigger_distance: f64,
    /// See [`TOOLTIP_DELAY_MS`].
    pub tooltip_delay: u64,
    /// See [`TOOLTIP_FADE_IN_MS`].
    pub tooltip_fade_in: u64,
    /// See [`TOOLTIP_OFFSET_FROM_CURSOR`] and [`TOOLTIP_OFFSET_FROM_FORCE_FIELD`].
    pub tooltip_offsets: TooltipOffsets,
    /// Screen area tooltips are kept inside, if known.
    pub tooltip_work_area: Option<Rect>,
    /// Engage the throttle automatically on fast pointer motion.
    pub throttle_on_fast_motion: bool,
    /// See [`THROTTLE_MIN_MOVE_DISTANCE`].
    pub throttle_min_move_distance: f64,
    /// See [`THROTTLE_VELOCITY_THRESHOLD`].
    pub throttle_velocity_threshold: f64,
    /// See [`THROTTLE_DECAY_MS`].
    pub throttle_decay: u64,
    /// See [`MAX_DEFERRED_FOCUS_CHANGES`].
    pub max_deferred_focus_changes: usize,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            drag_trigger_distance: DRAG_TRIGGER_DISTANCE,
            tooltip_delay: TOOLTIP_DELAY_MS,
            tooltip_fade_in: TOOLTIP_FADE_IN_MS,
            tooltip_offsets: TooltipOffsets {
                from_cursor: TOOLTIP_OFFSET_FROM_CURSOR,
                from_force_field: TOOLTIP_OFFSET_FROM_FORCE_FIELD,
            },
            tooltip_work_area: None,
            throttle_on_fast_motion: true,
            throttle_min_move_distance: THROTTLE_MIN_MOVE_DISTANCE,
            throttle_velocity_threshold: THROTTLE_VELOCITY_THRESHOLD,
            throttle_decay: THROTTLE_DECAY_MS,
            max_deferred_focus_changes: MAX_DEFERRED_FOCUS_CHANGES,
        }
    }
}

impl InputSettings {
    /// Set the drag trigger distance.
    #[must_use]
    pub fn with_drag_trigger_distance(mut self, distance: f64) -> Self {
        self.drag_trigger_distance = distance;
        self
    }

    /// Set the tooltip delay.
    #[must_use]
    pub fn with_tooltip_delay(mut self, delay: u64) -> Self {
        self.tooltip_delay = delay;
        self
    }

    /// Set the tooltip fade-in duration.
    #[must_use]
    pub fn with_tooltip_fade_in(mut self, fade_in: u64) -> Self {
        self.tooltip_fade_in = fade_in;
        self
    }

    /// Keep tooltips inside `area`.
    #[must_use]
    pub fn with_tooltip_work_area(mut self, area: Rect) -> Self {
        self.tooltip_work_area = Some(area);
        self
    }

    /// Turn the motion throttle on or off.
    #[must_use]
    pub fn with_throttle_on_fast_motion(mut self, enabled: bool) -> Self {
        self.throttle_on_fast_motion = enabled;
        self
    }

    /// Set the deferred focus change budget per tick.
    #[must_use]
    pub fn with_max_deferred_focus_changes(mut self, max: usize) -> Self {
        self.max_deferred_focus_changes = max;
        self
    }
}
