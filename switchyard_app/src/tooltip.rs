// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single application tooltip.

use kurbo::{Point, Rect, Size};
use switchyard_event_state::tooltip::{TooltipChange, TooltipOffsets, TooltipTimer};
use switchyard_tree::WidgetId;

use crate::event::TooltipState;

#[derive(Clone, Debug)]
pub(crate) struct TooltipController {
    timer: TooltipTimer<WidgetId>,
    hovered: Option<WidgetId>,
    force_field: Option<Rect>,
    cursor: Point,
    position: Point,
}

impl TooltipController {
    pub(crate) fn new(delay: u64, fade_in: u64) -> Self {
        Self {
            timer: TooltipTimer::new(delay, fade_in),
            hovered: None,
            force_field: None,
            cursor: Point::ZERO,
            position: Point::ZERO,
        }
    }

    pub(crate) fn configure(&mut self, delay: u64, fade_in: u64) {
        self.timer.delay = delay;
        self.timer.fade_in = fade_in;
    }

    /// Record what is under the cursor.
    pub(crate) fn set_hover(&mut self, hovered: Option<WidgetId>, force_field: Option<Rect>, cursor: Point) {
        self.hovered = hovered;
        self.force_field = force_field;
        self.cursor = cursor;
    }

    /// Advance the timer with the recorded hover.
    pub(crate) fn update(&mut self, now: u64) -> TooltipChange<WidgetId> {
        self.timer.update(self.hovered, now)
    }

    /// Place the open tooltip for the recorded cursor.
    pub(crate) fn reposition(&mut self, size: Size, offsets: TooltipOffsets, work_area: Option<Rect>) -> Point {
        self.position = self.timer.place(self.cursor, size, offsets, work_area, self.force_field);
        self.position
    }

    pub(crate) fn source(&self) -> Option<WidgetId> {
        self.timer.source().copied()
    }

    /// Close and forget the hover. Returns the source whose tooltip closed.
    pub(crate) fn reset(&mut self) -> Option<WidgetId> {
        self.hovered = None;
        self.force_field = None;
        self.timer.reset()
    }

    pub(crate) fn state(&self, now: u64) -> Option<TooltipState> {
        Some(TooltipState {
            source: self.source()?,
            position: self.position,
            shown_at: self.timer.shown_at()?,
            fade_in: self.timer.fade_in,
            opacity: self.timer.opacity(now),
            repel: self.timer.repel_direction(),
        })
    }
}
