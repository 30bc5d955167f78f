// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer identities, buttons, and last-known pointer state.

use alloc::collections::BTreeMap;
use kurbo::{Point, Vec2};

/// Identifier of a pointer (the mouse or one touch contact).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointerId(pub u32);

impl PointerId {
    /// The system mouse.
    pub const MOUSE: Self = Self(0);
}

impl Default for PointerId {
    fn default() -> Self {
        Self::MOUSE
    }
}

/// A pointer button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
    /// First thumb button.
    Back,
    /// Second thumb button.
    Forward,
}

bitflags::bitflags! {
    /// Set of pressed pointer buttons.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// [`MouseButton::Left`].
        const LEFT    = 0b0000_0001;
        /// [`MouseButton::Right`].
        const RIGHT   = 0b0000_0010;
        /// [`MouseButton::Middle`].
        const MIDDLE  = 0b0000_0100;
        /// [`MouseButton::Back`].
        const BACK    = 0b0000_1000;
        /// [`MouseButton::Forward`].
        const FORWARD = 0b0001_0000;
    }
}

impl From<MouseButton> for PointerButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
            MouseButton::Back => Self::BACK,
            MouseButton::Forward => Self::FORWARD,
        }
    }
}

/// Last-known state of one pointer.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Screen position of the most recent event.
    pub position: Point,
    /// Screen position of the event before that.
    pub last_position: Point,
    /// Buttons currently held.
    pub pressed: PointerButtons,
}

impl PointerState {
    /// Movement between the last two events.
    pub fn delta(&self) -> Vec2 {
        self.position - self.last_position
    }
}

/// Tracks [`PointerState`] for every pointer seen so far.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    pointers: BTreeMap<PointerId, PointerState>,
}

impl PointerTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, pointer: PointerId, position: Point) -> &mut PointerState {
        self.pointers.entry(pointer).or_insert(PointerState {
            position,
            last_position: position,
            pressed: PointerButtons::empty(),
        })
    }

    /// Record a move and return the movement since the previous event.
    pub fn on_move(&mut self, pointer: PointerId, position: Point) -> Vec2 {
        let state = self.entry(pointer, position);
        state.last_position = state.position;
        state.position = position;
        state.delta()
    }

    /// Record a press.
    pub fn on_down(&mut self, pointer: PointerId, button: MouseButton, position: Point) {
        let state = self.entry(pointer, position);
        state.last_position = state.position;
        state.position = position;
        state.pressed |= button.into();
    }

    /// Record a release. Returns `true` if the button was held.
    pub fn on_up(&mut self, pointer: PointerId, button: MouseButton, position: Point) -> bool {
        let state = self.entry(pointer, position);
        state.last_position = state.position;
        state.position = position;
        let flag = PointerButtons::from(button);
        let was_pressed = state.pressed.contains(flag);
        state.pressed.remove(flag);
        was_pressed
    }

    /// State of a pointer, if it has been seen.
    pub fn get(&self, pointer: PointerId) -> Option<&PointerState> {
        self.pointers.get(&pointer)
    }

    /// Current position of a pointer.
    pub fn position(&self, pointer: PointerId) -> Option<Point> {
        self.get(pointer).map(|s| s.position)
    }

    /// Buttons held on a pointer.
    pub fn pressed(&self, pointer: PointerId) -> PointerButtons {
        self.get(pointer).map(|s| s.pressed).unwrap_or_default()
    }

    /// Whether any pointer holds any button.
    pub fn any_pressed(&self) -> bool {
        self.pointers.values().any(|s| !s.pressed.is_empty())
    }

    /// Forget every held button without touching positions.
    pub fn clear_pressed(&mut self) {
        for state in self.pointers.values_mut() {
            state.pressed = PointerButtons::empty();
        }
    }

    /// Forget a pointer entirely (for example a lifted touch).
    pub fn remove(&mut self, pointer: PointerId) -> Option<PointerState> {
        self.pointers.remove(&pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_reports_delta_from_previous_event() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.on_move(PointerId::MOUSE, Point::new(10.0, 10.0)), Vec2::ZERO);
        assert_eq!(
            tracker.on_move(PointerId::MOUSE, Point::new(13.0, 14.0)),
            Vec2::new(3.0, 4.0)
        );
    }

    #[test]
    fn buttons_are_tracked_per_pointer() {
        let mut tracker = PointerTracker::new();
        let touch = PointerId(7);
        tracker.on_down(PointerId::MOUSE, MouseButton::Left, Point::ZERO);
        tracker.on_down(touch, MouseButton::Left, Point::ZERO);
        assert!(tracker.on_up(PointerId::MOUSE, MouseButton::Left, Point::ZERO));
        assert!(!tracker.on_up(PointerId::MOUSE, MouseButton::Left, Point::ZERO));
        assert_eq!(tracker.pressed(touch), PointerButtons::LEFT);
        assert!(tracker.any_pressed());

        tracker.clear_pressed();
        assert!(!tracker.any_pressed());
        assert_eq!(tracker.position(touch), Some(Point::ZERO));
    }

    #[test]
    fn unseen_pointer_has_no_buttons() {
        let tracker = PointerTracker::new();
        assert_eq!(tracker.pressed(PointerId(3)), PointerButtons::empty());
        assert!(tracker.get(PointerId(3)).is_none());
    }
}
