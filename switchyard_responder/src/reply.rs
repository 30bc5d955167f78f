// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The value a widget returns from an event handler.

use switchyard_event_state::pointer::MouseButton;
use switchyard_focus::FocusCause;

/// A widget's answer to one delivered event.
///
/// Every field is an optional instruction. The caller applies them in a fixed
/// order after the handler returns: capture first, then focus, then drag.
///
/// ```
/// use switchyard_event_state::pointer::MouseButton;
/// use switchyard_focus::FocusCause;
/// use switchyard_responder::reply::Reply;
///
/// let reply: Reply<u32, ()> = Reply::handled()
///     .capture_mouse(7)
///     .detect_drag(7, MouseButton::Left)
///     .set_focus(7, FocusCause::Mouse);
/// assert!(reply.handled);
/// assert_eq!(reply.capture, Some(7));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Reply<K, P> {
    /// The event was consumed; propagation stops.
    pub handled: bool,
    /// Capture the pointer this event came from.
    pub capture: Option<K>,
    /// Release the current capture of that pointer.
    pub release_capture: bool,
    /// Move keyboard focus.
    pub focus: Option<(K, FocusCause)>,
    /// Start watching for a drag from this widget with this button.
    pub detect_drag: Option<(K, MouseButton)>,
    /// Start a drag-drop operation carrying this payload.
    pub begin_drag: Option<P>,
    /// Finish the drag-drop operation in flight.
    pub end_drag: bool,
    /// The user interaction that engaged the throttle is over.
    pub end_interaction: bool,
    /// Do not throttle for the press this reply answers.
    pub prevent_throttling: bool,
    /// Capture controller input for a user index.
    pub capture_controller: Option<(u32, K)>,
    /// Release the controller capture for a user index.
    pub release_controller: Option<u32>,
}

impl<K, P> Default for Reply<K, P> {
    fn default() -> Self {
        Self {
            handled: false,
            capture: None,
            release_capture: false,
            focus: None,
            detect_drag: None,
            begin_drag: None,
            end_drag: false,
            end_interaction: false,
            prevent_throttling: false,
            capture_controller: None,
            release_controller: None,
        }
    }
}

impl<K, P> Reply<K, P> {
    /// Not handled, no side effects.
    pub fn unhandled() -> Self {
        Self::default()
    }

    /// Handled, no side effects yet.
    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    /// Request pointer capture for `widget`.
    #[must_use]
    pub fn capture_mouse(mut self, widget: K) -> Self {
        self.capture = Some(widget);
        self
    }

    /// Release pointer capture.
    #[must_use]
    pub fn release_mouse_capture(mut self) -> Self {
        self.release_capture = true;
        self
    }

    /// Request keyboard focus for `widget`.
    #[must_use]
    pub fn set_focus(mut self, widget: K, cause: FocusCause) -> Self {
        self.focus = Some((widget, cause));
        self
    }

    /// Watch for a drag starting on `widget` while `button` is held.
    #[must_use]
    pub fn detect_drag(mut self, widget: K, button: MouseButton) -> Self {
        self.detect_drag = Some((widget, button));
        self
    }

    /// Begin a drag-drop with `payload`.
    #[must_use]
    pub fn begin_drag(mut self, payload: P) -> Self {
        self.begin_drag = Some(payload);
        self
    }

    /// End the drag-drop in flight.
    #[must_use]
    pub fn end_drag(mut self) -> Self {
        self.end_drag = true;
        self
    }

    /// Mark the end of a throttled interaction.
    #[must_use]
    pub fn end_interaction(mut self) -> Self {
        self.end_interaction = true;
        self
    }

    /// Suppress the press throttle.
    #[must_use]
    pub fn prevent_throttling(mut self) -> Self {
        self.prevent_throttling = true;
        self
    }

    /// Capture controller input for `user`.
    #[must_use]
    pub fn capture_controller(mut self, user: u32, widget: K) -> Self {
        self.capture_controller = Some((user, widget));
        self
    }

    /// Release the controller capture for `user`.
    #[must_use]
    pub fn release_controller(mut self, user: u32) -> Self {
        self.release_controller = Some(user);
        self
    }

    /// Whether this reply asks for anything beyond `handled`.
    pub fn has_side_effects(&self) -> bool {
        self.capture.is_some()
            || self.release_capture
            || self.focus.is_some()
            || self.detect_drag.is_some()
            || self.begin_drag.is_some()
            || self.end_drag
            || self.end_interaction
            || self.capture_controller.is_some()
            || self.release_controller.is_some()
    }
}
