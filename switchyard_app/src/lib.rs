// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=switchyard_app --heading-base-level=0

//! Switchyard App: the application-wide input dispatcher.
//!
//! [`Application`] owns a widget [`Tree`](switchyard_tree::Tree), a
//! [`WidgetHost`] that implements widget behavior, and the interaction state
//! that outlives any single event:
//!
//! - per-pointer and per-controller capture,
//! - keyboard focus with change notifications and Tab/arrow navigation,
//! - drag detection and drag-drop, including drags from other applications,
//! - the popup menu stack and the modal window stack,
//! - the hover path, cursor, and delayed tooltips,
//! - a throttle signal for hosts that do background work.
//!
//! Platform input enters through the `process_*` methods. Each one resolves a
//! path through the tree, builds a route, and delivers a [`WidgetEvent`] to
//! each widget on it until one replies handled. Replies can also ask for side
//! effects; these are applied in a fixed order (capture, then focus, then
//! drag) before the next widget sees the event.
//!
//! Stored paths are weak: removing widgets from the tree never leaves dangling
//! state. A captor that disappears is released with a notification, and a
//! focus path that decays means nothing is focused.
//!
//! Time is explicit. Call [`Application::tick`] with a millisecond timestamp to
//! advance tooltips, the motion throttle, and deferred focus changes.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use switchyard_app::{Application, PointerInput, WidgetEvent, WidgetHost};
//! use switchyard_event_state::pointer::MouseButton;
//! use switchyard_responder::reply::Reply;
//! use switchyard_responder::types::Phase;
//! use switchyard_tree::{Geometry, LocalWidget, WidgetFlags, WidgetId};
//!
//! #[derive(Default)]
//! struct Clicks(Vec<WidgetId>);
//!
//! impl WidgetHost for Clicks {
//!     type Payload = ();
//!
//!     fn on_event(
//!         &mut self,
//!         widget: WidgetId,
//!         _: &Geometry,
//!         phase: Phase,
//!         event: &WidgetEvent<'_, ()>,
//!     ) -> Reply<WidgetId, ()> {
//!         match (phase, event) {
//!             (Phase::Bubble, WidgetEvent::PointerDown(_)) => {
//!                 self.0.push(widget);
//!                 Reply::handled().capture_mouse(widget)
//!             }
//!             _ => Reply::unhandled(),
//!         }
//!     }
//! }
//!
//! let mut app = Application::new(Clicks::default());
//! let window = app.tree_mut().insert_window(
//!     None,
//!     LocalWidget {
//!         local_bounds: Rect::new(0.0, 0.0, 200.0, 100.0),
//!         ..LocalWidget::default()
//!     },
//! );
//! let button = app.tree_mut().insert(
//!     Some(window),
//!     LocalWidget {
//!         local_bounds: Rect::new(10.0, 10.0, 60.0, 30.0),
//!         flags: WidgetFlags::default() | WidgetFlags::FOCUSABLE,
//!         ..LocalWidget::default()
//!     },
//! );
//!
//! let press = PointerInput::mouse(Point::new(20.0, 20.0)).with_button(MouseButton::Left);
//! assert!(app.process_pointer_down(press));
//! assert_eq!(app.host().0, vec![button]);
//! assert_eq!(app.mouse_captor(press.pointer), Some(button));
//! assert_eq!(app.keyboard_focus(), Some(button));
//!
//! app.process_pointer_up(press);
//! assert!(app.release_mouse_capture(press.pointer));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod application;
mod capture;
mod drag_drop;
mod error;
mod event;
mod focus;
mod host;
mod input;
mod interaction;
mod modal;
mod popup;
mod settings;
mod tooltip;
mod windows;

#[cfg(test)]
mod tests;

pub use application::Application;
pub use drag_drop::DragDropOperation;
pub use error::InteractionError;
pub use event::{
    ActivationCause, CharInput, ControllerInput, CursorIcon, Key, KeyInput, Modifiers,
    PointerInput, TooltipState, TouchInput, WidgetEvent,
};
pub use host::WidgetHost;
pub use interaction::InteractionState;
pub use modal::ModalWindowStackEntry;
pub use popup::{MenuRequest, PopupStackEntry, PopupTransition};
pub use settings::{
    DRAG_TRIGGER_DISTANCE, InputSettings, MAX_DEFERRED_FOCUS_CHANGES, THROTTLE_DECAY_MS,
    THROTTLE_MIN_MOVE_DISTANCE, THROTTLE_VELOCITY_THRESHOLD, TOOLTIP_DELAY_MS, TOOLTIP_FADE_IN_MS,
    TOOLTIP_OFFSET_FROM_CURSOR, TOOLTIP_OFFSET_FROM_FORCE_FIELD,
};
