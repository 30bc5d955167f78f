// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded platform input and the events delivered to widgets.

use kurbo::{Point, Size, Vec2};
use switchyard_event_state::pointer::{MouseButton, PointerId};
use switchyard_event_state::tooltip::RepelDirection;
use switchyard_focus::FocusCause;
use switchyard_tree::WidgetId;

bitflags::bitflags! {
    /// Keyboard modifiers held during an event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Either shift key.
        const SHIFT   = 0b0001;
        /// Either control key.
        const CONTROL = 0b0010;
        /// Either alt/option key.
        const ALT     = 0b0100;
        /// Either command/windows key.
        const META    = 0b1000;
    }
}

/// A pointer event from the mouse or a touch contact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerInput {
    /// Pointer the event belongs to.
    pub pointer: PointerId,
    /// Screen position.
    pub position: Point,
    /// Button that changed, for presses and releases.
    pub button: Option<MouseButton>,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// Wheel delta, for wheel events.
    pub wheel_delta: Vec2,
    /// Synthesized from touch input.
    pub is_touch: bool,
    /// Platform timestamp in milliseconds, on the same clock as
    /// [`Application::tick`](crate::Application::tick). Events without one
    /// are stamped with the last tick.
    pub timestamp: Option<u64>,
}

impl PointerInput {
    /// A mouse event at `position`.
    pub fn mouse(position: Point) -> Self {
        Self {
            pointer: PointerId::MOUSE,
            position,
            button: None,
            modifiers: Modifiers::empty(),
            wheel_delta: Vec2::ZERO,
            is_touch: false,
            timestamp: None,
        }
    }

    /// Set the platform timestamp.
    #[must_use]
    pub fn at_time(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the changed button.
    #[must_use]
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    /// Set the held modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the wheel delta.
    #[must_use]
    pub fn with_wheel_delta(mut self, delta: Vec2) -> Self {
        self.wheel_delta = delta;
        self
    }
}

/// A touch contact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchInput {
    /// Contact id. Touch contacts use pointer ids starting above the mouse.
    pub touch_id: u32,
    /// Screen position.
    pub position: Point,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl TouchInput {
    /// Pointer id this contact is routed under.
    pub fn pointer(&self) -> PointerId {
        PointerId(self.touch_id.saturating_add(1))
    }

    pub(crate) fn to_pointer(self) -> PointerInput {
        PointerInput {
            pointer: self.pointer(),
            position: self.position,
            button: Some(MouseButton::Left),
            modifiers: self.modifiers,
            wheel_delta: Vec2::ZERO,
            is_touch: true,
            timestamp: None,
        }
    }
}

/// A key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Tab.
    Tab,
    /// Escape.
    Escape,
    /// Enter/Return.
    Enter,
    /// Space bar.
    Space,
    /// Arrow up.
    ArrowUp,
    /// Arrow down.
    ArrowDown,
    /// Arrow left.
    ArrowLeft,
    /// Arrow right.
    ArrowRight,
    /// A key producing a character.
    Character(char),
    /// Any other key, by platform code.
    Other(u32),
}

/// A key press or release.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// Key.
    pub key: Key,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// Auto-repeat.
    pub is_repeat: bool,
}

impl KeyInput {
    /// A non-repeating key event without modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            is_repeat: false,
        }
    }

    /// Set the held modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A typed character.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CharInput {
    /// Character.
    pub character: char,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

/// A gamepad button or analog axis event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControllerInput {
    /// Local user index of the controller.
    pub user: u32,
    /// Host-defined button or axis code.
    pub control: u32,
    /// Axis value for analog events, `1.0` or `0.0` for buttons.
    pub value: f64,
}

/// Cursor shape a widget asks for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorIcon {
    /// Platform arrow.
    #[default]
    Default,
    /// Pointing hand.
    Hand,
    /// Text caret.
    Text,
    /// Open hand.
    Grab,
    /// Closed hand.
    Grabbing,
    /// Horizontal resize.
    ResizeLeftRight,
    /// Vertical resize.
    ResizeUpDown,
    /// Action not allowed.
    NotAllowed,
    /// Hidden cursor.
    None,
}

/// How a window came to be activated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActivationCause {
    /// The user clicked it.
    Mouse,
    /// Anything else: keyboard switching, programmatic activation.
    Other,
}

impl ActivationCause {
    pub(crate) fn focus_cause(self) -> FocusCause {
        match self {
            Self::Mouse => FocusCause::Mouse,
            Self::Other => FocusCause::WindowActivate,
        }
    }
}

/// An event delivered to a widget through [`WidgetHost::on_event`](crate::WidgetHost::on_event).
///
/// Drag events borrow the payload of the operation in flight.
#[derive(Debug)]
pub enum WidgetEvent<'a, P> {
    /// Pointer moved.
    PointerMove(&'a PointerInput),
    /// Pointer button pressed.
    PointerDown(&'a PointerInput),
    /// Pointer button released.
    PointerUp(&'a PointerInput),
    /// Double click.
    DoubleClick(&'a PointerInput),
    /// Wheel.
    Wheel(&'a PointerInput),
    /// The pointer entered this widget.
    PointerEnter(&'a PointerInput),
    /// The pointer left this widget.
    PointerLeave(&'a PointerInput),
    /// The pointer moved far enough from a press for a drag; reply with
    /// [`Reply::begin_drag`](switchyard_responder::reply::Reply::begin_drag) to start one.
    DragDetected {
        /// The move that crossed the threshold.
        input: &'a PointerInput,
        /// Button the detection was for.
        button: MouseButton,
    },
    /// A drag entered this widget.
    DragEnter {
        /// Payload in flight.
        payload: &'a P,
        /// Pointer state.
        input: &'a PointerInput,
    },
    /// A drag moved over this widget.
    DragOver {
        /// Payload in flight.
        payload: &'a P,
        /// Pointer state.
        input: &'a PointerInput,
    },
    /// A drag left this widget.
    DragLeave {
        /// Payload in flight.
        payload: &'a P,
        /// Pointer state.
        input: &'a PointerInput,
    },
    /// The payload was released over this widget.
    Drop {
        /// Payload in flight.
        payload: &'a P,
        /// Pointer state.
        input: &'a PointerInput,
    },
    /// Key pressed.
    KeyDown(&'a KeyInput),
    /// Key released.
    KeyUp(&'a KeyInput),
    /// Character typed.
    KeyChar(&'a CharInput),
    /// Controller button pressed.
    ControllerButtonDown(&'a ControllerInput),
    /// Controller button released.
    ControllerButtonUp(&'a ControllerInput),
    /// Controller axis moved.
    ControllerAnalog(&'a ControllerInput),
    /// The window this widget belongs to changed size.
    WindowResized(Size),
}

/// Where a tooltip is and how opaque it is.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TooltipState {
    /// Widget the tooltip belongs to.
    pub source: WidgetId,
    /// Screen position of the tooltip's top-left corner.
    pub position: Point,
    /// When it opened, in milliseconds.
    pub shown_at: u64,
    /// Time to reach full opacity, in milliseconds.
    pub fade_in: u64,
    /// Fade-in progress in `0.0..=1.0`.
    pub opacity: f64,
    /// Side the tooltip was pushed to out of a force field. Fixed while it
    /// stays open.
    pub repel: RepelDirection,
}
