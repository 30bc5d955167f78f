// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform input entry points.
//!
//! Every `process_*` method returns whether some widget handled the event.

use alloc::collections::btree_map::Entry;
use alloc::vec::Vec;

use switchyard_event_state::drag::DragRequest;
use switchyard_focus::{FocusCause, Navigation};
use switchyard_responder::route;
use switchyard_responder::types::Dispatch;
use switchyard_tree::{Geometry, WidgetFlags, WidgetId, WidgetPath};

use crate::application::{Application, Delivery, ReplyContext, steps};
use crate::drag_drop::DragDropOperation;
use crate::event::{
    CharInput, ControllerInput, Key, KeyInput, Modifiers, PointerInput, TouchInput, WidgetEvent,
};
use crate::host::WidgetHost;

/// The longest prefix `a` shares with `b`, as a path into `a`.
fn common_prefix(a: &WidgetPath, b: &WidgetPath) -> WidgetPath {
    let shared = a.ids().zip(b.ids()).take_while(|(x, y)| x == y).count();
    match shared.checked_sub(1).and_then(|i| a.widgets().get(i)) {
        Some(last) => a.path_down_to(last.widget),
        None => WidgetPath::new(),
    }
}

/// Direct route to the leaf of a captor path.
fn to_leaf(path: &WidgetPath) -> Vec<Dispatch<WidgetId, Geometry>> {
    match path.leaf() {
        Some(leaf) => route::direct(leaf.widget, leaf.geometry),
        None => Vec::new(),
    }
}

impl<H: WidgetHost> Application<H> {
    // --- Pointer ------------------------------------------------------------

    /// Pointer moved.
    ///
    /// Drives drag detection and drag-over, hover enter/leave, the cursor and
    /// the tooltip. Captured pointers deliver only to their captor; hover is
    /// then limited to the part of the hit path shared with the captor.
    pub fn process_pointer_move(&mut self, input: PointerInput) -> bool {
        self.state.pointers.on_move(input.pointer, input.position);
        self.throttle_on_motion(&input);

        if self.drag_pointer() == Some(input.pointer) {
            return self.route_drag_over(&input);
        }

        let pressed = self.state.pointers.pressed(input.pointer);
        if let Some(request) = self
            .state
            .drag_drop
            .on_move(input.pointer, input.position, pressed)
        {
            let handled = self.deliver_drag_detected(&input, request);
            if self.drag_pointer() == Some(input.pointer) {
                return self.route_drag_over(&input) || handled;
            }
        }

        let captor = self.captor_path(input.pointer);
        let hit = self.locate_window_under_mouse(input.position);
        let ctx_path;
        let (route, hover) = if captor.is_empty() {
            ctx_path = hit;
            (route::bubble(steps(&ctx_path)), ctx_path.clone())
        } else {
            let hover = common_prefix(&hit, &captor);
            ctx_path = captor;
            (to_leaf(&ctx_path), hover)
        };
        self.update_hover(&hover, &input);

        let ctx = ReplyContext::pointer(&input, &ctx_path);
        let delivery = self.deliver(&route, &WidgetEvent::PointerMove(&input), &ctx);
        self.update_cursor(&ctx_path);
        self.refresh_tooltip_hover(&hover, input.position);
        delivery.handled
    }

    /// Feed the motion throttle. A pointer with a captor never engages it.
    fn throttle_on_motion(&mut self, input: &PointerInput) {
        if !self.settings.throttle_on_fast_motion {
            return;
        }
        if self.has_mouse_capture(input.pointer) {
            self.state.motion.forget(input.pointer);
            return;
        }
        let now = input.timestamp.unwrap_or(self.state.now);
        if self.state.motion.on_move(input.pointer, input.position, now) {
            tracing::debug!(pointer = ?input.pointer, position = ?input.position, "fast motion, throttling");
        }
    }

    /// Pointer button pressed.
    pub fn process_pointer_down(&mut self, input: PointerInput) -> bool {
        self.press(input, false)
    }

    /// Second press of a double click.
    pub fn process_double_click(&mut self, input: PointerInput) -> bool {
        self.press(input, true)
    }

    fn press(&mut self, input: PointerInput, double: bool) -> bool {
        if let Some(button) = input.button {
            self.state
                .pointers
                .on_down(input.pointer, button, input.position);
        }
        self.close_tooltip();

        let captor = self.captor_path(input.pointer);
        let captured = !captor.is_empty();
        let path = if captured {
            captor
        } else {
            self.locate_window_under_mouse(input.position)
        };
        self.dismiss_menus_for_click(&path);
        self.notify_click_outside(&path);
        if path.is_empty() {
            return false;
        }

        let route = if captured {
            to_leaf(&path)
        } else {
            route::tunnel_and_bubble(steps(&path))
        };
        let event = if double {
            WidgetEvent::DoubleClick(&input)
        } else {
            WidgetEvent::PointerDown(&input)
        };
        let ctx = ReplyContext::pointer(&input, &path);
        let delivery = self.deliver(&route, &event, &ctx);

        if !delivery.focus_requested && !double && !self.is_drag_dropping() {
            self.focus_on_press(&path);
        }
        if delivery.handled
            && !delivery.prevent_throttling
            && !delivery.end_interaction
            && let Entry::Vacant(slot) = self.state.press_throttles.entry(input.pointer)
        {
            slot.insert(self.state.throttle.request());
        }
        delivery.handled
    }

    /// Focus the leafmost focusable widget on a pressed path.
    fn focus_on_press(&mut self, path: &WidgetPath) {
        let target = path.ids().rev().find(|&w| {
            self.tree
                .flags(w)
                .is_some_and(|f| f.contains(WidgetFlags::FOCUSABLE))
        });
        if let Some(target) = target {
            self.set_keyboard_focus_to_path(&path.path_down_to(target), FocusCause::Mouse);
        }
    }

    /// Dismiss the popups a press on `path` does not land in or under.
    fn dismiss_menus_for_click(&mut self, path: &WidgetPath) {
        let window = path.window();
        let tree = &self.tree;
        let keep = self.state.popups.depth_kept_by(path, |w| {
            window.is_some_and(|pw| pw == w || tree.is_window_descendant(pw, w))
        });
        if keep < self.state.popups.len() {
            self.dismiss_menus_from(keep);
        }
    }

    /// Pointer button released.
    ///
    /// Ends a drag-drop on the dragging pointer with a drop.
    pub fn process_pointer_up(&mut self, input: PointerInput) -> bool {
        if let Some(button) = input.button {
            self.state
                .pointers
                .on_up(input.pointer, button, input.position);
            self.state.drag_drop.on_up(input.pointer, button);
        }

        let handled = if self.drag_pointer() == Some(input.pointer) {
            self.route_drop(&input)
        } else {
            let captor = self.captor_path(input.pointer);
            let (route, path) = if captor.is_empty() {
                let hit = self.locate_window_under_mouse(input.position);
                (route::bubble(steps(&hit)), hit)
            } else {
                (to_leaf(&captor), captor)
            };
            let ctx = ReplyContext::pointer(&input, &path);
            self.deliver(&route, &WidgetEvent::PointerUp(&input), &ctx)
                .handled
        };

        if self.state.pointers.pressed(input.pointer).is_empty() {
            self.state.release_press_throttle(input.pointer);
        }
        handled
    }

    /// Wheel scrolled.
    pub fn process_wheel(&mut self, input: PointerInput) -> bool {
        self.close_tooltip();
        let captor = self.captor_path(input.pointer);
        let (route, path) = if captor.is_empty() {
            let hit = self.locate_window_under_mouse(input.position);
            (route::bubble(steps(&hit)), hit)
        } else {
            (to_leaf(&captor), captor)
        };
        let ctx = ReplyContext::pointer(&input, &path);
        self.deliver(&route, &WidgetEvent::Wheel(&input), &ctx)
            .handled
    }

    fn deliver_drag_detected(&mut self, input: &PointerInput, request: DragRequest<WidgetId>) -> bool {
        let path = self.tree.path_to(request.target);
        let Some(leaf) = path.leaf() else {
            tracing::debug!(widget = ?request.target, "drag source went away");
            return false;
        };
        let route = route::direct(leaf.widget, leaf.geometry);
        let event = WidgetEvent::DragDetected {
            input,
            button: request.button,
        };
        let ctx = ReplyContext {
            pointer: Some(input.pointer),
            position: request.origin,
            path: &path,
        };
        self.deliver(&route, &event, &ctx).handled
    }

    /// Deliver drag-over to the widgets under the dragging pointer.
    fn route_drag_over(&mut self, input: &PointerInput) -> bool {
        let hit = self.locate_window_under_mouse(input.position);
        self.update_hover(&hit, input);
        let Some(op) = self.state.drag_drop.lend() else {
            return false;
        };
        let route = route::bubble(steps(&hit));
        let ctx = ReplyContext::pointer(input, &hit);
        let event = WidgetEvent::DragOver {
            payload: &op.payload,
            input,
        };
        let delivery = self.deliver(&route, &event, &ctx);
        if let Some(ended) = self.state.drag_drop.restore(op) {
            self.abandon_drag(ended);
        }
        self.update_cursor(&hit);
        delivery.handled
    }

    /// Deliver the drop and finish the operation.
    fn route_drop(&mut self, input: &PointerInput) -> bool {
        let hit = self.locate_window_under_mouse(input.position);
        let Some(op) = self.state.drag_drop.lend() else {
            return false;
        };
        let route = route::bubble(steps(&hit));
        let ctx = ReplyContext::pointer(input, &hit);
        let event = WidgetEvent::Drop {
            payload: &op.payload,
            input,
        };
        let delivery = self.deliver(&route, &event, &ctx);
        let finished = self
            .state
            .drag_drop
            .restore(op)
            .or_else(|| self.state.drag_drop.take());
        if let Some(op) = finished {
            self.finish_drop(op, delivery.handled);
        }
        self.update_hover(&hit, input);
        delivery.handled
    }

    // --- External drag and drop ---------------------------------------------

    /// A drag from another application entered one of our windows.
    ///
    /// Refused, with the payload handed back, while another drag is in flight.
    pub fn process_external_drag_enter(&mut self, payload: H::Payload, input: PointerInput) -> bool {
        if self.is_drag_dropping() {
            tracing::warn!("external drag refused, another drag is in flight");
            self.host.on_drop_finished(payload, false);
            return false;
        }
        self.state.pointers.on_move(input.pointer, input.position);
        self.update_hover(&WidgetPath::new(), &input);
        self.close_tooltip();
        let operation = DragDropOperation {
            payload,
            source: None,
            pointer: input.pointer,
        };
        if let Err(payload) = self.state.drag_drop.begin(operation) {
            self.host.on_drop_finished(payload, false);
            return false;
        }
        self.route_drag_over(&input)
    }

    /// An external drag moved.
    pub fn process_external_drag_over(&mut self, input: PointerInput) -> bool {
        if !self.is_drag_dropping() {
            return false;
        }
        self.state.pointers.on_move(input.pointer, input.position);
        self.route_drag_over(&input)
    }

    /// An external drag left our windows.
    pub fn process_external_drag_leave(&mut self) -> bool {
        self.cancel_drag_drop()
    }

    /// An external drag was released over our windows.
    pub fn process_external_drop(&mut self, input: PointerInput) -> bool {
        if !self.is_drag_dropping() {
            return false;
        }
        self.route_drop(&input)
    }

    // --- Touch --------------------------------------------------------------

    /// A touch contact began. Routed as a left press.
    pub fn process_touch_start(&mut self, touch: TouchInput) -> bool {
        self.press(touch.to_pointer(), false)
    }

    /// A touch contact moved.
    pub fn process_touch_move(&mut self, touch: TouchInput) -> bool {
        self.process_pointer_move(touch.to_pointer())
    }

    /// A touch contact ended. Its capture and tracking state go with it.
    pub fn process_touch_end(&mut self, touch: TouchInput) -> bool {
        let input = touch.to_pointer();
        let handled = self.process_pointer_up(input);
        self.release_mouse_capture(input.pointer);
        if self.drag_pointer() != Some(input.pointer) {
            self.update_hover(&WidgetPath::new(), &input);
        }
        self.state.pointers.remove(input.pointer);
        self.state.motion.forget(input.pointer);
        self.state.drag_drop.cancel_detection_for(input.pointer);
        handled
    }

    // --- Keyboard -----------------------------------------------------------

    /// Key pressed.
    ///
    /// Escape cancels an in-app drag. Unhandled Tab and arrow keys move focus;
    /// anything else unhandled goes to
    /// [`WidgetHost::on_unhandled_key_down`].
    pub fn process_key_down(&mut self, input: KeyInput) -> bool {
        if self.is_external_modal_active() {
            return false;
        }
        if input.key == Key::Escape
            && self
                .state
                .drag_drop
                .operation()
                .is_some_and(|op| !op.is_external())
        {
            return self.cancel_drag_drop();
        }
        self.close_tooltip();

        let path = self.focused_path();
        if !path.is_empty() {
            let route = route::tunnel_and_bubble(steps(&path));
            let ctx = ReplyContext::keyboard(&path);
            if self.deliver(&route, &WidgetEvent::KeyDown(&input), &ctx).handled {
                return true;
            }
        }

        let navigation = match input.key {
            Key::Tab if input.modifiers.contains(Modifiers::SHIFT) => Some(Navigation::Prev),
            Key::Tab => Some(Navigation::Next),
            Key::ArrowUp => Some(Navigation::Up),
            Key::ArrowDown => Some(Navigation::Down),
            Key::ArrowLeft => Some(Navigation::Left),
            Key::ArrowRight => Some(Navigation::Right),
            _ => None,
        };
        if let Some(navigation) = navigation
            && self.navigate_focus(navigation)
        {
            return true;
        }
        self.host.on_unhandled_key_down(&input)
    }

    /// Key released.
    pub fn process_key_up(&mut self, input: KeyInput) -> bool {
        if self.is_external_modal_active() {
            return false;
        }
        let path = self.focused_path();
        let route = route::tunnel_and_bubble(steps(&path));
        let ctx = ReplyContext::keyboard(&path);
        self.deliver(&route, &WidgetEvent::KeyUp(&input), &ctx)
            .handled
    }

    /// Character typed.
    pub fn process_key_char(&mut self, input: CharInput) -> bool {
        if self.is_external_modal_active() {
            return false;
        }
        let path = self.focused_path();
        let route = route::bubble(steps(&path));
        let ctx = ReplyContext::keyboard(&path);
        self.deliver(&route, &WidgetEvent::KeyChar(&input), &ctx)
            .handled
    }

    // --- Controller ---------------------------------------------------------

    /// Controller button pressed.
    pub fn process_controller_button_down(&mut self, input: ControllerInput) -> bool {
        self.route_controller(input.user, &WidgetEvent::ControllerButtonDown(&input))
    }

    /// Controller button released.
    pub fn process_controller_button_up(&mut self, input: ControllerInput) -> bool {
        self.route_controller(input.user, &WidgetEvent::ControllerButtonUp(&input))
    }

    /// Controller axis moved.
    pub fn process_controller_analog(&mut self, input: ControllerInput) -> bool {
        self.route_controller(input.user, &WidgetEvent::ControllerAnalog(&input))
    }

    /// To the user's controller captor, or along the focus path.
    fn route_controller(&mut self, user: u32, event: &WidgetEvent<'_, H::Payload>) -> bool {
        if self.is_external_modal_active() {
            return false;
        }
        let captor = self.state.capture.resolve_controller(&self.tree, user);
        let (route, path) = if captor.is_empty() {
            let focused = self.focused_path();
            (route::bubble(steps(&focused)), focused)
        } else {
            (to_leaf(&captor), captor)
        };
        let ctx = ReplyContext::keyboard(&path);
        let Delivery { handled, .. } = self.deliver(&route, event, &ctx);
        handled
    }

    // --- Click outside ------------------------------------------------------

    /// Ask to be told about presses that land outside `widget`.
    pub fn register_click_outside(&mut self, widget: WidgetId) {
        self.state.click_outside.insert(widget);
    }

    /// Stop click-outside notifications for `widget`.
    pub fn unregister_click_outside(&mut self, widget: WidgetId) -> bool {
        self.state.click_outside.remove(&widget)
    }

    fn notify_click_outside(&mut self, path: &WidgetPath) {
        let tree = &self.tree;
        self.state.click_outside.retain(|&w| tree.is_alive(w));
        let mut outside: Vec<WidgetId> = self
            .state
            .click_outside
            .iter()
            .copied()
            .filter(|&w| !path.contains(w))
            .collect();
        outside.sort();
        for widget in outside {
            self.host.on_clicked_outside(widget);
        }
    }
}
