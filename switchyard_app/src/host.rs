// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size};
use switchyard_event_state::pointer::PointerId;
use switchyard_focus::FocusCause;
use switchyard_responder::reply::Reply;
use switchyard_responder::types::Phase;
use switchyard_tree::{Geometry, WidgetId};

use crate::event::{CursorIcon, KeyInput, WidgetEvent};

/// The widget layer, as seen by the dispatcher.
///
/// Widgets are identified by [`WidgetId`] and live in the application's
/// [`Tree`](switchyard_tree::Tree); everything else about them (state, paint,
/// behavior) lives behind this trait. Only [`on_event`](Self::on_event) is
/// required.
pub trait WidgetHost {
    /// Drag-drop payload type.
    type Payload;

    /// Deliver `event` to `widget` and return its reply.
    fn on_event(
        &mut self,
        widget: WidgetId,
        geometry: &Geometry,
        phase: Phase,
        event: &WidgetEvent<'_, Self::Payload>,
    ) -> Reply<WidgetId, Self::Payload>;

    /// Cursor the widget wants while hovered, or `None` to defer to its parent.
    fn cursor(&self, widget: WidgetId) -> Option<CursorIcon> {
        let _ = widget;
        None
    }

    /// Whether the widget offers a tooltip.
    fn has_tooltip(&self, widget: WidgetId) -> bool {
        let _ = widget;
        false
    }

    /// Whether tooltips should be pushed out of the widget's rectangle.
    fn has_tooltip_force_field(&self, widget: WidgetId) -> bool {
        let _ = widget;
        false
    }

    /// Size of the tooltip the widget would show, for placement.
    fn tooltip_size(&self, widget: WidgetId) -> Size {
        let _ = widget;
        Size::ZERO
    }

    /// The widget lost pointer capture.
    fn on_capture_lost(&mut self, widget: WidgetId, pointer: PointerId) {
        let _ = (widget, pointer);
    }

    /// Focus is moving into or out of the widget's subtree.
    fn on_focus_changing(&mut self, widget: WidgetId, cause: FocusCause) {
        let _ = (widget, cause);
    }

    /// The widget lost keyboard focus.
    fn on_focus_lost(&mut self, widget: WidgetId, cause: FocusCause) {
        let _ = (widget, cause);
    }

    /// The widget received keyboard focus.
    fn on_focus_received(
        &mut self,
        widget: WidgetId,
        geometry: &Geometry,
        cause: FocusCause,
    ) -> Reply<WidgetId, Self::Payload> {
        let _ = (widget, geometry, cause);
        Reply::unhandled()
    }

    /// A popup window was dismissed.
    fn on_popup_dismissed(&mut self, window: WidgetId) {
        let _ = window;
    }

    /// A drag-drop finished; the payload is handed back.
    fn on_drop_finished(&mut self, payload: Self::Payload, accepted: bool) {
        let _ = (payload, accepted);
    }

    /// The modal stack became non-empty (`true`) or empty (`false`).
    fn on_modal_stack_changed(&mut self, active: bool) {
        let _ = active;
    }

    /// A tooltip opened for `source` at `position`.
    fn on_tooltip_opened(&mut self, source: WidgetId, position: Point) {
        let _ = (source, position);
    }

    /// The tooltip for `source` closed.
    fn on_tooltip_closed(&mut self, source: WidgetId) {
        let _ = source;
    }

    /// A press landed outside a widget subscribed with
    /// [`Application::register_click_outside`](crate::Application::register_click_outside).
    fn on_clicked_outside(&mut self, widget: WidgetId) {
        let _ = widget;
    }

    /// Nothing on the focus path handled a key press. Return `true` to consume it.
    fn on_unhandled_key_down(&mut self, key: &KeyInput) -> bool {
        let _ = key;
        false
    }
}
