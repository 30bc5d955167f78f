// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end dispatch tests against a recording host.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};
use switchyard_event_state::drag::DragPhase;
use switchyard_event_state::pointer::{MouseButton, PointerId};
use switchyard_event_state::tooltip::RepelDirection;
use switchyard_focus::FocusCause;
use switchyard_responder::reply::Reply;
use switchyard_responder::types::Phase;
use switchyard_tree::{Geometry, LocalWidget, WidgetFlags, WidgetId};

use crate::{
    ActivationCause, Application, CharInput, ControllerInput, CursorIcon, InputSettings,
    InteractionError, Key, KeyInput, MenuRequest, Modifiers, PointerInput, TOOLTIP_FADE_IN_MS,
    TouchInput, WidgetEvent, WidgetHost,
};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Event(WidgetId, Phase, &'static str),
    CaptureLost(WidgetId),
    FocusChanging(WidgetId),
    FocusLost(WidgetId),
    FocusReceived(WidgetId),
    PopupDismissed(WidgetId),
    DropFinished(u32, bool),
    ModalStack(bool),
    TooltipOpened(WidgetId),
    TooltipClosed(WidgetId),
    ClickedOutside(WidgetId),
}

fn kind(event: &WidgetEvent<'_, u32>) -> &'static str {
    match event {
        WidgetEvent::PointerMove(_) => "move",
        WidgetEvent::PointerDown(_) => "down",
        WidgetEvent::PointerUp(_) => "up",
        WidgetEvent::DoubleClick(_) => "double",
        WidgetEvent::Wheel(_) => "wheel",
        WidgetEvent::PointerEnter(_) => "enter",
        WidgetEvent::PointerLeave(_) => "leave",
        WidgetEvent::DragDetected { .. } => "drag_detected",
        WidgetEvent::DragEnter { .. } => "drag_enter",
        WidgetEvent::DragOver { .. } => "drag_over",
        WidgetEvent::DragLeave { .. } => "drag_leave",
        WidgetEvent::Drop { .. } => "drop",
        WidgetEvent::KeyDown(_) => "key_down",
        WidgetEvent::KeyUp(_) => "key_up",
        WidgetEvent::KeyChar(_) => "char",
        WidgetEvent::ControllerButtonDown(_)
        | WidgetEvent::ControllerButtonUp(_)
        | WidgetEvent::ControllerAnalog(_) => "controller",
        WidgetEvent::WindowResized(_) => "resized",
    }
}

#[derive(Default)]
struct Recorder {
    log: Vec<Call>,
    capture_on_down: Option<WidgetId>,
    detect_on_down: Option<WidgetId>,
    drag_payload: Option<u32>,
    accept_drop: Option<WidgetId>,
    tooltips: Vec<WidgetId>,
    force_fields: Vec<WidgetId>,
    focus_on_drag_leave: Option<WidgetId>,
    steal_focus: Option<(WidgetId, WidgetId)>,
    controller_captor: Option<WidgetId>,
}

impl Recorder {
    fn events(&self, name: &str) -> Vec<WidgetId> {
        self.log
            .iter()
            .filter_map(|c| match c {
                Call::Event(w, _, n) if *n == name => Some(*w),
                _ => None,
            })
            .collect()
    }

    fn count(&self, call: &Call) -> usize {
        self.log.iter().filter(|c| *c == call).count()
    }
}

impl WidgetHost for Recorder {
    type Payload = u32;

    fn on_event(
        &mut self,
        widget: WidgetId,
        _: &Geometry,
        phase: Phase,
        event: &WidgetEvent<'_, u32>,
    ) -> Reply<WidgetId, u32> {
        self.log.push(Call::Event(widget, phase, kind(event)));
        if phase != Phase::Bubble {
            return Reply::unhandled();
        }
        match event {
            WidgetEvent::PointerDown(_) if self.capture_on_down == Some(widget) => {
                Reply::handled().capture_mouse(widget)
            }
            WidgetEvent::PointerDown(_) if self.detect_on_down == Some(widget) => {
                Reply::handled().detect_drag(widget, MouseButton::Left)
            }
            WidgetEvent::DragDetected { .. } => match self.drag_payload {
                Some(payload) => Reply::handled().begin_drag(payload),
                None => Reply::unhandled(),
            },
            WidgetEvent::Drop { .. } if self.accept_drop == Some(widget) => Reply::handled(),
            WidgetEvent::DragLeave { .. } if self.focus_on_drag_leave == Some(widget) => {
                Reply::unhandled().set_focus(widget, FocusCause::SetDirectly)
            }
            WidgetEvent::ControllerButtonDown(input) if self.controller_captor == Some(widget) => {
                Reply::handled().capture_controller(input.user, widget)
            }
            _ => Reply::unhandled(),
        }
    }

    fn has_tooltip(&self, widget: WidgetId) -> bool {
        self.tooltips.contains(&widget)
    }

    fn has_tooltip_force_field(&self, widget: WidgetId) -> bool {
        self.force_fields.contains(&widget)
    }

    fn on_capture_lost(&mut self, widget: WidgetId, _: PointerId) {
        self.log.push(Call::CaptureLost(widget));
    }

    fn on_focus_changing(&mut self, widget: WidgetId, _: FocusCause) {
        self.log.push(Call::FocusChanging(widget));
    }

    fn on_focus_lost(&mut self, widget: WidgetId, _: FocusCause) {
        self.log.push(Call::FocusLost(widget));
    }

    fn on_focus_received(
        &mut self,
        widget: WidgetId,
        _: &Geometry,
        _: FocusCause,
    ) -> Reply<WidgetId, u32> {
        self.log.push(Call::FocusReceived(widget));
        match self.steal_focus {
            Some((from, to)) if from == widget => {
                self.steal_focus = None;
                Reply::unhandled().set_focus(to, FocusCause::SetDirectly)
            }
            _ => Reply::unhandled(),
        }
    }

    fn on_popup_dismissed(&mut self, window: WidgetId) {
        self.log.push(Call::PopupDismissed(window));
    }

    fn on_drop_finished(&mut self, payload: u32, accepted: bool) {
        self.log.push(Call::DropFinished(payload, accepted));
    }

    fn on_modal_stack_changed(&mut self, active: bool) {
        self.log.push(Call::ModalStack(active));
    }

    fn on_tooltip_opened(&mut self, source: WidgetId, _: Point) {
        self.log.push(Call::TooltipOpened(source));
    }

    fn on_tooltip_closed(&mut self, source: WidgetId) {
        self.log.push(Call::TooltipClosed(source));
    }

    fn on_clicked_outside(&mut self, widget: WidgetId) {
        self.log.push(Call::ClickedOutside(widget));
    }
}

/// Main window 400x300 with a panel holding focusable buttons `a` and `b`,
/// and a plain area `c` on the right.
struct Fixture {
    app: Application<Recorder>,
    main: WidgetId,
    panel: WidgetId,
    a: WidgetId,
    b: WidgetId,
    c: WidgetId,
}

fn widget(bounds: Rect) -> LocalWidget {
    LocalWidget {
        local_bounds: bounds,
        ..LocalWidget::default()
    }
}

fn focusable(bounds: Rect) -> LocalWidget {
    LocalWidget {
        local_bounds: bounds,
        flags: WidgetFlags::default() | WidgetFlags::FOCUSABLE,
        ..LocalWidget::default()
    }
}

fn fixture() -> Fixture {
    let mut app = Application::new(Recorder::default());
    let tree = app.tree_mut();
    let main = tree.insert_window(None, widget(Rect::new(0.0, 0.0, 400.0, 300.0)));
    let panel = tree.insert(Some(main), widget(Rect::new(0.0, 0.0, 200.0, 300.0)));
    let a = tree.insert(Some(panel), focusable(Rect::new(10.0, 10.0, 60.0, 30.0)));
    let b = tree.insert(Some(panel), focusable(Rect::new(10.0, 50.0, 60.0, 70.0)));
    let c = tree.insert(Some(main), widget(Rect::new(250.0, 0.0, 400.0, 300.0)));
    Fixture {
        app,
        main,
        panel,
        a,
        b,
        c,
    }
}

impl Fixture {
    fn window(&mut self, bounds: Rect) -> WidgetId {
        self.app.tree_mut().insert_window(None, widget(bounds))
    }

    fn clear_log(&mut self) {
        self.app.host_mut().log.clear();
    }

    fn log(&self) -> &[Call] {
        &self.app.host().log
    }
}

fn at(x: f64, y: f64) -> PointerInput {
    PointerInput::mouse(Point::new(x, y))
}

fn left(x: f64, y: f64) -> PointerInput {
    at(x, y).with_button(MouseButton::Left)
}

#[test]
fn press_on_empty_space_dismisses_popups_and_captures_nothing() {
    let mut f = fixture();
    let popup = f.window(Rect::new(500.0, 0.0, 600.0, 100.0));
    f.app.push_menu(MenuRequest::new(popup)).unwrap();

    assert!(f.app.locate_window_under_mouse(Point::new(1000.0, 1000.0)).is_empty());
    assert!(!f.app.process_pointer_down(left(1000.0, 1000.0)));
    assert_eq!(f.app.mouse_captor(PointerId::MOUSE), None);
    assert!(f.app.popup_stack().is_empty());
    assert_eq!(f.app.host().count(&Call::PopupDismissed(popup)), 1);
    assert!(!f.app.tree().is_alive(popup));
}

#[test]
fn captured_moves_go_to_the_captor() {
    let mut f = fixture();
    f.app.host_mut().capture_on_down = Some(f.a);
    assert!(f.app.process_pointer_down(left(20.0, 20.0)));
    assert_eq!(f.app.mouse_captor(PointerId::MOUSE), Some(f.a));
    f.clear_log();

    f.app.process_pointer_move(at(300.0, 100.0));
    assert_eq!(f.app.host().events("move"), vec![f.a]);
    assert!(!f.app.host().events("enter").contains(&f.c));
    // Hover is limited to what the hit path shares with the captor.
    assert_eq!(f.app.widgets_under_cursor().ids().collect::<Vec<_>>(), vec![f.main]);
}

#[test]
fn nested_popups_survive_inner_clicks_and_close_top_down() {
    let mut f = fixture();
    let outer = f.window(Rect::new(500.0, 0.0, 600.0, 100.0));
    let inner = f.window(Rect::new(600.0, 0.0, 700.0, 100.0));
    f.app.push_menu(MenuRequest::new(outer)).unwrap();
    f.app
        .push_menu(MenuRequest::new(inner).with_parent(outer))
        .unwrap();
    assert_eq!(f.app.popup_stack().len(), 2);

    f.app.process_pointer_down(left(650.0, 50.0));
    f.app.process_pointer_up(left(650.0, 50.0));
    assert_eq!(f.app.popup_stack().len(), 2);

    f.clear_log();
    f.app.process_pointer_down(left(300.0, 200.0));
    let dismissed: Vec<&Call> = f
        .log()
        .iter()
        .filter(|c| matches!(c, Call::PopupDismissed(_)))
        .collect();
    assert_eq!(
        dismissed,
        vec![&Call::PopupDismissed(inner), &Call::PopupDismissed(outer)]
    );
    assert!(f.app.popup_stack().is_empty());
}

#[test]
fn modal_window_blocks_its_parent() {
    let mut f = fixture();
    let modal = f.window(Rect::new(500.0, 0.0, 600.0, 100.0));
    f.app.add_modal_window(modal, Some(f.main)).unwrap();
    assert_eq!(f.app.host().count(&Call::ModalStack(true)), 1);
    assert_eq!(f.app.active_modal_window(), Some(modal));
    assert_eq!(f.app.keyboard_focus(), Some(modal));

    assert!(f.app.locate_window_under_mouse(Point::new(20.0, 20.0)).is_empty());
    f.clear_log();
    assert!(!f.app.process_pointer_down(left(20.0, 20.0)));
    assert!(f.app.host().events("down").is_empty());
    assert!(!f.app.process_window_activated(f.main, ActivationCause::Mouse));

    assert!(f.app.close_modal_window(modal));
    assert!(!f.app.close_modal_window(modal));
    assert_eq!(f.app.host().count(&Call::ModalStack(false)), 1);
    assert_eq!(f.app.keyboard_focus(), Some(f.main));
    assert!(!f.app.locate_window_under_mouse(Point::new(20.0, 20.0)).is_empty());
}

#[test]
fn modal_cannot_be_added_twice() {
    let mut f = fixture();
    let modal = f.window(Rect::new(500.0, 0.0, 600.0, 100.0));
    f.app.add_modal_window(modal, None).unwrap();
    assert_eq!(
        f.app.add_modal_window(modal, None),
        Err(InteractionError::ModalAlreadyOnStack(modal))
    );
    assert_eq!(
        f.app.add_modal_window(f.a, None),
        Err(InteractionError::NotAWindow(f.a))
    );
}

#[test]
fn run_modal_pumps_until_closed() {
    let mut f = fixture();
    let modal = f.window(Rect::new(500.0, 0.0, 600.0, 100.0));
    let mut pumps = 0;
    f.app
        .run_modal(modal, Some(f.main), |app| {
            pumps += 1;
            app.tick(pumps * 10);
            if pumps == 3 {
                app.close_modal_window(modal);
            }
            core::ops::ControlFlow::Continue(())
        })
        .unwrap();
    assert_eq!(pumps, 3);
    assert!(f.app.modal_stack().is_empty());
    assert_eq!(f.app.host().count(&Call::ModalStack(false)), 1);
}

#[test]
fn new_captor_notifies_the_previous_one_once() {
    let mut f = fixture();
    f.app.set_mouse_captor(PointerId::MOUSE, f.a).unwrap();
    f.app.set_mouse_captor(PointerId::MOUSE, f.b).unwrap();
    f.app.set_mouse_captor(PointerId::MOUSE, f.b).unwrap();
    assert_eq!(f.app.host().count(&Call::CaptureLost(f.a)), 1);
    assert_eq!(f.app.host().count(&Call::CaptureLost(f.b)), 0);
    assert_eq!(f.app.mouse_captor(PointerId::MOUSE), Some(f.b));
}

#[test]
fn releasing_capture_twice_is_releasing_once() {
    let mut f = fixture();
    f.app.set_mouse_captor(PointerId::MOUSE, f.a).unwrap();
    assert!(f.app.has_mouse_capture(PointerId::MOUSE));
    assert!(f.app.release_mouse_capture(PointerId::MOUSE));
    assert!(!f.app.release_mouse_capture(PointerId::MOUSE));
    assert!(!f.app.has_mouse_capture(PointerId::MOUSE));
    assert_eq!(f.app.host().count(&Call::CaptureLost(f.a)), 1);
}

#[test]
fn removed_captor_is_released_on_next_use() {
    let mut f = fixture();
    f.app.set_mouse_captor(PointerId::MOUSE, f.a).unwrap();
    f.app.tree_mut().remove(f.a);
    assert_eq!(f.app.mouse_captor(PointerId::MOUSE), None);
    assert_eq!(f.app.mouse_captor(PointerId::MOUSE), None);
    assert_eq!(f.app.host().count(&Call::CaptureLost(f.a)), 1);
}

#[test]
fn focus_moves_and_decays() {
    let mut f = fixture();
    f.app.set_keyboard_focus(f.a, FocusCause::SetDirectly).unwrap();
    f.app.set_keyboard_focus(f.b, FocusCause::SetDirectly).unwrap();
    assert_eq!(f.app.host().count(&Call::FocusLost(f.a)), 1);
    assert_eq!(f.app.host().count(&Call::FocusReceived(f.b)), 1);
    assert!(f.app.has_focused_descendants(f.panel));
    assert!(!f.app.has_focused_descendants(f.b));
    assert_eq!(f.app.focused_path().window(), Some(f.main));

    f.app.tree_mut().remove(f.b);
    assert_eq!(f.app.keyboard_focus(), None);
    assert!(f.app.focused_path().is_empty());
    f.app.tick(1);
    assert_eq!(f.app.focus_cause(), FocusCause::Cleared);
}

#[test]
fn clearing_focus_twice_is_clearing_once() {
    let mut f = fixture();
    f.app.set_keyboard_focus(f.a, FocusCause::SetDirectly).unwrap();
    f.app.clear_keyboard_focus(FocusCause::Cleared);
    f.app.clear_keyboard_focus(FocusCause::Cleared);
    assert_eq!(f.app.host().count(&Call::FocusLost(f.a)), 1);
    assert_eq!(f.app.keyboard_focus(), None);
}

#[test]
fn focus_stolen_during_a_change_is_deferred_to_the_next_tick() {
    let mut f = fixture();
    f.app.host_mut().steal_focus = Some((f.a, f.b));
    f.app.set_keyboard_focus(f.a, FocusCause::SetDirectly).unwrap();
    assert_eq!(f.app.keyboard_focus(), Some(f.a));
    f.app.tick(1);
    assert_eq!(f.app.keyboard_focus(), Some(f.b));
    assert_eq!(f.app.focus_cause(), FocusCause::SetDirectly);
}

#[test]
fn dismissing_all_menus_twice_is_dismissing_once() {
    let mut f = fixture();
    let popup = f.window(Rect::new(500.0, 0.0, 600.0, 100.0));
    f.app.push_menu(MenuRequest::new(popup)).unwrap();
    f.app.dismiss_all_menus();
    f.app.dismiss_all_menus();
    assert_eq!(f.app.host().count(&Call::PopupDismissed(popup)), 1);
}

#[test]
fn popup_with_a_closed_parent_resets_the_stack() {
    let mut f = fixture();
    let outer = f.window(Rect::new(500.0, 0.0, 600.0, 100.0));
    let stray = f.window(Rect::new(700.0, 0.0, 800.0, 100.0));
    let inner = f.window(Rect::new(600.0, 0.0, 700.0, 100.0));
    f.app.push_menu(MenuRequest::new(outer)).unwrap();
    assert_eq!(
        f.app.push_menu(MenuRequest::new(inner).with_parent(stray)),
        Err(InteractionError::PopupParentNotOnStack(stray))
    );
    assert!(f.app.popup_stack().is_empty());
    assert_eq!(f.app.host().count(&Call::PopupDismissed(outer)), 1);
}

#[test]
fn pushing_an_open_popup_again_keeps_it_alive() {
    let mut f = fixture();
    let outer = f.window(Rect::new(500.0, 0.0, 600.0, 100.0));
    let inner = f.window(Rect::new(600.0, 0.0, 700.0, 100.0));
    f.app.push_menu(MenuRequest::new(outer)).unwrap();
    f.app
        .push_menu(MenuRequest::new(inner).with_parent(outer))
        .unwrap();

    assert_eq!(f.app.push_menu(MenuRequest::new(outer)), Ok(()));
    let open: Vec<WidgetId> = f.app.popup_stack().iter().map(|e| e.window).collect();
    assert_eq!(open, vec![outer]);
    assert!(f.app.tree().is_alive(outer));
    assert_eq!(f.app.host().count(&Call::PopupDismissed(outer)), 0);
    assert_eq!(f.app.host().count(&Call::PopupDismissed(inner)), 1);
    assert!(!f.app.tree().is_alive(inner));
    assert_eq!(
        f.app.locate_window_under_mouse(Point::new(550.0, 50.0)).window(),
        Some(outer)
    );

    f.app.dismiss_all_menus();
    assert_eq!(f.app.host().count(&Call::PopupDismissed(outer)), 1);
    assert!(!f.app.tree().is_alive(outer));
}

#[test]
fn short_drags_never_start() {
    let mut f = fixture();
    f.app.host_mut().detect_on_down = Some(f.a);
    f.app.host_mut().drag_payload = Some(7);
    f.app.process_pointer_down(left(20.0, 20.0));
    assert_eq!(f.app.drag_phase(), DragPhase::Detecting);
    f.app.process_pointer_move(at(23.0, 20.0));
    f.app.process_pointer_up(left(23.0, 20.0));
    assert!(f.app.host().events("drag_detected").is_empty());
    assert_eq!(f.app.drag_phase(), DragPhase::Idle);
}

#[test]
fn drag_starts_once_then_drops_on_target() {
    let mut f = fixture();
    f.app.host_mut().detect_on_down = Some(f.a);
    f.app.host_mut().drag_payload = Some(7);
    f.app.host_mut().accept_drop = Some(f.b);
    f.app.process_pointer_down(left(20.0, 20.0));
    f.clear_log();

    f.app.process_pointer_move(at(26.0, 20.0));
    f.app.process_pointer_move(at(30.0, 40.0));
    f.app.process_pointer_move(at(20.0, 60.0));
    assert!(f.app.is_drag_dropping());
    assert_eq!(f.app.host().events("drag_detected"), vec![f.a]);
    let first_detected = f
        .log()
        .iter()
        .position(|c| matches!(c, Call::Event(_, _, "drag_detected")));
    let first_over = f
        .log()
        .iter()
        .position(|c| matches!(c, Call::Event(_, _, "drag_over")));
    assert!(first_detected < first_over);
    assert!(f.app.host().events("drag_over").contains(&f.b));

    assert!(f.app.process_pointer_up(left(20.0, 60.0)));
    assert_eq!(f.app.host().events("drop").first(), Some(&f.b));
    assert_eq!(f.app.host().count(&Call::DropFinished(7, true)), 1);
    assert!(!f.app.is_drag_dropping());
    assert_eq!(f.app.drag_phase(), DragPhase::Idle);
}

#[test]
fn escape_cancels_an_internal_drag() {
    let mut f = fixture();
    f.app.host_mut().detect_on_down = Some(f.a);
    f.app.host_mut().drag_payload = Some(7);
    f.app.process_pointer_down(left(20.0, 20.0));
    f.app.process_pointer_move(at(40.0, 20.0));
    assert!(f.app.is_drag_dropping());

    assert!(f.app.process_key_down(KeyInput::new(Key::Escape)));
    assert!(!f.app.is_drag_dropping());
    assert_eq!(f.app.host().count(&Call::DropFinished(7, false)), 1);
    assert!(!f.app.host().events("drag_leave").is_empty());
}

#[test]
fn replies_to_drag_leave_apply_when_a_drag_is_cancelled() {
    let mut f = fixture();
    f.app.host_mut().detect_on_down = Some(f.a);
    f.app.host_mut().drag_payload = Some(7);
    f.app.host_mut().focus_on_drag_leave = Some(f.b);
    f.app.process_pointer_down(left(20.0, 20.0));
    f.app.process_pointer_move(at(40.0, 20.0));
    f.app.process_pointer_move(at(20.0, 60.0));
    assert!(f.app.is_drag_dropping());
    assert_eq!(f.app.keyboard_focus(), Some(f.a));

    assert!(f.app.cancel_drag_drop());
    assert_eq!(f.app.keyboard_focus(), Some(f.b));
    assert_eq!(f.app.host().count(&Call::DropFinished(7, false)), 1);
}

#[test]
fn external_drags_enter_dragging_directly() {
    let mut f = fixture();
    f.app.host_mut().accept_drop = Some(f.c);
    assert!(!f.app.process_external_drag_enter(9, at(300.0, 100.0)));
    assert!(f.app.drag_drop_operation().is_some_and(|op| op.is_external()));
    assert_eq!(f.app.drag_phase(), DragPhase::Dragging);
    assert!(f.app.host().events("drag_enter").contains(&f.c));

    // A second drag is refused while one is in flight.
    f.app.process_external_drag_enter(10, at(300.0, 100.0));
    assert_eq!(f.app.host().count(&Call::DropFinished(10, false)), 1);

    assert!(f.app.process_external_drop(at(300.0, 120.0)));
    assert_eq!(f.app.host().count(&Call::DropFinished(9, true)), 1);
    assert!(!f.app.is_drag_dropping());

    f.app.process_external_drag_enter(11, at(300.0, 100.0));
    assert!(f.app.process_external_drag_leave());
    assert_eq!(f.app.host().count(&Call::DropFinished(11, false)), 1);
}

#[test]
fn tooltip_opens_after_the_delay_and_closes_on_press() {
    let mut f = fixture();
    f.app.host_mut().tooltips.push(f.b);
    f.app.tick(0);
    f.app.process_pointer_move(at(20.0, 60.0));
    f.app.tick(100);
    assert!(f.app.tooltip().is_none());
    f.app.tick(160);
    assert_eq!(f.app.host().count(&Call::TooltipOpened(f.b)), 1);
    assert_eq!(f.app.tooltip().map(|t| t.source), Some(f.b));

    f.app.process_pointer_down(left(20.0, 60.0));
    assert_eq!(f.app.host().count(&Call::TooltipClosed(f.b)), 1);
    assert!(f.app.tooltip().is_none());
}

#[test]
fn tab_walks_focusable_widgets_in_reading_order() {
    let mut f = fixture();
    let tab = KeyInput::new(Key::Tab);
    assert!(f.app.process_key_down(tab));
    assert_eq!(f.app.keyboard_focus(), Some(f.a));
    assert!(f.app.process_key_down(tab));
    assert_eq!(f.app.keyboard_focus(), Some(f.b));
    assert!(f.app.process_key_down(tab.with_modifiers(Modifiers::SHIFT)));
    assert_eq!(f.app.keyboard_focus(), Some(f.a));
    assert!(f.app.process_key_down(KeyInput::new(Key::ArrowDown)));
    assert_eq!(f.app.keyboard_focus(), Some(f.b));
    assert_eq!(f.app.focus_cause(), FocusCause::Navigation);
}

#[test]
fn click_focuses_the_leafmost_focusable_widget() {
    let mut f = fixture();
    f.app.process_pointer_down(left(20.0, 20.0));
    assert_eq!(f.app.keyboard_focus(), Some(f.a));
    assert_eq!(f.app.focus_cause(), FocusCause::Mouse);
    // Nothing focusable under `c`; focus stays.
    f.app.process_pointer_down(left(300.0, 20.0));
    assert_eq!(f.app.keyboard_focus(), Some(f.a));
}

#[test]
fn handled_presses_throttle_until_release() {
    let mut f = fixture();
    f.app.host_mut().capture_on_down = Some(f.a);
    assert!(!f.app.is_throttled());
    f.app.process_pointer_down(left(20.0, 20.0));
    assert!(f.app.is_throttled());
    f.app.process_pointer_up(left(20.0, 20.0));
    assert!(!f.app.is_throttled());

    let handle = f.app.request_throttle();
    assert!(f.app.is_throttled());
    f.app.release_throttle(handle);
    assert!(!f.app.is_throttled());
}

#[test]
fn clicks_outside_are_reported() {
    let mut f = fixture();
    f.app.register_click_outside(f.c);
    f.app.process_pointer_down(left(300.0, 20.0));
    assert_eq!(f.app.host().count(&Call::ClickedOutside(f.c)), 0);
    f.app.process_pointer_down(left(20.0, 20.0));
    assert_eq!(f.app.host().count(&Call::ClickedOutside(f.c)), 1);
    assert!(f.app.unregister_click_outside(f.c));
}

#[test]
fn closing_a_window_drops_state_inside_it() {
    let mut f = fixture();
    f.app.set_keyboard_focus(f.a, FocusCause::SetDirectly).unwrap();
    f.app.set_mouse_captor(PointerId::MOUSE, f.b).unwrap();
    assert!(f.app.process_window_close(f.main));
    assert_eq!(f.app.host().count(&Call::CaptureLost(f.b)), 1);
    assert_eq!(f.app.host().count(&Call::FocusLost(f.a)), 1);
    assert_eq!(f.app.keyboard_focus(), None);
    assert!(!f.app.tree().is_alive(f.main));
    assert!(!f.app.process_window_close(f.main));
}

#[test]
fn deactivation_remembers_focus_for_reactivation() {
    let mut f = fixture();
    f.app.set_keyboard_focus(f.b, FocusCause::SetDirectly).unwrap();
    f.app.set_mouse_captor(PointerId::MOUSE, f.a).unwrap();
    f.app.process_window_deactivated(f.main);
    assert_eq!(f.app.host().count(&Call::CaptureLost(f.a)), 1);

    f.app.clear_keyboard_focus(FocusCause::WindowActivate);
    assert!(f.app.process_window_activated(f.main, ActivationCause::Other));
    assert_eq!(f.app.keyboard_focus(), Some(f.b));
}

#[test]
fn controller_input_sticks_to_its_captor() {
    let mut f = fixture();
    f.app.host_mut().controller_captor = Some(f.panel);
    f.app.set_keyboard_focus(f.b, FocusCause::SetDirectly).unwrap();
    let press = ControllerInput {
        user: 0,
        control: 1,
        value: 1.0,
    };
    assert!(f.app.process_controller_button_down(press));
    assert_eq!(f.app.controller_captor(0), Some(f.panel));
    assert_eq!(f.app.controller_captor(1), None);

    f.app.set_keyboard_focus(f.a, FocusCause::SetDirectly).unwrap();
    f.clear_log();
    f.app.process_controller_analog(press);
    assert_eq!(f.app.host().events("controller"), vec![f.panel]);
}

#[test]
fn touch_contacts_release_their_capture_when_lifted() {
    let mut f = fixture();
    f.app.host_mut().capture_on_down = Some(f.a);
    let touch = TouchInput {
        touch_id: 0,
        position: Point::new(20.0, 20.0),
        modifiers: Modifiers::empty(),
    };
    assert!(f.app.process_touch_start(touch));
    assert!(f.app.has_mouse_capture(touch.pointer()));
    assert!(!f.app.has_mouse_capture(PointerId::MOUSE));

    f.app.process_touch_end(touch);
    assert!(!f.app.has_mouse_capture(touch.pointer()));
    assert_eq!(f.app.host().count(&Call::CaptureLost(f.a)), 1);
}

#[test]
fn resize_updates_bounds_and_notifies_the_window() {
    let mut f = fixture();
    f.app.process_window_resized(f.main, Size::new(500.0, 400.0));
    assert_eq!(f.app.host().events("resized"), vec![f.main]);
    assert_eq!(
        f.app.tree().local(f.main).map(|l| l.local_bounds),
        Some(Rect::new(0.0, 0.0, 500.0, 400.0))
    );
}

#[test]
fn losing_app_activation_drops_menus_and_focus() {
    let mut f = fixture();
    let popup = f.window(Rect::new(500.0, 0.0, 600.0, 100.0));
    f.app.push_menu(MenuRequest::new(popup)).unwrap();
    f.app.set_keyboard_focus(f.a, FocusCause::SetDirectly).unwrap();
    f.app.process_pointer_move(at(100.0, 100.0).at_time(0));
    f.app.process_pointer_move(at(200.0, 100.0).at_time(10));
    assert!(f.app.is_throttled());

    f.app.process_application_activation(false);
    assert!(!f.app.is_throttled());
    assert!(f.app.popup_stack().is_empty());
    assert_eq!(f.app.keyboard_focus(), None);
    assert_eq!(f.app.focus_cause(), FocusCause::WindowActivate);
}

#[test]
fn fast_pointer_motion_throttles_until_it_decays() {
    let mut f = fixture();
    f.app.tick(1_000);
    // Moves between ticks share a timestamp and carry no speed.
    f.app.process_pointer_move(at(100.0, 100.0));
    f.app.process_pointer_move(at(102.5, 100.0));
    assert!(!f.app.is_throttled());

    // 50 px in 10 ms.
    f.app.process_pointer_move(at(150.0, 100.0).at_time(1_010));
    assert!(f.app.is_throttled());
    f.app.tick(1_050);
    assert!(f.app.is_throttled());
    f.app.tick(1_110);
    assert!(!f.app.is_throttled());

    // 5 px in 100 ms.
    f.app.process_pointer_move(at(155.0, 100.0).at_time(1_110));
    assert!(!f.app.is_throttled());
}

#[test]
fn motion_throttle_ignores_captured_and_unrelated_pointers() {
    let mut f = fixture();
    f.app.set_mouse_captor(PointerId::MOUSE, f.a).unwrap();
    f.app.process_pointer_move(at(10.0, 10.0).at_time(0));
    f.app.process_pointer_move(at(210.0, 10.0).at_time(10));
    assert!(!f.app.is_throttled());
    f.app.release_mouse_capture(PointerId::MOUSE);

    f.app.process_pointer_move(at(10.0, 10.0).at_time(20));
    f.app.tick(25);
    let touch = TouchInput {
        touch_id: 0,
        position: Point::new(300.0, 10.0),
        modifiers: Modifiers::empty(),
    };
    f.app.process_touch_move(touch);
    f.app.process_pointer_move(at(11.0, 10.0).at_time(30));
    assert!(!f.app.is_throttled());

    f.app
        .set_settings(InputSettings::default().with_throttle_on_fast_motion(false));
    f.app.process_pointer_move(at(300.0, 10.0).at_time(40));
    assert!(!f.app.is_throttled());
}

#[test]
fn double_clicks_wheel_and_characters_follow_their_routes() {
    let mut f = fixture();
    f.app.process_double_click(left(20.0, 20.0));
    let doubles: Vec<(WidgetId, Phase)> = f
        .log()
        .iter()
        .filter_map(|c| match c {
            Call::Event(w, p, "double") => Some((*w, *p)),
            _ => None,
        })
        .collect();
    assert_eq!(
        doubles,
        vec![
            (f.main, Phase::Preview),
            (f.panel, Phase::Preview),
            (f.a, Phase::Preview),
            (f.a, Phase::Bubble),
            (f.panel, Phase::Bubble),
            (f.main, Phase::Bubble),
        ]
    );
    assert!(f.app.host().events("down").is_empty());
    // Double clicks do not move focus.
    assert_eq!(f.app.keyboard_focus(), None);
    f.app.process_pointer_up(left(20.0, 20.0));

    f.app
        .process_wheel(at(300.0, 20.0).with_wheel_delta(Vec2::new(0.0, -3.0)));
    assert_eq!(f.app.host().events("wheel"), vec![f.c, f.main]);

    f.app.set_keyboard_focus(f.b, FocusCause::SetDirectly).unwrap();
    let typed = CharInput {
        character: 'x',
        modifiers: Modifiers::empty(),
    };
    assert!(!f.app.process_key_char(typed));
    assert_eq!(f.app.host().events("char"), vec![f.b, f.panel, f.main]);
}

#[test]
fn external_modal_blocks_input_until_it_ends() {
    let mut f = fixture();
    let popup = f.window(Rect::new(500.0, 0.0, 600.0, 100.0));
    f.app.push_menu(MenuRequest::new(popup)).unwrap();
    f.app.set_keyboard_focus(f.a, FocusCause::SetDirectly).unwrap();
    f.app.set_mouse_captor(PointerId::MOUSE, f.b).unwrap();

    f.app.begin_external_modal();
    f.app.begin_external_modal();
    assert!(f.app.is_external_modal_active());
    assert!(f.app.popup_stack().is_empty());
    assert_eq!(f.app.host().count(&Call::CaptureLost(f.b)), 1);

    f.clear_log();
    assert!(f.app.interactive_top_level_windows().is_empty());
    assert!(!f.app.process_pointer_down(left(20.0, 20.0)));
    f.app.process_pointer_up(left(20.0, 20.0));
    assert!(!f.app.process_key_down(KeyInput::new(Key::Tab)));
    assert!(f.app.host().events("down").is_empty());
    assert!(f.app.host().events("key_down").is_empty());
    assert_eq!(f.app.keyboard_focus(), Some(f.a));

    f.app.end_external_modal();
    assert!(f.app.is_external_modal_active());
    f.app.end_external_modal();
    // Unbalanced ends are ignored.
    f.app.end_external_modal();
    assert!(!f.app.is_external_modal_active());

    f.app.process_pointer_down(left(20.0, 20.0));
    assert_eq!(
        f.app.host().events("down"),
        vec![f.main, f.panel, f.a, f.a, f.panel, f.main]
    );
}

#[test]
fn focus_changing_is_announced_before_focus_moves() {
    let mut f = fixture();
    f.app.set_keyboard_focus(f.a, FocusCause::SetDirectly).unwrap();
    f.clear_log();

    f.app.set_keyboard_focus(f.c, FocusCause::SetDirectly).unwrap();
    assert_eq!(
        f.log(),
        &[
            Call::FocusChanging(f.a),
            Call::FocusChanging(f.panel),
            Call::FocusChanging(f.c),
            Call::FocusLost(f.a),
            Call::FocusReceived(f.c),
        ]
    );
}

#[test]
fn tooltip_repel_direction_sticks_while_open() {
    let mut f = fixture();
    f.app.host_mut().tooltips.push(f.b);
    f.app.host_mut().force_fields.push(f.b);
    f.app.tick(0);
    f.app.process_pointer_move(at(20.0, 60.0));
    f.app.tick(200);

    // (32, 68) overlaps `b`; pushing down (5 px) beats pushing right (32 px).
    let tooltip = f.app.tooltip().unwrap();
    assert_eq!(tooltip.source, f.b);
    assert_eq!(tooltip.position, Point::new(32.0, 73.0));
    assert_eq!(tooltip.repel, RepelDirection::Down);
    assert_eq!(tooltip.fade_in, TOOLTIP_FADE_IN_MS);
    assert_eq!(tooltip.shown_at, 200);

    // Right would now be shorter, but the tooltip keeps going down.
    f.app.process_pointer_move(at(50.0, 55.0));
    let tooltip = f.app.tooltip().unwrap();
    assert_eq!(tooltip.position, Point::new(62.0, 73.0));
    assert_eq!(tooltip.repel, RepelDirection::Down);
    assert_eq!(f.app.host().count(&Call::TooltipOpened(f.b)), 1);
}

#[test]
fn new_settings_apply_to_the_next_gesture() {
    let mut f = fixture();
    f.app.set_settings(
        InputSettings::default()
            .with_drag_trigger_distance(20.0)
            .with_tooltip_delay(500),
    );
    assert_eq!(f.app.settings().tooltip_delay, 500);

    f.app.host_mut().tooltips.push(f.c);
    f.app.tick(0);
    f.app.process_pointer_move(at(300.0, 20.0));
    f.app.tick(400);
    assert!(f.app.tooltip().is_none());
    f.app.tick(510);
    assert_eq!(f.app.tooltip().map(|t| t.source), Some(f.c));

    f.app.host_mut().detect_on_down = Some(f.a);
    f.app.host_mut().drag_payload = Some(7);
    f.app.process_pointer_down(left(20.0, 20.0));
    f.app.process_pointer_move(at(30.0, 20.0));
    assert_eq!(f.app.drag_phase(), DragPhase::Detecting);
    f.app.process_pointer_move(at(45.0, 20.0));
    assert!(f.app.is_drag_dropping());
}

#[test]
fn resetting_input_settings_drops_captures_and_gestures() {
    let mut f = fixture();
    f.app.host_mut().detect_on_down = Some(f.a);
    f.app.host_mut().controller_captor = Some(f.panel);
    f.app.process_pointer_down(left(20.0, 20.0));
    assert_eq!(f.app.drag_phase(), DragPhase::Detecting);
    f.app.set_mouse_captor(PointerId::MOUSE, f.b).unwrap();
    let press = ControllerInput {
        user: 0,
        control: 1,
        value: 1.0,
    };
    f.app.process_controller_button_down(press);
    assert_eq!(f.app.controller_captor(0), Some(f.panel));

    f.app.reset_to_default_input_settings();
    assert_eq!(f.app.drag_phase(), DragPhase::Idle);
    assert!(!f.app.has_mouse_capture(PointerId::MOUSE));
    assert_eq!(f.app.host().count(&Call::CaptureLost(f.b)), 1);
    assert_eq!(f.app.controller_captor(0), None);
    assert_eq!(f.app.current_cursor(), CursorIcon::Default);
}
