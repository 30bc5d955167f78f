// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A modal dialog driven by `run_modal`.
//!
//! The pump closure stands in for the platform event loop: it feeds scripted
//! input and ticks until the dialog's OK button is pressed.
//!
//! Run:
//! - `cargo run -p switchyard_demos --example modal_dialog`

use std::collections::VecDeque;
use std::ops::ControlFlow;

use kurbo::{Point, Rect};
use switchyard_app::{ActivationCause, Application, PointerInput, WidgetEvent, WidgetHost};
use switchyard_event_state::pointer::MouseButton;
use switchyard_responder::reply::Reply;
use switchyard_responder::types::Phase;
use switchyard_tree::{Geometry, LocalWidget, WidgetId};

#[derive(Default)]
struct DialogHost {
    ok: Option<WidgetId>,
    confirmed: bool,
}

impl WidgetHost for DialogHost {
    type Payload = ();

    fn on_event(
        &mut self,
        widget: WidgetId,
        _: &Geometry,
        phase: Phase,
        event: &WidgetEvent<'_, ()>,
    ) -> Reply<WidgetId, ()> {
        match (phase, event) {
            (Phase::Bubble, WidgetEvent::PointerDown(_)) if Some(widget) == self.ok => {
                self.confirmed = true;
                Reply::handled()
            }
            (Phase::Bubble, WidgetEvent::PointerDown(input)) => {
                println!("  {widget:?} pressed at {:?}", input.position);
                Reply::unhandled()
            }
            _ => Reply::unhandled(),
        }
    }

    fn on_modal_stack_changed(&mut self, active: bool) {
        println!("  modal active: {active}");
    }
}

fn bounds(rect: Rect) -> LocalWidget {
    LocalWidget {
        local_bounds: rect,
        ..LocalWidget::default()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let mut app = Application::new(DialogHost::default());
    let tree = app.tree_mut();
    let main = tree.insert_window(None, bounds(Rect::new(0.0, 0.0, 800.0, 600.0)));
    let save = tree.insert(Some(main), bounds(Rect::new(10.0, 10.0, 90.0, 40.0)));
    let dialog = tree.insert_window(None, bounds(Rect::new(300.0, 200.0, 500.0, 320.0)));
    let ok = tree.insert(Some(dialog), bounds(Rect::new(420.0, 280.0, 490.0, 310.0)));
    app.host_mut().ok = Some(ok);

    // A click on the blocked main window, a refused activation, then OK.
    let mut script: VecDeque<Point> =
        [Point::new(20.0, 20.0), Point::new(450.0, 290.0)].into();
    let mut now = 0;

    app.run_modal(dialog, Some(save), |app| {
        now += 16;
        app.tick(now);
        if app.host().confirmed {
            app.close_modal_window(dialog);
            return ControlFlow::Break(());
        }
        let Some(point) = script.pop_front() else {
            return ControlFlow::Break(());
        };
        let input = PointerInput::mouse(point).with_button(MouseButton::Left);
        let handled = app.process_pointer_down(input);
        app.process_pointer_up(input);
        println!("press at {point:?} handled: {handled}");
        if !app.process_window_activated(main, ActivationCause::Mouse) {
            println!("main window stays inactive while the dialog is up");
        }
        ControlFlow::Continue(())
    })
    .expect("dialog is a window");

    println!("confirmed: {}", app.host().confirmed);
    println!("focus back on: {:?}", app.keyboard_focus());
}
