// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag and drop between widgets, with a tooltip on the drop target.
//!
//! A card asks for drag detection when pressed. Once the pointer has moved
//! past the trigger distance the card is told a drag was detected and replies
//! with a payload; from then on moves are drag-over and the release is a drop.
//!
//! Run:
//! - `cargo run -p switchyard_demos --example drag_drop`

use kurbo::{Point, Rect};
use switchyard_app::{Application, PointerInput, WidgetEvent, WidgetHost};
use switchyard_event_state::pointer::MouseButton;
use switchyard_responder::reply::Reply;
use switchyard_responder::types::Phase;
use switchyard_tree::{Geometry, LocalWidget, WidgetId};

#[derive(Default)]
struct Board {
    card: Option<WidgetId>,
    bin: Option<WidgetId>,
}

impl WidgetHost for Board {
    type Payload = &'static str;

    fn on_event(
        &mut self,
        widget: WidgetId,
        _: &Geometry,
        phase: Phase,
        event: &WidgetEvent<'_, &'static str>,
    ) -> Reply<WidgetId, &'static str> {
        if phase != Phase::Bubble {
            return Reply::unhandled();
        }
        match event {
            WidgetEvent::PointerDown(_) if Some(widget) == self.card => {
                Reply::handled().detect_drag(widget, MouseButton::Left)
            }
            WidgetEvent::DragDetected { .. } if Some(widget) == self.card => {
                println!("  card: drag detected");
                Reply::handled().begin_drag("card #1")
            }
            WidgetEvent::DragEnter { payload, .. } if Some(widget) == self.bin => {
                println!("  bin: {payload} entered");
                Reply::unhandled()
            }
            WidgetEvent::Drop { payload, .. } if Some(widget) == self.bin => {
                println!("  bin: accepted {payload}");
                Reply::handled()
            }
            _ => Reply::unhandled(),
        }
    }

    fn has_tooltip(&self, widget: WidgetId) -> bool {
        Some(widget) == self.bin
    }

    fn on_tooltip_opened(&mut self, source: WidgetId, position: Point) {
        println!("  tooltip for {source:?} at {position:?}");
    }

    fn on_drop_finished(&mut self, payload: &'static str, accepted: bool) {
        println!("  drop of {payload} finished, accepted: {accepted}");
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

    let mut app = Application::new(Board::default());
    let tree = app.tree_mut();
    let window = tree.insert_window(None, bounds(Rect::new(0.0, 0.0, 400.0, 200.0)));
    let card = tree.insert(Some(window), bounds(Rect::new(20.0, 20.0, 120.0, 80.0)));
    let bin = tree.insert(Some(window), bounds(Rect::new(250.0, 20.0, 380.0, 180.0)));
    app.host_mut().card = Some(card);
    app.host_mut().bin = Some(bin);

    println!("hover the bin long enough for its tooltip");
    app.tick(0);
    app.process_pointer_move(PointerInput::mouse(Point::new(300.0, 100.0)));
    app.tick(200);

    println!("press on the card and drag it over");
    let press = PointerInput::mouse(Point::new(40.0, 40.0)).with_button(MouseButton::Left);
    app.process_pointer_down(press);
    for x in [42.0, 60.0, 150.0, 280.0] {
        app.process_pointer_move(PointerInput::mouse(Point::new(x, 60.0)));
        println!("phase after move to x={x}: {:?}", app.drag_phase());
    }

    println!("release over the bin");
    let release = PointerInput::mouse(Point::new(280.0, 60.0)).with_button(MouseButton::Left);
    let accepted = app.process_pointer_up(release);
    println!("drop handled: {accepted}, still dragging: {}", app.is_drag_dropping());
}
