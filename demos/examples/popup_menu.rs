// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popup menus: a menu bar button opens a menu, an item opens a submenu, and a
//! click elsewhere dismisses the whole stack top-down.
//!
//! Run:
//! - `cargo run -p switchyard_demos --example popup_menu`

use kurbo::{Point, Rect};
use switchyard_app::{
    Application, MenuRequest, PointerInput, PopupTransition, WidgetEvent, WidgetHost,
};
use switchyard_event_state::pointer::MouseButton;
use switchyard_responder::reply::Reply;
use switchyard_responder::types::Phase;
use switchyard_tree::{Geometry, LocalWidget, WidgetId};

/// Remembers which widget was clicked last so the driver can open menus.
#[derive(Default)]
struct MenuHost {
    clicked: Option<WidgetId>,
}

impl WidgetHost for MenuHost {
    type Payload = ();

    fn on_event(
        &mut self,
        widget: WidgetId,
        _: &Geometry,
        phase: Phase,
        event: &WidgetEvent<'_, ()>,
    ) -> Reply<WidgetId, ()> {
        match (phase, event) {
            (Phase::Bubble, WidgetEvent::PointerDown(_)) => {
                self.clicked = Some(widget);
                Reply::handled()
            }
            _ => Reply::unhandled(),
        }
    }

    fn on_popup_dismissed(&mut self, window: WidgetId) {
        println!("  dismissed popup {window:?}");
    }
}

fn bounds(rect: Rect) -> LocalWidget {
    LocalWidget {
        local_bounds: rect,
        ..LocalWidget::default()
    }
}

fn click(app: &mut Application<MenuHost>, x: f64, y: f64) -> Option<WidgetId> {
    let input = PointerInput::mouse(Point::new(x, y)).with_button(MouseButton::Left);
    app.host_mut().clicked = None;
    app.process_pointer_down(input);
    app.process_pointer_up(input);
    app.host().clicked
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let mut app = Application::new(MenuHost::default());
    let tree = app.tree_mut();
    let main = tree.insert_window(None, bounds(Rect::new(0.0, 0.0, 640.0, 480.0)));
    let file_button = tree.insert(Some(main), bounds(Rect::new(0.0, 0.0, 60.0, 24.0)));

    println!("click File");
    assert_eq!(click(&mut app, 10.0, 10.0), Some(file_button));

    let file_menu = app
        .tree_mut()
        .insert_window(None, bounds(Rect::new(0.0, 24.0, 160.0, 124.0)));
    let recent = app
        .tree_mut()
        .insert(Some(file_menu), bounds(Rect::new(0.0, 24.0, 160.0, 48.0)));
    app.push_menu(
        MenuRequest::new(file_menu)
            .with_anchor(file_button)
            .with_transition(PopupTransition::ComboButton)
            .focus_immediately(),
    )
    .expect("file menu opens");

    println!("click Recent");
    assert_eq!(click(&mut app, 20.0, 30.0), Some(recent));

    let recent_menu = app
        .tree_mut()
        .insert_window(None, bounds(Rect::new(160.0, 24.0, 320.0, 96.0)));
    app.push_menu(
        MenuRequest::new(recent_menu)
            .with_parent(file_menu)
            .with_transition(PopupTransition::SubMenuRight),
    )
    .expect("submenu opens");
    println!("open popups: {}", app.popup_stack().len());

    println!("click inside the submenu");
    click(&mut app, 200.0, 40.0);
    println!("open popups: {}", app.popup_stack().len());

    println!("click the empty canvas");
    click(&mut app, 400.0, 300.0);
    println!("open popups: {}", app.popup_stack().len());
    assert!(app.popup_stack().is_empty());
}
