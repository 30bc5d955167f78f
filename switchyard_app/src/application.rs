// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The application object: tree, host, and interaction state.

use alloc::vec::Vec;

use kurbo::Point;
use smallvec::SmallVec;
use switchyard_event_state::drag::DragPhase;
use switchyard_event_state::pointer::PointerId;
use switchyard_event_state::throttle::ThrottleHandle;
use switchyard_event_state::tooltip::TooltipChange;
use switchyard_focus::{
    FocusCandidate, FocusCause, FocusTransition, Navigation, NavigationPolicy, ReadingOrderPolicy,
};
use switchyard_responder::dispatcher;
use switchyard_responder::hover::{self, HoverEvent};
use switchyard_responder::reply::Reply;
use switchyard_responder::types::{Dispatch, Outcome, Phase};
use switchyard_tree::{
    Geometry, InterruptedPathPolicy, Tree, WidgetFlags, WidgetId, WidgetPath,
};

use crate::drag_drop::DragDropOperation;
use crate::error::InteractionError;
use crate::event::{CursorIcon, PointerInput, TooltipState, WidgetEvent};
use crate::focus::FocusRequest;
use crate::host::WidgetHost;
use crate::interaction::InteractionState;
use crate::modal::ModalWindowStackEntry;
use crate::popup::PopupStackEntry;
use crate::settings::InputSettings;

/// Where a reply came from, for applying its side effects.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ReplyContext<'a> {
    /// Pointer of the event, if it was a pointer event.
    pub(crate) pointer: Option<PointerId>,
    /// Screen position of the event.
    pub(crate) position: Point,
    /// Path the event was routed along.
    pub(crate) path: &'a WidgetPath,
}

impl<'a> ReplyContext<'a> {
    pub(crate) fn pointer(input: &PointerInput, path: &'a WidgetPath) -> Self {
        Self {
            pointer: Some(input.pointer),
            position: input.position,
            path,
        }
    }

    pub(crate) fn keyboard(path: &'a WidgetPath) -> Self {
        Self {
            pointer: None,
            position: path
                .leaf()
                .map_or(Point::ZERO, |a| a.geometry.screen_rect().center()),
            path,
        }
    }
}

/// What the replies to one delivered event asked for, in aggregate.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Delivery {
    pub(crate) handled: bool,
    pub(crate) focus_requested: bool,
    pub(crate) prevent_throttling: bool,
    pub(crate) end_interaction: bool,
}

/// Route steps for a path, root to leaf.
pub(crate) fn steps(path: &WidgetPath) -> impl Iterator<Item = (WidgetId, Geometry)> + '_ {
    path.widgets().iter().map(|a| (a.widget, a.geometry))
}

/// The input dispatcher.
///
/// Owns the widget [`Tree`], the [`WidgetHost`] that implements widget
/// behavior, and all [`InteractionState`]. Platform input enters through the
/// `process_*` methods; time advances through [`tick`](Self::tick).
pub struct Application<H: WidgetHost> {
    pub(crate) tree: Tree,
    pub(crate) host: H,
    pub(crate) state: InteractionState<H::Payload>,
    pub(crate) settings: InputSettings,
}

impl<H: WidgetHost> core::fmt::Debug for Application<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Application")
            .field("tree", &self.tree)
            .field("settings", &self.settings)
            .field("focus", &self.state.focus.weak_path())
            .field("popups", &self.state.popups.len())
            .field("modals", &self.state.modals.entries().len())
            .finish_non_exhaustive()
    }
}

impl<H: WidgetHost> Application<H> {
    /// Create an application with default settings and an empty tree.
    pub fn new(host: H) -> Self {
        Self::with_settings(host, InputSettings::default())
    }

    /// Create an application with `settings`.
    pub fn with_settings(host: H, settings: InputSettings) -> Self {
        Self {
            tree: Tree::new(),
            host,
            state: InteractionState::new(&settings),
            settings,
        }
    }

    /// The widget tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The widget tree, for layout updates and widget creation/removal.
    ///
    /// Removing widgets here is safe: stored captors, focus and hover paths
    /// are re-validated the next time they are used.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// The widget host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The widget host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Current input settings.
    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    /// Replace the input settings.
    pub fn set_settings(&mut self, settings: InputSettings) {
        self.state.apply_settings(&settings);
        self.settings = settings;
    }

    /// Interaction state.
    pub fn state(&self) -> &InteractionState<H::Payload> {
        &self.state
    }

    /// Timestamp of the last [`tick`](Self::tick), in milliseconds.
    pub fn now(&self) -> u64 {
        self.state.now
    }

    /// Advance time: replay deferred focus changes, drop decayed state,
    /// decay the motion throttle and run the tooltip timer.
    pub fn tick(&mut self, now: u64) {
        self.state.now = now;
        self.revalidate_stacks();

        let mut budget = self.settings.max_deferred_focus_changes;
        while budget > 0 {
            let Some(request) = self.state.focus.next_deferred() else {
                break;
            };
            budget -= 1;
            match request {
                FocusRequest::Widget(widget, cause) => {
                    if let Err(err) = self.set_keyboard_focus(widget, cause) {
                        tracing::debug!(%err, "deferred focus change dropped");
                    }
                }
                FocusRequest::Clear(cause) => self.clear_keyboard_focus(cause),
            }
        }
        if self.state.focus.has_deferred() {
            tracing::warn!("deferred focus changes left for the next tick");
        }
        self.state.focus.revalidate(&self.tree);

        if self.state.motion.tick(now) {
            tracing::debug!("motion throttle decayed");
        }
        self.update_tooltip(now);
    }

    // --- Delivery ---------------------------------------------------------

    /// Walk `route`, delivering `event` and applying each reply, until a reply
    /// is handled.
    pub(crate) fn deliver(
        &mut self,
        route: &[Dispatch<WidgetId, Geometry>],
        event: &WidgetEvent<'_, H::Payload>,
        ctx: &ReplyContext<'_>,
    ) -> Delivery {
        let mut delivery = Delivery::default();
        dispatcher::run(route, self, |d, app| {
            let reply = app.host.on_event(d.node, &d.geometry, d.phase, event);
            let handled = reply.handled;
            app.process_reply(reply, d.node, ctx, &mut delivery);
            if handled {
                delivery.handled = true;
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        delivery
    }

    /// Apply a reply's side effects: capture, then focus, then drag.
    pub(crate) fn process_reply(
        &mut self,
        reply: Reply<WidgetId, H::Payload>,
        from: WidgetId,
        ctx: &ReplyContext<'_>,
        delivery: &mut Delivery,
    ) {
        let Reply {
            handled: _,
            capture,
            release_capture,
            focus,
            detect_drag,
            begin_drag,
            end_drag,
            end_interaction,
            prevent_throttling,
            capture_controller,
            release_controller,
        } = reply;

        if let Some(pointer) = ctx.pointer {
            if release_capture {
                self.release_mouse_capture(pointer);
            }
            if let Some(widget) = capture {
                if self.state.drag_drop.is_dragging() || begin_drag.is_some() {
                    tracing::debug!(widget = ?widget, "capture ignored while dragging");
                } else {
                    self.set_captor(pointer, ctx.path, widget);
                }
            }
        }
        if let Some(user) = release_controller
            && self.state.capture.release_controller(user)
        {
            tracing::debug!(user, "controller capture released");
        }
        if let Some((user, widget)) = capture_controller {
            let path = self.tree.path_to(widget);
            if path.is_empty() {
                tracing::warn!(widget = ?widget, "controller captor unreachable");
            } else {
                tracing::debug!(user, widget = ?widget, "controller captured");
                self.state.capture.set_controller(user, path.to_weak());
            }
        }

        if let Some((widget, cause)) = focus {
            delivery.focus_requested = true;
            if let Err(err) = self.set_keyboard_focus(widget, cause) {
                tracing::warn!(%err, "focus request dropped");
            }
        }

        if end_drag {
            self.cancel_drag_drop();
        }
        if let Some(payload) = begin_drag {
            self.begin_drag_drop(payload, from, ctx);
        }
        if let (Some((widget, button)), Some(pointer)) = (detect_drag, ctx.pointer) {
            if self.state.pointers.pressed(pointer).contains(button.into()) {
                self.state
                    .drag_drop
                    .detect(pointer, widget, ctx.position, button);
            } else {
                tracing::debug!(widget = ?widget, ?button, "drag detection needs a held button");
            }
        }

        if end_interaction {
            delivery.end_interaction = true;
            if let Some(pointer) = ctx.pointer {
                self.state.release_press_throttle(pointer);
            }
        }
        if prevent_throttling {
            delivery.prevent_throttling = true;
        }
    }

    // --- Capture ----------------------------------------------------------

    fn set_captor(&mut self, pointer: PointerId, path: &WidgetPath, widget: WidgetId) {
        let target = if path.contains(widget) {
            path.path_down_to(widget)
        } else {
            self.tree.path_to(widget)
        };
        if target.is_empty() {
            tracing::warn!(widget = ?widget, "capture requested for an unreachable widget");
            return;
        }
        if let Some(previous) = self.state.capture.set(pointer, target.to_weak()) {
            tracing::debug!(?pointer, widget = ?previous, "capture lost");
            self.host.on_capture_lost(previous, pointer);
        }
        tracing::debug!(?pointer, widget = ?widget, "capture set");
    }

    /// Make `widget` the captor of `pointer`.
    pub fn set_mouse_captor(
        &mut self,
        pointer: PointerId,
        widget: WidgetId,
    ) -> Result<(), InteractionError> {
        let path = self.tree.path_to(widget);
        if path.is_empty() {
            return Err(InteractionError::WidgetUnreachable(widget));
        }
        self.set_captor(pointer, &path, widget);
        Ok(())
    }

    /// Current captor of `pointer`.
    ///
    /// A captor that was removed or hidden is released here, with its
    /// capture-lost notification.
    pub fn mouse_captor(&mut self, pointer: PointerId) -> Option<WidgetId> {
        self.captor_path(pointer).last_widget()
    }

    /// Whether `pointer` has a captor, without re-validating it.
    pub fn has_mouse_capture(&self, pointer: PointerId) -> bool {
        self.state.capture.captor(pointer).is_some()
    }

    /// Resolved path to the captor of `pointer`, or empty.
    pub(crate) fn captor_path(&mut self, pointer: PointerId) -> WidgetPath {
        let (path, lost) =
            self.state
                .capture
                .resolve(&self.tree, pointer, InterruptedPathPolicy::ReturnInvalid);
        if let Some(widget) = lost {
            self.host.on_capture_lost(widget, pointer);
        }
        path
    }

    /// Release the captor of `pointer`. Returns `false` if there was none.
    pub fn release_mouse_capture(&mut self, pointer: PointerId) -> bool {
        match self.state.capture.release(pointer) {
            Some(widget) => {
                tracing::debug!(?pointer, widget = ?widget, "capture released");
                self.host.on_capture_lost(widget, pointer);
                true
            }
            None => false,
        }
    }

    /// Release every pointer captor.
    pub fn release_all_captures(&mut self) {
        for (pointer, widget) in self.state.capture.release_all() {
            tracing::debug!(?pointer, widget = ?widget, "capture released");
            self.host.on_capture_lost(widget, pointer);
        }
    }

    /// Release every captor inside `window` or the windows it owns.
    pub(crate) fn release_captures_within(&mut self, window: WidgetId) {
        for w in self.tree.window_stack(window) {
            for (pointer, widget) in self.state.capture.release_through(w) {
                tracing::debug!(?pointer, widget = ?widget, "capture released with window");
                self.host.on_capture_lost(widget, pointer);
            }
        }
    }

    /// Current controller captor of `user`.
    pub fn controller_captor(&self, user: u32) -> Option<WidgetId> {
        self.state.capture.controller_captor(user)
    }

    /// Release captures and in-progress gestures: every pointer and
    /// controller captor, pending drag detection, and the cursor override.
    pub fn reset_to_default_input_settings(&mut self) {
        self.release_all_captures();
        self.state.capture.clear_controllers();
        self.state.drag_drop.cancel_detection();
        self.state.cursor = CursorIcon::Default;
        tracing::debug!("input settings reset");
    }

    // --- Focus ------------------------------------------------------------

    /// Focus `widget`.
    ///
    /// Requests made while another focus change is being announced are queued
    /// and applied on the next [`tick`](Self::tick).
    pub fn set_keyboard_focus(
        &mut self,
        widget: WidgetId,
        cause: FocusCause,
    ) -> Result<(), InteractionError> {
        if self.state.focus.in_transition() {
            self.state.focus.defer(FocusRequest::Widget(widget, cause));
            return Ok(());
        }
        let path = self.tree.path_to(widget);
        if path.is_empty() {
            return Err(InteractionError::WidgetUnreachable(widget));
        }
        self.set_keyboard_focus_to_path(&path, cause);
        Ok(())
    }

    /// Focus the leaf of `path`, or clear focus if it is empty.
    ///
    /// Returns `false` if the change was deferred.
    pub fn set_keyboard_focus_to_path(&mut self, path: &WidgetPath, cause: FocusCause) -> bool {
        if self.state.focus.in_transition() {
            let request = match path.last_widget() {
                Some(widget) => FocusRequest::Widget(widget, cause),
                None => FocusRequest::Clear(cause),
            };
            self.state.focus.defer(request);
            return false;
        }
        self.state.focus.revalidate(&self.tree);
        let old: SmallVec<[WidgetId; 8]> =
            self.state.focus.weak_path().ids().iter().copied().collect();
        let new: SmallVec<[WidgetId; 8]> = path.ids().collect();
        let transition = FocusTransition::between(&old, &new);
        if transition.is_noop() {
            return true;
        }

        self.state.focus.set_in_transition(true);
        for &widget in &transition.changing {
            self.host.on_focus_changing(widget, cause);
        }
        self.state.focus.store(path.to_weak(), cause);
        tracing::debug!(from = ?transition.lost, to = ?transition.received, ?cause, "focus changed");
        if let Some(lost) = transition.lost {
            self.host.on_focus_lost(lost, cause);
        }
        if let (Some(received), Some(leaf)) = (transition.received, path.leaf()) {
            let reply = self.host.on_focus_received(received, &leaf.geometry, cause);
            let ctx = ReplyContext::keyboard(path);
            self.process_reply(reply, received, &ctx, &mut Delivery::default());
        }
        self.state.focus.set_in_transition(false);

        self.close_tooltip();
        true
    }

    /// Clear keyboard focus.
    pub fn clear_keyboard_focus(&mut self, cause: FocusCause) {
        self.set_keyboard_focus_to_path(&WidgetPath::new(), cause);
    }

    /// Focused widget, if its path still resolves.
    pub fn keyboard_focus(&self) -> Option<WidgetId> {
        self.focused_path().last_widget()
    }

    /// Resolved path to the focused widget, or empty.
    pub fn focused_path(&self) -> WidgetPath {
        self.state.focus.resolve(&self.tree)
    }

    /// Cause of the last focus change.
    pub fn focus_cause(&self) -> FocusCause {
        self.state.focus.cause()
    }

    /// Whether focus lies strictly inside `widget`'s subtree.
    pub fn has_focused_descendants(&self, widget: WidgetId) -> bool {
        let path = self.focused_path();
        path.contains(widget) && path.last_widget() != Some(widget)
    }

    /// Move focus with a navigation intent inside the focused window, or the
    /// frontmost interactive window when nothing is focused.
    ///
    /// Returns `true` if focus moved.
    pub fn navigate_focus(&mut self, navigation: Navigation) -> bool {
        let focused = self.focused_path();
        let window = focused
            .window()
            .or_else(|| self.interactive_top_level_windows().last().copied());
        let Some(window) = window else {
            return false;
        };
        let mut candidates = Vec::new();
        self.collect_focus_candidates(window, &mut candidates);
        let origin = focused.last_widget();
        let Some(next) = ReadingOrderPolicy::default().next(origin, navigation, &candidates) else {
            return false;
        };
        if Some(next) == origin {
            return false;
        }
        self.set_keyboard_focus(next, FocusCause::Navigation).is_ok()
    }

    fn collect_focus_candidates(&self, id: WidgetId, out: &mut Vec<FocusCandidate<WidgetId>>) {
        let Some(flags) = self.tree.flags(id) else {
            return;
        };
        if !flags.contains(WidgetFlags::VISIBLE) {
            return;
        }
        if flags.contains(WidgetFlags::FOCUSABLE)
            && let Some(geometry) = self.tree.geometry(id)
        {
            out.push(FocusCandidate::new(id, geometry.screen_rect()));
        }
        for &child in self.tree.children_of(id) {
            self.collect_focus_candidates(child, out);
        }
    }

    // --- Drag and drop ----------------------------------------------------

    /// Whether a drag-drop operation is in flight.
    pub fn is_drag_dropping(&self) -> bool {
        self.state.drag_drop.is_dragging()
    }

    /// Idle, detecting, or dragging.
    pub fn drag_phase(&self) -> DragPhase {
        self.state.drag_drop.phase()
    }

    /// The operation in flight.
    pub fn drag_drop_operation(&self) -> Option<&DragDropOperation<H::Payload>> {
        self.state.drag_drop.operation()
    }

    pub(crate) fn drag_pointer(&self) -> Option<PointerId> {
        self.state.drag_drop.operation().map(|op| op.pointer)
    }

    fn begin_drag_drop(
        &mut self,
        payload: H::Payload,
        source: WidgetId,
        ctx: &ReplyContext<'_>,
    ) {
        if self.state.drag_drop.is_dragging() {
            tracing::warn!(source = ?source, "drag requested while another is in flight");
            self.host.on_drop_finished(payload, false);
            return;
        }
        let pointer = ctx.pointer.unwrap_or(PointerId::MOUSE);
        let input = PointerInput {
            pointer,
            ..PointerInput::mouse(ctx.position)
        };
        // Plain hover ends here; the drag re-enters with drag events.
        self.update_hover(&WidgetPath::new(), &input);
        self.release_mouse_capture(pointer);
        self.close_tooltip();
        let operation = DragDropOperation {
            payload,
            source: Some(source),
            pointer,
        };
        if let Err(payload) = self.state.drag_drop.begin(operation) {
            self.host.on_drop_finished(payload, false);
        }
    }

    /// Cancel the drag-drop in flight; the payload goes back to the host as
    /// not accepted. Returns `false` if nothing was in flight.
    pub fn cancel_drag_drop(&mut self) -> bool {
        let active = self.state.drag_drop.is_dragging();
        if let Some(op) = self.state.drag_drop.take() {
            self.abandon_drag(op);
        }
        active
    }

    /// Tell the hovered widgets the drag left, then hand the payload back.
    pub(crate) fn abandon_drag(&mut self, op: DragDropOperation<H::Payload>) {
        let position = self
            .state
            .pointers
            .position(op.pointer)
            .unwrap_or(Point::ZERO);
        let input = PointerInput {
            pointer: op.pointer,
            ..PointerInput::mouse(position)
        };
        let path = self.widgets_under_cursor();
        let ctx = ReplyContext::pointer(&input, &path);
        let hovered: SmallVec<[WidgetId; 8]> =
            self.state.under_cursor.ids().iter().rev().copied().collect();
        for widget in hovered {
            if let Some(geometry) = self.tree.geometry(widget) {
                let event = WidgetEvent::DragLeave {
                    payload: &op.payload,
                    input: &input,
                };
                let reply = self.host.on_event(widget, &geometry, Phase::Bubble, &event);
                self.process_reply(reply, widget, &ctx, &mut Delivery::default());
            }
        }
        tracing::debug!(pointer = ?op.pointer, "drag-drop cancelled");
        self.finish_drop(op, false);
    }

    pub(crate) fn finish_drop(&mut self, op: DragDropOperation<H::Payload>, accepted: bool) {
        tracing::debug!(pointer = ?op.pointer, accepted, "drag-drop finished");
        self.state.under_cursor.clear();
        self.host.on_drop_finished(op.payload, accepted);
    }

    // --- Hover, cursor, tooltip ---------------------------------------------

    /// Widgets under the cursor as of the last pointer event.
    pub fn widgets_under_cursor(&self) -> WidgetPath {
        self.state
            .under_cursor
            .resolve(&self.tree, InterruptedPathPolicy::Truncate)
            .0
    }

    /// Send leave/enter (or drag-leave/drag-enter) for the change from the
    /// cached hover path to `new_path`, then cache `new_path`.
    pub(crate) fn update_hover(&mut self, new_path: &WidgetPath, input: &PointerInput) {
        let old: SmallVec<[WidgetId; 8]> = self.state.under_cursor.ids().iter().copied().collect();
        let new: SmallVec<[WidgetId; 8]> = new_path.ids().collect();
        self.state.under_cursor = new_path.to_weak();
        let events = hover::transition(&old, &new);
        if events.is_empty() {
            return;
        }
        let op = self.state.drag_drop.lend();
        let ctx = ReplyContext::pointer(input, new_path);
        for ev in events {
            let (widget, entering) = match ev {
                HoverEvent::Enter(w) => (w, true),
                HoverEvent::Leave(w) => (w, false),
            };
            let geometry = new_path
                .get(widget)
                .map(|a| a.geometry)
                .or_else(|| self.tree.geometry(widget));
            let Some(geometry) = geometry else {
                continue;
            };
            let event = match (&op, entering) {
                (Some(op), true) => WidgetEvent::DragEnter {
                    payload: &op.payload,
                    input,
                },
                (Some(op), false) => WidgetEvent::DragLeave {
                    payload: &op.payload,
                    input,
                },
                (None, true) => WidgetEvent::PointerEnter(input),
                (None, false) => WidgetEvent::PointerLeave(input),
            };
            let reply = self.host.on_event(widget, &geometry, Phase::Bubble, &event);
            self.process_reply(reply, widget, &ctx, &mut Delivery::default());
        }
        if let Some(op) = op
            && let Some(ended) = self.state.drag_drop.restore(op)
        {
            self.abandon_drag(ended);
        }
    }

    /// Cursor asked for by the last hovered or captured path.
    pub fn current_cursor(&self) -> CursorIcon {
        self.state.cursor
    }

    pub(crate) fn update_cursor(&mut self, path: &WidgetPath) {
        let cursor = path
            .widgets()
            .iter()
            .rev()
            .find_map(|a| self.host.cursor(a.widget))
            .unwrap_or_default();
        if cursor != self.state.cursor {
            tracing::trace!(?cursor, "cursor changed");
            self.state.cursor = cursor;
        }
    }

    /// The open tooltip.
    pub fn tooltip(&self) -> Option<TooltipState> {
        self.state.tooltip.state(self.state.now)
    }

    /// Record the tooltip source under the cursor and advance the tooltip.
    pub(crate) fn refresh_tooltip_hover(&mut self, path: &WidgetPath, cursor: Point) {
        let blocked = self.state.pointers.any_pressed()
            || self.state.drag_drop.is_dragging()
            || self.state.capture.any()
            || self.state.external_modals > 0;
        let source = if blocked {
            None
        } else {
            path.ids().rev().find(|&w| self.host.has_tooltip(w))
        };
        let force_field = path
            .widgets()
            .iter()
            .filter(|a| self.host.has_tooltip_force_field(a.widget))
            .map(|a| a.geometry.screen_rect())
            .reduce(|a, b| a.union(b));
        self.state.tooltip.set_hover(source, force_field, cursor);
        self.update_tooltip(self.state.now);
    }

    fn update_tooltip(&mut self, now: u64) {
        match self.state.tooltip.update(now) {
            TooltipChange::None => {
                if let Some(source) = self.state.tooltip.source() {
                    self.place_tooltip(source);
                }
            }
            TooltipChange::Opened(source) => self.open_tooltip(source),
            TooltipChange::Closed(source) => {
                tracing::debug!(source = ?source, "tooltip closed");
                self.host.on_tooltip_closed(source);
            }
            TooltipChange::Replaced(old, new) => {
                tracing::debug!(source = ?old, "tooltip closed");
                self.host.on_tooltip_closed(old);
                self.open_tooltip(new);
            }
        }
    }

    fn open_tooltip(&mut self, source: WidgetId) {
        let position = self.place_tooltip(source);
        tracing::debug!(source = ?source, ?position, "tooltip opened");
        self.host.on_tooltip_opened(source, position);
    }

    fn place_tooltip(&mut self, source: WidgetId) -> Point {
        let size = self.host.tooltip_size(source);
        self.state.tooltip.reposition(
            size,
            self.settings.tooltip_offsets,
            self.settings.tooltip_work_area,
        )
    }

    /// Close the tooltip, if open, and restart its timer.
    pub fn close_tooltip(&mut self) {
        if let Some(source) = self.state.tooltip.reset() {
            tracing::debug!(source = ?source, "tooltip closed");
            self.host.on_tooltip_closed(source);
        }
    }

    // --- Throttle -------------------------------------------------------------

    /// Ask the host to cut background work until the handle is released.
    pub fn request_throttle(&mut self) -> ThrottleHandle {
        self.state.throttle.request()
    }

    /// Release a throttle request.
    pub fn release_throttle(&mut self, handle: ThrottleHandle) {
        self.state.throttle.release(handle);
    }

    /// Whether background work should be throttled right now.
    pub fn is_throttled(&self) -> bool {
        self.state.throttle.is_throttled() || self.state.motion.is_engaged()
    }

    // --- Windows --------------------------------------------------------------

    /// Windows eligible for input, back to front.
    ///
    /// None while a platform modal loop runs. With a modal active it is the
    /// top modal window and the windows it owns; otherwise every window.
    pub fn interactive_top_level_windows(&self) -> Vec<WidgetId> {
        if self.state.external_modals > 0 {
            return Vec::new();
        }
        match self.state.modals.top() {
            Some(modal) => self.tree.window_stack(modal),
            None => self.tree.windows_back_to_front(),
        }
    }

    /// Hit test `point` against the interactive windows.
    pub fn locate_window_under_mouse(&self, point: Point) -> WidgetPath {
        self.tree
            .locate_window_under(point, &self.interactive_top_level_windows())
    }

    /// Open popups, bottom to top.
    pub fn popup_stack(&self) -> &[PopupStackEntry] {
        self.state.popups.entries()
    }

    /// Modal windows, bottom to top.
    pub fn modal_stack(&self) -> &[ModalWindowStackEntry] {
        self.state.modals.entries()
    }

    /// Top modal window.
    pub fn active_modal_window(&self) -> Option<WidgetId> {
        self.state.modals.top()
    }

    /// Drop stack entries whose windows were removed from the tree.
    pub(crate) fn revalidate_stacks(&mut self) {
        let dead_modal = self
            .state
            .modals
            .entries()
            .iter()
            .position(|e| !self.tree.is_window(e.window));
        if let Some(index) = dead_modal {
            tracing::warn!(index, "modal window removed without closing");
            self.pop_modals_from(index);
        }
        let dead_popup = self
            .state
            .popups
            .entries()
            .iter()
            .position(|e| !self.tree.is_window(e.window));
        if let Some(index) = dead_popup {
            tracing::warn!(index, "popup window removed without dismissal");
            self.dismiss_menus_from(index);
        }
    }
}
