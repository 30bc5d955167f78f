// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popup menus, modal windows, and window lifecycle.

use alloc::vec::Vec;
use core::ops::ControlFlow;

use kurbo::{Rect, Size};
use switchyard_focus::FocusCause;
use switchyard_responder::route;
use switchyard_tree::{InterruptedPathPolicy, WidgetId};

use crate::application::{Application, ReplyContext};
use crate::error::InteractionError;
use crate::event::{ActivationCause, WidgetEvent};
use crate::host::WidgetHost;
use crate::modal::ModalWindowStackEntry;
use crate::popup::MenuRequest;

impl<H: WidgetHost> Application<H> {
    // --- Popups -------------------------------------------------------------

    /// Open a popup menu.
    ///
    /// Pushing a window that is already on the stack dismisses the popups
    /// above it and re-opens it in place; the window itself stays alive. A
    /// request with a parent keeps the stack up to that parent; one without a
    /// parent replaces the whole stack. A parent that is not on the stack
    /// dismisses everything and is reported as an error, with the popup left
    /// closed.
    pub fn push_menu(&mut self, request: MenuRequest) -> Result<(), InteractionError> {
        if !self.tree.is_window(request.window) {
            return Err(InteractionError::NotAWindow(request.window));
        }
        if let Some(index) = self.state.popups.position(request.window) {
            self.dismiss_menus_from(index + 1);
            self.state.popups.truncate(index);
            tracing::debug!(window = ?request.window, "popup re-opened");
        }
        match request.parent {
            None => self.dismiss_menus_from(0),
            Some(parent) => match self.state.popups.position(parent) {
                Some(index) => self.dismiss_menus_from(index + 1),
                None => {
                    self.dismiss_menus_from(0);
                    tracing::warn!(window = ?request.window, parent = ?parent, "popup parent not open");
                    return Err(InteractionError::PopupParentNotOnStack(parent));
                }
            },
        }

        let owner = request
            .parent
            .or_else(|| request.anchor.and_then(|a| self.tree.window_of(a)));
        self.tree.set_window_owner(request.window, owner);
        self.tree.bring_to_front(request.window);
        self.state.popups.push(request);
        tracing::debug!(
            window = ?request.window,
            parent = ?request.parent,
            transition = ?request.transition,
            depth = self.state.popups.len(),
            "popup opened"
        );

        if request.focus_immediately {
            let path = self.tree.path_to(request.window);
            self.set_keyboard_focus_to_path(&path, FocusCause::SetDirectly);
        }
        Ok(())
    }

    /// Dismiss `window` and every popup above it. Returns `false` if it was
    /// not open.
    pub fn dismiss_menu(&mut self, window: WidgetId) -> bool {
        match self.state.popups.position(window) {
            Some(index) => {
                self.dismiss_menus_from(index);
                true
            }
            None => false,
        }
    }

    /// Dismiss every popup.
    pub fn dismiss_all_menus(&mut self) {
        self.dismiss_menus_from(0);
    }

    /// Dismiss stack entry `index` and above, topmost first, removing each
    /// popup window from the tree.
    pub(crate) fn dismiss_menus_from(&mut self, index: usize) {
        for entry in self.state.popups.dismiss_from(index) {
            tracing::debug!(window = ?entry.window, "popup dismissed");
            self.host.on_popup_dismissed(entry.window);
            self.release_captures_within(entry.window);
            self.tree.remove(entry.window);
        }
    }

    // --- Modals -------------------------------------------------------------

    /// Make `window` modal: input goes only to it and the windows it owns
    /// until it is closed.
    pub fn add_modal_window(
        &mut self,
        window: WidgetId,
        parent: Option<WidgetId>,
    ) -> Result<(), InteractionError> {
        if !self.tree.is_window(window) {
            return Err(InteractionError::NotAWindow(window));
        }
        if self.state.modals.position(window).is_some() {
            return Err(InteractionError::ModalAlreadyOnStack(window));
        }

        let owner = parent.and_then(|p| self.tree.window_of(p));
        if owner.is_some() {
            self.tree.set_window_owner(window, owner);
        }
        self.tree.bring_to_front(window);
        let first = self.state.modals.is_empty();
        self.state
            .modals
            .push(ModalWindowStackEntry { window, parent });
        tracing::debug!(window = ?window, parent = ?parent, "modal window added");

        self.release_all_captures();
        self.state.pointers.clear_pressed();
        self.state.drag_drop.cancel_detection();
        self.close_tooltip();
        self.dismiss_all_menus();
        let path = self.tree.path_to(window);
        self.set_keyboard_focus_to_path(&path, FocusCause::WindowActivate);

        if first {
            self.host.on_modal_stack_changed(true);
        }
        Ok(())
    }

    /// Close modal `window` and any modal above it. Focus returns to the
    /// parent the lowest closed modal was opened for, if it still exists.
    ///
    /// Returns `false` if `window` is not on the modal stack.
    pub fn close_modal_window(&mut self, window: WidgetId) -> bool {
        match self.state.modals.position(window) {
            Some(index) => {
                self.pop_modals_from(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn pop_modals_from(&mut self, index: usize) {
        let removed = self.state.modals.pop_from(index);
        let Some(lowest) = removed.last().copied() else {
            return;
        };
        for entry in &removed {
            tracing::debug!(window = ?entry.window, "modal window closed");
            self.release_captures_within(entry.window);
        }
        if self.state.modals.is_empty() {
            self.host.on_modal_stack_changed(false);
        }
        if let Some(parent) = lowest.parent
            && self.tree.is_alive(parent)
        {
            let path = self.tree.path_to(parent);
            if !path.is_empty() {
                self.set_keyboard_focus_to_path(&path, FocusCause::WindowActivate);
            }
        }
    }

    /// Run a modal loop: add `window` as a modal, call `pump` until it breaks
    /// or the window is closed or removed, then close the window.
    ///
    /// `pump` is where the caller feeds platform input and ticks.
    pub fn run_modal(
        &mut self,
        window: WidgetId,
        parent: Option<WidgetId>,
        mut pump: impl FnMut(&mut Self) -> ControlFlow<()>,
    ) -> Result<(), InteractionError> {
        self.add_modal_window(window, parent)?;
        while self.state.modals.position(window).is_some() && self.tree.is_window(window) {
            if pump(self).is_break() {
                break;
            }
        }
        self.close_modal_window(window);
        self.revalidate_stacks();
        Ok(())
    }

    /// Mark the start of a modal loop owned by the platform (a native file
    /// dialog, for instance).
    ///
    /// Until the matching [`end_external_modal`](Self::end_external_modal),
    /// no window is interactive: pointer input hits nothing, keyboard and
    /// controller input is dropped, and tooltips stay closed. Menus are
    /// dismissed and captures released when the first one starts.
    pub fn begin_external_modal(&mut self) {
        self.state.external_modals += 1;
        if self.state.external_modals == 1 {
            self.dismiss_all_menus();
            self.close_tooltip();
            self.release_all_captures();
        }
        tracing::debug!(depth = self.state.external_modals, "external modal started");
    }

    /// Mark the end of a platform modal loop.
    pub fn end_external_modal(&mut self) {
        if self.state.external_modals == 0 {
            tracing::warn!("external modal ended without starting");
            return;
        }
        self.state.external_modals -= 1;
        tracing::debug!(depth = self.state.external_modals, "external modal ended");
    }

    /// Whether a platform modal loop is running.
    pub fn is_external_modal_active(&self) -> bool {
        self.state.external_modals > 0
    }

    // --- Window lifecycle ---------------------------------------------------

    /// The platform activated `window`.
    ///
    /// Refused while a modal is active, unless `window` is the modal or a
    /// window it owns; the modal is brought forward instead.
    pub fn process_window_activated(&mut self, window: WidgetId, cause: ActivationCause) -> bool {
        if !self.tree.is_window(window) {
            return false;
        }
        if let Some(modal) = self.state.modals.top()
            && window != modal
            && !self.tree.is_window_descendant(window, modal)
        {
            tracing::warn!(window = ?window, modal = ?modal, "activation refused while modal");
            self.tree.bring_to_front(modal);
            return false;
        }

        self.tree.bring_to_front(window);
        let tree = &self.tree;
        let keep = self.state.popups.entries().iter().rposition(|e| {
            e.window == window || tree.is_window_descendant(window, e.window)
        });
        self.dismiss_menus_from(keep.map_or(0, |i| i + 1));

        let restored = self
            .state
            .window_focus
            .remove(&window)
            .map(|weak| weak.resolve(&self.tree, InterruptedPathPolicy::Truncate).0)
            .filter(|path| !path.is_empty());
        let path = restored.unwrap_or_else(|| self.tree.path_to(window));
        self.set_keyboard_focus_to_path(&path, cause.focus_cause());
        tracing::debug!(window = ?window, ?cause, "window activated");
        true
    }

    /// The platform deactivated `window`. Its focus is remembered for the
    /// next activation and captures are released.
    pub fn process_window_deactivated(&mut self, window: WidgetId) {
        let focused = self.focused_path();
        if focused.window() == Some(window) {
            self.state.window_focus.insert(window, focused.to_weak());
        }
        self.reset_to_default_input_settings();
        tracing::debug!(window = ?window, "window deactivated");
    }

    /// The application gained or lost activation. Losing it dismisses menus
    /// and tooltips, cancels an in-app drag, clears focus, and drops every
    /// throttle the application engaged on its own.
    pub fn process_application_activation(&mut self, active: bool) {
        tracing::debug!(active, "application activation changed");
        if active {
            return;
        }
        self.dismiss_all_menus();
        self.close_tooltip();
        if self
            .state
            .drag_drop
            .operation()
            .is_some_and(|op| !op.is_external())
        {
            self.cancel_drag_drop();
        }
        self.clear_keyboard_focus(FocusCause::WindowActivate);
        self.reset_to_default_input_settings();
        let pointers: Vec<_> = self.state.press_throttles.keys().copied().collect();
        for pointer in pointers {
            self.state.release_press_throttle(pointer);
        }
        self.state.motion.reset();
    }

    /// `window` changed size. Delivered to the window widget only.
    pub fn process_window_resized(&mut self, window: WidgetId, size: Size) -> bool {
        if !self.tree.is_window(window) {
            return false;
        }
        let origin = self
            .tree
            .local(window)
            .map_or(kurbo::Point::ZERO, |l| l.local_bounds.origin());
        self.tree
            .set_local_bounds(window, Rect::from_origin_size(origin, size));
        let path = self.tree.path_to(window);
        let Some(leaf) = path.leaf() else {
            return false;
        };
        let route = route::direct(leaf.widget, leaf.geometry);
        let ctx = ReplyContext::keyboard(&path);
        self.deliver(&route, &WidgetEvent::WindowResized(size), &ctx)
            .handled
    }

    /// The platform closed `window`. It and every window it owns are removed
    /// along with any state that pointed into them.
    pub fn process_window_close(&mut self, window: WidgetId) -> bool {
        if !self.tree.is_window(window) {
            return false;
        }
        let doomed = self.tree.window_stack(window);
        tracing::debug!(window = ?window, count = doomed.len(), "window closing");

        let modal = self
            .state
            .modals
            .entries()
            .iter()
            .position(|e| doomed.contains(&e.window));
        if let Some(index) = modal {
            self.pop_modals_from(index);
        }
        let popup = self
            .state
            .popups
            .entries()
            .iter()
            .position(|e| doomed.contains(&e.window));
        if let Some(index) = popup {
            self.dismiss_menus_from(index);
        }

        // Popups above may already have removed some of these.
        let doomed: Vec<WidgetId> = doomed
            .into_iter()
            .filter(|&w| self.tree.is_window(w))
            .collect();
        for &w in &doomed {
            self.release_captures_within(w);
        }
        let tree = &self.tree;
        self.state.drag_drop.cancel_detection_where(|target| {
            tree.window_of(target)
                .is_some_and(|w| doomed.contains(&w))
        });

        let focused = self.focused_path();
        if focused.window().is_some_and(|w| doomed.contains(&w)) {
            self.clear_keyboard_focus(FocusCause::WindowActivate);
        }
        if self
            .state
            .under_cursor
            .window()
            .is_some_and(|w| doomed.contains(&w))
        {
            self.state.under_cursor.clear();
        }
        self.state.window_focus.retain(|w, _| !doomed.contains(w));

        self.tree.remove(window);
        let tree = &self.tree;
        self.state.click_outside.retain(|&w| tree.is_alive(w));
        true
    }
}
