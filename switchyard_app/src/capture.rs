// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer and controller capture.
//!
//! One captor per pointer id, one per controller user. Captors are stored as
//! weak paths and re-resolved on use. Every operation that removes a captor
//! hands it back so the caller can send exactly one capture-lost notification.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use switchyard_event_state::pointer::PointerId;
use switchyard_tree::{InterruptedPathPolicy, PathResolution, Tree, WeakWidgetPath, WidgetId, WidgetPath};

#[derive(Clone, Debug, Default)]
pub(crate) struct CaptureManager {
    pointers: BTreeMap<PointerId, WeakWidgetPath>,
    controllers: BTreeMap<u32, WeakWidgetPath>,
}

impl CaptureManager {
    /// Store `path` as the captor of `pointer`. Returns the previous captor if
    /// it was a different widget.
    pub(crate) fn set(&mut self, pointer: PointerId, path: WeakWidgetPath) -> Option<WidgetId> {
        let new = path.last_widget();
        let previous = self.pointers.insert(pointer, path)?.last_widget();
        previous.filter(|&p| Some(p) != new)
    }

    pub(crate) fn captor(&self, pointer: PointerId) -> Option<WidgetId> {
        self.pointers.get(&pointer).and_then(WeakWidgetPath::last_widget)
    }

    pub(crate) fn any(&self) -> bool {
        !self.pointers.is_empty()
    }

    /// Resolve the captor of `pointer`.
    ///
    /// A captor that no longer resolves in full is removed and returned as the
    /// second element; the path is truncated or empty per `policy`.
    pub(crate) fn resolve(
        &mut self,
        tree: &Tree,
        pointer: PointerId,
        policy: InterruptedPathPolicy,
    ) -> (WidgetPath, Option<WidgetId>) {
        let Some(weak) = self.pointers.get(&pointer) else {
            return (WidgetPath::new(), None);
        };
        let (path, resolution) = weak.resolve(tree, policy);
        match resolution {
            PathResolution::Live => (path, None),
            PathResolution::Truncated => {
                let lost = self.release(pointer);
                tracing::warn!(?pointer, widget = ?lost, "captor no longer reachable");
                (path, lost)
            }
        }
    }

    /// Remove the captor of `pointer`.
    pub(crate) fn release(&mut self, pointer: PointerId) -> Option<WidgetId> {
        self.pointers.remove(&pointer).and_then(|p| p.last_widget())
    }

    /// Remove every pointer captor.
    pub(crate) fn release_all(&mut self) -> Vec<(PointerId, WidgetId)> {
        core::mem::take(&mut self.pointers)
            .into_iter()
            .filter_map(|(pointer, path)| path.last_widget().map(|w| (pointer, w)))
            .collect()
    }

    /// Remove every pointer captor whose path runs through `widget`.
    pub(crate) fn release_through(&mut self, widget: WidgetId) -> Vec<(PointerId, WidgetId)> {
        let hit: Vec<PointerId> = self
            .pointers
            .iter()
            .filter(|(_, path)| path.contains(widget))
            .map(|(&p, _)| p)
            .collect();
        hit.into_iter()
            .filter_map(|p| self.release(p).map(|w| (p, w)))
            .collect()
    }

    pub(crate) fn set_controller(&mut self, user: u32, path: WeakWidgetPath) {
        self.controllers.insert(user, path);
    }

    pub(crate) fn release_controller(&mut self, user: u32) -> bool {
        self.controllers.remove(&user).is_some()
    }

    pub(crate) fn controller_captor(&self, user: u32) -> Option<WidgetId> {
        self.controllers.get(&user).and_then(WeakWidgetPath::last_widget)
    }

    /// Resolve the controller captor of `user`, dropping it if it decayed.
    pub(crate) fn resolve_controller(&mut self, tree: &Tree, user: u32) -> WidgetPath {
        let Some(weak) = self.controllers.get(&user) else {
            return WidgetPath::new();
        };
        let (path, resolution) = weak.resolve(tree, InterruptedPathPolicy::ReturnInvalid);
        if resolution == PathResolution::Truncated {
            tracing::debug!(user, "controller captor no longer reachable");
            self.controllers.remove(&user);
        }
        path
    }

    pub(crate) fn clear_controllers(&mut self) {
        self.controllers.clear();
    }
}
