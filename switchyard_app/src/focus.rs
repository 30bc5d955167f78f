// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard focus bookkeeping.
//!
//! The focused widget is stored as a weak path plus the cause of the last
//! change. Requests made while a change is being announced are queued and
//! replayed from [`Application::tick`](crate::Application::tick).

use alloc::collections::VecDeque;

use switchyard_focus::FocusCause;
use switchyard_tree::{InterruptedPathPolicy, Tree, WeakWidgetPath, WidgetId, WidgetPath};

/// A queued focus change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FocusRequest {
    Widget(WidgetId, FocusCause),
    Clear(FocusCause),
}

#[derive(Clone, Debug)]
pub(crate) struct FocusManager {
    path: WeakWidgetPath,
    cause: FocusCause,
    in_transition: bool,
    deferred: VecDeque<FocusRequest>,
}

impl Default for FocusManager {
    fn default() -> Self {
        Self {
            path: WeakWidgetPath::new(),
            cause: FocusCause::Cleared,
            in_transition: false,
            deferred: VecDeque::new(),
        }
    }
}

impl FocusManager {
    pub(crate) fn weak_path(&self) -> &WeakWidgetPath {
        &self.path
    }

    pub(crate) fn cause(&self) -> FocusCause {
        self.cause
    }

    /// Resolve the focus path. A path that no longer resolves in full counts
    /// as no focus.
    pub(crate) fn resolve(&self, tree: &Tree) -> WidgetPath {
        self.path.resolve(tree, InterruptedPathPolicy::ReturnInvalid).0
    }

    /// Drop a decayed focus path. Returns `true` if one was dropped.
    pub(crate) fn revalidate(&mut self, tree: &Tree) -> bool {
        if self.path.is_empty() || self.path.is_valid(tree) {
            return false;
        }
        tracing::debug!(widget = ?self.path.last_widget(), "focus path decayed");
        self.path.clear();
        self.cause = FocusCause::Cleared;
        true
    }

    pub(crate) fn store(&mut self, path: WeakWidgetPath, cause: FocusCause) {
        self.path = path;
        self.cause = cause;
    }

    pub(crate) fn in_transition(&self) -> bool {
        self.in_transition
    }

    pub(crate) fn set_in_transition(&mut self, active: bool) {
        self.in_transition = active;
    }

    pub(crate) fn defer(&mut self, request: FocusRequest) {
        tracing::debug!(?request, "focus change deferred");
        self.deferred.push_back(request);
    }

    pub(crate) fn next_deferred(&mut self) -> Option<FocusRequest> {
        self.deferred.pop_front()
    }

    pub(crate) fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use switchyard_tree::LocalWidget;

    #[test]
    fn decayed_focus_becomes_no_focus() {
        let mut tree = Tree::new();
        let window = tree.insert_window(
            None,
            LocalWidget {
                local_bounds: Rect::new(0.0, 0.0, 50.0, 50.0),
                ..LocalWidget::default()
            },
        );
        let field = tree.insert(Some(window), LocalWidget::default());
        let mut focus = FocusManager::default();
        focus.store(tree.path_to(field).to_weak(), FocusCause::SetDirectly);
        assert_eq!(focus.resolve(&tree).last_widget(), Some(field));

        tree.remove(field);
        // Resolution never yields the intact prefix.
        assert!(focus.resolve(&tree).is_empty());
        assert!(focus.revalidate(&tree));
        assert!(focus.weak_path().is_empty());
        assert_eq!(focus.cause(), FocusCause::Cleared);
        assert!(!focus.revalidate(&tree));
    }

    #[test]
    fn deferred_requests_replay_in_order() {
        let mut focus = FocusManager::default();
        focus.defer(FocusRequest::Clear(FocusCause::Cleared));
        focus.defer(FocusRequest::Clear(FocusCause::Navigation));
        assert!(focus.has_deferred());
        assert_eq!(focus.next_deferred(), Some(FocusRequest::Clear(FocusCause::Cleared)));
        assert_eq!(focus.next_deferred(), Some(FocusRequest::Clear(FocusCause::Navigation)));
        assert_eq!(focus.next_deferred(), None);
    }
}
