// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The popup/menu stack.

use alloc::vec::Vec;

use switchyard_tree::{WidgetId, WidgetPath};

/// Animation a popup opens with. The dispatcher stores it for the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PopupTransition {
    /// Appear in place.
    #[default]
    None,
    /// Drop down from a combo button.
    ComboButton,
    /// Context menu at the cursor.
    ContextMenu,
    /// Sub-menu opening to the right of its parent entry.
    SubMenuRight,
    /// Sub-menu opening below its parent entry.
    SubMenuDown,
    /// Free-standing type-in popup.
    TypeInPopup,
}

/// A popup to push with [`Application::push_menu`](crate::Application::push_menu).
///
/// ```
/// # use switchyard_tree::{LocalWidget, Tree};
/// use switchyard_app::{MenuRequest, PopupTransition};
/// # let mut tree = Tree::new();
/// # let root_menu = tree.insert_window(None, LocalWidget::default());
/// # let sub_menu = tree.insert_window(None, LocalWidget::default());
///
/// let request = MenuRequest::new(sub_menu)
///     .with_parent(root_menu)
///     .with_transition(PopupTransition::SubMenuRight)
///     .focus_immediately();
/// assert!(request.focus_immediately);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MenuRequest {
    /// Window of the popup.
    pub window: WidgetId,
    /// Popup window this one is nested under, or `None` for a root popup.
    pub parent: Option<WidgetId>,
    /// Widget the popup was opened from. Clicks on it do not dismiss the popup.
    pub anchor: Option<WidgetId>,
    /// Move keyboard focus into the popup when it opens.
    pub focus_immediately: bool,
    /// Opening animation.
    pub transition: PopupTransition,
}

impl MenuRequest {
    /// A root popup without anchor.
    pub fn new(window: WidgetId) -> Self {
        Self {
            window,
            parent: None,
            anchor: None,
            focus_immediately: false,
            transition: PopupTransition::None,
        }
    }

    /// Nest under another popup window.
    #[must_use]
    pub fn with_parent(mut self, parent: WidgetId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Record the anchor widget.
    #[must_use]
    pub fn with_anchor(mut self, anchor: WidgetId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Focus the popup once it is pushed.
    #[must_use]
    pub fn focus_immediately(mut self) -> Self {
        self.focus_immediately = true;
        self
    }

    /// Set the opening animation.
    #[must_use]
    pub fn with_transition(mut self, transition: PopupTransition) -> Self {
        self.transition = transition;
        self
    }
}

/// One open popup.
pub type PopupStackEntry = MenuRequest;

#[derive(Clone, Debug, Default)]
pub(crate) struct PopupStack {
    entries: Vec<PopupStackEntry>,
}

impl PopupStack {
    pub(crate) fn entries(&self) -> &[PopupStackEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn position(&self, window: WidgetId) -> Option<usize> {
        self.entries.iter().position(|e| e.window == window)
    }

    pub(crate) fn push(&mut self, entry: PopupStackEntry) {
        self.entries.push(entry);
    }

    /// Forget entry `index` and above without dismissing them.
    pub(crate) fn truncate(&mut self, index: usize) {
        self.entries.truncate(index);
    }

    /// Remove entry `index` and everything above it, topmost first.
    pub(crate) fn dismiss_from(&mut self, index: usize) -> Vec<PopupStackEntry> {
        if index >= self.entries.len() {
            return Vec::new();
        }
        let mut removed = self.entries.split_off(index);
        removed.reverse();
        removed
    }

    /// How many entries survive a press on `path`.
    ///
    /// The topmost entry the press landed within, per `within`, or whose
    /// anchor lies on the path, survives along with everything below it.
    pub(crate) fn depth_kept_by(&self, path: &WidgetPath, within: impl Fn(WidgetId) -> bool) -> usize {
        self.entries
            .iter()
            .rposition(|e| within(e.window) || e.anchor.is_some_and(|a| path.contains(a)))
            .map_or(0, |i| i + 1)
    }
}
