// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The modal window stack.

use alloc::vec::Vec;

use switchyard_tree::WidgetId;

/// One modal window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ModalWindowStackEntry {
    /// The modal window.
    pub window: WidgetId,
    /// Widget the modal was opened for.
    pub parent: Option<WidgetId>,
}

/// Only the top entry receives input. Entries are only added or removed at
/// the top.
#[derive(Clone, Debug, Default)]
pub(crate) struct ModalStack {
    entries: Vec<ModalWindowStackEntry>,
}

impl ModalStack {
    pub(crate) fn entries(&self) -> &[ModalWindowStackEntry] {
        &self.entries
    }

    pub(crate) fn top(&self) -> Option<WidgetId> {
        self.entries.last().map(|e| e.window)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn position(&self, window: WidgetId) -> Option<usize> {
        self.entries.iter().position(|e| e.window == window)
    }

    pub(crate) fn push(&mut self, entry: ModalWindowStackEntry) {
        self.entries.push(entry);
    }

    /// Remove entry `index` and everything above it, topmost first.
    pub(crate) fn pop_from(&mut self, index: usize) -> Vec<ModalWindowStackEntry> {
        if index >= self.entries.len() {
            return Vec::new();
        }
        let mut removed = self.entries.split_off(index);
        removed.reverse();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_tree::{LocalWidget, Tree};

    #[test]
    fn popping_a_lower_modal_pops_everything_above() {
        let mut tree = Tree::new();
        let ws: Vec<WidgetId> = (0..3).map(|_| tree.insert_window(None, LocalWidget::default())).collect();
        let mut stack = ModalStack::default();
        for &window in &ws {
            stack.push(ModalWindowStackEntry { window, parent: None });
        }
        assert_eq!(stack.top(), Some(ws[2]));
        let popped: Vec<WidgetId> = stack.pop_from(1).iter().map(|e| e.window).collect();
        assert_eq!(popped, alloc::vec![ws[2], ws[1]]);
        assert_eq!(stack.top(), Some(ws[0]));
        assert!(stack.pop_from(3).is_empty());
        stack.pop_from(0);
        assert!(stack.is_empty());
    }
}
