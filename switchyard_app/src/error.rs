// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use switchyard_tree::WidgetId;

/// A rejected request.
///
/// Interaction state is consistent again by the time one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
    /// A popup named a parent that is not on the popup stack. The whole stack
    /// was dismissed.
    #[error("popup parent {0:?} is not on the popup stack")]
    PopupParentNotOnStack(WidgetId),
    /// The widget is not a live window.
    #[error("{0:?} is not a live window")]
    NotAWindow(WidgetId),
    /// The window is already on the modal stack.
    #[error("{0:?} is already on the modal stack")]
    ModalAlreadyOnStack(WidgetId),
    /// No visible path leads to the widget.
    #[error("{0:?} is not reachable from any window")]
    WidgetUnreachable(WidgetId),
}
