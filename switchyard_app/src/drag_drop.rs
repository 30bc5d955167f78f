// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag detection and the drag-drop operation in flight.

use kurbo::Point;
use switchyard_event_state::drag::{DragDetector, DragPhase, DragRequest};
use switchyard_event_state::pointer::{MouseButton, PointerButtons, PointerId};
use switchyard_tree::WidgetId;

/// A drag-drop in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct DragDropOperation<P> {
    /// What is being dragged.
    pub payload: P,
    /// Widget the drag started from; `None` for drags from outside the application.
    pub source: Option<WidgetId>,
    /// Pointer carrying the payload.
    pub pointer: PointerId,
}

impl<P> DragDropOperation<P> {
    /// Whether the payload came from outside the application.
    pub fn is_external(&self) -> bool {
        self.source.is_none()
    }
}

/// Idle, detecting, or dragging.
///
/// While an event about the payload is being delivered, the operation is lent
/// out to the delivery and `lent` is set; a reply ending the drag during that
/// window is recorded in `end_requested` and honored when it comes back.
#[derive(Debug)]
pub(crate) struct DragDropController<P> {
    detector: DragDetector<WidgetId>,
    operation: Option<DragDropOperation<P>>,
    lent: bool,
    end_requested: bool,
}

impl<P> DragDropController<P> {
    pub(crate) fn new(trigger_distance: f64) -> Self {
        Self {
            detector: DragDetector::with_trigger_distance(trigger_distance),
            operation: None,
            lent: false,
            end_requested: false,
        }
    }

    pub(crate) fn set_trigger_distance(&mut self, distance: f64) {
        self.detector.trigger_distance = distance;
    }

    pub(crate) fn phase(&self) -> DragPhase {
        if self.is_dragging() {
            DragPhase::Dragging
        } else if self.detector.any_detecting() {
            DragPhase::Detecting
        } else {
            DragPhase::Idle
        }
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.operation.is_some() || self.lent
    }

    pub(crate) fn operation(&self) -> Option<&DragDropOperation<P>> {
        self.operation.as_ref()
    }

    pub(crate) fn detect(&mut self, pointer: PointerId, target: WidgetId, origin: Point, button: MouseButton) {
        if self.is_dragging() {
            return;
        }
        tracing::debug!(?pointer, widget = ?target, ?button, "drag detection started");
        self.detector.detect(pointer, target, origin, button);
    }

    pub(crate) fn on_move(
        &mut self,
        pointer: PointerId,
        position: Point,
        pressed: PointerButtons,
    ) -> Option<DragRequest<WidgetId>> {
        let request = self.detector.on_move(pointer, position, pressed)?;
        tracing::debug!(?pointer, widget = ?request.target, "drag detected");
        Some(request)
    }

    pub(crate) fn on_up(&mut self, pointer: PointerId, button: MouseButton) {
        if self.detector.on_up(pointer, button) {
            tracing::debug!(?pointer, "drag detection ended without a drag");
        }
    }

    pub(crate) fn cancel_detection(&mut self) {
        self.detector.clear();
    }

    pub(crate) fn cancel_detection_for(&mut self, pointer: PointerId) {
        self.detector.cancel(pointer);
    }

    /// Cancel any detection whose target satisfies `doomed`.
    pub(crate) fn cancel_detection_where(&mut self, mut doomed: impl FnMut(WidgetId) -> bool) {
        self.detector.retain(|_, request| !doomed(request.target));
    }

    /// Start an operation. Returns the payload back if one is already running.
    pub(crate) fn begin(&mut self, operation: DragDropOperation<P>) -> Result<(), P> {
        if self.is_dragging() {
            return Err(operation.payload);
        }
        tracing::debug!(
            pointer = ?operation.pointer,
            source = ?operation.source,
            "drag-drop started"
        );
        self.detector.clear();
        self.operation = Some(operation);
        Ok(())
    }

    /// Take the operation out for delivery.
    pub(crate) fn lend(&mut self) -> Option<DragDropOperation<P>> {
        let op = self.operation.take()?;
        self.lent = true;
        Some(op)
    }

    /// Give a lent operation back. Returns it instead if a reply asked to end
    /// the drag while it was out.
    pub(crate) fn restore(&mut self, operation: DragDropOperation<P>) -> Option<DragDropOperation<P>> {
        self.lent = false;
        if core::mem::take(&mut self.end_requested) {
            return Some(operation);
        }
        self.operation = Some(operation);
        None
    }

    /// End the operation. While it is lent out the end is deferred until
    /// [`restore`](Self::restore).
    pub(crate) fn take(&mut self) -> Option<DragDropOperation<P>> {
        if self.lent {
            self.end_requested = true;
            return None;
        }
        self.operation.take()
    }
}
