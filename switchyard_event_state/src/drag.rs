// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag detection: the sub-threshold phase between a press and a confirmed drag.
//!
//! A widget that wants to be dragged answers a press by asking for detection:
//! "tell me when the pointer has travelled far enough from here while this
//! button is still held." [`DragDetector`] records that request per pointer and
//! reports it exactly once, when the pointer first reaches the trigger
//! distance. Releasing the button earlier drops the request without a report.
//!
//! What happens after detection (the widget supplies a payload, the payload
//! travels with the pointer, it is dropped or cancelled) is owned by the
//! caller; [`DragPhase`] names the three states of the full lifecycle.
//!
//! ```
//! use kurbo::Point;
//! use switchyard_event_state::drag::DragDetector;
//! use switchyard_event_state::pointer::{MouseButton, PointerButtons, PointerId};
//!
//! let mut detector: DragDetector<u32> = DragDetector::with_trigger_distance(5.0);
//! detector.detect(PointerId::MOUSE, 42, Point::new(10.0, 10.0), MouseButton::Left);
//!
//! // Below the trigger distance nothing happens.
//! let held = PointerButtons::LEFT;
//! assert!(detector.on_move(PointerId::MOUSE, Point::new(12.0, 11.0), held).is_none());
//!
//! // Reaching it reports the request once.
//! let hit = detector.on_move(PointerId::MOUSE, Point::new(15.0, 10.0), held);
//! assert_eq!(hit.map(|r| r.target), Some(42));
//! assert!(detector.on_move(PointerId::MOUSE, Point::new(30.0, 10.0), held).is_none());
//! ```

use alloc::collections::BTreeMap;
use kurbo::Point;

use crate::pointer::{MouseButton, PointerButtons, PointerId};

/// Default distance, in screen pixels, a pointer must travel before a drag starts.
pub const DEFAULT_TRIGGER_DISTANCE: f64 = 5.0;

/// Lifecycle of a drag gesture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// No drag activity.
    #[default]
    Idle,
    /// A widget asked for detection and the pointer has not travelled far enough.
    Detecting,
    /// A payload is in flight.
    Dragging,
}

/// A pending detection request.
#[derive(Clone, Debug, PartialEq)]
pub struct DragRequest<K> {
    /// Widget that asked for detection.
    pub target: K,
    /// Where the pointer was when detection started.
    pub origin: Point,
    /// Button that must stay held.
    pub button: MouseButton,
}

/// Per-pointer drag detection.
#[derive(Clone, Debug)]
pub struct DragDetector<K> {
    requests: BTreeMap<PointerId, DragRequest<K>>,
    /// Distance from the origin at which a drag is reported (inclusive).
    pub trigger_distance: f64,
}

impl<K: Clone> DragDetector<K> {
    /// Create a detector with [`DEFAULT_TRIGGER_DISTANCE`].
    pub fn new() -> Self {
        Self::with_trigger_distance(DEFAULT_TRIGGER_DISTANCE)
    }

    /// Create a detector with a custom trigger distance.
    pub fn with_trigger_distance(trigger_distance: f64) -> Self {
        Self {
            requests: BTreeMap::new(),
            trigger_distance,
        }
    }

    /// Start detecting for `pointer`, replacing any earlier request.
    pub fn detect(&mut self, pointer: PointerId, target: K, origin: Point, button: MouseButton) {
        self.requests.insert(
            pointer,
            DragRequest {
                target,
                origin,
                button,
            },
        );
    }

    /// Feed a pointer move.
    ///
    /// Returns the request, and forgets it, the first time the pointer is at
    /// least [`trigger_distance`](Self::trigger_distance) away from the origin
    /// while the button is held. A request whose button is no longer held is
    /// dropped silently.
    pub fn on_move(
        &mut self,
        pointer: PointerId,
        position: Point,
        pressed: PointerButtons,
    ) -> Option<DragRequest<K>> {
        let request = self.requests.get(&pointer)?;
        if !pressed.contains(request.button.into()) {
            self.requests.remove(&pointer);
            return None;
        }
        if request.origin.distance(position) >= self.trigger_distance {
            return self.requests.remove(&pointer);
        }
        None
    }

    /// Feed a button release. Returns `true` if it ended a pending request.
    pub fn on_up(&mut self, pointer: PointerId, button: MouseButton) -> bool {
        if self
            .requests
            .get(&pointer)
            .is_some_and(|r| r.button == button)
        {
            self.requests.remove(&pointer);
            return true;
        }
        false
    }

    /// Drop the request for a pointer. Returns `true` if one was pending.
    pub fn cancel(&mut self, pointer: PointerId) -> bool {
        self.requests.remove(&pointer).is_some()
    }

    /// Keep only the requests for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(PointerId, &DragRequest<K>) -> bool) {
        self.requests.retain(|&pointer, request| keep(pointer, request));
    }

    /// Drop every request.
    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// Whether a pointer has a pending request.
    pub fn is_detecting(&self, pointer: PointerId) -> bool {
        self.requests.contains_key(&pointer)
    }

    /// Whether any pointer has a pending request.
    pub fn any_detecting(&self) -> bool {
        !self.requests.is_empty()
    }

    /// The pending request for a pointer.
    pub fn request(&self, pointer: PointerId) -> Option<&DragRequest<K>> {
        self.requests.get(&pointer)
    }
}

impl<K: Clone> Default for DragDetector<K> {
    fn default() -> Self {
        Self::new()
    }
}
