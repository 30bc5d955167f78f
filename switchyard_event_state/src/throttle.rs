// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Responsiveness throttling.
//!
//! While the user is actively interacting (a button held, a fast sweep of the
//! mouse) the host may want to cut background work so input stays responsive.
//! Two pieces cover that:
//!
//! - [`ThrottleGate`]: a request counter. Every [`ThrottleGate::request`] hands
//!   out a [`ThrottleHandle`] that must be given back through
//!   [`ThrottleGate::release`]; the gate is closed while any handle is out.
//! - [`MotionThrottle`]: engages on its own when consecutive pointer samples
//!   move fast enough, and disengages once no qualifying movement has been seen
//!   for the decay period.
//!
//! ```
//! use switchyard_event_state::throttle::ThrottleGate;
//!
//! let mut gate = ThrottleGate::new();
//! let a = gate.request();
//! let b = gate.request();
//! gate.release(a);
//! assert!(gate.is_throttled());
//! gate.release(b);
//! assert!(!gate.is_throttled());
//! ```

use alloc::collections::BTreeMap;

use kurbo::Point;

use crate::pointer::PointerId;

/// Proof of an outstanding throttle request.
///
/// Handles cannot be cloned, so a request can only be released once.
#[must_use = "a throttle request stays active until its handle is released"]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ThrottleHandle(u64);

/// Request-counted throttle flag.
#[derive(Clone, Debug, Default)]
pub struct ThrottleGate {
    outstanding: u32,
    next: u64,
}

impl ThrottleGate {
    /// Create an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the gate until the returned handle is released.
    pub fn request(&mut self) -> ThrottleHandle {
        self.outstanding = self.outstanding.saturating_add(1);
        self.next = self.next.wrapping_add(1);
        if self.outstanding == 1 {
            tracing::debug!("throttle engaged");
        }
        ThrottleHandle(self.next)
    }

    /// Give back a handle.
    pub fn release(&mut self, handle: ThrottleHandle) {
        let ThrottleHandle(_) = handle;
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.outstanding == 0 {
            tracing::debug!("throttle released");
        }
    }

    /// Whether any request is outstanding.
    pub fn is_throttled(&self) -> bool {
        self.outstanding > 0
    }

    /// Number of outstanding requests.
    pub fn outstanding(&self) -> u32 {
        self.outstanding
    }
}

/// Automatic throttle driven by pointer speed.
///
/// Samples are kept per pointer, so a touch contact and the mouse never
/// measure speed against each other's positions. Two samples with the same
/// timestamp carry no speed: the later one is folded into the next timed
/// sample instead of being treated as instantaneous.
#[derive(Clone, Debug)]
pub struct MotionThrottle {
    /// Minimum distance between two samples for them to count, in pixels.
    pub min_distance: f64,
    /// Minimum speed between two samples for them to count, in pixels per second.
    pub velocity_threshold: f64,
    /// How long the throttle stays engaged after the last qualifying sample, in milliseconds.
    pub decay: u64,
    last_samples: BTreeMap<PointerId, (Point, u64)>,
    engaged_until: Option<u64>,
}

impl MotionThrottle {
    /// Create a motion throttle.
    pub fn new(min_distance: f64, velocity_threshold: f64, decay: u64) -> Self {
        Self {
            min_distance,
            velocity_threshold,
            decay,
            last_samples: BTreeMap::new(),
            engaged_until: None,
        }
    }

    /// Feed a sample for `pointer`. Returns `true` if this sample engaged the
    /// throttle.
    pub fn on_move(&mut self, pointer: PointerId, position: Point, now: u64) -> bool {
        let Some(&(last, at)) = self.last_samples.get(&pointer) else {
            self.last_samples.insert(pointer, (position, now));
            return false;
        };
        let elapsed = now.saturating_sub(at);
        if elapsed == 0 {
            return false;
        }
        self.last_samples.insert(pointer, (position, now));

        let distance = last.distance(position);
        #[allow(
            clippy::cast_precision_loss,
            reason = "Millisecond durations are far below f64 precision limits."
        )]
        let speed = distance * 1000.0 / elapsed as f64;
        if distance < self.min_distance || speed < self.velocity_threshold {
            return false;
        }
        let engaged = self.engaged_until.is_none();
        self.engaged_until = Some(now.saturating_add(self.decay));
        if engaged {
            tracing::trace!(?pointer, ?position, speed, "motion throttle engaged");
        }
        engaged
    }

    /// Drop the last sample of `pointer`, so its next sample starts fresh.
    pub fn forget(&mut self, pointer: PointerId) {
        self.last_samples.remove(&pointer);
    }

    /// Advance time. Returns `true` if the throttle just disengaged.
    pub fn tick(&mut self, now: u64) -> bool {
        match self.engaged_until {
            Some(until) if now >= until => {
                self.engaged_until = None;
                true
            }
            _ => false,
        }
    }

    /// Whether the throttle is engaged.
    pub fn is_engaged(&self) -> bool {
        self.engaged_until.is_some()
    }

    /// Disengage and forget every sample.
    pub fn reset(&mut self) {
        self.engaged_until = None;
        self.last_samples.clear();
    }
}
