// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=switchyard_event_state --heading-base-level=0

//! Switchyard Event State: small, deterministic interaction state machines.
//!
//! Each module tracks one kind of cross-event state that an input dispatcher
//! needs but that does not depend on the widget tree. They are generic over the
//! widget key `K` and take timestamps as plain `u64` milliseconds, so they can
//! be driven from tests without a clock.
//!
//! - [`pointer`]: pointer ids, buttons, and last-known position and pressed set.
//! - [`drag`]: turning "press, then move far enough" into a single drag report.
//! - [`tooltip`]: hover delay, fade-in, and repel-aware placement.
//! - [`throttle`]: a request-counted gate and a speed-driven auto throttle.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod drag;
pub mod pointer;
pub mod throttle;
pub mod tooltip;
