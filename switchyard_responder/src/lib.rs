// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=switchyard_responder --heading-base-level=0

//! Switchyard Responder: replies, routes, and the dispatch loop.
//!
//! ## Overview
//!
//! This crate describes how an event travels along a widget path and what a
//! widget can ask for in return. It does not hit test and does not own any
//! interaction state.
//!
//! - [`route`] turns a root-to-leaf path into a sequence of
//!   [`Dispatch`](types::Dispatch) entries: leaf to root for ordinary events,
//!   or a root-to-leaf [`Preview`](types::Phase::Preview) tunnel followed by
//!   the bubble for events ancestors may want to intercept.
//! - [`dispatcher::run`] walks a route, threading caller state through a
//!   handler, and stops when the handler returns
//!   [`Outcome::Stop`](types::Outcome::Stop).
//! - [`Reply`](reply::Reply) is the value a widget returns: whether it handled
//!   the event, plus optional capture, focus, drag and throttle instructions.
//! - [`hover::transition`] computes leave/enter notifications between the
//!   previous and current paths under the cursor.
//!
//! ## Workflow
//!
//! 1) Resolve a path (hit test, captor, or focus path).
//! 2) Build a route with [`route::bubble`] or [`route::tunnel_and_bubble`].
//! 3) [`dispatcher::run`] it; in the handler, deliver the event, apply the
//!    returned [`Reply`](reply::Reply) and stop on `handled`.
//!
//! ```
//! use switchyard_responder::reply::Reply;
//! use switchyard_responder::types::Outcome;
//! use switchyard_responder::{dispatcher, route};
//!
//! // Widget 3 is the leaf; widget 2 handles clicks.
//! let route = route::bubble([(1_u32, ()), (2, ()), (3, ())]);
//! let mut replies: Vec<(u32, Reply<u32, ()>)> = Vec::new();
//! let stopped = dispatcher::run(&route, &mut replies, |d, replies| {
//!     let reply = if d.node == 2 { Reply::handled() } else { Reply::unhandled() };
//!     let handled = reply.handled;
//!     replies.push((d.node, reply));
//!     if handled { Outcome::Stop } else { Outcome::Continue }
//! });
//! assert_eq!(stopped.map(|d| d.node), Some(2));
//! assert_eq!(replies.len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
pub mod hover;
pub mod reply;
pub mod route;
pub mod types;
