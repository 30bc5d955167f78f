// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a route and honor stop outcomes.
//!
//! [`run`] hands every entry of a route to a handler together with a mutable
//! state value, in order, until the handler returns [`Outcome::Stop`]. It
//! knows nothing about replies or widgets: callers decide what "handled"
//! means, usually by applying a [`Reply`](crate::reply::Reply) inside the
//! handler and stopping when it is handled.
//!
//! ## Example
//!
//! ```
//! use switchyard_responder::{dispatcher, route};
//! use switchyard_responder::types::{Outcome, Phase};
//!
//! let route = route::tunnel_and_bubble([(1_u32, ()), (2, ())]);
//!
//! let mut seen = Vec::new();
//! let stopped = dispatcher::run(&route, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     // Widget 2 consumes the bubble.
//!     if d.phase == Phase::Bubble && d.node == 2 {
//!         Outcome::Stop
//!     } else {
//!         Outcome::Continue
//!     }
//! });
//!
//! assert_eq!(stopped.map(|d| d.node), Some(2));
//! assert_eq!(seen, vec![
//!     (Phase::Preview, 1), (Phase::Preview, 2),
//!     (Phase::Bubble, 2),
//! ]);
//! ```

use crate::types::{Dispatch, Outcome};

/// Run `handler` over `seq` until it returns [`Outcome::Stop`].
///
/// Returns the entry propagation stopped at, or `None` if the whole route was
/// visited. A stop during the preview phase skips the bubble phase entirely.
pub fn run<'a, K, G, S>(
    seq: &'a [Dispatch<K, G>],
    state: &mut S,
    mut handler: impl FnMut(&Dispatch<K, G>, &mut S) -> Outcome,
) -> Option<&'a Dispatch<K, G>> {
    for d in seq {
        if handler(d, state) == Outcome::Stop {
            return Some(d);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route;
    use crate::types::Phase;
    use alloc::vec;
    use alloc::vec::Vec;

    fn mk_seq() -> Vec<Dispatch<u32>> {
        route::tunnel_and_bubble([(1, ()), (2, ())])
    }

    #[test]
    fn continue_through_all() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut seen, |d, seen| {
            seen.push((d.phase, d.node));
            Outcome::Continue
        });
        assert!(stopped.is_none());
        assert_eq!(
            seen,
            vec![
                (Phase::Preview, 1),
                (Phase::Preview, 2),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
    }

    #[test]
    fn stop_in_preview_skips_bubble() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut seen, |d, seen| {
            seen.push((d.phase, d.node));
            if d.phase == Phase::Preview && d.node == 1 {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        let stopped = stopped.unwrap();
        assert_eq!((stopped.phase, stopped.node), (Phase::Preview, 1));
        assert_eq!(seen, vec![(Phase::Preview, 1)]);
    }

    #[test]
    fn stop_at_leaf_bubble_keeps_ancestors_quiet() {
        let seq = mk_seq();
        let mut bubbled: Vec<u32> = Vec::new();
        let stopped = run(&seq, &mut bubbled, |d, bubbled| {
            if d.phase == Phase::Bubble {
                bubbled.push(d.node);
                return Outcome::Stop;
            }
            Outcome::Continue
        });
        assert_eq!(stopped.map(|d| d.node), Some(2));
        assert_eq!(bubbled, vec![2]);
    }

    #[test]
    fn state_is_threaded_through_every_call() {
        let seq = mk_seq();
        let mut count = 0_usize;
        run(&seq, &mut count, |_, c| {
            *c += 1;
            Outcome::Continue
        });
        assert_eq!(count, seq.len());
    }

    #[test]
    fn empty_route_never_calls_handler() {
        let seq: Vec<Dispatch<u32>> = Vec::new();
        let mut called = false;
        assert!(
            run(&seq, &mut called, |_, c| {
                *c = true;
                Outcome::Continue
            })
            .is_none()
        );
        assert!(!called);
    }
}
