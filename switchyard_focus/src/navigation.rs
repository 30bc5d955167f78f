// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing the next focus target.

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Rect;

/// A navigation intent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Tab.
    Next,
    /// Shift+Tab.
    Prev,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
}

impl Navigation {
    /// Whether this is a Tab-style intent rather than a spatial one.
    pub fn is_sequential(self) -> bool {
        matches!(self, Self::Next | Self::Prev)
    }
}

/// A widget that could take focus, with its screen rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct FocusCandidate<K> {
    /// Widget key.
    pub id: K,
    /// Screen rectangle. All candidates handed to a policy share one space.
    pub rect: Rect,
    /// Explicit tab order. Ordered candidates come before unordered ones.
    pub order: Option<i32>,
    /// Disabled candidates are never chosen.
    pub enabled: bool,
}

impl<K> FocusCandidate<K> {
    /// An enabled candidate with no explicit order.
    pub fn new(id: K, rect: Rect) -> Self {
        Self {
            id,
            rect,
            order: None,
            enabled: true,
        }
    }

    /// Set an explicit tab order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Mark as disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// What sequential navigation does past the last candidate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Stop; there is no next candidate.
    Never,
    /// Continue from the other end.
    #[default]
    Wrap,
}

/// Picks the next focus target.
pub trait NavigationPolicy<K: Copy + PartialEq> {
    /// Return the candidate that should receive focus when navigating from
    /// `origin` (or from nothing) in `direction`.
    fn next(
        &self,
        origin: Option<K>,
        direction: Navigation,
        candidates: &[FocusCandidate<K>],
    ) -> Option<K>;
}

/// Tab follows explicit order, then rows top to bottom and left to right
/// within a row. Arrows pick the nearest candidate on that side, preferring
/// ones that overlap the origin across the movement axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReadingOrderPolicy {
    /// Behavior past either end for Tab and Shift+Tab.
    pub wrap: WrapMode,
    /// Two candidates whose tops differ by at most this many pixels share a row.
    pub row_tolerance: f64,
}

impl Default for ReadingOrderPolicy {
    fn default() -> Self {
        Self {
            wrap: WrapMode::Wrap,
            row_tolerance: 1.0,
        }
    }
}

impl<K: Copy + PartialEq> NavigationPolicy<K> for ReadingOrderPolicy {
    fn next(
        &self,
        origin: Option<K>,
        direction: Navigation,
        candidates: &[FocusCandidate<K>],
    ) -> Option<K> {
        match direction {
            Navigation::Next | Navigation::Prev => {
                self.sequential(origin, direction == Navigation::Next, candidates)
            }
            _ => {
                let from = origin.and_then(|o| candidates.iter().find(|c| c.id == o));
                match from {
                    Some(from) => nearest_in_direction(from, direction, candidates),
                    None => self.sequential(None, true, candidates),
                }
            }
        }
    }
}

impl ReadingOrderPolicy {
    fn sequential<K: Copy + PartialEq>(
        &self,
        origin: Option<K>,
        forward: bool,
        candidates: &[FocusCandidate<K>],
    ) -> Option<K> {
        let mut order: Vec<&FocusCandidate<K>> =
            candidates.iter().filter(|c| c.enabled).collect();
        order.sort_by(|a, b| self.tab_order(a, b));
        let last = order.len().checked_sub(1)?;
        let at = origin.and_then(|o| order.iter().position(|c| c.id == o));
        let idx = match (at, forward) {
            (None, true) => 0,
            (None, false) => last,
            (Some(i), true) if i < last => i + 1,
            (Some(i), false) if i > 0 => i - 1,
            (Some(_), _) if self.wrap == WrapMode::Never => return None,
            (Some(_), true) => 0,
            (Some(_), false) => last,
        };
        Some(order[idx].id)
    }

    fn tab_order<K>(&self, a: &FocusCandidate<K>, b: &FocusCandidate<K>) -> Ordering {
        let by_order = match (a.order, b.order) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_order.then_with(|| {
            if (a.rect.y0 - b.rect.y0).abs() <= self.row_tolerance {
                a.rect.x0.total_cmp(&b.rect.x0)
            } else {
                a.rect.y0.total_cmp(&b.rect.y0)
            }
        })
    }
}

fn nearest_in_direction<K: Copy + PartialEq>(
    from: &FocusCandidate<K>,
    direction: Navigation,
    candidates: &[FocusCandidate<K>],
) -> Option<K> {
    let o = from.rect;
    candidates
        .iter()
        .filter(|c| c.enabled && c.id != from.id)
        .filter_map(|c| {
            let r = c.rect;
            // Gap along the movement axis, and the cross-axis spans.
            let (gap, overlap, cross) = match direction {
                Navigation::Right => (
                    r.x0 - o.x1,
                    span_overlap(o.y0, o.y1, r.y0, r.y1),
                    r.center().y - o.center().y,
                ),
                Navigation::Left => (
                    o.x0 - r.x1,
                    span_overlap(o.y0, o.y1, r.y0, r.y1),
                    r.center().y - o.center().y,
                ),
                Navigation::Down => (
                    r.y0 - o.y1,
                    span_overlap(o.x0, o.x1, r.x0, r.x1),
                    r.center().x - o.center().x,
                ),
                Navigation::Up => (
                    o.y0 - r.y1,
                    span_overlap(o.x0, o.x1, r.x0, r.x1),
                    r.center().x - o.center().x,
                ),
                Navigation::Next | Navigation::Prev => return None,
            };
            // Must start at or past the origin's leading edge.
            (gap >= 0.0).then_some((c.id, !overlap, gap + 2.0 * cross.abs()))
        })
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.2.total_cmp(&b.2)))
        .map(|(id, _, _)| id)
}

fn span_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0 < b1 && b0 < a1
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn grid() -> Vec<FocusCandidate<u32>> {
        // 1 2
        // 3 4
        vec![
            FocusCandidate::new(1, Rect::new(0.0, 0.0, 10.0, 10.0)),
            FocusCandidate::new(2, Rect::new(20.0, 0.0, 30.0, 10.0)),
            FocusCandidate::new(3, Rect::new(0.0, 20.0, 10.0, 30.0)),
            FocusCandidate::new(4, Rect::new(20.0, 20.0, 30.0, 30.0)),
        ]
    }

    #[test]
    fn tab_walks_rows_and_wraps() {
        let p = ReadingOrderPolicy::default();
        let c = grid();
        assert_eq!(p.next(Some(1), Navigation::Next, &c), Some(2));
        assert_eq!(p.next(Some(2), Navigation::Next, &c), Some(3));
        assert_eq!(p.next(Some(4), Navigation::Next, &c), Some(1));
        assert_eq!(p.next(Some(1), Navigation::Prev, &c), Some(4));
    }

    #[test]
    fn no_wrap_stops_at_the_ends() {
        let p = ReadingOrderPolicy {
            wrap: WrapMode::Never,
            ..ReadingOrderPolicy::default()
        };
        let c = grid();
        assert_eq!(p.next(Some(4), Navigation::Next, &c), None);
        assert_eq!(p.next(Some(1), Navigation::Prev, &c), None);
    }

    #[test]
    fn without_origin_tab_starts_at_an_end() {
        let p = ReadingOrderPolicy::default();
        let c = grid();
        assert_eq!(p.next(None, Navigation::Next, &c), Some(1));
        assert_eq!(p.next(None, Navigation::Prev, &c), Some(4));
        assert_eq!(p.next(None, Navigation::Next, &[] as &[FocusCandidate<u32>]), None);
    }

    #[test]
    fn explicit_order_beats_geometry() {
        let p = ReadingOrderPolicy::default();
        let mut c = grid();
        c[3] = c[3].clone().with_order(0);
        assert_eq!(p.next(None, Navigation::Next, &c), Some(4));
        assert_eq!(p.next(Some(4), Navigation::Next, &c), Some(1));
    }

    #[test]
    fn disabled_candidates_are_skipped() {
        let p = ReadingOrderPolicy::default();
        let mut c = grid();
        c[1] = c[1].clone().disabled();
        assert_eq!(p.next(Some(1), Navigation::Next, &c), Some(3));
        assert_eq!(p.next(Some(1), Navigation::Right, &c), Some(4));
    }

    #[test]
    fn arrows_move_spatially() {
        let p = ReadingOrderPolicy::default();
        let c = grid();
        assert_eq!(p.next(Some(1), Navigation::Right, &c), Some(2));
        assert_eq!(p.next(Some(1), Navigation::Down, &c), Some(3));
        assert_eq!(p.next(Some(4), Navigation::Up, &c), Some(2));
        assert_eq!(p.next(Some(4), Navigation::Left, &c), Some(3));
        assert_eq!(p.next(Some(1), Navigation::Left, &c), None);
    }

    #[test]
    fn arrows_prefer_aligned_candidates() {
        let p = ReadingOrderPolicy::default();
        let c = vec![
            FocusCandidate::new(1_u32, Rect::new(0.0, 0.0, 10.0, 10.0)),
            // Close but off to the side.
            FocusCandidate::new(2, Rect::new(12.0, 40.0, 22.0, 50.0)),
            // Far but directly to the right.
            FocusCandidate::new(3, Rect::new(80.0, 0.0, 90.0, 10.0)),
        ];
        assert_eq!(p.next(Some(1), Navigation::Right, &c), Some(3));
    }
}
