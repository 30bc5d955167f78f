// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strong and weak widget paths.
//!
//! A [`WidgetPath`] is a root window → leaf chain of widgets paired with the
//! geometry they had when the path was produced. It is meant to be used within
//! a single dispatch and then dropped: geometry goes stale as soon as layout
//! runs again.
//!
//! A [`WeakWidgetPath`] keeps only the [`WidgetId`]s. It is the form that may be
//! stored across frames (captor, focus, widgets under the cursor). Turning it
//! back into a usable path goes through [`WeakWidgetPath::resolve`], which
//! re-checks every link against the live tree.

use smallvec::SmallVec;

use crate::tree::Tree;
use crate::types::{Geometry, WidgetFlags, WidgetId};

/// A widget together with its screen placement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArrangedWidget {
    /// The widget.
    pub widget: WidgetId,
    /// Placement at resolution time.
    pub geometry: Geometry,
}

/// Root window → leaf chain of arranged widgets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WidgetPath {
    widgets: SmallVec<[ArrangedWidget; 8]>,
}

impl WidgetPath {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, arranged: ArrangedWidget) {
        self.widgets.push(arranged);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.widgets.truncate(len);
    }

    /// Returns true if the path holds no widgets.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Number of widgets in the path.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// The arranged widgets, root window first.
    pub fn widgets(&self) -> &[ArrangedWidget] {
        &self.widgets
    }

    /// Iterate the widget ids, root window first.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = WidgetId> + '_ {
        self.widgets.iter().map(|a| a.widget)
    }

    /// The window at the root of the path.
    pub fn window(&self) -> Option<WidgetId> {
        self.widgets.first().map(|a| a.widget)
    }

    /// The deepest arranged widget.
    pub fn leaf(&self) -> Option<&ArrangedWidget> {
        self.widgets.last()
    }

    /// The deepest widget id.
    pub fn last_widget(&self) -> Option<WidgetId> {
        self.leaf().map(|a| a.widget)
    }

    /// Position of `widget` in the path.
    pub fn index_of(&self, widget: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|a| a.widget == widget)
    }

    /// Whether `widget` is part of the path.
    pub fn contains(&self, widget: WidgetId) -> bool {
        self.index_of(widget).is_some()
    }

    /// Arranged entry for `widget`, if it is on the path.
    pub fn get(&self, widget: WidgetId) -> Option<&ArrangedWidget> {
        self.widgets.iter().find(|a| a.widget == widget)
    }

    /// The prefix of this path ending at `widget`, or an empty path if
    /// `widget` is not on it.
    pub fn path_down_to(&self, widget: WidgetId) -> Self {
        match self.index_of(widget) {
            Some(i) => Self {
                widgets: self.widgets[..=i].iter().copied().collect(),
            },
            None => Self::new(),
        }
    }

    /// Drop geometry and keep only the ids.
    pub fn to_weak(&self) -> WeakWidgetPath {
        WeakWidgetPath {
            widgets: self.ids().collect(),
        }
    }
}

/// What to do when a stored path no longer matches the live tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InterruptedPathPolicy {
    /// Return the part of the path that is still intact.
    #[default]
    Truncate,
    /// Return an empty path.
    ReturnInvalid,
}

/// Outcome of resolving a [`WeakWidgetPath`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathResolution {
    /// Every stored widget is still alive, visible, and linked as recorded.
    Live,
    /// Some link broke; the result was truncated or invalidated per policy.
    Truncated,
}

/// Root window → leaf chain of widget ids that may outlive a dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct WeakWidgetPath {
    widgets: SmallVec<[WidgetId; 8]>,
}

impl WeakWidgetPath {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Stored ids, root window first.
    pub fn ids(&self) -> &[WidgetId] {
        &self.widgets
    }

    /// Stored window at the root.
    pub fn window(&self) -> Option<WidgetId> {
        self.widgets.first().copied()
    }

    /// Stored leaf.
    pub fn last_widget(&self) -> Option<WidgetId> {
        self.widgets.last().copied()
    }

    /// Whether `widget` was recorded on this path.
    pub fn contains(&self, widget: WidgetId) -> bool {
        self.widgets.contains(&widget)
    }

    /// Forget every stored id.
    pub fn clear(&mut self) {
        self.widgets.clear();
    }

    /// Non-empty with a live leaf. This is a cheap check; it does not verify
    /// the links between stored widgets.
    pub fn is_valid(&self, tree: &Tree) -> bool {
        self.last_widget().is_some_and(|w| tree.is_alive(w))
    }

    /// Re-resolve against the live tree.
    ///
    /// Each stored widget must still be alive, visible, and a child of the
    /// widget stored before it; the first must be a live window. Resolution
    /// stops at the first broken link, and `policy` decides whether the intact
    /// prefix or an empty path is returned. Geometry is recomputed from the
    /// current local transforms.
    pub fn resolve(
        &self,
        tree: &Tree,
        policy: InterruptedPathPolicy,
    ) -> (WidgetPath, PathResolution) {
        let mut path = WidgetPath::new();
        let mut parent: Option<(WidgetId, Geometry)> = None;
        for &id in &self.widgets {
            let linked = match parent {
                None => tree.is_window(id),
                Some((p, _)) => tree.parent_of(id) == Some(p),
            };
            let visible = tree
                .flags(id)
                .is_some_and(|f| f.contains(WidgetFlags::VISIBLE));
            let Some(local) = tree.local(id).filter(|_| linked && visible) else {
                return match policy {
                    InterruptedPathPolicy::Truncate => (path, PathResolution::Truncated),
                    InterruptedPathPolicy::ReturnInvalid => {
                        (WidgetPath::new(), PathResolution::Truncated)
                    }
                };
            };
            let transform = match parent {
                Some((_, g)) => g.transform * local.local_transform,
                None => local.local_transform,
            };
            let geometry = Geometry::new(transform, local.local_bounds);
            path.push(ArrangedWidget {
                widget: id,
                geometry,
            });
            parent = Some((id, geometry));
        }
        (path, PathResolution::Live)
    }
}

impl From<&WidgetPath> for WeakWidgetPath {
    fn from(path: &WidgetPath) -> Self {
        path.to_weak()
    }
}
