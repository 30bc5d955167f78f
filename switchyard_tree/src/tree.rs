// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, windows, updates, queries.

use alloc::vec::Vec;
use kurbo::{Affine, Point, Rect};

use crate::path::{ArrangedWidget, WidgetPath};
use crate::types::{Geometry, LocalWidget, WidgetFlags, WidgetId};

/// Arena of widgets grouped under windows.
///
/// Windows are root widgets. Top-level windows are kept in back-to-front
/// order; a window may also be owned by another window (a native child such as
/// a modal dialog or a popup), in which case it sits in front of its owner.
///
/// Geometry is not cached. Paths compute screen transforms on demand from the
/// local transforms, so an update is visible to the next query immediately.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use switchyard_tree::{LocalWidget, Tree};
///
/// let mut tree = Tree::new();
/// let window = tree.insert_window(
///     None,
///     LocalWidget {
///         local_bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
///         ..LocalWidget::default()
///     },
/// );
/// let button = tree.insert(
///     Some(window),
///     LocalWidget {
///         local_bounds: Rect::new(10.0, 10.0, 40.0, 30.0),
///         ..LocalWidget::default()
///     },
/// );
///
/// let path = tree.hit_test_window(window, Point::new(20.0, 20.0));
/// assert_eq!(path.window(), Some(window));
/// assert_eq!(path.last_widget(), Some(button));
/// ```
#[derive(Default)]
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// top-level windows, back to front
    windows: Vec<WidgetId>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("windows", &self.windows)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default)]
struct WindowLinks {
    owner: Option<WidgetId>,
    /// owned windows, back to front
    child_windows: Vec<WidgetId>,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    local: LocalWidget,
    window: Option<WindowLinks>,
}

impl Node {
    fn new(generation: u32, local: LocalWidget, window: Option<WindowLinks>) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            window,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, local: LocalWidget, window: Option<WindowLinks>) -> WidgetId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local, window));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            WidgetId::new(idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local, window)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            WidgetId::new((self.nodes.len() - 1) as u32, generation)
        }
    }

    /// Insert a widget as the last-arranged child of `parent`.
    ///
    /// With `None` the widget becomes a detached root. Detached roots are not
    /// windows: they are never hit tested and paths to them do not resolve
    /// until they are reparented under a window.
    pub fn insert(&mut self, parent: Option<WidgetId>, local: LocalWidget) -> WidgetId {
        let id = self.alloc(local, None);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Insert a window.
    ///
    /// With `owner == None` (or a stale owner) the window becomes the frontmost
    /// top-level window. Otherwise it becomes the frontmost native child of
    /// `owner`.
    pub fn insert_window(&mut self, owner: Option<WidgetId>, local: LocalWidget) -> WidgetId {
        let id = self.alloc(local, Some(WindowLinks::default()));
        self.attach_window(id, owner.filter(|&o| self.is_window(o)));
        tracing::debug!(window = ?id, owner = ?owner, "window inserted");
        id
    }

    /// Move `window` under a different owner (or make it top-level).
    ///
    /// Ignored if `window` is not a live window, if `owner` is `window` itself,
    /// or if `owner` is already owned (directly or not) by `window`.
    pub fn set_window_owner(&mut self, window: WidgetId, owner: Option<WidgetId>) {
        if !self.is_window(window) {
            return;
        }
        let owner = owner.filter(|&o| self.is_window(o));
        if let Some(o) = owner
            && (o == window || self.is_window_descendant(o, window))
        {
            return;
        }
        self.detach_window(window);
        self.attach_window(window, owner);
    }

    fn attach_window(&mut self, window: WidgetId, owner: Option<WidgetId>) {
        match owner {
            Some(o) => {
                if let Some(links) = self.node_mut(o).window.as_mut() {
                    links.child_windows.push(window);
                }
            }
            None => self.windows.push(window),
        }
        if let Some(links) = self.node_mut(window).window.as_mut() {
            links.owner = owner;
        }
    }

    fn detach_window(&mut self, window: WidgetId) {
        let owner = self.owner_of(window);
        match owner {
            Some(o) => {
                if let Some(links) = self.node_mut(o).window.as_mut() {
                    links.child_windows.retain(|&w| w != window);
                }
            }
            None => self.windows.retain(|&w| w != window),
        }
        if let Some(links) = self.node_mut(window).window.as_mut() {
            links.owner = None;
        }
    }

    /// Remove a widget and its subtree.
    ///
    /// Removing a window also removes every window it owns. Ids of removed
    /// widgets go stale immediately.
    pub fn remove(&mut self, id: WidgetId) {
        if !self.is_alive(id) {
            return;
        }
        if self.is_window(id) {
            for child in self.child_windows_of(id).to_vec() {
                self.remove(child);
            }
            self.detach_window(id);
            tracing::debug!(window = ?id, "window removed");
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.remove_subtree(id);
    }

    fn remove_subtree(&mut self, id: WidgetId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            if self.is_alive(child) {
                self.remove_subtree(child);
            }
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Reparent `id` under `new_parent` as its last-arranged child.
    ///
    /// Windows cannot be reparented; use [`Tree::set_window_owner`].
    pub fn reparent(&mut self, id: WidgetId, new_parent: Option<WidgetId>) {
        if !self.is_alive(id) || self.is_window(id) {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || p == id || self.is_ancestor(id, p))
        {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: WidgetId, tf: Affine) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform = tf;
        }
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: WidgetId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_bounds = bounds;
        }
    }

    /// Update widget flags.
    pub fn set_flags(&mut self, id: WidgetId, flags: WidgetFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Raise a window to the front of its siblings, and its top-level window
    /// to the front of all top-level windows.
    pub fn bring_to_front(&mut self, window: WidgetId) {
        if !self.is_window(window) {
            return;
        }
        let mut current = window;
        loop {
            let owner = self.owner_of(current);
            let siblings = match owner {
                Some(o) => match self.node_mut(o).window.as_mut() {
                    Some(links) => &mut links.child_windows,
                    None => return,
                },
                None => &mut self.windows,
            };
            if let Some(pos) = siblings.iter().position(|&w| w == current) {
                let w = siblings.remove(pos);
                siblings.push(w);
            }
            match owner {
                Some(o) => current = o,
                None => return,
            }
        }
    }

    /// Returns true if `id` refers to a live widget.
    ///
    /// A `WidgetId` is considered live if its slot exists and its generation
    /// matches the current generation stored in that slot.
    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns true if `id` is a live window.
    pub fn is_window(&self, id: WidgetId) -> bool {
        self.node_opt(id).is_some_and(|n| n.window.is_some())
    }

    /// Local data of a live widget.
    pub fn local(&self, id: WidgetId) -> Option<&LocalWidget> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Flags of a live widget.
    pub fn flags(&self, id: WidgetId) -> Option<WidgetFlags> {
        self.node_opt(id).map(|n| n.local.flags)
    }

    /// Returns the parent of a widget if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a widget in arrangement order, or an empty slice if
    /// the widget is stale.
    pub fn children_of(&self, id: WidgetId) -> &[WidgetId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// The window that owns `window`, if it is a native child window.
    pub fn owner_of(&self, window: WidgetId) -> Option<WidgetId> {
        self.node_opt(window)
            .and_then(|n| n.window.as_ref())
            .and_then(|w| w.owner)
    }

    /// Windows owned by `window`, back to front.
    pub fn child_windows_of(&self, window: WidgetId) -> &[WidgetId] {
        self.node_opt(window)
            .and_then(|n| n.window.as_ref())
            .map_or(&[], |w| &w.child_windows)
    }

    /// Top-level windows, back to front.
    pub fn top_level_windows(&self) -> &[WidgetId] {
        &self.windows
    }

    /// The window a widget lives in.
    pub fn window_of(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = id;
        while let Some(p) = self.parent_of(current) {
            current = p;
        }
        self.is_window(current).then_some(current)
    }

    /// Returns true if `window` is owned, directly or through other windows, by
    /// `ancestor`.
    pub fn is_window_descendant(&self, window: WidgetId, ancestor: WidgetId) -> bool {
        let mut current = self.owner_of(window);
        while let Some(o) = current {
            if o == ancestor {
                return true;
            }
            current = self.owner_of(o);
        }
        false
    }

    /// Returns true if `ancestor` is a strict ancestor of `id` in the widget
    /// hierarchy.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Every window, back to front. Native children follow their owner.
    pub fn windows_back_to_front(&self) -> Vec<WidgetId> {
        let mut out = Vec::new();
        for &w in &self.windows {
            self.collect_window_stack(w, &mut out);
        }
        out
    }

    /// `window` followed by every window it owns, back to front.
    pub fn window_stack(&self, window: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        if self.is_window(window) {
            self.collect_window_stack(window, &mut out);
        }
        out
    }

    fn collect_window_stack(&self, window: WidgetId, out: &mut Vec<WidgetId>) {
        out.push(window);
        for &child in self.child_windows_of(window) {
            self.collect_window_stack(child, out);
        }
    }

    /// Screen placement of a live widget, or `None` if it is stale or detached.
    pub fn geometry(&self, id: WidgetId) -> Option<Geometry> {
        self.path_to(id).leaf().map(|a| a.geometry)
    }

    /// Path from the owning window down to `widget`.
    ///
    /// Empty if the widget is stale, detached, or it or any ancestor is hidden.
    pub fn path_to(&self, widget: WidgetId) -> WidgetPath {
        let mut chain: Vec<WidgetId> = Vec::new();
        let mut current = Some(widget).filter(|&w| self.is_alive(w));
        while let Some(id) = current {
            chain.push(id);
            current = self.parent_of(id);
        }
        let mut path = WidgetPath::new();
        let Some(&root) = chain.last() else {
            return path;
        };
        if !self.is_window(root) {
            return path;
        }
        let mut transform = Affine::IDENTITY;
        for &id in chain.iter().rev() {
            let local = &self.node(id).local;
            if !local.flags.contains(WidgetFlags::VISIBLE) {
                return WidgetPath::new();
            }
            transform *= local.local_transform;
            path.push(ArrangedWidget {
                widget: id,
                geometry: Geometry::new(transform, local.local_bounds),
            });
        }
        path
    }

    /// Hit test a screen-space point against one window.
    ///
    /// The path starts at the window when the point lies within the window's
    /// bounds, then descends depth first. Among siblings the last-arranged child
    /// is tried first. A visible child that contains the point is entered; it
    /// becomes part of the path if it is hit-testable itself or if something
    /// below it is. The descent stops at the first widget with no eligible
    /// children.
    pub fn hit_test_window(&self, window: WidgetId, point: Point) -> WidgetPath {
        let mut path = WidgetPath::new();
        let Some(node) = self.node_opt(window).filter(|n| n.window.is_some()) else {
            return path;
        };
        if !node.local.flags.contains(WidgetFlags::VISIBLE) {
            return path;
        }
        let geometry = Geometry::new(node.local.local_transform, node.local.local_bounds);
        if !geometry.contains(point) {
            return path;
        }
        path.push(ArrangedWidget {
            widget: window,
            geometry,
        });
        self.descend(window, geometry.transform, point, &mut path);
        path
    }

    fn descend(&self, parent: WidgetId, parent_tf: Affine, point: Point, path: &mut WidgetPath) -> bool {
        for &child in self.node(parent).children.iter().rev() {
            let Some(node) = self.node_opt(child) else {
                continue;
            };
            if !node.local.flags.contains(WidgetFlags::VISIBLE) {
                continue;
            }
            let geometry = Geometry::new(parent_tf * node.local.local_transform, node.local.local_bounds);
            if !geometry.contains(point) {
                continue;
            }
            let mark = path.len();
            path.push(ArrangedWidget {
                widget: child,
                geometry,
            });
            let deeper = self.descend(child, geometry.transform, point, path);
            if deeper || node.local.flags.contains(WidgetFlags::HIT_TESTABLE) {
                return true;
            }
            path.truncate(mark);
        }
        false
    }

    /// Hit test a screen-space point against a back-to-front window list.
    ///
    /// The frontmost window whose bounds contain the point wins, even if none
    /// of its widgets are hit-testable. Returns an empty path when the point is
    /// outside every window.
    pub fn locate_window_under(&self, point: Point, windows: &[WidgetId]) -> WidgetPath {
        for &w in windows.iter().rev() {
            let path = self.hit_test_window(w, point);
            if !path.is_empty() {
                return path;
            }
        }
        WidgetPath::new()
    }

    /// Get the next widget in depth-first traversal order.
    ///
    /// Returns `None` if no next widget exists or if the current widget is
    /// stale. Traversal never leaves the root the widget lives under.
    pub fn next_depth_first(&self, current: WidgetId) -> Option<WidgetId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first_child) = self.node(current).children.first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next) = self.sibling(node, 1) {
                return Some(next);
            }
            node = parent;
        }
        None
    }

    /// Get the previous widget in reverse depth-first traversal order.
    ///
    /// Returns `None` if no previous widget exists or if the current widget is
    /// stale.
    pub fn prev_depth_first(&self, current: WidgetId) -> Option<WidgetId> {
        if !self.is_alive(current) {
            return None;
        }
        match self.sibling(current, -1) {
            Some(mut node) => {
                while let Some(&last) = self.node(node).children.last() {
                    node = last;
                }
                Some(node)
            }
            None => self.parent_of(current),
        }
    }

    fn sibling(&self, node: WidgetId, offset: isize) -> Option<WidgetId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos.checked_add_signed(offset)?).copied()
    }

    // --- internals ---

    /// Access a live node; panics if `id` is stale.
    fn node(&self, id: WidgetId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling WidgetId")
    }

    /// Access a live node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: WidgetId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling WidgetId")
    }

    fn node_opt(&self, id: WidgetId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: WidgetId, parent: WidgetId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: WidgetId, parent: WidgetId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}
