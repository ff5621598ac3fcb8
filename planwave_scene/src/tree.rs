// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: arena storage, structure edits, traversal.

use glam::Vec3;

use crate::entity::{Entity, EntityKind};
use crate::error::SceneError;
use crate::snapshot::SnapshotNode;
use crate::types::{NodeFlags, NodeId};

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    entity: Entity,
    flags: NodeFlags,
}

impl Node {
    fn new(generation: u32, entity: Entity) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            entity,
            flags: NodeFlags::default(),
        }
    }
}

/// Arena-backed scene tree.
///
/// Nodes live in generational slots and are addressed by [`NodeId`]. Structure
/// is parent pointers plus per-node child id lists; a node owns the lifetime of
/// its subtree only through [`destroy`](Self::destroy) — [`detach`](Self::detach)
/// keeps the subtree alive for re-attachment.
///
/// The tree is a plain data structure: it performs no change notification of
/// its own. Publication policy (snapshots, listeners, silent edits) lives in
/// [`SceneModel`](crate::model::SceneModel).
pub struct SceneTree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SceneTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("SceneTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

impl SceneTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Allocate a detached node carrying `entity`.
    pub fn create(&mut self, entity: Entity) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, entity));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, entity)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is live if its slot exists and its generation matches the
    /// generation stored in that slot. See [`NodeId`] for the semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Entity payload of a live node.
    pub fn entity(&self, id: NodeId) -> Option<&Entity> {
        self.node_opt(id).map(|n| &n.entity)
    }

    /// Kind tag of a live node.
    pub fn kind(&self, id: NodeId) -> Option<EntityKind> {
        self.node_opt(id).map(|n| n.entity.kind())
    }

    /// Flag bits of a live node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Parent of a live node, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a live node, in attach order. Empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Reparent `child` under `parent`, detaching it from any prior parent.
    ///
    /// Re-attaching a node under its current parent is idempotent. Attaching a
    /// node to itself or to one of its own descendants fails with
    /// [`SceneError::WouldCycle`]; a stale id on either side fails with
    /// [`SceneError::StaleNode`].
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Err(SceneError::StaleNode);
        }
        if parent == child || self.contains(child, parent) {
            return Err(SceneError::WouldCycle);
        }
        if self.node(child).parent == Some(parent) {
            return Ok(());
        }
        if let Some(old) = self.node(child).parent {
            self.unlink_parent(child, old);
        }
        self.link_parent(child, parent);
        Ok(())
    }

    /// Unlink `id` from its parent. The subtree stays alive, detached.
    ///
    /// Returns true if the node actually had a parent. Total: stale ids and
    /// already-detached nodes are a no-op.
    pub fn detach(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let Some(parent) = self.node(id).parent else {
            return false;
        };
        self.unlink_parent(id, parent);
        true
    }

    /// Detach `id` and free its whole subtree. Ids into the subtree go stale.
    pub fn destroy(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
    }

    /// True if `id` is `ancestor` or lies in `ancestor`'s subtree.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(id) {
            return false;
        }
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.node(c).parent;
        }
        false
    }

    /// Depth-first pre-order search for the first node of `kind`, starting at
    /// (and including) `id`.
    pub fn find_first_descendant(&self, id: NodeId, kind: EntityKind) -> Option<NodeId> {
        self.descendants(id).find(|&n| self.kind(n) == Some(kind))
    }

    /// Walk up from (and including) `id` to the first ancestor of `kind`.
    pub fn find_first_ancestor(&self, id: NodeId, kind: EntityKind) -> Option<NodeId> {
        let mut cur = if self.is_alive(id) { Some(id) } else { None };
        while let Some(c) = cur {
            if self.kind(c) == Some(kind) {
                return Some(c);
            }
            cur = self.node(c).parent;
        }
        None
    }

    /// Pre-order iterator over `id` and every node below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.is_alive(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Drop all of `dst`'s children and adopt all of `src`'s children.
    ///
    /// The dropped subtrees are freed; `src` is left childless but alive.
    /// Used to hot-swap an entire subtree (for example after a document load)
    /// as a single structural edit.
    pub fn replace_children(&mut self, dst: NodeId, src: NodeId) -> Result<(), SceneError> {
        if !self.is_alive(dst) || !self.is_alive(src) {
            return Err(SceneError::StaleNode);
        }
        if dst == src || self.contains(dst, src) || self.contains(src, dst) {
            return Err(SceneError::WouldCycle);
        }
        for child in self.node(dst).children.clone() {
            self.free_subtree(child);
        }
        self.node_mut(dst).children.clear();
        let adopted = core::mem::take(&mut self.node_mut(src).children);
        for &child in &adopted {
            self.node_mut(child).parent = Some(dst);
        }
        self.node_mut(dst).children = adopted;
        Ok(())
    }

    /// Immutable copy of the subtree rooted at `id`.
    ///
    /// Every copied node records the live id it mirrors as its `source`;
    /// see [`SnapshotNode`].
    pub fn snapshot(&self, id: NodeId) -> Option<SnapshotNode> {
        let node = self.node_opt(id)?;
        let children = node
            .children
            .iter()
            .filter_map(|&c| self.snapshot(c))
            .collect();
        Some(SnapshotNode::new(
            id,
            node.entity.clone(),
            node.flags,
            children,
        ))
    }

    // --- attribute setters ---
    //
    // Setters are total: a stale id or a kind mismatch is a no-op and returns
    // false, mirroring how structural no-ops behave.

    /// Set the position of a room or router. Returns whether it applied.
    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> bool {
        match self.node_opt_mut(id).map(|n| &mut n.entity) {
            Some(Entity::Room { position: p, .. } | Entity::Router { position: p, .. }) => {
                *p = position;
                true
            }
            _ => false,
        }
    }

    /// Set the extent of a room. Returns whether it applied.
    pub fn set_size(&mut self, id: NodeId, size: Vec3) -> bool {
        match self.node_opt_mut(id).map(|n| &mut n.entity) {
            Some(Entity::Room { size: s, .. }) => {
                *s = size;
                true
            }
            _ => false,
        }
    }

    /// Set the height of a floor. Returns whether it applied.
    pub fn set_height(&mut self, id: NodeId, height: f32) -> bool {
        match self.node_opt_mut(id).map(|n| &mut n.entity) {
            Some(Entity::Floor { height: h }) => {
                *h = height;
                true
            }
            _ => false,
        }
    }

    /// Set or clear the visible flag. Returns whether it applied.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        match self.node_opt_mut(id) {
            Some(node) => {
                node.flags.set(NodeFlags::VISIBLE, visible);
                true
            }
            None => false,
        }
    }

    /// Replace a router's assigned observation indices. Returns whether it applied.
    pub fn set_router_assigned(&mut self, id: NodeId, indices: Vec<u32>) -> bool {
        match self.node_opt_mut(id).map(|n| &mut n.entity) {
            Some(Entity::Router { assigned, .. }) => {
                *assigned = indices;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_selected(&mut self, id: NodeId, selected: bool) -> bool {
        match self.node_opt_mut(id) {
            Some(node) => {
                node.flags.set(NodeFlags::SELECTED, selected);
                true
            }
            None => false,
        }
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = self.node(id).children.clone();
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }
}

/// Pre-order iterator returned by [`SceneTree::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a SceneTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children = self.tree.children(id);
        self.stack.extend(children.iter().rev());
        Some(id)
    }
}
