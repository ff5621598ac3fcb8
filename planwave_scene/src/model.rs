// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene model: tree ownership, snapshot lifecycle, and subscriptions.

use std::rc::Rc;

use glam::Vec3;
use tracing::trace;

use crate::entity::{Entity, EntityKind};
use crate::error::SceneError;
use crate::selection::Selection;
use crate::snapshot::SceneSnapshot;
use crate::tree::SceneTree;
use crate::types::NodeId;

/// Capability to remove a listener registered with [`SceneModel::subscribe`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut()>;

/// Root of a scene: owns the live tree and publishes immutable snapshots.
///
/// Every non-silent mutation refreshes the cached room list, regenerates the
/// snapshot, and invokes listeners in registration order. Listeners never see
/// a partially mutated tree: the snapshot they read was taken after the
/// mutation finished (the model is single-threaded and synchronous, so there
/// is no window where this could be otherwise).
///
/// Each mutating operation has a `_silent` twin that skips publication. Silent
/// edits still land in the live tree and are picked up by the next publish;
/// the coverage optimizer uses them to batch its iteration loop into a single
/// notification.
///
/// There is no global instance: construct a model and pass it to whatever owns
/// the session.
pub struct SceneModel {
    tree: SceneTree,
    root: NodeId,
    snapshot: Option<Rc<SceneSnapshot>>,
    epoch: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    selection: Selection,
    rooms: Vec<NodeId>,
}

impl Default for SceneModel {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SceneModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SceneModel")
            .field("tree", &self.tree)
            .field("root", &self.root)
            .field("epoch", &self.epoch)
            .field("listeners", &self.listeners.len())
            .field("selection", &self.selection)
            .field("rooms", &self.rooms.len())
            .finish_non_exhaustive()
    }
}

impl SceneModel {
    /// Create an empty model: a lone root node of kind
    /// [`Model`](EntityKind::Model).
    pub fn new() -> Self {
        let mut tree = SceneTree::new();
        let root = tree.create(Entity::Model);
        Self {
            tree,
            root,
            snapshot: None,
            epoch: 0,
            listeners: Vec::new(),
            next_subscription: 0,
            selection: Selection::new(),
            rooms: Vec::new(),
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read access to the live tree.
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Room ids in pre-order, as of the last publish.
    pub fn rooms(&self) -> &[NodeId] {
        &self.rooms
    }

    // --- subscriptions ---

    /// Register a listener invoked after every snapshot regeneration.
    /// Returns the capability to remove it again.
    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// The most recently published snapshot, generated lazily on first call.
    pub fn snapshot(&mut self) -> Rc<SceneSnapshot> {
        if self.snapshot.is_none() {
            self.regenerate();
        }
        Rc::clone(self.snapshot.as_ref().expect("snapshot was just generated"))
    }

    /// Regenerate the snapshot and notify listeners, refreshing the room
    /// cache first. Called implicitly by every non-silent mutation; callers
    /// only need it to flush a batch of silent edits.
    pub fn publish(&mut self) {
        self.refresh_rooms();
        self.notify();
    }

    // --- structural mutation ---

    /// Allocate a detached node. Not a tree mutation: nothing is published
    /// until the node is attached.
    pub fn create(&mut self, entity: Entity) -> NodeId {
        self.tree.create(entity)
    }

    /// Attach `child` under `parent` and publish.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.tree.attach(parent, child)?;
        self.publish();
        Ok(())
    }

    /// [`attach`](Self::attach) without publication.
    pub fn attach_silent(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.tree.attach(parent, child)
    }

    /// Detach `id` from its parent (subtree stays alive) and publish.
    /// Clears the selection if it was inside the detached subtree.
    pub fn detach(&mut self, id: NodeId) {
        if self.detach_inner(id) {
            self.publish();
        }
    }

    /// [`detach`](Self::detach) without publication.
    pub fn detach_silent(&mut self, id: NodeId) {
        self.detach_inner(id);
    }

    /// Destroy the subtree rooted at `id` and publish. The root itself cannot
    /// be destroyed. Clears the selection if it was inside the subtree.
    pub fn destroy(&mut self, id: NodeId) {
        if self.destroy_inner(id) {
            self.publish();
        }
    }

    /// [`destroy`](Self::destroy) without publication.
    pub fn destroy_silent(&mut self, id: NodeId) {
        self.destroy_inner(id);
    }

    // --- attribute mutation ---

    /// Move a room or router and publish.
    pub fn set_position(&mut self, id: NodeId, position: Vec3) {
        if self.tree.set_position(id, position) {
            self.publish();
        }
    }

    /// [`set_position`](Self::set_position) without publication.
    pub fn set_position_silent(&mut self, id: NodeId, position: Vec3) {
        self.tree.set_position(id, position);
    }

    /// Resize a room and publish.
    pub fn set_size(&mut self, id: NodeId, size: Vec3) {
        if self.tree.set_size(id, size) {
            self.publish();
        }
    }

    /// [`set_size`](Self::set_size) without publication.
    pub fn set_size_silent(&mut self, id: NodeId, size: Vec3) {
        self.tree.set_size(id, size);
    }

    /// Change a floor height and publish.
    pub fn set_height(&mut self, id: NodeId, height: f32) {
        if self.tree.set_height(id, height) {
            self.publish();
        }
    }

    /// Show or hide a node and publish.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if self.tree.set_visible(id, visible) {
            self.publish();
        }
    }

    /// Replace a router's assigned observation indices and publish.
    pub fn set_router_assigned(&mut self, id: NodeId, indices: Vec<u32>) {
        if self.tree.set_router_assigned(id, indices) {
            self.publish();
        }
    }

    /// [`set_router_assigned`](Self::set_router_assigned) without publication.
    pub fn set_router_assigned_silent(&mut self, id: NodeId, indices: Vec<u32>) {
        self.tree.set_router_assigned(id, indices);
    }

    // --- selection ---

    /// Select `id`, unselecting anything else first.
    ///
    /// Ids taken from snapshot nodes are passed as their
    /// [`source`](crate::snapshot::SnapshotNode::source), so selecting through
    /// a snapshot always lands on the canonical live node. Selection is not a
    /// structural change: it republishes without touching the room cache.
    pub fn select(&mut self, id: NodeId) -> Result<(), SceneError> {
        if self.selection.select(&mut self.tree, self.root, id)? {
            self.notify();
        }
        Ok(())
    }

    /// Clear the selection, if any. Idempotent.
    pub fn unselect(&mut self) {
        if self.selection.unselect(&mut self.tree) {
            self.notify();
        }
    }

    /// Whether `id` is the currently selected live node.
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.is_selected(id)
    }

    /// The currently selected node, if any.
    pub fn selected(&self) -> Option<NodeId> {
        self.selection.current()
    }

    // --- internals ---

    /// Read-write tree access for in-crate collaborators (document loading).
    /// Callers are responsible for publishing afterwards.
    pub(crate) fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// Clear the selection without notifying. Used when the selected node was
    /// replaced wholesale (document load).
    pub(crate) fn unselect_silent(&mut self) {
        self.selection.unselect(&mut self.tree);
    }

    fn detach_inner(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        self.selection.clear_if_within(&mut self.tree, id);
        self.tree.detach(id)
    }

    fn destroy_inner(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.tree.is_alive(id) {
            return false;
        }
        self.selection.clear_if_within(&mut self.tree, id);
        self.tree.destroy(id);
        true
    }

    pub(crate) fn refresh_rooms(&mut self) {
        self.rooms = self
            .tree
            .descendants(self.root)
            .filter(|&id| self.tree.kind(id) == Some(EntityKind::Room))
            .collect();
    }

    fn regenerate(&mut self) {
        self.epoch += 1;
        let root = self
            .tree
            .snapshot(self.root)
            .expect("model root is always alive");
        self.snapshot = Some(Rc::new(SceneSnapshot::new(root, self.epoch)));
    }

    fn notify(&mut self) {
        self.regenerate();
        trace!(epoch = self.epoch, "published scene snapshot");
        for (_, listener) in &mut self.listeners {
            listener();
        }
    }
}
