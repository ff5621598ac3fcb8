// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable point-in-time copies of the scene tree.
//!
//! A snapshot is what external collaborators (renderers, UI) read. It is a
//! separate owned type with no mutation API at all, so "mutating a snapshot"
//! is not a runtime error here — it does not compile. The route back onto the
//! live tree is each node's [`source`](SnapshotNode::source) id.

use glam::Vec3;

use crate::entity::{Entity, EntityKind};
use crate::types::{NodeFlags, NodeId};

/// A whole-tree snapshot published by the model.
///
/// Snapshots are handed out behind `Rc`; holding one never blocks the live
/// tree, and an old generation stays valid after further edits.
#[derive(Clone, Debug)]
pub struct SceneSnapshot {
    root: SnapshotNode,
    epoch: u64,
}

impl SceneSnapshot {
    pub(crate) fn new(root: SnapshotNode, epoch: u64) -> Self {
        Self { root, epoch }
    }

    /// The copied model root.
    pub fn root(&self) -> &SnapshotNode {
        &self.root
    }

    /// Monotonic publication counter; later snapshots have larger epochs.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Find the copy of live node `source`, if it was reachable at snapshot time.
    pub fn find(&self, source: NodeId) -> Option<&SnapshotNode> {
        self.root.find(source)
    }
}

/// One node of a snapshot: copied attributes plus the live id it mirrors.
#[derive(Clone, Debug)]
pub struct SnapshotNode {
    source: NodeId,
    entity: Entity,
    flags: NodeFlags,
    children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    pub(crate) fn new(
        source: NodeId,
        entity: Entity,
        flags: NodeFlags,
        children: Vec<SnapshotNode>,
    ) -> Self {
        Self {
            source,
            entity,
            flags,
            children,
        }
    }

    /// The live node this copy mirrors. Route interactions (selection, edits)
    /// back through this id.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Kind tag of the copied entity.
    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }

    /// The copied entity attributes.
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Whether the mirrored node was selected at snapshot time.
    pub fn selected(&self) -> bool {
        self.flags.contains(NodeFlags::SELECTED)
    }

    /// Whether the mirrored node was visible at snapshot time.
    pub fn visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    /// Copied children, in the live tree's attach order.
    pub fn children(&self) -> &[SnapshotNode] {
        &self.children
    }

    /// Position, for room and router copies.
    pub fn position(&self) -> Option<Vec3> {
        self.entity.position()
    }

    /// Extent, for room copies.
    pub fn size(&self) -> Option<Vec3> {
        self.entity.size()
    }

    /// Pre-order search for the copy whose source is `source`.
    pub fn find(&self, source: NodeId) -> Option<&SnapshotNode> {
        if self.source == source {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SceneTree;

    #[test]
    fn snapshot_is_isomorphic_to_live_tree() {
        let mut tree = SceneTree::new();
        let root = tree.create(Entity::Model);
        let floor = tree.create(Entity::floor(3.0));
        let a = tree.create(Entity::room(Vec3::ZERO, Vec3::splat(4.0)));
        let b = tree.create(Entity::room(Vec3::new(5.0, 0.0, 0.0), Vec3::ONE));
        tree.attach(root, floor).unwrap();
        tree.attach(floor, a).unwrap();
        tree.attach(floor, b).unwrap();

        let snap = tree.snapshot(root).unwrap();

        fn check(tree: &SceneTree, live: NodeId, copy: &SnapshotNode) {
            assert_eq!(copy.source(), live);
            assert_eq!(Some(copy.entity()), tree.entity(live));
            assert_eq!(copy.children().len(), tree.children(live).len());
            for (child_copy, &child_live) in copy.children().iter().zip(tree.children(live)) {
                check(tree, child_live, child_copy);
            }
        }
        check(&tree, root, &snap);
    }

    #[test]
    fn snapshot_survives_live_edits() {
        let mut tree = SceneTree::new();
        let root = tree.create(Entity::Model);
        let a = tree.create(Entity::room(Vec3::ZERO, Vec3::ONE));
        tree.attach(root, a).unwrap();

        let snap = tree.snapshot(root).unwrap();
        tree.set_position(a, Vec3::splat(9.0));
        tree.destroy(a);

        let copy = snap.find(a).expect("copy of a destroyed node remains");
        assert_eq!(copy.position(), Some(Vec3::ZERO), "copy keeps old attributes");
    }

    #[test]
    fn find_by_source_id() {
        let mut tree = SceneTree::new();
        let root = tree.create(Entity::Model);
        let floor = tree.create(Entity::floor(2.5));
        let a = tree.create(Entity::room(Vec3::ZERO, Vec3::ONE));
        tree.attach(root, floor).unwrap();
        tree.attach(floor, a).unwrap();

        let snap = tree.snapshot(root).unwrap();
        assert_eq!(snap.find(a).map(SnapshotNode::kind), Some(EntityKind::Room));
        let gone = tree.create(Entity::floor(1.0));
        assert!(snap.find(gone).is_none(), "nodes created later are absent");
    }
}
