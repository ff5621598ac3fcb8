// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene tree: node identifiers and flags.

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On create, a fresh slot is allocated with generation `1`.
/// - On destroy, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Ordering
///
/// `NodeId` is totally ordered by slot index, then generation. The order carries
/// no structural meaning; it exists so that consumers (for example the coverage
/// optimizer's tie-break rule) have a deterministic way to rank ids.
///
/// ### Liveness
///
/// Use [`SceneTree::is_alive`](crate::tree::SceneTree::is_alive) to check whether a
/// `NodeId` still refers to a live node. Stale `NodeId`s never alias a different
/// live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and selection.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (participates in rendering).
        const VISIBLE  = 0b0000_0001;
        /// Node is the current selection. At most one node in a tree carries
        /// this bit; exclusivity is enforced by the model's selection state.
        const SELECTED = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}
