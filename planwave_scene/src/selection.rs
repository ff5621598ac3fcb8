// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection state: at most one live node is selected at a time.

use crate::error::SceneError;
use crate::tree::SceneTree;
use crate::types::NodeId;

/// Exclusive selection over a tree.
///
/// The flag bit lives on the node; this tracker owns the exclusivity
/// invariant and the reachability check. Ids arriving from snapshot nodes are
/// already canonical (a snapshot node's `source` is the live id), so there is
/// no resolution step here.
#[derive(Debug, Default)]
pub(crate) struct Selection {
    current: Option<NodeId>,
}

impl Selection {
    pub(crate) fn new() -> Self {
        Self { current: None }
    }

    pub(crate) fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Select `id`. Returns whether the selection state changed.
    ///
    /// Fails with [`SceneError::StaleNode`] for dead ids and
    /// [`SceneError::Unreachable`] for nodes not under `root`.
    pub(crate) fn select(
        &mut self,
        tree: &mut SceneTree,
        root: NodeId,
        id: NodeId,
    ) -> Result<bool, SceneError> {
        if !tree.is_alive(id) {
            return Err(SceneError::StaleNode);
        }
        if !tree.contains(root, id) {
            return Err(SceneError::Unreachable);
        }
        if self.current == Some(id) {
            return Ok(false);
        }
        if let Some(prev) = self.current.take() {
            tree.set_selected(prev, false);
        }
        tree.set_selected(id, true);
        self.current = Some(id);
        Ok(true)
    }

    /// Clear the selection. Returns whether anything was selected. Idempotent.
    pub(crate) fn unselect(&mut self, tree: &mut SceneTree) -> bool {
        match self.current.take() {
            Some(prev) => {
                tree.set_selected(prev, false);
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_selected(&self, id: NodeId) -> bool {
        self.current == Some(id)
    }

    /// Clear the selection if it lies inside the subtree rooted at `subtree`.
    /// Called before detaching or destroying that subtree. Returns whether it
    /// cleared.
    pub(crate) fn clear_if_within(&mut self, tree: &mut SceneTree, subtree: NodeId) -> bool {
        match self.current {
            Some(sel) if tree.contains(subtree, sel) => {
                self.current = None;
                tree.set_selected(sel, false);
                true
            }
            _ => false,
        }
    }
}
