// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared across the scene model.

/// Errors produced by scene operations.
///
/// Structural edits that the contract defines as total (detach, destroy,
/// attribute setters on stale ids) do not report errors; everything that can
/// actually fail funnels through this enum.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A document referenced an entity kind with no registered constructor.
    #[error("unknown entity kind `{0}`")]
    UnknownKind(String),

    /// The document text or argument structure did not parse.
    #[error("malformed scene document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The node exists but is not reachable from the model root.
    #[error("node is not reachable from the model root")]
    Unreachable,

    /// The id refers to a freed slot or an outdated generation.
    #[error("stale or destroyed node id")]
    StaleNode,

    /// The requested attach would make a node its own ancestor.
    #[error("attach would create a cycle")]
    WouldCycle,
}
