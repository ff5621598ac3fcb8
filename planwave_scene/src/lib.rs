// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planwave Scene: a hierarchical 3D scene model with copy-on-write snapshots.
//!
//! Planwave Scene is the state-management core of a coverage-planning tool:
//! floors, rooms, and routers arranged in a tree, edited through a single
//! model that publishes immutable snapshots to its subscribers.
//!
//! - Represents a hierarchy of entities (floor heights, room volumes, router
//!   placements) in an arena of generational slots.
//! - Publishes an immutable [`SceneSnapshot`] after every non-silent edit;
//!   readers never touch the live tree.
//! - Tracks an exclusive selection and persists the tree as a
//!   `{kind, args, children}` document.
//!
//! ## Where this fits: live tree vs. snapshot
//!
//! External collaborators (a renderer, a UI layer) read only published
//! snapshots. Each snapshot node carries the live id it was copied from as its
//! [`source`](SnapshotNode::source), which is how interaction routes back onto
//! the live tree: pick a snapshot node, then select or edit through its
//! source id. Snapshots expose no mutation API at all, so a stale reader can
//! never corrupt the scene.
//!
//! ## Not a renderer
//!
//! This crate computes and publishes state. How a floor, room, or router is
//! drawn — or whether anything is drawn at all — is entirely up to the
//! consumer; a snapshot node exposes kind, geometry, selection, visibility,
//! and (for routers) the assigned observation indices and strength.
//!
//! ## API overview
//!
//! - [`SceneModel`]: the root; owns the tree, the subscriber list, and the
//!   snapshot lifecycle.
//! - [`SceneTree`]: arena storage and structural edits, addressed by
//!   [`NodeId`].
//! - [`Entity`] / [`EntityKind`]: domain payloads and their kind registry.
//! - [`SceneSnapshot`] / [`SnapshotNode`]: the immutable published view.
//! - [`NodeDoc`]: the persisted document form.
//!
//! Key operations:
//! - [`SceneModel::attach`] / [`SceneModel::detach`] / [`SceneModel::destroy`]
//!   (each with a `_silent` twin that skips publication)
//! - [`SceneModel::subscribe`] → [`SubscriptionId`], [`SceneModel::snapshot`]
//! - [`SceneModel::select`] / [`SceneModel::unselect`]
//! - [`SceneModel::to_doc`] / [`SceneModel::load_doc`]
//!
//! ### Minimal usage
//!
//! ```
//! use glam::Vec3;
//! use planwave_scene::{Entity, SceneModel};
//!
//! let mut model = SceneModel::new();
//! let root = model.root();
//!
//! let floor = model.create(Entity::floor(3.0));
//! model.attach(root, floor)?;
//!
//! let room = model.create(Entity::room(Vec3::ZERO, Vec3::new(4.0, 3.0, 5.0)));
//! model.attach(floor, room)?;
//!
//! // Readers work from the snapshot, never the live tree.
//! let snap = model.snapshot();
//! assert_eq!(snap.root().children().len(), 1);
//!
//! // Route interaction back through the source id.
//! let copy = snap.find(room).unwrap();
//! model.select(copy.source())?;
//! assert!(model.is_selected(room));
//! # Ok::<(), planwave_scene::SceneError>(())
//! ```
//!
//! ### Staying in sync
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use planwave_scene::{Entity, SceneModel};
//!
//! let mut model = SceneModel::new();
//! let repaints = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&repaints);
//! let sub = model.subscribe(move || counter.set(counter.get() + 1));
//!
//! let floor = model.create(Entity::floor(2.8));
//! let root = model.root();
//! model.attach(root, floor)?;
//! assert_eq!(repaints.get(), 1);
//!
//! model.unsubscribe(sub);
//! # Ok::<(), planwave_scene::SceneError>(())
//! ```
//!
//! The model is single-threaded and synchronous: every mutation, snapshot
//! regeneration, and listener callback runs to completion before control
//! returns to the caller.

pub mod doc;
pub mod entity;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod tree;
pub mod types;

mod selection;

pub use doc::NodeDoc;
pub use entity::{DEFAULT_HALF_DISTANCE, DEFAULT_ROUTER_STRENGTH, Entity, EntityKind};
pub use error::SceneError;
pub use model::{SceneModel, SubscriptionId};
pub use snapshot::{SceneSnapshot, SnapshotNode};
pub use tree::{Descendants, SceneTree};
pub use types::{NodeFlags, NodeId};
