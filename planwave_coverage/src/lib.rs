// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planwave Coverage: k-means router placement over a Planwave scene.
//!
//! Given the rooms of a [`SceneModel`](planwave_scene::SceneModel), a
//! [`CoveragePlanner`] samples each room volume into an observation cloud,
//! places a requested number of routers with Lloyd's iteration
//! (assign-nearest / recompute-mean), snaps each router onto a real sample
//! point, and scores the layout with an exponential decay model:
//! `strength * 0.5^(distance / half_distance)`.
//!
//! The placement is a local-minimum heuristic, deliberately so: the iteration
//! cap keeps a pass cheap enough to run on every "optimize" click, and the
//! snap step keeps results physically installable instead of floating at an
//! arithmetic mean inside a wall.
//!
//! The whole pass mutates the scene silently and publishes exactly one model
//! notification carrying the final layout, so subscribers repaint once.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use planwave_coverage::CoveragePlanner;
//! use planwave_scene::{Entity, SceneModel};
//!
//! let mut model = SceneModel::new();
//! let root = model.root();
//! let floor = model.create(Entity::floor(3.0));
//! model.attach(root, floor)?;
//! let room = model.create(Entity::room(Vec3::ZERO, Vec3::new(4.0, 3.0, 5.0)));
//! model.attach(floor, room)?;
//!
//! let planner = CoveragePlanner::default();
//! let report = planner.optimize(&mut model, None);
//! assert_eq!(report.routers.len(), 1);
//! assert!(report.score.is_some());
//! # Ok::<(), planwave_scene::SceneError>(())
//! ```
//!
//! Determinism: an unchanged room configuration and the same requested count
//! produce bit-identical placements and score — there is no randomness in
//! sampling, seeding, or tie-breaking.

pub mod optimizer;
pub mod sampling;

pub use optimizer::{CoverageConfig, CoveragePlanner, CoverageReport};
pub use sampling::{ObsPoint, room_grid};
