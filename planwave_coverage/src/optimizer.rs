// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router placement: Lloyd's iteration over room observation clouds.

use glam::Vec3;
use planwave_scene::{Entity, EntityKind, NodeId, SceneModel};
use tracing::{debug, warn};

use crate::sampling::{ObsPoint, room_grid};

/// Tuning knobs for an optimize pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoverageConfig {
    /// Grid density when sampling room volumes, in samples per scene unit.
    pub samples_per_unit: f32,
    /// Transmit strength given to every placed router.
    pub router_strength: f32,
    /// Half-distance decay constant given to every placed router.
    pub half_distance: f32,
    /// Upper bound on Lloyd's iterations; bounds worst-case cost for
    /// interactive use at the price of a small chance of non-convergence.
    pub max_iterations: usize,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            samples_per_unit: 2.0,
            router_strength: planwave_scene::DEFAULT_ROUTER_STRENGTH,
            half_distance: planwave_scene::DEFAULT_HALF_DISTANCE,
            max_iterations: 10,
        }
    }
}

/// Result of an optimize pass.
#[derive(Clone, Debug)]
pub struct CoverageReport {
    /// Ids of the routers placed into the scene, in seeding order.
    pub routers: Vec<NodeId>,
    /// The observation set the partition refers to. Router `assigned` indices
    /// point into this vector.
    pub observations: Vec<ObsPoint>,
    /// Average received strength over all observations; `None` when there was
    /// nothing to score (no rooms, or zero routers requested).
    pub score: Option<f32>,
    /// Assignment passes actually run.
    pub iterations: usize,
    /// Whether an iteration with zero reassignments was reached before the cap.
    pub converged: bool,
}

/// Places routers over the current room set of a scene.
///
/// The planner holds only configuration; the room set is re-read from the
/// model on every call, so it can never act on stale hierarchy state.
#[derive(Clone, Debug, Default)]
pub struct CoveragePlanner {
    config: CoverageConfig,
}

impl CoveragePlanner {
    /// A planner with explicit configuration.
    pub fn new(config: CoverageConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    /// Place routers to maximize average received strength over the rooms.
    ///
    /// Existing routers are disposed of first. `requested` is clamped to the
    /// room count (one seed room per router); `None` requests one router per
    /// room, and zero is honored with an empty placement. The whole pass
    /// publishes exactly one model notification, carrying the final positions
    /// and assignments together.
    pub fn optimize(&self, model: &mut SceneModel, requested: Option<usize>) -> CoverageReport {
        let cfg = &self.config;
        let rooms = live_rooms(model);

        for router in live_routers(model) {
            model.destroy_silent(router);
        }

        let mut observations = Vec::new();
        for &room in &rooms {
            let Some(Entity::Room { position, size }) = model.tree().entity(room).cloned() else {
                continue;
            };
            observations.extend(
                room_grid(position, size, cfg.samples_per_unit)
                    .into_iter()
                    .map(|position| ObsPoint { position, room }),
            );
        }

        let count = requested.unwrap_or(rooms.len()).min(rooms.len());
        let mut routers = Vec::with_capacity(count);
        let root = model.root();
        for &room in rooms.iter().take(count) {
            let Some(seed) = model.tree().entity(room).and_then(Entity::position) else {
                continue;
            };
            let router = model.create(Entity::router_with(
                seed,
                cfg.router_strength,
                cfg.half_distance,
            ));
            let _ = model.attach_silent(root, router);
            routers.push(router);
        }

        if routers.is_empty() || observations.is_empty() {
            // Still a layout change: any previous routers are gone.
            model.publish();
            return CoverageReport {
                routers,
                observations,
                score: None,
                iterations: 0,
                converged: true,
            };
        }

        let mut assign = vec![usize::MAX; observations.len()];
        let mut iterations = 0;
        let mut converged = false;
        let mut warned_degenerate = false;

        for _ in 0..cfg.max_iterations {
            iterations += 1;
            let moved = assign_all(&observations, &router_positions(model, &routers), &mut assign);
            debug!(iteration = iterations, reassigned = moved, "assignment pass");
            if moved == 0 {
                converged = true;
                break;
            }

            let (sums, counts) = cluster_sums(&observations, &assign, routers.len());
            for (idx, &router) in routers.iter().enumerate() {
                if counts[idx] == 0 {
                    // Empty cluster: the router keeps its position this round.
                    if !warned_degenerate {
                        warn!(router = idx, "router has no assigned observations");
                        warned_degenerate = true;
                    }
                    continue;
                }
                model.set_position_silent(router, sums[idx] / counts[idx] as f32);
            }
        }

        // Snap each router from its mean onto the nearest assigned sample, so
        // placements land on real points in space.
        let means = router_positions(model, &routers);
        for (idx, &router) in routers.iter().enumerate() {
            let mut best: Option<(f32, Vec3)> = None;
            for (oi, obs) in observations.iter().enumerate() {
                if assign[oi] != idx {
                    continue;
                }
                let d = obs.position.distance_squared(means[idx]);
                if best.is_none_or(|(bd, _)| d < bd) {
                    best = Some((d, obs.position));
                }
            }
            if let Some((_, snapped)) = best {
                model.set_position_silent(router, snapped);
            }
        }

        // Snapping moved the centers; rebuild the partition once more for the
        // final assignment sets and the score.
        let _ = assign_all(&observations, &router_positions(model, &routers), &mut assign);

        let mut per_router: Vec<Vec<u32>> = vec![Vec::new(); routers.len()];
        #[allow(
            clippy::cast_possible_truncation,
            reason = "observation sets are far below u32::MAX"
        )]
        for (oi, &r) in assign.iter().enumerate() {
            per_router[r].push(oi as u32);
        }
        for (idx, &router) in routers.iter().enumerate() {
            model.set_router_assigned_silent(router, core::mem::take(&mut per_router[idx]));
        }

        // The single non-silent notification of the whole pass.
        model.publish();

        let score = score(model, &routers, &observations, &assign);
        debug!(?score, iterations, converged, "coverage pass finished");

        CoverageReport {
            routers,
            observations,
            score,
            iterations,
            converged,
        }
    }
}

/// Rooms reachable from the model root, in pre-order.
fn live_rooms(model: &SceneModel) -> Vec<NodeId> {
    let tree = model.tree();
    tree.descendants(model.root())
        .filter(|&id| tree.kind(id) == Some(EntityKind::Room))
        .collect()
}

/// Routers reachable from the model root, in pre-order.
fn live_routers(model: &SceneModel) -> Vec<NodeId> {
    let tree = model.tree();
    tree.descendants(model.root())
        .filter(|&id| tree.kind(id) == Some(EntityKind::Router))
        .collect()
}

fn router_positions(model: &SceneModel, routers: &[NodeId]) -> Vec<Vec3> {
    routers
        .iter()
        .map(|&id| {
            model
                .tree()
                .entity(id)
                .and_then(Entity::position)
                .unwrap_or(Vec3::ZERO)
        })
        .collect()
}

/// One assignment pass: each observation moves to its nearest center.
///
/// Ties break to the lowest router index (strict `<` while scanning in
/// order), which keeps repeated passes over identical input bit-identical.
/// Returns the number of observations that changed cluster.
fn assign_all(observations: &[ObsPoint], centers: &[Vec3], assign: &mut [usize]) -> usize {
    let mut moved = 0;
    for (slot, obs) in assign.iter_mut().zip(observations) {
        let mut best = 0;
        let mut best_d = f32::INFINITY;
        for (idx, center) in centers.iter().enumerate() {
            let d = obs.position.distance_squared(*center);
            if d < best_d {
                best_d = d;
                best = idx;
            }
        }
        if *slot != best {
            *slot = best;
            moved += 1;
        }
    }
    moved
}

fn cluster_sums(
    observations: &[ObsPoint],
    assign: &[usize],
    clusters: usize,
) -> (Vec<Vec3>, Vec<usize>) {
    let mut sums = vec![Vec3::ZERO; clusters];
    let mut counts = vec![0_usize; clusters];
    for (obs, &r) in observations.iter().zip(assign) {
        sums[r] += obs.position;
        counts[r] += 1;
    }
    (sums, counts)
}

/// Average received strength over every observation:
/// `strength * 0.5^(distance / half_distance)` per point, averaged over the
/// total observation count. `None` when the divisor would be zero.
fn score(
    model: &SceneModel,
    routers: &[NodeId],
    observations: &[ObsPoint],
    assign: &[usize],
) -> Option<f32> {
    if observations.is_empty() || routers.is_empty() {
        return None;
    }
    let mut total = 0.0_f32;
    for (obs, &r) in observations.iter().zip(assign) {
        let Some(Entity::Router {
            position,
            strength,
            half_distance,
            ..
        }) = model.tree().entity(routers[r])
        else {
            continue;
        };
        let distance = obs.position.distance(*position);
        total += strength * 0.5_f32.powf(distance / half_distance);
    }
    #[allow(
        clippy::cast_precision_loss,
        reason = "observation counts are far below f32 precision limits"
    )]
    Some(total / observations.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn model_with_rooms(rooms: &[(Vec3, Vec3)]) -> SceneModel {
        let mut model = SceneModel::new();
        let root = model.root();
        let floor = model.create(Entity::floor(3.0));
        model.attach_silent(root, floor).unwrap();
        for &(position, size) in rooms {
            let room = model.create(Entity::room(position, size));
            model.attach_silent(floor, room).unwrap();
        }
        model.publish();
        model
    }

    #[test]
    fn single_room_router_lands_on_center_sample() {
        let mut model = model_with_rooms(&[(Vec3::ZERO, Vec3::new(4.0, 1.0, 4.0))]);
        let planner = CoveragePlanner::default();
        let report = planner.optimize(&mut model, Some(1));

        assert_eq!(report.routers.len(), 1);
        assert_eq!(report.observations.len(), 129);
        assert!(report.converged);

        // The even-count grid carries the exact center as a sample, and the
        // cloud's centroid is the center, so the snap lands exactly there.
        let pos = model
            .tree()
            .entity(report.routers[0])
            .and_then(Entity::position)
            .unwrap();
        assert_eq!(pos, Vec3::ZERO);

        // Score is the decay average measured from the snapped position.
        let expected: f32 = report
            .observations
            .iter()
            .map(|o| 0.5_f32.powf(o.position.distance(pos)))
            .sum::<f32>()
            / report.observations.len() as f32;
        let got = report.score.unwrap();
        assert!((got - expected).abs() < 1e-6, "got {got}, expected {expected}");
    }

    #[test]
    fn separated_rooms_get_their_own_router() {
        let mut model = model_with_rooms(&[
            (Vec3::ZERO, Vec3::new(4.0, 3.0, 4.0)),
            (Vec3::new(100.0, 0.0, 0.0), Vec3::new(4.0, 3.0, 4.0)),
        ]);
        let planner = CoveragePlanner::default();
        let report = planner.optimize(&mut model, Some(2));

        assert_eq!(report.routers.len(), 2);
        assert!(report.converged);

        // Each router sits inside its own room.
        for (idx, &router) in report.routers.iter().enumerate() {
            let pos = model.tree().entity(router).and_then(Entity::position).unwrap();
            let room_x = if idx == 0 { 0.0 } else { 100.0 };
            assert!((pos.x - room_x).abs() <= 2.0, "router {idx} at {pos:?}");
        }

        // Zero cross-assignment: every observation maps to the router seeded
        // from its own room.
        let tree = model.tree();
        for (oi, obs) in report.observations.iter().enumerate() {
            let router = report
                .routers
                .iter()
                .position(|&r| {
                    let Some(Entity::Router { assigned, .. }) = tree.entity(r) else {
                        return false;
                    };
                    assigned.contains(&(oi as u32))
                })
                .unwrap();
            let expected = usize::from(obs.position.x > 50.0);
            assert_eq!(router, expected, "observation {oi} crossed rooms");
        }
    }

    #[test]
    fn partition_covers_every_observation_exactly_once() {
        let mut model = model_with_rooms(&[
            (Vec3::ZERO, Vec3::new(3.0, 3.0, 3.0)),
            (Vec3::new(5.0, 0.0, 0.0), Vec3::new(3.0, 3.0, 3.0)),
            (Vec3::new(0.0, 0.0, 6.0), Vec3::new(2.0, 2.0, 2.0)),
        ]);
        let planner = CoveragePlanner::default();
        let report = planner.optimize(&mut model, None);

        let mut seen: Vec<u32> = Vec::new();
        for &router in &report.routers {
            let Some(Entity::Router { assigned, .. }) = model.tree().entity(router) else {
                panic!("router entity missing");
            };
            seen.extend(assigned);
        }
        seen.sort_unstable();
        let expected: Vec<u32> = (0..report.observations.len() as u32).collect();
        assert_eq!(seen, expected, "assigned sets must partition the observations");
    }

    #[test]
    fn requested_count_is_clamped_to_room_count() {
        let mut model = model_with_rooms(&[
            (Vec3::ZERO, Vec3::splat(3.0)),
            (Vec3::new(10.0, 0.0, 0.0), Vec3::splat(3.0)),
            (Vec3::new(0.0, 0.0, 10.0), Vec3::splat(3.0)),
        ]);
        let planner = CoveragePlanner::default();
        let report = planner.optimize(&mut model, Some(10));
        assert_eq!(report.routers.len(), 3);
        assert_eq!(live_routers(&model).len(), 3);
    }

    #[test]
    fn zero_requested_routers_is_honored() {
        let mut model = model_with_rooms(&[(Vec3::ZERO, Vec3::splat(3.0))]);
        let planner = CoveragePlanner::default();

        // Seed a previous placement, then ask for none.
        let first = planner.optimize(&mut model, None);
        assert_eq!(first.routers.len(), 1);

        let report = planner.optimize(&mut model, Some(0));
        assert!(report.routers.is_empty());
        assert_eq!(report.score, None);
        assert!(live_routers(&model).is_empty(), "old routers are disposed");
    }

    #[test]
    fn zero_rooms_yields_empty_report() {
        let mut model = SceneModel::new();
        let planner = CoveragePlanner::default();
        let report = planner.optimize(&mut model, None);
        assert!(report.routers.is_empty());
        assert!(report.observations.is_empty());
        assert_eq!(report.score, None);
    }

    #[test]
    fn repeated_passes_are_deterministic() {
        let rooms = [
            (Vec3::ZERO, Vec3::new(4.0, 2.0, 6.0)),
            (Vec3::new(7.0, 0.0, 1.0), Vec3::new(5.0, 2.0, 3.0)),
            (Vec3::new(-6.0, 0.0, -2.0), Vec3::new(3.0, 2.0, 3.0)),
        ];
        let mut model = model_with_rooms(&rooms);
        let planner = CoveragePlanner::default();

        let first = planner.optimize(&mut model, Some(2));
        let first_positions: Vec<Vec3> = first
            .routers
            .iter()
            .map(|&r| model.tree().entity(r).and_then(Entity::position).unwrap())
            .collect();

        let second = planner.optimize(&mut model, Some(2));
        let second_positions: Vec<Vec3> = second
            .routers
            .iter()
            .map(|&r| model.tree().entity(r).and_then(Entity::position).unwrap())
            .collect();

        assert_eq!(first_positions, second_positions, "placements must be bit-identical");
        assert_eq!(first.score, second.score);
    }

    #[test]
    fn previous_routers_are_disposed() {
        let mut model = model_with_rooms(&[(Vec3::ZERO, Vec3::splat(4.0))]);
        let stray = model.create(Entity::router(Vec3::splat(50.0)));
        let root = model.root();
        model.attach(root, stray).unwrap();

        let planner = CoveragePlanner::default();
        let report = planner.optimize(&mut model, None);
        assert!(!model.tree().is_alive(stray), "stale placements are removed");
        assert_eq!(live_routers(&model), report.routers);
    }

    #[test]
    fn optimize_notifies_exactly_once() {
        let mut model = model_with_rooms(&[(Vec3::ZERO, Vec3::splat(4.0))]);
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        model.subscribe(move || inner.set(inner.get() + 1));

        let planner = CoveragePlanner::default();
        planner.optimize(&mut model, None);
        assert_eq!(count.get(), 1, "the whole pass is one notification");
    }

    #[test]
    fn published_snapshot_carries_final_layout() {
        let mut model = model_with_rooms(&[(Vec3::ZERO, Vec3::new(4.0, 1.0, 4.0))]);
        let planner = CoveragePlanner::default();
        let report = planner.optimize(&mut model, None);

        let snap = model.snapshot();
        let copy = snap.find(report.routers[0]).expect("router in snapshot");
        assert_eq!(copy.position(), Some(Vec3::ZERO));
        let Entity::Router { assigned, .. } = copy.entity() else {
            panic!("expected router copy");
        };
        assert_eq!(assigned.len(), report.observations.len());
    }
}
