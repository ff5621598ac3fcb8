// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observation sampling: turning room volumes into point clouds.

use glam::Vec3;
use planwave_scene::NodeId;

/// A coordinate sampled from a room's interior.
///
/// Observations exist only for the duration of an optimize pass; they are
/// never part of the persisted tree. `room` records which room volume the
/// point was sampled from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObsPoint {
    /// Sampled coordinate.
    pub position: Vec3,
    /// The room this point was sampled from.
    pub room: NodeId,
}

/// Interior grid over a room volume centered at `position` with extent `size`.
///
/// Each axis gets `max(1, round(extent * samples_per_unit))` samples, offset
/// by half a step so points sit strictly inside the volume rather than on its
/// boundary. A grid with an even sample count along any axis misses the exact
/// center, so the center is appended as one extra sample in that case.
pub fn room_grid(position: Vec3, size: Vec3, samples_per_unit: f32) -> Vec<Vec3> {
    let steps = [
        axis_steps(size.x, samples_per_unit),
        axis_steps(size.y, samples_per_unit),
        axis_steps(size.z, samples_per_unit),
    ];
    let min = position - size * 0.5;
    let spacing = Vec3::new(
        size.x / steps[0] as f32,
        size.y / steps[1] as f32,
        size.z / steps[2] as f32,
    );

    let mut points = Vec::with_capacity(steps[0] * steps[1] * steps[2] + 1);
    for i in 0..steps[0] {
        for j in 0..steps[1] {
            for k in 0..steps[2] {
                points.push(
                    min + spacing
                        * Vec3::new(i as f32 + 0.5, j as f32 + 0.5, k as f32 + 0.5),
                );
            }
        }
    }
    if steps.iter().any(|s| s % 2 == 0) {
        points.push(position);
    }
    points
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "clamped to >= 1 before the cast; extents are small and finite"
)]
fn axis_steps(extent: f32, samples_per_unit: f32) -> usize {
    (extent * samples_per_unit).round().max(1.0) as usize
}
