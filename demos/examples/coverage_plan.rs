// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coverage planning walkthrough.
//!
//! Lay out rooms, place routers with the k-means planner, and print the
//! resulting placements and score.
//!
//! Run:
//! - `cargo run -p planwave_demos --example coverage_plan`

use glam::Vec3;
use planwave_coverage::CoveragePlanner;
use planwave_scene::{Entity, SceneModel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fmt_subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(fmt_subscriber)?;

    let mut model = SceneModel::new();
    let root = model.root();
    let floor = model.create(Entity::floor(3.0));
    model.attach(root, floor)?;

    for (position, size) in [
        (Vec3::new(0.0, 1.5, 0.0), Vec3::new(6.0, 3.0, 4.0)),
        (Vec3::new(8.0, 1.5, 0.0), Vec3::new(4.0, 3.0, 4.0)),
        (Vec3::new(0.0, 1.5, 7.0), Vec3::new(5.0, 3.0, 5.0)),
    ] {
        let room = model.create(Entity::room(position, size));
        model.attach(floor, room)?;
    }

    let planner = CoveragePlanner::default();
    let report = planner.optimize(&mut model, Some(2));

    println!(
        "placed {} routers over {} observations in {} iterations (converged: {})",
        report.routers.len(),
        report.observations.len(),
        report.iterations,
        report.converged,
    );
    for &router in &report.routers {
        let Some(Entity::Router {
            position, assigned, ..
        }) = model.tree().entity(router)
        else {
            continue;
        };
        println!("  router at {position:?} covering {} points", assigned.len());
    }
    if let Some(score) = report.score {
        println!("average received strength: {score:.4}");
    }

    Ok(())
}
