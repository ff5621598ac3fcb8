// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene model basics.
//!
//! Build a small scene, subscribe, mutate, and read the published snapshot.
//!
//! Run:
//! - `cargo run -p planwave_demos --example scene_basics`

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;
use planwave_scene::{Entity, SceneError, SceneModel, SnapshotNode};

fn print_tree(node: &SnapshotNode, depth: usize) {
    let marker = if node.selected() { " [selected]" } else { "" };
    println!("{:indent$}{}{marker}", "", node.kind(), indent = depth * 2);
    for child in node.children() {
        print_tree(child, depth + 1);
    }
}

fn main() -> Result<(), SceneError> {
    let mut model = SceneModel::new();
    let root = model.root();

    // Repaint whenever a snapshot is published.
    let repaints = Rc::new(Cell::new(0));
    let counter = Rc::clone(&repaints);
    model.subscribe(move || counter.set(counter.get() + 1));

    // One floor, two rooms.
    let floor = model.create(Entity::floor(3.0));
    model.attach(root, floor)?;
    let kitchen = model.create(Entity::room(Vec3::ZERO, Vec3::new(4.0, 3.0, 5.0)));
    model.attach(floor, kitchen)?;
    let office = model.create(Entity::room(Vec3::new(6.0, 0.0, 0.0), Vec3::new(3.0, 3.0, 3.0)));
    model.attach(floor, office)?;

    // Select through the snapshot, the way a picker would.
    let snap = model.snapshot();
    let picked = snap.find(office).expect("office is in the snapshot");
    model.select(picked.source())?;

    println!("repaints: {}", repaints.get());
    print_tree(model.snapshot().root(), 0);

    // The old snapshot still reflects the world as it was.
    assert!(!snap.find(office).expect("still present").selected());
    assert!(model.is_selected(office));

    // Round-trip the scene through its document form.
    let text = model.to_json_string()?;
    let mut restored = SceneModel::new();
    restored.load_json_str(&text)?;
    println!("document round trip: {} bytes", text.len());

    Ok(())
}
