// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the scene model's structural invariants.

use glam::Vec3;
use planwave_scene::{Entity, NodeFlags, NodeId, SceneModel};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Build a model with `floors` floors and `rooms_per` rooms under each.
/// Returns the model plus every selectable id (floors and rooms).
fn build(floors: usize, rooms_per: usize) -> (SceneModel, Vec<NodeId>) {
    let mut model = SceneModel::new();
    let root = model.root();
    let mut ids = Vec::new();
    for f in 0..floors {
        let floor = model.create(Entity::floor(2.5 + f as f32));
        model.attach_silent(root, floor).unwrap();
        ids.push(floor);
        for r in 0..rooms_per {
            let room = model.create(Entity::room(
                Vec3::new(r as f32 * 6.0, 0.0, f as f32 * 6.0),
                Vec3::new(4.0, 3.0, 4.0),
            ));
            model.attach_silent(floor, room).unwrap();
            ids.push(room);
        }
    }
    model.publish();
    (model, ids)
}

fn selected_flags(model: &SceneModel) -> usize {
    let tree = model.tree();
    tree.descendants(model.root())
        .filter(|&id| {
            tree.flags(id)
                .is_some_and(|f| f.contains(NodeFlags::SELECTED))
        })
        .count()
}

proptest! {
    /// After any sequence of select/unselect calls, at most one node carries
    /// the selected flag, and it is exactly the model's reported selection.
    #[test]
    fn selection_stays_exclusive(
        floors in 1..4usize,
        rooms_per in 0..4usize,
        ops in prop::collection::vec(any::<(usize, bool)>(), 1..40),
    ) {
        let (mut model, ids) = build(floors, rooms_per);
        for (pick, unselect) in ops {
            if unselect {
                model.unselect();
            } else {
                let id = ids[pick % ids.len()];
                model.select(id).unwrap();
            }
            let flags = selected_flags(&model);
            prop_assert!(flags <= 1, "found {flags} selected flags");
            prop_assert_eq!(flags, usize::from(model.selected().is_some()));
        }
    }

    /// A snapshot mirrors the live tree exactly: same shape, same attributes,
    /// every copy's source is the live node it was taken from.
    #[test]
    fn snapshot_is_isomorphic(
        floors in 1..4usize,
        rooms_per in 0..5usize,
    ) {
        let (mut model, _) = build(floors, rooms_per);
        let snap = model.snapshot();

        fn check(
            model: &SceneModel,
            live: NodeId,
            copy: &planwave_scene::SnapshotNode,
        ) -> Result<(), TestCaseError> {
            prop_assert_eq!(copy.source(), live);
            prop_assert_eq!(Some(copy.entity()), model.tree().entity(live));
            let live_children = model.tree().children(live);
            prop_assert_eq!(copy.children().len(), live_children.len());
            for (child_copy, &child_live) in copy.children().iter().zip(live_children) {
                check(model, child_live, child_copy)?;
            }
            Ok(())
        }
        check(&model, model.root(), snap.root())?;
    }

    /// Serialize → load → serialize is a fixed point: the second document
    /// equals the first even though node ids differ.
    #[test]
    fn document_round_trip(
        floors in 1..4usize,
        rooms_per in 0..4usize,
    ) {
        let (model, _) = build(floors, rooms_per);
        let doc = model.to_doc().unwrap();

        let mut restored = SceneModel::new();
        restored.load_doc(&doc).unwrap();
        prop_assert_eq!(restored.to_doc().unwrap(), doc);
    }
}
