// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene document serialization.
//!
//! The persisted form is a recursive `{kind, args, children}` structure.
//! `kind` strings dispatch through [`EntityKind::from_name`]; an unknown kind
//! fails with [`SceneError::UnknownKind`]. Loading builds the incoming tree
//! fully detached and swaps it in with a single structural edit, so any parse
//! or lookup error leaves the live tree exactly as it was.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::entity::{Entity, EntityKind};
use crate::error::SceneError;
use crate::model::SceneModel;
use crate::tree::SceneTree;
use crate::types::NodeId;

/// One node of a serialized scene document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    /// Entity kind name; must match a registered kind on load.
    pub kind: String,
    /// Kind-specific constructor arguments.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub args: Map<String, Value>,
    /// Child documents, attached in listed order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDoc>,
}

#[derive(Serialize, Deserialize)]
struct FloorArgs {
    height: f32,
}

#[derive(Serialize, Deserialize)]
struct RoomArgs {
    position: Vec3,
    size: Vec3,
}

#[derive(Serialize, Deserialize)]
struct RouterArgs {
    position: Vec3,
}

fn args_of(entity: &Entity) -> Result<Map<String, Value>, SceneError> {
    let value = match entity {
        Entity::Model => Value::Object(Map::new()),
        Entity::Floor { height } => serde_json::to_value(FloorArgs { height: *height })?,
        Entity::Room { position, size } => serde_json::to_value(RoomArgs {
            position: *position,
            size: *size,
        })?,
        Entity::Router { position, .. } => serde_json::to_value(RouterArgs {
            position: *position,
        })?,
    };
    match value {
        Value::Object(map) => Ok(map),
        // Args structs always serialize to objects.
        _ => Ok(Map::new()),
    }
}

fn entity_from_doc(doc: &NodeDoc) -> Result<Entity, SceneError> {
    let kind = EntityKind::from_name(&doc.kind)
        .ok_or_else(|| SceneError::UnknownKind(doc.kind.clone()))?;
    let args = Value::Object(doc.args.clone());
    Ok(match kind {
        EntityKind::Model => Entity::Model,
        EntityKind::Floor => {
            let args: FloorArgs = serde_json::from_value(args)?;
            Entity::floor(args.height)
        }
        EntityKind::Room => {
            let args: RoomArgs = serde_json::from_value(args)?;
            Entity::room(args.position, args.size)
        }
        EntityKind::Router => {
            let args: RouterArgs = serde_json::from_value(args)?;
            Entity::router(args.position)
        }
    })
}

fn node_to_doc(tree: &SceneTree, id: NodeId) -> Result<NodeDoc, SceneError> {
    let entity = tree.entity(id).ok_or(SceneError::StaleNode)?;
    let mut children = Vec::with_capacity(tree.children(id).len());
    for &child in tree.children(id) {
        children.push(node_to_doc(tree, child)?);
    }
    Ok(NodeDoc {
        kind: entity.kind().name().to_owned(),
        args: args_of(entity)?,
        children,
    })
}

/// Build the document's subtree as detached nodes. On any error the partial
/// subtree is freed before returning, leaving no garbage in the arena.
fn build_subtree(tree: &mut SceneTree, doc: &NodeDoc) -> Result<NodeId, SceneError> {
    let entity = entity_from_doc(doc)?;
    let id = tree.create(entity);
    for child_doc in &doc.children {
        let child = match build_subtree(tree, child_doc) {
            Ok(child) => child,
            Err(err) => {
                tree.destroy(id);
                return Err(err);
            }
        };
        if let Err(err) = tree.attach(id, child) {
            tree.destroy(child);
            tree.destroy(id);
            return Err(err);
        }
    }
    Ok(id)
}

impl SceneModel {
    /// Serialize the live tree to a document.
    pub fn to_doc(&self) -> Result<NodeDoc, SceneError> {
        node_to_doc(self.tree(), self.root())
    }

    /// Serialize the live tree to pretty-printed JSON text.
    pub fn to_json_string(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(&self.to_doc()?)?)
    }

    /// Replace the whole scene with `doc`, publishing once.
    ///
    /// The incoming root's children become the model root's children (its own
    /// kind and args are validated but otherwise ignored). Fails without
    /// touching the live tree if any kind is unknown or any args are
    /// malformed.
    pub fn load_doc(&mut self, doc: &NodeDoc) -> Result<(), SceneError> {
        let staging = build_subtree(self.tree_mut(), doc)?;
        let root = self.root();
        let swap = self.tree_mut().replace_children(root, staging);
        // The staging shell is childless either way; drop it.
        self.tree_mut().destroy(staging);
        swap?;
        self.unselect_silent();
        info!(children = doc.children.len(), "loaded scene document");
        self.publish();
        Ok(())
    }

    /// Parse JSON text and [`load_doc`](Self::load_doc) it.
    pub fn load_json_str(&mut self, text: &str) -> Result<(), SceneError> {
        let doc: NodeDoc = serde_json::from_str(text)?;
        self.load_doc(&doc)
    }
}
