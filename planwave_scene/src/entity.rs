// Copyright 2026 the Planwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Domain entities carried by tree nodes: floors, rooms, and routers.

use glam::Vec3;

/// Default transmit strength for a freshly placed router.
pub const DEFAULT_ROUTER_STRENGTH: f32 = 1.0;

/// Default half-distance decay constant: received strength halves every this
/// many units of distance.
pub const DEFAULT_HALF_DISTANCE: f32 = 1.0;

/// Kind tag for an [`Entity`].
///
/// Kind names double as the `kind` strings of the persisted document format;
/// see [`EntityKind::from_name`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EntityKind {
    /// The tree root. Exactly one per model; carries no attributes.
    Model,
    /// A building storey. Rooms attach underneath it.
    Floor,
    /// An axis-aligned box volume positioned by its center.
    Room,
    /// A wireless access point placed by the coverage optimizer.
    Router,
}

impl EntityKind {
    /// Stable name used in serialized documents.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Floor => "floor",
            Self::Room => "room",
            Self::Router => "router",
        }
    }

    /// Reverse lookup for [`name`](Self::name). Returns `None` for unknown kinds.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "model" => Some(Self::Model),
            "floor" => Some(Self::Floor),
            "room" => Some(Self::Room),
            "router" => Some(Self::Router),
            _ => None,
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific payload of a tree node.
///
/// An `Entity` is plain data; structure (parent, children, flags) lives in the
/// [`SceneTree`](crate::tree::SceneTree) node that carries it.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    /// The tree root.
    Model,
    /// A storey with a ceiling height in scene units.
    Floor {
        /// Storey height.
        height: f32,
    },
    /// A box volume, positioned by its center point.
    Room {
        /// Center of the volume.
        position: Vec3,
        /// Extent along each axis.
        size: Vec3,
    },
    /// An access point.
    Router {
        /// Placement point.
        position: Vec3,
        /// Transmit strength at zero distance.
        strength: f32,
        /// Distance at which received strength has halved.
        half_distance: f32,
        /// Indices into the current observation set assigned to this router.
        /// Written by the coverage optimizer; empty until an optimize pass ran.
        assigned: Vec<u32>,
    },
}

impl Entity {
    /// A floor with the given height.
    pub const fn floor(height: f32) -> Self {
        Self::Floor { height }
    }

    /// A room centered at `position` with extent `size`.
    pub const fn room(position: Vec3, size: Vec3) -> Self {
        Self::Room { position, size }
    }

    /// A router at `position` with the default strength and decay constant.
    pub const fn router(position: Vec3) -> Self {
        Self::router_with(position, DEFAULT_ROUTER_STRENGTH, DEFAULT_HALF_DISTANCE)
    }

    /// A router with explicit strength and half-distance.
    pub const fn router_with(position: Vec3, strength: f32, half_distance: f32) -> Self {
        Self::Router {
            position,
            strength,
            half_distance,
            assigned: Vec::new(),
        }
    }

    /// Kind tag of this entity.
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Model => EntityKind::Model,
            Self::Floor { .. } => EntityKind::Floor,
            Self::Room { .. } => EntityKind::Room,
            Self::Router { .. } => EntityKind::Router,
        }
    }

    /// Position for entities that have one (rooms and routers).
    pub const fn position(&self) -> Option<Vec3> {
        match self {
            Self::Room { position, .. } | Self::Router { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Extent for entities that have one (rooms).
    pub const fn size(&self) -> Option<Vec3> {
        match self {
            Self::Room { size, .. } => Some(*size),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            EntityKind::Model,
            EntityKind::Floor,
            EntityKind::Room,
            EntityKind::Router,
        ] {
            assert_eq!(EntityKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EntityKind::from_name("walrus"), None);
    }

    #[test]
    fn router_defaults() {
        let Entity::Router {
            strength,
            half_distance,
            assigned,
            ..
        } = Entity::router(Vec3::ZERO)
        else {
            panic!("expected a router entity");
        };
        assert_eq!(strength, DEFAULT_ROUTER_STRENGTH);
        assert_eq!(half_distance, DEFAULT_HALF_DISTANCE);
        assert!(assigned.is_empty(), "fresh routers have no assignments");
    }
}
