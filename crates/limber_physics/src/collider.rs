//! Collider shapes and descriptors

use crate::filter::{group_to_user_data, CollisionFilter};
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) rapier::ColliderHandle);

impl ColliderHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::ColliderHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::ColliderHandle {
        self.0
    }
}

/// Collision shape type
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Circle with radius
    Circle { radius: f32 },
    /// Box with half-extents and optional corner rounding
    Box {
        half_extents: [f32; 2],
        corner_radius: f32,
    },
    /// Capsule aligned along the Y axis
    CapsuleY { half_height: f32, radius: f32 },
    /// Capsule aligned along the X axis
    CapsuleX { half_height: f32, radius: f32 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::Box {
            half_extents: [0.5, 0.5],
            corner_radius: 0.0,
        }
    }
}

impl ColliderShape {
    /// Create a circle shape
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy],
            corner_radius: 0.0,
        }
    }

    /// Create a box shape with rounded corners
    pub fn round_cuboid(hx: f32, hy: f32, corner_radius: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy],
            corner_radius,
        }
    }

    /// Create a capsule shape (Y-aligned)
    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::CapsuleY {
            half_height,
            radius,
        }
    }

    /// Create a horizontal capsule shape (X-aligned)
    pub fn capsule_x(half_height: f32, radius: f32) -> Self {
        Self::CapsuleX {
            half_height,
            radius,
        }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(&self) -> rapier::SharedShape {
        match *self {
            Self::Circle { radius } => rapier::SharedShape::ball(radius),
            Self::Box {
                half_extents,
                corner_radius,
            } => {
                if corner_radius > 0.0 {
                    rapier::SharedShape::round_cuboid(
                        half_extents[0],
                        half_extents[1],
                        corner_radius,
                    )
                } else {
                    rapier::SharedShape::cuboid(half_extents[0], half_extents[1])
                }
            }
            Self::CapsuleY {
                half_height,
                radius,
            } => rapier::SharedShape::capsule_y(half_height, radius),
            Self::CapsuleX {
                half_height,
                radius,
            } => rapier::SharedShape::capsule_x(half_height, radius),
        }
    }
}

/// Description for creating a collider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderDesc {
    /// Collision shape
    pub shape: ColliderShape,
    /// Friction coefficient
    pub friction: f32,
    /// Restitution (bounciness)
    pub restitution: f32,
    /// Collision filter (category, mask, group)
    pub filter: CollisionFilter,
}

impl Default for ColliderDesc {
    fn default() -> Self {
        Self {
            shape: ColliderShape::default(),
            friction: 0.5,
            restitution: 0.0,
            filter: CollisionFilter::ALL,
        }
    }
}

impl ColliderDesc {
    /// Create a new collider description with a shape
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    /// Set friction
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set the collision filter
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Build a Rapier collider builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::ColliderBuilder {
        // Zero density: mass comes from the body's explicit mass properties.
        let mut builder = rapier::ColliderBuilder::new(self.shape.to_rapier())
            .friction(self.friction)
            .restitution(self.restitution)
            .density(0.0)
            .collision_groups(self.filter.to_rapier())
            .active_events(rapier::ActiveEvents::COLLISION_EVENTS)
            .user_data(group_to_user_data(self.filter.group));

        if self.filter.group != 0 {
            builder = builder.active_hooks(rapier::ActiveHooks::FILTER_CONTACT_PAIRS);
        }

        builder
    }
}
