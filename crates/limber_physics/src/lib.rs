//! Limber Physics - Rapier 2D Integration
//!
//! Thin, strongly-typed facade over Rapier 2D exposing exactly what the
//! ragdoll core needs:
//!
//! - Rigid bodies (static, dynamic, kinematic) with explicit mass and
//!   moment of inertia
//! - Colliders (circle, box, capsule) with friction, restitution and
//!   category/mask/group collision filters
//! - Pivot, rotary-limit and damped-spring joints
//! - Nearest-point spatial queries
//! - Fixed-timestep stepping with collision events
//!
//! The filter model follows the classic category/mask scheme with one
//! addition Rapier lacks natively: two colliders sharing the same nonzero
//! group id never collide, regardless of their bits. See [`filter`].

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod joint;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyDesc, BodyHandle, BodyKind};
    pub use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{CollisionEvent, CollisionEventType};
    pub use crate::filter::CollisionFilter;
    pub use crate::joint::{DampedSpring, JointHandle, PivotJoint, RotaryLimit};
    pub use crate::query::PointQueryHit;
    pub use crate::world::PhysicsWorld;
}

pub use prelude::*;
