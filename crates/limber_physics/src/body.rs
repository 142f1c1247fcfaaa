//! Rigid body descriptors and handles

use rapier2d::na as nalgebra;
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) rapier::RigidBodyHandle);

impl BodyHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::RigidBodyHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::RigidBodyHandle {
        self.0
    }
}

/// Kind of rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Static body - never moves, infinite mass
    Static,
    /// Dynamic body - fully simulated
    #[default]
    Dynamic,
    /// Kinematic body - position driven externally, unaffected by forces
    Kinematic,
}

impl From<BodyKind> for rapier::RigidBodyType {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Static => rapier::RigidBodyType::Fixed,
            BodyKind::Dynamic => rapier::RigidBodyType::Dynamic,
            BodyKind::Kinematic => rapier::RigidBodyType::KinematicPositionBased,
        }
    }
}

/// Description for creating a rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Kind of rigid body
    pub kind: BodyKind,
    /// Initial position
    pub position: [f32; 2],
    /// Initial rotation (radians)
    pub rotation: f32,
    /// Mass (ignored for static/kinematic bodies)
    pub mass: f32,
    /// Moment of inertia about the center of mass
    pub angular_inertia: f32,
    /// Can this body sleep when inactive
    pub can_sleep: bool,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position: [0.0, 0.0],
            rotation: 0.0,
            mass: 1.0,
            angular_inertia: 1.0,
            can_sleep: true,
        }
    }
}

impl BodyDesc {
    /// Create a static body description
    pub fn fixed() -> Self {
        Self {
            kind: BodyKind::Static,
            ..Default::default()
        }
    }

    /// Create a dynamic body description
    pub fn dynamic() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            ..Default::default()
        }
    }

    /// Create a kinematic body description
    pub fn kinematic() -> Self {
        Self {
            kind: BodyKind::Kinematic,
            ..Default::default()
        }
    }

    /// Set position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set rotation (radians)
    pub fn with_rotation(mut self, angle: f32) -> Self {
        self.rotation = angle;
        self
    }

    /// Set mass and moment of inertia together
    pub fn with_mass_properties(mut self, mass: f32, angular_inertia: f32) -> Self {
        self.mass = mass;
        self.angular_inertia = angular_inertia;
        self
    }

    /// Set whether the body may sleep
    pub fn with_can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Build a Rapier rigid body builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::RigidBodyBuilder {
        let mut builder = rapier::RigidBodyBuilder::new(self.kind.into())
            .translation(rapier::vector![self.position[0], self.position[1]])
            .rotation(self.rotation)
            .can_sleep(self.can_sleep);

        // Colliders carry zero density, so the explicit mass properties
        // are the body's whole mass model.
        if self.kind == BodyKind::Dynamic {
            builder = builder.additional_mass_properties(rapier::MassProperties::new(
                rapier::point![0.0, 0.0],
                self.mass,
                self.angular_inertia,
            ));
        }

        builder
    }
}
