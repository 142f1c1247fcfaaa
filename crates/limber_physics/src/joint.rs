//! Joint descriptors: pivots, rotary limits, damped springs

use rapier2d::na as nalgebra;
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a joint in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(pub(crate) rapier::ImpulseJointHandle);

impl JointHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::ImpulseJointHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::ImpulseJointHandle {
        self.0
    }
}

/// Pivot joint: forces two local anchor points to coincide, free rotation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PivotJoint {
    /// Anchor point in the first body's local frame
    pub local_anchor1: [f32; 2],
    /// Anchor point in the second body's local frame
    pub local_anchor2: [f32; 2],
}

impl PivotJoint {
    /// Create a pivot joint from two local anchors
    pub fn new(local_anchor1: [f32; 2], local_anchor2: [f32; 2]) -> Self {
        Self {
            local_anchor1,
            local_anchor2,
        }
    }

    pub(crate) fn to_rapier(&self) -> rapier::GenericJoint {
        rapier::RevoluteJointBuilder::new()
            .local_anchor1(rapier::point![self.local_anchor1[0], self.local_anchor1[1]])
            .local_anchor2(rapier::point![self.local_anchor2[0], self.local_anchor2[1]])
            .build()
            .into()
    }
}

/// Rotary limit: bounds the relative angle between two bodies
///
/// Applies no positional coupling at all; pair it with a pivot joint to
/// get a limited hinge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RotaryLimit {
    /// Minimum relative angle (radians)
    pub min: f32,
    /// Maximum relative angle (radians)
    pub max: f32,
}

impl RotaryLimit {
    /// Create a rotary limit from an angle range
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Symmetric limit around zero
    pub fn symmetric(half_range: f32) -> Self {
        Self {
            min: -half_range,
            max: half_range,
        }
    }

    pub(crate) fn to_rapier(&self) -> rapier::GenericJoint {
        rapier::GenericJointBuilder::new(rapier::JointAxesMask::empty())
            .limits(rapier::JointAxis::AngX, [self.min, self.max])
            .build()
    }
}

/// Damped spring: elastic pull between two anchor points
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DampedSpring {
    /// Anchor point in the first body's local frame
    pub local_anchor1: [f32; 2],
    /// Anchor point in the second body's local frame
    pub local_anchor2: [f32; 2],
    /// Rest length of the spring
    pub rest_length: f32,
    /// Spring stiffness
    pub stiffness: f32,
    /// Spring damping
    pub damping: f32,
}

impl DampedSpring {
    /// Create a damped spring between two local anchors
    pub fn new(
        local_anchor1: [f32; 2],
        local_anchor2: [f32; 2],
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Self {
        Self {
            local_anchor1,
            local_anchor2,
            rest_length,
            stiffness,
            damping,
        }
    }

    pub(crate) fn to_rapier(&self) -> rapier::GenericJoint {
        rapier::SpringJointBuilder::new(self.rest_length, self.stiffness, self.damping)
            .local_anchor1(rapier::point![self.local_anchor1[0], self.local_anchor1[1]])
            .local_anchor2(rapier::point![self.local_anchor2[0], self.local_anchor2[1]])
            .build()
            .into()
    }
}
