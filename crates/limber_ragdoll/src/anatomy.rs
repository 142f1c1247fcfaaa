//! Anatomy builder: derives segment geometry, mass properties and world
//! placement from a small parametric description
//!
//! All dimensions and masses are compile-time constants; the only inputs
//! are the placement anchor and the per-instance group id. Segment
//! centers chain downward from the torso: the neck sits on the torso top,
//! the head overlaps the neck top slightly (no visible gap), and each
//! limb hangs from its torso attach point as two stacked links.

use crate::filter::SegmentClass;
use crate::segment::{Ragdoll, Segment, SegmentId};
use limber_physics::{BodyDesc, ColliderDesc, ColliderShape, PhysicsWorld};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

// ==================== Dimensions ====================

/// Torso width
pub const TORSO_W: f32 = 15.0;
/// Torso height
pub const TORSO_H: f32 = 90.0;
/// Neck length (inner segment, caps excluded)
pub const NECK_LEN: f32 = 10.0;
/// Neck width
pub const NECK_W: f32 = 6.0;
/// Head radius
pub const HEAD_R: f32 = 15.0;
/// Upper arm length
pub const UPPER_ARM_LEN: f32 = 40.0;
/// Forearm length
pub const LOWER_ARM_LEN: f32 = 35.0;
/// Arm width
pub const ARM_W: f32 = 8.0;
/// Thigh length
pub const THIGH_LEN: f32 = 45.0;
/// Shin length
pub const SHIN_LEN: f32 = 40.0;
/// Leg width
pub const LEG_W: f32 = 10.0;

// ==================== Masses ====================

pub const M_TORSO: f32 = 5.0;
pub const M_HEAD: f32 = 1.5;
pub const M_NECK: f32 = 0.4;
pub const M_UPPER_ARM: f32 = 0.8;
pub const M_LOWER_ARM: f32 = 0.6;
pub const M_THIGH: f32 = 1.2;
pub const M_SHIN: f32 = 1.0;

// ==================== Surface properties ====================

/// Friction shared by every part
pub const PART_FRICTION: f32 = 0.7;
/// Restitution shared by every part
pub const PART_RESTITUTION: f32 = 0.1;

/// Corner rounding on box segments
const BOX_CORNER_RADIUS: f32 = 1.0;

/// The head center sits this fraction of its radius above the neck top,
/// leaving a slight overlap instead of a gap.
const HEAD_OVERLAP: f32 = 0.8;

// ==================== Mass moments ====================

/// Moment of inertia of a solid rectangle about its center
pub fn moment_for_box(mass: f32, width: f32, height: f32) -> f32 {
    mass * (width * width + height * height) / 12.0
}

/// Moment of inertia of a solid disc about its center
pub fn moment_for_circle(mass: f32, radius: f32) -> f32 {
    0.5 * mass * radius * radius
}

/// Moment of inertia of a capsule (thick segment of inner length `len`
/// with cap radius `radius`) about its center
pub fn moment_for_capsule(mass: f32, len: f32, radius: f32) -> f32 {
    let full = len + 2.0 * radius;
    mass * (full * full + 4.0 * radius * radius) / 12.0
}

// ==================== Limb definitions ====================

/// Whether a two-link limb is an arm or a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimbClass {
    Arm,
    Leg,
}

impl LimbClass {
    /// Name of the limb's root joint (torso side)
    pub fn root_joint_name(self) -> &'static str {
        match self {
            Self::Arm => "shoulder",
            Self::Leg => "hip",
        }
    }

    /// Name of the limb's mid joint
    pub fn mid_joint_name(self) -> &'static str {
        match self {
            Self::Arm => "elbow",
            Self::Leg => "knee",
        }
    }
}

/// Parametric description of one two-link limb
///
/// Arms and legs are built by the same construction; nothing branches on
/// the limb's identity beyond this record.
#[derive(Debug, Clone, Copy)]
pub struct LimbDef {
    /// Upper segment id
    pub upper: SegmentId,
    /// Lower segment id
    pub lower: SegmentId,
    /// Arm or leg
    pub class: LimbClass,
    /// Front or back plane (collision category)
    pub plane: SegmentClass,
    /// Horizontal offset of the limb root from the torso center
    pub x_offset: f32,
    /// Attach height on the torso, relative to its center
    pub attach_y: f32,
    /// Upper segment length
    pub upper_len: f32,
    /// Lower segment length
    pub lower_len: f32,
    /// Segment width
    pub width: f32,
    /// Upper segment mass
    pub upper_mass: f32,
    /// Lower segment mass
    pub lower_mass: f32,
    /// Root joint (shoulder/hip) angle range
    pub root_limit: [f32; 2],
    /// Mid joint (elbow/knee) angle range
    pub mid_limit: [f32; 2],
}

/// The four limbs of the figure.
///
/// Right-side limbs ride the front plane, left-side the back plane. The
/// small 0.1 rad allowance past "straight" on elbows and knees is
/// deliberate slack at the hinge boundary; keep the exact constants.
pub fn limb_definitions() -> [LimbDef; 4] {
    let arm = |upper, lower, plane, x_offset| LimbDef {
        upper,
        lower,
        class: LimbClass::Arm,
        plane,
        x_offset,
        attach_y: TORSO_H * 0.4,
        upper_len: UPPER_ARM_LEN,
        lower_len: LOWER_ARM_LEN,
        width: ARM_W,
        upper_mass: M_UPPER_ARM,
        lower_mass: M_LOWER_ARM,
        root_limit: [-PI * 0.7, PI * 0.7],
        mid_limit: [-0.1, PI * 0.7],
    };
    let leg = |upper, lower, plane, x_offset| LimbDef {
        upper,
        lower,
        class: LimbClass::Leg,
        plane,
        x_offset,
        attach_y: -TORSO_H * 0.45,
        upper_len: THIGH_LEN,
        lower_len: SHIN_LEN,
        width: LEG_W,
        upper_mass: M_THIGH,
        lower_mass: M_SHIN,
        root_limit: [-PI * 0.6, PI * 0.4],
        mid_limit: [-PI * 0.8, 0.1],
    };

    [
        arm(
            SegmentId::RArmUpper,
            SegmentId::RArmLower,
            SegmentClass::FrontLimb,
            TORSO_W / 2.0,
        ),
        arm(
            SegmentId::LArmUpper,
            SegmentId::LArmLower,
            SegmentClass::BackLimb,
            -TORSO_W / 2.0,
        ),
        leg(
            SegmentId::RLegUpper,
            SegmentId::RLegLower,
            SegmentClass::FrontLimb,
            TORSO_W / 4.0,
        ),
        leg(
            SegmentId::LLegUpper,
            SegmentId::LLegLower,
            SegmentClass::BackLimb,
            -TORSO_W / 4.0,
        ),
    ]
}

// ==================== Builder ====================

/// Build all 11 segments at a base position, registering each body and
/// shape with the physics world. Joints are added by [`crate::rig`].
pub fn build(world: &mut PhysicsWorld, base: [f32; 2], group: u32) -> Ragdoll {
    let [x, y] = base;

    let torso_filter = SegmentClass::TorsoHead.filter(group);

    // Torso center is the base position itself
    let torso = make_segment(
        world,
        SegmentId::Torso,
        [x, y],
        ColliderShape::round_cuboid(TORSO_W / 2.0, TORSO_H / 2.0, BOX_CORNER_RADIUS),
        M_TORSO,
        moment_for_box(M_TORSO, TORSO_W, TORSO_H),
        torso_filter,
    );

    // Neck sits on the torso top
    let neck_y = y + TORSO_H / 2.0 + NECK_LEN / 2.0;
    let neck = make_segment(
        world,
        SegmentId::Neck,
        [x, neck_y],
        ColliderShape::capsule(NECK_LEN / 2.0, NECK_W / 2.0),
        M_NECK,
        moment_for_capsule(M_NECK, NECK_LEN, NECK_W / 2.0),
        torso_filter,
    );

    // Head overlaps the neck top slightly
    let head_y = neck_y + NECK_LEN / 2.0 + HEAD_R * HEAD_OVERLAP;
    let head = make_segment(
        world,
        SegmentId::Head,
        [x, head_y],
        ColliderShape::circle(HEAD_R),
        M_HEAD,
        moment_for_circle(M_HEAD, HEAD_R),
        torso_filter,
    );

    let mut limbs = Vec::with_capacity(8);
    for def in limb_definitions() {
        let filter = def.plane.filter(group);
        let limb_x = x + def.x_offset;

        // Upper link hangs from the torso attach point
        let upper_y = y + def.attach_y - def.upper_len / 2.0;
        let upper = make_segment(
            world,
            def.upper,
            [limb_x, upper_y],
            ColliderShape::round_cuboid(def.width / 2.0, def.upper_len / 2.0, BOX_CORNER_RADIUS),
            def.upper_mass,
            moment_for_box(def.upper_mass, def.width, def.upper_len),
            filter,
        );

        // Lower link continues straight down from the upper link's bottom
        let lower_y = upper_y - def.upper_len / 2.0 - def.lower_len / 2.0;
        let lower = make_segment(
            world,
            def.lower,
            [limb_x, lower_y],
            ColliderShape::round_cuboid(def.width / 2.0, def.lower_len / 2.0, BOX_CORNER_RADIUS),
            def.lower_mass,
            moment_for_box(def.lower_mass, def.width, def.lower_len),
            filter,
        );

        limbs.push(upper);
        limbs.push(lower);
    }

    log::info!("built ragdoll group {} at ({}, {})", group, x, y);

    Ragdoll::new(
        group,
        [
            torso, neck, head, limbs[0], limbs[1], limbs[2], limbs[3], limbs[4], limbs[5],
            limbs[6], limbs[7],
        ],
    )
}

fn make_segment(
    world: &mut PhysicsWorld,
    id: SegmentId,
    position: [f32; 2],
    shape: ColliderShape,
    mass: f32,
    moment: f32,
    filter: limber_physics::CollisionFilter,
) -> Segment {
    let body = world.create_body(
        BodyDesc::dynamic()
            .with_position(position[0], position[1])
            .with_mass_properties(mass, moment),
    );
    let collider = world.create_collider(
        ColliderDesc::new(shape)
            .with_friction(PART_FRICTION)
            .with_restitution(PART_RESTITUTION)
            .with_filter(filter),
        body,
    );

    Segment {
        id,
        body,
        collider,
        mass,
    }
}
