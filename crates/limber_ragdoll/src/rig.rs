//! Joint rig: pivots and rotary limits at anatomically correct anchors
//!
//! Every skeleton edge gets a pivot constraint plus a paired rotary
//! limit. Anchor points are expressed in each segment's local frame.
//! Arms and legs share one code path driven by the limb definitions;
//! their asymmetric ranges (an elbow flexes one way, a knee the other)
//! come straight from the data.

use crate::anatomy::{self, limb_definitions, LimbDef};
use crate::segment::{JointPair, Ragdoll, SegmentId};
use limber_physics::{PhysicsWorld, PivotJoint, RotaryLimit};
use std::f32::consts::PI;

/// Torso-neck limit: ±22.5°
const NECK_LIMIT: f32 = PI / 8.0;
/// Neck-head limit: ±30°
const HEAD_LIMIT: f32 = PI / 6.0;
/// The head's local anchor sits halfway into it from its bottom
const HEAD_ANCHOR_DEPTH: f32 = 0.5;

/// Create all 10 joint+limit pairs for a freshly built ragdoll.
///
/// Registered as one batch; every segment already exists, so there is no
/// partial-registration failure path.
pub fn rig(world: &mut PhysicsWorld, ragdoll: &mut Ragdoll) {
    // Axial chain: torso-neck, neck-head
    attach(
        world,
        ragdoll,
        SegmentId::Torso,
        SegmentId::Neck,
        [0.0, anatomy::TORSO_H / 2.0],
        [0.0, -anatomy::NECK_LEN / 2.0],
        RotaryLimit::symmetric(NECK_LIMIT),
    );
    attach(
        world,
        ragdoll,
        SegmentId::Neck,
        SegmentId::Head,
        [0.0, anatomy::NECK_LEN / 2.0],
        [0.0, -anatomy::HEAD_R * HEAD_ANCHOR_DEPTH],
        RotaryLimit::symmetric(HEAD_LIMIT),
    );

    // Four two-link limbs
    for def in limb_definitions() {
        rig_limb(world, ragdoll, &def);
    }

    log::info!(
        "rigged ragdoll group {}: {} joint pairs",
        ragdoll.group(),
        ragdoll.joints().len()
    );
}

fn rig_limb(world: &mut PhysicsWorld, ragdoll: &mut Ragdoll, def: &LimbDef) {
    // Root joint (shoulder/hip): torso attach point to the upper link's
    // far end
    attach(
        world,
        ragdoll,
        SegmentId::Torso,
        def.upper,
        [0.0, def.attach_y],
        [0.0, def.upper_len / 2.0],
        RotaryLimit::new(def.root_limit[0], def.root_limit[1]),
    );
    log::debug!(
        "{} {}: root range [{:.2}, {:.2}]",
        def.upper.name(),
        def.class.root_joint_name(),
        def.root_limit[0],
        def.root_limit[1]
    );

    // Mid joint (elbow/knee): upper link's near end to the lower link's
    // far end
    attach(
        world,
        ragdoll,
        def.upper,
        def.lower,
        [0.0, -def.upper_len / 2.0],
        [0.0, def.lower_len / 2.0],
        RotaryLimit::new(def.mid_limit[0], def.mid_limit[1]),
    );
    log::debug!(
        "{} {}: mid range [{:.2}, {:.2}]",
        def.lower.name(),
        def.class.mid_joint_name(),
        def.mid_limit[0],
        def.mid_limit[1]
    );
}

fn attach(
    world: &mut PhysicsWorld,
    ragdoll: &mut Ragdoll,
    parent: SegmentId,
    child: SegmentId,
    parent_anchor: [f32; 2],
    child_anchor: [f32; 2],
    limit: RotaryLimit,
) {
    let parent_body = ragdoll.segment(parent).body;
    let child_body = ragdoll.segment(child).body;

    let pivot = world.create_pivot(
        parent_body,
        child_body,
        PivotJoint::new(parent_anchor, child_anchor),
    );
    let limit_handle = world.create_rotary_limit(parent_body, child_body, limit);

    ragdoll.add_joint_pair(JointPair {
        parent,
        child,
        pivot,
        limit: limit_handle,
        min: limit.min,
        max: limit.max,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anatomy;
    use approx::assert_relative_eq;
    use limber_physics::PhysicsConfig;

    fn rigged_ragdoll() -> (PhysicsWorld, Ragdoll) {
        let mut world =
            PhysicsWorld::new(PhysicsConfig::default().with_gravity(0.0, -900.0));
        let mut ragdoll = anatomy::build(&mut world, [400.0, 300.0], 1);
        rig(&mut world, &mut ragdoll);
        (world, ragdoll)
    }

    #[test]
    fn test_ten_joint_pairs() {
        let (world, ragdoll) = rigged_ragdoll();
        assert_eq!(ragdoll.joints().len(), SegmentId::COUNT - 1);
        // A pivot and a limit per edge
        assert_eq!(world.joint_count(), 2 * (SegmentId::COUNT - 1));
    }

    #[test]
    fn test_every_non_root_segment_has_one_parent_joint() {
        let (_world, ragdoll) = rigged_ragdoll();

        assert!(ragdoll.joint_to(SegmentId::Torso).is_none());
        for id in SegmentId::ALL.into_iter().filter(|id| *id != SegmentId::Torso) {
            let incoming: Vec<_> = ragdoll
                .joints()
                .iter()
                .filter(|pair| pair.child == id)
                .collect();
            assert_eq!(incoming.len(), 1, "{:?} needs exactly one parent joint", id);
            assert_eq!(incoming[0].parent, id.parent().unwrap());
        }
    }

    #[test]
    fn test_limit_ranges_recorded() {
        let (_world, ragdoll) = rigged_ragdoll();

        let neck = ragdoll.joint_to(SegmentId::Neck).unwrap();
        assert_relative_eq!(neck.min, -PI / 8.0);
        assert_relative_eq!(neck.max, PI / 8.0);

        let head = ragdoll.joint_to(SegmentId::Head).unwrap();
        assert_relative_eq!(head.min, -PI / 6.0);
        assert_relative_eq!(head.max, PI / 6.0);

        let elbow = ragdoll.joint_to(SegmentId::RArmLower).unwrap();
        assert_relative_eq!(elbow.min, -0.1);
        assert_relative_eq!(elbow.max, PI * 0.7);

        let knee = ragdoll.joint_to(SegmentId::RLegLower).unwrap();
        assert_relative_eq!(knee.min, -PI * 0.8);
        assert_relative_eq!(knee.max, 0.1);

        // The hinge ranges mirror each other
        assert_relative_eq!(knee.min, -elbow.max);
        assert_relative_eq!(knee.max, -elbow.min);
    }

    #[test]
    fn test_limits_hold_while_settling() {
        let (mut world, ragdoll) = rigged_ragdoll();

        // Let the figure tumble freely for a while; relative angles must
        // stay inside their ranges (small solver tolerance allowed).
        for _ in 0..240 {
            world.step(1.0 / 60.0);

            for pair in ragdoll.joints() {
                let parent_rot = world
                    .body_rotation(ragdoll.segment(pair.parent).body)
                    .unwrap();
                let child_rot = world
                    .body_rotation(ragdoll.segment(pair.child).body)
                    .unwrap();
                let relative = child_rot - parent_rot;
                assert!(
                    relative > pair.min - 0.25 && relative < pair.max + 0.25,
                    "{:?}->{:?} relative angle {} outside [{}, {}]",
                    pair.parent,
                    pair.child,
                    relative,
                    pair.min,
                    pair.max
                );
            }
        }
    }

    #[test]
    fn test_pivot_anchors_stay_coincident_under_gravity() {
        let (mut world, ragdoll) = rigged_ragdoll();

        for _ in 0..120 {
            world.step(1.0 / 60.0);
        }

        // Torso-top anchor and neck-bottom anchor should still agree
        let torso_anchor = world
            .local_to_world(
                ragdoll.segment(SegmentId::Torso).body,
                [0.0, anatomy::TORSO_H / 2.0],
            )
            .unwrap();
        let neck_anchor = world
            .local_to_world(
                ragdoll.segment(SegmentId::Neck).body,
                [0.0, -anatomy::NECK_LEN / 2.0],
            )
            .unwrap();

        let dx = torso_anchor[0] - neck_anchor[0];
        let dy = torso_anchor[1] - neck_anchor[1];
        assert!((dx * dx + dy * dy).sqrt() < 1.0);
    }
}
