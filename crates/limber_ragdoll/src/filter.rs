//! Collision categories for ragdoll parts and the platform
//!
//! Every part collides with every category except its own. Suppression of
//! collisions *within* one ragdoll is not done through these bits at all:
//! all parts of one instance share a group id, and the physics layer
//! never collides two shapes with the same nonzero group. That way the
//! front limbs of two different ragdolls still hit each other while one
//! figure's own arm passes through its own torso.

use limber_physics::CollisionFilter;
use serde::{Deserialize, Serialize};

/// Front-plane limbs (right arm, right leg)
pub const CAT_FRONT_LIMB: u32 = 0b1;
/// Back-plane limbs (left arm, left leg)
pub const CAT_BACK_LIMB: u32 = 0b10;
/// Torso, neck and head
pub const CAT_TORSO_HEAD: u32 = 0b100;
/// The static platform
pub const CAT_PLATFORM: u32 = 0b1000;

/// All categories
pub const CAT_ALL: u32 = CAT_FRONT_LIMB | CAT_BACK_LIMB | CAT_TORSO_HEAD | CAT_PLATFORM;

/// Mask for the mouse pick query: every ragdoll part, never the platform
pub const PICK_MASK: u32 = CAT_FRONT_LIMB | CAT_BACK_LIMB | CAT_TORSO_HEAD;

/// Collision classification of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentClass {
    /// Front-plane limb
    FrontLimb,
    /// Back-plane limb
    BackLimb,
    /// Torso, neck or head
    TorsoHead,
    /// Static platform
    Platform,
}

impl SegmentClass {
    /// The category bit for this class
    pub fn category(self) -> u32 {
        match self {
            Self::FrontLimb => CAT_FRONT_LIMB,
            Self::BackLimb => CAT_BACK_LIMB,
            Self::TorsoHead => CAT_TORSO_HEAD,
            Self::Platform => CAT_PLATFORM,
        }
    }

    /// The collision mask: every category except this class's own
    pub fn mask(self) -> u32 {
        CAT_ALL & !self.category()
    }

    /// Compose the full collision filter for a shape of this class
    pub fn filter(self, group: u32) -> CollisionFilter {
        CollisionFilter::new(self.category(), self.mask()).with_group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_excludes_own_category() {
        for class in [
            SegmentClass::FrontLimb,
            SegmentClass::BackLimb,
            SegmentClass::TorsoHead,
            SegmentClass::Platform,
        ] {
            assert_eq!(class.mask() & class.category(), 0);
            assert_eq!(class.mask() | class.category(), CAT_ALL);
        }
    }

    #[test]
    fn test_pick_mask_excludes_platform() {
        assert_eq!(PICK_MASK & CAT_PLATFORM, 0);
        assert_ne!(PICK_MASK & CAT_FRONT_LIMB, 0);
        assert_ne!(PICK_MASK & CAT_BACK_LIMB, 0);
        assert_ne!(PICK_MASK & CAT_TORSO_HEAD, 0);
    }

    #[test]
    fn test_cross_ragdoll_same_category_never_collides() {
        // Two front limbs mask each other out even across ragdolls
        let a = SegmentClass::FrontLimb.filter(1);
        let b = SegmentClass::FrontLimb.filter(2);
        assert!(!a.allows(&b));
    }

    #[test]
    fn test_cross_ragdoll_mixed_categories_collide() {
        // Front limb of one figure vs back limb / torso of another
        let front = SegmentClass::FrontLimb.filter(1);
        let back = SegmentClass::BackLimb.filter(2);
        let torso = SegmentClass::TorsoHead.filter(2);
        assert!(front.allows(&back));
        assert!(front.allows(&torso));
    }

    #[test]
    fn test_same_group_suppressed_regardless_of_category() {
        let front = SegmentClass::FrontLimb.filter(3);
        let torso = SegmentClass::TorsoHead.filter(3);
        assert!(!front.allows(&torso));
    }

    #[test]
    fn test_platform_collides_with_all_parts() {
        let platform = SegmentClass::Platform.filter(0);
        for class in [
            SegmentClass::FrontLimb,
            SegmentClass::BackLimb,
            SegmentClass::TorsoHead,
        ] {
            assert!(platform.allows(&class.filter(5)));
        }
    }
}
