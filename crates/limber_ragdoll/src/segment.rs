//! The ragdoll data model: segments, joint pairs and the skeleton tree

use limber_physics::{BodyHandle, ColliderHandle, JointHandle};
use serde::{Deserialize, Serialize};

/// Identifier of one anatomical part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentId {
    Torso,
    Neck,
    Head,
    /// Right upper arm (front plane)
    RArmUpper,
    /// Right forearm (front plane)
    RArmLower,
    /// Left upper arm (back plane)
    LArmUpper,
    /// Left forearm (back plane)
    LArmLower,
    /// Right thigh (front plane)
    RLegUpper,
    /// Right shin (front plane)
    RLegLower,
    /// Left thigh (back plane)
    LLegUpper,
    /// Left shin (back plane)
    LLegLower,
}

impl SegmentId {
    /// Number of segments in a ragdoll
    pub const COUNT: usize = 11;

    /// All segment ids, in table order
    pub const ALL: [SegmentId; Self::COUNT] = [
        Self::Torso,
        Self::Neck,
        Self::Head,
        Self::RArmUpper,
        Self::RArmLower,
        Self::LArmUpper,
        Self::LArmLower,
        Self::RLegUpper,
        Self::RLegLower,
        Self::LLegUpper,
        Self::LLegLower,
    ];

    /// Table index of this segment
    pub fn index(self) -> usize {
        match self {
            Self::Torso => 0,
            Self::Neck => 1,
            Self::Head => 2,
            Self::RArmUpper => 3,
            Self::RArmLower => 4,
            Self::LArmUpper => 5,
            Self::LArmLower => 6,
            Self::RLegUpper => 7,
            Self::RLegLower => 8,
            Self::LLegUpper => 9,
            Self::LLegLower => 10,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::Torso => "torso",
            Self::Neck => "neck",
            Self::Head => "head",
            Self::RArmUpper => "rArm1",
            Self::RArmLower => "rArm2",
            Self::LArmUpper => "lArm1",
            Self::LArmLower => "lArm2",
            Self::RLegUpper => "rLeg1",
            Self::RLegLower => "rLeg2",
            Self::LLegUpper => "lLeg1",
            Self::LLegLower => "lLeg2",
        }
    }

    /// Parent segment in the skeleton tree (None for the torso root)
    pub fn parent(self) -> Option<SegmentId> {
        match self {
            Self::Torso => None,
            Self::Neck => Some(Self::Torso),
            Self::Head => Some(Self::Neck),
            Self::RArmUpper | Self::LArmUpper | Self::RLegUpper | Self::LLegUpper => {
                Some(Self::Torso)
            }
            Self::RArmLower => Some(Self::RArmUpper),
            Self::LArmLower => Some(Self::LArmUpper),
            Self::RLegLower => Some(Self::RLegUpper),
            Self::LLegLower => Some(Self::LLegUpper),
        }
    }
}

/// One rigid part of the figure: exactly one body and one collider,
/// created and destroyed together
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// Which anatomical part this is
    pub id: SegmentId,
    /// The engine body owning position and orientation
    pub body: BodyHandle,
    /// The attached collision shape
    pub collider: ColliderHandle,
    /// Mass assigned at build time
    pub mass: f32,
}

/// A pivot constraint plus its paired rotary limit on one skeleton edge
#[derive(Debug, Clone, Copy)]
pub struct JointPair {
    /// Parent segment of the edge
    pub parent: SegmentId,
    /// Child segment of the edge
    pub child: SegmentId,
    /// The pivot constraint
    pub pivot: JointHandle,
    /// The rotary-limit constraint
    pub limit: JointHandle,
    /// Lower bound on relative rotation (radians)
    pub min: f32,
    /// Upper bound on relative rotation (radians)
    pub max: f32,
}

/// One articulated figure: 11 segments and the 10 joint pairs linking them
pub struct Ragdoll {
    group: u32,
    segments: [Segment; SegmentId::COUNT],
    joints: Vec<JointPair>,
}

impl Ragdoll {
    /// Assemble a ragdoll from a full segment table; joints are added by
    /// the rig afterwards.
    pub(crate) fn new(group: u32, segments: [Segment; SegmentId::COUNT]) -> Self {
        debug_assert!(segments
            .iter()
            .zip(SegmentId::ALL)
            .all(|(seg, id)| seg.id == id));
        Self {
            group,
            segments,
            joints: Vec::with_capacity(SegmentId::COUNT - 1),
        }
    }

    /// The group id shared by every part of this instance
    pub fn group(&self) -> u32 {
        self.group
    }

    /// Look up a segment by id
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.index()]
    }

    /// Iterate over all segments
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// The joint pairs, one per skeleton edge
    pub fn joints(&self) -> &[JointPair] {
        &self.joints
    }

    /// Find the joint pair whose child is the given segment
    pub fn joint_to(&self, child: SegmentId) -> Option<&JointPair> {
        self.joints.iter().find(|pair| pair.child == child)
    }

    pub(crate) fn add_joint_pair(&mut self, pair: JointPair) {
        self.joints.push(pair);
    }
}
