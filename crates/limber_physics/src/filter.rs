//! Collision filtering: category/mask bits plus group-id suppression
//!
//! Two shapes sharing the same nonzero group id never collide, no matter
//! what their category/mask bits say. Otherwise a pair collides only if
//! each side's category bit appears in the other side's mask. Rapier has
//! no built-in group-id rule, so the suppression half runs as a
//! narrow-phase contact-filter hook keyed on group ids carried in
//! collider user data.

use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Collision filter assigned to a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    /// Category bits this shape belongs to
    pub category: u32,
    /// Category bits this shape collides with
    pub mask: u32,
    /// Group id; equal nonzero ids suppress collision unconditionally
    pub group: u32,
}

impl CollisionFilter {
    /// Collides with everything, no group suppression
    pub const ALL: Self = Self {
        category: u32::MAX,
        mask: u32::MAX,
        group: 0,
    };

    /// Create a new collision filter
    pub fn new(category: u32, mask: u32) -> Self {
        Self {
            category,
            mask,
            group: 0,
        }
    }

    /// Set the group id
    pub fn with_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }

    /// Check whether two filters permit a collision.
    ///
    /// Group suppression has priority over the category/mask test.
    pub fn allows(&self, other: &CollisionFilter) -> bool {
        if self.group != 0 && self.group == other.group {
            return false;
        }
        (self.category & other.mask) != 0 && (other.category & self.mask) != 0
    }

    /// Convert the category/mask half to Rapier interaction groups
    pub(crate) fn to_rapier(&self) -> rapier::InteractionGroups {
        rapier::InteractionGroups::new(
            rapier::Group::from_bits_truncate(self.category),
            rapier::Group::from_bits_truncate(self.mask),
        )
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::ALL
    }
}

/// Pack a group id into collider user data
pub(crate) fn group_to_user_data(group: u32) -> u128 {
    group as u128
}

/// Read a group id back out of collider user data
pub(crate) fn group_from_user_data(user_data: u128) -> u32 {
    user_data as u32
}

/// Narrow-phase hook enforcing group-id suppression
pub(crate) struct PairFilterHook;

impl rapier::PhysicsHooks for PairFilterHook {
    fn filter_contact_pair(
        &self,
        context: &rapier::PairFilterContext,
    ) -> Option<rapier::SolverFlags> {
        if same_nonzero_group(context) {
            None
        } else {
            Some(rapier::SolverFlags::COMPUTE_IMPULSES)
        }
    }

    fn filter_intersection_pair(&self, context: &rapier::PairFilterContext) -> bool {
        !same_nonzero_group(context)
    }
}

fn same_nonzero_group(context: &rapier::PairFilterContext) -> bool {
    let g1 = group_from_user_data(context.colliders[context.collider1].user_data);
    let g2 = group_from_user_data(context.colliders[context.collider2].user_data);
    g1 != 0 && g1 == g2
}
