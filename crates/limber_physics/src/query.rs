//! Spatial queries against the physics world

use crate::body::BodyHandle;
use crate::collider::ColliderHandle;
use rapier2d::na as nalgebra;
use rapier2d::prelude as rapier;

/// Result of a nearest-point query
#[derive(Debug, Clone, Copy)]
pub struct PointQueryHit {
    /// The collider closest to the query point
    pub collider: ColliderHandle,
    /// The body that collider is attached to
    pub body: BodyHandle,
    /// Closest point on the collider's surface, in world space
    pub point: [f32; 2],
    /// Distance from the query point (zero when inside)
    pub distance: f32,
    /// Whether the query point is inside the shape
    pub is_inside: bool,
}

/// Query interface for the physics world
pub struct PhysicsQuery<'a> {
    pub(crate) query_pipeline: &'a rapier::QueryPipeline,
    pub(crate) colliders: &'a rapier::ColliderSet,
    pub(crate) bodies: &'a rapier::RigidBodySet,
}

impl<'a> PhysicsQuery<'a> {
    /// Find the collider nearest to a world point, within `max_distance`,
    /// restricted to colliders whose category bits intersect `mask`.
    pub fn nearest_point(
        &self,
        point: [f32; 2],
        max_distance: f32,
        mask: u32,
    ) -> Option<PointQueryHit> {
        let query_point = rapier::point![point[0], point[1]];
        let filter = rapier::QueryFilter::new().groups(rapier::InteractionGroups::new(
            rapier::Group::ALL,
            rapier::Group::from_bits_truncate(mask),
        ));

        let (handle, projection) =
            self.query_pipeline
                .project_point(self.bodies, self.colliders, &query_point, true, filter)?;

        let distance = if projection.is_inside {
            0.0
        } else {
            let dx = projection.point.x - point[0];
            let dy = projection.point.y - point[1];
            (dx * dx + dy * dy).sqrt()
        };

        if distance > max_distance {
            return None;
        }

        let collider = self.colliders.get(handle)?;
        let body = collider.parent()?;

        Some(PointQueryHit {
            collider: ColliderHandle(handle),
            body: BodyHandle(body),
            point: [projection.point.x, projection.point.y],
            distance,
            is_inside: projection.is_inside,
        })
    }
}
