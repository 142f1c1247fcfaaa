//! Physics world - main simulation container

use crate::body::{BodyDesc, BodyHandle};
use crate::collider::{ColliderDesc, ColliderHandle};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{CollisionEvent, CollisionEventType, EventCollector};
use crate::filter::PairFilterHook;
use crate::joint::{DampedSpring, JointHandle, PivotJoint, RotaryLimit};
use crate::query::PhysicsQuery;
use rapier2d::na as nalgebra;
use rapier2d::prelude as rapier;
use std::num::NonZeroUsize;

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    config: PhysicsConfig,

    /// Rapier physics pipeline
    pipeline: rapier::PhysicsPipeline,

    /// Gravity
    gravity: rapier::Vector<f32>,

    /// Integration parameters
    integration_params: rapier::IntegrationParameters,

    /// Island manager
    islands: rapier::IslandManager,

    /// Broad phase
    broad_phase: rapier::DefaultBroadPhase,

    /// Narrow phase
    narrow_phase: rapier::NarrowPhase,

    /// Impulse joint set
    impulse_joints: rapier::ImpulseJointSet,

    /// Multibody joint set
    multibody_joints: rapier::MultibodyJointSet,

    /// CCD solver
    ccd_solver: rapier::CCDSolver,

    /// Query pipeline
    query_pipeline: rapier::QueryPipeline,

    /// Rigid body set
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Group-id suppression hook
    hooks: PairFilterHook,

    /// Event collector
    events: EventCollector,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: PhysicsConfig) -> Self {
        let gravity = rapier::vector![config.gravity[0], config.gravity[1]];

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        log::debug!(
            "physics world: gravity {:?}, dt {}, {} solver iterations",
            config.gravity,
            config.timestep,
            config.solver_iterations
        );

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            query_pipeline: rapier::QueryPipeline::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            hooks: PairFilterHook,
            events: EventCollector::new(),
            accumulated_time: 0.0,
        }
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Get gravity
    pub fn gravity(&self) -> [f32; 2] {
        [self.gravity.x, self.gravity.y]
    }

    /// Set gravity
    pub fn set_gravity(&mut self, x: f32, y: f32) {
        self.gravity = rapier::vector![x, y];
    }

    // ==================== Rigid Bodies ====================

    /// Create a rigid body
    pub fn create_body(&mut self, mut desc: BodyDesc) -> BodyHandle {
        if !self.config.sleeping_enabled {
            desc.can_sleep = false;
        }
        let handle = self.bodies.insert(desc.to_rapier_builder());
        BodyHandle(handle)
    }

    /// Remove a rigid body together with its colliders and joints
    pub fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Get rigid body position
    pub fn body_position(&self, handle: BodyHandle) -> Result<[f32; 2]> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let pos = b.translation();
                [pos.x, pos.y]
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Set rigid body position
    pub fn set_body_position(&mut self, handle: BodyHandle, x: f32, y: f32) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| {
                if b.body_type() == rapier::RigidBodyType::KinematicPositionBased {
                    // Kinematic position-based: drive the next pose so the
                    // solver sees a velocity, preserving rotation.
                    let angle = b.rotation().angle();
                    b.set_next_kinematic_position(rapier::Isometry::new(
                        rapier::vector![x, y],
                        angle,
                    ));
                    // Also teleport so queries made before the next step see
                    // the new position.
                    b.set_translation(rapier::vector![x, y], false);
                } else {
                    b.set_translation(rapier::vector![x, y], true);
                }
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Get rigid body rotation (radians)
    pub fn body_rotation(&self, handle: BodyHandle) -> Result<f32> {
        self.bodies
            .get(handle.0)
            .map(|b| b.rotation().angle())
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Wake a body up
    pub fn wake_body(&mut self, handle: BodyHandle) -> Result<()> {
        self.bodies
            .get_mut(handle.0)
            .map(|b| b.wake_up(true))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Whether a body is dynamic (fully simulated)
    pub fn is_dynamic(&self, handle: BodyHandle) -> bool {
        self.bodies
            .get(handle.0)
            .map(|b| b.is_dynamic())
            .unwrap_or(false)
    }

    /// Transform a world point into a body's local frame
    pub fn world_to_local(&self, handle: BodyHandle, point: [f32; 2]) -> Result<[f32; 2]> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let local = b
                    .position()
                    .inverse_transform_point(&rapier::point![point[0], point[1]]);
                [local.x, local.y]
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Transform a point in a body's local frame into world space
    pub fn local_to_world(&self, handle: BodyHandle, point: [f32; 2]) -> Result<[f32; 2]> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let world = b.position() * rapier::point![point[0], point[1]];
                [world.x, world.y]
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    // ==================== Colliders ====================

    /// Create a collider attached to a rigid body
    pub fn create_collider(&mut self, desc: ColliderDesc, parent: BodyHandle) -> ColliderHandle {
        let handle =
            self.colliders
                .insert_with_parent(desc.to_rapier_builder(), parent.0, &mut self.bodies);
        ColliderHandle(handle)
    }

    /// Remove a collider
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.colliders
            .remove(handle.0, &mut self.islands, &mut self.bodies, true);
    }

    // ==================== Joints ====================

    /// Create a pivot joint between two bodies
    pub fn create_pivot(&mut self, a: BodyHandle, b: BodyHandle, joint: PivotJoint) -> JointHandle {
        JointHandle(self.impulse_joints.insert(a.0, b.0, joint.to_rapier(), true))
    }

    /// Create a rotary-limit joint between two bodies
    pub fn create_rotary_limit(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        limit: RotaryLimit,
    ) -> JointHandle {
        JointHandle(self.impulse_joints.insert(a.0, b.0, limit.to_rapier(), true))
    }

    /// Create a damped-spring joint between two bodies
    pub fn create_spring(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        spring: DampedSpring,
    ) -> JointHandle {
        JointHandle(self.impulse_joints.insert(a.0, b.0, spring.to_rapier(), true))
    }

    /// Remove a joint
    pub fn remove_joint(&mut self, handle: JointHandle) {
        self.impulse_joints.remove(handle.0, true);
    }

    // ==================== Simulation ====================

    /// Step the physics simulation with fixed timestep
    pub fn step(&mut self, delta_time: f32) {
        self.accumulated_time += delta_time;

        let mut steps = 0;
        while self.accumulated_time >= self.config.timestep && steps < self.config.max_substeps {
            self.step_internal();
            self.accumulated_time -= self.config.timestep;
            steps += 1;
        }

        // Update query pipeline after stepping
        self.query_pipeline.update(&self.colliders);
    }

    /// Manually sync the query pipeline with current colliders.
    /// Call this after adding colliders if you need to query before the first step().
    pub fn sync_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    /// Internal fixed timestep
    fn step_internal(&mut self) {
        // Clear previous events
        self.events.clear();

        let (collision_send, collision_recv) = crossbeam_channel::unbounded();
        let event_handler = ChannelEventCollector {
            collision_events: collision_send,
        };

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &self.hooks,
            &event_handler,
        );

        while let Ok(event) = collision_recv.try_recv() {
            let (h1, h2, started) = match event {
                rapier::CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                rapier::CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            self.events.collision_events.push(CollisionEvent {
                collider1: ColliderHandle(h1),
                collider2: ColliderHandle(h2),
                event_type: if started {
                    CollisionEventType::Started
                } else {
                    CollisionEventType::Stopped
                },
            });
        }
    }

    // ==================== Queries ====================

    /// Get a query interface for spatial queries
    pub fn query(&self) -> PhysicsQuery<'_> {
        PhysicsQuery {
            query_pipeline: &self.query_pipeline,
            colliders: &self.colliders,
            bodies: &self.bodies,
        }
    }

    /// Whether the narrow phase holds an active contact between two colliders
    pub fn contact_active(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.narrow_phase
            .contact_pair(a.0, b.0)
            .map(|pair| pair.has_any_active_contact)
            .unwrap_or(false)
    }

    // ==================== Events ====================

    /// Get collision events from the last step
    pub fn collision_events(&self) -> &[CollisionEvent] {
        &self.events.collision_events
    }

    /// Get collision start events from the last step
    pub fn collision_started(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.events.started_collisions()
    }

    // ==================== Debug ====================

    /// Get number of rigid bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Get number of joints
    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    /// Get number of active (awake) bodies
    pub fn active_body_count(&self) -> usize {
        self.islands.active_dynamic_bodies().len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

/// Channel-based event collector for Rapier
struct ChannelEventCollector {
    collision_events: crossbeam_channel::Sender<rapier::CollisionEvent>,
}

impl rapier::EventHandler for ChannelEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        event: rapier::CollisionEvent,
        _contact_pair: Option<&rapier::ContactPair>,
    ) {
        let _ = self.collision_events.send(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        _contact_pair: &rapier::ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::ColliderShape;
    use crate::filter::CollisionFilter;

    fn test_world() -> PhysicsWorld {
        PhysicsWorld::new(PhysicsConfig::default())
    }

    #[test]
    fn test_create_world() {
        let world = test_world();
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn test_gravity_fall() {
        let mut world = test_world();

        let body = world.create_body(BodyDesc::dynamic().with_position(0.0, 10.0));
        world.create_collider(ColliderDesc::new(ColliderShape::circle(1.0)), body);

        let initial_y = world.body_position(body).unwrap()[1];

        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }

        let final_y = world.body_position(body).unwrap()[1];
        assert!(final_y < initial_y, "Body should fall due to gravity");
    }

    #[test]
    fn test_kinematic_reposition() {
        let mut world = test_world();
        let body = world.create_body(BodyDesc::kinematic().with_position(0.0, 0.0));

        world.set_body_position(body, 3.0, 4.0).unwrap();
        let pos = world.body_position(body).unwrap();
        assert_eq!(pos, [3.0, 4.0]);

        // A kinematic body ignores gravity
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        let pos = world.body_position(body).unwrap();
        assert!((pos[1] - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_local_world_round_trip() {
        let mut world = test_world();
        let body = world.create_body(BodyDesc::dynamic().with_position(5.0, -2.0));

        let local = world.world_to_local(body, [6.0, -1.0]).unwrap();
        assert!((local[0] - 1.0).abs() < 1e-5);
        assert!((local[1] - 1.0).abs() < 1e-5);

        let world_pt = world.local_to_world(body, local).unwrap();
        assert!((world_pt[0] - 6.0).abs() < 1e-5);
        assert!((world_pt[1] - -1.0).abs() < 1e-5);
    }

    #[test]
    fn test_missing_body_errors() {
        let mut world = test_world();
        let body = world.create_body(BodyDesc::dynamic());
        world.remove_body(body);

        assert!(world.body_position(body).is_err());
        assert!(!world.is_dynamic(body));
    }

    #[test]
    fn test_same_group_never_contacts() {
        let mut world = test_world();
        let filter = CollisionFilter::new(0b1, u32::MAX).with_group(1);

        // Two overlapping dynamic circles in the same group
        let a = world.create_body(BodyDesc::dynamic().with_position(0.0, 0.0));
        let ca = world.create_collider(
            ColliderDesc::new(ColliderShape::circle(1.0)).with_filter(filter),
            a,
        );
        let b = world.create_body(BodyDesc::dynamic().with_position(0.5, 0.0));
        let cb = world.create_collider(
            ColliderDesc::new(ColliderShape::circle(1.0)).with_filter(filter),
            b,
        );

        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }

        assert!(!world.contact_active(ca, cb));
        assert!(!world.collision_events().iter().any(|e| e.involves(ca)));
    }

    #[test]
    fn test_different_groups_do_contact() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default().with_gravity(0.0, 0.0));
        let a = world.create_body(BodyDesc::dynamic().with_position(0.0, 0.0));
        let ca = world.create_collider(
            ColliderDesc::new(ColliderShape::circle(1.0))
                .with_filter(CollisionFilter::new(0b1, u32::MAX).with_group(1)),
            a,
        );
        let b = world.create_body(BodyDesc::dynamic().with_position(0.5, 0.0));
        let cb = world.create_collider(
            ColliderDesc::new(ColliderShape::circle(1.0))
                .with_filter(CollisionFilter::new(0b1, u32::MAX).with_group(2)),
            b,
        );

        world.step(1.0 / 60.0);

        assert!(world.contact_active(ca, cb));
    }

    #[test]
    fn test_spring_pulls_body_toward_anchor() {
        use crate::joint::DampedSpring;

        let mut world = PhysicsWorld::new(PhysicsConfig::default().with_gravity(0.0, 0.0));
        let anchor = world.create_body(BodyDesc::kinematic().with_position(10.0, 0.0));
        let ball = world.create_body(
            BodyDesc::dynamic()
                .with_position(0.0, 0.0)
                .with_mass_properties(1.0, 0.5),
        );
        world.create_collider(ColliderDesc::new(ColliderShape::circle(0.5)), ball);

        world.create_spring(
            anchor,
            ball,
            DampedSpring::new([0.0, 0.0], [0.0, 0.0], 0.0, 200.0, 30.0),
        );

        let initial = world.body_position(ball).unwrap();
        for _ in 0..120 {
            world.step(1.0 / 60.0);
        }
        let settled = world.body_position(ball).unwrap();

        let d0 = (10.0 - initial[0]).abs();
        let d1 = (10.0 - settled[0]).abs();
        assert!(d1 < d0 * 0.5, "spring should pull the ball toward the anchor");
    }

    #[test]
    fn test_pivot_keeps_anchors_coincident() {
        use crate::joint::PivotJoint;

        let mut world = test_world();
        let a = world.create_body(BodyDesc::fixed().with_position(0.0, 0.0));
        let b = world.create_body(
            BodyDesc::dynamic()
                .with_position(0.0, -2.0)
                .with_mass_properties(1.0, 0.5),
        );
        world.create_collider(ColliderDesc::new(ColliderShape::circle(0.2)), b);

        // Hang b from a like a pendulum bob
        world.create_pivot(a, b, PivotJoint::new([0.0, 0.0], [0.0, 2.0]));

        for _ in 0..120 {
            world.step(1.0 / 60.0);
        }

        let anchor_world = world.local_to_world(b, [0.0, 2.0]).unwrap();
        assert!(anchor_world[0].abs() < 0.1);
        assert!(anchor_world[1].abs() < 0.1);
    }

    #[test]
    fn test_rotary_limit_bounds_relative_angle() {
        use crate::joint::{PivotJoint, RotaryLimit};

        let mut world = test_world();
        let a = world.create_body(BodyDesc::fixed().with_position(0.0, 0.0));
        // Off-axis start so gravity applies torque about the pivot
        let b = world.create_body(
            BodyDesc::dynamic()
                .with_position(2.0, 0.0)
                .with_mass_properties(1.0, 0.5),
        );
        world.create_collider(ColliderDesc::new(ColliderShape::circle(0.2)), b);

        world.create_pivot(a, b, PivotJoint::new([0.0, 0.0], [-2.0, 0.0]));
        let limit = RotaryLimit::new(-0.3, 0.3);
        world.create_rotary_limit(a, b, limit);

        for _ in 0..240 {
            world.step(1.0 / 60.0);
            let angle = world.body_rotation(b).unwrap();
            assert!(
                angle >= limit.min - 0.05 && angle <= limit.max + 0.05,
                "relative angle {} escaped limit [{}, {}]",
                angle,
                limit.min,
                limit.max
            );
        }
    }
}
