//! Interactive drag controller
//!
//! One kinematic anchor body lives for the controller's whole lifetime;
//! a grab attaches a damped spring between it and the picked segment,
//! moves reposition the anchor, release removes the spring. At most one
//! spring exists at any time.

use crate::filter::PICK_MASK;
use limber_physics::{
    BodyDesc, BodyHandle, ColliderHandle, DampedSpring, JointHandle, PhysicsWorld, Result,
};

/// Pick radius around the pointer for the grab query
pub const PICK_RADIUS: f32 = 10.0;

/// Spring rest length (the grab point is pulled onto the pointer)
const REST_LENGTH: f32 = 0.0;
/// Spring stiffness: responsive but not explosive
const STIFFNESS: f32 = 5000.0;
/// Spring damping
const DAMPING: f32 = 150.0;

/// Drag controller state
#[derive(Debug, Clone, Copy)]
pub enum DragState {
    /// No live session
    Idle,
    /// A spring couples the anchor to a grabbed segment
    Dragging {
        /// The grabbed segment's body
        target: BodyHandle,
        /// The grabbed segment's collider
        collider: ColliderHandle,
        /// Grab point in the target's local frame, fixed at grab time
        local_anchor: [f32; 2],
        /// The live spring constraint
        spring: JointHandle,
    },
}

impl DragState {
    /// Whether a session is live
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Spring-based pointer drag over the pickable parts of the scene
pub struct DragController {
    /// The kinematic pointer anchor, created once
    anchor: BodyHandle,
    state: DragState,
}

impl DragController {
    /// Create the controller and its kinematic anchor body
    pub fn new(world: &mut PhysicsWorld) -> Self {
        // No collider is ever attached: the anchor neither collides nor
        // feels gravity.
        let anchor = world.create_body(BodyDesc::kinematic());
        Self {
            anchor,
            state: DragState::Idle,
        }
    }

    /// Current controller state
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether a session is live
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Try to start a drag session at a world point.
    ///
    /// A miss, a hit on a non-dynamic body, or a grab while already
    /// dragging is a no-op.
    pub fn grab(&mut self, world: &mut PhysicsWorld, point: [f32; 2]) -> Result<()> {
        if self.is_dragging() {
            return Ok(());
        }

        let Some(hit) = world.query().nearest_point(point, PICK_RADIUS, PICK_MASK) else {
            return Ok(());
        };
        if !world.is_dynamic(hit.body) {
            return Ok(());
        }

        world.wake_body(hit.body)?;
        let local_anchor = world.world_to_local(hit.body, point)?;
        world.set_body_position(self.anchor, point[0], point[1])?;

        let spring = world.create_spring(
            self.anchor,
            hit.body,
            DampedSpring::new([0.0, 0.0], local_anchor, REST_LENGTH, STIFFNESS, DAMPING),
        );

        log::debug!("drag started at ({}, {})", point[0], point[1]);
        self.state = DragState::Dragging {
            target: hit.body,
            collider: hit.collider,
            local_anchor,
            spring,
        };
        Ok(())
    }

    /// Follow the pointer to a new world point; no-op when idle.
    pub fn move_to(&mut self, world: &mut PhysicsWorld, point: [f32; 2]) -> Result<()> {
        if let DragState::Dragging { target, .. } = self.state {
            world.set_body_position(self.anchor, point[0], point[1])?;
            // Dragging must keep the target from sleeping
            world.wake_body(target)?;
        }
        Ok(())
    }

    /// End the session, removing the spring; no-op when idle.
    pub fn release(&mut self, world: &mut PhysicsWorld) {
        if let DragState::Dragging { spring, .. } =
            std::mem::replace(&mut self.state, DragState::Idle)
        {
            world.remove_joint(spring);
            log::debug!("drag released");
        }
    }

    /// The grabbed point on the target and the pointer anchor position,
    /// both in world space, for render overlays. None when idle.
    pub fn overlay_line(&self, world: &PhysicsWorld) -> Option<([f32; 2], [f32; 2])> {
        let DragState::Dragging {
            target,
            local_anchor,
            ..
        } = self.state
        else {
            return None;
        };
        let grab_point = world.local_to_world(target, local_anchor).ok()?;
        let pointer = world.body_position(self.anchor).ok()?;
        Some((grab_point, pointer))
    }
}
