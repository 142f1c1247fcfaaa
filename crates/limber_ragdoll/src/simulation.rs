//! Simulation loop glue: input routing, reset lifecycle, tick ordering
//!
//! Per tick: drain queued input events (grab/move/release to the drag
//! controller, reset/quit to the lifecycle), then advance the physics
//! world by the fixed timestep. Rendering is external and reads poses
//! afterwards.

use crate::anatomy;
use crate::drag::DragController;
use crate::filter::SegmentClass;
use crate::rig;
use crate::segment::{Ragdoll, SegmentId};
use limber_physics::{
    BodyDesc, ColliderDesc, ColliderShape, PhysicsConfig, PhysicsWorld, Result,
};
use serde::{Deserialize, Serialize};

/// World width used for the default platform extent
pub const WORLD_W: f32 = 800.0;
/// World height
pub const WORLD_H: f32 = 600.0;

/// Platform surface height
const PLATFORM_Y: f32 = 50.0;
/// Gap between the platform ends and the world edges
const PLATFORM_MARGIN: f32 = 50.0;
/// Platform thickness radius
const PLATFORM_RADIUS: f32 = 5.0;
const PLATFORM_FRICTION: f32 = 1.0;
const PLATFORM_RESTITUTION: f32 = 0.7;

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Physics world configuration
    pub physics: PhysicsConfig,
    /// Where the ragdoll spawns (and respawns when a reset names no
    /// position)
    pub spawn: [f32; 2],
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default()
                .with_gravity(0.0, -900.0)
                .with_timestep(1.0 / 60.0)
                .with_solver_iterations(35),
            spawn: [WORLD_W / 2.0, WORLD_H - 150.0],
        }
    }
}

/// Input events routed through the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed at a world point
    Grab([f32; 2]),
    /// Pointer moved to a world point
    Move([f32; 2]),
    /// Pointer released
    Release,
    /// Tear down the ragdoll and rebuild it, optionally at a new base
    Reset(Option<[f32; 2]>),
    /// Stop the simulation
    Quit,
}

/// Pose of one segment, read out for rendering
#[derive(Debug, Clone, Copy)]
pub struct SegmentPose {
    /// Which segment
    pub id: SegmentId,
    /// World position of the segment center
    pub position: [f32; 2],
    /// World rotation (radians)
    pub rotation: f32,
}

/// The whole interactive scene: world, platform, one ragdoll, drag
pub struct Simulation {
    world: PhysicsWorld,
    ragdoll: Ragdoll,
    drag: DragController,
    spawn: [f32; 2],
    next_group: u32,
    running: bool,
    pending: Vec<InputEvent>,
}

impl Simulation {
    /// Build the scene: platform, first ragdoll (group 1), drag anchor.
    pub fn new(config: SimConfig) -> Self {
        let mut world = PhysicsWorld::new(config.physics.clone());

        // Static platform spanning the world, group 0: no suppression
        let platform = world.create_body(
            BodyDesc::fixed().with_position(WORLD_W / 2.0, PLATFORM_Y),
        );
        world.create_collider(
            ColliderDesc::new(ColliderShape::capsule_x(
                WORLD_W / 2.0 - PLATFORM_MARGIN,
                PLATFORM_RADIUS,
            ))
            .with_friction(PLATFORM_FRICTION)
            .with_restitution(PLATFORM_RESTITUTION)
            .with_filter(SegmentClass::Platform.filter(0)),
            platform,
        );

        let first_group = 1;
        let mut ragdoll = anatomy::build(&mut world, config.spawn, first_group);
        rig::rig(&mut world, &mut ragdoll);

        let drag = DragController::new(&mut world);

        // Allow a grab before the first step
        world.sync_query_pipeline();

        Self {
            world,
            ragdoll,
            drag,
            spawn: config.spawn,
            next_group: first_group + 1,
            running: true,
            pending: Vec::new(),
        }
    }

    /// The physics world (read access for tests and tools)
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// The current ragdoll instance
    pub fn ragdoll(&self) -> &Ragdoll {
        &self.ragdoll
    }

    /// Whether a drag session is live
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Whether the simulation should keep running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Queue an event for the next tick
    pub fn queue_event(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Apply one input event immediately
    pub fn handle_event(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::Grab(point) => self.drag.grab(&mut self.world, point),
            InputEvent::Move(point) => self.drag.move_to(&mut self.world, point),
            InputEvent::Release => {
                self.drag.release(&mut self.world);
                Ok(())
            }
            InputEvent::Reset(base) => {
                self.reset(base);
                Ok(())
            }
            InputEvent::Quit => {
                self.running = false;
                Ok(())
            }
        }
    }

    /// Pointer pressed at a world point
    pub fn on_grab(&mut self, point: [f32; 2]) -> Result<()> {
        self.handle_event(InputEvent::Grab(point))
    }

    /// Pointer moved to a world point
    pub fn on_move(&mut self, point: [f32; 2]) -> Result<()> {
        self.handle_event(InputEvent::Move(point))
    }

    /// Pointer released
    pub fn on_release(&mut self) -> Result<()> {
        self.handle_event(InputEvent::Release)
    }

    /// Destroy the ragdoll and rebuild it with a fresh group id.
    ///
    /// Any live drag session is torn down first: the session holds a
    /// reference into the skeleton about to be destroyed.
    pub fn reset(&mut self, base: Option<[f32; 2]>) {
        self.drag.release(&mut self.world);

        for pair in self.ragdoll.joints() {
            self.world.remove_joint(pair.pivot);
            self.world.remove_joint(pair.limit);
        }
        for segment in self.ragdoll.segments() {
            self.world.remove_body(segment.body);
        }

        let group = self.next_group;
        self.next_group += 1;
        let base = base.unwrap_or(self.spawn);

        let mut ragdoll = anatomy::build(&mut self.world, base, group);
        rig::rig(&mut self.world, &mut ragdoll);
        self.ragdoll = ragdoll;
        self.world.sync_query_pipeline();

        log::info!("reset: new ragdoll group {} at {:?}", group, base);
    }

    /// One tick: drain queued events in arrival order, then advance the
    /// physics world.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        for event in std::mem::take(&mut self.pending) {
            self.handle_event(event)?;
        }
        self.world.step(dt);
        Ok(())
    }

    /// Current pose of every segment, for rendering
    pub fn segment_poses(&self) -> Result<Vec<SegmentPose>> {
        self.ragdoll
            .segments()
            .map(|segment| {
                Ok(SegmentPose {
                    id: segment.id,
                    position: self.world.body_position(segment.body)?,
                    rotation: self.world.body_rotation(segment.body)?,
                })
            })
            .collect()
    }

    /// Grab point and pointer position when a drag session is live
    pub fn drag_overlay(&self) -> Option<([f32; 2], [f32; 2])> {
        self.drag.overlay_line(&self.world)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    // 11 segments + platform + drag anchor
    const EXPECTED_BODIES: usize = SegmentId::COUNT + 2;
    // 11 segment colliders + platform
    const EXPECTED_COLLIDERS: usize = SegmentId::COUNT + 1;
    // 10 pivot + 10 limit
    const EXPECTED_JOINTS: usize = 2 * (SegmentId::COUNT - 1);

    #[test]
    fn test_scene_counts() {
        let sim = Simulation::default();
        assert_eq!(sim.world().body_count(), EXPECTED_BODIES);
        assert_eq!(sim.world().collider_count(), EXPECTED_COLLIDERS);
        assert_eq!(sim.world().joint_count(), EXPECTED_JOINTS);
        assert_eq!(sim.ragdoll().group(), 1);
    }

    #[test]
    fn test_reset_fully_replaces_skeleton() {
        let mut sim = Simulation::default();
        let old_torso = sim.ragdoll().segment(SegmentId::Torso).body;

        sim.reset(Some([200.0, 400.0]));

        // Old instance is gone
        assert!(sim.world().body_position(old_torso).is_err());

        // New instance satisfies the same invariants
        assert_eq!(sim.world().body_count(), EXPECTED_BODIES);
        assert_eq!(sim.world().collider_count(), EXPECTED_COLLIDERS);
        assert_eq!(sim.world().joint_count(), EXPECTED_JOINTS);
        assert_eq!(sim.ragdoll().group(), 2);

        let torso = sim
            .world()
            .body_position(sim.ragdoll().segment(SegmentId::Torso).body)
            .unwrap();
        assert_eq!(torso, [200.0, 400.0]);
    }

    #[test]
    fn test_reset_without_base_reuses_spawn() {
        let mut sim = Simulation::default();
        sim.reset(None);
        let torso = sim
            .world()
            .body_position(sim.ragdoll().segment(SegmentId::Torso).body)
            .unwrap();
        assert_eq!(torso, SimConfig::default().spawn);
    }

    #[test]
    fn test_reset_tears_down_drag_session_first() {
        let mut sim = Simulation::default();
        let spawn = SimConfig::default().spawn;

        sim.on_grab(spawn).unwrap();
        assert!(sim.is_dragging());
        assert_eq!(sim.world().joint_count(), EXPECTED_JOINTS + 1);

        sim.reset(None);
        assert!(!sim.is_dragging());
        assert_eq!(sim.world().joint_count(), EXPECTED_JOINTS);
        assert!(sim.drag_overlay().is_none());
    }

    #[test]
    fn test_grab_release_through_event_queue() {
        let mut sim = Simulation::default();
        let spawn = SimConfig::default().spawn;

        sim.queue_event(InputEvent::Grab(spawn));
        sim.tick(DT).unwrap();
        assert!(sim.is_dragging());
        assert_eq!(sim.world().joint_count(), EXPECTED_JOINTS + 1);
        assert!(sim.drag_overlay().is_some());

        sim.queue_event(InputEvent::Release);
        sim.tick(DT).unwrap();
        assert!(!sim.is_dragging());
        assert_eq!(sim.world().joint_count(), EXPECTED_JOINTS);
    }

    #[test]
    fn test_grab_on_empty_space_is_noop() {
        let mut sim = Simulation::default();
        // Far from the figure and outside the pick radius of anything
        sim.on_grab([10.0, 590.0]).unwrap();
        assert!(!sim.is_dragging());
        assert_eq!(sim.world().joint_count(), EXPECTED_JOINTS);
    }

    #[test]
    fn test_quit_event_stops_running() {
        let mut sim = Simulation::default();
        assert!(sim.is_running());
        sim.queue_event(InputEvent::Quit);
        sim.tick(DT).unwrap();
        assert!(!sim.is_running());
    }

    #[test]
    fn test_figure_falls_and_settles_on_platform() {
        let mut sim = Simulation::default();
        let start_y = sim.segment_poses().unwrap()[0].position[1];

        // Five simulated seconds
        for _ in 0..300 {
            sim.tick(DT).unwrap();
        }

        let poses = sim.segment_poses().unwrap();
        let torso_y = poses
            .iter()
            .find(|p| p.id == SegmentId::Torso)
            .unwrap()
            .position[1];

        assert!(torso_y < start_y, "figure should have fallen");
        for pose in &poses {
            assert!(
                pose.position[1] > 0.0 && pose.position[1] < WORLD_H,
                "{:?} left the world at {:?}",
                pose.id,
                pose.position
            );
        }
    }

    #[test]
    fn test_held_drag_keeps_target_near_pointer() {
        let mut sim = Simulation::default();
        let spawn = SimConfig::default().spawn;
        let hold = [spawn[0], spawn[1] + 30.0];

        sim.on_grab(spawn).unwrap();
        sim.on_move(hold).unwrap();

        let gap = |sim: &Simulation| {
            let (grab, pointer) = sim.drag_overlay().unwrap();
            let dx = grab[0] - pointer[0];
            let dy = grab[1] - pointer[1];
            (dx * dx + dy * dy).sqrt()
        };

        // After the transient settles the gap must not grow
        for _ in 0..60 {
            sim.tick(DT).unwrap();
        }
        let settled = gap(&sim);
        for _ in 0..60 {
            sim.tick(DT).unwrap();
        }
        let later = gap(&sim);

        assert!(later <= settled + 0.5, "gap grew from {} to {}", settled, later);
        assert!(later < 30.0, "spring never pulled the figure toward the pointer");
    }
}
