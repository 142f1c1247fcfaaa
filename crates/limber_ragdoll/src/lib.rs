//! Limber Ragdoll - Articulated 2D Figure Core
//!
//! Builds and runs an 11-segment humanoid ragdoll on top of
//! [`limber_physics`]:
//!
//! - [`anatomy`]: segment dimensions, masses and the skeleton builder
//! - [`rig`]: pivot + rotary-limit joint pairs at anatomical anchors
//! - [`filter`]: the category/mask/group collision scheme that keeps
//!   front and back limbs in separate collision planes
//! - [`drag`]: spring-based pointer dragging of pickable segments
//! - [`simulation`]: the input-driven loop tying it all together
//!
//! ```no_run
//! use limber_ragdoll::prelude::*;
//!
//! let mut sim = Simulation::new(SimConfig::default());
//! sim.queue_event(InputEvent::Grab([400.0, 450.0]));
//! while sim.is_running() {
//!     sim.tick(1.0 / 60.0).unwrap();
//!     let _poses = sim.segment_poses().unwrap();
//! }
//! ```

pub mod anatomy;
pub mod drag;
pub mod filter;
pub mod rig;
pub mod segment;
pub mod simulation;

pub mod prelude {
    //! Common imports for ragdoll functionality
    pub use crate::anatomy;
    pub use crate::drag::{DragController, DragState, PICK_RADIUS};
    pub use crate::filter::{SegmentClass, PICK_MASK};
    pub use crate::rig::rig;
    pub use crate::segment::{JointPair, Ragdoll, Segment, SegmentId};
    pub use crate::simulation::{
        InputEvent, SegmentPose, SimConfig, Simulation, WORLD_H, WORLD_W,
    };
    pub use limber_physics::prelude::*;
}

pub use prelude::*;
