//! Fluid MST - a confined 2D particle fluid with graph overlays
//!
//! Core modules:
//! - `sim`: Particle store, integrator, pairwise collisions and the frame-driven controller
//! - `graph`: Prim minimum spanning tree, tree path search and path playback
//! - `settings`: Validated simulation configuration
//! - `error`: Crate-wide error type
//!
//! Rendering is left to the host. It reads particle snapshots, MST edges and
//! path frames and draws them however it likes.

pub mod error;
pub mod graph;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use graph::{Edge, PathAnimator, PathFrame, build_mst, shortest_path, total_weight};
pub use settings::{PointRadius, SimConfig};
pub use sim::{
    FluidSim, FrameScheduler, FrameToken, ManualScheduler, Particle, ParticleId, ParticleStore,
    Rect, SelectOutcome, Tag,
};

/// Simulation constants
pub mod consts {
    /// Velocity damping applied once per sub-step
    pub const FRICTION: f64 = 0.999;
    /// Interpolation steps per path segment
    pub const PATH_SEGMENT_STEPS: usize = 100;

    /// Side length of the confinement box
    pub const BOX_SIZE: f64 = 200.0;
    /// Default canvas dimensions
    pub const CANVAS_WIDTH: f64 = 800.0;
    pub const CANVAS_HEIGHT: f64 = 600.0;

    /// Slider defaults
    pub const DEFAULT_PARTICLE_COUNT: usize = 1000;
    pub const DEFAULT_SPEED_SCALE: f64 = 2.0;
    pub const DEFAULT_TIME_STEP_MULTIPLIER: u32 = 1;
}
