//! Particle simulation
//!
//! Kept deterministic for a given seed:
//! - Seeded RNG only
//! - Stable iteration order (by particle index)
//! - Integration always runs before collision resolution
//! - No rendering or platform dependencies

pub mod collision;
pub mod integrate;
pub mod state;
pub mod tick;

pub use collision::{apply_collision, elastic_velocities, resolve};
pub use integrate::step;
pub use state::{Particle, ParticleId, ParticleStore, Rect, Tag};
pub use tick::{FluidSim, FrameScheduler, FrameToken, ManualScheduler, SelectOutcome};
