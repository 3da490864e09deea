//! Graph overlays computed from particle positions
//!
//! These run on demand against a store snapshot and never touch the tick
//! loop.

pub mod animate;
pub mod mst;
pub mod path;

pub use animate::{PathAnimator, PathFrame};
pub use mst::{Edge, build_mst, total_weight};
pub use path::shortest_path;
