//! gridnav - weighted grid pathfinding with wall avoidance
//!
//! This crate computes lowest-cost routes over rasterized obstacle maps,
//! trading path length against proximity to walls, and reports the route
//! as a marked grid and a compact direction-code string.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod mapping;
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Cell, CellKind, Connectivity, DirectionCode};
pub use common::{Frontier, GridSource, Smoothing};
pub use common::{GridError, PathError};
pub use mapping::{BoxBlur, CostField, GaussianBlur};
pub use path_planning::{Outcome, PathSolution, PathStatus, Pathfinder, PathfindingConfig};
pub use utils::{AsciiMap, LumaRaster, ObstacleGrid, PathOverlay};
