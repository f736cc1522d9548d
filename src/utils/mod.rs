//! Utility modules for gridnav

pub mod grid_map;
pub mod visualization;

pub use grid_map::*;
pub use visualization::{glyphs, OverlayCell, PathOverlay};
