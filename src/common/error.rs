//! Error types for gridnav

use thiserror::Error;

/// Failure of a `compute_path` call.
///
/// All variants are local and non-fatal: the caller may adjust the map,
/// endpoints or weights and compute again.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// No obstacle grid has been set
    #[error("no map has been set")]
    NoMap,
    /// The start cell is a wall
    #[error("start cell is a wall")]
    StartIsWall,
    /// The destination cell is a wall
    #[error("destination cell is a wall")]
    DestIsWall,
    /// The reachable component of the start does not contain the destination
    #[error("destination is not reachable from start")]
    NoPath,
    /// The configured expansion cap was hit before the destination was reached
    #[error("search stopped after {limit} expansions")]
    IterationLimit { limit: usize },
}

/// Failure to build an obstacle grid
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one row and one column")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown map glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
    #[error("raster buffer holds {found} pixels, expected {expected}")]
    BufferSize { expected: usize, found: usize },
}
