//! Common traits defining the seams of the pathfinding engine

use nalgebra::DMatrix;

use crate::common::error::GridError;
use crate::common::types::{Cell, Node};
use crate::utils::ObstacleGrid;

/// Smoothing operator used to turn the binary wall mask into a continuous
/// wall-proximity field
pub trait Smoothing {
    /// Blur `mask` with a kernel of `2 * radius + 1` cells. The result has
    /// the same shape as `mask`; radius `0` must return the mask unchanged.
    fn blur(&self, mask: &DMatrix<f64>, radius: usize) -> DMatrix<f64>;
}

/// Producer of obstacle grids (raster loaders, text maps, generators)
pub trait GridSource {
    fn load(&self) -> Result<ObstacleGrid, GridError>;
}

/// Open set ordered by ascending `f_score`.
///
/// Ties are broken by insertion order: of two entries with equal
/// `f_score`, the one pushed first is popped first. A reprioritized entry
/// counts as freshly inserted.
pub trait Frontier {
    /// Insert a node that is not yet in the frontier
    fn push(&mut self, node: Node);

    /// Remove and return the node with the lowest `f_score`
    fn pop(&mut self) -> Option<Node>;

    fn peek(&self) -> Option<&Node>;

    /// Replace the entry for `node.cell` with `node`.
    ///
    /// If no entry for the cell exists the node is inserted.
    fn reprioritize(&mut self, node: Node);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, cell: Cell) -> bool;
}
