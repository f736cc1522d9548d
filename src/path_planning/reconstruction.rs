//! Path reconstruction from predecessor links

use std::collections::HashMap;

use crate::common::{Cell, Connectivity, Node};
use crate::utils::{ObstacleGrid, PathOverlay};

/// Predecessor of every reached cell for one search run.
///
/// [`reconstruct`] drains the entries it follows, so a map yields exactly
/// one path and is consumed in the process.
pub type PredecessorMap = HashMap<Cell, Node>;

/// A computed route
#[derive(Debug, Clone, PartialEq)]
pub struct PathSolution {
    overlay: PathOverlay,
    directions: String,
    cells: Vec<Cell>,
    cost: f64,
    connectivity: Connectivity,
}

impl PathSolution {
    /// Obstacle grid with the path cells marked
    pub fn overlay(&self) -> &PathOverlay {
        &self.overlay
    }

    /// One direction code per step, as ASCII digits
    pub fn directions(&self) -> &str {
        &self.directions
    }

    /// Path cells from start to destination, both included
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Total gScore of the destination, wall penalties included
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn steps(&self) -> usize {
        self.directions.len()
    }

    /// Table the direction codes refer to
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }
}

/// Walk predecessor links back from `goal` until a cell without a
/// predecessor (the start) is reached.
pub fn reconstruct(
    goal: Node,
    mut came_from: PredecessorMap,
    grid: &ObstacleGrid,
    connectivity: Connectivity,
) -> PathSolution {
    let mut overlay = PathOverlay::from_grid(grid);
    let mut cells = Vec::new();
    let mut codes = Vec::new();

    let mut current = goal;
    loop {
        overlay.mark(current.cell);
        cells.push(current.cell);
        let Some(previous) = came_from.remove(&current.cell) else {
            break;
        };
        if let Some(dir) = current.dir {
            codes.push(dir);
        }
        current = previous;
    }

    cells.reverse();
    let directions: String = codes.iter().rev().map(|d| d.as_char()).collect();
    log::debug!(
        "reconstructed {} steps, {} predecessor links unused",
        directions.len(),
        came_from.len()
    );

    PathSolution {
        overlay,
        directions,
        cells,
        cost: goal.g_score,
        connectivity,
    }
}
