//! Neighbor expansion for 4- and 8-connected grids
//!
//! Direction codes follow the tables in [`crate::common::types`]: a code is
//! the slot, relative to the expanded cell, through which the neighbor is
//! entered. Out-of-bounds slots are skipped; walls are left to the caller.

use std::f64::consts::SQRT_2;

use crate::common::{Cell, Connectivity, DirectionCode, Node};
use crate::mapping::CostField;
use crate::utils::ObstacleGrid;

/// Cost of a horizontal or vertical step
pub const ORTHOGONAL_STEP_COST: f64 = 1.0;
/// Cost of a diagonal step: the orthogonal cost plus `sqrt(2) - 1`
pub const DIAGONAL_STEP_COST: f64 = ORTHOGONAL_STEP_COST + (SQRT_2 - 1.0);

/// One candidate produced by expanding a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub cell: Cell,
    pub dir: DirectionCode,
    pub step_cost: f64,
    /// Parent gScore + step cost + wall penalty of `cell`
    pub g_score: f64,
}

impl Neighbor {
    pub fn into_node(self, f_score: f64) -> Node {
        Node::new(self.cell, Some(self.dir), self.g_score).with_f_score(f_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborModel {
    connectivity: Connectivity,
}

impl NeighborModel {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    pub fn from_diagonal(diagonal: bool) -> Self {
        Self::new(Connectivity::from_diagonal(diagonal))
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn step_cost(&self, code: DirectionCode) -> f64 {
        if self.connectivity.is_diagonal_step(code) {
            DIAGONAL_STEP_COST
        } else {
            ORTHOGONAL_STEP_COST
        }
    }

    /// In-bounds neighbors of `node`, in direction-code order
    pub fn expand<'a>(
        &self,
        node: Node,
        grid: &'a ObstacleGrid,
        costs: &'a CostField,
    ) -> impl Iterator<Item = Neighbor> + 'a {
        let model = *self;
        (0..model.connectivity.slots() as u8).filter_map(move |i| {
            let dir = DirectionCode(i);
            let (dx, dy) = model.connectivity.offset(dir)?;
            let cell = node.cell.offset(dx, dy);
            if !grid.on_grid(cell.x, cell.y) {
                return None;
            }
            let step_cost = model.step_cost(dir);
            Some(Neighbor {
                cell,
                dir,
                step_cost,
                g_score: node.g_score + step_cost + costs.penalty(cell),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{BoxBlur, GaussianBlur};
    use approx::assert_relative_eq;

    fn free_field(grid: &ObstacleGrid) -> CostField {
        CostField::compute(grid, 0.0, 0, &GaussianBlur)
    }

    #[test]
    fn test_interior_cell_has_eight_neighbors() {
        let grid = ObstacleGrid::free(5, 5).unwrap();
        let costs = free_field(&grid);
        let model = NeighborModel::from_diagonal(true);
        let centre = Node::new(Cell::new(2, 2), None, 0.0);

        let neighbors: Vec<Neighbor> = model.expand(centre, &grid, &costs).collect();
        assert_eq!(neighbors.len(), 8);
        let expected = [(1, 1), (2, 1), (3, 1), (1, 2), (3, 2), (1, 3), (2, 3), (3, 3)];
        for (i, (n, &(x, y))) in neighbors.iter().zip(expected.iter()).enumerate() {
            assert_eq!(n.dir, DirectionCode(i as u8));
            assert_eq!(n.cell, Cell::new(x, y));
        }
        for n in &neighbors {
            let diagonal = matches!(n.dir.0, 0 | 2 | 5 | 7);
            let expected_cost = if diagonal { DIAGONAL_STEP_COST } else { 1.0 };
            assert_relative_eq!(n.step_cost, expected_cost);
            assert_relative_eq!(n.g_score, expected_cost);
        }
    }

    #[test]
    fn test_interior_cell_has_four_neighbors() {
        let grid = ObstacleGrid::free(5, 5).unwrap();
        let costs = free_field(&grid);
        let model = NeighborModel::from_diagonal(false);
        let centre = Node::new(Cell::new(2, 2), None, 3.0);

        let cells: Vec<(u8, Cell)> = model
            .expand(centre, &grid, &costs)
            .map(|n| (n.dir.0, n.cell))
            .collect();
        assert_eq!(
            cells,
            vec![
                (0, Cell::new(3, 2)),
                (1, Cell::new(2, 3)),
                (2, Cell::new(1, 2)),
                (3, Cell::new(2, 1)),
            ]
        );
        assert!(model.expand(centre, &grid, &costs).all(|n| n.g_score == 4.0));
    }

    #[test]
    fn test_out_of_bounds_slots_are_omitted() {
        let grid = ObstacleGrid::free(3, 3).unwrap();
        let costs = free_field(&grid);
        let corner = Node::new(Cell::origin(), None, 0.0);

        let diagonal: Vec<u8> = NeighborModel::from_diagonal(true)
            .expand(corner, &grid, &costs)
            .map(|n| n.dir.0)
            .collect();
        assert_eq!(diagonal, vec![4, 6, 7]);

        let orthogonal: Vec<u8> = NeighborModel::from_diagonal(false)
            .expand(corner, &grid, &costs)
            .map(|n| n.dir.0)
            .collect();
        assert_eq!(orthogonal, vec![0, 1]);
    }

    #[test]
    fn test_wall_penalty_is_added_for_the_entered_cell() {
        let grid = ObstacleGrid::from_ascii("...\n...\n..#").unwrap();
        let costs = CostField::compute(&grid, 9.0, 1, &BoxBlur);
        let model = NeighborModel::from_diagonal(true);
        let node = Node::new(Cell::origin(), None, 2.0);

        for n in model.expand(node, &grid, &costs) {
            assert_relative_eq!(
                n.g_score,
                2.0 + n.step_cost + costs.penalty(n.cell),
                epsilon = 1e-12
            );
        }
        // (1, 1) sees the wall at (2, 2) in its 3x3 window
        assert_relative_eq!(costs.penalty(Cell::new(1, 1)), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_walls_are_still_reported() {
        let grid = ObstacleGrid::from_ascii(".#\n..").unwrap();
        let costs = free_field(&grid);
        let found = NeighborModel::from_diagonal(false)
            .expand(Node::new(Cell::origin(), None, 0.0), &grid, &costs)
            .any(|n| n.cell == Cell::new(1, 0));
        assert!(found);
    }
}
