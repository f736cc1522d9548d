//! Wall-proximity cost field
//!
//! The binary wall mask of an [`ObstacleGrid`] is smoothed with a kernel of
//! radius `avoid_zone_level`; the result is a per-cell wall density in
//! `[0, 1]` that is scaled by `wall_weight` and added to the cost of
//! every step entering the cell.

use nalgebra::DMatrix;

use crate::common::{Cell, Smoothing};
use crate::utils::ObstacleGrid;

/// Per-cell wall penalty, valid for one grid and one pair of
/// `wall_weight` / `avoid_zone_level`
#[derive(Debug, Clone, PartialEq)]
pub struct CostField {
    penalty: DMatrix<f64>,
    wall_weight: f64,
    avoid_zone_level: usize,
}

impl CostField {
    pub fn compute<S: Smoothing + ?Sized>(
        grid: &ObstacleGrid,
        wall_weight: f64,
        avoid_zone_level: usize,
        smoothing: &S,
    ) -> Self {
        // Weight zero disables avoidance; skip the blur entirely.
        let penalty = if wall_weight == 0.0 {
            DMatrix::zeros(grid.rows(), grid.cols())
        } else {
            let radius = Self::effective_radius(grid, avoid_zone_level);
            smoothing.blur(&grid.wall_mask(), radius) * wall_weight
        };

        CostField { penalty, wall_weight, avoid_zone_level }
    }

    /// Blur radius actually applied: `avoid_zone_level` capped at the
    /// larger grid dimension
    pub fn effective_radius(grid: &ObstacleGrid, avoid_zone_level: usize) -> usize {
        let cap = grid.rows().max(grid.cols());
        if avoid_zone_level > cap {
            log::debug!(
                "avoid zone {} exceeds the {}x{} map, using {}",
                avoid_zone_level,
                grid.cols(),
                grid.rows(),
                cap
            );
        }
        avoid_zone_level.min(cap)
    }

    /// Scaled penalty for entering `cell`, `0.0` off the grid
    pub fn penalty(&self, cell: Cell) -> f64 {
        if cell.x < 0 || cell.y < 0 {
            return 0.0;
        }
        self.penalty
            .get((cell.y as usize, cell.x as usize))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn wall_weight(&self) -> f64 {
        self.wall_weight
    }

    pub fn avoid_zone_level(&self) -> usize {
        self.avoid_zone_level
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.penalty
    }

    pub fn max_penalty(&self) -> f64 {
        self.penalty.iter().cloned().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{BoxBlur, GaussianBlur};
    use approx::assert_relative_eq;

    fn corridor() -> ObstacleGrid {
        ObstacleGrid::from_ascii(
            "
            #######
            .......
            .......
            .......
            #######
            ",
        )
        .unwrap()
    }

    #[test]
    fn test_zero_weight_disables_avoidance() {
        let grid = corridor();
        for level in [0, 1, 5, 20] {
            let field = CostField::compute(&grid, 0.0, level, &GaussianBlur);
            assert!(grid.cells().all(|c| field.penalty(c) == 0.0));
        }
    }

    #[test]
    fn test_penalty_scales_with_weight() {
        let grid = corridor();
        let one = CostField::compute(&grid, 1.0, 1, &GaussianBlur);
        let ten = CostField::compute(&grid, 10.0, 1, &GaussianBlur);
        for cell in grid.cells() {
            assert_relative_eq!(ten.penalty(cell), 10.0 * one.penalty(cell), epsilon = 1e-12);
        }
        assert_eq!(ten.wall_weight(), 10.0);
        assert_eq!(ten.avoid_zone_level(), 1);
    }

    #[test]
    fn test_corridor_centre_is_cheapest() {
        let grid = corridor();
        let field = CostField::compute(&grid, 10.0, 1, &BoxBlur);
        let edge = field.penalty(Cell::new(3, 1));
        let centre = field.penalty(Cell::new(3, 2));
        assert!(edge > centre);
        assert_relative_eq!(edge, 10.0 / 3.0, epsilon = 1e-12);
        assert_eq!(centre, 0.0);
        assert!(field.max_penalty() <= 10.0 + 1e-12);
    }

    #[test]
    fn test_radius_is_capped_at_grid_size() {
        let grid = corridor();
        assert_eq!(CostField::effective_radius(&grid, 3), 3);
        assert_eq!(CostField::effective_radius(&grid, 7), 7);
        assert_eq!(CostField::effective_radius(&grid, 8), 7);

        let huge = CostField::compute(&grid, 1.0, usize::MAX / 2 + 1, &GaussianBlur);
        let capped = CostField::compute(&grid, 1.0, 7, &GaussianBlur);
        assert_eq!(huge.as_matrix(), capped.as_matrix());
        assert_eq!(huge.avoid_zone_level(), usize::MAX / 2 + 1);
    }

    #[test]
    fn test_penalty_off_grid_is_zero() {
        let field = CostField::compute(&corridor(), 10.0, 2, &GaussianBlur);
        assert_eq!(field.penalty(Cell::new(-1, 0)), 0.0);
        assert_eq!(field.penalty(Cell::new(0, 99)), 0.0);
    }
}
