//! Text rendering of obstacle grids and path overlays

use std::fmt;

use nalgebra::DMatrix;

use crate::common::{Cell, CellKind};
use crate::utils::grid_map::{ObstacleGrid, FREE_GLYPH, WALL_GLYPH};

/// Glyph palette for consistent rendering
pub mod glyphs {
    pub const WALL: char = super::WALL_GLYPH;
    pub const FREE: char = super::FREE_GLYPH;
    pub const PATH: char = '*';
}

/// One cell of a path overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayCell {
    Free,
    Wall,
    Path,
}

impl OverlayCell {
    pub fn glyph(self) -> char {
        match self {
            OverlayCell::Free => glyphs::FREE,
            OverlayCell::Wall => glyphs::WALL,
            OverlayCell::Path => glyphs::PATH,
        }
    }
}

impl From<CellKind> for OverlayCell {
    fn from(kind: CellKind) -> Self {
        match kind {
            CellKind::Free => OverlayCell::Free,
            CellKind::Wall => OverlayCell::Wall,
        }
    }
}

/// Copy of the obstacle grid with the cells of a path marked
#[derive(Debug, Clone, PartialEq)]
pub struct PathOverlay {
    cells: DMatrix<OverlayCell>,
}

impl PathOverlay {
    pub fn from_grid(grid: &ObstacleGrid) -> Self {
        Self { cells: grid.map(OverlayCell::from) }
    }

    /// Mark a cell as on the path. Off-grid cells are ignored.
    pub fn mark(&mut self, cell: Cell) {
        if let Some(slot) = self.slot_mut(cell) {
            *slot = OverlayCell::Path;
        }
    }

    pub fn get(&self, cell: Cell) -> Option<OverlayCell> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        self.cells.get((cell.y as usize, cell.x as usize)).copied()
    }

    pub fn is_on_path(&self, cell: Cell) -> bool {
        self.get(cell) == Some(OverlayCell::Path)
    }

    /// Number of marked cells
    pub fn path_len(&self) -> usize {
        self.cells.iter().filter(|&&c| c == OverlayCell::Path).count()
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    pub fn as_matrix(&self) -> &DMatrix<OverlayCell> {
        &self.cells
    }

    fn slot_mut(&mut self, cell: Cell) -> Option<&mut OverlayCell> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        self.cells.get_mut((cell.y as usize, cell.x as usize))
    }
}

impl fmt::Display for PathOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.cells.nrows() {
            let line: String = self.cells.row(r).iter().map(|c| c.glyph()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Display for ObstacleGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&PathOverlay::from_grid(self), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_marks_path() {
        let grid = ObstacleGrid::from_ascii("...\n.#.\n...").unwrap();
        let mut overlay = PathOverlay::from_grid(&grid);
        overlay.mark(Cell::new(0, 0));
        overlay.mark(Cell::new(1, 0));
        overlay.mark(Cell::new(9, 9));
        assert_eq!(overlay.path_len(), 2);
        assert!(overlay.is_on_path(Cell::new(1, 0)));
        assert_eq!(overlay.get(Cell::new(1, 1)), Some(OverlayCell::Wall));
        assert_eq!(overlay.get(Cell::new(-1, 1)), None);
        assert_eq!(format!("{}", overlay), "**.\n.#.\n...\n");
    }

    #[test]
    fn test_grid_display_round_trips_glyphs() {
        let text = "#..\n.#.\n";
        let grid = ObstacleGrid::from_ascii(text).unwrap();
        assert_eq!(format!("{}", grid), text);
    }
}
