// obstacle grid definition

use std::ops::Deref;

use itertools::iproduct;
use nalgebra::DMatrix;
use rand::Rng;

use crate::common::{Cell, CellKind, GridError, GridSource};

/// Glyph for a wall cell in text maps
pub const WALL_GLYPH: char = '#';
/// Glyph for a free cell in text maps
pub const FREE_GLYPH: char = '.';

/// Rasterized obstacle map. Dimensions are fixed at construction; the
/// matrix is indexed `(row, col) == (y, x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleGrid {
    grid: DMatrix<CellKind>,
}

impl ObstacleGrid {
    pub fn new(grid: DMatrix<CellKind>) -> Result<Self, GridError> {
        if grid.nrows() == 0 || grid.ncols() == 0 {
            return Err(GridError::Empty);
        }
        Ok(Self { grid })
    }

    /// All-free grid
    pub fn free(rows: usize, cols: usize) -> Result<Self, GridError> {
        Self::new(DMatrix::from_element(rows, cols, CellKind::Free))
    }

    /// `true` in the mask marks a wall
    pub fn from_mask(mask: &DMatrix<bool>) -> Result<Self, GridError> {
        Self::new(mask.map(|wall| if wall { CellKind::Wall } else { CellKind::Free }))
    }

    /// Build from row-major rows of wall flags
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, GridError> {
        let ncols = rows.first().map_or(0, |r| r.len());
        for (row, r) in rows.iter().enumerate() {
            if r.len() != ncols {
                return Err(GridError::RaggedRow { row, expected: ncols, found: r.len() });
            }
        }
        Self::from_mask(&DMatrix::from_fn(rows.len(), ncols, |r, c| rows[r][c]))
    }

    /// Parse a text map, one line per row: `#` is a wall, `.` is free.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (row, line) in text.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let cells = line
                .chars()
                .enumerate()
                .map(|(col, glyph)| match glyph {
                    WALL_GLYPH => Ok(true),
                    FREE_GLYPH => Ok(false),
                    _ => Err(GridError::UnknownGlyph { glyph, row, col }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
        Self::from_rows(&rows)
    }

    /// Build from a row-major 8-bit luminance raster. Pixels with value `0`
    /// (black) are walls, everything else is free.
    pub fn from_luma(width: usize, height: usize, pixels: &[u8]) -> Result<Self, GridError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(GridError::BufferSize { expected, found: pixels.len() });
        }
        Self::from_mask(&DMatrix::from_fn(height, width, |r, c| pixels[r * width + c] == 0))
    }

    /// Random map where each cell is a wall with probability `wall_density`
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        wall_density: f64,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        let p = wall_density.clamp(0.0, 1.0);
        let mask = DMatrix::from_fn(rows, cols, |_, _| rng.gen_bool(p));
        Self::from_mask(&mask)
    }

    /// Repeat every cell into a `scale x scale` block
    pub fn upscaled(&self, scale: usize) -> Result<Self, GridError> {
        if scale < 1 {
            return Err(GridError::Empty);
        }
        let grid = DMatrix::from_fn(self.nrows() * scale, self.ncols() * scale, |r, c| {
            self.grid[(r / scale, c / scale)]
        });
        Ok(Self { grid })
    }

    pub fn rows(&self) -> usize {
        self.grid.nrows()
    }

    pub fn cols(&self) -> usize {
        self.grid.ncols()
    }

    pub fn on_grid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.cols() && (y as usize) < self.rows()
    }

    /// Off-grid cells are not walls; callers check `on_grid` first
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.kind(cell).map_or(false, CellKind::is_wall)
    }

    pub fn kind(&self, cell: Cell) -> Option<CellKind> {
        if self.on_grid(cell.x, cell.y) {
            Some(self.grid[(cell.y as usize, cell.x as usize)])
        } else {
            None
        }
    }

    pub fn set(&mut self, cell: Cell, kind: CellKind) -> bool {
        if !self.on_grid(cell.x, cell.y) {
            return false;
        }
        self.grid[(cell.y as usize, cell.x as usize)] = kind;
        true
    }

    /// `1.0` on walls, `0.0` on free cells
    pub fn wall_mask(&self) -> DMatrix<f64> {
        self.grid.map(|kind| if kind.is_wall() { 1.0 } else { 0.0 })
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        iproduct!(0..self.rows(), 0..self.cols()).map(|(r, c)| Cell::new(c as i32, r as i32))
    }

    pub fn wall_count(&self) -> usize {
        self.grid.iter().filter(|k| k.is_wall()).count()
    }
}

impl Deref for ObstacleGrid {
    type Target = DMatrix<CellKind>;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

/// Text map source, see [`ObstacleGrid::from_ascii`]
#[derive(Debug, Clone)]
pub struct AsciiMap {
    pub text: String,
}

impl AsciiMap {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl GridSource for AsciiMap {
    fn load(&self) -> Result<ObstacleGrid, GridError> {
        ObstacleGrid::from_ascii(&self.text)
    }
}

/// Decoded 8-bit luminance image, see [`ObstacleGrid::from_luma`]
#[derive(Debug, Clone)]
pub struct LumaRaster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl GridSource for LumaRaster {
    fn load(&self) -> Result<ObstacleGrid, GridError> {
        ObstacleGrid::from_luma(self.width, self.height, &self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_from_ascii() {
        let grid = ObstacleGrid::from_ascii(
            "
            ..#
            .#.
            ",
        )
        .unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert!(grid.is_wall(Cell::new(2, 0)));
        assert!(grid.is_wall(Cell::new(1, 1)));
        assert!(!grid.is_wall(Cell::new(0, 1)));
        assert_eq!(grid.wall_count(), 2);
    }

    #[test]
    fn test_from_ascii_errors() {
        assert_eq!(ObstacleGrid::from_ascii(""), Err(GridError::Empty));
        assert_eq!(
            ObstacleGrid::from_ascii("..\n..."),
            Err(GridError::RaggedRow { row: 1, expected: 2, found: 3 })
        );
        assert_eq!(
            ObstacleGrid::from_ascii(".x"),
            Err(GridError::UnknownGlyph { glyph: 'x', row: 0, col: 1 })
        );
    }

    #[test]
    fn test_on_grid() {
        let grid = ObstacleGrid::free(3, 4).unwrap();
        assert!(grid.on_grid(0, 0));
        assert!(grid.on_grid(3, 2));
        assert!(!grid.on_grid(4, 2));
        assert!(!grid.on_grid(3, 3));
        assert!(!grid.on_grid(-1, 0));
        assert!(!grid.is_wall(Cell::new(-1, 0)));
    }

    #[test]
    fn test_from_luma() {
        let grid = ObstacleGrid::from_luma(2, 2, &[255, 0, 255, 255]).unwrap();
        assert!(grid.is_wall(Cell::new(1, 0)));
        assert_eq!(grid.wall_count(), 1);
        assert_eq!(
            ObstacleGrid::from_luma(2, 2, &[0, 0, 0]),
            Err(GridError::BufferSize { expected: 4, found: 3 })
        );

        let raster = LumaRaster { width: 1, height: 2, pixels: vec![0, 9] };
        assert_eq!(raster.load().unwrap().wall_count(), 1);
    }

    #[test]
    fn test_upscaled() {
        let grid = ObstacleGrid::from_ascii("#.\n..").unwrap();
        let big = grid.upscaled(3).unwrap();
        assert_eq!(big.rows(), 6);
        assert_eq!(big.cols(), 6);
        assert_eq!(big.wall_count(), 9);
        assert!(big.is_wall(Cell::new(2, 2)));
        assert!(!big.is_wall(Cell::new(3, 0)));
        assert!(grid.upscaled(0).is_err());
    }

    #[test]
    fn test_random_density_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let empty = ObstacleGrid::random(5, 6, 0.0, &mut rng).unwrap();
        assert_eq!(empty.wall_count(), 0);
        let full = ObstacleGrid::random(5, 6, 1.0, &mut rng).unwrap();
        assert_eq!(full.wall_count(), 30);
    }

    #[test]
    fn test_cells_row_major() {
        let grid = ObstacleGrid::free(2, 2).unwrap();
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 1)]
        );
    }
}
