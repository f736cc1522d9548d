//! Common types used throughout gridnav

use serde::{Deserialize, Serialize};
use std::fmt;

/// One grid position. `x` is the column, `y` is the row, origin at the
/// upper-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Straight-line distance between two cell centres
    pub fn distance(&self, other: &Cell) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Cell {
        Cell::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Cell {
    fn from(tuple: (i32, i32)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Occupancy of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Free,
    Wall,
}

impl CellKind {
    pub fn is_wall(self) -> bool {
        self == CellKind::Wall
    }
}

impl Default for CellKind {
    fn default() -> Self {
        CellKind::Free
    }
}

/// Index into the neighbor slot table of a [`Connectivity`].
///
/// The code names the slot through which a cell was entered, so
/// `previous + offset(code)` is the cell itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirectionCode(pub u8);

impl DirectionCode {
    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10)
            .filter(|&d| d < 8)
            .map(|d| DirectionCode(d as u8))
    }
}

impl fmt::Display for DirectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Eight-connected slot offsets, row by row around the centre cell:
///
/// ```text
///  [0] [1] [2]
///  [3] [p] [4]
///  [5] [6] [7]
/// ```
pub const DIAGONAL_DIR_X: [i32; 8] = [-1, 0, 1, -1, 1, -1, 0, 1];
pub const DIAGONAL_DIR_Y: [i32; 8] = [-1, -1, -1, 0, 0, 1, 1, 1];

/// Four-connected slot offsets, counter-clockwise from east:
///
/// ```text
///      [3]
///  [2] [p] [0]
///      [1]
/// ```
pub const NON_DIAGONAL_DIR_X: [i32; 4] = [1, 0, -1, 0];
pub const NON_DIAGONAL_DIR_Y: [i32; 4] = [0, 1, 0, -1];

/// Neighborhood used for expansion and for decoding direction strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    Four,
    Eight,
}

impl Connectivity {
    pub fn from_diagonal(diagonal: bool) -> Self {
        if diagonal {
            Connectivity::Eight
        } else {
            Connectivity::Four
        }
    }

    pub fn is_diagonal(self) -> bool {
        self == Connectivity::Eight
    }

    /// Number of neighbor slots
    pub fn slots(self) -> usize {
        match self {
            Connectivity::Four => 4,
            Connectivity::Eight => 8,
        }
    }

    /// `(dx, dy)` for a direction code, `None` if the code is outside the table
    pub fn offset(self, code: DirectionCode) -> Option<(i32, i32)> {
        let i = code.0 as usize;
        match self {
            Connectivity::Four if i < 4 => Some((NON_DIAGONAL_DIR_X[i], NON_DIAGONAL_DIR_Y[i])),
            Connectivity::Eight if i < 8 => Some((DIAGONAL_DIR_X[i], DIAGONAL_DIR_Y[i])),
            _ => None,
        }
    }

    /// True for the corner slots 0, 2, 5 and 7 of the eight-connected table
    pub fn is_diagonal_step(self, code: DirectionCode) -> bool {
        matches!(self.offset(code), Some((dx, dy)) if dx != 0 && dy != 0)
    }

    /// Walk a direction string from `start`, returning every visited cell
    /// including `start`. Returns `None` on a character that is not a code
    /// of this table.
    pub fn replay(self, start: Cell, directions: &str) -> Option<Vec<Cell>> {
        let mut cells = Vec::with_capacity(directions.len() + 1);
        let mut current = start;
        cells.push(current);
        for c in directions.chars() {
            let (dx, dy) = DirectionCode::from_char(c).and_then(|code| self.offset(code))?;
            current = current.offset(dx, dy);
            cells.push(current);
        }
        Some(cells)
    }
}

/// Transient search record.
///
/// Two nodes are equal iff their cells are equal; scores take no part in
/// equality, which is used for open/closed membership only.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub cell: Cell,
    /// Slot this node was entered through, `None` for the start node
    pub dir: Option<DirectionCode>,
    /// Accumulated path cost including wall penalties
    pub g_score: f64,
    /// `g_score` plus the scaled heuristic estimate
    pub f_score: f64,
}

impl Node {
    pub fn new(cell: Cell, dir: Option<DirectionCode>, g_score: f64) -> Self {
        Self { cell, dir, g_score, f_score: g_score }
    }

    pub fn with_f_score(mut self, f_score: f64) -> Self {
        self.f_score = f_score;
        self
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl Eq for Node {}
