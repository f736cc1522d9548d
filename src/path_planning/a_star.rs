//! Weighted A* pathfinding with wall avoidance
//!
//! The engine owns an obstacle grid, its endpoints and a
//! [`PathfindingConfig`]. Every mutator returns the engine to the dirty
//! state; [`Pathfinder::compute_path`] then refreshes the wall cost field
//! if needed, runs a best-first search and caches the resulting
//! [`PathSolution`] until the next mutation.
//!
//! Step costs are 1 for orthogonal and `sqrt(2)` for diagonal moves, plus
//! `wall_weight` times the smoothed wall density of the entered cell. The
//! heuristic is the Euclidean distance to the destination scaled by
//! `astar_weight`: 0 gives Dijkstra's algorithm, weights above 1 trade
//! optimality for fewer expansions.

use std::fmt;

use nalgebra::DMatrix;

use crate::common::{Cell, Connectivity, Frontier, Node, PathError, Smoothing};
use crate::mapping::{CostField, GaussianBlur};
use crate::path_planning::config::{sanitize_weight, PathfindingConfig};
use crate::path_planning::frontier::{DualQueueFrontier, FrontierKind, IndexedFrontier};
use crate::path_planning::neighbors::NeighborModel;
use crate::path_planning::reconstruction::{reconstruct, PathSolution, PredecessorMap};
use crate::utils::{ObstacleGrid, PathOverlay};

/// Successful result of [`Pathfinder::compute_path`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A path was computed by this call
    Computed,
    /// Nothing changed since the last successful computation
    AlreadyCalculated,
}

/// Flat status code covering both outcomes and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    NoError,
    NoMap,
    StartIsWall,
    DestIsWall,
    NoPath,
    AlreadyCalculated,
    IterationLimit,
}

impl From<Outcome> for PathStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Computed => PathStatus::NoError,
            Outcome::AlreadyCalculated => PathStatus::AlreadyCalculated,
        }
    }
}

impl From<PathError> for PathStatus {
    fn from(err: PathError) -> Self {
        match err {
            PathError::NoMap => PathStatus::NoMap,
            PathError::StartIsWall => PathStatus::StartIsWall,
            PathError::DestIsWall => PathStatus::DestIsWall,
            PathError::NoPath => PathStatus::NoPath,
            PathError::IterationLimit { .. } => PathStatus::IterationLimit,
        }
    }
}

impl From<Result<Outcome, PathError>> for PathStatus {
    fn from(result: Result<Outcome, PathError>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(err) => err.into(),
        }
    }
}

/// Lifecycle of the cached result
#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    /// Configuration changed since the last computation
    Dirty,
    /// Last computation succeeded
    Solved(PathSolution),
    /// Last computation failed; the error is returned again until a mutation
    Failed(PathError),
}

/// Grid pathfinder
pub struct Pathfinder {
    config: PathfindingConfig,
    grid: Option<ObstacleGrid>,
    cost_field: Option<CostField>,
    smoothing: Box<dyn Smoothing + Send + Sync>,
    start: Cell,
    destination: Cell,
    state: EngineState,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pathfinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pathfinder")
            .field("config", &self.config)
            .field("grid", &self.grid.as_ref().map(|g| (g.rows(), g.cols())))
            .field("start", &self.start)
            .field("destination", &self.destination)
            .field("calculated", &self.is_calculated())
            .finish_non_exhaustive()
    }
}

impl Pathfinder {
    /// Engine with default configuration and no map
    pub fn new() -> Self {
        Self::with_config(PathfindingConfig::default())
    }

    pub fn with_config(config: PathfindingConfig) -> Self {
        Pathfinder {
            config: config.sanitized(),
            grid: None,
            cost_field: None,
            smoothing: Box::new(GaussianBlur),
            start: Cell::origin(),
            destination: Cell::origin(),
            state: EngineState::Dirty,
        }
    }

    pub fn with_map(grid: ObstacleGrid, diagonal: bool) -> Self {
        let mut pathfinder = Self::new();
        pathfinder.set_map(grid);
        pathfinder.set_diagonal(diagonal);
        pathfinder
    }

    /// Replace the smoothing operator used to build the cost field
    pub fn with_smoothing<S: Smoothing + Send + Sync + 'static>(mut self, smoothing: S) -> Self {
        self.set_smoothing(smoothing);
        self
    }

    // --- configuration -------------------------------------------------

    /// Replace the obstacle grid. Endpoints that lie outside the new grid
    /// are reset to the origin.
    pub fn set_map(&mut self, grid: ObstacleGrid) {
        for endpoint in [&mut self.start, &mut self.destination] {
            if !grid.on_grid(endpoint.x, endpoint.y) {
                log::warn!(
                    "endpoint {} is outside the new {}x{} map, resetting",
                    endpoint,
                    grid.cols(),
                    grid.rows()
                );
                *endpoint = Cell::origin();
            }
        }
        self.grid = Some(grid);
        self.cost_field = None;
        self.invalidate();
    }

    /// 0 means Dijkstra's algorithm; positive values steer the search
    /// towards the destination
    pub fn set_astar_weight(&mut self, weight: f64) {
        self.config.astar_weight = sanitize_weight("astar_weight", weight);
        self.invalidate();
    }

    pub fn set_diagonal(&mut self, diagonal: bool) {
        self.config.diagonal = diagonal;
        self.invalidate();
    }

    /// Set how strongly walls push the route away. `avoid_zone_level` is
    /// the blur radius; `None` keeps the current radius. A weight of 0
    /// disables avoidance.
    pub fn set_wall_weight(&mut self, weight: f64, avoid_zone_level: Option<usize>) {
        self.config.wall_weight = sanitize_weight("wall_weight", weight);
        if let Some(level) = avoid_zone_level {
            self.config.avoid_zone_level = level;
        }
        self.cost_field = None;
        self.invalidate();
    }

    pub fn set_smoothing<S: Smoothing + Send + Sync + 'static>(&mut self, smoothing: S) {
        self.smoothing = Box::new(smoothing);
        self.cost_field = None;
        self.invalidate();
    }

    pub fn set_frontier(&mut self, frontier: FrontierKind) {
        self.config.frontier = frontier;
        self.invalidate();
    }

    pub fn set_max_iterations(&mut self, max_iterations: Option<usize>) {
        self.config.max_iterations = max_iterations;
        self.invalidate();
    }

    /// Replace the whole configuration
    pub fn set_config(&mut self, config: PathfindingConfig) {
        self.config = config.sanitized();
        self.cost_field = None;
        self.invalidate();
    }

    /// Returns false, leaving the engine untouched, when no map is set or
    /// `(x, y)` is off the map
    pub fn set_start(&mut self, x: i32, y: i32) -> bool {
        match self.accept_endpoint("start", x, y) {
            Some(cell) => {
                self.start = cell;
                self.invalidate();
                true
            }
            None => false,
        }
    }

    /// Returns false, leaving the engine untouched, when no map is set or
    /// `(x, y)` is off the map
    pub fn set_destination(&mut self, x: i32, y: i32) -> bool {
        match self.accept_endpoint("destination", x, y) {
            Some(cell) => {
                self.destination = cell;
                self.invalidate();
                true
            }
            None => false,
        }
    }

    fn accept_endpoint(&self, name: &str, x: i32, y: i32) -> Option<Cell> {
        match &self.grid {
            Some(grid) if grid.on_grid(x, y) => Some(Cell::new(x, y)),
            Some(_) => {
                log::warn!("ignoring {} ({}, {}): off the map", name, x, y);
                None
            }
            None => {
                log::warn!("ignoring {} ({}, {}): no map set", name, x, y);
                None
            }
        }
    }

    fn invalidate(&mut self) {
        self.state = EngineState::Dirty;
    }

    // --- computation ---------------------------------------------------

    /// Rebuild the wall cost field if the map or the wall settings changed
    pub fn refresh_cost_field(&mut self) -> Option<&CostField> {
        let grid = self.grid.as_ref()?;
        if self.cost_field.is_none() {
            log::debug!(
                "building cost field: weight {}, avoid zone {}",
                self.config.wall_weight,
                self.config.avoid_zone_level
            );
            self.cost_field = Some(CostField::compute(
                grid,
                self.config.wall_weight,
                self.config.avoid_zone_level,
                self.smoothing.as_ref(),
            ));
        }
        self.cost_field.as_ref()
    }

    /// Compute a path from start to destination.
    ///
    /// Runs to completion before returning. A second call without an
    /// intervening mutation returns the cached outcome: `AlreadyCalculated`
    /// after success, the same error after failure.
    pub fn compute_path(&mut self) -> Result<Outcome, PathError> {
        match &self.state {
            EngineState::Solved(_) => return Ok(Outcome::AlreadyCalculated),
            EngineState::Failed(err) => return Err(*err),
            EngineState::Dirty => {}
        }

        match self.run() {
            Ok(solution) => {
                self.state = EngineState::Solved(solution);
                Ok(Outcome::Computed)
            }
            Err(err) => {
                log::debug!("path computation failed: {}", err);
                self.state = EngineState::Failed(err);
                Err(err)
            }
        }
    }

    fn run(&mut self) -> Result<PathSolution, PathError> {
        self.refresh_cost_field().ok_or(PathError::NoMap)?;
        let (grid, costs) = match (&self.grid, &self.cost_field) {
            (Some(grid), Some(costs)) => (grid, costs),
            _ => return Err(PathError::NoMap),
        };

        if grid.is_wall(self.start) {
            return Err(PathError::StartIsWall);
        }
        if grid.is_wall(self.destination) {
            return Err(PathError::DestIsWall);
        }

        log::debug!("computing path {} -> {}", self.start, self.destination);
        let search = Search {
            grid,
            costs,
            model: NeighborModel::from_diagonal(self.config.diagonal),
            destination: self.destination,
            astar_weight: self.config.astar_weight,
            max_iterations: self.config.max_iterations,
        };
        match self.config.frontier {
            FrontierKind::DualQueue => search.run(DualQueueFrontier::new(), self.start),
            FrontierKind::Indexed => search.run(IndexedFrontier::new(), self.start),
        }
    }

    // --- queries -------------------------------------------------------

    /// True only between a successful computation and the next mutation
    pub fn is_calculated(&self) -> bool {
        matches!(self.state, EngineState::Solved(_))
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn solution(&self) -> Option<&PathSolution> {
        match &self.state {
            EngineState::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    /// Marked grid, `None` unless solved
    pub fn path_overlay(&self) -> Option<&PathOverlay> {
        self.solution().map(PathSolution::overlay)
    }

    /// Direction codes of the path, empty unless solved
    pub fn directions(&self) -> &str {
        self.solution().map_or("", PathSolution::directions)
    }

    pub fn path_cells(&self) -> &[Cell] {
        self.solution().map(PathSolution::cells).unwrap_or_default()
    }

    pub fn path_cost(&self) -> Option<f64> {
        self.solution().map(PathSolution::cost)
    }

    pub fn config(&self) -> &PathfindingConfig {
        &self.config
    }

    pub fn connectivity(&self) -> Connectivity {
        self.config.connectivity()
    }

    pub fn grid(&self) -> Option<&ObstacleGrid> {
        self.grid.as_ref()
    }

    pub fn cost_field(&self) -> Option<&CostField> {
        self.cost_field.as_ref()
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn destination(&self) -> Cell {
        self.destination
    }
}

/// Borrowed inputs of one search run
struct Search<'a> {
    grid: &'a ObstacleGrid,
    costs: &'a CostField,
    model: NeighborModel,
    destination: Cell,
    astar_weight: f64,
    max_iterations: Option<usize>,
}

fn index(cell: Cell) -> (usize, usize) {
    (cell.y as usize, cell.x as usize)
}

impl Search<'_> {
    fn heuristic(&self, cell: Cell) -> f64 {
        cell.distance(&self.destination) * self.astar_weight
    }

    fn run<F: Frontier>(&self, mut frontier: F, start: Cell) -> Result<PathSolution, PathError> {
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        let mut closed = DMatrix::from_element(rows, cols, false);
        let mut best_g: DMatrix<Option<f64>> = DMatrix::from_element(rows, cols, None);
        let mut came_from = PredecessorMap::new();

        best_g[index(start)] = Some(0.0);
        frontier.push(Node::new(start, None, 0.0).with_f_score(self.heuristic(start)));

        let mut iterations = 0;
        while let Some(current) = frontier.pop() {
            if current.cell == self.destination {
                log::debug!(
                    "found destination after {} expansions, cost {:.3}",
                    iterations,
                    current.g_score
                );
                return Ok(reconstruct(current, came_from, self.grid, self.model.connectivity()));
            }

            if let Some(limit) = self.max_iterations {
                if iterations >= limit {
                    return Err(PathError::IterationLimit { limit });
                }
            }
            iterations += 1;

            closed[index(current.cell)] = true;

            for neighbor in self.model.expand(current, self.grid, self.costs) {
                let i = index(neighbor.cell);
                if closed[i] {
                    continue;
                }
                if self.grid.is_wall(neighbor.cell) {
                    closed[i] = true;
                    continue;
                }

                let known = best_g[i];
                if known.map_or(false, |g| neighbor.g_score >= g) {
                    continue;
                }

                came_from.insert(neighbor.cell, current);
                best_g[i] = Some(neighbor.g_score);
                let node = neighbor.into_node(neighbor.g_score + self.heuristic(neighbor.cell));
                if known.is_some() {
                    frontier.reprioritize(node);
                } else {
                    frontier.push(node);
                }
            }
        }

        log::debug!("frontier exhausted after {} expansions", iterations);
        Err(PathError::NoPath)
    }
}
