//! Turtle walk example
//!
//! Computes a route across an ASCII map, then walks a turtle along the
//! direction codes one step at a time. Run with `RUST_LOG=debug` to see
//! the engine's progress.

use std::thread::sleep;
use std::time::Duration;

use gridnav::common::{GridSource, PathError};
use gridnav::path_planning::{Outcome, Pathfinder};
use gridnav::utils::{glyphs, AsciiMap, PathOverlay};
use gridnav::Cell;

const MAP: &str = "
....................
....####............
....#.......######..
....#............#..
....#....###.....#..
.........#.......#..
.........#..######..
..####...#..........
.....#..............
.....#......#####...
....................
";

fn draw(overlay: &PathOverlay, turtle: Cell) {
    for y in 0..overlay.rows() {
        let row: String = (0..overlay.cols())
            .map(|x| {
                let cell = Cell::new(x as i32, y as i32);
                if cell == turtle {
                    '@'
                } else {
                    overlay.get(cell).map_or(glyphs::FREE, |c| c.glyph())
                }
            })
            .collect();
        println!("{}", row);
    }
    println!();
}

fn run(pathfinder: &mut Pathfinder, label: &str) -> Result<(), PathError> {
    match pathfinder.compute_path()? {
        Outcome::Computed => println!("{}: computed", label),
        Outcome::AlreadyCalculated => println!("{}: unchanged", label),
    }
    println!(
        "{} steps, cost {:.2}, directions {}",
        pathfinder.directions().len(),
        pathfinder.path_cost().unwrap_or_default(),
        pathfinder.directions()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    println!("Turtle walk start!!");

    let grid = match AsciiMap::new(MAP).load() {
        Ok(grid) => grid,
        Err(e) => {
            println!("Could not load map: {}", e);
            return;
        }
    };
    println!("Loaded {}x{} map with {} walls", grid.cols(), grid.rows(), grid.wall_count());

    let mut pathfinder = Pathfinder::with_map(grid, true);
    let (start, goal) = (Cell::from((0, 0)), Cell::from((19, 10)));
    pathfinder.set_start(start.x, start.y);
    pathfinder.set_destination(goal.x, goal.y);

    for (label, weight) in [("no avoidance", 0.0), ("wall weight 10", 10.0)] {
        pathfinder.set_wall_weight(weight, Some(2));
        if let Err(e) = run(&mut pathfinder, label) {
            println!("Planning failed: {}", e);
            return;
        }
        if let Some(field) = pathfinder.cost_field() {
            let near_walls = field.as_matrix().iter().filter(|&&p| p > 0.0).count();
            println!("{} cells near walls, max penalty {:.2}", near_walls, field.max_penalty());
        }
        if let Some(overlay) = pathfinder.path_overlay() {
            println!("{}", overlay);
        }
    }

    // A second compute without changes is a no-op
    if let Err(e) = run(&mut pathfinder, "again") {
        println!("Planning failed: {}", e);
        return;
    }

    let Some(solution) = pathfinder.solution() else {
        return;
    };
    let route = solution.connectivity().replay(pathfinder.start(), solution.directions());
    let Some(route) = route else {
        println!("Direction string could not be replayed");
        return;
    };
    for turtle in route {
        draw(solution.overlay(), turtle);
        sleep(Duration::from_millis(80));
    }

    pathfinder.set_diagonal(false);
    match pathfinder.compute_path() {
        Ok(_) => println!("4-connected route: {}", pathfinder.directions()),
        Err(e) => println!("4-connected planning failed: {}", e),
    }

    println!("Turtle walk finish!!");
}
