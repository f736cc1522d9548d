// Path Planning module

pub mod a_star;
pub mod config;
pub mod frontier;
pub mod neighbors;
pub mod reconstruction;

pub use a_star::*;
pub use config::PathfindingConfig;
pub use frontier::*;
pub use neighbors::*;
pub use reconstruction::*;
