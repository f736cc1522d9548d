//! Pathfinding engine configuration

use serde::{Deserialize, Serialize};

use crate::common::Connectivity;
use crate::path_planning::frontier::FrontierKind;

mod defaults {
    pub fn astar_weight() -> f64 {
        0.3
    }

    pub fn wall_weight() -> f64 {
        10.0
    }

    pub fn avoid_zone_level() -> usize {
        5
    }

    pub fn diagonal() -> bool {
        true
    }
}

/// Configuration for the pathfinding engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathfindingConfig {
    /// Heuristic weight: 0 = Dijkstra, larger values steer harder towards
    /// the destination and may give suboptimal paths
    #[serde(default = "defaults::astar_weight")]
    pub astar_weight: f64,

    /// How strongly walls push the route away (0 = disabled)
    #[serde(default = "defaults::wall_weight")]
    pub wall_weight: f64,

    /// Radius of the zone around walls in which `wall_weight` acts
    #[serde(default = "defaults::avoid_zone_level")]
    pub avoid_zone_level: usize,

    /// 8-connected when true, 4-connected otherwise
    #[serde(default = "defaults::diagonal")]
    pub diagonal: bool,

    #[serde(default)]
    pub frontier: FrontierKind,

    /// Maximum node expansions per computation
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            astar_weight: defaults::astar_weight(),
            wall_weight: defaults::wall_weight(),
            avoid_zone_level: defaults::avoid_zone_level(),
            diagonal: defaults::diagonal(),
            frontier: FrontierKind::default(),
            max_iterations: None,
        }
    }
}

impl PathfindingConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let config: PathfindingConfig = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    pub fn connectivity(&self) -> Connectivity {
        Connectivity::from_diagonal(self.diagonal)
    }

    /// Copy with negative or non-finite weights clamped to zero
    pub fn sanitized(mut self) -> Self {
        self.astar_weight = sanitize_weight("astar_weight", self.astar_weight);
        self.wall_weight = sanitize_weight("wall_weight", self.wall_weight);
        self
    }
}

pub(crate) fn sanitize_weight(name: &str, weight: f64) -> f64 {
    if weight.is_finite() && weight >= 0.0 {
        weight
    } else {
        log::warn!("{} = {} is not a finite non-negative number, using 0", name, weight);
        0.0
    }
}
