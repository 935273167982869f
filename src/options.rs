//! Session configuration.

use serde::{Deserialize, Serialize};
use wave_core::{RngKind, SolverConfig};

/// Options for a `TileMapGenerator`. Every field has a default, so a host
/// config only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Seed for the collapse RNG. `None` draws a fresh one.
    pub seed: Option<i32>,
    /// Which RNG stream the seed feeds.
    pub rng: RngKind,
    /// Cells grown around the origin by `regenerate_map`.
    pub initial_cell_count: usize,
    /// Cells reset by `regenerate_patch` when no count is given.
    pub default_patch_cell_count: usize,
    /// World distance between neighboring cell centers.
    pub tile_offset: f32,
    pub solver: SolverConfig,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            seed: None,
            rng: RngKind::default(),
            initial_cell_count: 100,
            default_patch_cell_count: 50,
            tile_offset: 1.0,
            solver: SolverConfig::default(),
        }
    }
}

impl GeneratorOptions {
    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed = Some(seed);
        self
    }
}
