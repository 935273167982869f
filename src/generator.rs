//! Tile map generator session.
//!
//! Owns one compiled tileset, one wave graph and one RNG, and exposes the
//! growth/solve/reset cycle a host drives, plus map-level helpers for
//! rebuilding and reading out the result.

use crate::options::GeneratorOptions;
use bevy_log::{info, warn};
use bevy_math::Vec3;
use std::fmt;
use wave_core::wfc::{self, Execution, Expansion, ParsedCell, SolverState, WaveGraph};
use wave_core::{
    CellCoordinates, CoordinateError, DirectionTable, Tileset, TilesetDefinition, TilesetError,
    Topology, WaveRng,
};

/// Error type for building or growing a generator.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// Tileset definition rejected
    Tileset(TilesetError),
    /// Offsets or coordinates do not fit the grid
    Coordinates(CoordinateError),
}

impl From<TilesetError> for GeneratorError {
    fn from(e: TilesetError) -> Self {
        GeneratorError::Tileset(e)
    }
}

impl From<CoordinateError> for GeneratorError {
    fn from(e: CoordinateError) -> Self {
        GeneratorError::Coordinates(e)
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::Tileset(e) => write!(f, "tileset error: {}", e),
            GeneratorError::Coordinates(e) => write!(f, "coordinate error: {}", e),
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeneratorError::Tileset(e) => Some(e),
            GeneratorError::Coordinates(e) => Some(e),
        }
    }
}

/// A determined cell, ready to instantiate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub original_index: usize,
    pub rotation_index: usize,
    pub degrees_rotation: f32,
    /// Cell center in world space, scaled by the tile offset.
    pub position: Vec3,
    pub coordinates: CellCoordinates,
}

/// Node counts by cell state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapStatistics {
    pub nodes: usize,
    pub determined: usize,
    pub failed: usize,
    pub undetermined: usize,
}

impl fmt::Display for MapStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes: {} determined, {} failed, {} undetermined",
            self.nodes, self.determined, self.failed, self.undetermined
        )
    }
}

pub struct TileMapGenerator {
    tileset: Tileset,
    graph: WaveGraph,
    rng: Box<dyn WaveRng>,
    options: GeneratorOptions,
    seed: i32,
}

impl TileMapGenerator {
    /// Build a session from a tileset definition and neighbor offsets.
    ///
    /// `offsets[d]` is the step to the neighbor in direction `d`; opposite
    /// directions are paired by negated offsets.
    pub fn new(
        definition: &TilesetDefinition,
        offsets: Vec<CellCoordinates>,
        options: GeneratorOptions,
    ) -> Result<Self, GeneratorError> {
        let directions = DirectionTable::from_offsets(&offsets)?;
        let tileset = Tileset::compile(definition, directions)?;
        let graph = WaveGraph::new(offsets, &tileset)?;
        let seed = options.seed.unwrap_or_else(rand::random);
        let rng = options.rng.build(seed);

        info!(
            "tile map generator: {} tiles, {} variants, {} directions, {:?} seed {}",
            tileset.tile_count(),
            tileset.variant_count(),
            tileset.cardinality(),
            options.rng,
            seed
        );

        Ok(Self {
            tileset,
            graph,
            rng,
            options,
            seed,
        })
    }

    /// Session over the preset offsets of `topology`.
    pub fn for_topology(
        definition: &TilesetDefinition,
        topology: Topology,
        options: GeneratorOptions,
    ) -> Result<Self, GeneratorError> {
        Self::new(definition, topology.neighbor_offsets(), options)
    }

    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    pub fn graph(&self) -> &WaveGraph {
        &self.graph
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Restart the RNG stream from `seed`.
    pub fn reseed(&mut self, seed: i32) {
        self.seed = seed;
        self.rng = self.options.rng.build(seed);
    }

    /// Grow the graph around `seed` by up to `budget` cells.
    pub fn expand(
        &mut self,
        seed: CellCoordinates,
        budget: usize,
        overwrite: bool,
    ) -> Result<Expansion<'_>, GeneratorError> {
        Ok(wfc::expand(
            &mut self.graph,
            &self.tileset,
            seed,
            budget,
            overwrite,
        )?)
    }

    /// Solve from a random start until nothing is left or the round cap.
    pub fn complete_grid(&mut self) -> Execution<'_> {
        self.execution(None)
    }

    /// Solve starting at `start`. Unknown coordinates fall back to a random
    /// start.
    pub fn complete_grid_from(&mut self, start: CellCoordinates) -> Execution<'_> {
        let start = self.graph.get(&start);
        self.execution(start)
    }

    fn execution(&mut self, start: Option<wfc::NodeId>) -> Execution<'_> {
        Execution::new(
            &mut self.graph,
            &self.tileset,
            self.rng.as_mut(),
            self.options.solver,
            start,
        )
    }

    /// Reset up to `max_cells` around `center` and re-derive them from the
    /// surrounding cells.
    pub fn uncollapse_cells(&mut self, center: CellCoordinates, max_cells: usize) -> Vec<ParsedCell> {
        wfc::uncollapse_cells(&mut self.graph, &self.tileset, center, max_cells)
    }

    /// One entry per node, whatever its state.
    pub fn parse_result(&self) -> impl Iterator<Item = ParsedCell> + '_ {
        self.graph.parse_all()
    }

    /// Drop the whole map.
    pub fn clear(&mut self) {
        info!("clearing tile map ({} nodes)", self.graph.len());
        self.graph.clear();
    }

    /// Clear, grow `initial_cell_count` cells around the origin and solve.
    ///
    /// The origin comes from the graph's own topology, so growth is not
    /// expected to fail; if it does, the error is returned and the map is
    /// left empty.
    pub fn regenerate_map(&mut self) -> Result<SolverState, GeneratorError> {
        self.clear();
        let origin = self.graph.topology().origin();
        let budget = self.options.initial_cell_count;
        self.expand(origin, budget, false)?.for_each(drop);
        Ok(self.complete_grid().finish())
    }

    /// Reset a patch around `center` and solve it again. `cells` defaults to
    /// `default_patch_cell_count`.
    pub fn regenerate_patch(&mut self, center: CellCoordinates, cells: Option<usize>) -> SolverState {
        let count = cells.unwrap_or(self.options.default_patch_cell_count);
        self.uncollapse_cells(center, count);
        self.complete_grid_from(center).finish()
    }

    /// Every determined cell with its world position. Failed cells are
    /// logged and skipped; undetermined ones are skipped silently.
    pub fn placements(&self) -> Vec<TilePlacement> {
        let mut placements = Vec::new();
        for cell in self.graph.parse_all() {
            if cell.is_failed() {
                warn!("no tile fits at {}", cell.coordinates);
                continue;
            }
            let Some(variant) = cell.resolve(&self.tileset) else {
                continue;
            };
            placements.push(TilePlacement {
                original_index: variant.original_index,
                rotation_index: variant.rotation_index,
                degrees_rotation: variant.degrees_rotation,
                position: cell.coordinates.to_physical() * self.options.tile_offset,
                coordinates: cell.coordinates,
            });
        }
        placements
    }

    pub fn statistics(&self) -> MapStatistics {
        let mut stats = MapStatistics::default();
        for cell in self.graph.parse_all() {
            stats.nodes += 1;
            if cell.is_failed() {
                stats.failed += 1;
            } else if cell.is_determined() {
                stats.determined += 1;
            } else {
                stats.undetermined += 1;
            }
        }
        stats
    }
}
