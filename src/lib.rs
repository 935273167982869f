//! Tile map generation with wave function collapse.
//!
//! `TileMapGenerator` is the session a host drives: build it from a tileset
//! definition, grow cells with `expand`, solve them with `complete_grid`,
//! rework an area with `regenerate_patch`, and read the map back with
//! `placements` or `parse_result`. The algorithms live in `wave_core`.
//!
//! ## Example
//!
//! ```ignore
//! use tile_wave::{GeneratorOptions, TileMapGenerator};
//! use wave_core::{CellCoordinates, Topology};
//!
//! let mut generator =
//!     TileMapGenerator::for_topology(&definition, Topology::Square, GeneratorOptions::default())?;
//! generator.regenerate_map()?;
//! for placement in generator.placements() {
//!     spawn_tile(placement.original_index, placement.degrees_rotation, placement.position);
//! }
//!
//! // rework the area around a clicked cell
//! generator.regenerate_patch(CellCoordinates::square(3, 4), None);
//! ```

pub mod generator;
pub mod options;

pub use generator::{GeneratorError, MapStatistics, TileMapGenerator, TilePlacement};
pub use options::GeneratorOptions;
pub use wave_core;
