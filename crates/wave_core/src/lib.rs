//! Wave function collapse on a growable tile graph.
//!
//! This crate provides:
//! - `tileset`: compiles base tiles and edge types into rotated variants
//!   with per-direction adjacency sets
//! - `direction`: opposite-direction tables
//! - `coordinates`: square and hexagon grid coordinates
//! - `wfc`: cell/graph data model and the solver (growth, propagation,
//!   observation, collapse, patch reset)
//! - `rng`: seeded random sources for collapse
//!
//! ## Example
//!
//! ```ignore
//! use wave_core::{CellCoordinates, DirectionTable, Tileset, Topology};
//! use wave_core::wfc::{expand, run, SolverConfig, WaveGraph};
//!
//! let tileset = Tileset::compile(&definition, DirectionTable::point_symmetric(4)?)?;
//! let mut graph = WaveGraph::for_topology(Topology::Square, &tileset)?;
//!
//! // grow 100 cells around the origin, then solve them
//! expand(&mut graph, &tileset, CellCoordinates::square(0, 0), 100, false)?.for_each(drop);
//! let mut rng = wave_core::rng::StdRandom::from_seed(42);
//! run(&mut graph, &tileset, &mut rng, SolverConfig::default(), None);
//! ```

pub(crate) mod bits;
pub mod coordinates;
pub mod direction;
pub mod rng;
pub mod tileset;
pub mod wfc;

pub use coordinates::{CellCoordinates, CoordinateError, Topology};
pub use direction::DirectionTable;
pub use rng::{DotNetRandom, RngKind, StdRandom, WaveRng};
pub use tileset::{
    TileEdges, TileTransformation, TileVariant, Tileset, TilesetDefinition, TilesetError,
};
pub use wfc::{Cell, ParsedCell, SolverConfig, SolverState, WaveGraph};
