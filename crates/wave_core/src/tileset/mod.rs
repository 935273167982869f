//! Tile catalogue compilation.
//!
//! A tileset definition lists base tiles and describes their edges, either as
//! one integer "type" per direction (two edges fit when their types are equal)
//! or as explicit per-direction lists of accepted tiles. Compiling it expands
//! every base tile into rotated variants and derives, for every variant and
//! direction, the set of variants allowed on the other side of that edge.
//!
//! This is the only place where configuration is validated; the solver trusts
//! a compiled `Tileset`.

mod compiler;
mod transformation;

pub use compiler::{compile_connections, compile_types};
pub use transformation::TileTransformation;

use crate::bits::union_assign;
use crate::direction::DirectionTable;
use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type for tileset configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum TilesetError {
    /// No tiles in the catalogue
    EmptyCatalogue,
    /// Zero neighbor directions
    NoDirections,
    /// `(d + n/2) % n` pairing requested for an odd direction count
    OddCardinality(usize),
    /// A direction has no opposite
    MissingInverseOffset { direction: usize },
    /// Edge table has a different number of rows than there are tiles
    TileCountMismatch { tiles: usize, entries: usize },
    /// A tile lists the wrong number of directions
    DirectionCountMismatch {
        tile: usize,
        expected: usize,
        found: usize,
    },
    /// Probability table length differs from the tile count
    ProbabilityCountMismatch { expected: usize, found: usize },
    /// Probability is negative, NaN or infinite
    InvalidProbability { tile: usize, value: f64 },
    /// No rotation transforms given
    NoTransformations,
    /// Rotation shift is not smaller than the direction count
    TransformationOutOfRange {
        index_offset: usize,
        cardinality: usize,
    },
    /// Explicit connection names a tile that does not exist
    ConnectionOutOfRange {
        tile: usize,
        direction: usize,
        target: usize,
    },
    /// `tile` accepts `target` but `target` does not accept `tile` back
    AsymmetricConnection {
        tile: usize,
        direction: usize,
        target: usize,
    },
}

impl fmt::Display for TilesetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilesetError::EmptyCatalogue => write!(f, "tileset has no tiles"),
            TilesetError::NoDirections => write!(f, "tileset has no neighbor directions"),
            TilesetError::OddCardinality(n) => {
                write!(f, "cannot pair opposite directions for odd cardinality {}", n)
            }
            TilesetError::MissingInverseOffset { direction } => {
                write!(f, "direction {} has no opposite direction", direction)
            }
            TilesetError::TileCountMismatch { tiles, entries } => write!(
                f,
                "{} tiles named but edge table has {} entries",
                tiles, entries
            ),
            TilesetError::DirectionCountMismatch {
                tile,
                expected,
                found,
            } => write!(
                f,
                "tile {} lists {} directions, expected {}",
                tile, found, expected
            ),
            TilesetError::ProbabilityCountMismatch { expected, found } => write!(
                f,
                "{} probabilities given for {} tiles",
                found, expected
            ),
            TilesetError::InvalidProbability { tile, value } => {
                write!(f, "invalid probability {} for tile {}", value, tile)
            }
            TilesetError::NoTransformations => write!(f, "no tile transformations given"),
            TilesetError::TransformationOutOfRange {
                index_offset,
                cardinality,
            } => write!(
                f,
                "transformation index offset {} out of range for {} directions",
                index_offset, cardinality
            ),
            TilesetError::ConnectionOutOfRange {
                tile,
                direction,
                target,
            } => write!(
                f,
                "tile {} direction {} connects to unknown tile {}",
                tile, direction, target
            ),
            TilesetError::AsymmetricConnection {
                tile,
                direction,
                target,
            } => write!(
                f,
                "tile {} accepts tile {} in direction {} but not the reverse",
                tile, target, direction
            ),
        }
    }
}

impl std::error::Error for TilesetError {}

/// A placeable unit: one base tile under one rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TileVariant {
    /// Index of the base tile in the catalogue.
    pub original_index: usize,
    /// Index of the applied transformation.
    pub rotation_index: usize,
    /// Rotation for the renderer, in degrees.
    pub degrees_rotation: f32,
    /// Edge type per direction after rotation. Empty for tilesets defined by
    /// explicit connections.
    pub types_per_direction: Vec<i32>,
    /// `connections_per_direction[d]` has bit `v` set when variant `v` may
    /// sit next to this one in direction `d`.
    pub connections_per_direction: Vec<BitVec>,
}

impl TileVariant {
    /// Variants allowed in `direction`.
    pub fn connections(&self, direction: usize) -> &BitVec {
        &self.connections_per_direction[direction]
    }

    pub fn accepts(&self, direction: usize, variant: usize) -> bool {
        self.connections_per_direction[direction]
            .get(variant)
            .map(|bit| *bit)
            .unwrap_or(false)
    }
}

/// How tile edges are described.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileEdges {
    /// One type code per tile per direction; equal codes connect.
    Types {
        types: Vec<Vec<i32>>,
        #[serde(default = "TileTransformation::identity")]
        transformations: Vec<TileTransformation>,
    },
    /// Accepted neighbor tile indices per tile per direction. No rotations.
    Connections { connections: Vec<Vec<Vec<usize>>> },
}

/// Plain-data tileset configuration, as produced by a host-side loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetDefinition {
    pub tiles: Vec<String>,
    pub edges: TileEdges,
    /// Relative weight per base tile; 1.0 is neutral.
    #[serde(default)]
    pub probabilities: Option<Vec<f64>>,
}

/// Compiled, immutable tile compatibility tables.
#[derive(Debug, Clone)]
pub struct Tileset {
    tile_names: Vec<String>,
    variants: Vec<TileVariant>,
    weights: Option<Vec<f64>>,
    directions: DirectionTable,
}

impl Tileset {
    /// Validate and compile a definition for the given direction layout.
    pub fn compile(
        definition: &TilesetDefinition,
        directions: DirectionTable,
    ) -> Result<Self, TilesetError> {
        let tile_count = definition.tiles.len();
        if tile_count == 0 {
            return Err(TilesetError::EmptyCatalogue);
        }

        if let Some(probabilities) = &definition.probabilities {
            if probabilities.len() != tile_count {
                return Err(TilesetError::ProbabilityCountMismatch {
                    expected: tile_count,
                    found: probabilities.len(),
                });
            }
            for (tile, &value) in probabilities.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(TilesetError::InvalidProbability { tile, value });
                }
            }
        }

        let variants = match &definition.edges {
            TileEdges::Types {
                types,
                transformations,
            } => {
                if types.len() != tile_count {
                    return Err(TilesetError::TileCountMismatch {
                        tiles: tile_count,
                        entries: types.len(),
                    });
                }
                compile_types(types, transformations, &directions)?
            }
            TileEdges::Connections { connections } => {
                if connections.len() != tile_count {
                    return Err(TilesetError::TileCountMismatch {
                        tiles: tile_count,
                        entries: connections.len(),
                    });
                }
                compile_connections(connections, &directions)?
            }
        };

        let weights = definition.probabilities.as_ref().map(|probabilities| {
            variants
                .iter()
                .map(|variant| probabilities[variant.original_index])
                .collect()
        });

        Ok(Self {
            tile_names: definition.tiles.clone(),
            variants,
            weights,
            directions,
        })
    }

    /// Number of variants (tiles x rotations).
    #[inline]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    pub fn tile_count(&self) -> usize {
        self.tile_names.len()
    }

    pub fn variant(&self, index: usize) -> &TileVariant {
        &self.variants[index]
    }

    pub fn variants(&self) -> &[TileVariant] {
        &self.variants
    }

    pub fn tile_name(&self, original_index: usize) -> Option<&str> {
        self.tile_names.get(original_index).map(String::as_str)
    }

    /// Weight of a variant, if a probability table was configured.
    pub fn weight(&self, variant: usize) -> Option<f64> {
        self.weights.as_ref().map(|w| w[variant])
    }

    pub fn has_weights(&self) -> bool {
        self.weights.is_some()
    }

    pub fn directions(&self) -> &DirectionTable {
        &self.directions
    }

    #[inline]
    pub fn cardinality(&self) -> usize {
        self.directions.cardinality()
    }

    /// Union of `connections_per_direction[direction]` over every variant in
    /// `candidates`: what a neighbor in `direction` may still be.
    pub fn allowed_neighbors(&self, candidates: &BitVec, direction: usize) -> BitVec {
        let mut allowed = BitVec::new();
        self.allowed_neighbors_into(candidates, direction, &mut allowed);
        allowed
    }

    /// `allowed_neighbors` written into `out`, reusing its allocation.
    pub fn allowed_neighbors_into(&self, candidates: &BitVec, direction: usize, out: &mut BitVec) {
        out.clear();
        out.resize(self.variants.len(), false);
        for variant in candidates.iter_ones() {
            union_assign(out, self.variants[variant].connections(direction));
        }
    }
}
