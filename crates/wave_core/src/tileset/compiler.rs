//! Variant expansion and adjacency derivation.
//!
//! Runs once at load time. Cost is O(V^2 * D) for V variants and D
//! directions, which is fine for catalogues of a few hundred variants.

use super::{TileTransformation, TileVariant, TilesetError};
use crate::direction::DirectionTable;
use bitvec::vec::BitVec;

/// Expand typed tiles into rotated variants and connect every pair of edges
/// whose types are equal.
///
/// `types[tile][direction]` is the edge type of a base tile. Variant order is
/// tile-major: all rotations of tile 0, then all rotations of tile 1, ...
///
/// `b` ends up in `a.connections_per_direction[d]` exactly when
/// `a.types_per_direction[d] == b.types_per_direction[opposite(d)]`, so the
/// relation is symmetric by construction.
pub fn compile_types(
    types: &[Vec<i32>],
    transformations: &[TileTransformation],
    directions: &DirectionTable,
) -> Result<Vec<TileVariant>, TilesetError> {
    let cardinality = directions.cardinality();
    if types.is_empty() {
        return Err(TilesetError::EmptyCatalogue);
    }
    if transformations.is_empty() {
        return Err(TilesetError::NoTransformations);
    }
    for transformation in transformations {
        if transformation.index_offset >= cardinality {
            return Err(TilesetError::TransformationOutOfRange {
                index_offset: transformation.index_offset,
                cardinality,
            });
        }
    }
    for (tile, tile_types) in types.iter().enumerate() {
        if tile_types.len() != cardinality {
            return Err(TilesetError::DirectionCountMismatch {
                tile,
                expected: cardinality,
                found: tile_types.len(),
            });
        }
    }

    let mut variants: Vec<TileVariant> = Vec::with_capacity(types.len() * transformations.len());
    for (tile, tile_types) in types.iter().enumerate() {
        for (rotation_index, transformation) in transformations.iter().enumerate() {
            variants.push(TileVariant {
                original_index: tile,
                rotation_index,
                degrees_rotation: transformation.degrees_rotation,
                types_per_direction: transformation.apply(tile_types),
                connections_per_direction: Vec::new(),
            });
        }
    }

    let variant_count = variants.len();
    let connections: Vec<Vec<BitVec>> = variants
        .iter()
        .map(|variant| {
            directions
                .directions()
                .map(|direction| {
                    let edge = variant.types_per_direction[direction];
                    let opposite = directions.opposite(direction);
                    let mut set = BitVec::repeat(false, variant_count);
                    for (other, other_variant) in variants.iter().enumerate() {
                        if other_variant.types_per_direction[opposite] == edge {
                            set.set(other, true);
                        }
                    }
                    set
                })
                .collect()
        })
        .collect();

    for (variant, sets) in variants.iter_mut().zip(connections) {
        variant.connections_per_direction = sets;
    }

    Ok(variants)
}

/// Build one unrotated variant per tile from explicit neighbor lists.
///
/// `connections[tile][direction]` lists the tiles accepted on that side. The
/// lists must agree with each other: if `a` accepts `b` in direction `d`,
/// `b` must accept `a` in `opposite(d)`.
pub fn compile_connections(
    connections: &[Vec<Vec<usize>>],
    directions: &DirectionTable,
) -> Result<Vec<TileVariant>, TilesetError> {
    let cardinality = directions.cardinality();
    let tile_count = connections.len();
    if tile_count == 0 {
        return Err(TilesetError::EmptyCatalogue);
    }

    let mut variants = Vec::with_capacity(tile_count);
    for (tile, per_direction) in connections.iter().enumerate() {
        if per_direction.len() != cardinality {
            return Err(TilesetError::DirectionCountMismatch {
                tile,
                expected: cardinality,
                found: per_direction.len(),
            });
        }

        let mut sets = Vec::with_capacity(cardinality);
        for (direction, targets) in per_direction.iter().enumerate() {
            let mut set = BitVec::repeat(false, tile_count);
            for &target in targets {
                if target >= tile_count {
                    return Err(TilesetError::ConnectionOutOfRange {
                        tile,
                        direction,
                        target,
                    });
                }
                set.set(target, true);
            }
            sets.push(set);
        }

        variants.push(TileVariant {
            original_index: tile,
            rotation_index: 0,
            degrees_rotation: 0.0,
            types_per_direction: Vec::new(),
            connections_per_direction: sets,
        });
    }

    for (tile, variant) in variants.iter().enumerate() {
        for direction in directions.directions() {
            let opposite = directions.opposite(direction);
            for target in variant.connections(direction).iter_ones() {
                if !variants[target].accepts(opposite, tile) {
                    return Err(TilesetError::AsymmetricConnection {
                        tile,
                        direction,
                        target,
                    });
                }
            }
        }
    }

    Ok(variants)
}
