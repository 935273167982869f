//! Direction indexing shared by the tileset compiler and the wave graph.
//!
//! A direction is an index into the neighbor offset list. Every direction has
//! exactly one opposite; the compiler uses it to pair edge types and the graph
//! uses it to wire links in both directions.

use crate::coordinates::CellCoordinates;
use crate::tileset::TilesetError;

/// Lookup table `opposite[d]` for a fixed number of directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionTable {
    opposite: Vec<usize>,
}

impl DirectionTable {
    /// Table for centrally symmetric tilings: `opposite(d) = (d + n/2) % n`.
    ///
    /// Odd cardinalities have no such pairing and are rejected.
    pub fn point_symmetric(cardinality: usize) -> Result<Self, TilesetError> {
        if cardinality == 0 {
            return Err(TilesetError::NoDirections);
        }
        if cardinality % 2 != 0 {
            return Err(TilesetError::OddCardinality(cardinality));
        }
        let opposite = (0..cardinality)
            .map(|d| (d + cardinality / 2) % cardinality)
            .collect();
        Ok(Self { opposite })
    }

    /// Table derived from neighbor offsets: the opposite of `d` is the
    /// direction whose offset is the negation of `offsets[d]`.
    pub fn from_offsets(offsets: &[CellCoordinates]) -> Result<Self, TilesetError> {
        if offsets.is_empty() {
            return Err(TilesetError::NoDirections);
        }
        let mut opposite = Vec::with_capacity(offsets.len());
        for (direction, offset) in offsets.iter().enumerate() {
            let inverse = offset.negated();
            let found = offsets
                .iter()
                .position(|candidate| *candidate == inverse)
                .ok_or(TilesetError::MissingInverseOffset { direction })?;
            opposite.push(found);
        }
        Ok(Self { opposite })
    }

    /// Build from an explicit table. Every entry must be in range and the
    /// mapping must be an involution (`opposite(opposite(d)) == d`).
    pub fn from_table(opposite: Vec<usize>) -> Result<Self, TilesetError> {
        let n = opposite.len();
        if n == 0 {
            return Err(TilesetError::NoDirections);
        }
        for (direction, &o) in opposite.iter().enumerate() {
            if o >= n || opposite[o] != direction {
                return Err(TilesetError::MissingInverseOffset { direction });
            }
        }
        Ok(Self { opposite })
    }

    /// Number of directions.
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.opposite.len()
    }

    #[inline]
    pub fn opposite(&self, direction: usize) -> usize {
        self.opposite[direction]
    }

    pub fn directions(&self) -> std::ops::Range<usize> {
        0..self.opposite.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::Topology;

    #[test]
    fn test_point_symmetric_square() {
        let table = DirectionTable::point_symmetric(4).unwrap();
        assert_eq!(table.cardinality(), 4);
        assert_eq!(table.opposite(0), 2);
        assert_eq!(table.opposite(1), 3);
        assert_eq!(table.opposite(2), 0);
        assert_eq!(table.opposite(3), 1);
    }

    #[test]
    fn test_point_symmetric_rejects_odd() {
        assert!(matches!(
            DirectionTable::point_symmetric(3),
            Err(TilesetError::OddCardinality(3))
        ));
    }

    #[test]
    fn test_from_offsets_matches_formula_for_presets() {
        for topology in [Topology::Square, Topology::Hexagon] {
            let offsets = topology.neighbor_offsets();
            let derived = DirectionTable::from_offsets(&offsets).unwrap();
            let formula = DirectionTable::point_symmetric(offsets.len()).unwrap();
            assert_eq!(derived, formula, "{:?}", topology);
        }
    }

    #[test]
    fn test_from_offsets_missing_inverse() {
        let offsets = vec![
            CellCoordinates::square(0, 1),
            CellCoordinates::square(1, 0),
            CellCoordinates::square(0, -1),
        ];
        assert!(matches!(
            DirectionTable::from_offsets(&offsets),
            Err(TilesetError::MissingInverseOffset { direction: 1 })
        ));
    }

    #[test]
    fn test_from_table_requires_involution() {
        assert!(DirectionTable::from_table(vec![1, 0, 2]).is_ok());
        assert!(DirectionTable::from_table(vec![1, 2, 0]).is_err());
    }
}
