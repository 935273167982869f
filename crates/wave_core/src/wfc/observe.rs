//! Minimum-entropy observation and weighted collapse.

use super::cell::Cell;
use super::graph::{NodeId, WaveGraph};
use crate::rng::WaveRng;
use crate::tileset::Tileset;
use std::fmt;

/// Error returned when a cell cannot be collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseError {
    /// The cell has no candidates left
    EmptySuperposition,
}

impl fmt::Display for CollapseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollapseError::EmptySuperposition => {
                write!(f, "cannot collapse a cell with no candidates")
            }
        }
    }
}

impl std::error::Error for CollapseError {}

/// Find the undetermined node with the fewest candidates.
///
/// Failed and determined cells are never picked. Ties go to the node seen
/// first; a two-candidate cell is returned as soon as it is found since
/// nothing can beat it. `None` means there is nothing left to collapse.
pub fn observe(graph: &WaveGraph) -> Option<NodeId> {
    let mut best = None;
    let mut min = usize::MAX;
    for (id, node) in graph.iter() {
        let remaining = node.cell().len();
        if remaining > 1 && remaining < min {
            min = remaining;
            best = Some(id);
            if remaining == 2 {
                break;
            }
        }
    }
    best
}

/// Uniform pick among nodes that still have a choice to make.
pub fn random_start(graph: &WaveGraph, rng: &mut dyn WaveRng) -> Option<NodeId> {
    let open: Vec<NodeId> = graph
        .iter()
        .filter(|(_, node)| node.cell().len() > 1)
        .map(|(id, _)| id)
        .collect();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.next_index(open.len())])
}

/// Commit `cell` to one of its candidates and return it.
///
/// With a probability table, a sample in [0, 1) is walked down by
/// `weight / len` per candidate and the candidate that takes it to zero or
/// below wins. Without one, or when the weights do not use up the sample,
/// the pick is uniform.
pub fn collapse(
    cell: &mut Cell,
    rng: &mut dyn WaveRng,
    tileset: &Tileset,
) -> Result<usize, CollapseError> {
    if cell.is_failed() {
        return Err(CollapseError::EmptySuperposition);
    }
    if let Some(variant) = cell.single() {
        return Ok(variant);
    }

    let candidates: Vec<usize> = cell.iter().collect();
    let count = candidates.len() as f64;

    let mut chosen = None;
    if tileset.has_weights() {
        let mut sample = rng.next_double();
        for &variant in &candidates {
            sample -= tileset.weight(variant).unwrap_or(0.0) / count;
            if sample <= 0.0 {
                chosen = Some(variant);
                break;
            }
        }
    }
    let variant = match chosen {
        Some(variant) => variant,
        None => candidates[rng.next_index(candidates.len())],
    };

    cell.collapse_to(variant);
    Ok(variant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::DirectionTable;
    use crate::rng::StdRandom;
    use crate::tileset::{TileEdges, TileTransformation, TilesetDefinition};
    use crate::wfc::test_support::{linked_grid, open_tileset, square_graph};

    fn weighted_tileset(probabilities: Vec<f64>) -> Tileset {
        let definition = TilesetDefinition {
            tiles: (0..probabilities.len()).map(|i| format!("t{}", i)).collect(),
            edges: TileEdges::Types {
                types: vec![vec![0; 4]; probabilities.len()],
                transformations: TileTransformation::identity(),
            },
            probabilities: Some(probabilities),
        };
        Tileset::compile(&definition, DirectionTable::point_symmetric(4).unwrap()).unwrap()
    }

    #[test]
    fn test_observe_prefers_fewest_candidates() {
        let tileset = open_tileset(5);
        let mut graph = square_graph(&tileset);
        let grid = linked_grid(&mut graph, 3, 1);
        graph
            .cell_mut(grid[1][0])
            .intersect_with(Cell::from_candidates(5, [0, 1, 4]).bits());
        graph
            .cell_mut(grid[2][0])
            .intersect_with(Cell::from_candidates(5, [2, 3]).bits());

        assert_eq!(observe(&graph), Some(grid[2][0]));
    }

    #[test]
    fn test_observe_finds_nothing_when_resolved_or_failed() {
        let tileset = open_tileset(3);
        let mut graph = square_graph(&tileset);
        let grid = linked_grid(&mut graph, 2, 2);
        graph.cell_mut(grid[0][0]).collapse_to(1);
        graph.cell_mut(grid[0][1]).collapse_to(2);
        graph.cell_mut(grid[1][0]).collapse_to(0);
        graph
            .cell_mut(grid[1][1])
            .intersect_with(Cell::from_candidates(3, []).bits());

        assert_eq!(observe(&graph), None);
        let mut rng = StdRandom::from_u64_seed(1);
        assert_eq!(random_start(&graph, &mut rng), None);
    }

    #[test]
    fn test_collapse_picks_from_candidates() {
        let tileset = open_tileset(6);
        for seed in 0..50 {
            let mut rng = StdRandom::from_u64_seed(seed);
            let mut cell = Cell::from_candidates(6, [1, 4, 5]);
            let variant = collapse(&mut cell, &mut rng, &tileset).unwrap();
            assert!([1, 4, 5].contains(&variant));
            assert_eq!(cell.len(), 1);
            assert_eq!(cell.single(), Some(variant));
        }
    }

    #[test]
    fn test_collapse_is_deterministic_for_a_seed() {
        let tileset = weighted_tileset(vec![0.5, 1.0, 2.0, 0.5]);
        let pick = |seed| {
            let mut rng = StdRandom::from_u64_seed(seed);
            let mut cell = Cell::total(4);
            collapse(&mut cell, &mut rng, &tileset).unwrap()
        };
        for seed in 0..20 {
            assert_eq!(pick(seed), pick(seed));
        }
    }

    #[test]
    fn test_zero_weight_candidates_fall_back_to_uniform() {
        let tileset = weighted_tileset(vec![0.0, 0.0]);
        let mut rng = StdRandom::from_u64_seed(9);
        let mut seen = [false; 2];
        for _ in 0..64 {
            let mut cell = Cell::total(2);
            seen[collapse(&mut cell, &mut rng, &tileset).unwrap()] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_heavy_weight_dominates() {
        let tileset = weighted_tileset(vec![100.0, 0.0]);
        let mut rng = StdRandom::from_u64_seed(3);
        for _ in 0..32 {
            let mut cell = Cell::total(2);
            assert_eq!(collapse(&mut cell, &mut rng, &tileset).unwrap(), 0);
        }
    }

    #[test]
    fn test_collapse_failed_cell_is_an_error() {
        let tileset = open_tileset(2);
        let mut rng = StdRandom::from_u64_seed(0);
        let mut cell = Cell::from_candidates(2, []);
        assert_eq!(
            collapse(&mut cell, &mut rng, &tileset),
            Err(CollapseError::EmptySuperposition)
        );
        assert!(cell.is_failed());
    }

    #[test]
    fn test_collapse_determined_cell_is_a_no_op() {
        let tileset = open_tileset(3);
        let mut rng = StdRandom::from_u64_seed(0);
        let mut cell = Cell::from_candidates(3, [2]);
        assert_eq!(collapse(&mut cell, &mut rng, &tileset), Ok(2));
    }
}
