//! Local reset for patch regeneration.
//!
//! A bounded breadth-first patch around a node is put back into total
//! superposition, then walked in reverse visiting order so the cells just
//! outside the patch re-constrain it from the boundary inward. This is a
//! one-hop re-derivation; the solver is expected to run afterwards.

use super::graph::{NodeId, WaveGraph};
use super::ParsedCell;
use crate::coordinates::CellCoordinates;
use crate::tileset::Tileset;
use bevy_log::debug;
use std::collections::{HashSet, VecDeque};

/// Reset up to `max_cells` nodes around `center` and re-derive their
/// candidates from their neighbors.
///
/// Returns the reset cells in visiting order, after re-derivation. Unknown
/// coordinates reset nothing.
pub fn uncollapse_cells(
    graph: &mut WaveGraph,
    tileset: &Tileset,
    center: CellCoordinates,
    max_cells: usize,
) -> Vec<ParsedCell> {
    let Some(start) = graph.get(&center) else {
        debug!("nothing to reset at {}", center);
        return Vec::new();
    };
    if max_cells == 0 {
        return Vec::new();
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    let mut order: Vec<NodeId> = Vec::with_capacity(max_cells);
    visited.insert(start);
    queue.push_back(start);

    while let Some(id) = queue.pop_front() {
        graph.reset_cell(id);
        order.push(id);
        if order.len() == max_cells {
            break;
        }
        for (_, neighbor) in graph.node(id).neighbors() {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    for &id in order.iter().rev() {
        let links: Vec<(usize, NodeId)> = graph.node(id).neighbors().collect();
        for (direction, neighbor) in links {
            if !graph.cell(neighbor).is_constraining() {
                continue;
            }
            let allowed =
                tileset.allowed_neighbors(graph.cell(neighbor).bits(), graph.opposite(direction));
            graph.cell_mut(id).intersect_with(&allowed);
        }
    }

    debug!("reset {} cells around {}", order.len(), center);
    order.into_iter().map(|id| graph.parse(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wfc::test_support::{isolated_tileset, linked_grid, open_tileset, square_graph};
    use crate::wfc::Cell;

    #[test]
    fn test_single_cell_is_rederived_from_neighbors() {
        let tileset = isolated_tileset(3);
        let mut graph = square_graph(&tileset);
        let grid = linked_grid(&mut graph, 3, 3);
        for (x, column) in grid.iter().enumerate() {
            for &id in column {
                graph.cell_mut(id).collapse_to(if x == 0 { 2 } else { 1 });
            }
        }
        let center = graph.node(grid[1][1]).coordinates();

        let reset = uncollapse_cells(&mut graph, &tileset, center, 1);

        assert_eq!(reset.len(), 1);
        assert_eq!(reset[0].coordinates, center);
        // west neighbor says 2, the others say 1: nothing fits
        assert!(graph.cell(grid[1][1]).is_failed());
        // neighbors are untouched
        assert_eq!(graph.cell(grid[0][1]).single(), Some(2));
        assert_eq!(graph.cell(grid[2][1]).single(), Some(1));
    }

    #[test]
    fn test_single_cell_ignores_its_old_value() {
        let tileset = open_tileset(4);
        let mut graph = square_graph(&tileset);
        let grid = linked_grid(&mut graph, 3, 3);
        for column in &grid {
            for &id in column {
                graph.cell_mut(id).collapse_to(3);
            }
        }
        let center = graph.node(grid[1][1]).coordinates();

        uncollapse_cells(&mut graph, &tileset, center, 1);

        assert!(graph.cell(grid[1][1]).is_total_superposition());
    }

    #[test]
    fn test_patch_is_bounded_and_reconstrained() {
        let tileset = isolated_tileset(2);
        let mut graph = square_graph(&tileset);
        let grid = linked_grid(&mut graph, 5, 5);
        for column in &grid {
            for &id in column {
                graph.cell_mut(id).collapse_to(1);
            }
        }
        let center = graph.node(grid[2][2]).coordinates();

        let reset = uncollapse_cells(&mut graph, &tileset, center, 5);

        assert_eq!(reset.len(), 5);
        // boundary pins the whole patch back to 1
        for cell in &reset {
            assert_eq!(cell.variant, Some(1));
        }
        let determined = graph
            .iter()
            .filter(|(_, n)| n.cell().single() == Some(1))
            .count();
        assert_eq!(determined, 25);
    }

    #[test]
    fn test_failed_neighbors_do_not_constrain() {
        let tileset = isolated_tileset(2);
        let mut graph = square_graph(&tileset);
        let grid = linked_grid(&mut graph, 3, 1);
        graph
            .cell_mut(grid[0][0])
            .intersect_with(Cell::from_candidates(2, []).bits());
        graph.cell_mut(grid[1][0]).collapse_to(0);
        graph.cell_mut(grid[2][0]).collapse_to(1);
        let center = graph.node(grid[1][0]).coordinates();

        uncollapse_cells(&mut graph, &tileset, center, 1);

        assert_eq!(graph.cell(grid[1][0]).single(), Some(1));
    }

    #[test]
    fn test_unknown_center_is_a_no_op() {
        let tileset = open_tileset(2);
        let mut graph = square_graph(&tileset);
        linked_grid(&mut graph, 2, 2);
        let reset = uncollapse_cells(&mut graph, &tileset, CellCoordinates::square(9, 9), 4);
        assert!(reset.is_empty());
        assert_eq!(uncollapse_cells(&mut graph, &tileset, CellCoordinates::square(0, 0), 0).len(), 0);
    }
}
