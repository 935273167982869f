//! End-to-end checks of the solver's guarantees on grown graphs.

use wave_core::wfc::{
    self, collapse, observe, propagate, Cell, ParsedCell, SolverConfig, SolverState, WaveGraph,
};
use wave_core::{
    CellCoordinates, DirectionTable, StdRandom, TileEdges, TileTransformation, Tileset,
    TilesetDefinition, Topology,
};

fn compile(types: Vec<Vec<i32>>, transformations: Vec<TileTransformation>) -> Tileset {
    let definition = TilesetDefinition {
        tiles: (0..types.len()).map(|i| format!("tile{}", i)).collect(),
        edges: TileEdges::Types {
            types,
            transformations,
        },
        probabilities: None,
    };
    Tileset::compile(&definition, DirectionTable::point_symmetric(4).unwrap()).unwrap()
}

fn pipes() -> Tileset {
    compile(
        vec![
            vec![0, 0, 0, 0],
            vec![1, 0, 1, 0],
            vec![1, 1, 0, 0],
            vec![1, 1, 1, 0],
        ],
        TileTransformation::square_grid(),
    )
}

fn grown(tileset: &Tileset, cells: usize) -> WaveGraph {
    let mut graph = WaveGraph::for_topology(Topology::Square, tileset).unwrap();
    wfc::expand(&mut graph, tileset, CellCoordinates::square(0, 0), cells, false)
        .unwrap()
        .for_each(drop);
    graph
}

fn snapshot(graph: &WaveGraph) -> Vec<Cell> {
    graph.iter().map(|(_, node)| node.cell().clone()).collect()
}

#[test]
fn test_compatibility_is_symmetric() {
    let tileset = pipes();
    let directions = tileset.directions();
    for (a, variant) in tileset.variants().iter().enumerate() {
        for d in directions.directions() {
            for b in 0..tileset.variant_count() {
                assert_eq!(
                    variant.accepts(d, b),
                    tileset.variant(b).accepts(directions.opposite(d), a)
                );
            }
        }
    }
}

#[test]
fn test_propagation_only_narrows() {
    let tileset = pipes();
    let mut graph = grown(&tileset, 60);
    let mut rng = StdRandom::from_u64_seed(21);

    for _ in 0..10 {
        let Some(target) = observe(&graph) else {
            break;
        };
        let before = snapshot(&graph);
        collapse(graph.cell_mut(target), &mut rng, &tileset).unwrap();
        propagate(&mut graph, &tileset, target).for_each(drop);

        for (old, new) in before.iter().zip(snapshot(&graph)) {
            assert!(new.iter().all(|variant| old.contains(variant)));
        }
    }
}

#[test]
fn test_propagation_reaches_fixed_point() {
    let tileset = pipes();
    let mut graph = grown(&tileset, 40);
    let mut rng = StdRandom::from_u64_seed(8);
    let target = observe(&graph).unwrap();
    collapse(graph.cell_mut(target), &mut rng, &tileset).unwrap();
    propagate(&mut graph, &tileset, target).for_each(drop);

    let before = snapshot(&graph);
    let again: Vec<ParsedCell> = propagate(&mut graph, &tileset, target).collect();
    assert!(again.is_empty());
    assert_eq!(before, snapshot(&graph));
}

#[test]
fn test_collapse_commits_to_a_prior_candidate() {
    let tileset = pipes();
    for seed in 0..25 {
        let mut rng = StdRandom::from_u64_seed(seed);
        let mut cell = Cell::from_candidates(tileset.variant_count(), [0, 5, 9, 13]);
        let before = cell.clone();
        let variant = collapse(&mut cell, &mut rng, &tileset).unwrap();
        assert_eq!(cell.len(), 1);
        assert!(before.contains(variant));
    }
}

#[test]
fn test_fully_compatible_tiles_never_fail() {
    let tileset = compile(vec![vec![0; 4]; 3], TileTransformation::square_grid());
    for seed in 0..5 {
        let mut graph = grown(&tileset, 80);
        let mut rng = StdRandom::from_u64_seed(seed);
        let state = wfc::run(&mut graph, &tileset, &mut rng, SolverConfig::default(), None);

        assert_eq!(state, SolverState::Done);
        assert_eq!(graph.len(), 80);
        for (_, node) in graph.iter() {
            assert!(node.cell().is_determined());
        }
    }
}

#[test]
fn test_forced_tile_fills_reachable_graph() {
    // tile 0 and tile 1 each only fit next to themselves
    let tileset = compile(vec![vec![0; 4], vec![1; 4]], TileTransformation::identity());
    let mut graph = WaveGraph::for_topology(Topology::Square, &tileset).unwrap();
    let seed = graph.insert(CellCoordinates::square(0, 0));
    graph.cell_mut(seed).collapse_to(0);

    wfc::expand(&mut graph, &tileset, CellCoordinates::square(0, 0), 30, false)
        .unwrap()
        .for_each(drop);
    propagate(&mut graph, &tileset, seed).for_each(drop);

    assert_eq!(graph.len(), 30);
    for (_, node) in graph.iter() {
        assert_eq!(node.cell().single(), Some(0));
    }
}

#[test]
fn test_observe_none_when_all_settled() {
    let tileset = compile(vec![vec![0; 4], vec![1; 4]], TileTransformation::identity());
    let mut graph = grown(&tileset, 9);
    let ids: Vec<_> = graph.node_ids().collect();
    for (i, id) in ids.into_iter().enumerate() {
        if i % 3 == 0 {
            graph.cell_mut(id).intersect_with(Cell::from_candidates(2, []).bits());
        } else {
            graph.cell_mut(id).collapse_to(i % 2);
        }
    }
    assert_eq!(observe(&graph), None);
}

#[test]
fn test_uncollapse_single_cell_uses_only_neighbors() {
    let tileset = pipes();
    let mut graph = grown(&tileset, 50);
    let mut rng = StdRandom::from_u64_seed(13);
    wfc::run(&mut graph, &tileset, &mut rng, SolverConfig::default(), None);

    let center = CellCoordinates::square(0, 0);
    let id = graph.get(&center).unwrap();
    let reset = wfc::uncollapse_cells(&mut graph, &tileset, center, 1);
    assert_eq!(reset.len(), 1);

    let mut expected = Cell::total(tileset.variant_count());
    for (direction, neighbor) in graph.node(id).neighbors() {
        let cell = graph.cell(neighbor);
        if cell.is_constraining() {
            let opposite = graph.opposite(direction);
            expected.intersect_with(&tileset.allowed_neighbors(cell.bits(), opposite));
        }
    }
    assert_eq!(graph.cell(id), &expected);
    assert_eq!(reset[0].candidate_count, expected.len());
}

#[test]
fn test_solver_resumes_after_stall() {
    let tileset = compile(vec![vec![0; 4]; 2], TileTransformation::identity());
    let mut graph = grown(&tileset, 20);
    let mut rng = StdRandom::from_u64_seed(4);
    let capped = SolverConfig { max_iterations: 5 };

    assert_eq!(
        wfc::run(&mut graph, &tileset, &mut rng, capped, None),
        SolverState::Stalled
    );
    assert_eq!(
        wfc::run(&mut graph, &tileset, &mut rng, SolverConfig::default(), None),
        SolverState::Done
    );
    assert!(graph.iter().all(|(_, node)| node.cell().is_determined()));
}
