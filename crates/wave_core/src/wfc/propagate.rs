//! Stack-based arc consistency.
//!
//! Starting from a node whose cell just changed, every linked neighbor is
//! narrowed to the variants its edge still allows. A neighbor that shrank is
//! pushed and processed in turn, until the stack drains. Cells only ever
//! lose candidates, so the loop terminates.
//!
//! Neighbors with at most one candidate are never narrowed. A determined
//! cell stays as it was collapsed, and a failed cell stays failed; only
//! un-collapse can reopen either.

use super::graph::{NodeId, WaveGraph};
use super::ParsedCell;
use crate::tileset::Tileset;
use bevy_log::warn;
use bitvec::vec::BitVec;
use std::collections::VecDeque;

/// Work stack of nodes whose neighbors need re-checking.
#[derive(Debug, Clone, Default)]
pub struct Propagator {
    stack: Vec<NodeId>,
    allowed: BitVec,
}

impl Propagator {
    pub fn new(seed: NodeId) -> Self {
        Self {
            stack: vec![seed],
            allowed: BitVec::new(),
        }
    }

    /// Drop pending work and start over from `seed`.
    pub fn restart(&mut self, seed: NodeId) {
        self.stack.clear();
        self.stack.push(seed);
    }

    pub fn push(&mut self, id: NodeId) {
        self.stack.push(id);
    }

    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    /// Process one node from the stack.
    ///
    /// Neighbors that end up with at most one candidate are appended to
    /// `emitted`. Each cell is emitted at most once, since it is never
    /// narrowed again afterwards. Returns `false` once the stack is empty.
    pub fn step(
        &mut self,
        graph: &mut WaveGraph,
        tileset: &Tileset,
        emitted: &mut VecDeque<ParsedCell>,
    ) -> bool {
        let Some(id) = self.stack.pop() else {
            return false;
        };

        if graph.cell(id).is_failed() {
            warn!(
                "skipping propagation from failed cell at {}",
                graph.node(id).coordinates()
            );
            return true;
        }

        let links: Vec<(usize, NodeId)> = graph.node(id).neighbors().collect();
        for (direction, neighbor) in links {
            if graph.cell(neighbor).len() <= 1 {
                continue;
            }
            tileset.allowed_neighbors_into(graph.cell(id).bits(), direction, &mut self.allowed);
            if graph.cell_mut(neighbor).intersect_with(&self.allowed) {
                self.stack.push(neighbor);
                if graph.cell(neighbor).len() <= 1 {
                    emitted.push_back(graph.parse(neighbor));
                }
            }
        }
        true
    }
}

/// Lazy propagation pass. Yields every neighbor that became determined or
/// failed, in the order it happened.
pub struct Propagation<'a> {
    graph: &'a mut WaveGraph,
    tileset: &'a Tileset,
    propagator: Propagator,
    pending: VecDeque<ParsedCell>,
}

impl<'a> Propagation<'a> {
    pub fn new(graph: &'a mut WaveGraph, tileset: &'a Tileset, seed: NodeId) -> Self {
        Self {
            graph,
            tileset,
            propagator: Propagator::new(seed),
            pending: VecDeque::new(),
        }
    }
}

impl Iterator for Propagation<'_> {
    type Item = ParsedCell;

    fn next(&mut self) -> Option<ParsedCell> {
        loop {
            if let Some(cell) = self.pending.pop_front() {
                return Some(cell);
            }
            if !self
                .propagator
                .step(self.graph, self.tileset, &mut self.pending)
            {
                return None;
            }
        }
    }
}

/// Restore consistency around `seed`.
pub fn propagate<'a>(
    graph: &'a mut WaveGraph,
    tileset: &'a Tileset,
    seed: NodeId,
) -> Propagation<'a> {
    Propagation::new(graph, tileset, seed)
}
