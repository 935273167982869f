//! Breadth-first graph growth.
//!
//! Growth visits nodes outward from a seed, materializing missing neighbors
//! while the frontier has room and wiring links both ways. New cells are
//! matched one hop against already narrowed neighbors; full propagation is
//! left to the solver.
//!
//! With `overwrite`, every node reserved into the frontier (except the seed)
//! is reset to total superposition first, and growth only narrows neighbors
//! that are inside the frontier. Cells outside it keep their values and act
//! as a fixed boundary.
//!
//! Growth never narrows a cell that is already determined or failed.

use super::graph::{NodeId, WaveGraph};
use super::ParsedCell;
use crate::coordinates::{CellCoordinates, CoordinateError};
use crate::tileset::Tileset;
use bevy_log::debug;
use bitvec::vec::BitVec;
use std::collections::{HashSet, VecDeque};

/// Lazy growth pass. Yields cells that growth left with at most one
/// candidate.
pub struct Expansion<'a> {
    graph: &'a mut WaveGraph,
    tileset: &'a Tileset,
    seed: NodeId,
    budget: usize,
    overwrite: bool,
    frontier: HashSet<NodeId>,
    queue: VecDeque<NodeId>,
    pending: VecDeque<ParsedCell>,
    created: usize,
    emitted: usize,
    finished: bool,
}

impl<'a> Expansion<'a> {
    /// Start growing from `seed`, which is created if absent.
    ///
    /// `budget` bounds the frontier, seed included. A missing neighbor is
    /// created and reserved while the frontier holds fewer than `budget`
    /// nodes. An existing neighbor is reserved only if the frontier, with it
    /// added, still holds fewer than `budget`. Only a created node can take
    /// the last slot. The seed is never reset.
    pub fn new(
        graph: &'a mut WaveGraph,
        tileset: &'a Tileset,
        seed: CellCoordinates,
        budget: usize,
        overwrite: bool,
    ) -> Result<Self, CoordinateError> {
        graph.check_topology(seed)?;
        let (seed_id, created) = graph.get_or_insert(seed);

        let mut frontier = HashSet::new();
        frontier.insert(seed_id);
        let mut queue = VecDeque::new();
        queue.push_back(seed_id);

        Ok(Self {
            graph,
            tileset,
            seed: seed_id,
            budget,
            overwrite,
            frontier,
            queue,
            pending: VecDeque::new(),
            created: usize::from(created),
            emitted: 0,
            finished: false,
        })
    }

    pub fn seed(&self) -> NodeId {
        self.seed
    }

    /// Nodes materialized so far, seed included if it was new.
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Visit one queued node. Returns `false` once the queue is empty.
    fn step(&mut self) -> bool {
        let Some(id) = self.queue.pop_front() else {
            return false;
        };
        let coordinates = self.graph.node(id).coordinates();

        for direction in 0..self.graph.cardinality() {
            let Some(target) = self.graph.step(coordinates, direction) else {
                continue;
            };

            let (neighbor, created) = match self.graph.get(&target) {
                Some(existing) => (existing, false),
                None if self.frontier.len() < self.budget => {
                    self.created += 1;
                    (self.graph.insert(target), true)
                }
                None => continue,
            };

            if self.graph.node(id).neighbor(direction) != Some(neighbor) {
                self.graph.link(id, direction, neighbor);
            }

            if !self.frontier.contains(&neighbor)
                && (created || self.frontier.len() + 1 < self.budget)
            {
                self.frontier.insert(neighbor);
                self.queue.push_back(neighbor);
                if self.overwrite && !created {
                    self.graph.reset_cell(neighbor);
                }
            }

            self.match_pair(id, direction, neighbor);
        }
        true
    }

    /// One-hop matching between `id` and its neighbor in `direction`.
    fn match_pair(&mut self, id: NodeId, direction: usize, neighbor: NodeId) {
        let may_narrow_neighbor = !self.overwrite || self.frontier.contains(&neighbor);
        if may_narrow_neighbor
            && self.graph.cell(id).is_constraining()
            && self.graph.cell(neighbor).is_total_superposition()
        {
            let allowed = self
                .tileset
                .allowed_neighbors(self.graph.cell(id).bits(), direction);
            self.narrow(neighbor, &allowed);
        }

        if self.graph.cell(neighbor).is_constraining() && self.graph.cell(id).len() > 1 {
            let opposite = self.graph.opposite(direction);
            let allowed = self
                .tileset
                .allowed_neighbors(self.graph.cell(neighbor).bits(), opposite);
            self.narrow(id, &allowed);
        }
    }

    fn narrow(&mut self, id: NodeId, allowed: &BitVec) {
        if self.graph.cell_mut(id).intersect_with(allowed) && self.graph.cell(id).len() <= 1 {
            self.pending.push_back(self.graph.parse(id));
            self.emitted += 1;
        }
    }
}

impl Iterator for Expansion<'_> {
    type Item = ParsedCell;

    fn next(&mut self) -> Option<ParsedCell> {
        loop {
            if let Some(cell) = self.pending.pop_front() {
                return Some(cell);
            }
            if self.finished {
                return None;
            }
            if !self.step() {
                self.finished = true;
                debug!(
                    "expansion from {} reserved {} nodes, created {}, emitted {}",
                    self.graph.node(self.seed).coordinates(),
                    self.frontier.len(),
                    self.created,
                    self.emitted
                );
            }
        }
    }
}

/// Grow the graph around `seed`. See `Expansion`.
pub fn expand<'a>(
    graph: &'a mut WaveGraph,
    tileset: &'a Tileset,
    seed: CellCoordinates,
    budget: usize,
    overwrite: bool,
) -> Result<Expansion<'a>, CoordinateError> {
    Expansion::new(graph, tileset, seed, budget, overwrite)
}
