//! Growable wave graph.
//!
//! Nodes live in an arena and are addressed by `NodeId`; a hash index maps
//! coordinates to ids. Each node owns its cell and a fixed-size array of
//! neighbor links, one slot per direction. The graph only grows: nodes are
//! never removed except by `clear`.

use super::cell::Cell;
use super::ParsedCell;
use crate::coordinates::{CellCoordinates, CoordinateError, Topology};
use crate::direction::DirectionTable;
use crate::tileset::Tileset;
use std::collections::HashMap;

/// Index of a node in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One materialized grid position.
#[derive(Debug, Clone)]
pub struct Node {
    coordinates: CellCoordinates,
    cell: Cell,
    neighbors: Box<[Option<NodeId>]>,
}

impl Node {
    fn new(coordinates: CellCoordinates, cell: Cell, cardinality: usize) -> Self {
        Self {
            coordinates,
            cell,
            neighbors: vec![None; cardinality].into_boxed_slice(),
        }
    }

    pub fn coordinates(&self) -> CellCoordinates {
        self.coordinates
    }

    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    pub fn cell_mut(&mut self) -> &mut Cell {
        &mut self.cell
    }

    pub fn set_cell(&mut self, cell: Cell) {
        self.cell = cell;
    }

    pub fn neighbor(&self, direction: usize) -> Option<NodeId> {
        self.neighbors.get(direction).copied().flatten()
    }

    /// Linked neighbors as `(direction, node)`.
    pub fn neighbors(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.neighbors
            .iter()
            .enumerate()
            .filter_map(|(direction, link)| link.map(|id| (direction, id)))
    }
}

/// Wave graph over one topology and one tileset size.
#[derive(Debug, Clone)]
pub struct WaveGraph {
    nodes: Vec<Node>,
    index: HashMap<CellCoordinates, NodeId>,
    offsets: Vec<CellCoordinates>,
    directions: DirectionTable,
    topology: Topology,
    variant_count: usize,
}

impl WaveGraph {
    /// Create an empty graph.
    ///
    /// `offsets[d]` is the step to the neighbor in direction `d`. All offsets
    /// must share a topology, there must be one per direction of `tileset`,
    /// and the tileset's opposite of `d` must be the negated offset.
    pub fn new(offsets: Vec<CellCoordinates>, tileset: &Tileset) -> Result<Self, CoordinateError> {
        let directions = tileset.directions().clone();
        let topology = offsets
            .first()
            .map(CellCoordinates::topology)
            .ok_or(CoordinateError::OffsetCountMismatch {
                offsets: 0,
                directions: directions.cardinality(),
            })?;

        if offsets.len() != directions.cardinality() {
            return Err(CoordinateError::OffsetCountMismatch {
                offsets: offsets.len(),
                directions: directions.cardinality(),
            });
        }
        for offset in &offsets {
            if offset.topology() != topology {
                return Err(CoordinateError::TopologyMismatch {
                    expected: topology,
                    found: offset.topology(),
                });
            }
        }
        for direction in directions.directions() {
            if offsets[directions.opposite(direction)] != offsets[direction].negated() {
                return Err(CoordinateError::OppositeMismatch { direction });
            }
        }

        Ok(Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            offsets,
            directions,
            topology,
            variant_count: tileset.variant_count(),
        })
    }

    /// Graph using the preset offsets of `topology`.
    pub fn for_topology(topology: Topology, tileset: &Tileset) -> Result<Self, CoordinateError> {
        Self::new(topology.neighbor_offsets(), tileset)
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn cardinality(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn opposite(&self, direction: usize) -> usize {
        self.directions.opposite(direction)
    }

    pub fn variant_count(&self) -> usize {
        self.variant_count
    }

    pub fn offsets(&self) -> &[CellCoordinates] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check that `coordinates` can live in this graph.
    pub fn check_topology(&self, coordinates: CellCoordinates) -> Result<(), CoordinateError> {
        if coordinates.topology() == self.topology {
            Ok(())
        } else {
            Err(CoordinateError::TopologyMismatch {
                expected: self.topology,
                found: coordinates.topology(),
            })
        }
    }

    /// Coordinates one step from `coordinates` in `direction`.
    ///
    /// `None` only when `coordinates` belongs to another topology.
    pub fn step(&self, coordinates: CellCoordinates, direction: usize) -> Option<CellCoordinates> {
        coordinates.checked_add(self.offsets[direction]).ok()
    }

    pub fn get(&self, coordinates: &CellCoordinates) -> Option<NodeId> {
        self.index.get(coordinates).copied()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn cell(&self, id: NodeId) -> &Cell {
        &self.nodes[id.0].cell
    }

    pub fn cell_mut(&mut self, id: NodeId) -> &mut Cell {
        &mut self.nodes[id.0].cell
    }

    /// Materialize a node in total superposition. Returns the existing node
    /// if the coordinates are already present.
    pub fn insert(&mut self, coordinates: CellCoordinates) -> NodeId {
        self.get_or_insert(coordinates).0
    }

    /// Like `insert`, also reporting whether a node was created.
    pub fn get_or_insert(&mut self, coordinates: CellCoordinates) -> (NodeId, bool) {
        if let Some(id) = self.get(&coordinates) {
            return (id, false);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(
            coordinates,
            Cell::total(self.variant_count),
            self.cardinality(),
        ));
        self.index.insert(coordinates, id);
        (id, true)
    }

    /// Register `to` as the neighbor of `from` in `direction`, and `from` as
    /// the neighbor of `to` in the opposite direction.
    pub fn link(&mut self, from: NodeId, direction: usize, to: NodeId) {
        let opposite = self.opposite(direction);
        self.nodes[from.0].neighbors[direction] = Some(to);
        self.nodes[to.0].neighbors[opposite] = Some(from);
    }

    /// Put a node back into total superposition.
    pub fn reset_cell(&mut self, id: NodeId) {
        self.nodes[id.0].cell.reset();
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Snapshot of one node for consumers.
    pub fn parse(&self, id: NodeId) -> ParsedCell {
        ParsedCell::from_node(self.node(id))
    }

    /// One entry per materialized node, whatever its state.
    pub fn parse_all(&self) -> impl Iterator<Item = ParsedCell> + '_ {
        self.nodes.iter().map(ParsedCell::from_node)
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }
}
