//! Wave function collapse over a growable graph.
//!
//! The solver is greedy and never backtracks. A cell whose superposition
//! becomes empty stays failed; it is logged and skipped, never used to
//! constrain anything.
//!
//! - `cell`: candidate set of one node
//! - `graph`: arena of nodes keyed by coordinates
//! - `expand`: breadth-first growth with one-hop constraint matching
//! - `propagate`: stack-based arc consistency
//! - `observe`: minimum-entropy selection and weighted collapse
//! - `execute`: the collapse/propagate/observe state machine
//! - `uncollapse`: reset and re-derive a bounded patch
//!
//! Growth, propagation and execution are pull-based iterators: work happens
//! only as the caller advances them, and each yields the cells that became
//! determined or failed along the way.

mod cell;
mod execute;
mod expand;
mod graph;
mod observe;
mod propagate;
mod uncollapse;

pub use cell::Cell;
pub use execute::{run, Execution, SolverConfig, SolverState};
pub use expand::{expand, Expansion};
pub use graph::{Node, NodeId, WaveGraph};
pub use observe::{collapse, observe, random_start, CollapseError};
pub use propagate::{propagate, Propagation, Propagator};
pub use uncollapse::uncollapse_cells;

use crate::coordinates::CellCoordinates;
use crate::tileset::{TileVariant, Tileset};

/// Snapshot of one node handed to consumers.
///
/// `variant` is set only for determined cells. A failed cell has
/// `candidate_count == 0`; an undetermined one has more than one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCell {
    pub coordinates: CellCoordinates,
    pub variant: Option<usize>,
    pub candidate_count: usize,
}

impl ParsedCell {
    pub(crate) fn from_node(node: &Node) -> Self {
        let cell = node.cell();
        Self {
            coordinates: node.coordinates(),
            variant: cell.single(),
            candidate_count: cell.len(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.candidate_count == 0
    }

    pub fn is_determined(&self) -> bool {
        self.variant.is_some()
    }

    /// Variant info of a determined cell.
    pub fn resolve<'t>(&self, tileset: &'t Tileset) -> Option<&'t TileVariant> {
        self.variant.map(|variant| tileset.variant(variant))
    }
}
