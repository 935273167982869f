//! Collapse/propagate/observe state machine.
//!
//! ```text
//! Idle -> Collapsing -> Propagating -> (observe) -> Collapsing ...
//!                                               \-> Done
//! Collapsing with the round cap reached -> Stalled
//! ```
//!
//! The loop never backtracks. Reaching `Stalled` leaves the graph in a
//! consistent but possibly incomplete state; running again picks up where
//! it stopped.

use super::graph::{NodeId, WaveGraph};
use super::observe::{collapse, observe, random_start};
use super::propagate::Propagator;
use super::ParsedCell;
use crate::rng::WaveRng;
use crate::tileset::Tileset;
use bevy_log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Solver limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Collapse/propagate rounds per run before giving up.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    /// Start node not chosen yet
    Idle,
    /// About to commit the target cell
    Collapsing,
    /// Draining the propagation stack
    Propagating,
    /// Nothing left to observe
    Done,
    /// Round cap reached
    Stalled,
}

impl SolverState {
    pub fn is_finished(self) -> bool {
        matches!(self, SolverState::Done | SolverState::Stalled)
    }
}

/// One solver run over a graph. Yields each collapsed cell followed by the
/// cells its propagation determined or failed.
pub struct Execution<'a> {
    graph: &'a mut WaveGraph,
    tileset: &'a Tileset,
    rng: &'a mut dyn WaveRng,
    config: SolverConfig,
    state: SolverState,
    target: Option<NodeId>,
    propagator: Propagator,
    pending: VecDeque<ParsedCell>,
    iterations: usize,
}

impl<'a> Execution<'a> {
    /// `start` fixes the first node to collapse; `None` picks one at random
    /// among nodes with more than one candidate.
    pub fn new(
        graph: &'a mut WaveGraph,
        tileset: &'a Tileset,
        rng: &'a mut dyn WaveRng,
        config: SolverConfig,
        start: Option<NodeId>,
    ) -> Self {
        Self {
            graph,
            tileset,
            rng,
            config,
            state: SolverState::Idle,
            target: start,
            propagator: Propagator::default(),
            pending: VecDeque::new(),
            iterations: 0,
        }
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    /// Rounds started so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Drain the run and report how it ended.
    pub fn finish(mut self) -> SolverState {
        while self.next().is_some() {}
        self.state
    }

    fn advance(&mut self) {
        match self.state {
            SolverState::Idle => {
                if self.target.is_none() {
                    self.target = random_start(self.graph, self.rng);
                }
                self.state = if self.target.is_some() {
                    SolverState::Collapsing
                } else {
                    SolverState::Done
                };
            }
            SolverState::Collapsing => {
                let Some(id) = self.target.take() else {
                    self.state = SolverState::Done;
                    return;
                };
                if self.iterations >= self.config.max_iterations {
                    warn!(
                        "solver stopped after {} rounds, map may be incomplete",
                        self.iterations
                    );
                    self.state = SolverState::Stalled;
                    return;
                }
                self.iterations += 1;

                match collapse(self.graph.cell_mut(id), self.rng, self.tileset) {
                    Ok(_) => {
                        self.pending.push_back(self.graph.parse(id));
                        self.propagator.restart(id);
                        self.state = SolverState::Propagating;
                    }
                    Err(err) => {
                        error!(
                            "cannot collapse cell at {}: {}",
                            self.graph.node(id).coordinates(),
                            err
                        );
                        self.observe_next();
                    }
                }
            }
            SolverState::Propagating => {
                if !self
                    .propagator
                    .step(self.graph, self.tileset, &mut self.pending)
                {
                    self.observe_next();
                }
            }
            SolverState::Done | SolverState::Stalled => {}
        }
    }

    fn observe_next(&mut self) {
        match observe(self.graph) {
            Some(id) => {
                self.target = Some(id);
                self.state = SolverState::Collapsing;
            }
            None => {
                debug!("solver finished after {} rounds", self.iterations);
                self.state = SolverState::Done;
            }
        }
    }
}

impl Iterator for Execution<'_> {
    type Item = ParsedCell;

    fn next(&mut self) -> Option<ParsedCell> {
        loop {
            if let Some(cell) = self.pending.pop_front() {
                return Some(cell);
            }
            if self.state.is_finished() {
                return None;
            }
            self.advance();
        }
    }
}

/// Run the solver to completion or to the round cap.
pub fn run(
    graph: &mut WaveGraph,
    tileset: &Tileset,
    rng: &mut dyn WaveRng,
    config: SolverConfig,
    start: Option<NodeId>,
) -> SolverState {
    Execution::new(graph, tileset, rng, config, start).finish()
}
