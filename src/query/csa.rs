use std::sync::Arc;

use crate::error::AlgorithmError;
use crate::graph::TimeExpandedGraph;
use crate::journey::Journey;
use crate::network::Network;

use super::reconstruct::reconstruct;
use super::scan::{scan, ScanState};
use super::{stop_idx, Algorithm, Capability, Query};

const CAPABILITIES: &[Capability] = &[Capability::EarliestArrival];

#[derive(Debug)]
enum InitState {
    Uninitialized,
    Ready(Arc<TimeExpandedGraph>),
    /// Init failed; the instance must not be used any more.
    Failed,
}

/// Connection Scan Algorithm answering earliest-arrival queries.
#[derive(Debug)]
pub struct CsaAlgorithm {
    init: InitState,
    state: ScanState,
}

impl Default for CsaAlgorithm {
    fn default() -> Self {
        CsaAlgorithm::new()
    }
}

impl CsaAlgorithm {
    pub fn new() -> CsaAlgorithm {
        CsaAlgorithm {
            init: InitState::Uninitialized,
            state: ScanState::default(),
        }
    }

    /// Shared handle on the indexed graph, for running queries on other threads.
    pub fn graph(&self) -> Option<Arc<TimeExpandedGraph>> {
        match &self.init {
            InitState::Ready(g) => Some(Arc::clone(g)),
            _ => None,
        }
    }

    /// Scan state of the last query.
    pub fn state(&self) -> &ScanState {
        &self.state
    }
}

impl Algorithm for CsaAlgorithm {
    fn name(&self) -> &'static str {
        "csa"
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    fn init(&mut self, network: &Network) -> Result<(), AlgorithmError> {
        if !matches!(self.init, InitState::Uninitialized) {
            return Err(AlgorithmError::AlreadyInitialized);
        }
        match TimeExpandedGraph::build(network) {
            Ok(graph) => {
                self.state = ScanState::new(&graph);
                self.init = InitState::Ready(Arc::new(graph));
                log::debug!("csa initialized");
                Ok(())
            }
            Err(e) => {
                self.init = InitState::Failed;
                Err(e.into())
            }
        }
    }

    fn query(&mut self, q: Query) -> Result<Vec<Journey>, AlgorithmError> {
        let graph = match &self.init {
            InitState::Ready(g) => g,
            _ => return Err(AlgorithmError::NotInitialized),
        };
        earliest_arrival(graph, &mut self.state, q)
    }
}

/// Answers `q` on `graph` with caller-owned scan state. Several threads may query one
/// graph at the same time as long as each brings its own state.
pub fn earliest_arrival(graph: &TimeExpandedGraph, state: &mut ScanState, q: Query) -> Result<Vec<Journey>, AlgorithmError> {
    let origin = stop_idx(q.origin, graph.stop_count())?;
    let destination = stop_idx(q.destination, graph.stop_count())?;
    if origin == destination {
        return Ok(vec![Journey::default()]);
    }
    log::trace!("csa query {} -> {} at {}", origin, destination, q.departure);
    scan(graph, state, origin, q.departure, Some(destination));
    if !state.is_reachable(destination) {
        return Ok(vec![]);
    }
    Ok(vec![reconstruct(graph, state, origin, destination)?])
}
