pub mod csa;
pub mod reconstruct;
pub mod scan;

use serde::{Deserialize, Serialize};

use crate::error::AlgorithmError;
use crate::journey::Journey;
use crate::network::Network;
use crate::types::Time;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Query {
    #[serde(rename = "from_stop_id")]
    pub origin: u32,
    #[serde(rename = "to_stop_id")]
    pub destination: u32,
    #[serde(rename = "departure_time")]
    pub departure: Time,
}

impl Query {
    pub fn new(origin: u32, destination: u32, departure: Time) -> Query {
        Query {
            origin,
            destination,
            departure,
        }
    }
}

/// Kinds of queries an algorithm can answer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Single journey minimizing arrival time.
    EarliestArrival,
    /// Pareto set over arrival time and number of transfers.
    Bicriteria,
}

/// Lifecycle every benchmarked algorithm exposes to the driver.
pub trait Algorithm: Send {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> &'static [Capability];

    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Prepares the algorithm for `network`. Called once per instance.
    fn init(&mut self, network: &Network) -> Result<(), AlgorithmError>;

    fn query(&mut self, q: Query) -> Result<Vec<Journey>, AlgorithmError>;
}

/// Runs `init` and renders its outcome as `0` or a nonzero status code.
pub fn init_status(algorithm: &mut dyn Algorithm, network: &Network) -> i32 {
    match algorithm.init(network) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{} failed to initialize: {}", algorithm.name(), e);
            e.status_code()
        }
    }
}

/// Converts a stop id from the contract boundary to an index.
pub(crate) fn stop_idx(stop: u32, stop_count: usize) -> Result<usize, AlgorithmError> {
    let idx = stop as usize;
    if idx >= stop_count {
        return Err(AlgorithmError::InvalidStopId { stop, stop_count });
    }
    Ok(idx)
}
