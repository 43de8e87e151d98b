//! Driver timing an algorithm's preprocessing and queries.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use crate::error::AlgorithmError;
use crate::journey::Journey;
use crate::network::Network;
use crate::query::{Algorithm, Capability, Query};
use crate::registry;

#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    #[error("could not load algorithm '{0}', known algorithms: {1:?}")]
    UnknownAlgorithm(String, Vec<&'static str>),

    #[error("no algorithm selected")]
    NoAlgorithm,

    #[error("algorithm does not support {0:?} queries")]
    Unsupported(Capability),

    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),

    #[error("cannot read queries: {0}")]
    Queries(#[from] csv::Error),
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreprocessingResult {
    pub runtime_ns: u64,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct QueryResult {
    pub query_idx: usize,
    pub runtime_ns: u64,
    pub kind: Capability,
    pub journeys: Vec<Journey>,
}

pub struct Benchmark {
    network: Network,
    algorithm: Option<Box<dyn Algorithm>>,
}

impl Benchmark {
    pub fn new(network: Network) -> Benchmark {
        Benchmark {
            network,
            algorithm: None,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn set_algorithm(&mut self, name: &str) -> Result<(), BenchmarkError> {
        let algorithm = registry::create(name)
            .ok_or_else(|| BenchmarkError::UnknownAlgorithm(name.to_string(), registry::names()))?;
        self.set_algorithm_instance(algorithm);
        Ok(())
    }

    pub fn set_algorithm_instance(&mut self, algorithm: Box<dyn Algorithm>) {
        log::info!("using algorithm {} ({:?})", algorithm.name(), algorithm.capabilities());
        self.algorithm = Some(algorithm);
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.algorithm.as_ref().is_some_and(|a| a.supports(capability))
    }

    pub fn run_preprocessing(&mut self) -> Result<PreprocessingResult, BenchmarkError> {
        let algorithm = self.algorithm.as_mut().ok_or(BenchmarkError::NoAlgorithm)?;
        let start_ts = Instant::now();
        algorithm.init(&self.network)?;
        let runtime_ns = start_ts.elapsed().as_nanos() as u64;
        log::info!("preprocessing took {} ns", runtime_ns);
        Ok(PreprocessingResult { runtime_ns })
    }

    pub fn run_query(&mut self, query_idx: usize, q: Query) -> Result<QueryResult, BenchmarkError> {
        let algorithm = self.algorithm.as_mut().ok_or(BenchmarkError::NoAlgorithm)?;
        let kind = Capability::EarliestArrival;
        if !algorithm.supports(kind) {
            return Err(BenchmarkError::Unsupported(kind));
        }
        let start_ts = Instant::now();
        let journeys = algorithm.query(q)?;
        let runtime_ns = start_ts.elapsed().as_nanos() as u64;
        Ok(QueryResult {
            query_idx,
            runtime_ns,
            kind,
            journeys,
        })
    }

    pub fn run_queries(&mut self, queries: &[Query]) -> Result<Vec<QueryResult>, BenchmarkError> {
        let results = queries
            .iter()
            .enumerate()
            .map(|(i, q)| self.run_query(i, *q))
            .collect::<Result<Vec<_>, _>>()?;
        let total: u64 = results.iter().map(|r| r.runtime_ns).sum();
        log::info!(
            "answered {} queries, {} with a journey, mean {} ns",
            results.len(),
            results.iter().filter(|r| !r.journeys.is_empty()).count(),
            if results.is_empty() { 0 } else { total / results.len() as u64 }
        );
        Ok(results)
    }
}

/// Reads `from_stop_id,to_stop_id,departure_time` records.
pub fn load_queries(path: impl AsRef<Path>) -> Result<Vec<Query>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let queries = reader.deserialize().collect::<Result<Vec<Query>, _>>()?;
    Ok(queries)
}

pub fn write_queries(path: impl AsRef<Path>, queries: &[Query]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for q in queries {
        writer.serialize(q)?;
    }
    writer.flush()?;
    Ok(())
}
