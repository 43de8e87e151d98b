use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_algorithm() -> String {
    "csa".to_string()
}

fn default_repetitions() -> usize {
    1
}

fn default_replay_arrivals() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    /// MessagePack network snapshot.
    pub network_path: String,
    /// CSV with `from_stop_id,to_stop_id,departure_time`.
    pub queries_path: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,
    /// Fill the arrival column by replaying each journey. Indexes the network a second
    /// time, next to the copy the algorithm builds during preprocessing.
    #[serde(default = "default_replay_arrivals")]
    pub replay_arrivals: bool,
}

pub fn load_config(path: impl AsRef<Path>) -> Result<BenchmarkConfig, ConfigError> {
    let buf = std::fs::read(path)?;
    Ok(serde_json::from_slice(&buf)?)
}
