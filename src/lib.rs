pub mod benchmark;
pub mod config;
pub mod error;
pub mod graph;
pub mod journey;
pub mod network;
pub mod query;
pub mod registry;
pub mod synthetic;
pub mod types;
