//! Seeded random networks for tests, benches and the `generate` command.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::network::Network;
use crate::query::Query;
use crate::types::Time;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SyntheticConfig {
    pub stops: usize,
    pub trips: usize,
    /// Upper bound of hops per trip; every trip has at least one.
    pub max_hops: usize,
    pub footpaths: usize,
    /// Latest time a trip may start.
    pub horizon: Time,
    pub max_hop_duration: Time,
    pub max_dwell: Time,
    pub max_walk: Time,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        SyntheticConfig {
            stops: 100,
            trips: 200,
            max_hops: 8,
            footpaths: 50,
            horizon: 4 * 3600,
            max_hop_duration: 600,
            max_dwell: 120,
            max_walk: 300,
            seed: 0,
        }
    }
}

/// Trips visit random stops with strictly increasing times; footpaths join random
/// stop pairs. Stops are grouped into stations of up to three.
pub fn network(conf: &SyntheticConfig) -> Network {
    let mut rng = StdRng::seed_from_u64(conf.seed);
    let mut n = Network::new();
    let mut station = None;
    for i in 0..conf.stops {
        if i % 3 == 0 {
            station = Some(n.add_station());
        }
        n.add_stop(rng.gen_range(-90.0..90.0), rng.gen_range(-180.0..180.0), station);
    }
    if conf.stops < 2 {
        return n;
    }
    for _ in 0..conf.trips {
        let trip = n.add_trip();
        let hops = rng.gen_range(1..=conf.max_hops.max(1));
        let mut stop = rng.gen_range(0..conf.stops);
        let mut time = rng.gen_range(0..=conf.horizon);
        for _ in 0..hops {
            let mut next = rng.gen_range(0..conf.stops - 1);
            if next >= stop {
                next += 1;
            }
            let arrival = time + rng.gen_range(1..=conf.max_hop_duration.max(1));
            n.add_connection(trip, stop, next, time, arrival);
            stop = next;
            time = arrival + rng.gen_range(0..=conf.max_dwell);
        }
    }
    for _ in 0..conf.footpaths {
        let a = rng.gen_range(0..conf.stops);
        let b = rng.gen_range(0..conf.stops);
        n.add_footpath(a, b, rng.gen_range(0..=conf.max_walk));
    }
    n.sort();
    n
}

pub fn queries(conf: &SyntheticConfig, count: usize) -> Vec<Query> {
    let mut rng = StdRng::seed_from_u64(conf.seed.wrapping_add(1));
    if conf.stops == 0 {
        return vec![];
    }
    (0..count)
        .map(|_| {
            Query::new(
                rng.gen_range(0..conf.stops) as u32,
                rng.gen_range(0..conf.stops) as u32,
                rng.gen_range(0..=conf.horizon),
            )
        })
        .collect()
}
