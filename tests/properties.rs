use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use journeybench::graph::TimeExpandedGraph;
use journeybench::journey::Leg;
use journeybench::network::Network;
use journeybench::query::csa::{self, CsaAlgorithm};
use journeybench::query::scan::ScanState;
use journeybench::query::{Algorithm, Query};
use journeybench::synthetic::{self, SyntheticConfig};
use journeybench::types::{Time, UNREACHABLE};

const SEEDS: u64 = 12;

fn config(seed: u64) -> SyntheticConfig {
    SyntheticConfig {
        stops: 24,
        trips: 40,
        max_hops: 5,
        footpaths: 0,
        horizon: 2000,
        max_hop_duration: 300,
        max_dwell: 60,
        max_walk: 0,
        seed,
    }
}

/// Random network whose footpaths are closed under composition: stops are put on a
/// line in clusters of four and every pair inside a cluster walks their distance.
fn network(seed: u64) -> Network {
    let conf = config(seed);
    let mut n = synthetic::network(&conf);
    let mut rng = StdRng::seed_from_u64(seed + 1000);
    let positions: Vec<Time> = (0..conf.stops).map(|_| rng.gen_range(0..200)).collect();
    for a in 0..conf.stops {
        for b in a + 1..conf.stops {
            if a / 4 == b / 4 {
                n.add_footpath(a, b, positions[a].abs_diff(positions[b]));
            }
        }
    }
    n.sort();
    n
}

/// Earliest arrival at every stop by fixpoint iteration over the same transfer model:
/// one footpath after each ride or at the origin, trips followed along their chain.
fn brute_force(graph: &TimeExpandedGraph, origin: usize, departure: Time) -> Vec<Time> {
    let mut at = vec![UNREACHABLE; graph.stop_count()];
    let mut ride_arrival = vec![UNREACHABLE; graph.stop_count()];
    let mut on = vec![false; graph.connections().len()];
    at[origin] = departure;
    ride_arrival[origin] = departure;
    let mut changed = true;
    while changed {
        changed = false;
        for s in 0..graph.stop_count() {
            if ride_arrival[s] == UNREACHABLE {
                continue;
            }
            for f in graph.footpaths_from(s) {
                let t = ride_arrival[s] + f.duration;
                if t < at[f.to_idx] {
                    at[f.to_idx] = t;
                    changed = true;
                }
            }
        }
        for c in graph.connections() {
            if on[c.id] {
                continue;
            }
            let from_predecessor = c.trip_predecessor.is_some_and(|p| on[p]);
            if from_predecessor || (c.departure >= departure && at[c.from_idx] <= c.departure) {
                on[c.id] = true;
                changed = true;
                ride_arrival[c.to_idx] = ride_arrival[c.to_idx].min(c.arrival);
                at[c.to_idx] = at[c.to_idx].min(c.arrival);
            }
        }
    }
    at
}

fn queries(seed: u64) -> Vec<Query> {
    let mut conf = config(seed);
    conf.horizon = 1500;
    synthetic::queries(&conf, 60)
}

fn arrival(csa: &mut CsaAlgorithm, q: Query) -> Time {
    let journeys = csa.query(q).unwrap();
    assert!(journeys.len() <= 1);
    match journeys.first() {
        Some(j) => {
            let graph = csa.graph().unwrap();
            let (stop, time) = j.replay(&graph, q.origin as usize, q.departure).unwrap();
            assert_eq!(stop, q.destination as usize);
            time
        }
        None => UNREACHABLE,
    }
}

#[test]
fn matches_brute_force() {
    for seed in 0..SEEDS {
        let network = network(seed);
        let mut csa = CsaAlgorithm::new();
        csa.init(&network).unwrap();
        let graph = csa.graph().unwrap();
        for q in queries(seed) {
            let expected = brute_force(&graph, q.origin as usize, q.departure);
            assert_eq!(
                arrival(&mut csa, q),
                expected[q.destination as usize],
                "seed {} query {:?}",
                seed,
                q
            );
        }
    }
}

#[test]
fn journeys_replay_to_reported_arrival() {
    for seed in 0..SEEDS {
        let network = network(seed);
        let mut csa = CsaAlgorithm::new();
        csa.init(&network).unwrap();
        let graph = csa.graph().unwrap();
        for q in queries(seed) {
            if q.origin == q.destination {
                continue;
            }
            let journeys = csa.query(q).unwrap();
            let Some(journey) = journeys.first() else {
                assert!(!csa.state().is_reachable(q.destination as usize));
                continue;
            };
            let reported = csa.state().earliest_arrival(q.destination as usize);
            assert_eq!(
                journey.replay(&graph, q.origin as usize, q.departure),
                Ok((q.destination as usize, reported))
            );
            for leg in &journey.legs {
                if let Leg::Ride { trip, connections } = leg {
                    let trip_ids: Vec<usize> = graph.trip(*trip).map(|c| c.id).collect();
                    let first = trip_ids.iter().position(|c| *c == connections[0]).unwrap();
                    assert_eq!(&trip_ids[first..first + connections.len()], connections.as_slice());
                }
            }
        }
    }
}

#[test]
fn deterministic() {
    let network = network(3);
    let mut first = CsaAlgorithm::new();
    let mut second = CsaAlgorithm::new();
    first.init(&network).unwrap();
    second.init(&network).unwrap();
    for q in queries(3) {
        let a = first.query(q).unwrap();
        assert_eq!(first.query(q).unwrap(), a);
        assert_eq!(second.query(q).unwrap(), a);
    }
}

#[test]
fn later_departure_never_arrives_earlier() {
    for seed in 0..SEEDS {
        let network = network(seed);
        let mut csa = CsaAlgorithm::new();
        csa.init(&network).unwrap();
        for q in queries(seed).iter().take(20) {
            let mut last = 0;
            for departure in (0..=2000).step_by(100) {
                let t = arrival(&mut csa, Query::new(q.origin, q.destination, departure));
                assert!(t >= last, "seed {} {:?} at {}: {} < {}", seed, q, departure, t, last);
                last = t;
            }
        }
    }
}

#[test]
fn concurrent_queries_share_graph() {
    let network = network(5);
    let mut csa = CsaAlgorithm::new();
    csa.init(&network).unwrap();
    let qs = queries(5);
    let sequential: Vec<_> = qs.iter().map(|q| csa.query(*q).unwrap()).collect();

    let graph: Arc<TimeExpandedGraph> = csa.graph().unwrap();
    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = qs
            .chunks(15)
            .map(|chunk| {
                let graph = Arc::clone(&graph);
                scope.spawn(move || {
                    let mut state = ScanState::new(&graph);
                    chunk
                        .iter()
                        .map(|q| csa::earliest_arrival(&graph, &mut state, *q).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(parallel, sequential);
}
