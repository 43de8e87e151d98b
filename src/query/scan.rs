//! Forward connection scan computing earliest arrival times.

use crate::graph::TimeExpandedGraph;
use crate::types::{ConnectionIdx, FootpathIdx, StopIdx, Time, UNREACHABLE};

/// Connections of the trip that brought the traveller to a stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RideTrail {
    pub boarded: ConnectionIdx,
    pub alighted: ConnectionIdx,
}

/// How the current earliest arrival at a stop was achieved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Trail {
    pub ride: Option<RideTrail>,
    /// Walked after the ride, or straight from the origin if there is no ride.
    pub footpath: Option<FootpathIdx>,
}

/// Per-query state. Sized from the graph; reused across sequential queries and never
/// shared between queries running at the same time.
#[derive(Debug, Default)]
pub struct ScanState {
    earliest_arrival: Vec<Time>,
    trip_boarded: Vec<Option<ConnectionIdx>>,
    trail: Vec<Option<Trail>>,
}

impl ScanState {
    pub fn new(graph: &TimeExpandedGraph) -> ScanState {
        let mut state = ScanState::default();
        state.reset(graph);
        state
    }

    /// Clears all labels, keeping the allocations.
    pub fn reset(&mut self, graph: &TimeExpandedGraph) {
        self.earliest_arrival.clear();
        self.earliest_arrival.resize(graph.stop_count(), UNREACHABLE);
        self.trip_boarded.clear();
        self.trip_boarded.resize(graph.trip_count(), None);
        self.trail.clear();
        self.trail.resize(graph.stop_count(), None);
    }

    #[inline(always)]
    pub fn earliest_arrival(&self, stop_idx: StopIdx) -> Time {
        self.earliest_arrival[stop_idx]
    }

    #[inline(always)]
    pub fn trail(&self, stop_idx: StopIdx) -> Option<Trail> {
        self.trail[stop_idx]
    }

    pub fn trip_boarded(&self, trip_idx: usize) -> Option<ConnectionIdx> {
        self.trip_boarded[trip_idx]
    }

    pub fn is_reachable(&self, stop_idx: StopIdx) -> bool {
        self.earliest_arrival[stop_idx] != UNREACHABLE
    }
}

/// Runs one scan from `origin` departing at `departure`. With a `target`, the sweep
/// stops once no remaining connection can improve the target's arrival.
///
/// Stop indices must be in range.
pub fn scan(graph: &TimeExpandedGraph, state: &mut ScanState, origin: StopIdx, departure: Time, target: Option<StopIdx>) {
    state.reset(graph);

    state.earliest_arrival[origin] = departure;
    for f in graph.footpaths_from(origin) {
        let arrival = departure.saturating_add(f.duration);
        if arrival < state.earliest_arrival[f.to_idx] {
            state.earliest_arrival[f.to_idx] = arrival;
            state.trail[f.to_idx] = Some(Trail {
                ride: None,
                footpath: Some(f.id),
            });
        }
    }

    let start = graph.first_departure_at_or_after(departure);
    for c in &graph.connections()[start..] {
        if let Some(t) = target {
            if c.departure >= state.earliest_arrival[t] {
                break;
            }
        }
        let boarded = match state.trip_boarded[c.trip_idx] {
            Some(b) => b,
            None => {
                if state.earliest_arrival[c.from_idx] > c.departure {
                    continue;
                }
                state.trip_boarded[c.trip_idx] = Some(c.id);
                c.id
            }
        };
        if c.arrival < state.earliest_arrival[c.to_idx] {
            let ride = Some(RideTrail {
                boarded,
                alighted: c.id,
            });
            state.earliest_arrival[c.to_idx] = c.arrival;
            state.trail[c.to_idx] = Some(Trail { ride, footpath: None });
            for f in graph.footpaths_from(c.to_idx) {
                let arrival = c.arrival.saturating_add(f.duration);
                if arrival < state.earliest_arrival[f.to_idx] {
                    state.earliest_arrival[f.to_idx] = arrival;
                    state.trail[f.to_idx] = Some(Trail {
                        ride,
                        footpath: Some(f.id),
                    });
                }
            }
        }
    }
}
