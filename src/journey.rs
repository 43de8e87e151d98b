use serde::{Deserialize, Serialize};

use crate::error::ReplayError;
use crate::graph::TimeExpandedGraph;
use crate::types::{ConnectionIdx, FootpathIdx, StopIdx, Time, TripIdx};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Leg {
    /// Consecutive connections of one trip, in travel order.
    Ride {
        trip: TripIdx,
        connections: Vec<ConnectionIdx>,
    },
    Transfer {
        footpath: FootpathIdx,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Journey {
    pub legs: Vec<Leg>,
}

impl Journey {
    pub fn new(legs: Vec<Leg>) -> Journey {
        Journey { legs }
    }

    pub fn rides(&self) -> usize {
        self.legs.iter().filter(|l| matches!(l, Leg::Ride { .. })).count()
    }

    /// Walks the legs from `origin` at `departure` and returns where and when the
    /// traveller ends up.
    pub fn replay(&self, graph: &TimeExpandedGraph, origin: StopIdx, departure: Time) -> Result<(StopIdx, Time), ReplayError> {
        let mut stop = origin;
        let mut time = departure;
        for (leg_idx, leg) in self.legs.iter().enumerate() {
            match leg {
                Leg::Transfer { footpath } => {
                    if *footpath >= graph.footpaths().len() {
                        return Err(ReplayError::OutOfRange { leg: leg_idx });
                    }
                    let f = graph.footpath(*footpath);
                    if f.from_idx != stop {
                        return Err(ReplayError::Disconnected {
                            leg: leg_idx,
                            expected: f.from_idx,
                            actual: stop,
                        });
                    }
                    stop = f.to_idx;
                    time = time.saturating_add(f.duration);
                }
                Leg::Ride { trip, connections } => {
                    let first = match connections.first() {
                        Some(c) => *c,
                        None => return Err(ReplayError::EmptyRide { leg: leg_idx }),
                    };
                    if connections.iter().any(|c| *c >= graph.connections().len()) {
                        return Err(ReplayError::OutOfRange { leg: leg_idx });
                    }
                    let board = graph.connection(first);
                    if board.from_idx != stop {
                        return Err(ReplayError::Disconnected {
                            leg: leg_idx,
                            expected: board.from_idx,
                            actual: stop,
                        });
                    }
                    if board.departure < time {
                        return Err(ReplayError::MissedDeparture {
                            leg: leg_idx,
                            departure: board.departure,
                            ready: time,
                        });
                    }
                    for pair in connections.windows(2) {
                        let next = graph.connection(pair[1]);
                        if next.trip_predecessor != Some(pair[0]) {
                            return Err(ReplayError::BrokenRide { leg: leg_idx, trip: *trip });
                        }
                    }
                    if connections.iter().any(|c| graph.connection(*c).trip_idx != *trip) {
                        return Err(ReplayError::BrokenRide { leg: leg_idx, trip: *trip });
                    }
                    let alight = graph.connection(connections[connections.len() - 1]);
                    stop = alight.to_idx;
                    time = alight.arrival;
                }
            }
        }
        Ok((stop, time))
    }
}
