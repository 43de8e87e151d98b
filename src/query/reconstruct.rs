use crate::error::AlgorithmError;
use crate::graph::TimeExpandedGraph;
use crate::journey::{Journey, Leg};
use crate::types::{ConnectionIdx, StopIdx};

use super::scan::{RideTrail, ScanState};

/// Follows the trail of a completed scan from `destination` back to `origin`.
///
/// The destination must be reachable. Each step moves to a stop whose arrival was
/// fixed no later than the current one, so a walk longer than the number of stops
/// means the trail is corrupt.
pub fn reconstruct(graph: &TimeExpandedGraph, state: &ScanState, origin: StopIdx, destination: StopIdx) -> Result<Journey, AlgorithmError> {
    let mut legs = vec![];
    let mut stop = destination;
    let mut steps = 0;
    while stop != origin {
        steps += 1;
        if steps > graph.stop_count() {
            return Err(AlgorithmError::InconsistentTrail { stop });
        }
        let trail = state
            .trail(stop)
            .ok_or(AlgorithmError::InconsistentTrail { stop })?;
        if trail.ride.is_none() && trail.footpath.is_none() {
            return Err(AlgorithmError::InconsistentTrail { stop });
        }
        if let Some(f) = trail.footpath {
            legs.push(Leg::Transfer { footpath: f });
            stop = graph.footpath(f).from_idx;
        }
        if let Some(ride) = trail.ride {
            let connections = ride_connections(graph, ride, stop)?;
            stop = graph.connection(ride.boarded).from_idx;
            legs.push(Leg::Ride {
                trip: graph.connection(ride.alighted).trip_idx,
                connections,
            });
        }
    }
    legs.reverse();
    Ok(Journey::new(legs))
}

/// Connections from the boarded one up to the alighted one, via trip predecessors.
fn ride_connections(graph: &TimeExpandedGraph, ride: RideTrail, stop: StopIdx) -> Result<Vec<ConnectionIdx>, AlgorithmError> {
    let mut connections = vec![ride.alighted];
    let mut current = ride.alighted;
    while current != ride.boarded {
        current = graph
            .connection(current)
            .trip_predecessor
            .ok_or(AlgorithmError::InconsistentTrail { stop })?;
        connections.push(current);
    }
    connections.reverse();
    Ok(connections)
}
