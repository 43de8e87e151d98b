//! Immutable time-expanded graph the connection scan runs on.
//!
//! Connections live in one array sorted by departure time. Footpaths, trips and
//! stations are contiguous index ranges computed once at build time, so "everything
//! leaving stop X" or "every connection of trip T" is a single slice lookup.

use std::ops::Range;

use itertools::Itertools;

use crate::error::NetworkError;
use crate::network::Network;
use crate::types::{ConnectionIdx, FootpathIdx, StationIdx, StopIdx, Time, TripIdx};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stop {
    pub station_idx: StationIdx,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionIdx,
    /// Position in the raw network the graph was built from.
    pub source_id: usize,
    pub trip_idx: TripIdx,
    pub from_idx: StopIdx,
    pub to_idx: StopIdx,
    pub departure: Time,
    pub arrival: Time,
    /// Previous connection of the same trip.
    pub trip_predecessor: Option<ConnectionIdx>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footpath {
    pub id: FootpathIdx,
    pub source_id: usize,
    pub from_idx: StopIdx,
    pub to_idx: StopIdx,
    pub duration: Time,
}

#[derive(Debug)]
pub struct TimeExpandedGraph {
    stops: Vec<Stop>,
    connections: Vec<Connection>,
    footpaths: Vec<Footpath>,
    footpath_offsets: Vec<usize>,
    trip_connections: Vec<ConnectionIdx>,
    trip_offsets: Vec<usize>,
    station_stops: Vec<StopIdx>,
    station_offsets: Vec<usize>,
    trip_count: usize,
    station_count: usize,
}

/// Counting pass followed by a fill pass. Returns the per-key offsets (`key_count + 1`
/// entries) and the item indices grouped by key, keeping input order within a group.
fn group_by_key(key_count: usize, keys: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = vec![0; key_count + 1];
    for k in keys {
        offsets[k + 1] += 1;
    }
    for i in 0..key_count {
        offsets[i + 1] += offsets[i];
    }
    let mut cursor = offsets.clone();
    let mut grouped = vec![0; keys.len()];
    for (i, k) in keys.iter().enumerate() {
        grouped[cursor[*k]] = i;
        cursor[*k] += 1;
    }
    (offsets, grouped)
}

impl TimeExpandedGraph {
    pub fn build(network: &Network) -> Result<TimeExpandedGraph, NetworkError> {
        validate(network)?;
        let stop_count = network.stops.len();

        let mut order: Vec<usize> = (0..network.connections.len()).collect();
        let sorted = network
            .connections
            .iter()
            .tuple_windows()
            .all(|(a, b)| (a.departure, a.arrival) <= (b.departure, b.arrival));
        if !sorted {
            log::warn!("connections are not sorted by departure and arrival time, sorting");
            order.sort_by_key(|i| {
                let c = &network.connections[*i];
                (c.departure, c.arrival)
            });
        }
        let mut connections: Vec<Connection> = order
            .iter()
            .enumerate()
            .map(|(id, source_id)| {
                let c = &network.connections[*source_id];
                Connection {
                    id,
                    source_id: *source_id,
                    trip_idx: c.trip_idx,
                    from_idx: c.from_idx,
                    to_idx: c.to_idx,
                    departure: c.departure,
                    arrival: c.arrival,
                    trip_predecessor: None,
                }
            })
            .collect();

        let trip_keys: Vec<usize> = connections.iter().map(|c| c.trip_idx).collect();
        let (trip_offsets, trip_connections) = group_by_key(network.trip_count, &trip_keys);
        for t in 0..network.trip_count {
            for (prev, next) in trip_connections[trip_offsets[t]..trip_offsets[t + 1]].iter().tuple_windows() {
                let (p, c) = (&connections[*prev], &connections[*next]);
                if p.to_idx != c.from_idx || p.arrival > c.departure {
                    return Err(NetworkError::BrokenTrip {
                        trip: t,
                        previous: p.source_id,
                        connection: c.source_id,
                    });
                }
                connections[*next].trip_predecessor = Some(*prev);
            }
        }

        let directed: Vec<(usize, StopIdx, StopIdx, Time)> = network
            .footpaths
            .iter()
            .enumerate()
            .filter(|(_, f)| f.a_idx != f.b_idx)
            .flat_map(|(i, f)| [(i, f.a_idx, f.b_idx, f.duration), (i, f.b_idx, f.a_idx, f.duration)])
            .collect();
        let footpath_keys: Vec<usize> = directed.iter().map(|f| f.1).collect();
        let (footpath_offsets, footpath_order) = group_by_key(stop_count, &footpath_keys);
        let footpaths: Vec<Footpath> = footpath_order
            .iter()
            .enumerate()
            .map(|(id, i)| {
                let (source_id, from_idx, to_idx, duration) = directed[*i];
                Footpath {
                    id,
                    source_id,
                    from_idx,
                    to_idx,
                    duration,
                }
            })
            .collect();

        let station_keys: Vec<usize> = network.stops.iter().map(|s| s.station_idx).collect();
        let (station_offsets, station_stops) = group_by_key(network.station_count, &station_keys);

        log::debug!(
            "built graph: {} stops, {} stations, {} trips, {} connections, {} directed footpaths",
            stop_count,
            network.station_count,
            network.trip_count,
            connections.len(),
            footpaths.len()
        );
        Ok(TimeExpandedGraph {
            stops: network
                .stops
                .iter()
                .map(|s| Stop {
                    station_idx: s.station_idx,
                })
                .collect(),
            connections,
            footpaths,
            footpath_offsets,
            trip_connections,
            trip_offsets,
            station_stops,
            station_offsets,
            trip_count: network.trip_count,
            station_count: network.station_count,
        })
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trip_count
    }

    pub fn station_count(&self) -> usize {
        self.station_count
    }

    pub fn stop(&self, stop_idx: StopIdx) -> &Stop {
        &self.stops[stop_idx]
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, id: ConnectionIdx) -> &Connection {
        &self.connections[id]
    }

    pub fn footpaths(&self) -> &[Footpath] {
        &self.footpaths
    }

    pub fn footpath(&self, id: FootpathIdx) -> &Footpath {
        &self.footpaths[id]
    }

    #[inline(always)]
    pub fn footpaths_from(&self, stop_idx: StopIdx) -> &[Footpath] {
        &self.footpaths[self.footpath_offsets[stop_idx]..self.footpath_offsets[stop_idx + 1]]
    }

    /// Connections of a trip in departure order.
    pub fn trip(&self, trip_idx: TripIdx) -> impl Iterator<Item = &Connection> + '_ {
        self.trip_connections[self.trip_range(trip_idx)]
            .iter()
            .map(|id| &self.connections[*id])
    }

    fn trip_range(&self, trip_idx: TripIdx) -> Range<usize> {
        self.trip_offsets[trip_idx]..self.trip_offsets[trip_idx + 1]
    }

    pub fn station_stops(&self, station_idx: StationIdx) -> &[StopIdx] {
        &self.station_stops[self.station_offsets[station_idx]..self.station_offsets[station_idx + 1]]
    }

    /// Index of the first connection departing at or after `time`.
    pub fn first_departure_at_or_after(&self, time: Time) -> ConnectionIdx {
        self.connections.partition_point(|c| c.departure < time)
    }
}

fn validate(network: &Network) -> Result<(), NetworkError> {
    let stop_count = network.stops.len();
    for (i, s) in network.stops.iter().enumerate() {
        if s.station_idx >= network.station_count {
            return Err(NetworkError::StationOutOfRange {
                stop: i,
                station: s.station_idx,
                station_count: network.station_count,
            });
        }
    }
    for (i, c) in network.connections.iter().enumerate() {
        for stop in [c.from_idx, c.to_idx] {
            if stop >= stop_count {
                return Err(NetworkError::StopOutOfRange {
                    item: format!("connection {}", i),
                    stop,
                    stop_count,
                });
            }
        }
        if c.trip_idx >= network.trip_count {
            return Err(NetworkError::TripOutOfRange {
                connection: i,
                trip: c.trip_idx,
                trip_count: network.trip_count,
            });
        }
        if c.arrival < c.departure {
            return Err(NetworkError::ArrivalBeforeDeparture {
                connection: i,
                departure: c.departure,
                arrival: c.arrival,
            });
        }
    }
    for (i, f) in network.footpaths.iter().enumerate() {
        for stop in [f.a_idx, f.b_idx] {
            if stop >= stop_count {
                return Err(NetworkError::StopOutOfRange {
                    item: format!("footpath {}", i),
                    stop,
                    stop_count,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> Network {
        let mut n = Network::new();
        let station = n.add_station();
        for _ in 0..4 {
            n.add_stop(0.0, 0.0, Some(station));
        }
        let t0 = n.add_trip();
        let t1 = n.add_trip();
        n.add_connection(t0, 1, 2, 30, 40);
        n.add_connection(t1, 0, 3, 5, 50);
        n.add_connection(t0, 0, 1, 10, 20);
        n.add_footpath(0, 2, 7);
        n.add_footpath(2, 3, 4);
        n.add_footpath(1, 1, 0);
        n
    }

    #[test]
    fn group_by_key_counts_then_fills() {
        let (offsets, grouped) = group_by_key(3, &[2, 0, 2, 1, 0]);
        assert_eq!(offsets, vec![0, 2, 3, 5]);
        assert_eq!(grouped, vec![1, 4, 3, 0, 2]);
    }

    #[test]
    fn connections_sorted_with_source_ids() {
        let g = TimeExpandedGraph::build(&network()).unwrap();
        let deps: Vec<Time> = g.connections().iter().map(|c| c.departure).collect();
        assert_eq!(deps, vec![5, 10, 30]);
        let sources: Vec<usize> = g.connections().iter().map(|c| c.source_id).collect();
        assert_eq!(sources, vec![1, 2, 0]);
        assert!(g.connections().iter().enumerate().all(|(i, c)| c.id == i));
    }

    #[test]
    fn trip_chain_predecessors() {
        let g = TimeExpandedGraph::build(&network()).unwrap();
        let trip: Vec<ConnectionIdx> = g.trip(0).map(|c| c.id).collect();
        assert_eq!(trip, vec![1, 2]);
        assert_eq!(g.connection(1).trip_predecessor, None);
        assert_eq!(g.connection(2).trip_predecessor, Some(1));
        assert_eq!(g.connection(0).trip_predecessor, None);
    }

    #[test]
    fn equal_departures_ordered_by_arrival() {
        let mut n = Network::new();
        for _ in 0..3 {
            n.add_stop(0.0, 0.0, None);
        }
        let t = n.add_trip();
        n.add_connection(t, 1, 2, 10, 20);
        n.add_connection(t, 0, 1, 10, 10);
        let g = TimeExpandedGraph::build(&n).unwrap();
        let hops: Vec<(StopIdx, StopIdx)> = g.trip(0).map(|c| (c.from_idx, c.to_idx)).collect();
        assert_eq!(hops, vec![(0, 1), (1, 2)]);
        assert_eq!(g.connection(1).trip_predecessor, Some(0));
    }

    #[test]
    fn footpaths_directed_and_grouped() {
        let g = TimeExpandedGraph::build(&network()).unwrap();
        assert_eq!(g.footpaths().len(), 4);
        let from2: Vec<(StopIdx, Time)> = g.footpaths_from(2).iter().map(|f| (f.to_idx, f.duration)).collect();
        assert_eq!(from2, vec![(0, 7), (3, 4)]);
        assert!(g.footpaths_from(1).is_empty());
        assert_eq!(g.footpaths_from(3)[0].source_id, 1);
        assert!(g.footpaths().iter().enumerate().all(|(i, f)| f.id == i));
    }

    #[test]
    fn stations_and_departure_lookup() {
        let g = TimeExpandedGraph::build(&network()).unwrap();
        assert_eq!(g.station_stops(0), &[0, 1, 2, 3]);
        assert_eq!(g.first_departure_at_or_after(0), 0);
        assert_eq!(g.first_departure_at_or_after(10), 1);
        assert_eq!(g.first_departure_at_or_after(11), 2);
        assert_eq!(g.first_departure_at_or_after(31), 3);
    }

    #[test]
    fn malformed_networks_rejected() {
        let mut n = network();
        n.connections[0].to_idx = 9;
        assert!(matches!(
            TimeExpandedGraph::build(&n),
            Err(NetworkError::StopOutOfRange { stop: 9, .. })
        ));

        let mut n = network();
        n.connections[1].trip_idx = 2;
        assert_eq!(
            TimeExpandedGraph::build(&n).unwrap_err(),
            NetworkError::TripOutOfRange {
                connection: 1,
                trip: 2,
                trip_count: 2
            }
        );

        let mut n = network();
        n.footpaths[0].b_idx = 4;
        assert!(matches!(
            TimeExpandedGraph::build(&n),
            Err(NetworkError::StopOutOfRange { stop: 4, .. })
        ));

        let mut n = network();
        n.stops[0].station_idx = 1;
        assert!(matches!(
            TimeExpandedGraph::build(&n),
            Err(NetworkError::StationOutOfRange { .. })
        ));

        let mut n = network();
        n.connections[0].from_idx = 3;
        assert_eq!(
            TimeExpandedGraph::build(&n).unwrap_err(),
            NetworkError::BrokenTrip {
                trip: 0,
                previous: 2,
                connection: 0
            }
        );

        let mut n = network();
        n.connections[2].arrival = 35;
        assert_eq!(
            TimeExpandedGraph::build(&n).unwrap_err(),
            NetworkError::BrokenTrip {
                trip: 0,
                previous: 2,
                connection: 0
            }
        );

        let mut n = network();
        n.connections[0].arrival = 29;
        assert!(matches!(
            TimeExpandedGraph::build(&n),
            Err(NetworkError::ArrivalBeforeDeparture { connection: 0, .. })
        ));
    }
}
