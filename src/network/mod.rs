pub mod builder;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::types::{StationIdx, StopIdx, Time, TripIdx};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Stop {
    pub station_idx: StationIdx,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub trip_idx: TripIdx,
    pub from_idx: StopIdx,
    pub to_idx: StopIdx,
    pub departure: Time,
    pub arrival: Time,
}

impl Connection {
    pub fn new(trip_idx: TripIdx, from_idx: StopIdx, to_idx: StopIdx, departure: Time, arrival: Time) -> Connection {
        Connection {
            trip_idx,
            from_idx,
            to_idx,
            departure,
            arrival,
        }
    }
}

/// Undirected walking transfer between two stops.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Footpath {
    pub a_idx: StopIdx,
    pub b_idx: StopIdx,
    pub duration: Time,
}

/// Raw network as handed over by a producer. Ids are dense and zero-based; nothing is
/// validated until the network is indexed into a graph.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Network {
    pub stops: Vec<Stop>,
    pub connections: Vec<Connection>,
    pub footpaths: Vec<Footpath>,
    pub station_count: usize,
    pub trip_count: usize,
}

impl Network {
    pub fn new() -> Network {
        Network::default()
    }

    pub fn add_station(&mut self) -> StationIdx {
        self.station_count += 1;
        self.station_count - 1
    }

    /// Adds a stop to an existing station, or to a fresh one of its own.
    pub fn add_stop(&mut self, lat: f64, lon: f64, station_idx: Option<StationIdx>) -> StopIdx {
        let station_idx = match station_idx {
            Some(s) => s,
            None => self.add_station(),
        };
        self.stops.push(Stop { station_idx, lat, lon });
        self.stops.len() - 1
    }

    pub fn add_trip(&mut self) -> TripIdx {
        self.trip_count += 1;
        self.trip_count - 1
    }

    pub fn add_connection(&mut self, trip_idx: TripIdx, from_idx: StopIdx, to_idx: StopIdx, departure: Time, arrival: Time) -> usize {
        self.connections.push(Connection::new(trip_idx, from_idx, to_idx, departure, arrival));
        self.connections.len() - 1
    }

    /// Footpaths are stored with the smaller stop id first.
    pub fn add_footpath(&mut self, a_idx: StopIdx, b_idx: StopIdx, duration: Time) -> usize {
        let (a_idx, b_idx) = if a_idx > b_idx { (b_idx, a_idx) } else { (a_idx, b_idx) };
        self.footpaths.push(Footpath { a_idx, b_idx, duration });
        self.footpaths.len() - 1
    }

    /// Orders connections by departure then arrival time, footpaths by stop pair.
    pub fn sort(&mut self) {
        self.connections.sort_by_key(|c| (c.departure, c.arrival));
        self.footpaths.sort_by_key(|f| (f.a_idx, f.b_idx));
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let bytes = rmp_serde::to_vec(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Network, SnapshotError> {
        let bytes = fs::read(path)?;
        Ok(rmp_serde::from_slice(&bytes)?)
    }
}
