//! Assembles a [`Network`] from externally keyed stops, trips and footpaths.
//!
//! Wall-clock times are converted to seconds since the start of the service window;
//! connections outside the window are dropped.

use chrono::{Duration, NaiveDateTime};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use super::Network;
use crate::error::BuilderError;
use crate::types::{StationIdx, StopIdx, Time, TripIdx};

pub struct NetworkBuilder {
    start: NaiveDateTime,
    end: NaiveDateTime,
    stops: IndexMap<String, StopIdx>,
    stations: IndexMap<String, StationIdx>,
    trips: IndexMap<String, TripIdx>,
    footpath_pairs: FxHashSet<(StopIdx, StopIdx)>,
    network: Network,
}

impl NetworkBuilder {
    /// Fails if the window is negative or does not fit into [`Time`] seconds.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<NetworkBuilder, BuilderError> {
        let seconds = (end - start).num_seconds();
        if seconds < 0 || seconds >= Time::MAX as i64 {
            return Err(BuilderError::InvalidWindow { seconds, max: Time::MAX });
        }
        Ok(NetworkBuilder {
            start,
            end,
            stops: IndexMap::new(),
            stations: IndexMap::new(),
            trips: IndexMap::new(),
            footpath_pairs: FxHashSet::default(),
            network: Network::new(),
        })
    }

    pub fn add_stop(&mut self, id: &str, lat: f64, lon: f64, station_id: Option<&str>) -> Result<StopIdx, BuilderError> {
        if self.stops.contains_key(id) {
            return Err(BuilderError::DuplicateStop(id.to_string()));
        }
        let station_idx = match station_id {
            Some(s) => match self.stations.get(s) {
                Some(idx) => *idx,
                None => {
                    let idx = self.network.add_station();
                    self.stations.insert(s.to_string(), idx);
                    idx
                }
            },
            None => self.network.add_station(),
        };
        let stop_idx = self.network.add_stop(lat, lon, Some(station_idx));
        self.stops.insert(id.to_string(), stop_idx);
        Ok(stop_idx)
    }

    /// Returns `None` when the connection lies outside the service window.
    pub fn add_connection(&mut self, trip_id: &str, from_id: &str, to_id: &str, departure: NaiveDateTime, arrival: NaiveDateTime) -> Result<Option<usize>, BuilderError> {
        let from_idx = self.stop_idx(from_id)?;
        let to_idx = self.stop_idx(to_id)?;
        if departure < self.start || arrival > self.end {
            return Ok(None);
        }
        if departure > arrival {
            return Err(BuilderError::DepartureAfterArrival(trip_id.to_string()));
        }
        let trip_idx = match self.trips.get(trip_id) {
            Some(idx) => *idx,
            None => {
                let idx = self.network.add_trip();
                self.trips.insert(trip_id.to_string(), idx);
                idx
            }
        };
        let departure = self.to_time(departure);
        let arrival = self.to_time(arrival);
        Ok(Some(self.network.add_connection(trip_idx, from_idx, to_idx, departure, arrival)))
    }

    pub fn add_footpath(&mut self, from_id: &str, to_id: &str, duration: Duration) -> Result<usize, BuilderError> {
        let from_idx = self.stop_idx(from_id)?;
        let to_idx = self.stop_idx(to_id)?;
        if duration < Duration::zero() {
            return Err(BuilderError::NegativeDuration {
                from: from_id.to_string(),
                to: to_id.to_string(),
            });
        }
        let pair = (from_idx.min(to_idx), from_idx.max(to_idx));
        if !self.footpath_pairs.insert(pair) {
            return Err(BuilderError::DuplicateFootpath {
                from: from_id.to_string(),
                to: to_id.to_string(),
            });
        }
        let duration = Time::try_from(duration.num_seconds()).unwrap_or(Time::MAX);
        Ok(self.network.add_footpath(from_idx, to_idx, duration))
    }

    pub fn stop_idx(&self, id: &str) -> Result<StopIdx, BuilderError> {
        self.stops
            .get(id)
            .copied()
            .ok_or_else(|| BuilderError::UnknownStop(id.to_string()))
    }

    pub fn trip_idx(&self, id: &str) -> Option<TripIdx> {
        self.trips.get(id).copied()
    }

    pub fn to_time(&self, t: NaiveDateTime) -> Time {
        (t - self.start).num_seconds() as Time
    }

    /// Sorted network, ready to be indexed.
    pub fn finish(mut self) -> Network {
        self.network.sort();
        self.network
    }
}
