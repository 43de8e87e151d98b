use crate::types::{Time, TripIdx};

/// A raw network that cannot be indexed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("stop {stop} references station {station}, but there are only {station_count} stations")]
    StationOutOfRange {
        stop: usize,
        station: usize,
        station_count: usize,
    },

    #[error("{item} references stop {stop}, but there are only {stop_count} stops")]
    StopOutOfRange {
        item: String,
        stop: usize,
        stop_count: usize,
    },

    #[error("connection {connection} references trip {trip}, but there are only {trip_count} trips")]
    TripOutOfRange {
        connection: usize,
        trip: TripIdx,
        trip_count: usize,
    },

    #[error("connection {connection} arrives at {arrival} before it departs at {departure}")]
    ArrivalBeforeDeparture {
        connection: usize,
        departure: Time,
        arrival: Time,
    },

    #[error("connection {connection} of trip {trip} does not continue connection {previous}")]
    BrokenTrip {
        trip: TripIdx,
        previous: usize,
        connection: usize,
    },
}

/// Rejections raised while assembling a network from external ids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("service window must span 0 to {max} seconds, got {seconds}")]
    InvalidWindow { seconds: i64, max: Time },

    #[error("stop with id '{0}' is already registered")]
    DuplicateStop(String),

    #[error("stop with id '{0}' is not registered")]
    UnknownStop(String),

    #[error("connection of trip '{0}' departs after it arrives")]
    DepartureAfterArrival(String),

    #[error("footpath from '{from}' to '{to}' has a negative duration")]
    NegativeDuration { from: String, to: String },

    #[error("footpath between '{from}' and '{to}' is already registered")]
    DuplicateFootpath { from: String, to: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode network: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("cannot decode network: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Errors surfaced through the algorithm contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("malformed network: {0}")]
    MalformedNetwork(#[from] NetworkError),

    #[error("algorithm is already initialized")]
    AlreadyInitialized,

    #[error("algorithm is not initialized")]
    NotInitialized,

    #[error("stop id {stop} is out of range, the network has {stop_count} stops")]
    InvalidStopId { stop: u32, stop_count: usize },

    #[error("journey trail is inconsistent at stop {stop}")]
    InconsistentTrail { stop: usize },
}

impl AlgorithmError {
    /// Nonzero status code reported across the init boundary.
    pub fn status_code(&self) -> i32 {
        match self {
            AlgorithmError::MalformedNetwork(_) => 1,
            AlgorithmError::AlreadyInitialized => 2,
            AlgorithmError::NotInitialized => 3,
            AlgorithmError::InvalidStopId { .. } => 4,
            AlgorithmError::InconsistentTrail { .. } => 5,
        }
    }
}

/// A journey whose legs cannot be replayed against the graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("leg {leg} starts at stop {expected} but the traveller is at stop {actual}")]
    Disconnected {
        leg: usize,
        expected: usize,
        actual: usize,
    },

    #[error("leg {leg} departs at {departure}, before the traveller arrives at {ready}")]
    MissedDeparture {
        leg: usize,
        departure: Time,
        ready: Time,
    },

    #[error("ride leg {leg} is empty")]
    EmptyRide { leg: usize },

    #[error("ride leg {leg} is not a contiguous part of trip {trip}")]
    BrokenRide { leg: usize, trip: TripIdx },

    #[error("leg {leg} references an index outside the graph")]
    OutOfRange { leg: usize },
}
