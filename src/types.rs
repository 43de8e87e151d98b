/// Seconds since the epoch shared by the whole network.
pub type Time = u32;

/// Larger than any valid time.
pub const UNREACHABLE: Time = Time::MAX;

pub type StopIdx = usize;
pub type TripIdx = usize;
pub type StationIdx = usize;
pub type ConnectionIdx = usize;
pub type FootpathIdx = usize;
