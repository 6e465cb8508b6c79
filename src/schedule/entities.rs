use std::sync::Arc;

use crate::shared::time::Time;

/// A grouping of trips riders see under a single name (e.g., "Blue Line").
#[derive(Debug, Default, Clone)]
pub struct Route {
    /// The global internal index used for O(1) array lookups in the schedule.
    pub index: u32,
    /// The unique external identifier.
    pub id: Arc<str>,
    pub agency_id: Option<Arc<str>>,
}

/// A single scheduled journey of a vehicle through a sequence of stops.
///
/// All of its times are relative to the start of the service day it runs on;
/// which days those are is decided by the service it is attached to.
#[derive(Debug, Default, Clone)]
pub struct Trip {
    pub index: u32,
    pub id: Arc<str>,
    /// Pointer to the parent [`Route`].
    pub route_idx: u32,
    /// Pointer into the schedule's service-id table.
    pub service_idx: u32,
    /// Pointer to the full range of stop-times for this trip.
    pub slice: StopTimeSlice,
}

/// Individual event within a trip where a vehicle calls at a stop.
#[derive(Debug, Default, Clone)]
pub struct StopTime {
    /// Global internal index of this stop-time record.
    pub index: u32,
    /// Internal index of the parent [`Trip`].
    pub trip_idx: u32,
    /// External identifier of the stop being called at.
    pub stop_id: Arc<str>,
    /// The order of this stop within the trip.
    pub sequence: u32,
    /// Scheduled arrival, seconds since service-day start. Unset on untimed stops.
    pub arrival: Option<Time>,
    /// Scheduled departure, seconds since service-day start. Unset on untimed stops.
    pub departure: Option<Time>,
}

/// Metadata describing a contiguous range within the global `stop_times` array.
#[derive(Default, Debug, Clone, Copy)]
pub struct StopTimeSlice {
    /// The index where the trip's stop-times begin.
    pub start_idx: u32,
    /// The total number of stops in the trip.
    pub count: u32,
}
