use std::time::Instant;

use crate::{
    gtfs::{self, GtfsReader},
    schedule::{Schedule, ScheduleBuilder},
    shared::time::Time,
};
use tracing::{debug, warn};

impl Schedule {
    /// Populates a schedule snapshot from the routes, trips and stop-times
    /// tables of a static feed.
    pub fn load_gtfs(gtfs: &GtfsReader) -> Result<Self, gtfs::Error> {
        let mut builder = ScheduleBuilder::new();

        debug!("Loading routes...");
        let now = Instant::now();
        gtfs.stream_routes(|(_, route)| {
            builder.route(&route.route_id, route.agency_id.as_deref());
        })?;
        debug!("Loading routes took {:?}", now.elapsed());

        debug!("Loading trips...");
        let now = Instant::now();
        gtfs.stream_trips(|(_, trip)| {
            builder.trip(&trip.trip_id, &trip.route_id, &trip.service_id);
        })?;
        debug!("Loading trips took {:?}", now.elapsed());

        debug!("Loading stop times...");
        let now = Instant::now();
        gtfs.stream_stop_times(|(_, stop_time)| {
            let arrival = parse_time(stop_time.arrival_time.as_deref(), &stop_time.trip_id);
            let departure = parse_time(stop_time.departure_time.as_deref(), &stop_time.trip_id);
            builder.stop_time(
                &stop_time.trip_id,
                &stop_time.stop_id,
                stop_time.stop_sequence,
                arrival,
                departure,
            );
        })?;
        debug!("Loading stop times took {:?}", now.elapsed());

        Ok(builder.build())
    }
}

fn parse_time(raw: Option<&str>, trip_id: &str) -> Option<u32> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    match Time::from_hms(raw) {
        Some(time) => Some(time.as_seconds()),
        None => {
            warn!("Unparseable stop-time {raw} on trip {trip_id}, treating as unset");
            None
        }
    }
}
