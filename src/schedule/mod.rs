use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Instant,
};

mod entities;
mod source;
pub use entities::*;

use crate::shared::time::Time;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Immutable snapshot of the static timetable, held in flat arenas addressed
/// by `u32` indices. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub routes: Box<[Route]>,
    pub trips: Box<[Trip]>,
    /// Every trip's stop-times, contiguous per trip and ordered by sequence.
    pub stop_times: Box<[StopTime]>,
    /// Distinct service identifiers referenced by trips.
    pub services: Box<[Arc<str>]>,

    route_lookup: HashMap<Arc<str>, u32>,
    trip_lookup: HashMap<Arc<str>, u32>,
}

impl Schedule {
    pub fn builder() -> ScheduleBuilder {
        ScheduleBuilder::default()
    }

    /// Get the route with the given external id.
    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        let index = self.route_lookup.get(id)?;
        Some(&self.routes[*index as usize])
    }

    /// Get the trip with the given external id.
    pub fn trip_by_id(&self, id: &str) -> Option<&Trip> {
        let index = self.trip_lookup.get(id)?;
        Some(&self.trips[*index as usize])
    }

    pub fn route_by_trip_idx(&self, trip_idx: u32) -> &Route {
        let trip = &self.trips[trip_idx as usize];
        &self.routes[trip.route_idx as usize]
    }

    pub fn service_by_trip_idx(&self, trip_idx: u32) -> &Arc<str> {
        let trip = &self.trips[trip_idx as usize];
        &self.services[trip.service_idx as usize]
    }

    /// The trip's stop-times, ordered by sequence.
    pub fn stop_times_by_trip_idx(&self, trip_idx: u32) -> &[StopTime] {
        let slice = self.trips[trip_idx as usize].slice;
        let start = slice.start_idx as usize;
        &self.stop_times[start..start + slice.count as usize]
    }
}

struct PendingStopTime {
    trip_id: String,
    stop_id: String,
    sequence: u32,
    arrival: Option<Time>,
    departure: Option<Time>,
}

/// Accumulates raw timetable rows and assembles them into a [`Schedule`].
/// Rows referencing unknown routes or trips are dropped with a warning
/// rather than failing the whole build.
#[derive(Default)]
pub struct ScheduleBuilder {
    routes: Vec<(String, Option<String>)>,
    trips: Vec<(String, String, String)>,
    stop_times: Vec<PendingStopTime>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn route(&mut self, id: &str, agency_id: Option<&str>) -> &mut Self {
        self.routes
            .push((id.to_string(), agency_id.map(|val| val.to_string())));
        self
    }

    pub fn trip(&mut self, id: &str, route_id: &str, service_id: &str) -> &mut Self {
        self.trips
            .push((id.to_string(), route_id.to_string(), service_id.to_string()));
        self
    }

    pub fn stop_time(
        &mut self,
        trip_id: &str,
        stop_id: &str,
        sequence: u32,
        arrival: Option<u32>,
        departure: Option<u32>,
    ) -> &mut Self {
        self.stop_times.push(PendingStopTime {
            trip_id: trip_id.to_string(),
            stop_id: stop_id.to_string(),
            sequence,
            arrival: arrival.map(Time::from_seconds),
            departure: departure.map(Time::from_seconds),
        });
        self
    }

    pub fn build(self) -> Schedule {
        let now = Instant::now();
        let mut schedule = Schedule::default();

        let mut route_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut routes: Vec<Route> = Vec::with_capacity(self.routes.len());
        for (id, agency_id) in self.routes {
            let id: Arc<str> = id.into();
            if route_lookup.contains_key(&id) {
                warn!("Dropping duplicate route {id}");
                continue;
            }
            let value = Route {
                index: routes.len() as u32,
                id: id.clone(),
                agency_id: agency_id.map(|val| val.into()),
            };
            route_lookup.insert(id, value.index);
            routes.push(value);
        }

        let mut service_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut services: Vec<Arc<str>> = Vec::new();
        let mut trip_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut trips: Vec<Trip> = Vec::with_capacity(self.trips.len());
        for (id, route_id, service_id) in self.trips {
            let id: Arc<str> = id.into();
            if trip_lookup.contains_key(&id) {
                warn!("Dropping duplicate trip {id}");
                continue;
            }
            let Some(route_idx) = route_lookup.get(route_id.as_str()) else {
                warn!("Dropping trip {id} on unknown route {route_id}");
                continue;
            };
            let service_idx = match service_lookup.get(service_id.as_str()) {
                Some(idx) => *idx,
                None => {
                    let service: Arc<str> = service_id.into();
                    let idx = services.len() as u32;
                    service_lookup.insert(service.clone(), idx);
                    services.push(service);
                    idx
                }
            };
            let value = Trip {
                index: trips.len() as u32,
                id: id.clone(),
                route_idx: *route_idx,
                service_idx,
                slice: Default::default(),
            };
            trip_lookup.insert(id, value.index);
            trips.push(value);
        }

        let mut stop_id_pool: HashSet<Arc<str>> = HashSet::new();
        let mut grouped: Vec<Vec<StopTime>> = vec![Vec::new(); trips.len()];
        for pending in self.stop_times {
            let Some(trip_idx) = trip_lookup.get(pending.trip_id.as_str()) else {
                warn!("Dropping stop-time for unknown trip {}", pending.trip_id);
                continue;
            };
            grouped[*trip_idx as usize].push(StopTime {
                index: 0,
                trip_idx: *trip_idx,
                stop_id: intern(&mut stop_id_pool, &pending.stop_id),
                sequence: pending.sequence,
                arrival: pending.arrival,
                departure: pending.departure,
            });
        }
        grouped
            .par_iter_mut()
            .for_each(|run| run.sort_unstable_by_key(|st| st.sequence));

        let total: usize = grouped.iter().map(|run| run.len()).sum();
        let mut stop_times: Vec<StopTime> = Vec::with_capacity(total);
        for (trip_idx, run) in grouped.into_iter().enumerate() {
            let slice = StopTimeSlice {
                start_idx: stop_times.len() as u32,
                count: run.len() as u32,
            };
            trips[trip_idx].slice = slice;
            for (j, mut st) in run.into_iter().enumerate() {
                st.index = slice.start_idx + j as u32;
                stop_times.push(st);
            }
        }

        schedule.routes = routes.into();
        schedule.trips = trips.into();
        schedule.stop_times = stop_times.into();
        schedule.services = services.into();
        schedule.route_lookup = route_lookup;
        schedule.trip_lookup = trip_lookup;
        debug!(
            "Assembled schedule with {} trips and {} stop-times in {:?}",
            schedule.trips.len(),
            schedule.stop_times.len(),
            now.elapsed()
        );
        schedule
    }
}

fn intern(pool: &mut HashSet<Arc<str>>, value: &str) -> Arc<str> {
    if let Some(hit) = pool.get(value) {
        return hit.clone();
    }
    let arc: Arc<str> = value.into();
    pool.insert(arc.clone());
    arc
}
