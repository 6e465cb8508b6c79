use std::{collections::HashSet, time::Instant};

use chrono::{Duration, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::{
    calendar::ServiceCalendar,
    index::{TripIntervalIndex, TripSpan},
    schedule::{Schedule, StopTime, Trip},
    shared::time::SECONDS_PER_DAY,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Schedule has no timed stop-times, cannot bound the service-day lookback")]
    EmptySchedule,
}

/// One query hit: a scheduled trip running somewhere inside the queried
/// window, pinned to the service day it runs under.
///
/// `start_second` and `end_second` are the trip's span bounds relative to
/// `service_date` — for a trip surfacing through the lookback they stay in
/// the previous day's coordinates (a 23:55 departure stays `86_100` even
/// when the query window lies in the next calendar morning).
#[derive(Debug, Clone)]
pub struct ActivatedTrip<'a> {
    pub service_date: NaiveDate,
    pub trip: &'a Trip,
    pub start_second: u32,
    pub end_second: u32,
    pub stop_times: &'a [StopTime],
}

/// Finds the scheduled trips active during an absolute time window.
///
/// Built once over an immutable [`Schedule`] snapshot; after construction it
/// is read-only and queries may run concurrently. A query walks backward over
/// candidate service days (bounded by the longest trip duration observed in
/// the schedule), translates the absolute window into each day's relative
/// coordinates, and filters index hits by route and calendar applicability.
pub struct TripActivator<'a> {
    schedule: &'a Schedule,
    calendar: &'a ServiceCalendar,
    index: TripIntervalIndex,
    max_lookback_days: u32,
}

impl<'a> TripActivator<'a> {
    /// Derives every trip's span, builds the interval index and computes the
    /// lookback bound. Fails when the schedule carries no timed stop-time
    /// anywhere, since no lookback can be derived from it.
    pub fn new(schedule: &'a Schedule, calendar: &'a ServiceCalendar) -> Result<Self, self::Error> {
        let now = Instant::now();
        let max_lookback_days = max_lookback_days(schedule)?;
        let spans: Vec<TripSpan> = schedule
            .trips
            .iter()
            .filter_map(|trip| {
                TripSpan::from_stop_times(trip.index, schedule.stop_times_by_trip_idx(trip.index))
            })
            .collect();
        let index = TripIntervalIndex::build(spans);
        debug!(
            "Indexed {} of {} trips with a lookback of {max_lookback_days} day(s) in {:?}",
            index.len(),
            schedule.trips.len(),
            now.elapsed()
        );
        Ok(Self {
            schedule,
            calendar,
            index,
            max_lookback_days,
        })
    }

    /// How many service days back from a query's start date are considered.
    pub fn max_lookback_days(&self) -> u32 {
        self.max_lookback_days
    }

    /// Lazily yields every trip on one of `route_ids` whose span intersects
    /// the absolute window `[start_epoch, end_epoch]` on some candidate
    /// service day. The same trip may surface under two candidate days when
    /// its interval genuinely overlaps both relative windows; no
    /// deduplication is applied. An empty result is an ordinary outcome,
    /// never an error.
    pub fn active_trips<'q>(
        &'q self,
        start_epoch: i64,
        end_epoch: i64,
        route_ids: &'q HashSet<&'q str>,
    ) -> impl Iterator<Item = ActivatedTrip<'a>> + 'q {
        let start_date = self.calendar.service_date_of(start_epoch);
        (0..i64::from(self.max_lookback_days)).flat_map(move |days_back| {
            let service_date = start_date - Duration::days(days_back);
            self.active_on(service_date, start_epoch, end_epoch, route_ids)
        })
    }

    /// Single-route convenience over [`Self::active_trips`].
    pub fn active_trips_on_route(
        &self,
        start_epoch: i64,
        end_epoch: i64,
        route_id: &str,
    ) -> Vec<ActivatedTrip<'a>> {
        let route_ids = HashSet::from([route_id]);
        self.active_trips(start_epoch, end_epoch, &route_ids)
            .collect()
    }

    /// One candidate service day: translate the window into the day's
    /// relative seconds (possibly negative or past 86400 — that offset is
    /// exactly what surfaces a late-previous-night trip the next morning),
    /// query the index and filter.
    fn active_on<'q>(
        &'q self,
        service_date: NaiveDate,
        start_epoch: i64,
        end_epoch: i64,
        route_ids: &'q HashSet<&'q str>,
    ) -> impl Iterator<Item = ActivatedTrip<'a>> + 'q {
        let service_ids = self.calendar.service_ids_on(service_date);
        let origin = self.calendar.service_day_origin(service_date);
        let q_start = start_epoch - origin;
        let q_end = end_epoch - origin;
        self.index
            .overlapping(q_start, q_end)
            .into_iter()
            .filter_map(move |span| {
                let route = self.schedule.route_by_trip_idx(span.trip_idx);
                if !route_ids.contains(route.id.as_ref()) {
                    return None;
                }
                let service_id = self.schedule.service_by_trip_idx(span.trip_idx);
                if !service_ids.contains(service_id) {
                    return None;
                }
                Some(ActivatedTrip {
                    service_date,
                    trip: &self.schedule.trips[span.trip_idx as usize],
                    start_second: span.min_second,
                    end_second: span.max_second,
                    stop_times: self.schedule.stop_times_by_trip_idx(span.trip_idx),
                })
            })
    }
}

/// Upper bound on how many service days back a still-running trip can have
/// started: the longest observed stop-time second across the whole schedule,
/// in whole days rounded up.
fn max_lookback_days(schedule: &Schedule) -> Result<u32, Error> {
    let max_second = schedule
        .stop_times
        .iter()
        .flat_map(|st| [st.arrival, st.departure])
        .flatten()
        .map(|time| time.as_seconds())
        .max()
        .ok_or(Error::EmptySchedule)?;
    Ok((f64::from(max_second) / f64::from(SECONDS_PER_DAY)).ceil() as u32)
}
