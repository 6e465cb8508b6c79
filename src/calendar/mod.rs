use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::warn;

use crate::gtfs::{self, GtfsReader};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Gtfs error: {0}")]
    Gtfs(#[from] gtfs::Error),
    #[error("Feed declares no agency, cannot resolve the schedule timezone")]
    MissingAgency,
    #[error("Unknown agency timezone: {0}")]
    UnknownTimezone(String),
}

/// Weekly applicability pattern of one service identifier, bounded by a date
/// range (the `calendar.txt` semantics).
#[derive(Debug, Clone)]
pub struct ServiceRule {
    pub service_id: Arc<str>,
    /// Monday through Sunday.
    pub weekdays: [bool; 7],
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A single-date override of the weekly pattern (the `calendar_dates.txt`
/// semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exception {
    Added,
    Removed,
}

/// Resolves which service identifiers run on a given calendar date, and
/// anchors service days to instants via the agency timezone.
#[derive(Debug, Clone)]
pub struct ServiceCalendar {
    timezone: Tz,
    rules: Vec<ServiceRule>,
    exceptions: HashMap<NaiveDate, Vec<(Arc<str>, Exception)>>,
}

impl ServiceCalendar {
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            rules: Vec::new(),
            exceptions: HashMap::new(),
        }
    }

    /// Reads `agency.txt` (for the timezone), `calendar.txt` and
    /// `calendar_dates.txt`. Either calendar table may be absent from the
    /// feed; a feed may express its whole calendar as date exceptions.
    pub fn load_gtfs(gtfs: &GtfsReader) -> Result<Self, self::Error> {
        let mut timezone: Option<String> = None;
        gtfs.stream_agencies(|(_, agency)| {
            if timezone.is_none() {
                timezone = Some(agency.agency_timezone);
            }
        })?;
        let raw = timezone.ok_or(self::Error::MissingAgency)?;
        let timezone: Tz = raw
            .parse()
            .map_err(|_| self::Error::UnknownTimezone(raw.clone()))?;

        let mut calendar = Self::new(timezone);
        optional_table(gtfs.stream_calendars(|(_, row)| {
            let (Some(start), Some(end)) = (parse_date(&row.start_date), parse_date(&row.end_date))
            else {
                warn!("Dropping calendar row for {} with malformed dates", row.service_id);
                return;
            };
            let weekdays = [
                row.monday, row.tuesday, row.wednesday, row.thursday, row.friday, row.saturday,
                row.sunday,
            ]
            .map(|flag| flag != 0);
            calendar.rule(&row.service_id, weekdays, start, end);
        }))?;
        optional_table(gtfs.stream_calendar_dates(|(_, row)| {
            let Some(date) = parse_date(&row.date) else {
                warn!("Dropping calendar exception for {} with malformed date", row.service_id);
                return;
            };
            let exception = match row.exception_type {
                1 => Exception::Added,
                2 => Exception::Removed,
                other => {
                    warn!("Dropping calendar exception for {} with unknown type {other}", row.service_id);
                    return;
                }
            };
            calendar.exception(&row.service_id, date, exception);
        }))?;
        Ok(calendar)
    }

    pub fn rule(
        &mut self,
        service_id: &str,
        weekdays: [bool; 7],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> &mut Self {
        self.rules.push(ServiceRule {
            service_id: service_id.into(),
            weekdays,
            start_date,
            end_date,
        });
        self
    }

    pub fn exception(&mut self, service_id: &str, date: NaiveDate, exception: Exception) -> &mut Self {
        self.exceptions
            .entry(date)
            .or_default()
            .push((service_id.into(), exception));
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The set of service identifiers running on the given date. Dates
    /// outside the calendar's coverage resolve to the empty set.
    pub fn service_ids_on(&self, date: NaiveDate) -> HashSet<Arc<str>> {
        let weekday = date.weekday().num_days_from_monday() as usize;
        let mut ids: HashSet<Arc<str>> = self
            .rules
            .iter()
            .filter(|rule| {
                rule.start_date <= date && date <= rule.end_date && rule.weekdays[weekday]
            })
            .map(|rule| rule.service_id.clone())
            .collect();
        if let Some(exceptions) = self.exceptions.get(&date) {
            for (service_id, exception) in exceptions {
                match exception {
                    Exception::Added => {
                        ids.insert(service_id.clone());
                    }
                    Exception::Removed => {
                        ids.remove(service_id);
                    }
                }
            }
        }
        ids
    }

    /// The calendar date containing the given instant, in the agency timezone.
    pub fn service_date_of(&self, epoch_seconds: i64) -> NaiveDate {
        let utc = DateTime::from_timestamp(epoch_seconds, 0).unwrap_or_default();
        utc.with_timezone(&self.timezone).date_naive()
    }

    /// Epoch second at which the given service day begins. Anchored at local
    /// noon minus 12h rather than local midnight: on DST transition days
    /// midnight can be absent or ambiguous, noon never is.
    pub fn service_day_origin(&self, date: NaiveDate) -> i64 {
        let noon = date.and_hms_opt(12, 0, 0).unwrap();
        let noon_instant = match self.timezone.from_local_datetime(&noon) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp(),
            LocalResult::None => noon.and_utc().timestamp(),
        };
        noon_instant - 12 * 3600
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y%m%d").ok()
}

/// Both calendar tables are optional in a static feed.
fn optional_table(result: Result<(), gtfs::Error>) -> Result<(), gtfs::Error> {
    match result {
        Err(gtfs::Error::FileNotFound(_)) => Ok(()),
        other => other,
    }
}
