use chrono::NaiveDate;
use chrono_tz::Tz;
use tripline::calendar::{Exception, ServiceCalendar};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn weekday_calendar(tz: Tz) -> ServiceCalendar {
    let mut calendar = ServiceCalendar::new(tz);
    calendar.rule(
        "WKDY",
        [true, true, true, true, true, false, false],
        date(2017, 1, 1),
        date(2017, 12, 31),
    );
    calendar
}

#[test]
fn weekly_rule_applies_on_matching_weekdays() {
    let calendar = weekday_calendar(Tz::UTC);
    // 2017-03-15 is a Wednesday, 2017-03-18 a Saturday.
    assert!(calendar.service_ids_on(date(2017, 3, 15)).contains("WKDY"));
    assert!(calendar.service_ids_on(date(2017, 3, 18)).is_empty());
}

#[test]
fn dates_outside_coverage_resolve_empty() {
    let calendar = weekday_calendar(Tz::UTC);
    // A Monday, but past the rule's end date.
    assert!(calendar.service_ids_on(date(2018, 1, 1)).is_empty());
}

#[test]
fn exceptions_override_the_weekly_pattern() {
    let mut calendar = weekday_calendar(Tz::UTC);
    calendar.exception("WKDY", date(2017, 3, 18), Exception::Added);
    calendar.exception("WKDY", date(2017, 3, 15), Exception::Removed);

    assert!(calendar.service_ids_on(date(2017, 3, 18)).contains("WKDY"));
    assert!(calendar.service_ids_on(date(2017, 3, 15)).is_empty());
    // Other dates are untouched.
    assert!(calendar.service_ids_on(date(2017, 3, 16)).contains("WKDY"));
}

#[test]
fn exception_only_calendars_work_without_weekly_rules() {
    let mut calendar = ServiceCalendar::new(Tz::UTC);
    calendar.exception("HOL", date(2017, 7, 4), Exception::Added);
    assert!(calendar.service_ids_on(date(2017, 7, 4)).contains("HOL"));
    assert!(calendar.service_ids_on(date(2017, 7, 5)).is_empty());
}

#[test]
fn service_day_origin_utc() {
    let calendar = ServiceCalendar::new(Tz::UTC);
    // 2017-03-15T00:00:00Z
    assert_eq!(calendar.service_day_origin(date(2017, 3, 15)), 1_489_536_000);
}

#[test]
fn service_day_origin_honors_the_agency_timezone() {
    let calendar = ServiceCalendar::new(chrono_tz::America::New_York);
    // 2017-03-15 is in EDT (UTC-4): local midnight is 04:00Z.
    assert_eq!(calendar.service_day_origin(date(2017, 3, 15)), 1_489_550_400);
}

#[test]
fn service_date_is_the_local_calendar_date() {
    let calendar = ServiceCalendar::new(chrono_tz::America::New_York);
    // 08:00 local on 2017-03-15.
    assert_eq!(
        calendar.service_date_of(1_489_579_200),
        date(2017, 3, 15)
    );
    // 03:59:59Z is still the previous local day.
    assert_eq!(
        calendar.service_date_of(1_489_550_399),
        date(2017, 3, 14)
    );
}
