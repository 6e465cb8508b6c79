use std::collections::HashSet;

use tripline::index::{TripIntervalIndex, TripSpan};

fn span(trip_idx: u32, min_second: u32, max_second: u32) -> TripSpan {
    TripSpan {
        trip_idx,
        min_second,
        max_second,
    }
}

fn hits(index: &TripIntervalIndex, q_start: i64, q_end: i64) -> HashSet<u32> {
    index
        .overlapping(q_start, q_end)
        .into_iter()
        .map(|s| s.trip_idx)
        .collect()
}

#[test]
fn overlap_membership() {
    let index = TripIntervalIndex::build(vec![
        span(0, 100, 200),
        span(1, 150, 400),
        span(2, 500, 600),
        span(3, 0, 50),
    ]);
    assert_eq!(hits(&index, 180, 450), HashSet::from([0, 1]));
    assert_eq!(hits(&index, 0, 1000), HashSet::from([0, 1, 2, 3]));
    assert_eq!(hits(&index, 420, 480), HashSet::new());
}

#[test]
fn touching_endpoints_count_as_overlap() {
    let index = TripIntervalIndex::build(vec![span(0, 100, 200)]);
    assert_eq!(hits(&index, 200, 300), HashSet::from([0]));
    assert_eq!(hits(&index, 0, 100), HashSet::from([0]));
    assert_eq!(hits(&index, 201, 300), HashSet::new());
    assert_eq!(hits(&index, 0, 99), HashSet::new());
}

#[test]
fn window_bounds_may_leave_the_day() {
    // A lookback window expressed in the previous day's coordinates lands
    // past 86400; a window converted against a later day can go negative.
    let index = TripIntervalIndex::build(vec![span(0, 86_000, 90_200), span(1, 0, 30)]);
    assert_eq!(hits(&index, 88_200, 89_400), HashSet::from([0]));
    assert_eq!(hits(&index, -100, 0), HashSet::from([1]));
    assert_eq!(hits(&index, -100, -1), HashSet::new());
}

#[test]
fn inverted_window_matches_nothing() {
    let index = TripIntervalIndex::build(vec![span(0, 100, 200)]);
    assert!(index.overlapping(300, 100).is_empty());
}

#[test]
fn empty_index_matches_nothing() {
    let index = TripIntervalIndex::build(Vec::new());
    assert!(index.is_empty());
    assert!(index.overlapping(0, 86_400).is_empty());
}

#[test]
fn identical_intervals_are_all_returned() {
    let index = TripIntervalIndex::build(vec![
        span(0, 100, 200),
        span(1, 100, 200),
        span(2, 100, 200),
    ]);
    assert_eq!(hits(&index, 150, 160), HashSet::from([0, 1, 2]));
}

#[test]
fn span_identity_is_the_trip_alone() {
    assert_eq!(span(7, 0, 10), span(7, 500, 900));
    assert_ne!(span(7, 0, 10), span(8, 0, 10));

    let mut set = HashSet::new();
    set.insert(span(7, 0, 10));
    set.insert(span(7, 500, 900));
    assert_eq!(set.len(), 1);
}

#[test]
fn span_derivation_takes_min_and_max_over_set_times() {
    let mut builder = tripline::schedule::Schedule::builder();
    builder.route("A", None);
    builder.trip("T1", "A", "S");
    // Departure-only, both, arrival-only; min and max come from the whole
    // multiset of set values.
    builder.stop_time("T1", "S1", 1, None, Some(300));
    builder.stop_time("T1", "S2", 2, Some(250), Some(700));
    builder.stop_time("T1", "S3", 3, Some(900), None);
    builder.trip("T2", "A", "S");
    builder.stop_time("T2", "S1", 1, None, None);
    let schedule = builder.build();

    let timed = schedule.trip_by_id("T1").unwrap();
    let span = TripSpan::from_stop_times(timed.index, schedule.stop_times_by_trip_idx(timed.index))
        .unwrap();
    assert_eq!(span.min_second, 250);
    assert_eq!(span.max_second, 900);

    let untimed = schedule.trip_by_id("T2").unwrap();
    assert!(
        TripSpan::from_stop_times(untimed.index, schedule.stop_times_by_trip_idx(untimed.index))
            .is_none()
    );
}
