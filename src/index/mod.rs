use std::hash::{Hash, Hasher};

use rayon::prelude::*;

use crate::schedule::StopTime;

/// The service-day-relative interval one trip occupies: the minimum and
/// maximum over every set arrival and departure second of its stop-times.
///
/// Identity is the trip alone. Two spans for the same trip compare equal even
/// if their bounds differ, so spans can key sets and maps per trip.
#[derive(Debug, Clone, Copy)]
pub struct TripSpan {
    pub trip_idx: u32,
    pub min_second: u32,
    pub max_second: u32,
}

impl PartialEq for TripSpan {
    fn eq(&self, other: &Self) -> bool {
        self.trip_idx == other.trip_idx
    }
}

impl Eq for TripSpan {}

impl Hash for TripSpan {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.trip_idx.hash(state);
    }
}

impl TripSpan {
    /// Derives the span from a trip's stop-times. `None` when no stop-time
    /// carries a set arrival or departure; such a trip can never activate.
    pub fn from_stop_times(trip_idx: u32, stop_times: &[StopTime]) -> Option<Self> {
        let mut bounds: Option<(u32, u32)> = None;
        for st in stop_times {
            for time in [st.arrival, st.departure].into_iter().flatten() {
                let second = time.as_seconds();
                bounds = Some(match bounds {
                    None => (second, second),
                    Some((lo, hi)) => (lo.min(second), hi.max(second)),
                });
            }
        }
        bounds.map(|(min_second, max_second)| Self {
            trip_idx,
            min_second,
            max_second,
        })
    }
}

/// Static overlap index over trip spans.
///
/// Spans are sorted by their minimum second and augmented with the maximum
/// end second of every implicit subtree, giving the classic interval-tree
/// query on a flat array: subtrees whose maximum end lies before the window
/// are pruned, and the walk stops descending right once a node starts after
/// the window. Built once, then read-only.
#[derive(Debug, Clone, Default)]
pub struct TripIntervalIndex {
    spans: Box<[TripSpan]>,
    /// `subtree_max[mid]` is the greatest `max_second` in the implicit
    /// subtree rooted at `mid` (the midpoint of its sorted range).
    subtree_max: Box<[u32]>,
}

impl TripIntervalIndex {
    pub fn build(mut spans: Vec<TripSpan>) -> Self {
        spans.par_sort_unstable_by_key(|span| span.min_second);
        let mut subtree_max = vec![0u32; spans.len()];
        fill_subtree_max(&spans, &mut subtree_max, 0, spans.len());
        Self {
            spans: spans.into(),
            subtree_max: subtree_max.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Every span whose `[min_second, max_second]` intersects the closed
    /// window `[q_start, q_end]`; touching endpoints count. Bounds may be
    /// negative or beyond 86400 — cross-midnight windows expressed in a
    /// previous day's coordinates land there. An inverted window matches
    /// nothing. Results are unordered.
    pub fn overlapping(&self, q_start: i64, q_end: i64) -> Vec<TripSpan> {
        let mut out = Vec::new();
        if q_start <= q_end {
            self.collect(0, self.spans.len(), q_start, q_end, &mut out);
        }
        out
    }

    fn collect(&self, lo: usize, hi: usize, q_start: i64, q_end: i64, out: &mut Vec<TripSpan>) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        // Nothing under this node reaches the window.
        if (self.subtree_max[mid] as i64) < q_start {
            return;
        }
        self.collect(lo, mid, q_start, q_end, out);
        let span = &self.spans[mid];
        if (span.min_second as i64) <= q_end {
            if (span.max_second as i64) >= q_start {
                out.push(*span);
            }
            // Right of mid every span starts at min_second or later, so the
            // descent only continues while mid itself starts inside the window.
            self.collect(mid + 1, hi, q_start, q_end, out);
        }
    }
}

fn fill_subtree_max(spans: &[TripSpan], out: &mut [u32], lo: usize, hi: usize) -> u32 {
    if lo >= hi {
        return 0;
    }
    let mid = lo + (hi - lo) / 2;
    let mut max = spans[mid].max_second;
    max = max.max(fill_subtree_max(spans, out, lo, mid));
    max = max.max(fill_subtree_max(spans, out, mid + 1, hi));
    out[mid] = max;
    max
}
