//! Sample source abstraction layer
//!
//! A source hands out step sums for a local-time window, already bucketed at
//! the requested granularity. Fetching is the only asynchronous step of a
//! request; everything downstream is pure.

pub mod jsonl;
pub mod memory;

use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use std::future::Future;

use crate::core::{Calendar, Granularity, StepSample};
use crate::error::SourceError;

pub use jsonl::JsonlSource;
pub use memory::MemorySource;

/// One un-bucketed step reading: `steps` taken in the interval that starts at
/// `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub timestamp: DateTime<Utc>,
    pub steps: f64,
}

impl RawSample {
    pub fn new(timestamp: DateTime<Utc>, steps: f64) -> Self {
        Self { timestamp, steps }
    }
}

/// What to fetch: the half-open local window `[start, end)`, the bucket size
/// and the calendar that defines local time.
///
/// When `until` is set it replaces the local `end` as the upper bound, so a
/// window that stops at the reference time keeps readings from a repeated
/// local hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub until: Option<DateTime<Utc>>,
    pub granularity: Granularity,
    pub calendar: Calendar,
}

impl SampleQuery {
    /// Whether a reading at `instant`, which is `local` on the query
    /// calendar, falls inside the window
    pub fn contains(&self, instant: DateTime<Utc>, local: NaiveDateTime) -> bool {
        let before_end = match self.until {
            Some(until) => instant < until,
            None => local < self.end,
        };
        self.start <= local && before_end
    }
}

/// Sample source trait - implemented by each health data provider
pub trait SampleSource: Send + Sync {
    /// Unique name for this source (used in logs)
    fn name(&self) -> &'static str;

    /// Step sums for the query window, one per non-empty bucket, each bucket
    /// start at most once. No data is `Ok(vec![])`, not an error.
    fn fetch(
        &self,
        query: &SampleQuery,
    ) -> impl Future<Output = Result<Vec<StepSample>, SourceError>> + Send;
}

/// Sum raw readings into the query's buckets.
///
/// Readings are converted to the query calendar's local time, filtered to
/// the window and keyed by bucket start, so every bucket appears once.
pub fn bucket_samples<'a, I>(raw: I, query: &SampleQuery) -> Vec<StepSample>
where
    I: IntoIterator<Item = &'a RawSample>,
{
    let mut buckets: BTreeMap<NaiveDateTime, f64> = BTreeMap::new();
    for sample in raw {
        let local = query.calendar.local_time(sample.timestamp);
        if !query.contains(sample.timestamp, local) {
            continue;
        }
        *buckets
            .entry(query.granularity.truncate(local))
            .or_insert(0.0) += sample.steps;
    }
    buckets
        .into_iter()
        .map(|(bucket_start, steps)| StepSample::new(bucket_start, steps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Timezone;
    use chrono::NaiveDate;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse::<DateTime<Utc>>().unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn day_query(granularity: Granularity, calendar: Calendar) -> SampleQuery {
        SampleQuery {
            start: local(2025, 3, 15, 0),
            end: local(2025, 3, 16, 0),
            until: None,
            granularity,
            calendar,
        }
    }

    #[test]
    fn sums_readings_per_hour() {
        let raw = vec![
            RawSample::new(utc("2025-03-15T07:05:00Z"), 40.0),
            RawSample::new(utc("2025-03-15T07:45:00Z"), 80.0),
            RawSample::new(utc("2025-03-15T09:10:00Z"), 300.0),
        ];
        let buckets = bucket_samples(&raw, &day_query(Granularity::Hour, Calendar::utc()));
        assert_eq!(
            buckets,
            vec![
                StepSample::new(local(2025, 3, 15, 7), 120.0),
                StepSample::new(local(2025, 3, 15, 9), 300.0),
            ]
        );
    }

    #[test]
    fn drops_readings_outside_window() {
        let raw = vec![
            RawSample::new(utc("2025-03-14T23:59:00Z"), 10.0),
            RawSample::new(utc("2025-03-16T00:00:00Z"), 10.0),
            RawSample::new(utc("2025-03-15T12:00:00Z"), 5.0),
        ];
        let buckets = bucket_samples(&raw, &day_query(Granularity::Day, Calendar::utc()));
        assert_eq!(buckets, vec![StepSample::new(local(2025, 3, 15, 0), 5.0)]);
    }

    #[test]
    fn buckets_in_calendar_local_time() {
        // 23:30 UTC on the 14th is 08:30 on the 15th in Tokyo
        let tokyo = Calendar::new(Timezone::Named(chrono_tz::Asia::Tokyo));
        let raw = vec![RawSample::new(utc("2025-03-14T23:30:00Z"), 75.0)];
        let buckets = bucket_samples(&raw, &day_query(Granularity::Hour, tokyo));
        assert_eq!(buckets, vec![StepSample::new(local(2025, 3, 15, 8), 75.0)]);
    }

    #[test]
    fn cutoff_instant_keeps_repeated_local_hour() {
        // Berlin falls back at 01:00 UTC on 2025-10-26, so 02:10 local
        // (01:10 UTC) is later than the 02:20 and 02:40 CEST readings.
        let berlin = Calendar::new(Timezone::Named(chrono_tz::Europe::Berlin));
        let query = SampleQuery {
            start: local(2025, 10, 26, 0),
            end: NaiveDate::from_ymd_opt(2025, 10, 26)
                .unwrap()
                .and_hms_opt(2, 10, 0)
                .unwrap(),
            until: Some(utc("2025-10-26T01:10:00Z")),
            granularity: Granularity::Hour,
            calendar: berlin,
        };
        let raw = vec![
            RawSample::new(utc("2025-10-25T23:00:00Z"), 7.0),
            RawSample::new(utc("2025-10-26T00:20:00Z"), 500.0),
            RawSample::new(utc("2025-10-26T00:40:00Z"), 100.0),
            RawSample::new(utc("2025-10-26T01:10:00Z"), 50.0),
        ];
        assert_eq!(
            bucket_samples(&raw, &query),
            vec![
                StepSample::new(local(2025, 10, 26, 1), 7.0),
                StepSample::new(local(2025, 10, 26, 2), 600.0),
            ]
        );
    }
}
