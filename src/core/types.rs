//! Core data types shared by the planner, aggregator, sources and views
//!
//! View types are created fresh for every request and never mutated after
//! construction.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Pre-aggregated step sum for one calendar bucket, as reported by a source.
///
/// `steps` may be fractional (unit conversion upstream); it is converted to
/// an integer count by the aggregator, not before.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSample {
    /// Local wall-clock start of the bucket
    pub bucket_start: NaiveDateTime,
    pub steps: f64,
}

impl StepSample {
    pub fn new(bucket_start: NaiveDateTime, steps: f64) -> Self {
        Self {
            bucket_start,
            steps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourBucket {
    pub hour: u32,
    pub steps: u64,
}

/// Hourly breakdown of one day (always 24 entries)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub steps: Vec<u64>,
}

impl DayBucket {
    pub fn total(&self) -> u64 {
        self.steps.iter().sum()
    }
}

/// Daily breakdown of one month (one entry per day of that month)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// Display label, e.g. "February 2024"
    pub month: String,
    pub start: NaiveDate,
    pub steps: Vec<u64>,
}

impl MonthBucket {
    pub fn total(&self) -> u64 {
        self.steps.iter().sum()
    }
}

/// Monthly breakdown of one year (always 12 entries)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearBucket {
    pub year: i32,
    pub steps: Vec<u64>,
}

impl YearBucket {
    pub fn total(&self) -> u64 {
        self.steps.iter().sum()
    }
}

/// One entry per year, starting at `start_year`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifetimeSeries {
    pub start_year: i32,
    pub steps: Vec<u64>,
}

impl LifetimeSeries {
    pub fn total(&self) -> u64 {
        self.steps.iter().sum()
    }

    pub fn years(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        (self.start_year..).zip(self.steps.iter().copied())
    }
}

/// Where the numbers of a view came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Source,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel<T> {
    pub origin: Origin,
    pub data: T,
}

impl<T> ViewModel<T> {
    pub fn is_synthetic(&self) -> bool {
        self.origin == Origin::Synthetic
    }
}

/// Traversal order for presenting buckets. Aggregation itself is always
/// chronological.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}
