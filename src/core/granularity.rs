//! Bucket granularities
//!
//! Each variant carries its own truncation, stepping, bucket-count and label
//! rules so every view can be handled uniformly.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::Serialize;

use crate::core::calendar::days_in_month_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Month,
    Year,
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

impl Granularity {
    pub fn name(self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// Start of the bucket containing `t`
    pub fn truncate(self, t: NaiveDateTime) -> NaiveDateTime {
        let date = t.date();
        match self {
            Granularity::Hour => {
                date.and_time(NaiveTime::from_hms_opt(t.hour(), 0, 0).unwrap_or(NaiveTime::MIN))
            }
            Granularity::Day => midnight(date),
            Granularity::Month => midnight(date.with_day(1).unwrap_or(date)),
            Granularity::Year => midnight(date.with_ordinal(1).unwrap_or(date)),
        }
    }

    /// Move `n` buckets forward from a bucket start
    pub fn advance(self, t: NaiveDateTime, n: u32) -> Option<NaiveDateTime> {
        match self {
            Granularity::Hour => t.checked_add_signed(TimeDelta::try_hours(i64::from(n))?),
            Granularity::Day => t.checked_add_days(Days::new(u64::from(n))),
            Granularity::Month => t.checked_add_months(Months::new(n)),
            Granularity::Year => t.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }

    /// Move `n` buckets backward from a bucket start
    pub fn retreat(self, t: NaiveDateTime, n: u32) -> Option<NaiveDateTime> {
        match self {
            Granularity::Hour => t.checked_sub_signed(TimeDelta::try_hours(i64::from(n))?),
            Granularity::Day => t.checked_sub_days(Days::new(u64::from(n))),
            Granularity::Month => t.checked_sub_months(Months::new(n)),
            Granularity::Year => t.checked_sub_months(Months::new(n.checked_mul(12)?)),
        }
    }

    /// Next finer granularity, used to split one period into buckets
    pub fn child(self) -> Option<Granularity> {
        match self {
            Granularity::Hour => None,
            Granularity::Day => Some(Granularity::Hour),
            Granularity::Month => Some(Granularity::Day),
            Granularity::Year => Some(Granularity::Month),
        }
    }

    /// Number of buckets of this granularity in the enclosing period that
    /// starts on `period_start`: 24 hours per day, the actual number of days
    /// in that month, 12 months per year. Years have no enclosing period.
    pub fn buckets_per_period(self, period_start: NaiveDate) -> Option<usize> {
        match self {
            Granularity::Hour => Some(24),
            Granularity::Day => days_in_month_of(period_start).map(|d| d as usize),
            Granularity::Month => Some(12),
            Granularity::Year => None,
        }
    }

    /// Label for one bucket: "7 AM", "Day 3", "Mar", "2025"
    pub fn unit_label(self, bucket_start: NaiveDateTime) -> String {
        match self {
            Granularity::Hour => {
                let hour = bucket_start.hour();
                let hour_number = if hour % 12 == 0 { 12 } else { hour % 12 };
                let period = if hour < 12 { "AM" } else { "PM" };
                format!("{hour_number} {period}")
            }
            Granularity::Day => format!("Day {}", bucket_start.day()),
            Granularity::Month => bucket_start.format("%b").to_string(),
            Granularity::Year => bucket_start.year().to_string(),
        }
    }

    /// Label for a whole period of this granularity
    pub fn period_label(self, start: NaiveDateTime) -> String {
        match self {
            Granularity::Hour => start.format("%Y-%m-%d %H:00").to_string(),
            Granularity::Day => start.format("%a, %b %-d").to_string(),
            Granularity::Month => start.format("%B %Y").to_string(),
            Granularity::Year => start.year().to_string(),
        }
    }
}
