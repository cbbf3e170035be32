//! Calendar-aligned window planning
//!
//! Turns an explicit reference time and calendar into bucket boundaries.
//! Boundaries are local wall-clock timestamps, always in ascending order.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use crate::consts::MAX_PERIODS_BACK;
use crate::core::calendar::Calendar;
use crate::core::granularity::Granularity;
use crate::core::types::SortOrder;
use crate::error::{Error, Result};

/// Half-open local time range `[start, end)` and its bucket boundaries
///
/// A window that stops at the reference time also carries `until`, the same
/// end as an instant. Local times repeat when clocks fall back, so readings
/// are cut off against `until` rather than the local `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub granularity: Granularity,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub until: Option<DateTime<Utc>>,
    boundaries: Vec<NaiveDateTime>,
}

impl Window {
    /// Bucket starts in chronological order
    pub fn boundaries(&self) -> &[NaiveDateTime] {
        &self.boundaries
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Bucket starts in the requested presentation order
    pub fn traverse(&self, order: SortOrder) -> Vec<NaiveDateTime> {
        match order {
            SortOrder::Asc => self.boundaries.clone(),
            SortOrder::Desc => self.boundaries.iter().rev().copied().collect(),
        }
    }
}

/// One period of a [`Span`]: its start and its slice of the flattened
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSlice {
    pub start: NaiveDateTime,
    pub offset: usize,
    pub len: usize,
}

/// Whole periods (days, months or years) split into buckets of the next
/// finer granularity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub period: Granularity,
    pub window: Window,
    pub periods: Vec<PeriodSlice>,
}

impl Span {
    /// Pair each period with its part of `values`, which should be laid out
    /// like the span's boundaries. Stops at the first period `values` does
    /// not fully cover.
    pub fn split<'a, T>(
        &'a self,
        values: &'a [T],
    ) -> impl Iterator<Item = (&'a PeriodSlice, &'a [T])> + 'a {
        self.periods
            .iter()
            .map_while(move |p| {
                let slice = values.get(p.offset..p.offset.checked_add(p.len)?)?;
                Some((p, slice))
            })
    }
}

fn check_lookback(periods_back: u32) -> Result<u32> {
    if periods_back == 0 {
        return Err(Error::InvalidArgument(
            "lookback must be at least 1 period".to_string(),
        ));
    }
    if periods_back > MAX_PERIODS_BACK {
        return Err(Error::InvalidArgument(format!(
            "lookback of {periods_back} exceeds {MAX_PERIODS_BACK} periods"
        )));
    }
    Ok(periods_back)
}

fn out_of_range(granularity: Granularity, periods_back: u32) -> Error {
    Error::InvalidArgument(format!(
        "{periods_back} {}s back is outside the supported calendar range",
        granularity.name()
    ))
}

fn enumerate(
    start: NaiveDateTime,
    granularity: Granularity,
    count: usize,
) -> Result<Vec<NaiveDateTime>> {
    let mut boundaries = Vec::with_capacity(count);
    let mut cursor = start;
    for i in 0..count {
        if i > 0 {
            cursor = granularity
                .advance(cursor, 1)
                .ok_or_else(|| out_of_range(granularity, count as u32))?;
        }
        boundaries.push(cursor);
    }
    Ok(boundaries)
}

/// Plan a lookback window ending at `now`.
///
/// - hour: `[start of day - (n-1) days, now)`, 24 boundaries per day
/// - day: one boundary per day, ending with the day containing `now`
/// - month: whole months, boundaries at the first of each month
/// - year: whole years, boundaries at January 1st
pub fn plan_window(
    now: DateTime<Utc>,
    calendar: &Calendar,
    granularity: Granularity,
    periods_back: u32,
) -> Result<Window> {
    let periods_back = check_lookback(periods_back)?;
    let local_now = calendar.local_time(now);

    let window = match granularity {
        Granularity::Hour => {
            let today = Granularity::Day.truncate(local_now);
            let start = Granularity::Day
                .retreat(today, periods_back - 1)
                .ok_or_else(|| out_of_range(Granularity::Day, periods_back))?;
            let boundaries = enumerate(start, Granularity::Hour, 24 * periods_back as usize)?;
            Window {
                granularity,
                start,
                end: local_now,
                until: Some(now),
                boundaries,
            }
        }
        _ => {
            let current = granularity.truncate(local_now);
            let start = granularity
                .retreat(current, periods_back - 1)
                .ok_or_else(|| out_of_range(granularity, periods_back))?;
            let end = granularity
                .advance(current, 1)
                .ok_or_else(|| out_of_range(granularity, periods_back))?;
            let boundaries = enumerate(start, granularity, periods_back as usize)?;
            Window {
                granularity,
                start,
                end,
                until: None,
                boundaries,
            }
        }
    };

    debug!(
        granularity = granularity.name(),
        start = %window.start,
        end = %window.end,
        buckets = window.len(),
        "planned window"
    );
    Ok(window)
}

/// Plan `periods_back` whole periods ending with the one containing `now`,
/// each split into buckets of the next finer granularity.
///
/// Every period is fully enumerated, including buckets after `now`, so a
/// month always contributes one bucket per day of that month.
pub fn plan_span(
    now: DateTime<Utc>,
    calendar: &Calendar,
    period: Granularity,
    periods_back: u32,
) -> Result<Span> {
    let periods_back = check_lookback(periods_back)?;
    let child = period.child().ok_or_else(|| {
        Error::InvalidArgument(format!("{} periods cannot be split further", period.name()))
    })?;

    let local_now = calendar.local_time(now);
    let current = period.truncate(local_now);
    let first = period
        .retreat(current, periods_back - 1)
        .ok_or_else(|| out_of_range(period, periods_back))?;
    let end = period
        .advance(current, 1)
        .ok_or_else(|| out_of_range(period, periods_back))?;

    let mut boundaries = Vec::new();
    let mut periods = Vec::with_capacity(periods_back as usize);
    let mut period_start = first;
    for i in 0..periods_back {
        if i > 0 {
            period_start = period
                .advance(period_start, 1)
                .ok_or_else(|| out_of_range(period, periods_back))?;
        }
        let len = child
            .buckets_per_period(period_start.date())
            .ok_or_else(|| out_of_range(period, periods_back))?;
        periods.push(PeriodSlice {
            start: period_start,
            offset: boundaries.len(),
            len,
        });
        boundaries.extend(enumerate(period_start, child, len)?);
    }

    debug!(
        period = period.name(),
        bucket = child.name(),
        start = %first,
        end = %end,
        buckets = boundaries.len(),
        "planned span"
    );
    Ok(Span {
        period,
        window: Window {
            granularity: child,
            start: first,
            end,
            until: None,
            boundaries,
        },
        periods,
    })
}
