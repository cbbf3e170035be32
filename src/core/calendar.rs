use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::utils::Timezone;

/// Calendar rules used to align buckets: the time zone whose wall clock
/// defines where days, months and years start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    timezone: Timezone,
}

impl Calendar {
    pub fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }

    pub fn utc() -> Self {
        Self::new(Timezone::Named(chrono_tz::UTC))
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Wall-clock time of an instant in this calendar
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        self.timezone.local_time(instant)
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(Timezone::Local)
    }
}

/// Number of days in the given month, `None` for an invalid year/month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

pub(crate) fn days_in_month_of(date: NaiveDate) -> Option<u32> {
    days_in_month(date.year(), date.month())
}
