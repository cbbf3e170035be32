use chrono::offset::Offset;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timezone {
    Local,
    Named(Tz),
}

impl Timezone {
    pub fn parse(value: Option<&str>) -> Result<Self, Error> {
        let Some(raw) = value else {
            return Ok(Timezone::Local);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(Timezone::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Timezone::Named(chrono_tz::UTC));
        }
        Tz::from_str(trimmed)
            .map(Timezone::Named)
            .map_err(|_| Error::InvalidTimezone {
                input: trimmed.to_string(),
            })
    }

    pub fn to_fixed_offset(self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Timezone::Local => {
                let local = utc.with_timezone(&Local);
                let offset = local.offset().fix();
                local.with_timezone(&offset)
            }
            Timezone::Named(tz) => {
                let local = utc.with_timezone(&tz);
                let offset = local.offset().fix();
                local.with_timezone(&offset)
            }
        }
    }

    /// Wall-clock time of `utc` in this zone
    pub fn local_time(self, utc: DateTime<Utc>) -> NaiveDateTime {
        self.to_fixed_offset(utc).naive_local()
    }

    /// Instant for a wall-clock time. Ambiguous times resolve to the earlier
    /// instant; times skipped by a DST jump resolve to None.
    pub fn to_utc(self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Timezone::Local => Local
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Timezone::Named(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parse_none_returns_local() {
        assert!(matches!(Timezone::parse(None).unwrap(), Timezone::Local));
    }

    #[test]
    fn parse_local_string_returns_local() {
        assert!(matches!(
            Timezone::parse(Some("LOCAL")).unwrap(),
            Timezone::Local
        ));
        assert!(matches!(
            Timezone::parse(Some("  local  ")).unwrap(),
            Timezone::Local
        ));
    }

    #[test]
    fn parse_utc_variants() {
        for raw in ["utc", "UTC", "z", "Z", "  UTC  "] {
            let tz = Timezone::parse(Some(raw)).unwrap();
            assert!(matches!(tz, Timezone::Named(chrono_tz::UTC)), "{raw}");
        }
    }

    #[test]
    fn parse_named_timezone() {
        let tz = Timezone::parse(Some("America/New_York")).unwrap();
        assert!(matches!(tz, Timezone::Named(chrono_tz::America::New_York)));
    }

    #[test]
    fn parse_invalid_timezone_returns_error() {
        let err = Timezone::parse(Some("Mars/Olympus")).unwrap_err();
        assert!(matches!(err, Error::InvalidTimezone { .. }));
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn local_time_shifts_named_zone() {
        let utc = "2026-06-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let tz = Timezone::parse(Some("America/New_York")).unwrap();
        // EDT is UTC-4 in June
        assert_eq!(tz.local_time(utc).format("%H:%M").to_string(), "08:00");
    }

    #[test]
    fn to_utc_round_trips_regular_time() {
        let tz = Timezone::Named(chrono_tz::Europe::Berlin);
        let local = NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let utc = tz.to_utc(local).unwrap();
        assert_eq!(utc.format("%H:%M").to_string(), "08:30");
        assert_eq!(tz.local_time(utc), local);
    }

    #[test]
    fn to_utc_skipped_time_is_none() {
        // 2025-03-30 02:30 does not exist in Berlin (clocks jump to 03:00)
        let tz = Timezone::Named(chrono_tz::Europe::Berlin);
        let local = NaiveDate::from_ymd_opt(2025, 3, 30)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert!(tz.to_utc(local).is_none());
    }
}
