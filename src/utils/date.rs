use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::utils::Timezone;

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    Err(format!("\"{s}\" is not a YYYYMMDD or YYYY-MM-DD date"))
}

/// Parse a reference time given as RFC 3339 or as a plain date.
///
/// A plain date means the last second of that day in `timezone`, so the whole
/// day is inside the resulting windows.
pub fn parse_reference_time(s: &str, timezone: Timezone) -> Result<DateTime<Utc>, String> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = parse_date(trimmed)
        .map_err(|_| format!("\"{trimmed}\" is neither RFC 3339 nor YYYYMMDD / YYYY-MM-DD"))?;
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).ok_or_else(|| trimmed.to_string())?;
    timezone
        .to_utc(date.and_time(end_of_day))
        .ok_or_else(|| format!("\"{trimmed}\" does not exist in this timezone"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compact_and_dashed_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(parse_date("20240229").unwrap(), expected);
        assert_eq!(parse_date("2024-02-29").unwrap(), expected);
    }

    #[test]
    fn parse_invalid_date_reports_input() {
        let err = parse_date("2023-02-29").unwrap_err();
        assert!(err.contains("2023-02-29"));
    }

    #[test]
    fn reference_time_rfc3339() {
        let utc = parse_reference_time("2025-03-15T10:30:00+02:00", Timezone::Local).unwrap();
        assert_eq!(utc.to_rfc3339(), "2025-03-15T08:30:00+00:00");
    }

    #[test]
    fn reference_time_plain_date_is_end_of_day() {
        let tz = Timezone::Named(chrono_tz::UTC);
        let utc = parse_reference_time("2025-03-15", tz).unwrap();
        assert_eq!(utc.to_rfc3339(), "2025-03-15T23:59:59+00:00");
    }
}
