use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Duplicate bucket starting at {bucket_start}")]
    DuplicateBucket { bucket_start: NaiveDateTime },
}

/// Failures reported by a sample source.
///
/// The aggregation service absorbs these and substitutes synthetic data.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Sample source unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn invalid_argument_display() {
        let e = Error::InvalidArgument("lookback must be at least 1".to_string());
        assert_eq!(e.to_string(), "Invalid argument: lookback must be at least 1");
    }

    #[test]
    fn invalid_timezone_display() {
        let e = Error::InvalidTimezone {
            input: "Mars/Olympus".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid timezone: Mars/Olympus");
    }

    #[test]
    fn duplicate_bucket_display() {
        let bucket_start = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let e = Error::DuplicateBucket { bucket_start };
        assert_eq!(e.to_string(), "Duplicate bucket starting at 2025-03-01 07:00:00");
    }

    #[test]
    fn source_unavailable_display() {
        let e = SourceError::Unavailable {
            reason: "access denied".to_string(),
        };
        assert_eq!(e.to_string(), "Sample source unavailable: access denied");
    }

    #[test]
    fn source_io_display_includes_path() {
        let e = SourceError::Io {
            path: PathBuf::from("/tmp/steps.jsonl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(e.to_string(), "Failed to read /tmp/steps.jsonl: gone");
    }
}
