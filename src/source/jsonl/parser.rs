//! Step sample JSONL parser
//!
//! One reading per line: `{"timestamp": "2025-03-15T07:05:00Z", "steps": 40}`.
//! Exports that call the field `count` are accepted too.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::error::SourceError;
use crate::source::RawSample;

const DEFAULT_DATA_DIR: &str = ".stepstats";
const STEPSTATS_HOME_ENV: &str = "STEPSTATS_HOME";
const SAMPLES_SUBDIR: &str = "samples";

// ============================================================================
// Internal types for JSONL parsing
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawJsonEntry {
    timestamp: Option<String>,
    #[serde(alias = "count")]
    steps: Option<f64>,
}

impl RawJsonEntry {
    fn into_sample(self) -> Option<RawSample> {
        let timestamp = DateTime::parse_from_rfc3339(self.timestamp?.trim())
            .ok()?
            .with_timezone(&Utc);
        let steps = self.steps?;
        if !steps.is_finite() {
            return None;
        }
        Some(RawSample::new(timestamp, steps))
    }
}

/// Readings of one file plus the number of lines that could not be used
#[derive(Debug, Default)]
pub(crate) struct ParsedFile {
    pub(crate) samples: Vec<RawSample>,
    pub(crate) skipped: usize,
}

// ============================================================================
// File discovery
// ============================================================================

/// Sample directory: `$STEPSTATS_HOME/samples`, else `~/.stepstats/samples`
pub(crate) fn default_samples_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var(STEPSTATS_HOME_ENV) {
        let path = PathBuf::from(home).join(SAMPLES_SUBDIR);
        if path.is_dir() {
            return Some(path);
        }
    }

    let home = dirs::home_dir()?;
    let path = home.join(DEFAULT_DATA_DIR).join(SAMPLES_SUBDIR);
    if path.is_dir() { Some(path) } else { None }
}

pub(crate) fn find_sample_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let pattern = format!("{}/**/*.jsonl", glob::Pattern::escape(&dir.to_string_lossy()));
    if let Ok(entries) = glob::glob(&pattern) {
        for entry in entries.flatten() {
            files.push(entry);
        }
    }
    files.sort();
    files
}

// ============================================================================
// Parsing
// ============================================================================

pub(crate) fn parse_sample_file(path: &Path) -> Result<ParsedFile, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut parsed = ParsedFile::default();
    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                trace!("Failed to read line {} in {}: {}", line_no + 1, path.display(), err);
                parsed.skipped += 1;
                continue;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let sample = serde_json::from_str::<RawJsonEntry>(trimmed)
            .ok()
            .and_then(RawJsonEntry::into_sample);
        match sample {
            Some(sample) => parsed.samples.push(sample),
            None => {
                trace!("Unusable sample at {}:{}", path.display(), line_no + 1);
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

/// Parse every sample file under `dir` in parallel
pub(crate) fn load_samples(dir: &Path) -> Result<Vec<RawSample>, SourceError> {
    if !dir.is_dir() {
        return Err(SourceError::Unavailable {
            reason: format!("sample directory {} does not exist", dir.display()),
        });
    }

    let files = find_sample_files(dir);
    let parsed = files
        .par_iter()
        .map(|path| parse_sample_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    let skipped: usize = parsed.iter().map(|p| p.skipped).sum();
    let samples: Vec<RawSample> = parsed.into_iter().flat_map(|p| p.samples).collect();
    debug!(
        files = files.len(),
        samples = samples.len(),
        skipped,
        dir = %dir.display(),
        "loaded step samples"
    );
    Ok(samples)
}
