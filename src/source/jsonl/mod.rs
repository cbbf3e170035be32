//! JSONL file sample source
//!
//! Reads exported step readings from `*.jsonl` files under a data directory.

mod parser;

use std::path::{Path, PathBuf};

use crate::core::StepSample;
use crate::error::SourceError;
use crate::source::{SampleQuery, SampleSource, bucket_samples};

use parser::{default_samples_dir, load_samples};

/// JSONL data source
#[derive(Debug, Clone)]
pub struct JsonlSource {
    dir: Option<PathBuf>,
}

impl JsonlSource {
    /// Read from an explicit directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Read from `$STEPSTATS_HOME/samples` or `~/.stepstats/samples`
    pub fn discover() -> Self {
        Self {
            dir: default_samples_dir(),
        }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn dir_or_unavailable(&self) -> Result<PathBuf, SourceError> {
        self.dir.clone().ok_or_else(|| SourceError::Unavailable {
            reason: "no sample directory found (set STEPSTATS_HOME or --data-dir)".to_string(),
        })
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T, SourceError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SourceError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|err| SourceError::Unavailable {
            reason: format!("sample loader task failed: {err}"),
        })?
}

impl SampleSource for JsonlSource {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    async fn fetch(&self, query: &SampleQuery) -> Result<Vec<StepSample>, SourceError> {
        let dir = self.dir_or_unavailable()?;
        let query = query.clone();
        run_blocking(move || {
            let samples = load_samples(&dir)?;
            Ok(bucket_samples(&samples, &query))
        })
        .await
    }
}
