//! In-memory sample source
//!
//! Holds raw readings handed over by the embedding application. An empty
//! source is how a first run looks; `unavailable` models denied access.

use crate::core::StepSample;
use crate::error::SourceError;
use crate::source::{RawSample, SampleQuery, SampleSource, bucket_samples};

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    samples: Vec<RawSample>,
    unavailable: Option<String>,
}

impl MemorySource {
    pub fn new(samples: Vec<RawSample>) -> Self {
        Self {
            samples,
            unavailable: None,
        }
    }

    /// A source that refuses every request, e.g. because access was denied
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            samples: Vec::new(),
            unavailable: Some(reason.into()),
        }
    }

    pub fn samples(&self) -> &[RawSample] {
        &self.samples
    }

    fn check_available(&self) -> Result<(), SourceError> {
        match &self.unavailable {
            Some(reason) => Err(SourceError::Unavailable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl SampleSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, query: &SampleQuery) -> Result<Vec<StepSample>, SourceError> {
        self.check_available()?;
        Ok(bucket_samples(&self.samples, query))
    }
}
