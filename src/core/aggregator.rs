//! Bucket aggregation
//!
//! Reindexes source samples onto the planner's boundaries, zero-filling
//! every bucket the source did not report.

use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::debug;

use crate::core::types::StepSample;
use crate::error::{Error, Result};

/// Convert a reported step sum to a count: truncated toward zero, negative
/// and non-finite values become 0.
pub fn to_step_count(steps: f64) -> u64 {
    if steps.is_finite() && steps > 0.0 {
        steps.trunc() as u64
    } else {
        0
    }
}

/// Lay `raw` out along `expected`, one value per boundary, 0 where the
/// source reported nothing.
///
/// Two samples with the same bucket start fail with
/// [`Error::DuplicateBucket`]. Samples matching no boundary are ignored.
/// `expected` is trusted to be in the desired order and is never re-sorted.
pub fn aggregate(raw: &[StepSample], expected: &[NaiveDateTime]) -> Result<Vec<u64>> {
    let mut lookup: HashMap<NaiveDateTime, u64> = HashMap::with_capacity(raw.len());
    for sample in raw {
        if lookup
            .insert(sample.bucket_start, to_step_count(sample.steps))
            .is_some()
        {
            return Err(Error::DuplicateBucket {
                bucket_start: sample.bucket_start,
            });
        }
    }

    let mut matched = 0usize;
    let values: Vec<u64> = expected
        .iter()
        .map(|boundary| match lookup.get(boundary) {
            Some(&steps) => {
                matched += 1;
                steps
            }
            None => 0,
        })
        .collect();

    if matched < raw.len() {
        debug!(
            ignored = raw.len() - matched,
            "samples outside expected boundaries"
        );
    }

    Ok(values)
}
