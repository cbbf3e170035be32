//! Step-count aggregation core
//!
//! Turns raw pedometer samples into fixed-size per-bucket arrays at four time
//! scales (hour of day, day of month, month of year, year of lifetime), with
//! synthetic fallback data when no real samples are available.

mod consts;
pub mod core;
pub mod error;
pub mod service;
pub mod source;
pub mod utils;

pub use crate::core::{
    Calendar, DayBucket, Granularity, HourBucket, LifetimeSeries, MonthBucket, Origin,
    ShapeProfile, SortOrder, Span, StepSample, ViewModel, Window, YearBucket, aggregate, generate,
    plan_span, plan_window,
};
pub use error::{Error, SourceError};
pub use service::{AggregationService, FallbackPolicy};
pub use source::{JsonlSource, MemorySource, RawSample, SampleQuery, SampleSource};
pub use utils::Timezone;
