//! Core module - calendar planning, bucket aggregation and synthetic data
//!
//! Everything here is synchronous and pure: the reference time and calendar
//! are always passed in, never read from the environment.

mod aggregator;
mod calendar;
mod granularity;
mod planner;
mod synthetic;
mod types;

pub use aggregator::{aggregate, to_step_count};
pub use calendar::{Calendar, days_in_month};
pub use granularity::Granularity;
pub use planner::{PeriodSlice, Span, Window, plan_span, plan_window};
pub use synthetic::{ShapeProfile, TYPICAL_DAY, generate};
pub use types::{
    DayBucket, HourBucket, LifetimeSeries, MonthBucket, Origin, SortOrder, StepSample, ViewModel,
    YearBucket,
};
