//! Aggregation service
//!
//! One entry point per view. Each call plans its window, fetches once from
//! the sample source, aggregates, and substitutes synthetic data when the
//! source has nothing. Planner and aggregator errors reach the caller;
//! source failures never do.
//!
//! No state is shared between calls and nothing is written until the final
//! value is built, so dropping a pending future cancels cleanly.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::consts::DEFAULT_LIFETIME_YEARS;
use crate::core::{
    Calendar, DayBucket, Granularity, HourBucket, LifetimeSeries, MonthBucket, Origin,
    ShapeProfile, StepSample, ViewModel, Window, YearBucket, aggregate, generate, plan_span,
    plan_window,
};
use crate::error::{Error, Result};
use crate::source::{SampleQuery, SampleSource};

/// What to do when the source has no usable samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Substitute synthetic data; otherwise return zeros
    pub synthetic: bool,
    /// Seed for reproducible synthetic data; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            synthetic: true,
            seed: None,
        }
    }
}

impl FallbackPolicy {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

pub struct AggregationService<S> {
    source: S,
    calendar: Calendar,
    fallback: FallbackPolicy,
}

impl<S: SampleSource> AggregationService<S> {
    pub fn new(source: S, calendar: Calendar) -> Self {
        Self {
            source,
            calendar,
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn query(&self, window: &Window) -> SampleQuery {
        SampleQuery {
            start: window.start,
            end: window.end,
            until: window.until,
            granularity: window.granularity,
            calendar: self.calendar,
        }
    }

    /// Fetch `query`. `None` means the source had nothing usable and the
    /// caller should fall back.
    async fn request(&self, query: &SampleQuery) -> Option<Vec<StepSample>> {
        let samples = match self.source.fetch(query).await {
            Ok(samples) => samples,
            Err(err) => {
                warn!(source = self.source.name(), "{err}");
                return None;
            }
        };

        if samples.is_empty() {
            debug!(
                source = self.source.name(),
                granularity = query.granularity.name(),
                "source returned no samples"
            );
            return None;
        }
        Some(samples)
    }

    /// Fetch and aggregate `window`
    async fn collect(&self, window: &Window) -> Result<Option<Vec<u64>>> {
        match self.request(&self.query(window)).await {
            Some(samples) => aggregate(&samples, window.boundaries()).map(Some),
            None => Ok(None),
        }
    }

    /// Yearly totals of everything the source holds up to the end of the
    /// current year
    async fn history(&self, now: DateTime<Utc>) -> Result<Option<Vec<StepSample>>> {
        let current = plan_window(now, &self.calendar, Granularity::Year, 1)?;
        let query = SampleQuery {
            start: NaiveDateTime::MIN,
            ..self.query(&current)
        };
        Ok(self.request(&query).await)
    }

    /// Resolve an empty source: synthetic data when enabled, zeros otherwise
    fn fall_back<T>(
        &self,
        view: &str,
        synthesize: impl FnOnce(&mut StdRng) -> T,
        zeros: impl FnOnce() -> T,
    ) -> ViewModel<T> {
        if self.fallback.synthetic {
            info!(view, "using synthetic step data");
            let mut rng = self.fallback.rng();
            ViewModel {
                origin: Origin::Synthetic,
                data: synthesize(&mut rng),
            }
        } else {
            ViewModel {
                origin: Origin::Source,
                data: zeros(),
            }
        }
    }

    /// Steps per hour of the day containing `now` (24 entries)
    pub async fn fetch_hourly(&self, now: DateTime<Utc>) -> Result<ViewModel<Vec<HourBucket>>> {
        let window = plan_window(now, &self.calendar, Granularity::Hour, 1)?;
        let to_buckets = |steps: Vec<u64>| -> Vec<HourBucket> {
            window
                .boundaries()
                .iter()
                .zip(steps)
                .map(|(start, steps)| HourBucket {
                    hour: start.hour(),
                    steps,
                })
                .collect()
        };

        match self.collect(&window).await? {
            Some(steps) => Ok(ViewModel {
                origin: Origin::Source,
                data: to_buckets(steps),
            }),
            None => Ok(self.fall_back(
                "hourly",
                |rng| to_buckets(generate(&ShapeProfile::TypicalDay, rng)),
                || to_buckets(vec![0; window.len()]),
            )),
        }
    }

    /// Hourly breakdown of the last `days` days, oldest first
    pub async fn fetch_daily(
        &self,
        now: DateTime<Utc>,
        days: u32,
    ) -> Result<ViewModel<Vec<DayBucket>>> {
        let span = plan_span(now, &self.calendar, Granularity::Day, days)?;
        let to_buckets = |steps: Vec<u64>| -> Vec<DayBucket> {
            span.split(&steps)
                .map(|(period, hours)| DayBucket {
                    date: period.start.date(),
                    steps: hours.to_vec(),
                })
                .collect()
        };

        match self.collect(&span.window).await? {
            Some(steps) => Ok(ViewModel {
                origin: Origin::Source,
                data: to_buckets(steps),
            }),
            None => Ok(self.fall_back(
                "daily",
                |rng| {
                    span.periods
                        .iter()
                        .map(|period| DayBucket {
                            date: period.start.date(),
                            steps: generate(&ShapeProfile::TypicalDay, rng),
                        })
                        .collect()
                },
                || to_buckets(vec![0; span.window.len()]),
            )),
        }
    }

    /// Daily breakdown of the last `months` months, oldest first. Each month
    /// has one entry per calendar day, including days after `now`.
    pub async fn fetch_monthly(
        &self,
        now: DateTime<Utc>,
        months: u32,
    ) -> Result<ViewModel<Vec<MonthBucket>>> {
        let span = plan_span(now, &self.calendar, Granularity::Month, months)?;
        let to_buckets = |steps: Vec<u64>| -> Vec<MonthBucket> {
            span.split(&steps)
                .map(|(period, days)| MonthBucket {
                    month: Granularity::Month.period_label(period.start),
                    start: period.start.date(),
                    steps: days.to_vec(),
                })
                .collect()
        };

        match self.collect(&span.window).await? {
            Some(steps) => Ok(ViewModel {
                origin: Origin::Source,
                data: to_buckets(steps),
            }),
            None => Ok(self.fall_back(
                "monthly",
                |rng| {
                    span.periods
                        .iter()
                        .map(|period| MonthBucket {
                            month: Granularity::Month.period_label(period.start),
                            start: period.start.date(),
                            steps: generate(&ShapeProfile::DailyTotals { days: period.len }, rng),
                        })
                        .collect()
                },
                || to_buckets(vec![0; span.window.len()]),
            )),
        }
    }

    /// Monthly breakdown of the last `years` years, oldest first
    pub async fn fetch_yearly(
        &self,
        now: DateTime<Utc>,
        years: u32,
    ) -> Result<ViewModel<Vec<YearBucket>>> {
        let span = plan_span(now, &self.calendar, Granularity::Year, years)?;
        let to_buckets = |steps: Vec<u64>| -> Vec<YearBucket> {
            span.split(&steps)
                .map(|(period, months)| YearBucket {
                    year: period.start.year(),
                    steps: months.to_vec(),
                })
                .collect()
        };

        match self.collect(&span.window).await? {
            Some(steps) => Ok(ViewModel {
                origin: Origin::Source,
                data: to_buckets(steps),
            }),
            None => Ok(self.fall_back(
                "yearly",
                |rng| {
                    span.periods
                        .iter()
                        .map(|period| YearBucket {
                            year: period.start.year(),
                            steps: generate(&ShapeProfile::MonthlyTotals, rng),
                        })
                        .collect()
                },
                || to_buckets(vec![0; span.window.len()]),
            )),
        }
    }

    /// One total per year from `start_year` through the year of `now`.
    ///
    /// Without a start year the source's oldest sample decides, and the same
    /// fetch supplies the totals; a source without samples gets the last five
    /// years.
    pub async fn fetch_lifetime(
        &self,
        now: DateTime<Utc>,
        start_year: Option<i32>,
    ) -> Result<ViewModel<LifetimeSeries>> {
        let current_year = self.calendar.local_time(now).year();
        let (start_year, history) = match start_year {
            Some(year) => (year, None),
            None => {
                let history = self.history(now).await?;
                let first = history
                    .as_ref()
                    .and_then(|samples| samples.iter().map(|s| s.bucket_start.year()).min())
                    .unwrap_or(current_year - (DEFAULT_LIFETIME_YEARS as i32 - 1));
                (first, Some(history))
            }
        };
        if start_year > current_year {
            return Err(Error::InvalidArgument(format!(
                "start year {start_year} is after {current_year}"
            )));
        }
        let years = u32::try_from(i64::from(current_year) - i64::from(start_year) + 1)
            .map_err(|_| Error::InvalidArgument(format!("start year {start_year} is out of range")))?;

        let window = plan_window(now, &self.calendar, Granularity::Year, years)?;
        let samples = match history {
            Some(history) => history,
            None => self.request(&self.query(&window)).await,
        };
        let steps = samples
            .map(|samples| aggregate(&samples, window.boundaries()))
            .transpose()?;

        match steps {
            Some(steps) => Ok(ViewModel {
                origin: Origin::Source,
                data: LifetimeSeries { start_year, steps },
            }),
            None => Ok(self.fall_back(
                "lifetime",
                |rng| LifetimeSeries {
                    start_year,
                    steps: generate(
                        &ShapeProfile::YearlyTotals {
                            years: window.len(),
                        },
                        rng,
                    ),
                },
                || LifetimeSeries {
                    start_year,
                    steps: vec![0; window.len()],
                },
            )),
        }
    }
}
