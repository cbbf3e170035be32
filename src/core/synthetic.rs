//! Synthetic step data
//!
//! Placeholder curves used when the sample source has nothing to offer.
//! The shape is fixed; amplitudes come from an injected random source so a
//! seeded or mock generator reproduces exact arrays.
//!
//! Series for different granularities are drawn independently, so a
//! synthetic year total is not the sum of its synthetic months.

use rand::Rng;
use std::ops::RangeInclusive;

/// Base steps per hour for a typical day: quiet overnight, commute peaks at
/// 07-08 and 17-18, a lunchtime peak at 12-13, tapering evening.
pub const TYPICAL_DAY: [u64; 24] = [
    40, 20, 10, 10, 20, 80, // 12am-5am
    350, 1400, 1700, 900, 600, 900, // 6am-11am
    1600, 1300, 700, 650, 900, 1800, // 12pm-5pm
    1500, 1100, 800, 500, 250, 120, // 6pm-11pm
];

/// Hourly noise is `base ± max(base / HOUR_JITTER_DIVISOR, HOUR_JITTER_FLOOR)`
const HOUR_JITTER_DIVISOR: u64 = 4;
const HOUR_JITTER_FLOOR: u64 = 50;

const DAILY_TOTAL_RANGE: RangeInclusive<u64> = 3_000..=12_000;
const MONTHLY_TOTAL_RANGE: RangeInclusive<u64> = 90_000..=330_000;
const YEARLY_TOTAL_RANGE: RangeInclusive<u64> = 1_200_000..=3_600_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeProfile {
    /// 24 hourly values following [`TYPICAL_DAY`]
    TypicalDay,
    /// One independent total per day, 3,000 to 12,000
    DailyTotals { days: usize },
    /// 12 independent monthly totals, 90,000 to 330,000
    MonthlyTotals,
    /// One independent total per year, 1,200,000 to 3,600,000
    YearlyTotals { years: usize },
}

impl ShapeProfile {
    pub fn len(&self) -> usize {
        match self {
            ShapeProfile::TypicalDay => TYPICAL_DAY.len(),
            ShapeProfile::DailyTotals { days } => *days,
            ShapeProfile::MonthlyTotals => 12,
            ShapeProfile::YearlyTotals { years } => *years,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn jitter_hour<R: Rng + ?Sized>(base: u64, rng: &mut R) -> u64 {
    let spread = (base / HOUR_JITTER_DIVISOR).max(HOUR_JITTER_FLOOR) as i64;
    let noise = rng.gen_range(-spread..=spread);
    (base as i64 + noise).max(0) as u64
}

fn totals<R: Rng + ?Sized>(count: usize, range: RangeInclusive<u64>, rng: &mut R) -> Vec<u64> {
    (0..count).map(|_| rng.gen_range(range.clone())).collect()
}

/// Generate one synthetic series for `profile`
pub fn generate<R: Rng + ?Sized>(profile: &ShapeProfile, rng: &mut R) -> Vec<u64> {
    match *profile {
        ShapeProfile::TypicalDay => TYPICAL_DAY
            .iter()
            .map(|&base| jitter_hour(base, rng))
            .collect(),
        ShapeProfile::DailyTotals { days } => totals(days, DAILY_TOTAL_RANGE, rng),
        ShapeProfile::MonthlyTotals => totals(12, MONTHLY_TOTAL_RANGE, rng),
        ShapeProfile::YearlyTotals { years } => totals(years, YEARLY_TOTAL_RANGE, rng),
    }
}
