/// Upper bound on any lookback count (days, months or years)
pub(crate) const MAX_PERIODS_BACK: u32 = 10_000;

/// Years shown by the lifetime view when neither the caller nor the source
/// provides a first year
pub(crate) const DEFAULT_LIFETIME_YEARS: u32 = 5;
