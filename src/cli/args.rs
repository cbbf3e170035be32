//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode, ConfigSortOrder};

use super::commands::Commands;

const DEFAULT_DAYS: u32 = 7;
const DEFAULT_MONTHS: u32 = 1;
const DEFAULT_YEARS: u32 = 1;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum SortOrder {
    /// Oldest first (default)
    #[default]
    Asc,
    /// Newest first
    Desc,
}

impl From<SortOrder> for stepstats::SortOrder {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => stepstats::SortOrder::Asc,
            SortOrder::Desc => stepstats::SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Parser)]
#[command(name = "stepstats")]
#[command(about = "Step counts by hour, day, month and year", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Reference time (YYYY-MM-DD or RFC 3339, default: now)
    #[arg(long, global = true, value_name = "TIME")]
    pub(crate) at: Option<String>,

    /// Timezone for bucketing (e.g., "Europe/Berlin", "UTC", "local")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Number of days for the daily view
    #[arg(long, global = true, value_name = "N")]
    pub(crate) days: Option<u32>,

    /// Number of months for the monthly view
    #[arg(long, global = true, value_name = "N")]
    pub(crate) months: Option<u32>,

    /// Number of years for the yearly view
    #[arg(long, global = true, value_name = "N")]
    pub(crate) years: Option<u32>,

    /// First year of the lifetime view (default: year of the oldest sample)
    #[arg(long, global = true, value_name = "YEAR")]
    pub(crate) since_year: Option<i32>,

    /// Directory of *.jsonl sample files
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) data_dir: Option<PathBuf>,

    /// Skip the data directory and show synthetic data
    #[arg(long, global = true)]
    pub(crate) demo: bool,

    /// Seed for reproducible synthetic data
    #[arg(long, global = true, value_name = "SEED")]
    pub(crate) seed: Option<u64>,

    /// Show zeros instead of synthetic data when no samples exist
    #[arg(long, global = true)]
    pub(crate) no_synthetic: bool,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Sort order for results
    #[arg(short, long, global = true, value_enum, default_value = "asc")]
    pub(crate) order: SortOrder,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Locale for number formatting (e.g., "en", "de", "fr")
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,

    /// Enable debug output (show processing details)
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // Boolean flags: config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.no_synthetic && config.no_synthetic {
            self.no_synthetic = true;
        }

        // Enum values: config only applies if CLI is at its default
        if config.order == Some(ConfigSortOrder::Desc) && self.order == SortOrder::Asc {
            self.order = SortOrder::Desc;
        }
        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        // Optional values: only apply if CLI didn't set them
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }
        if self.data_dir.is_none() {
            self.data_dir = config.data_dir.clone();
        }
        self.seed = self.seed.or(config.seed);
        self.days = self.days.or(config.days);
        self.months = self.months.or(config.months);
        self.years = self.years.or(config.years);
        self.since_year = self.since_year.or(config.lifetime_start);

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn sort_order(&self) -> stepstats::SortOrder {
        self.order.into()
    }

    pub(crate) fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_DAYS)
    }

    pub(crate) fn months(&self) -> u32 {
        self.months.unwrap_or(DEFAULT_MONTHS)
    }

    pub(crate) fn years(&self) -> u32 {
        self.years.unwrap_or(DEFAULT_YEARS)
    }
}
