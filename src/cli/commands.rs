//! CLI subcommand definitions

use clap::Subcommand;

/// Main CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub(crate) enum Commands {
    /// Steps per hour of the current day (default)
    Hourly,
    /// Hourly steps for each of the last days
    Daily,
    /// Daily steps for each of the last months
    Monthly,
    /// Monthly steps for each of the last years
    Yearly,
    /// Yearly totals since the first recorded year
    Lifetime,
    /// Hourly, daily, monthly and yearly views at once
    All,
}

/// Parse CLI command, defaulting to the hourly view
pub(crate) fn parse_command(cmd: Option<Commands>) -> Commands {
    cmd.unwrap_or(Commands::Hourly)
}
