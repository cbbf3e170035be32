use chrono::{DateTime, NaiveDate, Utc};
use stepstats::utils::parse_reference_time;
use stepstats::{
    AggregationService, Calendar, FallbackPolicy, JsonlSource, MemorySource, SampleSource,
    Timezone,
};
use tracing::debug;

use crate::cli::{AppError, Cli, Commands};
use crate::output::{
    AllViews, NumberFormat, TableOptions, ordered, print_daily_table, print_hourly_table,
    print_lifetime_table, print_monthly_table, print_yearly_table, to_json,
};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) now: DateTime<Utc>,
    pub(crate) table: TableOptions,
}

impl CommandContext<'_> {
    fn today(&self, calendar: &Calendar) -> NaiveDate {
        calendar.local_time(self.now).date()
    }
}

/// Resolve the reference time: `--at` in the chosen timezone, else now
pub(crate) fn reference_time(
    at: Option<&str>,
    timezone: Timezone,
) -> Result<DateTime<Utc>, AppError> {
    match at {
        Some(input) => parse_reference_time(input, timezone).map_err(AppError::InvalidDate),
        None => Ok(Utc::now()),
    }
}

pub(crate) async fn run(cli: &Cli, command: Commands) -> Result<(), AppError> {
    let timezone = Timezone::parse(cli.timezone.as_deref())?;
    let calendar = Calendar::new(timezone);
    let now = reference_time(cli.at.as_deref(), timezone)?;
    let ctx = CommandContext {
        cli,
        now,
        table: TableOptions {
            order: cli.sort_order(),
            use_color: cli.use_color(),
            number_format: NumberFormat::from_locale(cli.locale.as_deref())?,
        },
    };
    let fallback = FallbackPolicy {
        synthetic: !cli.no_synthetic,
        seed: cli.seed,
    };

    if cli.demo {
        debug!("demo mode, skipping sample files");
        let service =
            AggregationService::new(MemorySource::default(), calendar).with_fallback(fallback);
        return handle_command(&service, command, &ctx).await;
    }

    let source = match &cli.data_dir {
        Some(dir) => JsonlSource::new(dir),
        None => JsonlSource::discover(),
    };
    debug!(dir = ?source.data_dir(), "using sample directory");
    let service = AggregationService::new(source, calendar).with_fallback(fallback);
    handle_command(&service, command, &ctx).await
}

async fn handle_command<S: SampleSource>(
    service: &AggregationService<S>,
    command: Commands,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    match command {
        Commands::Hourly => handle_hourly(service, ctx).await,
        Commands::Daily => handle_daily(service, ctx).await,
        Commands::Monthly => handle_monthly(service, ctx).await,
        Commands::Yearly => handle_yearly(service, ctx).await,
        Commands::Lifetime => handle_lifetime(service, ctx).await,
        Commands::All => handle_all(service, ctx).await,
    }
}

async fn handle_hourly<S: SampleSource>(
    service: &AggregationService<S>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let view = service.fetch_hourly(ctx.now).await?;
    if ctx.cli.json {
        println!("{}", to_json(&ordered(view, ctx.table.order))?);
    } else {
        print_hourly_table(&view, ctx.today(service.calendar()), ctx.table);
    }
    Ok(())
}

async fn handle_daily<S: SampleSource>(
    service: &AggregationService<S>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let view = service.fetch_daily(ctx.now, ctx.cli.days()).await?;
    if ctx.cli.json {
        println!("{}", to_json(&ordered(view, ctx.table.order))?);
    } else {
        print_daily_table(&view, ctx.table);
    }
    Ok(())
}

async fn handle_monthly<S: SampleSource>(
    service: &AggregationService<S>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let view = service.fetch_monthly(ctx.now, ctx.cli.months()).await?;
    if ctx.cli.json {
        println!("{}", to_json(&ordered(view, ctx.table.order))?);
    } else {
        print_monthly_table(&view, ctx.table);
    }
    Ok(())
}

async fn handle_yearly<S: SampleSource>(
    service: &AggregationService<S>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let view = service.fetch_yearly(ctx.now, ctx.cli.years()).await?;
    if ctx.cli.json {
        println!("{}", to_json(&ordered(view, ctx.table.order))?);
    } else {
        print_yearly_table(&view, ctx.table);
    }
    Ok(())
}

async fn handle_lifetime<S: SampleSource>(
    service: &AggregationService<S>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let view = service.fetch_lifetime(ctx.now, ctx.cli.since_year).await?;
    if ctx.cli.json {
        println!("{}", to_json(&view)?);
    } else {
        print_lifetime_table(&view, ctx.table);
    }
    Ok(())
}

async fn handle_all<S: SampleSource>(
    service: &AggregationService<S>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let (hourly, daily, monthly, yearly) = tokio::join!(
        service.fetch_hourly(ctx.now),
        service.fetch_daily(ctx.now, ctx.cli.days()),
        service.fetch_monthly(ctx.now, ctx.cli.months()),
        service.fetch_yearly(ctx.now, ctx.cli.years()),
    );
    let views = AllViews {
        hourly: hourly?,
        daily: daily?,
        monthly: monthly?,
        yearly: yearly?,
    };

    if ctx.cli.json {
        println!("{}", to_json(&views.ordered(ctx.table.order))?);
    } else {
        print_hourly_table(&views.hourly, ctx.today(service.calendar()), ctx.table);
        print_daily_table(&views.daily, ctx.table);
        print_monthly_table(&views.monthly, ctx.table);
        print_yearly_table(&views.yearly, ctx.table);
    }
    Ok(())
}
