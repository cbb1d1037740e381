//! Forecast Command Line Interface
//!
//! Polls the chain, price and history sources and prints issuance reports.

mod config;
mod report;

use crate::config::AppConfig;
use crate::report::{HistoryRow, Report};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forecast_feeds::FeedSet;
use forecast_issuance::{IssuanceCalculator, MiningCost, PeriodHistory, PeriodRolloverTracker};
use serde::Serialize;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "forecast")]
#[command(about = "Gas-token issuance forecast", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (overrides the configured level; RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch once and print the full report
    Snapshot,
    /// Poll on an interval until interrupted
    Watch {
        /// Seconds between polls (defaults to poll_interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// List recent completed adjustment periods
    History {
        /// Number of periods to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Cost to mint one token at a given L1 gas price
    Cost {
        /// L1 gas price in gwei (defaults to the current L1 gas price)
        #[arg(long)]
        gas_price: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    init_logging(&config);

    let feeds = FeedSet::new(&config.feed_config()).context("failed to build data sources")?;
    let calculator = IssuanceCalculator::default();

    match cli.command {
        Commands::Snapshot => handle_snapshot(&feeds, &calculator).await,
        Commands::Watch { interval } => {
            let secs = interval.unwrap_or(config.poll_interval_secs).max(1);
            handle_watch(&feeds, &calculator, Duration::from_secs(secs)).await
        }
        Commands::History { limit } => {
            handle_history(&feeds, &calculator, limit.unwrap_or(config.history_limit)).await
        }
        Commands::Cost { gas_price } => handle_cost(&feeds, &calculator, gas_price).await,
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Logs go to stderr so stdout stays parseable JSON.
    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn fetch_history(feeds: &FeedSet) -> Option<PeriodHistory> {
    match feeds.fetch_history().await {
        Ok(history) => Some(history),
        Err(err) => {
            warn!("period history unavailable: {err}");
            None
        }
    }
}

async fn build_report(
    feeds: &FeedSet,
    calculator: &IssuanceCalculator,
    history: Option<&PeriodHistory>,
) -> Result<Report> {
    let inputs = feeds
        .collect_inputs()
        .await
        .context("data unavailable")?;
    let market = feeds.collect_market().await;
    Report::build(calculator, &inputs, market, history).context("height outside the schedule")
}

async fn handle_snapshot(feeds: &FeedSet, calculator: &IssuanceCalculator) -> Result<()> {
    let history = fetch_history(feeds).await;
    let report = build_report(feeds, calculator, history.as_ref()).await?;
    info!(
        height = report.inputs.height,
        period = report.period.period_index,
        "snapshot complete"
    );
    print_json(&report)
}

async fn handle_watch(
    feeds: &FeedSet,
    calculator: &IssuanceCalculator,
    interval: Duration,
) -> Result<()> {
    info!(interval_secs = interval.as_secs(), "watching issuance");

    let mut watcher = Watcher {
        feeds,
        calculator,
        tracker: None,
        history: fetch_history(feeds).await,
    };
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    poll_until(interval, shutdown, &mut watcher).await
}

/// One refresh of a polling loop.
trait Refresh {
    async fn refresh(&mut self) -> Result<()>;
}

/// Drive `target` once per `interval` until `shutdown` resolves.
///
/// `shutdown` is created once and polled first on every pass, so a signal
/// raised while a refresh is in flight stops the loop right after it.
async fn poll_until<S, R>(interval: Duration, shutdown: S, target: &mut R) -> Result<()>
where
    S: Future<Output = ()>,
    R: Refresh,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("interrupted, stopping");
                return Ok(());
            }
            _ = ticker.tick() => target.refresh().await?,
        }
    }
}

struct Watcher<'a> {
    feeds: &'a FeedSet,
    calculator: &'a IssuanceCalculator,
    /// Seeded from the first report so startup is not taken for a rollover.
    tracker: Option<PeriodRolloverTracker>,
    history: Option<PeriodHistory>,
}

impl Refresh for Watcher<'_> {
    async fn refresh(&mut self) -> Result<()> {
        let report = match build_report(self.feeds, self.calculator, self.history.as_ref()).await {
            Ok(report) => report,
            Err(err) => {
                warn!("{err:#}");
                return Ok(());
            }
        };

        let params = self.calculator.params();
        let height = report.inputs.height;
        let tracker = self
            .tracker
            .get_or_insert_with(|| PeriodRolloverTracker::starting_at(height, params));
        if tracker.observe(height, params) {
            info!(
                period = report.period.period_index,
                start_block = report.period.start_block,
                "new adjustment period"
            );
            self.history = fetch_history(self.feeds).await.or(self.history.take());
        }
        print_json(&report)
    }
}

async fn handle_history(
    feeds: &FeedSet,
    calculator: &IssuanceCalculator,
    limit: usize,
) -> Result<()> {
    let history = feeds
        .fetch_history()
        .await
        .context("period history unavailable")?;
    let rows = history
        .recent(limit)
        .iter()
        .map(|record| HistoryRow::new(calculator, record))
        .collect::<Result<Vec<_>, _>>()?;
    info!(shown = rows.len(), total = history.len(), "period history");
    print_json(&rows)
}

async fn handle_cost(
    feeds: &FeedSet,
    calculator: &IssuanceCalculator,
    gas_price: Option<f64>,
) -> Result<()> {
    let inputs = feeds
        .collect_inputs()
        .await
        .context("data unavailable")?;
    let market = feeds.collect_market().await;

    let gas_price = gas_price
        .or(market.l1_gas_price_gwei)
        .context("no L1 gas price given and none available")?;
    let eth_usd = market.eth_usd.context("ETH price unavailable")?;

    let forecasted_rate = match calculator.forecast(&inputs) {
        Ok(forecast) => Some(forecast.forecasted_rate),
        Err(err) => {
            warn!("forecast unavailable: {err}");
            None
        }
    };

    let cost = MiningCost::new(gas_price, eth_usd, inputs.current_mint_rate, forecasted_rate)?;
    print_json(&cost)
}
