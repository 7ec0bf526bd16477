//! `poke-pricer` command-line interface.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use poke_pricer::analytics::{
    anomalies, backtest, backtest_momentum_topk, compute_signals, compute_top_movers,
    compute_window_movers, scan_anomalies, signals::DEFAULT_WINDOWS,
};
use poke_pricer::export::{export_prices_csv, write_records, write_rows};
use poke_pricer::ingest::{self, DEFAULT_SOURCE};
use poke_pricer::notify::slack::{self, DEFAULT_MAX_ROWS};
use poke_pricer::portfolio;
use poke_pricer::reports::{self, DEFAULT_STALE_DAYS};
use poke_pricer::seed::{self, DEFAULT_SEED};
use poke_pricer::{logging, Pricer, Settings};

const NO_DATA_HINT: &str = "No price data found. \
     Seed or ingest first ('poke-pricer demo seed' or 'poke-pricer ingest csv').";

#[derive(Parser)]
#[command(name = "poke-pricer")]
#[command(about = "Trading-card price tracking and analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (overrides POKEPRICER_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show package version
    Version,
    /// Run basic environment checks (always exits 0)
    Check,
    /// Create data/logs/artifacts directories
    Init {
        /// Base directory (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Print settings with secrets masked
    Env,
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
    /// Demo data
    Demo {
        #[command(subcommand)]
        command: DemoCommand,
    },
    /// Price exports
    Prices {
        #[command(subcommand)]
        command: PricesCommand,
    },
    /// Per-card return and momentum signals
    Signals {
        #[command(subcommand)]
        command: SignalsCommand,
    },
    /// Strategy backtests
    Backtest {
        #[command(subcommand)]
        command: BacktestCommand,
    },
    /// CSV ingestion
    Ingest {
        #[command(subcommand)]
        command: IngestCommand,
    },
    /// Single-day winners and losers
    Movers {
        #[command(subcommand)]
        command: MoversCommand,
    },
    /// Anomaly alerts
    Alerts {
        #[command(subcommand)]
        command: AlertsCommand,
    },
    /// Catalog summaries and rankings
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Watchlist and holdings valuation
    Portfolio {
        #[command(subcommand)]
        command: PortfolioCommand,
    },
    /// Daily report bundle
    Reports {
        #[command(subcommand)]
        command: ReportsCommand,
    },
    /// Data quality checks
    Qa {
        #[command(subcommand)]
        command: QaCommand,
    },
    /// Send alerts to external channels
    Notify {
        #[command(subcommand)]
        command: NotifyCommand,
    },
}

#[derive(Subcommand)]
enum DbCommand {
    /// Create tables in the configured database
    Init,
}

#[derive(Subcommand)]
enum DemoCommand {
    /// Insert demo cards and 30 days of prices
    Seed {
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

#[derive(Subcommand)]
enum PricesCommand {
    /// Export all prices joined with cards
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum SignalsCommand {
    /// Compute ret/sma/mom columns
    Compute {
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum BacktestCommand {
    /// Top-K momentum backtest equity curve
    Momentum {
        #[arg(long)]
        out: PathBuf,
        /// Top-K by momentum each day
        #[arg(long, default_value_t = backtest::DEFAULT_TOP_K)]
        k: usize,
        /// Momentum lookback (observations)
        #[arg(long, default_value_t = backtest::DEFAULT_LOOKBACK)]
        lookback: usize,
    },
}

#[derive(Subcommand)]
enum IngestCommand {
    /// Ingest one CSV (idempotent on card, date, source)
    Csv {
        #[arg(long)]
        file: PathBuf,
        /// Source label for rows without one
        #[arg(long)]
        source: Option<String>,
    },
    /// Validate a CSV without writing anything
    Validate {
        #[arg(long)]
        file: PathBuf,
    },
    /// Ingest every *.csv file in a directory
    Dir {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        source: Option<String>,
    },
}

#[derive(Subcommand)]
enum MoversCommand {
    /// Top-K winners and losers by 1-day return
    Top {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 5)]
        k: usize,
        /// YYYY-MM-DD (default: latest date)
        #[arg(long)]
        on_date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum AlertsCommand {
    /// Flag spikes and new highs/lows
    Scan {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = anomalies::DEFAULT_THRESHOLD)]
        threshold: f64,
        #[arg(long, default_value_t = anomalies::DEFAULT_LOOKBACK)]
        lookback: usize,
        #[arg(long)]
        on_date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// Write the catalog summary
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// Rank cards by return over a trailing window
    TopMovers {
        #[arg(long, default_value_t = 14)]
        window: usize,
        /// Number of cards (0 = all)
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Write CSV instead of printing
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PortfolioCommand {
    /// Latest prices for a watchlist CSV (name,set_code,number)
    Watchlist {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Value a holdings CSV (name,set_code,number,qty,cost_per_unit)
    Value {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum ReportsCommand {
    /// catalog_summary.csv, top_movers.csv, latest_prices.csv
    Daily {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 5)]
        k: usize,
        #[arg(long)]
        on_date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum QaCommand {
    /// qa_summary.csv, qa_duplicates.csv, qa_stale_cards.csv
    Bundle {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = DEFAULT_STALE_DAYS)]
        stale_days: i64,
    },
}

#[derive(Subcommand)]
enum NotifyCommand {
    /// Post an alerts CSV to a Slack webhook
    Slack {
        #[arg(long)]
        file: PathBuf,
        /// Webhook URL (default: POKEPRICER_SLACK_WEBHOOK_URL)
        #[arg(long)]
        webhook: Option<String>,
        /// Print the message instead of sending it
        #[arg(long)]
        dry_run: bool,
        #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
        max_rows: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(db) = cli.db.clone() {
        settings.db_path = db;
    }
    logging::init_logging(&settings.log_level)?;

    let stdout = io::stdout();
    run(cli.command, &settings, &mut stdout.lock())
}

fn open(settings: &Settings) -> anyhow::Result<Pricer> {
    Pricer::builder()
        .settings(settings)
        .build()
        .with_context(|| format!("opening database {}", settings.db_path.display()))
}

/// Dispatch commands that need no database, opening the store for the rest.
fn run(command: Commands, settings: &Settings, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Commands::Version => writeln!(out, "poke-pricer {}", env!("CARGO_PKG_VERSION"))?,
        Commands::Check => {
            if !settings.data_dir.exists() {
                writeln!(
                    out,
                    "- Data dir not found: {} (this is OK; run 'poke-pricer init' to create it)",
                    settings.data_dir.display()
                )?;
            }
            writeln!(out, "Environment OK")?;
        }
        Commands::Init { dir } => {
            let base = dir.unwrap_or_else(|| PathBuf::from("."));
            for sub in ["data", "logs", "artifacts"] {
                let p = base.join(sub);
                fs::create_dir_all(&p)?;
                writeln!(out, "Created {}", p.display())?;
            }
            writeln!(out, "Initialization complete")?;
        }
        Commands::Env => {
            for (k, v) in settings.public_view() {
                writeln!(out, "{k} = {v}")?;
            }
        }
        Commands::Db {
            command: DbCommand::Init,
        } => {
            open(settings)?;
            writeln!(out, "Database initialized at {}", settings.db_path.display())?;
        }
        Commands::Ingest {
            command: IngestCommand::Validate { file },
        } => {
            let report = ingest::validate_csv(&file)?;
            for e in &report.errors {
                writeln!(out, "- {e}")?;
            }
            writeln!(
                out,
                "Validated {} rows: {} valid, {} invalid.",
                report.rows, report.valid, report.invalid
            )?;
        }
        Commands::Notify { command } => run_notify(command, settings, out)?,
        command => run_with(command, &open(settings)?, out)?,
    }
    Ok(())
}

/// Commands that read or write the price store.
fn run_with(command: Commands, pricer: &Pricer, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Commands::Demo {
            command: DemoCommand::Seed { seed },
        } => {
            let today = Local::now().date_naive();
            let (cards, prices) = seed::seed_demo(pricer, seed, today)?;
            writeln!(out, "Seeded {cards} cards and {prices} price points.")?;
        }
        Commands::Prices {
            command: PricesCommand::Export { out: path },
        } => {
            let n = export_prices_csv(&pricer.load_price_table()?, &path)?;
            writeln!(out, "Exported {n} rows to {}", path.display())?;
        }
        Commands::Signals {
            command: SignalsCommand::Compute { out: path },
        } => {
            let table = pricer.load_price_table()?;
            if table.is_empty() {
                writeln!(out, "{NO_DATA_HINT}")?;
                return Ok(());
            }
            let signals = compute_signals(&table, &DEFAULT_WINDOWS)?;
            let n = write_records(&path, &signals.columns(), signals.records())?;
            writeln!(out, "Signals written to {} ({n} rows).", path.display())?;
        }
        Commands::Backtest {
            command: BacktestCommand::Momentum { out: path, k, lookback },
        } => {
            let table = pricer.load_price_table()?;
            if table.is_empty() {
                writeln!(out, "{NO_DATA_HINT}")?;
                return Ok(());
            }
            let rows = backtest_momentum_topk(&table, lookback, k)?;
            write_rows(&path, &rows)?;
            let tail = rows
                .last()
                .map(|r| format!(" last_equity={:.4}", r.equity))
                .unwrap_or_default();
            writeln!(
                out,
                "Backtest written to {} ({} rows).{tail}",
                path.display(),
                rows.len()
            )?;
        }
        Commands::Ingest { command } => run_ingest(command, pricer, out)?,
        Commands::Movers {
            command: MoversCommand::Top { out: path, k, on_date },
        } => {
            let table = pricer.load_price_table()?;
            let n = write_rows(&path, &compute_top_movers(&table, k, on_date))?;
            writeln!(out, "Top movers written to {} ({n} rows).", path.display())?;
        }
        Commands::Alerts {
            command:
                AlertsCommand::Scan {
                    out: path,
                    threshold,
                    lookback,
                    on_date,
                },
        } => {
            let table = pricer.load_price_table()?;
            let rows = scan_anomalies(&table, threshold, lookback, on_date)?;
            let n = write_rows(&path, &rows)?;
            writeln!(out, "Alerts written to {} ({n} rows).", path.display())?;
        }
        Commands::Catalog { command } => run_catalog(command, pricer, out)?,
        Commands::Portfolio { command } => run_portfolio(command, pricer, out)?,
        Commands::Reports {
            command: ReportsCommand::Daily { out: dir, k, on_date },
        } => {
            for path in reports::write_daily_reports(pricer, &dir, k, on_date)? {
                writeln!(out, "Wrote {}", path.display())?;
            }
        }
        Commands::Qa {
            command: QaCommand::Bundle { out: dir, stale_days },
        } => {
            for path in reports::write_qa_bundle(pricer, &dir, stale_days)? {
                writeln!(out, "Wrote {}", path.display())?;
            }
        }
        _ => bail!("command does not use the price store"),
    }
    Ok(())
}

fn run_ingest(command: IngestCommand, pricer: &Pricer, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        IngestCommand::Csv { file, source } => {
            let source = source.unwrap_or_else(|| DEFAULT_SOURCE.to_string());
            let summary = ingest::ingest_csv(pricer, &file, &source)?;
            summary.log_summary("ingest csv");
            writeln!(
                out,
                "Ingest complete (cards_created={}, prices_inserted={}, skipped={}).",
                summary.cards_created, summary.prices_inserted, summary.prices_skipped
            )?;
        }
        IngestCommand::Dir { path, source } => {
            let source = source.unwrap_or_else(|| DEFAULT_SOURCE.to_string());
            let summary = ingest::ingest_dir(pricer, &path, &source)?;
            summary.log_summary("ingest dir");
            writeln!(
                out,
                "Directory ingest complete (cards_created={}, prices_inserted={}, skipped={}).",
                summary.cards_created, summary.prices_inserted, summary.prices_skipped
            )?;
        }
        IngestCommand::Validate { .. } => bail!("validate does not use the price store"),
    }
    Ok(())
}

fn run_catalog(
    command: CatalogCommand,
    pricer: &Pricer,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        CatalogCommand::Export { out: path } => {
            let summary = pricer.catalog().summary()?;
            write_rows(&path, &[summary])?;
            writeln!(out, "Catalog summary written to {}", path.display())?;
        }
        CatalogCommand::TopMovers { window, top, out: path } => {
            let table = pricer.load_price_table()?;
            let rows = compute_window_movers(&table, window, top);
            match path {
                Some(path) => {
                    write_rows(&path, &rows)?;
                    writeln!(
                        out,
                        "Top movers written to {} ({} rows).",
                        path.display(),
                        rows.len()
                    )?;
                }
                None if rows.is_empty() => writeln!(out, "No movers for a {window}-day window.")?,
                None => {
                    for r in rows {
                        writeln!(
                            out,
                            "{:>3}. {} [{} #{}] {:.2} ({:+.2}%) {}",
                            r.rank,
                            r.name,
                            r.set_code,
                            r.number,
                            r.last_price,
                            r.ret_window * 100.0,
                            r.last_date
                        )?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn run_portfolio(
    command: PortfolioCommand,
    pricer: &Pricer,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let table = pricer.load_price_table()?;
    match command {
        PortfolioCommand::Watchlist { file, out: path } => {
            let watchlist = portfolio::read_watchlist(&file)?;
            let n = write_rows(&path, &portfolio::watchlist_latest_prices(&table, &watchlist))?;
            writeln!(out, "Watchlist written to {} ({n} rows).", path.display())?;
        }
        PortfolioCommand::Value { file, out: path } => {
            let holdings = portfolio::read_holdings(&file)?;
            let rows = portfolio::value_holdings_csv(&table, &holdings);
            let total: f64 = rows.iter().map(|r| r.market_value).sum();
            write_rows(&path, &rows)?;
            writeln!(
                out,
                "Portfolio written to {} ({} rows, market value {total:.2}).",
                path.display(),
                rows.len()
            )?;
        }
    }
    Ok(())
}

fn run_notify(
    command: NotifyCommand,
    settings: &Settings,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let NotifyCommand::Slack {
        file,
        webhook,
        dry_run,
        max_rows,
    } = command;

    let rows = slack::read_alerts(&file)
        .with_context(|| format!("reading alerts from {}", file.display()))?;
    let text = slack::build_alerts_text(&rows, max_rows);
    if dry_run {
        writeln!(out, "DRY-RUN Slack message:")?;
        writeln!(out, "{text}")?;
        return Ok(());
    }
    let Some(url) = webhook.or_else(|| settings.slack_webhook_url.clone()) else {
        bail!("no webhook: pass --webhook or set POKEPRICER_SLACK_WEBHOOK_URL");
    };
    let result = slack::post_text(&url, &text, settings.http_timeout())?;
    if !result.ok {
        bail!("Slack returned HTTP {}: {}", result.status, result.body);
    }
    writeln!(out, "Slack message sent (HTTP {}).", result.status)?;
    Ok(())
}
