//! Command-line interface for stock-broker
//!
//! Reads one evaluation request (stdin by default), merges it with the
//! historic price file, rewrites that file, and prints the action list.

use anyhow::Context;
use broker_core::{
    Action, Broker, EvaluationRequest, OutputFormat, StockReport, history_from_stocks,
    render_report,
};
use broker_history::HistoricPriceStore;
use broker_utils::EngineConfig;
use clap::{Parser, ValueEnum};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Count line, then one `name KIND quantity` line per action
    Lines,
    /// JSON array of actions
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Lines => OutputFormat::Lines,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "stock-broker")]
#[command(about = "Rank stocks and decide this period's buy/sell actions", long_about = None)]
struct Args {
    /// JSON engine configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Historic price file (overrides config and STOCK_BROKER_DATA)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Read the request from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output format for the action list
    #[arg(short, long, value_enum, default_value_t = Format::Lines)]
    format: Format,

    /// Print the ranked stock report to stderr
    #[arg(long)]
    report: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;
    broker_utils::init_tracing_with_filter(&config.log_filter);

    info!(data = %config.data_path.display(), "Starting stock-broker");

    let input = read_input(args.input.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    run(&config, &input, args.format.into(), args.report, &mut out)?;
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    }
    .with_env();

    if let Some(data) = &args.data {
        config = config.with_data_path(data);
    }
    config.validate()?;
    Ok(config)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file '{}'", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read input from stdin")?;
            Ok(input)
        }
    }
}

/// One full evaluation: load history, parse, persist, decide, render
fn run<W: Write>(
    config: &EngineConfig,
    input: &str,
    format: OutputFormat,
    show_report: bool,
    out: &mut W,
) -> anyhow::Result<Vec<Action>> {
    let history = HistoricPriceStore::load(&config.data_path).with_context(|| {
        format!(
            "Failed to read historic prices from '{}'",
            config.data_path.display()
        )
    })?;

    let request = EvaluationRequest::parse(input).context("Failed to parse evaluation request")?;
    info!(
        stocks = request.quotes.len(),
        days_remaining = request.days_remaining,
        "Evaluating"
    );

    let stocks = request.build_stocks(&history)?;
    history_from_stocks(&stocks)
        .save(&config.data_path)
        .with_context(|| {
            format!(
                "Failed to write historic prices to '{}'",
                config.data_path.display()
            )
        })?;

    let report = StockReport::new(stocks);
    if show_report {
        eprintln!("{}", render_report(&report));
    }

    let mut broker = Broker::new(request.spendable_cash, config)?;
    let choices = broker.make_decisions(&report, format, out)?;
    Ok(choices)
}
