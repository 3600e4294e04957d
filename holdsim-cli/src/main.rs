//! HoldSim CLI — load sparse ledgers, recompute, and print the series
//! report.
//!
//! Usage:
//! - `holdsim transactions.csv` — history defaults to `history.csv`
//! - `holdsim transactions.csv history.csv dividends.csv --reinvest`
//! - `holdsim transactions.json history.json --json -o report.txt`

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use holdsim_core::data::DataFormat;
use holdsim_core::domain::Instrument;
use holdsim_core::report::render_report;

#[derive(Parser)]
#[command(
    name = "holdsim",
    about = "HoldSim — reconstruct daily holding series from sparse records"
)]
struct Cli {
    /// File containing transaction data (date,amount rows).
    transactions: PathBuf,

    /// File containing price history data.
    #[arg(default_value = "history.csv")]
    history: PathBuf,

    /// File containing dividend data.
    dividends: Option<PathBuf>,

    /// Input files use the structured JSON format instead of delimited text.
    #[arg(short, long)]
    json: bool,

    /// Reinvest dividends into the share count.
    #[arg(short, long)]
    reinvest: bool,

    /// Write the report to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = if cli.json {
        DataFormat::Json
    } else {
        DataFormat::Csv
    };

    let transactions_text = read(&cli.transactions)?;
    let history_text = read(&cli.history)?;
    let dividends_text = cli.dividends.as_deref().map(read).transpose()?;

    let mut instrument = Instrument::load(
        &history_text,
        &transactions_text,
        dividends_text.as_deref(),
        format,
    )
    .context("failed to load input data")?;
    instrument.set_reinvest(cli.reinvest);
    instrument
        .recompute()
        .context("failed to compute derived series")?;

    let report = render_report(instrument.derived()?);
    match &cli.output {
        Some(path) => fs::write(path, report)
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => print!("{report}"),
    }
    Ok(())
}

fn read(path: &std::path::Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
