//! The `chart` subcommand: fetches a symbol's daily chart and narrows it to a window.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use iex_chart_api::Client;

use crate::output::{
    print_chart_csv, print_chart_markdown, print_chart_table, print_json, OutputFormat,
};

/// Arguments for the `chart` subcommand.
///
/// The window is given either as calendar dates (`--since`/`--until`) or as raw
/// Unix milliseconds (`--start-ms`/`--end-ms`), not both. Omitting every bound
/// prints the whole two-year chart.
#[derive(Args)]
pub struct ChartArgs {
    /// Ticker symbol (e.g. AAPL)
    pub symbol: String,

    /// Keep trading days on/after this date (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["start_ms", "end_ms"])]
    pub since: Option<String>,

    /// Keep trading days before this date (YYYY-MM-DD, exclusive)
    #[arg(long, conflicts_with_all = ["start_ms", "end_ms"])]
    pub until: Option<String>,

    /// Window start in Unix milliseconds (exclusive)
    #[arg(long, allow_hyphen_values = true)]
    pub start_ms: Option<i64>,

    /// Window end in Unix milliseconds (exclusive)
    #[arg(long, allow_hyphen_values = true)]
    pub end_ms: Option<i64>,
}

pub async fn run(args: &ChartArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let records = match resolve_window(args)? {
        Some((start, end)) => {
            tracing::info!("Fetching {} chart in window [{}, {})", args.symbol, start, end);
            client.fetch_records_by_millis(&args.symbol, start, end).await?
        }
        None => {
            tracing::info!("Fetching full {} chart", args.symbol);
            client.fetch_chart(&args.symbol).await?
        }
    };

    eprintln!("{} records for {}", records.len(), args.symbol);

    match format {
        OutputFormat::Table => print_chart_table(&records),
        OutputFormat::Json => print_json(&records),
        OutputFormat::Csv => print_chart_csv(&records)?,
        OutputFormat::Markdown => print_chart_markdown(&records),
    }

    Ok(())
}

/// Turns the window flags into millisecond bounds. `None` means no window was requested.
fn resolve_window(args: &ChartArgs) -> Result<Option<(i64, i64)>> {
    if args.since.is_none()
        && args.until.is_none()
        && args.start_ms.is_none()
        && args.end_ms.is_none()
    {
        return Ok(None);
    }

    let start = match &args.since {
        Some(since) => date_to_millis(since).context("--since")?,
        None => args.start_ms.unwrap_or(i64::MIN),
    };
    let end = match &args.until {
        Some(until) => date_to_millis(until).context("--until")?,
        None => args.end_ms.unwrap_or(i64::MAX),
    };

    if start >= end {
        bail!("window start must be before its end");
    }
    Ok(Some((start, end)))
}

/// Parse a YYYY-MM-DD date and return its midnight UTC in Unix milliseconds.
fn date_to_millis(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").with_context(|| {
        format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2024-06-01)",
            trimmed
        )
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}
