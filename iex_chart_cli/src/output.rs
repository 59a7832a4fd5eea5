use anyhow::Result;
use iex_chart_api::ChartRecord;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Unknown names fall back to a table.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct ChartRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    #[serde(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    #[serde(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    #[serde(rename = "Close")]
    close: String,
    #[tabled(rename = "Volume")]
    #[serde(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Change %")]
    #[serde(rename = "Change %")]
    change_percent: String,
    #[tabled(rename = "VWAP")]
    #[serde(rename = "VWAP")]
    vwap: String,
}

fn build_chart_rows(records: &[ChartRecord]) -> Vec<ChartRow> {
    records
        .iter()
        .map(|r| ChartRow {
            date: r.date.clone(),
            open: format_price(r.open),
            high: format_price(r.high),
            low: format_price(r.low),
            close: format_price(r.close),
            volume: format_volume(r.volume),
            change_percent: format!("{:+.2}%", r.change_percent),
            vwap: format_price(r.vwap),
        })
        .collect()
}

pub fn print_chart_table(records: &[ChartRecord]) {
    println!("{}", Table::new(build_chart_rows(records)));
}

pub fn print_chart_markdown(records: &[ChartRecord]) {
    let mut table = Table::new(build_chart_rows(records));
    table.with(Style::markdown());
    println!("{}", table);
}

const CSV_HEADERS: [&str; 8] = [
    "Date", "Open", "High", "Low", "Close", "Volume", "Change %", "VWAP",
];

pub fn print_chart_csv(records: &[ChartRecord]) -> Result<()> {
    write_chart_csv(std::io::stdout(), records)
}

/// The header row is written even when there are no records.
fn write_chart_csv<W: std::io::Write>(writer: W, records: &[ChartRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for row in build_chart_rows(records) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

fn format_volume(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}
