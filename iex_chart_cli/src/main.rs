mod commands;
mod output;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use iex_chart_api::{Client, DEFAULT_BASE_URL};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "iexchart")]
#[command(about = "Fetch daily stock chart records from the IEX API")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// API base URL, including the version segment
    #[arg(long, env = "IEX_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "IEX_TIMEOUT_SECS", default_value = "30", global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the two-year daily chart for a symbol, optionally narrowed to a window
    Chart(commands::chart::ChartArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("iexchart=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    let client = Client::with_base_url(&cli.base_url)
        .with_timeout(Duration::from_secs(cli.timeout_secs));

    match &cli.command {
        Commands::Chart(args) => commands::chart::run(args, &client, &format).await?,
    }

    Ok(())
}
