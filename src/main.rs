use anyhow::{Context, Result, anyhow};
use avyforecast::models::ForecastRecord;
use avyforecast::{
    AppConfig, Forecast, RawSource, calculate_trend_with, classify_trend, extract_forecast,
    logging, weather_product_id,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "avyforecast",
    version,
    about = "Avalanche forecast extraction and trend classification"
)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a forecast from a captured page or API product and print the record
    Extract {
        /// Zone id, e.g. "northwest" or "southeast_mountains"
        #[arg(long)]
        zone: String,
        /// Captured content
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = InputFormat::Text)]
        format: InputFormat,
        /// Day the content was captured for (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Previous day's forecast as JSON, for trend comparison
        #[arg(long)]
        previous: Option<PathBuf>,
    },
    /// Aggregate trend of daily observation counts, oldest first
    Observations {
        /// Comma separated counts, e.g. 1,1,1,5,6
        #[arg(long, value_delimiter = ',', required = true)]
        counts: Vec<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    /// Rendered page text
    Text,
    /// Page markup
    Html,
    /// API forecast product
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from_path(cli.config.clone())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging)?;

    match cli.command {
        Command::Extract {
            zone,
            input,
            format,
            date,
            previous,
        } => run_extract(&config, &zone, &input, format, date, previous.as_deref()),
        Command::Observations { counts } => {
            let trend = calculate_trend_with(&counts, &config.analysis);
            println!("{trend}");
            Ok(())
        }
    }
}

fn run_extract(
    config: &AppConfig,
    zone: &str,
    input: &Path,
    format: InputFormat,
    date: Option<NaiveDate>,
    previous: Option<&Path>,
) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let captured_on = date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let source = match format {
        InputFormat::Text => RawSource::page_text(&content, captured_on),
        InputFormat::Html => RawSource::page_html(content, captured_on),
        InputFormat::Json => {
            let payload: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", input.display()))?;
            if let Some(id) = weather_product_id(&payload) {
                info!(weather_product_id = id, "Forecast references a separate weather product");
            }
            RawSource::api_payload(payload, captured_on)
        }
    };

    let forecast = extract_forecast(&source, zone).map_err(|e| anyhow!(e.user_message()))?;

    let previous: Option<Forecast> = previous
        .map(|path| -> Result<Forecast> {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("{} is not a serialized forecast", path.display()))
        })
        .transpose()?;

    let trend = classify_trend(&forecast, previous.as_ref());
    print_json(&ForecastRecord::new(&forecast, &trend), config.output.pretty_json)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
