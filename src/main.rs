//! TAF Decoder CLI - Decode Terminal Aerodrome Forecasts from text or the aviation weather API.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use taf_decoder::{
    client::{StationReport, WeatherClient},
    config::{Config, is_icao_code},
    parser::{decode_taf, looks_like_taf},
    radar::{radar_image, region_keys},
    taf::DecodedTaf,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// TAF Decoder - Decode Terminal Aerodrome Forecasts into plain language
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw TAF text to decode ("-" reads from stdin)
    #[arg(short, long)]
    taf: Option<String>,

    /// Airport ICAO code to fetch the TAF for
    #[arg(short, long, env = "TAF_AIRPORT")]
    airport: Option<String>,

    /// Also fetch and print the station's raw METAR
    #[arg(short, long)]
    metar: bool,

    /// Print the radar loop image URL for a region (defaults to the configured region)
    #[arg(long, num_args = 0..=1, value_name = "REGION")]
    radar: Option<Option<String>>,

    /// Aviation weather API base URL
    #[arg(long, env = "TAF_API_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the decoded forecast as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// JSON document for a fetched station.
#[derive(Serialize)]
struct StationOutput<'a> {
    station: &'a StationReport,
    taf: &'a DecodedTaf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    config.validate()?;
    debug!("Using API at {}", config.base_url);

    if let Some(region) = radar_region(args.radar.as_ref(), &config) {
        if !region_keys().any(|key| key.eq_ignore_ascii_case(region.trim())) {
            warn!(
                "Unknown radar region {}, showing conus (known: {})",
                region,
                region_keys().collect::<Vec<_>>().join(", ")
            );
        }
        let image = radar_image(region);
        println!("Radar: {} ({})", image.image_url, image.timestamp.to_rfc3339());
        if args.taf.is_none() && args.airport.is_none() {
            return Ok(());
        }
    }

    if let Some(raw) = &args.taf {
        let raw = if raw == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read TAF from stdin")?;
            buf
        } else {
            raw.clone()
        };

        if !looks_like_taf(&raw) {
            warn!("Input has no validity period group, decoding anyway");
        }
        print!("{}", render(&decode_taf(&raw), args.json)?);
        return Ok(());
    }

    let airport = args
        .airport
        .clone()
        .unwrap_or_else(|| config.default_airport.clone())
        .to_ascii_uppercase();
    if !is_icao_code(&airport) {
        warn!("{} does not look like an ICAO code", airport);
    }

    let client = WeatherClient::new(config.client_config())?;
    info!(
        "Fetching TAF for {} (timeout {:?})",
        airport,
        client.config().timeout
    );

    if args.metar {
        let report = client
            .fetch_metar_and_taf(&airport)
            .await
            .with_context(|| format!("Failed to fetch weather for {}", airport))?;
        print!("{}", render_station(&report, args.json)?);
    } else {
        let decoded = client
            .fetch_decoded_taf(&airport)
            .await
            .with_context(|| format!("Failed to fetch TAF for {}", airport))?;
        print!("{}", render(&decoded, args.json)?);
    }

    Ok(())
}

/// The radar region to show: the flag's value, or the configured region for a bare `--radar`.
fn radar_region<'a>(flag: Option<&'a Option<String>>, config: &'a Config) -> Option<&'a str> {
    flag.map(|region| region.as_deref().unwrap_or(&config.radar_region))
}

/// Render a decoded TAF as text or pretty JSON.
fn render(decoded: &DecodedTaf, json: bool) -> Result<String> {
    debug!(
        "Rendering {} with {} change groups",
        decoded.header.station,
        decoded.changes().len()
    );
    if json {
        let mut out = serde_json::to_string_pretty(decoded)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(decoded.to_string())
    }
}

/// Render a station's METAR followed by its decoded TAF.
fn render_station(report: &StationReport, json: bool) -> Result<String> {
    let decoded = report.decoded_taf();
    if json {
        let output = StationOutput {
            station: report,
            taf: &decoded,
        };
        let mut out = serde_json::to_string_pretty(&output)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = format!("{} - {}\n", report.icao, report.name);
    out.push_str(&format!(
        "METAR: {}\n",
        report.raw_metar.as_deref().unwrap_or("No METAR available")
    ));
    out.push_str(&format!(
        "TAF: {}\n\n",
        report.raw_taf.as_deref().unwrap_or("No TAF available")
    ));
    out.push_str(&render(&decoded, false)?);
    Ok(out)
}
