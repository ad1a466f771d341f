//! HTTP client for the Aviation Weather Center data API.
//!
//! This module fetches METAR and TAF reports as JSON and extracts the raw TAF
//! text handed to the decoder. Each request is bounded by a single timeout;
//! there is no retry.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::parser::decode_optional;
use crate::taf::DecodedTaf;

/// Default base URL of the aviation weather data API.
pub const AVIATION_WEATHER_URL: &str = "https://aviationweather.gov/api/data/";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Payload fields that may hold the raw TAF text, in lookup order.
const RAW_TAF_FIELDS: &[&str] = &["rawTAF", "rawTaf", "raw_text"];

/// Payload fields that may hold the raw METAR text.
const RAW_METAR_FIELDS: &[&str] = &["rawOb", "raw_text"];

/// Errors that can occur while fetching weather data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("API error: {status}")]
    Status { status: StatusCode },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No weather data for station {0}")]
    NotFound(String),
}

/// Configuration for the weather client.
#[derive(Debug, Clone)]
pub struct WeatherClientConfig {
    /// Base URL of the data API.
    pub base_url: String,

    /// Deadline for a whole request, body included.
    pub timeout: Duration,
}

impl Default for WeatherClientConfig {
    fn default() -> Self {
        Self {
            base_url: AVIATION_WEATHER_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl WeatherClientConfig {
    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// METAR and TAF text for one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub icao: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub raw_metar: Option<String>,
    pub raw_taf: Option<String>,
}

impl StationReport {
    /// Build a report from a `metar?...&taf=true` payload.
    pub fn from_json(icao: &str, payload: &Value) -> Result<Self, FetchError> {
        let record = first_record(payload).ok_or_else(|| FetchError::NotFound(icao.to_string()))?;

        Ok(Self {
            icao: string_field(record, &["icaoId", "icao_id"]).unwrap_or_else(|| icao.to_string()),
            name: string_field(record, &["name", "site"]).unwrap_or_else(|| icao.to_string()),
            latitude: number_field(record, &["lat", "latitude"]),
            longitude: number_field(record, &["lon", "longitude"]),
            raw_metar: string_field(record, RAW_METAR_FIELDS),
            raw_taf: record.get("taf").and_then(extract_raw_taf),
        })
    }

    /// Decode the station's TAF, or the no-data result if it has none.
    pub fn decoded_taf(&self) -> DecodedTaf {
        decode_optional(self.raw_taf.as_deref())
    }
}

/// The first record of a payload: the first array element, or the payload itself.
fn first_record(payload: &Value) -> Option<&Value> {
    match payload {
        Value::Array(items) => items.first(),
        Value::Null => None,
        other => Some(other),
    }
}

/// The first non-blank string among `fields` of a JSON object.
fn string_field(record: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| record.get(*field)?.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// The first numeric value among `fields`, accepting numbers sent as strings.
fn number_field(record: &Value, fields: &[&str]) -> Option<f64> {
    fields.iter().find_map(|field| match record.get(*field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Extract the raw TAF text from an upstream JSON payload.
///
/// Accepts a bare string, an object carrying `rawTAF`, `rawTaf` or
/// `raw_text`, an object with an embedded `taf` object, or an array whose
/// first element is any of these.
pub fn extract_raw_taf(payload: &Value) -> Option<String> {
    let record = first_record(payload)?;
    match record {
        Value::String(raw) => Some(raw.clone()).filter(|s| !s.trim().is_empty()),
        Value::Object(fields) => match fields.get("taf") {
            Some(taf) if !taf.is_null() => extract_raw_taf(taf),
            _ => string_field(record, RAW_TAF_FIELDS),
        },
        _ => None,
    }
}

/// Async client for the aviation weather data API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    config: WeatherClientConfig,
    http: Client,
}

impl WeatherClient {
    /// Create a new client with the given configuration.
    pub fn new(config: WeatherClientConfig) -> Result<Self, FetchError> {
        let http = Client::builder().build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &WeatherClientConfig {
        &self.config
    }

    /// Fetch the METAR payload for an airport.
    pub async fn fetch_metar(&self, icao: &str) -> Result<Value, FetchError> {
        let icao = normalize_icao(icao);
        self.get_json("metar", &[("ids", icao.as_str()), ("format", "json")])
            .await
    }

    /// Fetch the TAF payload for an airport.
    pub async fn fetch_taf(&self, icao: &str) -> Result<Value, FetchError> {
        let icao = normalize_icao(icao);
        self.get_json("taf", &[("ids", icao.as_str()), ("format", "json")])
            .await
    }

    /// Fetch METAR and TAF for an airport in a single request.
    pub async fn fetch_metar_and_taf(&self, icao: &str) -> Result<StationReport, FetchError> {
        let icao = normalize_icao(icao);
        let payload = self
            .get_json(
                "metar",
                &[("ids", icao.as_str()), ("format", "json"), ("taf", "true")],
            )
            .await?;
        StationReport::from_json(&icao, &payload)
    }

    /// Fetch and decode the TAF for an airport.
    ///
    /// A payload without TAF text decodes to the no-data result.
    pub async fn fetch_decoded_taf(&self, icao: &str) -> Result<DecodedTaf, FetchError> {
        let payload = self.fetch_taf(icao).await?;
        let raw = extract_raw_taf(&payload);
        if raw.is_none() {
            debug!("No TAF text in response for {}", icao);
        }
        Ok(decode_optional(raw.as_deref()))
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// GET an endpoint and parse the body as JSON, within the configured timeout.
    async fn get_json(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = self.endpoint_url(endpoint);
        info!("Fetching {} {:?}", url, query);

        let body = timeout(self.config.timeout, self.fetch_body(&url, query))
            .await
            .map_err(|_| {
                warn!("Request to {} timed out", url);
                FetchError::Timeout(self.config.timeout)
            })??;

        debug!("Received {} bytes from {}", body.len(), url);
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_body(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("API error from {}: {}", url, status);
            return Err(FetchError::Status { status });
        }

        Ok(response.text().await?)
    }
}

fn normalize_icao(icao: &str) -> String {
    icao.trim().to_ascii_uppercase()
}
