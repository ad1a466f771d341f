//! Radar loop image lookup.
//!
//! Maps the dashboard's region names onto the NWS RIDGE standard loop images.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Base URL of the RIDGE standard radar loops.
pub const RADAR_BASE_URL: &str = "https://radar.weather.gov/ridge/standard";

/// Region key used when a requested region is unknown.
pub const DEFAULT_REGION: &str = "conus";

/// Region keys and the image names they map to.
static REGIONS: &[(&str, &str)] = &[
    ("conus", "CONUS"),
    ("northeast", "northeastern"),
    ("southeast", "southeastern"),
    ("midwest", "central"),
    ("southern", "southern"),
    ("southwest", "southwestern"),
    ("northwest", "northwestern"),
];

/// A radar loop image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadarImage {
    pub image_url: String,
    /// When the reference was produced.
    pub timestamp: DateTime<Utc>,
}

/// The image name for a region key (case-insensitive), falling back to CONUS.
pub fn region_image_name(region: &str) -> &'static str {
    let region = region.trim().to_ascii_lowercase();
    REGIONS
        .iter()
        .find(|(key, _)| *key == region)
        .map(|(_, name)| *name)
        .unwrap_or("CONUS")
}

/// All known region keys.
pub fn region_keys() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|(key, _)| *key)
}

/// Build the radar loop reference for a region.
pub fn radar_image(region: &str) -> RadarImage {
    RadarImage {
        image_url: format!("{}/{}_loop.gif", RADAR_BASE_URL, region_image_name(region)),
        timestamp: Utc::now(),
    }
}
