//! TAF Decoder - A Rust library for decoding Terminal Aerodrome Forecasts.
//!
//! This crate provides:
//! - A nom-based decoder turning raw TAF text into structured forecast segments
//! - An async client for the aviation weather data API
//! - Radar loop image lookup by region
//!
//! # Example
//!
//! ```rust
//! use taf_decoder::parser::decode_taf;
//!
//! let taf = decode_taf("KJFK 171753Z 1718/1824 27015KT 10SM FEW038 FM172100 29020KT 5SM HZ");
//!
//! for segment in &taf.segments {
//!     println!("{}", segment);
//! }
//! assert_eq!(taf.segments[1].title(), "Changing To From the 17th at 21:00 UTC");
//! ```

pub mod client;
pub mod config;
pub mod parser;
pub mod radar;
pub mod taf;

pub use client::{FetchError, StationReport, WeatherClient, WeatherClientConfig, extract_raw_taf};
pub use config::Config;
pub use parser::{classify_token, decode_optional, decode_taf, looks_like_taf};
pub use radar::{RadarImage, radar_image};
pub use taf::{DecodedTaf, ForecastSegment, SegmentKind, TafHeader, ordinal_suffix};
