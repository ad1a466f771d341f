//! Data structures representing a decoded TAF.
//!
//! This module defines the types produced by the decoder. Every type carries a
//! `Display` implementation that renders the human-readable description shown
//! to pilots, e.g. `Wind from 270° at 15 knots`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Returns the English ordinal suffix for a day number (`st`, `nd`, `rd`, `th`).
///
/// 11, 12 and 13 always take `th`.
pub fn ordinal_suffix(number: u32) -> &'static str {
    match (number % 10, number % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    }
}

/// Formats a zero-padded day string with its ordinal suffix ("07" -> "07th").
fn day_with_ordinal(day: &str) -> String {
    let suffix = day.parse::<u32>().map(ordinal_suffix).unwrap_or("th");
    format!("{}{}", day, suffix)
}

/// A day/hour/minute group such as `171753` taken from a TAF.
///
/// Fields are the verbatim two-digit strings; no calendar validation is done,
/// so a day of `32` or an hour of `25` is carried through as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTime {
    pub day: String,
    pub hour: String,
    pub minute: String,
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{} UTC",
            day_with_ordinal(&self.day),
            self.hour,
            self.minute
        )
    }
}

/// A day/hour pair such as `1718` from a validity group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHour {
    pub day: String,
    pub hour: String,
}

impl fmt::Display for DayHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the {} at {}:00 UTC", day_with_ordinal(&self.day), self.hour)
    }
}

/// A `DDHH/DDHH` validity period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPeriod {
    pub start: DayHour,
    pub end: DayHour,
}

impl ValidityPeriod {
    /// The header description, e.g.
    /// `Valid from the 17th at 18:00 UTC until the 18th at 24:00 UTC`.
    pub fn description(&self) -> String {
        format!("Valid from {} until {}", self.start, self.end)
    }
}

impl fmt::Display for ValidityPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "From {} until {}", self.start, self.end)
    }
}

/// When a forecast segment takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveTime {
    /// An `FM` group: conditions change at this instant.
    From(DayTime),
    /// A `DDHH/DDHH` window (header validity or change-group window).
    Period(ValidityPeriod),
}

impl fmt::Display for EffectiveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectiveTime::From(time) => write!(f, "From the {}", time),
            EffectiveTime::Period(period) => write!(f, "{}", period),
        }
    }
}

/// Which TAF construct produced a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Conditions at forecast start, taken from the header block
    Initial,
    /// `FM` group
    From,
    /// `BECMG` group
    Becoming,
    /// `TEMPO` group
    Temporary,
    /// `PROBnn` group with its percentage
    Probability(u8),
    /// Placeholder produced when there was no TAF text at all
    NoData,
}

impl SegmentKind {
    /// The section heading shown above the segment.
    pub fn heading(&self) -> String {
        match self {
            SegmentKind::Initial => "Initial Conditions".to_string(),
            SegmentKind::From => "Changing To".to_string(),
            SegmentKind::Becoming => "Gradually Becoming".to_string(),
            SegmentKind::Temporary => "Temporarily".to_string(),
            SegmentKind::Probability(percent) => format!("Probability {}%", percent),
            SegmentKind::NoData => "No TAF data available".to_string(),
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::Initial => write!(f, "INITIAL"),
            SegmentKind::From => write!(f, "FM"),
            SegmentKind::Becoming => write!(f, "BECMG"),
            SegmentKind::Temporary => write!(f, "TEMPO"),
            SegmentKind::Probability(percent) => write!(f, "PROB{:02}", percent),
            SegmentKind::NoData => write!(f, "NO DATA"),
        }
    }
}

/// Wind direction: a true bearing or variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindDirection {
    Degrees(u16),
    Variable,
}

/// A decoded wind group such as `29020G35KT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wind {
    pub direction: WindDirection,
    /// Sustained speed in knots.
    pub speed_kt: u16,
    /// Gust speed in knots, when a `G` group is present.
    pub gust_kt: Option<u16>,
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            WindDirection::Degrees(deg) => {
                write!(f, "Wind from {:03}° at {:02} knots", deg, self.speed_kt)?
            }
            WindDirection::Variable => write!(f, "Wind variable at {:02} knots", self.speed_kt)?,
        }
        if let Some(gust) = self.gust_kt {
            write!(f, ", gusting to {:02} knots", gust)?;
        }
        Ok(())
    }
}

/// Prevailing visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// `P6SM`
    GreaterThanSixMiles,
    /// Statute miles as written, e.g. `10` or `1/2`.
    StatuteMiles(String),
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::GreaterThanSixMiles => {
                write!(f, "Visibility greater than 6 statute miles")
            }
            Visibility::StatuteMiles(miles) => write!(f, "Visibility {} statute miles", miles),
        }
    }
}

/// Intensity qualifier of a weather phenomenon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// `-` prefix
    Light,
    #[default]
    Moderate,
    /// `+` prefix
    Heavy,
}

/// Known phenomenon codes and their plain-language names.
static PHENOMENA: &[(&str, &str)] = &[
    ("RA", "rain"),
    ("SN", "snow"),
    ("DZ", "drizzle"),
    ("SHRA", "rain showers"),
    ("SHSN", "snow showers"),
    ("TS", "thunderstorm"),
    ("TSRA", "thunderstorm with rain"),
    ("TSSN", "thunderstorm with snow"),
    ("FG", "fog"),
    ("BR", "mist"),
    ("HZ", "haze"),
    ("FU", "smoke"),
    ("SA", "sand"),
    ("DU", "dust"),
    ("BLDU", "blowing dust"),
    ("BLSA", "blowing sand"),
    ("PO", "dust/sand whirls"),
    ("SQ", "squalls"),
    ("FC", "funnel cloud"),
    ("SS", "sandstorm"),
    ("DS", "duststorm"),
];

/// Looks up the plain-language name of a phenomenon code.
pub fn phenomenon_name(code: &str) -> Option<&'static str> {
    PHENOMENA
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// A weather phenomenon group such as `-SHRA` or `HZ`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherPhenomenon {
    pub intensity: Intensity,
    /// The code without its intensity marker.
    pub code: String,
}

impl WeatherPhenomenon {
    /// The phenomenon name, or the literal code when it is not in the table.
    pub fn name(&self) -> &str {
        phenomenon_name(&self.code).unwrap_or(&self.code)
    }
}

impl fmt::Display for WeatherPhenomenon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.intensity {
            Intensity::Light => write!(f, "light {}", self.name()),
            Intensity::Moderate => write!(f, "{}", self.name()),
            Intensity::Heavy => write!(f, "heavy {}", self.name()),
        }
    }
}

/// Sky cover category of a cloud group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloudCover {
    /// `SKC`
    SkyClear,
    /// `CLR`
    NoCloudsDetected,
    Few,
    Scattered,
    Broken,
    Overcast,
}

impl CloudCover {
    /// Whether a base altitude is reported for this cover.
    pub fn has_base(&self) -> bool {
        !matches!(self, CloudCover::SkyClear | CloudCover::NoCloudsDetected)
    }

    fn description(&self) -> &'static str {
        match self {
            CloudCover::SkyClear => "Sky clear",
            CloudCover::NoCloudsDetected => "No clouds detected",
            CloudCover::Few => "Few clouds",
            CloudCover::Scattered => "Scattered clouds",
            CloudCover::Broken => "Broken clouds",
            CloudCover::Overcast => "Overcast clouds",
        }
    }
}

/// Convective cloud type appended to a layer (`BKN030CB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvectiveCloud {
    Cumulonimbus,
    ToweringCumulus,
}

/// A decoded sky condition group such as `FEW038`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudLayer {
    pub cover: CloudCover,
    /// Base altitude in feet (hundreds-of-feet code × 100).
    pub base_ft: Option<u32>,
    pub convective: Option<ConvectiveCloud>,
}

impl fmt::Display for CloudLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cover.description())?;
        if let (true, Some(base)) = (self.cover.has_base(), self.base_ft) {
            write!(f, " at {} feet", base)?;
        }
        match self.convective {
            Some(ConvectiveCloud::Cumulonimbus) => write!(f, " (cumulonimbus)"),
            Some(ConvectiveCloud::ToweringCumulus) => write!(f, " (towering cumulus)"),
            None => Ok(()),
        }
    }
}

/// A low-level wind shear group such as `WS020/27045KT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindShear {
    pub altitude_ft: u32,
    pub direction_deg: u16,
    pub speed_kt: u16,
}

impl fmt::Display for WindShear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wind shear at {} feet: wind from {:03}° at {:02} knots",
            self.altitude_ft, self.direction_deg, self.speed_kt
        )
    }
}

/// One time-scoped block of forecast conditions.
///
/// Optional fields are `None` when no token of that category appeared in the
/// block; list fields are empty in the same case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSegment {
    pub kind: SegmentKind,
    pub effective_time: Option<EffectiveTime>,
    pub wind: Option<Wind>,
    pub visibility: Option<Visibility>,
    pub weather: Vec<WeatherPhenomenon>,
    pub clouds: Vec<CloudLayer>,
    pub remarks: Vec<String>,
}

impl ForecastSegment {
    /// An empty segment of the given kind.
    pub fn new(kind: SegmentKind) -> Self {
        Self {
            kind,
            effective_time: None,
            wind: None,
            visibility: None,
            weather: Vec::new(),
            clouds: Vec::new(),
            remarks: Vec::new(),
        }
    }

    /// The placeholder segment returned for missing TAF text.
    pub fn no_data() -> Self {
        Self::new(SegmentKind::NoData)
    }

    pub fn is_no_data(&self) -> bool {
        self.kind == SegmentKind::NoData
    }

    /// The probability percentage of a `PROB` segment.
    pub fn probability(&self) -> Option<u8> {
        match self.kind {
            SegmentKind::Probability(percent) => Some(percent),
            _ => None,
        }
    }

    /// Section title, e.g. `Changing To From the 17th at 21:00 UTC`.
    ///
    /// The initial segment is titled without its validity window, which is
    /// already part of the header.
    pub fn title(&self) -> String {
        match (&self.kind, &self.effective_time) {
            (SegmentKind::Initial, _) | (_, None) => self.kind.heading(),
            (kind, Some(time)) => format!("{} {}", kind.heading(), time),
        }
    }

    pub fn wind_description(&self) -> Option<String> {
        self.wind.as_ref().map(Wind::to_string)
    }

    pub fn visibility_description(&self) -> Option<String> {
        self.visibility.as_ref().map(Visibility::to_string)
    }

    /// All phenomena joined with commas, e.g. `light rain, mist`.
    pub fn weather_description(&self) -> Option<String> {
        if self.weather.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.weather.iter().map(|w| w.to_string()).collect();
        Some(parts.join(", "))
    }

    /// All layers joined with commas, later layers lower-cased:
    /// `Few clouds at 3800 feet, scattered clouds at 12000 feet`.
    pub fn cloud_description(&self) -> Option<String> {
        let (first, rest) = self.clouds.split_first()?;
        let mut out = first.to_string();
        for layer in rest {
            out.push_str(", ");
            out.push_str(&layer.to_string().to_lowercase());
        }
        Some(out)
    }

    /// Whether no condition of any category was decoded.
    pub fn is_empty(&self) -> bool {
        self.wind.is_none()
            && self.visibility.is_none()
            && self.weather.is_empty()
            && self.clouds.is_empty()
            && self.remarks.is_empty()
    }
}

impl fmt::Display for ForecastSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        if let Some(wind) = self.wind_description() {
            writeln!(f, "  Wind: {}", wind)?;
        }
        if let Some(vis) = self.visibility_description() {
            writeln!(f, "  Visibility: {}", vis)?;
        }
        if let Some(weather) = self.weather_description() {
            writeln!(f, "  Weather: {}", weather)?;
        }
        if let Some(clouds) = self.cloud_description() {
            writeln!(f, "  Clouds: {}", clouds)?;
        }
        if !self.remarks.is_empty() {
            writeln!(f, "  Remarks: {}", self.remarks.join(", "))?;
        }
        Ok(())
    }
}

/// Header metadata of a TAF bulletin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TafHeader {
    /// ICAO station identifier; empty when unknown.
    pub station: String,
    pub issue_time: Option<DayTime>,
    pub validity: Option<ValidityPeriod>,
}

impl TafHeader {
    /// Issue time description such as `17th at 17:53 UTC`, or an empty string.
    pub fn issued_description(&self) -> String {
        self.issue_time
            .as_ref()
            .map(DayTime::to_string)
            .unwrap_or_default()
    }

    /// Validity description, or an empty string.
    pub fn validity_description(&self) -> String {
        self.validity
            .as_ref()
            .map(ValidityPeriod::description)
            .unwrap_or_default()
    }
}

/// A fully decoded TAF.
///
/// `segments` is never empty: it starts with the initial segment, or holds a
/// single no-data placeholder when there was nothing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedTaf {
    pub header: TafHeader,
    pub segments: Vec<ForecastSegment>,
}

impl DecodedTaf {
    /// The result for missing or blank input.
    pub fn no_data() -> Self {
        Self {
            header: TafHeader::default(),
            segments: vec![ForecastSegment::no_data()],
        }
    }

    pub fn has_data(&self) -> bool {
        !self.segments.iter().all(ForecastSegment::is_no_data)
    }

    /// The conditions prevailing at the start of the forecast.
    pub fn initial(&self) -> Option<&ForecastSegment> {
        self.segments
            .first()
            .filter(|s| s.kind == SegmentKind::Initial)
    }

    /// Segments after the initial one.
    pub fn changes(&self) -> &[ForecastSegment] {
        match self.initial() {
            Some(_) => &self.segments[1..],
            None => &[],
        }
    }
}

impl fmt::Display for DecodedTaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_data() {
            return writeln!(f, "{}", SegmentKind::NoData.heading());
        }
        writeln!(f, "Terminal Aerodrome Forecast (TAF)")?;
        writeln!(f, "Airport: {}", self.header.station)?;
        writeln!(f, "Issued: {}", self.header.issued_description())?;
        writeln!(f, "Validity: {}", self.header.validity_description())?;
        for segment in &self.segments {
            writeln!(f)?;
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
