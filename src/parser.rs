//! Decoder for TAF (Terminal Aerodrome Forecast) bulletins.
//!
//! This module uses the `nom` parsing library to classify the whitespace
//! separated groups of a TAF. Decoding never fails: groups that match no
//! known pattern are skipped, and missing input yields a no-data result.
//!
//! # TAF Format
//!
//! A US TAF is a header block followed by change groups:
//! ```text
//! KJFK 171753Z 1718/1824 27015KT P6SM FEW038 FM172100 29020G35KT 5SM HZ BKN030
//! ```
//!
//! The header carries the station, the issue time (`DDHHMMZ`) and the
//! validity period (`DDHH/DDHH`), followed by the initial conditions. Each
//! `FM`, `BECMG`, `TEMPO` or `PROB` keyword opens a new forecast segment.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while_m_n, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize, value, verify},
    error::Error,
    sequence::{preceded, separated_pair, terminated},
};
use tracing::debug;

use crate::taf::{
    CloudCover, CloudLayer, ConvectiveCloud, DayHour, DayTime, DecodedTaf, EffectiveTime,
    ForecastSegment, Intensity, SegmentKind, TafHeader, ValidityPeriod, Visibility,
    WeatherPhenomenon, Wind, WindDirection, WindShear,
};

/// Probability assumed for a `PROB` group without a percentage.
pub const DEFAULT_PROBABILITY: u8 = 40;

/// Report-type tokens that may precede the station identifier.
const REPORT_PREFIXES: &[&str] = &["TAF", "AMD", "COR"];

/// Keyword that opens a change group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKeyword {
    From,
    Becoming,
    Temporary,
    Probability,
}

/// Keywords in the order they are tried against a token.
const KEYWORDS: &[(&str, ChangeKeyword)] = &[
    ("FM", ChangeKeyword::From),
    ("BECMG", ChangeKeyword::Becoming),
    ("TEMPO", ChangeKeyword::Temporary),
    ("PROB", ChangeKeyword::Probability),
];

/// A block of tokens belonging to one forecast segment.
///
/// The first section of a bulletin has no keyword: it is the header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub keyword: Option<ChangeKeyword>,
    pub tokens: Vec<&'a str>,
}

/// A single classified TAF group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TafToken {
    Wind(Wind),
    Visibility(Visibility),
    Cloud(CloudLayer),
    Weather(WeatherPhenomenon),
    WindShear(WindShear),
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn two_digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(2, 2, is_digit).parse(input)
}

fn three_digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(3, 3, is_digit).parse(input)
}

/// Run a parser over a whole token, returning `None` unless it consumes all of it.
fn parse_whole<'a, O, P>(token: &'a str, parser: P) -> Option<O>
where
    P: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    all_consuming(parser)
        .parse(token)
        .ok()
        .map(|(_, output)| output)
}

/// Parse a `DDHHMM` group.
fn parse_day_time(input: &str) -> IResult<&str, DayTime> {
    map(
        (two_digits, two_digits, two_digits),
        |(day, hour, minute): (&str, &str, &str)| DayTime {
            day: day.to_string(),
            hour: hour.to_string(),
            minute: minute.to_string(),
        },
    )
    .parse(input)
}

/// Parse a `DDHH` group.
fn parse_day_hour(input: &str) -> IResult<&str, DayHour> {
    map((two_digits, two_digits), |(day, hour): (&str, &str)| {
        DayHour {
            day: day.to_string(),
            hour: hour.to_string(),
        }
    })
    .parse(input)
}

/// Parse the issue time group `DDHHMMZ`.
fn parse_issue_time(input: &str) -> IResult<&str, DayTime> {
    terminated(parse_day_time, char('Z')).parse(input)
}

/// Parse a validity period `DDHH/DDHH`.
fn parse_validity(input: &str) -> IResult<&str, ValidityPeriod> {
    map(
        separated_pair(parse_day_hour, char('/'), parse_day_hour),
        |(start, end)| ValidityPeriod { start, end },
    )
    .parse(input)
}

/// Parse a speed in knots (2 or 3 digits).
fn parse_knots(input: &str) -> IResult<&str, u16> {
    map_res(take_while_m_n(2, 3, is_digit), |s: &str| s.parse::<u16>()).parse(input)
}

fn parse_wind_direction(input: &str) -> IResult<&str, WindDirection> {
    alt((
        value(WindDirection::Variable, tag("VRB")),
        map(
            map_res(three_digits, |s: &str| s.parse::<u16>()),
            WindDirection::Degrees,
        ),
    ))
    .parse(input)
}

/// Parse a wind group, e.g. `27015KT` or `29020G35KT`.
fn parse_wind(input: &str) -> IResult<&str, Wind> {
    map(
        (
            parse_wind_direction,
            parse_knots,
            opt(preceded(char('G'), parse_knots)),
            tag("KT"),
        ),
        |(direction, speed_kt, gust_kt, _)| Wind {
            direction,
            speed_kt,
            gust_kt,
        },
    )
    .parse(input)
}

/// Parse a visibility group, e.g. `P6SM`, `3SM` or `1/2SM`.
fn parse_visibility(input: &str) -> IResult<&str, Visibility> {
    alt((
        value(Visibility::GreaterThanSixMiles, tag("P6SM")),
        map(
            terminated(recognize((digit1, opt((char('/'), digit1)))), tag("SM")),
            |miles: &str| Visibility::StatuteMiles(miles.to_string()),
        ),
    ))
    .parse(input)
}

fn parse_cloud_cover(input: &str) -> IResult<&str, CloudCover> {
    alt((
        value(CloudCover::SkyClear, tag("SKC")),
        value(CloudCover::NoCloudsDetected, tag("CLR")),
        value(CloudCover::Few, tag("FEW")),
        value(CloudCover::Scattered, tag("SCT")),
        value(CloudCover::Broken, tag("BKN")),
        value(CloudCover::Overcast, tag("OVC")),
    ))
    .parse(input)
}

fn parse_convective(input: &str) -> IResult<&str, ConvectiveCloud> {
    alt((
        value(ConvectiveCloud::Cumulonimbus, tag("CB")),
        value(ConvectiveCloud::ToweringCumulus, tag("TCU")),
    ))
    .parse(input)
}

/// Parse a sky condition group, e.g. `FEW038`, `BKN030CB` or `SKC`.
///
/// Layers other than SKC/CLR must carry a base altitude.
fn parse_cloud(input: &str) -> IResult<&str, CloudLayer> {
    verify(
        map(
            (
                parse_cloud_cover,
                opt(map_res(three_digits, |s: &str| s.parse::<u32>())),
                opt(parse_convective),
            ),
            |(cover, hundreds, convective)| CloudLayer {
                cover,
                base_ft: hundreds.map(|h| h * 100),
                convective,
            },
        ),
        |layer: &CloudLayer| !layer.cover.has_base() || layer.base_ft.is_some(),
    )
    .parse(input)
}

fn parse_intensity(input: &str) -> IResult<&str, Intensity> {
    map(opt(one_of("-+")), |marker: Option<char>| match marker {
        Some('-') => Intensity::Light,
        Some(_) => Intensity::Heavy,
        None => Intensity::Moderate,
    })
    .parse(input)
}

/// Parse a weather phenomenon group, e.g. `-RA`, `+TSRA` or `HZ`.
fn parse_weather(input: &str) -> IResult<&str, WeatherPhenomenon> {
    map(
        (
            parse_intensity,
            verify(take_while1(|c: char| c.is_ascii_uppercase()), |code: &str| {
                code.len() >= 2
            }),
        ),
        |(intensity, code)| WeatherPhenomenon {
            intensity,
            code: code.to_string(),
        },
    )
    .parse(input)
}

/// Parse a wind shear group `WShhh/dddssKT`.
fn parse_wind_shear(input: &str) -> IResult<&str, WindShear> {
    map(
        (
            tag("WS"),
            map_res(three_digits, |s: &str| s.parse::<u32>()),
            char('/'),
            map_res(three_digits, |s: &str| s.parse::<u16>()),
            parse_knots,
            tag("KT"),
        ),
        |(_, hundreds, _, direction_deg, speed_kt, _)| WindShear {
            altitude_ft: hundreds * 100,
            direction_deg,
            speed_kt,
        },
    )
    .parse(input)
}

/// Classify a single group.
///
/// Patterns are tried in priority order (wind, visibility, cloud, weather,
/// wind shear) and the first one that matches the whole token wins.
///
/// # Example
///
/// ```
/// use taf_decoder::parser::{TafToken, classify_token};
///
/// assert!(matches!(classify_token("27015KT"), Some(TafToken::Wind(_))));
/// assert!(matches!(classify_token("BKN030"), Some(TafToken::Cloud(_))));
/// assert_eq!(classify_token("24/18"), None);
/// ```
pub fn classify_token(token: &str) -> Option<TafToken> {
    alt((
        all_consuming(map(parse_wind, TafToken::Wind)),
        all_consuming(map(parse_visibility, TafToken::Visibility)),
        all_consuming(map(parse_cloud, TafToken::Cloud)),
        all_consuming(map(parse_weather, TafToken::Weather)),
        all_consuming(map(parse_wind_shear, TafToken::WindShear)),
    ))
    .parse(token)
    .ok()
    .map(|(_, classified)| classified)
}

/// Split a token into a change keyword and whatever follows it (`PROB30` -> `PROB`, `30`).
fn split_keyword(token: &str) -> Option<(ChangeKeyword, &str)> {
    KEYWORDS.iter().find_map(|(word, keyword)| {
        token
            .strip_prefix(*word)
            .map(|rest| (*keyword, rest))
    })
}

/// Split a bulletin into its header block and change-group sections.
///
/// Report-type prefixes and the station identifier never open a section, so
/// stations such as `FMEE` stay in the header. Text glued to a keyword
/// (`FM172100`, `PROB30`) becomes the first token of the new section.
pub fn split_sections(raw: &str) -> Vec<Section<'_>> {
    let mut sections = vec![Section {
        keyword: None,
        tokens: Vec::new(),
    }];
    let mut seen_station = false;

    for token in raw.split_whitespace() {
        let keyword = if !seen_station {
            seen_station = !REPORT_PREFIXES.contains(&token);
            None
        } else {
            split_keyword(token)
        };

        match keyword {
            Some((keyword, rest)) => {
                let mut tokens = Vec::new();
                if !rest.is_empty() {
                    tokens.push(rest);
                }
                sections.push(Section {
                    keyword: Some(keyword),
                    tokens,
                });
            }
            None => {
                if let Some(current) = sections.last_mut() {
                    current.tokens.push(token);
                }
            }
        }
    }

    sections
}

/// Extract header metadata from the header block.
///
/// Returns the header and the number of leading tokens (report type and
/// station) that are not forecast conditions.
fn parse_header(tokens: &[&str]) -> (TafHeader, usize) {
    let prefix_len = tokens
        .iter()
        .take_while(|&&t| REPORT_PREFIXES.contains(&t))
        .count();
    let station = tokens
        .get(prefix_len)
        .map(|s| s.to_string())
        .unwrap_or_default();

    let header = TafHeader {
        station,
        issue_time: tokens.iter().find_map(|&t| parse_whole(t, parse_issue_time)),
        validity: tokens.iter().find_map(|&t| parse_whole(t, parse_validity)),
    };

    (header, (prefix_len + 1).min(tokens.len()))
}

/// The percentage of a `PROB` section: its first two-digit token.
fn probability_percent(tokens: &[&str]) -> u8 {
    tokens
        .iter()
        .find_map(|&t| parse_whole(t, map_res(two_digits, |s: &str| s.parse::<u8>())))
        .unwrap_or(DEFAULT_PROBABILITY)
}

/// Join a whole-mile token and a fractional visibility group (`1` `1/2SM`).
fn mixed_visibility(whole: &str, fraction: &str) -> Option<Visibility> {
    parse_whole(whole, digit1::<&str, Error<&str>>)?;
    match parse_whole(fraction, parse_visibility)? {
        Visibility::StatuteMiles(miles) if miles.contains('/') => {
            Some(Visibility::StatuteMiles(format!("{} {}", whole, miles)))
        }
        _ => None,
    }
}

/// Fold the classified tokens into a segment.
fn apply_tokens(segment: &mut ForecastSegment, tokens: &[&str]) {
    let mut index = 0;
    while let Some(&token) = tokens.get(index) {
        index += 1;

        if let Some(visibility) = tokens
            .get(index)
            .and_then(|&next| mixed_visibility(token, next))
        {
            segment.visibility = Some(visibility);
            index += 1;
            continue;
        }

        match classify_token(token) {
            Some(TafToken::Wind(wind)) => segment.wind = Some(wind),
            Some(TafToken::Visibility(visibility)) => segment.visibility = Some(visibility),
            Some(TafToken::Cloud(layer)) => segment.clouds.push(layer),
            Some(TafToken::Weather(phenomenon)) => segment.weather.push(phenomenon),
            Some(TafToken::WindShear(shear)) => segment.remarks.push(shear.to_string()),
            None => debug!("Skipping unrecognized TAF group: {}", token),
        }
    }
}

/// Decode one change-group section into a forecast segment.
fn decode_section(keyword: ChangeKeyword, tokens: &[&str]) -> ForecastSegment {
    let mut tokens = tokens;

    let kind = match keyword {
        ChangeKeyword::From => SegmentKind::From,
        ChangeKeyword::Becoming => SegmentKind::Becoming,
        ChangeKeyword::Temporary => SegmentKind::Temporary,
        ChangeKeyword::Probability => SegmentKind::Probability(probability_percent(tokens)),
    };
    let mut segment = ForecastSegment::new(kind);

    if keyword == ChangeKeyword::From {
        if let Some(time) = tokens.first().and_then(|&t| parse_whole(t, parse_day_time)) {
            segment.effective_time = Some(EffectiveTime::From(time));
            tokens = &tokens[1..];
        }
    } else {
        if keyword == ChangeKeyword::Probability
            && tokens.first().is_some_and(|&t| parse_whole(t, two_digits).is_some())
        {
            tokens = &tokens[1..];
        }
        if let Some(period) = tokens.first().and_then(|&t| parse_whole(t, parse_validity)) {
            segment.effective_time = Some(EffectiveTime::Period(period));
            tokens = &tokens[1..];
        }
    }

    apply_tokens(&mut segment, tokens);
    segment
}

/// Decode a raw TAF bulletin.
///
/// Never fails: empty or blank input produces a result holding a single
/// no-data segment, and unrecognized groups are skipped.
///
/// # Example
///
/// ```
/// use taf_decoder::parser::decode_taf;
///
/// let taf = decode_taf("KJFK 171753Z 1718/1824 27015KT 10SM FEW038 SCT120");
/// assert_eq!(taf.header.station, "KJFK");
///
/// let initial = taf.initial().unwrap();
/// assert_eq!(
///     initial.wind_description().as_deref(),
///     Some("Wind from 270° at 15 knots")
/// );
/// ```
pub fn decode_taf(raw: &str) -> DecodedTaf {
    if raw.trim().is_empty() {
        debug!("No TAF text to decode");
        return DecodedTaf::no_data();
    }

    let mut sections = split_sections(raw).into_iter();
    let Some(header_block) = sections.next() else {
        return DecodedTaf::no_data();
    };

    let (header, skip) = parse_header(&header_block.tokens);

    let mut initial = ForecastSegment::new(SegmentKind::Initial);
    initial.effective_time = header.validity.clone().map(EffectiveTime::Period);
    apply_tokens(&mut initial, &header_block.tokens[skip..]);

    let mut segments = vec![initial];
    for section in sections {
        // Only the header block lacks a keyword.
        if let Some(keyword) = section.keyword {
            segments.push(decode_section(keyword, &section.tokens));
        }
    }

    debug!(
        "Decoded TAF for {} into {} segments",
        header.station,
        segments.len()
    );

    DecodedTaf { header, segments }
}

/// Decode a TAF that may be absent.
pub fn decode_optional(raw: Option<&str>) -> DecodedTaf {
    raw.map(decode_taf).unwrap_or_else(DecodedTaf::no_data)
}

/// Check if text looks like a TAF (quick pre-filter).
///
/// True when the first block carries a validity period group.
#[inline]
pub fn looks_like_taf(text: &str) -> bool {
    split_sections(text)
        .first()
        .is_some_and(|header| {
            header
                .tokens
                .iter()
                .any(|&t| parse_whole(t, parse_validity).is_some())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KJFK: &str = "KJFK 171753Z 1718/1824 27015KT 10SM FEW038 SCT120 24/18";

    const KJFK_FULL: &str = "TAF KJFK 171753Z 1718/1824 27015KT P6SM FEW038 SCT120 \
        FM172100 29020KT 5SM HZ BKN030 OVC100 \
        TEMPO 1722/1802 29025G40KT 3SM -SHRA BKN025 \
        BECMG 1806/1808 VRB05KT P6SM SKC \
        PROB30 1810/1814 2SM TSRA BKN015CB";

    #[test]
    fn test_decode_basic_header() {
        let taf = decode_taf(KJFK);

        assert_eq!(taf.header.station, "KJFK");
        let issued = taf.header.issued_description();
        assert!(issued.contains("17"));
        assert!(issued.contains("th"));
        assert!(issued.contains("at 17:53 UTC"));
        assert_eq!(issued, "17th at 17:53 UTC");
        assert_eq!(
            taf.header.validity_description(),
            "Valid from the 17th at 18:00 UTC until the 18th at 24:00 UTC"
        );
    }

    #[test]
    fn test_decode_initial_conditions() {
        let taf = decode_taf(KJFK);
        assert_eq!(taf.segments.len(), 1);

        let initial = taf.initial().expect("Should have initial segment");
        assert_eq!(initial.kind, SegmentKind::Initial);
        assert_eq!(
            initial.wind_description().as_deref(),
            Some("Wind from 270° at 15 knots")
        );
        assert_eq!(
            initial.visibility_description().as_deref(),
            Some("Visibility 10 statute miles")
        );
        assert_eq!(
            initial.cloud_description().as_deref(),
            Some("Few clouds at 3800 feet, scattered clouds at 12000 feet")
        );
        // Station code is not mistaken for a weather phenomenon
        assert!(initial.weather.is_empty());
        assert!(initial.remarks.is_empty());
        assert_eq!(initial.title(), "Initial Conditions");
        assert!(matches!(
            initial.effective_time,
            Some(EffectiveTime::Period(_))
        ));
    }

    #[test]
    fn test_decode_gusting_wind() {
        let taf = decode_taf("KDEN 171730Z 1718/1824 29020G35KT P6SM");
        let wind = taf.segments[0].wind_description().unwrap();
        assert!(wind.contains("20 knots"));
        assert!(wind.contains("gusting to 35 knots"));
        assert_eq!(wind, "Wind from 290° at 20 knots, gusting to 35 knots");
    }

    #[test]
    fn test_decode_visibility_forms() {
        let p6 = decode_taf("KSFO 171730Z 1718/1824 P6SM");
        assert_eq!(
            p6.segments[0].visibility_description().as_deref(),
            Some("Visibility greater than 6 statute miles")
        );

        let three = decode_taf("KSFO 171730Z 1718/1824 3SM");
        assert_eq!(
            three.segments[0].visibility_description().as_deref(),
            Some("Visibility 3 statute miles")
        );

        let half = decode_taf("KSFO 171730Z 1718/1824 1/2SM FG");
        assert_eq!(
            half.segments[0].visibility,
            Some(Visibility::StatuteMiles("1/2".to_string()))
        );
    }

    #[test]
    fn test_decode_fm_section() {
        let taf = decode_taf(
            "KJFK 171753Z 1718/1824 27015KT P6SM FEW038 FM172100 29020KT 5SM HZ BKN030 OVC100",
        );
        assert_eq!(taf.segments.len(), 2);

        let fm = &taf.segments[1];
        assert_eq!(fm.kind, SegmentKind::From);
        assert_eq!(fm.title(), "Changing To From the 17th at 21:00 UTC");
        assert!(fm.weather_description().unwrap().contains("haze"));

        let clouds = fm.cloud_description().unwrap();
        assert!(clouds.contains("Broken clouds at 3000 feet"));
        assert!(clouds.contains("overcast clouds at 10000 feet"));
        assert_eq!(fm.clouds[0].cover, CloudCover::Broken);
        assert_eq!(fm.clouds[1].cover, CloudCover::Overcast);
    }

    #[test]
    fn test_decode_all_change_groups() {
        let taf = decode_taf(KJFK_FULL);
        let kinds: Vec<SegmentKind> = taf.segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Initial,
                SegmentKind::From,
                SegmentKind::Temporary,
                SegmentKind::Becoming,
                SegmentKind::Probability(30),
            ]
        );
        assert_eq!(taf.header.station, "KJFK");

        let tempo = &taf.segments[2];
        assert_eq!(
            tempo.title(),
            "Temporarily From the 17th at 22:00 UTC until the 18th at 02:00 UTC"
        );
        assert_eq!(tempo.weather_description().as_deref(), Some("light rain showers"));
        assert_eq!(tempo.wind.as_ref().and_then(|w| w.gust_kt), Some(40));

        let becmg = &taf.segments[3];
        assert_eq!(
            becmg.wind_description().as_deref(),
            Some("Wind variable at 05 knots")
        );
        assert_eq!(becmg.cloud_description().as_deref(), Some("Sky clear"));

        let prob = &taf.segments[4];
        assert_eq!(prob.probability(), Some(30));
        assert!(prob.title().starts_with("Probability 30% From the 18th at 10:00 UTC"));
        assert_eq!(
            prob.weather_description().as_deref(),
            Some("thunderstorm with rain")
        );
        assert_eq!(
            prob.cloud_description().as_deref(),
            Some("Broken clouds at 1500 feet (cumulonimbus)")
        );
    }

    #[test]
    fn test_change_groups_without_time_have_no_effective_time() {
        let taf = decode_taf("KBOS 171730Z 1718/1824 18010KT TEMPO 3SM BR BECMG -RA");
        assert_eq!(taf.segments[1].effective_time, None);
        assert_eq!(taf.segments[1].title(), "Temporarily");
        assert_eq!(taf.segments[2].effective_time, None);
        assert_eq!(taf.segments[2].title(), "Gradually Becoming");
    }

    #[test]
    fn test_probability_defaults_to_forty() {
        let taf = decode_taf("KORD 171730Z 1718/1824 18010KT PROB TSRA");
        assert_eq!(taf.segments[1].kind, SegmentKind::Probability(40));
        assert_eq!(taf.segments[1].title(), "Probability 40%");
    }

    #[test]
    fn test_weather_intensity_and_passthrough() {
        let taf = decode_taf("KORD 171730Z 1718/1824 -RA +TSSN BR VCSH");
        let initial = &taf.segments[0];
        assert_eq!(initial.weather[0].intensity, Intensity::Light);
        assert_eq!(initial.weather[1].intensity, Intensity::Heavy);
        assert_eq!(initial.weather[2].intensity, Intensity::Moderate);
        assert_eq!(
            initial.weather_description().as_deref(),
            Some("light rain, heavy thunderstorm with snow, mist, VCSH")
        );
    }

    #[test]
    fn test_wind_shear_remark() {
        let taf = decode_taf("KDFW 171730Z 1718/1824 18015KT P6SM WS020/27045KT");
        let initial = &taf.segments[0];
        assert_eq!(
            initial.remarks,
            vec!["Wind shear at 2000 feet: wind from 270° at 45 knots".to_string()]
        );
        // The surface wind is not replaced by the shear group
        assert_eq!(
            initial.wind_description().as_deref(),
            Some("Wind from 180° at 15 knots")
        );
    }

    #[test]
    fn test_classify_priority() {
        assert!(matches!(classify_token("27015KT"), Some(TafToken::Wind(_))));
        assert!(matches!(classify_token("P6SM"), Some(TafToken::Visibility(_))));
        assert!(matches!(classify_token("FEW038"), Some(TafToken::Cloud(_))));
        assert!(matches!(classify_token("HZ"), Some(TafToken::Weather(_))));
        assert!(matches!(
            classify_token("WS020/27045KT"),
            Some(TafToken::WindShear(_))
        ));
        // A cover code without a base falls through to the phenomenon rule
        assert!(matches!(classify_token("FEW"), Some(TafToken::Weather(_))));
        assert_eq!(classify_token("24/18"), None);
        assert_eq!(classify_token("171753Z"), None);
        assert_eq!(classify_token("Z"), None);
        assert_eq!(classify_token("-"), None);
    }

    #[test]
    fn test_split_sections() {
        let sections = split_sections("KJFK 171753Z FM172100 29020KT PROB30 TSRA BECMG 1806/1808");
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].keyword, None);
        assert_eq!(sections[0].tokens, vec!["KJFK", "171753Z"]);
        assert_eq!(sections[1].keyword, Some(ChangeKeyword::From));
        assert_eq!(sections[1].tokens, vec!["172100", "29020KT"]);
        assert_eq!(sections[2].keyword, Some(ChangeKeyword::Probability));
        assert_eq!(sections[2].tokens, vec!["30", "TSRA"]);
        assert_eq!(sections[3].keyword, Some(ChangeKeyword::Becoming));
        assert_eq!(sections[3].tokens, vec!["1806/1808"]);
    }

    #[test]
    fn test_leading_keyword_does_not_split() {
        let sections = split_sections("FM172100 29020KT");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].keyword, None);
    }

    #[test]
    fn test_station_starting_with_keyword() {
        let taf = decode_taf("TAF FMEE 171700Z 1718/1824 12010KT 9999 FEW020");
        assert_eq!(taf.header.station, "FMEE");
        assert_eq!(taf.header.issued_description(), "17th at 17:00 UTC");
        assert!(taf.header.validity.is_some());
        assert_eq!(taf.segments.len(), 1);
        assert_eq!(taf.segments[0].title(), "Initial Conditions");
        assert!(taf.segments[0].wind.is_some());

        let sections = split_sections("TAF AMD FMMI 171700Z FM172100 05008KT");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].tokens, vec!["TAF", "AMD", "FMMI", "171700Z"]);
        assert_eq!(sections[1].keyword, Some(ChangeKeyword::From));
    }

    #[test]
    fn test_mixed_number_visibility() {
        let taf = decode_taf("KJFK 171753Z 1718/1824 27015KT 1 1/2SM BR OVC005");
        let initial = &taf.segments[0];
        assert_eq!(
            initial.visibility_description().as_deref(),
            Some("Visibility 1 1/2 statute miles")
        );
        assert_eq!(initial.weather.len(), 1);
        assert_eq!(initial.clouds.len(), 1);

        let taf = decode_taf("KJFK 171753Z 1718/1824 FM172100 2 3/4SM -RA");
        assert_eq!(
            taf.segments[1].visibility,
            Some(Visibility::StatuteMiles("2 3/4".to_string()))
        );
    }

    #[test]
    fn test_whole_number_before_whole_miles_not_merged() {
        let taf = decode_taf("KJFK 171753Z 1718/1824 27015KT 1 3SM");
        assert_eq!(
            taf.segments[0].visibility,
            Some(Visibility::StatuteMiles("3".to_string()))
        );
    }

    #[test]
    fn test_multiline_input() {
        let raw = "KJFK 171753Z 1718/1824 27015KT P6SM\n      FM172100 29020KT 5SM";
        let taf = decode_taf(raw);
        assert_eq!(taf.segments.len(), 2);
        assert_eq!(taf.segments[1].kind, SegmentKind::From);
    }

    #[test]
    fn test_empty_input() {
        for raw in ["", "   ", "\n\t"] {
            let taf = decode_taf(raw);
            assert!(!taf.has_data());
            assert_eq!(taf.segments.len(), 1);
            assert!(taf.segments[0].is_no_data());
            assert_eq!(taf.header.station, "");
        }

        let taf = decode_optional(None);
        assert_eq!(taf, DecodedTaf::no_data());
    }

    #[test]
    fn test_unrecognized_body_yields_empty_segment() {
        let taf = decode_taf("KJFK 171753Z 1718/1824 27015KT BECMG 24/18 ???");
        let becmg = &taf.segments[1];
        assert_eq!(becmg.kind, SegmentKind::Becoming);
        assert!(becmg.is_empty());
        assert_eq!(becmg.wind, None);
        assert_eq!(becmg.visibility, None);
    }

    #[test]
    fn test_garbage_input_is_best_effort() {
        let taf = decode_taf("hello world 123");
        assert!(taf.has_data());
        assert_eq!(taf.header.station, "hello");
        assert_eq!(taf.header.issue_time, None);
        assert_eq!(taf.header.validity, None);
        assert_eq!(taf.segments.len(), 1);
        assert!(taf.segments[0].is_empty());
    }

    #[test]
    fn test_report_prefixes_skipped() {
        let taf = decode_taf("TAF AMD KLAX 171730Z 1718/1824 25010KT");
        assert_eq!(taf.header.station, "KLAX");
        assert!(taf.segments[0].weather.is_empty());
    }

    #[test]
    fn test_out_of_range_times_pass_through() {
        let taf = decode_taf("KJFK 322561Z 3225/3399 FM322561 27015KT");
        assert_eq!(taf.header.issued_description(), "32nd at 25:61 UTC");
        assert_eq!(
            taf.segments[1].title(),
            "Changing To From the 32nd at 25:61 UTC"
        );
    }

    #[test]
    fn test_decode_is_deterministic() {
        assert_eq!(decode_taf(KJFK_FULL), decode_taf(KJFK_FULL));
    }

    #[test]
    fn test_looks_like_taf() {
        assert!(looks_like_taf(KJFK));
        assert!(looks_like_taf(KJFK_FULL));
        assert!(!looks_like_taf("KJFK 171751Z 27015KT 10SM FEW038 24/18 A3012"));
        assert!(!looks_like_taf(""));
    }
}
