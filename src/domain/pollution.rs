use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Upper bounds (inclusive) of the first three pollution tiers, in µg/m³.
///
/// Both the display level and the prompt tone are derived from these, so a
/// change here moves every tier at once.
pub const TIER_BREAKPOINTS: [f64; 3] = [12.0, 36.0, 56.0];

/// Index of the tier `rate` falls in, 0 (cleanest) through 3.
#[must_use]
pub fn tier_index(rate: f64) -> usize {
    TIER_BREAKPOINTS
        .iter()
        .position(|bound| rate <= *bound)
        .unwrap_or(TIER_BREAKPOINTS.len())
}

/// One daily measurement from a static station dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionRecord {
    #[serde(
        serialize_with = "serialize_date",
        deserialize_with = "deserialize_date"
    )]
    pub date: NaiveDate,
    #[serde(deserialize_with = "deserialize_rate")]
    pub pollution_rate: f64,
}

impl PollutionRecord {
    #[must_use]
    pub fn new(date: NaiveDate, pollution_rate: f64) -> Self {
        Self {
            date,
            pollution_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollutionLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl PollutionLevel {
    #[must_use]
    pub fn from_rate(rate: f64) -> Self {
        match tier_index(rate) {
            0 => Self::Low,
            1 => Self::Moderate,
            2 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    /// Label used on the gauge ("Very High").
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Lowercase wording used inside poem text ("very high").
    #[must_use]
    pub fn phrase(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

/// Mean concentration over a date range plus its derived level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutionSummary {
    pub average_rate: f64,
    pub level: PollutionLevel,
    pub record_count: usize,
}

impl PollutionSummary {
    #[must_use]
    pub fn from_average(average_rate: f64, record_count: usize) -> Self {
        Self {
            average_rate,
            level: PollutionLevel::from_rate(average_rate),
            record_count,
        }
    }
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}

fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
}

/// Reduce a date or timestamp string to its calendar date.
///
/// RFC 3339 timestamps are normalised to UTC before the date is taken.
#[must_use]
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.naive_utc().date());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRate {
    Number(f64),
    Text(String),
}

fn deserialize_rate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = match RawRate::deserialize(deserializer)? {
        RawRate::Number(value) => value,
        RawRate::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| de::Error::custom(format!("invalid pollution_rate {text:?}: {e}")))?,
    };
    if !value.is_finite() || value < 0.0 {
        return Err(de::Error::custom(format!(
            "pollution_rate must be a non-negative finite number, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, PollutionLevel::Low)]
    #[case(12.0, PollutionLevel::Low)]
    #[case(12.01, PollutionLevel::Moderate)]
    #[case(36.0, PollutionLevel::Moderate)]
    #[case(36.5, PollutionLevel::High)]
    #[case(56.0, PollutionLevel::High)]
    #[case(56.01, PollutionLevel::VeryHigh)]
    #[case(140.0, PollutionLevel::VeryHigh)]
    fn level_boundaries_are_closed(#[case] rate: f64, #[case] expected: PollutionLevel) {
        assert_eq!(PollutionLevel::from_rate(rate), expected);
    }

    #[test]
    fn record_accepts_string_and_numeric_rates() {
        let records: Vec<PollutionRecord> = serde_json::from_str(
            r#"[
                {"date": "2022-01-10", "pollution_rate": "40"},
                {"date": "2022-01-11T00:00:00.000Z", "pollution_rate": 31.5}
            ]"#,
        )
        .expect("records parse");

        assert_eq!(records[0].pollution_rate, 40.0);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2022, 1, 11).unwrap());
        assert!((records[1].pollution_rate - 31.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rfc3339_offsets_are_reduced_to_utc_date() {
        let date = parse_calendar_date("2022-01-01T01:30:00+02:00").expect("parses");
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
    }

    #[rstest]
    #[case(r#""n/a""#)]
    #[case(r#""NaN""#)]
    #[case(r#""inf""#)]
    #[case(r#""-infinity""#)]
    #[case(r#""-3.5""#)]
    #[case("-0.1")]
    fn unusable_rate_is_rejected(#[case] rate: &str) {
        let raw = format!(r#"{{"date": "2022-01-10", "pollution_rate": {rate}}}"#);
        let result: Result<PollutionRecord, _> = serde_json::from_str(&raw);
        assert!(result.is_err(), "{rate} should be rejected");
    }

    #[test]
    fn zero_rate_is_accepted() {
        let record: PollutionRecord =
            serde_json::from_str(r#"{"date": "2022-01-10", "pollution_rate": "0"}"#)
                .expect("zero is a valid reading");
        assert_eq!(record.pollution_rate, 0.0);
    }

    #[test]
    fn record_serializes_plain_date() {
        let record = PollutionRecord::new(NaiveDate::from_ymd_opt(2022, 3, 4).unwrap(), 12.5);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2022-03-04");
    }
}
