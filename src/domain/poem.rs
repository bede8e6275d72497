use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::pollution::PollutionSummary;

/// Line count every sonnet is held to, whatever the caller asked for.
pub const SONNET_LINES: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoemType {
    Sonnet,
    Ode,
    #[serde(rename = "Free Verse", alias = "FreeVerse")]
    FreeVerse,
}

impl PoemType {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sonnet => "Sonnet",
            Self::Ode => "Ode",
            Self::FreeVerse => "Free Verse",
        }
    }

    /// Length used when the caller does not pick one.
    #[must_use]
    pub fn default_length(self) -> u32 {
        match self {
            Self::Sonnet => SONNET_LINES,
            Self::Ode => 16,
            Self::FreeVerse => 12,
        }
    }
}

impl fmt::Display for PoemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Bergamo,
    Treviglio,
    Bizerte,
}

impl City {
    pub const ALL: [City; 3] = [City::Bergamo, City::Treviglio, City::Bizerte];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bergamo => "Bergamo",
            Self::Treviglio => "Treviglio",
            Self::Bizerte => "Bizerte",
        }
    }

    /// City whose monitoring station supplies the data. Bizerte has no
    /// station of its own and borrows Bergamo's series.
    #[must_use]
    pub fn data_source(self) -> City {
        match self {
            Self::Bizerte => Self::Bergamo,
            other => other,
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "pm10")]
    Pm10,
    #[serde(rename = "pm2.5", alias = "pm25")]
    Pm25,
}

impl Pollutant {
    pub const ALL: [Pollutant; 2] = [Pollutant::Pm10, Pollutant::Pm25];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Pm10 => "pm10",
            Self::Pm25 => "pm2.5",
        }
    }

    /// Spelling used in dataset file names.
    #[must_use]
    pub fn file_code(self) -> &'static str {
        match self {
            Self::Pm10 => "pm10",
            Self::Pm25 => "pm25",
        }
    }

    /// Full-scale value of the UI gauge for this pollutant.
    #[must_use]
    pub fn gauge_max(self) -> u32 {
        match self {
            Self::Pm10 => 100,
            Self::Pm25 => 60,
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoemRequestError {
    #[error("poem length must be a positive number of lines")]
    ZeroLength,
}

/// What the user picked on the form. Sonnets are pinned to 14 lines at
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoemRequest {
    poem_type: PoemType,
    city: City,
    pollutant: Pollutant,
    from_date: NaiveDate,
    to_date: NaiveDate,
    length: u32,
}

impl PoemRequest {
    /// # Errors
    /// Returns [`PoemRequestError::ZeroLength`] when `length` is `Some(0)`
    /// for a form that honours the requested length.
    pub fn new(
        poem_type: PoemType,
        city: City,
        pollutant: Pollutant,
        from_date: NaiveDate,
        to_date: NaiveDate,
        length: Option<u32>,
    ) -> Result<Self, PoemRequestError> {
        let length = match (poem_type, length) {
            (PoemType::Sonnet, _) => SONNET_LINES,
            (_, Some(0)) => return Err(PoemRequestError::ZeroLength),
            (_, Some(requested)) => requested,
            (other, None) => other.default_length(),
        };

        Ok(Self {
            poem_type,
            city,
            pollutant,
            from_date,
            to_date,
            length,
        })
    }

    #[must_use]
    pub fn poem_type(&self) -> PoemType {
        self.poem_type
    }

    #[must_use]
    pub fn city(&self) -> City {
        self.city
    }

    #[must_use]
    pub fn pollutant(&self) -> Pollutant {
        self.pollutant
    }

    #[must_use]
    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    #[must_use]
    pub fn to_date(&self) -> NaiveDate {
        self.to_date
    }

    /// Line count every generator must use.
    #[must_use]
    pub fn effective_length(&self) -> u32 {
        if self.poem_type == PoemType::Sonnet {
            SONNET_LINES
        } else {
            self.length
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoemOrigin {
    AiGenerated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPoem {
    pub id: Uuid,
    pub text: String,
    pub source_request: PoemRequest,
    pub summary: PollutionSummary,
    pub origin: PoemOrigin,
}

impl GeneratedPoem {
    #[must_use]
    pub fn new(
        text: String,
        source_request: PoemRequest,
        summary: PollutionSummary,
        origin: PoemOrigin,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            source_request,
            summary,
            origin,
        }
    }

    /// Name offered when the poem is downloaded as plain text.
    #[must_use]
    pub fn download_file_name(&self) -> String {
        format!(
            "{}_{}_{}.txt",
            self.source_request.city(),
            self.source_request.from_date().format("%Y-%m-%d"),
            self.source_request.to_date().format("%Y-%m-%d"),
        )
    }
}

/// Long-form US date, e.g. "January 1, 2022".
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sonnet_length_is_pinned() {
        let request = PoemRequest::new(
            PoemType::Sonnet,
            City::Bergamo,
            Pollutant::Pm10,
            date(2022, 1, 1),
            date(2022, 1, 31),
            Some(40),
        )
        .unwrap();
        assert_eq!(request.effective_length(), 14);
    }

    #[test]
    fn sonnet_ignores_zero_length() {
        let request = PoemRequest::new(
            PoemType::Sonnet,
            City::Bergamo,
            Pollutant::Pm10,
            date(2022, 1, 1),
            date(2022, 1, 31),
            Some(0),
        );
        assert_eq!(request.unwrap().effective_length(), 14);
    }

    #[test]
    fn other_forms_honour_requested_or_default_length() {
        let ode = PoemRequest::new(
            PoemType::Ode,
            City::Treviglio,
            Pollutant::Pm25,
            date(2022, 1, 1),
            date(2022, 1, 31),
            None,
        )
        .unwrap();
        assert_eq!(ode.effective_length(), 16);

        let free = PoemRequest::new(
            PoemType::FreeVerse,
            City::Treviglio,
            Pollutant::Pm25,
            date(2022, 1, 1),
            date(2022, 1, 31),
            Some(20),
        )
        .unwrap();
        assert_eq!(free.effective_length(), 20);
    }

    #[test]
    fn zero_length_is_rejected_for_free_forms() {
        let error = PoemRequest::new(
            PoemType::Ode,
            City::Bergamo,
            Pollutant::Pm10,
            date(2022, 1, 1),
            date(2022, 1, 31),
            Some(0),
        )
        .unwrap_err();
        assert_eq!(error, PoemRequestError::ZeroLength);
    }

    #[test]
    fn wire_names_match_form_values() {
        assert_eq!(
            serde_json::from_str::<PoemType>("\"Free Verse\"").unwrap(),
            PoemType::FreeVerse
        );
        assert_eq!(
            serde_json::from_str::<Pollutant>("\"pm2.5\"").unwrap(),
            Pollutant::Pm25
        );
        assert_eq!(serde_json::to_string(&PoemOrigin::AiGenerated).unwrap(), "\"ai_generated\"");
    }

    #[test]
    fn long_date_has_no_padding() {
        assert_eq!(long_date(date(2022, 1, 1)), "January 1, 2022");
        assert_eq!(long_date(date(2022, 12, 31)), "December 31, 2022");
    }

    #[test]
    fn bizerte_reads_bergamo_data() {
        assert_eq!(City::Bizerte.data_source(), City::Bergamo);
        assert_eq!(City::Treviglio.data_source(), City::Treviglio);
    }
}
