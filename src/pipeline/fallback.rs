use chrono::NaiveDate;

use crate::domain::{City, PoemType, PollutionLevel, Pollutant, long_date};

/// Canned poem used when the generation service cannot answer.
///
/// Each form has a fixed text; `length` is accepted to mirror the generated
/// path but does not change the output. The first line marks the poem as a
/// fallback.
#[must_use]
pub fn fallback_poem(
    poem_type: PoemType,
    city: City,
    pollutant: Pollutant,
    average_rate: f64,
    from: NaiveDate,
    to: NaiveDate,
    _length: u32,
) -> String {
    let from = long_date(from);
    let to = long_date(to);
    let level = PollutionLevel::from_rate(average_rate).phrase();
    let rate = format!("{average_rate:.1} µg/m³");
    let notice = fallback_notice(poem_type);

    match poem_type {
        PoemType::Sonnet => format!(
            "{notice}

The air in {city} bears a silent weight,
As {pollutant} particles drift unseen,
From {from} to {to},
At {rate}, a {level} sheen.

What stories do these particles relate,
Of industry, of progress unforeseen?
The elements that daily we create,
Transform the very air on which we lean.

Each breath we take connects us to this dance,
Of molecules that travel far and wide,
A shared existence given but one chance,

To recognize what we cannot divide:
Our future bound by choices that we make,
The quality of air, for all our sake."
        ),
        PoemType::Ode => format!(
            "{notice}

O Air of {city}, once clear and bright,
Now bearing {pollutant} in your invisible embrace,
From {from} through winter's fading light,
To {to}, you carry each trace.

At {rate}, {level} by measure,
You move through lungs and lives with silent grace,
Connecting all who breathe without their pleasure,
In knowing what they share in common space.

How strange it is to love what we pollute,
To need what we unconsciously degrade,
This paradox we cannot yet refute,

Reveals the fragile balance we have made.
Between our progress and our planet's health,
Between our comfort and our common wealth."
        ),
        PoemType::FreeVerse => format!(
            "{notice}

In {city}
    the particles of {pollutant} drift
        like memories we'd rather forget

From {from}
to {to}
    a record kept in data:
        {rate}

What does it mean to say
    the air quality is \"{level}\"?

It means children play beneath a veil
It means elders breathe with greater labor
It means the invisible has weight
    and consequence

Each number
    a story
        a choice
            a future

The air connects us all
in this breathing world
    where every molecule matters"
        ),
    }
}

/// First line of every fallback poem.
#[must_use]
pub fn fallback_notice(poem_type: PoemType) -> String {
    format!("[Fallback {poem_type} - AI Service Unavailable]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn poem(poem_type: PoemType, rate: f64, length: u32) -> String {
        fallback_poem(
            poem_type,
            City::Bergamo,
            Pollutant::Pm10,
            rate,
            date(2022, 1, 1),
            date(2022, 1, 31),
            length,
        )
    }

    fn verse_lines(text: &str) -> usize {
        text.lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .count()
    }

    #[test]
    fn sonnet_has_fourteen_lines_whatever_the_length() {
        for length in [1, 14, 40] {
            assert_eq!(verse_lines(&poem(PoemType::Sonnet, 40.0, length)), 14);
        }
    }

    #[test]
    fn fixed_forms_ignore_requested_length() {
        assert_eq!(poem(PoemType::Ode, 40.0, 4), poem(PoemType::Ode, 40.0, 30));
        assert_eq!(poem(PoemType::FreeVerse, 40.0, 4), poem(PoemType::FreeVerse, 40.0, 30));
    }

    #[test]
    fn parameters_are_interpolated() {
        let text = poem(PoemType::Sonnet, 40.0, 14);

        assert!(text.starts_with("[Fallback Sonnet - AI Service Unavailable]"));
        assert!(text.contains("The air in Bergamo"));
        assert!(text.contains("As pm10 particles"));
        assert!(text.contains("From January 1, 2022 to January 31, 2022"));
        assert!(text.contains("40.0 µg/m³"));
        assert!(text.contains("a high sheen"));
    }

    #[test]
    fn level_wording_follows_thresholds() {
        assert!(poem(PoemType::FreeVerse, 12.0, 12).contains("\"low\""));
        assert!(poem(PoemType::FreeVerse, 36.0, 12).contains("\"moderate\""));
        assert!(poem(PoemType::FreeVerse, 56.01, 12).contains("\"very high\""));
        assert!(poem(PoemType::Ode, 56.0, 16).contains("56.0 µg/m³, high by measure"));
    }

    #[test]
    fn rate_is_rounded_to_one_place() {
        assert!(poem(PoemType::Ode, 33.36, 16).contains("33.4 µg/m³"));
    }
}
