pub mod poem;
pub mod pollution;

pub use poem::{
    City, GeneratedPoem, PoemOrigin, PoemRequest, PoemRequestError, PoemType, Pollutant,
    SONNET_LINES, long_date,
};
pub use pollution::{PollutionLevel, PollutionRecord, PollutionSummary, TIER_BREAKPOINTS};
