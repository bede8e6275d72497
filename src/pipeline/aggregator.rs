use chrono::NaiveDate;

use crate::domain::{PollutionRecord, PollutionSummary};

/// Mean `pollution_rate` of the records dated within `[from, to]`
/// (inclusive, by calendar date). An empty selection averages to 0.
#[must_use]
pub fn summarize(records: &[PollutionRecord], from: NaiveDate, to: NaiveDate) -> PollutionSummary {
    let (sum, count) = records
        .iter()
        .filter(|record| from <= record.date && record.date <= to)
        .fold((0.0_f64, 0_usize), |(sum, count), record| {
            (sum + record.pollution_rate, count + 1)
        });

    let average = if count == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let divisor = count as f64;
        sum / divisor
    };

    PollutionSummary::from_average(average, count)
}
