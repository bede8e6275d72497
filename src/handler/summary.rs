use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::AppState;
use crate::domain::{City, Pollutant, PollutionLevel};
use crate::pipeline::aggregator;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    city: City,
    pollutant: Pollutant,
    from: NaiveDate,
    to: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    average_rate: f64,
    level: PollutionLevel,
    level_label: &'static str,
    record_count: usize,
    gauge_max: u32,
}

/// Handler for GET /v1/pollution/summary
pub async fn summary_handler(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Json<SummaryResponse> {
    let records = state.datasets.records(query.city, query.pollutant);
    let summary = aggregator::summarize(&records, query.from, query.to);
    info!(
        city = %query.city,
        pollutant = %query.pollutant,
        average_rate = summary.average_rate,
        records = summary.record_count,
        "pollution summary computed"
    );

    Json(SummaryResponse {
        average_rate: summary.average_rate,
        level: summary.level,
        level_label: summary.level.label(),
        record_count: summary.record_count,
        gauge_max: query.pollutant.gauge_max(),
    })
}
