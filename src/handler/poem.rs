use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::app::AppState;
use crate::domain::{City, GeneratedPoem, PoemRequest, PoemRequestError, PoemType, Pollutant};
use crate::error::GenerationError;
use crate::handler::SESSION_HEADER;
use crate::handler::error::ApiError;
use crate::pipeline::{DisplayedPoem, GenerationTicket, PoemOutcome};

#[derive(Debug, Deserialize)]
pub struct PoemRequestBody {
    poem_type: PoemType,
    city: City,
    pollutant: Pollutant,
    from_date: NaiveDate,
    to_date: NaiveDate,
    #[serde(default)]
    length: Option<u32>,
}

impl PoemRequestBody {
    fn into_request(self) -> Result<PoemRequest, PoemRequestError> {
        PoemRequest::new(
            self.poem_type,
            self.city,
            self.pollutant,
            self.from_date,
            self.to_date,
            self.length,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct PoemResponse {
    poem: GeneratedPoem,
    advisory: Option<String>,
    file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticket: Option<GenerationTicket>,
}

impl PoemResponse {
    fn new(outcome: PoemOutcome, ticket: Option<GenerationTicket>) -> Self {
        let file_name = outcome.poem.download_file_name();
        Self {
            poem: outcome.poem,
            advisory: outcome.advisory,
            file_name,
            ticket,
        }
    }
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Handler for POST /v1/poems
///
/// With a session header the request takes a ticket on that session's
/// board before generating; if a newer request from the same session was
/// issued meanwhile, the result is discarded and 409 is returned.
pub async fn generate_poem_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PoemRequestBody>,
) -> Result<Json<PoemResponse>, ApiError> {
    let request = body
        .into_request()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let claim = match session_id(&headers) {
        Some(session) => {
            let board = state.boards.board(session);
            let ticket = board.begin();
            Some((board, ticket))
        }
        None => None,
    };

    let records = state.datasets.records(request.city(), request.pollutant());
    let outcome = state
        .pipeline
        .generate_poem(&request, &records)
        .await
        .map_err(|error| {
            error!(%error, "poem generation rejected");
            match error {
                GenerationError::Configuration(message) => ApiError::Configuration(message),
                other => ApiError::Internal(other.to_string()),
            }
        })?;

    let ticket = match claim {
        Some((board, ticket)) => {
            if !board.publish(ticket, outcome.clone()) {
                info!(ticket = ticket.value(), "poem superseded before it could be shown");
                return Err(ApiError::Superseded);
            }
            Some(ticket)
        }
        None => None,
    };

    Ok(Json(PoemResponse::new(outcome, ticket)))
}

/// Handler for GET /v1/poems/latest
pub async fn latest_poem_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PoemResponse>, ApiError> {
    let Some(session) = session_id(&headers) else {
        return Err(ApiError::BadRequest(format!("{SESSION_HEADER} header is required")));
    };

    let shown = state
        .boards
        .existing(session)
        .and_then(|board| board.current());

    match shown {
        Some(DisplayedPoem { ticket, outcome }) => {
            Ok(Json(PoemResponse::new(outcome, Some(ticket))))
        }
        None => Err(ApiError::NotFound(format!("no poem shown for session {session}"))),
    }
}
