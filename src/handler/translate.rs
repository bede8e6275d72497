use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::app::AppState;
use crate::pipeline::{Translation, translate};

#[derive(Debug, Deserialize)]
pub struct TranslateRequestBody {
    text: String,
    target_language: String,
}

/// Handler for POST /v1/translate. Always answers 200; untranslatable
/// input comes back unchanged with `translated: false`.
pub async fn translate_handler(
    State(state): State<AppState>,
    Json(body): Json<TranslateRequestBody>,
) -> Json<Translation> {
    let generator = state.pipeline.generator();
    Json(translate(generator.as_ref(), &body.text, &body.target_language).await)
}
