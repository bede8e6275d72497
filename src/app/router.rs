use crate::app::state::AppState;
use crate::handler::health::health_handler;
use crate::handler::poem::{generate_poem_handler, latest_poem_handler};
use crate::handler::summary::summary_handler;
use crate::handler::translate::translate_handler;
use axum::Router;
use axum::routing::{get, post};

/// Build the HTTP router (health, pollution summary, poems, translation).
pub fn main_router(state: AppState) -> Router {
    let v1_health_router = Router::new().route("/v1/health", get(health_handler));

    let v1_poetry_router = Router::new()
        .route("/v1/pollution/summary", get(summary_handler))
        .route("/v1/poems", post(generate_poem_handler))
        .route("/v1/poems/latest", get(latest_poem_handler))
        .route("/v1/translate", post(translate_handler))
        .with_state(state);

    Router::new().merge(v1_health_router).merge(v1_poetry_router)
}
