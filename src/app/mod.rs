mod router;
pub mod server;
mod state;
pub mod tracing;

pub use router::main_router;
pub use state::AppState;

use crate::config::Config;
use crate::error::PoetryError;
use tokio_util::sync::CancellationToken;

/// Application entry point. Initializes tracing, configuration, and starts the server.
pub async fn run() -> Result<(), PoetryError> {
    let config = Config::from_env()?;

    // Handle healthcheck subcommand (for Docker healthcheck in distroless image)
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        match crate::healthcheck_with_port(config.http_bind().port()).await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1)
            }
        }
    }

    tracing::init_tracing();
    ::tracing::info!(
        bind = %config.http_bind(),
        model = config.google_ai_model(),
        sessions = config.session_capacity(),
        "Loaded settings"
    );

    let app_state = AppState::from_config(&config)?;
    let app = main_router(app_state);

    server::serve(app, config.http_bind(), CancellationToken::new()).await
}
