use crate::adapter::{DatasetCatalog, GeminiClient};
use crate::config::Config;
use crate::error::PoetryError;
use crate::pipeline::{BoardRegistry, GenerationSettings, PoemPipeline};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state: the generation pipeline, the read-only
/// datasets and the per-session poem boards.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: PoemPipeline,
    pub datasets: Arc<DatasetCatalog>,
    pub boards: Arc<BoardRegistry>,
}

impl AppState {
    #[must_use]
    pub fn new(pipeline: PoemPipeline, datasets: DatasetCatalog, boards: BoardRegistry) -> Self {
        Self {
            pipeline,
            datasets: Arc::new(datasets),
            boards: Arc::new(boards),
        }
    }

    /// Create `AppState` from configuration settings.
    ///
    /// Loads every pollution dataset up front and builds the Gemini client
    /// with the configured key and model.
    ///
    /// # Errors
    /// Returns [`PoetryError`] when a dataset is unreadable or the HTTP
    /// client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, PoetryError> {
        let datasets = DatasetCatalog::load_dir(config.data_dir())?;

        if config.google_api_key().is_none() {
            warn!("GOOGLE_API_KEY is not set; poem generation requests will be rejected");
        }
        let client = GeminiClient::new(
            config.google_ai_endpoint(),
            config.google_ai_model(),
            config.google_api_key().map(str::to_string),
        )
        .map_err(PoetryError::Client)?;
        info!(model = config.google_ai_model(), "Google AI client ready");

        let pipeline = PoemPipeline::new(
            Arc::new(client),
            GenerationSettings {
                temperature: config.temperature(),
                max_output_tokens: config.max_output_tokens(),
            },
        );

        let boards = BoardRegistry::with_limits(
            u64::from(config.session_capacity()),
            config.session_idle_timeout(),
        );

        Ok(Self::new(pipeline, datasets, boards))
    }
}
