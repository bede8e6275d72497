use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::{GeneratedPoem, PoemOrigin, PoemRequest, PollutionRecord};
use crate::error::GenerationError;
use crate::port::{TextGenerator, TextRequest};

use super::{aggregator, fallback, prompt};

/// Sampling settings for poem generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 800,
        }
    }
}

/// A poem plus the non-fatal advisory shown when it came from the fallback.
#[derive(Debug, Clone, Serialize)]
pub struct PoemOutcome {
    pub poem: GeneratedPoem,
    pub advisory: Option<String>,
}

/// Aggregate, build the prompt, call the generator, fall back on failure.
#[derive(Clone)]
pub struct PoemPipeline {
    generator: Arc<dyn TextGenerator>,
    settings: GenerationSettings,
}

impl PoemPipeline {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, settings: GenerationSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    #[must_use]
    pub fn generator(&self) -> Arc<dyn TextGenerator> {
        Arc::clone(&self.generator)
    }

    /// Generates one poem for `request` from `dataset`.
    ///
    /// # Errors
    /// Only [`GenerationError::Configuration`] is returned; every other
    /// generator failure yields a fallback poem with an advisory naming the
    /// cause.
    #[instrument(
        skip_all,
        fields(
            poem_type = %request.poem_type(),
            city = %request.city(),
            pollutant = %request.pollutant(),
            model = %self.generator.model(),
        )
    )]
    pub async fn generate_poem(
        &self,
        request: &PoemRequest,
        dataset: &[PollutionRecord],
    ) -> Result<PoemOutcome, GenerationError> {
        let summary = aggregator::summarize(dataset, request.from_date(), request.to_date());
        info!(
            average_rate = summary.average_rate,
            level = ?summary.level,
            records = summary.record_count,
            "pollution summary computed"
        );

        let text_request = TextRequest::new(
            prompt::build_poem_prompt(request, &summary),
            self.settings.temperature,
            self.settings.max_output_tokens,
        );

        match self.generator.generate(&text_request).await {
            Ok(text) => {
                info!(chars = text.chars().count(), "poem generated");
                Ok(PoemOutcome {
                    poem: GeneratedPoem::new(
                        text,
                        request.clone(),
                        summary,
                        PoemOrigin::AiGenerated,
                    ),
                    advisory: None,
                })
            }
            Err(error) if error.is_fatal() => {
                warn!(%error, "poem generation aborted");
                Err(error)
            }
            Err(error) => {
                warn!(%error, "generation failed, using fallback poem");
                let text = fallback::fallback_poem(
                    request.poem_type(),
                    request.city(),
                    request.pollutant(),
                    summary.average_rate,
                    request.from_date(),
                    request.to_date(),
                    request.effective_length(),
                );
                Ok(PoemOutcome {
                    poem: GeneratedPoem::new(text, request.clone(), summary, PoemOrigin::Fallback),
                    advisory: Some(format!(
                        "Error using Google AI: {error}. Displaying a locally generated poem instead."
                    )),
                })
            }
        }
    }
}
