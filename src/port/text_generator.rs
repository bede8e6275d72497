use crate::error::GenerationError;
use std::future::Future;
use std::pin::Pin;

/// One text-generation call: the prompt and the sampling settings.
///
/// The model and credentials belong to the generator itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl TextRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
            max_output_tokens,
        }
    }
}

/// Text generation backend (Gemini, test doubles).
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        request: &'a TextRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;

    /// Model identifier, used for logging.
    fn model(&self) -> &str;
}
