use serde::Serialize;
use tracing::warn;

use crate::port::{TextGenerator, TextRequest};

use super::prompt::build_translation_prompt;

const TRANSLATION_TEMPERATURE: f32 = 0.2;
const TRANSLATION_MAX_OUTPUT_TOKENS: u32 = 1200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub text: String,
    pub translated: bool,
}

impl Translation {
    fn untouched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            translated: false,
        }
    }
}

/// Translates `text` into `target_language`, returning the original text
/// unchanged whenever translation is not possible.
pub async fn translate(
    generator: &dyn TextGenerator,
    text: &str,
    target_language: &str,
) -> Translation {
    let target_language = target_language.trim();
    if text.trim().is_empty() || target_language.is_empty() {
        return Translation::untouched(text);
    }

    let request = TextRequest::new(
        build_translation_prompt(text, target_language),
        TRANSLATION_TEMPERATURE,
        TRANSLATION_MAX_OUTPUT_TOKENS,
    );

    match generator.generate(&request).await {
        Ok(translated) if !translated.trim().is_empty() => Translation {
            text: translated,
            translated: true,
        },
        Ok(_) => {
            warn!(target_language, "translation came back empty, keeping original");
            Translation::untouched(text)
        }
        Err(error) => {
            warn!(%error, target_language, "translation failed, keeping original");
            Translation::untouched(text)
        }
    }
}
