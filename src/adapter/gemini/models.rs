use serde::{Deserialize, Serialize};

/// Upper bound on upstream error text carried into an error message.
pub(crate) const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

pub(crate) fn truncate_error_message(msg: &str) -> String {
    let char_count = msg.chars().count();
    if char_count <= MAX_ERROR_MESSAGE_LENGTH {
        return msg.to_string();
    }
    let truncated: String = msg.chars().take(MAX_ERROR_MESSAGE_LENGTH).collect();
    format!("{truncated}... (truncated, {char_count} chars)")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest<'a> {
    pub(crate) contents: Vec<RequestContent<'a>>,
    pub(crate) generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RequestContent<'a> {
    pub(crate) role: &'static str,
    pub(crate) parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RequestPart<'a> {
    pub(crate) text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub(crate) temperature: f32,
    pub(crate) max_output_tokens: u32,
}

impl<'a> GenerateContentRequest<'a> {
    pub(crate) fn user_prompt(prompt: &'a str, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens,
            },
        }
    }
}

/// Success envelope. SDK-style responses carry a flattened `text`, REST
/// responses nest it under `candidates[].content.parts[]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub(crate) text: Option<String>,
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub(crate) content: Option<CandidateContent>,
    #[serde(default)]
    pub(crate) finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub(crate) parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ContentPart {
    #[serde(default)]
    pub(crate) text: Option<String>,
}

impl GenerateContentResponse {
    /// Generated text, looked up in priority order:
    /// 1. top-level `text`
    /// 2. `candidates[0].content.parts[0].text`
    /// 3. the first non-empty text part of any candidate
    ///
    /// Blank strings are treated as absent.
    pub(crate) fn extract_text(&self) -> Option<String> {
        fn usable(text: Option<&String>) -> Option<String> {
            text.filter(|t| !t.trim().is_empty()).cloned()
        }

        if let Some(text) = usable(self.text.as_ref()) {
            return Some(text);
        }

        let first_part = self
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_ref());
        if let Some(text) = usable(first_part) {
            return Some(text);
        }

        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .find_map(|part| usable(part.text.as_ref()))
    }

    pub(crate) fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
    }
}

/// Error envelope, returned with non-2xx statuses and occasionally with 2xx.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub(crate) code: Option<u16>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}
