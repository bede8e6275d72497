use reqwest::StatusCode;
use thiserror::Error;

pub const MISSING_API_KEY: &str = "Google API key is required but was not provided";

/// Failures of a single text-generation call.
///
/// Only [`GenerationError::Configuration`] is fatal to a poem request; the
/// rest are answered with a fallback poem.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("Google AI API error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("unexpected response format from Google AI API: {0}")]
    MalformedResponse(String),

    #[error("request to Google AI API failed: {0}")]
    Network(#[source] reqwest::Error),
}

impl GenerationError {
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum PoetryError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Failed to load pollution data: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Failed to build Google AI client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_configuration_is_fatal() {
        assert!(GenerationError::Configuration(MISSING_API_KEY.into()).is_fatal());
        assert!(
            !GenerationError::Upstream {
                status: StatusCode::TOO_MANY_REQUESTS,
                message: "quota".into(),
            }
            .is_fatal()
        );
        assert!(!GenerationError::MalformedResponse("no text".into()).is_fatal());
    }

    #[test]
    fn upstream_message_carries_status_and_cause() {
        let error = GenerationError::Upstream {
            status: StatusCode::BAD_REQUEST,
            message: "API key not valid".into(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("400"));
        assert!(rendered.contains("API key not valid"));
    }
}
