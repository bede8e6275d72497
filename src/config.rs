use std::{env, fs, net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0:9700";
pub const DEFAULT_SESSION_CAPACITY: u32 = 1024;
pub const DEFAULT_SESSION_IDLE_SECS: u32 = 1800;

#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    http_bind: SocketAddr,
    google_api_key: Option<String>,
    google_ai_model: String,
    google_ai_endpoint: String,
    temperature: f32,
    max_output_tokens: u32,
    data_dir: PathBuf,
    session_capacity: u32,
    session_idle_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// Loads the service settings from the environment.
    ///
    /// The API key is optional here: a missing key is reported per request,
    /// when a poem is generated.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a value is present but cannot be parsed
    /// or is out of range, or when a `_FILE` secret cannot be read.
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_bind = parse_socket_addr("POETRY_HTTP_BIND", DEFAULT_HTTP_BIND)?;
        let google_api_key = env_or_file("GOOGLE_API_KEY")?;
        let google_ai_model = non_empty_or("GOOGLE_AI_MODEL", DEFAULT_MODEL);
        let google_ai_endpoint = non_empty_or("GOOGLE_AI_ENDPOINT", DEFAULT_ENDPOINT);

        let temperature = parse_f32("POETRY_TEMPERATURE", 0.7)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                name: "POETRY_TEMPERATURE",
                source: anyhow::anyhow!("value must be between 0.0 and 2.0"),
            });
        }
        let max_output_tokens = parse_u32("POETRY_MAX_OUTPUT_TOKENS", 800)?;
        if max_output_tokens == 0 {
            return Err(ConfigError::Invalid {
                name: "POETRY_MAX_OUTPUT_TOKENS",
                source: anyhow::anyhow!("must be greater than zero"),
            });
        }

        let data_dir = PathBuf::from(non_empty_or("POETRY_DATA_DIR", "data"));

        let session_capacity = parse_u32("POETRY_SESSION_CAPACITY", DEFAULT_SESSION_CAPACITY)?;
        if session_capacity == 0 {
            return Err(ConfigError::Invalid {
                name: "POETRY_SESSION_CAPACITY",
                source: anyhow::anyhow!("must be greater than zero"),
            });
        }
        let session_idle_secs = parse_u32("POETRY_SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS)?;
        if session_idle_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "POETRY_SESSION_IDLE_SECS",
                source: anyhow::anyhow!("must be greater than zero"),
            });
        }

        Ok(Self {
            http_bind,
            google_api_key,
            google_ai_model,
            google_ai_endpoint,
            temperature,
            max_output_tokens,
            data_dir,
            session_capacity,
            session_idle_timeout: Duration::from_secs(u64::from(session_idle_secs)),
        })
    }

    #[must_use]
    pub fn http_bind(&self) -> SocketAddr {
        self.http_bind
    }

    #[must_use]
    pub fn google_api_key(&self) -> Option<&str> {
        self.google_api_key.as_deref()
    }

    #[must_use]
    pub fn google_ai_model(&self) -> &str {
        &self.google_ai_model
    }

    #[must_use]
    pub fn google_ai_endpoint(&self) -> &str {
        &self.google_ai_endpoint
    }

    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    #[must_use]
    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    #[must_use]
    pub fn data_dir(&self) -> &std::path::Path {
        &self.data_dir
    }

    /// Most sessions whose latest poem is remembered at once.
    #[must_use]
    pub fn session_capacity(&self) -> u32 {
        self.session_capacity
    }

    /// How long an untouched session is remembered.
    #[must_use]
    pub fn session_idle_timeout(&self) -> Duration {
        self.session_idle_timeout
    }
}

/// Read a value from `name`, or from the file named by `{name}_FILE`
/// (Docker secrets). Blank values count as unset.
fn env_or_file(name: &'static str) -> Result<Option<String>, ConfigError> {
    let file_env = format!("{name}_FILE");
    if let Ok(path) = env::var(&file_env) {
        let content = fs::read_to_string(&path).map_err(|error| ConfigError::Invalid {
            name,
            source: anyhow::Error::new(error).context(format!("failed to read {file_env}")),
        })?;
        let trimmed = content.trim();
        return Ok((!trimmed.is_empty()).then(|| trimmed.to_string()));
    }

    Ok(env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

fn non_empty_or(name: &'static str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());

    raw.parse().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_u32(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<u32>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_f32(name: &'static str, default: f32) -> Result<f32, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<f32>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}
