//! Generator configuration, loaded from the environment.

use crate::genre::{Mode, ParseError};
use std::time::Duration;
use thiserror::Error;

/// Default model for AI mode.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: usize = 500;
/// Default limit on a single generation call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const MODEL_VAR: &str = "MICROSTORY_MODEL";
pub const MAX_TOKENS_VAR: &str = "MICROSTORY_MAX_TOKENS";
pub const TIMEOUT_VAR: &str = "MICROSTORY_TIMEOUT_SECS";
pub const MODE_VAR: &str = "MICROSTORY_MODE";

/// Errors from reading configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var}: {source}")]
    InvalidMode {
        var: &'static str,
        #[source]
        source: ParseError,
    },
}

/// Settings for story generation.
#[derive(Debug, Clone)]
pub struct StoryConfig {
    /// Credential for the generation service. `None` disables AI mode.
    pub api_key: Option<String>,

    /// Model identifier sent with each request.
    pub model: String,

    /// Maximum output tokens per request.
    pub max_tokens: usize,

    /// Upper bound on one generation call.
    pub timeout: Duration,

    /// Mode used when the caller does not pick one.
    pub default_mode: Mode,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            default_mode: Mode::Template,
        }
    }
}

impl StoryConfig {
    /// Read configuration from process environment variables.
    ///
    /// Callers that want `.env` support load it first (see `dotenvy`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        config.api_key = get(API_KEY_VAR).map(|key| key.trim().to_string());

        if let Some(model) = get(MODEL_VAR) {
            config.model = model.trim().to_string();
        }
        if let Some(value) = get(MAX_TOKENS_VAR) {
            config.max_tokens = parse_positive(MAX_TOKENS_VAR, &value)? as usize;
        }
        if let Some(value) = get(TIMEOUT_VAR) {
            config.timeout = Duration::from_secs(parse_positive(TIMEOUT_VAR, &value)?);
        }
        if let Some(value) = get(MODE_VAR) {
            config.default_mode = value
                .parse()
                .map_err(|source| ConfigError::InvalidMode {
                    var: MODE_VAR,
                    source,
                })?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_mode(mut self, mode: Mode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Whether AI mode can attempt delegation at all.
    pub fn is_ai_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}
