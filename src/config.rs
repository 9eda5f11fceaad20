//! Runtime configuration: model parameters, endpoint, timeouts and credential lookup.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_GIT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

const MODEL_ENV_VAR: &str = "COMMIT_ASSIST_MODEL";
const BASE_URL_ENV_VAR: &str = "COMMIT_ASSIST_BASE_URL";
const GIT_TIMEOUT_ENV_VAR: &str = "COMMIT_ASSIST_GIT_TIMEOUT";
const API_TIMEOUT_ENV_VAR: &str = "COMMIT_ASSIST_API_TIMEOUT";

/// Environment variables consulted for the API key, in order.
pub const CREDENTIAL_ENV_VARS: [&str; 2] = ["GROQ_API_KEY", "MY_API_KEY"];

/// Settings shared by the git gateway and the completion client.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub git_timeout: Duration,
    pub api_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            git_timeout: Duration::from_secs(DEFAULT_GIT_TIMEOUT_SECS),
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

/// Overrides taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Config {
    /// Defaults overridden by `COMMIT_ASSIST_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            model: non_empty_var(MODEL_ENV_VAR).unwrap_or(defaults.model),
            base_url: non_empty_var(BASE_URL_ENV_VAR).unwrap_or(defaults.base_url),
            git_timeout: timeout_from_env(GIT_TIMEOUT_ENV_VAR, DEFAULT_GIT_TIMEOUT_SECS),
            api_timeout: timeout_from_env(API_TIMEOUT_ENV_VAR, DEFAULT_API_TIMEOUT_SECS),
            ..defaults
        }
    }

    /// Apply command-line overrides and validate the result.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(temperature) = overrides.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = overrides.max_tokens {
            self.max_tokens = max_tokens;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        Ok(())
    }
}

/// Resolve the API key: explicit entry first, then the environment.
///
/// Blank values are treated as absent.
pub fn resolve_credential(explicit: Option<&str>) -> Option<String> {
    if let Some(value) = explicit.map(str::trim)
        && !value.is_empty()
    {
        return Some(value.to_string());
    }

    CREDENTIAL_ENV_VARS.iter().find_map(|var| non_empty_var(var))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a timeout in seconds from `var`, falling back to `default_secs`.
///
/// Logs a warning if the variable is set but is not a positive integer.
fn timeout_from_env(var: &str, default_secs: u64) -> Duration {
    match env::var(var) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    var, v, default_secs
                );
                Duration::from_secs(default_secs)
            }
        },
        _ => Duration::from_secs(default_secs),
    }
}
