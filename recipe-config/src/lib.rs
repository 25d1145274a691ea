//! Runtime configuration for recipe-forge.
//!
//! Values come from built-in defaults, optionally a JSON file, and then
//! `RECIPE_*` environment variables, in that order of precedence.

#![warn(missing_docs, clippy::pedantic)]

use std::env;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default serving baseline for scaling.
pub const DEFAULT_SERVING_BASELINE: u32 = 4;

/// Default directory for persisted collections.
pub const DEFAULT_DATA_DIR: &str = ".recipe-forge";

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable carrying a full generation endpoint URL.
pub const ENV_API_URL: &str = "RECIPE_API_URL";
/// Environment variable carrying the Gemini API key.
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable selecting the model.
pub const ENV_MODEL: &str = "RECIPE_MODEL";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "RECIPE_BASE_URL";
/// Environment variable for the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "RECIPE_TIMEOUT_SECS";
/// Environment variable for the serving baseline.
pub const ENV_SERVING_BASELINE: &str = "RECIPE_SERVING_BASELINE";
/// Environment variable for the data directory.
pub const ENV_DATA_DIR: &str = "RECIPE_DATA_DIR";
/// Environment variable for the log filter.
pub const ENV_LOG: &str = "RECIPE_LOG";
/// Environment variable toggling JSON-constrained responses.
pub const ENV_JSON_RESPONSE: &str = "RECIPE_JSON_RESPONSE";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value was present but unusable.
    #[error("invalid configuration for `{field}`: {reason}")]
    Invalid {
        /// Offending field or variable.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for [`AppConfig`].
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Full generation URL; overrides `base_url`/`model`/`api_key` derivation.
    pub endpoint: Option<String>,
    /// API key appended to the derived endpoint.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// API base URL.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Servings a generated recipe is assumed to feed.
    pub serving_baseline: u32,
    /// Directory holding persisted collections.
    pub data_dir: PathBuf,
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Ask the provider for `application/json` output.
    pub json_response: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            serving_baseline: DEFAULT_SERVING_BASELINE,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            json_response: false,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable or out-of-range values.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable or out-of-range values.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    /// Reads a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`], [`ConfigError::Parse`] or, when the
    /// values fail [`validate`](Self::validate), [`ConfigError::Invalid`].
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration file");
        config.validate()?;
        Ok(config)
    }

    /// Applies every variable `lookup` knows about on top of `self`.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable or out-of-range values.
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(endpoint) = get(ENV_API_URL) {
            self.endpoint = Some(endpoint);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model = model;
        }
        if let Some(base_url) = get(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_number(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = get(ENV_SERVING_BASELINE) {
            self.serving_baseline = parse_number(ENV_SERVING_BASELINE, &raw)?;
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(filter) = get(ENV_LOG) {
            self.log_filter = filter;
        }
        if let Some(raw) = get(ENV_JSON_RESPONSE) {
            self.json_response = parse_flag(ENV_JSON_RESPONSE, &raw)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("timeout_secs", "must be greater than zero"));
        }
        if self.serving_baseline == 0 {
            return Err(ConfigError::invalid(
                "serving_baseline",
                "must be greater than zero",
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("model", "must not be empty"));
        }
        if let Some(endpoint) = &self.endpoint {
            if !is_http_url(endpoint) {
                return Err(ConfigError::invalid(
                    "endpoint",
                    format!("`{endpoint}` is not an http(s) URL"),
                ));
            }
        }
        if !is_http_url(&self.base_url) {
            return Err(ConfigError::invalid(
                "base_url",
                format!("`{}` is not an http(s) URL", self.base_url),
            ));
        }
        Ok(())
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Serving baseline, falling back to the default when zero.
    #[must_use]
    pub fn serving_baseline(&self) -> NonZeroU32 {
        NonZeroU32::new(self.serving_baseline)
            .or(NonZeroU32::new(DEFAULT_SERVING_BASELINE))
            .unwrap_or(NonZeroU32::MIN)
    }

    /// File path for persisted state named `name` under the data directory.
    #[must_use]
    pub fn data_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}

fn parse_number<T>(field: &'static str, raw: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err| ConfigError::invalid(field, format!("`{raw}`: {err}")))
}

fn parse_flag(field: &'static str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(field, format!("`{raw}` is not a boolean"))),
    }
}

fn is_http_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.len() > scheme.len() && lower.starts_with(scheme))
}
