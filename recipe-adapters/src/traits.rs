//! Shared generation adapter traits and data structures.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Result alias used by generation adapters.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error type shared by adapter implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Adapter is misconfigured or missing credentials.
    #[error("adapter not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The supplied request was invalid for the target model.
    #[error("invalid generation request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be processed.
        reason: String,
    },

    /// Transport-level failures (connection, TLS, timeout).
    #[error("adapter transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The provider rejected the request due to rate limiting.
    #[error("adapter rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Suggested delay before retrying.
        retry_after: Option<Duration>,
        /// Message reported by the provider, if any.
        message: Option<String>,
    },

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `error.message` from the provider's error body, if any.
        message: Option<String>,
    },

    /// The provider returned a body that is not JSON.
    #[error("adapter response error: {reason}")]
    Response {
        /// Additional context about the response failure.
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Message the provider attached to its error response, if any.
    #[must_use]
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::RateLimited { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Minimal metadata describing an adapter instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterMetadata {
    provider: &'static str,
    model: String,
}

impl AdapterMetadata {
    /// Creates metadata for the supplied provider and model identifier.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Returns the provider identifier (e.g., "gemini").
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Trait implemented by generative text backends.
///
/// Implementations submit one prompt and hand back the provider's response
/// envelope untouched; digging the text out of it is the caller's job.
#[async_trait]
pub trait GenerationAdapter: Send + Sync {
    /// Returns basic metadata describing the adapter instance.
    fn metadata(&self) -> &AdapterMetadata;

    /// Submits `prompt` and returns the decoded JSON response envelope.
    async fn generate_content(&self, prompt: &str) -> AdapterResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_only_for_provider_errors() {
        let status = AdapterError::Status {
            status: 400,
            message: Some("API key not valid".to_owned()),
        };
        assert_eq!(status.provider_message(), Some("API key not valid"));

        let limited = AdapterError::RateLimited {
            retry_after: Some(Duration::from_secs(3)),
            message: None,
        };
        assert_eq!(limited.provider_message(), None);

        assert_eq!(AdapterError::transport("reset").provider_message(), None);
    }

    #[test]
    fn metadata_accessors() {
        let metadata = AdapterMetadata::new("gemini", "gemini-1.5-flash");
        assert_eq!(metadata.provider(), "gemini");
        assert_eq!(metadata.model(), "gemini-1.5-flash");
    }
}
