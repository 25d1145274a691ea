//! Error types for the generation pipeline.

use recipe_adapters::AdapterError;
use recipe_prompts::TemplateError;
use thiserror::Error;

/// Result alias for normalizer operations.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Result alias for orchestrator operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Reasons a model response could not be turned into recipes.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// `candidates[0].content.parts[0].text` is missing or empty.
    #[error("response envelope has no candidate text")]
    MalformedEnvelope,

    /// No `{ ... }` span was found once code fences were removed.
    #[error("no JSON object found in model response")]
    NoJsonFound,

    /// The extracted span is not valid JSON.
    #[error("model response is not valid JSON: {source}")]
    InvalidJson {
        /// Underlying parser error.
        #[from]
        source: serde_json::Error,
    },

    /// The JSON object lacks a `recipes` array.
    #[error("model response has no `recipes` array")]
    InvalidSchema,
}

/// Coarse failure class used to pick the message shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller can fix the input.
    Input,
    /// The API could not be reached or refused the call.
    Transport,
    /// The model answered with something unusable.
    Format,
    /// The model answered correctly but with no recipes.
    EmptyResult,
}

/// Failures surfaced by [`RecipeGenerator`](crate::RecipeGenerator).
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No ingredients were supplied.
    #[error("no ingredients selected")]
    NoIngredientsSelected,

    /// The generation API call failed.
    #[error("generation request failed: {source}")]
    Transport {
        /// Adapter error, carrying the provider message when there is one.
        #[from]
        source: AdapterError,
    },

    /// The response could not be normalized.
    #[error("failed to process model response: {source}")]
    Processing {
        /// Normalizer error.
        #[from]
        source: NormalizeError,
    },

    /// The response held zero recipes.
    #[error("model returned no recipes")]
    EmptyResult,

    /// The prompt could not be rendered.
    #[error("failed to build prompt: {source}")]
    Prompt {
        /// Template error.
        #[from]
        source: TemplateError,
    },
}

impl GenerationError {
    /// Classifies the error for presentation.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NoIngredientsSelected => ErrorCategory::Input,
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::Processing { .. } | Self::Prompt { .. } => ErrorCategory::Format,
            Self::EmptyResult => ErrorCategory::EmptyResult,
        }
    }

    /// The single human-readable message shown at the UI boundary.
    ///
    /// Diagnostic detail from format failures is logged, not shown.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoIngredientsSelected => "Please select at least one ingredient".to_owned(),
            Self::Transport { source } => source.provider_message().map_or_else(
                || "Failed to generate recipes. Please try again.".to_owned(),
                str::to_owned,
            ),
            Self::Processing { .. } | Self::Prompt { .. } => {
                "Failed to process recipes from API response".to_owned()
            }
            Self::EmptyResult => {
                "No recipes found. Try different ingredients or preferences.".to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_prefers_provider_text() {
        let err = GenerationError::from(AdapterError::Status {
            status: 400,
            message: Some("API key not valid".to_owned()),
        });
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert_eq!(err.user_message(), "API key not valid");

        let err = GenerationError::from(AdapterError::transport("connection reset"));
        assert_eq!(
            err.user_message(),
            "Failed to generate recipes. Please try again."
        );
    }

    #[test]
    fn format_errors_hide_details() {
        let err = GenerationError::from(NormalizeError::InvalidSchema);
        assert_eq!(err.category(), ErrorCategory::Format);
        assert_eq!(
            err.user_message(),
            "Failed to process recipes from API response"
        );
    }

    #[test]
    fn input_and_empty_categories() {
        assert_eq!(
            GenerationError::NoIngredientsSelected.category(),
            ErrorCategory::Input
        );
        assert_eq!(
            GenerationError::EmptyResult.category(),
            ErrorCategory::EmptyResult
        );
        assert!(
            GenerationError::EmptyResult
                .user_message()
                .starts_with("No recipes found")
        );
    }
}
