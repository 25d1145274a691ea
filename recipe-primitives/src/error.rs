//! Shared error definitions for recipe primitives.

use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used throughout the recipe workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating recipe primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// The provided recipe identifier could not be parsed.
    #[error("invalid recipe id: {source}")]
    InvalidRecipeId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },

    /// Ratings are limited to the 0..=5 star range.
    #[error("invalid rating {value}: must be between 0 and {max}")]
    InvalidRating {
        /// The rejected value.
        value: u8,
        /// Highest accepted rating.
        max: u8,
    },

    /// A dietary preference label did not match any known preference.
    #[error("unknown dietary preference `{label}`")]
    UnknownPreference {
        /// The offending label.
        label: String,
    },

    /// The requested dietary preference contradicts the selected ingredients.
    #[error("cannot select {preference} with non-vegetarian ingredients: {ingredients:?}")]
    DietaryConflict {
        /// Preference the caller attempted to enable.
        preference: String,
        /// Ingredients that triggered the conflict.
        ingredients: Vec<String>,
    },
}
