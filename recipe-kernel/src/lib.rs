//! Recipe generation pipeline.
//!
//! This crate turns a set of ingredients into a normalized recipe batch and
//! offers the pure transformations applied to a batch afterwards: serving
//! scaling and cooking-time/difficulty filtering. The network call itself is
//! delegated to a [`GenerationAdapter`](recipe_adapters::GenerationAdapter).

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod filter;
mod generator;
pub mod normalize;
pub mod scaling;

pub use error::{
    ErrorCategory, GenerationError, GenerationResult, NormalizeError, NormalizeResult,
};
pub use filter::{CookingTime, DifficultyFilter, RecipeFilter, UnknownFilter};
pub use generator::RecipeGenerator;
pub use normalize::normalize_response;
pub use scaling::{DEFAULT_SERVINGS, ServingScaler, scale_ingredients};
