//! Core shared types for recipe-forge.

#![warn(missing_docs, clippy::pedantic)]

mod diet;
mod error;
mod ids;
mod recipe;
pub mod selection;

/// Dietary constraints attached to generation requests.
pub use diet::DietaryPreference;
/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Locally generated recipe identity.
pub use ids::RecipeId;
/// The normalized recipe record and its value types.
pub use recipe::{
    DEFAULT_DIFFICULTY, Difficulty, MAX_RATING, NUTRITION_PLACEHOLDER, Nutrition, Rating, Recipe,
    RecipeBuilder, UNTITLED_RECIPE,
};
/// Ingredient and dietary pickers.
pub use selection::{DietarySelection, IngredientCategory, IngredientSelection};
