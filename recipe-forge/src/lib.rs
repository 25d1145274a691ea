//! Ingredient-driven recipe generation toolkit.
//!
//! This facade bundles the workspace crates behind feature flags. With the
//! default features a typical round trip looks like: load an
//! [`config::AppConfig`], build a [`adapters::GeminiAdapter`], hand it to a
//! [`kernel::RecipeGenerator`], then filter, scale and persist the batch.

#![warn(missing_docs, clippy::pedantic)]

/// Recipe data model, identifiers and ingredient/diet selection.
pub use recipe_primitives as primitives;

/// Prompt templates (enabled by `prompts` feature).
#[cfg(feature = "prompts")]
pub use recipe_prompts as prompts;

/// Generation API adapters (enabled by `adapters` feature).
#[cfg(feature = "adapters")]
pub use recipe_adapters as adapters;

/// Normalization, scaling, filtering and orchestration (enabled by `kernel` feature).
#[cfg(feature = "kernel")]
pub use recipe_kernel as kernel;

/// Favorites and batch persistence (enabled by `memory` feature).
#[cfg(feature = "memory")]
pub use recipe_memory as memory;

/// Runtime configuration (enabled by `config` feature).
#[cfg(feature = "config")]
pub use recipe_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use recipe_telemetry as telemetry;

/// Commonly used types.
pub mod prelude {
    pub use recipe_primitives::{
        DietaryPreference, DietarySelection, Difficulty, IngredientSelection, Rating, Recipe,
        RecipeId,
    };

    #[cfg(feature = "adapters")]
    pub use recipe_adapters::{GeminiAdapter, GeminiConfig, GenerationAdapter};

    #[cfg(feature = "kernel")]
    pub use recipe_kernel::{
        CookingTime, DifficultyFilter, GenerationError, RecipeFilter, RecipeGenerator,
        ServingScaler,
    };

    #[cfg(feature = "memory")]
    pub use recipe_memory::{Favorites, FileStore, RecipeStore, VolatileStore};
}
