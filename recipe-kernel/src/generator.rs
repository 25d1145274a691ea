//! Orchestrates one recipe generation round trip.

use std::sync::Arc;

use recipe_adapters::GenerationAdapter;
use recipe_primitives::{DietaryPreference, Recipe};
use recipe_prompts::{build_recipe_prompt, join_ingredients};
use tracing::{debug, info, warn};

use crate::error::{GenerationError, GenerationResult};
use crate::normalize::normalize_response;

/// Builds the prompt, calls the adapter once, and normalizes the answer.
///
/// Holds no batch state: every call returns a fresh batch or an error, and
/// callers replace whatever they showed before.
#[derive(Clone)]
pub struct RecipeGenerator {
    adapter: Arc<dyn GenerationAdapter>,
}

impl RecipeGenerator {
    /// Creates a generator over the given adapter.
    #[must_use]
    pub fn new(adapter: Arc<dyn GenerationAdapter>) -> Self {
        Self { adapter }
    }

    /// The underlying adapter.
    #[must_use]
    pub fn adapter(&self) -> &Arc<dyn GenerationAdapter> {
        &self.adapter
    }

    /// Generates a batch for `ingredients` under `preferences`.
    ///
    /// Blank ingredient entries are ignored. Exactly one adapter call is made
    /// unless no ingredients remain, in which case none is.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NoIngredientsSelected`] before any I/O when
    /// the list is empty, [`GenerationError::Transport`] when the adapter
    /// fails, [`GenerationError::Processing`] when the answer is unusable and
    /// [`GenerationError::EmptyResult`] when it holds no recipes.
    pub async fn generate<S: AsRef<str>>(
        &self,
        ingredients: &[S],
        preferences: &[DietaryPreference],
    ) -> GenerationResult<Vec<Recipe>> {
        let selected: Vec<&str> = ingredients
            .iter()
            .map(|item| item.as_ref().trim())
            .filter(|item| !item.is_empty())
            .collect();
        if selected.is_empty() {
            return Err(GenerationError::NoIngredientsSelected);
        }

        let prompt = build_recipe_prompt(&join_ingredients(selected.as_slice()), preferences)?;
        let metadata = self.adapter.metadata();
        debug!(
            provider = metadata.provider(),
            model = metadata.model(),
            ingredients = selected.len(),
            preferences = preferences.len(),
            "requesting recipes"
        );

        let envelope = self
            .adapter
            .generate_content(&prompt)
            .await
            .inspect_err(|err| warn!(error = %err, "generation request failed"))?;

        let recipes = normalize_response(&envelope)?;
        if recipes.is_empty() {
            warn!("model returned an empty recipe list");
            return Err(GenerationError::EmptyResult);
        }

        info!(count = recipes.len(), "generated recipe batch");
        Ok(recipes)
    }
}

impl std::fmt::Debug for RecipeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeGenerator")
            .field("adapter", self.adapter.metadata())
            .finish()
    }
}
