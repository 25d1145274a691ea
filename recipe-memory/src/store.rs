//! Storage port for persisted recipe collections.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use recipe_primitives::Recipe;
use serde::{Deserialize, Serialize};

use crate::MemoryResult;

/// Named recipe lists kept between sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    /// Recipes the user saved or rated.
    Favorites,
    /// The most recently generated batch.
    Saved,
}

impl Collection {
    /// Every collection.
    pub const ALL: [Self; 2] = [Self::Favorites, Self::Saved];

    /// Stable storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Favorites => "favoriteRecipes",
            Self::Saved => "savedRecipes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whole-collection load/save backend.
///
/// Collections are small, so implementations read and replace them
/// wholesale. A collection that was never written loads as empty.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Loads every recipe in `collection`, in stored order.
    async fn load(&self, collection: Collection) -> MemoryResult<Vec<Recipe>>;

    /// Replaces the contents of `collection`.
    async fn save(&self, collection: Collection, recipes: &[Recipe]) -> MemoryResult<()>;

    /// Removes `collection` entirely.
    async fn clear(&self, collection: Collection) -> MemoryResult<()>;
}

#[async_trait]
impl<T> RecipeStore for Arc<T>
where
    T: RecipeStore + ?Sized,
{
    async fn load(&self, collection: Collection) -> MemoryResult<Vec<Recipe>> {
        (**self).load(collection).await
    }

    async fn save(&self, collection: Collection, recipes: &[Recipe]) -> MemoryResult<()> {
        (**self).save(collection, recipes).await
    }

    async fn clear(&self, collection: Collection) -> MemoryResult<()> {
        (**self).clear(collection).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable() {
        assert_eq!(Collection::Favorites.key(), "favoriteRecipes");
        assert_eq!(Collection::Saved.key(), "savedRecipes");
        assert_eq!(Collection::Saved.to_string(), "savedRecipes");
    }
}
