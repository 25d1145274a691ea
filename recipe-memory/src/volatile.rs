//! In-process recipe store.

use std::collections::HashMap;

use async_trait::async_trait;
use recipe_primitives::Recipe;
use tokio::sync::RwLock;

use crate::MemoryResult;
use crate::store::{Collection, RecipeStore};

/// Store that keeps collections in memory for the life of the process.
#[derive(Debug, Default)]
pub struct VolatileStore {
    collections: RwLock<HashMap<Collection, Vec<Recipe>>>,
}

impl VolatileStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recipes held in `collection`.
    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl RecipeStore for VolatileStore {
    async fn load(&self, collection: Collection) -> MemoryResult<Vec<Recipe>> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).cloned().unwrap_or_default())
    }

    async fn save(&self, collection: Collection, recipes: &[Recipe]) -> MemoryResult<()> {
        let mut guard = self.collections.write().await;
        guard.insert(collection, recipes.to_vec());
        Ok(())
    }

    async fn clear(&self, collection: Collection) -> MemoryResult<()> {
        self.collections.write().await.remove(&collection);
        Ok(())
    }
}
