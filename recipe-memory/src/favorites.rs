//! Favorites, ratings and the last generated batch.

use recipe_primitives::{Rating, Recipe, RecipeId};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::store::{Collection, RecipeStore};
use crate::{MemoryError, MemoryResult};

/// Recipe bookkeeping on top of a [`RecipeStore`].
///
/// Every mutation is a load-modify-save of one collection, serialized
/// through an internal lock so concurrent callers do not lose updates.
#[derive(Debug)]
pub struct Favorites<S> {
    store: S,
    lock: Mutex<()>,
}

impl<S> Favorites<S>
where
    S: RecipeStore,
{
    /// Wraps `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Favorites in insertion order.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list(&self) -> MemoryResult<Vec<Recipe>> {
        self.store.load(Collection::Favorites).await
    }

    /// Saves `recipe` if it is unsaved, or unsaves it otherwise.
    ///
    /// The decision follows `recipe.is_saved()`. The returned copy carries
    /// the flipped flag.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn toggle_save(&self, recipe: &Recipe) -> MemoryResult<Recipe> {
        let _guard = self.lock.lock().await;
        let mut favorites = self.store.load(Collection::Favorites).await?;

        let saved = if recipe.is_saved() {
            favorites.retain(|fav| fav.id() != recipe.id());
            false
        } else {
            if !favorites.iter().any(|fav| fav.id() == recipe.id()) {
                favorites.push(recipe.clone().with_saved(true));
            }
            true
        };

        self.store.save(Collection::Favorites, &favorites).await?;
        info!(recipe = %recipe.id(), saved, "toggled favorite");
        Ok(recipe.clone().with_saved(saved))
    }

    /// Rates `recipe`, saving it first if needed.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn rate(&self, recipe: &Recipe, rating: Rating) -> MemoryResult<Recipe> {
        let _guard = self.lock.lock().await;
        let mut favorites = self.store.load(Collection::Favorites).await?;

        let mut found = false;
        for fav in &mut favorites {
            if fav.id() == recipe.id() {
                *fav = fav.clone().with_rating(rating);
                found = true;
            }
        }
        if !found {
            favorites.push(recipe.clone().with_rating(rating).with_saved(true));
        }

        self.store.save(Collection::Favorites, &favorites).await?;
        info!(recipe = %recipe.id(), %rating, "rated recipe");
        Ok(recipe.clone().with_rating(rating).with_saved(true))
    }

    /// Drops the favorite with `id`. Returns whether one was removed.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn remove(&self, id: RecipeId) -> MemoryResult<bool> {
        let _guard = self.lock.lock().await;
        let mut favorites = self.store.load(Collection::Favorites).await?;
        let before = favorites.len();
        favorites.retain(|fav| fav.id() != id);
        let removed = favorites.len() != before;
        if removed {
            self.store.save(Collection::Favorites, &favorites).await?;
        }
        debug!(recipe = %id, removed, "remove favorite");
        Ok(removed)
    }

    /// Overlays stored `saved`/`rating` state onto a fresh batch, by id.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn hydrate(&self, batch: Vec<Recipe>) -> MemoryResult<Vec<Recipe>> {
        let favorites = self.list().await?;
        Ok(batch
            .into_iter()
            .map(|recipe| {
                match favorites.iter().find(|fav| fav.id() == recipe.id()) {
                    Some(fav) => recipe.with_saved(true).with_rating(fav.rating()),
                    None => recipe.with_saved(false).with_rating(Rating::UNRATED),
                }
            })
            .collect())
    }

    /// Replaces the remembered batch.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn remember_batch(&self, batch: &[Recipe]) -> MemoryResult<()> {
        self.store.save(Collection::Saved, batch).await
    }

    /// The remembered batch, hydrated with favorite state.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn last_batch(&self) -> MemoryResult<Vec<Recipe>> {
        let batch = self.store.load(Collection::Saved).await?;
        self.hydrate(batch).await
    }

    /// The recipe at zero-based `position` in the remembered batch.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] when the batch is shorter.
    pub async fn batch_entry(&self, position: usize) -> MemoryResult<Recipe> {
        let mut batch = self.last_batch().await?;
        let len = batch.len();
        if position >= len {
            return Err(MemoryError::OutOfRange { position, len });
        }
        Ok(batch.swap_remove(position))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::VolatileStore;

    fn recipe(title: &str) -> Recipe {
        Recipe::builder(title).prep_time("5").cook_time("10").build()
    }

    fn stars(n: u8) -> Rating {
        Rating::new(n).unwrap()
    }

    #[tokio::test]
    async fn toggle_save_adds_then_removes() {
        let favorites = Favorites::new(VolatileStore::new());
        let pasta = recipe("Pasta");

        let saved = favorites.toggle_save(&pasta).await.unwrap();
        assert!(saved.is_saved());
        let listed = favorites.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].is_saved());

        let unsaved = favorites.toggle_save(&saved).await.unwrap();
        assert!(!unsaved.is_saved());
        assert!(favorites.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rating_an_unsaved_recipe_saves_it() {
        let favorites = Favorites::new(VolatileStore::new());
        let curry = recipe("Curry");

        let rated = favorites.rate(&curry, stars(4)).await.unwrap();
        assert!(rated.is_saved());
        assert_eq!(rated.rating(), stars(4));

        let rerated = favorites.rate(&rated, stars(2)).await.unwrap();
        assert_eq!(rerated.rating(), stars(2));

        let listed = favorites.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].rating(), stars(2));
    }

    #[tokio::test]
    async fn remove_by_id() {
        let favorites = Favorites::new(VolatileStore::new());
        let keep = favorites.toggle_save(&recipe("Keep")).await.unwrap();
        let drop = favorites.toggle_save(&recipe("Drop")).await.unwrap();

        assert!(favorites.remove(drop.id()).await.unwrap());
        assert!(!favorites.remove(drop.id()).await.unwrap());

        let listed = favorites.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), keep.id());
    }

    #[tokio::test]
    async fn hydrate_overlays_stored_state() {
        let favorites = Favorites::new(VolatileStore::new());
        let tacos = recipe("Tacos");
        let salad = recipe("Salad");
        favorites.rate(&tacos, stars(5)).await.unwrap();

        let hydrated = favorites
            .hydrate(vec![tacos.clone(), salad.clone()])
            .await
            .unwrap();
        assert!(hydrated[0].is_saved());
        assert_eq!(hydrated[0].rating(), stars(5));
        assert!(!hydrated[1].is_saved());
        assert_eq!(hydrated[1].rating(), Rating::UNRATED);
    }

    #[tokio::test]
    async fn remembered_batch_round_trips_with_favorite_state() {
        let favorites = Favorites::new(Arc::new(VolatileStore::new()));
        let batch = vec![recipe("One"), recipe("Two")];
        favorites.remember_batch(&batch).await.unwrap();
        favorites.toggle_save(&batch[1]).await.unwrap();

        let last = favorites.last_batch().await.unwrap();
        assert_eq!(last.len(), 2);
        assert!(!last[0].is_saved());
        assert!(last[1].is_saved());

        let second = favorites.batch_entry(1).await.unwrap();
        assert_eq!(second.title(), "Two");

        let err = favorites.batch_entry(2).await.unwrap_err();
        assert!(matches!(err, MemoryError::OutOfRange { position: 2, len: 2 }));
    }
}
