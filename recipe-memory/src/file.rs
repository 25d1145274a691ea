//! File-backed recipe store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use recipe_primitives::Recipe;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::MemoryResult;
use crate::store::{Collection, RecipeStore};

/// Store writing one pretty-printed JSON array per collection to
/// `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors encountered while creating the directory.
    pub async fn open(dir: impl Into<PathBuf>) -> MemoryResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the root directory of the store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing `collection`.
    #[must_use]
    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.key()))
    }
}

#[async_trait]
impl RecipeStore for FileStore {
    async fn load(&self, collection: Collection) -> MemoryResult<Vec<Recipe>> {
        let path = self.path_for(collection);
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let recipes: Vec<Recipe> = serde_json::from_slice(&data)?;
        debug!(%collection, count = recipes.len(), "loaded collection");
        Ok(recipes)
    }

    async fn save(&self, collection: Collection, recipes: &[Recipe]) -> MemoryResult<()> {
        let data = serde_json::to_vec_pretty(recipes)?;
        let path = self.path_for(collection);
        let staging = path.with_extension("json.tmp");

        let _guard = self.write_lock.lock().await;
        fs::write(&staging, &data).await?;
        fs::rename(&staging, &path).await?;
        debug!(%collection, count = recipes.len(), "saved collection");
        Ok(())
    }

    async fn clear(&self, collection: Collection) -> MemoryResult<()> {
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(self.path_for(collection)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_primitives::Rating;
    use uuid::Uuid;

    use crate::MemoryError;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("recipe-store-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = temp_dir();
        let store = FileStore::open(&dir).await.unwrap();
        assert!(store.load(Collection::Favorites).await.unwrap().is_empty());
        store.clear(Collection::Favorites).await.unwrap();

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn save_and_load_across_instances() {
        let dir = temp_dir();
        let recipe = Recipe::builder("Shakshuka")
            .ingredients(vec!["4 eggs".to_owned(), "1 can tomatoes".to_owned()])
            .prep_time("5")
            .cook_time("20")
            .build()
            .with_rating(Rating::new(4).unwrap())
            .with_saved(true);

        {
            let store = FileStore::open(&dir).await.unwrap();
            store
                .save(Collection::Favorites, std::slice::from_ref(&recipe))
                .await
                .unwrap();
            assert!(store.path_for(Collection::Favorites).exists());
        }

        let reopened = FileStore::open(&dir).await.unwrap();
        let loaded = reopened.load(Collection::Favorites).await.unwrap();
        assert_eq!(loaded, [recipe]);
        assert!(reopened.load(Collection::Saved).await.unwrap().is_empty());

        reopened.clear(Collection::Favorites).await.unwrap();
        assert!(!reopened.path_for(Collection::Favorites).exists());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn writes_camel_case_keys() {
        let dir = temp_dir();
        let store = FileStore::open(&dir).await.unwrap();
        store
            .save(Collection::Saved, &[Recipe::builder("Soup").build()])
            .await
            .unwrap();

        let text = std::fs::read_to_string(store.path_for(Collection::Saved)).unwrap();
        assert!(text.contains("\"totalTime\""));
        assert!(text.contains("\"prepTime\""));
        assert!(store.path_for(Collection::Saved).ends_with("savedRecipes.json"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = temp_dir();
        let store = FileStore::open(&dir).await.unwrap();
        std::fs::write(store.path_for(Collection::Favorites), b"[{\"title\": 3").unwrap();

        let err = store.load(Collection::Favorites).await.unwrap_err();
        assert!(matches!(err, MemoryError::Serialization { .. }));

        let _ = std::fs::remove_dir_all(dir);
    }
}
