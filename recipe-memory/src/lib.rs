//! Recipe persistence for recipe-forge.
//!
//! Collections are loaded and replaced wholesale through the [`RecipeStore`]
//! port. [`VolatileStore`] keeps them in process, [`FileStore`] writes one
//! JSON file per collection, and [`Favorites`] layers save/rate bookkeeping
//! on top of either.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod favorites;
pub mod file;
pub mod store;
pub mod volatile;

pub use error::{MemoryError, MemoryResult};
pub use favorites::Favorites;
pub use file::FileStore;
pub use store::{Collection, RecipeStore};
pub use volatile::VolatileStore;
