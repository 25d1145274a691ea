//! Recipe identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Locally minted identity of a recipe.
///
/// The generation API never supplies ids. Every normalized recipe gets a fresh
/// v4 UUID, so ids are distinct within a batch and across batches, and a saved
/// recipe keeps the id it was generated with.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Mints an id for a newly generated recipe.
    #[must_use]
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to tell a handful of favorites apart.
    #[must_use]
    pub fn short(self) -> String {
        let mut buf = Uuid::encode_buffer();
        self.0.simple().encode_lower(&mut buf)[..8].to_owned()
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// Accepts the hyphenated or simple UUID form, ignoring surrounding
/// whitespace.
impl FromStr for RecipeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn parses_what_it_prints() {
        let id = RecipeId::mint();
        assert_eq!(id.to_string().parse::<RecipeId>().unwrap(), id);
        assert_eq!(format!(" {id}\n").parse::<RecipeId>().unwrap(), id);
    }

    #[test]
    fn accepts_simple_form() {
        let id: RecipeId = "67e5504410b1426f9247bb680e5fe0c8".parse().unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(id.short(), "67e55044");
    }

    #[test]
    fn rejects_garbage() {
        let err = "not-a-uuid".parse::<RecipeId>().unwrap_err();
        assert!(matches!(err, Error::InvalidRecipeId { .. }));
    }

    #[test]
    fn minted_ids_are_unique_per_batch() {
        let ids: HashSet<_> = (0..64).map(|_| RecipeId::mint()).collect();
        assert_eq!(ids.len(), 64);
    }
}
