//! Cooking-time and difficulty filters over a recipe batch.

use std::fmt;
use std::str::FromStr;

use recipe_primitives::Recipe;
use thiserror::Error;

/// Raised when a filter value is not one of the recognised options.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} filter `{value}`")]
pub struct UnknownFilter {
    kind: &'static str,
    value: String,
}

impl UnknownFilter {
    /// The rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Total-time buckets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CookingTime {
    /// No constraint.
    #[default]
    All,
    /// 30 minutes or less.
    Quick,
    /// More than 30 and at most 60 minutes.
    Medium,
    /// More than 60 minutes.
    Slow,
}

impl CookingTime {
    /// Whether a recipe taking `minutes` belongs in this bucket.
    #[must_use]
    pub const fn admits(self, minutes: u64) -> bool {
        match self {
            Self::All => true,
            Self::Quick => minutes <= 30,
            Self::Medium => minutes > 30 && minutes <= 60,
            Self::Slow => minutes > 60,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Quick => "quick",
            Self::Medium => "medium",
            Self::Slow => "slow",
        }
    }
}

impl fmt::Display for CookingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookingTime {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "quick" => Ok(Self::Quick),
            "medium" => Ok(Self::Medium),
            "slow" => Ok(Self::Slow),
            _ => Err(UnknownFilter {
                kind: "cooking time",
                value: s.to_owned(),
            }),
        }
    }
}

/// Difficulty options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DifficultyFilter {
    /// No constraint.
    #[default]
    All,
    /// `Easy` recipes only.
    Easy,
    /// `Medium` recipes only.
    Medium,
    /// `Hard` recipes only.
    Hard,
}

impl DifficultyFilter {
    const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(UnknownFilter {
                kind: "difficulty",
                value: s.to_owned(),
            }),
        }
    }
}

/// Combined filter; a recipe must pass both predicates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Total-time bucket.
    pub cooking_time: CookingTime,
    /// Difficulty constraint.
    pub difficulty: DifficultyFilter,
}

impl RecipeFilter {
    /// Creates a filter from both criteria.
    #[must_use]
    pub const fn new(cooking_time: CookingTime, difficulty: DifficultyFilter) -> Self {
        Self {
            cooking_time,
            difficulty,
        }
    }

    /// Whether `recipe` passes.
    ///
    /// A `total_time` with no leading integer is never excluded by time.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let time_ok = leading_minutes(recipe.total_time())
            .is_none_or(|minutes| self.cooking_time.admits(minutes));
        let difficulty_ok = match self.difficulty {
            DifficultyFilter::All => true,
            other => recipe.difficulty().matches(other.as_str()),
        };
        time_ok && difficulty_ok
    }

    /// The passing recipes, in input order.
    #[must_use]
    pub fn apply(&self, recipes: &[Recipe]) -> Vec<Recipe> {
        recipes
            .iter()
            .filter(|recipe| self.matches(recipe))
            .cloned()
            .collect()
    }
}

/// Leading run of ASCII digits, as minutes.
fn leading_minutes(total_time: &str) -> Option<u64> {
    let trimmed = total_time.trim_start();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_primitives::Difficulty;

    fn recipe(title: &str, prep: &str, cook: &str, difficulty: &str) -> Recipe {
        Recipe::builder(title)
            .prep_time(prep)
            .cook_time(cook)
            .difficulty(Difficulty::new(difficulty))
            .build()
    }

    fn batch() -> Vec<Recipe> {
        vec![
            recipe("thirty", "10", "20", "Easy"),
            recipe("thirty-one", "11", "20", "medium"),
            recipe("sixty", "20", "40", "Hard"),
            recipe("sixty-one", "21", "40", "EASY"),
        ]
    }

    fn titles(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(Recipe::title).collect()
    }

    #[test]
    fn quick_keeps_thirty_and_under() {
        let filter = RecipeFilter::new(CookingTime::Quick, DifficultyFilter::All);
        assert_eq!(titles(&filter.apply(&batch())), ["thirty"]);
    }

    #[test]
    fn medium_is_exclusive_of_thirty_inclusive_of_sixty() {
        let filter = RecipeFilter::new(CookingTime::Medium, DifficultyFilter::All);
        assert_eq!(titles(&filter.apply(&batch())), ["thirty-one", "sixty"]);
    }

    #[test]
    fn slow_keeps_over_sixty() {
        let filter = RecipeFilter::new(CookingTime::Slow, DifficultyFilter::All);
        assert_eq!(titles(&filter.apply(&batch())), ["sixty-one"]);
    }

    #[test]
    fn difficulty_is_case_insensitive() {
        let filter = RecipeFilter::new(CookingTime::All, DifficultyFilter::Easy);
        assert_eq!(titles(&filter.apply(&batch())), ["thirty", "sixty-one"]);

        let filter = RecipeFilter::new(CookingTime::All, DifficultyFilter::Medium);
        assert_eq!(titles(&filter.apply(&batch())), ["thirty-one"]);
    }

    #[test]
    fn both_criteria_must_hold() {
        let filter = RecipeFilter::new(CookingTime::Slow, DifficultyFilter::Hard);
        assert!(filter.apply(&batch()).is_empty());
    }

    #[test]
    fn default_filter_keeps_everything_in_order() {
        let all = RecipeFilter::default().apply(&batch());
        assert_eq!(titles(&all), ["thirty", "thirty-one", "sixty", "sixty-one"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let filter = RecipeFilter::new(CookingTime::Medium, DifficultyFilter::All);
        let once = filter.apply(&batch());
        let twice = filter.apply(&once);
        assert_eq!(titles(&once), titles(&twice));
    }

    #[test]
    fn parses_options_case_insensitively() {
        assert_eq!("QUICK".parse::<CookingTime>().unwrap(), CookingTime::Quick);
        assert_eq!(" slow ".parse::<CookingTime>().unwrap(), CookingTime::Slow);
        assert_eq!("Hard".parse::<DifficultyFilter>().unwrap(), DifficultyFilter::Hard);
        assert_eq!("all".parse::<DifficultyFilter>().unwrap(), DifficultyFilter::All);

        let err = "forever".parse::<CookingTime>().unwrap_err();
        assert_eq!(err.value(), "forever");
        assert!(err.to_string().contains("cooking time"));
    }

    #[test]
    fn unreadable_total_time_is_never_excluded() {
        let stored: Recipe = serde_json::from_value(serde_json::json!({
            "id": "8f7c2a0e-4b1d-4c3e-9a5f-1e2d3c4b5a69",
            "title": "Mystery",
            "ingredients": [],
            "instructions": [],
            "prepTime": "0",
            "cookTime": "0",
            "totalTime": "a while",
            "difficulty": "Easy",
            "nutrition": {"calories": "N/A", "protein": "N/A", "carbs": "N/A", "fat": "N/A"}
        }))
        .unwrap();

        for time in [CookingTime::Quick, CookingTime::Medium, CookingTime::Slow] {
            assert!(RecipeFilter::new(time, DifficultyFilter::All).matches(&stored));
        }
        assert!(!RecipeFilter::new(CookingTime::All, DifficultyFilter::Hard).matches(&stored));
    }

    #[test]
    fn leading_minutes_reads_prefix() {
        assert_eq!(leading_minutes("45 minutes"), Some(45));
        assert_eq!(leading_minutes("90"), Some(90));
        assert_eq!(leading_minutes("about an hour"), None);
        assert_eq!(leading_minutes(""), None);
    }
}
