//! The normalized recipe record and its component value types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, RecipeId, Result};

/// Difficulty substituted when a recipe does not state one.
pub const DEFAULT_DIFFICULTY: &str = "Medium";
/// Placeholder used for nutrition facts the model left out.
pub const NUTRITION_PLACEHOLDER: &str = "N/A";
/// Title substituted when a recipe arrives without one.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";
/// Highest star rating a recipe can carry.
pub const MAX_RATING: u8 = 5;

/// Free-form difficulty label.
///
/// The model is asked for `Easy`, `Medium`, or `Hard`, but other labels are
/// kept verbatim rather than coerced. Only an absent or empty label is
/// replaced with [`DEFAULT_DIFFICULTY`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(String);

impl Difficulty {
    /// Wraps a difficulty label, defaulting empty input to `Medium`.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        if label.is_empty() {
            Self::default()
        } else {
            Self(label)
        }
    }

    /// The `Easy` label.
    #[must_use]
    pub fn easy() -> Self {
        Self("Easy".to_owned())
    }

    /// The `Medium` label.
    #[must_use]
    pub fn medium() -> Self {
        Self(DEFAULT_DIFFICULTY.to_owned())
    }

    /// The `Hard` label.
    #[must_use]
    pub fn hard() -> Self {
        Self("Hard".to_owned())
    }

    /// Returns the label as provided.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against another label.
    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        self.0.to_lowercase() == label.to_lowercase()
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::medium()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-serving nutrition facts, kept as display strings (`"20g"`, `"300"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrition {
    calories: String,
    protein: String,
    carbs: String,
    fat: String,
}

impl Default for Nutrition {
    fn default() -> Self {
        Self {
            calories: NUTRITION_PLACEHOLDER.to_owned(),
            protein: NUTRITION_PLACEHOLDER.to_owned(),
            carbs: NUTRITION_PLACEHOLDER.to_owned(),
            fat: NUTRITION_PLACEHOLDER.to_owned(),
        }
    }
}

impl Nutrition {
    /// Sets the calorie figure.
    #[must_use]
    pub fn with_calories(mut self, value: impl Into<String>) -> Self {
        self.calories = or_placeholder(value.into());
        self
    }

    /// Sets the protein figure.
    #[must_use]
    pub fn with_protein(mut self, value: impl Into<String>) -> Self {
        self.protein = or_placeholder(value.into());
        self
    }

    /// Sets the carbohydrate figure.
    #[must_use]
    pub fn with_carbs(mut self, value: impl Into<String>) -> Self {
        self.carbs = or_placeholder(value.into());
        self
    }

    /// Sets the fat figure.
    #[must_use]
    pub fn with_fat(mut self, value: impl Into<String>) -> Self {
        self.fat = or_placeholder(value.into());
        self
    }

    /// Calories per serving.
    #[must_use]
    pub fn calories(&self) -> &str {
        &self.calories
    }

    /// Protein per serving.
    #[must_use]
    pub fn protein(&self) -> &str {
        &self.protein
    }

    /// Carbohydrates per serving.
    #[must_use]
    pub fn carbs(&self) -> &str {
        &self.carbs
    }

    /// Fat per serving.
    #[must_use]
    pub fn fat(&self) -> &str {
        &self.fat
    }
}

fn or_placeholder(value: String) -> String {
    if value.is_empty() {
        NUTRITION_PLACEHOLDER.to_owned()
    } else {
        value
    }
}

/// Star rating between 0 (unrated) and [`MAX_RATING`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// An unrated recipe.
    pub const UNRATED: Self = Self(0);

    /// Validates and wraps a star count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRating`] when `value` exceeds [`MAX_RATING`].
    pub fn new(value: u8) -> Result<Self> {
        if value > MAX_RATING {
            return Err(Error::InvalidRating {
                value,
                max: MAX_RATING,
            });
        }
        Ok(Self(value))
    }

    /// Returns the star count.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{MAX_RATING}", self.0)
    }
}

/// A normalized recipe.
///
/// Serialized with camelCase keys so persisted collections keep the same
/// shape regardless of which front end wrote them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    id: RecipeId,
    title: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    prep_time: String,
    cook_time: String,
    total_time: String,
    difficulty: Difficulty,
    nutrition: Nutrition,
    #[serde(default)]
    rating: Rating,
    #[serde(default)]
    saved: bool,
}

impl Recipe {
    /// Starts building a recipe with a fresh identifier.
    #[must_use]
    pub fn builder(title: impl Into<String>) -> RecipeBuilder {
        RecipeBuilder {
            id: RecipeId::mint(),
            title: title.into(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            prep_time: String::new(),
            cook_time: String::new(),
            difficulty: Difficulty::default(),
            nutrition: Nutrition::default(),
        }
    }

    /// Returns the recipe identifier.
    #[must_use]
    pub const fn id(&self) -> RecipeId {
        self.id
    }

    /// Returns the display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the ingredient lines in display order.
    #[must_use]
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    /// Returns the instruction steps in order.
    #[must_use]
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    /// Preparation time in minutes, digits only.
    #[must_use]
    pub fn prep_time(&self) -> &str {
        &self.prep_time
    }

    /// Cooking time in minutes, digits only.
    #[must_use]
    pub fn cook_time(&self) -> &str {
        &self.cook_time
    }

    /// Total time formatted as `"<N> minutes"`.
    #[must_use]
    pub fn total_time(&self) -> &str {
        &self.total_time
    }

    /// Returns the difficulty label.
    #[must_use]
    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    /// Returns the nutrition facts.
    #[must_use]
    pub fn nutrition(&self) -> &Nutrition {
        &self.nutrition
    }

    /// Returns the user rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Whether the recipe is in the favorites collection.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        self.saved
    }

    /// Returns a copy carrying the supplied rating.
    #[must_use]
    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = rating;
        self
    }

    /// Returns a copy with the saved flag set to `saved`.
    #[must_use]
    pub fn with_saved(mut self, saved: bool) -> Self {
        self.saved = saved;
        self
    }

    /// Returns a copy whose ingredient lines are replaced.
    #[must_use]
    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }
}

/// Builder for [`Recipe`].
///
/// Times are reduced to their digits when set and the total is derived in
/// [`RecipeBuilder::build`], so a built recipe always satisfies
/// `total == prep + cook`.
#[derive(Debug)]
pub struct RecipeBuilder {
    id: RecipeId,
    title: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    prep_time: String,
    cook_time: String,
    difficulty: Difficulty,
    nutrition: Nutrition,
}

impl RecipeBuilder {
    /// Overrides the generated identifier.
    #[must_use]
    pub fn id(mut self, id: RecipeId) -> Self {
        self.id = id;
        self
    }

    /// Sets the ingredient lines.
    #[must_use]
    pub fn ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }

    /// Sets the instruction steps.
    #[must_use]
    pub fn instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    /// Sets the preparation time from free text such as `"10 min"`.
    #[must_use]
    pub fn prep_time(mut self, raw: impl AsRef<str>) -> Self {
        self.prep_time = digits_only(raw.as_ref());
        self
    }

    /// Sets the cooking time from free text such as `"5m"`.
    #[must_use]
    pub fn cook_time(mut self, raw: impl AsRef<str>) -> Self {
        self.cook_time = digits_only(raw.as_ref());
        self
    }

    /// Sets the difficulty label.
    #[must_use]
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the nutrition facts.
    #[must_use]
    pub fn nutrition(mut self, nutrition: Nutrition) -> Self {
        self.nutrition = nutrition;
        self
    }

    /// Finalises the recipe, filling defaults and deriving the total time.
    #[must_use]
    pub fn build(self) -> Recipe {
        let prep_time = or_zero(self.prep_time);
        let cook_time = or_zero(self.cook_time);
        let total = add_digits(&prep_time, &cook_time);
        let title = if self.title.trim().is_empty() {
            UNTITLED_RECIPE.to_owned()
        } else {
            self.title
        };

        Recipe {
            id: self.id,
            title,
            ingredients: self.ingredients,
            instructions: self.instructions,
            prep_time,
            cook_time,
            total_time: format!("{total} minutes"),
            difficulty: self.difficulty,
            nutrition: self.nutrition,
            rating: Rating::UNRATED,
            saved: false,
        }
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn or_zero(digits: String) -> String {
    if digits.is_empty() {
        "0".to_owned()
    } else {
        digits
    }
}

// Sums two ASCII digit strings of any length, without leading zeros.
fn add_digits(left: &str, right: &str) -> String {
    let left = left.trim_start_matches('0').as_bytes();
    let right = right.trim_start_matches('0').as_bytes();
    let mut sum = Vec::with_capacity(left.len().max(right.len()) + 1);
    let mut carry = 0;
    let (mut l, mut r) = (left.iter().rev(), right.iter().rev());
    loop {
        let (a, b) = (l.next(), r.next());
        if a.is_none() && b.is_none() {
            break;
        }
        let digit = a.map_or(0, |d| d - b'0') + b.map_or(0, |d| d - b'0') + carry;
        sum.push(b'0' + digit % 10);
        carry = digit / 10;
    }
    if carry > 0 {
        sum.push(b'0' + carry);
    }
    if sum.is_empty() {
        return "0".to_owned();
    }
    sum.iter().rev().map(|&d| char::from(d)).collect()
}
