//! Ingredient and dietary selection state.

use serde::{Deserialize, Serialize};

use crate::{DietaryPreference, Error, Result};

/// Ingredients that rule out vegetarian and vegan preferences.
pub const NON_VEGETARIAN_INGREDIENTS: [&str; 9] = [
    "chicken", "beef", "pork", "fish", "shrimp", "lamb", "turkey", "bacon", "salmon",
];

/// Groups used to present quick-pick ingredients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientCategory {
    /// Meat, fish, legumes, eggs.
    Protein,
    /// Fresh produce.
    Vegetables,
    /// Grains and starches.
    Carbs,
    /// Milk products.
    Dairy,
    /// Condiments and everything else.
    Other,
}

impl IngredientCategory {
    /// All categories in display order.
    pub const ALL: [Self; 5] = [
        Self::Protein,
        Self::Vegetables,
        Self::Carbs,
        Self::Dairy,
        Self::Other,
    ];

    /// Quick-pick ingredients in this category.
    #[must_use]
    pub const fn ingredients(self) -> &'static [&'static str] {
        match self {
            Self::Protein => &[
                "Chicken", "Beef", "Pork", "Salmon", "Shrimp", "Tofu", "Lentils", "Beans", "Eggs",
            ],
            Self::Vegetables => &[
                "Tomatoes",
                "Onions",
                "Garlic",
                "Bell Peppers",
                "Carrots",
                "Broccoli",
                "Spinach",
                "Mushrooms",
                "Avocado",
                "Corn",
                "Cucumber",
                "Zucchini",
            ],
            Self::Carbs => &["Rice", "Pasta", "Potatoes", "Quinoa", "Bread", "Oats"],
            Self::Dairy => &["Cheese", "Milk", "Butter", "Yogurt", "Cream"],
            Self::Other => &[
                "Lemon",
                "Lime",
                "Olive Oil",
                "Soy Sauce",
                "Honey",
                "Maple Syrup",
                "Nuts",
            ],
        }
    }

    /// Finds the category listing `ingredient`, ignoring case.
    #[must_use]
    pub fn of(ingredient: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| {
            category
                .ingredients()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ingredient.trim()))
        })
    }
}

/// Every quick-pick ingredient across all categories.
pub fn catalog() -> impl Iterator<Item = &'static str> {
    IngredientCategory::ALL
        .into_iter()
        .flat_map(|category| category.ingredients().iter().copied())
}

/// Returns true when `ingredient` names meat or fish.
#[must_use]
pub fn is_non_vegetarian(ingredient: &str) -> bool {
    let lowered = ingredient.trim().to_lowercase();
    NON_VEGETARIAN_INGREDIENTS.contains(&lowered.as_str())
}

/// Ordered, duplicate-free list of chosen ingredients.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientSelection {
    items: Vec<String>,
}

impl IngredientSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ingredient. Returns `false` when the trimmed value is blank or
    /// already selected.
    pub fn add(&mut self, ingredient: impl AsRef<str>) -> bool {
        let trimmed = ingredient.as_ref().trim();
        if trimmed.is_empty() || self.items.iter().any(|item| item == trimmed) {
            return false;
        }
        self.items.push(trimmed.to_owned());
        true
    }

    /// Adds an ingredient unless it is meat or fish while a plant-based
    /// preference is selected. Returns `false` like [`Self::add`] for blank or
    /// duplicate values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DietaryConflict`] naming the blocking preference; the
    /// selection is unchanged.
    pub fn add_checked(
        &mut self,
        ingredient: impl AsRef<str>,
        diet: &DietarySelection,
    ) -> Result<bool> {
        let ingredient = ingredient.as_ref();
        if is_non_vegetarian(ingredient) {
            if let Some(blocking) = diet.preferences().iter().find(|p| p.is_plant_based()) {
                return Err(Error::DietaryConflict {
                    preference: blocking.label().to_owned(),
                    ingredients: vec![ingredient.trim().to_owned()],
                });
            }
        }
        Ok(self.add(ingredient))
    }

    /// Removes an ingredient, returning whether it was present.
    pub fn remove(&mut self, ingredient: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item != ingredient.trim());
        before != self.items.len()
    }

    /// Selected ingredients in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Comma-joined form used in prompts.
    #[must_use]
    pub fn joined(&self) -> String {
        self.items.join(", ")
    }

    /// Selected ingredients that are meat or fish.
    #[must_use]
    pub fn non_vegetarian(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| is_non_vegetarian(item))
            .cloned()
            .collect()
    }

    /// Whether any selected ingredient is meat or fish.
    #[must_use]
    pub fn contains_non_vegetarian(&self) -> bool {
        self.items.iter().any(|item| is_non_vegetarian(item))
    }
}

impl<S: AsRef<str>> FromIterator<S> for IngredientSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for item in iter {
            selection.add(item);
        }
        selection
    }
}

/// Ordered set of dietary preferences with the toggling rules of the picker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DietarySelection {
    preferences: Vec<DietaryPreference>,
}

impl DietarySelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles `preference` given the current ingredient choice.
    ///
    /// Choosing `Non-Vegetarian` drops `Vegetarian` and `Vegan`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DietaryConflict`] when enabling a plant-based
    /// preference while meat or fish is selected; the selection is unchanged.
    pub fn toggle(
        &mut self,
        preference: DietaryPreference,
        ingredients: &IngredientSelection,
    ) -> Result<()> {
        if preference.is_plant_based() && ingredients.contains_non_vegetarian() {
            return Err(Error::DietaryConflict {
                preference: preference.label().to_owned(),
                ingredients: ingredients.non_vegetarian(),
            });
        }

        if preference == DietaryPreference::NonVegetarian
            && self.preferences.iter().any(|p| p.is_plant_based())
        {
            self.preferences.retain(|p| !p.is_plant_based());
            self.preferences.push(preference);
            return Ok(());
        }

        if let Some(pos) = self.preferences.iter().position(|p| *p == preference) {
            self.preferences.remove(pos);
        } else {
            self.preferences.push(preference);
        }
        Ok(())
    }

    /// Selected preferences in selection order.
    #[must_use]
    pub fn preferences(&self) -> &[DietaryPreference] {
        &self.preferences
    }

    /// Whether `preference` is selected.
    #[must_use]
    pub fn contains(&self, preference: DietaryPreference) -> bool {
        self.preferences.contains(&preference)
    }
}
