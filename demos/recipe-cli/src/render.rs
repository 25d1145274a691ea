use std::fmt::Write;
use std::num::NonZeroU32;

use recipe_forge::primitives::{Rating, Recipe};

pub(crate) fn recipe_block(
    position: usize,
    recipe: &Recipe,
    ingredients: &[String],
    servings: NonZeroU32,
) -> String {
    let mut out = String::new();
    let marker = if recipe.is_saved() { " [saved]" } else { "" };
    let _ = writeln!(
        out,
        "{position}. {}{marker}  [{}]",
        recipe.title(),
        recipe.id().short()
    );
    let _ = writeln!(
        out,
        "   {} | prep {} min, cook {} min | {}",
        recipe.total_time(),
        recipe.prep_time(),
        recipe.cook_time(),
        recipe.difficulty()
    );
    if recipe.rating() != Rating::UNRATED {
        let _ = writeln!(out, "   rating {}", recipe.rating());
    }

    let _ = writeln!(out, "   Ingredients (serves {servings}):");
    for item in ingredients {
        let _ = writeln!(out, "     - {item}");
    }
    let _ = writeln!(out, "   Instructions:");
    for (step, text) in recipe.instructions().iter().enumerate() {
        let _ = writeln!(out, "     {}. {text}", step + 1);
    }

    let nutrition = recipe.nutrition();
    let _ = write!(
        out,
        "   Nutrition: {} kcal, protein {}, carbs {}, fat {}",
        nutrition.calories(),
        nutrition.protein(),
        nutrition.carbs(),
        nutrition.fat()
    );
    out
}

pub(crate) fn favorite_line(recipe: &Recipe) -> String {
    format!(
        "{}  {}  ({}, {})  {}",
        recipe.id(),
        recipe.title(),
        recipe.total_time(),
        recipe.difficulty(),
        recipe.rating()
    )
}
