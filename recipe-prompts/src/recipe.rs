//! The recipe generation prompt.

use std::collections::HashMap;

use recipe_primitives::DietaryPreference;

use crate::template::{PromptTemplate, TemplateResult};

/// Number of recipes requested per generation batch.
pub const RECIPE_COUNT: usize = 8;

const RECIPE_PROMPT: &str = r#"You are a cooking expert. Create {{count}} recipes using these ingredients: {{ingredients}}. {{requirements}}
Make recipes that are practical and easy to follow.

Respond with a JSON object in this exact format:
{
  "recipes": [
    {
      "title": "Recipe Name",
      "ingredients": ["2 cups flour", "1 cup sugar"],
      "instructions": ["Step 1", "Step 2"],
      "prepTime": "30",
      "cookTime": "20",
      "difficulty": "Easy",
      "nutrition": {
        "calories": "300",
        "protein": "20g",
        "carbs": "30g",
        "fat": "10g"
      }
    }
  ]
}

IMPORTANT:
- Return ONLY valid JSON
- All times should be numbers only (no text)
- Difficulty must be one of: Easy, Medium, Hard
- Each recipe must have all required fields"#;

/// Returns the template behind [`build_recipe_prompt`].
///
/// `ingredients` is required; `requirements` is optional and `count`
/// defaults to [`RECIPE_COUNT`].
///
/// # Errors
///
/// Propagates [`TemplateError`](crate::TemplateError) from template assembly.
pub fn recipe_template() -> TemplateResult<PromptTemplate> {
    PromptTemplate::builder(RECIPE_PROMPT)
        .with_variable("count", RECIPE_COUNT.to_string())
        .with_required_variable("ingredients")
        .build()
}

/// Joins selected ingredients the way the prompt expects them.
#[must_use]
pub fn join_ingredients<S: AsRef<str>>(ingredients: &[S]) -> String {
    ingredients
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the instruction sent to the model.
///
/// `ingredients` is embedded verbatim. The `Requirements:` clause only
/// appears when at least one preference is given. The output depends on
/// nothing but the arguments.
///
/// # Errors
///
/// Returns a [`TemplateError`](crate::TemplateError) if the template cannot be
/// rendered.
pub fn build_recipe_prompt(
    ingredients: &str,
    preferences: &[DietaryPreference],
) -> TemplateResult<String> {
    let mut vars = HashMap::new();
    vars.insert("ingredients".to_owned(), ingredients.to_owned());
    vars.insert("requirements".to_owned(), requirements_clause(preferences));

    let prompt = recipe_template()?.render_with(&vars)?;
    tracing::trace!(
        preferences = preferences.len(),
        length = prompt.len(),
        "rendered recipe prompt"
    );
    Ok(prompt)
}

fn requirements_clause(preferences: &[DietaryPreference]) -> String {
    if preferences.is_empty() {
        return String::new();
    }
    let labels = preferences
        .iter()
        .map(|pref| pref.label())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Requirements: Must be {labels}.")
}
