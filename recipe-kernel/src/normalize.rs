//! Turns a raw model response into normalized [`Recipe`] records.
//!
//! The model is asked for bare JSON but regularly wraps it in markdown
//! fences or chatty prose. Extraction is best effort: fences are removed,
//! then everything from the first `{` to the last `}` is parsed. Prose that
//! itself contains braces outside the JSON object will defeat this.

use std::sync::LazyLock;

use recipe_primitives::{Difficulty, Nutrition, Recipe};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{NormalizeError, NormalizeResult};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*```[A-Za-z0-9_+\-]*\s*").expect("code fence pattern is valid")
});

/// Normalizes a full provider envelope into a recipe batch.
///
/// # Errors
///
/// See [`NormalizeError`] for the failure modes; each is logged with the
/// offending text before being returned.
pub fn normalize_response(envelope: &Value) -> NormalizeResult<Vec<Recipe>> {
    let text = extract_text(envelope)?;
    debug!(text, "raw model response");
    parse_recipes(text).inspect_err(|err| {
        error!(error = %err, text, "failed to process model response");
    })
}

/// Returns `candidates[0].content.parts[0].text`, trimmed.
///
/// # Errors
///
/// Returns [`NormalizeError::MalformedEnvelope`] when the path is missing,
/// not a string, or empty.
pub fn extract_text(envelope: &Value) -> NormalizeResult<&str> {
    envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::trim)
        .ok_or_else(|| {
            error!("response envelope has no candidate text");
            NormalizeError::MalformedEnvelope
        })
}

/// Strips code fences and slices out the outermost JSON object candidate.
///
/// The slice runs from the first `{` to the last `}`; when no `}` follows the
/// first `{`, it runs to the end of the text so the parser reports the
/// truncation.
///
/// # Errors
///
/// Returns [`NormalizeError::NoJsonFound`] when the text has no `{`.
pub fn extract_json_object(text: &str) -> NormalizeResult<String> {
    let cleaned = CODE_FENCE.replace_all(text.trim(), "");
    let start = cleaned.find('{').ok_or(NormalizeError::NoJsonFound)?;
    let end = match cleaned.rfind('}') {
        Some(end) if end > start => end + 1,
        _ => cleaned.len(),
    };
    Ok(cleaned[start..end].to_owned())
}

/// Parses model text into recipes.
///
/// # Errors
///
/// Returns [`NormalizeError::NoJsonFound`], [`NormalizeError::InvalidJson`],
/// or [`NormalizeError::InvalidSchema`].
pub fn parse_recipes(text: &str) -> NormalizeResult<Vec<Recipe>> {
    let json = extract_json_object(text)?;
    let parsed: Value = serde_json::from_str(&json)?;
    debug!(payload = %parsed, "parsed model JSON");

    let raw = parsed
        .get("recipes")
        .and_then(Value::as_array)
        .ok_or(NormalizeError::InvalidSchema)?;

    Ok(raw.iter().map(normalize_recipe).collect())
}

/// Maps one raw recipe element onto a [`Recipe`], filling every default.
///
/// Non-object input yields an all-defaults recipe.
#[must_use]
pub fn normalize_recipe(raw: &Value) -> Recipe {
    let text = |key: &str| raw.get(key).and_then(truthy_text);

    let nutrition_field = |key: &str| {
        raw.get("nutrition")
            .and_then(|nutrition| nutrition.get(key))
            .and_then(truthy_text)
            .unwrap_or_default()
    };
    let nutrition = Nutrition::default()
        .with_calories(nutrition_field("calories"))
        .with_protein(nutrition_field("protein"))
        .with_carbs(nutrition_field("carbs"))
        .with_fat(nutrition_field("fat"));

    Recipe::builder(text("title").unwrap_or_default())
        .ingredients(text_list(raw.get("ingredients")))
        .instructions(text_list(raw.get("instructions")))
        .prep_time(text("prepTime").unwrap_or_default())
        .cook_time(text("cookTime").unwrap_or_default())
        .difficulty(text("difficulty").map(Difficulty::new).unwrap_or_default())
        .nutrition(nutrition)
        .build()
}

/// Renders a scalar as display text, treating `null`, `false`, `0`, and `""`
/// as absent.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(single)) if !single.is_empty() => vec![single.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_primitives::{NUTRITION_PLACEHOLDER, Rating, UNTITLED_RECIPE};
    use serde_json::json;

    fn envelope(text: &str) -> Value {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    #[test]
    fn normalizes_fenced_response() {
        let text = "```json\n{\"recipes\":[{\"title\":\"T\",\"ingredients\":[\"1 cup rice\"],\"instructions\":[\"Cook\"],\"prepTime\":\"10 min\",\"cookTime\":\"5m\",\"difficulty\":\"Easy\",\"nutrition\":{\"calories\":\"100\"}}]}\n```";
        let recipes = normalize_response(&envelope(text)).unwrap();

        assert_eq!(recipes.len(), 1);
        let recipe = &recipes[0];
        assert_eq!(recipe.title(), "T");
        assert_eq!(recipe.ingredients(), ["1 cup rice"]);
        assert_eq!(recipe.instructions(), ["Cook"]);
        assert_eq!(recipe.prep_time(), "10");
        assert_eq!(recipe.cook_time(), "5");
        assert_eq!(recipe.total_time(), "15 minutes");
        assert_eq!(recipe.difficulty().as_str(), "Easy");
        assert_eq!(recipe.nutrition().calories(), "100");
        assert_eq!(recipe.nutrition().protein(), NUTRITION_PLACEHOLDER);
        assert_eq!(recipe.rating(), Rating::UNRATED);
        assert!(!recipe.is_saved());
    }

    #[test]
    fn tolerates_prose_around_json() {
        let text = "Sure! Here you go:\n{\"recipes\": [{\"title\": \"A\"}, {\"title\": \"B\"}]}\nEnjoy.";
        let recipes = parse_recipes(text).unwrap();
        let titles: Vec<_> = recipes.iter().map(Recipe::title).collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[test]
    fn assigns_distinct_ids_within_batch() {
        let recipes = parse_recipes(r#"{"recipes": [{}, {}, {}]}"#).unwrap();
        assert_ne!(recipes[0].id(), recipes[1].id());
        assert_ne!(recipes[1].id(), recipes[2].id());
        assert_ne!(recipes[0].id(), recipes[2].id());
    }

    #[test]
    fn missing_candidates_is_malformed_envelope() {
        let err = normalize_response(&json!({"promptFeedback": {}})).expect_err("no candidates");
        assert!(matches!(err, NormalizeError::MalformedEnvelope));

        let err = normalize_response(&envelope("")).expect_err("empty text");
        assert!(matches!(err, NormalizeError::MalformedEnvelope));
    }

    #[test]
    fn text_without_braces_is_no_json_found() {
        let err = normalize_response(&envelope("no json here")).expect_err("no braces");
        assert!(matches!(err, NormalizeError::NoJsonFound));
    }

    #[test]
    fn unterminated_object_is_invalid_json() {
        let err = normalize_response(&envelope("{invalid")).expect_err("bad json");
        assert!(matches!(err, NormalizeError::InvalidJson { .. }));
    }

    #[test]
    fn missing_recipes_array_is_invalid_schema() {
        let err = normalize_response(&envelope(r#"{"foo":[]}"#)).expect_err("schema");
        assert!(matches!(err, NormalizeError::InvalidSchema));

        let err = parse_recipes(r#"{"recipes": {"title": "x"}}"#).expect_err("object");
        assert!(matches!(err, NormalizeError::InvalidSchema));
    }

    #[test]
    fn empty_recipe_gets_every_default() {
        let recipe = normalize_recipe(&json!({}));
        assert_eq!(recipe.title(), UNTITLED_RECIPE);
        assert!(recipe.ingredients().is_empty());
        assert!(recipe.instructions().is_empty());
        assert_eq!(recipe.prep_time(), "0");
        assert_eq!(recipe.cook_time(), "0");
        assert_eq!(recipe.total_time(), "0 minutes");
        assert_eq!(recipe.difficulty().as_str(), "Medium");
        assert_eq!(recipe.nutrition().fat(), NUTRITION_PLACEHOLDER);

        let from_scalar = normalize_recipe(&json!("just text"));
        assert_eq!(from_scalar.total_time(), "0 minutes");
    }

    #[test]
    fn numeric_fields_are_stringified() {
        let recipe = normalize_recipe(&json!({
            "title": "Stew",
            "prepTime": 15,
            "cookTime": 45,
            "nutrition": {"calories": 320, "protein": "", "fat": null}
        }));
        assert_eq!(recipe.prep_time(), "15");
        assert_eq!(recipe.total_time(), "60 minutes");
        assert_eq!(recipe.nutrition().calories(), "320");
        assert_eq!(recipe.nutrition().protein(), NUTRITION_PLACEHOLDER);
        assert_eq!(recipe.nutrition().fat(), NUTRITION_PLACEHOLDER);
    }

    #[test]
    fn unknown_difficulty_passes_through() {
        let recipe = normalize_recipe(&json!({"difficulty": "Expert"}));
        assert_eq!(recipe.difficulty().as_str(), "Expert");

        let recipe = normalize_recipe(&json!({"difficulty": ""}));
        assert_eq!(recipe.difficulty().as_str(), "Medium");
    }

    #[test]
    fn list_order_is_preserved() {
        let recipe = normalize_recipe(&json!({
            "ingredients": ["b", "a", null, 3],
            "instructions": ["second", "first"]
        }));
        assert_eq!(recipe.ingredients(), ["b", "a", "3"]);
        assert_eq!(recipe.instructions(), ["second", "first"]);
    }

    #[test]
    fn fence_without_language_tag_is_removed() {
        let json = extract_json_object("```\n{\"recipes\": []}\n```").unwrap();
        assert_eq!(json, "{\"recipes\": []}");
    }
}
