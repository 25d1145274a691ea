//! Prompt construction for recipe generation.
//!
//! [`template`] holds the small `{{variable}}` engine; [`recipe`] renders the
//! instruction sent to the generative model.

#![warn(missing_docs, clippy::pedantic)]

pub mod recipe;
pub mod template;

pub use recipe::{RECIPE_COUNT, build_recipe_prompt, join_ingredients, recipe_template};
pub use template::{PromptTemplate, TemplateBuilder, TemplateError, TemplateResult};
