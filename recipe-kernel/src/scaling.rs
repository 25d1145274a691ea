//! Serving-size scaling of ingredient quantities.

use std::num::NonZeroU32;
use std::sync::LazyLock;

use regex::Regex;

/// Servings a generated recipe is assumed to feed.
pub const DEFAULT_SERVINGS: NonZeroU32 = NonZeroU32::new(4).expect("4 is non-zero");

static LEADING_QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([0-9./]+)\s+(.+)").expect("quantity pattern is valid"));

/// Rescales ingredient lines from a baseline serving count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServingScaler {
    original: NonZeroU32,
}

impl ServingScaler {
    /// Creates a scaler for recipes written for `original` servings.
    #[must_use]
    pub const fn new(original: NonZeroU32) -> Self {
        Self { original }
    }

    /// Baseline serving count.
    #[must_use]
    pub const fn original(&self) -> NonZeroU32 {
        self.original
    }

    /// Scales every line to `target` servings.
    ///
    /// Lines without a leading numeric quantity are returned unchanged.
    #[must_use]
    pub fn scale<S: AsRef<str>>(&self, ingredients: &[S], target: NonZeroU32) -> Vec<String> {
        ingredients
            .iter()
            .map(|line| self.scale_line(line.as_ref(), target))
            .collect()
    }

    /// Scales a single ingredient line.
    #[must_use]
    pub fn scale_line(&self, line: &str, target: NonZeroU32) -> String {
        let Some(captures) = LEADING_QUANTITY.captures(line) else {
            return line.to_owned();
        };
        let Some(quantity) = parse_quantity(&captures[1]) else {
            return line.to_owned();
        };

        let scaled = quantity * f64::from(target.get()) / f64::from(self.original.get());
        format!("{} {}", format_quantity(scaled), &captures[2])
    }
}

impl Default for ServingScaler {
    fn default() -> Self {
        Self::new(DEFAULT_SERVINGS)
    }
}

/// Scales `ingredients` from `original` to `target` servings.
#[must_use]
pub fn scale_ingredients<S: AsRef<str>>(
    ingredients: &[S],
    target: NonZeroU32,
    original: NonZeroU32,
) -> Vec<String> {
    ServingScaler::new(original).scale(ingredients, target)
}

/// Parses `3`, `1.5`, `.5` or `1/2`. Anything else, including a zero
/// denominator, is rejected.
fn parse_quantity(token: &str) -> Option<f64> {
    let value = match token.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;
            if denominator == 0.0 {
                return None;
            }
            numerator / denominator
        }
        None => token.parse().ok()?,
    };
    value.is_finite().then_some(value)
}

/// One decimal place, half away from zero, trailing `.0` dropped.
fn format_quantity(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    let mut text = format!("{rounded:.1}");
    if text.ends_with(".0") {
        text.truncate(text.len() - 2);
    }
    text
}
