//! Dietary preference labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Dietary constraint a caller can attach to a generation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietaryPreference {
    /// No meat or fish.
    Vegetarian,
    /// No animal products.
    Vegan,
    /// Meat and fish welcome.
    #[serde(rename = "Non-Vegetarian")]
    NonVegetarian,
    /// No gluten-containing grains.
    #[serde(rename = "Gluten-Free")]
    GlutenFree,
}

impl DietaryPreference {
    /// All preferences in display order.
    pub const ALL: [Self; 4] = [
        Self::Vegetarian,
        Self::Vegan,
        Self::NonVegetarian,
        Self::GlutenFree,
    ];

    /// Human-facing label, as embedded in prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
            Self::NonVegetarian => "Non-Vegetarian",
            Self::GlutenFree => "Gluten-Free",
        }
    }

    /// Whether this preference excludes meat and fish.
    #[must_use]
    pub const fn is_plant_based(self) -> bool {
        matches!(self, Self::Vegetarian | Self::Vegan)
    }
}

impl fmt::Display for DietaryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DietaryPreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|pref| pref.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownPreference {
                label: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!(
            "gluten-free".parse::<DietaryPreference>().unwrap(),
            DietaryPreference::GlutenFree
        );
        assert_eq!(
            " Non-Vegetarian ".parse::<DietaryPreference>().unwrap(),
            DietaryPreference::NonVegetarian
        );
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "keto".parse::<DietaryPreference>().expect_err("unknown");
        assert!(matches!(err, Error::UnknownPreference { .. }));
    }

    #[test]
    fn display_matches_label() {
        for pref in DietaryPreference::ALL {
            assert_eq!(pref.to_string(), pref.label());
        }
    }
}
