//! Plan category.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown plan category: {0}")]
pub struct CategoryError(pub String);

/// The two kinds of plan sold by the storefront.
///
/// The category decides which catalog is shown and which intake form the
/// visitor fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Diet,
    Workout,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 2] = [Self::Diet, Self::Workout];

    /// Stable identifier used in forms, URLs and stored orders.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Diet => "diet",
            Self::Workout => "workout",
        }
    }

    /// Heading shown above the category's catalog.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Diet => "Diet Plans",
            Self::Workout => "Workout Plans",
        }
    }

    /// One-line pitch shown on the home screen.
    #[must_use]
    pub const fn tagline(&self) -> &'static str {
        match self {
            Self::Diet => "Personalized nutrition built around your goals and routine",
            Self::Workout => "Training programs matched to your experience and schedule",
        }
    }

    /// Whether this is the diet category (used by templates).
    #[must_use]
    pub const fn is_diet(&self) -> bool {
        matches!(self, Self::Diet)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diet" => Ok(Self::Diet),
            "workout" => Ok(Self::Workout),
            _ => Err(CategoryError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known() {
        assert_eq!("diet".parse::<Category>().unwrap(), Category::Diet);
        assert_eq!("workout".parse::<Category>().unwrap(), Category::Workout);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "yoga".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "unknown plan category: yoga");
    }

    #[test]
    fn test_serde_matches_as_str() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
