//! Validated payload types shared by the kitchen languages.

use hfm_engine::ConstructionError;
use hfm_types::TryNew;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest accepted ingredient name, in characters.
pub const MAX_INGREDIENT_LEN: usize = 32;

/// A named ingredient: a sandwich component or a pizza topping.
///
/// Names are trimmed, non-empty, at most [`MAX_INGREDIENT_LEN`]
/// characters, and made of letters, spaces and hyphens.
///
/// # Example
///
/// ```
/// use hfm_kitchen::Ingredient;
/// use hfm_types::TryNew;
///
/// let cheese = Ingredient::try_new("  Cheese ".to_string())?;
/// assert_eq!(cheese.as_str(), "Cheese");
/// assert!(Ingredient::try_new(String::new()).is_err());
/// # Ok::<(), hfm_engine::ConstructionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ingredient(String);

impl Ingredient {
    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryNew for Ingredient {
    type Error = ConstructionError;
    type Args = String;

    fn try_new(name: String) -> Result<Self, ConstructionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConstructionError::Empty { field: "ingredient" });
        }
        if name.chars().count() > MAX_INGREDIENT_LEN {
            return Err(ConstructionError::invalid(
                "ingredient",
                format!("longer than {MAX_INGREDIENT_LEN} characters"),
            ));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_alphabetic() || *c == ' ' || *c == '-'))
        {
            return Err(ConstructionError::invalid(
                "ingredient",
                format!("unexpected character '{bad}'"),
            ));
        }
        Ok(Self(name.to_string()))
    }
}

impl FromStr for Ingredient {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s.to_string())
    }
}

impl TryFrom<String> for Ingredient {
    type Error = ConstructionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Ingredient> for String {
    fn from(value: Ingredient) -> Self {
        value.0
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses every name, failing on the first invalid one.
///
/// # Errors
///
/// [`ConstructionError::Empty`] with `field` for an empty list, or the
/// error of the first invalid name.
pub fn ingredients<S: AsRef<str>>(
    field: &'static str,
    names: &[S],
) -> Result<Vec<Ingredient>, ConstructionError> {
    if names.is_empty() {
        return Err(ConstructionError::Empty { field });
    }
    names.iter().map(|name| name.as_ref().parse()).collect()
}

/// Pizza size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PizzaSize {
    Small,
    Medium,
    Large,
}

impl PizzaSize {
    /// All sizes, smallest first.
    pub const ALL: [PizzaSize; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Diameter in centimetres.
    #[must_use]
    pub fn diameter_cm(self) -> u32 {
        match self {
            Self::Small => 25,
            Self::Medium => 30,
            Self::Large => 36,
        }
    }
}

impl fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        };
        f.write_str(name)
    }
}

impl FromStr for PizzaSize {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" | "s" => Ok(Self::Small),
            "medium" | "m" => Ok(Self::Medium),
            "large" | "l" => Ok(Self::Large),
            other => Err(ConstructionError::invalid(
                "size",
                format!("unknown pizza size '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hfm_types::ErrorCode;

    #[test]
    fn ingredient_trims_and_keeps_case() {
        let salt: Ingredient = " Sea Salt ".parse().unwrap();
        assert_eq!(salt.to_string(), "Sea Salt");
    }

    #[test]
    fn ingredient_rejects_bad_names() {
        assert_eq!(
            Ingredient::try_new("   ".into()).unwrap_err().code(),
            "CONSTRUCTION_EMPTY"
        );
        assert_eq!(
            "Cheese!".parse::<Ingredient>().unwrap_err().code(),
            "CONSTRUCTION_INVALID"
        );
        let long = "a".repeat(MAX_INGREDIENT_LEN + 1);
        assert!(Ingredient::try_new(long).is_err());
    }

    #[test]
    fn ingredient_list_must_not_be_empty() {
        let none: [&str; 0] = [];
        assert_eq!(
            ingredients("components", &none).unwrap_err(),
            ConstructionError::Empty { field: "components" }
        );
        let parsed = ingredients("components", &["Cheese", "Salt"]).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn ingredient_serde_validates() {
        let ok: Ingredient = serde_json::from_str("\"Basil\"").unwrap();
        assert_eq!(ok.as_str(), "Basil");
        assert!(serde_json::from_str::<Ingredient>("\"\"").is_err());
    }

    #[test]
    fn pizza_size_parse() {
        assert_eq!("L".parse::<PizzaSize>().unwrap(), PizzaSize::Large);
        assert!("huge".parse::<PizzaSize>().is_err());
        assert_eq!(PizzaSize::Medium.diameter_cm(), 30);
    }
}
