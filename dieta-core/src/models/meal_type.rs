use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four meal slots of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// All slots in display order.
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    /// Storage key of the slot inside a daily plan.
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Localized slot name. Anything other than English falls back to Italian.
    pub fn label(&self, language: &str) -> &'static str {
        let english = language.to_lowercase().starts_with("en");
        match (self, english) {
            (MealType::Breakfast, true) => "Breakfast",
            (MealType::Lunch, true) => "Lunch",
            (MealType::Dinner, true) => "Dinner",
            (MealType::Snack, true) => "Snack",
            (MealType::Breakfast, false) => "Colazione",
            (MealType::Lunch, false) => "Pranzo",
            (MealType::Dinner, false) => "Cena",
            (MealType::Snack, false) => "Spuntino",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the storage key or either localized label, case-insensitively.
impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MealType::ALL
            .into_iter()
            .find(|m| {
                wanted == m.as_str()
                    || wanted == m.label("it").to_lowercase()
                    || wanted == m.label("en").to_lowercase()
            })
            .ok_or_else(|| {
                format!(
                    "Unknown meal '{}'. Use breakfast, lunch, dinner or snack",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_from_str() {
        assert_eq!(
            MealType::from_str("breakfast").unwrap(),
            MealType::Breakfast
        );
        assert_eq!(MealType::from_str("LUNCH").unwrap(), MealType::Lunch);
        assert_eq!(MealType::from_str("Dinner").unwrap(), MealType::Dinner);
        assert_eq!(MealType::from_str("snack").unwrap(), MealType::Snack);
        assert!(MealType::from_str("brunch").is_err());
    }

    #[test]
    fn test_meal_type_from_italian_label() {
        assert_eq!(MealType::from_str("Colazione").unwrap(), MealType::Breakfast);
        assert_eq!(MealType::from_str(" spuntino ").unwrap(), MealType::Snack);
        assert!(MealType::from_str("").is_err());
    }

    #[test]
    fn test_meal_type_labels() {
        assert_eq!(MealType::Breakfast.label("it"), "Colazione");
        assert_eq!(MealType::Snack.label("en-US"), "Snack");
        assert_eq!(MealType::Dinner.label("fr"), "Cena");
    }

    #[test]
    fn test_meal_type_json() {
        assert_eq!(
            serde_json::to_string(&MealType::Snack).unwrap(),
            "\"snack\""
        );
        let parsed: MealType = serde_json::from_str("\"lunch\"").unwrap();
        assert_eq!(parsed, MealType::Lunch);
    }
}
