use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unit assigned to foods created without an explicit one.
pub const DEFAULT_UNIT: &str = "g";

/// Nutrition values per 100 g. Missing values count as zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NutritionPer100g {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proteins: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<f64>,
}

impl NutritionPer100g {
    pub fn new(calories: f64, proteins: f64, carbs: f64, fats: f64) -> Self {
        Self {
            calories: Some(calories),
            proteins: Some(proteins),
            carbs: Some(carbs),
            fats: Some(fats),
        }
    }
}

/// A catalog entry.
///
/// `score` is the food's quality rating; callers assume 0–100 but the
/// range is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: String,
    pub name: String,
    pub score: i64,
    pub default_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    #[serde(
        rename = "nutritionPer100g",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub nutrition_per_100g: Option<NutritionPer100g>,
}

impl Food {
    /// Creates a food with a fresh id and the default unit.
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            score,
            default_unit: DEFAULT_UNIT.to_string(),
            image_uri: None,
            nutrition_per_100g: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.default_unit = unit.into();
        self
    }

    pub fn with_nutrition(mut self, nutrition: NutritionPer100g) -> Self {
        self.nutrition_per_100g = Some(nutrition);
        self
    }

    pub fn with_image_uri(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }

    /// True when id, name and default unit are all non-empty.
    pub fn has_required_fields(&self) -> bool {
        !self.id.trim().is_empty()
            && !self.name.trim().is_empty()
            && !self.default_unit.trim().is_empty()
    }
}

impl fmt::Display for Food {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "Score: {}", self.score)?;
        writeln!(f, "Unit: {}", self.default_unit)?;

        if let Some(n) = &self.nutrition_per_100g {
            writeln!(f, "\nNutrition (per 100 g):")?;
            let rows = [
                ("calories", n.calories, "kcal"),
                ("proteins", n.proteins, "g"),
                ("carbs", n.carbs, "g"),
                ("fats", n.fats, "g"),
            ];
            for (name, amount, unit) in rows {
                if let Some(amount) = amount {
                    writeln!(f, "  - {}: {} {}", name, amount, unit)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_new() {
        let food = Food::new("Apple", 90);
        assert_eq!(food.name, "Apple");
        assert_eq!(food.score, 90);
        assert_eq!(food.default_unit, "g");
        assert!(!food.id.is_empty());
        assert!(food.nutrition_per_100g.is_none());
    }

    #[test]
    fn test_food_ids_are_fresh() {
        assert_ne!(Food::new("A", 1).id, Food::new("A", 1).id);
    }

    #[test]
    fn test_required_fields() {
        assert!(Food::new("Rice", 70).has_required_fields());
        assert!(!Food::new("", 70).has_required_fields());
        assert!(!Food::new("Rice", 70).with_id(" ").has_required_fields());
        assert!(!Food::new("Rice", 70).with_unit("").has_required_fields());
    }

    #[test]
    fn test_food_json_uses_camel_case() {
        let food = Food::new("Oats", 85)
            .with_id("f1")
            .with_nutrition(NutritionPer100g::new(389.0, 16.9, 66.3, 6.9));
        let json = serde_json::to_value(&food).unwrap();

        assert_eq!(json["defaultUnit"], "g");
        assert_eq!(json["nutritionPer100g"]["calories"], 389.0);
        assert!(json.get("imageUri").is_none());
    }

    #[test]
    fn test_food_parses_partial_nutrition() {
        let json = r#"{"id":"x","name":"Tea","score":60,"defaultUnit":"ml",
                       "nutritionPer100g":{"calories":1}}"#;
        let food: Food = serde_json::from_str(json).unwrap();
        let n = food.nutrition_per_100g.unwrap();
        assert_eq!(n.calories, Some(1.0));
        assert_eq!(n.proteins, None);
    }

    #[test]
    fn test_food_display() {
        let food = Food::new("Salmon", 95)
            .with_nutrition(NutritionPer100g::new(208.0, 20.0, 0.0, 13.0));
        let output = format!("{}", food);
        assert!(output.contains("Salmon"));
        assert!(output.contains("Score: 95"));
        assert!(output.contains("calories: 208 kcal"));
    }
}
