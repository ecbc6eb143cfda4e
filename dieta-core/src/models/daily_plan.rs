use serde::{Deserialize, Serialize};
use std::fmt;

use super::meal_type::MealType;

/// A food planned in a meal slot.
///
/// References a [`Food`](super::Food) by id; the reference is resolved at
/// read time and may dangle. The same food may appear more than once in a slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMealItem {
    pub food_id: String,
    pub quantity: f64,
    pub unit: String,
}

impl PlannedMealItem {
    pub fn new(food_id: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            food_id: food_id.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

impl fmt::Display for PlannedMealItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.quantity, self.unit, self.food_id)
    }
}

/// The plan for one calendar day.
///
/// Every slot is always present; slots missing from stored JSON (older
/// documents had no `snack`) deserialize as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyPlan {
    #[serde(default)]
    pub breakfast: Vec<PlannedMealItem>,
    #[serde(default)]
    pub lunch: Vec<PlannedMealItem>,
    #[serde(default)]
    pub dinner: Vec<PlannedMealItem>,
    #[serde(default)]
    pub snack: Vec<PlannedMealItem>,
}

impl DailyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, meal_type: MealType) -> &[PlannedMealItem] {
        match meal_type {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Dinner => &self.dinner,
            MealType::Snack => &self.snack,
        }
    }

    pub fn slot_mut(&mut self, meal_type: MealType) -> &mut Vec<PlannedMealItem> {
        match meal_type {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
            MealType::Snack => &mut self.snack,
        }
    }

    /// Iterates over every item of every slot.
    pub fn items(&self) -> impl Iterator<Item = &PlannedMealItem> {
        MealType::ALL
            .into_iter()
            .flat_map(move |meal_type| self.slot(meal_type).iter())
    }

    pub fn item_count(&self) -> usize {
        MealType::ALL.iter().map(|m| self.slot(*m).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Appends an item to a slot. Duplicates are kept.
    pub fn add_item(&mut self, meal_type: MealType, item: PlannedMealItem) {
        self.slot_mut(meal_type).push(item);
    }

    /// Removes every item in the slot referencing `food_id`.
    ///
    /// Returns the number of items removed.
    pub fn remove_food(&mut self, meal_type: MealType, food_id: &str) -> usize {
        let slot = self.slot_mut(meal_type);
        let len_before = slot.len();
        slot.retain(|item| item.food_id != food_id);
        len_before - slot.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_slots_deserialize_empty() {
        let plan: DailyPlan =
            serde_json::from_str(r#"{"breakfast":[{"foodId":"a","quantity":50,"unit":"g"}]}"#)
                .unwrap();
        assert_eq!(plan.breakfast.len(), 1);
        assert!(plan.lunch.is_empty());
        assert!(plan.snack.is_empty());
    }

    #[test]
    fn test_serialized_plan_has_all_slots() {
        let json = serde_json::to_value(DailyPlan::new()).unwrap();
        for slot in ["breakfast", "lunch", "dinner", "snack"] {
            assert_eq!(json[slot], serde_json::json!([]));
        }
    }

    #[test]
    fn test_add_item_keeps_duplicates() {
        let mut plan = DailyPlan::new();
        plan.add_item(MealType::Lunch, PlannedMealItem::new("rice", 80.0, "g"));
        plan.add_item(MealType::Lunch, PlannedMealItem::new("rice", 80.0, "g"));
        assert_eq!(plan.lunch.len(), 2);
        assert_eq!(plan.item_count(), 2);
    }

    #[test]
    fn test_remove_food_removes_all_matches() {
        let mut plan = DailyPlan::new();
        for _ in 0..3 {
            plan.add_item(MealType::Dinner, PlannedMealItem::new("fish", 150.0, "g"));
        }
        plan.add_item(MealType::Dinner, PlannedMealItem::new("salad", 50.0, "g"));
        plan.add_item(MealType::Lunch, PlannedMealItem::new("fish", 100.0, "g"));

        assert_eq!(plan.remove_food(MealType::Dinner, "fish"), 3);
        assert_eq!(plan.dinner.len(), 1);
        assert_eq!(plan.lunch.len(), 1);
        assert_eq!(plan.remove_food(MealType::Dinner, "fish"), 0);
    }

    #[test]
    fn test_items_iterates_in_slot_order() {
        let mut plan = DailyPlan::new();
        plan.add_item(MealType::Snack, PlannedMealItem::new("s", 1.0, "g"));
        plan.add_item(MealType::Breakfast, PlannedMealItem::new("b", 1.0, "g"));
        let ids: Vec<&str> = plan.items().map(|i| i.food_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "s"]);
    }
}
