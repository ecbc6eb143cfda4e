//! Dieta Core Library
//!
//! Food catalog, meal planner and dashboard scoring for Dieta applications.
//! Every store persists whole JSON documents through a [`KeyValueStore`].

pub mod catalog;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod models;
pub mod planner;
pub mod settings;
pub mod state;
pub mod store;

pub use catalog::{
    parse_food_from_json, parse_food_from_text, FoodStore, ImportFormat, ParseReport,
};
pub use dashboard::{
    daily_score, Dashboard, DashboardData, DailyTargets, FoodIndex, MealStatus, NutritionTotals,
};
pub use demo::{DemoGenerator, DemoSummary, DemoWindow};
pub use error::{StoreError, StoreResult};
pub use models::{
    AppSettings, DailyPlan, Food, MealType, NutritionPer100g, PlannedMealItem, Theme, UserInfo,
    DEFAULT_UNIT,
};
pub use planner::{format_date_key, parse_date_key, today, PlannerData, PlannerStore};
pub use settings::SettingsStore;
pub use state::{reduce, Action, AppState};
pub use store::{FileStore, KeyValueStore, KvError, MemoryStore, StoreKey};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
