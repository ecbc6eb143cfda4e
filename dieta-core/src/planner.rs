//! Meal planner persisted as one document mapping date keys to daily plans.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};

use crate::error::StoreResult;
use crate::models::{DailyPlan, MealType, PlannedMealItem};
use crate::store::{KeyValueStore, StoreKey, VersionedDocumentStore};

/// Envelope version written for planner data.
pub const PLANNER_VERSION: u32 = 1;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Every planned day, keyed by `YYYY-MM-DD`.
pub type PlannerData = BTreeMap<String, DailyPlan>;

/// Formats a calendar date as a planner key, e.g. `2024-01-05`.
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a planner key back into a date.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Today's date in the local time zone.
///
/// Planner keys follow the user's calendar day, not UTC.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Planner store.
///
/// The whole planner is read and written on every operation; plans for
/// different days are not stored separately.
pub struct PlannerStore<'a> {
    doc: VersionedDocumentStore<'a, PlannerData>,
}

impl<'a> PlannerStore<'a> {
    pub fn new(kv: &'a dyn KeyValueStore) -> Self {
        let doc = VersionedDocumentStore::new(kv, StoreKey::PlannerData.as_str(), PLANNER_VERSION)
            .with_validator("planner keys must be YYYY-MM-DD dates", |data: &PlannerData| {
                data.keys().all(|key| parse_date_key(key).is_some())
            });
        Self { doc }
    }

    /// Loads every planned day; empty if nothing has been saved.
    pub fn load_all(&self) -> StoreResult<PlannerData> {
        Ok(self.doc.load()?.unwrap_or_default())
    }

    /// Replaces the whole planner.
    pub fn save_all(&self, data: PlannerData) -> StoreResult<PlannerData> {
        self.doc.save(data)
    }

    /// Returns the plan for a day, or `None` if the day was never planned.
    ///
    /// A day that exists but has no items is returned as an empty plan.
    pub fn get_daily_plan(&self, date: NaiveDate) -> StoreResult<Option<DailyPlan>> {
        let mut data = self.load_all()?;
        Ok(data.remove(&format_date_key(date)))
    }

    /// Stores the plan for a day, replacing any existing one.
    pub fn update_daily_plan(&self, date: NaiveDate, plan: DailyPlan) -> StoreResult<DailyPlan> {
        let mut data = self.load_all()?;
        data.insert(format_date_key(date), plan.clone());
        self.doc.save(data)?;
        Ok(plan)
    }

    /// Appends an item to a slot, creating the day if needed.
    pub fn add_meal_item(
        &self,
        date: NaiveDate,
        meal_type: MealType,
        item: PlannedMealItem,
    ) -> StoreResult<DailyPlan> {
        let mut data = self.load_all()?;
        let plan = data.entry(format_date_key(date)).or_default();
        plan.add_item(meal_type, item);
        let plan = plan.clone();
        self.doc.save(data)?;
        Ok(plan)
    }

    /// Removes every item in the slot referencing `food_id`.
    ///
    /// Returns the number of items removed. Nothing is written when the day
    /// does not exist or no item matched.
    pub fn remove_meal_item(
        &self,
        date: NaiveDate,
        meal_type: MealType,
        food_id: &str,
    ) -> StoreResult<usize> {
        let mut data = self.load_all()?;
        let removed = match data.get_mut(&format_date_key(date)) {
            Some(plan) => plan.remove_food(meal_type, food_id),
            None => 0,
        };
        if removed > 0 {
            self.doc.save(data)?;
        }
        Ok(removed)
    }

    /// Plans between two dates (inclusive), oldest first.
    pub fn plans_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<(NaiveDate, DailyPlan)>> {
        let from_key = format_date_key(from);
        let to_key = format_date_key(to);
        if from_key > to_key {
            return Ok(Vec::new());
        }
        Ok(self
            .load_all()?
            .range(from_key..=to_key)
            .filter_map(|(key, plan)| parse_date_key(key).map(|date| (date, plan.clone())))
            .collect())
    }

    /// Removes the planner document.
    pub fn clear(&self) -> StoreResult<()> {
        self.doc.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_date_key_zero_pads() {
        assert_eq!(format_date_key(date(2024, 1, 5)), "2024-01-05");
        assert_eq!(format_date_key(date(2023, 12, 31)), "2023-12-31");
    }

    #[test]
    fn test_parse_date_key() {
        assert_eq!(parse_date_key("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date_key("05/01/2024"), None);
    }

    #[test]
    fn test_unknown_day_is_none() {
        let kv = MemoryStore::new();
        let planner = PlannerStore::new(&kv);
        assert_eq!(planner.get_daily_plan(date(2024, 1, 1)).unwrap(), None);
    }

    #[test]
    fn test_empty_day_is_distinct_from_missing() {
        let kv = MemoryStore::new();
        let planner = PlannerStore::new(&kv);
        planner
            .update_daily_plan(date(2024, 1, 1), DailyPlan::new())
            .unwrap();
        assert_eq!(
            planner.get_daily_plan(date(2024, 1, 1)).unwrap(),
            Some(DailyPlan::new())
        );
    }

    #[test]
    fn test_update_normalizes_missing_snack() {
        let kv = MemoryStore::new();
        let planner = PlannerStore::new(&kv);

        let partial: DailyPlan = serde_json::from_str(
            r#"{"breakfast":[{"foodId":"oats","quantity":60,"unit":"g"}],"lunch":[],"dinner":[]}"#,
        )
        .unwrap();
        planner.update_daily_plan(date(2024, 3, 1), partial).unwrap();

        let plan = planner.get_daily_plan(date(2024, 3, 1)).unwrap().unwrap();
        assert!(plan.snack.is_empty());
        assert!(kv.get("planner_data").unwrap().unwrap().contains("\"snack\":[]"));
    }

    #[test]
    fn test_add_meal_item_creates_day() {
        let kv = MemoryStore::new();
        let planner = PlannerStore::new(&kv);

        let plan = planner
            .add_meal_item(
                date(2024, 2, 10),
                MealType::Lunch,
                PlannedMealItem::new("rice", 80.0, "g"),
            )
            .unwrap();

        assert_eq!(plan.lunch.len(), 1);
        assert!(plan.breakfast.is_empty());
        assert_eq!(
            planner.get_daily_plan(date(2024, 2, 10)).unwrap(),
            Some(plan)
        );
    }

    #[test]
    fn test_remove_meal_item_removes_all_occurrences() {
        let kv = MemoryStore::new();
        let planner = PlannerStore::new(&kv);
        let day = date(2024, 2, 10);

        for _ in 0..3 {
            planner
                .add_meal_item(day, MealType::Snack, PlannedMealItem::new("nuts", 30.0, "g"))
                .unwrap();
        }

        assert_eq!(
            planner.remove_meal_item(day, MealType::Snack, "nuts").unwrap(),
            3
        );
        let plan = planner.get_daily_plan(day).unwrap().unwrap();
        assert!(plan.snack.is_empty());
    }

    #[test]
    fn test_remove_from_unknown_day_is_noop() {
        let kv = MemoryStore::new();
        let planner = PlannerStore::new(&kv);
        assert_eq!(
            planner
                .remove_meal_item(date(2024, 1, 1), MealType::Dinner, "x")
                .unwrap(),
            0
        );
        assert_eq!(kv.get("planner_data").unwrap(), None);
    }

    #[test]
    fn test_legacy_unversioned_planner_loads() {
        let kv = MemoryStore::new();
        kv.set(
            "planner_data",
            r#"{"2024-01-05":{"breakfast":[],"lunch":[{"foodId":"a","quantity":1,"unit":"pz"}],"dinner":[]}}"#,
        )
        .unwrap();

        let planner = PlannerStore::new(&kv);
        let plan = planner.get_daily_plan(date(2024, 1, 5)).unwrap().unwrap();
        assert_eq!(plan.lunch[0].unit, "pz");
        assert!(plan.snack.is_empty());
    }

    #[test]
    fn test_save_all_rejects_bad_keys() {
        let kv = MemoryStore::new();
        let planner = PlannerStore::new(&kv);
        let mut data = PlannerData::new();
        data.insert("tomorrow".into(), DailyPlan::new());
        assert!(matches!(
            planner.save_all(data).unwrap_err(),
            StoreError::ValidationFailed(_)
        ));
    }

    #[test]
    fn test_plans_in_range() {
        let kv = MemoryStore::new();
        let planner = PlannerStore::new(&kv);
        for day in [1, 3, 9] {
            planner
                .update_daily_plan(date(2024, 5, day), DailyPlan::new())
                .unwrap();
        }

        let dates: Vec<NaiveDate> = planner
            .plans_in_range(date(2024, 5, 2), date(2024, 5, 9))
            .unwrap()
            .into_iter()
            .map(|(d, _)| d)
            .collect();
        assert_eq!(dates, vec![date(2024, 5, 3), date(2024, 5, 9)]);

        assert!(planner
            .plans_in_range(date(2024, 5, 9), date(2024, 5, 1))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_clear() {
        let kv = MemoryStore::new();
        let planner = PlannerStore::new(&kv);
        planner
            .update_daily_plan(date(2024, 1, 1), DailyPlan::new())
            .unwrap();
        planner.clear().unwrap();
        assert!(planner.load_all().unwrap().is_empty());
    }
}
