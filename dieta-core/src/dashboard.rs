//! Dashboard aggregation: nutrition totals, daily score, weekly trend and
//! per-meal status.
//!
//! Everything here except [`Dashboard::refresh`] is a pure function over the
//! catalog and planner contents, so the scoring rules can be tested without
//! any storage.

use std::collections::HashMap;
use std::ops::AddAssign;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::catalog::FoodStore;
use crate::error::StoreResult;
use crate::models::{DailyPlan, Food, MealType, PlannedMealItem};
use crate::planner::{format_date_key, PlannerData, PlannerStore};

/// Number of days in the weekly trend, today included.
pub const WEEK_LENGTH: u64 = 7;

const CALORIES_WEIGHT: f64 = 0.40;
const PROTEINS_WEIGHT: f64 = 0.30;
const CARBS_WEIGHT: f64 = 0.15;
const FATS_WEIGHT: f64 = 0.15;

/// Calorie intake above `target * OVERAGE_THRESHOLD` is penalized.
const OVERAGE_THRESHOLD: f64 = 1.2;
/// Each `target * OVERAGE_STEP` above the threshold costs `OVERAGE_PENALTY` points.
const OVERAGE_STEP: f64 = 0.2;
const OVERAGE_PENALTY: f64 = 20.0;

/// Slots with at least this many items count as complete.
const COMPLETE_MEAL_ITEMS: usize = 3;

/// Daily nutrition targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTargets {
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Default for DailyTargets {
    fn default() -> Self {
        Self {
            calories: 2200.0,
            proteins: 120.0,
            carbs: 280.0,
            fats: 70.0,
        }
    }
}

/// Summed nutrition (kcal and grams).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, other: Self) {
        self.calories += other.calories;
        self.proteins += other.proteins;
        self.carbs += other.carbs;
        self.fats += other.fats;
    }
}

/// Completion status of a meal slot, by item count only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealStatus {
    #[serde(rename = "Mancante")]
    Missing,
    #[serde(rename = "Parziale")]
    Partial,
    #[serde(rename = "Completo")]
    Complete,
}

impl MealStatus {
    pub fn label(&self, language: &str) -> &'static str {
        let english = language.to_lowercase().starts_with("en");
        match (self, english) {
            (MealStatus::Missing, false) => "Mancante",
            (MealStatus::Partial, false) => "Parziale",
            (MealStatus::Complete, false) => "Completo",
            (MealStatus::Missing, true) => "Missing",
            (MealStatus::Partial, true) => "Partial",
            (MealStatus::Complete, true) => "Complete",
        }
    }
}

/// Current value against its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current: f64,
    pub target: f64,
}

impl Progress {
    /// Percentage of the target reached (not capped).
    pub fn percent(&self) -> f64 {
        if self.target > 0.0 {
            self.current / self.target * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSummary {
    pub meal_type: MealType,
    pub item_count: usize,
    pub status: MealStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    pub date: NaiveDate,
    pub label: String,
    pub score: u8,
}

/// Everything the dashboard screen shows for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub date: NaiveDate,
    pub daily_score: u8,
    pub calories: Progress,
    pub proteins: Progress,
    pub carbs: Progress,
    pub fats: Progress,
    /// Oldest day first, ending with `date`.
    pub weekly: Vec<WeeklyPoint>,
    pub meals: Vec<MealSummary>,
}

/// Catalog lookup by id. When ids collide the first food wins.
pub struct FoodIndex<'f> {
    by_id: HashMap<&'f str, &'f Food>,
}

impl<'f> FoodIndex<'f> {
    pub fn new(foods: &'f [Food]) -> Self {
        let mut by_id = HashMap::with_capacity(foods.len());
        for food in foods {
            by_id.entry(food.id.as_str()).or_insert(food);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'f Food> {
        self.by_id.get(id).copied()
    }
}

/// Nutrition contributed by one planned item.
///
/// Gram quantities scale the per-100 g values by `quantity / 100`; any other
/// unit is treated as one portion per unit and scales by `quantity`. Unknown
/// foods and missing nutrition contribute zero.
pub fn item_nutrition(item: &PlannedMealItem, index: &FoodIndex<'_>) -> NutritionTotals {
    let nutrition = match index.get(&item.food_id).and_then(|f| f.nutrition_per_100g) {
        Some(n) => n,
        None => return NutritionTotals::default(),
    };

    let multiplier = if item.unit == "g" {
        item.quantity / 100.0
    } else {
        item.quantity
    };

    NutritionTotals {
        calories: nutrition.calories.unwrap_or(0.0) * multiplier,
        proteins: nutrition.proteins.unwrap_or(0.0) * multiplier,
        carbs: nutrition.carbs.unwrap_or(0.0) * multiplier,
        fats: nutrition.fats.unwrap_or(0.0) * multiplier,
    }
}

/// Sums nutrition across every slot of a day.
pub fn daily_totals(plan: &DailyPlan, index: &FoodIndex<'_>) -> NutritionTotals {
    let mut totals = NutritionTotals::default();
    for item in plan.items() {
        totals += item_nutrition(item, index);
    }
    totals
}

pub fn meal_status(items: &[PlannedMealItem]) -> MealStatus {
    match items.len() {
        0 => MealStatus::Missing,
        n if n >= COMPLETE_MEAL_ITEMS => MealStatus::Complete,
        _ => MealStatus::Partial,
    }
}

/// Scores a day from 0 to 100.
///
/// Each nutrient scores its share of the target, capped at 100%, and the
/// shares are blended with weights 0.40 (calories), 0.30 (proteins), 0.15
/// (carbs) and 0.15 (fats). Calories above 120% of target subtract 20 points
/// per further 20% of target. A day with no calories scores 0.
pub fn daily_score(totals: &NutritionTotals, targets: &DailyTargets) -> u8 {
    if totals.calories == 0.0 {
        return 0;
    }

    let share = |current: f64, target: f64| {
        if target > 0.0 {
            (current / target).min(1.0)
        } else {
            0.0
        }
    };

    let weighted = share(totals.calories, targets.calories) * CALORIES_WEIGHT
        + share(totals.proteins, targets.proteins) * PROTEINS_WEIGHT
        + share(totals.carbs, targets.carbs) * CARBS_WEIGHT
        + share(totals.fats, targets.fats) * FATS_WEIGHT;
    let mut score = weighted * 100.0;

    let limit = targets.calories * OVERAGE_THRESHOLD;
    if totals.calories > limit {
        score -= (totals.calories - limit) / (targets.calories * OVERAGE_STEP) * OVERAGE_PENALTY;
    }

    score.clamp(0.0, 100.0).round() as u8
}

/// Three-letter weekday abbreviation. Anything other than English falls
/// back to Italian.
pub fn weekday_label(weekday: Weekday, language: &str) -> &'static str {
    const ITALIAN: [&str; 7] = ["Lun", "Mar", "Mer", "Gio", "Ven", "Sab", "Dom"];
    const ENGLISH: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    let idx = weekday.num_days_from_monday() as usize;
    if language.to_lowercase().starts_with("en") {
        ENGLISH[idx]
    } else {
        ITALIAN[idx]
    }
}

/// Builds the dashboard for `today` from already-loaded data.
pub fn build_dashboard(
    foods: &[Food],
    planner: &PlannerData,
    today: NaiveDate,
    targets: &DailyTargets,
    language: &str,
) -> DashboardData {
    let index = FoodIndex::new(foods);
    let empty = DailyPlan::default();
    let plan_for = |date: NaiveDate| planner.get(&format_date_key(date)).unwrap_or(&empty);

    let today_plan = plan_for(today);
    let totals = daily_totals(today_plan, &index);

    let weekly = (0..WEEK_LENGTH)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| WeeklyPoint {
            date,
            label: weekday_label(date.weekday(), language).to_string(),
            score: daily_score(&daily_totals(plan_for(date), &index), targets),
        })
        .collect();

    let meals = MealType::ALL
        .iter()
        .map(|&meal_type| {
            let items = today_plan.slot(meal_type);
            MealSummary {
                meal_type,
                item_count: items.len(),
                status: meal_status(items),
            }
        })
        .collect();

    DashboardData {
        date: today,
        daily_score: daily_score(&totals, targets),
        calories: Progress {
            current: totals.calories,
            target: targets.calories,
        },
        proteins: Progress {
            current: totals.proteins,
            target: targets.proteins,
        },
        carbs: Progress {
            current: totals.carbs,
            target: targets.carbs,
        },
        fats: Progress {
            current: totals.fats,
            target: targets.fats,
        },
        weekly,
        meals,
    }
}

/// Dashboard aggregator over the catalog and planner stores.
///
/// Holds no cached data: every refresh re-reads both stores.
pub struct Dashboard<'a> {
    foods: &'a FoodStore<'a>,
    planner: &'a PlannerStore<'a>,
    targets: DailyTargets,
    language: String,
}

impl<'a> Dashboard<'a> {
    pub fn new(foods: &'a FoodStore<'a>, planner: &'a PlannerStore<'a>) -> Self {
        Self {
            foods,
            planner,
            targets: DailyTargets::default(),
            language: "it".to_string(),
        }
    }

    pub fn with_targets(mut self, targets: DailyTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn targets(&self) -> &DailyTargets {
        &self.targets
    }

    /// Recomputes the dashboard for `today` from the current store contents.
    pub fn refresh(&self, today: NaiveDate) -> StoreResult<DashboardData> {
        let foods = self.foods.load_foods()?;
        let planner = self.planner.load_all()?;
        tracing::debug!(
            foods = foods.len(),
            days = planner.len(),
            %today,
            "refreshing dashboard"
        );
        Ok(build_dashboard(
            &foods,
            &planner,
            today,
            &self.targets,
            &self.language,
        ))
    }
}
