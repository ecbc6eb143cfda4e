//! Presentation mode: fills the stores with sample foods and random plans.
//!
//! Enabling overwrites the catalog and the planner outright. Disabling only
//! flips the flag and leaves the generated data in place; use
//! [`DemoGenerator::clear_all_data`] to wipe it.

use chrono::{Days, NaiveDate};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::FoodStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{DailyPlan, Food, MealType, NutritionPer100g, PlannedMealItem};
use crate::planner::{format_date_key, PlannerData, PlannerStore};
use crate::store::{KeyValueStore, StoreKey};

/// Days covered by the generated plans around today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoWindow {
    /// Days before today.
    pub past_days: u32,
    /// Days after today.
    pub future_days: u32,
}

impl DemoWindow {
    /// Upper bound for each side of the window.
    pub const MAX_DAYS: u32 = 366;

    /// Checks both sides against [`DemoWindow::MAX_DAYS`].
    pub fn validate(&self) -> Result<(), String> {
        for (name, days) in [("past_days", self.past_days), ("future_days", self.future_days)] {
            if days > Self::MAX_DAYS {
                return Err(format!("{} must be at most {}", name, Self::MAX_DAYS));
            }
        }
        Ok(())
    }
}

impl Default for DemoWindow {
    fn default() -> Self {
        Self {
            past_days: 14,
            future_days: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSummary {
    pub foods: usize,
    pub days: usize,
}

/// Item count and gram range generated for one meal slot.
struct SlotRule {
    items: (usize, usize),
    grams: (u32, u32),
}

fn slot_rule(meal_type: MealType) -> SlotRule {
    match meal_type {
        MealType::Breakfast => SlotRule {
            items: (1, 3),
            grams: (30, 150),
        },
        MealType::Lunch => SlotRule {
            items: (2, 4),
            grams: (80, 250),
        },
        MealType::Dinner => SlotRule {
            items: (2, 4),
            grams: (80, 250),
        },
        MealType::Snack => SlotRule {
            items: (0, 2),
            grams: (20, 100),
        },
    }
}

/// The fixed sample catalog, with fresh ids on every call.
pub fn sample_foods() -> Vec<Food> {
    const SAMPLES: [(&str, i64, f64, f64, f64, f64); 16] = [
        ("Avena", 88, 389.0, 16.9, 66.3, 6.9),
        ("Yogurt greco", 85, 97.0, 9.0, 3.9, 5.0),
        ("Banana", 80, 89.0, 1.1, 22.8, 0.3),
        ("Mela", 90, 52.0, 0.3, 13.8, 0.2),
        ("Pane integrale", 72, 247.0, 13.0, 41.0, 3.4),
        ("Uova", 82, 155.0, 13.0, 1.1, 11.0),
        ("Petto di pollo", 86, 165.0, 31.0, 0.0, 3.6),
        ("Salmone", 92, 208.0, 20.0, 0.0, 13.0),
        ("Riso basmati", 70, 350.0, 7.5, 78.0, 0.9),
        ("Pasta integrale", 74, 348.0, 13.0, 64.0, 2.5),
        ("Lenticchie", 89, 116.0, 9.0, 20.0, 0.4),
        ("Broccoli", 95, 34.0, 2.8, 7.0, 0.4),
        ("Spinaci", 96, 23.0, 2.9, 3.6, 0.4),
        ("Olio extravergine", 78, 884.0, 0.0, 0.0, 100.0),
        ("Mandorle", 84, 579.0, 21.0, 22.0, 50.0),
        ("Parmigiano", 68, 392.0, 33.0, 0.0, 28.0),
    ];

    SAMPLES
        .iter()
        .map(|&(name, score, calories, proteins, carbs, fats)| {
            Food::new(name, score).with_nutrition(NutritionPer100g::new(
                calories, proteins, carbs, fats,
            ))
        })
        .collect()
}

/// Generates one day of random meals drawn from `foods`.
pub fn random_plan<R: Rng + ?Sized>(rng: &mut R, foods: &[Food]) -> DailyPlan {
    let mut plan = DailyPlan::new();
    if foods.is_empty() {
        return plan;
    }

    for meal_type in MealType::ALL {
        let rule = slot_rule(meal_type);
        let count = rng.random_range(rule.items.0..=rule.items.1);
        for _ in 0..count {
            if let Some(food) = foods.choose(rng) {
                // Quantities are multiples of 5 g.
                let grams = rng.random_range(rule.grams.0..=rule.grams.1) / 5 * 5;
                plan.add_item(
                    meal_type,
                    PlannedMealItem::new(food.id.clone(), f64::from(grams), "g"),
                );
            }
        }
    }

    plan
}

/// Presentation-mode controller.
pub struct DemoGenerator<'a> {
    kv: &'a dyn KeyValueStore,
    foods: &'a FoodStore<'a>,
    planner: &'a PlannerStore<'a>,
    window: DemoWindow,
}

impl<'a> DemoGenerator<'a> {
    pub fn new(
        kv: &'a dyn KeyValueStore,
        foods: &'a FoodStore<'a>,
        planner: &'a PlannerStore<'a>,
    ) -> Self {
        Self {
            kv,
            foods,
            planner,
            window: DemoWindow::default(),
        }
    }

    pub fn with_window(mut self, window: DemoWindow) -> Self {
        self.window = window;
        self
    }

    /// Replaces the catalog and planner with generated data and sets the flag.
    pub fn enable<R: Rng + ?Sized>(&self, rng: &mut R, today: NaiveDate) -> StoreResult<DemoSummary> {
        self.window.validate().map_err(StoreError::ValidationFailed)?;
        let foods = self.foods.save_foods(sample_foods())?;

        let first = today
            .checked_sub_days(Days::new(u64::from(self.window.past_days)))
            .unwrap_or(today);
        let span = u64::from(self.window.past_days) + u64::from(self.window.future_days);

        let mut data = PlannerData::new();
        for date in first.iter_days().take(span as usize + 1) {
            data.insert(format_date_key(date), random_plan(rng, &foods));
        }
        let days = data.len();
        self.planner.save_all(data)?;

        self.set_flag(true)?;
        tracing::info!(foods = foods.len(), days, "presentation mode enabled");

        Ok(DemoSummary {
            foods: foods.len(),
            days,
        })
    }

    /// Clears the flag. Generated data stays in place.
    pub fn disable(&self) -> StoreResult<()> {
        self.set_flag(false)?;
        tracing::info!("presentation mode disabled");
        Ok(())
    }

    /// Empties the catalog and planner and clears the flag.
    pub fn clear_all_data(&self) -> StoreResult<()> {
        self.foods.save_foods(Vec::new())?;
        self.planner.save_all(PlannerData::new())?;
        self.set_flag(false)?;
        tracing::info!("all food and planner data cleared");
        Ok(())
    }

    /// Reads the flag. Any read error counts as disabled.
    pub fn is_enabled(&self) -> bool {
        match self.kv.get(StoreKey::PresentationMode.as_str()) {
            Ok(Some(value)) => value.trim() == "true",
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to read presentation mode flag: {}", e);
                false
            }
        }
    }

    fn set_flag(&self, enabled: bool) -> StoreResult<()> {
        let value = if enabled { "true" } else { "false" };
        self.kv.set(StoreKey::PresentationMode.as_str(), value)?;
        Ok(())
    }
}
