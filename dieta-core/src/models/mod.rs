mod daily_plan;
mod food;
mod meal_type;
mod settings;
mod user_info;

pub use daily_plan::{DailyPlan, PlannedMealItem};
pub use food::{Food, NutritionPer100g, DEFAULT_UNIT};
pub use meal_type::MealType;
pub use settings::{AppSettings, Theme};
pub use user_info::UserInfo;
