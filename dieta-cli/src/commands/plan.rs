use chrono::NaiveDate;
use clap::{Args, Subcommand};
use dieta_core::{DailyPlan, FoodIndex, MealType, PlannedMealItem, PlannerStore};
use dieta_core::{FoodStore, DEFAULT_UNIT};

use super::{confirm, parse_date, resolve_food, OutputFormat};

#[derive(Args)]
pub struct PlanCommand {
    #[command(subcommand)]
    pub command: PlanSubcommand,
}

#[derive(Subcommand)]
pub enum PlanSubcommand {
    /// Show planned meals for a day or a date range
    Show {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// End date (YYYY-MM-DD) to show a range starting at --date
        #[arg(long)]
        to: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a food to a meal
    Add {
        /// Food ID or name
        food: String,

        /// Quantity in the given unit
        quantity: f64,

        /// Meal type (breakfast, lunch, dinner, snack)
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        meal_type: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Unit (defaults to the food's default unit)
        #[arg(long, short)]
        unit: Option<String>,
    },

    /// Remove a food from a meal
    Remove {
        /// Food ID or name
        food: String,

        /// Meal type (breakfast, lunch, dinner, snack)
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        meal_type: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Remove every planned meal of a day
    ClearDay {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl PlanCommand {
    pub fn run(
        &self,
        planner: &PlannerStore<'_>,
        foods: &FoodStore<'_>,
        language: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PlanSubcommand::Show { date, to, format } => {
                let from = parse_date(date.as_deref())?;
                let to = match to {
                    Some(_) => parse_date(to.as_deref())?,
                    None => from,
                };
                if to < from {
                    return Err("End date must not be before start date".into());
                }

                let plans = planner.plans_in_range(from, to)?;

                match format {
                    OutputFormat::Json => {
                        let by_date: std::collections::BTreeMap<NaiveDate, &DailyPlan> =
                            plans.iter().map(|(d, p)| (*d, p)).collect();
                        println!("{}", serde_json::to_string_pretty(&by_date)?);
                    }
                    OutputFormat::Text => {
                        if plans.iter().all(|(_, p)| p.is_empty()) {
                            println!("No meals planned");
                            return Ok(());
                        }
                        let catalog = foods.load_foods()?;
                        let index = FoodIndex::new(&catalog);
                        for (i, (date, plan)) in plans.iter().enumerate() {
                            if i > 0 {
                                println!();
                            }
                            print_day(*date, plan, &index, language);
                        }
                    }
                }
                Ok(())
            }

            PlanSubcommand::Add {
                food,
                quantity,
                meal_type,
                date,
                unit,
            } => {
                let date = parse_date(date.as_deref())?;
                let meal_type: MealType = meal_type.parse().map_err(|e: String| e)?;
                if !(quantity.is_finite() && *quantity > 0.0) {
                    return Err(
                        format!("Quantity must be a positive number, got {}", quantity).into(),
                    );
                }

                let resolved = resolve_food(foods, food)?
                    .ok_or_else(|| format!("Food not found: {}", food))?;
                let unit = unit.clone().unwrap_or_else(|| {
                    if resolved.default_unit.is_empty() {
                        DEFAULT_UNIT.to_string()
                    } else {
                        resolved.default_unit.clone()
                    }
                });

                let item = PlannedMealItem::new(resolved.id.clone(), *quantity, unit);
                planner.add_meal_item(date, meal_type, item.clone())?;
                println!(
                    "Added {} {} of '{}' to {} on {}",
                    item.quantity,
                    item.unit,
                    resolved.name,
                    meal_type.label(language),
                    date
                );
                Ok(())
            }

            PlanSubcommand::Remove {
                food,
                meal_type,
                date,
            } => {
                let date = parse_date(date.as_deref())?;
                let meal_type: MealType = meal_type.parse().map_err(|e: String| e)?;

                // Items can reference foods that were deleted from the catalog.
                let food_id = match resolve_food(foods, food)? {
                    Some(f) => f.id,
                    None => food.clone(),
                };

                let removed = planner.remove_meal_item(date, meal_type, &food_id)?;
                if removed == 0 {
                    return Err(format!(
                        "'{}' is not planned for {} on {}",
                        food,
                        meal_type.label(language),
                        date
                    )
                    .into());
                }
                println!(
                    "Removed {} item(s) from {} on {}",
                    removed,
                    meal_type.label(language),
                    date
                );
                Ok(())
            }

            PlanSubcommand::ClearDay { date, force } => {
                let date = parse_date(date.as_deref())?;
                let existing = planner.get_daily_plan(date)?.unwrap_or_default();
                if existing.is_empty() {
                    println!("Nothing planned on {}", date);
                    return Ok(());
                }

                if !force
                    && !confirm(&format!(
                        "Remove {} planned item(s) on {}?",
                        existing.item_count(),
                        date
                    ))?
                {
                    println!("Cancelled.");
                    return Ok(());
                }

                planner.update_daily_plan(date, DailyPlan::new())?;
                println!("Cleared {}", date);
                Ok(())
            }
        }
    }
}

fn print_day(date: NaiveDate, plan: &DailyPlan, index: &FoodIndex<'_>, language: &str) {
    println!("{}", date);
    println!("{}", "-".repeat(10));
    for meal_type in MealType::ALL {
        let items = plan.slot(meal_type);
        if items.is_empty() {
            continue;
        }
        println!("  {}", meal_type.label(language));
        for item in items {
            let name = index
                .get(&item.food_id)
                .map(|f| f.name.as_str())
                .unwrap_or("(unknown food)");
            println!("    - {} {} {}", name, item.quantity, item.unit);
        }
    }
}
