mod config_cmd;
mod dashboard;
mod demo;
mod food;
mod plan;
mod settings;
mod user;

pub use config_cmd::ConfigCommand;
pub use dashboard::DashboardCommand;
pub use demo::DemoCommand;
pub use food::FoodCommand;
pub use plan::PlanCommand;
pub use settings::SettingsCommand;
pub use user::UserCommand;

use chrono::NaiveDate;
use clap::ValueEnum;
use dieta_core::{parse_date_key, today, Food, FoodStore, StoreResult};
use std::io::{self, Write};

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Parses an optional YYYY-MM-DD argument, defaulting to today.
pub(crate) fn parse_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date {
        Some(d) => {
            parse_date_key(d).ok_or_else(|| format!("Invalid date format '{}'. Use YYYY-MM-DD.", d))
        }
        None => Ok(today()),
    }
}

/// Finds a food by id first, then by name (case-insensitive).
pub(crate) fn resolve_food(store: &FoodStore<'_>, reference: &str) -> StoreResult<Option<Food>> {
    match store.find_food(reference)? {
        Some(food) => Ok(Some(food)),
        None => store.find_food_by_name(reference),
    }
}

/// Asks a yes/no question on stdout; anything but "y" is a no.
pub(crate) fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
