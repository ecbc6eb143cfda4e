use clap::{Args, Subcommand, ValueEnum};
use dieta_core::{Food, FoodStore, ImportFormat, NutritionPer100g, DEFAULT_UNIT};
use std::path::PathBuf;

use super::{confirm, resolve_food, OutputFormat};

#[derive(Clone, Copy, ValueEnum)]
pub enum ImportKind {
    Text,
    Json,
}

impl From<ImportKind> for ImportFormat {
    fn from(kind: ImportKind) -> Self {
        match kind {
            ImportKind::Text => ImportFormat::Text,
            ImportKind::Json => ImportFormat::Json,
        }
    }
}

/// Nutrition values per 100 g, shared by add and update
#[derive(Args, Default)]
pub struct NutritionArgs {
    /// Calories (kcal per 100 g)
    #[arg(long)]
    calories: Option<f64>,

    /// Proteins (g per 100 g)
    #[arg(long)]
    proteins: Option<f64>,

    /// Carbohydrates (g per 100 g)
    #[arg(long)]
    carbs: Option<f64>,

    /// Fats (g per 100 g)
    #[arg(long)]
    fats: Option<f64>,
}

impl NutritionArgs {
    fn is_empty(&self) -> bool {
        self.calories.is_none()
            && self.proteins.is_none()
            && self.carbs.is_none()
            && self.fats.is_none()
    }

    /// Overlays the given values on `base`.
    fn merge(&self, base: Option<NutritionPer100g>) -> Option<NutritionPer100g> {
        if self.is_empty() {
            return base;
        }
        let base = base.unwrap_or_default();
        Some(NutritionPer100g {
            calories: self.calories.or(base.calories),
            proteins: self.proteins.or(base.proteins),
            carbs: self.carbs.or(base.carbs),
            fats: self.fats.or(base.fats),
        })
    }
}

#[derive(Args)]
pub struct FoodCommand {
    #[command(subcommand)]
    pub command: FoodSubcommand,
}

#[derive(Subcommand)]
pub enum FoodSubcommand {
    /// List foods in the catalog
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only show foods whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Show food details
    Show {
        /// Food ID or name
        food: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a food to the catalog
    Add {
        /// Food name
        name: String,

        /// Health score
        #[arg(long, short, allow_negative_numbers = true)]
        score: i64,

        /// Default unit
        #[arg(long, short, default_value = DEFAULT_UNIT)]
        unit: String,

        /// Image URI
        #[arg(long)]
        image: Option<String>,

        #[command(flatten)]
        nutrition: NutritionArgs,
    },

    /// Update a food
    Update {
        /// Food ID or name
        food: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New score
        #[arg(long, short, allow_negative_numbers = true)]
        score: Option<i64>,

        /// New default unit
        #[arg(long, short)]
        unit: Option<String>,

        /// New image URI
        #[arg(long)]
        image: Option<String>,

        #[command(flatten)]
        nutrition: NutritionArgs,
    },

    /// Delete a food
    Delete {
        /// Food ID or name
        food: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Import foods from a file ("name score" lines or a JSON array)
    Import {
        /// File to import
        path: PathBuf,

        /// File format (guessed from the extension when omitted)
        #[arg(long, value_enum)]
        format: Option<ImportKind>,
    },
}

impl FoodCommand {
    pub fn run(&self, store: &FoodStore<'_>) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FoodSubcommand::List { format, search } => {
                let mut foods = store.load_foods()?;
                if let Some(q) = search {
                    let q = q.to_lowercase();
                    foods.retain(|f| f.name.to_lowercase().contains(&q));
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&foods)?);
                    }
                    OutputFormat::Text => {
                        if foods.is_empty() {
                            println!("No foods found");
                            return Ok(());
                        }
                        println!("{:<36}  {:<24} {:>6}  {}", "ID", "NAME", "SCORE", "UNIT");
                        for food in &foods {
                            println!(
                                "{:<36}  {:<24} {:>6}  {}",
                                food.id, food.name, food.score, food.default_unit
                            );
                        }
                        println!("\nTotal: {} food(s)", foods.len());
                    }
                }
                Ok(())
            }

            FoodSubcommand::Show { food, format } => {
                let food = resolve_food(store, food)?
                    .ok_or_else(|| format!("Food not found: {}", food))?;

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&food)?),
                    OutputFormat::Text => {
                        println!("ID: {}", food.id);
                        print!("{}", food);
                    }
                }
                Ok(())
            }

            FoodSubcommand::Add {
                name,
                score,
                unit,
                image,
                nutrition,
            } => {
                let mut food = Food::new(name.trim(), *score).with_unit(unit.trim());
                food.nutrition_per_100g = nutrition.merge(None);
                food.image_uri = image.clone();

                let created = store.add_food(food)?;
                println!("Added food {} ({})", created.name, created.id);
                Ok(())
            }

            FoodSubcommand::Update {
                food,
                name,
                score,
                unit,
                image,
                nutrition,
            } => {
                let has_updates = name.is_some()
                    || score.is_some()
                    || unit.is_some()
                    || image.is_some()
                    || !nutrition.is_empty();
                if !has_updates {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let mut existing = resolve_food(store, food)?
                    .ok_or_else(|| format!("Food not found: {}", food))?;

                if let Some(n) = name {
                    existing.name = n.trim().to_string();
                }
                if let Some(s) = score {
                    existing.score = *s;
                }
                if let Some(u) = unit {
                    existing.default_unit = u.trim().to_string();
                }
                if let Some(i) = image {
                    existing.image_uri = Some(i.clone());
                }
                existing.nutrition_per_100g = nutrition.merge(existing.nutrition_per_100g.take());

                let updated = store.update_food(existing)?;
                println!("Updated food:");
                print!("{}", updated);
                Ok(())
            }

            FoodSubcommand::Delete { food, force } => {
                let existing = resolve_food(store, food)?
                    .ok_or_else(|| format!("Food not found: {}", food))?;

                if !force && !confirm(&format!("Delete food '{}'?", existing.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                store.delete_food(&existing.id)?;
                println!("Deleted food: {}", existing.name);
                Ok(())
            }

            FoodSubcommand::Import { path, format } => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
                let format = format
                    .map(ImportFormat::from)
                    .unwrap_or_else(|| ImportFormat::from_path(path));

                let report = store.import_foods(&content, format)?;
                println!("Imported {} food(s)", report.accepted.len());
                if report.rejected > 0 {
                    println!("Skipped {} invalid entr(y/ies)", report.rejected);
                }
                Ok(())
            }
        }
    }
}
