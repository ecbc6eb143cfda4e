//! Food catalog persisted as one versioned JSON array.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{Food, NutritionPer100g, DEFAULT_UNIT};
use crate::store::{KeyValueStore, StoreKey, VersionedDocumentStore};

/// Envelope version written for the food catalog.
pub const FOODS_VERSION: u32 = 1;

/// Outcome of parsing an import file.
///
/// Lines or entries that could not be used are dropped and only counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub accepted: Vec<Food>,
    pub rejected: usize,
}

/// Supported import file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// One `name score` pair per line.
    Text,
    /// A JSON array of foods in the catalog's own shape.
    Json,
}

impl ImportFormat {
    /// Picks JSON for `.json` files and text for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ImportFormat::Json,
            _ => ImportFormat::Text,
        }
    }

    pub fn parse(&self, content: &str) -> StoreResult<ParseReport> {
        match self {
            ImportFormat::Text => parse_food_from_text(content),
            ImportFormat::Json => parse_food_from_json(content),
        }
    }
}

/// Food catalog store.
///
/// Every operation reloads the whole catalog and, for writes, saves the
/// whole catalog back.
pub struct FoodStore<'a> {
    doc: VersionedDocumentStore<'a, Vec<Food>>,
}

impl<'a> FoodStore<'a> {
    pub fn new(kv: &'a dyn KeyValueStore) -> Self {
        let doc = VersionedDocumentStore::new(kv, StoreKey::Foods.as_str(), FOODS_VERSION)
            .with_validator(
                "every food needs a non-empty id, name and default unit",
                |foods: &Vec<Food>| foods.iter().all(Food::has_required_fields),
            );
        Self { doc }
    }

    /// Loads the catalog, or an empty list if none has been saved yet.
    pub fn load_foods(&self) -> StoreResult<Vec<Food>> {
        Ok(self.doc.load()?.unwrap_or_default())
    }

    /// Replaces the whole catalog.
    pub fn save_foods(&self, foods: Vec<Food>) -> StoreResult<Vec<Food>> {
        self.doc.save(foods)
    }

    /// Appends a food. Ids are not checked for duplicates.
    pub fn add_food(&self, food: Food) -> StoreResult<Food> {
        let mut foods = self.load_foods()?;
        foods.push(food.clone());
        self.doc.save(foods)?;
        Ok(food)
    }

    /// Replaces the food with the same id.
    pub fn update_food(&self, food: Food) -> StoreResult<Food> {
        let mut foods = self.load_foods()?;
        let slot = foods
            .iter_mut()
            .find(|f| f.id == food.id)
            .ok_or_else(|| StoreError::NotFound(food.id.clone()))?;
        *slot = food.clone();
        self.doc.save(foods)?;
        Ok(food)
    }

    /// Deletes every food with the given id.
    pub fn delete_food(&self, id: &str) -> StoreResult<()> {
        let mut foods = self.load_foods()?;
        let len_before = foods.len();
        foods.retain(|f| f.id != id);
        if foods.len() == len_before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.doc.save(foods)?;
        Ok(())
    }

    /// Gets a food by id.
    pub fn find_food(&self, id: &str) -> StoreResult<Option<Food>> {
        Ok(self.load_foods()?.into_iter().find(|f| f.id == id))
    }

    /// Gets a food by name (case-insensitive exact match).
    pub fn find_food_by_name(&self, name: &str) -> StoreResult<Option<Food>> {
        let name_lower = name.to_lowercase();
        Ok(self
            .load_foods()?
            .into_iter()
            .find(|f| f.name.to_lowercase() == name_lower))
    }

    /// Parses `content` and appends the accepted foods in a single save.
    pub fn import_foods(&self, content: &str, format: ImportFormat) -> StoreResult<ParseReport> {
        let report = format.parse(content)?;
        let mut foods = self.load_foods()?;
        foods.extend(report.accepted.iter().cloned());
        self.doc.save(foods)?;
        tracing::info!(
            imported = report.accepted.len(),
            rejected = report.rejected,
            "imported foods"
        );
        Ok(report)
    }

    /// Removes the catalog document.
    pub fn clear(&self) -> StoreResult<()> {
        self.doc.clear()
    }
}

/// Parses the plain-text import format.
///
/// Each non-blank line must hold exactly two whitespace-separated tokens,
/// `name score`. Underscores in the name become spaces and the score must be
/// an integer. Other lines are dropped. Parsed foods get a fresh id, unit
/// `g` and no nutrition data.
pub fn parse_food_from_text(content: &str) -> StoreResult<ParseReport> {
    let mut report = ParseReport::default();

    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        match parse_text_line(line) {
            Some(food) => report.accepted.push(food),
            None => {
                tracing::debug!(line, "skipping malformed import line");
                report.rejected += 1;
            }
        }
    }

    finish(report)
}

fn parse_text_line(line: &str) -> Option<Food> {
    let mut tokens = line.split_whitespace();
    let (name, score) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(name), Some(score), None) => (name, score),
        _ => return None,
    };
    let score: i64 = score.parse().ok()?;
    Some(Food::new(name.replace('_', " "), score))
}

/// Food entry as accepted by the JSON import; id and unit are optional.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedFood {
    #[serde(default)]
    id: Option<String>,
    name: String,
    score: i64,
    #[serde(default)]
    default_unit: Option<String>,
    #[serde(default)]
    image_uri: Option<String>,
    #[serde(rename = "nutritionPer100g", default)]
    nutrition_per_100g: Option<NutritionPer100g>,
}

impl From<ImportedFood> for Food {
    fn from(imported: ImportedFood) -> Self {
        let id = imported
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let default_unit = imported
            .default_unit
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UNIT.to_string());
        Food {
            id,
            name: imported.name,
            score: imported.score,
            default_unit,
            image_uri: imported.image_uri,
            nutrition_per_100g: imported.nutrition_per_100g,
        }
    }
}

/// Parses a JSON array of foods, bare or wrapped in a `{version, data}`
/// envelope such as an exported catalog.
///
/// Entries that do not decode or have an empty name are dropped and counted.
pub fn parse_food_from_json(content: &str) -> StoreResult<ParseReport> {
    if content.trim().is_empty() {
        return Err(StoreError::NoValidEntries);
    }

    let value: Value = serde_json::from_str(content)
        .map_err(|e| StoreError::ValidationFailed(format!("invalid JSON: {}", e)))?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(not_an_array()),
        },
        _ => return Err(not_an_array()),
    };

    let mut report = ParseReport::default();
    for entry in entries {
        match serde_json::from_value::<ImportedFood>(entry) {
            Ok(imported) if !imported.name.trim().is_empty() => {
                report.accepted.push(imported.into())
            }
            _ => report.rejected += 1,
        }
    }

    finish(report)
}

fn not_an_array() -> StoreError {
    StoreError::ValidationFailed("expected a JSON array of foods".to_string())
}

fn finish(report: ParseReport) -> StoreResult<ParseReport> {
    if report.rejected > 0 {
        tracing::warn!(rejected = report.rejected, "dropped unusable import entries");
    }
    if report.accepted.is_empty() {
        return Err(StoreError::NoValidEntries);
    }
    Ok(report)
}
