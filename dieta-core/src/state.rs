//! Application state and the pure reducer that updates it.
//!
//! Front ends hold an [`AppState`], dispatch [`Action`]s through [`reduce`]
//! and persist whatever changed through the stores.

use crate::models::{AppSettings, Food, Theme, UserInfo};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub settings: AppSettings,
    pub foods: Vec<Food>,
    pub user_info: UserInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetTheme(Theme),
    SetLanguage(String),
    /// Replaces the food list, e.g. after loading the catalog.
    LoadFoods(Vec<Food>),
    AddFood(Food),
    /// Replaces the food with the same id; unknown ids are ignored.
    UpdateFood(Food),
    DeleteFood(String),
    SetUserInfo(UserInfo),
    Reset,
}

/// Applies an action and returns the new state.
pub fn reduce(mut state: AppState, action: &Action) -> AppState {
    match action {
        Action::SetTheme(theme) => state.settings.theme = *theme,
        Action::SetLanguage(language) => state.settings.language = language.clone(),
        Action::LoadFoods(foods) => state.foods = foods.clone(),
        Action::AddFood(food) => state.foods.push(food.clone()),
        Action::UpdateFood(food) => {
            if let Some(existing) = state.foods.iter_mut().find(|f| f.id == food.id) {
                *existing = food.clone();
            }
        }
        Action::DeleteFood(id) => state.foods.retain(|f| &f.id != id),
        Action::SetUserInfo(info) => state.user_info = info.clone(),
        Action::Reset => return AppState::default(),
    }
    state
}
