/// Well-known keys used by the application's stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Foods,
    PlannerData,
    AppSettings,
    UserInfo,
    PresentationMode,
}

impl StoreKey {
    pub const ALL: [StoreKey; 5] = [
        StoreKey::Foods,
        StoreKey::PlannerData,
        StoreKey::AppSettings,
        StoreKey::UserInfo,
        StoreKey::PresentationMode,
    ];

    /// Returns the storage key string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Foods => "foods",
            StoreKey::PlannerData => "planner_data",
            StoreKey::AppSettings => "app_settings",
            StoreKey::UserInfo => "user_info",
            StoreKey::PresentationMode => "presentation_mode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_keys_are_distinct() {
        let mut keys: Vec<&str> = StoreKey::ALL.iter().map(|k| k.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), StoreKey::ALL.len());
    }

    #[test]
    fn test_store_key_strings() {
        assert_eq!(StoreKey::Foods.as_str(), "foods");
        assert_eq!(StoreKey::PlannerData.as_str(), "planner_data");
    }
}
