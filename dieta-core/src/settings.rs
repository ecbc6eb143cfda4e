//! App settings and user info documents.
//!
//! Both are saved in the version envelope; bare documents written by older
//! builds still load. Absent documents load as defaults.

use crate::error::StoreResult;
use crate::models::{AppSettings, UserInfo};
use crate::store::{KeyValueStore, StoreKey, VersionedDocumentStore};

const SETTINGS_VERSION: u32 = 1;
const USER_INFO_VERSION: u32 = 1;

pub struct SettingsStore<'a> {
    settings: VersionedDocumentStore<'a, AppSettings>,
    user_info: VersionedDocumentStore<'a, UserInfo>,
}

impl<'a> SettingsStore<'a> {
    pub fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self {
            settings: VersionedDocumentStore::new(
                kv,
                StoreKey::AppSettings.as_str(),
                SETTINGS_VERSION,
            )
            .with_validator("language must not be empty", |s: &AppSettings| {
                !s.language.trim().is_empty()
            }),
            user_info: VersionedDocumentStore::new(
                kv,
                StoreKey::UserInfo.as_str(),
                USER_INFO_VERSION,
            ),
        }
    }

    pub fn load_settings(&self) -> StoreResult<AppSettings> {
        Ok(self.settings.load()?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: AppSettings) -> StoreResult<AppSettings> {
        self.settings.save(settings)
    }

    pub fn load_user_info(&self) -> StoreResult<UserInfo> {
        Ok(self.user_info.load()?.unwrap_or_default())
    }

    /// Saves user info as given. Range checks belong to the caller
    /// (see [`UserInfo::validate`]).
    pub fn save_user_info(&self, info: UserInfo) -> StoreResult<UserInfo> {
        self.user_info.save(info)
    }
}
