use super::{Api, HookState};
use crate::content::{SiteSettings, merge_settings};
use anyhow::Result;
use std::collections::HashMap;
use tracing::warn;

/// Settings hook: fetches the raw key/value map and merges it over the
/// hardcoded defaults. A failed fetch keeps the defaults so public pages
/// never render empty.
pub struct SettingsHook {
    api: Api,
    pub state: HookState,
    pub settings: SiteSettings,
    pub saving: bool,
    pub last_error: Option<String>,
}

impl SettingsHook {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: HookState::Idle,
            settings: SiteSettings::default(),
            saving: false,
            last_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = HookState::Loading;
        match self
            .api
            .get_json::<HashMap<String, String>>("/api/settings")
            .await
        {
            Ok(fetched) => {
                self.settings = merge_settings(&fetched);
                self.state = HookState::Ready;
                self.last_error = None;
            }
            Err(err) => {
                warn!("failed to load settings, falling back to defaults: {}", err);
                self.settings = SiteSettings::default();
                self.state = HookState::Error;
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Persist the full settings object, then refetch so the hook reflects
    /// exactly what the store holds. The saving flag clears on every path.
    pub async fn save(&mut self, settings: &SiteSettings) -> Result<()> {
        self.saving = true;
        let result = self
            .api
            .post_json(
                "/api/settings",
                &serde_json::json!({ "settings": settings.to_map() }),
            )
            .await;
        match result {
            Ok(()) => {
                self.load().await;
                self.saving = false;
                Ok(())
            }
            Err(err) => {
                self.saving = false;
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
