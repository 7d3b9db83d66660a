use super::{Api, HookState};
use crate::content::STATISTIC_DEFAULTS;
use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Statistic {
    pub key: String,
    pub value: i32,
    pub label: String,
    pub suffix: String,
}

fn default_statistics() -> Vec<Statistic> {
    STATISTIC_DEFAULTS
        .iter()
        .map(|d| Statistic {
            key: d.key.to_string(),
            value: d.value,
            label: d.label.to_string(),
            suffix: d.suffix.to_string(),
        })
        .collect()
}

pub struct StatisticsHook {
    api: Api,
    pub state: HookState,
    pub statistics: Vec<Statistic>,
    pub saving: bool,
    pub last_error: Option<String>,
}

impl StatisticsHook {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: HookState::Idle,
            statistics: default_statistics(),
            saving: false,
            last_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = HookState::Loading;
        match self.api.get_json::<Vec<Statistic>>("/api/statistics").await {
            Ok(fetched) if !fetched.is_empty() => {
                self.statistics = fetched;
                self.state = HookState::Ready;
                self.last_error = None;
            }
            Ok(_) => {
                self.statistics = default_statistics();
                self.state = HookState::Ready;
            }
            Err(err) => {
                warn!(
                    "failed to load statistics, falling back to defaults: {}",
                    err
                );
                self.statistics = default_statistics();
                self.state = HookState::Error;
                self.last_error = Some(err.to_string());
            }
        }
    }

    pub async fn save(&mut self, values: &HashMap<String, i32>) -> Result<()> {
        self.saving = true;
        let result = self.api.post_json("/api/statistics", values).await;
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

    /// Restore the seeded defaults on the server, then refetch.
    pub async fn reset(&mut self) -> Result<()> {
        self.saving = true;
        let result = self.api.put_empty("/api/statistics").await;
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
