use super::{Api, HookState};
use crate::content::{ABOUT_SECTION_DEFAULTS, ABOUT_SECTION_KEYS};
use anyhow::Result;
use rand::Rng as _;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AboutSection {
    pub id: Option<i64>,
    pub section: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    #[serde(rename = "sort_order", alias = "order")]
    pub order: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Achievement {
    pub id: i64,
    pub year: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "sort_order", alias = "order")]
    pub order: i32,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
struct AboutResponse {
    sections: Vec<AboutSection>,
    achievements: Vec<Achievement>,
}

/// Client-side temporary id for a not-yet-saved achievement. Negative so it
/// can never collide with a real row id; the server treats unknown ids as
/// inserts and the post-save refetch swaps in the real id.
fn temp_achievement_id() -> i64 {
    -rand::rng().random_range(1..i64::MAX)
}

pub struct AboutHook {
    api: Api,
    pub state: HookState,
    pub sections: Vec<AboutSection>,
    pub achievements: Vec<Achievement>,
    pub saving: bool,
    pub last_error: Option<String>,
}

impl AboutHook {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: HookState::Idle,
            sections: default_sections(),
            achievements: Vec::new(),
            saving: false,
            last_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = HookState::Loading;
        match self.api.get_json::<AboutResponse>("/api/about").await {
            Ok(fetched) => {
                self.sections = merge_sections(fetched.sections);
                self.achievements = fetched.achievements;
                self.state = HookState::Ready;
                self.last_error = None;
            }
            Err(err) => {
                warn!("failed to load about page, falling back to defaults: {}", err);
                self.sections = default_sections();
                self.achievements = Vec::new();
                self.state = HookState::Error;
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Stage a new achievement locally under a temporary id. Nothing hits the
    /// server until save().
    pub fn add_achievement(&mut self, year: &str, title: &str, description: &str) -> i64 {
        let id = temp_achievement_id();
        let order = self.achievements.len() as i32;
        self.achievements.push(Achievement {
            id,
            year: year.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            order,
            active: true,
        });
        id
    }

    /// Persist the whole page in one call, then refetch so temporary
    /// achievement ids are replaced by the real row ids.
    pub async fn save(&mut self) -> Result<()> {
        self.saving = true;
        let sections: Vec<serde_json::Value> = self
            .sections
            .iter()
            .map(|s| {
                json!({
                    "id": s.id,
                    "section": s.section,
                    "title": s.title,
                    "content": s.content,
                    "image": s.image,
                    "order": s.order,
                    "active": s.active,
                })
            })
            .collect();
        let achievements: Vec<serde_json::Value> = self
            .achievements
            .iter()
            .map(|a| {
                json!({
                    // Temporary ids are stripped so the server inserts.
                    "id": if a.id < 0 { None } else { Some(a.id) },
                    "year": a.year,
                    "title": a.title,
                    "description": a.description,
                    "order": a.order,
                    "active": a.active,
                })
            })
            .collect();

        let result = self
            .api
            .post_json(
                "/api/about",
                &json!({ "sections": sections, "achievements": achievements }),
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

    pub async fn delete_achievement(&mut self, id: i64) -> Result<()> {
        // Unsaved entries only exist locally.
        if id < 0 {
            self.achievements.retain(|a| a.id != id);
            return Ok(());
        }

        self.saving = true;
        let result = self
            .api
            .delete_json("/api/about", &json!({ "achievementId": id }))
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

fn default_sections() -> Vec<AboutSection> {
    ABOUT_SECTION_DEFAULTS
        .iter()
        .enumerate()
        .map(|(index, d)| AboutSection {
            id: None,
            section: d.section.to_string(),
            title: d.title.to_string(),
            content: d.content.to_string(),
            image: None,
            order: index as i32,
            active: true,
        })
        .collect()
}

/// Overlay fetched sections on the default set so every known section key is
/// always present, in the canonical display order. Extra server-side sections
/// are appended after the known ones.
fn merge_sections(mut fetched: Vec<AboutSection>) -> Vec<AboutSection> {
    let mut merged = Vec::with_capacity(ABOUT_SECTION_KEYS.len());
    for default in default_sections() {
        match fetched.iter().position(|s| s.section == default.section) {
            Some(index) => merged.push(fetched.remove(index)),
            None => merged.push(default),
        }
    }
    merged.extend(fetched);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_ids_are_negative() {
        for _ in 0..32 {
            assert!(temp_achievement_id() < 0);
        }
    }

    #[test]
    fn merge_fills_missing_sections_from_defaults() {
        let fetched = vec![AboutSection {
            id: Some(7),
            section: "mission".to_string(),
            title: "Edited mission".to_string(),
            content: "New content".to_string(),
            image: None,
            order: 2,
            active: true,
        }];

        let merged = merge_sections(fetched);
        assert_eq!(merged.len(), ABOUT_SECTION_KEYS.len());
        let mission = merged.iter().find(|s| s.section == "mission").unwrap();
        assert_eq!(mission.title, "Edited mission");
        assert_eq!(mission.id, Some(7));
        // Sections the server did not return come from the defaults.
        let vision = merged.iter().find(|s| s.section == "vision").unwrap();
        assert_eq!(vision.id, None);
    }

    #[test]
    fn local_achievements_get_unique_staging_ids() {
        let mut hook = AboutHook::new(Api::new("http://localhost"));
        let a = hook.add_achievement("2022", "First graduating class", "");
        let b = hook.add_achievement("2023", "Regional olympiad win", "");
        assert_ne!(a, b);
        assert_eq!(hook.achievements.len(), 2);
    }
}
