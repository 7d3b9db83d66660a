use super::{Api, HookState};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::warn;

/// Color rendered for a teacher whose tag no longer exists.
const UNKNOWN_TAG_COLOR: &str = "#9ca3af";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
    pub education: Option<String>,
    pub subject: Option<String>,
    pub experience: Option<String>,
    pub tag_id: i64,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeacherTag {
    pub id: i64,
    pub name: String,
    pub color: String,
}

pub struct TeachersHook {
    api: Api,
    pub state: HookState,
    pub teachers: Vec<Teacher>,
    pub tags: Vec<TeacherTag>,
    /// Per-tag busy flags for the tag-delete buttons.
    pub tag_busy: HashMap<i64, bool>,
    pub last_error: Option<String>,
}

impl TeachersHook {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: HookState::Idle,
            teachers: Vec::new(),
            tags: Vec::new(),
            tag_busy: HashMap::new(),
            last_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = HookState::Loading;
        let teachers = self.api.get_json::<Vec<Teacher>>("/api/teachers").await;
        let tags = self.api.get_json::<Vec<TeacherTag>>("/api/teacher-tags").await;
        match (teachers, tags) {
            (Ok(teachers), Ok(tags)) => {
                self.teachers = teachers;
                self.tags = tags;
                self.state = HookState::Ready;
                self.last_error = None;
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!("failed to load teachers: {}", err);
                self.state = HookState::Error;
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Resolve a teacher's tag for display. A dangling tag_id (the tag was
    /// deleted) renders as "Unknown" with a neutral color; deletion is never
    /// cascaded or blocked.
    pub fn resolve_tag(&self, tag_id: i64) -> (String, String) {
        self.tags
            .iter()
            .find(|tag| tag.id == tag_id)
            .map(|tag| (tag.name.clone(), tag.color.clone()))
            .unwrap_or_else(|| ("Unknown".to_string(), UNKNOWN_TAG_COLOR.to_string()))
    }

    pub async fn add_teacher(&mut self, teacher: &serde_json::Value) -> Result<()> {
        let result = self.api.post_json("/api/teachers", teacher).await;
        self.finish_mutation(result).await
    }

    pub async fn update_teacher(&mut self, teacher: &Teacher) -> Result<()> {
        let body = json!({
            "id": teacher.id,
            "name": teacher.name,
            "age": teacher.age,
            "education": teacher.education,
            "subject": teacher.subject,
            "experience": teacher.experience,
            "tagId": teacher.tag_id,
            "description": teacher.description,
            "image": teacher.image,
        });
        let result = self.api.put_json("/api/teachers", &body).await;
        self.finish_mutation(result).await
    }

    pub async fn delete_teacher(&mut self, id: i64) -> Result<()> {
        let result = self.api.delete_json("/api/teachers", &json!({ "id": id })).await;
        self.finish_mutation(result).await
    }

    pub async fn add_tag(&mut self, name: &str, color: &str) -> Result<()> {
        let result = self
            .api
            .post_json("/api/teacher-tags", &json!({ "name": name, "color": color }))
            .await;
        self.finish_mutation(result).await
    }

    pub async fn delete_tag(&mut self, id: i64) -> Result<()> {
        self.tag_busy.insert(id, true);
        let result = self
            .api
            .delete_json("/api/teacher-tags", &json!({ "id": id }))
            .await;
        self.tag_busy.insert(id, false);
        self.finish_mutation(result).await
    }

    pub fn is_tag_busy(&self, id: i64) -> bool {
        self.tag_busy.get(&id).copied().unwrap_or(false)
    }

    async fn finish_mutation(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                self.load().await;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_tag_resolves_to_unknown() {
        let mut hook = TeachersHook::new(Api::new("http://localhost"));
        hook.tags.push(TeacherTag {
            id: 1,
            name: "Mathematics".to_string(),
            color: "#1e3a8a".to_string(),
        });

        assert_eq!(hook.resolve_tag(1).0, "Mathematics");
        let (name, color) = hook.resolve_tag(99);
        assert_eq!(name, "Unknown");
        assert_eq!(color, UNKNOWN_TAG_COLOR);
    }
}
