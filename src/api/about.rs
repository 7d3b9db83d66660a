use crate::api::hero::normalize_image;
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::about_section::{
    ActiveModel as SectionActiveModel, Column as SectionColumn, Entity as SectionEntity,
};
use crate::models::achievement::{
    ActiveModel as AchievementActiveModel, Column as AchievementColumn,
    Entity as AchievementEntity,
};
use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;
use serde_json::json;

pub fn urls() -> Router<AppState> {
    Router::new().route(
        "/about",
        get(get_about).post(save_about).delete(delete_achievement),
    )
}

async fn get_about(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let sections = SectionEntity::find()
        .order_by_asc(SectionColumn::SortOrder)
        .all(&state.db)
        .await?;
    let achievements = AchievementEntity::find()
        .order_by_asc(AchievementColumn::SortOrder)
        .all(&state.db)
        .await?;
    Ok(Json(json!({
        "sections": sections,
        "achievements": achievements,
    })))
}

#[derive(Debug, Deserialize)]
struct SectionPayload {
    id: Option<i64>,
    section: Option<String>,
    title: Option<String>,
    content: Option<String>,
    image: Option<String>,
    #[serde(default)]
    order: i32,
    #[serde(default = "default_active")]
    active: bool,
}

#[derive(Debug, Deserialize)]
struct AchievementPayload {
    id: Option<i64>,
    year: Option<String>,
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    order: i32,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct SaveAboutPayload {
    #[serde(default)]
    sections: Vec<SectionPayload>,
    #[serde(default)]
    achievements: Vec<AchievementPayload>,
}

/// POST /api/about — upsert each element by id presence: elements with an id
/// update in place, elements without insert. Section slugs stay unique: an
/// id-less element whose slug already exists updates that row instead of
/// duplicating it.
async fn save_about(
    State(state): State<AppState>,
    Json(payload): Json<SaveAboutPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    let now = Utc::now();

    for section in payload.sections {
        let slug = section
            .section
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::validation("section key is required"))?
            .to_string();

        let existing = match section.id {
            Some(id) => SectionEntity::find_by_id(id).one(&state.db).await?,
            None => {
                SectionEntity::find()
                    .filter(SectionColumn::Section.eq(slug.as_str()))
                    .one(&state.db)
                    .await?
            }
        };

        let new_image = normalize_image(section.image);
        match existing {
            Some(row) => {
                if let Some(old) = row.image.as_deref() {
                    if Some(old) != new_image.as_deref() {
                        state.storage.delete_url(old).await;
                    }
                }
                let mut active: SectionActiveModel = row.into();
                active.section = Set(slug);
                active.title = Set(section.title.unwrap_or_default());
                active.content = Set(section.content.unwrap_or_default());
                active.image = Set(new_image);
                active.sort_order = Set(section.order);
                active.active = Set(section.active);
                active.updated_at = Set(now);
                active.update(&state.db).await?;
            }
            None => {
                let active = SectionActiveModel {
                    section: Set(slug),
                    title: Set(section.title.unwrap_or_default()),
                    content: Set(section.content.unwrap_or_default()),
                    image: Set(new_image),
                    sort_order: Set(section.order),
                    active: Set(section.active),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(&state.db).await?;
            }
        }
    }

    for achievement in payload.achievements {
        let existing = match achievement.id {
            Some(id) => AchievementEntity::find_by_id(id).one(&state.db).await?,
            None => None,
        };

        match existing {
            Some(row) => {
                let mut active: AchievementActiveModel = row.into();
                active.year = Set(achievement.year.unwrap_or_default());
                active.title = Set(achievement.title.unwrap_or_default());
                active.description = Set(achievement.description.unwrap_or_default());
                active.sort_order = Set(achievement.order);
                active.active = Set(achievement.active);
                active.updated_at = Set(now);
                active.update(&state.db).await?;
            }
            // Unknown ids (client-side temporaries) insert a fresh row; the
            // client picks up the real id on its post-save refetch.
            None => {
                let active = AchievementActiveModel {
                    year: Set(achievement.year.unwrap_or_default()),
                    title: Set(achievement.title.unwrap_or_default()),
                    description: Set(achievement.description.unwrap_or_default()),
                    sort_order: Set(achievement.order),
                    active: Set(achievement.active),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(&state.db).await?;
            }
        }
    }

    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAchievementPayload {
    achievement_id: Option<i64>,
}

async fn delete_achievement(
    State(state): State<AppState>,
    Json(payload): Json<DeleteAchievementPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = payload
        .achievement_id
        .ok_or_else(|| ApiError::validation("missing achievementId"))?;
    let existing = AchievementEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("achievement not found"))?;

    existing.delete(&state.db).await?;
    Ok(Json(json!({ "success": true })))
}
