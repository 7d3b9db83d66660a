use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::teacher_tag::{
    ActiveModel as TeacherTagActiveModel, Column as TeacherTagColumn, Entity as TeacherTagEntity,
    Model as TeacherTagModel,
};
use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, ModelTrait, QueryOrder};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

const DEFAULT_TAG_COLOR: &str = "#64748b";

pub fn urls() -> Router<AppState> {
    Router::new().route(
        "/teacher-tags",
        get(list_tags)
            .post(create_tag)
            .put(update_tag)
            .delete(delete_tag),
    )
}

async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<TeacherTagModel>>> {
    let tags = TeacherTagEntity::find()
        .order_by_asc(TeacherTagColumn::Id)
        .all(&state.db)
        .await?;
    Ok(Json(tags))
}

#[derive(Debug, Deserialize)]
struct CreateTagPayload {
    name: Option<String>,
    color: Option<String>,
}

async fn create_tag(
    State(state): State<AppState>,
    Json(payload): Json<CreateTagPayload>,
) -> ApiResult<Json<TeacherTagModel>> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("name is required"))?
        .to_string();
    let color = payload
        .color
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TAG_COLOR)
        .to_string();

    let active = TeacherTagActiveModel {
        name: Set(name),
        color: Set(color),
        ..Default::default()
    };
    let model = active.insert(&state.db).await?;
    Ok(Json(model))
}

#[derive(Debug, Deserialize)]
struct UpdateTagPayload {
    id: Option<i64>,
    name: Option<String>,
    color: Option<String>,
}

async fn update_tag(
    State(state): State<AppState>,
    Json(payload): Json<UpdateTagPayload>,
) -> ApiResult<Json<TeacherTagModel>> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::validation("missing id"))?;
    let existing = TeacherTagEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("teacher tag not found"))?;

    let mut active: TeacherTagActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(color) = payload.color {
        active.color = Set(color);
    }
    let model = active.update(&state.db).await?;
    Ok(Json(model))
}

#[derive(Debug, Deserialize)]
struct DeleteTagPayload {
    id: Option<i64>,
}

/// Deleting a tag does not cascade to teachers referencing it; readers
/// resolve a dangling tag_id to the "Unknown" fallback.
async fn delete_tag(
    State(state): State<AppState>,
    Json(payload): Json<DeleteTagPayload>,
) -> ApiResult<Json<JsonValue>> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::validation("missing id"))?;
    let existing = TeacherTagEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("teacher tag not found"))?;

    existing.delete(&state.db).await?;
    Ok(Json(json!({ "success": true })))
}
