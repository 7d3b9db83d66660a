use crate::api::hero::{double_option, normalize_image};
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::teacher::{
    ActiveModel as TeacherActiveModel, Column as TeacherColumn, Entity as TeacherEntity,
    Model as TeacherModel,
};
use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, ModelTrait, QueryOrder};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

pub fn urls() -> Router<AppState> {
    Router::new().route(
        "/teachers",
        get(list_teachers)
            .post(create_teacher)
            .put(update_teacher)
            .delete(delete_teacher),
    )
}

async fn list_teachers(State(state): State<AppState>) -> ApiResult<Json<Vec<TeacherModel>>> {
    let teachers = TeacherEntity::find()
        .order_by_asc(TeacherColumn::Id)
        .all(&state.db)
        .await?;
    Ok(Json(teachers))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTeacherPayload {
    name: Option<String>,
    age: Option<i32>,
    education: Option<String>,
    subject: Option<String>,
    experience: Option<String>,
    tag_id: Option<i64>,
    description: Option<String>,
    image: Option<String>,
}

async fn create_teacher(
    State(state): State<AppState>,
    Json(payload): Json<CreateTeacherPayload>,
) -> ApiResult<Json<TeacherModel>> {
    let name = require_text(payload.name, "name")?;
    let description = require_text(payload.description, "description")?;
    let tag_id = payload
        .tag_id
        .ok_or_else(|| ApiError::validation("tagId is required"))?;

    let active = TeacherActiveModel {
        name: Set(name),
        age: Set(payload.age),
        education: Set(payload.education),
        subject: Set(payload.subject),
        experience: Set(payload.experience),
        tag_id: Set(tag_id),
        description: Set(description),
        image: Set(normalize_image(payload.image)),
        ..Default::default()
    };
    let model = active.insert(&state.db).await?;
    Ok(Json(model))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTeacherPayload {
    id: Option<i64>,
    name: Option<String>,
    age: Option<i32>,
    education: Option<String>,
    subject: Option<String>,
    experience: Option<String>,
    tag_id: Option<i64>,
    description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    image: Option<Option<String>>,
}

async fn update_teacher(
    State(state): State<AppState>,
    Json(payload): Json<UpdateTeacherPayload>,
) -> ApiResult<Json<TeacherModel>> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::validation("missing id"))?;
    let existing = TeacherEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("teacher not found"))?;

    let new_image = match &payload.image {
        Some(value) => normalize_image(value.clone()),
        None => existing.image.clone(),
    };
    if let Some(old) = existing.image.as_deref() {
        if Some(old) != new_image.as_deref() {
            state.storage.delete_url(old).await;
        }
    }

    let mut active: TeacherActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if payload.age.is_some() {
        active.age = Set(payload.age);
    }
    if payload.education.is_some() {
        active.education = Set(payload.education);
    }
    if payload.subject.is_some() {
        active.subject = Set(payload.subject);
    }
    if payload.experience.is_some() {
        active.experience = Set(payload.experience);
    }
    if let Some(tag_id) = payload.tag_id {
        active.tag_id = Set(tag_id);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if payload.image.is_some() {
        active.image = Set(new_image);
    }
    let model = active.update(&state.db).await?;
    Ok(Json(model))
}

#[derive(Debug, Deserialize)]
struct DeleteTeacherPayload {
    id: Option<i64>,
}

async fn delete_teacher(
    State(state): State<AppState>,
    Json(payload): Json<DeleteTeacherPayload>,
) -> ApiResult<Json<JsonValue>> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::validation("missing id"))?;
    let existing = TeacherEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("teacher not found"))?;

    if let Some(image) = existing.image.as_deref() {
        state.storage.delete_url(image).await;
    }
    existing.delete(&state.db).await?;
    Ok(Json(json!({ "success": true })))
}

fn require_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation(format!("{} is required", field)))
}
