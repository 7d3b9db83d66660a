use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::hero_slide::{
    ActiveModel as HeroSlideActiveModel, Column as HeroSlideColumn, Entity as HeroSlideEntity,
    Model as HeroSlideModel,
};
use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::{get, post},
};
use bytes::Bytes;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, ModelTrait, QueryOrder};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

pub fn urls() -> Router<AppState> {
    Router::new()
        .route(
            "/hero",
            get(list_slides)
                .post(create_slide)
                .put(update_slide)
                .delete(delete_slide),
        )
        .route("/hero/upload", post(upload_image))
}

async fn list_slides(State(state): State<AppState>) -> ApiResult<Json<Vec<HeroSlideModel>>> {
    let slides = HeroSlideEntity::find()
        .order_by_asc(HeroSlideColumn::SortOrder)
        .all(&state.db)
        .await?;
    Ok(Json(slides))
}

#[derive(Debug, Deserialize)]
struct CreateSlidePayload {
    title: Option<String>,
    subtitle: Option<String>,
    image: Option<String>,
    #[serde(default)]
    order: i32,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

async fn create_slide(
    State(state): State<AppState>,
    Json(payload): Json<CreateSlidePayload>,
) -> ApiResult<Json<HeroSlideModel>> {
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("title is required"))?
        .to_string();
    let subtitle = payload
        .subtitle
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("subtitle is required"))?
        .to_string();

    let active = HeroSlideActiveModel {
        title: Set(title),
        subtitle: Set(subtitle),
        image: Set(normalize_image(payload.image)),
        sort_order: Set(payload.order),
        active: Set(payload.active),
        ..Default::default()
    };
    let model = active.insert(&state.db).await?;
    Ok(Json(model))
}

#[derive(Debug, Deserialize)]
struct UpdateSlidePayload {
    id: Option<i64>,
    title: Option<String>,
    subtitle: Option<String>,
    // Absent -> keep, null/"" -> clear, string -> replace.
    #[serde(default, deserialize_with = "double_option")]
    image: Option<Option<String>>,
    order: Option<i32>,
    active: Option<bool>,
}

async fn update_slide(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSlidePayload>,
) -> ApiResult<Json<HeroSlideModel>> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::validation("missing id"))?;
    let existing = HeroSlideEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("hero slide not found"))?;

    let new_image = match &payload.image {
        Some(value) => normalize_image(value.clone()),
        None => existing.image.clone(),
    };
    // Delete-before-write: the superseded blob goes first, and a failed
    // delete never blocks the row update.
    if let Some(old) = existing.image.as_deref() {
        if Some(old) != new_image.as_deref() {
            state.storage.delete_url(old).await;
        }
    }

    let mut active: HeroSlideActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(subtitle) = payload.subtitle {
        active.subtitle = Set(subtitle);
    }
    if payload.image.is_some() {
        active.image = Set(new_image);
    }
    if let Some(order) = payload.order {
        active.sort_order = Set(order);
    }
    if let Some(is_active) = payload.active {
        active.active = Set(is_active);
    }
    let model = active.update(&state.db).await?;
    Ok(Json(model))
}

#[derive(Debug, Deserialize)]
struct DeleteSlidePayload {
    id: Option<i64>,
}

async fn delete_slide(
    State(state): State<AppState>,
    Json(payload): Json<DeleteSlidePayload>,
) -> ApiResult<Json<JsonValue>> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::validation("missing id"))?;
    let existing = HeroSlideEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("hero slide not found"))?;

    if let Some(image) = existing.image.as_deref() {
        state.storage.delete_url(image).await;
    }
    existing.delete(&state.db).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/hero/upload — single-file multipart upload returning the public
/// asset URL. Rejects requests without a file part.
async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<JsonValue>> {
    let mut file: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::validation(format!("invalid multipart body: {}", err)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload.bin").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|err| ApiError::validation(format!("failed to read upload: {}", err)))?;
        file = Some((name, data));
        break;
    }

    let (name, data) = file.ok_or_else(|| ApiError::validation("no file uploaded"))?;
    let url = state
        .storage
        .store_asset(&name, data)
        .await
        .map_err(ApiError::Internal)?;
    Ok(Json(json!({ "url": url })))
}

pub(super) fn normalize_image(image: Option<String>) -> Option<String> {
    image
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Wraps the inner option so an explicit JSON null stays distinguishable
/// from a field that was never sent.
pub(super) fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_image_drops_blank_values() {
        assert_eq!(normalize_image(None), None);
        assert_eq!(normalize_image(Some("  ".to_string())), None);
        assert_eq!(
            normalize_image(Some(" /uploads/a.png ".to_string())),
            Some("/uploads/a.png".to_string())
        );
    }
}
