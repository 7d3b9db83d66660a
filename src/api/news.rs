use crate::api::hero::{double_option, normalize_image};
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::news_article::{
    ActiveModel as NewsActiveModel, Column as NewsColumn, Entity as NewsEntity,
};
use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, ModelTrait, QueryOrder};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

const EXCERPT_CHARS: usize = 150;

pub fn urls() -> Router<AppState> {
    Router::new().route(
        "/news",
        get(get_news)
            .post(create_article)
            .put(update_article)
            .delete(delete_article),
    )
}

#[derive(Debug, Default, Deserialize)]
struct NewsQuery {
    id: Option<String>,
}

async fn get_news(
    Query(query): Query<NewsQuery>,
    State(state): State<AppState>,
) -> ApiResult<Response> {
    if let Some(id) = query.id {
        let article = NewsEntity::find_by_id(id)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::not_found("news article not found"))?;
        return Ok(Json(article).into_response());
    }

    let articles = NewsEntity::find()
        .order_by_desc(NewsColumn::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(articles).into_response())
}

#[derive(Debug, Deserialize)]
struct CreateArticlePayload {
    title: Option<String>,
    excerpt: Option<String>,
    content: Option<String>,
    author: Option<String>,
    date: Option<String>,
    category: Option<String>,
    image: Option<String>,
    #[serde(default)]
    published: bool,
}

async fn create_article(
    State(state): State<AppState>,
    Json(payload): Json<CreateArticlePayload>,
) -> ApiResult<Json<serde_json::Value>> {
    let title = require_text(payload.title, "title")?;
    let content = require_text(payload.content, "content")?;
    let author = require_text(payload.author, "author")?;
    let date = require_text(payload.date, "date")?;
    let category = require_text(payload.category, "category")?;

    let excerpt = match payload.excerpt.as_deref().map(str::trim) {
        Some(excerpt) if !excerpt.is_empty() => excerpt.to_string(),
        _ => derive_excerpt(&content),
    };

    let now = Utc::now();
    let active = NewsActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        title: Set(title),
        excerpt: Set(excerpt),
        content: Set(content),
        author: Set(author),
        date: Set(date),
        category: Set(category),
        image: Set(normalize_image(payload.image)),
        published: Set(payload.published),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let model = active.insert(&state.db).await?;
    Ok(Json(json!({ "success": true, "news": model })))
}

#[derive(Debug, Deserialize)]
struct UpdateArticlePayload {
    id: Option<String>,
    title: Option<String>,
    excerpt: Option<String>,
    content: Option<String>,
    author: Option<String>,
    date: Option<String>,
    category: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    image: Option<Option<String>>,
    published: Option<bool>,
}

async fn update_article(
    State(state): State<AppState>,
    Json(payload): Json<UpdateArticlePayload>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::validation("missing id"))?;
    let existing = NewsEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("news article not found"))?;

    let new_image = match &payload.image {
        Some(value) => normalize_image(value.clone()),
        None => existing.image.clone(),
    };
    if let Some(old) = existing.image.as_deref() {
        if Some(old) != new_image.as_deref() {
            state.storage.delete_url(old).await;
        }
    }

    let mut active: NewsActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(excerpt) = payload.excerpt {
        active.excerpt = Set(excerpt);
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(author) = payload.author {
        active.author = Set(author);
    }
    if let Some(date) = payload.date {
        active.date = Set(date);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if payload.image.is_some() {
        active.image = Set(new_image);
    }
    if let Some(published) = payload.published {
        active.published = Set(published);
    }
    active.updated_at = Set(Utc::now());
    let model = active.update(&state.db).await?;
    Ok(Json(json!({ "success": true, "news": model })))
}

#[derive(Debug, Deserialize)]
struct DeleteArticlePayload {
    id: Option<String>,
}

async fn delete_article(
    State(state): State<AppState>,
    Json(payload): Json<DeleteArticlePayload>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::validation("missing id"))?;
    let existing = NewsEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("news article not found"))?;

    if let Some(image) = existing.image.as_deref() {
        state.storage.delete_url(image).await;
    }
    existing.delete(&state.db).await?;
    Ok(Json(json!({ "success": true })))
}

/// First 150 characters of the content with a trailing ellipsis, matching
/// the substring semantics the site has always shipped with (the suffix is
/// appended even when the content is shorter than the window).
fn derive_excerpt(content: &str) -> String {
    let mut excerpt: String = content.chars().take(EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

fn require_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation(format!("{} is required", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates_long_content() {
        let content = "x".repeat(400);
        let excerpt = derive_excerpt(&content);
        assert_eq!(excerpt.len(), EXCERPT_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn excerpt_keeps_short_content_with_suffix() {
        let content = "C".repeat(40);
        assert_eq!(derive_excerpt(&content), format!("{}...", content));
    }

    #[test]
    fn excerpt_counts_chars_not_bytes() {
        let content = "ў".repeat(200);
        let excerpt = derive_excerpt(&content);
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
    }
}
