use crate::app::AppState;
use crate::content::category_for_key;
use crate::error::ApiResult;
use crate::models::setting::{
    ActiveModel as SettingActiveModel, Column as SettingColumn, Entity as SettingEntity,
};
use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;

pub fn urls() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).post(save_settings))
}

#[derive(Debug, Deserialize)]
struct SaveSettingsPayload {
    #[serde(default)]
    settings: HashMap<String, JsonValue>,
}

/// GET /api/settings — the raw key/value map. Typed merging over defaults
/// happens client-side (see `content::merge_settings`).
async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<HashMap<String, String>>> {
    let rows = SettingEntity::find().all(&state.db).await?;
    let map = rows
        .into_iter()
        .map(|row| (row.key, row.value))
        .collect::<HashMap<_, _>>();
    Ok(Json(map))
}

/// POST /api/settings — per-key upsert. Existing keys get their value and
/// updated_at refreshed; new keys are inserted with a category computed from
/// the static key table. Keys are never deleted.
async fn save_settings(
    State(state): State<AppState>,
    Json(payload): Json<SaveSettingsPayload>,
) -> ApiResult<Json<JsonValue>> {
    let now = Utc::now();
    for (key, raw_value) in payload.settings {
        let value = stringify_setting_value(&raw_value);
        let existing = SettingEntity::find()
            .filter(SettingColumn::Key.eq(key.as_str()))
            .one(&state.db)
            .await?;

        match existing {
            Some(row) => {
                let mut active: SettingActiveModel = row.into();
                active.value = Set(value);
                active.category = Set(category_for_key(&key).to_string());
                active.updated_at = Set(now);
                active.update(&state.db).await?;
            }
            None => {
                let active = SettingActiveModel {
                    key: Set(key.clone()),
                    value: Set(value),
                    category: Set(category_for_key(&key).to_string()),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(&state.db).await?;
            }
        }
    }
    Ok(Json(json!({ "success": true })))
}

/// Booleans become the literals "true"/"false"; everything else is
/// stringified without surrounding quotes.
fn stringify_setting_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_serialize_as_literals() {
        assert_eq!(stringify_setting_value(&json!(true)), "true");
        assert_eq!(stringify_setting_value(&json!(false)), "false");
    }

    #[test]
    fn strings_keep_their_content() {
        assert_eq!(stringify_setting_value(&json!("Ummez")), "Ummez");
    }

    #[test]
    fn numbers_are_stringified() {
        assert_eq!(stringify_setting_value(&json!(42)), "42");
        assert_eq!(stringify_setting_value(&json!(2.5)), "2.5");
    }
}
