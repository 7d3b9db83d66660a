use crate::app::AppState;
use crate::content::STATISTIC_DEFAULTS;
use crate::error::ApiResult;
use crate::models::statistic::{
    ActiveModel as StatisticActiveModel, Column as StatisticColumn, Entity as StatisticEntity,
    Model as StatisticModel,
};
use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::collections::HashMap;

pub fn urls() -> Router<AppState> {
    Router::new().route(
        "/statistics",
        get(get_statistics)
            .post(update_statistics)
            .put(reset_statistics),
    )
}

async fn load_all(state: &AppState) -> ApiResult<Vec<StatisticModel>> {
    let rows = StatisticEntity::find()
        .order_by_asc(StatisticColumn::Id)
        .all(&state.db)
        .await?;
    Ok(rows)
}

async fn get_statistics(State(state): State<AppState>) -> ApiResult<Json<Vec<StatisticModel>>> {
    Ok(Json(load_all(&state).await?))
}

#[derive(Debug, Deserialize)]
struct UpdateStatisticsPayload {
    #[serde(flatten)]
    values: HashMap<String, i32>,
}

/// POST /api/statistics — single upsert-by-key path. Keys outside the seeded
/// set are ignored; the row set itself never changes through the API.
async fn update_statistics(
    State(state): State<AppState>,
    Json(payload): Json<UpdateStatisticsPayload>,
) -> ApiResult<Json<Vec<StatisticModel>>> {
    for default in STATISTIC_DEFAULTS {
        let Some(value) = payload.values.get(default.key) else {
            continue;
        };
        let existing = StatisticEntity::find()
            .filter(StatisticColumn::Key.eq(default.key))
            .one(&state.db)
            .await?;
        match existing {
            Some(row) => {
                let mut active: StatisticActiveModel = row.into();
                active.value = Set(*value);
                active.update(&state.db).await?;
            }
            None => {
                // A missing seed row (e.g. wiped table) is recreated in place.
                let active = StatisticActiveModel {
                    key: Set(default.key.to_string()),
                    value: Set(*value),
                    label: Set(default.label.to_string()),
                    suffix: Set(default.suffix.to_string()),
                    ..Default::default()
                };
                active.insert(&state.db).await?;
            }
        }
    }
    Ok(Json(load_all(&state).await?))
}

/// PUT /api/statistics — unconditionally restore the five fixed keys to
/// their hardcoded defaults.
async fn reset_statistics(State(state): State<AppState>) -> ApiResult<Json<Vec<StatisticModel>>> {
    for default in STATISTIC_DEFAULTS {
        let existing = StatisticEntity::find()
            .filter(StatisticColumn::Key.eq(default.key))
            .one(&state.db)
            .await?;
        match existing {
            Some(row) => {
                let mut active: StatisticActiveModel = row.into();
                active.value = Set(default.value);
                active.label = Set(default.label.to_string());
                active.suffix = Set(default.suffix.to_string());
                active.update(&state.db).await?;
            }
            None => {
                let active = StatisticActiveModel {
                    key: Set(default.key.to_string()),
                    value: Set(default.value),
                    label: Set(default.label.to_string()),
                    suffix: Set(default.suffix.to_string()),
                    ..Default::default()
                };
                active.insert(&state.db).await?;
            }
        }
    }
    Ok(Json(load_all(&state).await?))
}
