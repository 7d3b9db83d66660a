use crate::app::AppState;
use axum::Router;

pub mod about;
pub mod auth;
pub mod hero;
pub mod news;
pub mod settings;
pub mod statistics;
pub mod teacher_tags;
pub mod teachers;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::urls())
        .merge(settings::urls())
        .merge(statistics::urls())
        .merge(hero::urls())
        .merge(teachers::urls())
        .merge(teacher_tags::urls())
        .merge(news::urls())
        .merge(about::urls());

    Router::new().nest("/api", api).with_state(state)
}
