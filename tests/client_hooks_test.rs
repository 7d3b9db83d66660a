mod common;

use academy_cms::client::{Api, HookState};
use academy_cms::client::about::AboutHook;
use academy_cms::client::hero::HeroHook;
use academy_cms::client::news::{NewsDraft, NewsHook};
use academy_cms::client::settings::SettingsHook;
use academy_cms::client::statistics::StatisticsHook;
use academy_cms::client::teachers::TeachersHook;
use academy_cms::content::{ABOUT_SECTION_KEYS, SiteSettings};
use anyhow::Result;
use common::spawn_app;
use serde_json::json;
use std::collections::HashMap;

#[tokio::test]
async fn settings_hook_saves_and_reflects_the_store() -> Result<()> {
    let app = spawn_app().await?;
    let mut hook = SettingsHook::new(Api::new(app.base_url.as_str()));

    // An empty store renders as the defaults.
    hook.load().await;
    assert_eq!(hook.state, HookState::Ready);
    assert_eq!(hook.settings, SiteSettings::default());

    let mut edited = hook.settings.clone();
    edited.site_name = "Royal Academy".to_string();
    edited.enable_dark_mode = true;
    hook.save(&edited).await?;

    assert!(!hook.saving);
    assert_eq!(hook.settings.site_name, "Royal Academy");
    assert!(hook.settings.enable_dark_mode);
    Ok(())
}

#[tokio::test]
async fn settings_hook_falls_back_to_defaults_when_unreachable() {
    // Nothing listens on this port.
    let mut hook = SettingsHook::new(Api::new("http://127.0.0.1:1"));
    hook.load().await;
    assert_eq!(hook.state, HookState::Error);
    assert_eq!(hook.settings, SiteSettings::default());
    assert!(hook.last_error.is_some());
}

#[tokio::test]
async fn statistics_hook_saves_and_resets() -> Result<()> {
    let app = spawn_app().await?;
    let mut hook = StatisticsHook::new(Api::new(app.base_url.as_str()));

    hook.load().await;
    assert_eq!(hook.statistics.len(), 5);

    let mut values = HashMap::new();
    values.insert("students".to_string(), 1000);
    hook.save(&values).await?;
    let students = hook.statistics.iter().find(|s| s.key == "students").unwrap();
    assert_eq!(students.value, 1000);

    hook.reset().await?;
    let students = hook.statistics.iter().find(|s| s.key == "students").unwrap();
    assert_eq!(students.value, 850);
    Ok(())
}

#[tokio::test]
async fn news_hook_refetches_after_every_mutation() -> Result<()> {
    let app = spawn_app().await?;
    let mut hook = NewsHook::new(Api::new(app.base_url.as_str()));

    hook.add(&NewsDraft {
        title: "Open day".to_string(),
        content: "Doors open at nine.".to_string(),
        author: "Admin".to_string(),
        date: "2025-09-15".to_string(),
        category: "events".to_string(),
        ..Default::default()
    })
    .await?;
    assert_eq!(hook.articles.len(), 1);
    assert!(!hook.articles[0].published);
    let id = hook.articles[0].id.clone();

    hook.toggle_published(&id).await?;
    assert!(hook.articles[0].published);
    assert!(!hook.is_busy(&id));

    hook.delete(&id).await?;
    assert!(hook.articles.is_empty());
    Ok(())
}

#[tokio::test]
async fn hero_hook_uploads_then_saves_slides() -> Result<()> {
    let app = spawn_app().await?;
    let mut hook = HeroHook::new(Api::new(app.base_url.as_str()));

    let url = hook
        .upload_image("slide.jpg", b"image-bytes".to_vec())
        .await?;
    hook.add("Welcome", "Enrol today", Some(&url)).await?;
    assert_eq!(hook.slides.len(), 1);
    assert_eq!(hook.slides[0].image.as_deref(), Some(url.as_str()));

    let mut slide = hook.slides[0].clone();
    slide.active = false;
    hook.update(&slide).await?;
    assert!(hook.active_slides().is_empty());

    hook.delete(slide.id).await?;
    assert!(hook.slides.is_empty());
    Ok(())
}

#[tokio::test]
async fn teachers_hook_keeps_teachers_after_tag_delete() -> Result<()> {
    let app = spawn_app().await?;
    let mut hook = TeachersHook::new(Api::new(app.base_url.as_str()));

    hook.add_tag("Science", "#0f766e").await?;
    let tag_id = hook.tags[0].id;

    hook.add_teacher(&json!({
        "name": "B. Usmonova",
        "tagId": tag_id,
        "description": "Physics and astronomy.",
    }))
    .await?;
    assert_eq!(hook.resolve_tag(tag_id).0, "Science");

    hook.delete_tag(tag_id).await?;
    assert!(!hook.is_tag_busy(tag_id));
    assert_eq!(hook.teachers.len(), 1);
    // The teacher now points at a deleted tag and renders the fallback.
    assert_eq!(hook.resolve_tag(hook.teachers[0].tag_id).0, "Unknown");
    Ok(())
}

#[tokio::test]
async fn about_hook_replaces_temp_ids_on_save() -> Result<()> {
    let app = spawn_app().await?;
    let mut hook = AboutHook::new(Api::new(app.base_url.as_str()));

    hook.load().await;
    // An empty server still yields the full canonical section set.
    assert_eq!(hook.sections.len(), ABOUT_SECTION_KEYS.len());

    let temp_id = hook.add_achievement("2023", "Olympiad win", "Regional first place");
    assert!(temp_id < 0);

    hook.save().await?;
    assert_eq!(hook.achievements.len(), 1);
    let real_id = hook.achievements[0].id;
    assert!(real_id > 0, "refetch swaps the temporary id for the row id");

    // Sections were persisted too, so they now carry row ids.
    assert!(hook.sections.iter().all(|s| s.id.is_some()));

    // Deleting an unsaved entry never touches the server.
    let staged = hook.add_achievement("2024", "New campus", "");
    hook.delete_achievement(staged).await?;
    assert_eq!(hook.achievements.len(), 1);

    hook.delete_achievement(real_id).await?;
    assert!(hook.achievements.is_empty());
    Ok(())
}
