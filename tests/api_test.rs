mod common;

use anyhow::Result;
use common::spawn_app;
use serde_json::{Value, json};
use std::collections::HashMap;

#[tokio::test]
async fn settings_round_trip_stringifies_values() -> Result<()> {
    let app = spawn_app().await?;

    let resp = app
        .http
        .post(app.url("/api/settings"))
        .json(&json!({
            "settings": {
                "siteName": "Royal Academy",
                "enableDarkMode": true,
                "enableAnimations": false,
                "customBadge": 7,
            }
        }))
        .send()
        .await?;
    assert!(resp.status().is_success());

    let fetched: HashMap<String, String> = app
        .http
        .get(app.url("/api/settings"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched.get("siteName").map(String::as_str), Some("Royal Academy"));
    // Booleans travel as the literal strings the client coerces back.
    assert_eq!(fetched.get("enableDarkMode").map(String::as_str), Some("true"));
    assert_eq!(fetched.get("enableAnimations").map(String::as_str), Some("false"));
    assert_eq!(fetched.get("customBadge").map(String::as_str), Some("7"));

    // Writing the same key again upserts instead of duplicating.
    app.http
        .post(app.url("/api/settings"))
        .json(&json!({ "settings": { "siteName": "Ummez Academy" } }))
        .send()
        .await?
        .error_for_status()?;
    let fetched: HashMap<String, String> = app.get_json("/api/settings").await?.as_object().map(|m| {
        m.iter()
            .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
            .collect()
    }).unwrap_or_default();
    assert_eq!(fetched.get("siteName").map(String::as_str), Some("Ummez Academy"));
    Ok(())
}

#[tokio::test]
async fn statistics_are_seeded_updated_and_reset() -> Result<()> {
    let app = spawn_app().await?;

    let seeded = app.get_json("/api/statistics").await?;
    let seeded = seeded.as_array().unwrap();
    assert_eq!(seeded.len(), 5);
    assert_eq!(seeded[0]["key"], "students");
    assert_eq!(seeded[0]["value"], 850);
    assert_eq!(seeded[0]["suffix"], "+");

    // POST updates known keys and ignores everything else.
    let updated: Value = app
        .http
        .post(app.url("/api/statistics"))
        .json(&json!({ "students": 900, "teachers": 50, "bogus": 1 }))
        .send()
        .await?
        .json()
        .await?;
    let updated = updated.as_array().unwrap();
    assert_eq!(updated.len(), 5, "row set never grows");
    assert_eq!(updated[0]["value"], 900);
    assert_eq!(updated[1]["value"], 50);

    // PUT restores the hardcoded defaults.
    let reset: Value = app
        .http
        .put(app.url("/api/statistics"))
        .send()
        .await?
        .json()
        .await?;
    let reset = reset.as_array().unwrap();
    assert_eq!(reset[0]["value"], 850);
    assert_eq!(reset[1]["value"], 45);
    Ok(())
}

#[tokio::test]
async fn hero_slide_upload_and_image_supersession() -> Result<()> {
    let app = spawn_app().await?;

    // Validation: a slide needs a title and subtitle.
    let resp = app
        .http
        .post(app.url("/api/hero"))
        .json(&json!({ "title": "  " }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let first_url = upload(&app, "/api/hero/upload", "first.jpg", b"first-image").await?;
    assert_eq!(first_url, format!("{}/uploads/first.jpg", app.base_url));

    let slide: Value = app
        .http
        .post(app.url("/api/hero"))
        .json(&json!({ "title": "Welcome", "subtitle": "Enrol today", "image": first_url }))
        .send()
        .await?
        .json()
        .await?;
    let id = slide["id"].as_i64().unwrap();

    // Replacing the image deletes the superseded blob before the row update.
    let second_url = upload(&app, "/api/hero/upload", "second.jpg", b"second-image").await?;
    app.http
        .put(app.url("/api/hero"))
        .json(&json!({ "id": id, "image": second_url }))
        .send()
        .await?
        .error_for_status()?;
    assert!(app.state.storage.read("uploads/first.jpg").await.is_err());
    assert!(app.state.storage.read("uploads/second.jpg").await.is_ok());
    assert_eq!(app.state.storage.list_uploads().await?.len(), 1);

    // An update that keeps the image (field absent) deletes nothing.
    app.http
        .put(app.url("/api/hero"))
        .json(&json!({ "id": id, "title": "Still welcome" }))
        .send()
        .await?
        .error_for_status()?;
    assert!(app.state.storage.read("uploads/second.jpg").await.is_ok());

    // Deleting the slide removes its blob too.
    app.http
        .delete(app.url("/api/hero"))
        .json(&json!({ "id": id }))
        .send()
        .await?
        .error_for_status()?;
    assert!(app.state.storage.read("uploads/second.jpg").await.is_err());

    let slides = app.get_json("/api/hero").await?;
    assert!(slides.as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn explicit_null_clears_hero_image_without_replacement() -> Result<()> {
    let app = spawn_app().await?;

    let url = upload(&app, "/api/hero/upload", "clearme.png", b"pixels").await?;
    let slide: Value = app
        .http
        .post(app.url("/api/hero"))
        .json(&json!({ "title": "t", "subtitle": "s", "image": url }))
        .send()
        .await?
        .json()
        .await?;
    let id = slide["id"].as_i64().unwrap();

    let updated: Value = app
        .http
        .put(app.url("/api/hero"))
        .json(&json!({ "id": id, "image": null }))
        .send()
        .await?
        .json()
        .await?;
    assert!(updated["image"].is_null());
    assert!(app.state.storage.read("uploads/clearme.png").await.is_err());
    Ok(())
}

#[tokio::test]
async fn teacher_lifecycle_and_tag_deletion_do_not_cascade() -> Result<()> {
    let app = spawn_app().await?;

    let tag: Value = app
        .http
        .post(app.url("/api/teacher-tags"))
        .json(&json!({ "name": "Mathematics" }))
        .send()
        .await?
        .json()
        .await?;
    let tag_id = tag["id"].as_i64().unwrap();
    assert_eq!(tag["color"], "#64748b", "missing color falls back to the default");

    let image_url = upload(&app, "/api/hero/upload", "portrait.jpg", b"portrait").await?;
    let teacher: Value = app
        .http
        .post(app.url("/api/teachers"))
        .json(&json!({
            "name": "A. Karimov",
            "tagId": tag_id,
            "description": "Teaches algebra and geometry.",
            "image": image_url,
        }))
        .send()
        .await?
        .json()
        .await?;
    let teacher_id = teacher["id"].as_i64().unwrap();

    // Deleting the tag leaves the teacher row behind with a dangling tag_id.
    app.http
        .delete(app.url("/api/teacher-tags"))
        .json(&json!({ "id": tag_id }))
        .send()
        .await?
        .error_for_status()?;
    let teachers = app.get_json("/api/teachers").await?;
    assert_eq!(teachers.as_array().unwrap().len(), 1);
    assert_eq!(teachers[0]["tag_id"].as_i64(), Some(tag_id));

    // Deleting the teacher attempts the blob delete as well.
    app.http
        .delete(app.url("/api/teachers"))
        .json(&json!({ "id": teacher_id }))
        .send()
        .await?
        .error_for_status()?;
    assert!(app.state.storage.read("uploads/portrait.jpg").await.is_err());
    Ok(())
}

#[tokio::test]
async fn news_excerpt_is_derived_and_single_fetch_works() -> Result<()> {
    let app = spawn_app().await?;

    // Missing required fields are rejected.
    let resp = app
        .http
        .post(app.url("/api/news"))
        .json(&json!({ "title": "No author" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let content = "c".repeat(400);
    let created: Value = app
        .http
        .post(app.url("/api/news"))
        .json(&json!({
            "title": "Term starts",
            "content": content,
            "author": "Admin",
            "date": "2025-09-01",
            "category": "announcements",
        }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(created["success"], true);
    let article = &created["news"];
    let excerpt = article["excerpt"].as_str().unwrap();
    assert_eq!(excerpt.chars().count(), 153);
    assert!(excerpt.ends_with("..."));
    let id = article["id"].as_str().unwrap().to_string();

    let single = app.get_json(&format!("/api/news?id={}", id)).await?;
    assert_eq!(single["title"], "Term starts");

    let missing = app
        .http
        .get(app.url("/api/news?id=no-such-article"))
        .send()
        .await?;
    assert_eq!(missing.status(), 404);

    // Publish toggle via partial PUT.
    let updated: Value = app
        .http
        .put(app.url("/api/news"))
        .json(&json!({ "id": id, "published": true }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(updated["news"]["published"], true);
    assert_eq!(updated["news"]["excerpt"].as_str(), Some(excerpt), "untouched fields survive");

    app.http
        .delete(app.url("/api/news"))
        .json(&json!({ "id": id }))
        .send()
        .await?
        .error_for_status()?;
    let remaining = app.get_json("/api/news").await?;
    assert!(remaining.as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn about_save_upserts_without_duplicating_sections() -> Result<()> {
    let app = spawn_app().await?;

    let payload = json!({
        "sections": [
            { "section": "mission", "title": "Our mission", "content": "First version", "order": 0 },
        ],
        "achievements": [
            { "year": "2022", "title": "First graduating class", "description": "", "order": 0 },
        ],
    });
    app.http
        .post(app.url("/api/about"))
        .json(&payload)
        .send()
        .await?
        .error_for_status()?;

    // Saving the same slug again without an id updates in place.
    app.http
        .post(app.url("/api/about"))
        .json(&json!({
            "sections": [
                { "section": "mission", "title": "Our mission", "content": "Second version" },
            ],
        }))
        .send()
        .await?
        .error_for_status()?;

    let about = app.get_json("/api/about").await?;
    let sections = about["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["content"], "Second version");

    let achievements = about["achievements"].as_array().unwrap();
    assert_eq!(achievements.len(), 1);
    let achievement_id = achievements[0]["id"].as_i64().unwrap();

    // An unknown id inserts a fresh row instead of failing.
    app.http
        .post(app.url("/api/about"))
        .json(&json!({
            "achievements": [
                { "id": achievement_id, "year": "2022", "title": "First graduating class", "description": "updated" },
                { "year": "2023", "title": "Olympiad win", "description": "" },
            ],
        }))
        .send()
        .await?
        .error_for_status()?;
    let about = app.get_json("/api/about").await?;
    assert_eq!(about["achievements"].as_array().unwrap().len(), 2);

    // DELETE removes exactly the addressed achievement.
    app.http
        .delete(app.url("/api/about"))
        .json(&json!({ "achievementId": achievement_id }))
        .send()
        .await?
        .error_for_status()?;
    let about = app.get_json("/api/about").await?;
    let achievements = about["achievements"].as_array().unwrap();
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0]["title"], "Olympiad win");

    let missing = app
        .http
        .delete(app.url("/api/about"))
        .json(&json!({ "achievementId": achievement_id }))
        .send()
        .await?;
    assert_eq!(missing.status(), 404);
    Ok(())
}

#[tokio::test]
async fn login_issues_verifiable_session_cookie() -> Result<()> {
    let app = spawn_app().await?;

    let rejected = app
        .http
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(rejected.status(), 400);

    let resp = app
        .http
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": "admin", "password": "school-secret" }))
        .send()
        .await?
        .error_for_status()?;
    let cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("academy_session="));

    let session = app
        .http
        .get(app.url("/api/auth/session"))
        .header("cookie", &cookie)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(session["authenticated"], true);

    // No cookie, no session.
    let anonymous = app.get_json("/api/auth/session").await?;
    assert_eq!(anonymous["authenticated"], false);

    // A tampered signature is rejected.
    let forged = format!("{}x", cookie);
    let session = app
        .http
        .get(app.url("/api/auth/session"))
        .header("cookie", &forged)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(session["authenticated"], false);
    Ok(())
}

#[tokio::test]
async fn local_uploads_are_served_over_http() -> Result<()> {
    let app = spawn_app().await?;

    let url = upload(&app, "/api/hero/upload", "banner.png", b"png-bytes").await?;
    let served = app.http.get(&url).send().await?;
    assert!(served.status().is_success());
    assert_eq!(served.bytes().await?.as_ref(), b"png-bytes");
    Ok(())
}

async fn upload(
    app: &common::TestApp,
    path: &str,
    file_name: &str,
    bytes: &'static [u8],
) -> Result<String> {
    let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
    let form = reqwest::multipart::Form::new().part("file", part);
    let resp: Value = app
        .http
        .post(app.url(path))
        .multipart(form)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(resp["url"].as_str().unwrap().to_string())
}
