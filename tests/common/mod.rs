#![allow(dead_code)]

use academy_cms::app::{AppState, AppStateBuilder, create_router};
use academy_cms::config::{AdminConfig, Config};
use academy_cms::storage::StorageConfig;
use anyhow::Result;
use serde_json::Value;

pub struct TestApp {
    pub base_url: String,
    pub state: AppState,
    pub http: reqwest::Client,
    _storage_dir: tempfile::TempDir,
    _db_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json(&self, path: &str) -> Result<Value> {
        Ok(self.http.get(self.url(path)).send().await?.json().await?)
    }
}

/// Boot a full server on an ephemeral port with a file-backed sqlite
/// database and local blob storage, both in temp directories.
pub async fn spawn_app() -> Result<TestApp> {
    let _ = tracing_subscriber::fmt::try_init();

    let storage_dir = tempfile::tempdir()?;
    let db_dir = tempfile::tempdir()?;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let base_url = format!("http://{}", addr);

    let config = Config {
        http_addr: addr.to_string(),
        database_url: format!(
            "sqlite://{}/academy.sqlite3?mode=rwc",
            db_dir.path().display()
        ),
        public_base_url: base_url.clone(),
        storage: StorageConfig::Local {
            path: storage_dir.path().to_str().unwrap().to_string(),
        },
        admin: Some(AdminConfig {
            username: "admin".to_string(),
            password: "school-secret".to_string(),
            session_secret: Some("session-secret-for-tests".to_string()),
        }),
        ..Config::default()
    };

    let state = AppStateBuilder::new().config(config).build().await?;
    let app = create_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(TestApp {
        base_url,
        state,
        http: reqwest::Client::new(),
        _storage_dir: storage_dir,
        _db_dir: db_dir,
    })
}
