use crate::config::Config;
use crate::models;
use crate::storage::Storage;
use anyhow::Result;
use axum::Router;
use sea_orm::DatabaseConnection;
use sha2::{Digest, Sha256};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
};
use tracing::info;

pub struct AppStateInner {
    pub config: Arc<Config>,
    pub db: DatabaseConnection,
    pub storage: Storage,
    pub session_key: Arc<Vec<u8>>,
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateBuilder {
    config: Option<Config>,
    db: Option<DatabaseConnection>,
    storage: Option<Storage>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            db: None,
            storage: None,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn db(mut self, db: DatabaseConnection) -> Self {
        self.db = Some(db);
        self
    }

    pub fn storage(mut self, storage: Storage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub async fn build(self) -> Result<AppState> {
        let config = Arc::new(self.config.unwrap_or_default());

        let db = match self.db {
            Some(db) => db,
            None => models::create_db(&config.database_url).await?,
        };

        let storage = match self.storage {
            Some(storage) => storage,
            None => Storage::new(&config.storage, &config.public_base_url)?,
        };

        let session_secret = config
            .admin
            .as_ref()
            .and_then(|admin| admin.session_secret.clone())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let key_material: [u8; 32] = Sha256::digest(session_secret.as_bytes()).into();

        Ok(Arc::new(AppStateInner {
            config,
            db,
            storage,
            session_key: Arc::new(key_material.to_vec()),
        }))
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
            axum::http::header::ORIGIN,
        ]);

    let mut router = Router::new();

    // Local blob storage is served directly; remote stores hand out their
    // own URLs through public_base_url.
    if state.storage.is_local() {
        if let Some(uploads_root) = state.storage.local_path("uploads") {
            router = router.nest_service("/uploads", ServeDir::new(uploads_root));
        }
    }

    router.merge(crate::api::router(state)).layer(cors)
}

pub async fn run(state: AppState) -> Result<()> {
    let app = create_router(state.clone());
    let addr: SocketAddr = state.config.http_addr.parse()?;
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            return Err(anyhow::anyhow!("Failed to bind to {}: {}", addr, e));
        }
    };

    info!("Serving on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
