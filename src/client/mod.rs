//! Client-side state containers for the admin and public pages.
//!
//! Every hook follows the same contract: `load()` drives the
//! `Idle -> Loading -> Ready | Error` state machine and merges server data
//! over hardcoded defaults, mutations call the API and then refetch the full
//! collection, and a failed fetch falls back to defaults instead of leaving
//! an empty screen.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub mod about;
pub mod hero;
pub mod news;
pub mod settings;
pub mod statistics;
pub mod teachers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Thin JSON transport shared by all hooks.
#[derive(Clone)]
pub struct Api {
    base_url: String,
    http: reqwest::Client,
}

impl Api {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?
            .error_for_status()
            .with_context(|| format!("GET {} returned an error status", path))?;
        response
            .json()
            .await
            .with_context(|| format!("GET {} returned invalid JSON", path))
    }

    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?
            .error_for_status()
            .with_context(|| format!("POST {} returned an error status", path))?;
        Ok(())
    }

    pub async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.http
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("PUT {} failed", path))?
            .error_for_status()
            .with_context(|| format!("PUT {} returned an error status", path))?;
        Ok(())
    }

    pub async fn put_empty(&self, path: &str) -> Result<()> {
        self.http
            .put(self.url(path))
            .send()
            .await
            .with_context(|| format!("PUT {} failed", path))?
            .error_for_status()
            .with_context(|| format!("PUT {} returned an error status", path))?;
        Ok(())
    }

    pub async fn delete_json<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.http
            .delete(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("DELETE {} failed", path))?
            .error_for_status()
            .with_context(|| format!("DELETE {} returned an error status", path))?;
        Ok(())
    }

    pub async fn upload_file(&self, path: &str, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("upload to {} failed", path))?
            .error_for_status()
            .with_context(|| format!("upload to {} returned an error status", path))?;

        #[derive(serde::Deserialize)]
        struct UploadResponse {
            url: String,
        }
        let parsed: UploadResponse = response
            .json()
            .await
            .with_context(|| format!("upload to {} returned invalid JSON", path))?;
        Ok(parsed.url)
    }
}
