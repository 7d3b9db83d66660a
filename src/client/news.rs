use super::{Api, HookState};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub date: String,
    pub category: String,
    pub image: Option<String>,
    pub published: bool,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct NewsDraft {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub author: String,
    pub date: String,
    pub category: String,
    pub image: Option<String>,
}

pub struct NewsHook {
    api: Api,
    pub state: HookState,
    pub articles: Vec<NewsArticle>,
    /// Per-article busy flags so concurrent publish toggles for different
    /// ids do not clobber each other's spinner state.
    pub busy: HashMap<String, bool>,
    pub last_error: Option<String>,
}

impl NewsHook {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: HookState::Idle,
            articles: Vec::new(),
            busy: HashMap::new(),
            last_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = HookState::Loading;
        match self.api.get_json::<Vec<NewsArticle>>("/api/news").await {
            Ok(fetched) => {
                self.articles = fetched;
                self.state = HookState::Ready;
                self.last_error = None;
            }
            Err(err) => {
                warn!("failed to load news: {}", err);
                self.state = HookState::Error;
                self.last_error = Some(err.to_string());
            }
        }
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.busy.get(id).copied().unwrap_or(false)
    }

    pub async fn add(&mut self, draft: &NewsDraft) -> Result<()> {
        let result = self.api.post_json("/api/news", draft).await;
        match result {
            Ok(()) => {
                self.load().await;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn update(&mut self, article: &NewsArticle) -> Result<()> {
        self.busy.insert(article.id.clone(), true);
        let result = self.api.put_json("/api/news", article).await;
        self.busy.insert(article.id.clone(), false);
        match result {
            Ok(()) => {
                self.load().await;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn toggle_published(&mut self, id: &str) -> Result<()> {
        let published = self
            .articles
            .iter()
            .find(|a| a.id == id)
            .map(|a| !a.published)
            .unwrap_or(true);

        self.busy.insert(id.to_string(), true);
        let result = self
            .api
            .put_json("/api/news", &json!({ "id": id, "published": published }))
            .await;
        self.busy.insert(id.to_string(), false);
        match result {
            Ok(()) => {
                self.load().await;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.busy.insert(id.to_string(), true);
        let result = self.api.delete_json("/api/news", &json!({ "id": id })).await;
        self.busy.insert(id.to_string(), false);
        match result {
            Ok(()) => {
                self.load().await;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
