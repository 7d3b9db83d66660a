use super::{Api, HookState};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeroSlide {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub image: Option<String>,
    pub sort_order: i32,
    pub active: bool,
}

pub struct HeroHook {
    api: Api,
    pub state: HookState,
    pub slides: Vec<HeroSlide>,
    pub saving: bool,
    pub last_error: Option<String>,
}

impl HeroHook {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: HookState::Idle,
            slides: Vec::new(),
            saving: false,
            last_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = HookState::Loading;
        match self.api.get_json::<Vec<HeroSlide>>("/api/hero").await {
            Ok(fetched) => {
                self.slides = fetched;
                self.state = HookState::Ready;
                self.last_error = None;
            }
            Err(err) => {
                warn!("failed to load hero slides: {}", err);
                self.state = HookState::Error;
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Slides the public page actually renders, in display order.
    pub fn active_slides(&self) -> Vec<&HeroSlide> {
        let mut active: Vec<&HeroSlide> = self.slides.iter().filter(|s| s.active).collect();
        active.sort_by_key(|s| s.sort_order);
        active
    }

    /// Upload an image and get back its public URL. The URL is not attached
    /// to any slide until the caller saves it through add or update.
    pub async fn upload_image(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        match self.api.upload_file("/api/hero/upload", file_name, bytes).await {
            Ok(url) => Ok(url),
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn add(
        &mut self,
        title: &str,
        subtitle: &str,
        image: Option<&str>,
    ) -> Result<()> {
        self.saving = true;
        let result = self
            .api
            .post_json(
                "/api/hero",
                &json!({ "title": title, "subtitle": subtitle, "image": image }),
            )
            .await;
        self.finish_mutation(result).await
    }

    pub async fn update(&mut self, slide: &HeroSlide) -> Result<()> {
        self.saving = true;
        let body = json!({
            "id": slide.id,
            "title": slide.title,
            "subtitle": slide.subtitle,
            "image": slide.image,
            "order": slide.sort_order,
            "active": slide.active,
        });
        let result = self.api.put_json("/api/hero", &body).await;
        self.finish_mutation(result).await
    }

    pub async fn delete(&mut self, id: i64) -> Result<()> {
        self.saving = true;
        let result = self.api.delete_json("/api/hero", &json!({ "id": id })).await;
        self.finish_mutation(result).await
    }

    async fn finish_mutation(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                self.load().await;
                self.saving = false;
                Ok(())
            }
            Err(err) => {
                self.saving = false;
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_slides_filter_and_sort() {
        let mut hook = HeroHook::new(Api::new("http://localhost"));
        hook.slides = vec![
            HeroSlide {
                id: 1,
                title: "second".into(),
                subtitle: String::new(),
                image: None,
                sort_order: 2,
                active: true,
            },
            HeroSlide {
                id: 2,
                title: "hidden".into(),
                subtitle: String::new(),
                image: None,
                sort_order: 0,
                active: false,
            },
            HeroSlide {
                id: 3,
                title: "first".into(),
                subtitle: String::new(),
                image: None,
                sort_order: 1,
                active: true,
            },
        ];

        let titles: Vec<&str> = hook
            .active_slides()
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
