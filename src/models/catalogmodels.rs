use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "release_channel", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReleaseChannel {
    Test,
    #[default]
    Stable,
}

impl ReleaseChannel {
    pub fn to_str(&self) -> &str {
        match self {
            ReleaseChannel::Test => "test",
            ReleaseChannel::Stable => "stable",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Application {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub description_markdown: String,
    pub category_id: Uuid,
    // Comma separated
    pub tags: String,
    pub image_url: Option<String>,
    pub screenshot1_url: Option<String>,
    pub screenshot2_url: Option<String>,
    pub screenshot3_url: Option<String>,
    pub pdf_url: Option<String>,
    pub youtube_url: Option<String>,
    pub is_active: bool,
    pub view_count: i32,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn tags_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn screenshots(&self) -> Vec<&str> {
        [
            self.screenshot1_url.as_deref(),
            self.screenshot2_url.as_deref(),
            self.screenshot3_url.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Rewrite a watch URL into the embeddable form. Handles both
    /// `youtube.com/watch?v=` and `youtu.be/` links.
    pub fn youtube_embed_url(&self) -> Option<String> {
        let url = self.youtube_url.as_deref()?;
        if let Some(rest) = url.split("watch?v=").nth(1) {
            let video_id = rest.split('&').next()?;
            return Some(format!("https://www.youtube.com/embed/{}", video_id));
        }
        if let Some(rest) = url.split("youtu.be/").nth(1) {
            let video_id = rest.split('?').next()?;
            return Some(format!("https://www.youtube.com/embed/{}", video_id));
        }
        None
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Release {
    pub id: Uuid,
    pub application_id: Uuid,
    pub version: String,
    pub channel: ReleaseChannel,
    pub file_path: String,
    pub file_size: i64,
    pub sha256: String,
    pub changelog_markdown: Option<String>,
    pub is_active: bool,
    pub download_count: i32,

    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

impl Release {
    pub fn file_size_mb(&self) -> f64 {
        (self.file_size as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_youtube(url: Option<&str>) -> Application {
        Application {
            id: Uuid::new_v4(),
            title: "Demo".to_string(),
            slug: "demo".to_string(),
            short_description: "".to_string(),
            description_markdown: "".to_string(),
            category_id: Uuid::new_v4(),
            tags: "cli, tools".to_string(),
            image_url: None,
            screenshot1_url: Some("a.png".to_string()),
            screenshot2_url: None,
            screenshot3_url: Some("c.png".to_string()),
            pdf_url: None,
            youtube_url: url.map(|s| s.to_string()),
            is_active: true,
            view_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn youtube_embed_from_watch_url() {
        let app = app_with_youtube(Some("https://www.youtube.com/watch?v=abc123&t=10"));
        assert_eq!(
            app.youtube_embed_url().as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
    }

    #[test]
    fn youtube_embed_from_short_url() {
        let app = app_with_youtube(Some("https://youtu.be/xyz789?si=foo"));
        assert_eq!(
            app.youtube_embed_url().as_deref(),
            Some("https://www.youtube.com/embed/xyz789")
        );
    }

    #[test]
    fn youtube_embed_absent_or_unrecognized() {
        assert_eq!(app_with_youtube(None).youtube_embed_url(), None);
        assert_eq!(
            app_with_youtube(Some("https://vimeo.com/1")).youtube_embed_url(),
            None
        );
    }

    #[test]
    fn screenshots_skip_missing_slots() {
        let app = app_with_youtube(None);
        assert_eq!(app.screenshots(), vec!["a.png", "c.png"]);
    }

    #[test]
    fn file_size_in_megabytes() {
        let release = Release {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            version: "1.0.0".to_string(),
            channel: ReleaseChannel::Stable,
            file_path: "demo-1.0.0.exe".to_string(),
            file_size: 5 * 1024 * 1024 + 512 * 1024,
            sha256: "0".repeat(64),
            changelog_markdown: None,
            is_active: true,
            download_count: 0,
            published_at: Utc::now(),
        };
        assert_eq!(release.file_size_mb(), 5.5);
    }
}
