use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::catalogmodels::*;

#[derive(Serialize, Deserialize, Validate, Default)]
pub struct ApplicationListQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateApplicationDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = 500, message = "Short description is required"))]
    pub short_description: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description_markdown: String,

    pub category_id: Uuid,

    // Comma separated list
    pub tags: Option<String>,

    #[validate(url(message = "YouTube URL must be a valid URL"))]
    pub youtube_url: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateReleaseDto {
    #[validate(length(min = 1, max = 50, message = "Version is required"))]
    pub version: String,

    pub channel: ReleaseChannel,

    /// Path of the uploaded archive, relative to the releases directory.
    #[validate(length(min = 1, message = "File path is required"))]
    pub file_path: String,

    pub changelog_markdown: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationListResponseDto {
    pub status: String,
    pub applications: Vec<Application>,
    pub categories: Vec<Category>,
    pub results: i64,
}

#[derive(Debug, Serialize)]
pub struct ApplicationDetailResponseDto {
    pub status: String,
    pub application: Application,
    pub tags: Vec<String>,
    pub screenshots: Vec<String>,
    pub youtube_embed_url: Option<String>,
    pub releases: Vec<Release>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponseDto {
    pub status: String,
    pub application: Application,
}

#[derive(Debug, Serialize)]
pub struct ReleaseResponseDto {
    pub status: String,
    pub release: Release,
}
