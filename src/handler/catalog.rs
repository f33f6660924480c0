use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query},
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use sha2::{Digest, Sha256};
use tokio_util::io::ReaderStream;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::catalogdb::CatalogExt,
    dtos::catalogdtos::*,
    error::HttpError,
    middleware::{auth, role_check},
    models::usermodel::UserRole,
    AppState,
};

pub fn catalog_handler() -> Router {
    let admin_routes = Router::new()
        .route("/applications", post(create_application))
        .route("/applications/:slug/releases", post(create_release))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
        .layer(middleware::from_fn(auth));

    Router::new()
        .route("/applications", get(list_applications))
        .route("/applications/:slug", get(application_detail))
        .route("/downloads/:release_id", get(download_release))
        .nest("/admin", admin_routes)
}

pub async fn list_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<ApplicationListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(12);
    let offset = (page - 1) * limit;

    let applications = app_state
        .db_client
        .list_applications(
            query.search.as_deref(),
            query.category.as_deref(),
            limit as i64,
            offset as i64,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = app_state
        .db_client
        .count_applications(query.search.as_deref(), query.category.as_deref())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let categories = app_state
        .db_client
        .get_catalog_categories(true)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApplicationListResponseDto {
        status: "success".to_string(),
        applications,
        categories,
        results,
    }))
}

pub async fn application_detail(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let application = app_state
        .db_client
        .get_application_by_slug(&slug, true)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Application not found"))?;

    app_state
        .db_client
        .increment_application_views(application.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let releases = app_state
        .db_client
        .get_releases(application.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let tags = application.tags_list();
    let screenshots = application
        .screenshots()
        .into_iter()
        .map(String::from)
        .collect();
    let youtube_embed_url = application.youtube_embed_url();

    Ok(Json(ApplicationDetailResponseDto {
        status: "success".to_string(),
        application,
        tags,
        screenshots,
        youtube_embed_url,
        releases,
    }))
}

/// Streams the release archive from disk and counts the download.
pub async fn download_release(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(release_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let release = app_state
        .db_client
        .get_release(release_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Release not found"))?;

    if !release.is_active {
        return Err(HttpError::not_found("Release not found"));
    }

    let file_path = resolve_release_path(&app_state.env.releases_dir, &release.file_path)
        .ok_or_else(|| HttpError::bad_request("Invalid release path"))?;

    let application = app_state
        .db_client
        .get_application_by_id(release.application_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Application not found"))?;

    let file = tokio::fs::File::open(&file_path)
        .await
        .map_err(|_| HttpError::not_found("Release file is missing"))?;

    app_state
        .db_client
        .increment_download_count(release.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Downloads are named after the application and version, not the path
    // the file happens to be stored under.
    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let file_name = format!("{}-{}{}", application.slug, release.version, extension);

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
        (header::CONTENT_LENGTH, release.file_size.to_string()),
    ];

    Ok((headers, body))
}

pub async fn create_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateApplicationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let application = app_state
        .db_client
        .create_application(
            body.title,
            body.short_description,
            body.description_markdown,
            body.category_id,
            body.tags.unwrap_or_default(),
            body.youtube_url,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponseDto {
            status: "success".to_string(),
            application,
        }),
    ))
}

/// Registers an uploaded archive as a release. Size and checksum are computed
/// from the file on disk, never trusted from the request.
pub async fn create_release(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(body): Json<CreateReleaseDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let application = app_state
        .db_client
        .get_application_by_slug(&slug, false)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Application not found"))?;

    let file_path = resolve_release_path(&app_state.env.releases_dir, &body.file_path)
        .ok_or_else(|| HttpError::bad_request("Invalid release path"))?;

    let contents = tokio::fs::read(&file_path)
        .await
        .map_err(|_| HttpError::bad_request("Release file not found on disk"))?;

    let file_size = contents.len() as i64;
    let sha256 = hex::encode(Sha256::digest(&contents));

    let release = app_state
        .db_client
        .create_release(
            application.id,
            body.version,
            body.channel,
            body.file_path,
            file_size,
            sha256,
            body.changelog_markdown,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ReleaseResponseDto {
            status: "success".to_string(),
            release,
        }),
    ))
}

/// Joins a stored relative path onto the releases directory, rejecting
/// absolute paths and parent-directory components.
fn resolve_release_path(releases_dir: &str, relative: &str) -> Option<PathBuf> {
    let relative_path = FsPath::new(relative);

    if relative_path.is_absolute() {
        return None;
    }

    for component in relative_path.components() {
        match component {
            Component::Normal(_) => {}
            _ => return None,
        }
    }

    Some(FsPath::new(releases_dir).join(relative_path))
}

#[cfg(test)]
mod tests {
    use super::resolve_release_path;

    #[test]
    fn resolves_plain_relative_paths() {
        let path = resolve_release_path("media/releases", "app/v1.0.0.zip").unwrap();
        assert_eq!(path, std::path::Path::new("media/releases/app/v1.0.0.zip"));
    }

    #[test]
    fn rejects_parent_traversal() {
        assert!(resolve_release_path("media/releases", "../secrets.txt").is_none());
        assert!(resolve_release_path("media/releases", "a/../../b.zip").is_none());
    }

    #[test]
    fn rejects_absolute_paths() {
        assert!(resolve_release_path("media/releases", "/etc/passwd").is_none());
    }
}
