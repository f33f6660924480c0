use std::sync::Arc;

use axum::{
    extract::Query,
    middleware,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{careerdb::CareerExt, chatdb::ChatExt, userdb::UserExt},
    dtos::userdtos::*,
    error::{ErrorMessage, HttpError},
    middleware::{role_check, JWTAuthMiddeware},
    models::{careermodels::ProjectStatus, usermodel::UserRole},
    utils::password,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/profile", put(update_profile))
        .route("/avatar", put(update_avatar))
        .route("/password", put(update_password))
        .route(
            "/freelancer-profile",
            get(get_freelancer_profile).put(update_freelancer_profile),
        )
        .route(
            "/dashboard",
            get(freelancer_dashboard).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Freelancer, UserRole::Admin])
            })),
        )
        .route(
            "/admin/users",
            get(get_users_admin).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
}

pub async fn get_me(
    Extension(_app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let filtered_user = FilterUserDto::filter_user(&user.user);

    let response_data = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: filtered_user,
        },
    };

    Ok(Json(response_data))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateUserProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let updated = app_state
        .db_client
        .update_user_profile(user.user.id, body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated),
        },
    }))
}

pub async fn update_avatar(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<AvatarUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let updated = app_state
        .db_client
        .update_user_avatar(user.user.id, body.avatar_url)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated),
        },
    }))
}

pub async fn update_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UserPasswordUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let old_password_matches = password::compare(&body.old_password, &user.user.password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !old_password_matches {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    let hashed_password =
        password::hash(body.new_password).map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .update_user_password(user.user.id, hashed_password)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(Response {
        status: "success",
        message: "Password updated successfully".to_string(),
    }))
}

pub async fn get_freelancer_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    if !user.user.is_freelancer() && !user.user.is_admin() {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            axum::http::StatusCode::FORBIDDEN,
        ));
    }

    let profile = app_state
        .db_client
        .get_or_create_freelancer_profile(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let skills = profile.skills_list();

    Ok(Json(FreelancerProfileResponseDto {
        status: "success".to_string(),
        data: FreelancerProfileData { profile, skills },
    }))
}

pub async fn update_freelancer_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<FreelancerProfileUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    if !user.user.is_freelancer() && !user.user.is_admin() {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            axum::http::StatusCode::FORBIDDEN,
        ));
    }

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // The profile row must exist before an update can land on it.
    app_state
        .db_client
        .get_or_create_freelancer_profile(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let profile = app_state
        .db_client
        .update_freelancer_profile(user.user.id, body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let skills = profile.skills_list();

    Ok(Json(FreelancerProfileResponseDto {
        status: "success".to_string(),
        data: FreelancerProfileData { profile, skills },
    }))
}

pub async fn freelancer_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .db_client
        .get_or_create_freelancer_profile(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_projects = app_state
        .db_client
        .count_projects_for_profile(user.user.id, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let active_projects = app_state
        .db_client
        .count_projects_for_profile(user.user.id, Some(ProjectStatus::Published))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let completed_projects = app_state
        .db_client
        .count_projects_for_profile(user.user.id, Some(ProjectStatus::Completed))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let unread_messages = app_state
        .db_client
        .get_unread_count(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let stats = DashboardStats {
        total_projects,
        active_projects,
        completed_projects,
        total_earnings: profile.total_earnings.clone(),
        unread_messages,
    };

    let recent_projects = app_state
        .db_client
        .list_projects_by_freelancer(user.user.id, false, 5)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let recent_rooms = app_state
        .db_client
        .get_user_rooms(user.user.id, 5, 0)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "stats": stats,
        "profile": profile,
        "recent_projects": recent_projects,
        "recent_rooms": recent_rooms,
    })))
}

pub async fn get_users_admin(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);
    let offset = (page - 1) * limit;

    let users = app_state
        .db_client
        .get_users(limit as i64, offset as i64)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user_count = app_state
        .db_client
        .user_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        users: FilterUserDto::filter_users(&users),
        results: user_count,
    }))
}
