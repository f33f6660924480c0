use std::sync::Arc;

use axum::{
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use chrono::{Duration, Utc};
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::*,
    error::{ErrorMessage, HttpError},
    mail::mails::{send_verification_email, send_welcome_email},
    models::usermodel::UserRole,
    utils::{password, token, token_generator::generate_verification_token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify", get(verify_email))
        .route("/resend-verification", post(resend_verification_email))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing.is_some() {
        return Err(HttpError::unique_constraint_violation(
            ErrorMessage::EmailExist.to_string(),
        ));
    }

    let hashed_password =
        password::hash(body.password).map_err(|e| HttpError::server_error(e.to_string()))?;

    let verification_token = generate_verification_token();
    let expires_at = Utc::now() + Duration::hours(24);

    let role: UserRole = body.role.unwrap_or_default().into();

    let user = app_state
        .db_client
        .save_user(
            body.first_name,
            body.last_name,
            body.email,
            hashed_password,
            role,
            verification_token.clone(),
            expires_at,
        )
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                HttpError::unique_constraint_violation(ErrorMessage::EmailExist.to_string())
            }
            _ => HttpError::server_error(e.to_string()),
        })?;

    // Delivery failures must not fail registration; the token can be resent.
    let config = app_state.env.clone();
    let to_email = user.email.clone();
    let name = user.full_name();
    tokio::spawn(async move {
        if let Err(e) = send_verification_email(&config, &to_email, &name, &verification_token).await
        {
            tracing::warn!("Verification email to {} failed: {}", to_email, e);
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(Response {
            status: "success",
            message: "Registration successful! Please check your email to verify your account."
                .to_string(),
        }),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matches = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matches {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    if !user.verified {
        return Err(HttpError::unauthorized(
            "Please verify your email before logging in".to_string(),
        ));
    }

    // jwt_maxage is configured in minutes.
    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage * 60,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build cookie".to_string()))?,
    );

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
    });

    Ok((headers, response))
}

pub async fn verify_email(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(params): Query<VerifyEmailQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, None, Some(&params.token))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized("Invalid or expired verification token"))?;

    if let Some(expires_at) = user.token_expires_at {
        if Utc::now() > expires_at {
            return Err(HttpError::bad_request(
                "Verification token has expired. Please request a new one.".to_string(),
            ));
        }
    } else {
        return Err(HttpError::bad_request(
            "Invalid verification session".to_string(),
        ));
    }

    let user = app_state
        .db_client
        .verify_email(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let config = app_state.env.clone();
    let to_email = user.email.clone();
    let name = user.full_name();
    tokio::spawn(async move {
        if let Err(e) = send_welcome_email(&config, &to_email, &name).await {
            tracing::warn!("Welcome email to {} failed: {}", to_email, e);
        }
    });

    Ok(Json(Response {
        status: "success",
        message: "Email verified successfully. You can now log in.".to_string(),
    }))
}

pub async fn resend_verification_email(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ResendVerificationEmailDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("No account found with that email"))?;

    if user.verified {
        return Err(HttpError::bad_request(
            "This account is already verified".to_string(),
        ));
    }

    let verification_token = generate_verification_token();
    let expires_at = Utc::now() + Duration::hours(24);

    app_state
        .db_client
        .set_verification_token(user.id, verification_token.clone(), expires_at)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let config = app_state.env.clone();
    let to_email = user.email.clone();
    let name = user.full_name();
    tokio::spawn(async move {
        if let Err(e) = send_verification_email(&config, &to_email, &name, &verification_token).await
        {
            tracing::warn!("Verification email to {} failed: {}", to_email, e);
        }
    });

    Ok(Json(Response {
        status: "success",
        message: "Verification email sent".to_string(),
    }))
}
