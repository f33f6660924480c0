use std::sync::Arc;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Duration, Utc};

use crate::{
    db::{
        careerdb::CareerExt, contactdb::ContactExt, dashboarddb::DashboardExt, userdb::UserExt,
    },
    error::HttpError,
    mail::mails::send_test_email,
    middleware::{auth, role_check, JWTAuthMiddeware},
    models::{contactmodels::ContactStatus, usermodel::UserRole},
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route("/dashboard", get(system_dashboard))
        .route("/dashboard/contacts", get(contacts_dashboard))
        .route("/test-email", post(test_email))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
        .layer(middleware::from_fn(auth))
}

/// Activity overview: chat volume over the last day and week, platform
/// totals, and the most recent messages.
pub async fn system_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let now = Utc::now();
    let day_ago = now - Duration::hours(24);
    let week_ago = now - Duration::days(7);

    let messages_24h = app_state
        .db_client
        .message_count_since(day_ago)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let messages_7d = app_state
        .db_client
        .message_count_since(week_ago)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let rooms_24h = app_state
        .db_client
        .room_count_since(day_ago)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let active_senders_24h = app_state
        .db_client
        .active_sender_count_since(day_ago)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_messages = app_state
        .db_client
        .total_message_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_rooms = app_state
        .db_client
        .total_room_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_users = app_state
        .db_client
        .user_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_projects = app_state
        .db_client
        .published_project_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_offers = app_state
        .db_client
        .total_offer_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let recent_messages = app_state
        .db_client
        .recent_messages_with_sender(10)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "chat": {
            "messages_24h": messages_24h,
            "messages_7d": messages_7d,
            "new_rooms_24h": rooms_24h,
            "active_senders_24h": active_senders_24h,
            "total_messages": total_messages,
            "total_rooms": total_rooms,
        },
        "platform": {
            "total_users": total_users,
            "published_projects": total_projects,
            "total_offers": total_offers,
        },
        "notifications": {
            "admin_notifications_enabled": app_state.env.admin_notifications_enabled,
            "admin_emails_configured": app_state.env.admin_emails.len(),
        },
        "recent_messages": recent_messages,
    })))
}

pub async fn contacts_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let total = app_state
        .db_client
        .count_contact_messages(None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let new = app_state
        .db_client
        .count_contact_messages(Some(ContactStatus::New))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let read = app_state
        .db_client
        .count_contact_messages(Some(ContactStatus::Read))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let replied = app_state
        .db_client
        .count_contact_messages(Some(ContactStatus::Replied))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let closed = app_state
        .db_client
        .count_contact_messages(Some(ContactStatus::Closed))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let urgent = app_state
        .db_client
        .count_urgent_contact_messages()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let recent = app_state
        .db_client
        .get_contact_messages(None, 10, 0)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "counts": {
            "total": total,
            "new": new,
            "read": read,
            "replied": replied,
            "closed": closed,
            "urgent": urgent,
        },
        "recent": recent,
    })))
}

/// Sends a test email to every configured admin address, or to the calling
/// admin when none are configured. Failures are reported, not logged away.
pub async fn test_email(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(admin): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let mut recipients = app_state.env.admin_emails.clone();
    if recipients.is_empty() {
        recipients.push(admin.user.email.clone());
    }

    let mut sent = Vec::new();
    let mut failed = Vec::new();

    for email in recipients {
        match send_test_email(&app_state.env, &email).await {
            Ok(()) => sent.push(email),
            Err(e) => {
                tracing::warn!("Test email to {} failed: {}", email, e);
                failed.push(email);
            }
        }
    }

    Ok(Json(serde_json::json!({
        "status": if failed.is_empty() { "success" } else { "fail" },
        "sent": sent,
        "failed": failed,
    })))
}
