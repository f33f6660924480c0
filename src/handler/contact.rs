use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::contactdb::ContactExt,
    dtos::contactdtos::*,
    error::HttpError,
    mail::mails::{notify_admins, send_contact_notification_email, send_contact_reply_email},
    middleware::{auth, role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

pub fn contact_handler() -> Router {
    let admin_routes = Router::new()
        .route("/messages", get(list_contacts))
        .route("/messages/:id", get(get_contact))
        .route("/messages/:id/read", put(mark_read))
        .route("/messages/:id/reply", put(reply))
        .route("/messages/:id/close", put(close))
        .route("/requests", get(list_requests))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
        .layer(middleware::from_fn(auth));

    Router::new()
        .route("/", post(submit_contact))
        .route("/requests", post(submit_request))
        .nest("/admin", admin_routes)
}

pub async fn submit_contact(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ContactMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let contact = app_state
        .db_client
        .create_contact_message(
            body.name.clone(),
            body.email,
            body.phone,
            body.subject.clone(),
            body.message,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let config = app_state.env.clone();
    let contact_name = body.name;
    let contact_subject = body.subject;
    tokio::spawn(async move {
        notify_admins(&config, |admin_email| {
            let config = config.clone();
            let contact_name = contact_name.clone();
            let contact_subject = contact_subject.clone();
            async move {
                send_contact_notification_email(
                    &config,
                    &admin_email,
                    &contact_name,
                    &contact_subject,
                )
                .await
            }
        })
        .await;
    });

    Ok((
        StatusCode::CREATED,
        Json(ContactMessageResponseDto {
            status: "success".to_string(),
            contact,
        }),
    ))
}

pub async fn submit_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UserRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = app_state
        .db_client
        .create_user_request(body.full_name, body.email, body.subject, body.message)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(UserRequestResponseDto {
            status: "success".to_string(),
            request,
        }),
    ))
}

pub async fn list_contacts(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<ContactListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);
    let offset = (page - 1) * limit;

    let contacts = app_state
        .db_client
        .get_contact_messages(query.status, limit as i64, offset as i64)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = app_state
        .db_client
        .count_contact_messages(query.status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ContactListResponseDto {
        status: "success".to_string(),
        contacts,
        results,
    }))
}

pub async fn get_contact(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let contact = app_state
        .db_client
        .get_contact_message(id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Contact message not found"))?;

    Ok(Json(ContactMessageResponseDto {
        status: "success".to_string(),
        contact,
    }))
}

pub async fn mark_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .get_contact_message(id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Contact message not found"))?;

    let contact = app_state
        .db_client
        .mark_contact_read(id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ContactMessageResponseDto {
        status: "success".to_string(),
        contact,
    }))
}

pub async fn reply(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(admin): Extension<JWTAuthMiddeware>,
    Path(id): Path<Uuid>,
    Json(body): Json<ContactReplyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .db_client
        .get_contact_message(id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Contact message not found"))?;

    let contact = app_state
        .db_client
        .reply_to_contact(id, admin.user.id, body.reply.clone())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let config = app_state.env.clone();
    let to_email = contact.email.clone();
    let name = contact.name.clone();
    let subject = contact.subject.clone();
    let reply_text = body.reply;
    tokio::spawn(async move {
        if let Err(e) =
            send_contact_reply_email(&config, &to_email, &name, &subject, &reply_text).await
        {
            tracing::warn!("Contact reply email to {} failed: {}", to_email, e);
        }
    });

    Ok(Json(ContactMessageResponseDto {
        status: "success".to_string(),
        contact,
    }))
}

pub async fn close(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .get_contact_message(id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Contact message not found"))?;

    let contact = app_state
        .db_client
        .close_contact(id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ContactMessageResponseDto {
        status: "success".to_string(),
        contact,
    }))
}

pub async fn list_requests(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<ContactListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);
    let offset = (page - 1) * limit;

    let requests = app_state
        .db_client
        .get_user_requests(limit as i64, offset as i64)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = requests.len();

    Ok(Json(UserRequestListResponseDto {
        status: "success".to_string(),
        requests,
        results,
    }))
}
