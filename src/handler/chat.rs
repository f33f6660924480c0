use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{chatdb::ChatExt, userdb::UserExt},
    dtos::chatdtos::*,
    error::{ErrorMessage, HttpError},
    mail::mails::{notify_admins, send_chat_offer_email, send_new_message_email, send_support_chat_email},
    middleware::JWTAuthMiddeware,
    models::chatmodels::{ChatOfferStatus, ChatRoom, MessageType, SUPPORT_ROOM_NAME},
    models::usermodel::User,
    AppState,
};

/// New messages notify the admin list unless an admin wrote them.
fn message_notifies_admins(sender: &User) -> bool {
    !sender.is_admin()
}

pub fn chat_handler() -> Router {
    Router::new()
        .route("/rooms", get(get_rooms).post(start_chat))
        .route("/support", post(start_support_chat))
        .route(
            "/rooms/:room_id/messages",
            get(get_messages).post(send_message),
        )
        .route("/rooms/:room_id/read", put(mark_room_read))
        .route("/messages/:message_id/read", put(mark_message_read))
        .route("/unread-count", get(unread_count))
        .route("/rooms/:room_id/offers", post(send_chat_offer))
        .route("/offers/:offer_id/respond", put(respond_to_chat_offer))
        .route("/offers/:offer_id/cancel", put(cancel_chat_offer))
}

async fn room_for_participant(
    app_state: &AppState,
    room_id: Uuid,
    user_id: Uuid,
) -> Result<ChatRoom, HttpError> {
    let room = app_state
        .db_client
        .get_room_by_id(room_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Chat room not found"))?;

    if !room.has_participant(user_id) {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    Ok(room)
}

pub async fn get_rooms(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Query(query): Query<MessagesQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);
    let offset = (page - 1) * limit;

    let rooms = app_state
        .db_client
        .get_user_rooms(user.user.id, limit as i64, offset as i64)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let mut items = Vec::with_capacity(rooms.len());
    for room in rooms {
        let other_id = room.other_participant(user.user.id);

        let other_participant_name = app_state
            .db_client
            .get_user(Some(other_id), None, None)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .map(|u| u.full_name());

        let last_message = app_state
            .db_client
            .get_last_message(room.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        let unread_count = app_state
            .db_client
            .unread_count_for_room(room.id, user.user.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        items.push(RoomListItem {
            room,
            other_participant_id: other_id,
            other_participant_name,
            last_message,
            unread_count,
        });
    }

    let results = items.len();

    Ok(Json(RoomListResponseDto {
        status: "success".to_string(),
        rooms: items,
        results,
    }))
}

pub async fn start_chat(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<StartChatDto>,
) -> Result<impl IntoResponse, HttpError> {
    if body.user_id == user.user.id {
        return Err(HttpError::bad_request(
            "You cannot start a chat with yourself".to_string(),
        ));
    }

    let other = app_state
        .db_client
        .get_user(Some(body.user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    let room = app_state
        .db_client
        .get_or_create_room(user.user.id, other.id, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(RoomResponseDto {
        status: "success".to_string(),
        room,
    }))
}

/// Opens (or reuses) the user's support room with the first admin and seeds
/// a greeting so the conversation never starts empty.
pub async fn start_support_chat(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let admin = app_state
        .db_client
        .get_first_admin()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::server_error("Support is not available right now"))?;

    if admin.id == user.user.id {
        return Err(HttpError::bad_request(
            "Admins cannot open a support chat with themselves".to_string(),
        ));
    }

    let room = app_state
        .db_client
        .get_or_create_room(user.user.id, admin.id, Some(SUPPORT_ROOM_NAME.to_string()))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let message_count = app_state
        .db_client
        .count_room_messages(room.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if message_count == 0 {
        app_state
            .db_client
            .send_message(
                room.id,
                admin.id,
                MessageType::Text,
                "Hi! You have reached WorkHive support. How can we help you?".to_string(),
                None,
            )
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        let config = app_state.env.clone();
        let user_name = user.user.full_name();
        tokio::spawn(async move {
            notify_admins(&config, |admin_email| {
                let config = config.clone();
                let user_name = user_name.clone();
                async move { send_support_chat_email(&config, &admin_email, &user_name).await }
            })
            .await;
        });
    }

    Ok(Json(RoomResponseDto {
        status: "success".to_string(),
        room,
    }))
}

pub async fn get_messages(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(room_id): Path<Uuid>,
    Query(query): Query<MessagesQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    room_for_participant(&app_state, room_id, user.user.id).await?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);
    let offset = (page - 1) * limit;

    let mut messages = app_state
        .db_client
        .get_room_messages(room_id, limit as i64, offset as i64)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .count_room_messages(room_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Fetched newest-first for pagination; clients want them in order.
    messages.reverse();

    let has_more = (offset + messages.len()) < total as usize;

    Ok(Json(MessageListResponseDto {
        status: "success".to_string(),
        messages,
        has_more,
    }))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(room_id): Path<Uuid>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    room_for_participant(&app_state, room_id, user.user.id).await?;

    let message_type = body.message_type.unwrap_or(MessageType::Text);

    let message = app_state
        .db_client
        .send_message(
            room_id,
            user.user.id,
            message_type,
            body.content.clone(),
            body.attachment_url,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Every new message notifies admins, whatever the room. Admin replies
    // are exempt, and the global toggle inside notify_admins still applies.
    if message_notifies_admins(&user.user) {
        let config = app_state.env.clone();
        let sender_name = user.user.full_name();
        let preview = body.content;
        tokio::spawn(async move {
            notify_admins(&config, |admin_email| {
                let config = config.clone();
                let sender_name = sender_name.clone();
                let preview = preview.clone();
                async move {
                    send_new_message_email(&config, &admin_email, &sender_name, &preview).await
                }
            })
            .await;
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(MessageResponseDto {
            status: "success".to_string(),
            message,
        }),
    ))
}

pub async fn mark_room_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(room_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    room_for_participant(&app_state, room_id, user.user.id).await?;

    app_state
        .db_client
        .mark_room_messages_read(room_id, user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Messages marked as read",
    })))
}

pub async fn mark_message_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(message_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let message = app_state
        .db_client
        .get_message_by_id(message_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Message not found"))?;

    let room = room_for_participant(&app_state, message.room_id, user.user.id).await?;

    // Only the recipient can mark a message read.
    if message.sender_id == user.user.id || !room.has_participant(user.user.id) {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    let message = app_state
        .db_client
        .mark_message_read(message_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(MessageResponseDto {
        status: "success".to_string(),
        message,
    }))
}

pub async fn unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let unread_count = app_state
        .db_client
        .get_unread_count(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UnreadCountResponseDto {
        status: "success".to_string(),
        unread_count,
    }))
}

pub async fn send_chat_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(room_id): Path<Uuid>,
    Json(body): Json<SendChatOfferDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let room = room_for_participant(&app_state, room_id, user.user.id).await?;

    if !room.has_participant(body.receiver_id) || body.receiver_id == user.user.id {
        return Err(HttpError::bad_request(
            "The offer receiver must be the other room participant".to_string(),
        ));
    }

    let (offer, _message) = app_state
        .db_client
        .create_chat_offer(
            room_id,
            user.user.id,
            body.receiver_id,
            body.title.clone(),
            body.description,
            body.budget.clone(),
            body.deadline,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Ok(Some(receiver)) = app_state
        .db_client
        .get_user(Some(body.receiver_id), None, None)
        .await
    {
        let config = app_state.env.clone();
        let sender_name = user.user.full_name();
        let title = body.title;
        let budget = body.budget.to_string();
        tokio::spawn(async move {
            if let Err(e) =
                send_chat_offer_email(&config, &receiver.email, &sender_name, &title, &budget).await
            {
                tracing::warn!("Chat offer email to {} failed: {}", receiver.email, e);
            }

            notify_admins(&config, |admin_email| {
                let config = config.clone();
                let sender_name = sender_name.clone();
                let title = title.clone();
                let budget = budget.clone();
                async move {
                    send_chat_offer_email(&config, &admin_email, &sender_name, &title, &budget)
                        .await
                }
            })
            .await;
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(ChatOfferResponseDto {
            status: "success".to_string(),
            offer,
        }),
    ))
}

pub async fn respond_to_chat_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(offer_id): Path<Uuid>,
    Json(body): Json<RespondChatOfferDto>,
) -> Result<impl IntoResponse, HttpError> {
    let offer = app_state
        .db_client
        .get_chat_offer(offer_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Offer not found"))?;

    if offer.receiver_id != user.user.id {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    if offer.status != ChatOfferStatus::Pending {
        return Err(HttpError::bad_request(
            "This offer has already been resolved".to_string(),
        ));
    }

    let status = if body.accept {
        ChatOfferStatus::Accepted
    } else {
        ChatOfferStatus::Rejected
    };

    let offer = app_state
        .db_client
        .update_chat_offer_status(offer_id, status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ChatOfferResponseDto {
        status: "success".to_string(),
        offer,
    }))
}

pub async fn cancel_chat_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(offer_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let offer = app_state
        .db_client
        .get_chat_offer(offer_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Offer not found"))?;

    if offer.sender_id != user.user.id {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    if offer.status != ChatOfferStatus::Pending {
        return Err(HttpError::bad_request(
            "Only pending offers can be cancelled".to_string(),
        ));
    }

    let offer = app_state
        .db_client
        .update_chat_offer_status(offer_id, ChatOfferStatus::Cancelled)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ChatOfferResponseDto {
        status: "success".to_string(),
        offer,
    }))
}

#[cfg(test)]
mod tests {
    use super::message_notifies_admins;
    use crate::models::usermodel::{User, UserRole};
    use chrono::Utc;
    use uuid::Uuid;

    fn user_with_role(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            password: "".to_string(),
            first_name: "Some".to_string(),
            last_name: "One".to_string(),
            role,
            phone: None,
            bio: None,
            website: None,
            avatar_url: None,
            verified: true,
            verification_token: None,
            token_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn non_admin_messages_notify_admins() {
        assert!(message_notifies_admins(&user_with_role(UserRole::Client)));
        assert!(message_notifies_admins(&user_with_role(UserRole::Freelancer)));
    }

    #[test]
    fn admin_messages_do_not_notify_admins() {
        assert!(!message_notifies_admins(&user_with_role(UserRole::Admin)));
    }
}
