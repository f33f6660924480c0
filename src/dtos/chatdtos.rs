use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::chatmodels::*;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct StartChatDto {
    pub user_id: Uuid,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SendMessageDto {
    #[validate(length(min = 1, max = 5000, message = "Message content is required"))]
    pub content: String,

    pub message_type: Option<MessageType>,

    #[validate(url(message = "Attachment URL must be a valid URL"))]
    pub attachment_url: Option<String>,
}

#[derive(Serialize, Deserialize, Validate, Default)]
pub struct MessagesQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SendChatOfferDto {
    pub receiver_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,

    pub budget: BigDecimal,

    pub deadline: NaiveDate,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RespondChatOfferDto {
    pub accept: bool,
}

/// A room plus the fields the inbox list needs.
#[derive(Debug, Serialize)]
pub struct RoomListItem {
    pub room: ChatRoom,
    pub other_participant_id: Uuid,
    pub other_participant_name: Option<String>,
    pub last_message: Option<Message>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct RoomListResponseDto {
    pub status: String,
    pub rooms: Vec<RoomListItem>,
    pub results: usize,
}

#[derive(Debug, Serialize)]
pub struct RoomResponseDto {
    pub status: String,
    pub room: ChatRoom,
}

#[derive(Debug, Serialize)]
pub struct MessageResponseDto {
    pub status: String,
    pub message: Message,
}

/// Oldest first so clients can append in order; has_more signals older pages.
#[derive(Debug, Serialize)]
pub struct MessageListResponseDto {
    pub status: String,
    pub messages: Vec<Message>,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatOfferResponseDto {
    pub status: String,
    pub offer: ChatOffer,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponseDto {
    pub status: String,
    pub unread_count: i64,
}
