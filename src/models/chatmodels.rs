use bigdecimal::BigDecimal;
use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SUPPORT_ROOM_NAME: &str = "Support";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "message_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    Image,
    File,
    Offer,
}

impl MessageType {
    pub fn to_str(&self) -> &str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::File => "file",
            MessageType::Offer => "offer",
        }
    }
}

// Offers sent from inside a chat use Cancelled where project offers use
// Withdrawn; kept distinct on purpose.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "chat_offer_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChatOfferStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl ChatOfferStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ChatOfferStatus::Pending => "pending",
            ChatOfferStatus::Accepted => "accepted",
            ChatOfferStatus::Rejected => "rejected",
            ChatOfferStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct ChatRoom {
    pub id: Uuid,
    pub participant_one_id: Uuid,
    pub participant_two_id: Uuid,
    pub name: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ChatRoom {
    pub fn other_participant(&self, user_id: Uuid) -> Uuid {
        if self.participant_one_id == user_id {
            self.participant_two_id
        } else {
            self.participant_one_id
        }
    }

    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participant_one_id == user_id || self.participant_two_id == user_id
    }

    pub fn is_support_room(&self) -> bool {
        self.name.as_deref() == Some(SUPPORT_ROOM_NAME)
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Message {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub message_type: MessageType,
    pub content: String,
    pub attachment_url: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct ChatOffer {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub room_id: Uuid,
    pub message_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub budget: BigDecimal,
    pub deadline: NaiveDate,
    pub status: ChatOfferStatus,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_room(name: Option<&str>) -> ChatRoom {
        ChatRoom {
            id: Uuid::new_v4(),
            participant_one_id: Uuid::new_v4(),
            participant_two_id: Uuid::new_v4(),
            name: name.map(|s| s.to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn other_participant_flips_sides() {
        let room = sample_room(None);
        assert_eq!(
            room.other_participant(room.participant_one_id),
            room.participant_two_id
        );
        assert_eq!(
            room.other_participant(room.participant_two_id),
            room.participant_one_id
        );
    }

    #[test]
    fn support_room_detection() {
        assert!(sample_room(Some(SUPPORT_ROOM_NAME)).is_support_room());
        assert!(!sample_room(Some("Project talk")).is_support_room());
        assert!(!sample_room(None).is_support_room());
    }
}
