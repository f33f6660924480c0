use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "contact_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Closed,
}

impl ContactStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub admin_reply: Option<String>,
    pub admin_user_id: Option<Uuid>,
    pub read_at: Option<DateTime<Utc>>,
    pub replied_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn is_new(&self) -> bool {
        self.status == ContactStatus::New
    }

    // A message still unanswered after 24 hours counts as urgent.
    pub fn is_urgent(&self) -> bool {
        self.status == ContactStatus::New
            && Utc::now() - self.created_at > chrono::Duration::hours(24)
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct UserRequest {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: ContactStatus, age_hours: i64) -> ContactMessage {
        ContactMessage {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            subject: "Hello".to_string(),
            message: "Hi".to_string(),
            status,
            admin_reply: None,
            admin_user_id: None,
            read_at: None,
            replied_at: None,
            created_at: Utc::now() - chrono::Duration::hours(age_hours),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn urgent_only_when_new_and_stale() {
        assert!(sample(ContactStatus::New, 25).is_urgent());
        assert!(!sample(ContactStatus::New, 1).is_urgent());
        assert!(!sample(ContactStatus::Replied, 48).is_urgent());
    }
}
