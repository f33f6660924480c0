use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::chatmodels::MessageType;

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct MessageWithSender {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub sender_email: String,
    pub message_type: MessageType,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait DashboardExt {
    async fn message_count_since(&self, since: DateTime<Utc>) -> Result<i64, Error>;
    async fn room_count_since(&self, since: DateTime<Utc>) -> Result<i64, Error>;
    async fn active_sender_count_since(&self, since: DateTime<Utc>) -> Result<i64, Error>;
    async fn total_message_count(&self) -> Result<i64, Error>;
    async fn total_room_count(&self) -> Result<i64, Error>;
    async fn recent_messages_with_sender(
        &self,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, Error>;
}

#[async_trait]
impl DashboardExt for DBClient {
    async fn message_count_since(&self, since: DateTime<Utc>) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE created_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await
    }

    async fn room_count_since(&self, since: DateTime<Utc>) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chat_rooms WHERE created_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await
    }

    async fn active_sender_count_since(&self, since: DateTime<Utc>) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT sender_id) FROM messages WHERE created_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
    }

    async fn total_message_count(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await
    }

    async fn total_room_count(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chat_rooms")
            .fetch_one(&self.pool)
            .await
    }

    async fn recent_messages_with_sender(
        &self,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, Error> {
        sqlx::query_as::<_, MessageWithSender>(
            r#"
            SELECT
                m.id,
                m.room_id,
                m.sender_id,
                TRIM(u.first_name || ' ' || u.last_name) AS sender_name,
                u.email AS sender_email,
                m.message_type,
                m.content,
                m.is_read,
                m.created_at
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            ORDER BY m.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
