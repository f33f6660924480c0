use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::contactmodels::*;

#[async_trait]
pub trait ContactExt {
    async fn create_contact_message(
        &self,
        name: String,
        email: String,
        phone: Option<String>,
        subject: String,
        message: String,
    ) -> Result<ContactMessage, Error>;

    async fn get_contact_messages(
        &self,
        status: Option<ContactStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactMessage>, Error>;

    async fn count_contact_messages(&self, status: Option<ContactStatus>) -> Result<i64, Error>;

    /// Messages still `new` after 24 hours.
    async fn count_urgent_contact_messages(&self) -> Result<i64, Error>;

    async fn get_contact_message(&self, id: Uuid) -> Result<Option<ContactMessage>, Error>;

    async fn mark_contact_read(&self, id: Uuid) -> Result<ContactMessage, Error>;

    async fn reply_to_contact(
        &self,
        id: Uuid,
        admin_user_id: Uuid,
        reply: String,
    ) -> Result<ContactMessage, Error>;

    async fn close_contact(&self, id: Uuid) -> Result<ContactMessage, Error>;

    async fn create_user_request(
        &self,
        full_name: String,
        email: String,
        subject: String,
        message: String,
    ) -> Result<UserRequest, Error>;

    async fn get_user_requests(&self, limit: i64, offset: i64) -> Result<Vec<UserRequest>, Error>;
}

#[async_trait]
impl ContactExt for DBClient {
    async fn create_contact_message(
        &self,
        name: String,
        email: String,
        phone: Option<String>,
        subject: String,
        message: String,
    ) -> Result<ContactMessage, Error> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, phone, subject, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(subject)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_contact_messages(
        &self,
        status: Option<ContactStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactMessage>, Error> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            SELECT * FROM contact_messages
            WHERE ($1::contact_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_contact_messages(&self, status: Option<ContactStatus>) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM contact_messages
            WHERE ($1::contact_status IS NULL OR status = $1)
            "#,
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn count_urgent_contact_messages(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM contact_messages
            WHERE status = 'new'::contact_status
              AND created_at < NOW() - INTERVAL '24 hours'
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn get_contact_message(&self, id: Uuid) -> Result<Option<ContactMessage>, Error> {
        sqlx::query_as::<_, ContactMessage>("SELECT * FROM contact_messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn mark_contact_read(&self, id: Uuid) -> Result<ContactMessage, Error> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages
            SET status = 'read'::contact_status,
                read_at = COALESCE(read_at, NOW()),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    async fn reply_to_contact(
        &self,
        id: Uuid,
        admin_user_id: Uuid,
        reply: String,
    ) -> Result<ContactMessage, Error> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages
            SET status = 'replied'::contact_status,
                admin_reply = $3,
                admin_user_id = $2,
                replied_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(admin_user_id)
        .bind(reply)
        .fetch_one(&self.pool)
        .await
    }

    async fn close_contact(&self, id: Uuid) -> Result<ContactMessage, Error> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages
            SET status = 'closed'::contact_status, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_user_request(
        &self,
        full_name: String,
        email: String,
        subject: String,
        message: String,
    ) -> Result<UserRequest, Error> {
        sqlx::query_as::<_, UserRequest>(
            r#"
            INSERT INTO user_requests (full_name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(subject)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_user_requests(&self, limit: i64, offset: i64) -> Result<Vec<UserRequest>, Error> {
        sqlx::query_as::<_, UserRequest>(
            r#"
            SELECT * FROM user_requests
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }
}
