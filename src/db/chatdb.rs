use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::chatmodels::*;

#[async_trait]
pub trait ChatExt {
    /// Find the room shared by the two users, or create one. The lookup is
    /// symmetric in the participants.
    async fn get_or_create_room(
        &self,
        user_one_id: Uuid,
        user_two_id: Uuid,
        name: Option<String>,
    ) -> Result<ChatRoom, Error>;

    async fn get_room_by_id(&self, room_id: Uuid) -> Result<Option<ChatRoom>, Error>;

    async fn get_user_rooms(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChatRoom>, Error>;

    async fn send_message(
        &self,
        room_id: Uuid,
        sender_id: Uuid,
        message_type: MessageType,
        content: String,
        attachment_url: Option<String>,
    ) -> Result<Message, Error>;

    async fn get_room_messages(
        &self,
        room_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, Error>;

    async fn count_room_messages(&self, room_id: Uuid) -> Result<i64, Error>;

    async fn get_message_by_id(&self, message_id: Uuid) -> Result<Option<Message>, Error>;

    async fn get_last_message(&self, room_id: Uuid) -> Result<Option<Message>, Error>;

    async fn mark_room_messages_read(&self, room_id: Uuid, user_id: Uuid) -> Result<(), Error>;

    async fn mark_message_read(&self, message_id: Uuid) -> Result<Message, Error>;

    async fn unread_count_for_room(&self, room_id: Uuid, user_id: Uuid) -> Result<i64, Error>;

    async fn get_unread_count(&self, user_id: Uuid) -> Result<i64, Error>;

    // Offers sent from inside a chat

    #[allow(clippy::too_many_arguments)]
    async fn create_chat_offer(
        &self,
        room_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        title: String,
        description: String,
        budget: BigDecimal,
        deadline: NaiveDate,
    ) -> Result<(ChatOffer, Message), Error>;

    async fn get_chat_offer(&self, offer_id: Uuid) -> Result<Option<ChatOffer>, Error>;

    async fn update_chat_offer_status(
        &self,
        offer_id: Uuid,
        status: ChatOfferStatus,
    ) -> Result<ChatOffer, Error>;
}

#[async_trait]
impl ChatExt for DBClient {
    async fn get_or_create_room(
        &self,
        user_one_id: Uuid,
        user_two_id: Uuid,
        name: Option<String>,
    ) -> Result<ChatRoom, Error> {
        let existing = sqlx::query_as::<_, ChatRoom>(
            r#"
            SELECT * FROM chat_rooms
            WHERE (participant_one_id = $1 AND participant_two_id = $2)
               OR (participant_one_id = $2 AND participant_two_id = $1)
            LIMIT 1
            "#,
        )
        .bind(user_one_id)
        .bind(user_two_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(room) = existing {
            return Ok(room);
        }

        sqlx::query_as::<_, ChatRoom>(
            r#"
            INSERT INTO chat_rooms (participant_one_id, participant_two_id, name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_one_id)
        .bind(user_two_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_room_by_id(&self, room_id: Uuid) -> Result<Option<ChatRoom>, Error> {
        sqlx::query_as::<_, ChatRoom>("SELECT * FROM chat_rooms WHERE id = $1")
            .bind(room_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_user_rooms(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChatRoom>, Error> {
        sqlx::query_as::<_, ChatRoom>(
            r#"
            SELECT * FROM chat_rooms
            WHERE participant_one_id = $1 OR participant_two_id = $1
            ORDER BY updated_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn send_message(
        &self,
        room_id: Uuid,
        sender_id: Uuid,
        message_type: MessageType,
        content: String,
        attachment_url: Option<String>,
    ) -> Result<Message, Error> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (room_id, sender_id, message_type, content, attachment_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(room_id)
        .bind(sender_id)
        .bind(message_type)
        .bind(content)
        .bind(attachment_url)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE chat_rooms SET updated_at = NOW() WHERE id = $1")
            .bind(room_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    async fn get_room_messages(
        &self,
        room_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE room_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(room_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_room_messages(&self, room_id: Uuid) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE room_id = $1")
            .bind(room_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_message_by_id(&self, message_id: Uuid) -> Result<Option<Message>, Error> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_last_message(&self, room_id: Uuid) -> Result<Option<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE room_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_room_messages_read(&self, room_id: Uuid, user_id: Uuid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE messages
            SET is_read = true, read_at = NOW()
            WHERE room_id = $1
              AND sender_id != $2
              AND is_read = false
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_message_read(&self, message_id: Uuid) -> Result<Message, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            UPDATE messages
            SET is_read = true,
                read_at = COALESCE(read_at, NOW())
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(message_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn unread_count_for_room(&self, room_id: Uuid, user_id: Uuid) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM messages
            WHERE room_id = $1
              AND sender_id != $2
              AND is_read = false
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_unread_count(&self, user_id: Uuid) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM messages m
            INNER JOIN chat_rooms r ON m.room_id = r.id
            WHERE (r.participant_one_id = $1 OR r.participant_two_id = $1)
              AND m.sender_id != $1
              AND m.is_read = false
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_chat_offer(
        &self,
        room_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        title: String,
        description: String,
        budget: BigDecimal,
        deadline: NaiveDate,
    ) -> Result<(ChatOffer, Message), Error> {
        let mut tx = self.pool.begin().await?;

        // The offer is visible in the room as an offer-type message.
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (room_id, sender_id, message_type, content)
            VALUES ($1, $2, 'offer'::message_type, $3)
            RETURNING *
            "#,
        )
        .bind(room_id)
        .bind(sender_id)
        .bind(&title)
        .fetch_one(&mut *tx)
        .await?;

        let offer = sqlx::query_as::<_, ChatOffer>(
            r#"
            INSERT INTO chat_offers
                (sender_id, receiver_id, room_id, message_id, title, description,
                 budget, deadline)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(room_id)
        .bind(message.id)
        .bind(title)
        .bind(description)
        .bind(budget)
        .bind(deadline)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE chat_rooms SET updated_at = NOW() WHERE id = $1")
            .bind(room_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((offer, message))
    }

    async fn get_chat_offer(&self, offer_id: Uuid) -> Result<Option<ChatOffer>, Error> {
        sqlx::query_as::<_, ChatOffer>("SELECT * FROM chat_offers WHERE id = $1")
            .bind(offer_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update_chat_offer_status(
        &self,
        offer_id: Uuid,
        status: ChatOfferStatus,
    ) -> Result<ChatOffer, Error> {
        sqlx::query_as::<_, ChatOffer>(
            r#"
            UPDATE chat_offers
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(offer_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }
}
