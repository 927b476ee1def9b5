use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Serialize, FromRow)]
pub struct Message {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: String,
    pub is_read: bool,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: i32,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct EditMessageRequest {
    pub content: String,
}

const MESSAGE_COLUMNS: &str =
    "id, sender_id, receiver_id, content, is_read, is_edited, created_at";

/// Messaging requires an accepted connection; pending, rejected, or no edge
/// at all are equally closed doors.
pub fn allows_messaging(connection_status: Option<&str>) -> bool {
    matches!(connection_status, Some("accepted"))
}

impl Message {
    /// The duplicate-pair hole in connections means both directions can hold
    /// a row; an accepted one wins if present.
    async fn pair_status(pool: &PgPool, a: i32, b: i32) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT status FROM connections
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY (status = 'accepted') DESC
            LIMIT 1
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(pool)
        .await
    }

    /// The friendship is re-queried on every send; check and insert are two
    /// independent statements.
    pub async fn send(
        pool: &PgPool,
        sender_id: i32,
        req: SendMessageRequest,
    ) -> Result<Self, sqlx::Error> {
        let status = Self::pair_status(pool, sender_id, req.receiver_id).await?;
        if !allows_messaging(status.as_deref()) {
            return Err(sqlx::Error::Protocol("not friends".into()));
        }

        sqlx::query_as::<_, Message>(&format!(
            r#"
            INSERT INTO messages (sender_id, receiver_id, content)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            MESSAGE_COLUMNS
        ))
        .bind(sender_id)
        .bind(req.receiver_id)
        .bind(&req.content)
        .fetch_one(pool)
        .await
    }

    /// Full thread between two users, oldest first; the friend's unread
    /// messages to the caller are marked read as a side effect.
    pub async fn thread(
        pool: &PgPool,
        user_id: i32,
        friend_id: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            r#"
            SELECT {}
            FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC
            "#,
            MESSAGE_COLUMNS
        ))
        .bind(user_id)
        .bind(friend_id)
        .fetch_all(pool)
        .await?;

        sqlx::query(
            r#"
            UPDATE messages
            SET is_read = true
            WHERE sender_id = $1 AND receiver_id = $2 AND is_read = false
            "#,
        )
        .bind(friend_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(messages)
    }

    /// Ownership is the WHERE clause; zero rows means someone else's message.
    pub async fn edit(
        pool: &PgPool,
        id: i32,
        sender_id: i32,
        content: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET content = $1, is_edited = true
            WHERE id = $2 AND sender_id = $3
            "#,
        )
        .bind(content)
        .bind(id)
        .bind(sender_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: i32, sender_id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1 AND sender_id = $2")
            .bind(id)
            .bind(sender_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_conversation(
        pool: &PgPool,
        user_id: i32,
        friend_id: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            "#,
        )
        .bind(user_id)
        .bind(friend_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messaging_requires_an_accepted_connection() {
        assert!(allows_messaging(Some("accepted")));
    }

    #[test]
    fn strangers_and_unsettled_pairs_cannot_message() {
        assert!(!allows_messaging(None));
        assert!(!allows_messaging(Some("pending")));
        assert!(!allows_messaging(Some("rejected")));
    }
}
