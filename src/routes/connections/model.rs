use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Friend-request edge. Status runs pending -> accepted | rejected; terminal
/// states are final, a re-request lands on the unique constraint and no-ops.
#[derive(Debug, FromRow)]
pub struct Connection {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub receiver_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub status: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct FriendInfo {
    pub id: i32,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Column-backed fields keep their snake_case names; only the computed
/// fields are camelCase, matching what the client reads.
#[derive(Debug, Serialize, FromRow)]
pub struct PendingConnectionInfo {
    #[serde(rename = "connectionId")]
    pub connection_id: i32,
    pub id: i32,
    pub username: String,
    pub avatar_url: Option<String>,
    #[serde(rename = "isSender")]
    pub is_sender: bool,
}

#[derive(Debug, Serialize)]
pub struct ConnectionsResponse {
    pub friends: Vec<FriendInfo>,
    pub pending: Vec<PendingConnectionInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatusResponse {
    pub status: String,
    pub is_sender: bool,
}

/// What a respond call is allowed to do, decided before touching the row.
#[derive(Debug, PartialEq, Eq)]
pub enum RespondAccess {
    NotFound,
    NotReceiver,
    AlreadySettled,
    Allowed,
}

/// Only the receiver of a still-pending request may settle it.
pub fn respond_access(connection: Option<&Connection>, caller_id: i32) -> RespondAccess {
    match connection {
        None => RespondAccess::NotFound,
        Some(c) if c.receiver_id != caller_id => RespondAccess::NotReceiver,
        Some(c) if c.status != "pending" => RespondAccess::AlreadySettled,
        Some(_) => RespondAccess::Allowed,
    }
}

/// Maps the raw pair row onto the none | pending | friends answer the client
/// expects; a rejected edge reads as none even though the row still exists
/// and keeps blocking re-requests.
pub fn status_response(connection: Option<&Connection>, user_id: i32) -> ConnectionStatusResponse {
    match connection {
        Some(c) if c.status == "accepted" => ConnectionStatusResponse {
            status: "friends".into(),
            is_sender: c.sender_id == user_id,
        },
        Some(c) if c.status == "pending" => ConnectionStatusResponse {
            status: "pending".into(),
            is_sender: c.sender_id == user_id,
        },
        _ => ConnectionStatusResponse {
            status: "none".into(),
            is_sender: false,
        },
    }
}

impl Connection {
    /// Dedupe covers the exact (sender, receiver) order only; the reverse
    /// direction can still insert a second row for the same pair.
    pub async fn request(pool: &PgPool, sender_id: i32, receiver_id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO connections (sender_id, receiver_id, status)
            VALUES ($1, $2, 'pending')
            ON CONFLICT (sender_id, receiver_id) DO NOTHING
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Connection>(
            "SELECT id, sender_id, receiver_id, status FROM connections WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// The status guard is repeated here so a settle racing another settle
    /// still touches zero rows.
    pub async fn respond(
        pool: &PgPool,
        id: i32,
        receiver_id: i32,
        status: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE connections
            SET status = $1
            WHERE id = $2 AND receiver_id = $3 AND status = 'pending'
            "#,
        )
        .bind(status)
        .bind(id)
        .bind(receiver_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list(pool: &PgPool, user_id: i32) -> Result<ConnectionsResponse, sqlx::Error> {
        let friends = sqlx::query_as::<_, FriendInfo>(
            r#"
            SELECT u.id, u.username, u.avatar_url
            FROM connections c
            JOIN users u
              ON u.id = CASE WHEN c.sender_id = $1 THEN c.receiver_id ELSE c.sender_id END
            WHERE (c.sender_id = $1 OR c.receiver_id = $1) AND c.status = 'accepted'
            ORDER BY u.username ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let pending = sqlx::query_as::<_, PendingConnectionInfo>(
            r#"
            SELECT c.id AS connection_id, u.id, u.username, u.avatar_url,
                   (c.sender_id = $1) AS is_sender
            FROM connections c
            JOIN users u
              ON u.id = CASE WHEN c.sender_id = $1 THEN c.receiver_id ELSE c.sender_id END
            WHERE (c.sender_id = $1 OR c.receiver_id = $1) AND c.status = 'pending'
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(ConnectionsResponse { friends, pending })
    }

    pub async fn status_between(
        pool: &PgPool,
        user_id: i32,
        other_id: i32,
    ) -> Result<ConnectionStatusResponse, sqlx::Error> {
        let row = sqlx::query_as::<_, Connection>(
            r#"
            SELECT id, sender_id, receiver_id, status
            FROM connections
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            "#,
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_optional(pool)
        .await?;

        Ok(status_response(row.as_ref(), user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(sender_id: i32, receiver_id: i32, status: &str) -> Connection {
        Connection {
            id: 10,
            sender_id,
            receiver_id,
            status: status.into(),
        }
    }

    #[test]
    fn only_the_receiver_may_respond() {
        let pending = connection(1, 2, "pending");
        assert_eq!(respond_access(Some(&pending), 2), RespondAccess::Allowed);
        // The sender cannot settle their own request, nor can a bystander.
        assert_eq!(respond_access(Some(&pending), 1), RespondAccess::NotReceiver);
        assert_eq!(respond_access(Some(&pending), 3), RespondAccess::NotReceiver);
        assert_eq!(respond_access(None, 2), RespondAccess::NotFound);
    }

    #[test]
    fn settled_requests_stay_settled() {
        let accepted = connection(1, 2, "accepted");
        let rejected = connection(1, 2, "rejected");
        assert_eq!(
            respond_access(Some(&accepted), 2),
            RespondAccess::AlreadySettled
        );
        assert_eq!(
            respond_access(Some(&rejected), 2),
            RespondAccess::AlreadySettled
        );
    }

    #[test]
    fn status_query_reports_pending_with_sender_flag() {
        let pending = connection(1, 2, "pending");
        let from_sender = status_response(Some(&pending), 1);
        assert_eq!(from_sender.status, "pending");
        assert!(from_sender.is_sender);

        let from_receiver = status_response(Some(&pending), 2);
        assert_eq!(from_receiver.status, "pending");
        assert!(!from_receiver.is_sender);
    }

    #[test]
    fn accepted_reads_as_friends_and_rejected_as_none() {
        let accepted = connection(1, 2, "accepted");
        assert_eq!(status_response(Some(&accepted), 2).status, "friends");

        let rejected = connection(1, 2, "rejected");
        let response = status_response(Some(&rejected), 1);
        assert_eq!(response.status, "none");
        assert!(!response.is_sender);

        assert_eq!(status_response(None, 1).status, "none");
    }

    #[test]
    fn pending_rows_keep_snake_case_column_names() {
        let row = PendingConnectionInfo {
            connection_id: 5,
            id: 2,
            username: "sara".into(),
            avatar_url: None,
            is_sender: true,
        };
        let value = serde_json::to_value(&row).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        // Column-backed fields stay snake_case like every other entity row;
        // only the computed fields are camelCase.
        assert!(keys.contains(&"avatar_url"));
        assert!(keys.contains(&"connectionId"));
        assert!(keys.contains(&"isSender"));
        assert!(!keys.contains(&"avatarUrl"));

        let friend = FriendInfo {
            id: 2,
            username: "sara".into(),
            avatar_url: Some("a.png".into()),
        };
        let friend_value = serde_json::to_value(&friend).unwrap();
        assert!(friend_value.as_object().unwrap().contains_key("avatar_url"));
    }
}
