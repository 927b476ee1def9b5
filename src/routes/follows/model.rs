use serde::Deserialize;
use sqlx::PgPool;

use crate::routes::users::model::UserSummary;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub user_id: i32,
}

/// Directed edge, independent of connections.
pub struct Follow;

impl Follow {
    pub async fn add(pool: &PgPool, follower_id: i32, followed_id: i32) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO follows (follower_id, followed_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn remove(
        pool: &PgPool,
        follower_id: i32,
        followed_id: i32,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
                .bind(follower_id)
                .bind(followed_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected())
    }

    pub async fn followers_of(pool: &PgPool, user_id: i32) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.username, u.avatar_url
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.followed_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn following_of(pool: &PgPool, user_id: i32) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.username, u.avatar_url
            FROM follows f
            JOIN users u ON u.id = f.followed_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
