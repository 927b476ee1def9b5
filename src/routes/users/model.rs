use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Public view of a user; never exposes the password hash.
#[derive(Debug, Serialize, FromRow)]
pub struct PublicProfile {
    pub id: i32,
    pub username: String,
    pub avatar_url: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub followers: i64,
    pub following: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl PublicProfile {
    pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PublicProfile>(
            r#"
            SELECT u.id, u.username, u.avatar_url, u.country, u.created_at,
                   (SELECT COUNT(*) FROM follows WHERE followed_id = u.id) AS followers,
                   (SELECT COUNT(*) FROM follows WHERE follower_id = u.id) AS following
            FROM users u
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

impl UserSummary {
    pub async fn search(pool: &PgPool, query: &str) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = format!("%{}%", query);
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username, avatar_url
            FROM users
            WHERE username ILIKE $1 OR email ILIKE $1
            ORDER BY username ASC
            "#,
        )
        .bind(&pattern)
        .fetch_all(pool)
        .await
    }

    pub async fn update_profile(
        pool: &PgPool,
        id: i32,
        req: UpdateProfileRequest,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            UPDATE users
            SET username = COALESCE($1, username),
                avatar_url = COALESCE($2, avatar_url)
            WHERE id = $3
            RETURNING id, username, avatar_url
            "#,
        )
        .bind(&req.username)
        .bind(&req.avatar_url)
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
