use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, FromRow)]
pub struct AdminAccount {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
}

/// Dashboard listing row; hashes stay out of admin responses too.
#[derive(Debug, Serialize, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AdminAccount {
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AdminAccount>(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE username = $1 AND role = 'admin'
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }
}

impl UserRow {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, role, country, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
