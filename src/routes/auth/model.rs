use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::utils::hash_password;

#[derive(Debug, FromRow)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, FromRow)]
pub struct PendingUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub verification_code: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: LoginUser,
}

impl AuthUser {
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AuthUser>(
            r#"
            SELECT id, username, email, password_hash, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Last-seen origin, refreshed on every successful login.
    pub async fn record_login_origin(
        pool: &PgPool,
        id: i32,
        ip: Option<String>,
        country: Option<String>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET ip_address = COALESCE($2, ip_address),
                country = COALESCE($3, country)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(ip)
        .bind(country)
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl PendingUser {
    /// A re-signup for the same email replaces the pending row and its code.
    pub async fn upsert(
        pool: &PgPool,
        req: &SignupRequest,
        verification_code: &str,
    ) -> Result<(), sqlx::Error> {
        let password_hash = hash_password(&req.password)
            .map_err(|e| sqlx::Error::Protocol(format!("Failed to hash password: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO pending_users (email, username, password_hash, verification_code)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET username = EXCLUDED.username,
                password_hash = EXCLUDED.password_hash,
                verification_code = EXCLUDED.verification_code,
                created_at = now()
            "#,
        )
        .bind(&req.email)
        .bind(&req.username)
        .bind(&password_hash)
        .bind(verification_code)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PendingUser>(
            r#"
            SELECT email, username, password_hash, verification_code
            FROM pending_users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Moves the pending row into `users` and deletes it. Two statements,
    /// no transaction; the delete is retried implicitly on the next verify.
    pub async fn promote(&self, pool: &PgPool) -> Result<i32, sqlx::Error> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&self.username)
        .bind(&self.email)
        .bind(&self.password_hash)
        .fetch_one(pool)
        .await?;

        sqlx::query("DELETE FROM pending_users WHERE email = $1")
            .bind(&self.email)
            .execute(pool)
            .await?;

        Ok(id)
    }
}
