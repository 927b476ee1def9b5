use sqlx::PgPool;

use crate::config::Config;
use crate::utils::hash_password;

/// Base tables, in foreign-key order.
pub const CREATE_TABLES: &[(&str, &str)] = &[
    (
        "create users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            avatar_url TEXT,
            ip_address TEXT,
            country TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "create books",
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT,
            category TEXT,
            description TEXT,
            image_url TEXT,
            pdf_url TEXT,
            pages INTEGER,
            language TEXT,
            is_new BOOLEAN DEFAULT false,
            status TEXT,
            user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
            admin_feedback TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "create favorites",
        r#"
        CREATE TABLE IF NOT EXISTS favorites (
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (user_id, book_id)
        )
        "#,
    ),
    (
        "create connections",
        r#"
        CREATE TABLE IF NOT EXISTS connections (
            id SERIAL PRIMARY KEY,
            sender_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            receiver_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            UNIQUE (sender_id, receiver_id)
        )
        "#,
    ),
    (
        "create messages",
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id SERIAL PRIMARY KEY,
            sender_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            receiver_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content TEXT NOT NULL,
            is_read BOOLEAN NOT NULL DEFAULT false,
            is_edited BOOLEAN NOT NULL DEFAULT false,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "create follows",
        r#"
        CREATE TABLE IF NOT EXISTS follows (
            follower_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            followed_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (follower_id, followed_id)
        )
        "#,
    ),
    (
        "create pending_users",
        r#"
        CREATE TABLE IF NOT EXISTS pending_users (
            email TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            verification_code TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
];

/// Columns that arrived after the first deployment. The schema evolved in
/// place, so every boot replays these; each statement is individually
/// idempotent and failures do not stop the loop.
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "books.status",
        "ALTER TABLE books ADD COLUMN IF NOT EXISTS status TEXT",
    ),
    (
        "books.user_id",
        "ALTER TABLE books ADD COLUMN IF NOT EXISTS user_id INTEGER REFERENCES users(id) ON DELETE SET NULL",
    ),
    (
        "books.admin_feedback",
        "ALTER TABLE books ADD COLUMN IF NOT EXISTS admin_feedback TEXT",
    ),
    (
        "books.pages",
        "ALTER TABLE books ADD COLUMN IF NOT EXISTS pages INTEGER",
    ),
    (
        "books.language",
        "ALTER TABLE books ADD COLUMN IF NOT EXISTS language TEXT",
    ),
    (
        "books.is_new",
        "ALTER TABLE books ADD COLUMN IF NOT EXISTS is_new BOOLEAN DEFAULT false",
    ),
    // Leftover from an abandoned pricing experiment.
    (
        "books.price (drop)",
        "ALTER TABLE books DROP COLUMN IF EXISTS price",
    ),
    (
        "users.avatar_url",
        "ALTER TABLE users ADD COLUMN IF NOT EXISTS avatar_url TEXT",
    ),
    (
        "users.ip_address",
        "ALTER TABLE users ADD COLUMN IF NOT EXISTS ip_address TEXT",
    ),
    (
        "users.country",
        "ALTER TABLE users ADD COLUMN IF NOT EXISTS country TEXT",
    ),
    (
        "messages.is_edited",
        "ALTER TABLE messages ADD COLUMN IF NOT EXISTS is_edited BOOLEAN NOT NULL DEFAULT false",
    ),
];

/// Runs every schema statement, then seeds the admin account. Returns a
/// per-statement report for the init-db endpoint.
pub async fn initialize(pool: &PgPool, config: &Config) -> Vec<String> {
    let mut report = Vec::new();

    for (label, statement) in CREATE_TABLES.iter().chain(MIGRATIONS.iter()) {
        match sqlx::query(statement).execute(pool).await {
            Ok(_) => report.push(format!("{}: ok", label)),
            Err(e) => {
                tracing::warn!("Schema statement '{}' failed: {}", label, e);
                report.push(format!("{}: failed ({})", label, e));
            }
        }
    }

    match seed_admin(pool, config).await {
        Ok(true) => report.push("seed admin: created".into()),
        Ok(false) => report.push("seed admin: already present".into()),
        Err(e) => {
            tracing::warn!("Admin seed failed: {}", e);
            report.push(format!("seed admin: failed ({})", e));
        }
    }

    report
}

async fn seed_admin(pool: &PgPool, config: &Config) -> Result<bool, sqlx::Error> {
    let password_hash = hash_password(&config.admin_password)
        .map_err(|e| sqlx::Error::Protocol(format!("Failed to hash admin password: {}", e)))?;

    let result = sqlx::query(
        r#"
        INSERT INTO users (username, email, password_hash, role)
        VALUES ($1, $2, $3, 'admin')
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(&config.admin_username)
    .bind(&config.admin_email)
    .bind(&password_hash)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_statements_are_idempotent() {
        for (label, statement) in CREATE_TABLES {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "'{}' is not re-runnable",
                label
            );
        }
    }

    #[test]
    fn migrations_are_idempotent() {
        for (label, statement) in MIGRATIONS {
            assert!(
                statement.contains("IF NOT EXISTS") || statement.contains("IF EXISTS"),
                "'{}' is not re-runnable",
                label
            );
        }
    }

    #[test]
    fn price_column_stays_dropped() {
        // The pricing experiment was abandoned; nothing may re-add the column.
        assert!(
            CREATE_TABLES
                .iter()
                .chain(MIGRATIONS.iter())
                .all(|(_, s)| !s.contains("ADD COLUMN IF NOT EXISTS price"))
        );
        assert!(
            MIGRATIONS
                .iter()
                .any(|(_, s)| s.contains("DROP COLUMN IF EXISTS price"))
        );
    }
}
