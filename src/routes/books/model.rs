use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Serialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
    pub pages: Option<i32>,
    pub language: Option<String>,
    pub is_new: Option<bool>,
    pub status: Option<String>,
    pub user_id: Option<i32>,
    pub admin_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Moderation queue row; carries the submitter's name for the dashboard.
#[derive(Debug, Serialize, FromRow)]
pub struct PendingBook {
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub submitter: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBookRequest {
    pub title: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
    pub pages: Option<i32>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
    pub pages: Option<i32>,
    pub language: Option<String>,
    pub is_new: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ModerateBookRequest {
    pub status: String,
    pub feedback: Option<String>,
}

const BOOK_COLUMNS: &str = "id, title, author, category, description, image_url, pdf_url, \
                            pages, language, is_new, status, user_id, admin_feedback, created_at";

/// Approved rows plus legacy rows predating moderation; pending and rejected
/// submissions stay out of the catalog.
pub fn is_publicly_listed(status: Option<&str>) -> bool {
    matches!(status, None | Some("approved"))
}

impl Book {
    pub async fn list_public(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY created_at DESC",
            BOOK_COLUMNS
        ))
        .fetch_all(pool)
        .await?;

        Ok(books
            .into_iter()
            .filter(|b| is_publicly_listed(b.status.as_deref()))
            .collect())
    }

    pub async fn submit(
        pool: &PgPool,
        user_id: i32,
        req: SubmitBookRequest,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, category, description, image_url, pdf_url,
                               pages, language, status, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&req.title)
        .bind(&req.author)
        .bind(&req.category)
        .bind(&req.description)
        .bind(&req.image_url)
        .bind(&req.pdf_url)
        .bind(req.pages)
        .bind(&req.language)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn pending_with_submitter(pool: &PgPool) -> Result<Vec<PendingBook>, sqlx::Error> {
        sqlx::query_as::<_, PendingBook>(
            r#"
            SELECT b.id, b.title, b.author, b.category, b.description, b.image_url,
                   b.pdf_url, b.created_at, u.username AS submitter
            FROM books b
            LEFT JOIN users u ON u.id = b.user_id
            WHERE b.status = 'pending'
            ORDER BY b.created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: i32,
        status: &str,
        feedback: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE books SET status = $1, admin_feedback = $2 WHERE id = $3",
        )
        .bind(status)
        .bind(feedback)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Admin create bypasses moderation and goes straight to the catalog.
    pub async fn create_approved(
        pool: &PgPool,
        req: SubmitBookRequest,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, category, description, image_url, pdf_url,
                               pages, language, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'approved')
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&req.title)
        .bind(&req.author)
        .bind(&req.category)
        .bind(&req.description)
        .bind(&req.image_url)
        .bind(&req.pdf_url)
        .bind(req.pages)
        .bind(&req.language)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i32,
        req: UpdateBookRequest,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = COALESCE($1, title),
                author = COALESCE($2, author),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                image_url = COALESCE($5, image_url),
                pdf_url = COALESCE($6, pdf_url),
                pages = COALESCE($7, pages),
                language = COALESCE($8, language),
                is_new = COALESCE($9, is_new)
            WHERE id = $10
            "#,
        )
        .bind(&req.title)
        .bind(&req.author)
        .bind(&req.category)
        .bind(&req.description)
        .bind(&req.image_url)
        .bind(&req.pdf_url)
        .bind(req.pages)
        .bind(&req.language)
        .bind(req.is_new)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_hides_unmoderated_submissions() {
        assert!(!is_publicly_listed(Some("pending")));
        assert!(!is_publicly_listed(Some("rejected")));
    }

    #[test]
    fn catalog_lists_approved_and_legacy_books() {
        assert!(is_publicly_listed(Some("approved")));
        assert!(is_publicly_listed(None));
    }
}
