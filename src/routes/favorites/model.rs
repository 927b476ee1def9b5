use serde::Deserialize;
use sqlx::PgPool;

use crate::routes::books::model::Book;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub book_id: i32,
}

pub struct Favorite;

const ADD_FAVORITE_SQL: &str =
    "INSERT INTO favorites (user_id, book_id) VALUES ($1, $2) ON CONFLICT DO NOTHING";

impl Favorite {
    /// Idempotent; favoriting the same book twice leaves one row.
    pub async fn add(pool: &PgPool, user_id: i32, book_id: i32) -> Result<(), sqlx::Error> {
        let book_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(book_id)
                .fetch_one(pool)
                .await?;

        if !book_exists {
            return Err(sqlx::Error::RowNotFound);
        }

        sqlx::query(ADD_FAVORITE_SQL)
            .bind(user_id)
            .bind(book_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn remove(pool: &PgPool, user_id: i32, book_id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn books_for_user(pool: &PgPool, user_id: i32) -> Result<Vec<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.author, b.category, b.description, b.image_url,
                   b.pdf_url, b.pages, b.language, b.is_new, b.status, b.user_id,
                   b.admin_feedback, b.created_at
            FROM favorites f
            JOIN books b ON b.id = f.book_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_favorite_is_swallowed_by_the_insert() {
        assert!(ADD_FAVORITE_SQL.contains("ON CONFLICT DO NOTHING"));
    }
}
