use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    utils::{Claims, message_response},
};

use super::model::{AddFavoriteRequest, Favorite};

#[axum::debug_handler]
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AddFavoriteRequest>,
) -> Response {
    match Favorite::add(&state.pool, claims.id, req.book_id).await {
        Ok(()) => (StatusCode::OK, message_response("تمت الإضافة إلى المفضلة")).into_response(),
        Err(sqlx::Error::RowNotFound) => {
            (StatusCode::NOT_FOUND, message_response("الكتاب غير موجود")).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to add favorite: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(book_id): Path<i32>,
) -> Response {
    match Favorite::remove(&state.pool, claims.id, book_id).await {
        Ok(_) => (StatusCode::OK, message_response("تمت الإزالة من المفضلة")).into_response(),
        Err(e) => {
            tracing::error!("Failed to remove favorite: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

/// Public listing; the original client reads it without a token.
#[axum::debug_handler]
pub async fn user_favorites(State(state): State<AppState>, Path(user_id): Path<i32>) -> Response {
    match Favorite::books_for_user(&state.pool, user_id).await {
        Ok(books) => (StatusCode::OK, Json(books)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list favorites for {}: {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}
