use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    utils::{Claims, message_response},
};

use super::model::{Book, ModerateBookRequest, SubmitBookRequest, UpdateBookRequest};

#[axum::debug_handler]
pub async fn list_books(State(state): State<AppState>) -> Response {
    match Book::list_public(&state.pool).await {
        Ok(books) => (StatusCode::OK, Json(books)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list books: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ أثناء جلب الكتب"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn submit_book(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitBookRequest>,
) -> Response {
    match Book::submit(&state.pool, claims.id, req).await {
        Ok(book) => {
            tracing::info!("User {} submitted book {}", claims.id, book.id);
            (
                StatusCode::CREATED,
                message_response("تم إرسال الكتاب وسيظهر بعد موافقة الإدارة"),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to submit book: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ أثناء إرسال الكتاب"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn pending_books(State(state): State<AppState>) -> Response {
    match Book::pending_with_submitter(&state.pool).await {
        Ok(books) => (StatusCode::OK, Json(books)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list pending books: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ أثناء جلب الكتب"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn moderate_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<ModerateBookRequest>,
) -> Response {
    if req.status != "approved" && req.status != "rejected" {
        return (
            StatusCode::BAD_REQUEST,
            message_response("الحالة يجب أن تكون approved أو rejected"),
        )
            .into_response();
    }

    match Book::set_status(&state.pool, id, &req.status, req.feedback.as_deref()).await {
        Ok(0) => (StatusCode::NOT_FOUND, message_response("الكتاب غير موجود")).into_response(),
        Ok(_) => {
            tracing::info!("Book {} moderated as {}", id, req.status);
            (StatusCode::OK, message_response("تم تحديث حالة الكتاب")).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to moderate book {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn create_book(
    State(state): State<AppState>,
    Json(req): Json<SubmitBookRequest>,
) -> Response {
    match Book::create_approved(&state.pool, req).await {
        Ok(book) => (StatusCode::CREATED, Json(book)).into_response(),
        Err(e) => {
            tracing::error!("Failed to create book: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ أثناء إضافة الكتاب"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateBookRequest>,
) -> Response {
    match Book::update(&state.pool, id, req).await {
        Ok(0) => (StatusCode::NOT_FOUND, message_response("الكتاب غير موجود")).into_response(),
        Ok(_) => (StatusCode::OK, message_response("تم تحديث الكتاب")).into_response(),
        Err(e) => {
            tracing::error!("Failed to update book {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    match Book::delete(&state.pool, id).await {
        Ok(0) => (StatusCode::NOT_FOUND, message_response("الكتاب غير موجود")).into_response(),
        Ok(_) => (StatusCode::OK, message_response("تم حذف الكتاب")).into_response(),
        Err(e) => {
            tracing::error!("Failed to delete book {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}
