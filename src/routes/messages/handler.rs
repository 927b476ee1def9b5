use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    utils::{Claims, message_response},
};

use super::model::{EditMessageRequest, Message, SendMessageRequest};

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    match Message::send(&state.pool, claims.id, req).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(e) if e.to_string().contains("not friends") => (
            StatusCode::FORBIDDEN,
            message_response("يجب أن تكونوا أصدقاء للمراسلة"),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to send message: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ أثناء إرسال الرسالة"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn get_thread(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(friend_id): Path<i32>,
) -> Response {
    match Message::thread(&state.pool, claims.id, friend_id).await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => {
            tracing::error!("Failed to load thread with {}: {}", friend_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ أثناء جلب الرسائل"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn edit_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(req): Json<EditMessageRequest>,
) -> Response {
    match Message::edit(&state.pool, id, claims.id, &req.content).await {
        Ok(0) => (
            StatusCode::FORBIDDEN,
            message_response("لا يمكنك تعديل هذه الرسالة"),
        )
            .into_response(),
        Ok(_) => (StatusCode::OK, message_response("تم تعديل الرسالة")).into_response(),
        Err(e) => {
            tracing::error!("Failed to edit message {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn delete_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Response {
    match Message::delete(&state.pool, id, claims.id).await {
        Ok(0) => (
            StatusCode::FORBIDDEN,
            message_response("لا يمكنك حذف هذه الرسالة"),
        )
            .into_response(),
        Ok(_) => (StatusCode::OK, message_response("تم حذف الرسالة")).into_response(),
        Err(e) => {
            tracing::error!("Failed to delete message {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn delete_conversation(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(friend_id): Path<i32>,
) -> Response {
    match Message::delete_conversation(&state.pool, claims.id, friend_id).await {
        Ok(count) => {
            tracing::info!(
                "User {} deleted conversation with {} ({} messages)",
                claims.id,
                friend_id,
                count
            );
            (StatusCode::OK, message_response("تم حذف المحادثة")).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to delete conversation with {}: {}", friend_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}
