use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    utils::{Claims, message_response},
};

use super::model::{Connection, ConnectionRequest, RespondAccess, RespondRequest, respond_access};

#[axum::debug_handler]
pub async fn request_connection(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ConnectionRequest>,
) -> Response {
    if req.receiver_id == claims.id {
        return (
            StatusCode::BAD_REQUEST,
            message_response("لا يمكنك إرسال طلب صداقة لنفسك"),
        )
            .into_response();
    }

    match Connection::request(&state.pool, claims.id, req.receiver_id).await {
        // Inserted or silently deduped; the caller cannot tell already-pending
        // from already-accepted.
        Ok(_) => (StatusCode::OK, message_response("تم إرسال طلب الصداقة")).into_response(),
        Err(e) => {
            tracing::error!("Failed to create connection request: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn respond_connection(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(req): Json<RespondRequest>,
) -> Response {
    if req.status != "accepted" && req.status != "rejected" {
        return (
            StatusCode::BAD_REQUEST,
            message_response("الحالة يجب أن تكون accepted أو rejected"),
        )
            .into_response();
    }

    let connection = match Connection::find_by_id(&state.pool, id).await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("Failed to load connection {}: {}", id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response();
        }
    };

    match respond_access(connection.as_ref(), claims.id) {
        RespondAccess::NotFound => (
            StatusCode::NOT_FOUND,
            message_response("طلب الصداقة غير موجود"),
        )
            .into_response(),
        RespondAccess::NotReceiver => (
            StatusCode::FORBIDDEN,
            message_response("لا يمكنك الرد على هذا الطلب"),
        )
            .into_response(),
        RespondAccess::AlreadySettled => (
            StatusCode::BAD_REQUEST,
            message_response("تمت معالجة هذا الطلب مسبقاً"),
        )
            .into_response(),
        RespondAccess::Allowed => {
            match Connection::respond(&state.pool, id, claims.id, &req.status).await {
                // Another settle won the race between the read and the update.
                Ok(0) => (
                    StatusCode::BAD_REQUEST,
                    message_response("تمت معالجة هذا الطلب مسبقاً"),
                )
                    .into_response(),
                Ok(_) => {
                    tracing::info!("Connection {} set to {} by {}", id, req.status, claims.id);
                    (StatusCode::OK, message_response("تم تحديث طلب الصداقة")).into_response()
                }
                Err(e) => {
                    tracing::error!("Failed to respond to connection {}: {}", id, e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        message_response("حدث خطأ في السيرفر"),
                    )
                        .into_response()
                }
            }
        }
    }
}

#[axum::debug_handler]
pub async fn list_connections(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Response {
    match Connection::list(&state.pool, claims.id).await {
        Ok(connections) => (StatusCode::OK, Json(connections)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list connections for {}: {}", claims.id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn connection_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(other_id): Path<i32>,
) -> Response {
    match Connection::status_between(&state.pool, claims.id, other_id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => {
            tracing::error!("Failed to check connection status: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}
