use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    utils::{Claims, message_response},
};

use super::model::{Follow, FollowRequest};

#[axum::debug_handler]
pub async fn follow_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<FollowRequest>,
) -> Response {
    if req.user_id == claims.id {
        return (
            StatusCode::BAD_REQUEST,
            message_response("لا يمكنك متابعة نفسك"),
        )
            .into_response();
    }

    match Follow::add(&state.pool, claims.id, req.user_id).await {
        Ok(()) => (StatusCode::OK, message_response("تمت المتابعة")).into_response(),
        Err(e) => {
            tracing::error!("Failed to follow {}: {}", req.user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn unfollow_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<i32>,
) -> Response {
    match Follow::remove(&state.pool, claims.id, user_id).await {
        Ok(_) => (StatusCode::OK, message_response("تم إلغاء المتابعة")).into_response(),
        Err(e) => {
            tracing::error!("Failed to unfollow {}: {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn followers(State(state): State<AppState>, Path(user_id): Path<i32>) -> Response {
    match Follow::followers_of(&state.pool, user_id).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list followers of {}: {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn following(State(state): State<AppState>, Path(user_id): Path<i32>) -> Response {
    match Follow::following_of(&state.pool, user_id).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list following of {}: {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}
