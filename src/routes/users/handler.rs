use axum::{
    extract::{Extension, Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState,
    utils::{Claims, message_response},
};

use super::model::{PublicProfile, UpdateProfileRequest, UserSummary};

#[axum::debug_handler]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    match PublicProfile::find(&state.pool, id).await {
        Ok(Some(profile)) => (StatusCode::OK, Json(profile)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            message_response("المستخدم غير موجود"),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to load profile {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[axum::debug_handler]
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let q = query.q.unwrap_or_default();
    if q.trim().is_empty() {
        return (StatusCode::OK, Json(Vec::<UserSummary>::new())).into_response();
    }

    match UserSummary::search(&state.pool, q.trim()).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => {
            tracing::error!("User search failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Response {
    match UserSummary::update_profile(&state.pool, claims.id, req).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => {
            tracing::error!("Failed to update profile {}: {}", claims.id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}
