use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{AppState, schema};

#[axum::debug_handler]
pub async fn welcome() -> &'static str {
    "مرحباً بك في سيرفر راوي 🚀"
}

/// Replays the idempotent schema statements and seeds the admin account.
#[axum::debug_handler]
pub async fn init_db(State(state): State<AppState>) -> Response {
    let results = schema::initialize(&state.pool, &state.config).await;
    let failed = results.iter().filter(|r| r.contains("failed")).count();

    tracing::info!(
        "init-db ran {} statements, {} failed",
        results.len(),
        failed
    );

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "تم تهيئة قاعدة البيانات",
            "results": results,
        })),
    )
        .into_response()
}
