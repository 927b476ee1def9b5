use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{AppState, utils::message_response};

use super::model::{ChatRequest, ChatResponse, RelayOutcome, relay};

#[axum::debug_handler]
pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    let Some(api_key) = state.config.gemini_api_key.as_deref() else {
        tracing::error!("Chat requested but no API key is configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            message_response("خدمة الذكاء الاصطناعي غير مهيأة"),
        )
            .into_response();
    };

    match relay(&state.http, api_key, &req.message).await {
        RelayOutcome::Reply(reply) => (StatusCode::OK, Json(ChatResponse { reply })).into_response(),
        RelayOutcome::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            message_response("الخدمة مشغولة حالياً، حاول مرة أخرى بعد قليل"),
        )
            .into_response(),
        RelayOutcome::Failed(last_error) => {
            tracing::error!("All chat models failed, last error: {}", last_error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "message": "فشل الاتصال بالذكاء الاصطناعي",
                    "error": last_error,
                })),
            )
                .into_response()
        }
    }
}
