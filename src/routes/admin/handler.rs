use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    utils::{Claims, generate_admin_token, message_response, verify_password},
};

use super::model::{AdminAccount, AdminLoginRequest, AdminLoginResponse, UserRow};

#[axum::debug_handler]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Response {
    let admin = match AdminAccount::find_by_username(&state.pool, &req.username).await {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                message_response("اسم المستخدم أو كلمة المرور غير صحيحة"),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Admin login lookup failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response();
        }
    };

    match verify_password(&req.password, &admin.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::UNAUTHORIZED,
                message_response("اسم المستخدم أو كلمة المرور غير صحيحة"),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Password verification failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response();
        }
    }

    match generate_admin_token(admin.id, &admin.email, &state.config) {
        Ok(token) => (
            StatusCode::OK,
            Json(AdminLoginResponse {
                message: "تم تسجيل الدخول بنجاح".into(),
                token,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to issue admin token: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Response {
    match UserRow::list_all(&state.pool).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Response {
    if id == claims.id {
        return (
            StatusCode::BAD_REQUEST,
            message_response("لا يمكنك حذف حسابك الخاص"),
        )
            .into_response();
    }

    match UserRow::delete(&state.pool, id).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            message_response("المستخدم غير موجود"),
        )
            .into_response(),
        Ok(_) => {
            tracing::info!("Admin {} deleted user {}", claims.id, id);
            (StatusCode::OK, message_response("تم حذف المستخدم")).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to delete user {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}
