use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    utils::{
        client_country, client_ip, generate_token, generate_verification_code, message_response,
        verify_password,
    },
};

use super::model::{
    AuthUser, LoginRequest, LoginResponse, LoginUser, PendingUser, SignupRequest, VerifyRequest,
};

#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Response {
    match AuthUser::email_exists(&state.pool, &req.email).await {
        Ok(true) => {
            return (
                StatusCode::BAD_REQUEST,
                message_response("هذا البريد الإلكتروني مسجل بالفعل"),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Failed to check email: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ أثناء إنشاء الحساب"),
            )
                .into_response();
        }
    }

    let code = generate_verification_code();
    if let Err(e) = PendingUser::upsert(&state.pool, &req, &code).await {
        tracing::error!("Failed to store pending signup: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            message_response("حدث خطأ أثناء إنشاء الحساب"),
        )
            .into_response();
    }

    match &state.mailer {
        Some(mailer) => {
            if let Err(e) = mailer.send_verification_code(&req.email, &code).await {
                tracing::error!("Failed to send verification mail to {}: {}", req.email, e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message_response("تعذر إرسال رمز التحقق، حاول مرة أخرى"),
                )
                    .into_response();
            }
        }
        // No SMTP configured (local development); the code goes to the log.
        None => tracing::info!("Verification code for {}: {}", req.email, code),
    }

    (
        StatusCode::CREATED,
        message_response("تم إرسال رمز التحقق إلى بريدك الإلكتروني"),
    )
        .into_response()
}

#[axum::debug_handler]
pub async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Response {
    let pending = match PendingUser::find_by_email(&state.pool, &req.email).await {
        Ok(Some(pending)) => pending,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                message_response("لا يوجد تسجيل معلق لهذا البريد الإلكتروني"),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Failed to load pending signup: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response();
        }
    };

    if pending.verification_code != req.code.trim() {
        return (
            StatusCode::BAD_REQUEST,
            message_response("رمز التحقق غير صحيح"),
        )
            .into_response();
    }

    match pending.promote(&state.pool).await {
        Ok(id) => {
            tracing::info!("New account {} verified ({})", id, pending.email);
            (
                StatusCode::CREATED,
                message_response("تم إنشاء الحساب بنجاح! يمكنك تسجيل الدخول الآن."),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to promote pending user: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ أثناء إنشاء الحساب"),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Response {
    let user = match AuthUser::find_by_email(&state.pool, &req.email).await {
        Ok(Some(user)) => user,
        // One message for both failure modes, not leaking which was wrong.
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                message_response("البريد الإلكتروني أو كلمة المرور غير صحيحة"),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response();
        }
    };

    match verify_password(&req.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::UNAUTHORIZED,
                message_response("البريد الإلكتروني أو كلمة المرور غير صحيحة"),
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

    // Best effort; a failed origin update must not block the login.
    if let Err(e) = AuthUser::record_login_origin(
        &state.pool,
        user.id,
        client_ip(&headers),
        client_country(&headers),
    )
    .await
    {
        tracing::warn!("Failed to record login origin for {}: {}", user.id, e);
    }

    match generate_token(user.id, &user.email, &user.role, &state.config) {
        Ok(token) => (
            StatusCode::OK,
            Json(LoginResponse {
                message: "تم تسجيل الدخول بنجاح".into(),
                token,
                user: LoginUser {
                    id: user.id,
                    username: user.username,
                    email: user.email,
                    role: user.role,
                },
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to issue token: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message_response("حدث خطأ في السيرفر"),
            )
                .into_response()
        }
    }
}
