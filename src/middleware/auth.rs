use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    AppState,
    utils::{message_response, verify_token},
};

/// Decodes the bearer token and stores the claims as a request extension.
/// Missing header is 401, bad or expired token is 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(auth)) = bearer else {
        return (
            StatusCode::UNAUTHORIZED,
            message_response("يجب تسجيل الدخول أولاً"),
        )
            .into_response();
    };

    match verify_token(auth.token(), &state.config) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("Rejected token: {}", e);
            (
                StatusCode::FORBIDDEN,
                message_response("جلسة غير صالحة أو منتهية"),
            )
                .into_response()
        }
    }
}

/// Same as `auth_middleware` with an additional role gate for admin routes.
pub async fn admin_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(auth)) = bearer else {
        return (
            StatusCode::UNAUTHORIZED,
            message_response("يجب تسجيل الدخول أولاً"),
        )
            .into_response();
    };

    match verify_token(auth.token(), &state.config) {
        Ok(claims) if claims.is_admin() => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Ok(claims) => {
            tracing::warn!("User {} attempted an admin route", claims.id);
            (
                StatusCode::FORBIDDEN,
                message_response("هذه الصفحة للمشرفين فقط"),
            )
                .into_response()
        }
        Err(e) => {
            tracing::debug!("Rejected token: {}", e);
            (
                StatusCode::FORBIDDEN,
                message_response("جلسة غير صالحة أو منتهية"),
            )
                .into_response()
        }
    }
}
