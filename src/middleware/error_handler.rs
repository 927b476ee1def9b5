use axum::{
    body::{Body, to_bytes},
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

/// Logs the body of 5xx responses before handing them back to the client.
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    if response.status().is_server_error() {
        let (mut parts, body) = response.into_parts();
        // Error bodies are small JSON payloads; no cap, or a long upstream
        // error string would come back to the client as an empty body.
        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(b) => b,
            Err(e) => {
                error!("Failed to read error response body: {}", e);
                return Response::from_parts(parts, Body::empty());
            }
        };

        error!(
            "{} {} failed with {}: {}",
            method,
            path,
            parts.status,
            String::from_utf8_lossy(&bytes)
        );

        // The body was consumed; rebuild the response around the same bytes.
        parts.headers.remove(axum::http::header::CONTENT_LENGTH);
        Response::from_parts(parts, Body::from(bytes))
    } else {
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, middleware::from_fn, routing::get};
    use tower::ServiceExt;

    #[tokio::test]
    async fn large_error_bodies_survive_logging() {
        let big = "x".repeat(10_000);
        let payload = big.clone();
        let app = Router::new()
            .route(
                "/boom",
                get(move || async move { (StatusCode::INTERNAL_SERVER_ERROR, payload) }),
            )
            .layer(from_fn(log_errors));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/boom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.len(), big.len());
    }

    #[tokio::test]
    async fn successful_responses_pass_through_untouched() {
        let app = Router::new()
            .route("/ok", get(|| async { "مرحباً" }))
            .layer(from_fn(log_errors));

        let response = app
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], "مرحباً".as_bytes());
    }
}
