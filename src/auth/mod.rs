//! PSK-based authentication module.
//!
//! Implements constant-time comparison to mitigate timing attacks.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// PSK authentication layer function that takes the expected PSK as a parameter.
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    // If no PSK is configured, allow all requests (dev mode)
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    let accepted =
        provided_key(&request).map(|provided| constant_time_compare(provided, &expected));
    match accepted {
        Some(true) => next.run(request).await,
        Some(false) => {
            tracing::warn!(
                "Rejected request to {} with invalid API key",
                request.uri().path()
            );
            unauthorized_response("Invalid API key")
        }
        None => unauthorized_response("Missing or invalid API key"),
    }
}

/// The key from `x-api-key`, or a bearer token when that header is absent.
fn provided_key(request: &Request) -> Option<&str> {
    let headers = request.headers();
    if let Some(key) = headers.get(API_KEY_HEADER) {
        return key.to_str().ok();
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use super::*;

    fn guarded(psk: Option<&str>) -> Router {
        let psk = psk.map(str::to_string);
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn(move |req, next| {
                psk_auth_layer(psk.clone(), req, next)
            }))
    }

    async fn status(router: Router, request: Request<Body>) -> StatusCode {
        router.oneshot(request).await.unwrap().status()
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }

    #[tokio::test]
    async fn test_layer_accepts_header_or_bearer() {
        let with_header = Request::get("/ping")
            .header(API_KEY_HEADER, "secret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status(guarded(Some("secret")), with_header).await, StatusCode::OK);

        let with_bearer = Request::get("/ping")
            .header(header::AUTHORIZATION, "Bearer secret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status(guarded(Some("secret")), with_bearer).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_layer_rejects_missing_or_wrong_key() {
        let missing = Request::get("/ping").body(Body::empty()).unwrap();
        assert_eq!(
            status(guarded(Some("secret")), missing).await,
            StatusCode::UNAUTHORIZED
        );

        let wrong = Request::get("/ping")
            .header(API_KEY_HEADER, "guess")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status(guarded(Some("secret")), wrong).await,
            StatusCode::UNAUTHORIZED
        );

        let open = Request::get("/ping").body(Body::empty()).unwrap();
        assert_eq!(status(guarded(None), open).await, StatusCode::OK);
    }
}
