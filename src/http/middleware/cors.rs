//! CORS Middleware.
//! Lets browser clients from any origin call the gateway.

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Value of `Access-Control-Allow-Headers` on preflight responses.
pub const ALLOWED_HEADERS: &str = "Content-Type,Accept";

/// Value of `Access-Control-Allow-Methods` on preflight responses.
pub const ALLOWED_METHODS: &str = "GET,HEAD,POST,PUT,DELETE";

/// Reflect the caller's `Origin` and answer preflight requests directly.
///
/// Requests without an `Origin` pass through untouched. A preflight
/// (`OPTIONS` + `Access-Control-Request-Method`) never reaches the next handler.
pub async fn allow_cors(request: Request, next: Next) -> Response {
    let origin = match request.headers().get(header::ORIGIN) {
        Some(origin) if !origin.is_empty() => origin.clone(),
        _ => return next.run(request).await,
    };

    if request.method() == Method::OPTIONS
        && request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
    {
        tracing::debug!(origin = ?origin, path = %request.uri().path(), "Answering CORS preflight");

        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        return response;
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http, middleware, routing::any, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/v1/example",
                any(move || {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        (StatusCode::IM_A_TEAPOT, "inner")
                    }
                }),
            )
            .layer(middleware::from_fn(allow_cors))
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        let hits = Arc::new(AtomicUsize::new(0));
        let request = http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/v1/example")
            .header(header::ORIGIN, "https://app.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app(hits.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.example");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOWED_HEADERS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_origin_reflected_on_normal_request() {
        let hits = Arc::new(AtomicUsize::new(0));
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/v1/example")
            .header(header::ORIGIN, "https://other.example")
            .body(Body::empty())
            .unwrap();

        let response = app(hits.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://other.example"
        );
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_options_without_request_method_passes_through() {
        let hits = Arc::new(AtomicUsize::new(0));
        let request = http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/v1/example")
            .header(header::ORIGIN, "https://app.example")
            .body(Body::empty())
            .unwrap();

        let response = app(hits.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_origin_no_cors_headers() {
        let hits = Arc::new(AtomicUsize::new(0));
        let request = http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/v1/example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app(hits.clone()).oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
