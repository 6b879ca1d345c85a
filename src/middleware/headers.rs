//! Security headers applied to every response.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

/// Set `X-XSS-Protection` and `X-Frame-Options` unconditionally. Response
/// headers are buffered until the response is handed to the transport, so
/// inserting them after the inner stages ran still puts them before the
/// first body byte.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert("X-XSS-Protection", HeaderValue::from_static("1; mode=block"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("deny"));

    response
}
