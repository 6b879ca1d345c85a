//! Request logging, purely observational.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Log method, path, protocol version, and remote address, then delegate
/// inward. `ConnectInfo` is only present when the server was started with
/// `into_make_service_with_connect_info`; tests drive the router directly,
/// so its absence is logged as "-" rather than treated as an error.
pub async fn log_request(request: Request, next: Next) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string());

    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        version = ?request.version(),
        remote = remote.as_deref().unwrap_or("-"),
        "request"
    );

    next.run(request).await
}
