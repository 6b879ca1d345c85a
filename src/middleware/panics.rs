//! Panic recovery, the outermost stage of the chain.

use std::any::Any;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Response, StatusCode};
use http_body_util::Full;

/// Turn an unrecovered panic from any inner stage into a generic 500.
///
/// The panic payload is logged, never returned: the client sees only the
/// status text. `Connection: close` tells the client the connection is in
/// an unknown state and should be dropped. Wired into the router through
/// `CatchPanicLayer::custom`, so the listening process itself survives.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Full<Bytes>> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    tracing::error!(panic = detail, "request handler panicked");

    let mut response = Response::new(Full::from("Internal Server Error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}
