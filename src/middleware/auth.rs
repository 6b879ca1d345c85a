//! Authentication gate for routes that require a logged-in user.

use axum::extract::Request;
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::error::AppError;
use crate::session::user_id;

/// Redirect to the login page unless the session carries an authenticated
/// user id. The wrapped handler is never invoked for anonymous requests, so
/// none of its side effects can occur.
///
/// Authenticated responses get `Cache-Control: no-store` because the page
/// is personalized.
pub async fn require_auth(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if user_id(&session).await?.is_none() {
        return Ok(Redirect::to("/user/login").into_response());
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}
