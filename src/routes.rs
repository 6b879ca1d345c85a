//! # Router Construction
//!
//! Builds the route table and stacks the middleware chain in its required
//! order. `Router::layer` wraps from the inside out, so the LAST layer
//! added here is the FIRST one a request passes through:
//!
//! ```text
//! panic recovery → request logging → security headers → session binding
//!     → (routes; gated ones add the authentication gate) → handler
//! ```
//!
//! Recovery is outermost so it sees panics from every later stage. The
//! authentication gate is a `route_layer` on the gated sub-router only, so
//! anonymous traffic to public routes never pays for it.

use std::path::Path;

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_sessions::service::SignedCookie;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::handlers::{ping, snippets, users};
use crate::middleware::auth::require_auth;
use crate::middleware::headers::security_headers;
use crate::middleware::logging::log_request;
use crate::middleware::panics::handle_panic;
use crate::state::AppState;

/// Assemble the full application router.
///
/// Generic over the session store so the binary can use the SQLite-backed
/// store while tests use the in-memory one; both run behind the same signed
/// cookie.
pub fn router<Store>(
    state: AppState,
    session_layer: SessionManagerLayer<Store, SignedCookie>,
    static_dir: &Path,
) -> Router
where
    Store: SessionStore + Clone,
{
    let gated = Router::new()
        .route("/snippet/create", get(snippets::create_form).post(snippets::create))
        .route("/user/logout", post(users::logout))
        .route_layer(from_fn(require_auth));

    Router::new()
        .route("/", get(snippets::home))
        .route("/snippet/{id}", get(snippets::show))
        .route("/user/signup", get(users::signup_form).post(users::signup))
        .route("/user/login", get(users::login_form).post(users::login))
        .route("/ping", get(ping))
        .merge(gated)
        // ServeDir never lists directories: it serves an index.html when one
        // exists and 404s otherwise.
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(from_fn(security_headers))
        .layer(from_fn(log_request))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
