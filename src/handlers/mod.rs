//! # Route Handlers
//!
//! Handlers orchestrate the pipeline: parse input, validate, call the
//! storage collaborator, pick a template, render.
//!
//! Mutating handlers all follow the same state machine: parsed → validated
//! → invalid: redisplay the form with its errors (status 200) | valid: do
//! the storage operation → success: set a flash and redirect; domain
//! conflict: attach a field error and redisplay; anything else: internal
//! error. Read-only handlers just parse, fetch, and render or 404.

pub mod snippets;
pub mod users;

use axum::response::Html;
use time::OffsetDateTime;
use tower_sessions::Session;

use crate::error::AppResult;
use crate::session::{is_authenticated, pop_flash};
use crate::state::AppState;
use crate::templates::TemplateData;

/// Liveness endpoint.
///
/// ## Route
/// GET /ping
///
/// Never fails and touches no collaborator, so it returns the body
/// directly instead of an `AppResult`.
pub async fn ping() -> &'static str {
    "OK"
}

/// Render a page, injecting the ambient fields every page shows: the
/// current year (footer), the pending one-shot flash message, and the
/// authentication flag (navigation bar).
///
/// The flash pop happens here so a message written by the previous request
/// displays on exactly one page view, whichever handler renders it.
pub(crate) async fn render_page(
    state: &AppState,
    session: &Session,
    name: &str,
    mut data: TemplateData,
) -> AppResult<Html<String>> {
    data.current_year = OffsetDateTime::now_utc().year();
    data.flash = pop_flash(session).await?;
    data.is_authenticated = is_authenticated(session).await?;

    let html = state.templates.render(name, &data)?;
    Ok(Html(html))
}
