//! Handlers for browsing and creating snippets.

use axum::extract::{Form as FormBody, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::error::{AppError, AppResult};
use crate::forms::Form;
use crate::handlers::render_page;
use crate::session::put_flash;
use crate::state::AppState;
use crate::templates::TemplateData;

/// How many snippets the home page lists.
const LATEST_LIMIT: i64 = 10;

/// Home page: the latest unexpired snippets, newest first.
///
/// ## Route
/// GET /
pub async fn home(State(state): State<AppState>, session: Session) -> AppResult<Html<String>> {
    let snippets = state.snippets.latest(LATEST_LIMIT).await?;

    render_page(
        &state,
        &session,
        "home.page",
        TemplateData { snippets, ..TemplateData::default() },
    )
    .await
}

/// Show one snippet.
///
/// ## Route
/// GET /snippet/{id}
///
/// The id arrives as a raw path segment and is normalized before storage is
/// touched: non-numeric values and anything below 1 become the same 404 as
/// a genuinely absent id, so the response never hints at which ids might
/// exist.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id).ok_or(AppError::NotFound)?;
    let snippet = state.snippets.get(id).await?;

    render_page(
        &state,
        &session,
        "show.page",
        TemplateData { snippet: Some(snippet), ..TemplateData::default() },
    )
    .await
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id >= 1)
}

/// Show the blank create form. Gated.
///
/// ## Route
/// GET /snippet/create
pub async fn create_form(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Html<String>> {
    render_page(
        &state,
        &session,
        "create.page",
        TemplateData { form: Some(Form::empty()), ..TemplateData::default() },
    )
    .await
}

/// Validate and insert a new snippet. Gated.
///
/// ## Route
/// POST /snippet/create
///
/// ## Validation
/// - title: required, at most 100 characters
/// - content: required
/// - expires: required, one of "365", "7", "1" (days)
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    FormBody(pairs): FormBody<Vec<(String, String)>>,
) -> AppResult<Response> {
    let mut form = Form::new(pairs);
    form.required(&["title", "content", "expires"]);
    form.max_length("title", 100);
    form.permitted_values("expires", &["365", "7", "1"]);

    if !form.is_valid() {
        let page = render_page(
            &state,
            &session,
            "create.page",
            TemplateData { form: Some(form), ..TemplateData::default() },
        )
        .await?;
        return Ok(page.into_response());
    }

    // permitted_values pinned expires to a numeric literal, so a parse
    // failure here means the rule and this conversion drifted apart.
    let Ok(expires_days) = form.get("expires").parse::<i64>() else {
        return Err(AppError::Internal(
            "expires passed validation but is not numeric".to_string(),
        ));
    };

    let id = state
        .snippets
        .insert(form.get("title"), form.get("content"), expires_days)
        .await?;

    put_flash(&session, "Snippet successfully created!").await?;
    Ok(Redirect::to(&format!("/snippet/{id}")).into_response())
}
