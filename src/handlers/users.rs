//! Handlers for signup, login, and logout.

use axum::extract::{Form as FormBody, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::db::StoreError;
use crate::error::AppResult;
use crate::forms::{Form, EMAIL_RX};
use crate::handlers::render_page;
use crate::session::{clear_user_id, put_flash, put_user_id};
use crate::state::AppState;
use crate::templates::TemplateData;

/// Show the signup form.
///
/// ## Route
/// GET /user/signup
pub async fn signup_form(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Html<String>> {
    render_page(
        &state,
        &session,
        "signup.page",
        TemplateData { form: Some(Form::empty()), ..TemplateData::default() },
    )
    .await
}

/// Validate and create a new account.
///
/// ## Route
/// POST /user/signup
///
/// ## Validation
/// - name: required, at most 255 characters
/// - email: required, at most 255 characters, must look like an email
/// - password: required, at least 10 characters
///
/// A duplicate email is a conflict, not a server error: it is attached to
/// the email field and the form redisplays at 200.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    FormBody(pairs): FormBody<Vec<(String, String)>>,
) -> AppResult<Response> {
    let mut form = Form::new(pairs);
    form.required(&["name", "email", "password"]);
    form.max_length("name", 255);
    form.max_length("email", 255);
    form.matches_pattern("email", &EMAIL_RX);
    form.min_length("password", 10);

    if !form.is_valid() {
        return redisplay(&state, &session, "signup.page", form).await;
    }

    match state
        .users
        .insert(form.get("name"), form.get("email"), form.get("password"))
        .await
    {
        Ok(()) => {
            put_flash(&session, "Your signup was successful. Please log in.").await?;
            Ok(Redirect::to("/user/login").into_response())
        }
        Err(StoreError::DuplicateEmail) => {
            form.errors.add("email", "Address is already in use");
            redisplay(&state, &session, "signup.page", form).await
        }
        Err(e) => Err(e.into()),
    }
}

/// Show the login form.
///
/// ## Route
/// GET /user/login
pub async fn login_form(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Html<String>> {
    render_page(
        &state,
        &session,
        "login.page",
        TemplateData { form: Some(Form::empty()), ..TemplateData::default() },
    )
    .await
}

/// Verify credentials and start an authenticated session.
///
/// ## Route
/// POST /user/login
///
/// Bad credentials redisplay the form with one generic message; which of
/// email or password was wrong is deliberately not revealed. On success the
/// session id is cycled before the user id is stored, so a pre-login cookie
/// cannot be replayed into an authenticated one.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    FormBody(pairs): FormBody<Vec<(String, String)>>,
) -> AppResult<Response> {
    let mut form = Form::new(pairs);
    form.required(&["email", "password"]);

    if !form.is_valid() {
        return redisplay(&state, &session, "login.page", form).await;
    }

    match state
        .users
        .authenticate(form.get("email"), form.get("password"))
        .await
    {
        Ok(user_id) => {
            session.cycle_id().await?;
            put_user_id(&session, user_id).await?;
            Ok(Redirect::to("/snippet/create").into_response())
        }
        Err(StoreError::InvalidCredentials) => {
            form.errors.add("generic", "Email or Password is incorrect");
            redisplay(&state, &session, "login.page", form).await
        }
        Err(e) => Err(e.into()),
    }
}

/// End the authenticated session. Gated.
///
/// ## Route
/// POST /user/logout
pub async fn logout(session: Session) -> AppResult<Response> {
    clear_user_id(&session).await?;
    session.cycle_id().await?;
    put_flash(&session, "You've been logged out successfully!").await?;
    Ok(Redirect::to("/").into_response())
}

async fn redisplay(
    state: &AppState,
    session: &Session,
    page: &str,
    form: Form,
) -> AppResult<Response> {
    let html = render_page(
        state,
        session,
        page,
        TemplateData { form: Some(form), ..TemplateData::default() },
    )
    .await?;
    Ok(html.into_response())
}
