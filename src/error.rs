//! # Error Handling
//!
//! This module defines the application error type and converts it into HTTP
//! responses.
//!
//! ## The taxonomy
//! - Client errors (a missing resource, a malformed id) surface as the
//!   matching status code with the bare status text as the body.
//! - Validation failures are NOT errors here: handlers re-render the form
//!   page with per-field messages at status 200. The same goes for the
//!   duplicate-email conflict and bad login credentials, which attach a
//!   field error and redisplay.
//! - Everything else (storage failures, template cache misses, render
//!   failures, session store trouble) is an internal error: logged with
//!   full detail server-side, surfaced as a generic 500 with no detail
//!   leakage.
//!
//! Panics never reach this module; the recovery stage in the middleware
//! chain catches them and produces the same generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::db::StoreError;
use crate::templates::TemplateError;

/// Application-wide error type for route handlers and middleware.
///
/// The `#[from]` conversions let handlers use `?` on storage, template, and
/// session results directly.
#[derive(Debug, Error)]
pub enum AppError {
    /// The requested resource does not exist. Also used for ids that are
    /// non-numeric or below 1, which are normalized to "not found" so the
    /// input shape never hints at which ids might be valid.
    #[error("not found")]
    NotFound,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Unexpected conditions that should not normally occur.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,

            // A vanished record reads the same as a bad id.
            AppError::Store(StoreError::NoRecord) => StatusCode::NOT_FOUND,

            AppError::Store(e) => {
                tracing::error!(error = %e, "storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Template(e) => {
                tracing::error!(error = %e, "template failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Session(e) => {
                tracing::error!(error = %e, "session failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // The client only ever sees the status text.
        let body = status.canonical_reason().unwrap_or("Error");
        (status, body).into_response()
    }
}

/// Convenience alias for handler results.
pub type AppResult<T> = Result<T, AppError>;
