//! # Snipbin
//!
//! A web server for creating, storing, and browsing short-lived text
//! "snippets". Users can sign up and log in; creating a snippet requires an
//! authenticated session.
//!
//! The interesting part of the crate is the request-processing pipeline:
//! - `middleware`: the ordered decorator chain every request passes through
//! - `forms`: the validation rule engine for submitted form data
//! - `templates`: the startup-built template cache
//! - `session`: typed accessors for the signed session cookie
//! - `handlers`: the route handlers orchestrating all of the above
//!
//! Storage lives behind the traits in `db`, so the pipeline can be exercised
//! against in-memory fakes without touching SQLite.

pub mod config; // Configuration management (environment variables, settings)
pub mod db; // Storage traits and the SQLite implementations
pub mod error; // Error handling and custom error types
pub mod forms; // Form data and validation rules
pub mod handlers; // HTTP request handlers (routes)
pub mod middleware; // Request/response interceptors (logging, headers, auth)
pub mod routes; // Router construction and middleware ordering
pub mod session; // Typed session accessors (flash, authenticated user id)
pub mod state; // Shared application state
pub mod templates; // Template cache built once at startup
