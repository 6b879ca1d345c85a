//! # Application State
//!
//! The shared state every request handler can reach. Axum clones it per
//! request, which is cheap: all three fields are `Arc`s.
//!
//! ## Thread safety
//! The template cache is immutable after startup, so concurrent reads need
//! no synchronization at all. The stores wrap a sqlx pool, which hands each
//! in-flight request an exclusive connection and does its own internal
//! locking. Nothing else is shared across requests.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::db::snippets::SqliteSnippetStore;
use crate::db::users::SqliteUserStore;
use crate::db::{SnippetStore, UserStore};
use crate::templates::TemplateCache;

/// Shared application state.
///
/// The stores are trait objects on purpose: tests swap in in-memory fakes
/// and exercise the whole pipeline without a database file.
#[derive(Clone)]
pub struct AppState {
    pub snippets: Arc<dyn SnippetStore>,
    pub users: Arc<dyn UserStore>,
    pub templates: Arc<TemplateCache>,
}

impl AppState {
    /// Production state: SQLite-backed stores over one shared pool.
    pub fn new(pool: SqlitePool, templates: Arc<TemplateCache>) -> Self {
        Self {
            snippets: Arc::new(SqliteSnippetStore::new(pool.clone())),
            users: Arc::new(SqliteUserStore::new(pool)),
            templates,
        }
    }

    /// State with caller-provided stores. Used by tests.
    pub fn with_stores(
        snippets: Arc<dyn SnippetStore>,
        users: Arc<dyn UserStore>,
        templates: Arc<TemplateCache>,
    ) -> Self {
        Self { snippets, users, templates }
    }
}
