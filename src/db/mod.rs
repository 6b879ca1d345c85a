//! # Storage Layer
//!
//! Storage lives behind two small traits so the request pipeline never
//! depends on a concrete database:
//! - `SnippetStore`: insert, get, list-latest
//! - `UserStore`: insert (signup), authenticate (login)
//!
//! The production implementations in `snippets` and `users` run over a
//! shared sqlx SQLite pool; tests substitute in-memory fakes. Domain
//! outcomes the handlers branch on (no record, duplicate email, bad
//! credentials) are distinct `StoreError` variants rather than stringly
//! driver errors.

pub mod models;
pub mod snippets;
pub mod users;

use async_trait::async_trait;

use models::Snippet;
use thiserror::Error;

/// Errors surfaced by the storage collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No matching record. Handlers turn this into a 404.
    #[error("no matching record found")]
    NoRecord,

    /// Another active user already has this email address. Handlers attach
    /// this to the email field and redisplay the form.
    #[error("a user with this email address already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password; the two are deliberately
    /// indistinguishable.
    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistent storage for snippets.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Insert a new snippet expiring `expires_days` from now; returns the
    /// storage-assigned id.
    async fn insert(&self, title: &str, content: &str, expires_days: i64)
        -> Result<i64, StoreError>;

    /// Fetch one unexpired snippet by id. Expired snippets read as
    /// `NoRecord`, exactly like ids that never existed.
    async fn get(&self, id: i64) -> Result<Snippet, StoreError>;

    /// The most recently created unexpired snippets, newest first.
    async fn latest(&self, limit: i64) -> Result<Vec<Snippet>, StoreError>;
}

/// Persistent storage for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create an account. The password is hashed by the implementation;
    /// plain text never hits the database.
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), StoreError>;

    /// Verify credentials for an active user; returns the user id on
    /// success and `InvalidCredentials` otherwise.
    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, StoreError>;
}
