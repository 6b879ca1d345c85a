//! # Session Accessors
//!
//! Typed, per-request read/write access to the small key-value bag carried
//! by the signed session cookie. Two keys live in it:
//! - the authenticated user id, set on login and removed on logout
//! - a one-shot flash message, written by a handler and shown on the next
//!   page view only
//!
//! The session layer itself (cookie signing, expiry, lazy creation) is
//! `tower-sessions`; an unsigned or expired cookie is simply "no session"
//! and a fresh empty one appears transparently on the first write. These
//! helpers only pin down the key names and value types so handlers cannot
//! disagree about them.

use tower_sessions::session::Error;
use tower_sessions::Session;

/// Session key holding the logged-in user's id.
pub const AUTH_USER_ID_KEY: &str = "authenticated_user_id";

/// Session key holding the one-shot flash message.
pub const FLASH_KEY: &str = "flash";

/// Record a successful login in the session.
pub async fn put_user_id(session: &Session, user_id: i64) -> Result<(), Error> {
    session.insert(AUTH_USER_ID_KEY, user_id).await
}

/// The authenticated user id, if the session carries one.
pub async fn user_id(session: &Session) -> Result<Option<i64>, Error> {
    session.get(AUTH_USER_ID_KEY).await
}

/// Forget the authenticated user. Used by logout; the rest of the session
/// (e.g. a pending flash) survives.
pub async fn clear_user_id(session: &Session) -> Result<(), Error> {
    session.remove::<i64>(AUTH_USER_ID_KEY).await.map(|_| ())
}

pub async fn is_authenticated(session: &Session) -> Result<bool, Error> {
    Ok(user_id(session).await?.is_some())
}

/// Store a flash message for the next page view.
pub async fn put_flash(session: &Session, message: &str) -> Result<(), Error> {
    session.insert(FLASH_KEY, message).await
}

/// Read and remove the pending flash message in one step, so a page refresh
/// never shows it twice. Returns `None` when nothing is pending.
pub async fn pop_flash(session: &Session) -> Result<Option<String>, Error> {
    session.remove::<String>(FLASH_KEY).await
}
