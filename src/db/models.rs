//! # Storage Models
//!
//! The row types the storage layer hands back. Timestamps are
//! `time::OffsetDateTime` end to end; they serialize as RFC 3339 strings,
//! which is also the shape the `human_date` template filter expects.

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// A stored, time-limited piece of text content.
///
/// A snippet is visible only while the current time is before `expires`;
/// the store enforces that, so an expired snippet is indistinguishable from
/// one that never existed.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires: OffsetDateTime,
}

/// A user account row.
///
/// Deliberately not `Serialize`: the hashed password must never end up in a
/// rendered page or log line by accident.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub active: bool,
    pub created: OffsetDateTime,
}
