//! SQLite-backed user storage with argon2 password hashing.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::db::models::User;
use crate::db::{StoreError, UserStore};

/// `UserStore` over a shared sqlx connection pool.
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), StoreError> {
        // Argon2id with a fresh random salt; the PHC string carries the
        // salt and parameters alongside the hash.
        let salt = SaltString::generate(&mut OsRng);
        let hashed_password = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| StoreError::Hash(e.to_string()))?
            .to_string();

        let result = sqlx::query(
            "INSERT INTO users (name, email, hashed_password, created)
             VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(&hashed_password)
        .bind(OffsetDateTime::now_utc())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // The unique index on email is how "exactly one active user per
            // email" is enforced; surface it as the domain conflict.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::DuplicateEmail)
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, hashed_password, active, created FROM users
             WHERE email = ? AND active = TRUE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        // Unknown email and wrong password take the same exit so the
        // response cannot be used to probe which addresses have accounts.
        let Some(user) = user else {
            return Err(StoreError::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&user.hashed_password)
            .map_err(|e| StoreError::Hash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(user.id),
            Err(argon2::password_hash::Error::Password) => Err(StoreError::InvalidCredentials),
            Err(e) => Err(StoreError::Hash(e.to_string())),
        }
    }
}
