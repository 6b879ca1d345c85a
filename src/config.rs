//! # Configuration Management
//!
//! Configuration comes from environment variables (12-factor style), with a
//! `.env` file picked up in development via dotenvy.
//!
//! ## Environment Variables
//! - `HOST`: bind address (default: 127.0.0.1)
//! - `PORT`: bind port (default: 4000)
//! - `DATABASE_URL`: SQLite connection string
//!   (default: `sqlite:snipbin.db?mode=rwc`)
//! - `SESSION_SECRET`: key material for signing session cookies, at least
//!   64 bytes; a random key is generated when unset, which means sessions
//!   do not survive a restart
//! - `TEMPLATE_DIR`: page/layout/partial templates (default: ./ui/html)
//! - `STATIC_DIR`: static assets served under /static (default: ./ui/static)

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tower_sessions::cookie::Key;

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    session_secret: Option<String>,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
}

// Hand-written so the startup log line never carries the session secret.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("session_secret", &self.session_secret.as_ref().map(|_| "<redacted>"))
            .field("template_dir", &self.template_dir)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment, falling back to development
    /// defaults. Fails only when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        // Missing .env files are fine; real deployments set the environment
        // directly.
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),

            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("PORT must be a valid port number")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:snipbin.db?mode=rwc".to_string()),

            session_secret: env::var("SESSION_SECRET").ok(),

            template_dir: env::var("TEMPLATE_DIR")
                .unwrap_or_else(|_| "./ui/html".to_string())
                .into(),

            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "./ui/static".to_string())
                .into(),
        })
    }

    /// The address `TcpListener::bind` expects.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The key used to sign session cookies.
    ///
    /// Derived from `SESSION_SECRET` when configured so sessions survive
    /// restarts and multiple instances can share cookies; otherwise a fresh
    /// random key.
    pub fn session_key(&self) -> Result<Key> {
        match &self.session_secret {
            Some(secret) => Key::try_from(secret.as_bytes())
                .context("SESSION_SECRET must be at least 64 bytes"),
            None => Ok(Key::generate()),
        }
    }
}
