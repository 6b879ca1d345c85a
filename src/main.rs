//! # Snipbin Server
//!
//! Entry point: wires configuration, storage, the startup-built template
//! cache, signed-cookie sessions, and the middleware chain together, then
//! serves.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::sqlite::SqlitePool;
use time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use snipbin::config::Config;
use snipbin::routes;
use snipbin::state::AppState;
use snipbin::templates::{TemplateCache, TemplateFuncs};

/// How long a session survives without activity.
const SESSION_LIFETIME_HOURS: i64 = 12;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,snipbin=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(?config, "configuration loaded");

    let pool = SqlitePool::connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Everything is parsed up front; a broken template aborts startup here
    // rather than 500ing the first request that needs it.
    let templates = TemplateCache::build(&config.template_dir, TemplateFuncs::standard())?;
    tracing::info!(dir = %config.template_dir.display(), "template cache built");

    let state = AppState::new(pool.clone(), Arc::new(templates));

    // Sessions ride a signed cookie; the data itself lives server-side in
    // the same SQLite database as the snippets.
    let session_store = SqliteStore::new(pool);
    session_store.migrate().await?;
    let session_layer = SessionManagerLayer::new(session_store)
        .with_signed(config.session_key()?)
        .with_expiry(Expiry::OnInactivity(Duration::hours(SESSION_LIFETIME_HOURS)));

    let app = routes::router(state, session_layer, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("starting server on {}", config.bind_address());
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
