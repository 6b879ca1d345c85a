//! Shared fixtures for the pipeline tests: in-memory stores standing in for
//! SQLite, and a fully wired router with in-memory sessions.

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::response::Parts;
use axum::http::{header, Request};
use axum::Router;
use http_body_util::BodyExt;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;
use tower_sessions::cookie::Key;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use snipbin::db::models::Snippet;
use snipbin::db::{SnippetStore, StoreError, UserStore};
use snipbin::routes;
use snipbin::state::AppState;
use snipbin::templates::{TemplateCache, TemplateFuncs};

/// In-memory `SnippetStore` with a movable clock, so tests can fast-forward
/// past a snippet's expiry without sleeping.
pub struct MemSnippetStore {
    snippets: Mutex<Vec<Snippet>>,
    next_id: AtomicI64,
    clock_skew: Mutex<Duration>,
}

impl MemSnippetStore {
    pub fn new() -> Self {
        Self {
            snippets: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(0),
            clock_skew: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the store's notion of "now" forward.
    pub fn advance(&self, days: i64) {
        let mut skew = self.clock_skew.lock().expect("clock lock");
        *skew += Duration::days(days);
    }

    pub fn count(&self) -> usize {
        self.snippets.lock().expect("snippets lock").len()
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc() + *self.clock_skew.lock().expect("clock lock")
    }
}

#[async_trait]
impl SnippetStore for MemSnippetStore {
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: i64,
    ) -> Result<i64, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = self.now();
        self.snippets.lock().expect("snippets lock").push(Snippet {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created,
            expires: created + Duration::days(expires_days),
        });
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Snippet, StoreError> {
        let now = self.now();
        self.snippets
            .lock()
            .expect("snippets lock")
            .iter()
            .find(|s| s.id == id && s.expires > now)
            .cloned()
            .ok_or(StoreError::NoRecord)
    }

    async fn latest(&self, limit: i64) -> Result<Vec<Snippet>, StoreError> {
        let now = self.now();
        let mut unexpired: Vec<Snippet> = self
            .snippets
            .lock()
            .expect("snippets lock")
            .iter()
            .filter(|s| s.expires > now)
            .cloned()
            .collect();
        unexpired.sort_by(|a, b| b.created.cmp(&a.created));
        unexpired.truncate(limit as usize);
        Ok(unexpired)
    }
}

struct StoredUser {
    id: i64,
    email: String,
    password: String,
}

/// In-memory `UserStore`. Keeps passwords in plain text; it only exists to
/// drive the pipeline in tests.
#[derive(Default)]
pub struct MemUserStore {
    users: Mutex<Vec<StoredUser>>,
    next_id: AtomicI64,
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn insert(&self, _name: &str, email: &str, password: &str) -> Result<(), StoreError> {
        let mut users = self.users.lock().expect("users lock");
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        users.push(StoredUser {
            id,
            email: email.to_string(),
            password: password.to_string(),
        });
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, StoreError> {
        self.users
            .lock()
            .expect("users lock")
            .iter()
            .find(|u| u.email == email && u.password == password)
            .map(|u| u.id)
            .ok_or(StoreError::InvalidCredentials)
    }
}

pub struct TestApp {
    pub router: Router,
    pub snippets: Arc<MemSnippetStore>,
    pub users: Arc<MemUserStore>,
}

/// The full application router over in-memory stores and sessions, with the
/// real templates from ui/html.
pub fn test_app() -> TestApp {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let templates = TemplateCache::build(&manifest_dir.join("ui/html"), TemplateFuncs::standard())
        .expect("template cache builds from ui/html");

    let snippets = Arc::new(MemSnippetStore::new());
    let users = Arc::new(MemUserStore::default());
    let state = AppState::with_stores(snippets.clone(), users.clone(), Arc::new(templates));

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_signed(Key::generate())
        .with_expiry(Expiry::OnInactivity(Duration::hours(12)));

    let router = routes::router(state, session_layer, &manifest_dir.join("ui/static"));
    TestApp { router, snippets, users }
}

/// Drive one request through the router and collect the response.
pub async fn send(router: &Router, request: Request<Body>) -> (Parts, String) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.expect("collect body").to_bytes();
    (parts, String::from_utf8_lossy(&bytes).into_owned())
}

pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("build request")
}

pub fn post_form(path: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("build request")
}

/// The session cookie (name=value) a response set, if any.
pub fn session_cookie(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).to_string())
}

/// The Location header of a redirect.
pub fn location(parts: &Parts) -> &str {
    parts
        .headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
