//! End-to-end tests of the request pipeline: middleware ordering, the
//! authentication gate, id normalization, form validation round trips, and
//! the snippet lifecycle against a simulated clock.

mod common;

use axum::http::response::Parts;
use axum::http::StatusCode;
use common::{get, location, post_form, send, session_cookie, test_app, TestApp};

const SIGNUP_BODY: &str = "name=Alice&email=alice%40example.com&password=secret-password-123";
const LOGIN_BODY: &str = "email=alice%40example.com&password=secret-password-123";

/// Sign up and log in, returning the authenticated session cookie.
async fn login(app: &TestApp) -> String {
    let (parts, _) = send(&app.router, post_form("/user/signup", SIGNUP_BODY, None)).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER, "signup should redirect");

    let (parts, _) = send(&app.router, post_form("/user/login", LOGIN_BODY, None)).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER, "login should redirect");
    assert_eq!(location(&parts), "/snippet/create");
    session_cookie(&parts).expect("login sets a session cookie")
}

fn assert_security_headers(parts: &Parts) {
    assert_eq!(
        parts.headers.get("X-Frame-Options").map(|v| v.as_bytes()),
        Some(b"deny".as_slice())
    );
    assert_eq!(
        parts.headers.get("X-XSS-Protection").map(|v| v.as_bytes()),
        Some(b"1; mode=block".as_slice())
    );
}

#[tokio::test]
async fn ping_is_public_and_returns_ok() {
    let app = test_app();
    let (parts, body) = send(&app.router, get("/ping", None)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn security_headers_are_set_on_every_response() {
    let app = test_app();

    let (parts, _) = send(&app.router, get("/", None)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_security_headers(&parts);

    // Error responses go through the same chain.
    let (parts, _) = send(&app.router, get("/snippet/999", None)).await;
    assert_eq!(parts.status, StatusCode::NOT_FOUND);
    assert_security_headers(&parts);
}

#[tokio::test]
async fn malformed_snippet_ids_read_as_not_found() {
    let app = test_app();

    let (parts, absent_body) = send(&app.router, get("/snippet/12345", None)).await;
    assert_eq!(parts.status, StatusCode::NOT_FOUND);

    // Zero, negative, and non-numeric ids are indistinguishable from a
    // genuinely absent one.
    for path in ["/snippet/0", "/snippet/-5", "/snippet/abc"] {
        let (parts, body) = send(&app.router, get(path, None)).await;
        assert_eq!(parts.status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body, absent_body, "{path}");
    }
}

#[tokio::test]
async fn anonymous_requests_to_gated_routes_redirect_to_login() {
    let app = test_app();

    let (parts, _) = send(&app.router, get("/snippet/create", None)).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);
    assert_eq!(location(&parts), "/user/login");

    // The wrapped handler must not run: a valid POST still writes nothing.
    let body = "title=O+snail&content=haiku+text&expires=7";
    let (parts, _) = send(&app.router, post_form("/snippet/create", body, None)).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);
    assert_eq!(location(&parts), "/user/login");
    assert_eq!(app.snippets.count(), 0);
}

#[tokio::test]
async fn snippet_lifecycle_create_show_expire() {
    let app = test_app();
    let cookie = login(&app).await;

    // The gated form page is reachable and marked uncacheable.
    let (parts, body) = send(&app.router, get("/snippet/create", Some(&cookie))).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(
        parts.headers.get("Cache-Control").map(|v| v.as_bytes()),
        Some(b"no-store".as_slice())
    );
    assert!(body.contains("Publish snippet"));

    let form = "title=O+snail&content=haiku+text&expires=7";
    let (parts, _) = send(&app.router, post_form("/snippet/create", form, Some(&cookie))).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);
    let snippet_url = location(&parts).to_string();
    assert_eq!(snippet_url, "/snippet/1");

    let (parts, body) = send(&app.router, get(&snippet_url, Some(&cookie))).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("O snail"));
    assert!(body.contains("haiku text"));

    // 8 simulated days later the 7-day snippet reads as absent.
    app.snippets.advance(8);
    let (parts, _) = send(&app.router, get(&snippet_url, Some(&cookie))).await;
    assert_eq!(parts.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn home_lists_latest_unexpired_snippets() {
    let app = test_app();
    let cookie = login(&app).await;

    for (title, days) in [("one+day", "1"), ("one+week", "7")] {
        let form = format!("title={title}&content=text&expires={days}");
        let (parts, _) =
            send(&app.router, post_form("/snippet/create", &form, Some(&cookie))).await;
        assert_eq!(parts.status, StatusCode::SEE_OTHER);
    }

    let (parts, body) = send(&app.router, get("/", None)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("one day"));
    assert!(body.contains("one week"));

    // Two days on, only the week-long snippet is still listed.
    app.snippets.advance(2);
    let (_, body) = send(&app.router, get("/", None)).await;
    assert!(!body.contains("one day"));
    assert!(body.contains("one week"));
}

#[tokio::test]
async fn invalid_create_form_redisplays_with_field_errors() {
    let app = test_app();
    let cookie = login(&app).await;

    let form = "title=&content=haiku+text&expires=0";
    let (parts, body) = send(&app.router, post_form("/snippet/create", form, Some(&cookie))).await;

    // Validation failures are a display concern, not a transport failure.
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("This field cannot be blank"));
    assert!(body.contains("This field is invalid"));
    assert!(body.contains("haiku text"), "submitted values are re-populated");
    assert_eq!(app.snippets.count(), 0);
}

#[tokio::test]
async fn overlong_title_redisplays_with_length_error() {
    let app = test_app();
    let cookie = login(&app).await;

    let form = format!("title={}&content=text&expires=7", "x".repeat(101));
    let (parts, body) =
        send(&app.router, post_form("/snippet/create", &form, Some(&cookie))).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("This field is too long (maximum is 100 characters)"));
    assert_eq!(app.snippets.count(), 0);
}

#[tokio::test]
async fn flash_message_displays_exactly_once() {
    let app = test_app();
    let cookie = login(&app).await;

    let form = "title=O+snail&content=haiku+text&expires=7";
    let (_, _) = send(&app.router, post_form("/snippet/create", form, Some(&cookie))).await;

    let (_, body) = send(&app.router, get("/", Some(&cookie))).await;
    assert!(body.contains("Snippet successfully created!"));

    // A refresh must not repeat it.
    let (_, body) = send(&app.router, get("/", Some(&cookie))).await;
    assert!(!body.contains("Snippet successfully created!"));
}

#[tokio::test]
async fn duplicate_email_attaches_error_to_the_email_field() {
    let app = test_app();

    let (parts, _) = send(&app.router, post_form("/user/signup", SIGNUP_BODY, None)).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);

    let (parts, body) = send(&app.router, post_form("/user/signup", SIGNUP_BODY, None)).await;
    assert_eq!(parts.status, StatusCode::OK, "conflict redisplays, not 5xx");
    assert!(body.contains("Address is already in use"));
}

#[tokio::test]
async fn signup_validation_rejects_bad_input() {
    let app = test_app();

    let body = "name=Alice&email=not-an-email&password=short";
    let (parts, page) = send(&app.router, post_form("/user/signup", body, None)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(page.contains("This field is invalid"));
    assert!(page.contains("This field is too short (minimum is 10 characters)"));
}

#[tokio::test]
async fn login_rejects_bad_credentials_without_detail() {
    let app = test_app();
    let (parts, _) = send(&app.router, post_form("/user/signup", SIGNUP_BODY, None)).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);

    let wrong = "email=alice%40example.com&password=wrong-password-123";
    let (parts, body) = send(&app.router, post_form("/user/login", wrong, None)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("Email or Password is incorrect"));
}

#[tokio::test]
async fn logout_ends_the_authenticated_session() {
    let app = test_app();
    let cookie = login(&app).await;

    let (parts, _) = send(&app.router, post_form("/user/logout", "", Some(&cookie))).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);
    assert_eq!(location(&parts), "/");
    // Logout cycles the session id, so pick up the fresh cookie.
    let cookie = session_cookie(&parts).expect("logout refreshes the cookie");

    let (_, body) = send(&app.router, get("/", Some(&cookie))).await;
    assert!(body.contains("You&#x27;ve been logged out successfully!") ||
            body.contains("You've been logged out successfully!"));

    let (parts, _) = send(&app.router, get("/snippet/create", Some(&cookie))).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);
    assert_eq!(location(&parts), "/user/login");
}

#[tokio::test]
async fn static_assets_are_served_without_directory_listings() {
    let app = test_app();

    let (parts, body) = send(&app.router, get("/static/css/main.css", None)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("font-family"));

    // No index file in these directories, so they must 404, never list.
    for path in ["/static/", "/static/css/"] {
        let (parts, _) = send(&app.router, get(path, None)).await;
        assert_eq!(parts.status, StatusCode::NOT_FOUND, "{path}");
    }
}
