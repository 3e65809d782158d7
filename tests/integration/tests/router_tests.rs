//! Router tests
//!
//! Requests that are answered before any query runs: authentication,
//! path and body validation, health and middleware. The pool connects
//! lazily and is never used, so no database is required.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use integration_tests::{lazy_app_state, session_token, unique_id};
use serde_json::Value;
use tower::ServiceExt;
use unstory_api::create_app;
use unstory_core::UserProfile;

fn app() -> (Router, String, UserProfile) {
    let state = lazy_app_state().unwrap();
    let profile = UserProfile {
        id: unique_id(),
        email: "reader@example.com".to_string(),
        username: Some("reader".to_string()),
        name: Some("Reader".to_string()),
        avatar: None,
    };
    let token = session_token(state.config(), &profile).unwrap();
    (create_app(state), token, profile)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_health_is_served_with_a_request_id() {
    let (app, _, _) = app();

    let response = app
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_writes_require_sign_in() {
    let cases = [
        (Method::POST, "/api/v1/posts"),
        (Method::POST, "/api/v1/posts/some-post/like"),
        (Method::POST, "/api/v1/posts/some-post/publish"),
        (Method::DELETE, "/api/v1/posts/some-post"),
        (Method::GET, "/api/v1/users/@me"),
        (Method::POST, "/api/v1/users/42/follow"),
    ];

    for (method, uri) in cases {
        let (app, _, _) = app();
        let (status, body) = send(app, request(method.clone(), uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["error"]["code"], "AUTHENTICATION_REQUIRED");
    }
}

#[tokio::test]
async fn test_invalid_token_counts_as_signed_out() {
    let (app, _, _) = app();

    let (status, body) = send(
        app,
        request(Method::GET, "/api/v1/users/@me", Some("not-a-jwt"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTHENTICATION_REQUIRED");
}

#[tokio::test]
async fn test_malformed_user_id_is_bad_request() {
    let (app, _, _) = app();

    let (status, body) = send(
        app,
        request(Method::GET, "/api/v1/users/not-a-number/stats", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_self_follow_is_rejected() {
    let (app, token, profile) = app();
    let uri = format!("/api/v1/users/{}/follow", profile.id);

    let (status, body) = send(app, request(Method::POST, &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "CANNOT_FOLLOW_SELF");
}

#[tokio::test]
async fn test_post_body_is_validated() {
    let (app, token, _) = app();

    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/v1/posts",
            Some(&token),
            Some(r#"{"title": "", "content": {}}"#),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["title"].is_array());
}

#[tokio::test]
async fn test_too_many_tags_are_rejected() {
    let (app, token, _) = app();
    let tags: Vec<String> = (0..11).map(|i| format!("\"tag{i}\"")).collect();
    let json = format!(r#"{{"title": "Tagged", "tags": [{}]}}"#, tags.join(","));

    let (status, body) = send(
        app,
        request(Method::POST, "/api/v1/posts", Some(&token), Some(&json)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, token, _) = app();

    let (status, body) = send(
        app,
        request(
            Method::PATCH,
            "/api/v1/users/@me",
            Some(&token),
            Some("{not json"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}
