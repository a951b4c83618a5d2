//! Router-level tests for the browser-facing endpoints.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use httpmock::prelude::*;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use relier_backend::{Account, OidcConfig};
use relier_server::{create_router, AppState, ServerConfig};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tower::ServiceExt;
use uuid::Uuid;

const CLIENT_SECRET: &str = "s3cret";

fn server_config() -> ServerConfig {
    ServerConfig {
        bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
        login_redirect_url: "/welcome".to_string(),
        login_redirect_url_failure: "/login-failed".to_string(),
    }
}

fn oidc_config(provider: &MockServer) -> OidcConfig {
    OidcConfig {
        token_endpoint: provider.url("/token"),
        userinfo_endpoint: provider.url("/userinfo"),
        authorization_endpoint: provider.url("/authorize"),
        client_id: "client1".into(),
        client_secret: CLIENT_SECRET.into(),
        client_secret_encoded: false,
        callback_url: "http://rp.example.com/oidc/callback".into(),
        verify_jwt: true,
        verify_ssl: true,
        create_user: true,
        http_timeout: Duration::from_secs(5),
    }
}

fn id_token() -> String {
    let exp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
        + 3600;
    encode(
        &Header::new(Algorithm::HS256),
        &json!({"aud": "client1", "sub": "subject-1", "exp": exp}),
        &EncodingKey::from_secret(CLIENT_SECRET.as_bytes()),
    )
    .unwrap()
}

async fn mock_happy_provider(provider: &MockServer) {
    provider
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(200).json_body(json!({
                "id_token": id_token(),
                "access_token": "tok",
            }));
        })
        .await;
    provider
        .mock_async(|when, then| {
            when.method(GET).path("/userinfo");
            then.status(200).json_body(json!({"email": "a@example.com"}));
        })
        .await;
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("expected a redirect")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn authenticate_redirects_to_the_provider() {
    let provider = MockServer::start_async().await;
    let state = Arc::new(AppState::new(oidc_config(&provider), &server_config()).unwrap());
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/oidc/authenticate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with(&provider.url("/authorize")));
    assert!(target.contains("response_type=code"));
    assert!(target.contains("scope=openid"));
    assert!(target.contains("client_id=client1"));
}

#[tokio::test]
async fn callback_without_parameters_redirects_to_failure() {
    let provider = MockServer::start_async().await;
    let state = Arc::new(AppState::new(oidc_config(&provider), &server_config()).unwrap());
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/oidc/callback")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login-failed");
}

#[tokio::test]
async fn successful_callback_logs_in_and_redirects_to_success() {
    let provider = MockServer::start_async().await;
    mock_happy_provider(&provider).await;

    let state = Arc::new(AppState::new(oidc_config(&provider), &server_config()).unwrap());
    let app = create_router(Arc::clone(&state));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/oidc/callback?code=authcode&state=st")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/welcome");

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("expected a session cookie")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("relier_session="));

    // First login provisioned exactly one account.
    assert_eq!(state.store.len().await, 1);
}

#[tokio::test]
async fn inactive_account_is_not_logged_in() {
    let provider = MockServer::start_async().await;
    mock_happy_provider(&provider).await;

    let state = Arc::new(AppState::new(oidc_config(&provider), &server_config()).unwrap());
    state
        .store
        .insert(Account {
            id: Uuid::new_v4(),
            username: "disabled".into(),
            email: "a@example.com".into(),
            active: false,
        })
        .await;
    let app = create_router(Arc::clone(&state));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/oidc/callback?code=authcode&state=st")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login-failed");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn callback_rejects_non_get_methods() {
    let provider = MockServer::start_async().await;
    let state = Arc::new(AppState::new(oidc_config(&provider), &server_config()).unwrap());
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/oidc/callback")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
