//! # 認可の統合テスト
//!
//! ルートグループごとのスコープ検証を実際のルーターで確認する。
//!
//! - `GET /v1/contacts*` は `data:read`、`POST /v1/contacts` は `data:write`
//! - `/v1/cache/**` は `admin`
//! - `/`、`/health`、`/v1/tokens/admin|user`、`/v1/api-docs` は公開

use std::sync::Arc;

use axum::{Router, body::Body, http::Request};
use http::StatusCode;
use httpmock::prelude::*;
use lexadapter::{
    app_builder::build_app,
    cache::CountryCache,
    client::{LexofficeClientImpl, LexofficeCountriesClient},
    handler::tokens::generate_token,
    middleware::JwtKeys,
};
use lexadapter_shared::Problem;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-value!!";

fn test_app(server: &MockServer) -> Router {
    let keys = JwtKeys::from_secret(TEST_SECRET);
    let client = Arc::new(LexofficeClientImpl::new(&server.base_url(), "upstream-token"));
    let cache = Arc::new(CountryCache::new(
        Arc::clone(&client) as Arc<dyn LexofficeCountriesClient>
    ));
    build_app(keys, client, cache)
}

fn token(scope: &str) -> String {
    generate_token(&JwtKeys::from_secret(TEST_SECRET), "test-subject", scope).unwrap()
}

async fn send(app: Router, method: &str, path: &str, bearer: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

#[tokio::test]
async fn test_トークンなしの保護ルートは401のproblemを返す() {
    let server = MockServer::start();

    let response = send(test_app(&server), "GET", "/v1/contacts", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let problem: Problem = serde_json::from_slice(&body).unwrap();
    assert_eq!(problem.status, 401);
    assert_eq!(problem.instance.as_deref(), Some("/v1/contacts"));
}

#[tokio::test]
async fn test_読み取りスコープのみではpostが403になる() {
    let server = MockServer::start();

    let response = send(
        test_app(&server),
        "POST",
        "/v1/contacts",
        Some(&token("data:read")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_書き込みスコープのみではgetが403になる() {
    let server = MockServer::start();

    let response = send(
        test_app(&server),
        "GET",
        "/v1/contacts",
        Some(&token("data:write")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin以外はキャッシュ無効化が403になる() {
    let server = MockServer::start();

    let response = send(
        test_app(&server),
        "POST",
        "/v1/cache/countries/invalidate",
        Some(&token("data:read data:write")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_adminスコープでキャッシュ無効化に成功する() {
    let server = MockServer::start();

    let response = send(
        test_app(&server),
        "POST",
        "/v1/cache/countries/invalidate",
        Some(&token("data:read data:write admin")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Country cache invalidated successfully");
}

#[tokio::test]
async fn test_公開エンドポイントはトークンなしでアクセスできる() {
    let server = MockServer::start();

    for path in ["/", "/health", "/v1/tokens/admin", "/v1/tokens/user", "/v1/api-docs"] {
        let response = send(test_app(&server), "GET", path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "公開のはずのパス: {path}");
    }
}

#[tokio::test]
async fn test_発行したトークンで保護ルートにアクセスできる() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/countries");
        then.status(200)
            .header("content-type", "application/json")
            .header("x-amzn-requestid", "R1")
            .body("[]");
    });
    server.mock(|when, then| {
        when.method(GET).path("/contacts");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"content":[]}"#);
    });

    // /v1/tokens/user で発行されたトークンをそのまま使う
    let app = test_app(&server);
    let token_response = send(app.clone(), "GET", "/v1/tokens/user", None).await;
    let token_bytes = axum::body::to_bytes(token_response.into_body(), usize::MAX).await.unwrap();
    let issued = String::from_utf8(token_bytes.to_vec()).unwrap();

    let response = send(app, "GET", "/v1/contacts", Some(&issued)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_authenticatedエンドポイントはトークンの中身を返す() {
    let server = MockServer::start();

    let response = send(
        test_app(&server),
        "GET",
        "/v1/tokens/authenticated",
        Some(&token("data:read")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("test-subject"), "{text}");
    assert!(text.contains("data:read"), "{text}");
}

#[tokio::test]
async fn test_authenticatedエンドポイントはトークンなしで401になる() {
    let server = MockServer::start();

    let response = send(test_app(&server), "GET", "/v1/tokens/authenticated", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
