//! # 国キャッシュの統合テスト
//!
//! 実際のルーター経由で、キャッシュのライフサイクル
//! （遅延初期化 → 参照 → 無効化 → 再初期化）と相関 ID の再利用を検証する。

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
const CONTACT_ID: &str = "254a114d-b8f5-4f77-9961-a19b87bbf10e";

fn test_app(server: &MockServer) -> Router {
    let keys = JwtKeys::from_secret(TEST_SECRET);
    let client = Arc::new(LexofficeClientImpl::new(&server.base_url(), "upstream-token"));
    let cache = Arc::new(CountryCache::new(
        Arc::clone(&client) as Arc<dyn LexofficeCountriesClient>
    ));
    build_app(keys, client, cache)
}

fn admin_token() -> String {
    generate_token(
        &JwtKeys::from_secret(TEST_SECRET),
        "admin-service",
        "data:read data:write admin",
    )
    .unwrap()
}

async fn send(app: Router, method: &str, path: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header("Authorization", format!("Bearer {}", admin_token()))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn problem_body(response: axum::response::Response) -> Problem {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_連続する国名解決の失敗は同じ相関idを使い上流は一度だけ呼ばれる() {
    let server = MockServer::start();
    let countries = server.mock(|when, then| {
        when.method(GET).path("/countries");
        then.status(200)
            .header("content-type", "application/json")
            .header("x-amzn-requestid", "R1")
            .body(r#"[{"countryCode":"DE","countryNameEN":"Germany","countryNameDE":"Deutschland","taxClassification":"de"}]"#);
    });
    server.mock(|when, then| {
        when.method(GET).path(format!("/contacts/{CONTACT_ID}"));
        then.status(200)
            .header("content-type", "application/json")
            .body(format!(
                r#"{{"id":"{CONTACT_ID}","addresses":{{"billing":[{{"countryCode":"XX"}}]}}}}"#
            ));
    });

    let app = test_app(&server);

    // 無効化してから 2 回連続で国名解決に失敗させる
    let invalidated = send(app.clone(), "POST", "/v1/cache/countries/invalidate").await;
    assert_eq!(invalidated.status(), StatusCode::OK);

    let first = send(app.clone(), "GET", &format!("/v1/contacts/{CONTACT_ID}")).await;
    let second = send(app, "GET", &format!("/v1/contacts/{CONTACT_ID}")).await;

    assert_eq!(first.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(second.status(), StatusCode::BAD_GATEWAY);

    let first_problem = problem_body(first).await;
    let second_problem = problem_body(second).await;

    let expected_instance = format!("/v1/contacts/{CONTACT_ID}/upstream-request/R1");
    assert_eq!(first_problem.instance.as_deref(), Some(&*expected_instance));
    assert_eq!(second_problem.instance.as_deref(), Some(&*expected_instance));

    // 遅延初期化は 1 回だけ
    countries.assert_calls(1);
}

#[tokio::test]
async fn test_無効化後の次の参照で一度だけ再取得する() {
    let server = MockServer::start();
    let countries = server.mock(|when, then| {
        when.method(GET).path("/countries");
        then.status(200)
            .header("content-type", "application/json")
            .header("x-amzn-requestid", "R1")
            .body(r#"[{"countryCode":"DE","countryNameEN":"Germany","countryNameDE":"Deutschland","taxClassification":"de"}]"#);
    });
    server.mock(|when, then| {
        when.method(GET).path(format!("/contacts/{CONTACT_ID}"));
        then.status(200)
            .header("content-type", "application/json")
            .body(format!(
                r#"{{"id":"{CONTACT_ID}","addresses":{{"billing":[{{"countryCode":"DE"}}]}}}}"#
            ));
    });

    let app = test_app(&server);

    // 初期化 → 無効化（2 回、冪等） → 参照 2 回
    let warm = send(app.clone(), "GET", &format!("/v1/contacts/{CONTACT_ID}")).await;
    assert_eq!(warm.status(), StatusCode::OK);

    for _ in 0..2 {
        let response = send(app.clone(), "POST", "/v1/cache/countries/invalidate").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let first = send(app.clone(), "GET", &format!("/v1/contacts/{CONTACT_ID}")).await;
    let second = send(app, "GET", &format!("/v1/contacts/{CONTACT_ID}")).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    // 初期化 1 回 + 無効化後の再初期化 1 回
    countries.assert_calls(2);
}

#[tokio::test]
async fn test_countriesの上流エラーは呼び出し元の問題として表面化する() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/countries");
        then.status(503)
            .header("x-amzn-requestid", "R5")
            .body(r#"{"message":"Service temporarily unavailable"}"#);
    });
    server.mock(|when, then| {
        when.method(GET).path(format!("/contacts/{CONTACT_ID}"));
        then.status(200)
            .header("content-type", "application/json")
            .body(format!(
                r#"{{"id":"{CONTACT_ID}","addresses":{{"billing":[{{"countryCode":"DE"}}]}}}}"#
            ));
    });

    let response = send(
        test_app(&server),
        "GET",
        &format!("/v1/contacts/{CONTACT_ID}"),
    )
    .await;

    // 国キャッシュの遅延初期化が 503 → 502 として正規化される
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let problem = problem_body(response).await;
    assert_eq!(problem.title, "Lexoffice API temporarily unavailable");
    assert_eq!(
        problem.instance.as_deref(),
        Some(&*format!("/v1/contacts/{CONTACT_ID}/upstream-request/R5"))
    );
}
