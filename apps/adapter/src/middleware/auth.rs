//! # 認可ミドルウェア
//!
//! Bearer JWT を検証し、スコープベースのアクセス制御を実現する。
//!
//! トークンの `scope` クレームは空白区切りの文字列
//! （例: `"data:read data:write admin"`）。ルートグループごとに
//! 要求スコープを持つ [`ScopeState`] を割り当てる。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let read_scope = ScopeState {
//!     keys:           keys.clone(),
//!     required_scope: "data:read".to_string(),
//! };
//!
//! Router::new()
//!     .route("/v1/contacts", get(list_contacts))
//!     .layer(from_fn_with_state(read_scope, require_scope))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};
use serde::Deserialize;

use crate::error::{forbidden_response, unauthorized_response};

/// JWT の署名・検証鍵ペア（対称 HMAC-SHA256）
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: Arc<EncodingKey>,
    pub decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// 共有シークレットから鍵ペアを作成する
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// 検証で取り出すクレーム
#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub:   String,
    /// 空白区切りのスコープ（欠落時は空文字列 = スコープなし）
    #[serde(default)]
    pub scope: String,
    pub exp:   usize,
}

/// 認可ミドルウェアの状態
#[derive(Clone)]
pub struct ScopeState {
    pub keys:           JwtKeys,
    pub required_scope: String,
}

/// 認可ミドルウェア
///
/// Bearer トークンを検証し、要求されたスコープを満たすか確認する。
/// トークンが無い・無効な場合は 401、スコープ不足の場合は 403 の
/// Problem レスポンスを返す。
pub async fn require_scope(
    State(state): State<ScopeState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let Some(claims) = decode_bearer_claims(request.headers(), &state.keys.decoding) else {
        return unauthorized_response(&path);
    };

    let has_scope = claims
        .scope
        .split_whitespace()
        .any(|scope| scope == state.required_scope);

    if !has_scope {
        return forbidden_response(&path);
    }

    next.run(request).await
}

/// Authorization ヘッダーの Bearer トークンを検証してクレームを取り出す
///
/// ヘッダー欠落・形式不正・署名不正・期限切れはすべて `None`。
pub fn decode_bearer_claims(headers: &HeaderMap, key: &DecodingKey) -> Option<Claims> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;

    let validation = Validation::new(Algorithm::HS256);
    jsonwebtoken::decode::<Claims>(token, key, &validation)
        .map(|data| data.claims)
        .ok()
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
        middleware::from_fn_with_state,
        response::IntoResponse,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::handler::tokens::generate_token;

    const TEST_SECRET: &str = "test-secret-which-is-long-enough";

    /// テスト用のダミーハンドラ
    async fn dummy_handler() -> impl IntoResponse {
        StatusCode::OK
    }

    fn create_test_app(required_scope: &str) -> Router {
        let scope_state = ScopeState {
            keys:           JwtKeys::from_secret(TEST_SECRET),
            required_scope: required_scope.to_string(),
        };

        Router::new()
            .route("/test", get(dummy_handler))
            .layer(from_fn_with_state(scope_state, require_scope))
    }

    fn request_with_token(token: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri("/test")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_要求スコープを持つトークンは通過する() {
        // Given
        let sut = create_test_app("data:read");
        let keys = JwtKeys::from_secret(TEST_SECRET);
        let token = generate_token(&keys, "user", "data:read data:write").unwrap();

        // When
        let response = sut.oneshot(request_with_token(&token)).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_スコープ不足のトークンは403を返す() {
        // Given
        let sut = create_test_app("admin");
        let keys = JwtKeys::from_secret(TEST_SECRET);
        let token = generate_token(&keys, "user", "data:read data:write").unwrap();

        // When
        let response = sut.oneshot(request_with_token(&token)).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_トークンなしは401を返す() {
        // Given
        let sut = create_test_app("data:read");

        // When
        let response = sut
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_署名の異なるトークンは401を返す() {
        // Given
        let sut = create_test_app("data:read");
        let other_keys = JwtKeys::from_secret("a-completely-different-secret!!");
        let token = generate_token(&other_keys, "user", "data:read").unwrap();

        // When
        let response = sut.oneshot(request_with_token(&token)).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bearer以外のauthorizationヘッダーは401を返す() {
        // Given
        let sut = create_test_app("data:read");

        // When
        let response = sut
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/test")
                    .header("Authorization", "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
