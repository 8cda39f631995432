//! # テスト用トークン API ハンドラ
//!
//! セキュリティ設定を試すためのテスト用 JWT を発行する。
//!
//! - `GET /v1/tokens/admin` - admin スコープ付きトークン（公開）
//! - `GET /v1/tokens/user` - 標準スコープのトークン（公開）
//! - `GET /v1/tokens/authenticated` - 認証確認用エンドポイント

use axum::{
    extract::{OriginalUri, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{Algorithm, Header};
use serde::Serialize;

use crate::{
    error::{AdapterError, unauthorized_response},
    middleware::{JwtKeys, decode_bearer_claims},
};

/// トークン発行者
pub const ISSUER: &str = "Dummy Authorization Server";

/// トークンの有効期限（1 時間）
const TOKEN_TTL_SECS: i64 = 3600;

/// トークン API の共有状態
#[derive(Clone)]
pub struct TokenState {
    pub keys: JwtKeys,
}

/// 署名対象のクレーム
#[derive(Debug, Serialize)]
struct TokenClaims {
    sub:   String,
    iss:   String,
    iat:   i64,
    exp:   i64,
    scope: String,
}

/// 指定のサブジェクトとスコープでトークンを生成する
pub fn generate_token(
    keys: &JwtKeys,
    subject: &str,
    scope: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = TokenClaims {
        sub:   subject.to_string(),
        iss:   ISSUER.to_string(),
        iat:   now,
        exp:   now + TOKEN_TTL_SECS,
        scope: scope.to_string(),
    };

    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
}

/// GET /v1/tokens/admin
///
/// admin を含む全スコープ付きのテストトークンを発行する。
#[utoipa::path(
   get,
   path = "/v1/tokens/admin",
   tag = "tokens",
   responses((status = 200, description = "発行されたトークン", body = String))
)]
pub async fn admin_token(
    State(state): State<TokenState>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    issue_token(&state, uri.path(), "admin-service", "data:read data:write admin")
}

/// GET /v1/tokens/user
///
/// 標準スコープ（読み書き）のテストトークンを発行する。
#[utoipa::path(
   get,
   path = "/v1/tokens/user",
   tag = "tokens",
   responses((status = 200, description = "発行されたトークン", body = String))
)]
pub async fn user_token(
    State(state): State<TokenState>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    issue_token(&state, uri.path(), "user", "data:read data:write")
}

/// GET /v1/tokens/authenticated
///
/// 有効なトークンでアクセスできたことを確認するエンドポイント。
#[utoipa::path(
   get,
   path = "/v1/tokens/authenticated",
   tag = "tokens",
   responses(
      (status = 200, description = "認証成功", body = String),
      (status = 401, description = "未認証", body = lexadapter_shared::Problem)
   ),
   security(("bearer-jwt" = []))
)]
pub async fn authenticated(
    State(state): State<TokenState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    match decode_bearer_claims(&headers, &state.keys.decoding) {
        Some(claims) => {
            format!("Authenticated as '{}' with scope '{}'", claims.sub, claims.scope)
                .into_response()
        }
        None => unauthorized_response(uri.path()),
    }
}

fn issue_token(state: &TokenState, path: &str, subject: &str, scope: &str) -> Response {
    match generate_token(&state.keys, subject, scope) {
        Ok(token) => token.into_response(),
        Err(error) => AdapterError::Unexpected(format!("トークンの署名に失敗: {error}"))
            .into_problem_response(path),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::middleware::decode_bearer_claims;

    const TEST_SECRET: &str = "test-secret-which-is-long-enough";

    #[test]
    fn test_生成したトークンは自身の鍵で検証できる() {
        let keys = JwtKeys::from_secret(TEST_SECRET);

        let token = generate_token(&keys, "admin-service", "data:read data:write admin").unwrap();

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", format!("Bearer {token}").parse().unwrap());

        let claims = decode_bearer_claims(&headers, &keys.decoding)
            .expect("クレームが検証できること");
        assert_eq!(claims.sub, "admin-service");
        assert_eq!(claims.scope, "data:read data:write admin");
    }
}
