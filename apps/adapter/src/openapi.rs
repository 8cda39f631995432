//! # OpenAPI 仕様定義
//!
//! utoipa を使用してアダプタの OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。

use axum::Json;
use utoipa::{
    Modify,
    OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::handler::{cache, contacts, health, home, tokens};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "Lexoffice Adapter API",
      version = "0.1.0",
      description = "Lexoffice API の連絡先エンドポイントを仲介する薄い HTTP アダプタ"
   ),
   paths(
      // home / health
      home::home,
      health::health_check,
      // contacts
      contacts::create_contact,
      contacts::get_contact,
      contacts::list_contacts,
      // cache
      cache::invalidate_country_cache,
      // tokens
      tokens::admin_token,
      tokens::user_token,
      tokens::authenticated,
   ),
   components(schemas(
      lexadapter_shared::Problem,
      lexadapter_shared::ValidationError,
   )),
   tags(
      (name = "home", description = "API 説明"),
      (name = "health", description = "ヘルスチェック"),
      (name = "contacts", description = "連絡先管理"),
      (name = "cache", description = "キャッシュ管理"),
      (name = "tokens", description = "テスト用トークン発行"),
   ),
   modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// セキュリティスキーム定義
///
/// Bearer JWT 認証を追加する。
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "bearer-jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// GET /v1/api-docs
///
/// OpenAPI ドキュメントを JSON で返す。
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
