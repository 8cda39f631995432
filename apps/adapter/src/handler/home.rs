//! # API 説明ハンドラ
//!
//! ルートパスで静的な API 説明を返す。

use axum::Json;
use serde::Serialize;

/// API 説明レスポンス
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ApiDescription {
    pub name:          String,
    pub version:       String,
    pub description:   String,
    pub documentation: String,
}

/// GET /
///
/// アダプタの静的な説明とドキュメントへのポインタを返す。
#[utoipa::path(
   get,
   path = "/",
   tag = "home",
   responses((status = 200, description = "API 説明", body = ApiDescription))
)]
pub async fn home() -> Json<ApiDescription> {
    Json(ApiDescription {
        name:          "Lexoffice Adapter".to_string(),
        version:       env!("CARGO_PKG_VERSION").to_string(),
        description:   "Lexoffice API の連絡先エンドポイントを仲介する薄い HTTP アダプタ"
            .to_string(),
        documentation: "/v1/api-docs".to_string(),
    })
}
