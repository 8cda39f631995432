//! # ヘルスチェックハンドラ
//!
//! アダプタの稼働状態を確認するためのエンドポイント。
//!
//! - `/health` — Liveness Check（常に `"healthy"` を返す）

use axum::Json;
use lexadapter_shared::HealthResponse;

/// アダプタのヘルスチェックエンドポイント
#[utoipa::path(
   get,
   path = "/health",
   tag = "health",
   responses(
      (status = 200, description = "サーバー稼働中", body = HealthResponse)
   )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
