//! # キャッシュ管理 API ハンドラ
//!
//! 国キャッシュの手動無効化エンドポイントを提供する。
//!
//! - `POST /v1/cache/countries/invalidate` - 国キャッシュ無効化（`admin` スコープ）

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse};

use crate::cache::CountryCache;

/// キャッシュ管理 API の共有状態
pub struct CacheState {
    pub country_cache: Arc<CountryCache>,
}

/// POST /v1/cache/countries/invalidate
///
/// 国キャッシュを無効化する。次回の参照または定期更新で
/// Lexoffice API から再取得される。
#[utoipa::path(
   post,
   path = "/v1/cache/countries/invalidate",
   tag = "cache",
   responses(
      (status = 200, description = "キャッシュ無効化成功"),
      (status = 401, description = "未認証", body = lexadapter_shared::Problem),
      (status = 403, description = "admin スコープなし", body = lexadapter_shared::Problem)
   ),
   security(("bearer-jwt" = []))
)]
pub async fn invalidate_country_cache(State(state): State<Arc<CacheState>>) -> impl IntoResponse {
    state.country_cache.invalidate();
    "Country cache invalidated successfully"
}
