//! # アダプタ設定
//!
//! 環境変数からアダプタの設定を読み込む。

use std::{env, time::Duration};

/// 国キャッシュのデフォルト更新間隔（2 時間）
const DEFAULT_REFRESH_SECS: u64 = 7200;

/// アダプタの設定
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// Lexoffice API のベース URL
    pub lexoffice_api_url: String,
    /// Lexoffice API のサービス用 Bearer トークン
    pub lexoffice_api_token: String,
    /// JWT 署名シークレット（対称 HMAC）
    pub jwt_secret: String,
    /// 国キャッシュの更新間隔
    pub country_cache_refresh: Duration,
}

impl AdapterConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            host: env::var("ADAPTER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("ADAPTER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("ADAPTER_PORT は有効なポート番号である必要があります"),
            lexoffice_api_url: env::var("LEXOFFICE_API_URL")
                .expect("LEXOFFICE_API_URL が設定されていません"),
            lexoffice_api_token: env::var("LEXOFFICE_API_TOKEN")
                .expect("LEXOFFICE_API_TOKEN が設定されていません"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET が設定されていません"),
            country_cache_refresh: Duration::from_secs(parse_refresh_secs(
                env::var("COUNTRY_CACHE_REFRESH_SECS").ok().as_deref(),
            )),
        })
    }
}

/// 更新間隔の秒数をパースする（未設定はデフォルト 2 時間）
fn parse_refresh_secs(value: Option<&str>) -> u64 {
    match value {
        Some(raw) => raw
            .parse()
            .expect("COUNTRY_CACHE_REFRESH_SECS は秒数である必要があります"),
        None => DEFAULT_REFRESH_SECS,
    }
}
