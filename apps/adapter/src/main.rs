//! # Lexoffice Adapter サーバー
//!
//! サードパーティの連絡先管理 API（Lexoffice）を仲介する薄い HTTP アダプタ。
//!
//! ## 役割
//!
//! - **認証**: Bearer JWT の検証とスコープベースのアクセス制御
//! - **入力検証**: ペイロード・クエリの検証（国コードのキャッシュ照合を含む）
//! - **エラー正規化**: 上流のエラーを統一された Problem レスポンスへ変換
//! - **国名エンリッチメント**: 住所の国コードを英語名に置き換え
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `ADAPTER_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `ADAPTER_PORT` | No | ポート番号（デフォルト: `8080`） |
//! | `LEXOFFICE_API_URL` | **Yes** | Lexoffice API のベース URL |
//! | `LEXOFFICE_API_TOKEN` | **Yes** | サービス用 Bearer トークン |
//! | `JWT_SECRET` | **Yes** | JWT 署名シークレット（HMAC） |
//! | `COUNTRY_CACHE_REFRESH_SECS` | No | 国キャッシュ更新間隔（デフォルト: 7200） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p lexadapter
//!
//! # 本番環境（環境変数を直接指定）
//! LEXOFFICE_API_URL=https://api.lexoffice.io/v1 ... cargo run -p lexadapter --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use lexadapter::{
    app_builder::build_app,
    cache::CountryCache,
    client::{LexofficeClientImpl, LexofficeCountriesClient},
    config::AdapterConfig,
    middleware::JwtKeys,
};
use lexadapter_shared::observability::TracingConfig;
use tokio::net::TcpListener;

/// アダプタサーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. 国キャッシュと定期更新タスクの起動
/// 5. ルーターの構築と HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("adapter");
    lexadapter_shared::observability::init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "adapter").entered();

    // 設定読み込み
    let config = AdapterConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!("アダプタサーバーを起動します: {}:{}", config.host, config.port);

    // 依存関係の初期化
    let keys = JwtKeys::from_secret(&config.jwt_secret);
    let lexoffice_client = Arc::new(LexofficeClientImpl::new(
        &config.lexoffice_api_url,
        &config.lexoffice_api_token,
    ));
    let country_cache = Arc::new(CountryCache::new(
        Arc::clone(&lexoffice_client) as Arc<dyn LexofficeCountriesClient>
    ));

    // 国キャッシュの定期更新タスク（最初の tick でキャッシュが温まる）
    let _refresh_task = country_cache.spawn_refresh_task(config.country_cache_refresh);

    // ルーター構築
    let app = build_app(keys, lexoffice_client, country_cache);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("アダプタサーバーが起動しました: {}", addr);

    // Graceful shutdown は axum::serve が自動的に処理する
    axum::serve(listener, app).await?;

    Ok(())
}
