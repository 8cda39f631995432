//! # アプリケーション構築
//!
//! DI（クライアント・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    handler::Handler,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use lexadapter_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    cache::CountryCache,
    client::{LexofficeClientImpl, LexofficeContactsClient},
    handler::{
        CacheState,
        ContactsState,
        TokenState,
        admin_token,
        authenticated,
        create_contact,
        get_contact,
        health_check,
        home,
        invalidate_country_cache,
        list_contacts,
        user_token,
    },
    middleware::{JwtKeys, ScopeState, require_scope},
    openapi::openapi_json,
};

/// DI コンテナの構築とルーター定義を行う
///
/// 初期化済みの依存（JWT 鍵、Lexoffice クライアント、国キャッシュ）を
/// 受け取り、State → Router の順に組み立てる。
/// 統合テストは同じ関数でアプリを構築する。
pub fn build_app(
    keys: JwtKeys,
    lexoffice_client: Arc<LexofficeClientImpl>,
    country_cache: Arc<CountryCache>,
) -> Router {
    // 具象型で保持し、State 注入時に必要なトレイトオブジェクトへ coerce する
    let contacts_state = Arc::new(ContactsState {
        lexoffice_client: Arc::clone(&lexoffice_client) as Arc<dyn LexofficeContactsClient>,
        country_cache:    Arc::clone(&country_cache),
    });

    let cache_state = Arc::new(CacheState { country_cache });

    let token_state = TokenState { keys: keys.clone() };

    // 認可ミドルウェア用の状態（スコープ別ルートグループ）
    let read_scope = ScopeState {
        keys:           keys.clone(),
        required_scope: "data:read".to_string(),
    };
    let list_read_scope = read_scope.clone();
    let write_scope = ScopeState {
        keys:           keys.clone(),
        required_scope: "data:write".to_string(),
    };
    let admin_scope = ScopeState {
        keys,
        required_scope: "admin".to_string(),
    };

    // ルーター構築
    // Request ID + TraceLayer により、すべての HTTP リクエストに
    // request_id が付与されログに自動注入される
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/v1/api-docs", get(openapi_json))
        // テスト用トークン API（公開）
        .merge(
            Router::new()
                .route("/v1/tokens/admin", get(admin_token))
                .route("/v1/tokens/user", get(user_token))
                .route("/v1/tokens/authenticated", get(authenticated))
                .with_state(token_state),
        )
        // 連絡先 API（メソッド別にスコープを割り当てる）
        .merge(
            Router::new()
                .route(
                    "/v1/contacts",
                    get(list_contacts.layer(from_fn_with_state(list_read_scope, require_scope)))
                        .post(
                            create_contact
                                .layer(from_fn_with_state(write_scope, require_scope)),
                        ),
                )
                .route(
                    "/v1/contacts/{id}",
                    get(get_contact.layer(from_fn_with_state(read_scope, require_scope))),
                )
                .with_state(contacts_state),
        )
        // キャッシュ管理 API（admin スコープ）
        .merge(
            Router::new()
                .route(
                    "/v1/cache/countries/invalidate",
                    post(invalidate_country_cache),
                )
                .layer(from_fn_with_state(admin_scope, require_scope))
                .with_state(cache_state),
        )
        // Request ID レイヤー（レイヤー順序が重要: 下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: リクエスト受信時に UUID v7 を生成
        // 2. TraceLayer: カスタムスパンに request_id を含め、全ログに自動注入
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
