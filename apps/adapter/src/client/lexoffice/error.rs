//! Lexoffice クライアントのエラー型

use http::StatusCode;
use lexadapter_shared::ValidationError;
use thiserror::Error;

/// Lexoffice クライアントエラー
///
/// 上流の 4xx/5xx は [`decode`](super::decode) がクライアント視点の
/// ステータス・タイトル・詳細・相関 ID 付きで正規化済みの形に変換する。
/// グローバルな失敗変換はこの型をそのまま Problem レスポンスに包むだけでよい。
#[derive(Debug, Clone, Error)]
pub enum LexofficeError {
    /// 上流 API のエラーレスポンス（正規化済み）
    #[error("{title}: {detail}")]
    Api {
        /// クライアントへ返す HTTP ステータス（上流のものとは限らない）
        status:     StatusCode,
        title:      String,
        detail:     String,
        /// Problem の `type` に載せるドキュメント URI
        docs:       &'static str,
        /// 上流レスポンスの相関 ID（ヘッダー欠落時は `unknown-request`）
        request_id: String,
    },

    /// 上流のレガシーバリデーションエラー（422 に正規化済み）
    #[error("{title}: {detail}")]
    Validation {
        status:     StatusCode,
        title:      String,
        detail:     String,
        docs:       &'static str,
        request_id: String,
        validation_errors: Vec<ValidationError>,
    },

    /// ネットワーク / トランスポートエラー（タイムアウト含む）
    #[error("ネットワークエラー: {0}")]
    Network(String),
}

impl From<reqwest::Error> for LexofficeError {
    fn from(err: reqwest::Error) -> Self {
        LexofficeError::Network(err.to_string())
    }
}
