//! # アダプタエラーハンドリング
//!
//! リクエストパイプラインが表面化させるすべての失敗を
//! [`AdapterError`] に集約し、統一された Problem レスポンスへ変換する。
//!
//! エラー処理は二段構え:
//!
//! 1. [`crate::client::lexoffice`] が上流の生レスポンスを型付きの
//!    [`LexofficeError`] に正規化する
//! 2. 本モジュールがあらゆる失敗（正規化済み上流エラー、ローカル
//!    バリデーション、分類不能なエラー）を Problem ボディ + HTTP
//!    ステータスへ変換する
//!
//! 上流の相関 ID が分かっている失敗は、`instance` URI の末尾に
//! `/upstream-request/<id>` を付けてクライアントから上流の診断情報へ
//! 辿れるようにする。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lexadapter_shared::{Problem, ValidationError};
use thiserror::Error;

use crate::client::LexofficeError;

/// アダプタ自身のドキュメント URI
///
/// ローカル起因の失敗（バリデーション、国名マッピング欠落、内部エラー）の
/// Problem `type` に使う。上流起因の失敗は正規化時に決まった URI を使う。
pub const ADAPTER_ERROR_DOCS: &str = "https://lexoffice-adapter.bulbt.com/api.html";

/// アダプタ全体の失敗を表す直和型
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// 上流クライアントが正規化したエラー
    #[error(transparent)]
    Lexoffice(#[from] LexofficeError),

    /// 国名マッピングの欠落（502）
    ///
    /// 国コードは作成時に検証されるため、これは上流データ側の不整合を
    /// 意味する。相関 ID はキャッシュを作った `/countries` レスポンスのもの。
    #[error("Country name was not found for country code: {country_code}")]
    CountryMappingMissing {
        country_code:        String,
        upstream_request_id: Option<String>,
    },

    /// ローカル入力バリデーションの失敗（422）
    #[error("リクエストに不正なパラメータが含まれています")]
    LocalValidation(Vec<ValidationError>),

    /// API 契約に定義されていないフィールド（400）
    #[error("Unknown field in request: '{property}' in {referring_type}")]
    UnknownField {
        property:       String,
        referring_type: &'static str,
    },

    /// パス・クエリパラメータの型不一致（400）
    #[error("Failed to convert value '{value}' to required type '{required_type}'")]
    TypeMismatch {
        parameter:     &'static str,
        value:         String,
        required_type: &'static str,
    },

    /// 分類不能なエラー（500）
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl AdapterError {
    /// リクエストパスを添えて Problem レスポンスへ変換する
    ///
    /// すべての失敗は変換前にログへ残る（相関 ID が分かる場合は付記）。
    pub fn into_problem_response(self, path: &str) -> Response {
        let problem = self.to_problem(path);
        let status = StatusCode::from_u16(problem.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(problem)).into_response()
    }

    /// 失敗を Problem ボディへ変換する
    ///
    /// `instance` はリクエストパス。上流の相関 ID が分かる場合は
    /// `/upstream-request/<id>` をパスセグメントとして追加する。
    fn to_problem(&self, path: &str) -> Problem {
        match self {
            AdapterError::Lexoffice(LexofficeError::Validation {
                status,
                title,
                detail,
                docs,
                request_id,
                validation_errors,
            }) => {
                tracing::error!(
                    "Lexoffice バリデーションエラー: {} (Request ID: {})",
                    detail,
                    request_id
                );

                Problem::new(*docs, title, status.as_u16(), detail)
                    .with_instance(instance_with_request_id(path, request_id))
                    .with_validation_errors(validation_errors.clone())
            }

            AdapterError::Lexoffice(LexofficeError::Api {
                status,
                title,
                detail,
                docs,
                request_id,
            }) => {
                tracing::error!("Lexoffice エラー: {} (Request ID: {})", detail, request_id);

                Problem::new(*docs, title, status.as_u16(), detail)
                    .with_instance(instance_with_request_id(path, request_id))
            }

            AdapterError::Lexoffice(LexofficeError::Network(message)) => {
                tracing::error!("Lexoffice への通信エラー: {}", message);

                internal_error_problem().with_instance(path)
            }

            AdapterError::CountryMappingMissing {
                country_code,
                upstream_request_id,
            } => {
                tracing::error!(
                    "国名マッピングが見つかりません: {} (Upstream Request ID: {})",
                    country_code,
                    upstream_request_id.as_deref().unwrap_or("N/A")
                );

                let instance = match upstream_request_id {
                    Some(request_id) => instance_with_request_id(path, request_id),
                    None => path.to_string(),
                };

                Problem::new(
                    ADAPTER_ERROR_DOCS,
                    "Country mapping not found",
                    502,
                    format!("Country name was not found for country code: {country_code}"),
                )
                .with_instance(instance)
            }

            AdapterError::LocalValidation(errors) => {
                tracing::error!("バリデーションエラー: {} 件のフィールドエラー", errors.len());

                Problem::new(
                    ADAPTER_ERROR_DOCS,
                    "Validation Error",
                    422,
                    "The request contains invalid parameters",
                )
                .with_instance(path)
                .with_validation_errors(errors.clone())
            }

            AdapterError::UnknownField {
                property,
                referring_type,
            } => {
                tracing::error!(
                    "未知フィールドエラー: '{}' in {}",
                    property,
                    referring_type
                );

                Problem::new(
                    ADAPTER_ERROR_DOCS,
                    "Validation Error",
                    400,
                    format!("Unknown field in request: '{property}' in {referring_type}"),
                )
                .with_instance(path)
                .with_validation_errors(vec![ValidationError::new(
                    property.clone(),
                    "Unknown field not defined in API contract",
                )])
            }

            AdapterError::TypeMismatch {
                parameter,
                value,
                required_type,
            } => {
                tracing::error!(
                    "型不一致エラー: '{}' を {} に変換できません",
                    value,
                    required_type
                );

                Problem::new(
                    ADAPTER_ERROR_DOCS,
                    "Invalid Parameter",
                    400,
                    format!("Failed to convert value '{value}' to required type '{required_type}'"),
                )
                .with_instance(path)
                .with_validation_errors(vec![ValidationError::new(*parameter, "Invalid format")])
            }

            AdapterError::Unexpected(message) => {
                tracing::error!("予期しないエラー: {}", message);

                internal_error_problem().with_instance(path)
            }
        }
    }
}

/// `instance` URI に `/upstream-request/<id>` セグメントを追加する
fn instance_with_request_id(path: &str, request_id: &str) -> String {
    format!("{path}/upstream-request/{request_id}")
}

/// 500 Internal Server Error の Problem
///
/// detail は固定値（内部情報を漏らさないため）。
fn internal_error_problem() -> Problem {
    Problem::new(
        ADAPTER_ERROR_DOCS,
        "Internal Server Error",
        500,
        "An unexpected error occurred",
    )
}

// --- ミドルウェア用レスポンスヘルパー ---

/// 401 Unauthorized レスポンス
pub fn unauthorized_response(path: &str) -> Response {
    let problem = Problem::new(
        ADAPTER_ERROR_DOCS,
        "Unauthorized",
        401,
        "Full authentication is required to access this resource",
    )
    .with_instance(path);

    (StatusCode::UNAUTHORIZED, Json(problem)).into_response()
}

/// 403 Forbidden レスポンス
pub fn forbidden_response(path: &str) -> Response {
    let problem = Problem::new(
        ADAPTER_ERROR_DOCS,
        "Forbidden",
        403,
        "Insufficient scope for this operation",
    )
    .with_instance(path);

    (StatusCode::FORBIDDEN, Json(problem)).into_response()
}
