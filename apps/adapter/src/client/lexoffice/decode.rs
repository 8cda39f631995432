//! # 上流エラーの正規化
//!
//! 上流の 4xx/5xx レスポンスを `(ステータス, 相関 ID, ボディ)` から
//! [`LexofficeError`] へ変換する単一の純関数。
//!
//! ## ステータス別の変換規則
//!
//! | 上流 | クライアントへ | 備考 |
//! |---|---|---|
//! | 406 + レガシーボディ | 422 | イシューをフィールドエラーに展開 |
//! | 406 + 不正ボディ | 502 | |
//! | 401 | 401 | 唯一ステータスを透過する認可エラー |
//! | 403 | 502 | 上流認可の失敗はゲートウェイ障害として扱う |
//! | 400 | 502 | |
//! | 503 | 502 | ステータスページへ誘導 |
//! | その他 4xx | そのまま | レガシーボディがあれば詳細を抽出 |
//! | その他 5xx | 502 | 同上 |

use http::StatusCode;
use lexadapter_shared::ValidationError;

use super::{
    CONTACT_DOCS,
    STATUS_DOCS,
    TOKEN_DOCS,
    error::LexofficeError,
    types::{LegacyError, LegacyIssue},
};

/// ボディが読めなかった場合の代替文言
const ERROR_REASON_FALLBACK: &str = "No additional information available";

/// 上流のエラーレスポンスを [`LexofficeError`] へ変換する
///
/// 呼び出し側は 4xx/5xx のレスポンスに対してのみ呼び出すこと。
/// ボディは一度しか読めないため、読み取り済みの文字列を受け取る
/// （読み取りに失敗した場合は `None`）。
pub fn translate(status: StatusCode, request_id: String, body: Option<String>) -> LexofficeError {
    match status {
        StatusCode::NOT_ACCEPTABLE => not_acceptable(status, request_id, body),
        StatusCode::UNAUTHORIZED => unauthorized(request_id, body),
        StatusCode::FORBIDDEN => forbidden(request_id, body),
        StatusCode::BAD_REQUEST => bad_request(request_id, body),
        StatusCode::SERVICE_UNAVAILABLE => service_unavailable(request_id),
        _ => remaining_error_codes(status, request_id, body),
    }
}

/// 406: レガシーボディが読めれば 422 のバリデーションエラー、読めなければ 502
fn not_acceptable(status: StatusCode, request_id: String, body: Option<String>) -> LexofficeError {
    match parse_legacy_error(body.as_deref()) {
        Some(legacy) => LexofficeError::Validation {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            title: "Lexoffice Validation Error".to_string(),
            detail: "The following validations are enforced by the lexoffice api. Refer to the documentation."
                .to_string(),
            docs: CONTACT_DOCS,
            request_id,
            validation_errors: extract_legacy_errors(&legacy),
        },
        None => LexofficeError::Api {
            status: StatusCode::BAD_GATEWAY,
            title: "Bad Gateway".to_string(),
            detail: format!(
                "The upstream service returned invalid or malformed error format. Retrieved status code: {}",
                status.as_u16()
            ),
            docs: CONTACT_DOCS,
            request_id,
        },
    }
}

/// 401: 唯一ステータスを透過するパス。トークン管理はクライアントの責務
fn unauthorized(request_id: String, body: Option<String>) -> LexofficeError {
    LexofficeError::Api {
        status: StatusCode::UNAUTHORIZED,
        title:  "Lexoffice API Authorization Error".to_string(),
        detail: format!(
            "Note: Currently, the client is responsible for refreshing the token.\nReason: {}",
            body.unwrap_or_else(|| ERROR_REASON_FALLBACK.to_string())
        ),
        docs: TOKEN_DOCS,
        request_id,
    }
}

/// 403: サービストークンの不備はクライアントから見ればゲートウェイ障害
fn forbidden(request_id: String, body: Option<String>) -> LexofficeError {
    LexofficeError::Api {
        status: StatusCode::BAD_GATEWAY,
        title:  "Lexoffice API Authorization Failed".to_string(),
        detail: format!(
            "Authorization with the Lexoffice API failed. This could be due to invalid token format, \
             insufficient permissions, or invalid access rights.\nReason: {}",
            body.unwrap_or_else(|| ERROR_REASON_FALLBACK.to_string())
        ),
        docs: CONTACT_DOCS,
        request_id,
    }
}

fn bad_request(request_id: String, body: Option<String>) -> LexofficeError {
    LexofficeError::Api {
        status: StatusCode::BAD_GATEWAY,
        title:  "Bad Gateway".to_string(),
        detail: format!(
            "The upstream service considered the request format invalid or malformed\nReason: {}",
            body.unwrap_or_else(|| ERROR_REASON_FALLBACK.to_string())
        ),
        docs: CONTACT_DOCS,
        request_id,
    }
}

fn service_unavailable(request_id: String) -> LexofficeError {
    LexofficeError::Api {
        status: StatusCode::BAD_GATEWAY,
        title:  "Lexoffice API temporarily unavailable".to_string(),
        detail: "The service is unavailable, please try again later and checkout the status page \
                 at https://status.lexware.de/"
            .to_string(),
        docs: STATUS_DOCS,
        request_id,
    }
}

/// 上記以外の 4xx/5xx（404 など）
///
/// レガシーボディがあれば先頭イシューから詳細を組み立てる。
/// 5xx は 502 に丸め、4xx はステータスを透過する。
fn remaining_error_codes(
    status: StatusCode,
    request_id: String,
    body: Option<String>,
) -> LexofficeError {
    let detail = parse_legacy_error(body.as_deref())
        .and_then(|legacy| extract_detail_from_legacy(&legacy))
        .unwrap_or_else(|| reason_phrase(status).to_string());

    if status.is_server_error() {
        LexofficeError::Api {
            status: StatusCode::BAD_GATEWAY,
            title: "Bad Gateway".to_string(),
            detail,
            docs: CONTACT_DOCS,
            request_id,
        }
    } else {
        LexofficeError::Api {
            status,
            title: format!("Lexoffice API Error: {}", reason_phrase(status)),
            detail,
            docs: CONTACT_DOCS,
            request_id,
        }
    }
}

/// レガシーエラーボディをパースする
///
/// ボディが無い・空・JSON として不正な場合は `None`。
fn parse_legacy_error(body: Option<&str>) -> Option<LegacyError> {
    let body = body.filter(|b| !b.is_empty())?;
    match serde_json::from_str::<LegacyError>(body) {
        Ok(legacy) => Some(legacy),
        Err(e) => {
            tracing::error!("レガシーエラーボディのパースに失敗: {}", e);
            None
        }
    }
}

/// イシューリストをフィールドエラーに展開する
///
/// `field` にはイシューの `source`、`message` には `i18nKey` の
/// アンダースコアを空白に置換したもの + ` (<type>)` を用いる。
fn extract_legacy_errors(legacy: &LegacyError) -> Vec<ValidationError> {
    legacy
        .issue_list
        .iter()
        .map(|issue| {
            let source = issue.source.as_deref().unwrap_or("");
            let i18n_key = issue.i18n_key.as_deref().unwrap_or("");
            let type_ = issue.type_.as_deref().unwrap_or("");

            let mut message = i18n_key.replace('_', " ");
            if !type_.is_empty() {
                message.push_str(&format!(" ({type_})"));
            }

            ValidationError::new(source, message)
        })
        .collect()
}

/// 先頭イシューから汎用詳細文言を組み立てる
///
/// `Due to '<source>' (<type>)` 形式（アンダースコアは空白に置換）。
fn extract_detail_from_legacy(legacy: &LegacyError) -> Option<String> {
    let issue: &LegacyIssue = legacy.issue_list.first()?;
    let source = issue.source.as_deref().unwrap_or("").replace('_', " ");
    let type_ = issue.type_.as_deref().unwrap_or("").replace('_', " ");
    Some(format!("Due to '{source}' ({type_})"))
}

fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}
