//! Lexoffice レスポンスの共通ハンドリング

use serde::de::DeserializeOwned;

use super::{REQUEST_ID_HEADER, UNKNOWN_REQUEST_ID, decode, error::LexofficeError};

/// レスポンスヘッダーから上流の相関 ID を取り出す
///
/// ヘッダーが欠落している場合は `unknown-request` を返す。
pub(super) fn request_id_from_headers(headers: &reqwest::header::HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(UNKNOWN_REQUEST_ID)
        .to_string()
}

/// Lexoffice レスポンスの共通ハンドリング
///
/// 成功時はレスポンスボディを `T` にデシリアライズし、
/// エラー時は [`decode::translate`] で正規化した [`LexofficeError`] を返す。
pub(super) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, LexofficeError> {
    let status = response.status();

    if status.is_success() {
        let body = response.json::<T>().await?;
        return Ok(body);
    }

    Err(error_from_response(response).await)
}

/// エラーレスポンス（非 2xx）を [`LexofficeError`] に変換する
///
/// ボディは一度しか読めないため、ここで読み取ってから変換に渡す。
/// 読み取りに失敗した場合は `None` としてフォールバック文言に委ねる。
pub(super) async fn error_from_response(response: reqwest::Response) -> LexofficeError {
    let status = response.status();

    // 変換は 4xx/5xx のみ。それ以外（リダイレクト等）は予期しない応答として扱う
    if !(status.is_client_error() || status.is_server_error()) {
        return LexofficeError::Network(format!("予期しないステータス {status}"));
    }

    let request_id = request_id_from_headers(response.headers());

    let body = match response.text().await {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!("エラーレスポンスのボディ読み取りに失敗: {}", e);
            None
        }
    };

    decode::translate(status, request_id, body)
}
