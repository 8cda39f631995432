//! # カスタムエクストラクタ
//!
//! axum の組み込みエクストラクタは失敗時に独自形式のエラーを返すため、
//! ここで Problem レスポンスに揃えたエクストラクタに置き換える。
//!
//! - [`AppJson`]: 厳格な JSON ボディデコード。API 契約に無いフィールドは
//!   400 の Problem（`UnknownField`）、それ以外のデコード失敗は 500
//! - [`PathUuid`]: UUID パスパラメータ。形式不正は 400 の Problem
//!   （`TypeMismatch`）
//! - [`parse_param`]: 文字列クエリパラメータの型付きパース

use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    response::Response,
};
use uuid::Uuid;

use crate::error::AdapterError;

/// 厳格な JSON ボディエクストラクタ
///
/// `deny_unknown_fields` 付きの DTO と組み合わせて、契約外フィールドを
/// 含むリクエストを 400 で拒否する。
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_string();

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            AdapterError::Unexpected(format!("リクエストボディの読み取りに失敗: {e}"))
                .into_problem_response(&path)
        })?;

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => Ok(AppJson(value)),
            Err(error) => Err(decode_error_to_adapter_error::<T>(&error).into_problem_response(&path)),
        }
    }
}

/// serde のデコードエラーを [`AdapterError`] に分類する
///
/// `unknown field` は 400 の契約違反として報告し、それ以外
/// （JSON 構文エラー等）は分類不能な 500 に落とす。
fn decode_error_to_adapter_error<T>(error: &serde_json::Error) -> AdapterError {
    let message = error.to_string();

    match unknown_field_name(&message) {
        Some(property) => AdapterError::UnknownField {
            property,
            referring_type: short_type_name::<T>(),
        },
        None => AdapterError::Unexpected(format!("リクエストボディのデコードに失敗: {message}")),
    }
}

/// serde のエラーメッセージから未知フィールド名を取り出す
///
/// メッセージ形式は `unknown field \`foo\`, expected ...`。
fn unknown_field_name(message: &str) -> Option<String> {
    let rest = message.split("unknown field `").nth(1)?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

/// 型名の最後のセグメント（`path::to::ContactCreate` → `ContactCreate`）
fn short_type_name<T>() -> &'static str {
    std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("request body")
}

/// UUID パスパラメータエクストラクタ
///
/// `/v1/contacts/{id}` の `id` を UUID としてパースし、形式不正は
/// 400 の `Invalid Parameter` Problem にする。
pub struct PathUuid(pub Uuid);

impl<S> FromRequestParts<S> for PathUuid
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();

        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                AdapterError::Unexpected(format!("パスパラメータの抽出に失敗: {e}"))
                    .into_problem_response(&path)
            })?;

        Uuid::parse_str(&raw).map(PathUuid).map_err(|_| {
            AdapterError::TypeMismatch {
                parameter:     "id",
                value:         raw,
                required_type: "Uuid",
            }
            .into_problem_response(&path)
        })
    }
}

/// 文字列クエリパラメータを型付きでパースする
///
/// 未設定（`None`）はそのまま通し、パース失敗は
/// [`AdapterError::TypeMismatch`] にする。
pub fn parse_param<T: FromStr>(
    parameter: &'static str,
    value: Option<String>,
    required_type: &'static str,
) -> Result<Option<T>, AdapterError> {
    match value {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| AdapterError::TypeMismatch {
            parameter,
            value: raw,
            required_type,
        }),
    }
}
