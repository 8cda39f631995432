//! # Lexoffice API クライアント
//!
//! アダプタから Lexoffice API への通信を担当する。
//!
//! ## エンドポイント
//!
//! - `POST /contacts` - 連絡先作成
//! - `GET /contacts/{id}` - 連絡先取得
//! - `GET /contacts` - 連絡先一覧（クエリパラメータ付き）
//! - `GET /countries` - 国一覧（レスポンスヘッダー込み）
//!
//! エラーレスポンス（4xx/5xx）は [`decode`] がアダプタ共通の
//! [`LexofficeError`] に正規化する。

mod client_impl;
mod contacts;
mod countries;
mod decode;
mod error;
mod response;
pub mod types;

pub use client_impl::{LexofficeClient, LexofficeClientImpl};
pub use contacts::LexofficeContactsClient;
pub use countries::{CountriesResponse, LexofficeCountriesClient};
pub use error::LexofficeError;

/// Lexoffice API ドキュメント URI（トークン関連）
pub const TOKEN_DOCS: &str =
    "https://developers.lexoffice.io/docs/#lexoffice-api-documentation-introduction";

/// Lexoffice API ドキュメント URI（連絡先エンドポイント）
pub const CONTACT_DOCS: &str = "https://developers.lexoffice.io/docs/#contacts-endpoint-purpose";

/// Lexoffice API ドキュメント URI（ステータスページ）
pub const STATUS_DOCS: &str =
    "https://developers.lexoffice.io/docs/#faq-stay-informed-about-the-system-status";

/// 上流レスポンスの相関 ID ヘッダー名
pub const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

/// 相関 ID ヘッダーが無いレスポンスに割り当てる固定値
pub const UNKNOWN_REQUEST_ID: &str = "unknown-request";
