//! # Lexoffice Adapter
//!
//! サードパーティの連絡先管理 API（Lexoffice）を仲介する薄い HTTP
//! アダプタのコアモジュール。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Client     │────▶│   Adapter    │────▶│ Lexoffice API│
//! │ (Bearer JWT) │     │  port: 8080  │     │  (上流)      │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │ 国キャッシュ │
//!                      │ (定期更新)   │
//!                      └──────────────┘
//! ```
//!
//! ## モジュール構成
//!
//! - `client`: 上流 API クライアントとエラー正規化
//! - `cache`: 国キャッシュ（遅延初期化・定期更新・手動無効化）
//! - `error`: 失敗の直和型と Problem レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `mapper`: 国名エンリッチメント
//! - `middleware`: Bearer JWT スコープ検証
//! - `validation`: 入力バリデーション

pub mod app_builder;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod mapper;
pub mod middleware;
pub mod openapi;
pub mod validation;
