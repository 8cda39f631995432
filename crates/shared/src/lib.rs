//! # LexAdapter 共有ユーティリティ
//!
//! このクレートは、LexAdapter
//! プロジェクト全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - アプリケーションクレートから依存される純粋なデータ構造のみを配置
//! - axum への依存を持たない（`IntoResponse` 変換はアプリ側の責務）
//! - 外部クレートへの依存は最小限に抑える

pub mod health;
#[cfg(feature = "observability")]
pub mod observability;
pub mod problem;

pub use health::HealthResponse;
pub use problem::{Problem, ValidationError};
