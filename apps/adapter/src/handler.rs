//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、上流呼び出しと変換に徹する
//!
//! ## ハンドラ一覧
//!
//! - `contacts`: 連絡先の作成・取得・一覧
//! - `cache`: 国キャッシュの無効化
//! - `tokens`: テスト用 JWT の発行
//! - `home`: API 説明
//! - `health`: ヘルスチェック

pub mod cache;
pub mod contacts;
pub mod health;
pub mod home;
pub mod tokens;

pub use cache::{CacheState, invalidate_country_cache};
pub use contacts::{ContactsState, create_contact, get_contact, list_contacts};
pub use health::health_check;
pub use home::home;
pub use tokens::{TokenState, admin_token, authenticated, user_token};
