//! # ミドルウェア
//!
//! アダプタ用のミドルウェアを提供する。

mod auth;

pub use auth::{Claims, JwtKeys, ScopeState, decode_bearer_claims, require_scope};
