//! # Problem レスポンス（RFC 7807 Problem Details）
//!
//! アダプタ全体で統一されたエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `Problem` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はアプリ側の責務（shared に axum 依存を入れない）
//! - `type` フィールドは失敗を説明するドキュメント URI を指す
//! - `None` のフィールドは JSON から省略される

use serde::{Deserialize, Serialize};

/// 単一フィールドのバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValidationError {
    pub field:   String,
    pub message: String,
}

impl ValidationError {
    /// 新しいバリデーションエラーを作成する
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field:   field.into(),
            message: message.into(),
        }
    }
}

/// エラーレスポンス（RFC 7807 Problem Details）
///
/// すべてのエラーパスで統一されたレスポンス形式。
/// バリデーション系の失敗は `validationErrors` にフィールド単位の
/// エラーを持つ（それ以外では省略される）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Problem {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title:        String,
    pub status:       u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail:       Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance:     Option<String>,
    #[serde(rename = "validationErrors", skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<ValidationError>>,
}

impl Problem {
    /// 汎用コンストラクタ
    ///
    /// `instance` と `validationErrors` は未設定で作成される。
    pub fn new(
        problem_type: impl Into<String>,
        title: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            problem_type: problem_type.into(),
            title: title.into(),
            status,
            detail: Some(detail.into()),
            instance: None,
            validation_errors: None,
        }
    }

    /// `instance` URI を設定する
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// フィールド単位のバリデーションエラーを設定する
    pub fn with_validation_errors(mut self, errors: Vec<ValidationError>) -> Self {
        self.validation_errors = Some(errors);
        self
    }
}
