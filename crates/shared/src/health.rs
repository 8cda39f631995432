//! # ヘルスチェックレスポンス
//!
//! `/health` エンドポイントの統一レスポンス形式を提供する。

use serde::{Deserialize, Serialize};

/// Liveness Check のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status:  String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializeを正しいjson形状にする() {
        let response = HealthResponse {
            status:  "healthy".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "status": "healthy", "version": "0.1.0" }));
    }
}
