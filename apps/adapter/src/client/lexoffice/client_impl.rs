//! LexofficeClient スーパートレイトとクライアント実装の構造体

use std::time::Duration;

use http::Method;

use super::{
    contacts::LexofficeContactsClient,
    countries::LexofficeCountriesClient,
};

/// 上流への接続タイムアウト
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// 上流からの応答待ちタイムアウト
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Lexoffice クライアントトレイト（スーパートレイト）
///
/// Contacts / Countries の各サブトレイトを束ねるスーパートレイト。
/// テスト時にはサブトレイト単位でスタブを使用できる。
pub trait LexofficeClient: LexofficeContactsClient + LexofficeCountriesClient {}

/// ブランケット impl: 両サブトレイトを実装する型は
/// 自動的に `LexofficeClient` を実装する。
impl<T> LexofficeClient for T where T: LexofficeContactsClient + LexofficeCountriesClient {}

/// Lexoffice クライアント実装
///
/// すべてのリクエストにサービス用 Bearer トークンを付与する。
#[derive(Clone)]
pub struct LexofficeClientImpl {
    pub(super) base_url:  String,
    pub(super) api_token: String,
    pub(super) client:    reqwest::Client,
}

impl LexofficeClientImpl {
    /// 新しい LexofficeClient を作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: Lexoffice API のベース URL（例: `https://api.lexoffice.io/v1`）
    /// - `api_token`: サービス用 Bearer トークン
    pub fn new(base_url: &str, api_token: &str) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest クライアントの構築に失敗しました");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            client,
        }
    }

    /// Bearer トークン付きのリクエストビルダーを作成し、送信内容をログに残す
    ///
    /// トークンは先頭数文字だけをマスクした形でしか出力しない。
    pub(super) fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        tracing::info!("Lexoffice へリクエストを送信: {} {}", method, url);
        tracing::debug!(
            authorization = %format!("Bearer {}...", self.masked_token()),
            "リクエストヘッダー"
        );

        self.client.request(method, url).bearer_auth(&self.api_token)
    }

    /// ログ出力用にマスクしたトークン（先頭 5 文字まで）
    fn masked_token(&self) -> String {
        self.api_token.chars().take(5).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_base_urlの末尾スラッシュは除去される() {
        let client = LexofficeClientImpl::new("https://api.lexoffice.io/v1/", "token");

        assert_eq!(client.base_url, "https://api.lexoffice.io/v1");
    }

    #[test]
    fn test_masked_tokenは先頭5文字だけを含む() {
        let client = LexofficeClientImpl::new("https://api.lexoffice.io/v1", "secret-token-value");

        assert_eq!(client.masked_token(), "secre");
    }

    #[test]
    fn test_masked_tokenは短いトークンでもパニックしない() {
        let client = LexofficeClientImpl::new("https://api.lexoffice.io/v1", "abc");

        assert_eq!(client.masked_token(), "abc");
    }

    #[tokio::test]
    async fn test_リクエストにbearerトークンが付与される() {
        let client = LexofficeClientImpl::new("https://api.lexoffice.io/v1", "service-token");

        let request = client
            .request(Method::GET, format!("{}/countries", client.base_url))
            .build()
            .unwrap();

        let auth = request
            .headers()
            .get("authorization")
            .expect("Authorization ヘッダーが存在すること");
        assert_eq!(auth.to_str().unwrap(), "Bearer service-token");
    }
}
