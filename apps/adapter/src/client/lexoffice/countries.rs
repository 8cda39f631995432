//! 国一覧の Lexoffice クライアント

use async_trait::async_trait;
use http::Method;

use super::{
    REQUEST_ID_HEADER,
    client_impl::LexofficeClientImpl,
    error::LexofficeError,
    response::error_from_response,
    types::Country,
};

/// `GET /countries` の結果
///
/// 国キャッシュが相関 ID を記憶できるよう、ボディと一緒に
/// レスポンスヘッダーの `x-amzn-requestid` を公開する。
#[derive(Debug, Clone)]
pub struct CountriesResponse {
    pub countries:  Vec<Country>,
    /// レスポンスの相関 ID（ヘッダー欠落時は `None`）
    pub request_id: Option<String>,
}

/// 国一覧の Lexoffice クライアントトレイト
#[async_trait]
pub trait LexofficeCountriesClient: Send + Sync {
    /// 国一覧を取得する
    ///
    /// Lexoffice API の `GET /countries` を呼び出す。
    async fn get_countries(&self) -> Result<CountriesResponse, LexofficeError>;
}

#[async_trait]
impl LexofficeCountriesClient for LexofficeClientImpl {
    async fn get_countries(&self) -> Result<CountriesResponse, LexofficeError> {
        let url = format!("{}/countries", self.base_url);

        let response = self.request(Method::GET, url).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let countries = response.json::<Vec<Country>>().await?;

        Ok(CountriesResponse { countries, request_id })
    }
}
