//! 連絡先関連の Lexoffice クライアント

use async_trait::async_trait;
use http::Method;
use uuid::Uuid;

use super::{
    client_impl::LexofficeClientImpl,
    error::LexofficeError,
    response::handle_response,
    types::{Contact, ContactCreate, ContactCreated, ContactsPage},
};

/// 連絡先関連の Lexoffice クライアントトレイト
#[async_trait]
pub trait LexofficeContactsClient: Send + Sync {
    /// 連絡先を作成する
    ///
    /// Lexoffice API の `POST /contacts` を呼び出す。
    async fn create_contact(&self, payload: &ContactCreate)
    -> Result<ContactCreated, LexofficeError>;

    /// 連絡先を ID で取得する
    ///
    /// Lexoffice API の `GET /contacts/{id}` を呼び出す。
    async fn get_contact(&self, id: Uuid) -> Result<Contact, LexofficeError>;

    /// 連絡先一覧を取得する
    ///
    /// Lexoffice API の `GET /contacts` を呼び出す。
    ///
    /// # 引数
    ///
    /// - `query`: 転送するクエリパラメータ。設定されたフィルタのみを
    ///   含めること（未設定の値や空文字列を送ってはならない）
    async fn list_contacts(&self, query: &[(String, String)])
    -> Result<ContactsPage, LexofficeError>;
}

#[async_trait]
impl LexofficeContactsClient for LexofficeClientImpl {
    async fn create_contact(
        &self,
        payload: &ContactCreate,
    ) -> Result<ContactCreated, LexofficeError> {
        let url = format!("{}/contacts", self.base_url);

        let response = self.request(Method::POST, url).json(payload).send().await?;
        handle_response(response).await
    }

    async fn get_contact(&self, id: Uuid) -> Result<Contact, LexofficeError> {
        let url = format!("{}/contacts/{}", self.base_url, id);

        let response = self.request(Method::GET, url).send().await?;
        handle_response(response).await
    }

    async fn list_contacts(
        &self,
        query: &[(String, String)],
    ) -> Result<ContactsPage, LexofficeError> {
        let url = format!("{}/contacts", self.base_url);

        let response = self.request(Method::GET, url).query(query).send().await?;
        handle_response(response).await
    }
}
