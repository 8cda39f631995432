//! # 連絡先レスポンスの変換
//!
//! 上流の連絡先（または連絡先ページ）をクライアント向けレスポンスに
//! 変換する。各住所の `countryCode` は国キャッシュで解決した英語の
//! `countryName` に置き換え、それ以外のフィールドはそのまま写す。
//!
//! 国名の解決に失敗した場合は [`AdapterError::CountryMappingMissing`] が
//! 伝播し、グローバル変換で 502 + キャッシュの相関 ID 付き instance に
//! なる。

use serde::Serialize;
use uuid::Uuid;

use crate::{
    cache::CountryCache,
    client::lexoffice::types::{
        Address,
        Addresses,
        Company,
        Contact,
        ContactsPage,
        EmailAddresses,
        PhoneNumbers,
        Roles,
    },
    error::AdapterError,
};

// --- レスポンス型 ---

/// クライアント向けの連絡先レスポンス
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Roles>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<AddressesResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_addresses: Option<EmailAddresses>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<PhoneNumbers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// 国名解決済みの住所リスト
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing:  Option<Vec<AddressResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Vec<AddressResponse>>,
}

/// 国名解決済みの住所
///
/// 上流の `countryCode` は `countryName` に置き換えられている。
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street:     Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip:        Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city:       Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
}

/// クライアント向けの連絡先ページレスポンス
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactsPageResponse {
    pub content: Vec<ContactResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_elements: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_elements: Option<i32>,
}

// --- 変換関数 ---

/// 上流の連絡先をレスポンスへ変換する
pub async fn contact_to_response(
    cache: &CountryCache,
    contact: Contact,
) -> Result<ContactResponse, AdapterError> {
    let addresses = match contact.addresses {
        Some(addresses) => Some(addresses_to_response(cache, addresses).await?),
        None => None,
    };

    Ok(ContactResponse {
        id: contact.id,
        organization_id: contact.organization_id,
        version: contact.version,
        roles: contact.roles,
        company: contact.company,
        addresses,
        email_addresses: contact.email_addresses,
        phone_numbers: contact.phone_numbers,
        note: contact.note,
    })
}

/// 上流の連絡先ページをレスポンスへ変換する
pub async fn page_to_response(
    cache: &CountryCache,
    page: ContactsPage,
) -> Result<ContactsPageResponse, AdapterError> {
    let mut content = Vec::with_capacity(page.content.len());
    for contact in page.content {
        content.push(contact_to_response(cache, contact).await?);
    }

    Ok(ContactsPageResponse {
        content,
        total_pages: page.total_pages,
        total_elements: page.total_elements,
        last: page.last,
        size: page.size,
        number: page.number,
        first: page.first,
        number_of_elements: page.number_of_elements,
    })
}

async fn addresses_to_response(
    cache: &CountryCache,
    addresses: Addresses,
) -> Result<AddressesResponse, AdapterError> {
    let billing = match addresses.billing {
        Some(list) => Some(address_list_to_response(cache, list).await?),
        None => None,
    };
    let shipping = match addresses.shipping {
        Some(list) => Some(address_list_to_response(cache, list).await?),
        None => None,
    };

    Ok(AddressesResponse { billing, shipping })
}

async fn address_list_to_response(
    cache: &CountryCache,
    addresses: Vec<Address>,
) -> Result<Vec<AddressResponse>, AdapterError> {
    let mut result = Vec::with_capacity(addresses.len());
    for address in addresses {
        result.push(address_to_response(cache, address).await?);
    }
    Ok(result)
}

async fn address_to_response(
    cache: &CountryCache,
    address: Address,
) -> Result<AddressResponse, AdapterError> {
    let country_name = match &address.country_code {
        Some(code) => Some(cache.lookup_name(code).await?),
        None => None,
    };

    Ok(AddressResponse {
        supplement: address.supplement,
        street: address.street,
        zip: address.zip,
        city: address.city,
        country_name,
    })
}
