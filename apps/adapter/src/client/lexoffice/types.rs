//! # Lexoffice API の DTO
//!
//! ワイヤーフォーマットは Lexoffice API に合わせて camelCase。
//!
//! - リクエスト系（[`ContactCreate`] とそのネスト型）は
//!   `deny_unknown_fields` で厳格にデコードする（API 契約外の
//!   フィールドは受け付けない）
//! - レスポンス系（[`Contact`] / [`ContactCreated`] / [`ContactsPage`] /
//!   [`Country`]）は上流の未知フィールドを無視する

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 国コードの構文ルール（ISO 3166-1 alpha-2、大文字 2 文字）
pub static COUNTRY_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Z]{2}$").expect("静的な正規表現"));

// --- 連絡先作成リクエスト ---

/// 連絡先作成ペイロード
///
/// バリデーション済みのペイロードはそのまま上流へ転送される。
/// `version` / `roles` / `company` の必須チェックは
/// [`crate::validation`] が行う（欠落を 422 で報告するため、
/// serde レベルでは必須にしない）。
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContactCreate {
    #[serde(default)]
    pub version: i32,

    pub roles: Option<Roles>,

    #[validate(nested)]
    pub company: Option<Company>,

    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Addresses>,

    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_addresses: Option<EmailAddresses>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<PhoneNumbers>,

    #[validate(length(max = 1000, message = "Note must not exceed 1000 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// 連絡先ロール（customer / vendor）
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Roles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor:   Option<Vendor>,
}

/// 顧客ロール（`number` は上流が採番する読み取り専用フィールド）
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
}

/// 仕入先ロール（`number` は上流が採番する読み取り専用フィールド）
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Vendor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
}

/// 会社情報
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Company {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_registration_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_tax_free_invoices: Option<bool>,

    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_persons: Option<Vec<CompanyContactPerson>>,
}

/// 会社の担当者
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyContactPerson {
    #[validate(length(max = 25, message = "size must be between 0 and 25"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salutation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    #[validate(email(message = "must be a well-formed email address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// 請求先・配送先の住所リスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Addresses {
    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing:  Option<Vec<Address>>,
    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Vec<Address>>,
}

/// 住所
///
/// `country_code` の必須チェックとキャッシュ照合は
/// [`crate::validation`] が行う。
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street:     Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip:        Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city:       Option<String>,

    #[validate(regex(path = *COUNTRY_CODE_RE, message = "must match \"^[A-Z]{2}$\""))]
    pub country_code: Option<String>,
}

/// メールアドレス一覧（用途別）
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmailAddresses {
    #[validate(custom(function = crate::validation::validate_email_list))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<Vec<String>>,
    #[validate(custom(function = crate::validation::validate_email_list))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office:   Option<Vec<String>>,
    #[validate(custom(function = crate::validation::validate_email_list))]
    #[serde(rename = "private", skip_serializing_if = "Option::is_none")]
    pub private_: Option<Vec<String>>,
    #[validate(custom(function = crate::validation::validate_email_list))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other:    Option<Vec<String>>,
}

/// 電話番号一覧（用途別）
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhoneNumbers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office:   Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile:   Option<Vec<String>>,
    #[serde(rename = "private", skip_serializing_if = "Option::is_none")]
    pub private_: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax:      Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other:    Option<Vec<String>>,
}

// --- 上流レスポンス ---

/// 上流の連絡先レスポンス
///
/// 上流が追加した未知フィールドは無視する。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub version: Option<i32>,
    pub roles: Option<Roles>,
    pub company: Option<Company>,
    pub addresses: Option<Addresses>,
    pub email_addresses: Option<EmailAddresses>,
    pub phone_numbers: Option<PhoneNumbers>,
    pub note: Option<String>,
}

/// 連絡先作成の結果（作成ディスクリプタ）
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactCreated {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

/// 上流の連絡先ページレスポンス
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactsPage {
    pub content: Vec<Contact>,
    pub total_pages: Option<i32>,
    pub total_elements: Option<i64>,
    pub last: Option<bool>,
    pub size: Option<i32>,
    pub number: Option<i32>,
    pub first: Option<bool>,
    pub number_of_elements: Option<i32>,
}

/// 国レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub country_code: String,
    #[serde(rename = "countryNameEN")]
    pub country_name_en: String,
    #[serde(rename = "countryNameDE")]
    pub country_name_de: String,
    pub tax_classification: TaxClassification,
}

/// 税区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxClassification {
    #[serde(rename = "de")]
    De,
    #[serde(rename = "intraCommunity")]
    IntraCommunity,
    #[serde(rename = "thirdPartyCountry")]
    ThirdPartyCountry,
}

// --- レガシーエラーボディ ---

/// 上流の一部 4xx/5xx が返すレガシーエラー形式
///
/// `{ "IssueList": [ { "i18nKey", "source", "type", ... }, ... ] }`
///
/// `IssueList` を持たない JSON オブジェクトも空リストとしてデコード
/// 成功扱いになる（上流の `{"message": ...}` 形式など）。デコード失敗は
/// JSON として不正なボディに限られる。
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyError {
    #[serde(default, rename = "IssueList")]
    pub issue_list: Vec<LegacyIssue>,
}

/// レガシーエラーの個別イシュー
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyIssue {
    #[serde(default, rename = "i18nKey")]
    pub i18n_key: Option<String>,
    #[serde(default)]
    pub source:   Option<String>,
    #[serde(default, rename = "type")]
    pub type_:    Option<String>,
}
