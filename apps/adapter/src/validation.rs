//! # 入力バリデーション
//!
//! 連絡先作成ペイロードの検証を行う。
//!
//! 1. 構文ルール（長さ・形式・正規表現）は `validator` の derive に委ねる
//! 2. 必須フィールドの欠落は serde レベルでエラーにせず、ここで
//!    フィールドエラーとして収集する（422 で報告するため）
//! 3. 国コードは構文チェックに加えて国キャッシュへの存在照合を行い、
//!    存在しない場合は "country code not available" を報告する
//!
//! フィールドパスはワイヤー名（camelCase）で
//! `addresses.billing[0].countryCode` のように組み立てる。

use lexadapter_shared::ValidationError;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::{
    cache::CountryCache,
    client::lexoffice::types::{Address, ContactCreate},
    error::AdapterError,
};

/// 連絡先作成ペイロードを検証する
///
/// 構文エラーと国コードの存在チェックをまとめて収集し、1 件でもあれば
/// [`AdapterError::LocalValidation`] を返す。国キャッシュの遅延更新が
/// 失敗した場合はその失敗が伝播する。
pub async fn validate_contact_create(
    cache: &CountryCache,
    payload: &ContactCreate,
) -> Result<(), AdapterError> {
    let mut errors = syntactic_errors(payload);

    for (path, address) in address_entries(payload) {
        if let Some(code) = &address.country_code {
            if !cache.is_valid_code(code).await? {
                errors.push(ValidationError::new(
                    format!("{path}.countryCode"),
                    "country code not available",
                ));
            }
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    // HashMap 由来の順序揺れを抑えるため、フィールドパスで安定ソートする
    errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    Err(AdapterError::LocalValidation(errors))
}

/// derive ベースの構文チェックと必須フィールドチェック
fn syntactic_errors(payload: &ContactCreate) -> Vec<ValidationError> {
    let mut errors = match payload.validate() {
        Ok(()) => Vec::new(),
        Err(validation_errors) => flatten_validation_errors(&validation_errors),
    };
    errors.extend(required_field_errors(payload));
    errors
}

/// serde レベルで Option にしてある必須フィールドの欠落を報告する
fn required_field_errors(payload: &ContactCreate) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if payload.roles.is_none() {
        errors.push(ValidationError::new("roles", "must not be null"));
    }

    match &payload.company {
        None => errors.push(ValidationError::new("company", "must not be null")),
        Some(company) => {
            if company.name.is_none() {
                errors.push(ValidationError::new("company.name", "must not be empty"));
            }

            if let Some(persons) = &company.contact_persons {
                for (index, person) in persons.iter().enumerate() {
                    if person.last_name.is_none() {
                        errors.push(ValidationError::new(
                            format!("company.contactPersons[{index}].lastName"),
                            "must not be null",
                        ));
                    }
                }
            }
        }
    }

    for (path, address) in address_entries(payload) {
        if address.country_code.is_none() {
            errors.push(ValidationError::new(
                format!("{path}.countryCode"),
                "must not be null",
            ));
        }
    }

    errors
}

/// ペイロード内の全住所をワイヤーパス付きで列挙する
fn address_entries(payload: &ContactCreate) -> Vec<(String, &Address)> {
    let mut entries = Vec::new();

    let Some(addresses) = &payload.addresses else {
        return entries;
    };

    if let Some(billing) = &addresses.billing {
        for (index, address) in billing.iter().enumerate() {
            entries.push((format!("addresses.billing[{index}]"), address));
        }
    }
    if let Some(shipping) = &addresses.shipping {
        for (index, address) in shipping.iter().enumerate() {
            entries.push((format!("addresses.shipping[{index}]"), address));
        }
    }

    entries
}

/// `validator` のエラーツリーをワイヤーパス付きのフラットなリストにする
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<ValidationError> {
    let mut flat = Vec::new();
    collect_errors("", errors, &mut flat);
    flat
}

fn collect_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<ValidationError>) {
    for (field, kind) in errors.errors() {
        let segment = to_camel_case(field.as_ref());
        let path = if prefix.is_empty() {
            segment
        } else {
            format!("{prefix}.{segment}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string);
                    out.push(ValidationError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_errors(&path, nested, out),
            ValidationErrorsKind::List(nested_map) => {
                for (index, nested) in nested_map {
                    collect_errors(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

/// Rust のフィールド名（snake_case）をワイヤー名（camelCase）に変換する
fn to_camel_case(field: &str) -> String {
    let mut segments = field.split('_').filter(|s| !s.is_empty());

    let mut result = match segments.next() {
        Some(first) => first.to_string(),
        None => return String::new(),
    };

    for segment in segments {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.extend(chars);
        }
    }

    result
}

/// メールアドレスリストの各要素を検証するカスタムバリデータ
pub fn validate_email_list(list: &[String]) -> Result<(), validator::ValidationError> {
    use validator::ValidateEmail;

    for email in list {
        if !email.validate_email() {
            let mut error = validator::ValidationError::new("email");
            error.message = Some("must be a well-formed email address".into());
            return Err(error);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::client::lexoffice::types::{
        Addresses,
        Company,
        CompanyContactPerson,
        Country,
        Customer,
        Roles,
        TaxClassification,
    };
    use crate::client::{CountriesResponse, LexofficeCountriesClient, LexofficeError};

    // --- テスト用スタブ ---

    struct StubCountriesClient;

    #[async_trait]
    impl LexofficeCountriesClient for StubCountriesClient {
        async fn get_countries(&self) -> Result<CountriesResponse, LexofficeError> {
            Ok(CountriesResponse {
                countries:  vec![Country {
                    country_code: "DE".to_string(),
                    country_name_en: "Germany".to_string(),
                    country_name_de: "Deutschland".to_string(),
                    tax_classification: TaxClassification::De,
                }],
                request_id: Some("R1".to_string()),
            })
        }
    }

    fn test_cache() -> CountryCache {
        CountryCache::new(Arc::new(StubCountriesClient))
    }

    fn valid_payload() -> ContactCreate {
        ContactCreate {
            version: 0,
            roles: Some(Roles {
                customer: Some(Customer { number: None }),
                vendor:   None,
            }),
            company: Some(Company {
                name: Some("ACME GmbH".to_string()),
                tax_number: None,
                vat_registration_id: None,
                allow_tax_free_invoices: None,
                contact_persons: None,
            }),
            addresses: Some(Addresses {
                billing:  Some(vec![Address {
                    supplement: None,
                    street: Some("Musterstr. 1".to_string()),
                    zip: Some("12345".to_string()),
                    city: Some("Berlin".to_string()),
                    country_code: Some("DE".to_string()),
                }]),
                shipping: None,
            }),
            email_addresses: None,
            phone_numbers: None,
            note: None,
        }
    }

    fn field_messages(error: AdapterError) -> Vec<(String, String)> {
        let AdapterError::LocalValidation(errors) = error else {
            panic!("LocalValidation を期待したが {error:?} を受け取った");
        };
        errors.into_iter().map(|e| (e.field, e.message)).collect()
    }

    // --- validate_contact_create テスト ---

    #[tokio::test]
    async fn test_正常なペイロードはバリデーションを通過する() {
        let cache = test_cache();

        let result = validate_contact_create(&cache, &valid_payload()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_必須フィールドの欠落を報告する() {
        let cache = test_cache();
        let mut payload = valid_payload();
        payload.roles = None;
        payload.company = None;

        let error = validate_contact_create(&cache, &payload).await.unwrap_err();

        let errors = field_messages(error);
        assert!(errors.contains(&("roles".to_string(), "must not be null".to_string())));
        assert!(errors.contains(&("company".to_string(), "must not be null".to_string())));
    }

    #[tokio::test]
    async fn test_会社名の欠落はmust_not_be_emptyになる() {
        let cache = test_cache();
        let mut payload = valid_payload();
        payload.company.as_mut().unwrap().name = None;

        let error = validate_contact_create(&cache, &payload).await.unwrap_err();

        let errors = field_messages(error);
        assert!(errors.contains(&("company.name".to_string(), "must not be empty".to_string())));
    }

    #[tokio::test]
    async fn test_存在しない国コードはcountry_code_not_availableになる() {
        let cache = test_cache();
        let mut payload = valid_payload();
        payload.addresses.as_mut().unwrap().billing.as_mut().unwrap()[0].country_code =
            Some("XX".to_string());

        let error = validate_contact_create(&cache, &payload).await.unwrap_err();

        let errors = field_messages(error);
        assert!(errors.contains(&(
            "addresses.billing[0].countryCode".to_string(),
            "country code not available".to_string()
        )));
    }

    #[tokio::test]
    async fn test_構文違反の国コードは両方のエラーを報告する() {
        let cache = test_cache();
        let mut payload = valid_payload();
        payload.addresses.as_mut().unwrap().billing.as_mut().unwrap()[0].country_code =
            Some("xx".to_string());

        let error = validate_contact_create(&cache, &payload).await.unwrap_err();

        let errors = field_messages(error);
        assert!(errors.contains(&(
            "addresses.billing[0].countryCode".to_string(),
            "must match \"^[A-Z]{2}$\"".to_string()
        )));
        assert!(errors.contains(&(
            "addresses.billing[0].countryCode".to_string(),
            "country code not available".to_string()
        )));
    }

    #[tokio::test]
    async fn test_担当者のlast_name欠落をインデックス付きで報告する() {
        let cache = test_cache();
        let mut payload = valid_payload();
        payload.company.as_mut().unwrap().contact_persons = Some(vec![CompanyContactPerson {
            salutation: None,
            first_name: Some("Max".to_string()),
            last_name: None,
            primary: None,
            email_address: None,
            phone_number: None,
        }]);

        let error = validate_contact_create(&cache, &payload).await.unwrap_err();

        let errors = field_messages(error);
        assert!(errors.contains(&(
            "company.contactPersons[0].lastName".to_string(),
            "must not be null".to_string()
        )));
    }

    #[tokio::test]
    async fn test_1000文字を超えるnoteを拒否する() {
        let cache = test_cache();
        let mut payload = valid_payload();
        payload.note = Some("x".repeat(1001));

        let error = validate_contact_create(&cache, &payload).await.unwrap_err();

        let errors = field_messages(error);
        assert!(errors.contains(&(
            "note".to_string(),
            "Note must not exceed 1000 characters".to_string()
        )));
    }

    // --- ヘルパーのテスト ---

    #[test]
    fn test_to_camel_caseはワイヤー名に変換する() {
        assert_eq!(to_camel_case("country_code"), "countryCode");
        assert_eq!(to_camel_case("email_addresses"), "emailAddresses");
        assert_eq!(to_camel_case("note"), "note");
        assert_eq!(to_camel_case("private_"), "private");
    }

    #[test]
    fn test_validate_email_listは不正なアドレスを拒否する() {
        assert!(validate_email_list(&["info@example.com".to_string()]).is_ok());
        assert!(validate_email_list(&["not-an-email".to_string()]).is_err());
        assert!(validate_email_list(&[]).is_ok());
    }
}
