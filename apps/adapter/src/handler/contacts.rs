//! # 連絡先 API ハンドラ
//!
//! アダプタの連絡先エンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /v1/contacts` - 連絡先作成（`data:write` スコープ）
//! - `GET /v1/contacts/{id}` - 連絡先取得（`data:read` スコープ）
//! - `GET /v1/contacts` - 連絡先一覧（`data:read` スコープ）
//!
//! 取得系レスポンスの住所は国名エンリッチメントを適用する。

use std::sync::Arc;

use axum::{
    Json,
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lexadapter_shared::ValidationError;
use serde::Deserialize;

use crate::{
    cache::CountryCache,
    client::LexofficeContactsClient,
    client::lexoffice::types::ContactCreate,
    error::AdapterError,
    extract::{AppJson, PathUuid, parse_param},
    mapper,
    validation::validate_contact_create,
};

/// 連絡先 API の共有状態
pub struct ContactsState {
    pub lexoffice_client: Arc<dyn LexofficeContactsClient>,
    pub country_cache:    Arc<CountryCache>,
}

// --- リクエスト型 ---

/// 連絡先一覧クエリパラメータ（生の文字列）
///
/// 型不一致を `Invalid Parameter` の Problem として報告するため、
/// 数値・真偽値もいったん文字列で受けてから [`parse_param`] で変換する。
#[derive(Debug, Default, Deserialize)]
pub struct ListContactsQuery {
    pub page:     Option<String>,
    pub size:     Option<String>,
    pub email:    Option<String>,
    pub name:     Option<String>,
    pub number:   Option<String>,
    pub customer: Option<String>,
    pub vendor:   Option<String>,
}

/// クエリパラメータをパース・検証し、上流へ転送するリストを組み立てる
///
/// `page`/`size` は常に転送し（デフォルト 0 / 25）、フィルタは
/// 設定されたものだけを転送する。未設定のパラメータや空値を
/// 上流に送ってはならない。
fn build_upstream_query(query: ListContactsQuery) -> Result<Vec<(String, String)>, AdapterError> {
    let page: i32 = parse_param("page", query.page, "i32")?.unwrap_or(0);
    let size: i32 = parse_param("size", query.size, "i32")?.unwrap_or(25);
    let number: Option<i64> = parse_param("number", query.number, "i64")?;
    let customer: Option<bool> = parse_param("customer", query.customer, "bool")?;
    let vendor: Option<bool> = parse_param("vendor", query.vendor, "bool")?;

    let mut errors = Vec::new();

    if page < 0 {
        errors.push(ValidationError::new("page", "must be greater than or equal to 0"));
    }
    if size < 1 {
        errors.push(ValidationError::new("size", "must be greater than or equal to 1"));
    }
    if size > 250 {
        errors.push(ValidationError::new("size", "must be less than or equal to 250"));
    }
    if let Some(email) = &query.email {
        if email.chars().count() < 3 {
            errors.push(ValidationError::new(
                "email",
                "Email filter must contain at least 3 characters",
            ));
        }
    }
    if let Some(name) = &query.name {
        if name.chars().count() < 3 {
            errors.push(ValidationError::new(
                "name",
                "Name filter must contain at least 3 characters",
            ));
        }
    }
    if let Some(number) = number {
        if number <= 0 {
            errors.push(ValidationError::new("number", "Contact number must be positive"));
        }
    }

    if !errors.is_empty() {
        return Err(AdapterError::LocalValidation(errors));
    }

    let mut params = vec![
        ("page".to_string(), page.to_string()),
        ("size".to_string(), size.to_string()),
    ];
    if let Some(email) = query.email {
        params.push(("email".to_string(), email));
    }
    if let Some(name) = query.name {
        params.push(("name".to_string(), name));
    }
    if let Some(number) = number {
        params.push(("number".to_string(), number.to_string()));
    }
    if let Some(customer) = customer {
        params.push(("customer".to_string(), customer.to_string()));
    }
    if let Some(vendor) = vendor {
        params.push(("vendor".to_string(), vendor.to_string()));
    }

    Ok(params)
}

// --- ハンドラ ---

/// POST /v1/contacts
///
/// 連絡先を作成する。ペイロードはバリデーション後にそのまま上流へ
/// 転送し、作成ディスクリプタを返す。
#[utoipa::path(
   post,
   path = "/v1/contacts",
   tag = "contacts",
   request_body = ContactCreate,
   responses(
      (status = 200, description = "作成された連絡先のディスクリプタ", body = crate::client::lexoffice::types::ContactCreated),
      (status = 422, description = "バリデーションエラー", body = lexadapter_shared::Problem),
      (status = 502, description = "上流エラー", body = lexadapter_shared::Problem)
   ),
   security(("bearer-jwt" = []))
)]
pub async fn create_contact(
    State(state): State<Arc<ContactsState>>,
    OriginalUri(uri): OriginalUri,
    payload: AppJson<ContactCreate>,
) -> Response {
    let path = uri.path();
    let AppJson(payload) = payload;

    if let Err(error) = validate_contact_create(&state.country_cache, &payload).await {
        return error.into_problem_response(path);
    }

    match state.lexoffice_client.create_contact(&payload).await {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(error) => AdapterError::from(error).into_problem_response(path),
    }
}

/// GET /v1/contacts/{id}
///
/// 連絡先を取得し、住所に国名エンリッチメントを適用して返す。
#[utoipa::path(
   get,
   path = "/v1/contacts/{id}",
   tag = "contacts",
   params(("id" = uuid::Uuid, Path, description = "連絡先 ID")),
   responses(
      (status = 200, description = "国名解決済みの連絡先", body = mapper::ContactResponse),
      (status = 502, description = "上流エラーまたは国名マッピング欠落", body = lexadapter_shared::Problem)
   ),
   security(("bearer-jwt" = []))
)]
pub async fn get_contact(
    State(state): State<Arc<ContactsState>>,
    OriginalUri(uri): OriginalUri,
    PathUuid(id): PathUuid,
) -> Response {
    let path = uri.path();

    let contact = match state.lexoffice_client.get_contact(id).await {
        Ok(contact) => contact,
        Err(error) => return AdapterError::from(error).into_problem_response(path),
    };

    match mapper::contact_to_response(&state.country_cache, contact).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error.into_problem_response(path),
    }
}

/// GET /v1/contacts
///
/// 連絡先一覧を取得する。設定されたフィルタだけを上流へ転送し、
/// ページ内の全連絡先に国名エンリッチメントを適用する。
#[utoipa::path(
   get,
   path = "/v1/contacts",
   tag = "contacts",
   responses(
      (status = 200, description = "国名解決済みの連絡先ページ", body = mapper::ContactsPageResponse),
      (status = 422, description = "フィルタのバリデーションエラー", body = lexadapter_shared::Problem),
      (status = 502, description = "上流エラー", body = lexadapter_shared::Problem)
   ),
   security(("bearer-jwt" = []))
)]
pub async fn list_contacts(
    State(state): State<Arc<ContactsState>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ListContactsQuery>,
) -> Response {
    let path = uri.path();

    let upstream_query = match build_upstream_query(query) {
        Ok(params) => params,
        Err(error) => return error.into_problem_response(path),
    };

    let page = match state.lexoffice_client.list_contacts(&upstream_query).await {
        Ok(page) => page,
        Err(error) => return AdapterError::from(error).into_problem_response(path),
    };

    match mapper::page_to_response(&state.country_cache, page).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error.into_problem_response(path),
    }
}
