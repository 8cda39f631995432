//! # 外部 API クライアント
//!
//! Lexoffice API（上流サービス）との通信を担当する。

pub mod lexoffice;

pub use lexoffice::{
    CONTACT_DOCS,
    CountriesResponse,
    LexofficeClient,
    LexofficeClientImpl,
    LexofficeContactsClient,
    LexofficeCountriesClient,
    LexofficeError,
    REQUEST_ID_HEADER,
    STATUS_DOCS,
    TOKEN_DOCS,
    UNKNOWN_REQUEST_ID,
};
