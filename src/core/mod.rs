//! Core module containing the error taxonomy, store traits, response shapes
//! and request validation

pub mod error;
pub mod response;
pub mod service;
pub mod validation;

pub use error::{
    ApiError, ApiResult, ConstraintKind, ErrorEnvelope, ErrorKind, ErrorTranslator, StorageError,
    StorageResult, ValidationStatus,
};
pub use response::{
    CompanyDetailResponse, CompanyListResponse, CompanyResponse, DeletedResponse,
    InvoiceDetailResponse, InvoiceListResponse, InvoiceResponse,
};
pub use service::{CompanyService, InvoiceService};
pub use validation::{CompanyDetailQuery, ValidatedJson, parse_invoice_id};
