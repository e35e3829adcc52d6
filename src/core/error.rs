//! Typed error handling for the biztime API
//!
//! Every failure a controller can produce is one of three [`ApiError`]
//! variants. The [`ErrorTranslator`] is the single place that decides which
//! HTTP status and JSON envelope a variant becomes.
//!
//! # Error Categories
//!
//! - [`ApiError`]: what the client sees (not found, validation, internal)
//! - [`StorageError`]: what the query executor reports (constraint
//!   violations, connectivity, unexpected rows)
//!
//! # Example
//!
//! ```rust,ignore
//! use biztime::prelude::*;
//!
//! async fn fetch(store: &dyn CompanyService, code: &str) -> Result<Company, ApiError> {
//!     store
//!         .get(code)
//!         .await?
//!         .ok_or_else(|| ApiError::company_not_found(code))
//! }
//! ```

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message returned to clients for every internal failure.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

// =============================================================================
// API Errors
// =============================================================================

/// The domain failure taxonomy exposed over HTTP
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The path-identified resource does not exist
    #[error("{message}")]
    NotFound { message: String },

    /// Missing or malformed input, or a store constraint violation
    #[error("{message}")]
    ValidationFailure { message: String },

    /// Anything unanticipated: store unreachable, integrity gap, bad row shape
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationFailure {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn company_not_found(code: &str) -> Self {
        Self::not_found(format!("company '{}' not found", code))
    }

    pub fn invoice_not_found(id: i64) -> Self {
        Self::not_found(format!("invoice {} not found", id))
    }

    /// An invoice whose owning company is missing breaks the foreign key
    /// invariant; it is never reported as a 404.
    pub fn integrity(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Internal(format!("data integrity error: {}", message))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::ValidationFailure { .. } => ErrorKind::ValidationFailure,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Discriminant of [`ApiError`], used as the translation table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    ValidationFailure,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::ValidationFailure => write!(f, "validation_failure"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

// =============================================================================
// Error envelope
// =============================================================================

/// The `{error: {message, status}}` body sent with every failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
}

// =============================================================================
// Error Translator
// =============================================================================

/// Status used for [`ApiError::ValidationFailure`]
///
/// `Legacy` reproduces the historical behaviour where invalid input and
/// constraint violations surfaced as a generic 500.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    #[default]
    BadRequest,
    UnprocessableEntity,
    Legacy,
}

impl ValidationStatus {
    pub fn status_code(self) -> StatusCode {
        match self {
            ValidationStatus::BadRequest => StatusCode::BAD_REQUEST,
            ValidationStatus::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationStatus::Legacy => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Maps [`ApiError`] to the status code and envelope clients receive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorTranslator {
    validation_status: ValidationStatus,
}

impl ErrorTranslator {
    pub fn new(validation_status: ValidationStatus) -> Self {
        Self { validation_status }
    }

    pub fn validation_status(&self) -> ValidationStatus {
        self.validation_status
    }

    /// The translation table
    pub fn status_code(&self, kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ValidationFailure => self.validation_status.status_code(),
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the envelope for an error. Internal details never leave the
    /// process; they are logged instead.
    pub fn envelope(&self, err: &ApiError) -> ErrorEnvelope {
        let status = self.status_code(err.kind());
        let message = match err {
            ApiError::Internal(_) => INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        };

        ErrorEnvelope {
            error: ErrorBody {
                message,
                status: status.as_u16(),
            },
        }
    }

    pub fn render(&self, err: &ApiError) -> Response {
        let status = self.status_code(err.kind());
        let mut response = (status, Json(self.envelope(err))).into_response();
        response.extensions_mut().insert(err.clone());
        response
    }

    /// Envelope a failure the router produced without an [`ApiError`],
    /// such as a 405. The status is kept as is; 5xx messages are replaced.
    pub fn render_status(&self, status: StatusCode, message: &str) -> Response {
        let message = if status.is_server_error() || message.is_empty() {
            status
                .canonical_reason()
                .unwrap_or(INTERNAL_SERVER_ERROR_MESSAGE)
                .to_string()
        } else {
            message.to_string()
        };

        let envelope = ErrorEnvelope {
            error: ErrorBody {
                message,
                status: status.as_u16(),
            },
        };
        (status, Json(envelope)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(detail) => tracing::error!(error = %detail, "request failed"),
            ApiError::ValidationFailure { message } => {
                tracing::debug!(error = %message, "request rejected")
            }
            ApiError::NotFound { message } => tracing::debug!(error = %message, "not found"),
        }

        ErrorTranslator::default().render(&self)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Which store constraint rejected a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    ForeignKey,
    NotNull,
    Unique,
    Check,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::ForeignKey => write!(f, "foreign key"),
            ConstraintKind::NotNull => write!(f, "not-null"),
            ConstraintKind::Unique => write!(f, "unique"),
            ConstraintKind::Check => write!(f, "check"),
        }
    }
}

/// Failures reported by the query executor
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    /// The statement violated a schema constraint and was not applied
    #[error("{kind} constraint violated: {message}")]
    ConstraintViolation {
        kind: ConstraintKind,
        constraint: Option<String>,
        message: String,
    },

    /// The backend could not be reached or a connection could not be acquired
    #[error("storage backend '{backend}' unavailable: {message}")]
    Unavailable { backend: String, message: String },

    /// The statement failed for any other reason
    #[error("{backend} query error: {message}")]
    Query { backend: String, message: String },

    /// An existing table does not have the columns the store expects
    #[error("table '{table}' does not match the expected schema: {message}")]
    SchemaMismatch { table: String, message: String },
}

impl StorageError {
    pub fn constraint(
        kind: ConstraintKind,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StorageError::ConstraintViolation {
            kind,
            constraint: Some(constraint.into()),
            message: message.into(),
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StorageError::ConstraintViolation { .. })
    }
}

/// A specialized Result type for store operations
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConstraintViolation { message, .. } => ApiError::validation(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(format!("invalid path: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(format!("invalid query string: {}", rejection.body_text()))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("{} is invalid ({})", field, e.code),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        messages.sort();

        ApiError::validation(format!("validation failed: {}", messages.join(", ")))
    }
}

/// A specialized Result type for controller operations
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Tests
// =============================================================================
