//! Request validation
//!
//! Bodies are checked by the [`ValidatedJson`] extractor against the
//! `#[validate]` rules on each request type; path and query parameters are
//! parsed by the helpers in [`params`].

pub mod extractor;
pub mod params;

pub use extractor::ValidatedJson;
pub use params::{CompanyDetailQuery, parse_invoice_id};
