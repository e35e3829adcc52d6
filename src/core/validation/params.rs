//! Path and query parameter parsing

use crate::core::error::ApiError;
use serde::Deserialize;

/// Parse the `{id}` segment of an invoice route
pub fn parse_invoice_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation(format!("invoice id must be an integer, got '{}'", raw)))
}

/// Query string of `GET /companies/{code}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyDetailQuery {
    /// Comma separated list of related resources to embed
    pub include: Option<String>,
}

impl CompanyDetailQuery {
    /// Whether the caller asked for the company's invoices.
    ///
    /// Only `invoices` is a known relation; anything else is rejected.
    pub fn embeds_invoices(&self) -> Result<bool, ApiError> {
        let Some(include) = &self.include else {
            return Ok(false);
        };

        let mut invoices = false;
        for relation in include.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            match relation {
                "invoices" => invoices = true,
                other => {
                    return Err(ApiError::validation(format!(
                        "unknown relation '{}' in include",
                        other
                    )));
                }
            }
        }

        Ok(invoices)
    }
}
