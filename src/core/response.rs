//! Response envelopes
//!
//! One struct per operation result so the list and detail views cannot drift
//! apart. Every success body is wrapped under its resource key.

use crate::entities::{Company, CompanySummary, Invoice, InvoiceDetail, InvoiceSummary};
use serde::{Deserialize, Serialize};

/// `{companies: [{code, name}, ...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanySummary>,
}

/// `{company: {code, name, description}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyResponse {
    pub company: Company,
}

/// Company detail with its invoices embedded when requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoices: Option<Vec<Invoice>>,
}

/// `{company: {code, name, description[, invoices]}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetailResponse {
    pub company: CompanyDetail,
}

impl CompanyDetailResponse {
    pub fn new(company: Company, invoices: Option<Vec<Invoice>>) -> Self {
        Self {
            company: CompanyDetail { company, invoices },
        }
    }
}

/// `{invoices: [{id, comp_code}, ...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceSummary>,
}

/// `{invoice: {id, comp_code, amt, paid, add_date, paid_date}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub invoice: Invoice,
}

/// `{invoice: {id, amt, paid, add_date, paid_date, company}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetailResponse {
    pub invoice: InvoiceDetail,
}

/// `{status: "deleted"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub status: String,
}

impl DeletedResponse {
    pub fn new() -> Self {
        Self {
            status: "deleted".to_string(),
        }
    }
}

impl Default for DeletedResponse {
    fn default() -> Self {
        Self::new()
    }
}
