//! Invoice entity, its projections and request payloads

use super::company::Company;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An invoice row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
}

/// List view of an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct InvoiceSummary {
    pub id: i64,
    pub comp_code: String,
}

impl From<&Invoice> for InvoiceSummary {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            comp_code: invoice.comp_code.clone(),
        }
    }
}

/// Result of the invoice/company join
///
/// `company` is `None` only when the foreign key invariant has been broken
/// underneath the store.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceWithCompany {
    pub invoice: Invoice,
    pub company: Option<Company>,
}

/// Detail view of an invoice: the owning company replaces `comp_code`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub id: i64,
    pub amt: f64,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
    pub company: Company,
}

impl InvoiceDetail {
    pub fn compose(invoice: Invoice, company: Company) -> Self {
        Self {
            id: invoice.id,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date,
            paid_date: invoice.paid_date,
            company,
        }
    }
}

/// A validated insert; everything else is assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub comp_code: String,
    pub amt: f64,
}

/// Body of `POST /invoices`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(
        required(message = "comp_code is required"),
        length(min = 1, message = "comp_code must not be empty")
    )]
    pub comp_code: Option<String>,

    #[validate(
        required(message = "amt is required"),
        range(exclusive_min = 0.0, message = "amt must be greater than zero")
    )]
    pub amt: Option<f64>,
}

impl CreateInvoiceRequest {
    pub fn into_new_invoice(self) -> Option<NewInvoice> {
        Some(NewInvoice {
            comp_code: self.comp_code?,
            amt: self.amt?,
        })
    }
}

/// Body of `PUT /invoices/{id}`. Only `amt` is read.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
    #[validate(
        required(message = "amt is required"),
        range(exclusive_min = 0.0, message = "amt must be greater than zero")
    )]
    pub amt: Option<f64>,
}
