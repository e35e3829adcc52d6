//! Service traits for company and invoice storage
//!
//! These traits are the query-executor seam: controllers only ever talk to a
//! store through them. Implementations must be safe for concurrent use and
//! execute each method as a single atomic statement (or equivalent).

use crate::core::error::StorageResult;
use crate::entities::{
    Company, CompanyChanges, CompanySummary, Invoice, InvoiceSummary, InvoiceWithCompany,
    NewCompany, NewInvoice,
};
use async_trait::async_trait;

/// Service trait for the `companies` table
#[async_trait]
pub trait CompanyService: Send + Sync {
    /// List all companies in insertion order
    async fn list(&self) -> StorageResult<Vec<CompanySummary>>;

    /// Get a company by code
    async fn get(&self, code: &str) -> StorageResult<Option<Company>>;

    /// Insert a company
    ///
    /// A duplicate code or name is reported as a unique constraint violation.
    async fn create(&self, company: NewCompany) -> StorageResult<Company>;

    /// Replace name and description; `None` when no row matched
    async fn update(&self, code: &str, changes: CompanyChanges) -> StorageResult<Option<Company>>;

    /// Delete a company and, by cascade, its invoices
    ///
    /// Returns `false` when no row matched.
    async fn delete(&self, code: &str) -> StorageResult<bool>;
}

/// Service trait for the `invoices` table
#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// List all invoices ordered by id
    async fn list(&self) -> StorageResult<Vec<InvoiceSummary>>;

    /// Get an invoice by id
    async fn get(&self, id: i64) -> StorageResult<Option<Invoice>>;

    /// Get an invoice joined with its owning company in one read
    async fn get_with_company(&self, id: i64) -> StorageResult<Option<InvoiceWithCompany>>;

    /// List the invoices owned by a company, ordered by id
    async fn list_for_company(&self, code: &str) -> StorageResult<Vec<Invoice>>;

    /// Insert an invoice with store-assigned defaults
    ///
    /// An unknown `comp_code` is reported as a foreign key violation.
    async fn create(&self, invoice: NewInvoice) -> StorageResult<Invoice>;

    /// Change the amount; `None` when no row matched
    async fn update_amount(&self, id: i64, amt: f64) -> StorageResult<Option<Invoice>>;

    /// Delete an invoice; `false` when no row matched
    async fn delete(&self, id: i64) -> StorageResult<bool>;
}
