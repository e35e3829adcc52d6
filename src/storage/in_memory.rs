//! In-memory store for testing and development
//!
//! Both tables live behind one `RwLock`, so every operation (including the
//! invoice/company join and the delete cascade) sees a consistent snapshot.
//! The store reproduces the constraints of the PostgreSQL schema and reports
//! violations with the same [`StorageError`] kinds.

use crate::core::error::{ConstraintKind, StorageError, StorageResult};
use crate::core::service::{CompanyService, InvoiceService};
use crate::entities::{
    Company, CompanyChanges, CompanySummary, Invoice, InvoiceSummary, InvoiceWithCompany,
    NewCompany, NewInvoice,
};
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

const BACKEND: &str = "in-memory";

#[derive(Debug, Default)]
struct Tables {
    /// Keyed by code, iteration order is insertion order
    companies: IndexMap<String, Company>,
    invoices: BTreeMap<i64, Invoice>,
    last_invoice_id: i64,
}

/// In-memory implementation of both store traits
///
/// Cloning shares the underlying tables.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|e| StorageError::Unavailable {
            backend: BACKEND.to_string(),
            message: format!("Failed to acquire read lock: {}", e),
        })
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|e| StorageError::Unavailable {
            backend: BACKEND.to_string(),
            message: format!("Failed to acquire write lock: {}", e),
        })
    }
}

fn check_amount(amt: f64) -> StorageResult<()> {
    if amt.is_finite() && amt > 0.0 {
        Ok(())
    } else {
        Err(StorageError::constraint(
            ConstraintKind::Check,
            "invoices_amt_check",
            format!("amt must be greater than zero, got {}", amt),
        ))
    }
}

#[async_trait]
impl CompanyService for InMemoryStore {
    async fn list(&self) -> StorageResult<Vec<CompanySummary>> {
        let tables = self.read()?;
        Ok(tables.companies.values().map(CompanySummary::from).collect())
    }

    async fn get(&self, code: &str) -> StorageResult<Option<Company>> {
        let tables = self.read()?;
        Ok(tables.companies.get(code).cloned())
    }

    async fn create(&self, company: NewCompany) -> StorageResult<Company> {
        let mut tables = self.write()?;

        if tables.companies.contains_key(&company.code) {
            return Err(StorageError::constraint(
                ConstraintKind::Unique,
                "companies_pkey",
                format!("company code '{}' already exists", company.code),
            ));
        }
        if tables.companies.values().any(|c| c.name == company.name) {
            return Err(StorageError::constraint(
                ConstraintKind::Unique,
                "companies_name_key",
                format!("company name '{}' already exists", company.name),
            ));
        }

        let row = Company {
            code: company.code,
            name: company.name,
            description: Some(company.description),
        };
        tables.companies.insert(row.code.clone(), row.clone());

        Ok(row)
    }

    async fn update(&self, code: &str, changes: CompanyChanges) -> StorageResult<Option<Company>> {
        let mut tables = self.write()?;

        if !tables.companies.contains_key(code) {
            return Ok(None);
        }
        if tables
            .companies
            .values()
            .any(|c| c.code != code && c.name == changes.name)
        {
            return Err(StorageError::constraint(
                ConstraintKind::Unique,
                "companies_name_key",
                format!("company name '{}' already exists", changes.name),
            ));
        }

        let Some(row) = tables.companies.get_mut(code) else {
            return Ok(None);
        };
        row.name = changes.name;
        row.description = changes.description;

        Ok(Some(row.clone()))
    }

    async fn delete(&self, code: &str) -> StorageResult<bool> {
        let mut tables = self.write()?;

        if tables.companies.shift_remove(code).is_none() {
            return Ok(false);
        }

        // ON DELETE CASCADE
        let before = tables.invoices.len();
        tables.invoices.retain(|_, invoice| invoice.comp_code != code);
        let cascaded = before - tables.invoices.len();
        if cascaded > 0 {
            tracing::debug!(code, cascaded, "deleted invoices with their company");
        }

        Ok(true)
    }
}

#[async_trait]
impl InvoiceService for InMemoryStore {
    async fn list(&self) -> StorageResult<Vec<InvoiceSummary>> {
        let tables = self.read()?;
        Ok(tables.invoices.values().map(InvoiceSummary::from).collect())
    }

    async fn get(&self, id: i64) -> StorageResult<Option<Invoice>> {
        let tables = self.read()?;
        Ok(tables.invoices.get(&id).cloned())
    }

    async fn get_with_company(&self, id: i64) -> StorageResult<Option<InvoiceWithCompany>> {
        let tables = self.read()?;

        Ok(tables.invoices.get(&id).map(|invoice| InvoiceWithCompany {
            invoice: invoice.clone(),
            company: tables.companies.get(&invoice.comp_code).cloned(),
        }))
    }

    async fn list_for_company(&self, code: &str) -> StorageResult<Vec<Invoice>> {
        let tables = self.read()?;
        Ok(tables
            .invoices
            .values()
            .filter(|invoice| invoice.comp_code == code)
            .cloned()
            .collect())
    }

    async fn create(&self, invoice: NewInvoice) -> StorageResult<Invoice> {
        let mut tables = self.write()?;

        if !tables.companies.contains_key(&invoice.comp_code) {
            return Err(StorageError::constraint(
                ConstraintKind::ForeignKey,
                "invoices_comp_code_fkey",
                format!("company '{}' does not exist", invoice.comp_code),
            ));
        }
        check_amount(invoice.amt)?;

        tables.last_invoice_id += 1;
        let row = Invoice {
            id: tables.last_invoice_id,
            comp_code: invoice.comp_code,
            amt: invoice.amt,
            paid: false,
            add_date: Utc::now(),
            paid_date: None,
        };
        tables.invoices.insert(row.id, row.clone());

        Ok(row)
    }

    async fn update_amount(&self, id: i64, amt: f64) -> StorageResult<Option<Invoice>> {
        let mut tables = self.write()?;

        let Some(row) = tables.invoices.get_mut(&id) else {
            return Ok(None);
        };
        check_amount(amt)?;
        row.amt = amt;

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.write()?;
        Ok(tables.invoices.remove(&id).is_some())
    }
}
