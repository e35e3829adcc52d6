//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresStore`, which implements both [`CompanyService`] and
//! [`InvoiceService`] on top of a `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! biztime = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! `companies(code PK, name UNIQUE, description)` and
//! `invoices(id BIGSERIAL PK, comp_code FK ON DELETE CASCADE, amt CHECK > 0,
//! paid, add_date, paid_date)`. Constraint violations are classified from the
//! database error and returned as [`StorageError::ConstraintViolation`].
//!
//! The store owns this schema. Tables that already exist with other column
//! types (an older `invoices.id SERIAL` or `add_date DATE` layout) are
//! reported by [`ensure_schema`] as [`StorageError::SchemaMismatch`] instead
//! of failing later on the first decode.

use crate::core::error::{ConstraintKind, StorageError, StorageResult};
use crate::core::service::{CompanyService, InvoiceService};
use crate::entities::{
    Company, CompanyChanges, CompanySummary, Invoice, InvoiceSummary, InvoiceWithCompany,
    NewCompany, NewInvoice,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::error::ErrorKind as DbErrorKind;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

const BACKEND: &str = "postgres";

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Column name and `information_schema` data type the store decodes
const COMPANY_COLUMNS: &[(&str, &str)] = &[
    ("code", "text"),
    ("name", "text"),
    ("description", "text"),
    ("seq", "bigint"),
];

const INVOICE_COLUMNS: &[(&str, &str)] = &[
    ("id", "bigint"),
    ("comp_code", "text"),
    ("amt", "double precision"),
    ("paid", "boolean"),
    ("add_date", "timestamp with time zone"),
    ("paid_date", "timestamp with time zone"),
];

/// Apply the required tables (idempotent), then check their columns.
///
/// This is connection bootstrapping, not a migration tool: it only creates
/// what is missing. `companies.seq` keeps insertion order for listing.
/// Pre-existing tables with a different layout are not altered; they fail
/// with [`StorageError::SchemaMismatch`].
pub async fn ensure_schema(pool: &PgPool) -> StorageResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS companies (
            code TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            seq BIGSERIAL NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(classify)?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id BIGSERIAL PRIMARY KEY,
            comp_code TEXT NOT NULL REFERENCES companies (code) ON DELETE CASCADE,
            amt DOUBLE PRECISION NOT NULL CHECK (amt > 0),
            paid BOOLEAN NOT NULL DEFAULT FALSE,
            add_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            paid_date TIMESTAMPTZ
        )",
    )
    .execute(pool)
    .await
    .map_err(classify)?;

    verify_columns(pool, "companies", COMPANY_COLUMNS).await?;
    verify_columns(pool, "invoices", INVOICE_COLUMNS).await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_comp_code ON invoices (comp_code)")
        .execute(pool)
        .await
        .map_err(classify)?;

    Ok(())
}

async fn verify_columns(pool: &PgPool, table: &str, expected: &[(&str, &str)]) -> StorageResult<()> {
    let actual: Vec<(String, String)> = sqlx::query_as(
        "SELECT column_name::text, data_type::text
         FROM information_schema.columns
         WHERE table_schema = current_schema() AND table_name = $1",
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(classify)?;

    match column_mismatch(expected, &actual) {
        Some(message) => {
            tracing::error!(table, %message, "existing table has an incompatible layout");
            Err(StorageError::SchemaMismatch {
                table: table.to_string(),
                message,
            })
        }
        None => Ok(()),
    }
}

/// Describe every expected column that is missing or has another type
fn column_mismatch(expected: &[(&str, &str)], actual: &[(String, String)]) -> Option<String> {
    let problems: Vec<String> = expected
        .iter()
        .filter_map(|(column, data_type)| {
            match actual.iter().find(|(name, _)| name == column) {
                None => Some(format!("missing column {}", column)),
                Some((_, found)) if found != data_type => Some(format!(
                    "column {} is {}, expected {}",
                    column, found, data_type
                )),
                Some(_) => None,
            }
        })
        .collect();

    if problems.is_empty() {
        None
    } else {
        Some(problems.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Map a sqlx error onto the storage taxonomy
fn classify(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::Database(db) => {
            let kind = match db.kind() {
                DbErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
                DbErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                DbErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                DbErrorKind::CheckViolation => Some(ConstraintKind::Check),
                _ => None,
            };

            match kind {
                Some(kind) => StorageError::ConstraintViolation {
                    kind,
                    constraint: db.constraint().map(str::to_string),
                    message: db.message().to_string(),
                },
                None => StorageError::Query {
                    backend: BACKEND.to_string(),
                    message: db.message().to_string(),
                },
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable {
            backend: BACKEND.to_string(),
            message: err.to_string(),
        },
        other => StorageError::Query {
            backend: BACKEND.to_string(),
            message: other.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// PostgresStore
// ---------------------------------------------------------------------------

/// Store backed by PostgreSQL.
///
/// Every method is a single parameterized statement; writes use `RETURNING`
/// so the response is the canonical post-mutation row.
///
/// # Example
///
/// ```rust,ignore
/// use biztime::storage::PostgresStore;
///
/// let store = PostgresStore::connect("postgres://localhost/biztime", 5, Duration::from_secs(30)).await?;
/// store.ensure_schema().await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new `PostgresStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`
    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| StorageError::Unavailable {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(max_connections, "connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> StorageResult<()> {
        ensure_schema(&self.pool).await
    }
}

/// Row of the invoice/company `LEFT JOIN`
#[derive(sqlx::FromRow)]
struct InvoiceCompanyRow {
    id: i64,
    comp_code: String,
    amt: f64,
    paid: bool,
    add_date: DateTime<Utc>,
    paid_date: Option<DateTime<Utc>>,
    company_code: Option<String>,
    company_name: Option<String>,
    company_description: Option<String>,
}

impl From<InvoiceCompanyRow> for InvoiceWithCompany {
    fn from(row: InvoiceCompanyRow) -> Self {
        let company = match (row.company_code, row.company_name) {
            (Some(code), Some(name)) => Some(Company {
                code,
                name,
                description: row.company_description,
            }),
            _ => None,
        };

        InvoiceWithCompany {
            invoice: Invoice {
                id: row.id,
                comp_code: row.comp_code,
                amt: row.amt,
                paid: row.paid,
                add_date: row.add_date,
                paid_date: row.paid_date,
            },
            company,
        }
    }
}

#[async_trait]
impl CompanyService for PostgresStore {
    async fn list(&self) -> StorageResult<Vec<CompanySummary>> {
        sqlx::query_as::<_, CompanySummary>("SELECT code, name FROM companies ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn get(&self, code: &str) -> StorageResult<Option<Company>> {
        sqlx::query_as::<_, Company>(
            "SELECT code, name, description FROM companies WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn create(&self, company: NewCompany) -> StorageResult<Company> {
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (code, name, description) VALUES ($1, $2, $3) \
             RETURNING code, name, description",
        )
        .bind(&company.code)
        .bind(&company.name)
        .bind(&company.description)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn update(&self, code: &str, changes: CompanyChanges) -> StorageResult<Option<Company>> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET name = $1, description = $2 WHERE code = $3 \
             RETURNING code, name, description",
        )
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn delete(&self, code: &str) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl InvoiceService for PostgresStore {
    async fn list(&self) -> StorageResult<Vec<InvoiceSummary>> {
        sqlx::query_as::<_, InvoiceSummary>("SELECT id, comp_code FROM invoices ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn get(&self, id: i64) -> StorageResult<Option<Invoice>> {
        sqlx::query_as::<_, Invoice>(
            "SELECT id, comp_code, amt, paid, add_date, paid_date FROM invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn get_with_company(&self, id: i64) -> StorageResult<Option<InvoiceWithCompany>> {
        let row = sqlx::query_as::<_, InvoiceCompanyRow>(
            "SELECT i.id, i.comp_code, i.amt, i.paid, i.add_date, i.paid_date, \
                    c.code AS company_code, c.name AS company_name, \
                    c.description AS company_description \
             FROM invoices i \
             LEFT JOIN companies c ON c.code = i.comp_code \
             WHERE i.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        Ok(row.map(InvoiceWithCompany::from))
    }

    async fn list_for_company(&self, code: &str) -> StorageResult<Vec<Invoice>> {
        sqlx::query_as::<_, Invoice>(
            "SELECT id, comp_code, amt, paid, add_date, paid_date FROM invoices \
             WHERE comp_code = $1 ORDER BY id",
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)
    }

    async fn create(&self, invoice: NewInvoice) -> StorageResult<Invoice> {
        sqlx::query_as::<_, Invoice>(
            "INSERT INTO invoices (comp_code, amt) VALUES ($1, $2) \
             RETURNING id, comp_code, amt, paid, add_date, paid_date",
        )
        .bind(&invoice.comp_code)
        .bind(invoice.amt)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn update_amount(&self, id: i64, amt: f64) -> StorageResult<Option<Invoice>> {
        sqlx::query_as::<_, Invoice>(
            "UPDATE invoices SET amt = $1 WHERE id = $2 \
             RETURNING id, comp_code, amt, paid, add_date, paid_date",
        )
        .bind(amt)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }
}
