//! Business entities: companies and the invoices they own

pub mod company;
pub mod invoice;

pub use company::{
    Company, CompanyChanges, CompanySummary, CreateCompanyRequest, NewCompany,
    UpdateCompanyRequest,
};
pub use invoice::{
    CreateInvoiceRequest, Invoice, InvoiceDetail, InvoiceSummary, InvoiceWithCompany, NewInvoice,
    UpdateInvoiceRequest,
};
