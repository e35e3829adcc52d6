//! HTTP handlers for the company and invoice resources
//!
//! Handlers are thin: they parse and validate input, call the store traits
//! and wrap the result in its response envelope. Every failure is an
//! [`ApiError`](crate::core::ApiError) so the error translation layer sees a
//! single type.

pub mod companies;
pub mod invoices;

use crate::core::service::{CompanyService, InvoiceService};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<dyn CompanyService>,
    pub invoices: Arc<dyn InvoiceService>,
}

impl AppState {
    pub fn new(companies: Arc<dyn CompanyService>, invoices: Arc<dyn InvoiceService>) -> Self {
        Self {
            companies,
            invoices,
        }
    }

    /// Both resources served by one store
    pub fn from_store<S>(store: S) -> Self
    where
        S: CompanyService + InvoiceService + 'static,
    {
        let store = Arc::new(store);
        Self {
            companies: store.clone(),
            invoices: store,
        }
    }
}

/// Build the resource routes
///
/// - GET    /companies
/// - POST   /companies
/// - GET    /companies/{code}
/// - PUT    /companies/{code}
/// - DELETE /companies/{code}
/// - GET    /invoices
/// - POST   /invoices
/// - GET    /invoices/{id}
/// - PUT    /invoices/{id}
/// - DELETE /invoices/{id}
pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/companies/{code}",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route(
            "/invoices/{id}",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .with_state(state)
}
