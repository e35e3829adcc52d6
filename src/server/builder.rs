//! ServerBuilder for fluent API to build HTTP servers

use super::router::build_router;
use crate::config::AppConfig;
use crate::core::error::{ErrorTranslator, ValidationStatus};
use crate::core::service::{CompanyService, InvoiceService};
use crate::handlers::AppState;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the biztime HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryStore::new())
///     .with_validation_status(ValidationStatus::UnprocessableEntity)
///     .build()?;
/// ```
pub struct ServerBuilder {
    company_service: Option<Arc<dyn CompanyService>>,
    invoice_service: Option<Arc<dyn InvoiceService>>,
    translator: ErrorTranslator,
    cors: bool,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            company_service: None,
            invoice_service: None,
            translator: ErrorTranslator::default(),
            cors: false,
            custom_routes: Vec::new(),
        }
    }

    /// Use one store for both resources
    pub fn with_store<S>(mut self, store: S) -> Self
    where
        S: CompanyService + InvoiceService + 'static,
    {
        let store = Arc::new(store);
        self.company_service = Some(store.clone());
        self.invoice_service = Some(store);
        self
    }

    /// Set the company service (required unless `with_store` is used)
    pub fn with_company_service(mut self, service: impl CompanyService + 'static) -> Self {
        self.company_service = Some(Arc::new(service));
        self
    }

    /// Set the invoice service (required unless `with_store` is used)
    pub fn with_invoice_service(mut self, service: impl InvoiceService + 'static) -> Self {
        self.invoice_service = Some(Arc::new(service));
        self
    }

    pub fn with_error_translator(mut self, translator: ErrorTranslator) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_validation_status(self, status: ValidationStatus) -> Self {
        self.with_error_translator(ErrorTranslator::new(status))
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Apply the error and CORS settings of a loaded configuration
    pub fn with_config(self, config: &AppConfig) -> Self {
        self.with_validation_status(config.errors.validation_status)
            .with_cors(config.server.cors)
    }

    /// Add custom routes to the server
    ///
    /// Errors returned from these routes go through the same translation
    /// layer as the resource routes.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let admin_routes = Router::new().route("/version", get(version));
    ///
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .with_custom_routes(admin_routes)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the handler state
    pub fn build_state(&mut self) -> Result<AppState> {
        let companies = self.company_service.take().ok_or_else(|| {
            anyhow::anyhow!(
                "CompanyService is required. Call .with_store() or .with_company_service()"
            )
        })?;
        let invoices = self.invoice_service.take().ok_or_else(|| {
            anyhow::anyhow!(
                "InvoiceService is required. Call .with_store() or .with_invoice_service()"
            )
        })?;

        Ok(AppState::new(companies, invoices))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(build_router(state, self.translator, self.cors, custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .serve("127.0.0.1:3000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
