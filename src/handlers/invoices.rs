//! Invoice handlers

use super::AppState;
use crate::core::error::{ApiError, ApiResult};
use crate::core::response::{
    DeletedResponse, InvoiceDetailResponse, InvoiceListResponse, InvoiceResponse,
};
use crate::core::validation::{ValidatedJson, parse_invoice_id};
use crate::entities::{CreateInvoiceRequest, InvoiceDetail, UpdateInvoiceRequest};
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
};

/// GET /invoices
pub async fn list_invoices(State(state): State<AppState>) -> ApiResult<Json<InvoiceListResponse>> {
    let invoices = state.invoices.list().await?;
    Ok(Json(InvoiceListResponse { invoices }))
}

/// Fetch one invoice with its owning company embedded
///
/// GET /invoices/{id}
///
/// The invoice and its company are read together. An invoice whose company
/// is missing means the foreign key was bypassed, which is an internal error
/// rather than a not found.
pub async fn get_invoice(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<InvoiceDetailResponse>> {
    let Path(raw_id) = path?;
    let id = parse_invoice_id(&raw_id)?;

    let joined = state
        .invoices
        .get_with_company(id)
        .await?
        .ok_or_else(|| ApiError::invoice_not_found(id))?;

    let company = joined.company.ok_or_else(|| {
        ApiError::integrity(format!(
            "invoice {} references missing company '{}'",
            id, joined.invoice.comp_code
        ))
    })?;

    Ok(Json(InvoiceDetailResponse {
        invoice: InvoiceDetail::compose(joined.invoice, company),
    }))
}

/// Create an invoice for an existing company
///
/// POST /invoices
///
/// `paid`, `add_date` and `paid_date` take their store defaults. An unknown
/// `comp_code` fails the foreign key and nothing is inserted.
pub async fn create_invoice(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<InvoiceResponse>)> {
    let new_invoice = payload
        .into_new_invoice()
        .ok_or_else(|| ApiError::validation("comp_code and amt are required"))?;

    let invoice = state.invoices.create(new_invoice).await?;
    tracing::info!(id = invoice.id, comp_code = %invoice.comp_code, "invoice created");

    Ok((StatusCode::CREATED, Json(InvoiceResponse { invoice })))
}

/// Change an invoice's amount; every other column is left as is
///
/// PUT /invoices/{id}
pub async fn update_invoice(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<ValidatedJson<UpdateInvoiceRequest>, ApiError>,
) -> ApiResult<Json<InvoiceResponse>> {
    let Path(raw_id) = path?;
    let id = parse_invoice_id(&raw_id)?;

    let amt = match payload {
        Ok(ValidatedJson(payload)) => payload.amt,
        Err(err) => {
            if state.invoices.get(id).await?.is_none() {
                return Err(ApiError::invoice_not_found(id));
            }
            return Err(err);
        }
    };
    let amt = amt.ok_or_else(|| ApiError::validation("amt is required"))?;

    let invoice = state
        .invoices
        .update_amount(id, amt)
        .await?
        .ok_or_else(|| ApiError::invoice_not_found(id))?;

    Ok(Json(InvoiceResponse { invoice }))
}

/// DELETE /invoices/{id}
pub async fn delete_invoice(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<DeletedResponse>> {
    let Path(raw_id) = path?;
    let id = parse_invoice_id(&raw_id)?;

    if !state.invoices.delete(id).await? {
        return Err(ApiError::invoice_not_found(id));
    }

    tracing::info!(id, "invoice deleted");
    Ok(Json(DeletedResponse::new()))
}
