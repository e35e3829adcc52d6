//! Company handlers

use super::AppState;
use crate::core::error::{ApiError, ApiResult};
use crate::core::response::{
    CompanyDetailResponse, CompanyListResponse, CompanyResponse, DeletedResponse,
};
use crate::core::validation::{CompanyDetailQuery, ValidatedJson};
use crate::entities::{CreateCompanyRequest, UpdateCompanyRequest};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
};

/// List every company as `{code, name}` in insertion order
///
/// GET /companies
pub async fn list_companies(State(state): State<AppState>) -> ApiResult<Json<CompanyListResponse>> {
    let companies = state.companies.list().await?;
    Ok(Json(CompanyListResponse { companies }))
}

/// Fetch one company
///
/// GET /companies/{code}
///
/// With `?include=invoices` the company's invoices are embedded under
/// `invoices`; otherwise the body is exactly `{code, name, description}`.
/// An unknown code is a 404 whatever the query string holds.
///
/// The company and its invoices are two separate reads, not one snapshot:
/// an invoice created or deleted in between may or may not be listed.
pub async fn get_company(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<CompanyDetailQuery>, QueryRejection>,
) -> ApiResult<Json<CompanyDetailResponse>> {
    let Path(code) = path?;

    let company = state
        .companies
        .get(&code)
        .await?
        .ok_or_else(|| ApiError::company_not_found(&code))?;

    let Query(query) = query?;
    let invoices = if query.embeds_invoices()? {
        Some(state.invoices.list_for_company(&company.code).await?)
    } else {
        None
    };

    Ok(Json(CompanyDetailResponse::new(company, invoices)))
}

/// Create a company
///
/// POST /companies
///
/// A duplicate code or name is rejected by the store's uniqueness
/// constraints and reported as a validation failure.
pub async fn create_company(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<CompanyResponse>)> {
    let new_company = payload
        .into_new_company()
        .ok_or_else(|| ApiError::validation("code, name and description are required"))?;

    let company = state.companies.create(new_company).await?;
    tracing::info!(code = %company.code, "company created");

    Ok((StatusCode::CREATED, Json(CompanyResponse { company })))
}

/// Replace a company's name and description
///
/// PUT /companies/{code}
///
/// The path code always wins over any `code` in the body. An unknown code is
/// reported as not found even when the body is also invalid.
pub async fn update_company(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<ValidatedJson<UpdateCompanyRequest>, ApiError>,
) -> ApiResult<Json<CompanyResponse>> {
    let Path(code) = path?;
    let payload = match payload {
        Ok(ValidatedJson(payload)) => payload,
        Err(err) => {
            if state.companies.get(&code).await?.is_none() {
                return Err(ApiError::company_not_found(&code));
            }
            return Err(err);
        }
    };

    let changes = payload
        .into_changes()
        .ok_or_else(|| ApiError::validation("name is required"))?;

    let company = state
        .companies
        .update(&code, changes)
        .await?
        .ok_or_else(|| ApiError::company_not_found(&code))?;

    Ok(Json(CompanyResponse { company }))
}

/// Delete a company and, through the cascade, its invoices
///
/// DELETE /companies/{code}
pub async fn delete_company(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<DeletedResponse>> {
    let Path(code) = path?;
    if !state.companies.delete(&code).await? {
        return Err(ApiError::company_not_found(&code));
    }

    tracing::info!(code = %code, "company deleted");
    Ok(Json(DeletedResponse::new()))
}
