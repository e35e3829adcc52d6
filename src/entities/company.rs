//! Company entity, its projections and request payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A company row
///
/// `code` is the primary key and never changes once inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// List view of a company (description omitted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

impl From<&Company> for CompanySummary {
    fn from(company: &Company) -> Self {
        Self {
            code: company.code.clone(),
            name: company.name.clone(),
        }
    }
}

/// A validated insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// A validated replacement of the mutable columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyChanges {
    pub name: String,
    pub description: Option<String>,
}

/// Body of `POST /companies`
///
/// Fields are optional at the serde level so that a missing field is reported
/// as a validation failure instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(
        required(message = "code is required"),
        length(min = 1, message = "code must not be empty")
    )]
    pub code: Option<String>,

    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,

    #[validate(required(message = "description is required"))]
    pub description: Option<String>,
}

impl CreateCompanyRequest {
    /// Convert a validated request. Returns `None` if a required field is
    /// absent, which cannot happen once `validate()` has passed.
    pub fn into_new_company(self) -> Option<NewCompany> {
        Some(NewCompany {
            code: self.code?,
            name: self.name?,
            description: self.description?,
        })
    }
}

/// Body of `PUT /companies/{code}`. Any `code` in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,

    pub description: Option<String>,
}

impl UpdateCompanyRequest {
    pub fn into_changes(self) -> Option<CompanyChanges> {
        Some(CompanyChanges {
            name: self.name?,
            description: self.description,
        })
    }
}
