use std::collections::HashMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::pricing::PricingError;

// Every handler maps its failures onto this enum; the response body is
// always `{"error": "..."}` (plus `details` for field validation).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid request body")]
    InvalidBody(#[from] JsonRejection),

    #[error("Invalid query string")]
    InvalidQuery(#[from] QueryRejection),

    #[error("Invalid path parameter")]
    InvalidPath(#[from] PathRejection),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Permission denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Spreadsheet export failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidBody(_)
            | AppError::InvalidQuery(_)
            | AppError::InvalidPath(_)
            | AppError::Pricing(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    for e in field_errors {
                        // struct-level rules name the offending field in their code
                        let key = if field == "__all__" { e.code.to_string() } else { field.to_string() };
                        let message = match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        };
                        details.entry(key).or_default().push(message);
                    }
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidBody(rejection) => rejection.body_text(),
            AppError::InvalidQuery(rejection) => rejection.body_text(),
            AppError::InvalidPath(rejection) => rejection.body_text(),
            AppError::Pricing(e) => e.to_string(),
            AppError::EmailAlreadyExists => "This email is already in use.".to_string(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::Unauthenticated => "Authentication required".to_string(),
            AppError::Forbidden => "Permission denied".to_string(),
            AppError::NotFound(entity) => format!("{} not found", entity),
            AppError::Conflict(message) => message,

            // Database, bcrypt, export and anything unexpected: log the detail,
            // return a generic message.
            e => {
                tracing::error!(error = ?e, "internal server error");
                "An unexpected error occurred.".to_string()
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("Customer").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::EmailAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Pricing(PricingError::NonPositiveQuantity).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = AppError::InternalServerError(anyhow::anyhow!("secret table missing"))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(AppError::NotFound("Sale").to_string(), "Sale not found");
    }
}
