use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;
use crate::domain::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Field path → messages, present for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
    /// Whether resubmitting the same request may succeed.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::Validation(fields) => AppError::Validation(fields),
            DomainError::InvalidTransition { .. } => AppError::Conflict(e.to_string()),
            DomainError::Persistence(msg) => AppError::Persistence(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Persistence(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(fields) => ErrorResponse {
                error: self.to_string(),
                fields: Some(fields.clone()),
                retryable: false,
            },
            AppError::Persistence(msg) => {
                log::error!("Persistence failure: {}", msg);
                ErrorResponse {
                    error: "The request could not be saved, please try again".to_string(),
                    fields: None,
                    retryable: true,
                }
            }
            AppError::Internal(msg) => {
                log::error!("Internal failure: {}", msg);
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    fields: None,
                    retryable: false,
                }
            }
            _ => ErrorResponse {
                error: self.to_string(),
                fields: None,
                retryable: false,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
