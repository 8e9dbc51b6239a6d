//! Application-wide error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use payops_core::{AuthError, FieldError, ParseError, StoreError, SubmitError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Payment {0} not found")]
    NotFound(String),

    #[error("Invalid payment form")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<SubmitError> for DashboardError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(fields) => Self::Validation(fields),
            SubmitError::Store(e) => Self::Store(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl DashboardError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized | Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Parse(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::DuplicateId(_))
            | Self::Store(StoreError::NotRetryable { .. })
            | Self::Store(StoreError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();
        let fields = match self {
            Self::Validation(fields) => fields,
            _ => Vec::new(),
        };
        (status, Json(ErrorResponse { error, fields })).into_response()
    }
}
