use std::collections::BTreeMap;
use std::error::Error as StdError;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::response::PrettyJson;
use crate::security::json::JsonRejection;
use crate::store::StoreError;

pub const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
pub const SERVER_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

/// Centralized application error type mapping every failure onto an HTTP
/// status and a JSON `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(#[from] JsonRejection),

    #[error("failed validation: {0:?}")]
    FailedValidation(BTreeMap<String, String>),

    #[error("resource not found")]
    NotFound,

    #[error("the {0} method is not supported for this resource")]
    MethodNotAllowed(Method),

    #[error("storage error")]
    Store(#[source] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: Value,
}

impl AppError {
    /// Builds a validation failure carrying a single field message.
    pub fn field(field: &str, message: &str) -> Self {
        AppError::FailedValidation(BTreeMap::from([(field.to_string(), message.to_string())]))
    }

    /// Determines the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::FailedValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Store(StoreError::RecordNotFound) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The body sent to the client. Server errors carry a generic message.
    fn client_body(&self) -> Value {
        match self {
            AppError::BadRequest(rejection) => Value::String(rejection.to_string()),
            AppError::FailedValidation(errors) => {
                serde_json::to_value(errors).unwrap_or_else(|_| Value::Object(Default::default()))
            }
            AppError::NotFound | AppError::Store(StoreError::RecordNotFound) => {
                Value::String(NOT_FOUND_MESSAGE.to_string())
            }
            AppError::MethodNotAllowed(_) => Value::String(self.to_string()),
            AppError::Store(_) | AppError::Internal(_) => {
                Value::String(SERVER_ERROR_MESSAGE.to_string())
            }
        }
    }

    /// Logs the error with appropriate context
    /// This allows internal errors to be logged even when not exposed to clients
    fn log_error(&self) {
        match self.status_code() {
            code if code.is_client_error() => {
                tracing::warn!(
                    error = %self,
                    status_code = %code,
                    "Client error"
                );
            }
            code if code.is_server_error() => {
                tracing::error!(
                    error = %self,
                    status_code = %code,
                    source = ?self.source(),
                    "Server error"
                );
            }
            _ => {}
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log_error();

        let body = ErrorResponse {
            error: self.client_body(),
        };
        PrettyJson::new(self.status_code(), body).into_response()
    }
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        AppError::BadRequest(self).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::RecordNotFound => AppError::NotFound,
            other => AppError::Store(other),
        }
    }
}
