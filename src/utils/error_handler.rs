// Global error handling for HTTP middleware layers and handler errors

use axum::{
    BoxError,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::error::Error;
// tower's error type for timeouts
use tower::timeout::error::Elapsed;
// Axum uses http_body_util for length-limiting
use http_body_util::LengthLimitError;
use tracing::error;

use crate::utils::header_util;
use crate::utils::response_handler::HandlerResponse;

/// Maps various error types to appropriate HTTP responses
pub async fn handle_global_error(err: BoxError) -> impl IntoResponse {
    // 413 if the body was too large
    if err.is::<LengthLimitError>() || find_cause::<LengthLimitError>(&*err).is_some() {
        return StatusCode::PAYLOAD_TOO_LARGE;
    }

    // 408 if the request took too long
    if err.is::<Elapsed>() {
        return StatusCode::REQUEST_TIMEOUT;
    }

    // Otherwise, 500
    error!("Unhandled layer error: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Helper function to find specific error type in error chain
pub fn find_cause<T: Error + 'static>(err: &dyn Error) -> Option<&T> {
    let mut source: Option<&dyn Error> = err.source();

    while let Some(s) = source {
        if let Some(typed) = s.downcast_ref::<T>() {
            return Some(typed);
        }
        source = s.source();
    }

    None
}

/// A single failed field check on an incoming payload
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Errors returned by entity handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected request that the client can fix; carries the alert key sent back in headers
    #[error("{message}")]
    BadRequestAlert {
        message: String,
        entity_name: &'static str,
        error_key: &'static str,
    },

    #[error("Validation failed for {entity_name}")]
    Validation {
        entity_name: &'static str,
        errors: Vec<FieldError>,
    },

    #[error("{entity_name} {id} not found")]
    NotFound {
        entity_name: &'static str,
        id: i64,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request_alert(
        message: impl Into<String>,
        entity_name: &'static str,
        error_key: &'static str,
    ) -> Self {
        Self::BadRequestAlert {
            message: message.into(),
            entity_name,
            error_key,
        }
    }

    /// Builds the response envelope, using `app_name` for the alert header names
    pub fn into_handler_response(self, app_name: &str) -> HandlerResponse {
        match self {
            ApiError::BadRequestAlert { message, entity_name, error_key } => {
                HandlerResponse::new(StatusCode::BAD_REQUEST)
                    .data(json!({ "error": error_key, "entityName": entity_name }))
                    .message(message)
                    .headers(header_util::failure_alert(app_name, entity_name, error_key))
            }
            ApiError::Validation { entity_name, errors } => {
                HandlerResponse::new(StatusCode::BAD_REQUEST)
                    .data(json!({ "error": "validation", "fieldErrors": errors }))
                    .message(format!("Invalid {entity_name} payload"))
                    .headers(header_util::failure_alert(app_name, entity_name, "validation"))
            }
            ApiError::NotFound { entity_name, id } => {
                HandlerResponse::new(StatusCode::NOT_FOUND)
                    .data(json!({ "error": "not_found", "id": id }))
                    .message(format!("{entity_name} {id} not found"))
            }
            ApiError::Internal(e) => {
                error!("Internal error while handling request: {:#}", e);
                HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .data(json!({ "error": "internal_error" }))
                    .message("Internal server error")
            }
        }
    }
}
