//! JSON route handlers.
//!
//! Handlers return `Result<Json<_>, StatusCode>`; backend and workflow
//! errors are logged and mapped with [`api_status`] / [`workflow_status`].

pub mod analytics;
pub mod health;
pub mod invoices;
pub mod notifications;
pub mod session;
pub mod suppliers;
pub mod workflow;

use axum::http::StatusCode;

use crate::api::ApiError;
use crate::workflow::WorkflowError;

/// Status code reported to the operator for a failed backend call.
pub fn api_status(e: &ApiError) -> StatusCode {
    match e {
        ApiError::Transport(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        ApiError::Transport(_) | ApiError::Decode(_) => StatusCode::BAD_GATEWAY,
        // Client errors from the backend are passed through as-is
        ApiError::Status { status, .. } => match StatusCode::from_u16(*status) {
            Ok(code) if code.is_client_error() => code,
            _ => StatusCode::BAD_GATEWAY,
        },
        ApiError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

pub fn workflow_status(e: &WorkflowError) -> StatusCode {
    match e {
        WorkflowError::NoOpTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowError::NotRequested(_) | WorkflowError::InFlight(_) => StatusCode::CONFLICT,
        WorkflowError::Interrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        WorkflowError::Remote(err) => api_status(err),
    }
}
