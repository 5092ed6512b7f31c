use crate::api::ApiError;
use crate::models::InvoiceStatus;

/// Reasons a status change is refused or fails.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Target equals the status the invoice already has
    #[error("invoice {id} is already {status}")]
    NoOpTransition { id: i64, status: InvoiceStatus },

    /// No open dialog proposes this change
    #[error("no status change was requested for invoice {0}")]
    NotRequested(i64),

    /// A status change for the invoice is already in flight
    #[error("a status change for invoice {0} is already in progress")]
    InFlight(i64),

    /// The task running the backend call panicked or was aborted
    #[error("status update for invoice {0} was interrupted")]
    Interrupted(i64),

    #[error("status update failed: {0}")]
    Remote(#[from] ApiError),
}
