//! Invoice status workflow endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::handlers::invoices::find_invoice;
use crate::handlers::workflow_status;
use crate::models::InvoiceStatus;
use crate::routes::AppState;
use crate::workflow::{
    status_options, QuickAction, StatusOption, TransitionDialog, TransitionOutcome, WorkflowError,
};
use crate::workspace::Workspace;

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: InvoiceStatus,
}

/// What the status control shows for one invoice.
#[derive(Debug, Serialize)]
pub struct WorkflowOverview {
    pub invoice_id: i64,
    pub current: InvoiceStatus,
    pub suggestion: Option<QuickAction>,
    pub options: Vec<StatusOption>,
    /// Open confirmation dialog, if any
    pub dialog: Option<TransitionDialog>,
}

#[derive(Debug, Serialize)]
pub struct Dismissed {
    pub dismissed: bool,
}

fn rejected(id: i64, e: WorkflowError) -> StatusCode {
    match &e {
        WorkflowError::Remote(_) | WorkflowError::Interrupted(_) => {
            error!("Status change for invoice {} failed: {}", id, e)
        }
        _ => warn!("Status change for invoice {} rejected: {}", id, e),
    }
    workflow_status(&e)
}

pub async fn overview(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Path(id): Path<i64>,
) -> Result<Json<WorkflowOverview>, StatusCode> {
    let invoice = find_invoice(&state, &ws, id).await?;

    Ok(Json(WorkflowOverview {
        invoice_id: id,
        current: invoice.status,
        suggestion: ws.changer.suggestion(&invoice),
        options: status_options(invoice.status),
        dialog: ws.changer.dialog(id).await,
    }))
}

/// Proposes a status. Answers `null` when the invoice already has it.
pub async fn request(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Path(id): Path<i64>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Option<TransitionDialog>>, StatusCode> {
    let invoice = find_invoice(&state, &ws, id).await?;

    ws.changer
        .request_transition(&invoice, body.status)
        .await
        .map(Json)
        .map_err(|e| rejected(id, e))
}

pub async fn open_picker(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Path(id): Path<i64>,
) -> Result<Json<TransitionDialog>, StatusCode> {
    let invoice = find_invoice(&state, &ws, id).await?;

    ws.changer
        .open_picker(&invoice)
        .await
        .map(Json)
        .map_err(|e| rejected(id, e))
}

pub async fn select(
    Extension(ws): Extension<Workspace>,
    Path(id): Path<i64>,
    Json(body): Json<StatusBody>,
) -> Result<Json<TransitionDialog>, StatusCode> {
    ws.changer
        .select_status(id, body.status)
        .await
        .map(Json)
        .map_err(|e| rejected(id, e))
}

/// Sends the selected status to the backend.
///
/// The outcome is also queued as a notification, so failures show up in
/// `/api/notifications` as well as in the status code. A client that
/// disconnects mid-request does not stop the update.
pub async fn confirm(
    Extension(ws): Extension<Workspace>,
    Path(id): Path<i64>,
) -> Result<Json<TransitionOutcome>, StatusCode> {
    ws.changer
        .confirm(id)
        .await
        .map(Json)
        .map_err(|e| rejected(id, e))
}

pub async fn dismiss(Extension(ws): Extension<Workspace>, Path(id): Path<i64>) -> Json<Dismissed> {
    Json(Dismissed {
        dismissed: ws.changer.dismiss(id).await,
    })
}
