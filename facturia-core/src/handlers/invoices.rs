use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::api::{InvoiceApi, InvoiceQuery, Page};
use crate::handlers::api_status;
use crate::models::{Invoice, InvoiceChanges, NewInvoice};
use crate::routes::AppState;
use crate::store::state::{InvoiceFilterPatch, InvoiceFilters};
use crate::store::{loaders, AppAction, InvoiceSummary};
use crate::workspace::Workspace;

/// Invoices matching the current filters, with their totals.
#[derive(Debug, Serialize)]
pub struct VisibleInvoices {
    pub invoices: Vec<Invoice>,
    pub summary: InvoiceSummary,
}

#[derive(Debug, Deserialize)]
pub struct BulkDelete {
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleted {
    pub deleted: Vec<i64>,
}

/// Fetches the company's invoices from the backend and caches them.
pub async fn list(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Query(mut query): Query<InvoiceQuery>,
) -> Result<Json<Page<Invoice>>, StatusCode> {
    query.company_phone = ws.company_phone.clone();

    let page = loaders::load_invoices(&ws.store, state.api.as_ref(), &query)
        .await
        .map_err(|e| {
            error!("Listing invoices failed: {}", e);
            api_status(&e)
        })?;

    Ok(Json(page))
}

/// Cached invoices narrowed by the store's invoice filters.
pub async fn visible(Extension(ws): Extension<Workspace>) -> Json<VisibleInvoices> {
    let (invoices, summary) = ws
        .store
        .read(|s| {
            let visible = s.filtered_invoices();
            let summary = InvoiceSummary::of(visible.iter().copied());
            let invoices: Vec<Invoice> = visible.into_iter().cloned().collect();
            (invoices, summary)
        })
        .await;

    Json(VisibleInvoices { invoices, summary })
}

/// Cached copy when present, otherwise fetched from the backend.
pub async fn get_one(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Path(id): Path<i64>,
) -> Result<Json<Invoice>, StatusCode> {
    find_invoice(&state, &ws, id).await.map(Json)
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Json(mut invoice): Json<NewInvoice>,
) -> Result<(StatusCode, Json<Invoice>), StatusCode> {
    invoice.company_phone = ws.company_phone.clone();

    let created = loaders::create_invoice(&ws.store, state.api.as_ref(), &invoice)
        .await
        .map_err(|e| api_status(&e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Path(id): Path<i64>,
    Json(changes): Json<InvoiceChanges>,
) -> Result<Json<Invoice>, StatusCode> {
    find_invoice(&state, &ws, id).await?;

    loaders::update_invoice(&ws.store, state.api.as_ref(), id, &changes)
        .await
        .map(Json)
        .map_err(|e| api_status(&e))
}

pub async fn delete_one(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    find_invoice(&state, &ws, id).await?;

    loaders::delete_invoice(&ws.store, state.api.as_ref(), id)
        .await
        .map_err(|e| api_status(&e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes several invoices; individual failures are reported as notifications.
///
/// Ids that do not belong to the operator's company are skipped.
pub async fn delete_many(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Json(request): Json<BulkDelete>,
) -> Json<BulkDeleted> {
    info!("Bulk delete of {} invoice(s)", request.ids.len());

    let mut owned = Vec::with_capacity(request.ids.len());
    for id in request.ids {
        match find_invoice(&state, &ws, id).await {
            Ok(_) => owned.push(id),
            Err(status) => warn!("Skipping invoice {} in bulk delete ({})", id, status),
        }
    }

    let deleted = loaders::delete_invoices(&ws.store, state.api.as_ref(), &owned).await;
    Json(BulkDeleted { deleted })
}

pub async fn set_filters(
    Extension(ws): Extension<Workspace>,
    Json(patch): Json<InvoiceFilterPatch>,
) -> Json<InvoiceFilters> {
    ws.store.dispatch(AppAction::SetInvoiceFilters(patch)).await;
    Json(ws.store.read(|s| s.invoice_filters.clone()).await)
}

pub async fn reset_filters(Extension(ws): Extension<Workspace>) -> Json<InvoiceFilters> {
    ws.store.dispatch(AppAction::ResetInvoiceFilters).await;
    Json(ws.store.read(|s| s.invoice_filters.clone()).await)
}

/// Looks the invoice up in the workspace's store, falling back to the
/// backend.
///
/// Invoices of another company answer `404`, the same as missing ones.
pub(crate) async fn find_invoice(state: &AppState, ws: &Workspace, id: i64) -> Result<Invoice, StatusCode> {
    if let Some(invoice) = ws.store.invoice(id).await {
        return Ok(invoice);
    }

    let invoice = state.api.get_invoice(id).await.map_err(|e| {
        error!("Fetching invoice {} failed: {}", id, e);
        api_status(&e)
    })?;

    if invoice.company_phone != ws.company_phone {
        warn!("Invoice {} does not belong to company {}", id, ws.company_phone);
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(invoice)
}
