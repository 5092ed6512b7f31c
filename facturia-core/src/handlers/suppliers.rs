use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde_json::Value;
use tracing::error;

use crate::api::{Page, SupplierApi, SupplierQuery, TopSuppliersQuery};
use crate::handlers::api_status;
use crate::models::Supplier;
use crate::routes::AppState;
use crate::store::state::{SupplierFilterPatch, SupplierFilters};
use crate::store::{loaders, AppAction};
use crate::workspace::Workspace;

/// Fetches the company's suppliers.
///
/// Sort order and search default to the store's supplier filters when the
/// query leaves them out.
pub async fn list(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Query(mut query): Query<SupplierQuery>,
) -> Result<Json<Page<Supplier>>, StatusCode> {
    let filters = ws.store.read(|s| s.supplier_filters.clone()).await;
    query.company_phone = ws.company_phone.clone();
    query.sort_by.get_or_insert(filters.sort_by);
    query.sort_order.get_or_insert(filters.sort_order);
    if query.search.is_none() && !filters.search_term.is_empty() {
        query.search = Some(filters.search_term);
    }

    let page = loaders::load_suppliers(&ws.store, state.api.as_ref(), &query)
        .await
        .map_err(|e| {
            error!("Listing suppliers failed: {}", e);
            api_status(&e)
        })?;

    Ok(Json(page))
}

pub async fn top(
    State(state): State<AppState>,
    Extension(ws): Extension<Workspace>,
    Query(mut query): Query<TopSuppliersQuery>,
) -> Result<Json<Value>, StatusCode> {
    query.company_phone = ws.company_phone.clone();

    state.api.top_suppliers(&query).await.map(Json).map_err(|e| {
        error!("Top suppliers failed: {}", e);
        api_status(&e)
    })
}

pub async fn set_filters(
    Extension(ws): Extension<Workspace>,
    Json(patch): Json<SupplierFilterPatch>,
) -> Json<SupplierFilters> {
    ws.store.dispatch(AppAction::SetSupplierFilters(patch)).await;
    Json(ws.store.read(|s| s.supplier_filters.clone()).await)
}

pub async fn reset_filters(Extension(ws): Extension<Workspace>) -> Json<SupplierFilters> {
    ws.store.dispatch(AppAction::ResetSupplierFilters).await;
    Json(ws.store.read(|s| s.supplier_filters.clone()).await)
}
