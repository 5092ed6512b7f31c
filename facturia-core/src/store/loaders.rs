//! Fetch and mutate remote data while keeping the store's loading flags,
//! error slots and notifications in step.

use tracing::{error, info};

use crate::api::{
    AnalyticsApi, ApiError, DashboardQuery, InvoiceApi, InvoiceQuery, Page, SupplierApi, SupplierQuery,
};
use crate::models::{DashboardData, Invoice, InvoiceChanges, NewInvoice, Notification, Supplier};
use crate::store::{AppAction, Resource, Store};

/// Toggles the loading flag and error slot of `resource` around `fetch`.
async fn tracked<T, F>(store: &Store, resource: Resource, fetch: F) -> Result<T, ApiError>
where
    F: std::future::Future<Output = Result<T, ApiError>>,
{
    store.dispatch(AppAction::SetLoading { resource, value: true }).await;
    store.dispatch(AppAction::SetError { resource, message: None }).await;

    let result = fetch.await;

    if let Err(e) = &result {
        error!("Loading {:?} failed: {}", resource, e);
        store
            .dispatch(AppAction::SetError {
                resource,
                message: Some(e.user_message()),
            })
            .await;
    }
    store.dispatch(AppAction::SetLoading { resource, value: false }).await;

    result
}

pub async fn load_invoices<A: InvoiceApi + ?Sized>(
    store: &Store,
    api: &A,
    query: &InvoiceQuery,
) -> Result<Page<Invoice>, ApiError> {
    let page = tracked(store, Resource::Invoices, api.list_invoices(query)).await?;
    info!("Loaded {} invoice(s)", page.items.len());
    store.dispatch(AppAction::SetInvoices(page.items.clone())).await;
    Ok(page)
}

pub async fn load_suppliers<A: SupplierApi + ?Sized>(
    store: &Store,
    api: &A,
    query: &SupplierQuery,
) -> Result<Page<Supplier>, ApiError> {
    let page = tracked(store, Resource::Suppliers, api.list_suppliers(query)).await?;
    info!("Loaded {} supplier(s)", page.items.len());
    store.dispatch(AppAction::SetSuppliers(page.items.clone())).await;
    Ok(page)
}

pub async fn load_dashboard<A: AnalyticsApi + ?Sized>(
    store: &Store,
    api: &A,
    query: &DashboardQuery,
) -> Result<DashboardData, ApiError> {
    let data = tracked(store, Resource::Dashboard, api.dashboard(query)).await?;
    store.dispatch(AppAction::SetDashboardData(data.clone())).await;
    Ok(data)
}

pub async fn create_invoice<A: InvoiceApi + ?Sized>(store: &Store, api: &A, invoice: &NewInvoice) -> Result<Invoice, ApiError> {
    match api.create_invoice(invoice).await {
        Ok(created) => {
            info!("Created invoice {}", created.id);
            store.dispatch(AppAction::AddInvoice(created.clone())).await;
            store
                .notify(Notification::success("Invoice created", "The invoice was created successfully"))
                .await;
            Ok(created)
        }
        Err(e) => {
            error!("Creating invoice failed: {}", e);
            store.notify(Notification::error("Error", e.user_message())).await;
            Err(e)
        }
    }
}

pub async fn update_invoice<A: InvoiceApi + ?Sized>(
    store: &Store,
    api: &A,
    id: i64,
    changes: &InvoiceChanges,
) -> Result<Invoice, ApiError> {
    match api.update_invoice(id, changes).await {
        Ok(updated) => {
            info!("Updated invoice {}", id);
            store
                .dispatch(AppAction::UpdateInvoice {
                    id,
                    changes: InvoiceChanges::from(updated.clone()),
                })
                .await;
            store
                .notify(Notification::success("Invoice updated", "The invoice was updated successfully"))
                .await;
            Ok(updated)
        }
        Err(e) => {
            error!("Updating invoice {} failed: {}", id, e);
            store.notify(Notification::error("Error", e.user_message())).await;
            Err(e)
        }
    }
}

pub async fn delete_invoice<A: InvoiceApi + ?Sized>(store: &Store, api: &A, id: i64) -> Result<(), ApiError> {
    match api.delete_invoice(id).await {
        Ok(_) => {
            info!("Deleted invoice {}", id);
            store.dispatch(AppAction::DeleteInvoice(id)).await;
            store
                .notify(Notification::success("Invoice deleted", "The invoice was deleted successfully"))
                .await;
            Ok(())
        }
        Err(e) => {
            error!("Deleting invoice {} failed: {}", id, e);
            store.notify(Notification::error("Error", e.user_message())).await;
            Err(e)
        }
    }
}

/// Deletes several invoices, continuing past individual failures.
///
/// Returns the ids that were deleted.
pub async fn delete_invoices<A: InvoiceApi + ?Sized>(store: &Store, api: &A, ids: &[i64]) -> Vec<i64> {
    if ids.is_empty() {
        return Vec::new();
    }
    store
        .notify(Notification::info(
            "Deleting invoices",
            format!("Deleting {} invoices...", ids.len()),
        ))
        .await;

    let mut deleted = Vec::with_capacity(ids.len());
    for &id in ids {
        if delete_invoice(store, api, id).await.is_ok() {
            deleted.push(id);
        }
    }
    deleted
}
