use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{DashboardData, Invoice, InvoiceChanges, QueuedNotification, Supplier, SupplierChanges, User};
use crate::store::state::{InvoiceFilterPatch, Resource, SupplierFilterPatch};

/// Every state change the store accepts.
#[derive(Debug, Clone)]
pub enum AppAction {
    SetUser(Option<User>),
    Logout,

    SetInvoices(Vec<Invoice>),
    /// Prepends to the cached list
    AddInvoice(Invoice),
    UpdateInvoice { id: i64, changes: InvoiceChanges },
    DeleteInvoice(i64),

    SetSuppliers(Vec<Supplier>),
    AddSupplier(Supplier),
    UpdateSupplier { id: i64, changes: SupplierChanges },
    DeleteSupplier(i64),

    SetDashboardData(DashboardData),

    AddNotification(QueuedNotification),
    RemoveNotification(Uuid),
    MarkNotificationRead(Uuid),
    ClearNotifications,
    /// Drops unread notifications stamped before the cutoff
    ExpireNotifications { before: DateTime<Utc> },

    SetInvoiceFilters(InvoiceFilterPatch),
    ResetInvoiceFilters,
    SetSupplierFilters(SupplierFilterPatch),
    ResetSupplierFilters,

    SetLoading { resource: Resource, value: bool },
    SetError { resource: Resource, message: Option<String> },
    ClearErrors,
}
