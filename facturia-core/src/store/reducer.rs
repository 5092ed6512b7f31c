use crate::store::actions::AppAction;
use crate::store::state::{DashboardState, InvoiceFilters, PerResource, SupplierFilters};

/// Applies `action` to `state`.
///
/// Pure: no clocks, no I/O. Anything time-dependent arrives inside the action.
pub fn reduce(state: &mut DashboardState, action: AppAction) {
    match action {
        AppAction::SetUser(user) => {
            state.is_authenticated = user.is_some();
            state.user = user;
        }
        AppAction::Logout => {
            *state = DashboardState::default();
        }

        AppAction::SetInvoices(invoices) => state.invoices = invoices,
        AppAction::AddInvoice(invoice) => state.invoices.insert(0, invoice),
        AppAction::UpdateInvoice { id, changes } => {
            if let Some(invoice) = state.invoices.iter_mut().find(|inv| inv.id == id) {
                invoice.apply(&changes);
            }
        }
        AppAction::DeleteInvoice(id) => state.invoices.retain(|inv| inv.id != id),

        AppAction::SetSuppliers(suppliers) => state.suppliers = suppliers,
        AppAction::AddSupplier(supplier) => state.suppliers.insert(0, supplier),
        AppAction::UpdateSupplier { id, changes } => {
            if let Some(supplier) = state.suppliers.iter_mut().find(|s| s.id == id) {
                supplier.apply(&changes);
            }
        }
        AppAction::DeleteSupplier(id) => state.suppliers.retain(|s| s.id != id),

        AppAction::SetDashboardData(data) => state.dashboard = Some(data),

        AppAction::AddNotification(notification) => state.notifications.insert(0, notification),
        AppAction::RemoveNotification(id) => state.notifications.retain(|n| n.id != id),
        AppAction::MarkNotificationRead(id) => {
            if let Some(n) = state.notifications.iter_mut().find(|n| n.id == id) {
                n.read = true;
            }
        }
        AppAction::ClearNotifications => state.notifications.clear(),
        AppAction::ExpireNotifications { before } => {
            state.notifications.retain(|n| n.read || n.timestamp >= before);
        }

        AppAction::SetInvoiceFilters(patch) => state.invoice_filters.merge(patch),
        AppAction::ResetInvoiceFilters => state.invoice_filters = InvoiceFilters::default(),
        AppAction::SetSupplierFilters(patch) => state.supplier_filters.merge(patch),
        AppAction::ResetSupplierFilters => state.supplier_filters = SupplierFilters::default(),

        AppAction::SetLoading { resource, value } => state.loading.set(resource, value),
        AppAction::SetError { resource, message } => state.errors.set(resource, message),
        AppAction::ClearErrors => state.errors = PerResource::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::fixtures::invoice;
    use crate::models::{InvoiceChanges, InvoiceStatus, Notification, QueuedNotification, Role, User};
    use crate::store::state::{InvoiceFilterPatch, Resource, StatusFilter};
    use chrono::{Duration, Utc};

    fn operator() -> User {
        User {
            id: "1".to_string(),
            name: "Mi Empresa SL".to_string(),
            email: "admin@miempresa.com".to_string(),
            company_name: "Mi Empresa SL".to_string(),
            company_phone: "+34644451595".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_add_invoice_prepends() {
        let mut state = DashboardState::default();
        reduce(&mut state, AppAction::SetInvoices(vec![invoice(1, InvoiceStatus::Pending)]));
        reduce(&mut state, AppAction::AddInvoice(invoice(2, InvoiceStatus::Pending)));

        let ids: Vec<i64> = state.invoices.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_update_invoice_touches_only_matching_id() {
        let mut state = DashboardState::default();
        reduce(
            &mut state,
            AppAction::SetInvoices(vec![
                invoice(1, InvoiceStatus::Pending),
                invoice(2, InvoiceStatus::Pending),
            ]),
        );
        reduce(
            &mut state,
            AppAction::UpdateInvoice {
                id: 2,
                changes: InvoiceChanges::status_change(InvoiceStatus::Paid, Utc::now()),
            },
        );

        assert_eq!(state.invoice(1).map(|i| i.status), Some(InvoiceStatus::Pending));
        assert_eq!(state.invoice(2).map(|i| i.status), Some(InvoiceStatus::Paid));
    }

    #[test]
    fn test_update_unknown_invoice_is_ignored() {
        let mut state = DashboardState::default();
        reduce(&mut state, AppAction::SetInvoices(vec![invoice(1, InvoiceStatus::Pending)]));
        let before = state.clone();
        reduce(
            &mut state,
            AppAction::UpdateInvoice {
                id: 99,
                changes: InvoiceChanges::status_change(InvoiceStatus::Paid, Utc::now()),
            },
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_logout_resets_everything() {
        let mut state = DashboardState::default();
        reduce(&mut state, AppAction::SetUser(Some(operator())));
        reduce(&mut state, AppAction::SetInvoices(vec![invoice(1, InvoiceStatus::Pending)]));
        assert!(state.is_authenticated);

        reduce(&mut state, AppAction::Logout);
        assert_eq!(state, DashboardState::default());
    }

    #[test]
    fn test_expire_keeps_read_and_recent_notifications() {
        let now = Utc::now();
        let mut old_unread = QueuedNotification::new(Notification::info("a", "a"), now - Duration::seconds(10));
        old_unread.read = false;
        let mut old_read = QueuedNotification::new(Notification::info("b", "b"), now - Duration::seconds(10));
        old_read.read = true;
        let fresh = QueuedNotification::new(Notification::info("c", "c"), now);

        let mut state = DashboardState::default();
        for n in [old_unread.clone(), old_read.clone(), fresh.clone()] {
            reduce(&mut state, AppAction::AddNotification(n));
        }
        reduce(
            &mut state,
            AppAction::ExpireNotifications {
                before: now - Duration::seconds(5),
            },
        );

        let ids: Vec<_> = state.notifications.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![fresh.id, old_read.id]);
    }

    #[test]
    fn test_filters_merge_and_reset() {
        let mut state = DashboardState::default();
        reduce(
            &mut state,
            AppAction::SetInvoiceFilters(InvoiceFilterPatch {
                status: Some(StatusFilter::Paid),
                ..InvoiceFilterPatch::default()
            }),
        );
        reduce(
            &mut state,
            AppAction::SetInvoiceFilters(InvoiceFilterPatch {
                search_term: Some("acme".to_string()),
                ..InvoiceFilterPatch::default()
            }),
        );
        assert_eq!(state.invoice_filters.status, StatusFilter::Paid);
        assert_eq!(state.invoice_filters.search_term, "acme");

        reduce(&mut state, AppAction::ResetInvoiceFilters);
        assert_eq!(state.invoice_filters, InvoiceFilters::default());
    }

    #[test]
    fn test_loading_and_error_slots() {
        let mut state = DashboardState::default();
        reduce(&mut state, AppAction::SetLoading { resource: Resource::Suppliers, value: true });
        reduce(
            &mut state,
            AppAction::SetError {
                resource: Resource::Dashboard,
                message: Some("boom".to_string()),
            },
        );
        assert!(state.loading.suppliers);
        assert!(!state.loading.invoices);
        assert_eq!(state.errors.dashboard.as_deref(), Some("boom"));

        reduce(&mut state, AppAction::ClearErrors);
        assert_eq!(state.errors, PerResource::default());
    }
}
