use std::sync::Arc;
use std::time::Duration;

use crate::models::invoice::fixtures::invoice;
use crate::models::{Invoice, InvoiceChanges, InvoiceStatus, NotificationKind};
use crate::store::{loaders, AppAction, Store};
use crate::testing::FakeBackend;
use crate::workflow::{StatusChanger, WorkflowError};

/// Store seeded with `invoices` and a changer talking to `api`.
async fn setup(api: FakeBackend, invoices: Vec<Invoice>) -> (StatusChanger, Store, Arc<FakeBackend>) {
    let store = Store::new();
    store.dispatch(AppAction::SetInvoices(invoices)).await;
    let api = Arc::new(api);
    let changer = StatusChanger::new(api.clone(), store.clone());
    (changer, store, api)
}

#[tokio::test]
async fn test_pending_to_confirmed_stamps_confirmed_at() {
    let inv = invoice(1, InvoiceStatus::Pending);
    let (changer, store, _api) = setup(FakeBackend::with_invoices(vec![inv.clone()]), vec![inv.clone()]).await;

    let dialog = changer
        .request_transition(&inv, InvoiceStatus::Confirmed)
        .await
        .unwrap()
        .expect("dialog should open");
    assert_eq!(dialog.supplier_name, "Acme Supplies");
    assert_eq!(dialog.formatted_amount, "1250.50 EUR");
    assert!(dialog.can_confirm);

    let outcome = changer.confirm(1).await.unwrap();
    assert_eq!(outcome.from, InvoiceStatus::Pending);
    assert_eq!(outcome.to, InvoiceStatus::Confirmed);

    let cached = store.invoice(1).await.unwrap();
    assert_eq!(cached.status, InvoiceStatus::Confirmed);
    assert!(cached.confirmed_at.is_some());
    assert_eq!(cached.confirmed_at, outcome.confirmed_at);

    let state = store.snapshot().await;
    assert_eq!(state.notifications.len(), 1);
    assert_eq!(state.notifications[0].notification.kind, NotificationKind::Success);
    assert_eq!(state.notifications[0].notification.message, "The invoice is now \"confirmed\"");

    assert!(changer.dialog(1).await.is_none());
}

#[tokio::test]
async fn test_request_current_status_is_noop() {
    let inv = invoice(2, InvoiceStatus::Paid);
    let (changer, store, api) = setup(FakeBackend::with_invoices(vec![inv.clone()]), vec![inv.clone()]).await;
    let before = store.snapshot().await;

    let dialog = changer.request_transition(&inv, InvoiceStatus::Paid).await.unwrap();

    assert!(dialog.is_none());
    assert!(changer.dialog(2).await.is_none());
    assert_eq!(store.snapshot().await, before);
    assert_eq!(api.status_calls(), 0);
}

#[tokio::test]
async fn test_every_other_target_commits() {
    for from in InvoiceStatus::ALL {
        for to in InvoiceStatus::ALL.into_iter().filter(|s| *s != from) {
            let inv = invoice(5, from);
            let (changer, store, _api) =
                setup(FakeBackend::with_invoices(vec![inv.clone()]), vec![inv.clone()]).await;

            changer.request_transition(&inv, to).await.unwrap();
            changer.apply_transition(5, to).await.unwrap();

            let cached = store.invoice(5).await.unwrap();
            assert_eq!(cached.status, to, "{from} -> {to}");
            assert_eq!(cached.confirmed_at.is_some(), to == InvoiceStatus::Confirmed);
        }
    }
}

#[tokio::test]
async fn test_remote_failure_leaves_cache_unchanged() {
    let inv = invoice(3, InvoiceStatus::Pending);
    let (changer, store, _api) = setup(FakeBackend::failing(), vec![inv.clone()]).await;

    changer.request_transition(&inv, InvoiceStatus::Paid).await.unwrap();
    let err = changer.confirm(3).await.unwrap_err();

    assert!(matches!(err, WorkflowError::Remote(_)));
    let cached = store.invoice(3).await.unwrap();
    assert_eq!(cached.status, InvoiceStatus::Pending);
    assert!(cached.confirmed_at.is_none());

    let state = store.snapshot().await;
    assert_eq!(state.notifications.len(), 1);
    assert_eq!(state.notifications[0].notification.kind, NotificationKind::Error);
    assert!(changer.dialog(3).await.is_none());
}

#[tokio::test]
async fn test_duplicate_confirm_while_in_flight_is_rejected() {
    let inv = invoice(4, InvoiceStatus::Pending);
    let api = FakeBackend::with_invoices(vec![inv.clone()]).slow(Duration::from_millis(50));
    let (changer, store, api) = setup(api, vec![inv.clone()]).await;

    changer.request_transition(&inv, InvoiceStatus::Confirmed).await.unwrap();

    let (first, second) = tokio::join!(changer.confirm(4), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        changer.confirm(4).await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(WorkflowError::InFlight(4))));
    assert_eq!(api.status_calls(), 1);

    let state = store.snapshot().await;
    assert_eq!(state.notifications.len(), 1);

    // The request cycle is over; nothing is left to apply.
    assert!(matches!(
        changer.apply_transition(4, InvoiceStatus::Confirmed).await,
        Err(WorkflowError::NotRequested(4))
    ));
}

#[tokio::test]
async fn test_dialog_reports_in_flight_and_disables_confirm() {
    let inv = invoice(8, InvoiceStatus::Confirmed);
    let api = FakeBackend::with_invoices(vec![inv.clone()]).slow(Duration::from_millis(50));
    let (changer, _store, _api) = setup(api, vec![inv.clone()]).await;

    changer.request_transition(&inv, InvoiceStatus::Paid).await.unwrap();

    let (result, dialog) = tokio::join!(changer.confirm(8), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        changer.dialog(8).await
    });

    result.unwrap();
    let dialog = dialog.expect("dialog stays open while in flight");
    assert!(dialog.in_flight);
    assert!(!dialog.can_confirm);
}

#[tokio::test]
async fn test_dismiss_mid_flight_still_commits() {
    let inv = invoice(6, InvoiceStatus::Pending);
    let api = FakeBackend::with_invoices(vec![inv.clone()]).slow(Duration::from_millis(50));
    let (changer, store, _api) = setup(api, vec![inv.clone()]).await;

    changer.request_transition(&inv, InvoiceStatus::Confirmed).await.unwrap();

    let (result, dismissed) = tokio::join!(changer.confirm(6), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        changer.dismiss(6).await
    });

    assert!(dismissed);
    assert!(result.is_ok());
    assert!(changer.dialog(6).await.is_none());
    assert_eq!(store.invoice(6).await.unwrap().status, InvoiceStatus::Confirmed);
}

#[tokio::test]
async fn test_picker_selection_rejects_current_status() {
    let inv = invoice(7, InvoiceStatus::Paid);
    let (changer, store, _api) = setup(FakeBackend::with_invoices(vec![inv.clone()]), vec![inv.clone()]).await;

    let dialog = changer.open_picker(&inv).await.unwrap();
    assert!(dialog.selected.is_none());
    assert!(!dialog.can_confirm);
    assert!(dialog.options.iter().any(|o| o.value == InvoiceStatus::Paid && o.is_current));

    assert!(matches!(
        changer.select_status(7, InvoiceStatus::Paid).await,
        Err(WorkflowError::NoOpTransition { id: 7, .. })
    ));
    assert!(matches!(changer.confirm(7).await, Err(WorkflowError::NotRequested(7))));

    // Backward transitions are allowed through the picker.
    let dialog = changer.select_status(7, InvoiceStatus::Pending).await.unwrap();
    assert!(dialog.can_confirm);
    changer.confirm(7).await.unwrap();
    assert_eq!(store.invoice(7).await.unwrap().status, InvoiceStatus::Pending);
}

#[tokio::test]
async fn test_apply_without_request_is_rejected() {
    let inv = invoice(9, InvoiceStatus::Pending);
    let (changer, store, api) = setup(FakeBackend::with_invoices(vec![inv.clone()]), vec![inv.clone()]).await;

    let err = changer.apply_transition(9, InvoiceStatus::Paid).await.unwrap_err();

    assert!(matches!(err, WorkflowError::NotRequested(9)));
    assert_eq!(api.status_calls(), 0);
    assert!(store.snapshot().await.notifications.is_empty());
}

#[tokio::test]
async fn test_dismiss_without_request_closes_nothing() {
    let inv = invoice(10, InvoiceStatus::Pending);
    let (changer, _store, _api) = setup(FakeBackend::with_invoices(vec![inv.clone()]), vec![inv.clone()]).await;

    assert!(!changer.dismiss(10).await);

    changer.request_transition(&inv, InvoiceStatus::Paid).await.unwrap();
    assert!(changer.dismiss(10).await);
    assert!(changer.dialog(10).await.is_none());
}

#[tokio::test]
async fn test_cancelled_confirm_still_commits_and_releases_guard() {
    let inv = invoice(11, InvoiceStatus::Pending);
    let api = FakeBackend::with_invoices(vec![inv.clone()]).slow(Duration::from_millis(50));
    let (changer, store, api) = setup(api, vec![inv.clone()]).await;

    changer.request_transition(&inv, InvoiceStatus::Confirmed).await.unwrap();
    let dropped = tokio::time::timeout(Duration::from_millis(10), changer.confirm(11)).await;
    assert!(dropped.is_err());

    tokio::time::sleep(Duration::from_millis(200)).await;

    let cached = store.invoice(11).await.unwrap();
    assert_eq!(cached.status, InvoiceStatus::Confirmed);
    assert!(cached.confirmed_at.is_some());
    assert!(changer.dialog(11).await.is_none());
    assert_eq!(store.snapshot().await.notifications.len(), 1);

    // The invoice is not left locked.
    let dialog = changer.request_transition(&cached, InvoiceStatus::Paid).await.unwrap();
    assert!(dialog.is_some());
    assert!(changer.open_picker(&cached).await.is_ok());
    assert_eq!(api.status_calls(), 1);
}

#[tokio::test]
async fn test_edit_while_dialog_open_turns_confirm_into_noop() {
    let inv = invoice(12, InvoiceStatus::Pending);
    let (changer, store, api) = setup(FakeBackend::with_invoices(vec![inv.clone()]), vec![inv.clone()]).await;

    changer.request_transition(&inv, InvoiceStatus::Confirmed).await.unwrap();
    let edit = InvoiceChanges {
        status: Some(InvoiceStatus::Confirmed),
        ..InvoiceChanges::default()
    };
    loaders::update_invoice(&store, api.as_ref(), 12, &edit).await.unwrap();
    let notifications_before = store.snapshot().await.notifications.len();

    let err = changer.confirm(12).await.unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::NoOpTransition {
            id: 12,
            status: InvoiceStatus::Confirmed
        }
    ));
    assert_eq!(api.status_calls(), 0);
    assert!(store.invoice(12).await.unwrap().confirmed_at.is_none());
    assert_eq!(store.snapshot().await.notifications.len(), notifications_before);
}

#[tokio::test]
async fn test_outcome_starts_from_edited_status() {
    let inv = invoice(13, InvoiceStatus::Pending);
    let (changer, store, api) = setup(FakeBackend::with_invoices(vec![inv.clone()]), vec![inv.clone()]).await;

    changer.request_transition(&inv, InvoiceStatus::Paid).await.unwrap();
    let edit = InvoiceChanges {
        status: Some(InvoiceStatus::Confirmed),
        ..InvoiceChanges::default()
    };
    loaders::update_invoice(&store, api.as_ref(), 13, &edit).await.unwrap();

    let outcome = changer.confirm(13).await.unwrap();

    assert_eq!(outcome.from, InvoiceStatus::Confirmed);
    assert_eq!(outcome.to, InvoiceStatus::Paid);
}

#[tokio::test]
async fn test_commit_takes_backend_record() {
    let inv = invoice(14, InvoiceStatus::Pending);
    let (changer, store, api) = setup(FakeBackend::with_invoices(vec![inv.clone()]), vec![inv.clone()]).await;

    changer.request_transition(&inv, InvoiceStatus::Confirmed).await.unwrap();
    let outcome = changer.confirm(14).await.unwrap();

    let cached = store.invoice(14).await.unwrap();
    let backend = api.stored(14).unwrap();
    assert_eq!(cached.updated_at, backend.updated_at);
    assert!(cached.updated_at > inv.updated_at);
    // The backend sent no confirmation time, so the local stamp is kept.
    assert!(backend.confirmed_at.is_none());
    assert_eq!(cached.confirmed_at, outcome.confirmed_at);
    assert!(cached.confirmed_at.is_some());
}
