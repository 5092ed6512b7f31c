use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::api::InvoiceApi;
use crate::models::{Invoice, InvoiceChanges, InvoiceStatus, Notification};
use crate::store::{AppAction, Store};
use crate::workflow::error::WorkflowError;
use crate::workflow::state_machine::{status_options, suggestion, QuickAction, StatusOption};

/// Confirmation dialog for a pending status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDialog {
    pub invoice_id: i64,
    pub supplier_name: String,
    pub description: Option<String>,
    pub formatted_amount: String,
    pub current: InvoiceStatus,
    /// Proposed status, if one has been picked
    pub selected: Option<InvoiceStatus>,
    pub options: Vec<StatusOption>,
    /// A request for this invoice is waiting on the backend
    pub in_flight: bool,
    /// Whether the confirm control is enabled
    pub can_confirm: bool,
}

/// Result of a committed status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub invoice_id: i64,
    pub from: InvoiceStatus,
    pub to: InvoiceStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Per-invoice dialog state.
#[derive(Debug, Clone)]
struct Session {
    invoice: Invoice,
    selected: Option<InvoiceStatus>,
    in_flight: bool,
    /// Cleared when the operator dismisses the dialog mid-request
    open: bool,
}

impl Session {
    fn dialog(&self) -> TransitionDialog {
        let current = self.invoice.status;
        TransitionDialog {
            invoice_id: self.invoice.id,
            supplier_name: self.invoice.supplier_name.clone(),
            description: self.invoice.description.clone(),
            formatted_amount: self.invoice.formatted_amount(),
            current,
            selected: self.selected,
            options: status_options(current),
            in_flight: self.in_flight,
            can_confirm: !self.in_flight && self.selected.is_some_and(|s| s != current),
        }
    }
}

/// Drives status changes for invoices shown on the dashboard.
///
/// A change goes through three steps: request (opens the dialog with a
/// proposed status), confirm (calls the backend) and completion (updates
/// the cached invoice, emits a notification and closes the dialog). At most
/// one request per invoice is in flight at a time.
///
/// The store and the backend client are passed in explicitly; clones share
/// the same sessions.
#[derive(Clone)]
pub struct StatusChanger {
    api: Arc<dyn InvoiceApi>,
    store: Store,
    sessions: Arc<Mutex<HashMap<i64, Session>>>,
}

impl StatusChanger {
    /// Creates a changer with no open dialogs.
    ///
    /// # Arguments
    ///
    /// * `api` - Backend used for `PATCH /invoices/{id}/status`
    /// * `store` - Store whose cached invoices and notifications are updated
    ///
    /// # Returns
    ///
    /// A changer; clones share the same dialogs and in-flight guards.
    pub fn new(api: Arc<dyn InvoiceApi>, store: Store) -> Self {
        Self {
            api,
            store,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Quick action for `invoice`, absent once it is paid.
    pub fn suggestion(&self, invoice: &Invoice) -> Option<QuickAction> {
        suggestion(invoice.status)
    }

    /// Proposes moving `invoice` to `target` and opens the confirmation dialog.
    ///
    /// Asking for the status the invoice already has is a no-op: no dialog,
    /// no state change, `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `WorkflowError::InFlight` if a change for this invoice is still pending.
    pub async fn request_transition(
        &self,
        invoice: &Invoice,
        target: InvoiceStatus,
    ) -> Result<Option<TransitionDialog>, WorkflowError> {
        if target == invoice.status {
            debug!("Ignoring no-op transition for invoice {} ({})", invoice.id, target);
            return Ok(None);
        }

        let mut sessions = self.sessions.lock().await;
        if sessions.get(&invoice.id).is_some_and(|s| s.in_flight) {
            warn!("Transition requested while invoice {} is in flight", invoice.id);
            return Err(WorkflowError::InFlight(invoice.id));
        }

        let session = Session {
            invoice: invoice.clone(),
            selected: Some(target),
            in_flight: false,
            open: true,
        };
        let dialog = session.dialog();
        sessions.insert(invoice.id, session);

        info!("Invoice {}: {} -> {} requested", invoice.id, invoice.status, target);
        Ok(Some(dialog))
    }

    /// Opens the dialog with nothing selected, for picking any status.
    pub async fn open_picker(&self, invoice: &Invoice) -> Result<TransitionDialog, WorkflowError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(&invoice.id).is_some_and(|s| s.in_flight) {
            return Err(WorkflowError::InFlight(invoice.id));
        }

        let session = Session {
            invoice: invoice.clone(),
            selected: None,
            in_flight: false,
            open: true,
        };
        let dialog = session.dialog();
        sessions.insert(invoice.id, session);
        Ok(dialog)
    }

    /// Changes the proposed status of an open dialog.
    ///
    /// The current status is disabled in the picker, so selecting it is
    /// rejected.
    pub async fn select_status(
        &self,
        invoice_id: i64,
        status: InvoiceStatus,
    ) -> Result<TransitionDialog, WorkflowError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&invoice_id)
            .filter(|s| s.open)
            .ok_or(WorkflowError::NotRequested(invoice_id))?;

        if session.in_flight {
            return Err(WorkflowError::InFlight(invoice_id));
        }
        if status == session.invoice.status {
            return Err(WorkflowError::NoOpTransition {
                id: invoice_id,
                status,
            });
        }

        session.selected = Some(status);
        Ok(session.dialog())
    }

    /// The open dialog for `invoice_id`, if any.
    pub async fn dialog(&self, invoice_id: i64) -> Option<TransitionDialog> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&invoice_id)
            .filter(|s| s.open)
            .map(Session::dialog)
    }

    /// Closes the dialog. Returns whether one was open.
    ///
    /// A request already in flight is not cancelled: it completes normally
    /// and keeps the in-flight guard until then.
    pub async fn dismiss(&self, invoice_id: i64) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(&invoice_id) {
            Some(session) if session.in_flight => {
                let was_open = session.open;
                session.open = false;
                was_open
            }
            Some(_) => sessions.remove(&invoice_id).is_some(),
            None => false,
        }
    }

    /// Confirms the open dialog's selection.
    pub async fn confirm(&self, invoice_id: i64) -> Result<TransitionOutcome, WorkflowError> {
        let selected = {
            let sessions = self.sessions.lock().await;
            sessions
                .get(&invoice_id)
                .filter(|s| s.open)
                .and_then(|s| s.selected)
        };
        match selected {
            Some(status) => self.apply_transition(invoice_id, status).await,
            None => Err(WorkflowError::NotRequested(invoice_id)),
        }
    }

    /// Sends the status change to the backend and records the outcome.
    ///
    /// The current status is re-read from the store, so an edit made while
    /// the dialog was open is taken into account. On success the cached
    /// invoice takes the backend's record (keeping the local `confirmed_at`
    /// stamp when the backend sends none) and a success notification is
    /// queued. On failure an error notification is queued and the cache is
    /// left untouched. Either way the dialog closes.
    ///
    /// The backend call and its completion run on their own task: dropping
    /// the returned future does not cancel them and does not leave the
    /// invoice locked.
    ///
    /// # Errors
    ///
    /// - `NotRequested` if no dialog proposes `new_status` for this invoice
    /// - `NoOpTransition` if `new_status` is already the current status
    /// - `InFlight` if a request for this invoice is still pending
    /// - `Remote` if the backend call failed
    /// - `Interrupted` if the completion task died before finishing
    pub async fn apply_transition(
        &self,
        invoice_id: i64,
        new_status: InvoiceStatus,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let cached = self.store.invoice(invoice_id).await;

        let from = {
            let mut sessions = self.sessions.lock().await;
            let session = sessions
                .get_mut(&invoice_id)
                .filter(|s| s.selected == Some(new_status))
                .ok_or(WorkflowError::NotRequested(invoice_id))?;

            if let Some(cached) = cached {
                session.invoice = cached;
            }
            if session.invoice.status == new_status {
                warn!("Invoice {} is already {}, nothing to apply", invoice_id, new_status);
                return Err(WorkflowError::NoOpTransition {
                    id: invoice_id,
                    status: new_status,
                });
            }
            if session.in_flight {
                warn!("Duplicate status update for invoice {} rejected", invoice_id);
                return Err(WorkflowError::InFlight(invoice_id));
            }

            session.in_flight = true;
            session.invoice.status
        };

        info!("Invoice {}: {} -> {} (updating)", invoice_id, from, new_status);
        let changer = self.clone();
        let task = tokio::spawn(async move { changer.complete(invoice_id, from, new_status).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Status update task for invoice {} died: {}", invoice_id, e);
                self.sessions.lock().await.remove(&invoice_id);
                Err(WorkflowError::Interrupted(invoice_id))
            }
        }
    }

    /// Calls the backend, records the outcome and releases the session.
    async fn complete(
        &self,
        invoice_id: i64,
        from: InvoiceStatus,
        new_status: InvoiceStatus,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let outcome = match self.api.update_status(invoice_id, new_status).await {
            Ok(updated) => {
                let local = InvoiceChanges::status_change(new_status, Utc::now());
                let mut changes = InvoiceChanges::from(updated);
                changes.status = Some(new_status);
                if changes.confirmed_at.is_none() {
                    changes.confirmed_at = local.confirmed_at;
                }
                let confirmed_at = changes.confirmed_at;
                self.store
                    .dispatch(AppAction::UpdateInvoice {
                        id: invoice_id,
                        changes,
                    })
                    .await;
                self.store
                    .notify(Notification::success(
                        "Status updated",
                        format!(
                            "The invoice is now \"{}\"",
                            new_status.label().to_lowercase()
                        ),
                    ))
                    .await;

                info!("Invoice {}: {} -> {} committed", invoice_id, from, new_status);
                Ok(TransitionOutcome {
                    invoice_id,
                    from,
                    to: new_status,
                    confirmed_at,
                })
            }
            Err(e) => {
                error!("Status update for invoice {} failed: {}", invoice_id, e);
                self.store
                    .notify(Notification::error(
                        "Error",
                        "Could not update the invoice status",
                    ))
                    .await;
                Err(WorkflowError::Remote(e))
            }
        };

        // Closing an already dismissed dialog is a no-op.
        self.sessions.lock().await.remove(&invoice_id);

        outcome
    }
}
