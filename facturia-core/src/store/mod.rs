//! Dashboard state container.
//!
//! [`Store`] is a cloneable handle handed explicitly to whoever needs to read
//! or change dashboard state. Changes go through [`reduce`].

pub mod actions;
pub mod loaders;
pub mod reducer;
pub mod state;
pub mod sweeper;

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Invoice, Notification, QueuedNotification};

pub use actions::AppAction;
pub use reducer::reduce;
pub use state::{DashboardState, InvoiceSummary, Resource};
pub use sweeper::NotificationSweeper;

#[derive(Debug, Clone, Default)]
pub struct Store {
    state: Arc<RwLock<DashboardState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: DashboardState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn dispatch(&self, action: AppAction) {
        debug!("Dispatching {:?}", action);
        let mut state = self.state.write().await;
        reduce(&mut state, action);
    }

    /// Runs `f` against the current state under the read lock.
    pub async fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        let state = self.state.read().await;
        f(&state)
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn invoice(&self, id: i64) -> Option<Invoice> {
        self.read(|s| s.invoice(id).cloned()).await
    }

    /// Queues a notification stamped with the current time and returns its id.
    pub async fn notify(&self, notification: Notification) -> Uuid {
        let queued = QueuedNotification::new(notification, Utc::now());
        let id = queued.id;
        self.dispatch(AppAction::AddNotification(queued)).await;
        id
    }

    pub async fn filtered_invoices(&self) -> Vec<Invoice> {
        self.read(|s| s.filtered_invoices().into_iter().cloned().collect())
            .await
    }

    pub async fn invoice_summary(&self) -> InvoiceSummary {
        self.read(|s| InvoiceSummary::of(s.filtered_invoices())).await
    }
}
