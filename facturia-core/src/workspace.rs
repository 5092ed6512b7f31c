//! Per-company dashboard state.
//!
//! Every company gets its own [`Store`], [`StatusChanger`] and notification
//! sweeper, so operators only ever see and change their own company's data.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

use crate::api::InvoiceApi;
use crate::store::{NotificationSweeper, Store};
use crate::workflow::StatusChanger;

/// Store and status workflow of one company.
#[derive(Clone)]
pub struct Workspace {
    /// Company the workspace belongs to
    pub company_phone: String,
    pub store: Store,
    pub changer: StatusChanger,
    sweeper: Arc<NotificationSweeper>,
}

/// Registry of workspaces keyed by company phone.
#[derive(Clone)]
pub struct Workspaces {
    api: Arc<dyn InvoiceApi>,
    notification_ttl: Duration,
    sweep_interval: Duration,
    by_company: Arc<RwLock<HashMap<String, Workspace>>>,
}

impl Workspaces {
    /// Creates an empty registry.
    ///
    /// # Arguments
    ///
    /// * `api` - Backend the status workflow of every workspace talks to
    /// * `notification_ttl` - Age after which unread notifications are dropped
    /// * `sweep_interval` - Delay between notification sweeps
    pub fn new(api: Arc<dyn InvoiceApi>, notification_ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            api,
            notification_ttl,
            sweep_interval,
            by_company: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Workspace of `company_phone`, created on first use.
    ///
    /// Creating a workspace spawns its notification sweeper, so this must be
    /// called from within a tokio runtime.
    pub async fn get(&self, company_phone: &str) -> Workspace {
        {
            let by_company = self.by_company.read().await;
            if let Some(workspace) = by_company.get(company_phone) {
                return workspace.clone();
            }
        }

        let mut by_company = self.by_company.write().await;
        by_company
            .entry(company_phone.to_string())
            .or_insert_with(|| self.create(company_phone))
            .clone()
    }

    /// Workspace of `company_phone` if one was already created.
    pub async fn existing(&self, company_phone: &str) -> Option<Workspace> {
        self.by_company.read().await.get(company_phone).cloned()
    }

    /// Stops the notification sweeper of every workspace.
    pub async fn stop(&self) {
        let by_company = self.by_company.read().await;
        for workspace in by_company.values() {
            workspace.sweeper.stop().await;
        }
    }

    fn create(&self, company_phone: &str) -> Workspace {
        let store = Store::new();
        let changer = StatusChanger::new(self.api.clone(), store.clone());
        let sweeper = Arc::new(NotificationSweeper::new(
            store.clone(),
            self.notification_ttl,
            self.sweep_interval,
        ));

        let task = Arc::clone(&sweeper);
        tokio::spawn(async move { task.start().await });

        info!("Created workspace for company {}", company_phone);
        Workspace {
            company_phone: company_phone.to_string(),
            store,
            changer,
            sweeper,
        }
    }
}
