use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::store::{AppAction, Store};

/// Background task that drops stale notifications.
///
/// Unread notifications older than `ttl` are removed on every tick; read
/// ones stay until the operator removes them.
pub struct NotificationSweeper {
    store: Store,

    /// Age after which an unread notification is dropped
    ttl: Duration,

    /// Delay between sweeps
    interval: Duration,

    /// Whether the sweeper is running (wrapped in Arc for sharing)
    running: Arc<RwLock<bool>>,
}

impl NotificationSweeper {
    /// Creates a stopped sweeper for `store`.
    ///
    /// # Arguments
    ///
    /// * `store` - Store whose notification queue is swept
    /// * `ttl` - Age after which an unread notification is dropped
    /// * `interval` - Delay between sweeps
    ///
    /// # Returns
    ///
    /// A sweeper that does nothing until [`NotificationSweeper::start`] runs.
    pub fn new(store: Store, ttl: Duration, interval: Duration) -> Self {
        Self {
            store,
            ttl,
            interval,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Runs until [`stop`](Self::stop) is called.
    pub async fn start(&self) {
        *self.running.write().await = true;
        info!(
            "NotificationSweeper started (ttl: {:?}, interval: {:?})",
            self.ttl, self.interval
        );

        while *self.running.read().await {
            let removed = self.sweep_once(Utc::now()).await;
            if removed > 0 {
                debug!("Expired {} notification(s)", removed);
            }
            sleep(self.interval).await;
        }

        info!("NotificationSweeper stopped");
    }

    /// Sets the running flag to false; the loop exits after the current tick.
    pub async fn stop(&self) {
        info!("Stopping NotificationSweeper...");
        *self.running.write().await = false;
    }

    /// Removes notifications that are stale at `now`. Returns how many went.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> usize {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::zero());
        let before = self.store.read(|s| s.notifications.len()).await;
        self.store
            .dispatch(AppAction::ExpireNotifications { before: now - ttl })
            .await;
        let after = self.store.read(|s| s.notifications.len()).await;
        before.saturating_sub(after)
    }
}
