use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::remote::RemoteStore;

/// Current reachability of the remote store plus a change feed.
pub trait Connectivity: Send + Sync {
    fn is_connected(&self) -> bool;
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Watch-channel backed connectivity state. Subscribers only see actual changes.
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    pub fn new(initially_connected: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_connected);
        Self { tx }
    }

    /// Records the latest observation; returns true if the state flipped.
    pub fn set(&self, connected: bool) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        })
    }
}

impl Connectivity for ConnectivityMonitor {
    fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Pings the store every `every` and feeds the result into `monitor`.
pub fn spawn_probe(
    store: Arc<dyn RemoteStore>,
    monitor: Arc<ConnectivityMonitor>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let reachable = match store.ping().await {
                Ok(()) => true,
                Err(e) => {
                    debug!(error = %e, "store ping failed");
                    false
                }
            };
            if monitor.set(reachable) {
                if reachable {
                    info!("remote store reachable again");
                } else {
                    warn!("remote store unreachable; writes will be queued");
                }
            }
        }
    })
}
