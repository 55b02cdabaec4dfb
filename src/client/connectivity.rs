//! Connectivity monitoring.
//!
//! A background task probes the backend on a fixed period and publishes the
//! result on a watch channel. The task belongs to the [`ConnectivityMonitor`]
//! and is aborted when the monitor is dropped.

use crate::client::api::ApiClient;
use crate::client::notice::Notice;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default period between probes
pub const PROBE_INTERVAL: Duration = Duration::from_secs(15);

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub const OFFLINE_MESSAGE: &str =
    "No Internet Connection. Please check your internet connection and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    /// No probe has finished yet
    Unknown,
    Online,
    /// The server answered, but with a server error
    Limited,
    Offline,
}

impl NetworkStatus {
    pub fn is_offline(self) -> bool {
        self == Self::Offline
    }
}

/// One reachability check
pub trait Probe: Send + Sync + 'static {
    fn check(&self) -> impl Future<Output = NetworkStatus> + Send;
}

/// Probe that sends a HEAD request. Any HTTP answer below 500 counts as online.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Probe for HttpProbe {
    async fn check(&self) -> NetworkStatus {
        match self.client.head(&self.url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) if response.status().is_server_error() => NetworkStatus::Limited,
            Ok(_) => NetworkStatus::Online,
            Err(err) => {
                tracing::debug!(error = %err, "connectivity probe failed");
                NetworkStatus::Offline
            }
        }
    }
}

pub struct ConnectivityMonitor {
    status: watch::Receiver<NetworkStatus>,
    retry: Arc<Notify>,
    task: JoinHandle<()>,
}

impl ConnectivityMonitor {
    /// Start probing immediately, then every `every`
    pub fn spawn<P: Probe>(probe: P, every: Duration) -> Self {
        let (tx, rx) = watch::channel(NetworkStatus::Unknown);
        let retry = Arc::new(Notify::new());
        let wake = Arc::clone(&retry);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = wake.notified() => ticker.reset(),
                }
                let status = probe.check().await;
                let changed = tx.send_if_modified(|current| {
                    let changed = *current != status;
                    *current = status;
                    changed
                });
                if changed {
                    tracing::info!(?status, "network status changed");
                }
            }
        });

        Self {
            status: rx,
            retry,
            task,
        }
    }

    /// Probe the API base URL
    pub fn for_api(api: &ApiClient) -> Self {
        Self::spawn(HttpProbe::new(api.config().server_url()), PROBE_INTERVAL)
    }

    pub fn status(&self) -> NetworkStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.status.clone()
    }

    /// Probe now instead of waiting for the next period
    pub fn retry(&self) {
        self.retry.notify_one();
    }

    /// Blocking notice while offline
    pub fn notice(&self) -> Option<Notice> {
        self.status()
            .is_offline()
            .then(|| Notice::blocking(OFFLINE_MESSAGE))
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
