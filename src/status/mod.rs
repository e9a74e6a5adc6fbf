//! Upstream server status heartbeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::{ServerStatus, StatusReport};
use crate::upstream::TransatClient;

/// Periodically probes the upstream `/status` endpoint.
pub struct StatusMonitor {
    client: TransatClient,
    interval: Duration,
    started_at: DateTime<Utc>,
    latest: RwLock<ServerStatus>,
    active: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl StatusMonitor {
    pub fn new(client: TransatClient, interval: Duration) -> Arc<Self> {
        let started_at = Utc::now();
        Arc::new(Self {
            client,
            interval,
            started_at,
            latest: RwLock::new(ServerStatus::offline(started_at)),
            active: AtomicBool::new(false),
            task: Mutex::new(None),
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn start(self: &Arc<Self>) {
        if self.active.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Starting server status monitor"
        );

        let monitor = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(monitor.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                monitor.check_now().await;
            }
        });

        match self.task.lock() {
            Ok(mut task) => *task = Some(handle),
            Err(poisoned) => *poisoned.into_inner() = Some(handle),
        }
    }

    pub fn stop(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        let handle = match self.task.lock() {
            Ok(mut task) => task.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.abort();
        }
        tracing::info!("Server status monitor stopped");
    }

    /// Probe the server immediately and record the result.
    pub async fn check_now(&self) -> ServerStatus {
        let status = self.client.check_status().await;

        let mut latest = self.latest.write().await;
        if latest.status != status.status {
            tracing::info!(
                from = ?latest.status,
                to = ?status.status,
                latency_ms = status.latency_ms,
                "Upstream status changed"
            );
        }
        *latest = status.clone();
        status
    }

    pub async fn report(&self) -> StatusReport {
        StatusReport {
            server: self.latest.read().await.clone(),
            started_at: self.started_at,
        }
    }
}
