//! Laundry status poller.
//!
//! Owns the authoritative snapshot, the locally ticked copy and the two
//! timers driving them: a slow auto-refresh against the upstream API and a
//! fast countdown ticker. Both timers live between `start` and `stop`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::countdown::{self, CycleDurations};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    FinishedMachine, LaundrySnapshot, LaundryView, Machine, MachineCounts, MachineKind,
    MachineState, MachineView,
};
use crate::upstream::TransatClient;

/// Timer periods and progress estimates for the poller.
#[derive(Debug, Clone, Copy)]
pub struct PollerSettings {
    pub refresh_interval: Duration,
    pub tick_interval: Duration,
    pub cycles: CycleDurations,
}

impl From<&Config> for PollerSettings {
    fn from(config: &Config) -> Self {
        Self {
            refresh_interval: config.refresh_interval,
            tick_interval: config.tick_interval,
            cycles: CycleDurations {
                washer: config.washer_cycle,
                dryer: config.dryer_cycle,
            },
        }
    }
}

/// Everything the laundry view is derived from.
#[derive(Debug, Clone, Default)]
pub struct LaundryState {
    /// Last snapshot received from the server.
    snapshot: Option<LaundrySnapshot>,
    /// Ticked copy of `snapshot`, reset on every successful fetch.
    local: Option<LaundrySnapshot>,
    last_updated: Option<DateTime<Utc>>,
    error: Option<String>,
    just_finished: Vec<FinishedMachine>,
}

impl LaundryState {
    pub fn snapshot(&self) -> Option<&LaundrySnapshot> {
        self.snapshot.as_ref()
    }

    pub fn local(&self) -> Option<&LaundrySnapshot> {
        self.local.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn just_finished(&self) -> &[FinishedMachine] {
        &self.just_finished
    }

    fn begin_fetch(&mut self) {
        self.error = None;
    }

    /// Replace both snapshots wholesale with fresh server data.
    pub fn apply_snapshot(&mut self, snapshot: LaundrySnapshot, now: DateTime<Utc>) {
        self.local = Some(snapshot.clone());
        self.snapshot = Some(snapshot);
        self.last_updated = Some(now);
        self.error = None;
        self.just_finished.clear();
    }

    /// Surface a fetch failure without touching the displayed data.
    pub fn record_failure(&mut self, err: &AppError) {
        self.error = Some(err.message());
    }

    /// Advance the local view by one tick. No-op before the first snapshot.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<FinishedMachine> {
        let Some(local) = self.local.as_ref() else {
            return Vec::new();
        };

        let outcome = countdown::tick(local);
        self.local = Some(outcome.snapshot);

        let finished: Vec<FinishedMachine> = outcome
            .just_finished
            .into_iter()
            .map(|(kind, number)| FinishedMachine {
                kind,
                number,
                finished_at: now,
            })
            .collect();
        self.just_finished.extend(finished.iter().cloned());
        finished
    }

    /// Build the served view, or `None` before the first successful fetch.
    pub fn view(&self, cycles: &CycleDurations, loading: bool) -> Option<LaundryView> {
        let local = self.local.as_ref()?;

        let washing_machine =
            machine_views(&local.washing_machine, cycles.total(MachineKind::Washer));
        let dryer = machine_views(&local.dryer, cycles.total(MachineKind::Dryer));

        Some(LaundryView {
            washer_counts: counts(&local.washing_machine),
            dryer_counts: counts(&local.dryer),
            washing_machine,
            dryer,
            last_updated: self.last_updated,
            loading,
            error: self.error.clone(),
            just_finished: self.just_finished.clone(),
        })
    }
}

fn machine_views(machines: &[Machine], total: Duration) -> Vec<MachineView> {
    machines
        .iter()
        .map(|machine| {
            let state = machine.state();
            MachineView {
                number: machine.number,
                available: machine.available,
                time_left: machine.time_left,
                state,
                label: state.label(),
                time_left_display: countdown::format_time_left(machine.time_left),
                progress_percent: countdown::progress_percent(machine, total),
            }
        })
        .collect()
}

fn counts(machines: &[Machine]) -> MachineCounts {
    machines
        .iter()
        .fold(MachineCounts::default(), |mut acc, machine| {
            match machine.state() {
                MachineState::Available => acc.available += 1,
                MachineState::InUse => acc.in_use += 1,
                MachineState::Finished => acc.finished += 1,
            }
            acc
        })
}

/// Counts a fetch as in flight until dropped, including when the fetching
/// future is cancelled.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Keeps the local laundry view in sync with the Transat API.
pub struct LaundryPoller {
    client: TransatClient,
    settings: PollerSettings,
    state: RwLock<LaundryState>,
    /// Bumped on every applied snapshot so the ticker restarts its period.
    baseline: watch::Sender<u64>,
    in_flight: AtomicUsize,
    active: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl LaundryPoller {
    pub fn new(client: TransatClient, settings: PollerSettings) -> Arc<Self> {
        let (baseline, _) = watch::channel(0);
        Arc::new(Self {
            client,
            settings,
            state: RwLock::new(LaundryState::default()),
            baseline,
            in_flight: AtomicUsize::new(0),
            active: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Whether any fetch is currently awaiting the upstream.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Start the auto-refresh loop and the countdown ticker.
    ///
    /// The first fetch is issued immediately. Calling `start` twice is a no-op.
    pub fn start(self: &Arc<Self>) {
        if self.active.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::info!(
            refresh_secs = self.settings.refresh_interval.as_secs(),
            tick_ms = self.settings.tick_interval.as_millis() as u64,
            upstream = %self.client.base_url(),
            "Starting laundry poller"
        );

        let refresher = tokio::spawn(Arc::clone(self).run_refresh_loop());
        let ticker = self.spawn_ticker();
        self.track(refresher);
        self.track(ticker);
    }

    /// Cancel both timers. Results of fetches still in flight are discarded.
    pub fn stop(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }

        let tasks = match self.tasks.lock() {
            Ok(mut tasks) => std::mem::take(&mut *tasks),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for task in tasks {
            task.abort();
        }
        tracing::info!("Laundry poller stopped");
    }

    fn track(&self, task: JoinHandle<()>) {
        match self.tasks.lock() {
            Ok(mut tasks) => tasks.push(task),
            Err(poisoned) => poisoned.into_inner().push(task),
        }
    }

    /// Fetch a fresh snapshot now.
    ///
    /// On failure the local view is left as it was and the error is recorded.
    pub async fn refresh(&self) -> Result<(), AppError> {
        if !self.is_active() {
            return Err(AppError::Unavailable(
                "Laundry poller is not running".to_string(),
            ));
        }

        let in_flight = InFlight::enter(&self.in_flight);
        self.state.write().await.begin_fetch();
        let result = self.client.fetch_laundry().await;

        let mut state = self.state.write().await;
        drop(in_flight);

        if !self.is_active() {
            tracing::debug!("Discarding laundry fetch result after stop");
            return Err(AppError::Unavailable(
                "Laundry poller is not running".to_string(),
            ));
        }

        match result {
            Ok(snapshot) => {
                tracing::info!(
                    washers = snapshot.washing_machine.len(),
                    dryers = snapshot.dryer.len(),
                    "Laundry snapshot refreshed"
                );
                state.apply_snapshot(snapshot, Utc::now());
                drop(state);
                self.baseline.send_modify(|generation| *generation += 1);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Laundry fetch failed: {}", e.message());
                state.record_failure(&e);
                Err(e)
            }
        }
    }

    /// The current local view.
    pub async fn view(&self) -> Result<LaundryView, AppError> {
        let state = self.state.read().await;
        state
            .view(&self.settings.cycles, self.is_loading())
            .ok_or_else(|| {
                let reason = state
                    .error()
                    .map(|e| format!("Laundry data not available yet: {}", e))
                    .unwrap_or_else(|| "Laundry data not available yet".to_string());
                AppError::Unavailable(reason)
            })
    }

    /// A copy of the full internal state.
    pub async fn state(&self) -> LaundryState {
        self.state.read().await.clone()
    }

    async fn run_refresh_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.settings.refresh_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            // Failures are already recorded and logged by `refresh`.
            let _ = self.refresh().await;
        }
    }

    fn spawn_ticker(self: &Arc<Self>) -> JoinHandle<()> {
        let poller = Arc::clone(self);
        let mut baseline = self.baseline.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poller.settings.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let finished = poller.state.write().await.tick(Utc::now());
                        for machine in finished {
                            tracing::info!(
                                kind = machine.kind.as_str(),
                                number = machine.number,
                                "Machine cycle finished"
                            );
                        }
                    }
                    changed = baseline.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        interval.reset();
                    }
                }
            }
        })
    }
}
