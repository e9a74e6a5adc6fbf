//! Laundry models matching the upstream `/api/washingmachines` payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single washer or dryer as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub number: u32,
    pub available: bool,
    /// Seconds left in the current cycle; only meaningful when not available.
    pub time_left: u64,
}

impl Machine {
    pub fn state(&self) -> MachineState {
        if self.available {
            MachineState::Available
        } else if self.time_left > 0 {
            MachineState::InUse
        } else {
            MachineState::Finished
        }
    }
}

/// The two machine collections, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaundrySnapshot {
    pub washing_machine: Vec<Machine>,
    pub dryer: Vec<Machine>,
}

/// Upstream envelope: `{ success, data? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct LaundryEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<LaundrySnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineKind {
    Washer,
    Dryer,
}

impl MachineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineKind::Washer => "washer",
            MachineKind::Dryer => "dryer",
        }
    }
}

/// Derived per-machine state.
///
/// `Finished` means the countdown reached zero but the server has not yet
/// reported the machine as available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    Available,
    InUse,
    Finished,
}

impl MachineState {
    pub fn label(&self) -> &'static str {
        match self {
            MachineState::Available => "Ready",
            MachineState::InUse => "In use",
            MachineState::Finished => "Finished",
        }
    }
}

/// A machine whose countdown hit zero during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinishedMachine {
    pub kind: MachineKind,
    pub number: u32,
    pub finished_at: DateTime<Utc>,
}

/// One machine as served by the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct MachineView {
    pub number: u32,
    pub available: bool,
    pub time_left: u64,
    pub state: MachineState,
    pub label: &'static str,
    pub time_left_display: String,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MachineCounts {
    pub available: usize,
    pub in_use: usize,
    pub finished: usize,
}

/// The local countdown view served at `GET /api/laundry`.
#[derive(Debug, Clone, Serialize)]
pub struct LaundryView {
    pub washing_machine: Vec<MachineView>,
    pub dryer: Vec<MachineView>,
    pub washer_counts: MachineCounts,
    pub dryer_counts: MachineCounts,
    pub last_updated: Option<DateTime<Utc>>,
    pub loading: bool,
    pub error: Option<String>,
    pub just_finished: Vec<FinishedMachine>,
}
