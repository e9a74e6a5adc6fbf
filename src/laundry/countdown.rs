//! Local countdown simulation between upstream refreshes.
//!
//! A tick never mutates the snapshot it is given; it returns a new one.

use std::time::Duration;

use crate::models::{LaundrySnapshot, Machine, MachineKind};

/// Result of one tick over a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub snapshot: LaundrySnapshot,
    /// Machines whose countdown went from 1 to 0 during this tick.
    pub just_finished: Vec<(MachineKind, u32)>,
}

/// Advance every in-use machine by one second.
pub fn tick(snapshot: &LaundrySnapshot) -> TickOutcome {
    let mut just_finished = Vec::new();

    let washing_machine = tick_machines(
        &snapshot.washing_machine,
        MachineKind::Washer,
        &mut just_finished,
    );
    let dryer = tick_machines(&snapshot.dryer, MachineKind::Dryer, &mut just_finished);

    TickOutcome {
        snapshot: LaundrySnapshot {
            washing_machine,
            dryer,
        },
        just_finished,
    }
}

fn tick_machines(
    machines: &[Machine],
    kind: MachineKind,
    just_finished: &mut Vec<(MachineKind, u32)>,
) -> Vec<Machine> {
    machines
        .iter()
        .map(|machine| {
            if machine.available || machine.time_left == 0 {
                return machine.clone();
            }
            let time_left = machine.time_left - 1;
            if time_left == 0 {
                just_finished.push((kind, machine.number));
            }
            Machine {
                time_left,
                ..machine.clone()
            }
        })
        .collect()
}

/// Assumed full cycle length per machine type.
///
/// The server never reports the original duration, so these are estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleDurations {
    pub washer: Duration,
    pub dryer: Duration,
}

impl CycleDurations {
    pub fn total(&self, kind: MachineKind) -> Duration {
        match kind {
            MachineKind::Washer => self.washer,
            MachineKind::Dryer => self.dryer,
        }
    }
}

/// Estimated completion of the current cycle, in [0, 100].
///
/// Available machines report 0.
pub fn progress_percent(machine: &Machine, total: Duration) -> f64 {
    if machine.available {
        return 0.0;
    }
    let total = total.as_secs();
    if total == 0 {
        return 100.0;
    }

    let total = total as f64;
    let elapsed = total - machine.time_left as f64;
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}

/// Format remaining seconds as `M:SS` or `H:MM:SS`; zero renders as `-`.
pub fn format_time_left(seconds: u64) -> String {
    if seconds == 0 {
        return "-".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(number: u32, available: bool, time_left: u64) -> Machine {
        Machine {
            number,
            available,
            time_left,
        }
    }

    fn snapshot(washers: Vec<Machine>, dryers: Vec<Machine>) -> LaundrySnapshot {
        LaundrySnapshot {
            washing_machine: washers,
            dryer: dryers,
        }
    }

    #[test]
    fn test_tick_decrements_in_use_machines() {
        let before = snapshot(
            vec![machine(1, false, 120), machine(2, false, 1)],
            vec![machine(15, false, 60)],
        );

        let outcome = tick(&before);

        assert_eq!(outcome.snapshot.washing_machine[0].time_left, 119);
        assert_eq!(outcome.snapshot.washing_machine[1].time_left, 0);
        assert_eq!(outcome.snapshot.dryer[0].time_left, 59);
        assert_eq!(outcome.just_finished, vec![(MachineKind::Washer, 2)]);
        // Input is left untouched.
        assert_eq!(before.washing_machine[0].time_left, 120);
    }

    #[test]
    fn test_tick_leaves_idle_and_finished_machines_alone() {
        let before = snapshot(
            vec![machine(2, true, 0), machine(3, true, 42)],
            vec![machine(16, false, 0)],
        );

        let outcome = tick(&before);

        assert_eq!(outcome.snapshot, before);
        assert!(outcome.just_finished.is_empty());
    }

    #[test]
    fn test_countdown_to_zero_flags_once() {
        let mut current = snapshot(vec![machine(1, false, 5)], vec![]);
        let mut finished_at = Vec::new();

        for i in 1..=8 {
            let outcome = tick(&current);
            if !outcome.just_finished.is_empty() {
                finished_at.push(i);
            }
            current = outcome.snapshot;
        }

        assert_eq!(current.washing_machine[0].time_left, 0);
        assert_eq!(finished_at, vec![5]);
    }

    #[test]
    fn test_available_machine_unchanged_after_many_ticks() {
        let start = snapshot(vec![machine(2, true, 0)], vec![]);
        let mut current = start.clone();
        for _ in 0..100 {
            current = tick(&current).snapshot;
        }
        assert_eq!(current, start);
    }

    #[test]
    fn test_progress_percent() {
        let total = Duration::from_secs(100);

        assert_eq!(progress_percent(&machine(1, false, 100), total), 0.0);
        assert_eq!(progress_percent(&machine(1, false, 25), total), 75.0);
        assert_eq!(progress_percent(&machine(1, false, 0), total), 100.0);
        assert_eq!(progress_percent(&machine(1, true, 25), total), 0.0);
    }

    #[test]
    fn test_progress_clamped_when_time_left_exceeds_total() {
        let total = Duration::from_secs(60);
        assert_eq!(progress_percent(&machine(1, false, 600), total), 0.0);
        assert_eq!(progress_percent(&machine(1, false, 10), Duration::ZERO), 100.0);
    }

    #[test]
    fn test_progress_non_decreasing_across_ticks() {
        let total = Duration::from_secs(90);
        let mut current = snapshot(vec![machine(1, false, 120)], vec![]);
        let mut last = progress_percent(&current.washing_machine[0], total);

        for _ in 0..130 {
            current = tick(&current).snapshot;
            let progress = progress_percent(&current.washing_machine[0], total);
            assert!(progress >= last);
            assert!((0.0..=100.0).contains(&progress));
            last = progress;
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn test_format_time_left() {
        assert_eq!(format_time_left(0), "-");
        assert_eq!(format_time_left(5), "0:05");
        assert_eq!(format_time_left(754), "12:34");
        assert_eq!(format_time_left(3600), "1:00:00");
        assert_eq!(format_time_left(3725), "1:02:05");
    }

    #[test]
    fn test_cycle_durations() {
        let cycles = CycleDurations {
            washer: Duration::from_secs(2400),
            dryer: Duration::from_secs(3600),
        };
        assert_eq!(cycles.total(MachineKind::Washer).as_secs(), 2400);
        assert_eq!(cycles.total(MachineKind::Dryer).as_secs(), 3600);
    }
}
