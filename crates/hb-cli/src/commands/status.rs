//! Status command for showing the current heat and who is on the clock.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use hb_core::{Heat, Snapshot, TimeLog, current_heat, open_attempts, sort_logs_chronologically};
use serde::Serialize;

use super::util::write_json;

/// A start event still waiting for its stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenAttempt {
    pub player_name: String,
    pub activity: String,
    pub since: String,
}

/// Snapshot of the competition floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub current_heat: Option<Heat>,
    pub open: Vec<OpenAttempt>,
    pub heat_logs: usize,
    pub total_logs: usize,
}

/// Builds the status report for the current heat.
pub fn build(snapshot: &Snapshot) -> Status {
    let current = current_heat(&snapshot.heats).cloned();

    let mut open = Vec::new();
    let mut heat_logs = 0;
    if let Some(heat) = &current {
        let in_heat: Vec<&TimeLog> = snapshot
            .time_logs
            .iter()
            .filter(|log| log.heat_id == heat.id)
            .collect();
        heat_logs = in_heat.len();

        for time_type in &snapshot.time_types {
            let mut logs: Vec<TimeLog> = in_heat
                .iter()
                .filter(|log| log.time_type_id == time_type.id)
                .map(|log| (*log).clone())
                .collect();
            sort_logs_chronologically(&mut logs);
            for log in open_attempts(&logs) {
                open.push(OpenAttempt {
                    player_name: snapshot
                        .player(&log.player_id)
                        .map(|p| p.name.clone())
                        .unwrap_or_default(),
                    activity: time_type.name.clone(),
                    since: log.time.clone(),
                });
            }
        }
    }

    Status {
        current_heat: current,
        open,
        heat_logs,
        total_logs: snapshot.time_logs.len(),
    }
}

/// Formats the status report.
pub fn format_status(status: &Status) -> String {
    let mut output = String::new();
    let Some(heat) = &status.current_heat else {
        writeln!(output, "No heat is current.").unwrap();
        writeln!(output, "Logs: {}", status.total_logs).unwrap();
        return output;
    };

    writeln!(output, "Current heat: {} ({})", heat.number, heat.year()).unwrap();
    writeln!(
        output,
        "Logs: {} in this heat, {} total",
        status.heat_logs, status.total_logs
    )
    .unwrap();

    if status.open.is_empty() {
        writeln!(output, "Nobody is on the clock.").unwrap();
    } else {
        writeln!(output, "On the clock:").unwrap();
        for attempt in &status.open {
            writeln!(
                output,
                "  {} {} since {}",
                attempt.player_name, attempt.activity, attempt.since
            )
            .unwrap();
        }
    }
    output
}

/// Runs `hb status`.
pub fn run<W: Write>(writer: &mut W, snapshot: &Snapshot, json: bool) -> Result<()> {
    let status = build(snapshot);
    if json {
        write_json(writer, &status)
    } else {
        write!(writer, "{}", format_status(&status))?;
        Ok(())
    }
}
