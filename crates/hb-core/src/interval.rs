//! Interval reconstruction.
//!
//! Judges log one event when a contestant starts an activity and another when
//! they finish. The store keeps these as a flat stream, so matching them back
//! up is done here:
//!
//! 1. Group logs by (player, heat), keeping chronological order
//! 2. Within each group, pair 1st/2nd, 3rd/4th, ... as start/end
//! 3. A trailing unpaired start is an attempt still in progress and is dropped
//!
//! Results are ordered fastest first; every consumer relies on that.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::clock::{self, format_duration};
use crate::model::TimeLog;
use crate::types::{HeatId, PlayerId, TeamId};

/// Placeholder shown for intervals without a measurable duration.
pub const UNMEASURED: &str = "--:--:---";

/// A matched start/end pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub player_id: PlayerId,
    pub heat_id: HeatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    /// `None` when either clock string is malformed or the end precedes the start.
    pub duration_ms: Option<i64>,
    pub formatted_duration: String,
}

impl Interval {
    /// Ordering key: unmeasured intervals sort as +infinity.
    pub fn sort_key(&self) -> i64 {
        self.duration_ms.unwrap_or(i64::MAX)
    }
}

/// Sort key for a single log: malformed clock strings go last.
fn chronological_key(log: &TimeLog) -> (bool, i64, chrono::DateTime<chrono::Utc>) {
    match clock::parse_clock_time(&log.time) {
        Ok(ms) => (false, ms, log.created_at),
        Err(_) => (true, 0, log.created_at),
    }
}

/// Stable sort by clock time, then store creation time.
///
/// Logs whose clock string can't be parsed go to the end, ordered among
/// themselves by creation time.
pub fn sort_logs_chronologically(logs: &mut [TimeLog]) {
    logs.sort_by_key(chronological_key);
}

/// Groups logs by (player, heat) in order of first appearance.
///
/// Each entry keeps the log's position in the input so output ties can be
/// broken by start order.
fn group_by_player_heat(logs: &[TimeLog]) -> Vec<Vec<(usize, &TimeLog)>> {
    let mut index: HashMap<(&PlayerId, &HeatId), usize> = HashMap::new();
    let mut groups: Vec<Vec<(usize, &TimeLog)>> = Vec::new();

    for (pos, log) in logs.iter().enumerate() {
        let slot = *index
            .entry((&log.player_id, &log.heat_id))
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[slot].push((pos, log));
    }

    groups
}

fn measure(start: &TimeLog, end: &TimeLog) -> Option<i64> {
    match clock::duration_between(&start.time, &end.time) {
        Ok(ms) if ms >= 0 => Some(ms),
        Ok(ms) => {
            tracing::warn!(
                start = %start.id,
                end = %end.id,
                duration_ms = ms,
                "end logged before start, interval left unmeasured"
            );
            None
        }
        Err(e) => {
            tracing::warn!(start = %start.id, end = %end.id, error = %e, "interval left unmeasured");
            None
        }
    }
}

/// Reconstructs start/end intervals from chronologically sorted logs.
///
/// Logs must already be limited to one activity type and one competition
/// year, and sorted with [`sort_logs_chronologically`].
///
/// The result is sorted ascending by duration. Ties, and unmeasured intervals
/// at the end, keep the order of their start events.
pub fn reconstruct_intervals(logs: &[TimeLog]) -> Vec<Interval> {
    let mut paired: Vec<(usize, Interval)> = Vec::new();

    for group in group_by_player_heat(logs) {
        for pair in group.chunks_exact(2) {
            let (start_pos, start) = pair[0];
            let (_, end) = pair[1];
            let duration_ms = measure(start, end);
            paired.push((
                start_pos,
                Interval {
                    player_id: start.player_id.clone(),
                    heat_id: start.heat_id.clone(),
                    team_id: start.team_id.clone().or_else(|| end.team_id.clone()),
                    duration_ms,
                    formatted_duration: duration_ms
                        .map_or_else(|| UNMEASURED.to_string(), format_duration),
                },
            ));
        }
    }

    paired.sort_by(|(a_pos, a), (b_pos, b)| match a.sort_key().cmp(&b.sort_key()) {
        Ordering::Equal => a_pos.cmp(b_pos),
        other => other,
    });

    tracing::debug!(
        logs = logs.len(),
        intervals = paired.len(),
        "reconstructed intervals"
    );

    paired.into_iter().map(|(_, interval)| interval).collect()
}

/// Start events still waiting for their matching end.
///
/// These are contestants currently being timed (or a stop the judge never logged).
pub fn open_attempts(logs: &[TimeLog]) -> Vec<&TimeLog> {
    let mut open: Vec<(usize, &TimeLog)> = group_by_player_heat(logs)
        .into_iter()
        .filter_map(|group| group.chunks_exact(2).remainder().first().copied())
        .collect();
    open.sort_by_key(|(pos, _)| *pos);
    open.into_iter().map(|(_, log)| log).collect()
}

/// Splits a single player's logs into contiguous runs sharing a heat.
///
/// Grouping is by contiguity only; sort by heat first for global grouping.
pub fn split_by_heat(logs: &[TimeLog]) -> Vec<&[TimeLog]> {
    logs.chunk_by(|a, b| a.heat_id == b.heat_id).collect()
}
