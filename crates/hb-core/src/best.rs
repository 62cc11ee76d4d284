//! Best-time selection.

use std::collections::HashSet;

use crate::interval::{Interval, reconstruct_intervals, split_by_heat};
use crate::model::TimeLog;

/// Number of entries kept for leaderboard display.
pub const LEADERBOARD_SIZE: usize = 5;

/// Keeps each player's fastest interval.
///
/// `intervals` must be sorted fastest first (as returned by
/// [`reconstruct_intervals`]). With a `limit`, selection stops once that many
/// players are kept; without one every distinct player is returned.
/// Unmeasured intervals never count as a player's best.
pub fn best_per_player(intervals: &[Interval], limit: Option<usize>) -> Vec<Interval> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut seen = HashSet::new();
    let mut best = Vec::new();

    for interval in intervals {
        if best.len() >= limit {
            break;
        }
        if interval.duration_ms.is_none() {
            continue;
        }
        if seen.insert(&interval.player_id) {
            best.push(interval.clone());
        }
    }

    best
}

/// Fastest interval across one player's heats, never pairing across heats.
///
/// `logs` must belong to a single player and be grouped by heat with each
/// group in chronological order. Returns `None` when no heat has a completed,
/// measurable interval.
pub fn best_intra_heat_for_player(logs: &[TimeLog]) -> Option<Interval> {
    split_by_heat(logs)
        .into_iter()
        .filter_map(|run| {
            best_per_player(&reconstruct_intervals(run), Some(1))
                .into_iter()
                .next()
        })
        .min_by_key(Interval::sort_key)
}

/// Stable-sorts chronologically ordered logs so each heat is contiguous.
pub fn group_by_heat(logs: &mut [TimeLog]) {
    logs.sort_by(|a, b| a.heat_id.cmp(&b.heat_id));
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    use crate::types::{HeatId, PlayerId, TimeLogId, TimeTypeId};

    fn interval(player: &str, duration_ms: Option<i64>) -> Interval {
        Interval {
            player_id: PlayerId::new(player).unwrap(),
            heat_id: HeatId::new("h1").unwrap(),
            team_id: None,
            duration_ms,
            formatted_duration: String::new(),
        }
    }

    fn log(n: usize, heat: &str, time: &str) -> TimeLog {
        TimeLog {
            id: TimeLogId::new(format!("log-{n}")).unwrap(),
            player_id: PlayerId::new("p1").unwrap(),
            team_id: None,
            heat_id: HeatId::new(heat).unwrap(),
            time_type_id: TimeTypeId::new("beer").unwrap(),
            seconds: 0.0,
            time: time.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn keeps_first_entry_per_player() {
        let intervals = vec![
            interval("a", Some(1_000)),
            interval("b", Some(1_500)),
            interval("a", Some(2_000)),
            interval("c", Some(3_000)),
        ];
        let best = best_per_player(&intervals, None);

        let players: Vec<&str> = best.iter().map(|i| i.player_id.as_str()).collect();
        assert_eq!(players, vec!["a", "b", "c"]);
        assert_eq!(best[0].duration_ms, Some(1_000));
    }

    #[test]
    fn limit_caps_distinct_players() {
        let intervals: Vec<Interval> = (0..8)
            .map(|i| interval(&format!("p{i}"), Some(1_000 + i64::from(i))))
            .collect();

        assert_eq!(best_per_player(&intervals, Some(LEADERBOARD_SIZE)).len(), 5);
        assert_eq!(best_per_player(&intervals, None).len(), 8);
    }

    #[test]
    fn never_returns_duplicate_players() {
        let intervals = vec![
            interval("a", Some(1)),
            interval("a", Some(2)),
            interval("a", Some(3)),
            interval("b", Some(4)),
        ];
        let best = best_per_player(&intervals, Some(5));
        let unique: HashSet<_> = best.iter().map(|i| &i.player_id).collect();
        assert_eq!(unique.len(), best.len());
    }

    #[test]
    fn unmeasured_intervals_are_skipped() {
        let intervals = vec![interval("a", Some(1_000)), interval("b", None)];
        let best = best_per_player(&intervals, None);
        assert_eq!(best.len(), 1);
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(best_per_player(&[], Some(5)).is_empty());
    }

    #[test]
    fn intra_heat_best_does_not_pair_across_heats() {
        // Dangling start in h1 must not pair with the first event of h2
        let logs = vec![
            log(0, "h1", "00:00:00"),
            log(1, "h1", "00:00:30"),
            log(2, "h1", "00:01:00"),
            log(3, "h2", "00:01:01"),
            log(4, "h2", "00:01:21"),
        ];
        let best = best_intra_heat_for_player(&logs).unwrap();

        assert_eq!(best.heat_id.as_str(), "h2");
        assert_eq!(best.duration_ms, Some(20_000));
    }

    #[test]
    fn intra_heat_best_without_completed_attempt_is_none() {
        let logs = vec![log(0, "h1", "00:00:00"), log(1, "h2", "00:00:10")];
        assert!(best_intra_heat_for_player(&logs).is_none());
        assert!(best_intra_heat_for_player(&[]).is_none());
    }

    #[test]
    fn group_by_heat_keeps_time_order_within_heat() {
        let mut logs = vec![
            log(0, "h2", "00:00:00"),
            log(1, "h1", "00:00:01"),
            log(2, "h2", "00:00:02"),
            log(3, "h1", "00:00:03"),
        ];
        group_by_heat(&mut logs);

        let ids: Vec<&str> = logs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["log-1", "log-3", "log-0", "log-2"]);
    }
}
