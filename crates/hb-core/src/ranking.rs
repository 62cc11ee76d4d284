//! Ranking projections over reconstructed intervals.
//!
//! Three read-only views share one pipeline (year/activity filter, interval
//! reconstruction, best-per-player selection) and differ only in how they
//! order and label the result:
//!
//! - [`leaderboard`]: fastest time first, gap to the leader
//! - [`rpm_board`]: revolutions per minute, highest first
//! - [`compare`]: 0–100 radar scores for two subjects side by side

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::activity::{ActivityKind, performance_score};
use crate::best::{LEADERBOARD_SIZE, best_intra_heat_for_player, best_per_player, group_by_heat};
use crate::clock::{format_seconds, rpm_from_duration};
use crate::heat::logs_for_year;
use crate::interval::{Interval, reconstruct_intervals, sort_logs_chronologically};
use crate::model::{TimeLog, TimeType};
use crate::snapshot::Snapshot;
use crate::types::{PlayerId, TeamId};

/// Revolutions a contestant completes in the spin activity.
pub const REVOLUTIONS: u32 = 10;

/// Why a view could not be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// No activity type record carries this key.
    #[error("no activity type is configured for {0}")]
    ActivityNotFound(ActivityKind),

    /// The comparison subject is neither a known player nor a known team.
    #[error("no player or team with id {0}")]
    SubjectNotFound(String),
}

/// Display symbol for a 1-based rank.
pub fn medal(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => {
            let suffix = match (n % 10, n % 100) {
                (1, r) if r != 11 => "st",
                (2, r) if r != 12 => "nd",
                (3, r) if r != 13 => "rd",
                _ => "th",
            };
            format!("{n}{suffix}")
        }
    }
}

/// Display fields resolved from the reference tables.
///
/// Unresolvable references render as empty values rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub player_name: String,
    pub team_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Enrichment {
    /// Resolves names for an interval.
    ///
    /// The team is the one logged with the interval, else the player's first team.
    /// The image falls back from the player to that team.
    pub fn resolve(snapshot: &Snapshot, interval: &Interval) -> Self {
        let player = snapshot.player(&interval.player_id);
        let team = interval
            .team_id
            .as_ref()
            .and_then(|id| snapshot.team(id))
            .or_else(|| snapshot.team_of(&interval.player_id));
        let heat = snapshot.heat(&interval.heat_id);

        if player.is_none() {
            tracing::warn!(player = %interval.player_id, "interval references unknown player");
        }

        Self {
            player_name: player.map(|p| p.name.clone()).unwrap_or_default(),
            team_name: team.map(|t| t.name.clone()).unwrap_or_default(),
            heat_number: heat.map(|h| h.number),
            heat_year: heat.map(crate::model::Heat::year),
            image: player
                .and_then(|p| p.image.clone())
                .or_else(|| team.and_then(|t| t.image.clone())),
        }
    }
}

/// Fastest-first intervals for one activity in one year.
pub fn activity_intervals(
    snapshot: &Snapshot,
    kind: ActivityKind,
    year: i32,
) -> Result<Vec<Interval>, ViewError> {
    let time_type = snapshot
        .time_type_for(kind)
        .ok_or(ViewError::ActivityNotFound(kind))?;

    let mut logs: Vec<TimeLog> = logs_for_year(&snapshot.time_logs, &snapshot.heats, year)
        .into_iter()
        .filter(|log| log.time_type_id == time_type.id)
        .cloned()
        .collect();
    sort_logs_chronologically(&mut logs);

    Ok(reconstruct_intervals(&logs))
}

/// One row of the fastest-time leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub medal: String,
    #[serde(flatten)]
    pub interval: Interval,
    #[serde(flatten)]
    pub names: Enrichment,
    /// Absolute time for the leader, `+<gap>s` for everyone else.
    pub display: String,
}

/// Fastest-time leaderboard for one activity and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    pub activity: ActivityKind,
    pub year: i32,
    pub entries: Vec<LeaderboardEntry>,
}

/// Builds the fastest-time leaderboard.
///
/// `limit` defaults to [`LEADERBOARD_SIZE`].
pub fn leaderboard(
    snapshot: &Snapshot,
    kind: ActivityKind,
    year: i32,
    limit: Option<usize>,
) -> Result<Leaderboard, ViewError> {
    let intervals = activity_intervals(snapshot, kind, year)?;
    let best = best_per_player(&intervals, Some(limit.unwrap_or(LEADERBOARD_SIZE)));
    let leader_ms = best.first().and_then(|i| i.duration_ms).unwrap_or_default();

    let entries = best
        .into_iter()
        .enumerate()
        .map(|(idx, interval)| {
            let display = if idx == 0 {
                interval.formatted_duration.clone()
            } else {
                let gap = interval.duration_ms.unwrap_or_default() - leader_ms;
                format!("+{}s", format_seconds(gap, 3))
            };
            LeaderboardEntry {
                rank: idx + 1,
                medal: medal(idx + 1),
                names: Enrichment::resolve(snapshot, &interval),
                interval,
                display,
            }
        })
        .collect();

    Ok(Leaderboard {
        activity: kind,
        year,
        entries,
    })
}

/// One row of the RPM ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpmEntry {
    pub rank: usize,
    pub medal: String,
    #[serde(flatten)]
    pub interval: Interval,
    #[serde(flatten)]
    pub names: Enrichment,
    /// `None` when the attempt took no time at all.
    pub rpm: Option<f64>,
    /// RPM for the leader, `-<delta> RPM` for everyone else.
    pub display: String,
}

/// Shown in place of an RPM figure for a zero-length attempt.
pub const UNMEASURED_RPM: &str = "-- RPM";

/// RPM ranking for one activity and year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpmBoard {
    pub activity: ActivityKind,
    pub year: i32,
    pub revolutions: u32,
    pub entries: Vec<RpmEntry>,
}

/// Builds the RPM ranking, highest RPM first.
///
/// Entries are the same top players as the leaderboard, re-sorted by RPM
/// after it is computed.
pub fn rpm_board(
    snapshot: &Snapshot,
    kind: ActivityKind,
    year: i32,
    limit: Option<usize>,
) -> Result<RpmBoard, ViewError> {
    let intervals = activity_intervals(snapshot, kind, year)?;
    let best = best_per_player(&intervals, Some(limit.unwrap_or(LEADERBOARD_SIZE)));

    // A zero-length attempt (start and stop on the same clock string) has no
    // finite RPM; it keeps its row but sorts last and has no delta.
    let mut scored: Vec<(Option<f64>, Interval)> = best
        .into_iter()
        .map(|interval| {
            let rpm = interval
                .duration_ms
                .filter(|ms| *ms > 0)
                .map(|ms| rpm_from_duration(ms, REVOLUTIONS));
            (rpm, interval)
        })
        .collect();
    scored.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let top_rpm = scored.first().and_then(|(rpm, _)| *rpm);
    let entries = scored
        .into_iter()
        .enumerate()
        .map(|(idx, (rpm, interval))| {
            let display = match (rpm, top_rpm) {
                (Some(rpm), _) if idx == 0 => format!("{rpm:.2} RPM"),
                (Some(rpm), Some(top)) => format!("-{:.2} RPM", top - rpm),
                _ => UNMEASURED_RPM.to_string(),
            };
            RpmEntry {
                rank: idx + 1,
                medal: medal(idx + 1),
                names: Enrichment::resolve(snapshot, &interval),
                interval,
                rpm,
                display,
            }
        })
        .collect();

    Ok(RpmBoard {
        activity: kind,
        year,
        revolutions: REVOLUTIONS,
        entries,
    })
}

/// Longest duration on display, the span a replay animation runs for.
pub fn replay_span_ms<'a, I>(intervals: I) -> Option<i64>
where
    I: IntoIterator<Item = &'a Interval>,
{
    intervals.into_iter().filter_map(|i| i.duration_ms).max()
}

/// Who is being compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    Player(PlayerId),
    Team(TeamId),
}

impl Subject {
    /// Resolves a raw id against players first, then teams.
    pub fn resolve(snapshot: &Snapshot, id: &str) -> Result<Self, ViewError> {
        if let Some(player) = snapshot.players.iter().find(|p| p.id.as_str() == id) {
            return Ok(Self::Player(player.id.clone()));
        }
        if let Some(team) = snapshot.teams.iter().find(|t| t.id.as_str() == id) {
            return Ok(Self::Team(team.id.clone()));
        }
        Err(ViewError::SubjectNotFound(id.to_string()))
    }

    fn owns(&self, snapshot: &Snapshot, log: &TimeLog) -> bool {
        match self {
            Self::Player(id) => &log.player_id == id,
            Self::Team(id) => match &log.team_id {
                Some(team) => team == id,
                None => snapshot.team(id).is_some_and(|t| t.has_member(&log.player_id)),
            },
        }
    }
}

/// One radar axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadarPoint {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    pub score: u8,
}

/// A subject's card in the comparison view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub points: Vec<RadarPoint>,
}

/// Two subjects on the same normalised axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub year: i32,
    pub left: SubjectCard,
    pub right: SubjectCard,
}

/// Best duration per activity key for a subject in one year.
///
/// Attempts are matched within each heat only.
pub fn best_times(snapshot: &Snapshot, subject: &Subject, year: i32) -> HashMap<String, i64> {
    let own: Vec<&TimeLog> = logs_for_year(&snapshot.time_logs, &snapshot.heats, year)
        .into_iter()
        .filter(|log| subject.owns(snapshot, log))
        .collect();

    let mut best = HashMap::new();
    for time_type in &snapshot.time_types {
        let mut logs: Vec<TimeLog> = own
            .iter()
            .filter(|log| log.time_type_id == time_type.id)
            .map(|log| (*log).clone())
            .collect();
        sort_logs_chronologically(&mut logs);
        group_by_heat(&mut logs);

        if let Some(ms) = best_intra_heat_for_player(&logs).and_then(|i| i.duration_ms) {
            best.insert(time_type.key.clone(), ms);
        }
    }
    best
}

/// Scores best times on every configured activity axis.
///
/// Activities without a time, or with a key outside the calibration table, score 0.
pub fn radar_points(time_types: &[TimeType], best: &HashMap<String, i64>) -> Vec<RadarPoint> {
    time_types
        .iter()
        .map(|time_type| {
            let duration_ms = best.get(&time_type.key).copied();
            RadarPoint {
                key: time_type.key.clone(),
                label: time_type.name.clone(),
                duration_ms,
                score: duration_ms.map_or(0, |ms| performance_score(&time_type.key, ms)),
            }
        })
        .collect()
}

/// Builds one subject's radar card.
pub fn subject_card(snapshot: &Snapshot, subject: &Subject, year: i32) -> SubjectCard {
    let points = radar_points(&snapshot.time_types, &best_times(snapshot, subject, year));

    match subject {
        Subject::Player(id) => {
            let player = snapshot.player(id);
            let team = snapshot.team_of(id);
            let player_name = player.map(|p| p.name.clone()).unwrap_or_default();
            let name = match team {
                Some(team) => format!("{player_name} ({})", team.name),
                None => player_name,
            };
            SubjectCard {
                name,
                fact: player.and_then(|p| p.fact.clone()),
                image: player
                    .and_then(|p| p.image.clone())
                    .or_else(|| team.and_then(|t| t.image.clone())),
                points,
            }
        }
        Subject::Team(id) => {
            let team = snapshot.team(id);
            SubjectCard {
                name: team.map(|t| t.name.clone()).unwrap_or_default(),
                fact: None,
                image: team.and_then(|t| t.image.clone()),
                points,
            }
        }
    }
}

/// Side-by-side radar comparison of two players or teams.
pub fn compare(
    snapshot: &Snapshot,
    left: &str,
    right: &str,
    year: i32,
) -> Result<Comparison, ViewError> {
    let left = Subject::resolve(snapshot, left)?;
    let right = Subject::resolve(snapshot, right)?;
    Ok(Comparison {
        year,
        left: subject_card(snapshot, &left, year),
        right: subject_card(snapshot, &right, year),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    use crate::model::{Heat, Player, Team};
    use crate::types::{HeatId, TimeLogId, TimeTypeId};

    fn created(n: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0)
            .single()
            .expect("valid test timestamp")
            + chrono::Duration::seconds(i64::try_from(n).unwrap())
    }

    struct Builder {
        snapshot: Snapshot,
    }

    impl Builder {
        fn new() -> Self {
            let mut snapshot = Snapshot::default();
            for (id, name, key) in [("tt-beer", "Beer", "Beer"), ("tt-spin", "Spin", "Spin"), ("tt-sail", "Sail", "Sail")] {
                snapshot.time_types.push(TimeType {
                    id: TimeTypeId::new(id).unwrap(),
                    name: name.to_string(),
                    key: key.to_string(),
                });
            }
            for (id, number, year) in [("h1", 1, 2024), ("h2", 2, 2024), ("h-old", 1, 2023)] {
                snapshot.heats.push(Heat {
                    id: HeatId::new(id).unwrap(),
                    name: None,
                    number,
                    date: NaiveDate::from_ymd_opt(year, 6, 21).unwrap(),
                    is_current: false,
                });
            }
            Self { snapshot }
        }

        fn player(mut self, id: &str, name: &str, image: Option<&str>) -> Self {
            self.snapshot.players.push(Player {
                id: PlayerId::new(id).unwrap(),
                name: name.to_string(),
                image: image.map(String::from),
                fact: Some(format!("{name} likes boats")),
            });
            self
        }

        fn team(mut self, id: &str, name: &str, members: &[&str], image: Option<&str>) -> Self {
            let members = members.iter().map(|m| PlayerId::new(*m).unwrap()).collect();
            let mut team = Team::new(TeamId::new(id).unwrap(), name, members).unwrap();
            team.image = image.map(String::from);
            self.snapshot.teams.push(team);
            self
        }

        fn attempt(mut self, player: &str, heat: &str, time_type: &str, start: &str, end: &str) -> Self {
            for time in [start, end] {
                let n = self.snapshot.time_logs.len();
                self.snapshot.time_logs.push(TimeLog {
                    id: TimeLogId::new(format!("log-{n}")).unwrap(),
                    player_id: PlayerId::new(player).unwrap(),
                    team_id: None,
                    heat_id: HeatId::new(heat).unwrap(),
                    time_type_id: TimeTypeId::new(time_type).unwrap(),
                    seconds: 0.0,
                    time: time.to_string(),
                    created_at: created(n),
                });
            }
            self
        }

        fn build(self) -> Snapshot {
            self.snapshot
        }
    }

    #[test]
    fn medals_then_ordinals() {
        assert_eq!(medal(1), "🥇");
        assert_eq!(medal(3), "🥉");
        assert_eq!(medal(4), "4th");
        assert_eq!(medal(11), "11th");
        assert_eq!(medal(22), "22nd");
    }

    #[test]
    fn leaderboard_shows_gap_to_leader() {
        let snapshot = Builder::new()
            .player("a", "Ann", None)
            .player("b", "Bob", Some("bob.png"))
            .attempt("a", "h1", "tt-sail", "10:00:00.000", "10:00:12.000")
            .attempt("b", "h1", "tt-sail", "10:00:01.000", "10:00:15.250")
            .attempt("a", "h2", "tt-sail", "11:00:00.000", "11:00:11.500")
            .build();

        let board = leaderboard(&snapshot, ActivityKind::Sail, 2024, None).unwrap();

        assert_eq!(board.entries.len(), 2);
        let first = &board.entries[0];
        assert_eq!(first.names.player_name, "Ann");
        assert_eq!(first.names.heat_number, Some(2));
        assert_eq!(first.display, "00:11:500");
        assert_eq!(first.medal, "🥇");

        let second = &board.entries[1];
        assert_eq!(second.rank, 2);
        assert_eq!(second.display, "+2.750s");
        assert_eq!(second.names.image.as_deref(), Some("bob.png"));
    }

    #[test]
    fn leaderboard_ignores_other_years_and_activities() {
        let snapshot = Builder::new()
            .player("a", "Ann", None)
            .attempt("a", "h-old", "tt-sail", "10:00:00", "10:00:01")
            .attempt("a", "h1", "tt-beer", "10:00:00", "10:00:02")
            .build();

        let board = leaderboard(&snapshot, ActivityKind::Sail, 2024, None).unwrap();
        assert!(board.entries.is_empty());

        let old = leaderboard(&snapshot, ActivityKind::Sail, 2023, None).unwrap();
        assert_eq!(old.entries.len(), 1);
    }

    #[test]
    fn leaderboard_caps_at_five() {
        let mut builder = Builder::new();
        for i in 0..7 {
            let id = format!("p{i}");
            builder = builder.player(&id, &id, None).attempt(
                &id,
                "h1",
                "tt-beer",
                "12:00:00",
                &format!("12:00:0{}", i + 1),
            );
        }
        let board = leaderboard(&builder.build(), ActivityKind::Beer, 2024, None).unwrap();
        assert_eq!(board.entries.len(), 5);
        assert_eq!(board.entries[4].medal, "5th");
    }

    #[test]
    fn missing_activity_type_is_reported() {
        let mut snapshot = Builder::new().build();
        snapshot.time_types.retain(|t| t.key != "Spin");

        let err = rpm_board(&snapshot, ActivityKind::Spin, 2024, None).unwrap_err();
        assert_eq!(err, ViewError::ActivityNotFound(ActivityKind::Spin));
    }

    #[test]
    fn image_falls_back_to_team() {
        let snapshot = Builder::new()
            .player("a", "Ann", None)
            .team("t1", "Gulls", &["a"], Some("gulls.png"))
            .attempt("a", "h1", "tt-beer", "10:00:00", "10:00:05")
            .build();

        let board = leaderboard(&snapshot, ActivityKind::Beer, 2024, None).unwrap();
        let names = &board.entries[0].names;
        assert_eq!(names.team_name, "Gulls");
        assert_eq!(names.image.as_deref(), Some("gulls.png"));
    }

    #[test]
    fn unknown_player_renders_blank_names() {
        let snapshot = Builder::new()
            .attempt("ghost", "h1", "tt-beer", "10:00:00", "10:00:05")
            .build();

        let board = leaderboard(&snapshot, ActivityKind::Beer, 2024, None).unwrap();
        assert_eq!(board.entries[0].names.player_name, "");
        assert_eq!(board.entries[0].names.team_name, "");
    }

    #[test]
    fn rpm_board_sorts_by_rpm_descending() {
        let snapshot = Builder::new()
            .player("slow", "Slow", None)
            .player("mid", "Mid", None)
            .player("fast", "Fast", None)
            .attempt("mid", "h1", "tt-spin", "10:00:00.000", "10:00:01.000")
            .attempt("slow", "h1", "tt-spin", "10:00:00.000", "10:00:02.000")
            .attempt("fast", "h1", "tt-spin", "10:00:00.000", "10:00:00.500")
            .build();

        let board = rpm_board(&snapshot, ActivityKind::Spin, 2024, None).unwrap();

        let order: Vec<&str> = board
            .entries
            .iter()
            .map(|e| e.interval.player_id.as_str())
            .collect();
        assert_eq!(order, vec!["fast", "mid", "slow"]);
        assert_eq!(board.entries[0].display, "1200.00 RPM");
        assert_eq!(board.entries[1].display, "-600.00 RPM");
        assert_eq!(board.entries[2].display, "-900.00 RPM");
    }

    #[test]
    fn zero_length_spin_has_no_rpm() {
        let snapshot = Builder::new()
            .player("tap", "Tap", None)
            .player("twin", "Twin", None)
            .player("real", "Real", None)
            .attempt("tap", "h1", "tt-spin", "10:00:00.000", "10:00:00.000")
            .attempt("twin", "h1", "tt-spin", "10:00:05.000", "10:00:05.000")
            .attempt("real", "h1", "tt-spin", "10:00:00.000", "10:00:01.000")
            .build();

        let board = rpm_board(&snapshot, ActivityKind::Spin, 2024, None).unwrap();

        assert_eq!(board.entries.len(), 3);
        assert_eq!(board.entries[0].interval.player_id.as_str(), "real");
        assert_eq!(board.entries[0].rpm, Some(600.0));
        assert_eq!(board.entries[0].display, "600.00 RPM");
        for entry in &board.entries[1..] {
            assert_eq!(entry.rpm, None);
            assert_eq!(entry.display, UNMEASURED_RPM);
        }

        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["entries"][0]["rpm"], 600.0);
        assert!(json["entries"][1]["rpm"].is_null());
    }

    #[test]
    fn all_zero_length_spins_have_no_leader_figure() {
        let snapshot = Builder::new()
            .player("tap", "Tap", None)
            .attempt("tap", "h1", "tt-spin", "10:00:00", "10:00:00")
            .build();

        let board = rpm_board(&snapshot, ActivityKind::Spin, 2024, None).unwrap();
        assert_eq!(board.entries[0].display, UNMEASURED_RPM);
    }

    #[test]
    fn views_are_idempotent() {
        let snapshot = Builder::new()
            .player("a", "Ann", None)
            .attempt("a", "h1", "tt-spin", "10:00:00", "10:00:04")
            .build();

        let first = serde_json::to_string(&rpm_board(&snapshot, ActivityKind::Spin, 2024, None).unwrap()).unwrap();
        let second = serde_json::to_string(&rpm_board(&snapshot, ActivityKind::Spin, 2024, None).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn replay_span_is_longest_duration() {
        let snapshot = Builder::new()
            .attempt("a", "h1", "tt-beer", "10:00:00", "10:00:03")
            .attempt("b", "h1", "tt-beer", "10:00:00", "10:00:09")
            .build();
        let board = leaderboard(&snapshot, ActivityKind::Beer, 2024, None).unwrap();

        assert_eq!(replay_span_ms(board.entries.iter().map(|e| &e.interval)), Some(9_000));
        assert_eq!(replay_span_ms(std::iter::empty()), None);
    }

    #[test]
    fn compare_scores_player_against_team() {
        let snapshot = Builder::new()
            .player("a", "Ann", Some("ann.png"))
            .player("b", "Bob", None)
            .team("t1", "Gulls", &["b"], Some("gulls.png"))
            // Beer: 2s is the calibration minimum
            .attempt("a", "h1", "tt-beer", "10:00:00", "10:00:02")
            // Sail: 35s is halfway between 10s and 60s
            .attempt("b", "h1", "tt-sail", "10:00:00", "10:00:35")
            .build();

        let comparison = compare(&snapshot, "a", "t1", 2024).unwrap();

        assert_eq!(comparison.left.name, "Ann");
        assert_eq!(comparison.left.fact.as_deref(), Some("Ann likes boats"));
        let beer = comparison.left.points.iter().find(|p| p.key == "Beer").unwrap();
        assert_eq!(beer.score, 100);
        let spin = comparison.left.points.iter().find(|p| p.key == "Spin").unwrap();
        assert_eq!(spin.duration_ms, None);
        assert_eq!(spin.score, 0);

        assert_eq!(comparison.right.name, "Gulls");
        assert!(comparison.right.fact.is_none());
        let sail = comparison.right.points.iter().find(|p| p.key == "Sail").unwrap();
        assert_eq!(sail.score, 50);
    }

    #[test]
    fn player_card_is_qualified_with_team() {
        let snapshot = Builder::new()
            .player("b", "Bob", None)
            .team("t1", "Gulls", &["b"], Some("gulls.png"))
            .build();

        let card = subject_card(&snapshot, &Subject::Player(PlayerId::new("b").unwrap()), 2024);
        assert_eq!(card.name, "Bob (Gulls)");
        assert_eq!(card.image.as_deref(), Some("gulls.png"));
        assert_eq!(card.points.len(), 3);
    }

    #[test]
    fn best_times_match_within_heat_only() {
        let snapshot = Builder::new()
            .player("a", "Ann", None)
            .attempt("a", "h1", "tt-beer", "10:00:00", "10:00:06")
            .attempt("a", "h2", "tt-beer", "11:00:00", "11:00:04")
            .build();

        let best = best_times(&snapshot, &Subject::Player(PlayerId::new("a").unwrap()), 2024);
        assert_eq!(best.get("Beer"), Some(&4_000));
        assert!(!best.contains_key("Sail"));
    }

    #[test]
    fn unknown_subject_is_reported() {
        let snapshot = Builder::new().player("a", "Ann", None).build();
        let err = compare(&snapshot, "a", "nobody", 2024).unwrap_err();
        assert_eq!(err, ViewError::SubjectNotFound("nobody".to_string()));
    }

    #[test]
    fn unknown_activity_key_scores_zero() {
        let time_types = vec![TimeType {
            id: TimeTypeId::new("tt-row").unwrap(),
            name: "Row".to_string(),
            key: "Row".to_string(),
        }];
        let best = HashMap::from([("Row".to_string(), 1_000)]);

        let points = radar_points(&time_types, &best);
        assert_eq!(points[0].score, 0);
        assert_eq!(points[0].duration_ms, Some(1_000));
    }
}
