//! Shared lookups for CLI commands.

use std::io::Write;

use anyhow::{Context, Result, bail};
use hb_core::{Heat, Player, Snapshot, Team, current_heat, latest_year};
use serde::Serialize;

/// Finds a player by id, or by a name that matches exactly one player.
pub fn find_player<'a>(snapshot: &'a Snapshot, query: &str) -> Result<&'a Player> {
    if let Some(player) = snapshot.players.iter().find(|p| p.id.as_str() == query) {
        return Ok(player);
    }
    unique_match(
        snapshot
            .players
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(query.trim())),
        "player",
        query,
    )
}

/// Finds a team by id, or by a name that matches exactly one team.
pub fn find_team<'a>(snapshot: &'a Snapshot, query: &str) -> Result<&'a Team> {
    if let Some(team) = snapshot.teams.iter().find(|t| t.id.as_str() == query) {
        return Ok(team);
    }
    unique_match(
        snapshot
            .teams
            .iter()
            .filter(|t| t.name.eq_ignore_ascii_case(query.trim())),
        "team",
        query,
    )
}

/// Finds a heat by id, or by number within the working year.
///
/// The working year is the current heat's year, else the most recent one.
pub fn find_heat<'a>(snapshot: &'a Snapshot, query: &str) -> Result<&'a Heat> {
    if let Some(heat) = snapshot.heats.iter().find(|h| h.id.as_str() == query) {
        return Ok(heat);
    }
    let Ok(number) = query.trim().parse::<u32>() else {
        bail!("no heat with id {query:?}");
    };
    let year = current_heat(&snapshot.heats)
        .map(Heat::year)
        .or_else(|| latest_year(&snapshot.heats))
        .with_context(|| format!("no heat numbered {number}: no heats recorded yet"))?;
    unique_match(
        snapshot
            .heats
            .iter()
            .filter(|h| h.year() == year && h.number == number),
        "heat",
        query,
    )
}

/// Resolves a comparison subject to a player or team id.
pub fn subject_id(snapshot: &Snapshot, query: &str) -> Result<String> {
    if let Ok(player) = find_player(snapshot, query) {
        return Ok(player.id.to_string());
    }
    match find_team(snapshot, query) {
        Ok(team) => Ok(team.id.to_string()),
        Err(_) => bail!("no player or team with id or name {query:?}"),
    }
}

/// The requested year, or the most recent year with heats.
pub fn resolve_year(snapshot: &Snapshot, year: Option<i32>) -> Result<i32> {
    match year {
        Some(year) => Ok(year),
        None => latest_year(&snapshot.heats)
            .context("no heats recorded yet; add one with `hb heat add`"),
    }
}

/// Player name with their team in parentheses, if they have one.
pub fn qualified_name(player_name: &str, team_name: &str) -> String {
    match (player_name.is_empty(), team_name.is_empty()) {
        (_, true) => player_name.to_string(),
        (true, false) => format!("? ({team_name})"),
        (false, false) => format!("{player_name} ({team_name})"),
    }
}

/// Writes `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

fn unique_match<'a, T: 'a>(
    mut matches: impl Iterator<Item = &'a T>,
    kind: &str,
    query: &str,
) -> Result<&'a T> {
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
        (Some(_), Some(_)) => bail!("more than one {kind} matches {query:?}; use the id"),
        (None, _) => bail!("no {kind} with id or name {query:?}"),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use hb_core::{
        Heat, HeatId, Player, PlayerId, Snapshot, Team, TeamId, TimeLog, TimeLogId, TimeType,
        TimeTypeId,
    };

    fn created(n: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0)
            .single()
            .expect("valid test timestamp")
            + chrono::Duration::seconds(i64::try_from(n).unwrap())
    }

    /// Two players, one team, two heats in 2024 and one in 2023.
    pub fn regatta() -> Snapshot {
        let mut snapshot = Snapshot::default();
        for key in ["Beer", "Sail", "Spin"] {
            snapshot.time_types.push(TimeType {
                id: TimeTypeId::new(key.to_lowercase()).unwrap(),
                name: key.to_string(),
                key: key.to_string(),
            });
        }
        for (id, number, year, is_current) in
            [("h1", 1, 2024, false), ("h2", 2, 2024, true), ("h0", 1, 2023, false)]
        {
            snapshot.heats.push(Heat {
                id: HeatId::new(id).unwrap(),
                name: None,
                number,
                date: NaiveDate::from_ymd_opt(year, 6, 21).unwrap(),
                is_current,
            });
        }
        snapshot.players.push(Player {
            id: PlayerId::new("ann").unwrap(),
            name: "Ann".to_string(),
            image: None,
            fact: Some("Rows to work".to_string()),
        });
        snapshot.players.push(Player {
            id: PlayerId::new("bob").unwrap(),
            name: "Bob".to_string(),
            image: None,
            fact: None,
        });
        snapshot.teams.push(
            Team::new(
                TeamId::new("gulls").unwrap(),
                "Gulls",
                vec![PlayerId::new("ann").unwrap()],
            )
            .unwrap(),
        );
        snapshot
    }

    /// Appends one log event.
    pub fn event(snapshot: &mut Snapshot, player: &str, heat: &str, time_type: &str, time: &str) {
        let n = snapshot.time_logs.len();
        snapshot.time_logs.push(TimeLog {
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
}

#[cfg(test)]
mod tests {
    use super::fixtures::regatta;
    use super::*;

    #[test]
    fn players_resolve_by_id_or_name() {
        let snapshot = regatta();
        assert_eq!(find_player(&snapshot, "ann").unwrap().name, "Ann");
        assert_eq!(find_player(&snapshot, "BOB").unwrap().id.as_str(), "bob");
        assert!(find_player(&snapshot, "Cat").is_err());
    }

    #[test]
    fn duplicate_names_need_an_id() {
        let mut snapshot = regatta();
        let mut twin = snapshot.players[0].clone();
        twin.id = hb_core::PlayerId::new("ann-2").unwrap();
        snapshot.players.push(twin);

        let err = find_player(&snapshot, "Ann").unwrap_err();
        assert_eq!(
            err.to_string(),
            "more than one player matches \"Ann\"; use the id"
        );
    }

    #[test]
    fn heat_numbers_resolve_in_current_year() {
        let snapshot = regatta();
        assert_eq!(find_heat(&snapshot, "1").unwrap().id.as_str(), "h1");
        assert_eq!(find_heat(&snapshot, "h0").unwrap().year(), 2023);
        assert!(find_heat(&snapshot, "7").is_err());
    }

    #[test]
    fn subjects_prefer_players_then_teams() {
        let snapshot = regatta();
        assert_eq!(subject_id(&snapshot, "Ann").unwrap(), "ann");
        assert_eq!(subject_id(&snapshot, "gulls").unwrap(), "gulls");
        assert!(subject_id(&snapshot, "Terns").is_err());
    }

    #[test]
    fn year_defaults_to_most_recent() {
        let snapshot = regatta();
        assert_eq!(resolve_year(&snapshot, None).unwrap(), 2024);
        assert_eq!(resolve_year(&snapshot, Some(2023)).unwrap(), 2023);
        assert!(resolve_year(&Snapshot::default(), None).is_err());
    }
}
