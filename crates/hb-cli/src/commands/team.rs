//! Team management commands.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Result, bail};
use hb_core::Snapshot;
use hb_db::{Collection, Database, NewTeam, TeamPatch};

use super::util::{find_player, find_team, write_json};

/// Runs `hb team add`, resolving each member by id or name.
pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    snapshot: &Snapshot,
    name: &str,
    members: &[String],
    image: Option<String>,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("team name cannot be empty");
    }
    let players = members
        .iter()
        .map(|query| find_player(snapshot, query).map(|p| p.id.clone()))
        .collect::<Result<Vec<_>>>()?;

    let id = db.insert_team(&NewTeam {
        name: name.to_string(),
        players,
        image,
    })?;
    writeln!(writer, "Added team {name} ({id})")?;
    Ok(())
}

/// Formats teams with their members.
pub fn format_list(snapshot: &Snapshot) -> String {
    if snapshot.teams.is_empty() {
        return "No teams yet.\n".to_string();
    }

    let mut output = String::new();
    for team in &snapshot.teams {
        let members: Vec<&str> = team
            .members()
            .map(|id| snapshot.player(id).map_or("?", |p| p.name.as_str()))
            .collect();
        write!(output, "{}", team.name).unwrap();
        if team.eliminated {
            write!(output, " (eliminated)").unwrap();
        }
        writeln!(output, "  {}", team.id).unwrap();
        if members.is_empty() {
            writeln!(output, "    no players").unwrap();
        } else {
            writeln!(output, "    {}", members.join(", ")).unwrap();
        }
    }
    output
}

/// Runs `hb team list`.
pub fn list<W: Write>(writer: &mut W, snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        write_json(writer, &snapshot.teams)
    } else {
        write!(writer, "{}", format_list(snapshot))?;
        Ok(())
    }
}

/// Runs `hb team eliminate`.
pub fn eliminate<W: Write>(
    writer: &mut W,
    db: &mut Database,
    snapshot: &Snapshot,
    query: &str,
) -> Result<()> {
    let team = find_team(snapshot, query)?;
    db.patch_team(
        &team.id,
        &TeamPatch {
            eliminated: Some(true),
            ..TeamPatch::default()
        },
    )?;
    writeln!(writer, "Eliminated team {}", team.name)?;
    Ok(())
}

/// Runs `hb team rm`. Logs keep their player but lose the team reference.
pub fn remove<W: Write>(
    writer: &mut W,
    db: &mut Database,
    snapshot: &Snapshot,
    query: &str,
) -> Result<()> {
    let team = find_team(snapshot, query)?;
    db.delete(Collection::Teams, team.id.as_str())?;
    writeln!(writer, "Removed team {}", team.name)?;
    Ok(())
}
