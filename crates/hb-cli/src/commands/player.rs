//! Player management commands.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Result, bail};
use hb_core::Snapshot;
use hb_db::{Collection, Database, NewPlayer};

use super::util::{find_player, write_json};

/// Runs `hb player add`.
pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    name: &str,
    image: Option<String>,
    fact: Option<String>,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("player name cannot be empty");
    }
    let id = db.insert_player(&NewPlayer {
        name: name.to_string(),
        image,
        fact,
    })?;
    writeln!(writer, "Added player {name} ({id})")?;
    Ok(())
}

/// Formats the roster, one player per line with their team.
pub fn format_list(snapshot: &Snapshot) -> String {
    if snapshot.players.is_empty() {
        return "No players yet.\n".to_string();
    }

    let mut output = String::new();
    for player in &snapshot.players {
        write!(output, "{}", player.name).unwrap();
        if let Some(team) = snapshot.team_of(&player.id) {
            write!(output, " [{}]", team.name).unwrap();
        }
        writeln!(output, "  {}", player.id).unwrap();
        if let Some(fact) = &player.fact {
            writeln!(output, "    {fact}").unwrap();
        }
    }
    output
}

/// Runs `hb player list`.
pub fn list<W: Write>(writer: &mut W, snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        write_json(writer, &snapshot.players)
    } else {
        write!(writer, "{}", format_list(snapshot))?;
        Ok(())
    }
}

/// Runs `hb player rm`. The player's time logs go with them.
pub fn remove<W: Write>(
    writer: &mut W,
    db: &mut Database,
    snapshot: &Snapshot,
    query: &str,
) -> Result<()> {
    let player = find_player(snapshot, query)?;
    db.delete(Collection::Players, player.id.as_str())?;
    writeln!(writer, "Removed player {}", player.name)?;
    Ok(())
}
