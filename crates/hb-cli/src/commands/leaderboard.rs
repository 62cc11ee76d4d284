//! Leaderboard and RPM views.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use hb_core::ranking::replay_span_ms;
use hb_core::{ActivityKind, Leaderboard, RpmBoard, Snapshot, format_duration};

use super::util::{qualified_name, resolve_year, write_json};
use crate::cli::ViewArgs;

/// Formats the fastest-time leaderboard.
pub fn format_leaderboard(board: &Leaderboard) -> String {
    let mut output = String::new();
    writeln!(output, "{} leaderboard {}", board.activity, board.year).unwrap();

    if board.entries.is_empty() {
        writeln!(output, "No {} times recorded in {}.", board.activity, board.year).unwrap();
        return output;
    }

    for entry in &board.entries {
        let name = qualified_name(&entry.names.player_name, &entry.names.team_name);
        write!(output, "{} {name}  {}", entry.medal, entry.display).unwrap();
        if let Some(number) = entry.names.heat_number {
            write!(output, "  heat {number}").unwrap();
        }
        writeln!(output).unwrap();
    }

    if let Some(span) = replay_span_ms(board.entries.iter().map(|e| &e.interval)) {
        writeln!(output, "Replay: {}", format_duration(span)).unwrap();
    }
    output
}

/// Formats the RPM ranking.
pub fn format_rpm(board: &RpmBoard) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "{} RPM {} ({} revolutions)",
        board.activity, board.year, board.revolutions
    )
    .unwrap();

    if board.entries.is_empty() {
        writeln!(output, "No {} times recorded in {}.", board.activity, board.year).unwrap();
        return output;
    }

    for entry in &board.entries {
        let name = qualified_name(&entry.names.player_name, &entry.names.team_name);
        writeln!(
            output,
            "{} {name}  {}  ({})",
            entry.medal, entry.display, entry.interval.formatted_duration
        )
        .unwrap();
    }
    output
}

/// Runs `hb leaderboard`.
pub fn run<W: Write>(
    writer: &mut W,
    snapshot: &Snapshot,
    activity: ActivityKind,
    view: ViewArgs,
    limit: usize,
) -> Result<()> {
    let year = resolve_year(snapshot, view.year)?;
    let board = hb_core::leaderboard(snapshot, activity, year, Some(limit))?;
    tracing::debug!(%activity, year, entries = board.entries.len(), "built leaderboard");

    if view.json {
        write_json(writer, &board)
    } else {
        write!(writer, "{}", format_leaderboard(&board))?;
        Ok(())
    }
}

/// Runs `hb rpm`.
pub fn run_rpm<W: Write>(
    writer: &mut W,
    snapshot: &Snapshot,
    activity: ActivityKind,
    view: ViewArgs,
    limit: usize,
) -> Result<()> {
    let year = resolve_year(snapshot, view.year)?;
    let board = hb_core::rpm_board(snapshot, activity, year, Some(limit))?;
    tracing::debug!(%activity, year, entries = board.entries.len(), "built rpm board");

    if view.json {
        write_json(writer, &board)
    } else {
        write!(writer, "{}", format_rpm(&board))?;
        Ok(())
    }
}
