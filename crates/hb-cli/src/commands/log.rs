//! Judge actions: recording and undoing start/stop events.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use hb_core::clock::{clock_time_string, millis_to_seconds, seconds_since_midnight};
use hb_core::{
    ActivityKind, Snapshot, TimeLog, UNMEASURED, ViewError, current_heat, duration_between,
    format_duration, open_attempts, parse_clock_time, sort_logs_chronologically,
};
use hb_db::{Collection, Database, LogFilter, NewTimeLog};

use super::util::{find_heat, find_player, find_team};

/// A judge's request to log an event.
#[derive(Debug, Clone, Copy)]
pub struct LogRequest<'a> {
    pub player: &'a str,
    pub activity: ActivityKind,
    pub heat: Option<&'a str>,
    pub team: Option<&'a str>,
    pub at: Option<&'a str>,
}

/// What a recorded event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    /// Opened an attempt.
    Started { time: String },
    /// Closed the player's open attempt.
    Stopped { time: String, duration: String },
}

/// Records one event, stamped with `now` unless the request carries a clock time.
///
/// The event stops the player's open attempt in that heat if there is one,
/// otherwise it starts a new attempt.
pub fn record_time_log(
    db: &mut Database,
    snapshot: &Snapshot,
    request: LogRequest<'_>,
    now: DateTime<Local>,
) -> Result<Recorded> {
    let player = find_player(snapshot, request.player)?;
    let time_type = snapshot
        .time_type_for(request.activity)
        .ok_or(ViewError::ActivityNotFound(request.activity))?;
    let heat = match request.heat {
        Some(query) => find_heat(snapshot, query)?,
        None => current_heat(&snapshot.heats)
            .context("no heat is current; pass --heat or run `hb heat current <heat>`")?,
    };
    let team_id = match request.team {
        Some(query) => Some(find_team(snapshot, query)?.id.clone()),
        None => snapshot.team_of(&player.id).map(|t| t.id.clone()),
    };

    let (time, seconds) = match request.at {
        Some(at) => {
            let at = at.trim();
            let ms = parse_clock_time(at)?;
            (at.to_string(), millis_to_seconds(ms))
        }
        None => {
            let wall = now.time();
            (clock_time_string(wall), seconds_since_midnight(wall))
        }
    };

    let mut group = db.time_logs_where(&LogFilter {
        player_id: Some(player.id.clone()),
        heat_id: Some(heat.id.clone()),
        time_type_id: Some(time_type.id.clone()),
    })?;
    sort_logs_chronologically(&mut group);
    let open_start: Option<TimeLog> = open_attempts(&group).first().map(|log| (*log).clone());

    db.insert_time_log(&NewTimeLog {
        player_id: player.id.clone(),
        team_id,
        heat_id: heat.id.clone(),
        time_type_id: time_type.id.clone(),
        seconds,
        time: time.clone(),
        created_at: now.with_timezone(&Utc),
    })?;

    Ok(match open_start {
        Some(start) => {
            let duration = match duration_between(&start.time, &time) {
                Ok(ms) if ms >= 0 => format_duration(ms),
                _ => UNMEASURED.to_string(),
            };
            Recorded::Stopped { time, duration }
        }
        None => Recorded::Started { time },
    })
}

/// Runs `hb log`.
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    snapshot: &Snapshot,
    request: LogRequest<'_>,
) -> Result<()> {
    let recorded = record_time_log(db, snapshot, request, Local::now())?;
    let name = find_player(snapshot, request.player)?.name.as_str();
    match recorded {
        Recorded::Started { time } => {
            writeln!(writer, "{name} started {} at {time}", request.activity)?;
        }
        Recorded::Stopped { time, duration } => {
            writeln!(
                writer,
                "{name} stopped {} at {time}: {duration}",
                request.activity
            )?;
        }
    }
    Ok(())
}

/// Runs `hb undo`: deletes the player's most recently created event.
pub fn undo<W: Write>(
    writer: &mut W,
    db: &mut Database,
    snapshot: &Snapshot,
    player: &str,
    activity: Option<ActivityKind>,
) -> Result<()> {
    let player = find_player(snapshot, player)?;
    let time_type_id = match activity {
        Some(kind) => Some(
            snapshot
                .time_type_for(kind)
                .ok_or(ViewError::ActivityNotFound(kind))?
                .id
                .clone(),
        ),
        None => None,
    };

    let Some(latest) = db.latest_time_log(&player.id, time_type_id.as_ref())? else {
        writeln!(writer, "Nothing to undo for {}", player.name)?;
        return Ok(());
    };
    db.delete(Collection::TimeLogs, latest.id.as_str())?;

    let activity = snapshot
        .time_type(&latest.time_type_id)
        .map_or("?", |t| t.name.as_str());
    writeln!(
        writer,
        "Removed {} {activity} event at {}",
        player.name, latest.time
    )?;
    Ok(())
}
