//! Storage layer for heatboard.
//!
//! Provides persistence for players, teams, heats, activity types and time
//! logs using `rusqlite`, and feeds the scoring engine through
//! [`hb_core::RecordSource`].
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization (e.g. a `Mutex<Database>`).
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Record creation times are stored as TEXT in RFC 3339 with millisecond
//! precision (e.g., `2024-06-21T10:30:00.000Z`), so lexicographic order
//! matches chronological order. Heat dates are stored as `YYYY-MM-DD`.
//!
//! ## Clock Strings
//!
//! The `time` column of `time_logs` holds the judge's wall-clock stamp
//! (`HH:MM:SS.mmm`) verbatim. It is never parsed here; malformed values are
//! the engine's concern.
//!
//! ## Current Heat
//!
//! At most one heat has `is_current = 1`. [`Database::set_current_heat`]
//! clears every flag and sets the target inside one transaction.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use hb_core::{
    ActivityKind, Heat, HeatId, Player, PlayerId, RecordSource, Team, TeamId, TimeLog, TimeLogId,
    TimeType, TimeTypeId, ValidationError,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;
use uuid::Uuid;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored or submitted value failed record validation.
    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),
    /// Failed to parse a record creation timestamp.
    #[error("invalid timestamp for {record_id}: {timestamp}")]
    TimestampParse {
        record_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Failed to parse a heat date.
    #[error("invalid date for heat {heat_id}: {date}")]
    DateParse {
        heat_id: String,
        date: String,
        #[source]
        source: chrono::ParseError,
    },
    /// The targeted record does not exist.
    #[error("no {collection} with id {id}")]
    NotFound { collection: Collection, id: String },
}

/// Record collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Players,
    Teams,
    Heats,
    TimeTypes,
    TimeLogs,
}

impl Collection {
    /// Backing table name.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Players => "players",
            Self::Teams => "teams",
            Self::Heats => "heats",
            Self::TimeTypes => "time_types",
            Self::TimeLogs => "time_logs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Players => "player",
            Self::Teams => "team",
            Self::Heats => "heat",
            Self::TimeTypes => "activity type",
            Self::TimeLogs => "time log",
        };
        f.write_str(s)
    }
}

/// A player ready to be stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPlayer {
    pub name: String,
    pub image: Option<String>,
    pub fact: Option<String>,
}

/// A team ready to be stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub players: Vec<PlayerId>,
    pub image: Option<String>,
}

/// A heat ready to be stored. New heats are never current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHeat {
    pub name: Option<String>,
    pub number: u32,
    pub date: NaiveDate,
}

/// A time log ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimeLog {
    pub player_id: PlayerId,
    pub team_id: Option<TeamId>,
    pub heat_id: HeatId,
    pub time_type_id: TimeTypeId,
    pub seconds: f64,
    pub time: String,
    pub created_at: DateTime<Utc>,
}

/// Partial player update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub fact: Option<String>,
}

/// Partial team update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub eliminated: Option<bool>,
}

/// Partial heat update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeatPatch {
    pub name: Option<String>,
    pub number: Option<u32>,
    pub date: Option<NaiveDate>,
}

/// Filter for [`Database::time_logs_where`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub player_id: Option<PlayerId>,
    pub heat_id: Option<HeatId>,
    pub time_type_id: Option<TimeTypeId>,
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

const TIME_LOG_COLUMNS: &str =
    "id, player_id, team_id, heat_id, time_type_id, seconds, time, created_at";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS players (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                image TEXT,
                fact TEXT
            );

            CREATE TABLE IF NOT EXISTS teams (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                player1 TEXT,
                player2 TEXT,
                player3 TEXT,
                player4 TEXT,
                image TEXT,
                eliminated INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (player1) REFERENCES players(id) ON DELETE SET NULL,
                FOREIGN KEY (player2) REFERENCES players(id) ON DELETE SET NULL,
                FOREIGN KEY (player3) REFERENCES players(id) ON DELETE SET NULL,
                FOREIGN KEY (player4) REFERENCES players(id) ON DELETE SET NULL
            );

            -- date: YYYY-MM-DD, only the year is used for scoring
            CREATE TABLE IF NOT EXISTS heats (
                id TEXT PRIMARY KEY,
                name TEXT,
                number INTEGER NOT NULL,
                date TEXT NOT NULL,
                is_current INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_heats_current ON heats(is_current);

            CREATE TABLE IF NOT EXISTS time_types (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                key TEXT NOT NULL UNIQUE COLLATE NOCASE
            );

            -- time: judge wall clock HH:MM:SS.mmm
            -- created_at: RFC 3339, tie-break for identical clock strings
            CREATE TABLE IF NOT EXISTS time_logs (
                id TEXT PRIMARY KEY,
                player_id TEXT NOT NULL,
                team_id TEXT,
                heat_id TEXT NOT NULL,
                time_type_id TEXT NOT NULL,
                seconds REAL NOT NULL DEFAULT 0,
                time TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (player_id) REFERENCES players(id) ON DELETE CASCADE,
                FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE SET NULL,
                FOREIGN KEY (heat_id) REFERENCES heats(id) ON DELETE CASCADE,
                FOREIGN KEY (time_type_id) REFERENCES time_types(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_time_logs_player ON time_logs(player_id);
            CREATE INDEX IF NOT EXISTS idx_time_logs_heat ON time_logs(heat_id);
            CREATE INDEX IF NOT EXISTS idx_time_logs_type ON time_logs(time_type_id);
            CREATE INDEX IF NOT EXISTS idx_time_logs_created ON time_logs(created_at);
            ",
        )?;
        Ok(())
    }

    // ========== Inserts ==========

    /// Inserts a player and returns its new id.
    pub fn insert_player(&mut self, player: &NewPlayer) -> Result<PlayerId, DbError> {
        let id = PlayerId::new(new_id())?;
        self.conn.execute(
            "INSERT INTO players (id, name, image, fact) VALUES (?, ?, ?, ?)",
            params![id.as_str(), player.name, player.image, player.fact],
        )?;
        tracing::debug!(%id, name = %player.name, "inserted player");
        Ok(id)
    }

    /// Inserts a team and returns its new id.
    pub fn insert_team(&mut self, team: &NewTeam) -> Result<TeamId, DbError> {
        let id = TeamId::new(new_id())?;
        let validated = Team::new(id.clone(), team.name.clone(), team.players.clone())?;
        let slot = |i: usize| validated.players[i].as_ref().map(PlayerId::as_str);
        self.conn.execute(
            "
            INSERT INTO teams (id, name, player1, player2, player3, player4, image, eliminated)
            VALUES (?, ?, ?, ?, ?, ?, ?, 0)
            ",
            params![
                id.as_str(),
                team.name,
                slot(0),
                slot(1),
                slot(2),
                slot(3),
                team.image
            ],
        )?;
        tracing::debug!(%id, name = %team.name, "inserted team");
        Ok(id)
    }

    /// Inserts a heat and returns its new id.
    pub fn insert_heat(&mut self, heat: &NewHeat) -> Result<HeatId, DbError> {
        let id = HeatId::new(new_id())?;
        self.conn.execute(
            "INSERT INTO heats (id, name, number, date, is_current) VALUES (?, ?, ?, ?, 0)",
            params![id.as_str(), heat.name, heat.number, format_date(heat.date)],
        )?;
        tracing::debug!(%id, number = heat.number, "inserted heat");
        Ok(id)
    }

    /// Inserts an activity type and returns its new id.
    pub fn insert_time_type(&mut self, name: &str, key: &str) -> Result<TimeTypeId, DbError> {
        let id = TimeTypeId::new(new_id())?;
        self.conn.execute(
            "INSERT INTO time_types (id, name, key) VALUES (?, ?, ?)",
            params![id.as_str(), name, key],
        )?;
        Ok(id)
    }

    /// Inserts one activity type per [`ActivityKind`], skipping existing keys.
    ///
    /// Keys compare case-insensitively, matching how they are dispatched.
    ///
    /// Returns the number of types created.
    pub fn seed_time_types(&mut self) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO time_types (id, name, key) VALUES (?, ?, ?)")?;
            for kind in ActivityKind::ALL {
                inserted += stmt.execute(params![new_id(), kind.as_str(), kind.as_str()])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Inserts a time log and returns its new id.
    pub fn insert_time_log(&mut self, log: &NewTimeLog) -> Result<TimeLogId, DbError> {
        let id = TimeLogId::new(new_id())?;
        self.conn.execute(
            "
            INSERT INTO time_logs (id, player_id, team_id, heat_id, time_type_id, seconds, time, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                id.as_str(),
                log.player_id.as_str(),
                log.team_id.as_ref().map(TeamId::as_str),
                log.heat_id.as_str(),
                log.time_type_id.as_str(),
                log.seconds,
                log.time,
                format_timestamp(log.created_at),
            ],
        )?;
        tracing::debug!(%id, player = %log.player_id, time = %log.time, "inserted time log");
        Ok(id)
    }

    // ========== Patches ==========

    /// Updates the given player fields.
    pub fn patch_player(&mut self, id: &PlayerId, patch: &PlayerPatch) -> Result<(), DbError> {
        let changed = self.conn.execute(
            "
            UPDATE players SET
                name = COALESCE(?, name),
                image = COALESCE(?, image),
                fact = COALESCE(?, fact)
            WHERE id = ?
            ",
            params![patch.name, patch.image, patch.fact, id.as_str()],
        )?;
        ensure_found(changed, Collection::Players, id.as_str())
    }

    /// Updates the given team fields.
    pub fn patch_team(&mut self, id: &TeamId, patch: &TeamPatch) -> Result<(), DbError> {
        let changed = self.conn.execute(
            "
            UPDATE teams SET
                name = COALESCE(?, name),
                image = COALESCE(?, image),
                eliminated = COALESCE(?, eliminated)
            WHERE id = ?
            ",
            params![patch.name, patch.image, patch.eliminated, id.as_str()],
        )?;
        ensure_found(changed, Collection::Teams, id.as_str())
    }

    /// Updates the given heat fields. The current flag has its own write path.
    pub fn patch_heat(&mut self, id: &HeatId, patch: &HeatPatch) -> Result<(), DbError> {
        let changed = self.conn.execute(
            "
            UPDATE heats SET
                name = COALESCE(?, name),
                number = COALESCE(?, number),
                date = COALESCE(?, date)
            WHERE id = ?
            ",
            params![
                patch.name,
                patch.number,
                patch.date.map(format_date),
                id.as_str()
            ],
        )?;
        ensure_found(changed, Collection::Heats, id.as_str())
    }

    /// Makes `id` the only current heat.
    ///
    /// Every other heat is unset first, in the same transaction. If `id` does
    /// not exist nothing changes.
    pub fn set_current_heat(&mut self, id: &HeatId) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        let cleared = tx.execute("UPDATE heats SET is_current = 0 WHERE is_current = 1", [])?;
        let set = tx.execute(
            "UPDATE heats SET is_current = 1 WHERE id = ?",
            [id.as_str()],
        )?;
        ensure_found(set, Collection::Heats, id.as_str())?;
        tx.commit()?;
        tracing::debug!(%id, cleared, "set current heat");
        Ok(())
    }

    /// Leaves no heat current.
    pub fn clear_current_heat(&mut self) -> Result<(), DbError> {
        self.conn
            .execute("UPDATE heats SET is_current = 0 WHERE is_current = 1", [])?;
        Ok(())
    }

    // ========== Deletes ==========

    /// Deletes a record by id.
    ///
    /// Deleting a player, heat or activity type also deletes its time logs.
    /// Deleting a team or player empties the slots and log references that
    /// pointed at it.
    pub fn delete(&mut self, collection: Collection, id: &str) -> Result<(), DbError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", collection.table());
        let deleted = self.conn.execute(&sql, [id])?;
        ensure_found(deleted, collection, id)?;
        tracing::debug!(%collection, id, "deleted record");
        Ok(())
    }

    // ========== Reads ==========

    /// The most recently created time log for a player, optionally for one activity.
    pub fn latest_time_log(
        &self,
        player_id: &PlayerId,
        time_type_id: Option<&TimeTypeId>,
    ) -> Result<Option<TimeLog>, DbError> {
        let sql = format!(
            "
            SELECT {TIME_LOG_COLUMNS}
            FROM time_logs
            WHERE player_id = ?1 AND (?2 IS NULL OR time_type_id = ?2)
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "
        );
        let row = self
            .conn
            .query_row(
                &sql,
                params![player_id.as_str(), time_type_id.map(TimeTypeId::as_str)],
                time_log_row,
            )
            .optional()?;
        row.map(TimeLogRow::into_time_log).transpose()
    }

    /// Time logs matching `filter`, in creation order.
    pub fn time_logs_where(&self, filter: &LogFilter) -> Result<Vec<TimeLog>, DbError> {
        let sql = format!(
            "
            SELECT {TIME_LOG_COLUMNS}
            FROM time_logs
            WHERE (?1 IS NULL OR player_id = ?1)
              AND (?2 IS NULL OR heat_id = ?2)
              AND (?3 IS NULL OR time_type_id = ?3)
            ORDER BY created_at ASC, id ASC
            "
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                filter.player_id.as_ref().map(PlayerId::as_str),
                filter.heat_id.as_ref().map(HeatId::as_str),
                filter.time_type_id.as_ref().map(TimeTypeId::as_str),
            ],
            time_log_row,
        )?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?.into_time_log()?);
        }
        Ok(logs)
    }
}

impl RecordSource for Database {
    type Error = DbError;

    /// Lists players ordered by name.
    fn players(&self) -> Result<Vec<Player>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, image, fact FROM players ORDER BY name ASC, id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;
        let mut players = Vec::new();
        for row in rows {
            let (id, name, image, fact) = row?;
            players.push(Player {
                id: PlayerId::new(id)?,
                name,
                image,
                fact,
            });
        }
        Ok(players)
    }

    /// Lists teams ordered by name.
    fn teams(&self) -> Result<Vec<Team>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, name, player1, player2, player3, player4, image, eliminated
            FROM teams
            ORDER BY name ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                [
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ],
                row.get::<_, Option<String>>(6)?,
                row.get::<_, bool>(7)?,
            ))
        })?;
        let mut teams = Vec::new();
        for row in rows {
            let (id, name, slots, image, eliminated) = row?;
            let [p1, p2, p3, p4] = slots.map(|slot| slot.map(PlayerId::new).transpose());
            teams.push(Team {
                id: TeamId::new(id)?,
                name,
                players: [p1?, p2?, p3?, p4?],
                image,
                eliminated,
            });
        }
        Ok(teams)
    }

    /// Lists heats ordered by date then number.
    fn heats(&self) -> Result<Vec<Heat>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, name, number, date, is_current
            FROM heats
            ORDER BY date ASC, number ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, bool>(4)?,
            ))
        })?;
        let mut heats = Vec::new();
        for row in rows {
            let (id, name, number, date, is_current) = row?;
            let date = parse_date(&date, &id)?;
            heats.push(Heat {
                id: HeatId::new(id)?,
                name,
                number,
                date,
                is_current,
            });
        }
        Ok(heats)
    }

    /// Lists activity types ordered by name.
    fn time_types(&self) -> Result<Vec<TimeType>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, key FROM time_types ORDER BY name ASC, id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut types = Vec::new();
        for row in rows {
            let (id, name, key) = row?;
            types.push(TimeType {
                id: TimeTypeId::new(id)?,
                name,
                key,
            });
        }
        Ok(types)
    }

    /// Lists every time log in creation order.
    fn time_logs(&self) -> Result<Vec<TimeLog>, DbError> {
        self.time_logs_where(&LogFilter::default())
    }
}

/// A time log row before id validation.
struct TimeLogRow {
    id: String,
    player_id: String,
    team_id: Option<String>,
    heat_id: String,
    time_type_id: String,
    seconds: f64,
    time: String,
    created_at: String,
}

impl TimeLogRow {
    fn into_time_log(self) -> Result<TimeLog, DbError> {
        let created_at = parse_timestamp(&self.created_at, &self.id)?;
        Ok(TimeLog {
            id: TimeLogId::new(self.id)?,
            player_id: PlayerId::new(self.player_id)?,
            team_id: self.team_id.map(TeamId::new).transpose()?,
            heat_id: HeatId::new(self.heat_id)?,
            time_type_id: TimeTypeId::new(self.time_type_id)?,
            seconds: self.seconds,
            time: self.time,
            created_at,
        })
    }
}

fn time_log_row(row: &Row<'_>) -> rusqlite::Result<TimeLogRow> {
    Ok(TimeLogRow {
        id: row.get(0)?,
        player_id: row.get(1)?,
        team_id: row.get(2)?,
        heat_id: row.get(3)?,
        time_type_id: row.get(4)?,
        seconds: row.get(5)?,
        time: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn ensure_found(changed: usize, collection: Collection, id: &str) -> Result<(), DbError> {
    if changed == 0 {
        return Err(DbError::NotFound {
            collection,
            id: id.to_string(),
        });
    }
    Ok(())
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn parse_timestamp(timestamp: &str, record_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            record_id: record_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_date(date: &str, heat_id: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|source| DbError::DateParse {
        heat_id: heat_id.to_string(),
        date: date.to_string(),
        source,
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
