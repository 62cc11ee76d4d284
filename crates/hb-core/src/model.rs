//! Competition records as read from the store.
//!
//! The engine never mutates these; judge and admin writes go through the
//! store directly.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{HeatId, PlayerId, TeamId, TimeLogId, TimeTypeId, ValidationError};

/// Number of player slots on a team.
pub const TEAM_SLOTS: usize = 4;

/// A contestant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Free-text fun fact shown on the comparison card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact: Option<String>,
}

/// A team of up to four players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Player slots; any of them may be empty.
    pub players: [Option<PlayerId>; TEAM_SLOTS],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub eliminated: bool,
}

impl Team {
    /// Creates a team, filling slots in order.
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        members: Vec<PlayerId>,
    ) -> Result<Self, ValidationError> {
        if members.len() > TEAM_SLOTS {
            return Err(ValidationError::TooManyTeamMembers {
                max: TEAM_SLOTS,
                count: members.len(),
            });
        }
        let mut players: [Option<PlayerId>; TEAM_SLOTS] = Default::default();
        for (slot, member) in players.iter_mut().zip(members) {
            *slot = Some(member);
        }
        Ok(Self {
            id,
            name: name.into(),
            players,
            image: None,
            eliminated: false,
        })
    }

    /// Iterates the filled slots.
    pub fn members(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter().flatten()
    }

    /// Whether the player occupies one of this team's slots.
    pub fn has_member(&self, player: &PlayerId) -> bool {
        self.members().any(|p| p == player)
    }
}

/// One timed round of the competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heat {
    pub id: HeatId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Heat number; repeats across years.
    pub number: u32,
    /// Calendar date, only used to derive the competition year.
    pub date: NaiveDate,
    #[serde(default)]
    pub is_current: bool,
}

impl Heat {
    /// Competition year this heat belongs to.
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// An activity type ("time type") record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeType {
    pub id: TimeTypeId,
    /// Canonical short name, e.g. "Beer".
    pub name: String,
    /// Machine key used for dispatch; see [`crate::ActivityKind`].
    pub key: String,
}

/// One recorded start-or-stop event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLog {
    pub id: TimeLogId,
    pub player_id: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    pub heat_id: HeatId,
    pub time_type_id: TimeTypeId,
    /// Seconds since midnight. Informational only.
    pub seconds: f64,
    /// Wall-clock string `HH:MM:SS[.mmm]` used for ordering and differencing.
    pub time: String,
    /// Store creation time, the tie-break for identical clock strings.
    pub created_at: DateTime<Utc>,
}
