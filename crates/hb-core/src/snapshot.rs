//! Read seam to the record store.
//!
//! Projections run over a [`Snapshot`]: whatever records the store held when
//! it was fetched. The engine never calls back into the store while ranking.

use crate::activity::ActivityKind;
use crate::model::{Heat, Player, Team, TimeLog, TimeType};
use crate::types::{HeatId, PlayerId, TeamId, TimeTypeId};

/// A source of competition records.
///
/// This trait lets the engine load from different backends
/// (e.g., the SQLite store in hb-db, or in-memory fixtures).
pub trait RecordSource {
    type Error;

    fn players(&self) -> Result<Vec<Player>, Self::Error>;

    fn teams(&self) -> Result<Vec<Team>, Self::Error>;

    fn heats(&self) -> Result<Vec<Heat>, Self::Error>;

    fn time_types(&self) -> Result<Vec<TimeType>, Self::Error>;

    /// Returns every time log, in store order.
    fn time_logs(&self) -> Result<Vec<TimeLog>, Self::Error>;
}

/// An in-memory copy of every collection.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
    pub heats: Vec<Heat>,
    pub time_types: Vec<TimeType>,
    pub time_logs: Vec<TimeLog>,
}

impl Snapshot {
    /// Fetches all collections from `source`.
    pub fn load<S: RecordSource>(source: &S) -> Result<Self, S::Error> {
        let snapshot = Self {
            players: source.players()?,
            teams: source.teams()?,
            heats: source.heats()?,
            time_types: source.time_types()?,
            time_logs: source.time_logs()?,
        };
        tracing::debug!(
            players = snapshot.players.len(),
            teams = snapshot.teams.len(),
            heats = snapshot.heats.len(),
            logs = snapshot.time_logs.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }

    pub fn heat(&self, id: &HeatId) -> Option<&Heat> {
        self.heats.iter().find(|h| &h.id == id)
    }

    pub fn time_type(&self, id: &TimeTypeId) -> Option<&TimeType> {
        self.time_types.iter().find(|t| &t.id == id)
    }

    /// Resolves an activity by kind, matching on the machine key.
    pub fn time_type_for(&self, kind: ActivityKind) -> Option<&TimeType> {
        self.time_types
            .iter()
            .find(|t| t.key.parse::<ActivityKind>().is_ok_and(|k| k == kind))
    }

    /// First team whose slots hold `player`.
    pub fn team_of(&self, player: &PlayerId) -> Option<&Team> {
        self.teams.iter().find(|t| t.has_member(player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        time_types: Vec<TimeType>,
    }

    impl RecordSource for Fixture {
        type Error = std::convert::Infallible;

        fn players(&self) -> Result<Vec<Player>, Self::Error> {
            Ok(Vec::new())
        }

        fn teams(&self) -> Result<Vec<Team>, Self::Error> {
            Ok(Vec::new())
        }

        fn heats(&self) -> Result<Vec<Heat>, Self::Error> {
            Ok(Vec::new())
        }

        fn time_types(&self) -> Result<Vec<TimeType>, Self::Error> {
            Ok(self.time_types.clone())
        }

        fn time_logs(&self) -> Result<Vec<TimeLog>, Self::Error> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn resolves_activity_by_key_not_id() {
        let fixture = Fixture {
            time_types: vec![
                TimeType {
                    id: TimeTypeId::new("k57a").unwrap(),
                    name: "Sailing".to_string(),
                    key: "sail".to_string(),
                },
                TimeType {
                    id: TimeTypeId::new("k57b").unwrap(),
                    name: "Beer".to_string(),
                    key: "Beer".to_string(),
                },
            ],
        };
        let snapshot = Snapshot::load(&fixture).unwrap();

        let sail = snapshot.time_type_for(ActivityKind::Sail).unwrap();
        assert_eq!(sail.id.as_str(), "k57a");
        assert!(snapshot.time_type_for(ActivityKind::Spin).is_none());
    }

    #[test]
    fn missing_references_are_none() {
        let snapshot = Snapshot::default();
        assert!(snapshot.player(&PlayerId::new("ghost").unwrap()).is_none());
        assert!(snapshot.heat(&HeatId::new("h0").unwrap()).is_none());
        assert!(snapshot.team_of(&PlayerId::new("ghost").unwrap()).is_none());
    }
}
