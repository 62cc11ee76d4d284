//! Core scoring logic for heatboard.
//!
//! This crate contains the fundamental types and logic for:
//! - Clock codec: parsing judges' `HH:MM:SS.mmm` stamps and formatting durations
//! - Interval reconstruction: pairing start/stop logs per player and heat
//! - Best-time selection: one fastest attempt per player
//! - Ranking projections: leaderboard, RPM and radar comparison views
//! - Export: CSV rendering of any interval set
//!
//! Everything here is pure: callers fetch a [`Snapshot`] from a
//! [`RecordSource`] and project it.

pub mod activity;
mod best;
pub mod clock;
mod export;
pub mod heat;
mod interval;
pub mod model;
pub mod ranking;
mod snapshot;
pub mod types;

pub use activity::{ActivityKind, PerformanceScale, UnknownActivityKind, performance_score};
pub use best::{LEADERBOARD_SIZE, best_intra_heat_for_player, best_per_player, group_by_heat};
pub use clock::{ClockError, duration_between, format_duration, parse_clock_time};
pub use export::{CSV_HEADER, ExportError, to_csv};
pub use heat::{current_heat, get_unique_years_given_heats, latest_year, logs_for_year, next_heat};
pub use interval::{
    Interval, UNMEASURED, open_attempts, reconstruct_intervals, sort_logs_chronologically,
    split_by_heat,
};
pub use model::{Heat, Player, TEAM_SLOTS, Team, TimeLog, TimeType};
pub use ranking::{
    Comparison, Leaderboard, LeaderboardEntry, REVOLUTIONS, RpmBoard, RpmEntry, Subject,
    SubjectCard, UNMEASURED_RPM, ViewError, compare, leaderboard, rpm_board,
};
pub use snapshot::{RecordSource, Snapshot};
pub use types::{HeatId, PlayerId, TeamId, TimeLogId, TimeTypeId, ValidationError};
