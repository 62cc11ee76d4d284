//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hb_core::ActivityKind;

/// Live heat scoring.
///
/// Judges record start/stop events for contestants across timed activities;
/// everyone else reads the leaderboard, RPM ranking and radar comparisons.
#[derive(Debug, Parser)]
#[command(name = "hb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the database and the Beer, Sail and Spin activity types.
    Init,

    /// Manage players.
    #[command(subcommand)]
    Player(PlayerAction),

    /// Manage teams.
    #[command(subcommand)]
    Team(TeamAction),

    /// Manage heats.
    #[command(subcommand)]
    Heat(HeatAction),

    /// Inspect activity types.
    #[command(subcommand)]
    Type(TypeAction),

    /// Record a start or stop event for a player.
    ///
    /// The first event for a player in a heat starts an attempt, the next
    /// one stops it.
    Log {
        /// Player id or name.
        player: String,

        /// Activity (beer, sail or spin).
        activity: ActivityKind,

        /// Heat id or number in the current year (defaults to the current heat).
        #[arg(long)]
        heat: Option<String>,

        /// Team id or name (defaults to the player's team).
        #[arg(long)]
        team: Option<String>,

        /// Clock time HH:MM:SS[.mmm] (defaults to now).
        #[arg(long)]
        at: Option<String>,
    },

    /// Delete the most recent event logged for a player.
    Undo {
        /// Player id or name.
        player: String,

        /// Only consider this activity.
        #[arg(long)]
        activity: Option<ActivityKind>,
    },

    /// Show the current heat and who is being timed.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List competition years, most recent first.
    Years {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Fastest times for an activity.
    Leaderboard {
        /// Activity (beer, sail or spin).
        activity: ActivityKind,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Revolutions per minute ranking for an activity.
    Rpm {
        /// Activity (defaults to spin).
        #[arg(default_value = "spin")]
        activity: ActivityKind,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Radar comparison of two players or teams.
    Compare {
        /// Player or team id or name.
        left: String,

        /// Player or team id or name.
        right: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Export best times as CSV.
    Export {
        /// Activity (beer, sail or spin).
        activity: ActivityKind,

        /// Competition year (defaults to the most recent).
        #[arg(long)]
        year: Option<i32>,

        /// Export only the leaderboard entries instead of every player.
        #[arg(long)]
        top: bool,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Options shared by the ranking views.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ViewArgs {
    /// Competition year (defaults to the most recent).
    #[arg(long)]
    pub year: Option<i32>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Player management actions.
#[derive(Debug, Subcommand)]
pub enum PlayerAction {
    /// Add a player.
    Add {
        name: String,

        /// Image URL or path.
        #[arg(long)]
        image: Option<String>,

        /// Fun fact shown on the comparison card.
        #[arg(long)]
        fact: Option<String>,
    },

    /// List players.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Remove a player and their time logs.
    Rm {
        /// Player id or name.
        player: String,
    },
}

/// Team management actions.
#[derive(Debug, Subcommand)]
pub enum TeamAction {
    /// Add a team of up to four players.
    Add {
        name: String,

        /// Player id or name (repeatable).
        #[arg(long = "player")]
        players: Vec<String>,

        /// Image URL or path.
        #[arg(long)]
        image: Option<String>,
    },

    /// List teams.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Mark a team as eliminated.
    Eliminate {
        /// Team id or name.
        team: String,
    },

    /// Remove a team.
    Rm {
        /// Team id or name.
        team: String,
    },
}

/// Heat management actions.
#[derive(Debug, Subcommand)]
pub enum HeatAction {
    /// Add a heat.
    Add {
        /// Heat number.
        number: u32,

        /// Heat date (YYYY-MM-DD); the year scopes every ranking.
        #[arg(long)]
        date: NaiveDate,

        /// Display name.
        #[arg(long)]
        name: Option<String>,

        /// Make this the current heat.
        #[arg(long)]
        current: bool,
    },

    /// List heats.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the current heat, or make another one current.
    Current {
        /// Heat id or number in the most recent year.
        heat: Option<String>,

        /// Leave no heat current.
        #[arg(long, conflicts_with = "heat")]
        clear: bool,
    },

    /// Move on to the next heat of the year.
    Advance,

    /// Remove a heat and its time logs.
    Rm {
        /// Heat id or number in the most recent year.
        heat: String,
    },
}

/// Activity type actions.
#[derive(Debug, Subcommand)]
pub enum TypeAction {
    /// List activity types.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
