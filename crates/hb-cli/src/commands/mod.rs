//! CLI subcommand implementations.

pub mod activity;
pub mod compare;
pub mod export;
pub mod heat;
pub mod init;
pub mod leaderboard;
pub mod log;
pub mod player;
pub mod status;
pub mod team;
pub mod util;
pub mod years;
