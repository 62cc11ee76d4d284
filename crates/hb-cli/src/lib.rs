//! Heatboard CLI library.
//!
//! This crate provides the judge and spectator commands for heatboard.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, HeatAction, PlayerAction, TeamAction, TypeAction, ViewArgs};
pub use config::Config;
