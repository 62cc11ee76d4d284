use anyhow::{Context, Result};
use clap::Parser;
use hb_core::Snapshot;
use tracing_subscriber::EnvFilter;

use hb_cli::commands::{
    activity, compare, export, heat, init, leaderboard, log, player, status, team, years,
};
use hb_cli::{Cli, Commands, Config, HeatAction, PlayerAction, TeamAction, TypeAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(cli: &Cli) -> Result<(hb_db::Database, Config)> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = hb_db::Database::open(&config.database_path).with_context(|| {
        format!("failed to open database {}", config.database_path.display())
    })?;
    Ok((db, config))
}

fn load_snapshot(db: &hb_db::Database) -> Result<Snapshot> {
    Snapshot::load(db).context("failed to read records")
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: tests may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(&cli)?;
    let snapshot = load_snapshot(&db)?;
    let mut out = std::io::stdout().lock();

    match command {
        Commands::Init => init::run(&mut out, &mut db, &config.database_path)?,
        Commands::Player(action) => match action {
            PlayerAction::Add { name, image, fact } => {
                player::add(&mut out, &mut db, name, image.clone(), fact.clone())?;
            }
            PlayerAction::List { json } => player::list(&mut out, &snapshot, *json)?,
            PlayerAction::Rm { player: query } => {
                player::remove(&mut out, &mut db, &snapshot, query)?;
            }
        },
        Commands::Team(action) => match action {
            TeamAction::Add {
                name,
                players,
                image,
            } => team::add(&mut out, &mut db, &snapshot, name, players, image.clone())?,
            TeamAction::List { json } => team::list(&mut out, &snapshot, *json)?,
            TeamAction::Eliminate { team: query } => {
                team::eliminate(&mut out, &mut db, &snapshot, query)?;
            }
            TeamAction::Rm { team: query } => team::remove(&mut out, &mut db, &snapshot, query)?,
        },
        Commands::Heat(action) => match action {
            HeatAction::Add {
                number,
                date,
                name,
                current,
            } => heat::add(&mut out, &mut db, *number, *date, name.clone(), *current)?,
            HeatAction::List { json } => heat::list(&mut out, &snapshot, *json)?,
            HeatAction::Current { heat: target, clear } => {
                heat::current(&mut out, &mut db, &snapshot, target.as_deref(), *clear)?;
            }
            HeatAction::Advance => heat::advance(&mut out, &mut db, &snapshot)?,
            HeatAction::Rm { heat: query } => heat::remove(&mut out, &mut db, &snapshot, query)?,
        },
        Commands::Type(TypeAction::List { json }) => activity::list(&mut out, &snapshot, *json)?,
        Commands::Log {
            player: query,
            activity,
            heat: heat_query,
            team: team_query,
            at,
        } => {
            let request = log::LogRequest {
                player: query,
                activity: *activity,
                heat: heat_query.as_deref(),
                team: team_query.as_deref(),
                at: at.as_deref(),
            };
            log::run(&mut out, &mut db, &snapshot, request)?;
        }
        Commands::Undo {
            player: query,
            activity,
        } => log::undo(&mut out, &mut db, &snapshot, query, *activity)?,
        Commands::Status { json } => status::run(&mut out, &snapshot, *json)?,
        Commands::Years { json } => years::run(&mut out, &snapshot, *json)?,
        Commands::Leaderboard { activity, view } => {
            leaderboard::run(&mut out, &snapshot, *activity, *view, config.leaderboard_size)?;
        }
        Commands::Rpm { activity, view } => {
            leaderboard::run_rpm(&mut out, &snapshot, *activity, *view, config.leaderboard_size)?;
        }
        Commands::Compare { left, right, view } => {
            compare::run(&mut out, &snapshot, left, right, *view)?;
        }
        Commands::Export {
            activity,
            year,
            top,
            output,
        } => {
            let limit = top.then_some(config.leaderboard_size);
            export::run(
                &mut out,
                &snapshot,
                *activity,
                *year,
                limit,
                output.as_deref(),
            )?;
        }
    }

    Ok(())
}
