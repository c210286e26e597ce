#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for PathX.
//!
//! Everything playable lives in the library crates; this binary is the thin
//! shell that loads files, drives a session, and prints what happened.

mod level_transfer;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pathx_core::{Command, Event};
use pathx_level::Level;
use pathx_world::{apply, query, Session};

#[derive(Parser)]
#[command(name = "pathx", about = "Inspect and drive PathX level and record files")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Print a summary of a level file.
    Inspect {
        /// Path to the level file.
        level: PathBuf,
    },
    /// Check a level file's cross-references, exiting nonzero on failure.
    Validate {
        /// Path to the level file.
        level: PathBuf,
    },
    /// Print the reference transaction sequence for a staged session.
    Plan {
        /// Path to the snake layout file.
        snake: PathBuf,
        /// Path to the level file the session is staged on.
        #[arg(long)]
        level: PathBuf,
        /// Seed for the deterministic tile shuffle.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Replay the reference sequence through a session and print the events.
    Replay {
        /// Path to the snake layout file.
        snake: PathBuf,
        /// Path to the level file the session is staged on.
        #[arg(long)]
        level: PathBuf,
        /// Seed for the deterministic tile shuffle.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print the player record table.
    Records {
        /// Path to the player records file.
        records: PathBuf,
    },
    /// Encode or decode one-line level transfer strings.
    Transfer {
        #[command(subcommand)]
        action: TransferAction,
    },
}

#[derive(Subcommand)]
enum TransferAction {
    /// Encode a level file into a transfer string.
    Encode {
        /// Path to the level file.
        level: PathBuf,
    },
    /// Decode a transfer string and print the level summary.
    Decode {
        /// The transfer string to decode.
        payload: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        CliCommand::Inspect { level } => {
            let level = load_level(&level)?;
            print_level(&level);
        }
        CliCommand::Validate { level: path } => {
            let level = load_level(&path)?;
            level
                .validate()
                .with_context(|| format!("level {} failed validation", path.display()))?;
            println!("{} is valid", path.display());
        }
        CliCommand::Plan { snake, level, seed } => {
            let session = stage_session(&snake, &level, seed)?;
            print_plan(&session);
        }
        CliCommand::Replay { snake, level, seed } => {
            let mut session = stage_session(&snake, &level, seed)?;
            replay(&mut session)?;
        }
        CliCommand::Records { records } => {
            let records = pathx_storage::load_records(&records)
                .with_context(|| format!("could not load records from {}", records.display()))?;
            print_records(&records);
        }
        CliCommand::Transfer { action } => match action {
            TransferAction::Encode { level } => {
                let level = load_level(&level)?;
                let encoded = level_transfer::encode(&level)?;
                println!("{encoded}");
            }
            TransferAction::Decode { payload } => {
                let level = level_transfer::decode(&payload)?;
                print_level(&level);
            }
        },
    }
    Ok(())
}

fn load_level(path: &Path) -> Result<Level> {
    pathx_storage::load_level(path)
        .with_context(|| format!("could not load level from {}", path.display()))
}

fn stage_session(snake: &Path, level: &Path, seed: u64) -> Result<Session> {
    let level = load_level(level)?;
    let layout = pathx_storage::load_snake(snake)
        .with_context(|| format!("could not load snake layout from {}", snake.display()))?;
    Session::new(level, layout, seed).context("could not stage the session")
}

fn print_level(level: &Level) {
    println!("level: {}", level.name());
    println!("background: {}", level.background_image());
    println!(
        "start: intersection {} ({})",
        level.start().get(),
        level.starting_location_image(),
    );
    println!(
        "destination: intersection {} ({})",
        level.destination().get(),
        level.destination_image(),
    );
    println!(
        "money: ${}  police: {}  bandits: {}  zombies: {}",
        level.money(),
        level.num_police(),
        level.num_bandits(),
        level.num_zombies(),
    );
    println!("intersections: {}", level.intersections().len());
    for (index, intersection) in level.intersections().iter().enumerate() {
        println!(
            "  [{index}] ({}, {}) {}",
            intersection.x(),
            intersection.y(),
            if intersection.is_open() { "open" } else { "closed" },
        );
    }
    println!("roads: {}", level.roads().len());
    for road in level.roads() {
        println!(
            "  {} {} {} at {} mph",
            road.from().get(),
            if road.is_one_way() { "->" } else { "<->" },
            road.to().get(),
            road.speed_limit(),
        );
    }
}

fn print_plan(session: &Session) {
    let snake = query::snake(session);
    println!(
        "algorithm: {}  tiles: {}  grid: {}x{}",
        snake.algorithm(),
        snake.len(),
        snake.columns(),
        snake.rows(),
    );
    let ids: Vec<u32> = query::tile_view(session)
        .into_iter()
        .map(|snapshot| snapshot.id.get())
        .collect();
    println!("shuffled order: {ids:?}");
    for (step, transaction) in query::transactions(session).iter().enumerate() {
        println!(
            "  step {step}: swap {} with {}",
            transaction.from_index(),
            transaction.to_index(),
        );
    }
}

fn replay(session: &mut Session) -> Result<()> {
    let transactions = query::transactions(session).to_vec();
    let mut events = Vec::new();
    for transaction in transactions {
        apply(
            session,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
        apply(
            session,
            Command::RequestSwap {
                first: transaction.from_index(),
                second: transaction.to_index(),
            },
            &mut events,
        );
    }

    for event in &events {
        match event {
            Event::SwapApplied {
                first,
                second,
                progress,
            } => println!("swap {first} <-> {second} applied ({progress} done)"),
            Event::SwapRejected {
                first,
                second,
                mistakes,
            } => println!("swap {first} <-> {second} rejected ({mistakes} mistakes)"),
            Event::SwapUndone { first, second, .. } => {
                println!("swap {first} <-> {second} undone");
            }
            Event::SortCompleted { outcome } => println!(
                "sorted in {:?} with {} mistakes{}",
                outcome.elapsed,
                outcome.mistakes,
                if outcome.is_perfect() { " - perfect" } else { "" },
            ),
            Event::TimeAdvanced { .. } => {}
        }
    }

    if !query::is_complete(session) {
        bail!("replay finished without completing the session");
    }
    Ok(())
}

fn print_records(records: &pathx_system_records::PlayerRecords) {
    if records.is_empty() {
        println!("no levels played yet");
        return;
    }
    for (level_name, record) in records.iter() {
        let fastest = record
            .fastest_perfect_win()
            .map_or_else(|| "-".to_owned(), |elapsed| format!("{elapsed:?}"));
        println!(
            "{level_name}: {} played {}, won {}, perfect {}, fastest perfect {fastest}",
            record.algorithm(),
            record.games_played(),
            record.wins(),
            record.perfect_wins(),
        );
    }
}
