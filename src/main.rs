//! Brave Octothorpe entry point
//!
//! Headless driver: runs the simulation at a fixed timestep with the demo
//! autopilot at the controls and logs what happens.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use brave_octothorpe::consts::TITLE;
use brave_octothorpe::sim::{Autopilot, GameEvent, GameState, TickInput, tick};
use brave_octothorpe::{LevelBook, Settings};

#[derive(Debug, Parser)]
#[command(name = "brave-octothorpe", about = "Collect the word, dodge the hazards, deliver the mail")]
struct Args {
    /// Level book (JSON); defaults to the built-in levels
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Settings file (JSON); defaults are used if missing or invalid
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 2000)]
    ticks: u64,
    /// Autopilot seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Print the final render snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("{} (headless) starting...", TITLE);

    let settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    let levels = match &args.levels {
        Some(path) => LevelBook::load(path)
            .with_context(|| format!("loading levels from {}", path.display()))?,
        None => LevelBook::builtin(),
    };

    let dt = settings.tick_seconds();
    let mut state = GameState::new(settings, levels);
    let mut pilot = Autopilot::new(args.seed);
    log::info!("Autopilot seed: {}", args.seed);

    for step in 0..=args.ticks {
        let input = if step == args.ticks {
            TickInput {
                quit: true,
                ..Default::default()
            }
        } else {
            pilot.next_input(&state)
        };
        tick(&mut state, &input, dt);

        for event in state.drain_events() {
            match event {
                GameEvent::LetterCollected { letter, completed } => {
                    log::debug!("Collected {:?} ({})", letter, completed)
                }
                GameEvent::HazardArmed { letter } => log::info!("Hazard: {:?}", letter),
                GameEvent::WordCompleted { message } => {
                    log::info!("'{}' complete, carry the mail home", message)
                }
                GameEvent::QuitRequested { level } => {
                    println!("You reached level {}. Goodbye!", level);
                }
                other => log::debug!("{:?}", other),
            }
        }
    }

    if args.snapshot {
        let json = serde_json::to_string_pretty(&state.snapshot())
            .context("serializing snapshot")?;
        println!("{}", json);
    }

    Ok(())
}
