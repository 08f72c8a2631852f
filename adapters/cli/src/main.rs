#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Crystal Defence session headless.
//!
//! The adapter builds a [`Simulation`] from an optional TOML scenario, places
//! any requested defenders, then ticks at a fixed frame rate for the requested
//! number of seconds while logging session events through `tracing`.

mod placement;
mod scenario;

use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;
use crystal_defence_core::{Event, SessionEndCause, SpeedMultiplier, WELCOME_BANNER};
use crystal_defence_simulation::Simulation;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{placement::PlacementOrder, scenario::Scenario};

/// Headless Crystal Defence runner.
#[derive(Debug, Parser)]
#[command(name = "crystal-defence", version, about)]
struct Args {
    /// TOML scenario describing the session configuration and opening defenders.
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Simulated seconds to run before printing the summary.
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,
    /// Fixed frame rate used to step the simulation.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Overrides the scenario's random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Runs the session at twice real-time speed.
    #[arg(long)]
    double_speed: bool,
    /// Places a defender before the first tick, as `variant:x:y`. Repeatable.
    #[arg(long = "place", value_name = "VARIANT:X:Y")]
    placements: Vec<PlacementOrder>,
}

/// Counters accumulated from the event feed while the session runs.
#[derive(Debug, Default)]
struct RunTally {
    kills: u32,
    breaches: u32,
    defenders_lost: u32,
    ended: Option<SessionEndCause>,
}

impl RunTally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::HostileKilled { .. } => self.kills += 1,
                Event::HostileBreached { .. } => self.breaches += 1,
                Event::DefenderDestroyed { .. } => self.defenders_lost += 1,
                Event::WaveAdvanced { wave } => info!(wave, "wave started"),
                Event::SessionEnded { cause } => self.ended = Some(*cause),
                _ => {}
            }
        }
    }
}

/// Entry point for the Crystal Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    ensure!(args.fps > 0, "--fps must be positive");
    ensure!(
        args.seconds.is_finite() && args.seconds >= 0.0,
        "--seconds must be a non-negative number"
    );

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::from_path(path)?,
        None => Scenario::default(),
    };
    if let Some(seed) = args.seed {
        scenario.simulation.rng_seed = seed;
    }

    println!("{WELCOME_BANNER}");
    let mut simulation = Simulation::new(&scenario.simulation);
    if args.double_speed {
        simulation.set_speed(SpeedMultiplier::Double);
    }
    for order in scenario.defenders.iter().chain(&args.placements) {
        if !simulation.place_defender(order.variant, order.x, order.y) {
            warn!(
                variant = order.variant,
                x = order.x,
                y = order.y,
                "defender placement rejected"
            );
        }
    }

    let delta = 1.0 / args.fps as f32;
    let frames = (args.seconds * args.fps as f32).round() as u64;
    let mut tally = RunTally::default();
    for _ in 0..frames {
        simulation.advance_simulation(delta);
        tally.record(&simulation.drain_events());
        if !simulation.is_active() {
            break;
        }
    }
    tally.record(&simulation.drain_events());

    let session = simulation.session();
    println!(
        "frame {} | wave {} | gold {} | crystal level {} ({:.0}/{:.0} hp, {:.0} shield)",
        session.frame,
        session.wave,
        session.gold,
        session.crystal.level,
        session.crystal.health,
        session.crystal.max_health,
        session.crystal.shield,
    );
    println!(
        "kills {} | breaches {} | defenders {} ({} lost) | hostiles on field {}",
        tally.kills,
        tally.breaches,
        simulation.defenders().len(),
        tally.defenders_lost,
        simulation.hostiles().len(),
    );
    match tally.ended {
        Some(SessionEndCause::CrystalDestroyed) => println!("The crystal was destroyed."),
        Some(SessionEndCause::BossBreach) => println!("A boss reached the crystal."),
        None => println!("The crystal still stands."),
    }

    Ok(())
}
