//! Respawn Runtime
//!
//! Boots logging, loads settings and runs the projectile simulation

mod settings;
mod simulation;

use anyhow::{Context, Result};
use settings::RuntimeSettings;
use simulation::Simulation;
use std::path::Path;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Respawn v{}", respawn_core::VERSION);

    let settings = match std::env::args().nth(1) {
        Some(path) => RuntimeSettings::load(Path::new(&path))
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => RuntimeSettings::default(),
    };
    tracing::info!(frames = settings.simulation.frames, "Starting simulation...");

    let mut simulation = Simulation::new(settings)?;
    let report = simulation.run();
    simulation.shutdown()?;

    tracing::info!(
        frames = report.frames,
        spawned = report.spawned_total,
        peak_live = report.peak_live,
        avg_tick_ms = report.average_tick_ms,
        "Simulation finished"
    );
    for (event, count) in report.events {
        tracing::info!("  {:<20} {}", event.name(), count);
    }

    Ok(())
}
