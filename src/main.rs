//! Arcade Physics headless runner
//!
//! Loads a scenario, drives it through the fixed-timestep stepper for a
//! number of frames and reports what is left.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use arcade_physics::{Scenario, Settings, TimestepPreset};

#[derive(Parser, Debug)]
#[command(version, about = "Run a polygon physics scenario headlessly")]
struct Args {
    /// Scenario JSON file (built-in arena when omitted)
    scenario: Option<PathBuf>,

    /// Runner settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Timestep preset (coarse, standard, fine), overrides the settings file
    #[arg(long)]
    preset: Option<String>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seconds per frame (defaults to the fixed step)
    #[arg(long)]
    frame_dt: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(name) = &args.preset {
        settings.preset = TimestepPreset::from_str(name)
            .with_context(|| format!("unknown timestep preset '{name}'"))?;
    }

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::demo(),
    };
    let (mut scene, ids) = scenario.build().context("building scenario")?;

    let mut stepper = settings.stepper();
    let frame_dt = args.frame_dt.unwrap_or(stepper.dt());
    log::info!(
        "Running '{}' for {} frames ({} Hz preset, dt {:.5}s, frame {:.5}s)",
        scenario.name,
        args.frames,
        settings.preset.rate(),
        stepper.dt(),
        frame_dt
    );

    for frame in 1..=args.frames {
        stepper.advance(&mut scene, frame_dt);
        if settings.log_every > 0 && frame % settings.log_every == 0 {
            log::info!(
                "frame {frame}: {} ticks, {} bodies, {} force creators",
                stepper.ticks(),
                scene.body_count(),
                scene.force_creator_count()
            );
        }
    }

    println!(
        "{}: {} ticks, {}/{} bodies remain",
        if scenario.name.is_empty() { "scenario" } else { scenario.name.as_str() },
        stepper.ticks(),
        scene.body_count(),
        ids.len()
    );
    for (id, body) in scene.bodies().iter() {
        let c = body.centroid();
        let v = body.velocity();
        println!(
            "  {id} at ({:.2}, {:.2}) moving ({:.2}, {:.2}) color #{:06x}",
            c.x,
            c.y,
            v.x,
            v.y,
            body.color().to_u32()
        );
    }

    Ok(())
}
