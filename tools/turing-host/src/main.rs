//! Headless host for the Turing-pattern simulator.
//!
//! Runs a fixed number of frames, applies scripted commands between frames
//! and optionally writes the final V field as a PNG.
//!
//! ```bash
//! # 600 frames of the coral preset, saved at 2x scale
//! cargo run -p turing-host --release -- --preset coral --frames 600 --snapshot coral.png
//!
//! # Scene file with scripted seeding, CLI values override it
//! cargo run -p turing-host --release -- --scene demo.json --feed 0.03
//!
//! # List the preset catalogue
//! cargo run -p turing-host -- --list-presets
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use rhizome_turing_rd::{Preset, Simulation};
use tracing_subscriber::EnvFilter;

mod export;
mod ramp;
mod scene;

use ramp::Colormap;
use scene::Scene;

/// Gray-Scott reaction-diffusion simulator (headless)
#[derive(Parser, Debug)]
#[command(name = "turing")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON scene file (config, seeds, scripted commands)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Named (feed, kill) preset
    #[arg(short, long)]
    preset: Option<Preset>,

    /// Feed rate
    #[arg(long)]
    feed: Option<f32>,

    /// Kill rate
    #[arg(long)]
    kill: Option<f32>,

    /// Diffusion rate of U
    #[arg(long)]
    du: Option<f32>,

    /// Diffusion rate of V
    #[arg(long)]
    dv: Option<f32>,

    /// Time step
    #[arg(long)]
    dt: Option<f32>,

    /// Integration steps per frame
    #[arg(long)]
    steps_per_frame: Option<usize>,

    /// Frames to run
    #[arg(short, long, default_value_t = 500)]
    frames: u64,

    /// Number of initial seed patches
    #[arg(long)]
    seeds: Option<usize>,

    /// Radius of each initial seed patch
    #[arg(long)]
    seed_radius: Option<i32>,

    /// Seed for patch placement
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Write the final V field to this PNG file
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Color ramp for the snapshot
    #[arg(long, value_enum, default_value_t = Colormap::Classic)]
    colormap: Colormap,

    /// Pixels per cell in the snapshot
    #[arg(long, default_value_t = 2)]
    scale: u32,

    /// Print the preset catalogue and exit
    #[arg(long)]
    list_presets: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line values on top of the scene.
    fn override_scene(&self, mut scene: Scene) -> Scene {
        let config = &mut scene.config;
        if let Some(preset) = self.preset {
            *config = config.clone().with_preset(preset);
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        let params = &mut config.params;
        params.feed = self.feed.unwrap_or(params.feed);
        params.kill = self.kill.unwrap_or(params.kill);
        params.du = self.du.unwrap_or(params.du);
        params.dv = self.dv.unwrap_or(params.dv);
        params.dt = self.dt.unwrap_or(params.dt);
        if let Some(steps) = self.steps_per_frame {
            config.steps_per_frame = steps;
        }

        let seeds = &mut scene.seeds;
        seeds.count = self.seeds.unwrap_or(seeds.count);
        seeds.radius = self.seed_radius.unwrap_or(seeds.radius);
        seeds.rng_seed = self.rng_seed.unwrap_or(seeds.rng_seed);
        scene
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn list_presets() {
    for preset in Preset::ALL {
        let (feed, kill) = preset.parameters();
        println!("{:<8} f={feed:.3} k={kill:.3}", preset.name());
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let scene = match &cli.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::default(),
    };
    let scene = cli.override_scene(scene);

    let mut sim =
        Simulation::new(scene.config, scene.seeds).context("invalid simulation configuration")?;
    let config = sim.config();
    tracing::info!(
        width = config.width,
        height = config.height,
        feed = config.params.feed,
        kill = config.params.kill,
        dt = config.params.dt,
        steps_per_frame = config.steps_per_frame,
        frames = cli.frames,
        "starting simulation"
    );

    let mut pending = scene.commands.into_iter().peekable();
    let progress_every = (cli.frames / 10).max(1);
    let started = Instant::now();
    let mut steps = 0u64;

    for frame in 0..cli.frames {
        while let Some(scheduled) = pending.next_if(|c| c.frame <= frame) {
            tracing::debug!(frame, command = ?scheduled.command, "applying command");
            sim.apply(scheduled.command)
                .with_context(|| format!("command at frame {}", scheduled.frame))?;
        }

        let stats = sim.run_frame();
        steps += stats.steps as u64;

        if (frame + 1) % progress_every == 0 {
            tracing::info!(frame = frame + 1, clamped = stats.clamped, "progress");
        }
    }

    let elapsed = started.elapsed().as_secs_f64();
    let cells = sim.config().cell_count() as f64;
    tracing::info!(
        steps,
        seconds = format!("{elapsed:.2}"),
        mcells_per_sec = format!("{:.1}", steps as f64 * cells / elapsed.max(1e-9) / 1e6),
        "finished"
    );

    if let Some(path) = &cli.snapshot {
        export::write_png(&sim.snapshot(), &cli.colormap.ramp(), cli.scale, path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list_presets {
        list_presets();
        return ExitCode::SUCCESS;
    }

    setup_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
