//! Host-facing controller tying configuration, grid, integrator and seeding
//! together.
//!
//! The host loop owns a [`Simulation`], feeds it [`Command`]s between
//! frames, calls [`Simulation::run_frame`] and renders from
//! [`Simulation::field`]. No event loop or callback mechanism is assumed.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::grid::{Chemical, FieldView, GridState};
use crate::integrator::{FrameStats, Integrator};
use crate::seed::{SeedManager, SeedPlan};

/// Fraction of clamped values per frame above which a frame counts as
/// saturated.
pub const SATURATION_WARN_FRACTION: f32 = 0.5;
/// Consecutive saturated frames before a warning is emitted.
pub const SATURATION_WARN_FRAMES: usize = 8;

/// Input translated by the host between frames.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    /// Stop advancing; the grid stays readable.
    Pause,
    /// Continue advancing.
    Resume,
    /// Flip between paused and running.
    TogglePause,
    /// Back to the seeded initial state.
    Reset,
    /// Reset with a new placement seed.
    Reseed(u64),
    /// Switch feed/kill to a named preset and reset.
    ApplyPreset(String),
    /// Place an activator disc.
    SeedAt {
        /// Center column.
        x: i32,
        /// Center row.
        y: i32,
        /// Disc radius.
        radius: i32,
        /// Activator concentration inside the disc.
        value: f32,
    },
    /// Restore the uniform state in a disc.
    EraseAt {
        /// Center column.
        x: i32,
        /// Center row.
        y: i32,
        /// Disc radius.
        radius: i32,
    },
    /// Nudge the feed rate.
    AdjustFeed(f32),
    /// Nudge the kill rate.
    AdjustKill(f32),
}

/// Owned copy of both fields, safe to keep across frames.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// Frame counter at capture time.
    pub frame: u64,
    /// Row-major U values.
    pub u: Vec<f32>,
    /// Row-major V values.
    pub v: Vec<f32>,
}

/// A running reaction-diffusion simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: Config,
    grid: GridState,
    integrator: Integrator,
    seeds: SeedManager,
    paused: bool,
    frame: u64,
    saturated_frames: usize,
    saturation_reported: bool,
}

impl Simulation {
    /// Validates `config`, builds the grid and applies the initial seeds.
    ///
    /// Stability warnings are logged, not returned as errors.
    pub fn new(config: Config, plan: SeedPlan) -> Result<Self> {
        let warnings = config.validate()?;
        for warning in &warnings {
            tracing::warn!(%warning, "accepted configuration outside stability bound");
        }

        let mut grid = GridState::new(config.width, config.height)?;
        let seeds = SeedManager::new(plan);
        seeds.seed_initial(&mut grid);
        let integrator = Integrator::new(&grid);

        tracing::debug!(
            width = config.width,
            height = config.height,
            steps_per_frame = config.steps_per_frame,
            "simulation created"
        );

        Ok(Self {
            config,
            grid,
            integrator,
            seeds,
            paused: false,
            frame: 0,
            saturated_frames: 0,
            saturation_reported: false,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current grid state.
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Active seeding plan.
    pub fn seed_plan(&self) -> &SeedPlan {
        self.seeds.plan()
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Whether [`run_frame`](Self::run_frame) is currently a no-op.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stops advancing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continues advancing.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flips the paused flag.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Runs one frame worth of steps unless paused.
    pub fn run_frame(&mut self) -> FrameStats {
        if self.paused {
            return FrameStats::default();
        }
        let stats = self.integrator.run_frame(&self.config, &mut self.grid);
        self.frame += 1;
        self.track_saturation(stats);
        stats
    }

    /// Restores the seeded initial state.
    pub fn reset(&mut self) {
        self.seeds.reset_to_uniform(&mut self.grid);
        self.saturated_frames = 0;
        self.saturation_reported = false;
        tracing::debug!(rng_seed = self.seeds.plan().rng_seed, "grid reset");
    }

    /// Resets with a different placement seed.
    pub fn reseed(&mut self, rng_seed: u64) {
        self.seeds.set_rng_seed(rng_seed);
        self.reset();
    }

    /// Switches feed and kill to the named preset, then resets the grid.
    ///
    /// On an unknown name nothing changes.
    pub fn apply_preset(&mut self, name: &str) -> Result<()> {
        self.config = self.config.apply_preset(name)?;
        tracing::info!(
            preset = name,
            feed = self.config.params.feed,
            kill = self.config.params.kill,
            "preset applied"
        );
        self.reset();
        Ok(())
    }

    /// Places an activator disc.
    pub fn seed_at(&mut self, x: i32, y: i32, radius: i32, value: f32) {
        self.seeds.seed_at(&mut self.grid, x, y, radius, value);
        tracing::debug!(x, y, radius, value, "seeded");
    }

    /// Restores the uniform state in a disc.
    pub fn erase_at(&mut self, x: i32, y: i32, radius: i32) {
        self.seeds.erase_at(&mut self.grid, x, y, radius);
        tracing::debug!(x, y, radius, "erased");
    }

    /// Nudges the feed rate within the adjustable range.
    pub fn adjust_feed(&mut self, delta: f32) {
        self.config.adjust_feed(delta);
        tracing::debug!(feed = self.config.params.feed, "feed adjusted");
    }

    /// Nudges the kill rate within the adjustable range.
    pub fn adjust_kill(&mut self, delta: f32) {
        self.config.adjust_kill(delta);
        tracing::debug!(kill = self.config.params.kill, "kill adjusted");
    }

    /// Read-only view of the current generation. Do not hold across frames;
    /// use [`snapshot`](Self::snapshot) to keep data.
    pub fn field(&self, chemical: Chemical) -> FieldView<'_> {
        self.grid.field(chemical)
    }

    /// Copies both fields out of the current generation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            frame: self.frame,
            u: self.grid.field(Chemical::U).as_slice().to_vec(),
            v: self.grid.field(Chemical::V).as_slice().to_vec(),
        }
    }

    /// Applies one queued host command.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => self.reset(),
            Command::Reseed(rng_seed) => self.reseed(rng_seed),
            Command::ApplyPreset(name) => self.apply_preset(&name)?,
            Command::SeedAt {
                x,
                y,
                radius,
                value,
            } => self.seed_at(x, y, radius, value),
            Command::EraseAt { x, y, radius } => self.erase_at(x, y, radius),
            Command::AdjustFeed(delta) => self.adjust_feed(delta),
            Command::AdjustKill(delta) => self.adjust_kill(delta),
        }
        Ok(())
    }

    fn track_saturation(&mut self, stats: FrameStats) {
        let values = (stats.steps * 2 * self.grid.len()).max(1);
        let fraction = stats.clamped as f32 / values as f32;
        if fraction <= SATURATION_WARN_FRACTION {
            self.saturated_frames = 0;
            self.saturation_reported = false;
            return;
        }

        self.saturated_frames += 1;
        if self.saturated_frames >= SATURATION_WARN_FRAMES && !self.saturation_reported {
            self.saturation_reported = true;
            tracing::warn!(
                frames = self.saturated_frames,
                fraction,
                dt = self.config.params.dt,
                bound = self.config.params.stable_dt_bound(),
                "field is saturating; parameters are likely unstable"
            );
        }
    }
}
