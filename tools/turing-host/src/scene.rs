//! JSON scene files: configuration, seeding and a scripted command queue.
//!
//! ```json
//! {
//!   "preset": "coral",
//!   "config": { "width": 256, "height": 256, "steps_per_frame": 8 },
//!   "seeds": { "count": 5, "radius": 8, "rng_seed": 42 },
//!   "commands": [
//!     { "frame": 120, "command": { "SeedAt": { "x": 40, "y": 40, "radius": 6, "value": 1.0 } } },
//!     { "frame": 300, "command": { "ApplyPreset": "waves" } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use rhizome_turing_rd::{Command, Config, Preset, SeedPlan};
use serde::Deserialize;

/// A command to apply before the given frame runs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduledCommand {
    /// Frame index (0-based) the command precedes.
    pub frame: u64,
    /// The command.
    pub command: Command,
}

/// Everything a run needs besides command-line overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Preset applied on top of `config`.
    pub preset: Option<Preset>,
    /// Grid and reaction configuration.
    pub config: Config,
    /// Initial seeding.
    pub seeds: SeedPlan,
    /// Scripted input, applied between frames.
    pub commands: Vec<ScheduledCommand>,
}

impl Scene {
    /// Reads a scene from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid scene {}", path.display()))
    }

    /// Parses a scene from JSON text.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let mut scene: Scene = serde_json::from_str(text)?;
        scene.commands.sort_by_key(|c| c.frame);
        if let Some(preset) = scene.preset {
            scene.config = scene.config.with_preset(preset);
        }
        Ok(scene)
    }
}
