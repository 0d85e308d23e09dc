//! Named (feed, kill) pairs for recognizable pattern classes.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Preset parameters for common Gray-Scott patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Preset {
    /// Self-replicating spots that divide like cells.
    Mitosis,
    /// Branching coral growth that settles into a maze.
    Coral,
    /// Parallel stripes.
    Stripes,
    /// Travelling wavefronts.
    Waves,
    /// Rotating spirals.
    Spirals,
    /// Elongated worm-like segments.
    Worms,
    /// Labyrinth of connected channels.
    Maze,
    /// Stable isolated spots.
    Spots,
}

impl Preset {
    /// Every preset, in catalogue order.
    pub const ALL: [Preset; 8] = [
        Preset::Mitosis,
        Preset::Coral,
        Preset::Stripes,
        Preset::Waves,
        Preset::Spirals,
        Preset::Worms,
        Preset::Maze,
        Preset::Spots,
    ];

    /// Returns (feed, kill) parameters for this preset.
    pub fn parameters(&self) -> (f32, f32) {
        match self {
            Preset::Mitosis => (0.055, 0.062),
            Preset::Coral => (0.039, 0.058),
            Preset::Stripes => (0.026, 0.052),
            Preset::Waves => (0.078, 0.061),
            Preset::Spirals => (0.014, 0.047),
            Preset::Worms => (0.058, 0.065),
            Preset::Maze => (0.029, 0.057),
            Preset::Spots => (0.035, 0.065),
        }
    }

    /// Lowercase catalogue name.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Mitosis => "mitosis",
            Preset::Coral => "coral",
            Preset::Stripes => "stripes",
            Preset::Waves => "waves",
            Preset::Spirals => "spirals",
            Preset::Worms => "worms",
            Preset::Maze => "maze",
            Preset::Spots => "spots",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}
