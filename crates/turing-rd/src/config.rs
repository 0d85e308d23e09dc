//! Simulation configuration and validation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::grid::Chemical;
use crate::preset::Preset;

/// Lower bound applied when nudging feed or kill interactively.
pub const MIN_RATE: f32 = 0.001;
/// Upper bound applied when nudging feed or kill interactively.
pub const MAX_RATE: f32 = 0.1;

/// Gray-Scott reaction and integration parameters.
///
/// This is plain data read by the integrator every step. It is not validated
/// on its own; [`Config::validate`] checks it before a simulation starts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReactionParams {
    /// Diffusion rate of chemical U.
    pub du: f32,
    /// Diffusion rate of chemical V.
    pub dv: f32,
    /// Feed rate.
    pub feed: f32,
    /// Kill rate.
    pub kill: f32,
    /// Time step.
    pub dt: f32,
}

impl Default for ReactionParams {
    fn default() -> Self {
        Self {
            du: 0.16,
            dv: 0.08,
            feed: 0.055,
            kill: 0.062,
            dt: 1.0,
        }
    }
}

impl ReactionParams {
    /// Largest time step for which explicit diffusion stays stable at unit
    /// grid spacing: `1 / (4 * max(du, dv))`.
    pub fn stable_dt_bound(&self) -> f32 {
        1.0 / (4.0 * self.du.max(self.dv))
    }

    /// Whether `dt` satisfies [`stable_dt_bound`](Self::stable_dt_bound).
    pub fn is_stable(&self) -> bool {
        self.dt <= self.stable_dt_bound()
    }
}

/// Non-fatal finding reported by [`Config::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StabilityWarning {
    /// `dt` exceeds the explicit-diffusion bound. The post-step clamp will
    /// hide the resulting blow-up as saturation.
    TimeStepExceedsBound {
        /// Configured time step.
        dt: f32,
        /// Maximum stable time step.
        bound: f32,
    },
}

impl fmt::Display for StabilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StabilityWarning::TimeStepExceedsBound { dt, bound } => write!(
                f,
                "time step {dt} exceeds stability bound {bound}; expect saturation instead of patterns"
            ),
        }
    }
}

/// Complete description of a simulation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Reaction and integration parameters.
    pub params: ReactionParams,
    /// Integration steps run per rendered frame.
    pub steps_per_frame: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            params: ReactionParams::default(),
            steps_per_frame: 8,
        }
    }
}

impl Config {
    /// Creates a configuration for a `width` x `height` grid with default
    /// parameters.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Creates a default configuration with feed and kill taken from `preset`.
    pub fn from_preset(preset: Preset) -> Self {
        Self::default().with_preset(preset)
    }

    /// Sets the reaction parameters.
    pub fn with_params(mut self, params: ReactionParams) -> Self {
        self.params = params;
        self
    }

    /// Sets both diffusion rates.
    pub fn with_diffusion(mut self, du: f32, dv: f32) -> Self {
        self.params.du = du;
        self.params.dv = dv;
        self
    }

    /// Sets feed and kill rates.
    pub fn with_rates(mut self, feed: f32, kill: f32) -> Self {
        self.params.feed = feed;
        self.params.kill = kill;
        self
    }

    /// Sets the time step.
    pub fn with_dt(mut self, dt: f32) -> Self {
        self.params.dt = dt;
        self
    }

    /// Sets the number of integration steps per frame.
    pub fn with_steps_per_frame(mut self, steps: usize) -> Self {
        self.steps_per_frame = steps;
        self
    }

    /// Overwrites feed and kill with the preset's values.
    pub fn with_preset(self, preset: Preset) -> Self {
        let (feed, kill) = preset.parameters();
        self.with_rates(feed, kill)
    }

    /// Returns a copy with feed and kill replaced by the named preset.
    ///
    /// Fails with [`ConfigError::UnknownPreset`] if `name` is not in the
    /// catalogue.
    pub fn apply_preset(&self, name: &str) -> Result<Config> {
        let preset: Preset = name.parse()?;
        Ok(self.clone().with_preset(preset))
    }

    /// Nudges the feed rate, keeping it within [`MIN_RATE`, `MAX_RATE`].
    pub fn adjust_feed(&mut self, delta: f32) {
        self.params.feed = (self.params.feed + delta).clamp(MIN_RATE, MAX_RATE);
    }

    /// Nudges the kill rate, keeping it within [`MIN_RATE`, `MAX_RATE`].
    pub fn adjust_kill(&mut self, delta: f32) {
        self.params.kill = (self.params.kill + delta).clamp(MIN_RATE, MAX_RATE);
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Checks the configuration.
    ///
    /// Returns the fatal [`ConfigError`] if any, otherwise the list of
    /// non-fatal stability warnings (empty when the time step is stable).
    pub fn validate(&self) -> Result<Vec<StabilityWarning>> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let p = &self.params;
        for (chemical, value) in [(Chemical::U, p.du), (Chemical::V, p.dv)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositiveDiffusion { chemical, value });
            }
        }
        if !(p.dt > 0.0 && p.dt.is_finite()) {
            return Err(ConfigError::NonPositiveTimeStep(p.dt));
        }
        for (name, value) in [("feed", p.feed), ("kill", p.kill)] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::NegativeRate { name, value });
            }
        }
        if self.steps_per_frame == 0 {
            return Err(ConfigError::ZeroStepsPerFrame);
        }

        let mut warnings = Vec::new();
        if !p.is_stable() {
            warnings.push(StabilityWarning::TimeStepExceedsBound {
                dt: p.dt,
                bound: p.stable_dt_bound(),
            });
        }
        Ok(warnings)
    }
}
