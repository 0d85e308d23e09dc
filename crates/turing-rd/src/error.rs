//! Error types for turing-rd.

use thiserror::Error;

use crate::grid::Chemical;

/// Result alias for configuration-checked operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors detected while validating a simulation configuration.
///
/// All of these are fatal: they are reported before the first frame runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Grid width or height is zero.
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// A diffusion coefficient is zero, negative or not finite.
    #[error("diffusion coefficient for {chemical} must be positive, got {value}")]
    NonPositiveDiffusion {
        /// Chemical the coefficient belongs to.
        chemical: Chemical,
        /// Offending value.
        value: f32,
    },

    /// The time step is zero, negative or not finite.
    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f32),

    /// Feed or kill rate is negative or not finite.
    #[error("{name} rate must be non-negative, got {value}")]
    NegativeRate {
        /// Which rate ("feed" or "kill").
        name: &'static str,
        /// Offending value.
        value: f32,
    },

    /// Zero integration steps per rendered frame.
    #[error("steps per frame must be at least 1")]
    ZeroStepsPerFrame,

    /// Preset name not present in the catalogue.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}
