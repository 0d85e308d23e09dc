//! Gray-Scott reaction-diffusion engine for live Turing-pattern demos.
//!
//! Two chemicals, U (substrate) and V (activator), diffuse over a toroidal
//! grid and react:
//!
//! ```text
//! dU/dt = Du * lap(U) - U*V^2 + f * (1 - U)
//! dV/dt = Dv * lap(V) + U*V^2 - (f + k) * V
//! ```
//!
//! - [`Config`] / [`Preset`] - grid size, rates, time step, named (f, k) pairs
//! - [`GridState`] - double-buffered fields, wrapping addressing, seeding
//! - [`stencil`] - nine-point periodic Laplacian
//! - [`Integrator`] - explicit Euler steps and per-frame batches
//! - [`SeedManager`] - reproducible nucleation patches
//! - [`Simulation`] - the above behind a host-facing command interface
//!
//! # Example
//!
//! ```
//! use rhizome_turing_rd::{Chemical, Config, Preset, SeedPlan, Simulation};
//!
//! let config = Config::new(128, 128).with_preset(Preset::Mitosis);
//! let mut sim = Simulation::new(config, SeedPlan::default()).unwrap();
//!
//! for _ in 0..10 {
//!     sim.run_frame();
//! }
//!
//! // Switching preset starts over from the same seeded state.
//! sim.apply_preset("coral").unwrap();
//!
//! let v = sim.field(Chemical::V);
//! assert_eq!(v.as_slice().len(), 128 * 128);
//! ```

mod config;
mod error;
mod grid;
mod integrator;
mod preset;
mod seed;
mod simulation;
pub mod stencil;

pub use config::{Config, MAX_RATE, MIN_RATE, ReactionParams, StabilityWarning};
pub use error::{ConfigError, Result};
pub use glam;
pub use grid::{Chemical, DoubleBuffer, FieldView, GridState};
pub use integrator::{FrameStats, Integrator};
pub use preset::Preset;
pub use seed::{SeedManager, SeedPlan, place_activator, seed_at, seed_initial};
pub use simulation::{
    Command, SATURATION_WARN_FRACTION, SATURATION_WARN_FRAMES, Simulation, Snapshot,
};
