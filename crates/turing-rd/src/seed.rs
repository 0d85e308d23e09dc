//! Nucleation patches placed at startup, on reset and on pointer input.
//!
//! An activator patch writes `V = value` and `U = 1 - value` into a disc.
//! `value = 1` fully depletes the substrate, which is what lets a lone patch
//! survive the first steps; `value = 0` restores the uniform state and so
//! doubles as an eraser.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{Chemical, GridState, sanitize};

/// How the initial patches are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SeedPlan {
    /// Number of patches.
    pub count: usize,
    /// Patch radius in cells.
    pub radius: i32,
    /// Seed for the placement generator.
    pub rng_seed: u64,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            count: 5,
            radius: 10,
            rng_seed: 42,
        }
    }
}

/// Writes an activator disc of `value` at `center`.
///
/// `value` is clamped into `[0, 1]`; NaN counts as 0 and so erases.
pub fn place_activator(grid: &mut GridState, center: IVec2, radius: i32, value: f32) {
    let value = sanitize(value);
    grid.seed_patch(Chemical::V, center, radius, value);
    grid.seed_patch(Chemical::U, center, radius, 1.0 - value);
}

/// Places `count` full-strength activator discs at reproducible pseudo-random
/// positions.
///
/// The same `rng_seed` on the same grid size always yields the same
/// centers, which are returned in placement order.
pub fn seed_initial(grid: &mut GridState, count: usize, radius: i32, rng_seed: u64) -> Vec<IVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
    let (w, h) = (grid.width() as i32, grid.height() as i32);

    let centers: Vec<IVec2> = (0..count)
        .map(|_| IVec2::new(rng.random_range(0..w), rng.random_range(0..h)))
        .collect();
    for &center in &centers {
        place_activator(grid, center, radius, 1.0);
    }

    tracing::debug!(count, radius, rng_seed, "placed initial seeds");
    centers
}

/// Places a single activator disc, e.g. from a pointer event.
///
/// Coordinates wrap, so any `(x, y)` is valid.
pub fn seed_at(grid: &mut GridState, x: i32, y: i32, radius: i32, value: f32) {
    place_activator(grid, IVec2::new(x, y), radius, value);
}

/// Owns the seeding plan so resets reproduce the same initial condition.
#[derive(Debug, Clone, Default)]
pub struct SeedManager {
    plan: SeedPlan,
}

impl SeedManager {
    /// Creates a manager for `plan`.
    pub fn new(plan: SeedPlan) -> Self {
        Self { plan }
    }

    /// The active plan.
    pub fn plan(&self) -> &SeedPlan {
        &self.plan
    }

    /// Replaces the placement seed used by later resets.
    pub fn set_rng_seed(&mut self, rng_seed: u64) {
        self.plan.rng_seed = rng_seed;
    }

    /// Applies the plan to `grid`.
    pub fn seed_initial(&self, grid: &mut GridState) -> Vec<IVec2> {
        seed_initial(grid, self.plan.count, self.plan.radius, self.plan.rng_seed)
    }

    /// Places one activator disc.
    pub fn seed_at(&self, grid: &mut GridState, x: i32, y: i32, radius: i32, value: f32) {
        seed_at(grid, x, y, radius, value);
    }

    /// Restores `U = 1`, `V = 0` in a disc.
    pub fn erase_at(&self, grid: &mut GridState, x: i32, y: i32, radius: i32) {
        seed_at(grid, x, y, radius, 0.0);
    }

    /// Returns the grid to `U = 1`, `V = 0` and re-applies the plan.
    pub fn reset_to_uniform(&self, grid: &mut GridState) {
        grid.reset_uniform();
        self.seed_initial(grid);
    }
}
