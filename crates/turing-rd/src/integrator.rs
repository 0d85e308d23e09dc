//! Explicit Euler time stepping of the Gray-Scott equations.
//!
//! ```text
//! dU/dt = Du * lap(U) - U*V^2 + f * (1 - U)
//! dV/dt = Dv * lap(V) + U*V^2 - (f + k) * V
//! ```

use crate::config::{Config, ReactionParams};
use crate::grid::{GridState, StepBuffers};
use crate::stencil::laplacian_into;

/// Counters for one batch of steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Steps executed.
    pub steps: usize,
    /// Cell values the post-step clamp had to pull back into `[0, 1]`,
    /// summed over all steps and both chemicals.
    pub clamped: usize,
}

/// Advances a [`GridState`] in time.
///
/// Holds the Laplacian scratch buffers so stepping never allocates once the
/// integrator has seen a grid of a given size.
#[derive(Debug, Clone, Default)]
pub struct Integrator {
    lap_u: Vec<f32>,
    lap_v: Vec<f32>,
}

impl Integrator {
    /// Creates an integrator with scratch space sized for `grid`.
    pub fn new(grid: &GridState) -> Self {
        Self {
            lap_u: vec![0.0; grid.len()],
            lap_v: vec![0.0; grid.len()],
        }
    }

    /// Advances `grid` by one time step and swaps its buffers.
    ///
    /// Deterministic: the result depends only on `params` and the current
    /// generation. Returns how many values were clamped.
    pub fn step(&mut self, params: &ReactionParams, grid: &mut GridState) -> usize {
        let (width, height) = (grid.width(), grid.height());
        if self.lap_u.len() != grid.len() {
            self.lap_u.resize(grid.len(), 0.0);
            self.lap_v.resize(grid.len(), 0.0);
        }

        let ReactionParams {
            du,
            dv,
            feed,
            kill,
            dt,
        } = *params;

        let StepBuffers {
            u: u_cur,
            v: v_cur,
            u_next,
            v_next,
        } = grid.step_buffers();
        laplacian_into(u_cur, &mut self.lap_u, width, height);
        laplacian_into(v_cur, &mut self.lap_v, width, height);

        let mut clamped = 0;
        let cells = u_cur
            .iter()
            .zip(v_cur)
            .zip(self.lap_u.iter().zip(&self.lap_v))
            .zip(u_next.iter_mut().zip(v_next.iter_mut()));

        for (((&u, &v), (&lap_u, &lap_v)), (u_next, v_next)) in cells {
            let uvv = u * v * v;
            let du_dt = du * lap_u - uvv + feed * (1.0 - u);
            let dv_dt = dv * lap_v + uvv - (feed + kill) * v;

            let (nu, hit_u) = saturate(u + dt * du_dt);
            let (nv, hit_v) = saturate(v + dt * dv_dt);
            *u_next = nu;
            *v_next = nv;
            clamped += hit_u as usize + hit_v as usize;
        }

        grid.swap();
        clamped
    }

    /// Runs `config.steps_per_frame` steps back to back.
    pub fn run_frame(&mut self, config: &Config, grid: &mut GridState) -> FrameStats {
        self.run_steps(&config.params, grid, config.steps_per_frame)
    }

    /// Runs `count` steps back to back.
    pub fn run_steps(
        &mut self,
        params: &ReactionParams,
        grid: &mut GridState,
        count: usize,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        for _ in 0..count {
            stats.clamped += self.step(params, grid);
            stats.steps += 1;
        }
        stats
    }
}

/// Clamps into `[0, 1]`, mapping NaN to 0. Reports whether the value moved.
#[inline(always)]
fn saturate(value: f32) -> (f32, bool) {
    if value >= 0.0 && value <= 1.0 {
        (value, false)
    } else if value > 1.0 {
        (1.0, true)
    } else {
        (0.0, true)
    }
}
