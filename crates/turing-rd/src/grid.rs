//! Double-buffered concentration fields on a toroidal lattice.

use std::fmt;

use glam::IVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// One of the two reacting species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Chemical {
    /// Substrate, fed into the system at the feed rate.
    U,
    /// Activator, removed at the feed + kill rate.
    V,
}

impl fmt::Display for Chemical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chemical::U => f.write_str("U"),
            Chemical::V => f.write_str("V"),
        }
    }
}

/// Two same-sized buffers whose current/next roles alternate.
#[derive(Debug, Clone)]
pub struct DoubleBuffer {
    buffers: [Vec<f32>; 2],
    current: usize,
}

impl DoubleBuffer {
    /// Creates a buffer pair of `len` cells, both filled with `value`.
    pub fn filled(len: usize, value: f32) -> Self {
        Self {
            buffers: [vec![value; len], vec![value; len]],
            current: 0,
        }
    }

    /// The buffer readers should see.
    pub fn current(&self) -> &[f32] {
        &self.buffers[self.current]
    }

    /// Mutable access to the current buffer.
    pub fn current_mut(&mut self) -> &mut [f32] {
        &mut self.buffers[self.current]
    }

    /// Borrows the current buffer for reading and the next one for writing.
    pub fn split(&mut self) -> (&[f32], &mut [f32]) {
        let [a, b] = &mut self.buffers;
        if self.current == 0 {
            (a.as_slice(), b.as_mut_slice())
        } else {
            (b.as_slice(), a.as_mut_slice())
        }
    }

    /// Makes the next buffer current.
    pub fn swap(&mut self) {
        self.current ^= 1;
    }

    /// Index (0 or 1) of the buffer currently in the reader role.
    pub fn generation(&self) -> usize {
        self.current
    }
}

/// Read-only view of one field of the current generation.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    width: usize,
    height: usize,
    data: &'a [f32],
}

impl<'a> FieldView<'a> {
    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major cell values, each in `[0, 1]`.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Value at `(x, y)`, wrapping out-of-range coordinates.
    pub fn get(&self, x: i32, y: i32) -> f32 {
        self.data[wrap_index(x, y, self.width, self.height)]
    }

    /// Iterates over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [f32]> + 'a {
        self.data.chunks_exact(self.width)
    }
}

/// Mutable borrows handed to the integrator for one step.
pub(crate) struct StepBuffers<'a> {
    pub u: &'a [f32],
    pub v: &'a [f32],
    pub u_next: &'a mut [f32],
    pub v_next: &'a mut [f32],
}

/// Concentration fields for U and V over a `width` x `height` torus.
///
/// Dimensions are fixed for the lifetime of the grid.
#[derive(Debug, Clone)]
pub struct GridState {
    width: usize,
    height: usize,
    u: DoubleBuffer,
    v: DoubleBuffer,
}

impl GridState {
    /// Creates a grid in the uniform state (`U = 1`, `V = 0`).
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 || i32::try_from(width.max(height)).is_err() {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        let len = width * height;
        Ok(Self {
            width,
            height,
            u: DoubleBuffer::filled(len, 1.0),
            v: DoubleBuffer::filled(len, 0.0),
        })
    }

    /// Creates a grid from row-major field contents.
    ///
    /// Values are clamped into `[0, 1]`; NaN becomes 0.
    pub fn from_fields(width: usize, height: usize, u: &[f32], v: &[f32]) -> Result<Self> {
        let mut grid = Self::new(width, height)?;
        if u.len() != grid.len() || v.len() != grid.len() {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        grid.u.current_mut().copy_from_slice(u);
        grid.v.current_mut().copy_from_slice(v);
        grid.clamp_in_place();
        Ok(grid)
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells per field.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always false; a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current `(u, v)` at `(x, y)`, wrapping coordinates.
    pub fn read(&self, x: i32, y: i32) -> (f32, f32) {
        let idx = self.index(x, y);
        (self.u.current()[idx], self.v.current()[idx])
    }

    /// Read-only view of the current generation of `chemical`.
    pub fn field(&self, chemical: Chemical) -> FieldView<'_> {
        FieldView {
            width: self.width,
            height: self.height,
            data: self.buffer(chemical).current(),
        }
    }

    /// Which buffer of each pair is current. Flips on every [`swap`](Self::swap).
    pub fn generation(&self) -> usize {
        self.u.generation()
    }

    /// Writes `value` into every cell within Euclidean `radius` of `center`,
    /// measured along the shortest path on the torus.
    ///
    /// Negative radii are ignored. `value` is clamped into `[0, 1]` (NaN
    /// becomes 0). Any center is valid; it is wrapped onto the grid first.
    pub fn seed_patch(&mut self, chemical: Chemical, center: IVec2, radius: i32, value: f32) {
        let r2 = radius.saturating_mul(radius);
        self.fill_region(chemical, center, radius, value, |d| d.length_squared() <= r2);
    }

    /// Like [`seed_patch`](Self::seed_patch) but with Chebyshev distance,
    /// giving a `(2 * radius + 1)` square.
    pub fn seed_square(&mut self, chemical: Chemical, center: IVec2, radius: i32, value: f32) {
        self.fill_region(chemical, center, radius, value, |d| {
            d.x.abs().max(d.y.abs()) <= radius
        });
    }

    /// Sets every current cell of `chemical` to `value`.
    pub fn fill(&mut self, chemical: Chemical, value: f32) {
        self.buffer_mut(chemical).current_mut().fill(sanitize(value));
    }

    /// Restores the uniform state `U = 1`, `V = 0`.
    pub fn reset_uniform(&mut self) {
        self.fill(Chemical::U, 1.0);
        self.fill(Chemical::V, 0.0);
    }

    /// Exchanges current and next buffers for both chemicals.
    pub fn swap(&mut self) {
        self.u.swap();
        self.v.swap();
    }

    /// Forces every current cell into `[0, 1]` (NaN becomes 0).
    ///
    /// Returns how many values were changed.
    pub fn clamp_in_place(&mut self) -> usize {
        let mut clamped = 0;
        for cell in self
            .u
            .current_mut()
            .iter_mut()
            .chain(self.v.current_mut().iter_mut())
        {
            let value = *cell;
            let fixed = sanitize(value);
            if fixed.to_bits() != value.to_bits() {
                *cell = fixed;
                clamped += 1;
            }
        }
        clamped
    }

    pub(crate) fn step_buffers(&mut self) -> StepBuffers<'_> {
        let (u, u_next) = self.u.split();
        let (v, v_next) = self.v.split();
        StepBuffers {
            u,
            v,
            u_next,
            v_next,
        }
    }

    fn buffer(&self, chemical: Chemical) -> &DoubleBuffer {
        match chemical {
            Chemical::U => &self.u,
            Chemical::V => &self.v,
        }
    }

    fn buffer_mut(&mut self, chemical: Chemical) -> &mut DoubleBuffer {
        match chemical {
            Chemical::U => &mut self.u,
            Chemical::V => &mut self.v,
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        wrap_index(x, y, self.width, self.height)
    }

    /// Shortest signed offset from `from` to `to` on the torus.
    fn torus_delta(&self, from: IVec2, to: IVec2) -> IVec2 {
        let size = IVec2::new(self.width as i32, self.height as i32);
        let d = (to - from).rem_euclid(size);
        IVec2::select(d.cmpgt(size / 2), d - size, d)
    }

    fn fill_region(
        &mut self,
        chemical: Chemical,
        center: IVec2,
        radius: i32,
        value: f32,
        inside: impl Fn(IVec2) -> bool,
    ) {
        if radius < 0 {
            return;
        }
        let value = sanitize(value);
        let (w, h) = (self.width as i32, self.height as i32);
        let center = center.rem_euclid(IVec2::new(w, h));
        let span = radius.saturating_mul(2).saturating_add(1);

        if span <= w && span <= h {
            // The bounding box maps onto distinct cells, so offsets are
            // already shortest-path distances.
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let d = IVec2::new(dx, dy);
                    if inside(d) {
                        let idx = self.index(center.x + dx, center.y + dy);
                        self.buffer_mut(chemical).current_mut()[idx] = value;
                    }
                }
            }
        } else {
            for y in 0..h {
                for x in 0..w {
                    let cell = IVec2::new(x, y);
                    if inside(self.torus_delta(center, cell)) {
                        let idx = self.index(x, y);
                        self.buffer_mut(chemical).current_mut()[idx] = value;
                    }
                }
            }
        }
    }
}

/// Clamps into `[0, 1]`, mapping NaN to 0.
pub(crate) fn sanitize(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn wrap_index(x: i32, y: i32, width: usize, height: usize) -> usize {
    let x = x.rem_euclid(width as i32) as usize;
    let y = y.rem_euclid(height as i32) as usize;
    y * width + x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_is_uniform() {
        let grid = GridState::new(30, 20).unwrap();
        assert_eq!(grid.width(), 30);
        assert_eq!(grid.height(), 20);
        assert_eq!(grid.len(), 600);
        assert!(grid.field(Chemical::U).as_slice().iter().all(|&u| u == 1.0));
        assert!(grid.field(Chemical::V).as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rejects_empty_grid() {
        assert!(matches!(
            GridState::new(0, 5),
            Err(ConfigError::InvalidDimensions { .. })
        ));
        assert!(GridState::new(5, 0).is_err());
    }

    #[test]
    fn test_read_wraps() {
        let mut grid = GridState::new(8, 6).unwrap();
        grid.seed_patch(Chemical::V, IVec2::new(7, 5), 0, 0.75);
        assert_eq!(grid.read(7, 5).1, 0.75);
        assert_eq!(grid.read(-1, -1).1, 0.75);
        assert_eq!(grid.read(15, 11).1, 0.75);
        assert_eq!(grid.field(Chemical::V).get(-9, 5), 0.75);
    }

    #[test]
    fn test_seed_patch_is_a_disc() {
        let mut grid = GridState::new(50, 50).unwrap();
        grid.seed_patch(Chemical::V, IVec2::new(25, 25), 5, 1.0);

        assert_eq!(grid.read(25, 25).1, 1.0);
        assert_eq!(grid.read(30, 25).1, 1.0);
        assert_eq!(grid.read(25, 20).1, 1.0);
        // (4, 4) is outside a radius-5 disc (32 > 25).
        assert_eq!(grid.read(29, 29).1, 0.0);
        assert_eq!(grid.read(0, 0).1, 0.0);
        // U untouched.
        assert_eq!(grid.read(25, 25).0, 1.0);

        let count = grid
            .field(Chemical::V)
            .as_slice()
            .iter()
            .filter(|&&v| v > 0.0)
            .count();
        // Lattice points with dx^2 + dy^2 <= 25.
        assert_eq!(count, 81);
    }

    #[test]
    fn test_seed_patch_wraps_across_edges() {
        let mut grid = GridState::new(20, 20).unwrap();
        grid.seed_patch(Chemical::V, IVec2::new(0, 0), 2, 1.0);

        assert_eq!(grid.read(19, 0).1, 1.0);
        assert_eq!(grid.read(18, 0).1, 1.0);
        assert_eq!(grid.read(0, 19).1, 1.0);
        assert_eq!(grid.read(19, 19).1, 1.0);
        assert_eq!(grid.read(17, 0).1, 0.0);
    }

    #[test]
    fn test_seed_patch_larger_than_grid() {
        let mut grid = GridState::new(6, 4).unwrap();
        grid.seed_patch(Chemical::V, IVec2::new(1, 1), 100, 0.5);
        assert!(grid.field(Chemical::V).as_slice().iter().all(|&v| v == 0.5));

        // Radius 2 on a 4-high grid: the whole column band is within reach
        // vertically, but x offsets of 3 are not.
        let mut grid = GridState::new(8, 4).unwrap();
        grid.seed_patch(Chemical::V, IVec2::new(0, 0), 2, 1.0);
        assert_eq!(grid.read(0, 2).1, 1.0);
        assert_eq!(grid.read(6, 0).1, 1.0);
        assert_eq!(grid.read(5, 0).1, 0.0);
        assert_eq!(grid.read(2, 2).1, 0.0);
    }

    #[test]
    fn test_negative_radius_is_ignored() {
        let mut grid = GridState::new(10, 10).unwrap();
        grid.seed_patch(Chemical::V, IVec2::new(5, 5), -3, 1.0);
        assert!(grid.field(Chemical::V).as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_seed_value_is_clamped() {
        let mut grid = GridState::new(10, 10).unwrap();
        grid.seed_patch(Chemical::V, IVec2::new(5, 5), 1, 3.0);
        grid.seed_patch(Chemical::U, IVec2::new(5, 5), 1, -1.0);
        assert_eq!(grid.read(5, 5), (0.0, 1.0));
    }

    #[test]
    fn test_seed_patch_at_extreme_coordinates() {
        let mut grid = GridState::new(10, 10).unwrap();
        grid.seed_patch(Chemical::V, IVec2::new(i32::MAX, i32::MIN), 2, 1.0);

        // i32::MAX = 7 (mod 10), i32::MIN = 2 (mod 10).
        let (cx, cy) = (i32::MAX.rem_euclid(10), i32::MIN.rem_euclid(10));
        assert_eq!((cx, cy), (7, 2));
        assert_eq!(grid.read(cx, cy).1, 1.0);
        assert_eq!(grid.read(cx + 2, cy).1, 1.0);
        assert_eq!(grid.read(cx, cy - 2).1, 1.0);
        assert_eq!(grid.read(cx + 3, cy).1, 0.0);

        let count = grid
            .field(Chemical::V)
            .as_slice()
            .iter()
            .filter(|&&v| v > 0.0)
            .count();
        // Lattice points with dx^2 + dy^2 <= 4.
        assert_eq!(count, 13);

        // Full-scan path with a radius wider than the grid.
        let mut grid = GridState::new(4, 4).unwrap();
        grid.seed_patch(Chemical::V, IVec2::new(i32::MIN, i32::MAX), 9, 0.5);
        assert!(grid.field(Chemical::V).as_slice().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_nan_values_become_zero() {
        let mut grid = GridState::new(10, 10).unwrap();
        grid.seed_patch(Chemical::U, IVec2::new(4, 4), 1, f32::NAN);
        grid.seed_square(Chemical::V, IVec2::new(4, 4), 1, f32::NAN);
        assert_eq!(grid.read(4, 4), (0.0, 0.0));
        assert_eq!(grid.read(5, 5), (1.0, 0.0));

        grid.fill(Chemical::V, f32::NAN);
        assert!(grid.field(Chemical::V).as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_seed_square() {
        let mut grid = GridState::new(20, 20).unwrap();
        grid.seed_square(Chemical::V, IVec2::new(10, 10), 2, 1.0);
        assert_eq!(grid.read(12, 12).1, 1.0);
        assert_eq!(grid.read(8, 8).1, 1.0);
        assert_eq!(grid.read(13, 10).1, 0.0);
        let count = grid
            .field(Chemical::V)
            .as_slice()
            .iter()
            .filter(|&&v| v > 0.0)
            .count();
        assert_eq!(count, 25);
    }

    #[test]
    fn test_swap_alternates_buffers() {
        let mut grid = GridState::new(4, 4).unwrap();
        assert_eq!(grid.generation(), 0);
        {
            let StepBuffers { u_next, v_next, .. } = grid.step_buffers();
            v_next.fill(0.5);
            u_next.fill(0.25);
        }
        // Writing to next leaves the current generation untouched.
        assert_eq!(grid.read(0, 0), (1.0, 0.0));

        grid.swap();
        assert_eq!(grid.generation(), 1);
        assert_eq!(grid.read(0, 0), (0.25, 0.5));

        grid.swap();
        assert_eq!(grid.generation(), 0);
        assert_eq!(grid.read(0, 0), (1.0, 0.0));
    }

    #[test]
    fn test_clamp_in_place() {
        let u = [1.5, 0.5, -0.25, f32::NAN];
        let v = [0.0; 4];
        let mut grid = GridState::new(2, 2).unwrap();
        grid.u.current_mut().copy_from_slice(&u);
        grid.v.current_mut().copy_from_slice(&v);

        assert_eq!(grid.clamp_in_place(), 3);
        assert_eq!(grid.field(Chemical::U).as_slice(), &[1.0, 0.5, 0.0, 0.0]);
        assert_eq!(grid.clamp_in_place(), 0);
    }

    #[test]
    fn test_from_fields_validates_length() {
        assert!(GridState::from_fields(2, 2, &[0.0; 4], &[0.0; 3]).is_err());
        let grid = GridState::from_fields(2, 2, &[0.1, 0.2, 0.3, 2.0], &[0.0; 4]).unwrap();
        assert_eq!(grid.read(1, 1).0, 1.0);
    }

    #[test]
    fn test_reset_uniform() {
        let mut grid = GridState::new(10, 10).unwrap();
        grid.seed_patch(Chemical::V, IVec2::new(5, 5), 3, 1.0);
        grid.seed_patch(Chemical::U, IVec2::new(5, 5), 3, 0.0);
        grid.reset_uniform();
        assert!(grid.field(Chemical::U).as_slice().iter().all(|&u| u == 1.0));
        assert!(grid.field(Chemical::V).as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rows() {
        let grid = GridState::new(5, 3).unwrap();
        let field = grid.field(Chemical::U);
        assert_eq!(field.rows().count(), 3);
        assert!(field.rows().all(|row| row.len() == 5));
    }
}
