//! Nine-point Laplacian on a periodic grid.
//!
//! ```text
//! 0.05  0.2  0.05
//! 0.2  -1.0  0.2
//! 0.05  0.2  0.05
//! ```
//!
//! Neighbor references wrap at the edges, so the operator sums to zero over
//! the whole grid for any input.

/// Weight of the four orthogonal neighbors.
pub const EDGE_WEIGHT: f32 = 0.2;
/// Weight of the four diagonal neighbors.
pub const CORNER_WEIGHT: f32 = 0.05;
/// Weight of the cell itself.
pub const CENTER_WEIGHT: f32 = -1.0;

/// Computes the Laplacian of `src` into `dst`.
///
/// Both slices are row-major `width` x `height`. Only `src` is read; `dst`
/// is fully overwritten. No allocation.
///
/// # Panics
///
/// Panics if either slice length differs from `width * height`.
pub fn laplacian_into(src: &[f32], dst: &mut [f32], width: usize, height: usize) {
    assert_eq!(src.len(), width * height, "source has wrong size");
    assert_eq!(dst.len(), width * height, "destination has wrong size");

    for (y, out) in dst.chunks_exact_mut(width).enumerate() {
        let north = row(src, if y == 0 { height - 1 } else { y - 1 }, width);
        let here = row(src, y, width);
        let south = row(src, if y + 1 == height { 0 } else { y + 1 }, width);

        if width == 1 {
            out[0] = point(north, here, south, 0, 0, 0);
            continue;
        }

        out[0] = point(north, here, south, width - 1, 0, 1);
        for x in 1..width - 1 {
            out[x] = point(north, here, south, x - 1, x, x + 1);
        }
        out[width - 1] = point(north, here, south, width - 2, width - 1, 0);
    }
}

/// Returns the Laplacian of `field` as a new buffer.
pub fn laplacian(field: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut out = vec![0.0; field.len()];
    laplacian_into(field, &mut out, width, height);
    out
}

#[inline(always)]
fn row(field: &[f32], y: usize, width: usize) -> &[f32] {
    &field[y * width..(y + 1) * width]
}

#[inline(always)]
fn point(north: &[f32], here: &[f32], south: &[f32], xm: usize, x: usize, xp: usize) -> f32 {
    EDGE_WEIGHT * (north[x] + south[x] + here[xm] + here[xp])
        + CORNER_WEIGHT * (north[xm] + north[xp] + south[xm] + south[xp])
        + CENTER_WEIGHT * here[x]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_field(width: usize, height: usize, seed: u64) -> Vec<f32> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..width * height).map(|_| rng.random::<f32>()).collect()
    }

    #[test]
    fn test_constant_field_has_zero_laplacian() {
        let lap = laplacian(&vec![0.7; 12 * 9], 12, 9);
        assert!(lap.iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_weights_sum_to_zero() {
        let total = 4.0 * EDGE_WEIGHT + 4.0 * CORNER_WEIGHT + CENTER_WEIGHT;
        assert!(total.abs() < 1e-6);
    }

    #[test]
    fn test_impulse_response() {
        let (w, h) = (5, 5);
        let mut field = vec![0.0; w * h];
        field[2 * w + 2] = 1.0;
        let lap = laplacian(&field, w, h);

        assert_eq!(lap[2 * w + 2], -1.0);
        assert_eq!(lap[2 * w + 1], 0.2);
        assert_eq!(lap[w + 2], 0.2);
        assert_eq!(lap[w + 1], 0.05);
        assert_eq!(lap[3 * w + 3], 0.05);
        assert_eq!(lap[0], 0.0);
    }

    #[test]
    fn test_impulse_at_corner_wraps() {
        let (w, h) = (6, 4);
        let mut field = vec![0.0; w * h];
        field[0] = 1.0;
        let lap = laplacian(&field, w, h);

        // West and north neighbors live on the opposite edges.
        assert_eq!(lap[w - 1], 0.2);
        assert_eq!(lap[(h - 1) * w], 0.2);
        assert_eq!(lap[(h - 1) * w + (w - 1)], 0.05);
        assert_eq!(lap[w + 1], 0.05);
    }

    #[test]
    fn test_periodic_sum_is_zero() {
        for (w, h, seed) in [(64, 64, 1), (17, 5, 2), (3, 40, 3), (1, 7, 4), (2, 2, 5)] {
            let field = random_field(w, h, seed);
            let lap = laplacian(&field, w, h);
            let sum: f64 = lap.iter().map(|&v| v as f64).sum();
            assert!(sum.abs() < 1e-3, "{w}x{h}: sum = {sum}");
        }
    }

    #[test]
    fn test_into_matches_allocating_version() {
        let field = random_field(13, 11, 9);
        let mut out = vec![123.0; field.len()];
        laplacian_into(&field, &mut out, 13, 11);
        assert_eq!(out, laplacian(&field, 13, 11));
    }

    #[test]
    fn test_shape_is_preserved() {
        let field = random_field(7, 3, 10);
        assert_eq!(laplacian(&field, 7, 3).len(), 21);
    }

    #[test]
    #[should_panic(expected = "destination has wrong size")]
    fn test_mismatched_destination_panics() {
        let field = vec![0.0; 16];
        let mut out = vec![0.0; 15];
        laplacian_into(&field, &mut out, 4, 4);
    }
}
