//! PNG export of a captured field.

use std::path::Path;

use anyhow::{Context, ensure};
use rhizome_turing_rd::Snapshot;

use crate::ramp::Ramp;

/// Maps the V field of `snapshot` through `ramp`, upscales each cell to a
/// `scale` x `scale` block and returns the image.
pub fn render(snapshot: &Snapshot, ramp: &Ramp, scale: u32) -> anyhow::Result<image::RgbImage> {
    ensure!(scale > 0, "scale must be at least 1");
    let width = u32::try_from(snapshot.width)?
        .checked_mul(scale)
        .context("snapshot too large")?;
    let height = u32::try_from(snapshot.height)?
        .checked_mul(scale)
        .context("snapshot too large")?;

    Ok(image::RgbImage::from_fn(width, height, |x, y| {
        let idx = (y / scale) as usize * snapshot.width + (x / scale) as usize;
        image::Rgb(ramp.sample(snapshot.v[idx]))
    }))
}

/// Renders `snapshot` and writes it to `path` as PNG.
pub fn write_png(
    snapshot: &Snapshot,
    ramp: &Ramp,
    scale: u32,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let img = render(snapshot, ramp, scale)?;
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), frame = snapshot.frame, "snapshot saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ramp::Colormap;

    fn snapshot() -> Snapshot {
        Snapshot {
            width: 3,
            height: 2,
            frame: 0,
            u: vec![1.0; 6],
            v: vec![0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn test_render_scales_cells() {
        let ramp = Colormap::Classic.ramp();
        let img = render(&snapshot(), &ramp, 2).unwrap();
        assert_eq!(img.dimensions(), (6, 4));
        assert_eq!(img.get_pixel(2, 0).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(3, 1).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [10, 10, 40]);
        assert_eq!(img.get_pixel(5, 3).0, [255, 255, 255]);
    }

    #[test]
    fn test_oversized_scale_is_rejected() {
        let ramp = Colormap::Classic.ramp();
        let err = render(&snapshot(), &ramp, u32::MAX).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_zero_scale_is_rejected() {
        let ramp = Colormap::Classic.ramp();
        assert!(render(&snapshot(), &ramp, 0).is_err());
    }
}
