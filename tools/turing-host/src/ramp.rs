//! Piecewise-linear color ramps for mapping concentrations to pixels.

use clap::ValueEnum;

/// A color at a position along the ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position in [0, 1].
    pub position: f32,
    /// sRGB color.
    pub color: [u8; 3],
}

/// Sorted list of color stops sampled by linear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Ramp {
    stops: Vec<ColorStop>,
}

impl Ramp {
    /// Builds a ramp from `(position, color)` pairs, sorting by position.
    pub fn new(stops: &[(f32, [u8; 3])]) -> Self {
        let mut stops: Vec<ColorStop> = stops
            .iter()
            .map(|&(position, color)| ColorStop { position, color })
            .collect();
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { stops }
    }

    /// Samples the ramp at `t`, clamping to the end stops.
    pub fn sample(&self, t: f32) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let Some(first) = self.stops.first() else {
            return [0, 0, 0];
        };
        if t <= first.position {
            return first.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.position {
                let span = b.position - a.position;
                let local = if span > 0.0 { (t - a.position) / span } else { 1.0 };
                return lerp_rgb(a.color, b.color, local);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    std::array::from_fn(|i| {
        let v = a[i] as f32 + (b[i] as f32 - a[i] as f32) * t;
        v.round().clamp(0.0, 255.0) as u8
    })
}

/// Built-in ramps selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Colormap {
    /// Deep blue, cyan, yellow, orange, red, white.
    #[default]
    Classic,
    /// Deep purple, magenta, orange, gold, white.
    Ember,
}

impl Colormap {
    /// The ramp for this colormap.
    pub fn ramp(self) -> Ramp {
        match self {
            Colormap::Classic => Ramp::new(&[
                (0.0, [10, 10, 40]),
                (0.1, [30, 40, 100]),
                (0.3, [50, 200, 200]),
                (0.5, [200, 255, 100]),
                (0.7, [255, 175, 50]),
                (0.85, [255, 75, 80]),
                (1.0, [255, 255, 255]),
            ]),
            Colormap::Ember => Ramp::new(&[
                (0.0, [15, 5, 30]),
                (0.2, [40, 15, 80]),
                (0.4, [160, 45, 160]),
                (0.6, [255, 165, 50]),
                (0.8, [255, 235, 30]),
                (1.0, [255, 255, 255]),
            ]),
        }
    }
}
