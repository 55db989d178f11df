use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::marching_squares::Point;

/// Noise-based scalar field for synthetic isoline inputs.
/// Values fall roughly within `[-amplitude, amplitude]`; the same seed always
/// produces the same field.
pub struct NoiseField {
    fbm: Fbm<Perlin>,
    amplitude: f64,
}

impl NoiseField {
    pub fn new(seed: u32, octaves: usize, frequency: f64, amplitude: f64) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves)
            .set_frequency(frequency)
            .set_lacunarity(2.0)
            .set_persistence(0.5);

        Self { fbm, amplitude }
    }

    /// Field value at `(x, y)`
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.fbm.get([x, y]) * self.amplitude
    }

    /// Samples a `rows x cols` point grid with `spacing` between neighbours.
    /// Point `[i][j]` sits at `x = j * spacing`, `y = i * spacing`.
    pub fn sample_grid(&self, rows: usize, cols: usize, spacing: f64) -> Vec<Vec<Point>> {
        (0..rows)
            .map(|i| {
                let y = i as f64 * spacing;
                (0..cols)
                    .map(|j| {
                        let x = j as f64 * spacing;
                        Point::new(x, y, self.sample(x, y))
                    })
                    .collect()
            })
            .collect()
    }

    pub fn get_amplitude(&self) -> f64 {
        self.amplitude
    }
}
