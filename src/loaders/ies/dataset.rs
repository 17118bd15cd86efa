// src/loaders/ies/dataset.rs
// Decoded photometric dataset and its rasterization into storage tiles
// RELEVANT FILES: src/loaders/ies/parser.rs, src/core/storage.rs

use half::f16;

use crate::error::LoadError;

/// Decoded photometric web of one profile.
///
/// Candela values are stored on the measured angle grid and sampled with
/// bilinear interpolation when rasterized. Horizontal lookups fold or wrap
/// according to the measured span, matching LM-63 Type C symmetry rules:
/// a single plane is rotationally symmetric, 0–90 mirrors per quadrant,
/// 0–180 mirrors bilaterally, 0–360 wraps.
#[derive(Debug, Clone, Default)]
pub struct IesDataset {
    vertical_angles: Vec<f32>,
    horizontal_angles: Vec<f32>,
    /// Candela values indexed `[horizontal plane][vertical angle]`
    candela: Vec<Vec<f32>>,
}

impl IesDataset {
    /// Build a dataset from angle lists and a matching candela grid.
    pub fn new(
        vertical_angles: Vec<f32>,
        horizontal_angles: Vec<f32>,
        candela: Vec<Vec<f32>>,
    ) -> Result<Self, LoadError> {
        if candela.len() != horizontal_angles.len() {
            return Err(LoadError::malformed(format!(
                "candela grid has {} planes for {} horizontal angles",
                candela.len(),
                horizontal_angles.len()
            )));
        }
        if let Some(row) = candela.iter().find(|r| r.len() != vertical_angles.len()) {
            return Err(LoadError::malformed(format!(
                "candela plane has {} samples for {} vertical angles",
                row.len(),
                vertical_angles.len()
            )));
        }
        Ok(Self {
            vertical_angles,
            horizontal_angles,
            candela,
        })
    }

    /// True when the dataset holds no usable samples.
    pub fn is_empty(&self) -> bool {
        self.vertical_angles.is_empty()
            || self.horizontal_angles.is_empty()
            || self.candela.is_empty()
    }

    /// Largest candela value on the grid.
    pub fn peak_candela(&self) -> f32 {
        self.candela
            .iter()
            .flatten()
            .copied()
            .fold(0.0f32, f32::max)
    }

    /// Scale every candela value in place.
    pub fn scale(&mut self, factor: f32) {
        for row in &mut self.candela {
            for value in row {
                *value *= factor;
            }
        }
    }

    /// Sample the distribution at a vertical/horizontal angle pair (degrees).
    /// Angles outside the measured grid clamp to the nearest measurement.
    pub fn sample(&self, vertical_deg: f32, horizontal_deg: f32) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let horizontal = self.fold_horizontal(horizontal_deg);
        let (h0, h1, ht) = segment(&self.horizontal_angles, horizontal);
        let (v0, v1, vt) = segment(&self.vertical_angles, vertical_deg);

        let low = lerp(self.candela[h0][v0], self.candela[h0][v1], vt);
        let high = lerp(self.candela[h1][v0], self.candela[h1][v1], vt);
        lerp(low, high, ht)
    }

    /// Rasterize into a `width`×`height` single-channel tile: x sweeps the
    /// vertical angle 0→180, y sweeps the horizontal angle 0→360.
    pub fn generate_tile(&self, width: u32, height: u32) -> Vec<f16> {
        let mut texels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            let horizontal = 360.0 * y as f32 / height.saturating_sub(1).max(1) as f32;
            for x in 0..width {
                let vertical = 180.0 * x as f32 / width.saturating_sub(1).max(1) as f32;
                texels.push(f16::from_f32(self.sample(vertical, horizontal)));
            }
        }
        texels
    }

    /// Fold a horizontal angle into the measured span.
    fn fold_horizontal(&self, horizontal_deg: f32) -> f32 {
        let first = self.horizontal_angles[0];
        let last = self.horizontal_angles[self.horizontal_angles.len() - 1];
        if self.horizontal_angles.len() == 1 {
            return first;
        }

        let mut h = horizontal_deg.rem_euclid(360.0);
        if last <= 90.0 + 1e-3 {
            // Quadrant symmetry
            h = h.rem_euclid(180.0);
            if h > 90.0 {
                h = 180.0 - h;
            }
        } else if last <= 180.0 + 1e-3 {
            // Bilateral symmetry
            if h > 180.0 {
                h = 360.0 - h;
            }
        }
        h.clamp(first, last)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Locate `angle` within a strictly increasing angle list, returning the
/// bracketing indices and the interpolation factor between them.
fn segment(angles: &[f32], angle: f32) -> (usize, usize, f32) {
    let last = angles.len() - 1;
    if angle <= angles[0] {
        return (0, 0, 0.0);
    }
    if angle >= angles[last] {
        return (last, last, 0.0);
    }
    let hi = angles.partition_point(|&a| a <= angle);
    let lo = hi - 1;
    let t = (angle - angles[lo]) / (angles[hi] - angles[lo]);
    (lo, hi, t)
}
