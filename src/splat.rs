//! Elevation-band surface classification.
//!
//! The splat mask gives every surface cell a one-hot weight vector
//! over the texture layers (water, grass, mountain in the default
//! three-band setup). The classifier rebuilds the whole mask from the
//! height grid after each edit; at these resolutions the full pass is
//! cheap and keeps the mask trivially consistent with the heights.

use crate::config::TerrainConfig;
use crate::height_field::HeightField;

/// Per-cell layer weights over an A x A grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SplatMask {
    resolution: usize,
    layers: usize,
    /// Indexed `(z * resolution + x) * layers + layer`.
    weights: Vec<f32>,
}

impl SplatMask {
    fn new(resolution: usize, layers: usize) -> Self {
        Self {
            resolution,
            layers,
            weights: vec![0.0; resolution * resolution * layers],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn layer_count(&self) -> usize {
        self.layers
    }

    /// Weight of one layer at a cell. Off-grid cells and unknown
    /// layers read as 0 rather than panicking.
    pub fn weight(&self, x: usize, z: usize, layer: usize) -> f32 {
        if x >= self.resolution || z >= self.resolution || layer >= self.layers {
            return 0.0;
        }
        self.weights[(z * self.resolution + x) * self.layers + layer]
    }

    /// The layer carrying the weight at a cell. With one-hot weights
    /// this is the classified band; off-grid cells read the bottom
    /// layer.
    pub fn dominant_layer(&self, x: usize, z: usize) -> usize {
        if x >= self.resolution || z >= self.resolution {
            return 0;
        }
        let base = (z * self.resolution + x) * self.layers;
        let mut best = 0;
        for layer in 1..self.layers {
            if self.weights[base + layer] > self.weights[base + best] {
                best = layer;
            }
        }
        best
    }

    fn set_one_hot(&mut self, x: usize, z: usize, layer: usize) {
        let base = (z * self.resolution + x) * self.layers;
        for slot in 0..self.layers {
            self.weights[base + slot] = if slot == layer { 1.0 } else { 0.0 };
        }
    }
}

/// Rebuilds the splat mask from elevation bands.
pub struct SurfaceClassifier {
    thresholds: Vec<f32>,
    mask: SplatMask,
}

impl SurfaceClassifier {
    pub fn new(config: &TerrainConfig) -> Self {
        let layers = config.thresholds.len() + 1;
        Self {
            thresholds: config.thresholds.clone(),
            mask: SplatMask::new(config.splat_resolution, layers),
        }
    }

    /// Layer index for a normalized height: the first threshold the
    /// height falls under, else the top layer. A height exactly at a
    /// threshold lands in the band above it.
    pub fn classify(&self, height: f32) -> usize {
        for (layer, &threshold) in self.thresholds.iter().enumerate() {
            if height < threshold {
                return layer;
            }
        }
        self.thresholds.len()
    }

    /// Recompute the whole mask from the height grid.
    ///
    /// Splat cells map onto height cells by the resolution ratio,
    /// clamped at the top edge. Idempotent: a second pass without an
    /// intervening edit produces a bit-identical mask.
    pub fn recompute(&mut self, field: &HeightField) {
        let splat_res = self.mask.resolution;
        let height_res = field.resolution();
        for z in 0..splat_res {
            for x in 0..splat_res {
                let hx = ((x as f32 / splat_res as f32) * height_res as f32) as usize;
                let hz = ((z as f32 / splat_res as f32) * height_res as f32) as usize;
                let hx = hx.min(height_res - 1) as i32;
                let hz = hz.min(height_res - 1) as i32;
                let layer = self.classify(field.height_at(hx, hz));
                self.mask.set_one_hot(x, z, layer);
            }
        }
    }

    pub fn mask(&self) -> &SplatMask {
        &self.mask
    }
}
