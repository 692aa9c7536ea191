//! Session configuration.
//!
//! Plain snapshot structs handed to the session at creation time:
//! a 513x513 height grid over a 200x50x200 world block, splat
//! resolution 512, valley/mountain bands at 0.3 and 0.7, brush radius
//! 1..=20 by default.

use glam::Vec3;
use thiserror::Error;

/// Rejected configurations. Everything here is fatal at session
/// creation; runtime paths never error once validation passes.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("heightmap resolution must be at least 2, got {0}")]
    HeightResolution(usize),
    #[error("splat resolution must be at least 1, got {0}")]
    SplatResolution(usize),
    #[error("world size must be positive on every axis, got {0:?}")]
    WorldSize(Vec3),
    #[error("ground level must lie in [0, 1], got {0}")]
    GroundLevel(f32),
    #[error("elevation thresholds must be strictly increasing inside (0, 1), got {0:?}")]
    Thresholds(Vec<f32>),
    #[error("brush radius bounds are inverted: min {min} > max {max}")]
    BrushBounds { min: f32, max: f32 },
    #[error("brush size speed must be positive, got {0}")]
    SizeSpeed(f32),
    #[error("at least one tree prototype is required")]
    NoPrototypes,
    #[error("minimum spacing must be positive, got {0}")]
    Spacing(f32),
    #[error("placement density must be positive, got {0}")]
    Density(f32),
    #[error("sample budget must be at least 1")]
    SampleBudget,
}

/// How the height grid is filled before the first edit.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum InitialTerrain {
    /// Every cell at the ground level.
    #[default]
    Flat,
    /// Fractal noise around the ground level, clamped to [0, 1].
    Fractal {
        seed: u32,
        octaves: usize,
        frequency: f64,
        amplitude: f32,
    },
}

/// Terrain shape and surface classification tuning.
#[derive(Clone, Debug)]
pub struct TerrainConfig {
    /// World position of the terrain's minimum corner.
    pub origin: Vec3,
    /// World extent: x/z span the footprint, y is the elevation scale.
    pub size: Vec3,
    /// Height grid cells per side.
    pub height_resolution: usize,
    /// Splat mask cells per side.
    pub splat_resolution: usize,
    /// Normalized elevation the terrain starts at.
    pub ground_level: f32,
    /// Ascending elevation thresholds separating texture layers.
    /// N thresholds produce N + 1 layers; the defaults give water,
    /// grass and mountain bands.
    pub thresholds: Vec<f32>,
    pub initial: InitialTerrain,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            size: Vec3::new(200.0, 50.0, 200.0),
            height_resolution: 513,
            splat_resolution: 512,
            ground_level: 0.5,
            thresholds: vec![0.3, 0.7],
            initial: InitialTerrain::Flat,
        }
    }
}

/// Brush tuning.
#[derive(Clone, Copy, Debug)]
pub struct BrushConfig {
    pub initial_radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Scroll units to radius units.
    pub size_speed: f32,
    /// Normalized height change at the brush center per stroke.
    pub strength: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            initial_radius: 5.0,
            min_radius: 1.0,
            max_radius: 20.0,
            size_speed: 1.0,
            strength: 0.005,
        }
    }
}

/// Vegetation scatter tuning.
#[derive(Clone, Copy, Debug)]
pub struct VegetationConfig {
    /// Placements requested per batch: round(radius^2 * density).
    pub density: f32,
    /// Minimum planar distance between any two placements.
    pub min_spacing: f32,
    /// Rejection-sampling draws allowed per placement slot.
    pub sample_budget: u32,
    /// Number of tree prototypes the host can instantiate.
    pub prototype_count: usize,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            density: 0.3,
            min_spacing: 2.0,
            sample_budget: 30,
            prototype_count: 1,
        }
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    pub terrain: TerrainConfig,
    pub brush: BrushConfig,
    pub vegetation: VegetationConfig,
}

impl SessionConfig {
    /// Check every fatal precondition up front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.terrain;
        if t.height_resolution < 2 {
            return Err(ConfigError::HeightResolution(t.height_resolution));
        }
        if t.splat_resolution < 1 {
            return Err(ConfigError::SplatResolution(t.splat_resolution));
        }
        if t.size.x <= 0.0 || t.size.y <= 0.0 || t.size.z <= 0.0 {
            return Err(ConfigError::WorldSize(t.size));
        }
        if !(0.0..=1.0).contains(&t.ground_level) {
            return Err(ConfigError::GroundLevel(t.ground_level));
        }
        let mut previous = 0.0f32;
        for &threshold in &t.thresholds {
            if threshold <= previous || threshold >= 1.0 {
                return Err(ConfigError::Thresholds(t.thresholds.clone()));
            }
            previous = threshold;
        }

        let b = &self.brush;
        if b.min_radius > b.max_radius {
            return Err(ConfigError::BrushBounds {
                min: b.min_radius,
                max: b.max_radius,
            });
        }
        if b.size_speed <= 0.0 {
            return Err(ConfigError::SizeSpeed(b.size_speed));
        }

        let v = &self.vegetation;
        if v.prototype_count == 0 {
            return Err(ConfigError::NoPrototypes);
        }
        if v.min_spacing <= 0.0 {
            return Err(ConfigError::Spacing(v.min_spacing));
        }
        if v.density <= 0.0 {
            return Err(ConfigError::Density(v.density));
        }
        if v.sample_budget == 0 {
            return Err(ConfigError::SampleBudget);
        }
        Ok(())
    }
}
