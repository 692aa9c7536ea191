//! The height grid and its brush edits.
//!
//! One field owns the whole grid for a terrain instance: surface
//! classification and vegetation placement read elevations through its
//! accessors instead of holding their own copies. Heights are
//! normalized to [0, 1] and scaled by the world size on the way out.

use glam::{Vec2, Vec3};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::brush::{falloff, Cell, StrokeFootprint, StrokeKind};
use crate::config::{InitialTerrain, TerrainConfig};

pub struct HeightField {
    config: TerrainConfig,
    resolution: usize,
    /// Row-major, indexed `z * resolution + x`.
    heights: Vec<f32>,
}

impl HeightField {
    /// Build the field according to the configured initial terrain.
    pub fn generate(config: &TerrainConfig) -> Self {
        match config.initial {
            InitialTerrain::Flat => Self::flat(config),
            InitialTerrain::Fractal {
                seed,
                octaves,
                frequency,
                amplitude,
            } => Self::fractal(config, seed, octaves, frequency, amplitude),
        }
    }

    fn flat(config: &TerrainConfig) -> Self {
        let resolution = config.height_resolution;
        Self {
            heights: vec![config.ground_level; resolution * resolution],
            resolution,
            config: config.clone(),
        }
    }

    fn fractal(
        config: &TerrainConfig,
        seed: u32,
        octaves: usize,
        frequency: f64,
        amplitude: f32,
    ) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves)
            .set_frequency(frequency)
            .set_lacunarity(2.0)
            .set_persistence(0.5);

        let resolution = config.height_resolution;
        let mut heights = Vec::with_capacity(resolution * resolution);
        for z in 0..resolution {
            for x in 0..resolution {
                let sample = fbm.get([x as f64, z as f64]) as f32;
                heights.push((config.ground_level + sample * amplitude).clamp(0.0, 1.0));
            }
        }
        Self {
            heights,
            resolution,
            config: config.clone(),
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Raw normalized heights, row-major.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Normalized height at a cell, indices clamped into range.
    pub fn height_at(&self, x: i32, z: i32) -> f32 {
        let limit = self.resolution as i32 - 1;
        let x = x.clamp(0, limit) as usize;
        let z = z.clamp(0, limit) as usize;
        self.heights[z * self.resolution + x]
    }

    /// World position to fractional grid coordinates.
    pub fn world_to_grid(&self, point: Vec3) -> Vec2 {
        let origin = self.config.origin;
        let size = self.config.size;
        Vec2::new(
            (point.x - origin.x) / size.x * self.resolution as f32,
            (point.z - origin.z) / size.z * self.resolution as f32,
        )
    }

    /// World position to the nearest grid cell.
    pub fn world_to_cell(&self, point: Vec3) -> Cell {
        let grid = self.world_to_grid(point);
        Cell::new(grid.x.round() as i32, grid.y.round() as i32)
    }

    /// True if a world XZ position lies on the terrain footprint.
    pub fn contains_world(&self, x: f32, z: f32) -> bool {
        let origin = self.config.origin;
        let size = self.config.size;
        x >= origin.x && x <= origin.x + size.x && z >= origin.z && z <= origin.z + size.z
    }

    /// World-space elevation at a world XZ position, bilinear between
    /// the four surrounding cells.
    pub fn height_at_world(&self, x: f32, z: f32) -> f32 {
        let grid = self.world_to_grid(Vec3::new(x, 0.0, z));
        let max = (self.resolution - 1) as f32;
        let gx = grid.x.clamp(0.0, max);
        let gz = grid.y.clamp(0.0, max);
        let x0 = gx.floor() as i32;
        let z0 = gz.floor() as i32;
        let fx = gx - x0 as f32;
        let fz = gz - z0 as f32;

        let h00 = self.height_at(x0, z0);
        let h10 = self.height_at(x0 + 1, z0);
        let h01 = self.height_at(x0, z0 + 1);
        let h11 = self.height_at(x0 + 1, z0 + 1);
        let height = h00 * (1.0 - fx) * (1.0 - fz)
            + h10 * fx * (1.0 - fz)
            + h01 * (1.0 - fx) * fz
            + h11 * fx * fz;
        self.config.origin.y + height * self.config.size.y
    }

    /// World-space elevation at a cell. Re-anchoring snaps trees to
    /// this, the nearest-cell variant.
    pub fn world_height_at_cell(&self, cell: Cell) -> f32 {
        self.config.origin.y + self.height_at(cell.x, cell.z) * self.config.size.y
    }

    /// Apply one raise/lower stroke centered on a cell.
    ///
    /// Cells within the radius move by `strength * falloff * sign`,
    /// clamped to [0, 1]. Every in-bounds cell inside the radius enters
    /// the footprint, including cells the clamp left unchanged:
    /// re-anchoring still has to inspect them. A non-positive radius is
    /// an empty edit.
    pub fn apply_brush(
        &mut self,
        center: Cell,
        radius: f32,
        strength: f32,
        kind: StrokeKind,
    ) -> StrokeFootprint {
        let mut footprint = StrokeFootprint::new();
        if radius <= 0.0 {
            return footprint;
        }

        let inner = -(radius.floor() as i32);
        let outer = radius.ceil() as i32;
        let limit = self.resolution as i32;

        for dz in inner..=outer {
            for dx in inner..=outer {
                let distance = ((dx * dx + dz * dz) as f32).sqrt();
                if distance > radius {
                    continue;
                }
                let x = center.x + dx;
                let z = center.z + dz;
                if x < 0 || x >= limit || z < 0 || z >= limit {
                    continue;
                }
                let delta = strength * falloff(distance, radius) * kind.sign();
                let index = z as usize * self.resolution + x as usize;
                self.heights[index] = (self.heights[index] + delta).clamp(0.0, 1.0);
                footprint.add(Cell::new(x, z));
            }
        }
        footprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 9x9 grid at ground level 0.5 over a matching world footprint.
    fn small_config() -> TerrainConfig {
        TerrainConfig {
            size: Vec3::new(9.0, 10.0, 9.0),
            height_resolution: 9,
            splat_resolution: 8,
            ..TerrainConfig::default()
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_flat_generation() {
        let field = HeightField::generate(&small_config());
        assert_eq!(field.resolution(), 9);
        assert!(field.heights().iter().all(|&h| h == 0.5));
    }

    #[test]
    fn test_raise_with_falloff() {
        let mut field = HeightField::generate(&small_config());
        let footprint = field.apply_brush(Cell::new(4, 4), 2.0, 0.1, StrokeKind::Raise);

        // Center gets the full strength.
        assert!(approx(field.height_at(4, 4), 0.6));
        // One cell out: influence (2 - 1) / 2 = 0.5.
        assert!(approx(field.height_at(5, 4), 0.55));
        assert!(approx(field.height_at(4, 3), 0.55));
        // Rim cell at distance 2: influence 0, but still in the footprint.
        assert!(approx(field.height_at(6, 4), 0.5));
        assert!(footprint.contains(&Cell::new(6, 4)));
        // Beyond the radius: untouched and not recorded.
        assert!(approx(field.height_at(7, 4), 0.5));
        assert!(approx(field.height_at(6, 6), 0.5));
        assert!(!footprint.contains(&Cell::new(6, 6)));
    }

    #[test]
    fn test_falloff_monotonic_with_distance() {
        let mut field = HeightField::generate(&small_config());
        field.apply_brush(Cell::new(4, 4), 2.0, 0.1, StrokeKind::Raise);

        let center = field.height_at(4, 4);
        let near = field.height_at(5, 4); // distance 1
        let diagonal = field.height_at(5, 5); // distance sqrt(2)
        let rim = field.height_at(6, 4); // distance 2

        assert!(center > near);
        assert!(near > diagonal);
        assert!(diagonal > rim);
    }

    #[test]
    fn test_lower_mirrors_raise() {
        let mut field = HeightField::generate(&small_config());
        field.apply_brush(Cell::new(4, 4), 2.0, 0.1, StrokeKind::Lower);
        assert!(approx(field.height_at(4, 4), 0.4));
        assert!(approx(field.height_at(5, 4), 0.45));
    }

    #[test]
    fn test_heights_stay_clamped() {
        let mut field = HeightField::generate(&small_config());
        for _ in 0..20 {
            field.apply_brush(Cell::new(4, 4), 2.0, 0.1, StrokeKind::Raise);
        }
        assert!(field.heights().iter().all(|&h| (0.0..=1.0).contains(&h)));
        assert_eq!(field.height_at(4, 4), 1.0);

        for _ in 0..40 {
            field.apply_brush(Cell::new(4, 4), 2.0, 0.1, StrokeKind::Lower);
        }
        assert!(field.heights().iter().all(|&h| (0.0..=1.0).contains(&h)));
        assert_eq!(field.height_at(4, 4), 0.0);
    }

    #[test]
    fn test_clamped_cells_still_enter_footprint() {
        let config = TerrainConfig {
            ground_level: 1.0,
            ..small_config()
        };
        let mut field = HeightField::generate(&config);
        let footprint = field.apply_brush(Cell::new(4, 4), 2.0, 0.1, StrokeKind::Raise);

        // Nothing could move, the footprint still reports every cell.
        assert_eq!(field.height_at(4, 4), 1.0);
        assert_eq!(footprint.len(), 13);
    }

    #[test]
    fn test_zero_radius_is_empty_edit() {
        let mut field = HeightField::generate(&small_config());
        let footprint = field.apply_brush(Cell::new(4, 4), 0.0, 0.1, StrokeKind::Raise);
        assert!(footprint.is_empty());
        assert!(field.heights().iter().all(|&h| h == 0.5));
    }

    #[test]
    fn test_brush_clips_at_grid_edge() {
        let mut field = HeightField::generate(&small_config());
        let footprint = field.apply_brush(Cell::new(0, 0), 2.0, 0.1, StrokeKind::Raise);

        // Only the in-bounds quadrant of the 13-cell disc survives.
        assert_eq!(footprint.len(), 6);
        for cell in footprint.iter() {
            assert!(cell.x >= 0 && cell.z >= 0);
        }
        assert!(approx(field.height_at(0, 0), 0.6));
    }

    #[test]
    fn test_world_to_cell_rounds_to_nearest() {
        let field = HeightField::generate(&small_config());
        // size 9 over 9 cells: one world unit per cell.
        assert_eq!(field.world_to_cell(Vec3::new(4.2, 0.0, 3.8)), Cell::new(4, 4));
        assert_eq!(field.world_to_cell(Vec3::new(6.6, 0.0, 0.4)), Cell::new(7, 0));
    }

    #[test]
    fn test_height_at_world_interpolates() {
        let config = TerrainConfig {
            size: Vec3::new(4.0, 10.0, 4.0),
            height_resolution: 4,
            ground_level: 0.25,
            ..TerrainConfig::default()
        };
        let mut field = HeightField::generate(&config);
        // Radius 1 spike: only the center cell moves (rim influence 0).
        field.apply_brush(Cell::new(2, 2), 1.0, 0.5, StrokeKind::Raise);
        assert!(approx(field.height_at(2, 2), 0.75));

        // On the spike cell: 0.75 * 10.
        assert!(approx(field.height_at_world(2.0, 2.0), 7.5));
        // Halfway between spike and neighbor: mean of 0.75 and 0.25.
        assert!(approx(field.height_at_world(1.5, 2.0), 5.0));
        // Far corner still flat.
        assert!(approx(field.height_at_world(0.0, 0.0), 2.5));
    }

    #[test]
    fn test_world_height_at_cell_uses_elevation_scale() {
        let field = HeightField::generate(&small_config());
        // ground 0.5 over a 10-unit elevation scale.
        assert!(approx(field.world_height_at_cell(Cell::new(4, 4)), 5.0));
    }

    #[test]
    fn test_contains_world_bounds_inclusive() {
        let field = HeightField::generate(&small_config());
        assert!(field.contains_world(0.0, 0.0));
        assert!(field.contains_world(9.0, 9.0));
        assert!(field.contains_world(4.5, 8.9));
        assert!(!field.contains_world(-0.1, 4.0));
        assert!(!field.contains_world(4.0, 9.1));
    }

    #[test]
    fn test_fractal_generation_is_bounded_and_deterministic() {
        let config = TerrainConfig {
            initial: InitialTerrain::Fractal {
                seed: 7,
                octaves: 4,
                frequency: 0.13,
                amplitude: 0.8,
            },
            ..small_config()
        };
        let a = HeightField::generate(&config);
        let b = HeightField::generate(&config);

        assert!(a.heights().iter().all(|&h| (0.0..=1.0).contains(&h)));
        assert_eq!(a.heights(), b.heights());
        // Amplitude 0.8 around 0.5 actually displaces something.
        assert!(a.heights().iter().any(|&h| h != 0.5));
    }
}
