//! Tree scattering and re-anchoring.
//!
//! Placement is rejection sampling inside the brush disc: every slot
//! gets a bounded number of draws and is dropped silently when none of
//! them lands clear of the spacing and bounds constraints. Spawned
//! trees are tracked so later sculpting can pin them back onto the
//! surface.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::brush::StrokeFootprint;
use crate::config::VegetationConfig;
use crate::height_field::HeightField;
use crate::host::TreeId;

/// Cells on either side of a modified cell whose trees get re-anchored.
const REANCHOR_MARGIN: i32 = 2;

/// A placement accepted by [`VegetationPlacer::place_batch`], not yet
/// spawned by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreePlacement {
    /// World position, already dropped onto the surface.
    pub position: Vec3,
    /// Index into the host's prototype list.
    pub prototype: usize,
    /// Rotation around the vertical axis, radians.
    pub yaw: f32,
}

/// A spawned tree tracked for re-anchoring.
#[derive(Clone, Copy, Debug)]
struct PlacedTree {
    id: TreeId,
    position: Vec3,
}

pub struct VegetationPlacer {
    config: VegetationConfig,
    trees: Vec<PlacedTree>,
}

impl VegetationPlacer {
    pub fn new(config: VegetationConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// World positions of every tracked tree.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.trees.iter().map(|tree| tree.position)
    }

    /// Scatter placements in the disc of `radius` around `center`.
    ///
    /// Requests `round(radius^2 * density)` slots. A draw is accepted
    /// when it lands on the terrain and keeps the minimum planar
    /// spacing to every earlier placement, batch and registry alike.
    /// A slot that exhausts its draw budget is skipped; crowded discs
    /// simply yield fewer trees.
    pub fn place_batch(
        &self,
        center: Vec3,
        radius: f32,
        field: &HeightField,
        rng: &mut impl Rng,
    ) -> Vec<TreePlacement> {
        let requested = (radius * radius * self.config.density).round() as usize;
        let mut accepted: Vec<TreePlacement> = Vec::with_capacity(requested);

        for _ in 0..requested {
            for _ in 0..self.config.sample_budget {
                let offset = sample_in_disc(radius, rng);
                let x = center.x + offset.x;
                let z = center.z + offset.y;
                if !field.contains_world(x, z) {
                    continue;
                }
                let planar = Vec2::new(x, z);
                let clear = self
                    .trees
                    .iter()
                    .map(|tree| Vec2::new(tree.position.x, tree.position.z))
                    .chain(
                        accepted
                            .iter()
                            .map(|placement| Vec2::new(placement.position.x, placement.position.z)),
                    )
                    .all(|other| planar.distance(other) >= self.config.min_spacing);
                if !clear {
                    continue;
                }

                let position = Vec3::new(x, field.height_at_world(x, z), z);
                accepted.push(TreePlacement {
                    position,
                    prototype: rng.random_range(0..self.config.prototype_count),
                    yaw: rng.random_range(0.0..std::f32::consts::TAU),
                });
                break;
            }
        }
        accepted
    }

    /// Track a spawned tree. No duplicate detection: registering the
    /// same id twice only costs redundant re-anchor work later.
    pub fn register(&mut self, id: TreeId, position: Vec3) {
        self.trees.push(PlacedTree { id, position });
    }

    /// Pin trees near the modified cells back onto the surface.
    ///
    /// A tree whose nearest grid cell lies within two cells of any
    /// footprint cell gets its height reset to the terrain elevation
    /// at that cell, horizontal position untouched. Everything further
    /// out is left alone. Returns the re-anchored trees so the host
    /// can move their scene objects.
    pub fn reanchor(
        &mut self,
        footprint: &StrokeFootprint,
        field: &HeightField,
    ) -> Vec<(TreeId, Vec3)> {
        if footprint.is_empty() {
            return Vec::new();
        }
        let mut moved = Vec::new();
        for tree in &mut self.trees {
            let cell = field.world_to_cell(tree.position);
            if !footprint.within_margin(cell, REANCHOR_MARGIN) {
                continue;
            }
            tree.position.y = field.world_height_at_cell(cell);
            moved.push((tree.id, tree.position));
        }
        moved
    }
}

/// Uniform point in the disc of `radius` around the origin.
fn sample_in_disc(radius: f32, rng: &mut impl Rng) -> Vec2 {
    let r = radius * rng.random::<f32>().sqrt();
    let theta = rng.random_range(0.0..std::f32::consts::TAU);
    Vec2::new(r * theta.cos(), r * theta.sin())
}
