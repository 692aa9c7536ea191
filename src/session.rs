//! The editing session: command surface over the terrain core.
//!
//! Hosts feed pointer hits and input deltas at whatever cadence they
//! like; each command runs to completion synchronously, so a session
//! is single-threaded by construction. A stroke flows through the
//! height grid, the surface classifier and tree re-anchoring before
//! the call returns.

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::brush::{BrushState, IndicatorPose, StrokeKind};
use crate::config::{ConfigError, SessionConfig};
use crate::debug_log::debug_log;
use crate::height_field::HeightField;
use crate::host::{HitTarget, RayHit, TreeHost};
use crate::splat::{SplatMask, SurfaceClassifier};
use crate::vegetation::VegetationPlacer;

/// Lift applied to the sculpting indicator so it does not fight the
/// surface for depth.
const INDICATOR_LIFT: f32 = 0.1;

/// Which tool the session is driving. The two are mutually exclusive:
/// commands for the inactive tool are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Brush strokes deform the terrain.
    #[default]
    Sculpt,
    /// Placement batches spawn trees; sculpting is disabled.
    Plant,
}

/// What a sculpting command did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrokeOutcome {
    /// Cells the brush touched.
    pub modified_cells: usize,
    /// Trees pinned back onto the surface.
    pub reanchored: usize,
}

pub struct EditSession {
    brush: BrushState,
    field: HeightField,
    classifier: SurfaceClassifier,
    placer: VegetationPlacer,
    mode: EditMode,
    rng: StdRng,
}

impl EditSession {
    /// Validate the configuration and build the session: initial
    /// terrain fill, first surface classification, indicator at the
    /// origin.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::from_os_rng())
    }

    /// Same as [`EditSession::new`] with a deterministic placement RNG.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: SessionConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = HeightField::generate(&config.terrain);
        let mut classifier = SurfaceClassifier::new(&config.terrain);
        classifier.recompute(&field);

        let mut brush = BrushState::new(config.brush);
        brush.set_indicator(Vec3::ZERO, Quat::IDENTITY);

        debug_log(&format!(
            "session: {}x{} height grid, {} texture layers, brush radius {}",
            field.resolution(),
            field.resolution(),
            classifier.mask().layer_count(),
            brush.radius(),
        ));
        Ok(Self {
            brush,
            field,
            classifier,
            placer: VegetationPlacer::new(config.vegetation),
            mode: EditMode::default(),
            rng,
        })
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn mask(&self) -> &SplatMask {
        self.classifier.mask()
    }

    pub fn tree_count(&self) -> usize {
        self.placer.tree_count()
    }

    /// Current indicator pose, `None` while hidden.
    pub fn indicator(&self) -> Option<IndicatorPose> {
        self.brush.indicator()
    }

    /// Flip between sculpting and planting. Entering planting resets
    /// the indicator to the origin; returning to sculpting hides it
    /// until the next pointer update.
    pub fn toggle_mode(&mut self) -> EditMode {
        self.mode = match self.mode {
            EditMode::Sculpt => {
                self.brush.set_indicator(Vec3::ZERO, Quat::IDENTITY);
                EditMode::Plant
            }
            EditMode::Plant => {
                self.brush.hide_indicator();
                EditMode::Sculpt
            }
        };
        debug_log(&format!("mode: {:?}", self.mode));
        self.mode
    }

    /// Scroll input: grow or shrink the brush.
    pub fn adjust_brush(&mut self, delta: f32) {
        self.brush.adjust_radius(delta);
    }

    /// Apply one raise/lower stroke at a pointer hit, then reclassify
    /// the surface and re-anchor nearby trees through the host.
    ///
    /// A missing hit, a non-terrain hit or planting mode all degrade
    /// to a no-op outcome.
    pub fn stroke(
        &mut self,
        hit: Option<RayHit>,
        kind: StrokeKind,
        host: &mut dyn TreeHost,
    ) -> StrokeOutcome {
        if self.mode != EditMode::Sculpt {
            return StrokeOutcome::default();
        }
        let Some(hit) = hit else {
            return StrokeOutcome::default();
        };
        if hit.target != HitTarget::Terrain {
            return StrokeOutcome::default();
        }

        let center = self.field.world_to_cell(hit.point);
        let footprint =
            self.field
                .apply_brush(center, self.brush.radius(), self.brush.strength(), kind);
        if footprint.is_empty() {
            return StrokeOutcome::default();
        }

        self.classifier.recompute(&self.field);
        let moved = self.placer.reanchor(&footprint, &self.field);
        for (id, position) in &moved {
            host.set_tree_position(*id, *position);
        }

        debug_log(&format!(
            "stroke: {:?} at cell ({}, {}), {} cells, {} trees re-anchored",
            kind,
            center.x,
            center.z,
            footprint.len(),
            moved.len(),
        ));
        StrokeOutcome {
            modified_cells: footprint.len(),
            reanchored: moved.len(),
        }
    }

    /// Scatter a tree batch at a pointer hit: spawn each accepted
    /// placement through the host and register the returned handle.
    /// Returns the number of trees spawned.
    pub fn place(&mut self, hit: Option<RayHit>, host: &mut dyn TreeHost) -> usize {
        if self.mode != EditMode::Plant {
            return 0;
        }
        let Some(hit) = hit else {
            return 0;
        };
        if hit.target != HitTarget::Terrain {
            return 0;
        }

        let batch =
            self.placer
                .place_batch(hit.point, self.brush.radius(), &self.field, &mut self.rng);
        let spawned = batch.len();
        for placement in batch {
            let id = host.spawn_tree(placement.prototype, placement.position, placement.yaw);
            self.placer.register(id, placement.position);
        }

        if spawned > 0 {
            debug_log(&format!(
                "place: {} trees around ({:.1}, {:.1}), {} total",
                spawned,
                hit.point.x,
                hit.point.z,
                self.placer.tree_count(),
            ));
        }
        spawned
    }

    /// Track the pointer for the brush indicator. The sculpting disc
    /// lies flat just above the hit; the planting marker stands
    /// upright on the sampled surface. Without a terrain hit the pose
    /// is left as it was.
    pub fn pointer_moved(&mut self, hit: Option<RayHit>) {
        let Some(hit) = hit else {
            return;
        };
        if hit.target != HitTarget::Terrain {
            return;
        }
        match self.mode {
            EditMode::Sculpt => {
                let position = hit.point + Vec3::Y * INDICATOR_LIFT;
                let rotation = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
                self.brush.set_indicator(position, rotation);
            }
            EditMode::Plant => {
                let height = self.field.height_at_world(hit.point.x, hit.point.z);
                let position = Vec3::new(hit.point.x, height, hit.point.z);
                self.brush.set_indicator(position, Quat::IDENTITY);
            }
        }
    }
}
