//! Brush state and stroke footprints.
//!
//! The brush is a disc on the terrain surface: scroll input grows and
//! shrinks it between fixed bounds, strokes raise or lower the covered
//! cells with a linear falloff toward the rim. The footprint of a
//! stroke is the set of cells it touched, handed straight to surface
//! reclassification and tree re-anchoring and then dropped.

use std::collections::HashSet;

use glam::{Quat, Vec3};

use crate::config::BrushConfig;

/// Direction of a sculpting stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeKind {
    /// Push terrain up toward 1.
    Raise,
    /// Carve terrain down toward 0.
    Lower,
}

impl StrokeKind {
    /// Sign applied to the stroke strength.
    pub fn sign(self) -> f32 {
        match self {
            StrokeKind::Raise => 1.0,
            StrokeKind::Lower => -1.0,
        }
    }
}

/// Linear falloff: full influence at the center, zero at the rim.
/// Callers only pass distances within the radius.
pub fn falloff(distance: f32, radius: f32) -> f32 {
    (radius - distance) / radius
}

/// A 2D cell position on the height grid (XZ plane).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// The set of cells touched by one brush application, with bounds for
/// cheap neighborhood rejection.
#[derive(Clone, Debug)]
pub struct StrokeFootprint {
    cells: HashSet<Cell>,
    min_x: i32,
    max_x: i32,
    min_z: i32,
    max_z: i32,
}

impl Default for StrokeFootprint {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeFootprint {
    pub fn new() -> Self {
        Self {
            cells: HashSet::new(),
            min_x: i32::MAX,
            max_x: i32::MIN,
            min_z: i32::MAX,
            max_z: i32::MIN,
        }
    }

    /// Add a cell to the footprint.
    pub fn add(&mut self, cell: Cell) {
        self.min_x = self.min_x.min(cell.x);
        self.max_x = self.max_x.max(cell.x);
        self.min_z = self.min_z.min(cell.z);
        self.max_z = self.max_z.max(cell.z);
        self.cells.insert(cell);
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if `cell` lies within `margin` cells (Chebyshev distance)
    /// of any footprint cell. The bounds reject distant probes before
    /// the per-cell scan.
    pub fn within_margin(&self, cell: Cell, margin: i32) -> bool {
        if self.cells.is_empty() {
            return false;
        }
        if cell.x < self.min_x - margin
            || cell.x > self.max_x + margin
            || cell.z < self.min_z - margin
            || cell.z > self.max_z + margin
        {
            return false;
        }
        self.cells
            .iter()
            .any(|c| (c.x - cell.x).abs() <= margin && (c.z - cell.z).abs() <= margin)
    }
}

/// World transform of the brush indicator, for the host to render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorPose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Brush radius, stroke strength and indicator state.
#[derive(Clone, Debug)]
pub struct BrushState {
    radius: f32,
    config: BrushConfig,
    indicator: Option<IndicatorPose>,
}

impl BrushState {
    pub fn new(config: BrushConfig) -> Self {
        let radius = config
            .initial_radius
            .clamp(config.min_radius, config.max_radius);
        Self {
            radius,
            config,
            indicator: None,
        }
    }

    /// Scroll adjustment: the delta is scaled by the size speed and
    /// the result clamped into the configured bounds.
    pub fn adjust_radius(&mut self, delta: f32) {
        self.radius = (self.radius + delta * self.config.size_speed)
            .clamp(self.config.min_radius, self.config.max_radius);
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn strength(&self) -> f32 {
        self.config.strength
    }

    /// Indicator footprint diameter, the scale hosts render it at.
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    /// Place the indicator; also makes it visible.
    pub fn set_indicator(&mut self, position: Vec3, rotation: Quat) {
        self.indicator = Some(IndicatorPose { position, rotation });
    }

    pub fn hide_indicator(&mut self) {
        self.indicator = None;
    }

    /// Current pose, `None` while hidden.
    pub fn indicator(&self) -> Option<IndicatorPose> {
        self.indicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BrushConfig {
        BrushConfig::default()
    }

    #[test]
    fn test_radius_clamps_at_bounds() {
        let mut brush = BrushState::new(test_config());
        assert_eq!(brush.radius(), 5.0);

        brush.adjust_radius(100.0);
        assert_eq!(brush.radius(), 20.0);

        brush.adjust_radius(-100.0);
        assert_eq!(brush.radius(), 1.0);

        // Stays clamped under repeated pushes.
        for _ in 0..10 {
            brush.adjust_radius(-3.0);
        }
        assert_eq!(brush.radius(), 1.0);
    }

    #[test]
    fn test_initial_radius_is_clamped() {
        let config = BrushConfig {
            initial_radius: 50.0,
            ..test_config()
        };
        let brush = BrushState::new(config);
        assert_eq!(brush.radius(), 20.0);
    }

    #[test]
    fn test_adjust_scales_by_size_speed() {
        let config = BrushConfig {
            size_speed: 2.0,
            ..test_config()
        };
        let mut brush = BrushState::new(config);
        brush.adjust_radius(1.5);
        assert_eq!(brush.radius(), 8.0);
        assert_eq!(brush.diameter(), 16.0);
    }

    #[test]
    fn test_falloff_is_linear() {
        assert_eq!(falloff(0.0, 2.0), 1.0);
        assert_eq!(falloff(1.0, 2.0), 0.5);
        assert_eq!(falloff(2.0, 2.0), 0.0);
    }

    #[test]
    fn test_stroke_kind_signs() {
        assert_eq!(StrokeKind::Raise.sign(), 1.0);
        assert_eq!(StrokeKind::Lower.sign(), -1.0);
    }

    #[test]
    fn test_footprint_collects_cells_and_bounds() {
        let mut footprint = StrokeFootprint::new();
        assert!(footprint.is_empty());

        footprint.add(Cell::new(4, 4));
        footprint.add(Cell::new(6, 3));
        footprint.add(Cell::new(4, 4)); // duplicate

        assert_eq!(footprint.len(), 2);
        assert!(footprint.contains(&Cell::new(6, 3)));
        assert!(!footprint.contains(&Cell::new(5, 5)));
    }

    #[test]
    fn test_within_margin_window() {
        let mut footprint = StrokeFootprint::new();
        footprint.add(Cell::new(5, 5));

        assert!(footprint.within_margin(Cell::new(5, 5), 2));
        assert!(footprint.within_margin(Cell::new(7, 5), 2));
        assert!(footprint.within_margin(Cell::new(3, 3), 2));
        assert!(!footprint.within_margin(Cell::new(8, 5), 2));
        assert!(!footprint.within_margin(Cell::new(7, 8), 2));
    }

    #[test]
    fn test_within_margin_empty_footprint() {
        let footprint = StrokeFootprint::new();
        assert!(!footprint.within_margin(Cell::new(0, 0), 2));
    }

    #[test]
    fn test_indicator_visibility() {
        let mut brush = BrushState::new(test_config());
        assert!(brush.indicator().is_none());

        brush.set_indicator(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        let pose = brush.indicator().unwrap();
        assert_eq!(pose.position, Vec3::new(1.0, 2.0, 3.0));

        brush.hide_indicator();
        assert!(brush.indicator().is_none());
    }
}
