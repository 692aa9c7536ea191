//! Collaborator interface to the rendering host.
//!
//! The core never owns scene objects or input devices: the host feeds
//! pointer raycast results into session commands and receives spawn
//! and move requests back through [`TreeHost`].

use glam::Vec3;

/// What a pointer ray struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// The terrain surface itself.
    Terrain,
    /// Any other collider; edits and placements ignore these.
    Other,
}

/// A pointer raycast result supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub target: HitTarget,
}

impl RayHit {
    /// A hit on the terrain surface.
    pub fn terrain(point: Vec3) -> Self {
        Self {
            point,
            target: HitTarget::Terrain,
        }
    }
}

/// Opaque handle to a tree object owned by the host scene. The core
/// only ever hands it back to the host together with a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeId(pub u64);

/// Scene-side operations the session needs from its host.
pub trait TreeHost {
    /// Instantiate a tree prototype at a position with a yaw rotation.
    /// The returned id must stay valid for the session lifetime.
    fn spawn_tree(&mut self, prototype: usize, position: Vec3, yaw: f32) -> TreeId;

    /// Move an already spawned tree.
    fn set_tree_position(&mut self, id: TreeId, position: Vec3);
}
