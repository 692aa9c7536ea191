//! Interactive terrain sculpting and vegetation placement core.
//!
//! A host supplies pointer-ray hits on a height-mapped surface; the
//! [`session::EditSession`] applies falloff-weighted brush strokes to
//! the height grid, reclassifies the texture layers by elevation band
//! after every edit, and scatters trees that stay anchored to the
//! surface as it deforms. Rendering, input devices and scene objects
//! live on the host side behind the [`host`] interfaces.

pub mod brush;
pub mod config;
pub mod debug_log;
pub mod height_field;
pub mod host;
pub mod session;
pub mod splat;
pub mod vegetation;
