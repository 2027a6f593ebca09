//! Path Defense - simulation core of a waypoint tower-defense prototype
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pathing, targeting, projectiles, game state)
//! - `snapshot`: Read-only views for renderers and debug overlays
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use snapshot::{DebugOverlay, RenderSnapshot};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one enemy step per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Reference window the normalized coordinates were authored against
    pub const WINDOW_WIDTH: u32 = 1280;
    pub const WINDOW_HEIGHT: u32 = 720;
    pub const ASPECT_RATIO: f32 = WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32;

    /// Number of tower upgrade levels
    pub const MAX_LEVEL: usize = 5;
    /// Projectile slots per tower
    pub const PROJECTILE_POOL_SIZE: usize = 6;

    /// Distance at which an enemy counts as having reached its waypoint
    pub const WAYPOINT_THRESHOLD: f32 = 0.01;
    /// Absorption divisor for merges (smaller value contributes 1/5)
    pub const MERGE_DIVISOR: i32 = 5;
}

/// Convert normalized window coordinates (origin top-left, y down) to
/// centered device coordinates (origin center, y up)
#[inline]
pub fn window_normalized_to_ndc(norm: Vec2) -> Vec2 {
    Vec2::new(norm.x * 2.0 - 1.0, 1.0 - norm.y * 2.0)
}

/// Inverse of [`window_normalized_to_ndc`]
#[inline]
pub fn ndc_to_window_normalized(ndc: Vec2) -> Vec2 {
    Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_corners_map_to_ndc_corners() {
        assert_eq!(window_normalized_to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(window_normalized_to_ndc(Vec2::new(1.0, 1.0)), Vec2::new(1.0, -1.0));
        assert_eq!(window_normalized_to_ndc(Vec2::new(0.5, 0.5)), Vec2::ZERO);
    }

    #[test]
    fn test_transforms_are_inverse() {
        let p = Vec2::new(0.371, 0.616);
        let back = ndc_to_window_normalized(window_normalized_to_ndc(p));
        assert!((back - p).length() < 1e-6);
    }
}
