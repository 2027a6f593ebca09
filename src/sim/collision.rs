//! Box-box collision detection
//!
//! Two tests: a plain overlap check used for merging and projectile hits, and
//! a directional check that classifies which side of `b1` was struck.

use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

/// Which side of the first box the second box penetrates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionSide {
    None,
    Left,
    Right,
    Top,
    Bottom,
}

/// Strict AABB overlap (touching edges do not count)
pub fn overlap(b1: &Aabb, b2: &Aabb) -> bool {
    let x = b1.left() < b2.right() && b1.right() > b2.left();
    let y = b1.top() > b2.bottom() && b1.bottom() < b2.top();
    x && y
}

/// Classify an overlap by its shallowest penetration axis
///
/// The axis with the smaller penetration depth is the separation axis and the
/// sign of the center delta on that axis picks the side. When both depths are
/// equal the vertical branch wins.
pub fn directional_overlap(b1: &Aabb, b2: &Aabb) -> CollisionSide {
    if !overlap(b1, b2) {
        return CollisionSide::None;
    }

    let delta = b2.center() - b1.center();

    let pen_x = (b1.width + b2.width) * 0.5 - delta.x.abs();
    let pen_y = (b1.height + b2.height) * 0.5 - delta.y.abs();

    if pen_x < pen_y {
        if delta.x > 0.0 {
            CollisionSide::Left
        } else {
            CollisionSide::Right
        }
    } else if delta.y > 0.0 {
        CollisionSide::Bottom
    } else {
        CollisionSide::Top
    }
}
