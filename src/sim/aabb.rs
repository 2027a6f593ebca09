//! Axis-aligned box geometry
//!
//! Boxes are anchored at their top-left corner in a y-up space, so the bottom
//! edge sits at `position.y - height`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    /// Box of the given size whose center lands on `center`
    pub fn centered_at(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center - Vec2::new(width * 0.5, -height * 0.5), width, height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.width * 0.5, -self.height * 0.5)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y - self.height
    }

    /// Center-to-center distance
    #[inline]
    pub fn center_distance(&self, other: &Aabb) -> f32 {
        self.center().distance(other.center())
    }

    /// Point hit-test (edges inclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y <= self.top() && p.y >= self.bottom()
    }
}
