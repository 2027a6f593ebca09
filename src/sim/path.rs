//! Waypoint route shared by every enemy
//!
//! A path is an ordered list of waypoint boxes. Enemies walk it front to back
//! and restart from waypoint 0 once they pass the last one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::tuning::TuningError;
use crate::window_normalized_to_ndc;

/// Immutable, non-empty sequence of waypoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Aabb>", into = "Vec<Aabb>")]
pub struct Path {
    waypoints: Vec<Aabb>,
}

impl TryFrom<Vec<Aabb>> for Path {
    type Error = TuningError;

    fn try_from(waypoints: Vec<Aabb>) -> Result<Self, Self::Error> {
        Self::new(waypoints)
    }
}

impl From<Path> for Vec<Aabb> {
    fn from(path: Path) -> Self {
        path.waypoints
    }
}

impl Path {
    /// Build a path from waypoint boxes in simulation space
    pub fn new(waypoints: Vec<Aabb>) -> Result<Self, TuningError> {
        if waypoints.is_empty() {
            return Err(TuningError::EmptyPath);
        }
        Ok(Self { waypoints })
    }

    /// Build a path from normalized window coordinates, one marker box per point
    pub fn from_normalized(
        points: &[[f32; 2]],
        marker_width: f32,
        marker_height: f32,
    ) -> Result<Self, TuningError> {
        let waypoints = points
            .iter()
            .map(|&[x, y]| {
                Aabb::new(
                    window_normalized_to_ndc(Vec2::new(x, y)),
                    marker_width,
                    marker_height,
                )
            })
            .collect();
        Self::new(waypoints)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false: construction rejects empty paths
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Aabb> {
        self.waypoints.get(index)
    }

    #[inline]
    pub fn first(&self) -> &Aabb {
        &self.waypoints[0]
    }

    pub fn waypoints(&self) -> &[Aabb] {
        &self.waypoints
    }

    /// Index of the waypoint whose center is closest to `aabb`'s center
    ///
    /// Ties keep the lowest index.
    pub fn nearest(&self, aabb: &Aabb) -> usize {
        let mut best = 0;
        let mut best_dist = f32::INFINITY;
        for (i, waypoint) in self.waypoints.iter().enumerate() {
            let dist = waypoint.center_distance(aabb);
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }
}
