//! Enemy entity and its path-following state machine
//!
//! An enemy starts with no waypoint target, snaps to the nearest waypoint on
//! its first update, then walks the path at constant speed. Passing the last
//! waypoint completes a lap: the enemy is sent back to waypoint 0 fully healed
//! and the caller charges the player one life.

use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::arena::Slot;
use super::collision::overlap;
use super::path::Path;
use crate::consts::{MERGE_DIVISOR, WAYPOINT_THRESHOLD};

/// Waypoint cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PathTarget {
    /// Nearest waypoint not computed yet
    #[default]
    Uninitialized,
    /// Walking toward this waypoint index
    Following(usize),
}

impl PathTarget {
    pub fn index(&self) -> Option<usize> {
        match self {
            PathTarget::Uninitialized => None,
            PathTarget::Following(k) => Some(*k),
        }
    }

    /// Index for overlays, -1 while uninitialized
    pub fn debug_index(&self) -> i64 {
        match self {
            PathTarget::Uninitialized => -1,
            PathTarget::Following(k) => *k as i64,
        }
    }
}

/// Result of moving an enemy for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moving,
    /// Reached a waypoint and now targets the returned index
    ReachedWaypoint(usize),
    /// Passed the final waypoint and restarted at waypoint 0
    LapCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub is_active: bool,
    pub hp: i32,
    pub hp_max: i32,
    pub aabb: Aabb,
    pub pathfinding_target: PathTarget,
}

impl Slot for Enemy {
    fn id(&self) -> u32 {
        self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl Enemy {
    /// `hp` is capped at `hp_max`
    pub fn new(id: u32, aabb: Aabb, hp: i32, hp_max: i32) -> Self {
        Self {
            id,
            is_active: true,
            hp: hp.min(hp_max),
            hp_max,
            aabb,
            pathfinding_target: PathTarget::Uninitialized,
        }
    }

    pub fn death(&mut self) {
        self.is_active = false;
    }

    /// Subtract `amount` hp; deactivates and returns true if this killed the enemy
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        if self.is_active && self.hp <= 0 {
            self.death();
            return true;
        }
        false
    }

    /// Health fraction in [0, 1] for tinting
    pub fn health_ratio(&self) -> f32 {
        if self.hp_max <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.hp_max as f32).clamp(0.0, 1.0)
    }

    /// Point the cursor at the nearest waypoint if it has not been set yet
    pub fn bootstrap_target(&mut self, path: &Path) -> usize {
        match self.pathfinding_target {
            PathTarget::Following(k) => k,
            PathTarget::Uninitialized => {
                let k = path.nearest(&self.aabb);
                self.pathfinding_target = PathTarget::Following(k);
                k
            }
        }
    }

    /// Move the cursor to the next waypoint. Returns true when that wraps past the end.
    ///
    /// # Panics
    /// If the cursor was never bootstrapped.
    pub fn advance_target(&mut self, path_len: usize) -> bool {
        let PathTarget::Following(k) = self.pathfinding_target else {
            panic!(
                "enemy {} advanced its waypoint cursor before bootstrap",
                self.id
            );
        };
        let next = k + 1;
        if next >= path_len {
            self.pathfinding_target = PathTarget::Following(0);
            true
        } else {
            self.pathfinding_target = PathTarget::Following(next);
            false
        }
    }

    /// Walk toward the current waypoint by `speed * dt`
    ///
    /// The step is capped at the remaining distance so the enemy lands on the
    /// waypoint instead of orbiting it.
    pub fn step(&mut self, path: &Path, speed: f32, dt: f32) -> StepOutcome {
        let k = self.bootstrap_target(path);
        let target = path.waypoints()[k].position;

        let to_target = target - self.aabb.position;
        let dist = to_target.length();
        let step = speed * dt;
        if dist <= step {
            self.aabb.position = target;
        } else {
            self.aabb.position += to_target / dist * step;
        }

        if self.aabb.position.distance(target) >= WAYPOINT_THRESHOLD {
            return StepOutcome::Moving;
        }

        if self.advance_target(path.len()) {
            self.aabb.position = path.first().position;
            self.hp = self.hp_max;
            StepOutcome::LapCompleted
        } else {
            StepOutcome::ReachedWaypoint(k + 1)
        }
    }

    /// Fold `other` into this enemy
    ///
    /// Each of width, height, hp_max and hp becomes the larger value plus a
    /// fifth of the smaller one; hp is then capped by the new hp_max.
    pub fn absorb(&mut self, other: &Enemy) {
        self.aabb.width = merge_extent(self.aabb.width, other.aabb.width);
        self.aabb.height = merge_extent(self.aabb.height, other.aabb.height);
        self.hp_max = merge_stat(self.hp_max, other.hp_max);
        self.hp = merge_stat(self.hp, other.hp).min(self.hp_max);
    }
}

/// `max + min / 5` with integer truncation
#[inline]
pub fn merge_stat(a: i32, b: i32) -> i32 {
    a.max(b) + a.min(b) / MERGE_DIVISOR
}

#[inline]
pub fn merge_extent(a: f32, b: f32) -> f32 {
    a.max(b) + a.min(b) / MERGE_DIVISOR as f32
}

/// Absorb every active enemy overlapping `enemies[index]`, visiting candidates in `order`
///
/// Returns the ids of the absorbed enemies, which are left inactive.
pub fn merge_overlapping(enemies: &mut [Enemy], index: usize, order: &[usize]) -> Vec<u32> {
    let mut absorbed = Vec::new();
    for &j in order {
        if j == index {
            continue;
        }
        let other = enemies[j];
        if !other.is_active || !overlap(&enemies[index].aabb, &other.aabb) {
            continue;
        }
        enemies[index].absorb(&other);
        enemies[j].death();
        absorbed.push(other.id);
    }
    if !absorbed.is_empty() {
        log::debug!(
            "enemy {} absorbed {:?} (hp {}/{})",
            enemies[index].id,
            absorbed,
            enemies[index].hp,
            enemies[index].hp_max
        );
    }
    absorbed
}
