//! Tower projectiles
//!
//! Projectiles live in a fixed pool owned by their tower. A slot is launched
//! toward where the target stood at fire time and flies straight until it
//! expires or hits the first live enemy in its way.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::{CollisionSide, directional_overlap, overlap};
use super::enemy::Enemy;
use crate::tuning::ProjectileTuning;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Projectile {
    /// False means the pool slot is free
    pub is_active: bool,
    pub spawn_time: f32,
    pub aabb: Aabb,
    /// Unit direction of travel
    pub dir: Vec2,
}

/// What a projectile did during one update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flight {
    /// Slot is free
    Idle,
    /// Still travelling
    Flying,
    /// Lived out its time-to-live
    Expired,
    /// Struck an enemy and was consumed
    Hit {
        enemy_id: u32,
        side: CollisionSide,
        killed: bool,
    },
}

impl Projectile {
    /// Activate this slot at `origin` heading for `target`
    pub fn launch(&mut self, origin: Vec2, target: Vec2, now: f32, tuning: &ProjectileTuning) {
        *self = Self {
            is_active: true,
            spawn_time: now,
            aabb: Aabb::centered_at(origin, tuning.width, tuning.height),
            dir: (target - origin).normalize_or_zero(),
        };
    }

    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        now - self.spawn_time
    }

    /// Expire, move and collide for one tick
    ///
    /// Only active enemies are considered. The first one overlapped takes
    /// `damage` and the projectile is spent.
    pub fn advance(
        &mut self,
        enemies: &mut [Enemy],
        now: f32,
        dt: f32,
        tuning: &ProjectileTuning,
        damage: i32,
    ) -> Flight {
        if !self.is_active {
            return Flight::Idle;
        }

        if self.age(now) >= tuning.ttl {
            self.is_active = false;
            return Flight::Expired;
        }

        self.aabb.position += self.dir * tuning.speed * dt;

        for enemy in enemies.iter_mut().filter(|e| e.is_active) {
            if !overlap(&self.aabb, &enemy.aabb) {
                continue;
            }
            let side = directional_overlap(&self.aabb, &enemy.aabb);
            let killed = enemy.take_damage(damage);
            self.is_active = false;
            return Flight::Hit {
                enemy_id: enemy.id,
                side,
                killed,
            };
        }

        Flight::Flying
    }
}

/// Index of the first free slot in a pool
pub fn free_slot(pool: &[Projectile]) -> Option<usize> {
    pool.iter().position(|p| !p.is_active)
}
