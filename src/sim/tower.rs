//! Towers: range scan, target choice and rate-limited firing
//!
//! Every tick an active tower rebuilds its in-range list from scratch, fires
//! at the closest enemy when its level's firing delay has elapsed, then flies
//! every projectile in its pool.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::enemy::Enemy;
use super::projectile::{Flight, Projectile, free_slot};
use super::state::GameEvent;
use crate::consts::{MAX_LEVEL, PROJECTILE_POOL_SIZE};
use crate::tuning::{ProjectileTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TowerKind {
    #[default]
    Fire,
    Ice,
    Buff,
}

impl TowerKind {
    /// Whether this kind launches projectiles. Ice and Buff are reserved.
    pub fn is_armed(self) -> bool {
        match self {
            TowerKind::Fire => true,
            TowerKind::Ice | TowerKind::Buff => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TowerKind::Fire => "fire",
            TowerKind::Ice => "ice",
            TowerKind::Buff => "buff",
        }
    }
}

/// One entry of a tower's per-tick range snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InRange {
    pub enemy_id: u32,
    pub distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub id: u32,
    pub is_active: bool,
    pub kind: TowerKind,
    pub aabb: Aabb,
    /// Index into the level tables, `0..MAX_LEVEL`
    pub level: usize,
    /// Rebuilt every tick
    #[serde(skip)]
    pub enemies_in_range: Vec<InRange>,
    pub projectiles: [Projectile; PROJECTILE_POOL_SIZE],
    /// Runtime seconds of the last shot (creation time until the first one)
    pub time_of_last_shot: f32,
}

impl Tower {
    pub fn new(id: u32, kind: TowerKind, aabb: Aabb, level: usize, now: f32) -> Self {
        debug_assert!(level < MAX_LEVEL, "tower level {level} out of range");
        Self {
            id,
            is_active: true,
            kind,
            aabb,
            level: level.min(MAX_LEVEL - 1),
            enemies_in_range: Vec::new(),
            projectiles: [Projectile::default(); PROJECTILE_POOL_SIZE],
            time_of_last_shot: now,
        }
    }

    /// Deactivate the tower and everything it has in flight
    pub fn disable(&mut self) {
        self.is_active = false;
        self.enemies_in_range.clear();
        for projectile in &mut self.projectiles {
            projectile.is_active = false;
        }
    }

    pub fn range(&self, tuning: &Tuning) -> f32 {
        tuning.tower.range[self.level]
    }

    pub fn damage(&self, tuning: &Tuning) -> i32 {
        tuning.tower.damage[self.level]
    }

    pub fn firing_delay(&self, tuning: &Tuning) -> f32 {
        tuning.tower.firing_delay[self.level]
    }

    /// Replace the range snapshot with every active enemy closer than `range`
    pub fn scan_range(&mut self, enemies: &[Enemy], range: f32) {
        self.enemies_in_range.clear();
        for enemy in enemies.iter().filter(|e| e.is_active) {
            let distance = self.aabb.center_distance(&enemy.aabb);
            if distance < range {
                self.enemies_in_range.push(InRange {
                    enemy_id: enemy.id,
                    distance,
                });
            }
        }
    }

    /// Closest entry of the range snapshot; the earliest wins ties
    pub fn nearest_in_range(&self) -> Option<InRange> {
        let mut best: Option<InRange> = None;
        for entry in &self.enemies_in_range {
            match best {
                Some(b) if entry.distance >= b.distance => {}
                _ => best = Some(*entry),
            }
        }
        best
    }

    #[inline]
    pub fn ready_to_fire(&self, now: f32, delay: f32) -> bool {
        now - self.time_of_last_shot >= delay
    }

    /// Launch from the first free pool slot toward `target`
    ///
    /// Returns the slot used, or `None` when the pool is full. A full pool
    /// leaves the shot timer untouched.
    pub fn fire(&mut self, target: Vec2, now: f32, tuning: &ProjectileTuning) -> Option<usize> {
        let slot = free_slot(&self.projectiles)?;
        self.projectiles[slot].launch(self.aabb.center(), target, now, tuning);
        self.time_of_last_shot = now;
        Some(slot)
    }

    pub fn active_projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter().filter(|p| p.is_active)
    }

    /// Full per-tick update: scan, maybe fire, then advance the pool
    pub fn update(
        &mut self,
        enemies: &mut [Enemy],
        now: f32,
        dt: f32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.is_active {
            return;
        }

        self.scan_range(enemies, self.range(tuning));

        if self.kind.is_armed() && self.ready_to_fire(now, self.firing_delay(tuning)) {
            if let Some(target) = self.nearest_in_range() {
                let aim = enemies
                    .iter()
                    .find(|e| e.id == target.enemy_id)
                    .map(|e| e.aabb.center());
                if let Some(aim) = aim {
                    match self.fire(aim, now, &tuning.projectile) {
                        Some(slot) => {
                            log::trace!(
                                "tower {} fired slot {} at enemy {}",
                                self.id,
                                slot,
                                target.enemy_id
                            );
                            events.push(GameEvent::ProjectileFired {
                                tower_id: self.id,
                                enemy_id: target.enemy_id,
                            });
                        }
                        None => log::trace!("tower {} pool full, shot skipped", self.id),
                    }
                }
            }
        }

        let damage = self.damage(tuning);
        for projectile in &mut self.projectiles {
            match projectile.advance(enemies, now, dt, &tuning.projectile, damage) {
                Flight::Idle | Flight::Flying => {}
                Flight::Expired => events.push(GameEvent::ProjectileExpired { tower_id: self.id }),
                Flight::Hit {
                    enemy_id,
                    side,
                    killed,
                } => {
                    events.push(GameEvent::ProjectileHit {
                        tower_id: self.id,
                        enemy_id,
                        side,
                        damage,
                    });
                    if killed {
                        log::debug!("tower {} killed enemy {}", self.id, enemy_id);
                        events.push(GameEvent::EnemyKilled { enemy_id });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> Tuning {
        let mut t = Tuning::default();
        t.tower.range = [0.5, 0.6, 0.7, 0.8, 0.9];
        t.tower.damage = [10, 20, 30, 40, 50];
        t.tower.firing_delay = [1.0, 0.8, 0.6, 0.4, 0.2];
        t.projectile = ProjectileTuning {
            speed: 0.0,
            ttl: 1.0,
            width: 0.01,
            height: 0.01,
        };
        t
    }

    fn tower_at_origin(level: usize) -> Tower {
        Tower::new(1, TowerKind::Fire, Aabb::centered_at(Vec2::ZERO, 0.1, 0.1), level, 0.0)
    }

    fn enemy_at(id: u32, center: Vec2) -> Enemy {
        Enemy::new(id, Aabb::centered_at(center, 0.05, 0.05), 100, 100)
    }

    #[test]
    fn test_range_scan_filters_distance_and_activity() {
        let mut tower = tower_at_origin(0);
        let mut dead = enemy_at(3, Vec2::new(0.1, 0.0));
        dead.death();
        let enemies = vec![
            enemy_at(1, Vec2::new(0.3, 0.0)),
            enemy_at(2, Vec2::new(0.0, -0.7)),
            dead,
            enemy_at(4, Vec2::new(0.0, 0.49)),
        ];

        tower.scan_range(&enemies, 0.5);
        let ids: Vec<u32> = tower.enemies_in_range.iter().map(|e| e.enemy_id).collect();
        assert_eq!(ids, vec![1, 4]);

        // Rebuilt from scratch each scan
        tower.scan_range(&enemies, 0.35);
        let ids: Vec<u32> = tower.enemies_in_range.iter().map(|e| e.enemy_id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_nearest_tie_keeps_first() {
        let mut tower = tower_at_origin(0);
        tower.enemies_in_range = vec![
            InRange { enemy_id: 5, distance: 0.3 },
            InRange { enemy_id: 6, distance: 0.2 },
            InRange { enemy_id: 7, distance: 0.2 },
        ];
        assert_eq!(tower.nearest_in_range().map(|e| e.enemy_id), Some(6));
    }

    #[test]
    fn test_fire_rate_gating() {
        let tuning = tuning();
        let mut tower = tower_at_origin(0);
        let mut enemies = vec![enemy_at(1, Vec2::new(0.3, 0.0))];
        let mut events = Vec::new();

        // Created at t=0 with a 1s delay: not ready yet
        tower.update(&mut enemies, 0.5, 0.5, &tuning, &mut events);
        assert_eq!(tower.active_projectiles().count(), 0);

        tower.update(&mut enemies, 1.0, 0.5, &tuning, &mut events);
        assert_eq!(tower.active_projectiles().count(), 1);
        assert_eq!(tower.time_of_last_shot, 1.0);

        tower.update(&mut enemies, 1.5, 0.5, &tuning, &mut events);
        assert_eq!(tower.active_projectiles().count(), 1);

        tower.update(&mut enemies, 2.0, 0.5, &tuning, &mut events);
        assert_eq!(tower.time_of_last_shot, 2.0);
        let fired = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ProjectileFired { .. }))
            .count();
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_no_fire_without_targets() {
        let tuning = tuning();
        let mut tower = tower_at_origin(0);
        let mut enemies = vec![enemy_at(1, Vec2::new(3.0, 0.0))];
        let mut events = Vec::new();

        tower.update(&mut enemies, 5.0, 0.1, &tuning, &mut events);
        assert_eq!(tower.active_projectiles().count(), 0);
        assert_eq!(tower.time_of_last_shot, 0.0);
    }

    #[test]
    fn test_unarmed_kinds_scan_but_never_fire() {
        let tuning = tuning();
        let mut tower = tower_at_origin(0);
        tower.kind = TowerKind::Ice;
        let mut enemies = vec![enemy_at(1, Vec2::new(0.2, 0.0))];
        let mut events = Vec::new();

        tower.update(&mut enemies, 5.0, 0.1, &tuning, &mut events);
        assert_eq!(tower.enemies_in_range.len(), 1);
        assert_eq!(tower.active_projectiles().count(), 0);
    }

    #[test]
    fn test_full_pool_skips_shot() {
        let tuning = tuning();
        let mut tower = tower_at_origin(0);
        for _ in 0..PROJECTILE_POOL_SIZE {
            assert!(tower.fire(Vec2::X, 0.0, &tuning.projectile).is_some());
        }
        tower.time_of_last_shot = -10.0;
        assert_eq!(tower.fire(Vec2::X, 0.5, &tuning.projectile), None);
        assert_eq!(tower.time_of_last_shot, -10.0);
        assert_eq!(tower.active_projectiles().count(), PROJECTILE_POOL_SIZE);
    }

    #[test]
    fn test_projectile_applies_level_damage_once() {
        let mut tuning = tuning();
        tuning.projectile.speed = 1.0;
        tuning.projectile.width = 0.05;
        tuning.projectile.height = 0.05;
        let mut tower = tower_at_origin(2);
        tower.time_of_last_shot = -10.0;
        let mut enemies = vec![
            enemy_at(1, Vec2::new(0.2, 0.0)),
            enemy_at(2, Vec2::new(0.21, 0.0)),
        ];
        let mut events = Vec::new();

        // Fires at t=0 then flies 0.1 per tick toward x=0.2
        tower.update(&mut enemies, 0.0, 0.1, &tuning, &mut events);
        tower.update(&mut enemies, 0.1, 0.1, &tuning, &mut events);

        let total_damage: i32 = enemies.iter().map(|e| 100 - e.hp).sum();
        assert_eq!(total_damage, 30);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::ProjectileHit { tower_id: 1, damage: 30, .. }
        )));
    }

    #[test]
    fn test_disable_clears_pool() {
        let tuning = tuning();
        let mut tower = tower_at_origin(0);
        tower.fire(Vec2::X, 0.0, &tuning.projectile);
        tower.disable();
        assert!(!tower.is_active);
        assert_eq!(tower.active_projectiles().count(), 0);
    }

    #[test]
    fn test_kind_dispatch_is_exhaustive() {
        assert!(TowerKind::Fire.is_armed());
        assert!(!TowerKind::Ice.is_armed());
        assert!(!TowerKind::Buff.is_armed());
        assert_eq!(TowerKind::Buff.label(), "buff");
    }
}
