//! Game state and core simulation types
//!
//! Everything the simulation reads or writes lives in [`GameState`]; update
//! functions receive it explicitly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::arena::Arena;
use super::collision::CollisionSide;
use super::enemy::Enemy;
use super::path::Path;
use super::tower::{Tower, TowerKind};
use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation running
    Playing,
    /// Life ran out; the world is frozen
    GameOver,
}

/// Something that happened during the last tick, for audio/effects consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned {
        enemy_id: u32,
    },
    TowerSpawned {
        tower_id: u32,
    },
    TowerDisabled {
        tower_id: u32,
    },
    /// Enemy walked past the last waypoint and cost a life
    LapCompleted {
        enemy_id: u32,
        life_remaining: u32,
    },
    EnemiesMerged {
        survivor_id: u32,
        absorbed_id: u32,
    },
    ProjectileFired {
        tower_id: u32,
        enemy_id: u32,
    },
    ProjectileExpired {
        tower_id: u32,
    },
    ProjectileHit {
        tower_id: u32,
        enemy_id: u32,
        /// Side of the projectile box the enemy was struck on
        side: CollisionSide,
        damage: i32,
    },
    EnemyKilled {
        enemy_id: u32,
    },
    GameOver,
}

/// Complete simulation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Score (never decreases)
    pub score: u64,
    /// Player lives
    pub life: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds simulated since the run started
    pub runtime: f32,
    /// Duration of the last tick
    pub delta_time: f32,
    /// Enemy route
    pub path: Path,
    pub enemies: Arena<Enemy>,
    /// Towers in creation order (never removed)
    pub towers: Vec<Tower>,
    pub tuning: Tuning,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Validate `tuning`, build the path and place the starting entities
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        let path = Path::from_normalized(
            &tuning.path.points,
            tuning.path.marker_width,
            tuning.path.marker_height,
        )?;

        let mut state = Self {
            score: 0,
            life: tuning.starting_life,
            phase: GamePhase::Playing,
            time_ticks: 0,
            runtime: 0.0,
            delta_time: 0.0,
            path,
            enemies: Arena::new(),
            towers: Vec::new(),
            tuning,
            events: Vec::new(),
            next_id: 1,
        };

        let enemy_seeds = state.tuning.initial_enemies.clone();
        for seed in enemy_seeds {
            state.spawn_enemy(Vec2::from(seed.position), seed.hp, seed.hp_max);
        }
        let tower_seeds = state.tuning.initial_towers.clone();
        for seed in tower_seeds {
            state.spawn_tower(Vec2::from(seed.position), seed.kind, seed.level);
        }
        state.events.clear();

        log::info!(
            "Simulation ready: {} waypoints, {} enemies, {} towers, {} lives",
            state.path.len(),
            state.enemies.active_count(),
            state.towers.len(),
            state.life
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place an enemy with its top-left corner at `position` (simulation space)
    pub fn spawn_enemy(&mut self, position: Vec2, hp: i32, hp_max: i32) -> u32 {
        let id = self.next_entity_id();
        let size = &self.tuning.enemy;
        let aabb = Aabb::new(position, size.width, size.height);
        let slot = self.enemies.insert(Enemy::new(id, aabb, hp, hp_max));
        log::debug!("Spawned enemy {id} in slot {slot} at {position}");
        self.events.push(GameEvent::EnemySpawned { enemy_id: id });
        id
    }

    /// Place a tower with its top-left corner at `position` (simulation space)
    pub fn spawn_tower(&mut self, position: Vec2, kind: TowerKind, level: usize) -> u32 {
        let id = self.next_entity_id();
        let aabb = Aabb::new(position, self.tuning.tower.width, self.tuning.tower.height);
        self.towers.push(Tower::new(id, kind, aabb, level, self.runtime));
        log::info!("Spawned {} tower {id} (level {level}) at {position}", kind.label());
        self.events.push(GameEvent::TowerSpawned { tower_id: id });
        id
    }

    /// Disable the first active tower whose box contains `point`
    pub fn disable_tower_at(&mut self, point: Vec2) -> Option<u32> {
        let tower = self
            .towers
            .iter_mut()
            .find(|t| t.is_active && t.aabb.contains_point(point))?;
        tower.disable();
        let id = tower.id;
        log::info!("Disabled tower {id}");
        self.events.push(GameEvent::TowerDisabled { tower_id: id });
        Some(id)
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.find_by_id(id)
    }

    pub fn tower(&self, id: u32) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
