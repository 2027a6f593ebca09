//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::{StepOutcome, merge_overlapping};
use super::state::{GameEvent, GamePhase, GameState};
use super::tower::TowerKind;
use crate::window_normalized_to_ndc;

/// Discrete command from the input layer
///
/// Positions are normalized window coordinates (0..1, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SpawnEnemy { at: Vec2 },
    SpawnTower { at: Vec2, kind: TowerKind },
    DisableTower { at: Vec2 },
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Applied in order before anything moves
    pub commands: Vec<Command>,
}

/// Apply one input command to the state
pub fn apply_command(state: &mut GameState, command: &Command) {
    match *command {
        Command::SpawnEnemy { at } => {
            let (hp, hp_max) = (state.tuning.enemy.hp, state.tuning.enemy.hp_max);
            state.spawn_enemy(window_normalized_to_ndc(at), hp, hp_max);
        }
        Command::SpawnTower { at, kind } => {
            state.spawn_tower(window_normalized_to_ndc(at), kind, 0);
        }
        Command::DisableTower { at } => {
            if state.disable_tower_at(window_normalized_to_ndc(at)).is_none() {
                log::debug!("No active tower under {at}, disable ignored");
            }
        }
    }
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    for command in &input.commands {
        apply_command(state, command);
    }

    state.time_ticks += 1;
    state.delta_time = dt;
    state.runtime += dt;

    if state.phase == GamePhase::GameOver {
        return;
    }

    update_enemies(state, dt);
    update_towers(state, dt);

    state.enemies.reclaim();

    if state.life == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Game over after {:.2}s (score {})",
            state.runtime,
            state.score
        );
    }
}

/// Move, merge and cull enemies in ascending id order
fn update_enemies(state: &mut GameState, dt: f32) {
    let order = state.enemies.indices_by_id();
    let speed = state.tuning.enemy.speed;
    let path = &state.path;
    let enemies = state.enemies.slots_mut();

    for &i in &order {
        if !enemies[i].is_active {
            continue;
        }

        match enemies[i].step(path, speed, dt) {
            StepOutcome::Moving => {}
            StepOutcome::ReachedWaypoint(next) => {
                log::trace!("enemy {} heading to waypoint {}", enemies[i].id, next);
            }
            StepOutcome::LapCompleted => {
                state.life = state.life.saturating_sub(1);
                log::info!(
                    "Enemy {} completed a lap, {} lives left",
                    enemies[i].id,
                    state.life
                );
                state.events.push(GameEvent::LapCompleted {
                    enemy_id: enemies[i].id,
                    life_remaining: state.life,
                });
            }
        }

        for absorbed_id in merge_overlapping(enemies, i, &order) {
            state.events.push(GameEvent::EnemiesMerged {
                survivor_id: enemies[i].id,
                absorbed_id,
            });
        }

        if enemies[i].hp <= 0 {
            enemies[i].death();
            log::debug!("enemy {} died", enemies[i].id);
            state.events.push(GameEvent::EnemyKilled {
                enemy_id: enemies[i].id,
            });
        }
    }
}

/// Scan, fire and fly projectiles for every tower in creation order
fn update_towers(state: &mut GameState, dt: f32) {
    let now = state.runtime;
    let enemies = state.enemies.slots_mut();
    for tower in &mut state.towers {
        tower.update(enemies, now, dt, &state.tuning, &mut state.events);
    }
}
