//! Read-only views of the simulation for renderers and debug overlays
//!
//! Snapshots copy what a frame needs out of [`GameState`] so consumers never
//! hold on to (or mutate) simulation data.

use serde::Serialize;

use crate::sim::tower::InRange;
use crate::sim::{Aabb, GamePhase, GameState, TowerKind};

#[derive(Debug, Clone, Serialize)]
pub struct EnemySprite {
    pub id: u32,
    pub aabb: Aabb,
    /// hp / hp_max, used to fade the sprite toward black
    pub health: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TowerSprite {
    pub id: u32,
    pub aabb: Aabb,
    pub kind: TowerKind,
    pub sprite: &'static str,
    pub level: usize,
    /// Radius of the range ring
    pub range: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub runtime: f32,
    pub waypoints: Vec<Aabb>,
    pub enemies: Vec<EnemySprite>,
    pub towers: Vec<TowerSprite>,
    pub projectiles: Vec<Aabb>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let enemies = state
            .enemies
            .iter_active()
            .map(|e| EnemySprite {
                id: e.id,
                aabb: e.aabb,
                health: e.health_ratio(),
            })
            .collect();

        let active_towers = || state.towers.iter().filter(|t| t.is_active);

        let towers = active_towers()
            .map(|t| TowerSprite {
                id: t.id,
                aabb: t.aabb,
                kind: t.kind,
                sprite: t.kind.label(),
                level: t.level,
                range: t.range(&state.tuning),
            })
            .collect();

        let projectiles = active_towers()
            .flat_map(|t| t.active_projectiles().map(|p| p.aabb))
            .collect();

        Self {
            runtime: state.runtime,
            waypoints: state.path.waypoints().to_vec(),
            enemies,
            towers,
            projectiles,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyDebug {
    pub id: u32,
    /// -1 until the first update
    pub target: i64,
    pub hp: i32,
    pub hp_max: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TowerDebug {
    pub id: u32,
    pub in_range: Vec<InRange>,
}

/// Numbers for the debug panel
#[derive(Debug, Clone, Serialize)]
pub struct DebugOverlay {
    pub score: u64,
    pub life: u32,
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub runtime: f32,
    pub delta_time: f32,
    pub enemies: Vec<EnemyDebug>,
    pub towers: Vec<TowerDebug>,
}

impl DebugOverlay {
    pub fn capture(state: &GameState) -> Self {
        Self {
            score: state.score,
            life: state.life,
            phase: state.phase,
            time_ticks: state.time_ticks,
            runtime: state.runtime,
            delta_time: state.delta_time,
            enemies: state
                .enemies
                .iter_active()
                .map(|e| EnemyDebug {
                    id: e.id,
                    target: e.pathfinding_target.debug_index(),
                    hp: e.hp,
                    hp_max: e.hp_max,
                })
                .collect(),
            towers: state
                .towers
                .iter()
                .filter(|t| t.is_active)
                .map(|t| TowerDebug {
                    id: t.id,
                    in_range: t.enemies_in_range.clone(),
                })
                .collect(),
        }
    }

    /// Text lines for a debug panel
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Runtime: {:.3}s ({} ticks)", self.runtime, self.time_ticks),
            format!("Delta Time (ms): {:.1}", self.delta_time * 1000.0),
            format!("Score: {}", self.score),
            format!("Life: {}", self.life),
        ];
        if self.phase == GamePhase::GameOver {
            lines.push("GAME OVER".to_string());
        }
        for enemy in &self.enemies {
            lines.push(format!("Enemy {} target: {}", enemy.id, enemy.target));
        }
        for tower in &self.towers {
            let ids: Vec<String> = tower
                .in_range
                .iter()
                .map(|e| format!("{}@{:.2}", e.enemy_id, e.distance))
                .collect();
            lines.push(format!("Tower {} in range: [{}]", tower.id, ids.join(", ")));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_render_snapshot_skips_inactive() {
        let mut state = GameState::new(Tuning::default()).unwrap();
        let first = state.towers[0].id;
        let center = state.towers[0].aabb.center();
        state.disable_tower_at(center);
        state.enemies.slots_mut()[0].death();

        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.enemies.len(), 2);
        assert_eq!(snap.towers.len(), 1);
        assert!(snap.towers.iter().all(|t| t.id != first));
        assert_eq!(snap.waypoints.len(), 15);
        assert_eq!(snap.towers[0].sprite, "fire");
        assert_eq!(snap.towers[0].range, state.tuning.tower.range[0]);
    }

    #[test]
    fn test_health_ratio_in_snapshot() {
        let mut state = GameState::new(Tuning::default()).unwrap();
        state.enemies.slots_mut()[1].hp = 125;
        let snap = RenderSnapshot::capture(&state);
        assert!((snap.enemies[1].health - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_overlay_reports_uninitialized_targets() {
        let mut state = GameState::new(Tuning::default()).unwrap();
        let overlay = DebugOverlay::capture(&state);
        assert!(overlay.enemies.iter().all(|e| e.target == -1));
        assert!(overlay.lines().iter().any(|l| l == "Enemy 1 target: -1"));

        tick(&mut state, &TickInput::default(), SIM_DT);
        let overlay = DebugOverlay::capture(&state);
        assert!(overlay.enemies.iter().all(|e| e.target >= 0));
        assert_eq!(overlay.life, state.life);
        assert_eq!(overlay.towers.len(), 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(Tuning::default()).unwrap();
        let json = serde_json::to_string(&RenderSnapshot::capture(&state)).unwrap();
        assert!(json.contains("\"sprite\":\"fire\""));
    }
}
