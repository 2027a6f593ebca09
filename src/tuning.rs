//! Data-driven game balance
//!
//! Every number the simulation uses lives here. Defaults describe the stock
//! map; a JSON file can override any subset of fields.

use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ASPECT_RATIO, MAX_LEVEL};
use crate::sim::TowerKind;

/// Stock route in normalized window coordinates (origin top-left)
pub const DEFAULT_ROUTE: [[f32; 2]; 15] = [
    [0.131, 0.931],
    [0.133, 0.729],
    [0.173, 0.573],
    [0.243, 0.436],
    [0.350, 0.204],
    [0.411, 0.163],
    [0.441, 0.227],
    [0.477, 0.355],
    [0.524, 0.583],
    [0.596, 0.820],
    [0.667, 0.786],
    [0.710, 0.558],
    [0.716, 0.368],
    [0.774, 0.226],
    [0.939, 0.166],
];

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("path must contain at least one waypoint")]
    EmptyPath,
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("initial tower {index} has level {level}, past the last level table entry")]
    LevelOutOfRange { index: usize, level: usize },
    #[error("starting life must be at least 1")]
    NoLife,
    #[error("{what} has hp {hp} but hp_max {hp_max}; need 0 < hp_max and hp <= hp_max")]
    BadHealth {
        what: String,
        hp: i32,
        hp_max: i32,
    },
    #[error("tower.damage[{level}] is negative ({value})")]
    NegativeDamage { level: usize, value: i32 },
    #[error("tower.firing_delay[{level}] must be finite and non-negative (got {value})")]
    BadFiringDelay { level: usize, value: f32 },
}

fn check_health(what: impl FnOnce() -> String, hp: i32, hp_max: i32) -> Result<(), TuningError> {
    if hp_max <= 0 || hp > hp_max {
        return Err(TuningError::BadHealth {
            what: what(),
            hp,
            hp_max,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Walking speed in simulation units per second
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    /// Health given to enemies spawned by command
    pub hp: i32,
    pub hp_max: i32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            // 0.007 per frame at 60 Hz
            speed: 0.42,
            width: 0.05 / ASPECT_RATIO,
            height: 0.05,
            hp: 100,
            hp_max: 100,
        }
    }
}

/// Per-level tower tables, indexed by `Tower::level`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerTuning {
    pub width: f32,
    pub height: f32,
    /// Center-to-center reach
    pub range: [f32; MAX_LEVEL],
    pub damage: [i32; MAX_LEVEL],
    /// Minimum seconds between shots
    pub firing_delay: [f32; MAX_LEVEL],
}

impl Default for TowerTuning {
    fn default() -> Self {
        Self {
            width: 0.1 / ASPECT_RATIO,
            height: 0.05,
            range: [0.30, 0.35, 0.40, 0.45, 0.50],
            damage: [10, 15, 20, 30, 40],
            firing_delay: [1.0, 0.8, 0.6, 0.45, 0.3],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Units per second
    pub speed: f32,
    /// Seconds before an unspent projectile disappears
    pub ttl: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 1.2,
            ttl: 1.0,
            width: 0.015 / ASPECT_RATIO,
            height: 0.015,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathTuning {
    pub marker_width: f32,
    pub marker_height: f32,
    /// Waypoints in normalized window coordinates
    pub points: Vec<[f32; 2]>,
}

impl Default for PathTuning {
    fn default() -> Self {
        Self {
            marker_width: 0.05 / ASPECT_RATIO,
            marker_height: 0.05,
            points: DEFAULT_ROUTE.to_vec(),
        }
    }
}

/// Enemy present when the run starts; `position` is in simulation space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySeed {
    pub position: [f32; 2],
    pub hp: i32,
    pub hp_max: i32,
}

/// Tower present when the run starts; `position` is in simulation space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerSeed {
    pub position: [f32; 2],
    #[serde(default)]
    pub kind: TowerKind,
    #[serde(default)]
    pub level: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub starting_life: u32,
    pub enemy: EnemyTuning,
    pub tower: TowerTuning,
    pub projectile: ProjectileTuning,
    pub path: PathTuning,
    pub initial_enemies: Vec<EnemySeed>,
    pub initial_towers: Vec<TowerSeed>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_life: 20,
            enemy: EnemyTuning::default(),
            tower: TowerTuning::default(),
            projectile: ProjectileTuning::default(),
            path: PathTuning::default(),
            initial_enemies: vec![
                EnemySeed {
                    position: [0.0, 0.0],
                    hp: 100,
                    hp_max: 100,
                },
                EnemySeed {
                    position: [0.2, 0.0],
                    hp: 250,
                    hp_max: 500,
                },
                EnemySeed {
                    position: [-0.2, 0.0],
                    hp: 300,
                    hp_max: 300,
                },
            ],
            // (0.371, 0.616) and (0.897, 0.465) in window space
            initial_towers: vec![
                TowerSeed {
                    position: [-0.258, -0.232],
                    kind: TowerKind::Fire,
                    level: 0,
                },
                TowerSeed {
                    position: [0.794, 0.07],
                    kind: TowerKind::Fire,
                    level: 0,
                },
            ],
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a JSON tuning file from disk
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.starting_life == 0 {
            return Err(TuningError::NoLife);
        }
        if self.path.points.is_empty() {
            return Err(TuningError::EmptyPath);
        }

        let positives = [
            ("enemy.speed", self.enemy.speed),
            ("enemy.width", self.enemy.width),
            ("enemy.height", self.enemy.height),
            ("tower.width", self.tower.width),
            ("tower.height", self.tower.height),
            ("projectile.speed", self.projectile.speed),
            ("projectile.ttl", self.projectile.ttl),
            ("projectile.width", self.projectile.width),
            ("projectile.height", self.projectile.height),
            ("path.marker_width", self.path.marker_width),
            ("path.marker_height", self.path.marker_height),
        ];
        for (field, value) in positives {
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { field, value });
            }
        }
        for &value in &self.tower.range {
            if !(value > 0.0) {
                return Err(TuningError::NonPositive {
                    field: "tower.range",
                    value,
                });
            }
        }

        for (level, &value) in self.tower.damage.iter().enumerate() {
            if value < 0 {
                return Err(TuningError::NegativeDamage { level, value });
            }
        }
        for (level, &value) in self.tower.firing_delay.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::BadFiringDelay { level, value });
            }
        }

        check_health(|| "enemy".to_string(), self.enemy.hp, self.enemy.hp_max)?;
        for (index, seed) in self.initial_enemies.iter().enumerate() {
            check_health(|| format!("initial enemy {index}"), seed.hp, seed.hp_max)?;
        }

        for (index, seed) in self.initial_towers.iter().enumerate() {
            if seed.level >= MAX_LEVEL {
                return Err(TuningError::LevelOutOfRange {
                    index,
                    level: seed.level,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_level_tables_increase() {
        let t = TowerTuning::default();
        for i in 1..MAX_LEVEL {
            assert!(t.range[i] > t.range[i - 1]);
            assert!(t.damage[i] > t.damage[i - 1]);
            assert!(t.firing_delay[i] < t.firing_delay[i - 1]);
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning =
            Tuning::from_json(r#"{ "starting_life": 3, "enemy": { "speed": 1.0 } }"#).unwrap();
        assert_eq!(tuning.starting_life, 3);
        assert_eq!(tuning.enemy.speed, 1.0);
        assert_eq!(tuning.enemy.hp_max, 100);
        assert_eq!(tuning.path.points.len(), DEFAULT_ROUTE.len());
    }

    #[test]
    fn test_json_tower_seed_kind() {
        let tuning = Tuning::from_json(
            r#"{ "initial_towers": [ { "position": [0.1, 0.2], "kind": "Ice", "level": 4 } ] }"#,
        )
        .unwrap();
        assert_eq!(tuning.initial_towers[0].kind, TowerKind::Ice);
        assert_eq!(tuning.initial_towers[0].level, 4);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "path": { "points": [] } }"#),
            Err(TuningError::EmptyPath)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "projectile": { "ttl": 0.0 } }"#),
            Err(TuningError::NonPositive { field: "projectile.ttl", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "initial_towers": [ { "position": [0, 0], "level": 5 } ] }"#),
            Err(TuningError::LevelOutOfRange { index: 0, level: 5 })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "starting_life": 0 }"#),
            Err(TuningError::NoLife)
        ));
        assert!(matches!(Tuning::from_json("not json"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_rejects_health_above_max() {
        assert!(matches!(
            Tuning::from_json(r#"{ "enemy": { "hp": 500, "hp_max": 100 } }"#),
            Err(TuningError::BadHealth { hp: 500, hp_max: 100, .. })
        ));
        let err = Tuning::from_json(
            r#"{ "initial_enemies": [ { "position": [0, 0], "hp": 300, "hp_max": 200 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(&err, TuningError::BadHealth { what, .. } if what == "initial enemy 0"));
    }

    #[test]
    fn test_rejects_non_positive_hp_max() {
        assert!(matches!(
            Tuning::from_json(r#"{ "enemy": { "hp": 0, "hp_max": 0 } }"#),
            Err(TuningError::BadHealth { hp_max: 0, .. })
        ));
        assert!(matches!(
            Tuning::from_json(
                r#"{ "initial_enemies": [ { "position": [0, 0], "hp": -5, "hp_max": -1 } ] }"#
            ),
            Err(TuningError::BadHealth { hp_max: -1, .. })
        ));
    }

    #[test]
    fn test_rejects_negative_damage() {
        assert!(matches!(
            Tuning::from_json(r#"{ "tower": { "damage": [10, 15, -20, 30, 40] } }"#),
            Err(TuningError::NegativeDamage { level: 2, value: -20 })
        ));
    }

    #[test]
    fn test_rejects_bad_firing_delay() {
        assert!(matches!(
            Tuning::from_json(r#"{ "tower": { "firing_delay": [1.0, -0.8, 0.6, 0.45, 0.3] } }"#),
            Err(TuningError::BadFiringDelay { level: 1, .. })
        ));

        // NaN cannot be written in JSON
        let mut tuning = Tuning::default();
        tuning.tower.firing_delay[4] = f32::NAN;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::BadFiringDelay { level: 4, .. })
        ));
        tuning.tower.firing_delay[4] = f32::INFINITY;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Tuning::load("/nonexistent/path-defense-tuning.json"),
            Err(TuningError::Io(_))
        ));
    }

    #[test]
    fn test_pretty_json_reloads() {
        let json = Tuning::default().to_json_pretty().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.initial_enemies.len(), 3);
        assert_eq!(back.tower.damage, TowerTuning::default().damage);
    }
}
