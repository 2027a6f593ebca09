//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` handed to `tick`
//! - Stable iteration order (enemies by entity ID)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod arena;
pub mod collision;
pub mod enemy;
pub mod path;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod tower;

pub use aabb::Aabb;
pub use arena::Arena;
pub use collision::{CollisionSide, directional_overlap, overlap};
pub use enemy::{Enemy, PathTarget};
pub use path::Path;
pub use projectile::Projectile;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{Command, TickInput, tick};
pub use tower::{Tower, TowerKind};
