//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are functions over `&mut World` (or `&World` for read-only views).
//! They do not own state; all per-entity state lives in components.

pub mod cleanup;
pub mod collision;
pub mod damage;
pub mod enemies;
pub mod player;
pub mod projectiles;
pub mod snapshot;
pub mod wave_spawner;
