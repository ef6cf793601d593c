//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.
//!
//! Every body carries `Position`, `Velocity`, `Hitbox`, `Active` and
//! `SpawnOrder`. Role components below mark what kind of body it is.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Box size of a body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f64,
    pub height: f64,
}

/// Liveness flag. Once false it is never set true again; the owning
/// system despawns the entity on its next pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Active(pub bool);

/// Monotonic creation sequence. Systems process bodies in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnOrder(pub u64);

// --- Player ---

/// The player-controlled ship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    pub class: ShipClass,
    pub game_mode: GameMode,
    /// Movement speed per tick on a held axis.
    pub speed: f64,
    /// Visual and firing heading (radians).
    pub rotation: f64,
}

/// Health and shields. Shields absorb a whole hit before health is touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hull {
    pub health: i32,
    pub max_health: i32,
    pub shields: u32,
    pub max_shields: u32,
    /// Ticks since the last shield increment.
    pub shield_timer: u32,
    /// Sim-clock time of the last repair or health damage.
    pub last_repair_ms: f64,
}

/// Primary weapon with the ammo/overheat cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Armament {
    /// Ticks until the next shot is allowed.
    pub cooldown: i32,
    pub base_cooldown: i32,
    pub ammo: u32,
    pub max_ammo: u32,
    /// Blocks all firing until the recovery effect restores ammo.
    pub overheated: bool,
    /// Ticks since the last passive ammo increment.
    pub recharge_timer: u32,
}

/// Rocket or bomb charge pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryPool {
    pub weapon: SecondaryWeapon,
    pub charges: u32,
    pub max_charges: u32,
    pub cooldown: i32,
    pub base_cooldown: i32,
    /// Counts down to the next charge while below max.
    pub recharge_timer: i32,
    pub recharge_ticks: i32,
    pub targeting: TargetingMode,
}

/// Decoy pool. Each slot owns its own recharge countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoyPool {
    pub available: u32,
    pub max: u32,
    /// Shared deploy cooldown (ticks).
    pub cooldown: i32,
    /// One countdown per slot; zero means the slot is idle.
    pub slot_timers: Vec<i32>,
}

// --- Enemies ---

/// Per-instance enemy state rolled at spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyState {
    pub kind: EnemyKind,
    pub health: i32,
    pub shields: u32,
    pub damage: i32,
    pub speed: f64,
    /// Continuous value in [0, 1]; gates dodging.
    pub intelligence: f64,
    /// Smoothed visual heading (radians).
    pub rotation: f64,
    /// Ticks since the last shot; seeded with a random fraction.
    pub shoot_timer: f64,
    pub shoot_interval: u32,
    /// Probability of a homing rocket replacing a ballistic shot.
    pub special_chance: f64,
    pub patrol: Patrol,
}

/// Descend-then-strafe movement state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Patrol {
    pub target_y: f64,
    /// +1 right, -1 left.
    pub direction: f64,
    pub dwell: u32,
    pub dwell_limit: f64,
    /// Multiplier applied to speed while strafing.
    pub strafe_factor: f64,
}

/// Independent homing-bomb timer carried by bombers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BombBay {
    pub timer: f64,
}

/// Boss-only state on top of `EnemyState`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossState {
    pub max_health: i32,
    pub phase: BossPhase,
    pub special_timer: i32,
    pub gun_index: usize,
    pub gun_counter: u32,
}

// --- Projectiles ---

/// Projectile state. `target` is a lookup-only reference that may dangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileState {
    pub kind: ProjectileKind,
    pub from_enemy: bool,
    /// Heading (radians).
    pub angle: f64,
    pub speed: f64,
    pub damage: i32,
    #[serde(skip)]
    pub target: Option<Entity>,
    pub turn_rate: Option<f64>,
    /// Remaining ticks for variants with a lifetime.
    pub life: Option<i32>,
    /// Downward acceleration per tick.
    pub gravity: f64,
}
