//! Simulation constants and tuning parameters.
//!
//! Stat tables are defaults for `CombatConfig`; the remaining values are fixed
//! rules of the engine.

use std::f64::consts::PI;

/// Assumed tick cadence (Hz). Interval counters are expressed in ticks.
pub const TICK_RATE: u32 = 60;

// --- Player ship ---

/// Per-tick rotation from a held rotate intent (radians).
pub const PLAYER_ROTATION_SPEED: f64 = 0.07;

/// Velocity retained per tick on an axis with no directional input.
pub const PLAYER_DRAG: f64 = 0.97;

/// Axis speeds below this snap to zero while drifting.
pub const PLAYER_DRIFT_CUTOFF: f64 = 0.01;

/// Initial heading: facing up the screen.
pub const PLAYER_INITIAL_ROTATION: f64 = -PI / 2.0;

/// Spawn offset from the bottom edge.
pub const PLAYER_SPAWN_BOTTOM_OFFSET: f64 = 50.0;

/// Distance ahead of the ship center where primary shots appear.
pub const PLAYER_MUZZLE_DISTANCE: f64 = 30.0;

/// Health repaired per interval while damaged (sim-clock milliseconds).
pub const PLAYER_REPAIR_INTERVAL_MS: f64 = 3000.0;

/// Delay before an overheated weapon is restored to full ammo.
pub const OVERHEAT_RECOVERY_MS: f64 = 2000.0;

/// Ticks between passive ammo increments.
pub const AMMO_RECHARGE_TICKS: u32 = 30;

/// Ticks between passive shield increments.
pub const SHIELD_RECHARGE_TICKS: u32 = 600;

/// Ticks a decoy deployment blocks the next one.
pub const DECOY_DEPLOY_COOLDOWN: i32 = 60;

/// Ticks for one decoy slot to recharge.
pub const DECOY_SLOT_RECHARGE: i32 = 180;

/// Bearing offset of each bomb in a single-target pair.
pub const PAIRED_BOMB_SPREAD: f64 = 0.1;

/// Delay before the second bomb of a single-target pair.
pub const PAIRED_BOMB_DELAY_MS: f64 = 200.0;

/// Derek-mode health pool.
pub const DEREK_HEALTH: i32 = 7;

/// Derek-mode player bullet damage.
pub const DEREK_BULLET_DAMAGE: i32 = 100;

pub const DEFAULT_LIVES: u32 = 3;
pub const DEREK_LIVES: u32 = 7;

// --- Enemy AI ---

/// Strafe distance per tick while dodging.
pub const DODGE_SPEED: f64 = 4.0;

/// Player projectiles within this distance are dodge candidates.
pub const DODGE_DISTANCE: f64 = 150.0;

/// Minimum intelligence for dodge behavior.
pub const DODGE_INTELLIGENCE: f64 = 0.7;

/// Fraction of the heading error applied per tick.
pub const ROTATION_SMOOTHING: f64 = 0.05;

/// Cap on the heading change per tick (radians).
pub const MAX_ROTATION_STEP: f64 = 0.1;

/// Initial enemy heading: facing down the screen.
pub const ENEMY_INITIAL_ROTATION: f64 = PI / 2.0;

/// Distance ahead of the enemy center where its shots appear.
pub const ENEMY_MUZZLE_DISTANCE: f64 = 20.0;

/// Patrol band: enemies descend to a Y drawn from `[min, min + span)`.
pub const PATROL_TARGET_Y_MIN: f64 = 100.0;
pub const PATROL_TARGET_Y_SPAN: f64 = 100.0;

/// Dwell before reversing horizontal direction: `[min, min + span)` ticks.
pub const PATROL_DWELL_MIN: f64 = 30.0;
pub const PATROL_DWELL_SPAN: f64 = 30.0;

// --- Boss ---

pub const BOSS_HEALTH: i32 = 200;
pub const BOSS_SIZE: f64 = 80.0;
pub const BOSS_TARGET_Y: f64 = 100.0;
pub const BOSS_SHOOT_INTERVAL_EASY: u32 = 45;
pub const BOSS_SHOOT_INTERVAL_HARD: u32 = 20;

/// Hard-difficulty shoot interval while desperate.
pub const BOSS_DESPERATE_SHOOT_INTERVAL_HARD: u32 = 15;

pub const BOSS_SPECIAL_INTERVAL_EASY: i32 = 300;
pub const BOSS_SPECIAL_INTERVAL_HARD: i32 = 150;

/// Ticks before the active gun mount alternates.
pub const BOSS_GUN_SWITCH_TICKS: u32 = 10;

/// Gun mount offsets from the boss center, before rotation.
pub const BOSS_GUN_OFFSETS: [(f64, f64); 2] = [(-30.0, 20.0), (30.0, 20.0)];

pub const BOSS_BULLET_SPEED: f64 = 25.0;
pub const BOSS_FAN_SPEED: f64 = 18.0;

/// Boss dwell before reversing: `[min, min + span)` ticks.
pub const BOSS_DWELL_MIN: f64 = 90.0;
pub const BOSS_DWELL_SPAN: f64 = 60.0;

/// Horizontal strafe multiplier applied to the boss speed.
pub const BOSS_STRAFE_FACTOR: f64 = 1.5;

/// Health fraction strictly below which the boss is desperate.
pub const BOSS_DESPERATE_THRESHOLD: f64 = 0.3;

/// Health fraction at or below which the boss is damaged.
pub const BOSS_DAMAGED_THRESHOLD: f64 = 0.6;

pub const BOSS_NORMAL_SPEED: f64 = 1.0;
pub const BOSS_DAMAGED_SPEED: f64 = 1.2;
pub const BOSS_DESPERATE_SPEED: f64 = 1.5;

/// Fan pattern (bullet count, spread) per phase.
pub const BOSS_FAN_NORMAL: (u32, f64) = (5, PI / 4.0);
pub const BOSS_FAN_DAMAGED: (u32, f64) = (8, PI / 3.0);
pub const BOSS_FAN_DESPERATE: (u32, f64) = (12, PI / 2.0);

/// Boss spawn offset from the top-center of the bounds.
pub const BOSS_SPAWN_Y: f64 = -80.0;

// --- Weapons ---

pub const BULLET_SPEED: f64 = 20.0;
pub const BULLET_SIZE: (f64, f64) = (4.0, 10.0);

pub const HOMING_ROCKET_SPEED: f64 = 15.0;
pub const HOMING_ROCKET_SIZE: (f64, f64) = (6.0, 15.0);
pub const HOMING_ROCKET_TURN_RATE: f64 = 0.1;
pub const HOMING_ROCKET_DAMAGE: i32 = 3;
pub const HOMING_ROCKET_LIFETIME: i32 = 600;

pub const GRAVITY_BOMB_SPEED: f64 = 5.0;
pub const GRAVITY_BOMB_RADIUS: f64 = 8.0;
pub const GRAVITY_BOMB_DAMAGE: i32 = 5;

/// Downward acceleration per tick.
pub const GRAVITY_BOMB_GRAVITY: f64 = 0.05;

pub const HOMING_BOMB_SPEED: f64 = 8.0;
pub const HOMING_BOMB_RADIUS: f64 = 10.0;
pub const HOMING_BOMB_TURN_RATE: f64 = 0.05;
pub const HOMING_BOMB_DAMAGE: i32 = 10;
pub const HOMING_BOMB_LIFETIME: i32 = 600;

pub const DECOY_SPEED: f64 = 15.0;
pub const DECOY_SIZE: (f64, f64) = (6.0, 15.0);
pub const DECOY_LIFETIME: i32 = 300;

/// Radius within which a decoy captures enemy homing projectiles.
pub const DECOY_ATTRACT_RADIUS: f64 = 150.0;

// --- Waves ---

/// Ticks between a cleared wave and the next spawn.
pub const WAVE_DELAY_TICKS: i32 = 180;

/// Countdown steps shown while waiting for the next wave.
pub const WAVE_COUNTDOWN: u32 = 3;

/// Sim-clock milliseconds per countdown step.
pub const WAVE_COUNTDOWN_STEP_MS: f64 = 1000.0;

/// Horizontal margin kept free when placing wave spawns.
pub const WAVE_SPAWN_MARGIN: f64 = 40.0;

/// First spawn row and spacing between staggered rows (negative Y is off-screen).
pub const WAVE_SPAWN_Y: f64 = -30.0;
pub const WAVE_SPAWN_SPACING: f64 = 50.0;

// --- Scoring ---

pub const SCORE_ENEMY_KILL: u32 = 100;
pub const SCORE_VICTORY_BONUS: u32 = 10_000;
