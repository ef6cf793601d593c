//! Read-only views handed to the HUD, score tracker and renderer.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::EffectEvent;
use crate::types::{Position, SimClock};

/// Wave progress for the HUD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveInfo {
    /// 1-based wave number.
    pub wave_number: usize,
    pub total_waves: usize,
    pub is_boss: bool,
    pub countdown: u32,
    pub is_complete: bool,
}

/// Result of one collision pass, consumed by the score/lives tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionOutcome {
    pub score_delta: u32,
    pub player_hit: bool,
}

/// Everything a driver needs after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub collision: CollisionOutcome,
    pub effects: Vec<EffectEvent>,
    pub wave: WaveInfo,
    /// Set once the campaign is won; the simulation halts from then on.
    pub victory: bool,
    /// Non-zero only on the winning tick.
    pub victory_bonus: u32,
}

/// HUD view of the player's resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub class: ShipClass,
    pub position: Position,
    pub rotation: f64,
    pub active: bool,
    pub health: i32,
    pub max_health: i32,
    pub shields: u32,
    pub max_shields: u32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub overheated: bool,
    pub secondary_charges: u32,
    pub max_secondary_charges: u32,
    pub targeting: TargetingMode,
    pub decoys: u32,
    pub max_decoys: u32,
    pub decoy_slot_timers: Vec<i32>,
}

/// One body in a render/replay snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub order: u64,
    pub role: BodyRole,
    pub position: Position,
    pub width: f64,
    pub height: f64,
    pub heading: f64,
    pub active: bool,
}

/// What a snapshot body represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum BodyRole {
    Player,
    Enemy { kind: EnemyKind },
    Projectile { kind: ProjectileKind, from_enemy: bool },
}

/// Whole-world view in spawn order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub clock: SimClock,
    pub bodies: Vec<BodySnapshot>,
    pub wave: WaveInfo,
}
