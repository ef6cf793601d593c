//! Tier-specific enemy profiles.
//!
//! Resolves the stat tables for one tier and difficulty, and rolls the
//! per-instance randomized state (intelligence, timers, patrol band).

use rand::Rng;

use starwarriors_core::components::{BossState, EnemyState, Patrol};
use starwarriors_core::config::{CombatConfig, Span};
use starwarriors_core::constants::ENEMY_INITIAL_ROTATION;
use starwarriors_core::enums::{BossPhase, Difficulty, EnemyKind};

/// Stats for one enemy tier at one difficulty.
#[derive(Debug, Clone, Copy)]
pub struct EnemyProfile {
    pub kind: EnemyKind,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub health: i32,
    pub shields: u32,
    pub damage: i32,
    /// Ticks between regular shots.
    pub shoot_interval: u32,
    pub special_chance: f64,
    pub intelligence: Span,
    pub initial_shoot_delay: f64,
    /// Bomb-drop cooldown range, for tiers that carry bombs.
    pub bomb_cooldown: Option<Span>,
    pub target_y: Span,
    pub dwell: Span,
    pub strafe_factor: f64,
}

/// Resolve the profile of `kind` at `difficulty`.
pub fn get_profile(config: &CombatConfig, kind: EnemyKind, difficulty: Difficulty) -> EnemyProfile {
    let stats = config.enemies.get(kind);
    let is_boss = kind == EnemyKind::Boss;

    EnemyProfile {
        kind,
        width: stats.width,
        height: stats.height,
        speed: stats.speed,
        health: stats.health,
        shields: stats.shields,
        damage: stats.damage,
        shoot_interval: stats.shoot_interval.get(difficulty),
        special_chance: stats.special_chance.get(difficulty),
        intelligence: stats.intelligence,
        initial_shoot_delay: stats.initial_shoot_delay,
        bomb_cooldown: stats.bomb_cooldown.map(|c| c.get(difficulty)),
        target_y: if is_boss {
            Span::new(config.boss.target_y, config.boss.target_y)
        } else {
            config.ai.patrol_target_y
        },
        dwell: if is_boss {
            config.boss.dwell
        } else {
            config.ai.patrol_dwell
        },
        strafe_factor: if is_boss {
            config.boss.strafe_factor
        } else {
            1.0
        },
    }
}

/// Uniform draw from `[min, max)`. A degenerate span yields `min`.
pub fn draw(rng: &mut impl Rng, span: &Span) -> f64 {
    if span.max > span.min {
        rng.gen_range(span.min..span.max)
    } else {
        span.min
    }
}

/// Roll a fresh `EnemyState` for one spawn.
pub fn roll_enemy(profile: &EnemyProfile, rng: &mut impl Rng) -> EnemyState {
    let intelligence = draw(rng, &profile.intelligence);
    let shoot_timer = draw(rng, &Span::new(0.0, profile.initial_shoot_delay));
    let target_y = draw(rng, &profile.target_y);
    let direction = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
    let dwell_limit = draw(rng, &profile.dwell);

    EnemyState {
        kind: profile.kind,
        health: profile.health,
        shields: profile.shields,
        damage: profile.damage,
        speed: profile.speed,
        intelligence,
        rotation: ENEMY_INITIAL_ROTATION,
        shoot_timer,
        shoot_interval: profile.shoot_interval,
        special_chance: profile.special_chance,
        patrol: Patrol {
            target_y,
            direction,
            dwell: 0,
            dwell_limit,
            strafe_factor: profile.strafe_factor,
        },
    }
}

/// Next bomb-drop cooldown, or `None` for tiers without bombs.
pub fn roll_bomb_cooldown(profile: &EnemyProfile, rng: &mut impl Rng) -> Option<f64> {
    profile.bomb_cooldown.map(|span| draw(rng, &span))
}

/// Boss-only state at spawn.
pub fn boss_state(config: &CombatConfig, difficulty: Difficulty) -> BossState {
    BossState {
        max_health: config.enemies.boss.health,
        phase: BossPhase::Normal,
        special_timer: config.boss.special_interval.get(difficulty),
        gun_index: 0,
        gun_counter: 0,
    }
}
