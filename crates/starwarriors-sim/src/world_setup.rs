//! Entity spawn factories.
//!
//! The only place bodies are created. Each factory attaches the shared body
//! bundle (`Position`, `Velocity`, `Hitbox`, `Active`, `SpawnOrder`) plus the
//! role components for the player, an enemy tier or a projectile variant.

use std::f64::consts::FRAC_PI_2;

use hecs::{Entity, World};
use rand::Rng;

use starwarriors_core::components::*;
use starwarriors_core::config::CombatConfig;
use starwarriors_core::constants::*;
use starwarriors_core::enums::*;
use starwarriors_core::events::EffectEvent;
use starwarriors_core::types::{Bounds, Position, Velocity};
use starwarriors_enemy_ai::profiles;

/// Session state every factory needs.
pub struct SpawnContext<'a> {
    pub config: &'a CombatConfig,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    /// Next `SpawnOrder` value.
    pub sequence: &'a mut u64,
    pub effects: &'a mut Vec<EffectEvent>,
}

impl SpawnContext<'_> {
    fn next_order(&mut self) -> SpawnOrder {
        let order = SpawnOrder(*self.sequence);
        *self.sequence += 1;
        order
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.effects.push(EffectEvent::Sound { cue });
    }

    pub fn explosion(&mut self, center: Position, large: bool) {
        self.effects.push(EffectEvent::Explosion { center, large });
        self.sound(SoundCue::Explosion);
    }
}

/// A request to create one projectile.
#[derive(Debug, Clone, Copy)]
pub struct Shot {
    pub kind: ProjectileKind,
    pub from_enemy: bool,
    /// Top-left corner of the new projectile.
    pub origin: Position,
    pub angle: f64,
    /// Overrides the weapon table speed (boss guns, fan shots).
    pub speed: Option<f64>,
    pub target: Option<Entity>,
}

impl Shot {
    pub fn bullet(origin: Position, angle: f64, from_enemy: bool) -> Self {
        Self {
            kind: ProjectileKind::Bullet,
            from_enemy,
            origin,
            angle,
            speed: None,
            target: None,
        }
    }

    /// Homing rockets always launch with heading 0 and steer from there.
    pub fn homing_rocket(origin: Position, target: Entity, from_enemy: bool) -> Self {
        Self {
            kind: ProjectileKind::HomingRocket,
            from_enemy,
            origin,
            angle: 0.0,
            speed: None,
            target: Some(target),
        }
    }

    pub fn homing_bomb(origin: Position, angle: f64, target: Entity, from_enemy: bool) -> Self {
        Self {
            kind: ProjectileKind::HomingBomb,
            from_enemy,
            origin,
            angle,
            speed: None,
            target: Some(target),
        }
    }

    /// Gravity bombs are always enemy-owned and start falling straight down.
    pub fn gravity_bomb(origin: Position) -> Self {
        Self {
            kind: ProjectileKind::GravityBomb,
            from_enemy: true,
            origin,
            angle: FRAC_PI_2,
            speed: None,
            target: None,
        }
    }

    pub fn decoy(origin: Position, angle: f64) -> Self {
        Self {
            kind: ProjectileKind::Decoy,
            from_enemy: false,
            origin,
            angle,
            speed: None,
            target: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// Spawn the player ship at the bottom-center of `bounds`.
pub fn spawn_player(world: &mut World, ctx: &mut SpawnContext<'_>, class: ShipClass, bounds: &Bounds) -> Entity {
    let stats = *ctx.config.ships.get(class);
    let derek = ctx.game_mode == GameMode::Derek;

    let max_health = if derek { DEREK_HEALTH } else { stats.health };
    let max_shields = if derek { 0 } else { stats.shields };
    let order = ctx.next_order();

    world.spawn((
        PlayerShip {
            class,
            game_mode: ctx.game_mode,
            speed: stats.speed,
            rotation: PLAYER_INITIAL_ROTATION,
        },
        Hull {
            health: max_health,
            max_health,
            shields: max_shields,
            max_shields,
            shield_timer: 0,
            last_repair_ms: 0.0,
        },
        Armament {
            cooldown: 0,
            base_cooldown: stats.shoot_cooldown,
            ammo: stats.ammo,
            max_ammo: stats.ammo,
            overheated: false,
            recharge_timer: 0,
        },
        SecondaryPool {
            weapon: stats.secondary,
            charges: stats.secondary_charges,
            max_charges: stats.secondary_charges,
            cooldown: 0,
            base_cooldown: stats.secondary_cooldown,
            recharge_timer: 0,
            recharge_ticks: stats.secondary_recharge,
            targeting: TargetingMode::default(),
        },
        DecoyPool {
            available: stats.decoys,
            max: stats.decoys,
            cooldown: 0,
            slot_timers: vec![0; stats.decoys as usize],
        },
        Position::new(bounds.width / 2.0, bounds.height - PLAYER_SPAWN_BOTTOM_OFFSET),
        Velocity::default(),
        Hitbox {
            width: stats.width,
            height: stats.height,
        },
        Active(true),
        order,
    ))
}

/// Spawn one enemy of `kind` with its top-left corner at `(x, y)`.
pub fn spawn_enemy(
    world: &mut World,
    ctx: &mut SpawnContext<'_>,
    rng: &mut impl Rng,
    kind: EnemyKind,
    x: f64,
    y: f64,
) -> Entity {
    let profile = profiles::get_profile(ctx.config, kind, ctx.difficulty);
    let state = profiles::roll_enemy(&profile, rng);
    let order = ctx.next_order();

    let entity = world.spawn((
        state,
        Position::new(x, y),
        Velocity::default(),
        Hitbox {
            width: profile.width,
            height: profile.height,
        },
        Active(true),
        order,
    ));

    if let Some(timer) = profiles::roll_bomb_cooldown(&profile, rng) {
        let _ = world.insert_one(entity, BombBay { timer });
    }
    if kind == EnemyKind::Boss {
        let _ = world.insert_one(entity, profiles::boss_state(ctx.config, ctx.difficulty));
    }

    entity
}

/// Spawn one projectile. Homing launches emit the rocket-launch cue.
pub fn spawn_projectile(world: &mut World, ctx: &mut SpawnContext<'_>, shot: &Shot) -> Entity {
    let weapons = &ctx.config.weapons;
    let stats = match shot.kind {
        ProjectileKind::Bullet => weapons.bullet,
        ProjectileKind::GravityBomb => weapons.gravity_bomb,
        ProjectileKind::HomingRocket => weapons.homing_rocket,
        ProjectileKind::HomingBomb => weapons.homing_bomb,
        ProjectileKind::Decoy => weapons.decoy,
    };

    let damage = if shot.kind == ProjectileKind::Bullet && !shot.from_enemy && ctx.game_mode == GameMode::Derek {
        DEREK_BULLET_DAMAGE
    } else {
        stats.damage
    };
    let speed = shot.speed.unwrap_or(stats.speed);
    let is_homing = shot.kind.is_homing();

    if is_homing {
        ctx.sound(SoundCue::RocketLaunch);
    }
    let order = ctx.next_order();

    world.spawn((
        ProjectileState {
            kind: shot.kind,
            from_enemy: shot.from_enemy,
            angle: shot.angle,
            speed,
            damage,
            target: if is_homing { shot.target } else { None },
            turn_rate: stats.turn_rate,
            life: stats.lifetime,
            gravity: stats.gravity,
        },
        shot.origin,
        Velocity::from_heading(shot.angle, speed),
        Hitbox {
            width: stats.width,
            height: stats.height,
        },
        Active(true),
        order,
    ))
}
