//! Enemy system: patrol, heading, dodge and weapons for every live enemy.
//!
//! The player and the player-owned projectiles are read once at the start of
//! the pass; enemies never move either. Each enemy is then updated in spawn
//! order and its shots are spawned straight after its state is written back.

use hecs::{Entity, World};
use rand::Rng;

use starwarriors_core::components::{
    Active, BombBay, BossState, EnemyState, Hitbox, PlayerShip, ProjectileState, SpawnOrder,
};
use starwarriors_core::config::CombatConfig;
use starwarriors_core::constants::ENEMY_MUZZLE_DISTANCE;
use starwarriors_core::enums::{Difficulty, EnemyKind, SoundCue};
use starwarriors_core::types::{Bounds, Position, Rect, Velocity};
use starwarriors_enemy_ai::behavior::{self, DodgeThreat};
use starwarriors_enemy_ai::fsm::{self, BossContext};
use starwarriors_enemy_ai::profiles;

use crate::error::{read, write, SimError};
use crate::guidance;
use crate::systems::cleanup;
use crate::world_setup::{self, Shot, SpawnContext};

/// What enemies know about the player this tick.
#[derive(Debug, Clone, Copy)]
pub struct PlayerTarget {
    pub entity: Entity,
    pub rect: Rect,
    pub velocity: Velocity,
}

/// Shots released together, followed by an optional sound cue.
struct Volley {
    shots: Vec<Shot>,
    cue: Option<SoundCue>,
}

/// Run the enemy system for one tick.
pub fn run(
    world: &mut World,
    ctx: &mut SpawnContext<'_>,
    rng: &mut impl Rng,
    bounds: &Bounds,
    despawn_buffer: &mut Vec<Entity>,
) {
    let player = player_target(world);
    let threats = dodge_threats(world);

    for entity in cleanup::ordered::<EnemyState>(world) {
        if !cleanup::is_active(world, entity) {
            continue;
        }
        match update_one(world, ctx, rng, entity, bounds, player.as_ref(), &threats) {
            Ok(volleys) => {
                for volley in volleys {
                    for shot in &volley.shots {
                        world_setup::spawn_projectile(world, ctx, shot);
                    }
                    if let Some(cue) = volley.cue {
                        ctx.sound(cue);
                    }
                }
            }
            Err(err) => {
                tracing::warn!(%err, "enemy update failed, removing");
                despawn_buffer.push(entity);
            }
        }
    }

    cleanup::sweep::<EnemyState>(world, despawn_buffer);
}

/// The active player, if any.
pub fn player_target(world: &World) -> Option<PlayerTarget> {
    world
        .query::<(&PlayerShip, &Position, &Velocity, &Hitbox, &Active)>()
        .iter()
        .find(|(_, (_, _, _, _, active))| active.0)
        .map(|(entity, (_, pos, vel, hitbox, _))| PlayerTarget {
            entity,
            rect: Rect::at(*pos, hitbox.width, hitbox.height),
            velocity: *vel,
        })
}

/// Active player-owned projectiles in spawn order.
fn dodge_threats(world: &World) -> Vec<DodgeThreat> {
    let mut threats: Vec<(SpawnOrder, DodgeThreat)> = world
        .query::<(&ProjectileState, &Position, &Velocity, &Active, &SpawnOrder)>()
        .iter()
        .filter(|(_, (state, _, _, active, _))| !state.from_enemy && active.0)
        .map(|(_, (_, pos, vel, _, order))| {
            (
                *order,
                DodgeThreat {
                    position: *pos,
                    velocity: *vel,
                },
            )
        })
        .collect();
    threats.sort_unstable_by_key(|(order, _)| *order);
    threats.into_iter().map(|(_, threat)| threat).collect()
}

fn update_one(
    world: &mut World,
    ctx: &mut SpawnContext<'_>,
    rng: &mut impl Rng,
    entity: Entity,
    bounds: &Bounds,
    player: Option<&PlayerTarget>,
    threats: &[DodgeThreat],
) -> Result<Vec<Volley>, SimError> {
    let config = ctx.config;
    let difficulty = ctx.difficulty;
    let predictive = difficulty == Difficulty::Hard;

    let mut state: EnemyState = read(world, entity, "EnemyState")?;
    let mut pos: Position = read(world, entity, "Position")?;
    let hitbox: Hitbox = read(world, entity, "Hitbox")?;
    let mut boss = world.get::<&BossState>(entity).ok().map(|b| (*b).clone());
    let mut bomb_bay = world.get::<&BombBay>(entity).ok().map(|b| *b);

    let profile = profiles::get_profile(config, state.kind, difficulty);
    let start = pos;
    let mut volleys = Vec::new();

    behavior::advance_patrol(
        &mut pos,
        &mut state.patrol,
        state.speed,
        hitbox.width,
        bounds,
        &profile.dwell,
        rng,
    );

    if let Some(target) = player {
        let center = Rect::at(pos, hitbox.width, hitbox.height).center();
        state.rotation = behavior::turn_toward(state.rotation, &center, &target.rect.center(), &config.ai);
    }

    if let Some(boss) = boss.as_mut() {
        let center = Rect::at(pos, hitbox.width, hitbox.height).center();

        state.shoot_timer += 1.0;
        let ready = state.shoot_timer >= f64::from(state.shoot_interval);
        if let Some(target) = player.filter(|_| ready) {
            let muzzle = fsm::gun_muzzle(boss, &config.boss, &center, state.rotation);
            let speed = config.boss.bullet_speed;
            let angle = guidance::aim_angle(&muzzle, &target.rect, &target.velocity, speed, predictive);
            volleys.push(Volley {
                shots: vec![Shot::bullet(muzzle, angle, true).with_speed(speed)],
                cue: Some(SoundCue::BlasterShot),
            });
            state.shoot_timer = 0.0;
        }

        boss.special_timer -= 1;
        if let Some(target) = player.filter(|_| boss.special_timer <= 0) {
            let speed = config.boss.fan_speed;
            let aim = guidance::aim_angle(&center, &target.rect, &target.velocity, speed, predictive);
            let shots = fsm::fan_angles(boss.phase, aim, &config.boss)
                .into_iter()
                .map(|angle| Shot::bullet(center, angle, true).with_speed(speed))
                .collect();
            volleys.push(Volley {
                shots,
                cue: Some(SoundCue::RocketLaunch),
            });
            boss.special_timer = config.boss.special_interval.get(difficulty);
        }

        fsm::advance_gun(boss, &config.boss);
        refresh_boss_phase(&mut state, boss, config, difficulty);
    }

    pos.x += behavior::dodge_shift(&pos, state.intelligence, threats, &config.ai);

    let exit_y = if state.kind == EnemyKind::Boss {
        bounds.height + hitbox.height
    } else {
        bounds.height
    };
    let active = pos.y <= exit_y;

    if active && boss.is_none() {
        state.shoot_timer += 1.0;
        let ready = state.shoot_timer >= f64::from(state.shoot_interval);
        if let Some(target) = player.filter(|_| ready) {
            volleys.push(fire(&state, &pos, &hitbox, target, config, predictive, rng));
            state.shoot_timer = 0.0;
        }

        if let (Some(bay), Some(target)) = (bomb_bay.as_mut(), player) {
            bay.timer -= 1.0;
            if bay.timer <= 0.0 {
                let center = Rect::at(pos, hitbox.width, hitbox.height).center();
                let angle = pos.bearing_to(&target.rect.top_left());
                volleys.push(Volley {
                    shots: vec![Shot::homing_bomb(center, angle, target.entity, true)],
                    cue: None,
                });
                bay.timer = profiles::roll_bomb_cooldown(&profile, rng).unwrap_or(0.0);
            }
        }
    }

    let vel = Velocity::new(pos.x - start.x, pos.y - start.y);
    if !pos.is_finite() || !state.rotation.is_finite() {
        return Err(SimError::NonFiniteState {
            entity,
            detail: "enemy position",
        });
    }

    write(world, entity, "EnemyState", state)?;
    write(world, entity, "Position", pos)?;
    write(world, entity, "Velocity", vel)?;
    write(world, entity, "Active", Active(active))?;
    if let Some(boss) = boss {
        write(world, entity, "BossState", boss)?;
    }
    if let Some(bay) = bomb_bay {
        write(world, entity, "BombBay", bay)?;
    }
    Ok(volleys)
}

/// Regular enemy shot from the muzzle ahead of the ship: a homing rocket
/// with `special_chance`, otherwise an aimed bullet.
fn fire(
    state: &EnemyState,
    pos: &Position,
    hitbox: &Hitbox,
    target: &PlayerTarget,
    config: &CombatConfig,
    predictive: bool,
    rng: &mut impl Rng,
) -> Volley {
    let center = Rect::at(*pos, hitbox.width, hitbox.height).center();
    let (sin, cos) = state.rotation.sin_cos();
    let muzzle = Position::new(
        center.x + cos * ENEMY_MUZZLE_DISTANCE,
        center.y + sin * ENEMY_MUZZLE_DISTANCE,
    );

    if rng.gen::<f64>() < state.special_chance {
        return Volley {
            shots: vec![Shot::homing_rocket(muzzle, target.entity, true)],
            cue: None,
        };
    }

    let speed = config.weapons.bullet.speed;
    let angle = guidance::aim_angle(&muzzle, &target.rect, &target.velocity, speed, predictive);
    Volley {
        shots: vec![Shot::bullet(muzzle, angle, true)],
        cue: Some(SoundCue::BlasterShot),
    }
}

/// Re-derive the boss phase from its health and apply the phase tuning.
/// Returns true when the phase changed.
pub fn refresh_boss_phase(
    state: &mut EnemyState,
    boss: &mut BossState,
    config: &CombatConfig,
    difficulty: Difficulty,
) -> bool {
    let update = fsm::evaluate(
        &BossContext {
            phase: boss.phase,
            health: state.health,
            max_health: boss.max_health,
            difficulty,
            base_shoot_interval: config.enemies.boss.shoot_interval.get(difficulty),
        },
        &config.boss,
    );

    boss.phase = update.new_phase;
    state.speed = update.speed;
    state.shoot_interval = update.shoot_interval;
    if update.phase_changed {
        tracing::debug!(phase = ?update.new_phase, health = state.health, "boss phase changed");
    }
    update.phase_changed
}
