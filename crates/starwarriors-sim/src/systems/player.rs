//! Player system: movement, repair and the weapon/resource pools.
//!
//! Runs once per tick for the active player ship. Component state is copied
//! out, advanced in a fixed order (repair, movement, rotation, primary fire,
//! ammo and shield recharge, decoys, secondary weapon) and written back
//! before any projectile is spawned.

use hecs::{Entity, World};

use starwarriors_core::commands::PlayerIntent;
use starwarriors_core::components::{
    Active, Armament, DecoyPool, EnemyState, Hitbox, Hull, PlayerShip, SecondaryPool, SpawnOrder,
};
use starwarriors_core::constants::*;
use starwarriors_core::enums::{GameMode, SecondaryWeapon, SoundCue, TargetingMode};
use starwarriors_core::types::{Bounds, Position, Rect, Velocity};

use crate::deferred::{DeferredAction, DeferredQueue};
use crate::error::{read, write, SimError};
use crate::world_setup::{self, Shot, SpawnContext};

/// Advance the player ship one tick.
pub fn run(
    world: &mut World,
    ctx: &mut SpawnContext<'_>,
    deferred: &mut DeferredQueue,
    player: Entity,
    intent: &PlayerIntent,
    bounds: &Bounds,
    now_ms: f64,
) -> Result<(), SimError> {
    let mut ship: PlayerShip = read(world, player, "PlayerShip")?;
    let mut hull: Hull = read(world, player, "Hull")?;
    let mut arms: Armament = read(world, player, "Armament")?;
    let mut secondary: SecondaryPool = read(world, player, "SecondaryPool")?;
    let mut decoys: DecoyPool = read(world, player, "DecoyPool")?;
    let mut pos: Position = read(world, player, "Position")?;
    let mut vel: Velocity = read(world, player, "Velocity")?;
    let hitbox: Hitbox = read(world, player, "Hitbox")?;

    let timing = ctx.config.timing;
    let cheat = ship.game_mode == GameMode::Cheat;
    let mut shots: Vec<(Shot, Option<SoundCue>)> = Vec::new();

    repair(&mut hull, now_ms, timing.repair_interval_ms);
    steer(&mut pos, &mut vel, ship.speed, &hitbox, intent, bounds);
    ship.rotation = rotate(ship.rotation, intent);

    let center = Rect::at(pos, hitbox.width, hitbox.height).center();

    // Primary
    if arms.cooldown > 0 {
        arms.cooldown -= 1;
    }
    if intent.fire_primary && arms.cooldown <= 0 && !arms.overheated && (cheat || arms.ammo > 0) {
        let (sin, cos) = ship.rotation.sin_cos();
        let muzzle = Position::new(
            center.x + cos * PLAYER_MUZZLE_DISTANCE,
            center.y + sin * PLAYER_MUZZLE_DISTANCE,
        );
        shots.push((Shot::bullet(muzzle, ship.rotation, false), Some(SoundCue::BlasterShot)));
        arms.cooldown = arms.base_cooldown;

        if !cheat {
            arms.ammo = arms.ammo.saturating_sub(1);
            if arms.ammo == 0 {
                arms.overheated = true;
                deferred.schedule(
                    player,
                    now_ms + timing.overheat_recovery_ms,
                    DeferredAction::OverheatRecovery,
                );
            }
        }
    }

    if arms.ammo < arms.max_ammo && !arms.overheated {
        arms.recharge_timer += 1;
        if arms.recharge_timer >= timing.ammo_recharge_ticks {
            arms.ammo += 1;
            arms.recharge_timer = 0;
        }
    }

    if hull.shields < hull.max_shields {
        hull.shield_timer += 1;
        if hull.shield_timer >= timing.shield_recharge_ticks {
            hull.shields += 1;
            hull.shield_timer = 0;
        }
    }

    if let Some(shot) = deploy_decoy(&mut decoys, intent, cheat, &center, ship.rotation) {
        shots.push((shot, None));
    }

    // Secondary
    if secondary.cooldown > 0 {
        secondary.cooldown -= 1;
    }
    if secondary.weapon == SecondaryWeapon::HomingBomb {
        if let Some(mode) = intent.targeting {
            secondary.targeting = mode;
        }
    }
    if intent.fire_secondary
        && !arms.overheated
        && secondary.cooldown <= 0
        && (cheat || secondary.charges > 0)
    {
        match secondary.weapon {
            SecondaryWeapon::HomingRocket => {
                if let Some((target, _)) = nearest_enemies(world, &pos, 1).first() {
                    shots.push((Shot::homing_rocket(center, *target, false), None));
                }
            }
            SecondaryWeapon::HomingBomb => {
                let targets = nearest_enemies(world, &pos, secondary.targeting.target_count());
                let split = secondary.targeting == TargetingMode::Split && targets.len() >= 2;
                match targets.first() {
                    Some(&(target, target_pos)) if secondary.targeting == TargetingMode::Single => {
                        let angle = pos.bearing_to(&target_pos);
                        shots.push((Shot::homing_bomb(center, angle - PAIRED_BOMB_SPREAD, target, false), None));
                        deferred.schedule(
                            player,
                            now_ms + timing.paired_bomb_delay_ms,
                            DeferredAction::PairedBomb {
                                target,
                                angle: angle + PAIRED_BOMB_SPREAD,
                            },
                        );
                    }
                    Some(&(target, target_pos)) if !split => {
                        let angle = pos.bearing_to(&target_pos);
                        shots.push((Shot::homing_bomb(center, angle, target, false), None));
                    }
                    Some(_) => {
                        for &(target, target_pos) in &targets {
                            let angle = pos.bearing_to(&target_pos);
                            shots.push((Shot::homing_bomb(center, angle, target, false), None));
                        }
                    }
                    None => {}
                }
            }
        }

        if !cheat {
            secondary.charges = secondary.charges.saturating_sub(1);
        }
        secondary.cooldown = secondary.base_cooldown;
    }

    if cheat {
        secondary.charges = secondary.max_charges;
    } else if secondary.charges < secondary.max_charges {
        secondary.recharge_timer += 1;
        if secondary.recharge_timer >= secondary.recharge_ticks {
            secondary.charges += 1;
            secondary.recharge_timer = 0;
        }
    }

    if !pos.is_finite() || !vel.is_finite() || !ship.rotation.is_finite() {
        return Err(SimError::NonFiniteState {
            entity: player,
            detail: "player kinematics",
        });
    }

    write(world, player, "PlayerShip", ship)?;
    write(world, player, "Hull", hull)?;
    write(world, player, "Armament", arms)?;
    write(world, player, "SecondaryPool", secondary)?;
    write(world, player, "DecoyPool", decoys)?;
    write(world, player, "Position", pos)?;
    write(world, player, "Velocity", vel)?;

    for (shot, cue) in shots {
        world_setup::spawn_projectile(world, ctx, &shot);
        if let Some(cue) = cue {
            ctx.sound(cue);
        }
    }
    Ok(())
}

/// +1 health per repair interval while damaged but alive.
fn repair(hull: &mut Hull, now_ms: f64, interval_ms: f64) {
    if hull.health > 0 && hull.health < hull.max_health && now_ms - hull.last_repair_ms >= interval_ms {
        hull.health = (hull.health + 1).min(hull.max_health);
        hull.last_repair_ms = now_ms;
    }
}

/// Held directions set the axis speed; released axes drift under drag.
fn steer(pos: &mut Position, vel: &mut Velocity, speed: f64, hitbox: &Hitbox, intent: &PlayerIntent, bounds: &Bounds) {
    if intent.left {
        vel.x = -speed;
    } else if intent.right {
        vel.x = speed;
    } else {
        vel.x *= PLAYER_DRAG;
    }

    if intent.up {
        vel.y = -speed;
    } else if intent.down {
        vel.y = speed;
    } else {
        vel.y *= PLAYER_DRAG;
    }

    if vel.x.abs() < PLAYER_DRIFT_CUTOFF {
        vel.x = 0.0;
    }
    if vel.y.abs() < PLAYER_DRIFT_CUTOFF {
        vel.y = 0.0;
    }

    pos.x = (pos.x + vel.x).clamp(0.0, (bounds.width - hitbox.width).max(0.0));
    pos.y = (pos.y + vel.y).clamp(0.0, (bounds.height - hitbox.height).max(0.0));
}

fn rotate(rotation: f64, intent: &PlayerIntent) -> f64 {
    let full_turn = std::f64::consts::TAU;
    let mut rotation = rotation;
    if intent.rotate_left {
        rotation -= PLAYER_ROTATION_SPEED;
        if rotation < -full_turn {
            rotation += full_turn;
        }
    }
    if intent.rotate_right {
        rotation += PLAYER_ROTATION_SPEED;
        if rotation > full_turn {
            rotation -= full_turn;
        }
    }
    rotation
}

/// Tick the decoy slots and deploy one if requested. Cheat mode ignores
/// both the pool and the deploy cooldown.
fn deploy_decoy(
    decoys: &mut DecoyPool,
    intent: &PlayerIntent,
    cheat: bool,
    center: &Position,
    rotation: f64,
) -> Option<Shot> {
    if decoys.cooldown > 0 {
        decoys.cooldown -= 1;
    }
    for timer in decoys.slot_timers.iter_mut() {
        if *timer > 0 {
            *timer -= 1;
            if *timer == 0 {
                decoys.available = (decoys.available + 1).min(decoys.max);
            }
        }
    }

    if !intent.deploy_decoy {
        return None;
    }
    if cheat {
        return Some(Shot::decoy(*center, rotation));
    }
    if decoys.available == 0 || decoys.cooldown > 0 {
        return None;
    }

    decoys.available -= 1;
    decoys.cooldown = DECOY_DEPLOY_COOLDOWN;
    let available = decoys.available as usize;
    if let Some(timer) = decoys
        .slot_timers
        .iter_mut()
        .enumerate()
        .find(|(i, timer)| **timer == 0 && *i >= available)
        .map(|(_, timer)| timer)
    {
        *timer = DECOY_SLOT_RECHARGE;
    }
    Some(Shot::decoy(*center, rotation))
}

/// Up to `count` active enemies ordered by distance between top-left
/// corners. Ties keep spawn order.
pub fn nearest_enemies(world: &World, from: &Position, count: usize) -> Vec<(Entity, Position)> {
    let mut enemies: Vec<(SpawnOrder, Entity, Position)> = world
        .query::<(&EnemyState, &Position, &Active, &SpawnOrder)>()
        .iter()
        .filter(|(_, (_, _, active, _))| active.0)
        .map(|(entity, (_, pos, _, order))| (*order, entity, *pos))
        .collect();
    enemies.sort_unstable_by_key(|(order, _, _)| *order);
    enemies.sort_by(|a, b| from.distance_to(&a.2).total_cmp(&from.distance_to(&b.2)));
    enemies.truncate(count);
    enemies.into_iter().map(|(_, entity, pos)| (entity, pos)).collect()
}
