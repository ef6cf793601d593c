//! Projectile system: moves every live projectile one tick.
//!
//! Bullets fly straight, gravity bombs accelerate downward, homing variants
//! steer toward their target, and decoys pull nearby enemy homing projectiles
//! onto themselves. Projectiles are processed in spawn order so overlapping
//! decoys resolve deterministically (the last decoy processed wins).

use hecs::{Entity, World};

use starwarriors_core::components::{Active, Hitbox, ProjectileState};
use starwarriors_core::enums::ProjectileKind;
use starwarriors_core::types::{Bounds, Position, Rect, Velocity};

use crate::error::{read, write, SimError};
use crate::guidance;
use crate::systems::cleanup;

/// Run the projectile system for one tick.
pub fn run(world: &mut World, bounds: &Bounds, attract_radius: f64, despawn_buffer: &mut Vec<Entity>) {
    for entity in cleanup::ordered::<ProjectileState>(world) {
        if !cleanup::is_active(world, entity) {
            continue;
        }
        if let Err(err) = update_one(world, entity, bounds, attract_radius) {
            tracing::warn!(%err, "projectile update failed, removing");
            despawn_buffer.push(entity);
        }
    }

    cleanup::sweep::<ProjectileState>(world, despawn_buffer);
}

fn update_one(world: &mut World, entity: Entity, bounds: &Bounds, attract_radius: f64) -> Result<(), SimError> {
    let mut state: ProjectileState = read(world, entity, "ProjectileState")?;
    let mut pos: Position = read(world, entity, "Position")?;
    let mut vel: Velocity = read(world, entity, "Velocity")?;
    let hitbox: Hitbox = read(world, entity, "Hitbox")?;

    let active = match state.kind {
        ProjectileKind::Bullet => {
            step(&mut pos, &vel);
            !bounds.excludes_point(&pos)
        }
        ProjectileKind::GravityBomb => {
            vel.y += state.gravity;
            step(&mut pos, &vel);
            !(pos.y > bounds.height || pos.x < -hitbox.width || pos.x > bounds.width)
        }
        ProjectileKind::HomingRocket | ProjectileKind::HomingBomb => {
            if expire(&mut state) {
                false
            } else {
                if let Some(center) = state.target.and_then(|t| live_center(world, t)) {
                    let turn_rate = state.turn_rate.unwrap_or(0.0);
                    state.angle = guidance::homing_heading(state.angle, &pos, &center, turn_rate);
                    vel = Velocity::from_heading(state.angle, state.speed);
                }
                step(&mut pos, &vel);
                !bounds.excludes_point(&pos)
            }
        }
        ProjectileKind::Decoy => {
            if expire(&mut state) {
                false
            } else {
                step(&mut pos, &vel);
                let center = Rect::at(pos, hitbox.width, hitbox.height).center();
                attract(world, entity, &center, attract_radius);
                !bounds.excludes_point(&pos)
            }
        }
    };

    if !pos.is_finite() || !vel.is_finite() || !state.angle.is_finite() {
        return Err(SimError::NonFiniteState {
            entity,
            detail: "projectile kinematics",
        });
    }

    write(world, entity, "ProjectileState", state)?;
    write(world, entity, "Position", pos)?;
    write(world, entity, "Velocity", vel)?;
    write(world, entity, "Active", Active(active))
}

fn step(pos: &mut Position, vel: &Velocity) {
    pos.x += vel.x;
    pos.y += vel.y;
}

/// Count down the lifetime. Returns true once it is exhausted.
fn expire(state: &mut ProjectileState) -> bool {
    match state.life.as_mut() {
        Some(life) => {
            *life -= 1;
            *life <= 0
        }
        None => false,
    }
}

/// Center of `target` if it still exists and is active.
fn live_center(world: &World, target: Entity) -> Option<Position> {
    if !cleanup::is_active(world, target) {
        return None;
    }
    let pos = world.get::<&Position>(target).ok()?;
    let hitbox = world.get::<&Hitbox>(target).ok()?;
    Some(Rect::at(*pos, hitbox.width, hitbox.height).center())
}

/// Reassign every active, enemy-owned homing projectile that already has a
/// target and whose center lies within `radius` of `decoy_center`.
fn attract(world: &mut World, decoy: Entity, decoy_center: &Position, radius: f64) {
    let captured: Vec<Entity> = world
        .query::<(&ProjectileState, &Position, &Hitbox, &Active)>()
        .iter()
        .filter(|(entity, (state, pos, hitbox, active))| {
            *entity != decoy
                && active.0
                && state.from_enemy
                && state.kind.is_homing()
                && state.target.is_some()
                && Rect::at(**pos, hitbox.width, hitbox.height).center().distance_to(decoy_center) < radius
        })
        .map(|(entity, _)| entity)
        .collect();

    for entity in captured {
        if let Ok(mut state) = world.get::<&mut ProjectileState>(entity) {
            state.target = Some(decoy);
        }
    }
}
