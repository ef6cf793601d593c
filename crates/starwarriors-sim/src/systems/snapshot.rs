//! Snapshot system: read-only views of the world for renderers and the HUD.
//!
//! This system never modifies the world.

use hecs::{Entity, World};

use starwarriors_core::components::*;
use starwarriors_core::state::{BodyRole, BodySnapshot, CombatSnapshot, PlayerView, WaveInfo};
use starwarriors_core::types::{Position, SimClock};

/// Build a snapshot of every body, in spawn order.
pub fn build_snapshot(world: &World, clock: &SimClock, wave: WaveInfo) -> CombatSnapshot {
    let mut bodies: Vec<BodySnapshot> = Vec::new();

    for (_, (ship, pos, hitbox, active, order)) in world
        .query::<(&PlayerShip, &Position, &Hitbox, &Active, &SpawnOrder)>()
        .iter()
    {
        bodies.push(body(BodyRole::Player, ship.rotation, pos, hitbox, active, order));
    }

    for (_, (enemy, pos, hitbox, active, order)) in world
        .query::<(&EnemyState, &Position, &Hitbox, &Active, &SpawnOrder)>()
        .iter()
    {
        let role = BodyRole::Enemy { kind: enemy.kind };
        bodies.push(body(role, enemy.rotation, pos, hitbox, active, order));
    }

    for (_, (shot, pos, hitbox, active, order)) in world
        .query::<(&ProjectileState, &Position, &Hitbox, &Active, &SpawnOrder)>()
        .iter()
    {
        let role = BodyRole::Projectile {
            kind: shot.kind,
            from_enemy: shot.from_enemy,
        };
        bodies.push(body(role, shot.angle, pos, hitbox, active, order));
    }

    bodies.sort_unstable_by_key(|b| b.order);

    CombatSnapshot {
        clock: *clock,
        bodies,
        wave,
    }
}

fn body(role: BodyRole, heading: f64, pos: &Position, hitbox: &Hitbox, active: &Active, order: &SpawnOrder) -> BodySnapshot {
    BodySnapshot {
        order: order.0,
        role,
        position: *pos,
        width: hitbox.width,
        height: hitbox.height,
        heading,
        active: active.0,
    }
}

/// HUD view of the player ship, if it still exists.
pub fn build_player_view(world: &World, player: Entity) -> Option<PlayerView> {
    let mut query = world
        .query_one::<(
            &PlayerShip,
            &Hull,
            &Armament,
            &SecondaryPool,
            &DecoyPool,
            &Position,
            &Active,
        )>(player)
        .ok()?;
    let (ship, hull, arms, secondary, decoys, pos, active) = query.get()?;

    Some(PlayerView {
        class: ship.class,
        position: *pos,
        rotation: ship.rotation,
        active: active.0,
        health: hull.health,
        max_health: hull.max_health,
        shields: hull.shields,
        max_shields: hull.max_shields,
        ammo: arms.ammo,
        max_ammo: arms.max_ammo,
        overheated: arms.overheated,
        secondary_charges: secondary.charges,
        max_secondary_charges: secondary.max_charges,
        targeting: secondary.targeting,
        decoys: decoys.available,
        max_decoys: decoys.max,
        decoy_slot_timers: decoys.slot_timers.clone(),
    })
}
