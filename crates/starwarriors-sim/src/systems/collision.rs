//! Collision resolver: ordered AABB checks between the player, enemies and
//! projectiles.
//!
//! Three passes in a fixed order:
//! 1. player-owned projectiles against every enemy they overlap,
//! 2. enemy-owned projectiles against the player (skipped in cheat mode),
//! 3. the player body against enemy bodies (skipped in cheat mode).
//!
//! The resolver reports a score delta and whether the player was hit; score
//! and lives are tracked by the caller.

use hecs::{Entity, World};

use starwarriors_core::components::{Active, BossState, EnemyState, Hitbox, Hull, ProjectileState};
use starwarriors_core::enums::{EnemyKind, GameMode};
use starwarriors_core::state::CollisionOutcome;
use starwarriors_core::types::{Position, Rect};

use crate::error::{read, write, SimError};
use crate::systems::{cleanup, damage, enemies};
use crate::world_setup::SpawnContext;

/// Outcome of one resolver pass plus the enemies it destroyed.
#[derive(Debug, Default)]
pub struct CollisionReport {
    pub outcome: CollisionOutcome,
    pub kills: Vec<EnemyKind>,
}

struct Body {
    entity: Entity,
    rect: Rect,
}

/// Resolve collisions for this tick. The caller runs this only while the
/// player is active.
pub fn run(world: &mut World, ctx: &mut SpawnContext<'_>, player: Entity, now_ms: f64) -> Result<CollisionReport, SimError> {
    let mut report = CollisionReport::default();
    let game_mode = ctx.game_mode;

    let player_rect = rect_of(world, player)?;
    let mut hull: Hull = read(world, player, "Hull")?;
    let mut player_active = true;

    let mut enemy_bodies = bodies::<EnemyState>(world)?;
    let (friendly, hostile): (Vec<_>, Vec<_>) = {
        let mut shots = Vec::new();
        for body in bodies::<ProjectileState>(world)? {
            let state: ProjectileState = read(world, body.entity, "ProjectileState")?;
            shots.push((body, state));
        }
        shots.into_iter().partition(|(_, state)| !state.from_enemy)
    };

    // Player projectiles vs enemies. A shot is spent on its first contact but
    // still hits every enemy it overlaps this tick.
    for (shot, state) in &friendly {
        let mut spent = false;
        let mut index = 0;
        while index < enemy_bodies.len() {
            if !shot.rect.overlaps(&enemy_bodies[index].rect) {
                index += 1;
                continue;
            }
            spent = true;
            if strike(world, ctx, &enemy_bodies[index], state.damage, &mut report)? {
                enemy_bodies.remove(index);
            } else {
                index += 1;
            }
        }
        if spent {
            write(world, shot.entity, "Active", Active(false))?;
        }
    }

    if game_mode != GameMode::Cheat {
        // Enemy projectiles vs player
        for (shot, state) in &hostile {
            if !shot.rect.overlaps(&player_rect) {
                continue;
            }
            write(world, shot.entity, "Active", Active(false))?;
            damage::damage_player(&mut hull, game_mode, hit_damage(state.damage), now_ms);
            if hull.health <= 0 {
                player_active = false;
                break;
            }
        }

        // Player body vs enemy bodies
        if player_active && enemy_bodies.iter().any(|enemy| player_rect.overlaps(&enemy.rect)) {
            player_active = false;
        }

        if !player_active {
            report.outcome.player_hit = true;
            ctx.explosion(player_rect.center(), true);
        }
    }

    write(world, player, "Hull", hull)?;
    write(world, player, "Active", Active(player_active))?;
    Ok(report)
}

/// Apply one player hit to `enemy`. Returns true when it was destroyed.
fn strike(
    world: &mut World,
    ctx: &mut SpawnContext<'_>,
    enemy: &Body,
    damage: i32,
    report: &mut CollisionReport,
) -> Result<bool, SimError> {
    let mut enemy_state: EnemyState = read(world, enemy.entity, "EnemyState")?;
    let destroyed = if ctx.game_mode == GameMode::Derek {
        damage::obliterate_enemy(&mut enemy_state);
        true
    } else {
        damage::damage_enemy(&mut enemy_state, hit_damage(damage))
    };

    if let Ok(mut boss) = read::<BossState>(world, enemy.entity, "BossState") {
        enemies::refresh_boss_phase(&mut enemy_state, &mut boss, ctx.config, ctx.difficulty);
        write(world, enemy.entity, "BossState", boss)?;
    }

    let kind = enemy_state.kind;
    let dead = destroyed || enemy_state.health <= 0;
    write(world, enemy.entity, "EnemyState", enemy_state)?;

    if dead {
        write(world, enemy.entity, "Active", Active(false))?;
        report.outcome.score_delta += ctx.config.scoring.enemy_kill;
        report.kills.push(kind);
        ctx.explosion(enemy.rect.center(), false);
    }
    Ok(dead)
}

/// A zero-damage projectile still counts as one point of damage.
fn hit_damage(damage: i32) -> i32 {
    if damage == 0 {
        1
    } else {
        damage
    }
}

fn rect_of(world: &World, entity: Entity) -> Result<Rect, SimError> {
    let pos: Position = read(world, entity, "Position")?;
    let hitbox: Hitbox = read(world, entity, "Hitbox")?;
    Ok(Rect::at(pos, hitbox.width, hitbox.height))
}

/// Active bodies with role `R`, in spawn order.
fn bodies<R: hecs::Component>(world: &World) -> Result<Vec<Body>, SimError> {
    cleanup::ordered::<R>(world)
        .into_iter()
        .filter(|&entity| cleanup::is_active(world, entity))
        .map(|entity| Ok(Body {
            entity,
            rect: rect_of(world, entity)?,
        }))
        .collect()
}
