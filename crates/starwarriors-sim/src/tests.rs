//! Tests for the combat engine: determinism, projectiles, collisions, waves,
//! deferred effects and the player resource pools.

use std::f64::consts::{FRAC_PI_2, PI};

use hecs::Entity;

use starwarriors_core::commands::PlayerIntent;
use starwarriors_core::components::*;
use starwarriors_core::config::{CombatConfig, PerDifficulty, WaveDef, WaveGroup};
use starwarriors_core::enums::*;
use starwarriors_core::events::EffectEvent;
use starwarriors_core::state::TickReport;
use starwarriors_core::types::{Bounds, Position, Rect, Velocity};
use starwarriors_enemy_ai::fsm;

use crate::engine::{CombatEngine, SimConfig};
use crate::world_setup::Shot;

const DT: f64 = 16.0;

fn bounds() -> Bounds {
    Bounds::new(800.0, 600.0)
}

/// A campaign of one empty wave: nothing spawns unless a test asks for it.
fn quiet_stats() -> CombatConfig {
    CombatConfig {
        waves: vec![WaveDef {
            groups: Vec::new(),
            is_boss: false,
        }],
        ..CombatConfig::default()
    }
}

fn started(ship: ShipClass, game_mode: GameMode, stats: CombatConfig) -> CombatEngine {
    let mut engine = CombatEngine::new(SimConfig {
        ship,
        game_mode,
        stats,
        ..SimConfig::default()
    });
    engine.start(bounds());
    engine
}

fn quiet(ship: ShipClass, game_mode: GameMode) -> CombatEngine {
    started(ship, game_mode, quiet_stats())
}

fn step(engine: &mut CombatEngine, intent: PlayerIntent) -> TickReport {
    engine.tick(DT, &intent, bounds())
}

fn idle(engine: &mut CombatEngine, ticks: usize) -> Vec<TickReport> {
    (0..ticks).map(|_| step(engine, PlayerIntent::default())).collect()
}

fn boss_entity(engine: &CombatEngine) -> Entity {
    engine
        .world()
        .query::<&EnemyState>()
        .iter()
        .find(|(_, e)| e.kind == EnemyKind::Boss)
        .map(|(entity, _)| entity)
        .expect("boss should be spawned")
}

fn place(engine: &mut CombatEngine, entity: Entity, x: f64, y: f64) {
    *engine.world_mut().get::<&mut Position>(entity).unwrap() = Position::new(x, y);
}

fn boss_stats() -> CombatConfig {
    CombatConfig {
        waves: vec![WaveDef {
            groups: Vec::new(),
            is_boss: true,
        }],
        ..CombatConfig::default()
    }
}

/// Make `enemy` fire on its next update.
fn prime_gun(engine: &mut CombatEngine, enemy: Entity) {
    let mut state = engine.world_mut().get::<&mut EnemyState>(enemy).unwrap();
    state.shoot_timer = f64::from(state.shoot_interval) - 1.0;
}

/// Enemy-owned projectiles of `kind`, in no particular order.
fn enemy_shots(engine: &CombatEngine, kind: ProjectileKind) -> Vec<(Entity, ProjectileState, Position)> {
    engine
        .world()
        .query::<(&ProjectileState, &Position)>()
        .iter()
        .filter(|(_, (s, _))| s.kind == kind && s.from_enemy)
        .map(|(entity, (s, pos))| (entity, s.clone(), *pos))
        .collect()
}

fn player_center(engine: &CombatEngine) -> Position {
    let view = engine.player_view().unwrap();
    let size = engine.config().stats.ships.get(view.class).width;
    Rect::at(view.position, size, size).center()
}

fn player_bombs(engine: &CombatEngine) -> usize {
    engine
        .world()
        .query::<&ProjectileState>()
        .iter()
        .filter(|(_, s)| s.kind == ProjectileKind::HomingBomb && !s.from_enemy)
        .count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = CombatEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = CombatEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    engine_a.start(bounds());
    engine_b.start(bounds());

    for i in 0..300 {
        let intent = PlayerIntent {
            fire_primary: true,
            left: i % 50 < 25,
            right: i % 50 >= 25,
            ..Default::default()
        };
        let report_a = engine_a.tick(DT, &intent, bounds());
        let report_b = engine_b.tick(DT, &intent, bounds());
        assert_eq!(report_a.collision, report_b.collision);

        let json_a = serde_json::to_string(&engine_a.snapshot()).unwrap();
        let json_b = serde_json::to_string(&engine_b.snapshot()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed at tick {i}");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = CombatEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = CombatEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });
    engine_a.start(bounds());
    engine_b.start(bounds());

    // Wave spawn positions are random, so the first snapshot already differs.
    let json_a = serde_json::to_string(&engine_a.snapshot()).unwrap();
    let json_b = serde_json::to_string(&engine_b.snapshot()).unwrap();
    assert_ne!(json_a, json_b, "Different seeds should produce divergent output");
}

// ---- Projectiles ----

#[test]
fn test_bullet_leaves_top_edge_after_26_ticks() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let bullet = engine.spawn_shot(Shot::bullet(Position::new(100.0, 500.0), -FRAC_PI_2, false));

    idle(&mut engine, 25);
    let y = engine.world().get::<&Position>(bullet).unwrap().y;
    assert!(y.abs() < 1e-9, "After 25 ticks the bullet sits on the edge, y = {y}");

    idle(&mut engine, 1);
    assert!(!engine.world().contains(bullet), "Bullet past the top edge must be removed");
}

#[test]
fn test_gravity_bomb_accelerates() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let bomb = engine.spawn_shot(Shot::gravity_bomb(Position::new(100.0, 100.0)));

    idle(&mut engine, 2);
    let vel = *engine.world().get::<&Velocity>(bomb).unwrap();
    assert!((vel.y - 5.1).abs() < 1e-9, "vy = {}", vel.y);
    let y = engine.world().get::<&Position>(bomb).unwrap().y;
    assert!((y - (100.0 + 5.05 + 5.1)).abs() < 1e-9, "y = {y}");
}

#[test]
fn test_decoy_captures_enemy_homing_rocket() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let player = engine.player().unwrap();
    let enemy = engine.spawn_enemy(EnemyKind::Light, 100.0, 100.0);

    let hostile = engine.spawn_shot(Shot::homing_rocket(Position::new(300.0, 300.0), player, true));
    let friendly = engine.spawn_shot(Shot::homing_rocket(Position::new(300.0, 320.0), enemy, false));
    let decoy = engine.spawn_shot(Shot::decoy(Position::new(320.0, 300.0), 0.0));

    idle(&mut engine, 1);

    let world = engine.world();
    assert_eq!(world.get::<&ProjectileState>(hostile).unwrap().target, Some(decoy));
    assert_eq!(
        world.get::<&ProjectileState>(friendly).unwrap().target,
        Some(enemy),
        "Player-owned homing projectiles ignore decoys"
    );
}

#[test]
fn test_homing_rocket_without_target_flies_straight() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let enemy = engine.spawn_enemy(EnemyKind::Light, 100.0, 100.0);
    let rocket = engine.spawn_shot(Shot::homing_rocket(Position::new(300.0, 300.0), enemy, false));
    engine.world_mut().despawn(enemy).unwrap();

    idle(&mut engine, 3);
    let pos = *engine.world().get::<&Position>(rocket).unwrap();
    assert!((pos.x - 345.0).abs() < 1e-9, "x = {}", pos.x);
    assert!((pos.y - 300.0).abs() < 1e-9, "y = {}", pos.y);
}

#[test]
fn test_faulted_projectile_removed_without_halting_tick() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let broken = engine.spawn_shot(Shot::bullet(Position::new(100.0, 300.0), 0.0, false));
    let healthy = engine.spawn_shot(Shot::bullet(Position::new(100.0, 400.0), 0.0, false));
    *engine.world_mut().get::<&mut Velocity>(broken).unwrap() = Velocity::new(f64::NAN, 0.0);

    idle(&mut engine, 1);
    assert!(!engine.world().contains(broken));
    assert!(engine.world().contains(healthy));
    let x = engine.world().get::<&Position>(healthy).unwrap().x;
    assert!((x - 120.0).abs() < 1e-9);
}

// ---- Collisions ----

#[test]
fn test_player_shields_absorb_before_health() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);

    for expected in [(1, 3), (0, 3), (0, 2)] {
        engine.spawn_shot(Shot::bullet(Position::new(410.0, 540.0), FRAC_PI_2, true));
        let report = idle(&mut engine, 1).remove(0);
        assert!(!report.collision.player_hit);

        let view = engine.player_view().unwrap();
        assert_eq!((view.shields, view.health), expected);
    }
}

#[test]
fn test_lethal_hit_deactivates_player() {
    let mut engine = quiet(ShipClass::LightInterceptor, GameMode::Normal);
    engine.spawn_shot(Shot::bullet(Position::new(402.0, 540.0), FRAC_PI_2, true));

    let report = idle(&mut engine, 1).remove(0);
    assert!(report.collision.player_hit);
    assert!(report
        .effects
        .iter()
        .any(|e| matches!(e, EffectEvent::Explosion { large: true, .. })));

    let view = engine.player_view().unwrap();
    assert!(!view.active);
    assert_eq!(view.health, 0);

    engine.remove_player();
    assert!(engine.player_view().is_none());
}

#[test]
fn test_cheat_mode_skips_enemy_fire() {
    let mut engine = quiet(ShipClass::LightInterceptor, GameMode::Cheat);
    let bullet = engine.spawn_shot(Shot::bullet(Position::new(402.0, 540.0), FRAC_PI_2, true));

    let report = idle(&mut engine, 1).remove(0);
    assert!(!report.collision.player_hit);
    assert!(engine.world().contains(bullet), "Enemy fire is not even consumed in cheat mode");
    assert_eq!(engine.player_view().unwrap().health, 1);
}

#[test]
fn test_body_collision_is_lethal() {
    let mut engine = quiet(ShipClass::Bomber, GameMode::Normal);
    // Below the patrol band so it only strafes; overlaps the player at (400, 550).
    let enemy = engine.spawn_enemy(EnemyKind::Light, 405.0, 560.0);

    let report = idle(&mut engine, 1).remove(0);
    assert!(report.collision.player_hit, "Overlap must kill regardless of shields");
    assert!(engine.world().contains(enemy));
    assert!(!engine.player_view().unwrap().active);
}

#[test]
fn test_enemy_shield_absorbs_hit() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let enemy = engine.spawn_enemy(EnemyKind::Interceptor, 100.0, 300.0);
    engine.spawn_shot(Shot::bullet(Position::new(110.5, 325.0), -FRAC_PI_2, false));

    let report = idle(&mut engine, 1).remove(0);
    assert_eq!(report.collision.score_delta, 0);
    let state = (*engine.world().get::<&EnemyState>(enemy).unwrap()).clone();
    assert_eq!(state.shields, 0);
    assert_eq!(state.health, 2);
}

#[test]
fn test_derek_mode_one_hit_kill() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Derek);
    let view = engine.player_view().unwrap();
    assert_eq!(view.max_health, 7);
    assert_eq!(view.max_shields, 0);

    let enemy = engine.spawn_enemy(EnemyKind::Interceptor, 100.0, 300.0);
    engine.spawn_shot(Shot::bullet(Position::new(110.5, 325.0), -FRAC_PI_2, false));

    let report = idle(&mut engine, 1).remove(0);
    assert_eq!(report.collision.score_delta, 100);
    assert!(report
        .effects
        .iter()
        .any(|e| matches!(e, EffectEvent::Explosion { large: false, .. })));
    assert!(!engine.world().get::<&Active>(enemy).unwrap().0);

    idle(&mut engine, 1);
    assert!(!engine.world().contains(enemy), "Destroyed enemy is swept on the next pass");
}

#[test]
fn test_boss_phase_updates_on_damage() {
    let stats = boss_stats();
    let mut engine = started(ShipClass::Interceptor, GameMode::Normal, stats);
    let boss = boss_entity(&engine);
    place(&mut engine, boss, 360.0, 200.0);
    engine.world_mut().get::<&mut EnemyState>(boss).unwrap().health = 121;
    engine.spawn_shot(Shot::bullet(Position::new(398.0, 260.0), -FRAC_PI_2, false));

    idle(&mut engine, 1);
    let world = engine.world();
    assert_eq!(world.get::<&EnemyState>(boss).unwrap().health, 120);
    assert_eq!(world.get::<&BossState>(boss).unwrap().phase, BossPhase::Damaged);
    assert!((world.get::<&EnemyState>(boss).unwrap().speed - 1.2).abs() < 1e-12);
}

// ---- Waves ----

#[test]
fn test_wave_completion_delay_and_countdown() {
    let stats = CombatConfig {
        waves: vec![
            WaveDef {
                groups: Vec::new(),
                is_boss: false,
            },
            WaveDef {
                groups: vec![WaveGroup::new(EnemyKind::Light, 1)],
                is_boss: false,
            },
        ],
        ..CombatConfig::default()
    };
    let mut engine = started(ShipClass::Interceptor, GameMode::Normal, stats);

    let report = idle(&mut engine, 1).remove(0);
    assert!(report.wave.is_complete);
    assert_eq!(report.wave.countdown, 3);
    assert_eq!(report.wave.wave_number, 1);

    let reports = idle(&mut engine, 178);
    let last = reports.last().unwrap();
    assert_eq!(last.wave.wave_number, 1, "Completion must not restart the delay");
    assert!(last.wave.is_complete);
    // Countdown steps at 1024 ms and 2032 ms of sim clock.
    assert_eq!(last.wave.countdown, 1);

    let report = idle(&mut engine, 1).remove(0);
    assert_eq!(report.wave.wave_number, 2);
    assert!(!report.wave.is_complete);
    assert_eq!(report.wave.total_waves, 2);
    let enemies = engine.world().query::<&EnemyState>().iter().count();
    assert_eq!(enemies, 1);
}

#[test]
fn test_campaign_end_clamps_wave_index() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    assert!(!engine.is_campaign_complete());

    idle(&mut engine, 400);
    let info = engine.wave_info();
    assert_eq!(info.wave_number, 1);
    assert_eq!(info.total_waves, 1);
    assert!(engine.is_campaign_complete());
    assert!(!engine.is_boss_defeated());
}

#[test]
fn test_boss_defeat_requires_kill() {
    let stats = boss_stats();
    let mut engine = started(ShipClass::Interceptor, GameMode::Normal, stats);
    assert!(engine.wave_info().is_boss);
    let boss = boss_entity(&engine);
    engine.world_mut().despawn(boss).unwrap();

    let reports = idle(&mut engine, 200);
    assert!(reports.iter().all(|r| !r.victory));
    assert!(!engine.is_boss_defeated(), "A boss that vanished was not defeated");
    assert!(engine.is_campaign_complete());
}

#[test]
fn test_boss_kill_reports_victory_once() {
    let stats = boss_stats();
    let mut engine = started(ShipClass::Interceptor, GameMode::Derek, stats);
    let boss = boss_entity(&engine);
    place(&mut engine, boss, 360.0, 200.0);
    engine.spawn_shot(Shot::bullet(Position::new(398.0, 260.0), -FRAC_PI_2, false));

    let first = idle(&mut engine, 1).remove(0);
    assert_eq!(first.collision.score_delta, 100);

    let reports = idle(&mut engine, 3);
    let wins: Vec<_> = reports.iter().filter(|r| r.victory_bonus > 0).collect();
    assert_eq!(wins.len(), 1, "Victory bonus is reported exactly once");
    assert_eq!(wins[0].victory_bonus, 10_000);
    assert!(engine.is_boss_defeated());
    assert!(reports.last().unwrap().victory);
}

#[test]
fn test_spawn_enemy_named() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    assert!(engine.spawn_enemy_named("cruiser", 10.0, 10.0).is_none());
    let bomber = engine.spawn_enemy_named("bomber", 10.0, 10.0).unwrap();
    assert!(engine.world().get::<&BombBay>(bomber).is_ok());
    assert!(engine.world().get::<&BossState>(bomber).is_err());
}

// ---- Player resources ----

#[test]
fn test_player_movement_clamped_to_bounds() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    for _ in 0..150 {
        step(
            &mut engine,
            PlayerIntent {
                left: true,
                ..Default::default()
            },
        );
    }
    let view = engine.player_view().unwrap();
    assert_eq!(view.position.x, 0.0);

    idle(&mut engine, 1);
    let vx = engine
        .world()
        .get::<&Velocity>(engine.player().unwrap())
        .unwrap()
        .x;
    assert!((vx + 4.0 * 0.97).abs() < 1e-12, "Released axis drifts under drag, vx = {vx}");
}

#[test]
fn test_primary_fire_emits_blaster_cue() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let report = step(
        &mut engine,
        PlayerIntent {
            fire_primary: true,
            ..Default::default()
        },
    );
    assert!(report.effects.contains(&EffectEvent::Sound {
        cue: SoundCue::BlasterShot
    }));
    assert_eq!(engine.player_view().unwrap().ammo, 6);
}

#[test]
fn test_overheat_recovers_after_delay() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let player = engine.player().unwrap();
    engine.world_mut().get::<&mut Armament>(player).unwrap().ammo = 1;

    step(
        &mut engine,
        PlayerIntent {
            fire_primary: true,
            ..Default::default()
        },
    );
    let view = engine.player_view().unwrap();
    assert!(view.overheated);
    assert_eq!(view.ammo, 0);

    // Due at 16 + 2000 ms; tick 125 ends at 2000 ms.
    idle(&mut engine, 124);
    assert!(engine.player_view().unwrap().overheated);

    idle(&mut engine, 1);
    let view = engine.player_view().unwrap();
    assert!(!view.overheated);
    assert_eq!(view.ammo, view.max_ammo);
}

#[test]
fn test_overheat_recovery_dropped_for_inactive_player() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let player = engine.player().unwrap();
    engine.world_mut().get::<&mut Armament>(player).unwrap().ammo = 1;
    step(
        &mut engine,
        PlayerIntent {
            fire_primary: true,
            ..Default::default()
        },
    );
    *engine.world_mut().get::<&mut Active>(player).unwrap() = Active(false);

    idle(&mut engine, 200);
    assert_eq!(engine.pending_deferred(), 0);
    assert!(engine.world().get::<&Armament>(player).unwrap().overheated);
}

#[test]
fn test_remove_player_cancels_deferred() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let player = engine.player().unwrap();
    engine.world_mut().get::<&mut Armament>(player).unwrap().ammo = 1;
    step(
        &mut engine,
        PlayerIntent {
            fire_primary: true,
            ..Default::default()
        },
    );
    assert_eq!(engine.pending_deferred(), 1);

    engine.remove_player();
    assert_eq!(engine.pending_deferred(), 0);
    idle(&mut engine, 200);
}

#[test]
fn test_bomber_single_target_pairs_bombs() {
    let mut engine = quiet(ShipClass::Bomber, GameMode::Normal);
    engine.spawn_enemy(EnemyKind::Light, 100.0, 100.0);

    step(
        &mut engine,
        PlayerIntent {
            fire_secondary: true,
            ..Default::default()
        },
    );
    assert_eq!(player_bombs(&engine), 1);
    assert_eq!(engine.player_view().unwrap().secondary_charges, 9);

    // Second bomb due at 216 ms: tick 14.
    idle(&mut engine, 12);
    assert_eq!(player_bombs(&engine), 1);
    idle(&mut engine, 1);
    assert_eq!(player_bombs(&engine), 2);
}

#[test]
fn test_bomber_paired_bomb_dropped_when_target_gone() {
    let mut engine = quiet(ShipClass::Bomber, GameMode::Normal);
    let enemy = engine.spawn_enemy(EnemyKind::Light, 100.0, 100.0);

    step(
        &mut engine,
        PlayerIntent {
            fire_secondary: true,
            ..Default::default()
        },
    );
    engine.world_mut().despawn(enemy).unwrap();

    idle(&mut engine, 20);
    assert_eq!(player_bombs(&engine), 1);
    assert_eq!(engine.pending_deferred(), 0);
}

#[test]
fn test_bomber_split_targets_two_enemies() {
    let mut engine = quiet(ShipClass::Bomber, GameMode::Normal);
    engine.spawn_enemy(EnemyKind::Light, 100.0, 100.0);
    engine.spawn_enemy(EnemyKind::Light, 600.0, 100.0);

    step(
        &mut engine,
        PlayerIntent {
            fire_secondary: true,
            targeting: Some(TargetingMode::Split),
            ..Default::default()
        },
    );
    assert_eq!(player_bombs(&engine), 2);
    assert_eq!(engine.pending_deferred(), 0);
    assert_eq!(engine.player_view().unwrap().targeting, TargetingMode::Split);
}

#[test]
fn test_rocket_charge_spent_without_target() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let report = step(
        &mut engine,
        PlayerIntent {
            fire_secondary: true,
            ..Default::default()
        },
    );
    assert!(!report.effects.contains(&EffectEvent::Sound {
        cue: SoundCue::RocketLaunch
    }));
    assert_eq!(engine.player_view().unwrap().secondary_charges, 2);
}

#[test]
fn test_decoy_slot_recharge_timers() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let deploy = PlayerIntent {
        deploy_decoy: true,
        ..Default::default()
    };

    step(&mut engine, deploy);
    let view = engine.player_view().unwrap();
    assert_eq!(view.decoys, 4);
    assert_eq!(view.decoy_slot_timers, vec![0, 0, 0, 0, 180]);

    // Deploy cooldown blocks the next one.
    step(&mut engine, deploy);
    let view = engine.player_view().unwrap();
    assert_eq!(view.decoys, 4);
    assert_eq!(view.decoy_slot_timers, vec![0, 0, 0, 0, 179]);

    idle(&mut engine, 179);
    let view = engine.player_view().unwrap();
    assert_eq!(view.decoys, 5, "Slot recharged after 180 ticks");
    assert_eq!(view.decoy_slot_timers, vec![0; 5]);
}

#[test]
fn test_cheat_mode_decoys_unlimited() {
    let mut engine = quiet(ShipClass::LightInterceptor, GameMode::Cheat);
    let deploy = PlayerIntent {
        deploy_decoy: true,
        ..Default::default()
    };
    for _ in 0..5 {
        step(&mut engine, deploy);
    }
    let decoys = engine
        .world()
        .query::<&ProjectileState>()
        .iter()
        .filter(|(_, s)| s.kind == ProjectileKind::Decoy)
        .count();
    assert_eq!(decoys, 5);
    assert_eq!(engine.player_view().unwrap().decoys, 3);
}

#[test]
fn test_player_rotation_wraps() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let turn = PlayerIntent {
        rotate_left: true,
        ..Default::default()
    };
    // Start at -π/2; 0.07 per tick crosses -2π after 68 ticks.
    for _ in 0..68 {
        step(&mut engine, turn);
    }
    let rotation = engine.player_view().unwrap().rotation;
    assert!(rotation > -2.0 * PI && rotation < 0.0, "rotation = {rotation}");
}

#[test]
fn test_bullet_hits_every_overlapping_enemy() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let first = engine.spawn_enemy(EnemyKind::Light, 100.0, 50.0);
    let second = engine.spawn_enemy(EnemyKind::Light, 100.0, 50.0);
    engine.spawn_shot(Shot::bullet(Position::new(105.0, 75.0), -FRAC_PI_2, false));

    let report = idle(&mut engine, 1).remove(0);
    assert_eq!(report.collision.score_delta, 200);
    let explosions = report
        .effects
        .iter()
        .filter(|e| matches!(e, EffectEvent::Explosion { large: false, .. }))
        .count();
    assert_eq!(explosions, 2);
    assert!(!engine.world().get::<&Active>(first).unwrap().0);
    assert!(!engine.world().get::<&Active>(second).unwrap().0);
}

// ---- Enemy weapons ----

#[test]
fn test_enemy_fires_aimed_bullet_with_blaster_cue() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let enemy = engine.spawn_enemy(EnemyKind::Light, 390.0, 150.0);
    engine.world_mut().get::<&mut EnemyState>(enemy).unwrap().special_chance = 0.0;
    prime_gun(&mut engine, enemy);

    let report = idle(&mut engine, 1).remove(0);
    assert!(report.effects.contains(&EffectEvent::Sound {
        cue: SoundCue::BlasterShot
    }));

    let shots = enemy_shots(&engine, ProjectileKind::Bullet);
    assert_eq!(shots.len(), 1);
    let (_, shot, origin) = &shots[0];
    let direct = origin.bearing_to(&player_center(&engine));
    assert!((shot.angle - direct).abs() < 1e-9, "angle = {}, direct = {direct}", shot.angle);
    assert!(enemy_shots(&engine, ProjectileKind::HomingRocket).is_empty());
}

#[test]
fn test_enemy_special_roll_swaps_in_homing_rocket() {
    let mut stats = quiet_stats();
    stats.enemies.light.special_chance = PerDifficulty::new(1.0, 1.0);
    let mut engine = started(ShipClass::Interceptor, GameMode::Normal, stats);
    let player = engine.player().unwrap();
    let enemy = engine.spawn_enemy(EnemyKind::Light, 390.0, 150.0);
    prime_gun(&mut engine, enemy);

    let report = idle(&mut engine, 1).remove(0);
    assert!(report.effects.contains(&EffectEvent::Sound {
        cue: SoundCue::RocketLaunch
    }));
    assert!(!report.effects.contains(&EffectEvent::Sound {
        cue: SoundCue::BlasterShot
    }));

    let rockets = enemy_shots(&engine, ProjectileKind::HomingRocket);
    assert_eq!(rockets.len(), 1);
    assert_eq!(rockets[0].1.target, Some(player));
    assert!(enemy_shots(&engine, ProjectileKind::Bullet).is_empty());
}

/// Angle of a light enemy's shot at a player strafing right, and the direct
/// bearing from the muzzle to the player's center.
fn shot_at_moving_player(difficulty: Difficulty) -> (f64, f64) {
    let mut engine = CombatEngine::new(SimConfig {
        difficulty,
        stats: quiet_stats(),
        ..SimConfig::default()
    });
    engine.start(bounds());
    let enemy = engine.spawn_enemy(EnemyKind::Light, 390.0, 150.0);
    engine.world_mut().get::<&mut EnemyState>(enemy).unwrap().special_chance = 0.0;
    prime_gun(&mut engine, enemy);

    step(
        &mut engine,
        PlayerIntent {
            right: true,
            ..Default::default()
        },
    );
    let shots = enemy_shots(&engine, ProjectileKind::Bullet);
    assert_eq!(shots.len(), 1);
    let (_, shot, origin) = &shots[0];
    (shot.angle, origin.bearing_to(&player_center(&engine)))
}

#[test]
fn test_hard_enemy_leads_moving_player() {
    let (angle, direct) = shot_at_moving_player(Difficulty::Hard);
    // Player below and moving right: the lead point lies at a smaller bearing
    assert!(angle < direct - 0.01, "angle = {angle}, direct = {direct}");

    let (angle, direct) = shot_at_moving_player(Difficulty::Easy);
    assert!((angle - direct).abs() < 1e-9, "Easy aims straight at the player");
}

#[test]
fn test_bomber_drops_homing_bomb_on_player() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let player = engine.player().unwrap();
    let bomber = engine.spawn_enemy(EnemyKind::Bomber, 100.0, 100.0);
    engine.world_mut().get::<&mut BombBay>(bomber).unwrap().timer = 1.0;

    idle(&mut engine, 1);
    let bombs = enemy_shots(&engine, ProjectileKind::HomingBomb);
    assert_eq!(bombs.len(), 1);
    assert_eq!(bombs[0].1.target, Some(player));

    let timer = engine.world().get::<&BombBay>(bomber).unwrap().timer;
    assert!((360.0..660.0).contains(&timer), "Cooldown redrawn from the easy span, got {timer}");
}

#[test]
fn test_boss_fan_scales_with_desperate_phase() {
    let mut engine = started(ShipClass::Interceptor, GameMode::Normal, boss_stats());
    let boss = boss_entity(&engine);
    engine.world_mut().get::<&mut EnemyState>(boss).unwrap().health = 20;

    idle(&mut engine, 1);
    assert_eq!(engine.world().get::<&BossState>(boss).unwrap().phase, BossPhase::Desperate);
    assert!(enemy_shots(&engine, ProjectileKind::Bullet).is_empty());

    engine.world_mut().get::<&mut BossState>(boss).unwrap().special_timer = 1;
    let report = idle(&mut engine, 1).remove(0);
    let fan: Vec<_> = enemy_shots(&engine, ProjectileKind::Bullet)
        .into_iter()
        .filter(|(_, s, _)| s.speed == 18.0)
        .collect();
    assert_eq!(fan.len(), 12);
    assert!(report.effects.contains(&EffectEvent::Sound {
        cue: SoundCue::RocketLaunch
    }));

    let special = engine.world().get::<&BossState>(boss).unwrap().special_timer;
    assert_eq!(special, 300, "Special timer rearmed from the easy interval");
}

/// Fire the boss's regular gun once. Returns the shot's origin, the muzzle
/// of the mount that was active when it fired, and the boss center.
fn fire_boss_gun(engine: &mut CombatEngine, boss: Entity) -> (Position, Position, Position) {
    prime_gun(engine, boss);
    let gun = engine.world().get::<&BossState>(boss).unwrap().gun_index;
    let before: Vec<Entity> = enemy_shots(engine, ProjectileKind::Bullet)
        .into_iter()
        .map(|(entity, _, _)| entity)
        .collect();

    idle(engine, 1);

    let (_, shot, origin) = enemy_shots(engine, ProjectileKind::Bullet)
        .into_iter()
        .find(|(entity, _, _)| !before.contains(entity))
        .expect("boss should have fired");
    assert_eq!(shot.speed, 25.0);

    let world = engine.world();
    let mut mount = (*world.get::<&BossState>(boss).unwrap()).clone();
    mount.gun_index = gun;
    let state = world.get::<&EnemyState>(boss).unwrap();
    let pos = *world.get::<&Position>(boss).unwrap();
    let center = Rect::at(pos, 80.0, 80.0).center();
    let expected = fsm::gun_muzzle(&mount, &engine.config().stats.boss, &center, state.rotation);
    (origin, expected, center)
}

#[test]
fn test_boss_guns_alternate_mounts() {
    let mut engine = started(ShipClass::Interceptor, GameMode::Normal, boss_stats());
    let boss = boss_entity(&engine);

    let (left, expected, left_center) = fire_boss_gun(&mut engine, boss);
    assert!(left.distance_to(&expected) < 1e-9);

    idle(&mut engine, 9);
    assert_eq!(engine.world().get::<&BossState>(boss).unwrap().gun_index, 1);

    let (right, expected, right_center) = fire_boss_gun(&mut engine, boss);
    assert!(right.distance_to(&expected) < 1e-9);

    // Mounts sit 60 apart; the heading barely changes between the two shots
    let left_offset = Position::new(left.x - left_center.x, left.y - left_center.y);
    let right_offset = Position::new(right.x - right_center.x, right.y - right_center.y);
    let spread = left_offset.distance_to(&right_offset);
    assert!(spread > 50.0, "Mounts should sit on opposite sides, spread = {spread}");
}

#[test]
fn test_last_decoy_in_range_wins() {
    let mut engine = quiet(ShipClass::Interceptor, GameMode::Normal);
    let player = engine.player().unwrap();
    let rocket = engine.spawn_shot(Shot::homing_rocket(Position::new(300.0, 300.0), player, true));
    let first = engine.spawn_shot(Shot::decoy(Position::new(320.0, 300.0), 0.0));
    let second = engine.spawn_shot(Shot::decoy(Position::new(300.0, 330.0), 0.0));

    idle(&mut engine, 1);
    let target = engine.world().get::<&ProjectileState>(rocket).unwrap().target;
    assert_eq!(target, Some(second));
    assert_ne!(target, Some(first));
}
