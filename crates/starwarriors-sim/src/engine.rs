//! Simulation engine: the core of the game.
//!
//! `CombatEngine` owns the hecs ECS world, the seeded RNG, the deferred-effect
//! queue and the wave scheduler. Each `tick` runs the systems in a fixed
//! order: deferred effects, player, wave scheduler, projectiles, enemies,
//! collisions. Completely headless, enabling deterministic testing.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starwarriors_core::commands::PlayerIntent;
use starwarriors_core::components::{Armament, EnemyState, Hitbox, PlayerShip};
use starwarriors_core::config::CombatConfig;
use starwarriors_core::enums::{Difficulty, EnemyKind, GameMode, ShipClass};
use starwarriors_core::events::EffectEvent;
use starwarriors_core::state::{CombatSnapshot, PlayerView, TickReport, WaveInfo};
use starwarriors_core::types::{Bounds, Position, Rect, SimClock};

use crate::deferred::{DeferredAction, DeferredEntry, DeferredQueue};
use crate::systems;
use crate::systems::cleanup;
use crate::systems::wave_spawner::WaveScheduler;
use crate::world_setup::{self, Shot, SpawnContext};

/// Configuration for starting a new session.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    pub ship: ShipClass,
    /// Stat tables, waves and timings.
    pub stats: CombatConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::default(),
            game_mode: GameMode::default(),
            ship: ShipClass::default(),
            stats: CombatConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct CombatEngine {
    world: World,
    clock: SimClock,
    rng: ChaCha8Rng,
    config: SimConfig,
    sequence: u64,
    effects: Vec<EffectEvent>,
    deferred: DeferredQueue,
    waves: WaveScheduler,
    player: Option<Entity>,
    victory: bool,
    despawn_buffer: Vec<Entity>,
}

/// Build a `SpawnContext` from disjoint engine fields.
macro_rules! spawn_ctx {
    ($self:ident) => {
        SpawnContext {
            config: &$self.config.stats,
            difficulty: $self.config.difficulty,
            game_mode: $self.config.game_mode,
            sequence: &mut $self.sequence,
            effects: &mut $self.effects,
        }
    };
}

impl CombatEngine {
    /// Create a new engine with the given config. Nothing is spawned until `start`.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            clock: SimClock::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            sequence: 0,
            effects: Vec::new(),
            deferred: DeferredQueue::default(),
            waves: WaveScheduler::default(),
            player: None,
            victory: false,
            despawn_buffer: Vec::new(),
        }
    }

    /// Clear the world, spawn the player and the first wave.
    pub fn start(&mut self, bounds: Bounds) {
        self.world.clear();
        self.clock = SimClock::default();
        self.effects.clear();
        self.deferred.clear();
        self.victory = false;

        let mut ctx = spawn_ctx!(self);
        let player = world_setup::spawn_player(&mut self.world, &mut ctx, self.config.ship, &bounds);
        self.waves.start(&mut self.world, &mut ctx, &mut self.rng, &bounds);
        self.player = Some(player);
        self.effects.clear();
    }

    /// Advance the simulation by one tick.
    ///
    /// `delta_ms` is the driver time since the previous tick; it paces the
    /// real-time timers (repair, wave countdown, deferred effects).
    pub fn tick(&mut self, delta_ms: f64, intent: &PlayerIntent, bounds: Bounds) -> TickReport {
        self.clock.advance(delta_ms);
        let now_ms = self.clock.elapsed_ms;

        if self.victory {
            return TickReport {
                wave: self.wave_info(),
                victory: true,
                ..TickReport::default()
            };
        }

        self.run_deferred();

        // 1. Player
        if let Some(player) = self.player.filter(|&p| cleanup::is_active(&self.world, p)) {
            let mut ctx = spawn_ctx!(self);
            let result = systems::player::run(
                &mut self.world,
                &mut ctx,
                &mut self.deferred,
                player,
                intent,
                &bounds,
                now_ms,
            );
            if let Err(err) = result {
                tracing::warn!(%err, "player update failed, removing");
                self.remove_player();
            }
        }

        // 2. Waves
        let enemy_count = cleanup::count::<EnemyState>(&self.world);
        {
            let mut ctx = spawn_ctx!(self);
            self.waves
                .run(&mut self.world, &mut ctx, &mut self.rng, &bounds, enemy_count, now_ms);
        }

        let enemy_count = cleanup::count::<EnemyState>(&self.world);
        if self.waves.is_boss_defeated() && enemy_count == 0 {
            self.victory = true;
            tracing::debug!(tick = self.clock.tick, "victory");
            return TickReport {
                effects: std::mem::take(&mut self.effects),
                wave: self.wave_info(),
                victory: true,
                victory_bonus: self.config.stats.scoring.victory_bonus,
                ..TickReport::default()
            };
        }

        // 3. Projectiles
        systems::projectiles::run(
            &mut self.world,
            &bounds,
            self.config.stats.weapons.decoy_attract_radius,
            &mut self.despawn_buffer,
        );

        // 4. Enemies
        {
            let mut ctx = spawn_ctx!(self);
            systems::enemies::run(&mut self.world, &mut ctx, &mut self.rng, &bounds, &mut self.despawn_buffer);
        }

        // 5. Collisions
        let mut report = TickReport::default();
        if let Some(player) = self.player.filter(|&p| cleanup::is_active(&self.world, p)) {
            let mut ctx = spawn_ctx!(self);
            match systems::collision::run(&mut self.world, &mut ctx, player, now_ms) {
                Ok(collisions) => {
                    for kind in collisions.kills {
                        self.waves.record_kill(kind);
                    }
                    report.collision = collisions.outcome;
                }
                Err(err) => tracing::warn!(%err, "collision pass failed"),
            }
        }

        report.effects = std::mem::take(&mut self.effects);
        report.wave = self.wave_info();
        report
    }

    /// Apply deferred effects that have come due, dropping any whose owner
    /// or target is gone.
    fn run_deferred(&mut self) {
        for DeferredEntry { owner, action, .. } in self.deferred.take_due(self.clock.elapsed_ms) {
            if !cleanup::is_active(&self.world, owner) {
                tracing::debug!(?owner, ?action, "deferred effect dropped, owner inactive");
                continue;
            }
            match action {
                DeferredAction::OverheatRecovery => {
                    if let Ok(mut arms) = self.world.get::<&mut Armament>(owner) {
                        arms.overheated = false;
                        arms.ammo = arms.max_ammo;
                    }
                }
                DeferredAction::PairedBomb { target, angle } => {
                    if !cleanup::is_active(&self.world, target) {
                        tracing::debug!(?owner, ?target, "paired bomb dropped, target inactive");
                        continue;
                    }
                    let Some(center) = center_of(&self.world, owner) else {
                        continue;
                    };
                    let mut ctx = spawn_ctx!(self);
                    world_setup::spawn_projectile(
                        &mut self.world,
                        &mut ctx,
                        &Shot::homing_bomb(center, angle, target, false),
                    );
                }
            }
        }
    }

    /// Spawn one enemy of `kind` with its top-left corner at `(x, y)`.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, x: f64, y: f64) -> Entity {
        let mut ctx = spawn_ctx!(self);
        world_setup::spawn_enemy(&mut self.world, &mut ctx, &mut self.rng, kind, x, y)
    }

    /// Spawn an enemy by type name. Unknown names are rejected with a warning.
    pub fn spawn_enemy_named(&mut self, name: &str, x: f64, y: f64) -> Option<Entity> {
        let Some(kind) = EnemyKind::from_name(name) else {
            tracing::warn!(name, "unknown enemy type, nothing spawned");
            return None;
        };
        Some(self.spawn_enemy(kind, x, y))
    }

    /// Remove the player ship (death confirmed by the caller) and cancel
    /// everything it had scheduled.
    pub fn remove_player(&mut self) {
        if let Some(player) = self.player.take() {
            self.deferred.cancel_owner(player);
            let _ = self.world.despawn(player);
        }
    }

    pub fn wave_info(&self) -> WaveInfo {
        self.waves.info(&self.config.stats.waves)
    }

    pub fn player_view(&self) -> Option<PlayerView> {
        systems::snapshot::build_player_view(&self.world, self.player?)
    }

    pub fn is_boss_defeated(&self) -> bool {
        self.waves.is_boss_defeated()
    }

    pub fn is_campaign_complete(&self) -> bool {
        self.waves
            .is_campaign_complete(cleanup::count::<EnemyState>(&self.world))
    }

    /// Whole-world view in spawn order.
    pub fn snapshot(&self) -> CombatSnapshot {
        systems::snapshot::build_snapshot(&self.world, &self.clock, self.wave_info())
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn clock(&self) -> SimClock {
        self.clock
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Mutable world access for scenario setup in tests.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn a projectile directly (for tests).
    #[cfg(test)]
    pub fn spawn_shot(&mut self, shot: Shot) -> Entity {
        let mut ctx = spawn_ctx!(self);
        world_setup::spawn_projectile(&mut self.world, &mut ctx, &shot)
    }

    #[cfg(test)]
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }
}

fn center_of(world: &World, entity: Entity) -> Option<Position> {
    let mut query = world.query_one::<(&PlayerShip, &Position, &Hitbox)>(entity).ok()?;
    let (_, pos, hitbox) = query.get()?;
    Some(Rect::at(*pos, hitbox.width, hitbox.height).center())
}
