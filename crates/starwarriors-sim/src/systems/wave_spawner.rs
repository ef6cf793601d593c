//! Wave scheduler: spawns each wave and advances once the enemy pool empties.
//!
//! Two states per wave: active (enemies alive) and waiting (pool emptied,
//! counting down the inter-wave delay). The wave index never runs past the
//! last wave; once the final wave clears, the campaign is flagged finished.

use hecs::World;
use rand::Rng;

use starwarriors_core::config::WaveDef;
use starwarriors_core::constants::{BOSS_SPAWN_Y, WAVE_SPAWN_MARGIN, WAVE_SPAWN_SPACING, WAVE_SPAWN_Y};
use starwarriors_core::enums::EnemyKind;
use starwarriors_core::state::WaveInfo;
use starwarriors_core::types::Bounds;

use crate::world_setup::{self, SpawnContext};

#[derive(Debug, Clone, Default)]
pub struct WaveScheduler {
    current: usize,
    complete: bool,
    delay: i32,
    countdown: u32,
    last_countdown_ms: f64,
    boss_spawned: bool,
    boss_killed: bool,
    boss_defeated: bool,
    finished: bool,
}

impl WaveScheduler {
    /// Reset to the first wave and spawn it.
    pub fn start(&mut self, world: &mut World, ctx: &mut SpawnContext<'_>, rng: &mut impl Rng, bounds: &Bounds) {
        *self = Self {
            countdown: ctx.config.timing.wave_countdown,
            ..Self::default()
        };
        self.spawn_wave(world, ctx, rng, bounds);
    }

    /// Advance the scheduler one tick. `enemy_count` is the live enemy pool
    /// size after the previous tick's sweep.
    pub fn run(
        &mut self,
        world: &mut World,
        ctx: &mut SpawnContext<'_>,
        rng: &mut impl Rng,
        bounds: &Bounds,
        enemy_count: usize,
        now_ms: f64,
    ) {
        let timing = ctx.config.timing;

        if enemy_count == 0 && !self.complete {
            self.complete = true;
            self.delay = timing.wave_delay_ticks;
            self.countdown = timing.wave_countdown;
            self.last_countdown_ms = now_ms;

            if self.boss_spawned && self.boss_killed && !self.boss_defeated {
                self.boss_defeated = true;
                tracing::debug!(wave = self.current + 1, "boss defeated");
            }
            tracing::debug!(wave = self.current + 1, "wave cleared");
        }

        if !self.complete || self.finished {
            return;
        }

        self.delay -= 1;
        if now_ms - self.last_countdown_ms >= timing.countdown_step_ms {
            self.countdown = self.countdown.saturating_sub(1);
            self.last_countdown_ms = now_ms;
        }

        if self.delay <= 0 {
            if self.current + 1 < ctx.config.waves.len() {
                self.current += 1;
                self.complete = false;
                tracing::debug!(wave = self.current + 1, "spawning wave");
                self.spawn_wave(world, ctx, rng, bounds);
            } else {
                self.finished = true;
                tracing::debug!("campaign finished");
            }
        }
    }

    fn spawn_wave(&mut self, world: &mut World, ctx: &mut SpawnContext<'_>, rng: &mut impl Rng, bounds: &Bounds) {
        let Some(wave) = ctx.config.waves.get(self.current) else {
            return;
        };
        let WaveDef { groups, is_boss } = wave.clone();

        self.boss_spawned = false;
        self.boss_killed = false;

        if is_boss {
            let boss_width = ctx.config.enemies.boss.width;
            world_setup::spawn_enemy(
                world,
                ctx,
                rng,
                EnemyKind::Boss,
                bounds.width / 2.0 - boss_width / 2.0,
                BOSS_SPAWN_Y,
            );
            self.boss_spawned = true;
        }

        for group in &groups {
            let Some(kind) = EnemyKind::from_name(&group.kind) else {
                tracing::warn!(kind = %group.kind, "unknown enemy type in wave, skipping group");
                continue;
            };
            for i in 0..group.count {
                let x = rng.gen::<f64>() * (bounds.width - WAVE_SPAWN_MARGIN);
                let y = WAVE_SPAWN_Y - f64::from(i) * WAVE_SPAWN_SPACING;
                world_setup::spawn_enemy(world, ctx, rng, kind, x, y);
            }
        }
    }

    /// Note an enemy destroyed by damage. Only boss kills matter here.
    pub fn record_kill(&mut self, kind: EnemyKind) {
        if kind == EnemyKind::Boss && self.boss_spawned {
            self.boss_killed = true;
        }
    }

    pub fn info(&self, waves: &[WaveDef]) -> WaveInfo {
        WaveInfo {
            wave_number: self.current + 1,
            total_waves: waves.len(),
            is_boss: waves.get(self.current).is_some_and(|w| w.is_boss),
            countdown: self.countdown,
            is_complete: self.complete,
        }
    }

    pub fn is_boss_defeated(&self) -> bool {
        self.boss_defeated
    }

    /// Past the final wave with nothing left alive.
    pub fn is_campaign_complete(&self, enemy_count: usize) -> bool {
        self.finished && enemy_count == 0
    }
}
