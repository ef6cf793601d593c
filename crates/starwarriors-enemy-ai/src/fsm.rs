//! Boss attack-phase finite state machine.
//!
//! The phase is a pure function of the health fraction, re-evaluated every
//! tick and on every damage application. Moving back into a healthier band
//! restores that band's tuning. No ECS dependency; operates on plain data.

use starwarriors_core::components::BossState;
use starwarriors_core::config::{BossStats, PhaseTuning};
use starwarriors_core::enums::{BossPhase, Difficulty};
use starwarriors_core::types::Position;

/// Input to the boss FSM.
pub struct BossContext {
    pub phase: BossPhase,
    pub health: i32,
    pub max_health: i32,
    pub difficulty: Difficulty,
    /// Regular shoot interval for this difficulty outside the desperate phase.
    pub base_shoot_interval: u32,
}

/// Output from the boss FSM.
pub struct BossUpdate {
    pub new_phase: BossPhase,
    pub speed: f64,
    pub shoot_interval: u32,
    pub phase_changed: bool,
}

/// Phase for a health fraction. Desperate is strictly below
/// `desperate_threshold`; damaged runs up to and including `damaged_threshold`.
pub fn phase_for(health: i32, max_health: i32, stats: &BossStats) -> BossPhase {
    let fraction = if max_health > 0 {
        f64::from(health) / f64::from(max_health)
    } else {
        0.0
    };

    if fraction < stats.desperate_threshold {
        BossPhase::Desperate
    } else if fraction <= stats.damaged_threshold {
        BossPhase::Damaged
    } else {
        BossPhase::Normal
    }
}

/// Tuning row for a phase.
pub fn tuning(phase: BossPhase, stats: &BossStats) -> &PhaseTuning {
    match phase {
        BossPhase::Normal => &stats.normal,
        BossPhase::Damaged => &stats.damaged,
        BossPhase::Desperate => &stats.desperate,
    }
}

/// Evaluate the FSM. Returns the phase plus the speed and shoot interval it implies.
pub fn evaluate(ctx: &BossContext, stats: &BossStats) -> BossUpdate {
    let new_phase = phase_for(ctx.health, ctx.max_health, stats);

    let shoot_interval = match (new_phase, ctx.difficulty) {
        (BossPhase::Desperate, Difficulty::Hard) => stats.desperate_shoot_interval_hard,
        _ => ctx.base_shoot_interval,
    };

    BossUpdate {
        new_phase,
        speed: tuning(new_phase, stats).speed,
        shoot_interval,
        phase_changed: new_phase != ctx.phase,
    }
}

/// Headings for a fan attack, evenly spread with the middle of the spread
/// on `center_angle`.
pub fn fan_angles(phase: BossPhase, center_angle: f64, stats: &BossStats) -> Vec<f64> {
    let PhaseTuning {
        fan_count,
        fan_spread,
        ..
    } = *tuning(phase, stats);

    if fan_count == 0 {
        return Vec::new();
    }
    if fan_count == 1 {
        return vec![center_angle];
    }
    let step = fan_spread / f64::from(fan_count - 1);
    let start = center_angle - fan_spread / 2.0;

    (0..fan_count).map(|i| start + f64::from(i) * step).collect()
}

/// Muzzle point of the active gun: the mount offset rotated by the boss
/// heading, relative to the boss center.
pub fn gun_muzzle(boss: &BossState, stats: &BossStats, center: &Position, rotation: f64) -> Position {
    let [ox, oy] = stats
        .gun_offsets
        .get(boss.gun_index)
        .copied()
        .unwrap_or([0.0, 0.0]);
    let (sin, cos) = rotation.sin_cos();
    Position::new(
        center.x + ox * cos - oy * sin,
        center.y + ox * sin + oy * cos,
    )
}

/// Count one tick on the gun counter and switch mounts when it fills.
pub fn advance_gun(boss: &mut BossState, stats: &BossStats) {
    boss.gun_counter += 1;
    if boss.gun_counter >= stats.gun_switch_ticks {
        let mounts = stats.gun_offsets.len().max(1);
        boss.gun_index = (boss.gun_index + 1) % mounts;
        boss.gun_counter = 0;
    }
}
