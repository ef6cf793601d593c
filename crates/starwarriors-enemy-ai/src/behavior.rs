//! Per-enemy movement, heading and dodge behavior.
//!
//! Pure functions over plain data. The simulation copies component state
//! in, calls these, and writes the results back.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use starwarriors_core::components::Patrol;
use starwarriors_core::config::{AiTuning, Span};
use starwarriors_core::types::{normalize_angle, sign, Bounds, Position, Velocity};

use crate::profiles::draw;

/// A player-owned projectile as seen by the dodge check.
#[derive(Debug, Clone, Copy)]
pub struct DodgeThreat {
    /// Top-left corner.
    pub position: Position,
    pub velocity: Velocity,
}

/// Descend to the patrol band, then strafe and reverse at the edges or
/// after the dwell limit. `speed` is the current per-tick speed.
pub fn advance_patrol(
    pos: &mut Position,
    patrol: &mut Patrol,
    speed: f64,
    width: f64,
    bounds: &Bounds,
    dwell_span: &Span,
    rng: &mut impl Rng,
) {
    if pos.y < patrol.target_y {
        pos.y += speed;
    } else {
        patrol.dwell += 1;
        if f64::from(patrol.dwell) > patrol.dwell_limit {
            patrol.direction = -patrol.direction;
            patrol.dwell = 0;
            patrol.dwell_limit = draw(rng, dwell_span);
        }
        pos.x += speed * patrol.direction * patrol.strafe_factor;
    }

    let max_x = (bounds.width - width).max(0.0);
    pos.x = pos.x.clamp(0.0, max_x);
    if pos.x <= 0.0 || pos.x >= max_x {
        patrol.direction = -patrol.direction;
    }
}

/// Turn `rotation` toward the bearing from `from` to `to` along the smaller
/// arc. The step is the heading error scaled by the smoothing factor and
/// capped at `max_rotation_step`. Result is wrapped into `[0, 2π)`.
pub fn turn_toward(rotation: f64, from: &Position, to: &Position, ai: &AiTuning) -> f64 {
    let target = from.bearing_to(to);
    let diff = normalize_angle(target - rotation);
    let step = (diff * ai.rotation_smoothing).clamp(-ai.max_rotation_step, ai.max_rotation_step);
    (rotation + step + TAU) % TAU
}

/// Horizontal displacement from dodging this tick.
///
/// Only enemies with `intelligence >= dodge_intelligence` dodge. Every
/// threat within `dodge_distance` (top-left to top-left) whose vertical
/// velocity points at the enemy contributes a strafe of `dodge_speed`
/// against the sign of its horizontal velocity.
pub fn dodge_shift(enemy: &Position, intelligence: f64, threats: &[DodgeThreat], ai: &AiTuning) -> f64 {
    if intelligence < ai.dodge_intelligence {
        return 0.0;
    }

    // Each strafe moves the enemy before the next threat is measured.
    let mut x = enemy.x;
    for threat in threats {
        let origin = DVec2::new(x, enemy.y);
        if threat.position.as_vec().distance(origin) >= ai.dodge_distance {
            continue;
        }
        let approaching = (threat.velocity.y > 0.0 && threat.position.y < enemy.y)
            || (threat.velocity.y < 0.0 && threat.position.y > enemy.y);
        if approaching {
            x -= sign(threat.velocity.x) * ai.dodge_speed;
        }
    }
    x - enemy.x
}
