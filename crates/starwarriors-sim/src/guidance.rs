//! Aiming and homing algorithms.
//!
//! Provides the quadratic intercept solver used for predictive aiming, the
//! direct-bearing fallback, and the bounded-turn homing step.

use glam::DVec2;

use starwarriors_core::types::{normalize_angle, sign, Position, Rect, Velocity};

/// Roots at or below this are treated as "already passed".
const MIN_INTERCEPT_TIME: f64 = 0.01;

/// Solve for the time at which a projectile fired from `shooter` at `speed`
/// meets a target moving linearly from `target` with `target_vel`.
///
/// Solves `a·t² + b·t + c = 0` with `a = |v|² − s²`, `b = 2(Δ·v)`,
/// `c = |Δ|²`, `Δ = target − shooter`. Returns `None` when the discriminant
/// is negative or `a == 0`. Otherwise returns the smaller root if both exceed
/// the epsilon, else whichever one does.
pub fn intercept_time(shooter: DVec2, target: DVec2, target_vel: DVec2, speed: f64) -> Option<f64> {
    let delta = target - shooter;
    let a = target_vel.length_squared() - speed * speed;
    let b = 2.0 * delta.dot(target_vel);
    let c = delta.length_squared();

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let t1 = (-b + root) / (2.0 * a);
    let t2 = (-b - root) / (2.0 * a);

    match (t1 > MIN_INTERCEPT_TIME, t2 > MIN_INTERCEPT_TIME) {
        (true, true) => Some(t1.min(t2)),
        (true, false) => Some(t1),
        (false, true) => Some(t2),
        (false, false) => None,
    }
}

/// Bearing from `shooter` to where the target's center will be when a
/// projectile at `speed` can reach it. `None` when no intercept exists.
pub fn predictive_angle(shooter: &Position, target: &Rect, target_vel: &Velocity, speed: f64) -> Option<f64> {
    let center = target.center().as_vec();
    let t = intercept_time(shooter.as_vec(), center, target_vel.as_vec(), speed)?;
    let predicted = center + target_vel.as_vec() * t;
    let angle = (predicted.y - shooter.y).atan2(predicted.x - shooter.x);
    angle.is_finite().then_some(angle)
}

/// Bearing from `shooter` to the target's current center.
pub fn direct_angle(shooter: &Position, target: &Rect) -> f64 {
    shooter.bearing_to(&target.center())
}

/// Firing solution used by enemy guns.
///
/// Predictive aiming applies only when `predictive` is set (hard difficulty)
/// and the target is moving; a missing intercept falls back to direct bearing.
pub fn aim_angle(shooter: &Position, target: &Rect, target_vel: &Velocity, speed: f64, predictive: bool) -> f64 {
    if predictive && !target_vel.is_zero() {
        if let Some(angle) = predictive_angle(shooter, target, target_vel, speed) {
            return angle;
        }
    }
    direct_angle(shooter, target)
}

/// One homing step: turn `heading` toward the bearing from `from` to
/// `target_center` by at most `turn_rate` radians along the smaller arc.
pub fn homing_heading(heading: f64, from: &Position, target_center: &Position, turn_rate: f64) -> f64 {
    let desired = from.bearing_to(target_center);
    let diff = normalize_angle(desired - heading);
    heading + sign(diff) * diff.abs().min(turn_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_intercept_stationary_target() {
        // Stationary target 100 away at speed 20: t = 5
        let t = intercept_time(DVec2::ZERO, DVec2::new(100.0, 0.0), DVec2::ZERO, 20.0).unwrap();
        assert!((t - 5.0).abs() < 1e-9, "t = {t}");
    }

    #[test]
    fn test_intercept_zero_leading_coefficient() {
        // Target as fast as the projectile: a == 0
        let r = intercept_time(DVec2::ZERO, DVec2::new(100.0, 0.0), DVec2::new(0.0, 20.0), 20.0);
        assert!(r.is_none(), "a == 0 must yield no solution");
    }

    #[test]
    fn test_intercept_negative_discriminant() {
        // Faster target running directly away
        let r = intercept_time(DVec2::ZERO, DVec2::new(100.0, 0.0), DVec2::new(30.0, 0.0), 20.0);
        // a = 900 - 400 = 500, b = 6000, c = 10000, disc = 36e6 - 20e6 > 0 but both roots negative
        assert!(r.is_none());

        let r = intercept_time(DVec2::ZERO, DVec2::new(100.0, 0.0), DVec2::new(0.0, 30.0), 20.0);
        // a = 500, b = 0, c = 10000: disc = -2e7
        assert!(r.is_none(), "negative discriminant must yield no solution");
    }

    #[test]
    fn test_intercept_faster_target_closing() {
        // Faster target heading toward the shooter: both roots positive, pick smaller
        let t = intercept_time(DVec2::ZERO, DVec2::new(100.0, 0.0), DVec2::new(-30.0, 0.0), 20.0).unwrap();
        // a = 500, b = -6000, c = 10000 -> roots 2 and 10
        assert!((t - 2.0).abs() < 1e-9, "t = {t}");
    }

    #[test]
    fn test_predictive_angle_leads_moving_target() {
        let shooter = Position::new(0.0, 0.0);
        // Target center at (100, 0) moving down the screen
        let target = Rect::new(95.0, -5.0, 10.0, 10.0);
        let vel = Velocity::new(0.0, 5.0);
        let angle = predictive_angle(&shooter, &target, &vel, 20.0).unwrap();
        assert!(angle > 0.0, "Should lead below current bearing, got {angle}");
        assert!(angle < FRAC_PI_2);
        assert!(angle.is_finite());
    }

    #[test]
    fn test_aim_angle_falls_back_to_direct() {
        let shooter = Position::new(0.0, 0.0);
        let target = Rect::new(95.0, -5.0, 10.0, 10.0);
        // Stationary: direct
        let a = aim_angle(&shooter, &target, &Velocity::default(), 20.0, true);
        assert!(a.abs() < 1e-9);
        // Unsolvable: direct
        let a = aim_angle(&shooter, &target, &Velocity::new(0.0, 20.0), 20.0, true);
        assert!(a.abs() < 1e-9);
        // Easy difficulty ignores velocity
        let a = aim_angle(&shooter, &target, &Velocity::new(0.0, 5.0), 20.0, false);
        assert!(a.abs() < 1e-9);
    }

    #[test]
    fn test_homing_turn_clamped() {
        let from = Position::new(0.0, 0.0);
        let target = Position::new(0.0, 100.0);
        // Heading 0, target at π/2: turn limited to 0.1
        let h = homing_heading(0.0, &from, &target, 0.1);
        assert!((h - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_homing_turn_exact_when_small() {
        let from = Position::new(0.0, 0.0);
        let target = Position::new(100.0, 5.0);
        let desired = 5.0_f64.atan2(100.0);
        let h = homing_heading(0.0, &from, &target, 0.1);
        assert!((h - desired).abs() < 1e-12);
    }

    #[test]
    fn test_homing_antipode_turns_positive() {
        // Target dead astern: the error is exactly -π, which wraps to +π
        let from = Position::new(0.0, 0.0);
        let target = Position::new(100.0, 0.0);
        let h = homing_heading(PI, &from, &target, 0.1);
        assert!((h - (PI + 0.1)).abs() < 1e-12, "h = {h}");
    }

    #[test]
    fn test_homing_takes_short_way_round() {
        let from = Position::new(0.0, 0.0);
        // Heading just below +π, target just above -π: shortest turn crosses π
        let target = Position::new(-100.0, -1.0);
        let h = homing_heading(PI - 0.01, &from, &target, 0.1);
        assert!(h > PI - 0.01, "Should turn through π, got {h}");
    }
}
