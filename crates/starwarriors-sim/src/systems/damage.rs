//! Damage application shared by the collision resolver and tests.
//!
//! Shields always absorb a whole hit: one shield point is spent and health is
//! untouched regardless of the incoming damage value.

use starwarriors_core::components::{EnemyState, Hull};
use starwarriors_core::enums::GameMode;

/// Apply a hit to an enemy. Returns true when the enemy is destroyed.
pub fn damage_enemy(enemy: &mut EnemyState, amount: i32) -> bool {
    if enemy.shields > 0 {
        enemy.shields -= 1;
        return false;
    }
    enemy.health -= amount;
    enemy.health <= 0
}

/// Derek-mode hit: strip shields and health unconditionally.
pub fn obliterate_enemy(enemy: &mut EnemyState) {
    enemy.shields = 0;
    enemy.health = 0;
}

/// Apply a hit to the player. Returns true when health was reduced.
///
/// Cheat mode ignores all damage. Health never drops below zero, and a
/// health hit restarts the repair interval.
pub fn damage_player(hull: &mut Hull, game_mode: GameMode, amount: i32, now_ms: f64) -> bool {
    if game_mode == GameMode::Cheat {
        return false;
    }
    if hull.shields > 0 {
        hull.shields -= 1;
        return false;
    }
    hull.health = (hull.health - amount).max(0);
    hull.last_repair_ms = now_ms;
    true
}
