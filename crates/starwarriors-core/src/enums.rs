//! Enumerations shared across the simulation.

use serde::{Deserialize, Serialize};

/// Difficulty preset chosen at game start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    /// Shorter fire intervals and predictive aiming.
    Hard,
}

/// Rule overrides applied to the whole session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Normal,
    /// Player takes no damage and has unlimited ammo, secondaries and decoys.
    Cheat,
    /// Player shots one-hit kill; player has a larger health pool and no shields.
    Derek,
}

/// Player ship tier. Tiers differ only by stat table and secondary weapon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipClass {
    LightInterceptor,
    #[default]
    Interceptor,
    Bomber,
}

/// Enemy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Light,
    Interceptor,
    /// Drops homing bombs on an independent timer.
    Bomber,
    /// Multi-phase boss with twin guns and a fan attack.
    Boss,
}

impl EnemyKind {
    /// Parse a spawn-contract type name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::Light),
            "interceptor" => Some(Self::Interceptor),
            "bomber" => Some(Self::Bomber),
            "boss" => Some(Self::Boss),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Interceptor => "interceptor",
            Self::Bomber => "bomber",
            Self::Boss => "boss",
        }
    }
}

/// Projectile variant. Set at construction and matched structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Straight line, leaves at the screen edge.
    Bullet,
    /// Constant downward acceleration.
    GravityBomb,
    HomingRocket,
    HomingBomb,
    /// Ballistic motion that pulls enemy homing projectiles onto itself.
    Decoy,
}

impl ProjectileKind {
    pub fn is_homing(&self) -> bool {
        matches!(self, Self::HomingRocket | Self::HomingBomb)
    }
}

/// Boss attack phase, derived from its health fraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossPhase {
    #[default]
    Normal,
    Damaged,
    Desperate,
}

/// Secondary weapon carried by a ship tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryWeapon {
    /// One homing rocket at the closest enemy.
    HomingRocket,
    /// Homing bombs distributed over the nearest targets.
    HomingBomb,
}

/// How many targets a bomb salvo is spread across.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetingMode {
    /// Two bombs at the nearest enemy, the second delayed.
    #[default]
    Single,
    /// One bomb at each of the two nearest enemies.
    Split,
}

impl TargetingMode {
    /// Number of targets selected per salvo.
    pub fn target_count(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Split => 2,
        }
    }
}

/// Symbolic sound cue handed to the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoundCue {
    BlasterShot,
    Explosion,
    RocketLaunch,
}
