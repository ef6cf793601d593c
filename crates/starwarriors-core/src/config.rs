//! Load-once stat configuration.
//!
//! Ship tiers, enemy tiers, weapons, waves and timing are plain data loaded
//! from JSON (or taken from the built-in defaults) and never mutated by the
//! simulation. Sections missing from a document keep their defaults.

use std::f64::consts::PI;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{Difficulty, EnemyKind, SecondaryWeapon, ShipClass};

/// Errors raised while loading a configuration document.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// The document parsed but a value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// A value that differs between the two difficulty presets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerDifficulty<T> {
    pub easy: T,
    pub hard: T,
}

impl<T: Copy> PerDifficulty<T> {
    pub fn new(easy: T, hard: T) -> Self {
        Self { easy, hard }
    }

    pub fn get(&self, difficulty: Difficulty) -> T {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Half-open random range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// Stat table for one player ship tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub health: i32,
    pub shields: u32,
    pub ammo: u32,
    /// Ticks between primary shots.
    pub shoot_cooldown: i32,
    pub secondary: SecondaryWeapon,
    pub secondary_charges: u32,
    pub secondary_cooldown: i32,
    /// Ticks to regain one secondary charge.
    pub secondary_recharge: i32,
    pub decoys: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTable {
    pub light_interceptor: ShipStats,
    pub interceptor: ShipStats,
    pub bomber: ShipStats,
}

impl ShipTable {
    pub fn get(&self, class: ShipClass) -> &ShipStats {
        match class {
            ShipClass::LightInterceptor => &self.light_interceptor,
            ShipClass::Interceptor => &self.interceptor,
            ShipClass::Bomber => &self.bomber,
        }
    }
}

impl Default for ShipTable {
    fn default() -> Self {
        Self {
            light_interceptor: ShipStats {
                width: 15.0,
                height: 15.0,
                speed: 6.0,
                health: 1,
                shields: 0,
                ammo: 10,
                shoot_cooldown: 7,
                secondary: SecondaryWeapon::HomingRocket,
                secondary_charges: 1,
                secondary_cooldown: 0,
                secondary_recharge: 180,
                decoys: 3,
            },
            interceptor: ShipStats {
                width: 25.0,
                height: 25.0,
                speed: 4.0,
                health: 3,
                shields: 2,
                ammo: 7,
                shoot_cooldown: 12,
                secondary: SecondaryWeapon::HomingRocket,
                secondary_charges: 3,
                secondary_cooldown: 60,
                secondary_recharge: 180,
                decoys: 5,
            },
            bomber: ShipStats {
                width: 35.0,
                height: 35.0,
                speed: 2.0,
                health: 5,
                shields: 4,
                ammo: 7,
                shoot_cooldown: 15,
                secondary: SecondaryWeapon::HomingBomb,
                secondary_charges: 10,
                secondary_cooldown: 30,
                secondary_recharge: 360,
                decoys: 7,
            },
        }
    }
}

/// Stat table for one enemy tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub health: i32,
    pub shields: u32,
    pub damage: i32,
    pub shoot_interval: PerDifficulty<u32>,
    pub intelligence: Span,
    pub special_chance: PerDifficulty<f64>,
    /// Initial shoot timer is drawn from `[0, initial_shoot_delay)`.
    pub initial_shoot_delay: f64,
    /// Present only for tiers that drop homing bombs.
    #[serde(default)]
    pub bomb_cooldown: Option<PerDifficulty<Span>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub light: EnemyStats,
    pub interceptor: EnemyStats,
    pub bomber: EnemyStats,
    pub boss: EnemyStats,
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Light => &self.light,
            EnemyKind::Interceptor => &self.interceptor,
            EnemyKind::Bomber => &self.bomber,
            EnemyKind::Boss => &self.boss,
        }
    }
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            light: EnemyStats {
                width: 15.0,
                height: 15.0,
                speed: 3.0,
                health: 1,
                shields: 0,
                damage: 1,
                shoot_interval: PerDifficulty::new(80, 40),
                intelligence: Span::new(0.7, 1.0),
                special_chance: PerDifficulty::new(0.05, 0.2),
                initial_shoot_delay: 60.0,
                bomb_cooldown: None,
            },
            interceptor: EnemyStats {
                width: 25.0,
                height: 25.0,
                speed: 2.0,
                health: 2,
                shields: 1,
                damage: 1,
                shoot_interval: PerDifficulty::new(100, 60),
                intelligence: Span::new(0.5, 0.9),
                special_chance: PerDifficulty::new(0.03, 0.15),
                initial_shoot_delay: 120.0,
                bomb_cooldown: None,
            },
            bomber: EnemyStats {
                width: 35.0,
                height: 35.0,
                speed: 1.5,
                health: 4,
                shields: 0,
                damage: 2,
                shoot_interval: PerDifficulty::new(120, 70),
                intelligence: Span::new(0.4, 0.7),
                special_chance: PerDifficulty::new(0.08, 0.25),
                initial_shoot_delay: 180.0,
                bomb_cooldown: Some(PerDifficulty::new(
                    Span::new(360.0, 660.0),
                    Span::new(180.0, 300.0),
                )),
            },
            boss: EnemyStats {
                width: BOSS_SIZE,
                height: BOSS_SIZE,
                speed: BOSS_NORMAL_SPEED,
                health: BOSS_HEALTH,
                shields: 0,
                damage: 1,
                shoot_interval: PerDifficulty::new(BOSS_SHOOT_INTERVAL_EASY, BOSS_SHOOT_INTERVAL_HARD),
                intelligence: Span::new(0.0, 1.0),
                special_chance: PerDifficulty::new(0.0, 0.0),
                initial_shoot_delay: 0.0,
                bomb_cooldown: None,
            },
        }
    }
}

/// Speed and fan pattern for one boss phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTuning {
    pub speed: f64,
    pub fan_count: u32,
    pub fan_spread: f64,
}

/// Boss-only tuning layered over `EnemyTable::boss`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossStats {
    pub target_y: f64,
    pub special_interval: PerDifficulty<i32>,
    /// Hard-difficulty shoot interval while desperate.
    pub desperate_shoot_interval_hard: u32,
    pub gun_offsets: Vec<[f64; 2]>,
    pub gun_switch_ticks: u32,
    pub bullet_speed: f64,
    pub fan_speed: f64,
    pub dwell: Span,
    pub strafe_factor: f64,
    pub damaged_threshold: f64,
    pub desperate_threshold: f64,
    pub normal: PhaseTuning,
    pub damaged: PhaseTuning,
    pub desperate: PhaseTuning,
}

impl Default for BossStats {
    fn default() -> Self {
        Self {
            target_y: BOSS_TARGET_Y,
            special_interval: PerDifficulty::new(BOSS_SPECIAL_INTERVAL_EASY, BOSS_SPECIAL_INTERVAL_HARD),
            desperate_shoot_interval_hard: BOSS_DESPERATE_SHOOT_INTERVAL_HARD,
            gun_offsets: BOSS_GUN_OFFSETS.iter().map(|&(x, y)| [x, y]).collect(),
            gun_switch_ticks: BOSS_GUN_SWITCH_TICKS,
            bullet_speed: BOSS_BULLET_SPEED,
            fan_speed: BOSS_FAN_SPEED,
            dwell: Span::new(BOSS_DWELL_MIN, BOSS_DWELL_MIN + BOSS_DWELL_SPAN),
            strafe_factor: BOSS_STRAFE_FACTOR,
            damaged_threshold: BOSS_DAMAGED_THRESHOLD,
            desperate_threshold: BOSS_DESPERATE_THRESHOLD,
            normal: PhaseTuning {
                speed: BOSS_NORMAL_SPEED,
                fan_count: BOSS_FAN_NORMAL.0,
                fan_spread: BOSS_FAN_NORMAL.1,
            },
            damaged: PhaseTuning {
                speed: BOSS_DAMAGED_SPEED,
                fan_count: BOSS_FAN_DAMAGED.0,
                fan_spread: BOSS_FAN_DAMAGED.1,
            },
            desperate: PhaseTuning {
                speed: BOSS_DESPERATE_SPEED,
                fan_count: BOSS_FAN_DESPERATE.0,
                fan_spread: BOSS_FAN_DESPERATE.1,
            },
        }
    }
}

/// Stats for one projectile variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub damage: i32,
    #[serde(default)]
    pub turn_rate: Option<f64>,
    #[serde(default)]
    pub lifetime: Option<i32>,
    #[serde(default)]
    pub gravity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTable {
    pub bullet: WeaponStats,
    pub homing_rocket: WeaponStats,
    pub gravity_bomb: WeaponStats,
    pub homing_bomb: WeaponStats,
    pub decoy: WeaponStats,
    pub decoy_attract_radius: f64,
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            bullet: WeaponStats {
                width: BULLET_SIZE.0,
                height: BULLET_SIZE.1,
                speed: BULLET_SPEED,
                damage: 1,
                turn_rate: None,
                lifetime: None,
                gravity: 0.0,
            },
            homing_rocket: WeaponStats {
                width: HOMING_ROCKET_SIZE.0,
                height: HOMING_ROCKET_SIZE.1,
                speed: HOMING_ROCKET_SPEED,
                damage: HOMING_ROCKET_DAMAGE,
                turn_rate: Some(HOMING_ROCKET_TURN_RATE),
                lifetime: Some(HOMING_ROCKET_LIFETIME),
                gravity: 0.0,
            },
            gravity_bomb: WeaponStats {
                width: GRAVITY_BOMB_RADIUS * 2.0,
                height: GRAVITY_BOMB_RADIUS * 2.0,
                speed: GRAVITY_BOMB_SPEED,
                damage: GRAVITY_BOMB_DAMAGE,
                turn_rate: None,
                lifetime: None,
                gravity: GRAVITY_BOMB_GRAVITY,
            },
            homing_bomb: WeaponStats {
                width: HOMING_BOMB_RADIUS * 2.0,
                height: HOMING_BOMB_RADIUS * 2.0,
                speed: HOMING_BOMB_SPEED,
                damage: HOMING_BOMB_DAMAGE,
                turn_rate: Some(HOMING_BOMB_TURN_RATE),
                lifetime: Some(HOMING_BOMB_LIFETIME),
                gravity: 0.0,
            },
            decoy: WeaponStats {
                width: DECOY_SIZE.0,
                height: DECOY_SIZE.1,
                speed: DECOY_SPEED,
                damage: 1,
                turn_rate: None,
                lifetime: Some(DECOY_LIFETIME),
                gravity: 0.0,
            },
            decoy_attract_radius: DECOY_ATTRACT_RADIUS,
        }
    }
}

/// Shared enemy behavior tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub dodge_speed: f64,
    pub dodge_distance: f64,
    pub dodge_intelligence: f64,
    pub rotation_smoothing: f64,
    pub max_rotation_step: f64,
    pub patrol_target_y: Span,
    pub patrol_dwell: Span,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            dodge_speed: DODGE_SPEED,
            dodge_distance: DODGE_DISTANCE,
            dodge_intelligence: DODGE_INTELLIGENCE,
            rotation_smoothing: ROTATION_SMOOTHING,
            max_rotation_step: MAX_ROTATION_STEP,
            patrol_target_y: Span::new(
                PATROL_TARGET_Y_MIN,
                PATROL_TARGET_Y_MIN + PATROL_TARGET_Y_SPAN,
            ),
            patrol_dwell: Span::new(PATROL_DWELL_MIN, PATROL_DWELL_MIN + PATROL_DWELL_SPAN),
        }
    }
}

/// `count` enemies of one type. The type is kept as a name so unknown
/// entries are rejected at spawn time rather than at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
}

impl WaveGroup {
    pub fn new(kind: EnemyKind, count: u32) -> Self {
        Self {
            kind: kind.name().to_string(),
            count,
        }
    }
}

/// One wave of the campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDef {
    pub groups: Vec<WaveGroup>,
    #[serde(default)]
    pub is_boss: bool,
}

/// Tick and sim-clock timings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub wave_delay_ticks: i32,
    pub wave_countdown: u32,
    pub countdown_step_ms: f64,
    pub repair_interval_ms: f64,
    pub overheat_recovery_ms: f64,
    pub paired_bomb_delay_ms: f64,
    pub ammo_recharge_ticks: u32,
    pub shield_recharge_ticks: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            wave_delay_ticks: WAVE_DELAY_TICKS,
            wave_countdown: WAVE_COUNTDOWN,
            countdown_step_ms: WAVE_COUNTDOWN_STEP_MS,
            repair_interval_ms: PLAYER_REPAIR_INTERVAL_MS,
            overheat_recovery_ms: OVERHEAT_RECOVERY_MS,
            paired_bomb_delay_ms: PAIRED_BOMB_DELAY_MS,
            ammo_recharge_ticks: AMMO_RECHARGE_TICKS,
            shield_recharge_ticks: SHIELD_RECHARGE_TICKS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub enemy_kill: u32,
    pub victory_bonus: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            enemy_kill: SCORE_ENEMY_KILL,
            victory_bonus: SCORE_VICTORY_BONUS,
        }
    }
}

/// Complete stat configuration for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub ships: ShipTable,
    pub enemies: EnemyTable,
    pub boss: BossStats,
    pub weapons: WeaponTable,
    pub ai: AiTuning,
    pub waves: Vec<WaveDef>,
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            ships: ShipTable::default(),
            enemies: EnemyTable::default(),
            boss: BossStats::default(),
            weapons: WeaponTable::default(),
            ai: AiTuning::default(),
            waves: default_campaign(),
            timing: TimingConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

/// Three escalating waves followed by the boss wave.
pub fn default_campaign() -> Vec<WaveDef> {
    use EnemyKind::*;
    vec![
        WaveDef {
            groups: vec![WaveGroup::new(Light, 3), WaveGroup::new(Interceptor, 2)],
            is_boss: false,
        },
        WaveDef {
            groups: vec![
                WaveGroup::new(Light, 4),
                WaveGroup::new(Interceptor, 4),
                WaveGroup::new(Bomber, 2),
            ],
            is_boss: false,
        },
        WaveDef {
            groups: vec![
                WaveGroup::new(Light, 6),
                WaveGroup::new(Interceptor, 5),
                WaveGroup::new(Bomber, 4),
            ],
            is_boss: false,
        },
        WaveDef {
            groups: vec![WaveGroup::new(Light, 2), WaveGroup::new(Interceptor, 1)],
            is_boss: true,
        },
    ]
}

impl CombatConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CombatConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check value ranges. Called by the loaders; defaults always pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.waves.is_empty() {
            return Err(ConfigError::Invalid("campaign has no waves".into()));
        }

        for class in [ShipClass::LightInterceptor, ShipClass::Interceptor, ShipClass::Bomber] {
            let s = self.ships.get(class);
            check_size(&format!("ship {class:?}"), s.width, s.height)?;
            if s.speed <= 0.0 {
                return Err(ConfigError::Invalid(format!("ship {class:?} speed must be positive")));
            }
            if s.health <= 0 {
                return Err(ConfigError::Invalid(format!("ship {class:?} health must be positive")));
            }
        }

        for kind in [EnemyKind::Light, EnemyKind::Interceptor, EnemyKind::Bomber, EnemyKind::Boss] {
            let e = self.enemies.get(kind);
            let label = format!("enemy {}", kind.name());
            check_size(&label, e.width, e.height)?;
            if e.health <= 0 {
                return Err(ConfigError::Invalid(format!("{label} health must be positive")));
            }
            check_span(&label, "intelligence", &e.intelligence)?;
            if let Some(bombs) = &e.bomb_cooldown {
                check_span(&label, "bomb cooldown", &bombs.easy)?;
                check_span(&label, "bomb cooldown", &bombs.hard)?;
            }
        }

        let weapons = [
            ("bullet", &self.weapons.bullet),
            ("homing rocket", &self.weapons.homing_rocket),
            ("gravity bomb", &self.weapons.gravity_bomb),
            ("homing bomb", &self.weapons.homing_bomb),
            ("decoy", &self.weapons.decoy),
        ];
        for (label, w) in weapons {
            check_size(label, w.width, w.height)?;
            if w.speed <= 0.0 {
                return Err(ConfigError::Invalid(format!("{label} speed must be positive")));
            }
        }

        if self.boss.gun_offsets.is_empty() {
            return Err(ConfigError::Invalid("boss needs at least one gun mount".into()));
        }
        if self.boss.desperate_threshold > self.boss.damaged_threshold {
            return Err(ConfigError::Invalid(
                "boss desperate threshold must not exceed damaged threshold".into(),
            ));
        }
        if self.boss.fan_spread_max() > PI * 2.0 {
            return Err(ConfigError::Invalid("boss fan spread exceeds a full turn".into()));
        }
        check_span("ai", "patrol target y", &self.ai.patrol_target_y)?;
        check_span("ai", "patrol dwell", &self.ai.patrol_dwell)?;
        check_span("boss", "dwell", &self.boss.dwell)?;

        Ok(())
    }
}

impl BossStats {
    /// Widest fan across all phases.
    pub fn fan_spread_max(&self) -> f64 {
        self.normal
            .fan_spread
            .max(self.damaged.fan_spread)
            .max(self.desperate.fan_spread)
    }
}

fn check_size(label: &str, width: f64, height: f64) -> Result<(), ConfigError> {
    if width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{label} size must be positive")))
    }
}

fn check_span(label: &str, field: &str, span: &Span) -> Result<(), ConfigError> {
    if span.min.is_finite() && span.max.is_finite() && span.min <= span.max {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{label} {field} range is inverted")))
    }
}
