//! Player intent sampled by the input collaborator once per tick.

use serde::{Deserialize, Serialize};

use crate::enums::TargetingMode;

/// Snapshot of what the player wants this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub fire_primary: bool,
    pub fire_secondary: bool,
    pub deploy_decoy: bool,
    /// Switch bomb targeting; ignored by ships without bombs.
    pub targeting: Option<TargetingMode>,
}
