//! Outbound effect requests for the audio and particle collaborators.

use serde::{Deserialize, Serialize};

use crate::enums::SoundCue;
use crate::types::Position;

/// Fire-and-forget effect emitted during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffectEvent {
    Sound {
        cue: SoundCue,
    },
    Explosion {
        /// Center of the destroyed body.
        center: Position,
        /// Player-scale explosion.
        large: bool,
    },
}
