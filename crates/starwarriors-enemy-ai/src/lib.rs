//! Enemy AI for STAR WARRIORS.
//!
//! Implements per-tier enemy profiles, patrol and heading behavior,
//! projectile dodging and the boss attack-phase state machine.

pub mod behavior;
pub mod fsm;
pub mod profiles;

pub use starwarriors_core as core;
