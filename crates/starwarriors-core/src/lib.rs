//! Core types and definitions for the STAR WARRIORS combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, player intent, effect events, HUD views,
//! constants and the load-once stat configuration.
//! It has no dependency on rendering, audio or input capture.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
