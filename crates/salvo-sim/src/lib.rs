//! Simulation engine for SALVO.
//!
//! Owns the turn state machine, the per-round model and the cross-round
//! cosmos, and produces `GameSnapshot`s for the frontend. Completely headless
//! and deterministic under a seed.

pub mod brain;
pub mod config;
pub mod cosmos;
pub mod engine;
pub mod error;
pub mod explosion;
pub mod model;
pub mod player;
pub mod projectile;
pub mod save;
pub mod states;
pub mod weapons;

pub use salvo_core as core;
pub use config::{GameConfig, PlayerConfig};
pub use engine::{GameEngine, StepOutcome};
pub use error::SimError;
pub use save::SaveMap;
pub use states::BlockingDelay;

#[cfg(test)]
mod tests;
