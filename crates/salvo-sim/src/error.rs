//! Error types for the simulation.
//!
//! Every variant here is a broken contract: a caller asked for something the
//! current state can never provide. Nothing in the core retries on these.

use thiserror::Error;

use salvo_core::enums::{PlayerColor, StateId, WeaponKind};
use salvo_terrain::TerrainError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArmoryError {
    #[error("armory has no selectable weapons")]
    Empty,
    #[error("{0:?} cannot be selected or used")]
    NotSelectable(WeaponKind),
    #[error("no {0:?} left to use")]
    Exhausted(WeaponKind),
    #[error("{0:?} is not for sale")]
    NotPurchasable(WeaponKind),
    #[error("{kind:?} costs {price}, only {earnings} available")]
    InsufficientFunds {
        kind: WeaponKind,
        price: i64,
        earnings: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("{0:?} never blocks; its delay must not be requested")]
    NeverBlocks(StateId),
    #[error("no player with index {0}")]
    NoSuchPlayer(usize),
    #[error("player {0} is dead and cannot take a turn")]
    PlayerDead(usize),
    #[error("{0:?} has no detonation behavior")]
    NotDetonatable(WeaponKind),
    #[error("{0:?} cannot be fired or used from a move state")]
    NotUsable(WeaponKind),
    #[error("player {0} already has full life")]
    ArmorNotNeeded(usize),
    #[error("more than {0} projectiles in flight")]
    ProjectileLimit(usize),
    #[error("no rounds remain after round {0}")]
    NoRoundsRemaining(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("need between {min} and {max} players, got {actual}")]
    PlayerCount {
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("color {0:?} is used by more than one player")]
    DuplicateColor(PlayerColor),
    #[error("player {0} has an empty name")]
    EmptyName(usize),
    #[error("game must have at least one round")]
    NoRounds,
    #[error("starting life must be between 1 and {max}, got {actual}")]
    StartingLife { max: u32, actual: u32 },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save map is missing key {0:?}")]
    MissingKey(String),
    #[error("save map key {key:?} holds an invalid value: {reason}")]
    BadValue { key: String, reason: String },
    #[error("unknown state tag {0}")]
    UnknownState(u8),
    #[error("saved game has {saved} players but the config lists {configured}")]
    PlayerCountMismatch { saved: usize, configured: usize },
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Umbrella error returned by engine operations.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Armory(#[from] ArmoryError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}
