//! Events emitted by the simulation for sound and UI feedback.
//!
//! Events accumulate inside the engine and are drained into each snapshot.

use serde::{Deserialize, Serialize};

use crate::enums::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    RoundStarted { round: u32, total_rounds: u32 },
    /// "<name>'s turn" toast.
    TurnStarted { player: usize, name: String },
    WeaponSelected { player: usize, weapon: WeaponKind },
    Fired { player: usize, weapon: WeaponKind, power: i32 },
    Detonated { weapon: WeaponKind, x: i32, y: i32 },
    PlayerDamaged { player: usize, amount: u32, life: u32 },
    PlayerFell { player: usize, distance: i32 },
    PlayerKilled { player: usize, perpetrator: usize },
    Teleported { player: usize, from_x: i32, to_x: i32 },
    ArmorApplied { player: usize, life: u32 },
    WeaponPurchased { player: usize, weapon: WeaponKind, earnings: i64 },
    /// `winner` is `None` for a draw.
    RoundOver { winner: Option<usize> },
    LeaderboardShown,
    GameOver { winner: Option<usize> },
}
