//! Game snapshot: the read-only view handed to the rendering collaborator.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Argb, RoundInfo};

/// Complete visible state after one controller step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub state: StateId,
    pub round: RoundInfo,
    pub wind: i32,
    pub current_player: usize,
    /// Ground height per column.
    pub terrain: Vec<i16>,
    pub players: Vec<PlayerView>,
    pub projectiles: Vec<ProjectileView>,
    pub explosions: Vec<ExplosionView>,
    /// Power charged so far while fire is held.
    pub power_bar: Option<i32>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub events: Vec<GameEvent>,
    pub game_over: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: usize,
    pub name: String,
    pub kind: PlayerKind,
    pub x: i32,
    pub y: i32,
    pub life: u32,
    pub alive: bool,
    pub turret_angle_deg: i32,
    pub weapon: WeaponKind,
    pub body_color: Argb,
    pub outline_color: Argb,
    pub aura_color: Argb,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Vec2,
    pub weapon: WeaponKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplosionView {
    pub x: i32,
    pub y: i32,
    /// Radius at the time the snapshot was taken.
    pub radius: i32,
    pub color: Argb,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: usize,
    pub name: String,
    pub color: PlayerColor,
    pub earnings: i64,
}
