//! Game setup: who plays, for how long, on what ground.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use salvo_core::constants::{DEFAULT_STARTING_LIFE, MAX_LIFE, MAX_PLAYERS, MIN_PLAYERS};
use salvo_core::enums::{PlayerColor, PlayerKind, TerrainProfile};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    #[serde(default)]
    pub kind: PlayerKind,
    pub color: PlayerColor,
}

impl PlayerConfig {
    pub fn new(name: impl Into<String>, kind: PlayerKind, color: PlayerColor) -> Self {
        Self {
            name: name.into(),
            kind,
            color,
        }
    }
}

/// Configuration for starting a new game. Same config, same game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for determinism.
    pub seed: u64,
    pub players: Vec<PlayerConfig>,
    pub total_rounds: u32,
    pub starting_cash: i64,
    pub starting_life: u32,
    pub terrain_profile: TerrainProfile,
    /// Scatter tanks randomly instead of using evenly spaced slots.
    pub random_placement: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            players: vec![
                PlayerConfig::new("Player 1", PlayerKind::Human, PlayerColor::Red),
                PlayerConfig::new("Computer", PlayerKind::Computer, PlayerColor::Blue),
            ],
            total_rounds: 3,
            starting_cash: 0,
            starting_life: DEFAULT_STARTING_LIFE,
            terrain_profile: TerrainProfile::default(),
            random_placement: false,
        }
    }
}

impl GameConfig {
    /// `n` computer players with distinct colors, for headless runs.
    pub fn computers_only(n: usize, seed: u64) -> Self {
        let players = PlayerColor::ALL
            .iter()
            .cycle()
            .take(n)
            .enumerate()
            .map(|(i, &color)| PlayerConfig::new(format!("Bot {}", i + 1), PlayerKind::Computer, color))
            .collect();
        Self {
            seed,
            players,
            ..Self::default()
        }
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn has_humans(&self) -> bool {
        self.players.iter().any(|p| p.kind == PlayerKind::Human)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            return Err(ConfigError::PlayerCount {
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
                actual: n,
            });
        }
        let mut seen = HashSet::new();
        for (i, p) in self.players.iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(ConfigError::EmptyName(i));
            }
            if !seen.insert(p.color) {
                return Err(ConfigError::DuplicateColor(p.color));
            }
        }
        if self.total_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.starting_life == 0 || self.starting_life > MAX_LIFE {
            return Err(ConfigError::StartingLife {
                max: MAX_LIFE,
                actual: self.starting_life,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_player_count_bounds() {
        let mut cfg = GameConfig::default();
        cfg.players.truncate(1);
        assert!(matches!(cfg.validate(), Err(ConfigError::PlayerCount { actual: 1, .. })));
        assert!(GameConfig::computers_only(9, 1).validate().is_ok());
        assert!(GameConfig::computers_only(10, 1).validate().is_err());
    }

    #[test]
    fn test_duplicate_colors_rejected() {
        let mut cfg = GameConfig::default();
        cfg.players[1].color = cfg.players[0].color;
        assert_eq!(cfg.validate(), Err(ConfigError::DuplicateColor(PlayerColor::Red)));
    }

    #[test]
    fn test_rounds_and_life() {
        let mut cfg = GameConfig {
            total_rounds: 0,
            ..GameConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoRounds));
        cfg.total_rounds = 1;
        cfg.starting_life = MAX_LIFE + 1;
        assert!(matches!(cfg.validate(), Err(ConfigError::StartingLife { .. })));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: GameConfig = serde_json::from_str(r#"{"seed": 7, "total_rounds": 1}"#).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.total_rounds, 1);
        assert_eq!(cfg.players.len(), 2);
        assert_eq!(cfg.terrain_profile, TerrainProfile::Rolling);
    }
}
