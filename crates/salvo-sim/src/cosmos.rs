//! Cosmos: everything that outlives a single round.

use tracing::info;

use salvo_core::enums::WeaponKind;
use salvo_core::state::LeaderboardEntry;
use salvo_core::types::RoundInfo;

use crate::error::{ArmoryError, SaveError, SimError, StateError};
use crate::player::{player_prefix, Player};
use crate::save::SaveMap;
use crate::weapons::{Armory, Stock, WeaponKindExt};

/// Cross-round bookkeeping for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub earnings: i64,
    pub armory: Armory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cosmos {
    round: u32,
    total_rounds: u32,
    players: Vec<PlayerInfo>,
}

impl Cosmos {
    /// A fresh game at round 1.
    pub fn new(num_players: usize, total_rounds: u32, starting_cash: i64) -> Self {
        let players = (0..num_players)
            .map(|_| PlayerInfo {
                earnings: starting_cash,
                armory: Armory::starting(),
            })
            .collect();
        Self {
            round: 1,
            total_rounds: total_rounds.max(1),
            players,
        }
    }

    pub fn round_info(&self) -> RoundInfo {
        RoundInfo {
            round: self.round,
            total_rounds: self.total_rounds,
        }
    }

    pub fn more_rounds_remaining(&self) -> bool {
        self.round_info().more_rounds_remaining()
    }

    pub fn next_round(&mut self) -> Result<u32, StateError> {
        if !self.more_rounds_remaining() {
            return Err(StateError::NoRoundsRemaining(self.round));
        }
        self.round += 1;
        Ok(self.round)
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn player_info(&self, player: usize) -> Option<&PlayerInfo> {
        self.players.get(player)
    }

    pub fn earnings(&self, player: usize) -> i64 {
        self.players.get(player).map_or(0, |info| info.earnings)
    }

    pub fn earn(&mut self, player: usize, amount: i64) {
        if let Some(info) = self.players.get_mut(player) {
            info.earnings += amount;
        }
    }

    pub fn armory(&self, player: usize) -> Result<&Armory, StateError> {
        self.players
            .get(player)
            .map(|info| &info.armory)
            .ok_or(StateError::NoSuchPlayer(player))
    }

    pub fn armory_mut(&mut self, player: usize) -> Result<&mut Armory, StateError> {
        self.players
            .get_mut(player)
            .map(|info| &mut info.armory)
            .ok_or(StateError::NoSuchPlayer(player))
    }

    /// Buy one unit of `kind` out of the player's earnings. Returns the
    /// earnings left.
    pub fn purchase(&mut self, player: usize, kind: WeaponKind) -> Result<i64, SimError> {
        let info = self
            .players
            .get_mut(player)
            .ok_or(StateError::NoSuchPlayer(player))?;
        let price = kind.spec().price;
        if info.earnings < price {
            return Err(ArmoryError::InsufficientFunds {
                kind,
                price,
                earnings: info.earnings,
            }
            .into());
        }
        info.armory.buy(kind)?;
        info.earnings -= price;
        info!(player, ?kind, price, earnings = info.earnings, "purchase");
        Ok(info.earnings)
    }

    /// Players ranked by earnings, richest first; ties broken by name.
    pub fn leaderboard(&self, players: &[Player]) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = players
            .iter()
            .map(|p| LeaderboardEntry {
                player: p.id(),
                name: p.name().to_string(),
                color: p.color(),
                earnings: self.earnings(p.id()),
            })
            .collect();
        entries.sort_by(|a, b| b.earnings.cmp(&a.earnings).then_with(|| a.name.cmp(&b.name)));
        entries
    }

    /// Overall winner: the top of the leaderboard.
    pub fn winner(&self, players: &[Player]) -> Option<usize> {
        self.leaderboard(players).first().map(|e| e.player)
    }

    pub(crate) fn save(&self, map: &mut SaveMap) -> Result<(), SaveError> {
        map.put("round", self.round)?;
        map.put("total_rounds", self.total_rounds)?;
        for (i, info) in self.players.iter().enumerate() {
            let p = player_prefix(i);
            map.put(format!("{p}earnings"), info.earnings)?;
            for (kind, stock) in info.armory.iter() {
                map.put(format!("{p}armory_{}", kind.key()), stock.to_raw())?;
            }
        }
        Ok(())
    }

    pub(crate) fn restore(map: &SaveMap, num_players: usize) -> Result<Self, SaveError> {
        let round: u32 = map.get("round")?;
        let total_rounds: u32 = map.get("total_rounds")?;
        if round == 0 || round > total_rounds {
            return Err(SaveError::BadValue {
                key: "round".into(),
                reason: format!("round {round} outside 1..={total_rounds}"),
            });
        }
        let mut players = Vec::with_capacity(num_players);
        for i in 0..num_players {
            let p = player_prefix(i);
            let earnings: i64 = map.get(&format!("{p}earnings"))?;
            let mut entries = Vec::new();
            for kind in WeaponKind::ALL.into_iter().filter(|k| k.spec().is_selectable()) {
                let key = format!("{p}armory_{}", kind.key());
                let Some(raw) = map.get_opt::<i64>(&key)? else {
                    continue;
                };
                let stock = Stock::from_raw(raw).ok_or_else(|| SaveError::BadValue {
                    key: key.clone(),
                    reason: format!("{raw} is not a stock amount"),
                })?;
                entries.push((kind, stock));
            }
            let armory = Armory::from_entries(entries).map_err(|e| SaveError::BadValue {
                key: format!("{p}armory"),
                reason: e.to_string(),
            })?;
            players.push(PlayerInfo { earnings, armory });
        }
        Ok(Self {
            round,
            total_rounds,
            players,
        })
    }
}
