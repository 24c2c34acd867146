//! Model: the per-round world of terrain, tanks, turn pointer, and wind.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use salvo_core::constants::{FIELD_WIDTH, MAX_WIND, SIDE_BUFFER};
use salvo_terrain::{generate, Terrain};

use crate::config::GameConfig;
use crate::error::{SaveError, StateError};
use crate::player::Player;
use crate::save::SaveMap;

/// Who moves after the current player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTurn {
    /// At least two players are alive; this one is up next.
    Next(usize),
    /// Exactly one player is left standing.
    Won(usize),
    /// Nobody survived.
    Draw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    terrain: Terrain,
    players: Vec<Player>,
    current_player: usize,
    wind: i32,
}

/// Evenly spaced starting columns for `n` tanks, wall buffer included.
pub fn starting_slots(n: usize) -> Vec<i32> {
    if n < 2 {
        return vec![FIELD_WIDTH / 2; n];
    }
    let span = FIELD_WIDTH - 2 * SIDE_BUFFER;
    (0..n)
        .map(|i| SIDE_BUFFER + i as i32 * (span / (n as i32 - 1)))
        .collect()
}

impl Model {
    pub fn new(terrain: Terrain, players: Vec<Player>, current_player: usize, wind: i32) -> Self {
        Self {
            terrain,
            players,
            current_player,
            wind,
        }
    }

    /// Build a fresh round: new ground, new wind, everyone at full life.
    ///
    /// The first mover rotates by round so no player always opens.
    pub fn for_round(config: &GameConfig, round: u32, rng: &mut impl Rng) -> Self {
        let wind = rng.gen_range(0..2 * MAX_WIND) - MAX_WIND;
        let terrain = generate(config.terrain_profile, rng);

        let n = config.players.len();
        let mut slots = starting_slots(n);
        if config.random_placement {
            slots.shuffle(rng);
        }
        let players = config
            .players
            .iter()
            .zip(slots)
            .enumerate()
            .map(|(id, (pc, x))| {
                let mut p = Player::new(id, pc.name.clone(), pc.kind, pc.color, config.starting_life);
                p.place(x, &terrain);
                p
            })
            .collect();

        let opener = (round.saturating_sub(1) as usize) % n.max(1);
        let current_player = (opener + n.max(1) - 1) % n.max(1);
        info!(round, wind, profile = ?config.terrain_profile, "new round");
        Self::new(terrain, players, current_player, wind)
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Terrain and players borrowed together, for effects that touch both.
    pub fn split_mut(&mut self) -> (&mut Terrain, &mut [Player]) {
        (&mut self.terrain, &mut self.players)
    }

    pub fn player(&self, id: usize) -> Result<&Player, StateError> {
        self.players.get(id).ok_or(StateError::NoSuchPlayer(id))
    }

    pub fn player_mut(&mut self, id: usize) -> Result<&mut Player, StateError> {
        self.players.get_mut(id).ok_or(StateError::NoSuchPlayer(id))
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub fn current_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player]
    }

    pub fn wind(&self) -> i32 {
        self.wind
    }

    pub fn set_current_player(&mut self, id: usize) -> Result<(), StateError> {
        let player = self.player(id)?;
        if !player.is_alive() {
            return Err(StateError::PlayerDead(id));
        }
        self.current_player = id;
        Ok(())
    }

    /// Scan forward from the current player, wrapping, for the next live
    /// players.
    pub fn next_turn_info(&self) -> NextTurn {
        let n = self.players.len();
        let mut next = None;
        for i in 1..=n {
            let idx = (self.current_player + i) % n;
            if !self.players[idx].is_alive() {
                continue;
            }
            match next {
                None => next = Some(idx),
                Some(first) => return NextTurn::Next(first),
            }
        }
        match next {
            Some(only) => NextTurn::Won(only),
            None => NextTurn::Draw,
        }
    }

    /// Drop every tank onto the ground. Returns `(player, distance)` for
    /// each one that fell.
    pub fn settle_players(&mut self) -> Vec<(usize, i32)> {
        let terrain = &self.terrain;
        self.players
            .iter_mut()
            .filter_map(|p| p.fall(terrain).map(|d| (p.id(), d)))
            .collect()
    }

    pub fn live_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    pub(crate) fn save(&self, map: &mut SaveMap) -> Result<(), SaveError> {
        map.put("num_players", self.players.len())?;
        map.put("wind", self.wind)?;
        map.put("current_player", self.current_player)?;
        map.put("terrain", self.terrain.heights())?;
        for p in &self.players {
            p.save(map)?;
        }
        Ok(())
    }

    /// Rebuild from a save map. Player identities come from `config`.
    pub(crate) fn restore(map: &SaveMap, config: &GameConfig) -> Result<Self, SaveError> {
        let saved: usize = map.get("num_players")?;
        if saved != config.players.len() {
            return Err(SaveError::PlayerCountMismatch {
                saved,
                configured: config.players.len(),
            });
        }
        let terrain = Terrain::from_heights(map.get("terrain")?)?;
        let wind: i32 = map.get("wind")?;
        let current_player: usize = map.get("current_player")?;
        if current_player >= saved {
            return Err(SaveError::BadValue {
                key: "current_player".into(),
                reason: format!("{current_player} is not below {saved}"),
            });
        }
        let mut players = Vec::with_capacity(saved);
        for (id, pc) in config.players.iter().enumerate() {
            let mut p = Player::new(id, pc.name.clone(), pc.kind, pc.color, config.starting_life);
            p.restore(map)?;
            players.push(p);
        }
        Ok(Self::new(terrain, players, current_player, wind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use salvo_core::enums::{PlayerColor, PlayerKind};

    fn model_with_lives(lives: &[u32]) -> Model {
        let terrain = Terrain::flat(200);
        let slots = starting_slots(lives.len());
        let players = lives
            .iter()
            .enumerate()
            .map(|(i, &life)| {
                let mut p = Player::new(i, format!("P{i}"), PlayerKind::Computer, PlayerColor::ALL[i], 100);
                p.place(slots[i], &terrain);
                p.take_damage(100 - life);
                p
            })
            .collect();
        Model::new(terrain, players, 0, 0)
    }

    #[test]
    fn test_starting_slots() {
        assert_eq!(starting_slots(2), vec![30, 450]);
        assert_eq!(starting_slots(3), vec![30, 240, 450]);
        assert_eq!(starting_slots(4), vec![30, 170, 310, 450]);
    }

    #[test]
    fn test_next_turn_skips_the_dead() {
        let m = model_with_lives(&[100, 0, 50]);
        assert_eq!(m.next_turn_info(), NextTurn::Next(2));
    }

    #[test]
    fn test_next_turn_wraps_to_current() {
        let m = model_with_lives(&[100, 0, 0, 80]);
        assert_eq!(m.next_turn_info(), NextTurn::Next(3));
        let mut m = model_with_lives(&[100, 0, 0, 80]);
        m.set_current_player(3).unwrap();
        assert_eq!(m.next_turn_info(), NextTurn::Next(0));
    }

    #[test]
    fn test_single_survivor_wins() {
        let m = model_with_lives(&[0, 0, 30]);
        assert_eq!(m.next_turn_info(), NextTurn::Won(2));
        let m = model_with_lives(&[70, 0, 0]);
        assert_eq!(m.next_turn_info(), NextTurn::Won(0), "the current player can win");
    }

    #[test]
    fn test_everyone_dead_is_a_draw() {
        let m = model_with_lives(&[0, 0]);
        assert_eq!(m.next_turn_info(), NextTurn::Draw);
    }

    #[test]
    fn test_cannot_select_dead_player() {
        let mut m = model_with_lives(&[100, 0]);
        assert_eq!(m.set_current_player(1), Err(StateError::PlayerDead(1)));
        assert_eq!(m.set_current_player(5), Err(StateError::NoSuchPlayer(5)));
    }

    #[test]
    fn test_round_opener_rotates() {
        let config = GameConfig::computers_only(3, 9);
        for (round, opener) in [(1, 0), (2, 1), (3, 2), (4, 0)] {
            let m = Model::for_round(&config, round, &mut ChaCha8Rng::seed_from_u64(1));
            assert_eq!(m.next_turn_info(), NextTurn::Next(opener), "round {round}");
        }
    }

    #[test]
    fn test_for_round_places_on_ground() {
        let config = GameConfig::computers_only(4, 3);
        let m = Model::for_round(&config, 1, &mut ChaCha8Rng::seed_from_u64(3));
        assert!((-MAX_WIND..MAX_WIND).contains(&m.wind()));
        for p in m.players() {
            assert_eq!(p.y(), m.terrain().safe_get(p.x()));
            assert_eq!(p.life(), config.starting_life);
        }
    }

    #[test]
    fn test_random_placement_uses_slots() {
        let config = GameConfig {
            random_placement: true,
            ..GameConfig::computers_only(5, 11)
        };
        let m = Model::for_round(&config, 1, &mut ChaCha8Rng::seed_from_u64(11));
        let mut xs: Vec<i32> = m.players().iter().map(Player::x).collect();
        xs.sort_unstable();
        assert_eq!(xs, starting_slots(5));
    }

    #[test]
    fn test_settle_reports_falls() {
        let mut m = model_with_lives(&[100, 100]);
        m.terrain.carve(30, 200, 20);
        let falls = m.settle_players();
        assert_eq!(falls, vec![(0, 20)]);
        assert_eq!(m.players()[0].life(), 92);
    }
}
