//! Turn state machine.
//!
//! Exactly one `GameState` is active at a time. The engine calls `on_enter`
//! once, then `main` until it returns something other than `Stay`, then
//! `on_exit`. Input is routed to the active state between steps.

mod ballistics;
mod buy_weapons;
mod computer_move;
mod extra_armor;
mod human_move;
mod leaderboard;
pub mod moves;
mod teleport;
mod turn_start;

pub use ballistics::Ballistics;
pub use buy_weapons::BuyWeapons;
pub use computer_move::ComputerMove;
pub use extra_armor::ExtraArmor;
pub use human_move::HumanMove;
pub use leaderboard::{AnnounceWinner, Leaderboard};
pub use teleport::{plan_teleport, Teleport, TeleportPlan};
pub use turn_start::TurnStart;

use rand_chacha::ChaCha8Rng;

use salvo_core::commands::InputEvent;
use salvo_core::enums::StateId;
use salvo_core::events::GameEvent;

use crate::brain::Brain;
use crate::config::GameConfig;
use crate::cosmos::Cosmos;
use crate::error::{SaveError, SimError, StateError};
use crate::explosion::Explosion;
use crate::model::Model;
use crate::projectile::Projectile;
use crate::save::SaveMap;

/// Everything a state may read or mutate during one callback.
pub struct StateContext<'a> {
    pub model: &'a mut Model,
    pub cosmos: &'a mut Cosmos,
    pub config: &'a GameConfig,
    pub brain: &'a dyn Brain,
    pub rng: &'a mut ChaCha8Rng,
    pub events: &'a mut Vec<GameEvent>,
    pub now_ms: u64,
}

impl StateContext<'_> {
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Result of one `main` call.
#[derive(Debug)]
pub enum Transition {
    Stay,
    Next(GameState),
    /// The game is over; the controller should stop.
    GameOver,
}

/// How long the controller may sleep before calling `main` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingDelay {
    /// Sleep until input arrives.
    Indefinite,
    Millis(u64),
}

/// Per-state callbacks. Defaults do nothing.
pub trait TurnState {
    fn id(&self) -> StateId;

    fn on_enter(&mut self, _ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        Ok(())
    }

    fn main(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition, SimError>;

    fn on_exit(&mut self, _ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        Ok(())
    }

    /// Returns true if the controller should be woken up.
    fn on_input(
        &mut self,
        _ctx: &mut StateContext<'_>,
        _input: InputEvent,
    ) -> Result<bool, SimError> {
        Ok(false)
    }

    fn blocking_delay(&self) -> Result<BlockingDelay, StateError>;

    /// Charged power while fire is held.
    fn power_bar(&self, _now_ms: u64) -> Option<i32> {
        None
    }

    /// Minimal data needed to resume this state. The tag is written by the
    /// engine.
    fn save(&self, _map: &mut SaveMap) -> Result<(), SaveError> {
        Ok(())
    }
}

#[derive(Debug)]
pub enum GameState {
    Leaderboard(Leaderboard),
    AnnounceWinner(AnnounceWinner),
    BuyWeapons(BuyWeapons),
    TurnStart(TurnStart),
    HumanMove(HumanMove),
    ComputerMove(ComputerMove),
    Ballistics(Ballistics),
    Teleport(Teleport),
    ExtraArmor(ExtraArmor),
}

impl GameState {
    fn inner(&self) -> &dyn TurnState {
        match self {
            GameState::Leaderboard(s) => s,
            GameState::AnnounceWinner(s) => s,
            GameState::BuyWeapons(s) => s,
            GameState::TurnStart(s) => s,
            GameState::HumanMove(s) => s,
            GameState::ComputerMove(s) => s,
            GameState::Ballistics(s) => s,
            GameState::Teleport(s) => s,
            GameState::ExtraArmor(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn TurnState {
        match self {
            GameState::Leaderboard(s) => s,
            GameState::AnnounceWinner(s) => s,
            GameState::BuyWeapons(s) => s,
            GameState::TurnStart(s) => s,
            GameState::HumanMove(s) => s,
            GameState::ComputerMove(s) => s,
            GameState::Ballistics(s) => s,
            GameState::Teleport(s) => s,
            GameState::ExtraArmor(s) => s,
        }
    }

    pub fn id(&self) -> StateId {
        self.inner().id()
    }

    pub fn on_enter(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        self.inner_mut().on_enter(ctx)
    }

    pub fn main(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
        self.inner_mut().main(ctx)
    }

    pub fn on_exit(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        self.inner_mut().on_exit(ctx)
    }

    pub fn on_input(
        &mut self,
        ctx: &mut StateContext<'_>,
        input: InputEvent,
    ) -> Result<bool, SimError> {
        self.inner_mut().on_input(ctx, input)
    }

    pub fn blocking_delay(&self) -> Result<BlockingDelay, StateError> {
        self.inner().blocking_delay()
    }

    pub fn power_bar(&self, now_ms: u64) -> Option<i32> {
        self.inner().power_bar(now_ms)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        match self {
            GameState::Ballistics(s) => s.projectiles(),
            _ => &[],
        }
    }

    pub fn explosions(&self) -> &[Explosion] {
        match self {
            GameState::Ballistics(s) => s.explosions(),
            _ => &[],
        }
    }

    /// Whether the leaderboard belongs in the snapshot.
    pub fn shows_leaderboard(&self) -> bool {
        match self {
            GameState::Leaderboard(s) => s.is_displayed(),
            GameState::AnnounceWinner(_) | GameState::BuyWeapons(_) => true,
            _ => false,
        }
    }

    pub fn save(&self, map: &mut SaveMap) -> Result<(), SaveError> {
        map.put("state", self.id().tag())?;
        self.inner().save(map)
    }

    /// Rebuild the state recorded in `map`.
    pub fn restore(map: &SaveMap) -> Result<Self, SaveError> {
        let tag: u8 = map.get("state")?;
        let id = StateId::from_tag(tag).ok_or(SaveError::UnknownState(tag))?;
        Ok(match id {
            StateId::Leaderboard => GameState::Leaderboard(Leaderboard::restore(map)?),
            StateId::AnnounceWinner => GameState::AnnounceWinner(AnnounceWinner::new()),
            StateId::BuyWeapons => GameState::BuyWeapons(BuyWeapons::new()),
            StateId::TurnStart => GameState::TurnStart(TurnStart::new()),
            StateId::HumanMove => GameState::HumanMove(HumanMove::new()),
            StateId::ComputerMove => GameState::ComputerMove(ComputerMove::restore(map)?),
            StateId::Ballistics => GameState::Ballistics(Ballistics::restore(map)?),
            StateId::Teleport => GameState::Teleport(Teleport::restore(map)?),
            StateId::ExtraArmor => GameState::ExtraArmor(ExtraArmor::new()),
        })
    }
}
