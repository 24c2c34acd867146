//! End-of-round leaderboard and the final winner announcement.

use tracing::info;

use salvo_core::commands::InputEvent;
use salvo_core::constants::{AFTER_ROUND_PAUSE_MS, LEADERBOARD_POLL_MS};
use salvo_core::enums::{GameButton, StateId};
use salvo_core::events::GameEvent;

use crate::error::{SaveError, SimError, StateError};
use crate::save::SaveMap;

use super::{BlockingDelay, BuyWeapons, GameState, StateContext, Transition, TurnState};

/// Shows standings after a pause. OK moves on.
#[derive(Debug)]
pub struct Leaderboard {
    delay_ms: u64,
    entered_at: u64,
    displayed: bool,
    acknowledged: bool,
}

impl Leaderboard {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            entered_at: 0,
            displayed: false,
            acknowledged: false,
        }
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    pub(super) fn restore(map: &SaveMap) -> Result<Self, SaveError> {
        let displayed: bool = map.get("leaderboard_displayed")?;
        Ok(Self::new(if displayed { 0 } else { AFTER_ROUND_PAUSE_MS }))
    }
}

impl TurnState for Leaderboard {
    fn id(&self) -> StateId {
        StateId::Leaderboard
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        self.entered_at = ctx.now_ms;
        Ok(())
    }

    fn main(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
        if !self.displayed {
            if ctx.now_ms.saturating_sub(self.entered_at) >= self.delay_ms {
                self.displayed = true;
                ctx.emit(GameEvent::LeaderboardShown);
            }
            return Ok(Transition::Stay);
        }
        if !self.acknowledged {
            return Ok(Transition::Stay);
        }
        if ctx.cosmos.more_rounds_remaining() {
            Ok(Transition::Next(GameState::BuyWeapons(BuyWeapons::new())))
        } else {
            Ok(Transition::Next(GameState::AnnounceWinner(AnnounceWinner::new())))
        }
    }

    fn on_input(&mut self, _ctx: &mut StateContext<'_>, input: InputEvent) -> Result<bool, SimError> {
        match input {
            InputEvent::Button {
                button: GameButton::Ok,
            } if self.displayed => {
                self.acknowledged = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn blocking_delay(&self) -> Result<BlockingDelay, StateError> {
        Ok(if self.displayed {
            BlockingDelay::Indefinite
        } else {
            BlockingDelay::Millis(LEADERBOARD_POLL_MS)
        })
    }

    fn save(&self, map: &mut SaveMap) -> Result<(), SaveError> {
        map.put("leaderboard_displayed", self.displayed)
    }
}

/// Final standings. OK ends the game.
#[derive(Debug, Default)]
pub struct AnnounceWinner {
    acknowledged: bool,
}

impl AnnounceWinner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TurnState for AnnounceWinner {
    fn id(&self) -> StateId {
        StateId::AnnounceWinner
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        let winner = ctx.cosmos.winner(ctx.model.players());
        info!(?winner, "game over");
        ctx.emit(GameEvent::GameOver { winner });
        Ok(())
    }

    fn main(&mut self, _ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
        Ok(if self.acknowledged {
            Transition::GameOver
        } else {
            Transition::Stay
        })
    }

    fn on_input(&mut self, _ctx: &mut StateContext<'_>, input: InputEvent) -> Result<bool, SimError> {
        if input == InputEvent::button(GameButton::Ok) {
            self.acknowledged = true;
            return Ok(true);
        }
        Ok(false)
    }

    fn blocking_delay(&self) -> Result<BlockingDelay, StateError> {
        Ok(BlockingDelay::Indefinite)
    }
}
