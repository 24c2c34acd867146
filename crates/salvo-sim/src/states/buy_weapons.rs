//! Shopping between rounds. Leaving this state starts the next round.

use tracing::{info, warn};

use salvo_core::commands::InputEvent;
use salvo_core::enums::{GameButton, PlayerKind, StateId};
use salvo_core::events::GameEvent;

use crate::error::{SimError, StateError};
use crate::model::Model;

use super::{BlockingDelay, GameState, StateContext, Transition, TurnStart, TurnState};

#[derive(Debug, Default)]
pub struct BuyWeapons {
    done: bool,
}

impl BuyWeapons {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TurnState for BuyWeapons {
    fn id(&self) -> StateId {
        StateId::BuyWeapons
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        // Nobody to wait for.
        if !ctx.config.has_humans() {
            self.done = true;
        }
        Ok(())
    }

    fn main(&mut self, _ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
        Ok(if self.done {
            Transition::Next(GameState::TurnStart(TurnStart::new()))
        } else {
            Transition::Stay
        })
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        let round = ctx.cosmos.next_round()?;
        *ctx.model = Model::for_round(ctx.config, round, &mut *ctx.rng);
        let info = ctx.cosmos.round_info();
        info!(round = info.round, total = info.total_rounds, "round started");
        ctx.emit(GameEvent::RoundStarted {
            round: info.round,
            total_rounds: info.total_rounds,
        });
        Ok(())
    }

    fn on_input(&mut self, ctx: &mut StateContext<'_>, input: InputEvent) -> Result<bool, SimError> {
        match input {
            InputEvent::Buy { player, kind } => {
                let is_human = ctx
                    .config
                    .players
                    .get(player)
                    .map(|p| p.kind == PlayerKind::Human)
                    .ok_or(StateError::NoSuchPlayer(player))?;
                if !is_human {
                    warn!(player, ?kind, "ignoring purchase for a computer player");
                    return Ok(false);
                }
                let earnings = ctx.cosmos.purchase(player, kind)?;
                ctx.emit(GameEvent::WeaponPurchased {
                    player,
                    weapon: kind,
                    earnings,
                });
                Ok(true)
            }
            InputEvent::Button {
                button: GameButton::Done,
            } => {
                self.done = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn blocking_delay(&self) -> Result<BlockingDelay, StateError> {
        Ok(BlockingDelay::Indefinite)
    }
}
