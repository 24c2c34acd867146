//! Decide who moves next, or end the round.

use tracing::info;

use salvo_core::constants::{AFTER_ROUND_PAUSE_MS, SURVIVOR_BONUS};
use salvo_core::enums::{PlayerKind, StateId};
use salvo_core::events::GameEvent;

use crate::error::{SimError, StateError};
use crate::model::NextTurn;

use super::{
    BlockingDelay, ComputerMove, GameState, HumanMove, Leaderboard, StateContext, Transition,
    TurnState,
};

/// Never blocks: `main` always transitions.
#[derive(Debug, Default)]
pub struct TurnStart;

impl TurnStart {
    pub fn new() -> Self {
        Self
    }
}

impl TurnState for TurnStart {
    fn id(&self) -> StateId {
        StateId::TurnStart
    }

    fn main(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
        let next = match ctx.model.next_turn_info() {
            NextTurn::Draw => {
                info!("round ends in a draw");
                ctx.emit(GameEvent::RoundOver { winner: None });
                return Ok(leaderboard());
            }
            NextTurn::Won(winner) => {
                info!(winner, "round won");
                ctx.cosmos.earn(winner, SURVIVOR_BONUS);
                ctx.emit(GameEvent::RoundOver {
                    winner: Some(winner),
                });
                return Ok(leaderboard());
            }
            NextTurn::Next(next) => next,
        };

        ctx.model.set_current_player(next)?;
        let name = ctx.model.current().name().to_string();
        let kind = ctx.model.current().kind();
        ctx.emit(GameEvent::TurnStarted { player: next, name });

        let state = match kind {
            PlayerKind::Human => GameState::HumanMove(HumanMove::new()),
            PlayerKind::Computer => {
                let armory = ctx.cosmos.armory(next)?;
                let mv = ctx.brain.plan_move(ctx.model, armory, &mut *ctx.rng);
                GameState::ComputerMove(ComputerMove::new(mv))
            }
        };
        Ok(Transition::Next(state))
    }

    fn blocking_delay(&self) -> Result<BlockingDelay, StateError> {
        Err(StateError::NeverBlocks(StateId::TurnStart))
    }
}

fn leaderboard() -> Transition {
    Transition::Next(GameState::Leaderboard(Leaderboard::new(
        AFTER_ROUND_PAUSE_MS,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_delay_is_an_error() {
        assert_eq!(
            TurnStart::new().blocking_delay(),
            Err(StateError::NeverBlocks(StateId::TurnStart))
        );
        assert!(matches!(
            GameState::TurnStart(TurnStart::new()).blocking_delay(),
            Err(StateError::NeverBlocks(StateId::TurnStart))
        ));
    }
}
