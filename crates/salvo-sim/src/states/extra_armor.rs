//! Extra armor: pulse the aura, then top up life.

use tracing::info;

use salvo_core::constants::{ANIMATION_TICK_MS, DESELECTED_AURA_ALPHA, EXTRA_ARMOR_ANIMATION_MS, EXTRA_ARMOR_LIFE};
use salvo_core::enums::StateId;
use salvo_core::events::GameEvent;

use crate::error::{SimError, StateError};

use super::moves::select_current;
use super::{BlockingDelay, GameState, StateContext, Transition, TurnStart, TurnState};

/// Whitening that rises to full at the midpoint and falls back to zero.
fn pulse(elapsed_ms: u64) -> u32 {
    let half = EXTRA_ARMOR_ANIMATION_MS / 2;
    let e = elapsed_ms.min(EXTRA_ARMOR_ANIMATION_MS);
    let rising = if e <= half { e } else { EXTRA_ARMOR_ANIMATION_MS - e };
    (rising * 100 / half) as u32
}

#[derive(Debug, Default)]
pub struct ExtraArmor {
    entered_at: u64,
}

impl ExtraArmor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TurnState for ExtraArmor {
    fn id(&self) -> StateId {
        StateId::ExtraArmor
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        self.entered_at = ctx.now_ms;
        select_current(ctx);
        Ok(())
    }

    fn main(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
        let elapsed = ctx.now_ms.saturating_sub(self.entered_at);
        if elapsed >= EXTRA_ARMOR_ANIMATION_MS {
            return Ok(Transition::Next(GameState::TurnStart(TurnStart::new())));
        }
        ctx.model.current_mut().set_aura_whitening(pulse(elapsed));
        Ok(Transition::Stay)
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        let id = ctx.model.current_player();
        let player = ctx.model.current_mut();
        player.gain_life(EXTRA_ARMOR_LIFE);
        player.set_aura_whitening(0);
        player.set_aura_alpha(DESELECTED_AURA_ALPHA);
        let life = player.life();
        info!(player = id, life, "extra armor applied");
        ctx.emit(GameEvent::ArmorApplied { player: id, life });
        Ok(())
    }

    fn blocking_delay(&self) -> Result<BlockingDelay, StateError> {
        Ok(BlockingDelay::Millis(ANIMATION_TICK_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_peaks_at_midpoint() {
        assert_eq!(pulse(0), 0);
        assert_eq!(pulse(1000), 50);
        assert_eq!(pulse(2000), 100);
        assert_eq!(pulse(3000), 50);
        assert_eq!(pulse(4000), 0);
        assert_eq!(pulse(9000), 0, "clamped past the end");
    }
}
