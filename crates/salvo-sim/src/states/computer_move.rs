//! A computer turn, staged on a timer so it reads like a human playing.

use salvo_core::constants::{
    ANIMATION_TICK_MS, COMPUTER_AIM_MS, COMPUTER_PRESS_FIRE_MS, COMPUTER_SELECT_WEAPON_MS,
};
use salvo_core::enums::StateId;
use salvo_core::events::GameEvent;

use crate::brain::Move;
use crate::error::{SaveError, SimError, StateError};
use crate::save::SaveMap;

use super::moves::{fire_projectile, power_to_duration, select_current, time_to_power, use_special};
use super::{BlockingDelay, StateContext, Transition, TurnState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    SelectWeapon,
    Aim,
    PressFire,
    Charging,
}

impl Stage {
    fn starts_after(self) -> u64 {
        match self {
            Stage::SelectWeapon => COMPUTER_SELECT_WEAPON_MS,
            Stage::Aim => COMPUTER_AIM_MS,
            Stage::PressFire => COMPUTER_PRESS_FIRE_MS,
            Stage::Charging => u64::MAX,
        }
    }
}

#[derive(Debug)]
pub struct ComputerMove {
    plan: Move,
    stage: Stage,
    entered_at: u64,
    fire_pressed_at: u64,
    fire_release_at: Option<u64>,
}

impl ComputerMove {
    pub fn new(plan: Move) -> Self {
        Self {
            plan,
            stage: Stage::SelectWeapon,
            entered_at: 0,
            fire_pressed_at: 0,
            fire_release_at: None,
        }
    }

    pub fn plan(&self) -> Move {
        self.plan
    }

    pub(super) fn restore(map: &SaveMap) -> Result<Self, SaveError> {
        Ok(Self::new(Move::restore(map)?))
    }

    /// Run the next stage if its time has come. Returns a transition when
    /// the stage ends the move early.
    fn advance_stage(&mut self, ctx: &mut StateContext<'_>) -> Result<Option<Transition>, SimError> {
        let elapsed = ctx.now_ms.saturating_sub(self.entered_at);
        if elapsed <= self.stage.starts_after() {
            return Ok(None);
        }
        match self.stage {
            Stage::SelectWeapon => {
                let id = ctx.model.current_player();
                ctx.model.current_mut().set_weapon(self.plan.weapon);
                ctx.emit(GameEvent::WeaponSelected {
                    player: id,
                    weapon: self.plan.weapon,
                });
                self.stage = Stage::Aim;
            }
            Stage::Aim => {
                if self.plan.is_projectile() {
                    ctx.model.current_mut().set_angle_deg(self.plan.angle_deg);
                }
                self.stage = Stage::PressFire;
            }
            Stage::PressFire => {
                if !self.plan.is_projectile() {
                    return use_special(ctx).map(Some);
                }
                self.fire_pressed_at = ctx.now_ms;
                self.fire_release_at = Some(ctx.now_ms + power_to_duration(self.plan.power));
                self.stage = Stage::Charging;
            }
            Stage::Charging => {}
        }
        Ok(None)
    }
}

impl TurnState for ComputerMove {
    fn id(&self) -> StateId {
        StateId::ComputerMove
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        select_current(ctx);
        self.entered_at = ctx.now_ms;
        self.stage = Stage::SelectWeapon;
        self.fire_release_at = None;
        Ok(())
    }

    fn main(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
        if let Some(transition) = self.advance_stage(ctx)? {
            return Ok(transition);
        }
        match self.fire_release_at {
            Some(release) if ctx.now_ms > release => fire_projectile(ctx, self.plan.power),
            _ => Ok(Transition::Stay),
        }
    }

    fn blocking_delay(&self) -> Result<BlockingDelay, StateError> {
        Ok(BlockingDelay::Millis(ANIMATION_TICK_MS))
    }

    fn power_bar(&self, now_ms: u64) -> Option<i32> {
        self.fire_release_at?;
        Some(time_to_power(now_ms.saturating_sub(self.fire_pressed_at)).min(self.plan.power))
    }

    fn save(&self, map: &mut SaveMap) -> Result<(), SaveError> {
        self.plan.save(map)
    }
}
