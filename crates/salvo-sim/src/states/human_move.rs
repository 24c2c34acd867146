//! A human turn: aim, cycle weapons, hold fire to charge.

use tracing::debug;

use salvo_core::commands::InputEvent;
use salvo_core::constants::{ANIMATION_TICK_MS, MAX_POWER};
use salvo_core::enums::{GameButton, StateId};
use salvo_core::events::GameEvent;

use crate::error::{SimError, StateError};
use crate::weapons::WeaponKindExt;

use super::moves::{aim_angle, fire_projectile, select_current, time_to_power, use_special};
use super::{BlockingDelay, StateContext, Transition, TurnState};

#[derive(Debug, Default)]
pub struct HumanMove {
    fire_pressed_at: Option<u64>,
    fire_released_at: Option<u64>,
    /// Fire was pressed and released with a non-projectile weapon.
    special_requested: bool,
}

impl HumanMove {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_charging(&self) -> bool {
        self.fire_pressed_at.is_some()
    }

    fn cycle_weapon(&self, ctx: &mut StateContext<'_>, forward: bool) -> Result<bool, SimError> {
        if self.is_charging() {
            return Ok(false);
        }
        let id = ctx.model.current_player();
        let cur = ctx.model.current().weapon();
        let armory = ctx.cosmos.armory(id)?;
        let next = if forward {
            armory.next_weapon(cur)?
        } else {
            armory.prev_weapon(cur)?
        };
        if next == cur {
            return Ok(false);
        }
        ctx.model.current_mut().set_weapon(next);
        ctx.emit(GameEvent::WeaponSelected {
            player: id,
            weapon: next,
        });
        Ok(true)
    }

    fn set_angle(ctx: &mut StateContext<'_>, degrees: i32) -> bool {
        let player = ctx.model.current_mut();
        let before = player.angle_deg();
        player.set_angle_deg(degrees);
        player.angle_deg() != before
    }
}

impl TurnState for HumanMove {
    fn id(&self) -> StateId {
        StateId::HumanMove
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        select_current(ctx);
        Ok(())
    }

    fn main(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
        if self.special_requested {
            return use_special(ctx);
        }
        let Some(pressed) = self.fire_pressed_at else {
            return Ok(Transition::Stay);
        };
        if self.fire_released_at.is_none()
            && time_to_power(ctx.now_ms.saturating_sub(pressed)) == MAX_POWER
        {
            self.fire_released_at = Some(ctx.now_ms);
        }
        match self.fire_released_at {
            Some(released) => fire_projectile(ctx, time_to_power(released.saturating_sub(pressed))),
            None => Ok(Transition::Stay),
        }
    }

    fn on_input(&mut self, ctx: &mut StateContext<'_>, input: InputEvent) -> Result<bool, SimError> {
        match input {
            InputEvent::Button { button } => {
                let weapon = ctx.model.current().weapon();
                let projectile = weapon.spec().is_projectile();
                match button {
                    GameButton::ArmoryLeft => self.cycle_weapon(ctx, false),
                    GameButton::ArmoryRight => self.cycle_weapon(ctx, true),
                    GameButton::PressFire if projectile => {
                        if self.fire_pressed_at.is_none() {
                            self.fire_pressed_at = Some(ctx.now_ms);
                        }
                        Ok(true)
                    }
                    GameButton::ReleaseFire if projectile => {
                        if self.is_charging() && self.fire_released_at.is_none() {
                            self.fire_released_at = Some(ctx.now_ms);
                            return Ok(true);
                        }
                        Ok(false)
                    }
                    GameButton::ReleaseFire => {
                        let spec = weapon.spec();
                        if spec.is_extra_armor() && !ctx.model.current().can_use_extra_armor() {
                            debug!(player = ctx.model.current_player(), "armor already at maximum");
                            return Ok(false);
                        }
                        self.special_requested = true;
                        Ok(true)
                    }
                    _ => Ok(false),
                }
            }
            InputEvent::PointerDrag { x, y } => {
                let turret = ctx.model.current().turret_center();
                Ok(Self::set_angle(ctx, aim_angle(turret, x, y)))
            }
            InputEvent::SetAngle { degrees } => Ok(Self::set_angle(ctx, degrees)),
            InputEvent::Buy { .. } => Ok(false),
        }
    }

    fn blocking_delay(&self) -> Result<BlockingDelay, StateError> {
        Ok(if self.is_charging() {
            BlockingDelay::Millis(ANIMATION_TICK_MS)
        } else {
            BlockingDelay::Indefinite
        })
    }

    fn power_bar(&self, now_ms: u64) -> Option<i32> {
        let pressed = self.fire_pressed_at?;
        let until = self.fire_released_at.unwrap_or(now_ms);
        Some(time_to_power(until.saturating_sub(pressed)))
    }
}
