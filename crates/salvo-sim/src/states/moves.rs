//! Shared helpers for the human and computer move states.

use glam::Vec2;
use tracing::debug;

use salvo_core::constants::{
    MAX_FIRE_TIME_MS, MAX_POWER, MAX_TURRET_ANGLE, MIN_POWER, MIN_TURRET_ANGLE,
    SELECTED_AURA_ALPHA,
};
use salvo_core::events::GameEvent;

use crate::error::{SimError, StateError};
use crate::weapons::WeaponKindExt;

use super::{plan_teleport, Ballistics, ExtraArmor, GameState, StateContext, Teleport, Transition};

/// Power reached after holding fire for `held_ms`.
pub fn time_to_power(held_ms: u64) -> i32 {
    if held_ms >= MAX_FIRE_TIME_MS {
        return MAX_POWER;
    }
    let power = (held_ms * MAX_POWER as u64 / MAX_FIRE_TIME_MS) as i32;
    power.max(MIN_POWER)
}

/// How long fire must be held to reach `power`.
pub fn power_to_duration(power: i32) -> u64 {
    let power = power.clamp(0, MAX_POWER) as u64;
    power * MAX_FIRE_TIME_MS / MAX_POWER as u64
}

/// Turret angle that points from `turret` toward the pointer at `(px, py)`.
///
/// A pointer level with or below the turret snaps to horizontal.
pub fn aim_angle(turret: Vec2, px: f32, py: f32) -> i32 {
    let y_diff = turret.y - py;
    if y_diff <= 0.0 {
        return if px >= turret.x {
            MIN_TURRET_ANGLE
        } else {
            MAX_TURRET_ANGLE
        };
    }
    let x_diff = turret.x - px;
    let deg = y_diff.atan2(x_diff).to_degrees() as i32;
    (MAX_TURRET_ANGLE - deg).clamp(MIN_TURRET_ANGLE, MAX_TURRET_ANGLE)
}

pub(super) fn select_current(ctx: &mut StateContext<'_>) {
    ctx.model.current_mut().set_aura_alpha(SELECTED_AURA_ALPHA);
}

/// Spend one unit of the current weapon and reselect if it ran out.
fn spend_current_weapon(ctx: &mut StateContext<'_>) -> Result<(), SimError> {
    let id = ctx.model.current_player();
    let weapon = ctx.model.current().weapon();
    let next = ctx.cosmos.armory_mut(id)?.use_weapon(weapon)?;
    if next != weapon {
        ctx.model.current_mut().set_weapon(next);
        ctx.emit(GameEvent::WeaponSelected {
            player: id,
            weapon: next,
        });
    }
    Ok(())
}

/// Fire the current projectile weapon at `power`.
pub(super) fn fire_projectile(ctx: &mut StateContext<'_>, power: i32) -> Result<Transition, SimError> {
    let id = ctx.model.current_player();
    let weapon = ctx.model.current().weapon();
    if !weapon.spec().is_projectile() {
        return Err(StateError::NotUsable(weapon).into());
    }
    spend_current_weapon(ctx)?;
    let power = power.clamp(MIN_POWER, MAX_POWER);
    debug!(player = id, ?weapon, power, "fire");
    ctx.emit(GameEvent::Fired {
        player: id,
        weapon,
        power,
    });
    Ok(Transition::Next(GameState::Ballistics(Ballistics::new(
        power, weapon,
    ))))
}

/// Use the current non-projectile weapon.
pub(super) fn use_special(ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
    let id = ctx.model.current_player();
    let weapon = ctx.model.current().weapon();
    let spec = weapon.spec();
    if spec.is_teleporter() {
        spend_current_weapon(ctx)?;
        let plan = plan_teleport(ctx.model, &mut *ctx.rng);
        debug!(player = id, ?plan, "teleport");
        Ok(Transition::Next(GameState::Teleport(Teleport::new(plan))))
    } else if spec.is_extra_armor() {
        if !ctx.model.current().can_use_extra_armor() {
            return Err(StateError::ArmorNotNeeded(id).into());
        }
        spend_current_weapon(ctx)?;
        Ok(Transition::Next(GameState::ExtraArmor(ExtraArmor::new())))
    } else {
        Err(StateError::NotUsable(weapon).into())
    }
}
