//! Teleport: pick a destination, then animate the swap in five phases.

use rand::seq::SliceRandom;
use rand::Rng;

use salvo_core::constants::{
    ANIMATION_TICK_MS, DESELECTED_AURA_ALPHA, PLAYER_X_SIZE, TELEPORT_DIM_MS, TELEPORT_FADE_IN_MS,
    TELEPORT_FADE_OUT_MS, TELEPORT_PAUSE_MS, TELEPORT_WHITENING_MS,
};
use salvo_core::enums::StateId;
use salvo_core::events::GameEvent;

use crate::error::{SaveError, SimError, StateError};
use crate::model::{starting_slots, Model};
use crate::save::SaveMap;

use super::{BlockingDelay, GameState, StateContext, Transition, TurnStart, TurnState};

/// Where everyone ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeleportPlan {
    pub teleporter: usize,
    /// Player swapped with the teleporter, if any.
    pub partner: Option<usize>,
    pub teleporter_from: i32,
    pub teleporter_to: i32,
    pub partner_from: i32,
    pub partner_to: i32,
}

impl TeleportPlan {
    fn swap_with(model: &Model, teleporter: usize, partner: usize) -> Self {
        let from = model.players()[teleporter].x();
        let to = model.players()[partner].x();
        Self {
            teleporter,
            partner: Some(partner),
            teleporter_from: from,
            teleporter_to: to,
            partner_from: to,
            partner_to: from,
        }
    }

    fn participants(&self) -> impl Iterator<Item = usize> {
        std::iter::once(self.teleporter).chain(self.partner)
    }
}

/// Choose where the current player teleports to.
///
/// A dead tank is the preferred swap partner. In a two-player game the
/// teleporter jumps to a free three-player slot instead, so it cannot land
/// on top of the opponent. Otherwise it swaps with a random live opponent.
pub fn plan_teleport(model: &Model, rng: &mut impl Rng) -> TeleportPlan {
    let me = model.current_player();
    let players = model.players();

    let dead: Vec<usize> = players
        .iter()
        .filter(|p| !p.is_alive())
        .map(|p| p.id())
        .collect();
    if let Some(&partner) = dead.choose(rng) {
        return TeleportPlan::swap_with(model, me, partner);
    }

    let from = players[me].x();
    if players.len() == 2 {
        let free = starting_slots(3)
            .into_iter()
            .filter(|&slot| players.iter().all(|p| (p.x() - slot).abs() >= PLAYER_X_SIZE))
            .min_by_key(|&slot| (slot - from).abs());
        if let Some(to) = free {
            return TeleportPlan {
                teleporter: me,
                partner: None,
                teleporter_from: from,
                teleporter_to: to,
                partner_from: 0,
                partner_to: 0,
            };
        }
    }

    let others: Vec<usize> = players
        .iter()
        .filter(|p| p.is_alive() && p.id() != me)
        .map(|p| p.id())
        .collect();
    match others.choose(rng) {
        Some(&partner) => TeleportPlan::swap_with(model, me, partner),
        None => TeleportPlan {
            teleporter: me,
            partner: None,
            teleporter_from: from,
            teleporter_to: from,
            partner_from: 0,
            partner_to: 0,
        },
    }
}

const FADE_OUT_AT: u64 = TELEPORT_WHITENING_MS;
const PAUSE_AT: u64 = FADE_OUT_AT + TELEPORT_FADE_OUT_MS;
const SWAP_AT: u64 = PAUSE_AT + TELEPORT_PAUSE_MS / 2;
const FADE_IN_AT: u64 = PAUSE_AT + TELEPORT_PAUSE_MS;
const DIM_AT: u64 = FADE_IN_AT + TELEPORT_FADE_IN_MS;
const DONE_AT: u64 = DIM_AT + TELEPORT_DIM_MS;

fn percent(elapsed: u64, duration: u64) -> u32 {
    (elapsed * 100 / duration.max(1)).min(100) as u32
}

#[derive(Debug)]
pub struct Teleport {
    plan: TeleportPlan,
    entered_at: u64,
    swapped: bool,
}

impl Teleport {
    pub fn new(plan: TeleportPlan) -> Self {
        Self {
            plan,
            entered_at: 0,
            swapped: false,
        }
    }

    pub fn plan(&self) -> TeleportPlan {
        self.plan
    }

    pub(super) fn restore(map: &SaveMap) -> Result<Self, SaveError> {
        let partner: i64 = map.get("teleport_partner")?;
        let partner = match partner {
            -1 => None,
            n => Some(usize::try_from(n).map_err(|_| SaveError::BadValue {
                key: "teleport_partner".into(),
                reason: format!("{n} is not a player index"),
            })?),
        };
        Ok(Self::new(TeleportPlan {
            teleporter: map.get("teleport_teleporter")?,
            partner,
            teleporter_from: map.get("teleport_teleporter_from")?,
            teleporter_to: map.get("teleport_teleporter_to")?,
            partner_from: map.get("teleport_partner_from")?,
            partner_to: map.get("teleport_partner_to")?,
        }))
    }

    /// Dead partners stay as they are; only live tanks shimmer and fade.
    fn set_visuals(&self, ctx: &mut StateContext<'_>, whitening: u32, fade: u32) -> Result<(), SimError> {
        for id in self.plan.participants() {
            let p = ctx.model.player_mut(id)?;
            if !p.is_alive() {
                continue;
            }
            p.set_aura_whitening(whitening);
            p.set_fade(fade);
        }
        Ok(())
    }

    fn swap(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        let plan = self.plan;
        let (terrain, players) = ctx.model.split_mut();
        let moves = std::iter::once((plan.teleporter, plan.teleporter_from, plan.teleporter_to))
            .chain(plan.partner.map(|p| (p, plan.partner_from, plan.partner_to)));
        for (id, from_x, to_x) in moves {
            let player = players.get_mut(id).ok_or(StateError::NoSuchPlayer(id))?;
            player.place(to_x, terrain);
            ctx.events.push(GameEvent::Teleported {
                player: id,
                from_x,
                to_x,
            });
        }
        self.swapped = true;
        Ok(())
    }
}

impl TurnState for Teleport {
    fn id(&self) -> StateId {
        StateId::Teleport
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        self.entered_at = ctx.now_ms;
        self.swapped = false;
        let plan = self.plan;
        let (terrain, players) = ctx.model.split_mut();
        let starts = std::iter::once((plan.teleporter, plan.teleporter_from))
            .chain(plan.partner.map(|p| (p, plan.partner_from)));
        for (id, x) in starts {
            players
                .get_mut(id)
                .ok_or(StateError::NoSuchPlayer(id))?
                .place(x, terrain);
        }
        Ok(())
    }

    fn main(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
        let e = ctx.now_ms.saturating_sub(self.entered_at);
        if e >= SWAP_AT && !self.swapped {
            self.swap(ctx)?;
        }
        if e >= DONE_AT {
            return Ok(Transition::Next(GameState::TurnStart(TurnStart::new())));
        }
        let (whitening, fade) = if e < FADE_OUT_AT {
            (percent(e, TELEPORT_WHITENING_MS), 0)
        } else if e < PAUSE_AT {
            (100, percent(e - FADE_OUT_AT, TELEPORT_FADE_OUT_MS))
        } else if e < FADE_IN_AT {
            (100, 100)
        } else if e < DIM_AT {
            (100, 100 - percent(e - FADE_IN_AT, TELEPORT_FADE_IN_MS))
        } else {
            (100 - percent(e - DIM_AT, TELEPORT_DIM_MS), 0)
        };
        self.set_visuals(ctx, whitening, fade)?;
        Ok(Transition::Stay)
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        self.set_visuals(ctx, 0, 0)?;
        ctx.model
            .player_mut(self.plan.teleporter)?
            .set_aura_alpha(DESELECTED_AURA_ALPHA);
        Ok(())
    }

    fn blocking_delay(&self) -> Result<BlockingDelay, StateError> {
        Ok(BlockingDelay::Millis(ANIMATION_TICK_MS))
    }

    fn save(&self, map: &mut SaveMap) -> Result<(), SaveError> {
        let plan = &self.plan;
        map.put("teleport_teleporter", plan.teleporter)?;
        map.put("teleport_partner", plan.partner.map_or(-1, |p| p as i64))?;
        map.put("teleport_teleporter_from", plan.teleporter_from)?;
        map.put("teleport_teleporter_to", plan.teleporter_to)?;
        map.put("teleport_partner_from", plan.partner_from)?;
        map.put("teleport_partner_to", plan.partner_to)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::EasyBrain;
    use crate::config::GameConfig;
    use crate::cosmos::Cosmos;
    use crate::player::Player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use salvo_core::enums::{PlayerColor, PlayerKind};
    use salvo_terrain::Terrain;

    fn model_at(xs: &[i32], dead: &[usize]) -> Model {
        let terrain = Terrain::flat(200);
        let players = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let mut p = Player::new(i, format!("P{i}"), PlayerKind::Human, PlayerColor::ALL[i], 100);
                p.place(x, &terrain);
                if dead.contains(&i) {
                    p.take_damage(100);
                }
                p
            })
            .collect();
        Model::new(terrain, players, 0, 0)
    }

    #[test]
    fn test_two_players_jump_to_free_slot() {
        let model = model_at(&[30, 450], &[]);
        let plan = plan_teleport(&model, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(plan.partner, None);
        assert_eq!(plan.teleporter_to, 240, "middle slot is the only free one");
    }

    #[test]
    fn test_two_players_pick_nearest_free_slot() {
        let model = model_at(&[240, 450], &[]);
        let plan = plan_teleport(&model, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(plan.teleporter_to, 30);
    }

    #[test]
    fn test_prefers_dead_partner() {
        let model = model_at(&[30, 170, 310, 450], &[2]);
        for seed in 0..10 {
            let plan = plan_teleport(&model, &mut ChaCha8Rng::seed_from_u64(seed));
            assert_eq!(plan.partner, Some(2));
            assert_eq!(plan.teleporter_to, 310);
            assert_eq!(plan.partner_to, 30);
        }
    }

    #[test]
    fn test_many_players_swap_with_live_opponent() {
        let model = model_at(&[30, 170, 310, 450], &[]);
        let plan = plan_teleport(&model, &mut ChaCha8Rng::seed_from_u64(4));
        let partner = plan.partner.expect("swap partner");
        assert_ne!(partner, 0);
        assert_eq!(plan.teleporter_to, model.players()[partner].x());
    }

    #[test]
    fn test_dead_partner_is_not_faded() {
        let mut model = model_at(&[30, 170, 310, 450], &[2]);
        let plan = plan_teleport(&model, &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(plan.partner, Some(2));

        let mut cosmos = Cosmos::new(4, 1, 0);
        let config = GameConfig::default();
        let brain = EasyBrain::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut events = Vec::new();
        let mut state = Teleport::new(plan);
        for now_ms in [0, FADE_OUT_AT + 500] {
            let mut ctx = StateContext {
                model: &mut model,
                cosmos: &mut cosmos,
                config: &config,
                brain: &brain,
                rng: &mut rng,
                events: &mut events,
                now_ms,
            };
            if now_ms == 0 {
                state.on_enter(&mut ctx).unwrap();
            } else {
                assert!(matches!(state.main(&mut ctx).unwrap(), Transition::Stay));
            }
        }
        assert_eq!(model.players()[0].fade(), 50, "teleporter is half faded");
        assert_eq!(model.players()[2].fade(), 0, "dead partner untouched");
    }

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(SWAP_AT, 2250);
        assert_eq!(DONE_AT, 4500);
        assert_eq!(percent(500, 1000), 50);
        assert_eq!(percent(5000, 1000), 100);
    }
}
