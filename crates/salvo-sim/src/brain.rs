//! Computer opponents.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use salvo_core::constants::{GRAVITY, MAX_POWER, MIN_POWER, POWER_TO_SPEED};
use salvo_core::enums::WeaponKind;

use crate::error::SaveError;
use crate::model::Model;
use crate::save::SaveMap;
use crate::weapons::{Armory, WeaponKindExt};

/// A planned computer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub angle_deg: i32,
    pub power: i32,
    pub weapon: WeaponKind,
}

impl Move {
    pub fn is_projectile(&self) -> bool {
        self.weapon.spec().is_projectile()
    }

    pub(crate) fn save(&self, map: &mut SaveMap) -> Result<(), SaveError> {
        map.put("move_angle_deg", self.angle_deg)?;
        map.put("move_power", self.power)?;
        map.put("move_weapon", self.weapon.key())?;
        Ok(())
    }

    pub(crate) fn restore(map: &SaveMap) -> Result<Self, SaveError> {
        Ok(Self {
            angle_deg: map.get("move_angle_deg")?,
            power: map.get("move_power")?,
            weapon: map.get_weapon("move_weapon")?,
        })
    }
}

/// Decides a move for the current player.
pub trait Brain: Send {
    fn plan_move(&self, model: &Model, armory: &Armory, rng: &mut dyn RngCore) -> Move;
}

/// Picks a random opponent and lobs shells roughly in its direction,
/// ignoring wind and elevation.
#[derive(Debug, Clone, Copy)]
pub struct EasyBrain {
    /// Maximum random error added to the launch power.
    pub power_jitter: i32,
    /// Maximum random error added to the launch angle.
    pub angle_jitter: i32,
}

impl Default for EasyBrain {
    fn default() -> Self {
        Self {
            power_jitter: 120,
            angle_jitter: 10,
        }
    }
}

impl EasyBrain {
    fn pick_weapon(&self, model: &Model, armory: &Armory, rng: &mut dyn RngCore) -> WeaponKind {
        let me = model.current();
        if me.life() < 100 && me.can_use_extra_armor() && armory.has(WeaponKind::ExtraArmor) {
            return WeaponKind::ExtraArmor;
        }
        if armory.has(WeaponKind::Teleporter) && rng.gen_ratio(1, 10) {
            return WeaponKind::Teleporter;
        }
        let shells: Vec<WeaponKind> = armory
            .iter()
            .map(|(kind, _)| kind)
            .filter(|kind| kind.spec().is_projectile())
            .collect();
        shells
            .choose(rng)
            .copied()
            .unwrap_or(WeaponKind::SmallMissile)
    }
}

impl Brain for EasyBrain {
    fn plan_move(&self, model: &Model, armory: &Armory, rng: &mut dyn RngCore) -> Move {
        let weapon = self.pick_weapon(model, armory, rng);
        let me = model.current();
        let targets: Vec<i32> = model
            .live_players()
            .filter(|p| p.id() != me.id())
            .map(|p| p.x())
            .collect();
        let target_x = targets.choose(rng).copied().unwrap_or(me.x());
        let dx = target_x - me.x();

        let base = if dx >= 0 { 45 } else { 135 };
        let angle_deg = base + rng.gen_range(-self.angle_jitter..=self.angle_jitter);

        // Flat-ground range: dx = v^2 sin(2a) / g.
        let sin2a = (2.0 * (angle_deg as f32).to_radians()).sin().abs().max(0.1);
        let speed = (dx.abs() as f32 * GRAVITY / sin2a).sqrt();
        let ideal = (speed * POWER_TO_SPEED) as i32;
        let power = (ideal + rng.gen_range(-self.power_jitter..=self.power_jitter))
            .clamp(MIN_POWER, MAX_POWER);

        Move {
            angle_deg,
            power,
            weapon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_aims_toward_the_opponent() {
        let config = GameConfig::computers_only(2, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut model = Model::for_round(&config, 1, &mut rng);
        let armory = Armory::starting();
        let brain = EasyBrain::default();

        model.set_current_player(0).unwrap();
        for _ in 0..20 {
            let mv = brain.plan_move(&model, &armory, &mut rng);
            assert!(mv.angle_deg < 90, "opponent is to the right");
            assert!((MIN_POWER..=MAX_POWER).contains(&mv.power));
            assert!(mv.is_projectile());
        }
        model.set_current_player(1).unwrap();
        let mv = brain.plan_move(&model, &armory, &mut rng);
        assert!(mv.angle_deg > 90, "opponent is to the left");
    }

    #[test]
    fn test_only_owned_weapons() {
        let config = GameConfig::computers_only(3, 8);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let model = Model::for_round(&config, 1, &mut rng);
        let armory = Armory::starting();
        let brain = EasyBrain::default();
        for _ in 0..50 {
            let mv = brain.plan_move(&model, &armory, &mut rng);
            assert!(armory.has(mv.weapon), "{:?} not owned", mv.weapon);
        }
    }

    #[test]
    fn test_wounded_brain_uses_armor() {
        let config = GameConfig::computers_only(2, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut model = Model::for_round(&config, 1, &mut rng);
        model.set_current_player(0).unwrap();
        model.current_mut().take_damage(50);
        let mut armory = Armory::starting();
        armory.buy(WeaponKind::ExtraArmor).unwrap();
        let mv = EasyBrain::default().plan_move(&model, &armory, &mut rng);
        assert_eq!(mv.weapon, WeaponKind::ExtraArmor);
        assert!(!mv.is_projectile());
    }
}
