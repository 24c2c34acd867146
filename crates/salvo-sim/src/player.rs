//! Per-round player state and its derived presentation colors.

use glam::Vec2;

use salvo_core::constants::{
    DEFAULT_TURRET_ANGLE, FALL_DAMAGE_MULTIPLIER, MAX_LIFE, MAX_TURRET_ANGLE, MIN_TURRET_ANGLE,
    PLAYER_Y_SIZE, TURRET_LENGTH,
};
use salvo_core::enums::{PlayerColor, PlayerKind, WeaponKind};
use salvo_core::state::PlayerView;
use salvo_core::types::Argb;
use salvo_terrain::{linear_interpolation, Terrain};

use crate::error::SaveError;
use crate::save::SaveMap;

/// Aura color a player blends toward while being whitened.
const WHITENED_AURA: Argb = Argb::new(0xcc, 0xdd, 0xdd, 0xdd);

/// One tank on the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    id: usize,
    name: String,
    kind: PlayerKind,
    color: PlayerColor,
    life: u32,
    x: i32,
    y: i32,
    angle_deg: i32,
    weapon: WeaponKind,
    /// 0 is fully visible, 100 fully faded.
    fade: u32,
    aura_alpha: u8,
    /// 0 is the player's own color, 100 fully whitened.
    aura_whitening: u32,
    death_explosion_pending: bool,
}

impl Player {
    pub fn new(id: usize, name: impl Into<String>, kind: PlayerKind, color: PlayerColor, life: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            color,
            life: life.min(MAX_LIFE),
            x: 0,
            y: 0,
            angle_deg: DEFAULT_TURRET_ANGLE,
            weapon: WeaponKind::SmallMissile,
            fade: 0,
            aura_alpha: 0,
            aura_whitening: 0,
            death_explosion_pending: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    pub fn color(&self) -> PlayerColor {
        self.color
    }

    pub fn life(&self) -> u32 {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn angle_deg(&self) -> i32 {
        self.angle_deg
    }

    pub fn angle_rad(&self) -> f32 {
        (self.angle_deg as f32).to_radians()
    }

    pub fn weapon(&self) -> WeaponKind {
        self.weapon
    }

    pub fn fade(&self) -> u32 {
        self.fade
    }

    pub fn aura_alpha(&self) -> u8 {
        self.aura_alpha
    }

    pub fn death_explosion_pending(&self) -> bool {
        self.death_explosion_pending
    }

    pub fn can_use_extra_armor(&self) -> bool {
        self.life < MAX_LIFE
    }

    /// Put the tank at column `x`, resting on the ground.
    pub fn place(&mut self, x: i32, terrain: &Terrain) {
        self.x = x;
        self.y = terrain.safe_get(x);
    }

    /// The turret pivots around this point.
    pub fn turret_center(&self) -> Vec2 {
        Vec2::new(self.x as f32, (self.y - PLAYER_Y_SIZE / 4) as f32)
    }

    /// End of the gun barrel, where projectiles are launched from.
    pub fn turret_tip(&self) -> Vec2 {
        let (sin, cos) = self.angle_rad().sin_cos();
        self.turret_center() + Vec2::new(cos, -sin) * TURRET_LENGTH as f32
    }

    pub fn set_angle_deg(&mut self, degrees: i32) {
        self.angle_deg = degrees.clamp(MIN_TURRET_ANGLE, MAX_TURRET_ANGLE);
    }

    pub fn set_weapon(&mut self, weapon: WeaponKind) {
        self.weapon = weapon;
    }

    pub fn set_fade(&mut self, percent: u32) {
        self.fade = percent.min(100);
    }

    pub fn set_aura_alpha(&mut self, alpha: u8) {
        self.aura_alpha = alpha;
    }

    pub fn set_aura_whitening(&mut self, percent: u32) {
        self.aura_whitening = percent.min(100);
    }

    /// Subtract life. Dead players ignore further damage. Returns true if
    /// this hit killed the player.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.life == 0 {
            return false;
        }
        self.life = self.life.saturating_sub(amount);
        if self.life == 0 {
            self.death_explosion_pending = true;
            return true;
        }
        false
    }

    pub fn gain_life(&mut self, amount: u32) {
        self.life = self.life.saturating_add(amount).min(MAX_LIFE);
    }

    /// Clear the pending death explosion, returning whether one was pending.
    pub fn take_death_explosion(&mut self) -> bool {
        std::mem::take(&mut self.death_explosion_pending)
    }

    /// Drop onto the ground below. Returns the distance fallen, if any, after
    /// applying fall damage.
    pub fn fall(&mut self, terrain: &Terrain) -> Option<i32> {
        let ground = terrain.safe_get(self.x);
        if self.y >= ground {
            self.y = ground;
            return None;
        }
        let distance = ground - self.y;
        self.take_damage((FALL_DAMAGE_MULTIPLIER * distance as f32) as u32);
        self.y = ground;
        Some(distance)
    }

    pub fn body_color(&self) -> Argb {
        self.color.argb().with_alpha(self.body_alpha())
    }

    /// Reddish below 100 life, bluish above.
    pub fn outline_color(&self) -> Argb {
        let alpha = self.body_alpha();
        let life = self.life.min(MAX_LIFE);
        if life <= 100 {
            let whiteness = (life * 0xff / 100) as u8;
            Argb::new(alpha, 0xff, whiteness, whiteness)
        } else {
            let blueness = ((life - 100) * 0xff / 200) as u8;
            Argb::new(alpha, 0xff - blueness, 0xff - blueness, 0xff)
        }
    }

    pub fn aura_color(&self) -> Argb {
        self.color
            .argb()
            .with_alpha(self.aura_alpha)
            .blend(WHITENED_AURA, self.aura_whitening)
    }

    fn body_alpha(&self) -> u8 {
        linear_interpolation(0xff, 0, 0, 100, self.fade as i32) as u8
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            x: self.x,
            y: self.y,
            life: self.life,
            alive: self.is_alive(),
            turret_angle_deg: self.angle_deg,
            weapon: self.weapon,
            body_color: self.body_color(),
            outline_color: self.outline_color(),
            aura_color: self.aura_color(),
        }
    }

    /// Write the mutable per-round fields under `P{id}_`.
    pub(crate) fn save(&self, map: &mut SaveMap) -> Result<(), SaveError> {
        let p = player_prefix(self.id);
        map.put(format!("{p}life"), self.life)?;
        map.put(format!("{p}x"), self.x)?;
        map.put(format!("{p}y"), self.y)?;
        map.put(format!("{p}angle_deg"), self.angle_deg)?;
        map.put(format!("{p}weapon"), self.weapon.key())?;
        map.put(format!("{p}fade"), self.fade)?;
        map.put(format!("{p}aura_alpha"), self.aura_alpha)?;
        map.put(format!("{p}aura_whitening"), self.aura_whitening)?;
        map.put(format!("{p}death_pending"), self.death_explosion_pending)?;
        Ok(())
    }

    /// Restore the fields written by `save`. Identity comes from the caller.
    pub(crate) fn restore(&mut self, map: &SaveMap) -> Result<(), SaveError> {
        let p = player_prefix(self.id);
        let life: u32 = map.get(&format!("{p}life"))?;
        if life > MAX_LIFE {
            return Err(SaveError::BadValue {
                key: format!("{p}life"),
                reason: format!("{life} exceeds {MAX_LIFE}"),
            });
        }
        self.life = life;
        self.x = map.get(&format!("{p}x"))?;
        self.y = map.get(&format!("{p}y"))?;
        self.set_angle_deg(map.get(&format!("{p}angle_deg"))?);
        self.weapon = map.get_weapon(&format!("{p}weapon"))?;
        self.set_fade(map.get(&format!("{p}fade"))?);
        self.aura_alpha = map.get(&format!("{p}aura_alpha"))?;
        self.set_aura_whitening(map.get(&format!("{p}aura_whitening"))?);
        self.death_explosion_pending = map.get(&format!("{p}death_pending"))?;
        Ok(())
    }
}

pub(crate) fn player_prefix(id: usize) -> String {
    format!("P{id}_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank(life: u32) -> Player {
        Player::new(0, "Test", PlayerKind::Human, PlayerColor::Red, life)
    }

    #[test]
    fn test_damage_floors_at_zero_and_marks_death() {
        let mut p = tank(100);
        assert!(!p.take_damage(40));
        assert_eq!(p.life(), 60);
        assert!(p.take_damage(500), "lethal hit reports the kill");
        assert_eq!(p.life(), 0);
        assert!(p.death_explosion_pending());
        assert!(!p.take_damage(10), "dead players cannot be killed twice");
        assert!(p.take_death_explosion());
        assert!(!p.take_death_explosion());
    }

    #[test]
    fn test_gain_life_caps() {
        let mut p = tank(250);
        assert!(p.can_use_extra_armor());
        p.gain_life(100);
        assert_eq!(p.life(), MAX_LIFE);
        assert!(!p.can_use_extra_armor());
    }

    #[test]
    fn test_angle_is_clamped() {
        let mut p = tank(100);
        p.set_angle_deg(-20);
        assert_eq!(p.angle_deg(), 0);
        p.set_angle_deg(400);
        assert_eq!(p.angle_deg(), 180);
    }

    #[test]
    fn test_turret_tip_straight_up() {
        let mut p = tank(100);
        p.place(100, &Terrain::flat(200));
        p.set_angle_deg(90);
        let tip = p.turret_tip();
        assert!((tip.x - 100.0).abs() < 1e-4);
        assert!((tip.y - (200.0 - 5.0 - 20.0)).abs() < 1e-4);
    }

    #[test]
    fn test_fall_applies_damage() {
        let mut p = tank(100);
        p.place(100, &Terrain::flat(100));
        assert_eq!(p.fall(&Terrain::flat(100)), None);
        assert_eq!(p.fall(&Terrain::flat(150)), Some(50));
        assert_eq!(p.y(), 150);
        assert_eq!(p.life(), 80, "0.4 damage per pixel fallen");
    }

    #[test]
    fn test_outline_color_tracks_life() {
        let p = tank(50);
        let c = p.outline_color();
        assert_eq!((c.alpha(), c.red(), c.green(), c.blue()), (0xff, 0xff, 127, 127));

        let p = tank(300);
        let c = p.outline_color();
        assert_eq!((c.red(), c.green(), c.blue()), (0, 0, 0xff));
    }

    #[test]
    fn test_fade_hides_body() {
        let mut p = tank(100);
        p.set_fade(100);
        assert_eq!(p.body_color().alpha(), 0);
        p.set_fade(0);
        assert_eq!(p.body_color().alpha(), 0xff);
    }

    #[test]
    fn test_aura_whitening_blends() {
        let mut p = tank(100);
        p.set_aura_alpha(0x55);
        assert_eq!(p.aura_color(), PlayerColor::Red.argb().with_alpha(0x55));
        p.set_aura_whitening(100);
        assert_eq!(p.aura_color(), WHITENED_AURA);
    }
}
