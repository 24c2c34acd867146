//! Timed explosions: grow, then hurt players and carve the ground once.

use tracing::debug;

use salvo_core::constants::{
    BULLSEYE_RADIUS, EXPLOSION_DURATION_MS, KILL_BONUS, PLAYER_COLLISION_RADIUS,
};
use salvo_core::enums::WeaponKind;
use salvo_core::events::GameEvent;
use salvo_core::state::ExplosionView;
use salvo_terrain::{distance, linear_interpolation, Terrain};

use crate::cosmos::Cosmos;
use crate::player::Player;
use crate::weapons::ExplosionAttributes;

#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    x: i32,
    y: i32,
    weapon: WeaponKind,
    attributes: ExplosionAttributes,
    started_at_ms: u64,
    /// Player credited (or debited) for the damage.
    perpetrator: usize,
}

impl Explosion {
    pub fn new(
        x: i32,
        y: i32,
        weapon: WeaponKind,
        attributes: ExplosionAttributes,
        started_at_ms: u64,
        perpetrator: usize,
    ) -> Self {
        Self {
            x,
            y,
            weapon,
            attributes,
            started_at_ms,
            perpetrator,
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn weapon(&self) -> WeaponKind {
        self.weapon
    }

    pub fn attributes(&self) -> ExplosionAttributes {
        self.attributes
    }

    fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    pub fn current_radius(&self, now_ms: u64) -> i32 {
        let elapsed = self.elapsed(now_ms).min(EXPLOSION_DURATION_MS);
        (self.attributes.radius as i64 * elapsed as i64 / EXPLOSION_DURATION_MS as i64) as i32
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        self.elapsed(now_ms) > EXPLOSION_DURATION_MS
    }

    /// Apply damage, pay the perpetrator, and carve the crater. Consumes the
    /// explosion so it can only ever be applied once.
    pub fn resolve(
        self,
        players: &mut [Player],
        terrain: &mut Terrain,
        cosmos: &mut Cosmos,
        events: &mut Vec<GameEvent>,
    ) {
        if self.attributes.full_damage > 0 {
            for victim in players.iter_mut().filter(|p| p.is_alive()) {
                let dist = distance(
                    self.x as f32,
                    self.y as f32,
                    victim.x() as f32,
                    victim.y() as f32,
                );
                let Some(damage) = damage_at(&self.attributes, dist) else {
                    continue;
                };
                let killed = victim.take_damage(damage);
                events.push(GameEvent::PlayerDamaged {
                    player: victim.id(),
                    amount: damage,
                    life: victim.life(),
                });

                let own_goal = victim.id() == self.perpetrator;
                let earned = if own_goal {
                    -(damage as i64)
                } else {
                    damage as i64
                };
                cosmos.earn(self.perpetrator, earned);
                if killed {
                    if !own_goal {
                        cosmos.earn(self.perpetrator, KILL_BONUS);
                    }
                    events.push(GameEvent::PlayerKilled {
                        player: victim.id(),
                        perpetrator: self.perpetrator,
                    });
                }
                debug!(
                    victim = victim.id(),
                    perpetrator = self.perpetrator,
                    damage,
                    dist,
                    "direct damage"
                );
            }
        }
        terrain.carve(self.x, self.y, self.attributes.radius);
    }

    pub fn view(&self, now_ms: u64) -> ExplosionView {
        ExplosionView {
            x: self.x,
            y: self.y,
            radius: self.current_radius(now_ms),
            color: self.attributes.color,
        }
    }
}

/// Damage dealt to a player `dist` pixels from the center, or `None` when
/// the player is outside the blast.
///
/// Full damage inside the bullseye, falling linearly to zero at the edge.
pub fn damage_at(attributes: &ExplosionAttributes, dist: f32) -> Option<u32> {
    let safe = PLAYER_COLLISION_RADIUS + attributes.radius;
    if dist >= safe as f32 {
        return None;
    }
    let full = attributes.full_damage as i32;
    let damage = linear_interpolation(full, 0, BULLSEYE_RADIUS, safe, dist as i32);
    Some(damage.max(0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use salvo_core::enums::{PlayerColor, PlayerKind};
    use salvo_core::types::Argb;

    fn attrs(radius: i32, full_damage: u32) -> ExplosionAttributes {
        ExplosionAttributes {
            radius,
            full_damage,
            color: Argb::rgb(0xff, 0, 0),
        }
    }

    #[test]
    fn test_radius_grows_then_holds() {
        let e = Explosion::new(0, 0, WeaponKind::SmallMissile, attrs(20, 100), 1000, 0);
        assert_eq!(e.current_radius(1000), 0);
        assert_eq!(e.current_radius(1500), 10);
        assert_eq!(e.current_radius(5000), 20);
        assert!(!e.is_finished(2000), "finishes strictly after the duration");
        assert!(e.is_finished(2001));
    }

    #[test]
    fn test_damage_falloff() {
        let a = attrs(20, 200);
        assert_eq!(damage_at(&a, 0.0), Some(200));
        assert_eq!(damage_at(&a, BULLSEYE_RADIUS as f32), Some(200));
        assert_eq!(damage_at(&a, 23.0), Some(100), "halfway between bullseye and edge");
        assert_eq!(damage_at(&a, 29.9), Some(15));
        assert_eq!(damage_at(&a, 30.0), None);
    }

    #[test]
    fn test_resolve_pays_and_carves() {
        let mut terrain = Terrain::flat(200);
        let mut players = vec![
            Player::new(0, "Shooter", PlayerKind::Human, PlayerColor::Red, 100),
            Player::new(1, "Target", PlayerKind::Computer, PlayerColor::Blue, 100),
        ];
        players[0].place(20, &terrain);
        players[1].place(300, &terrain);
        let mut cosmos = Cosmos::new(2, 1, 0);
        let mut events = Vec::new();

        Explosion::new(300, 200, WeaponKind::MediumMissile, attrs(20, 175), 0, 0).resolve(
            &mut players,
            &mut terrain,
            &mut cosmos,
            &mut events,
        );

        assert_eq!(players[1].life(), 0);
        assert!(players[1].death_explosion_pending());
        assert_eq!(players[0].life(), 100, "shooter out of range");
        assert_eq!(cosmos.earnings(0), 175 + KILL_BONUS);
        assert_eq!(terrain.heights()[300], 220);
        assert!(events.contains(&GameEvent::PlayerKilled {
            player: 1,
            perpetrator: 0
        }));
    }

    #[test]
    fn test_self_damage_costs_money() {
        let mut terrain = Terrain::flat(200);
        let mut players = vec![Player::new(0, "Clumsy", PlayerKind::Human, PlayerColor::Red, 300)];
        players[0].place(100, &terrain);
        let mut cosmos = Cosmos::new(1, 1, 1000);
        let mut events = Vec::new();

        Explosion::new(100, 200, WeaponKind::SmallMissile, attrs(10, 125), 0, 0).resolve(
            &mut players,
            &mut terrain,
            &mut cosmos,
            &mut events,
        );
        assert_eq!(players[0].life(), 175);
        assert_eq!(cosmos.earnings(0), 1000 - 125);
    }

    #[test]
    fn test_earthmover_only_digs() {
        let mut terrain = Terrain::flat(200);
        let mut players = vec![Player::new(0, "Digger", PlayerKind::Human, PlayerColor::Red, 100)];
        players[0].place(100, &terrain);
        let mut cosmos = Cosmos::new(1, 1, 0);
        let mut events = Vec::new();

        Explosion::new(100, 200, WeaponKind::Earthmover, attrs(25, 0), 0, 0).resolve(
            &mut players,
            &mut terrain,
            &mut cosmos,
            &mut events,
        );
        assert_eq!(players[0].life(), 100);
        assert!(events.is_empty());
        assert_eq!(terrain.heights()[100], 225);
    }
}
