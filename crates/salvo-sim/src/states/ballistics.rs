//! Shells in flight, detonations, and their aftermath.

use std::f32::consts::PI;

use glam::Vec2;
use tracing::debug;

use salvo_core::constants::{
    ANIMATION_TICK_MS, CLUSTER_FRAGMENT_SPEED, CLUSTER_SPAWN_OFFSET, DESELECTED_AURA_ALPHA,
    MAX_PROJECTILES, POWER_TO_SPEED, PROJECTILE_COLLISION_RADIUS,
};
use salvo_core::enums::{DetonationKind, StateId, WeaponKind};
use salvo_core::events::GameEvent;

use crate::error::{SaveError, SimError, StateError};
use crate::explosion::Explosion;
use crate::projectile::Projectile;
use crate::save::SaveMap;
use crate::weapons::{WeaponKindExt, WeaponTraits};

use super::{BlockingDelay, GameState, StateContext, Transition, TurnStart, TurnState};

/// Speed multiplier for extra-large cluster fragments.
const EXTRA_LARGE_FRAGMENT_SCALE: f32 = 1.4;

#[derive(Debug)]
pub struct Ballistics {
    power: i32,
    weapon: WeaponKind,
    perpetrator: usize,
    projectiles: Vec<Projectile>,
    explosions: Vec<Explosion>,
}

impl Ballistics {
    pub fn new(power: i32, weapon: WeaponKind) -> Self {
        Self {
            power,
            weapon,
            perpetrator: 0,
            projectiles: Vec::new(),
            explosions: Vec::new(),
        }
    }

    pub fn power(&self) -> i32 {
        self.power
    }

    pub fn weapon(&self) -> WeaponKind {
        self.weapon
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub(super) fn restore(map: &SaveMap) -> Result<Self, SaveError> {
        Ok(Self::new(
            map.get("ballistics_power")?,
            map.get_weapon("ballistics_weapon")?,
        ))
    }

    fn add_projectile(&mut self, projectile: Projectile) -> Result<(), StateError> {
        if self.projectiles.len() >= MAX_PROJECTILES {
            return Err(StateError::ProjectileLimit(MAX_PROJECTILES));
        }
        self.projectiles.push(projectile);
        Ok(())
    }

    /// Trigger `kind` at `pos`.
    fn detonate(
        &mut self,
        ctx: &mut StateContext<'_>,
        kind: WeaponKind,
        pos: Vec2,
    ) -> Result<(), SimError> {
        let spec = kind.spec();
        let (x, y) = (pos.x as i32, pos.y as i32);
        ctx.emit(GameEvent::Detonated { weapon: kind, x, y });
        debug!(?kind, x, y, "detonate");
        let terrain = ctx.model.terrain();
        match spec.detonation {
            DetonationKind::Explode => {
                let attributes = spec.explosion.ok_or(StateError::NotDetonatable(kind))?;
                self.explosions.push(Explosion::new(
                    x,
                    y,
                    kind,
                    attributes,
                    ctx.now_ms,
                    self.perpetrator,
                ));
            }
            DetonationKind::MakeRoller => {
                let payload = if spec.traits.contains(WeaponTraits::LARGE) {
                    WeaponKind::LargeRollerPayload
                } else {
                    WeaponKind::RollerPayload
                };
                let slope = terrain.terrain_angle(x);
                let downhill_right = if slope == 0.0 {
                    terrain.has_downward_tangent(x)
                } else {
                    slope > 0.0
                };
                let direction = if downhill_right { 1 } else { -1 };
                let start = Vec2::new(
                    x as f32,
                    (terrain.safe_get(x) - PROJECTILE_COLLISION_RADIUS) as f32,
                );
                self.add_projectile(Projectile::roller(payload, start, direction))?;
            }
            DetonationKind::MakeCluster => {
                let (count, scale) = if spec.traits.contains(WeaponTraits::EXTRA_LARGE) {
                    (5, EXTRA_LARGE_FRAGMENT_SCALE)
                } else {
                    (4, 1.0)
                };
                // Fan across the half-circle above the local surface.
                let slope = terrain.terrain_angle(x);
                let speed = CLUSTER_FRAGMENT_SPEED * scale;
                let wind = ctx.model.wind();
                for i in 0..count {
                    let phi = slope - PI + PI * (i as f32 + 0.5) / count as f32;
                    let dir = Vec2::new(phi.cos(), phi.sin());
                    self.add_projectile(Projectile::launch(
                        WeaponKind::ClusterFragment,
                        pos + dir * CLUSTER_SPAWN_OFFSET,
                        dir * speed,
                        wind,
                    ))?;
                }
            }
            DetonationKind::None => return Err(StateError::NotDetonatable(kind).into()),
        }
        Ok(())
    }
}

impl TurnState for Ballistics {
    fn id(&self) -> StateId {
        StateId::Ballistics
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        let shooter = ctx.model.current();
        self.perpetrator = shooter.id();
        let (sin, cos) = shooter.angle_rad().sin_cos();
        let velocity = Vec2::new(cos, -sin) * (self.power as f32 / POWER_TO_SPEED);
        let shell = Projectile::launch(self.weapon, shooter.turret_tip(), velocity, ctx.model.wind());
        self.projectiles.clear();
        self.explosions.clear();
        self.add_projectile(shell)?;
        Ok(())
    }

    fn main(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition, SimError> {
        // Move everything in flight, collecting what blew up.
        let mut detonations = Vec::new();
        {
            let terrain = ctx.model.terrain();
            let players = ctx.model.players();
            self.projectiles.retain_mut(|p| {
                if p.step(terrain, players) {
                    detonations.push((p.weapon(), p.position()));
                    false
                } else {
                    true
                }
            });
        }
        for (kind, pos) in detonations {
            self.detonate(ctx, kind, pos)?;
        }

        // Finished explosions hurt, dig, and drop tanks exactly once.
        let now = ctx.now_ms;
        let (finished, burning): (Vec<_>, Vec<_>) = std::mem::take(&mut self.explosions)
            .into_iter()
            .partition(|e| e.is_finished(now));
        self.explosions = burning;
        for explosion in finished {
            let (terrain, players) = ctx.model.split_mut();
            explosion.resolve(players, terrain, ctx.cosmos, ctx.events);
            for (player, distance) in ctx.model.settle_players() {
                ctx.emit(GameEvent::PlayerFell { player, distance });
            }
        }

        // Fresh corpses go off.
        let mut deaths = Vec::new();
        for p in ctx.model.players_mut() {
            if p.take_death_explosion() {
                deaths.push(Vec2::new(p.x() as f32, p.y() as f32));
            }
        }
        for pos in deaths {
            self.detonate(ctx, WeaponKind::PlayerDeath, pos)?;
        }

        if self.projectiles.is_empty() && self.explosions.is_empty() {
            return Ok(Transition::Next(GameState::TurnStart(TurnStart::new())));
        }
        Ok(Transition::Stay)
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_>) -> Result<(), SimError> {
        ctx.model.current_mut().set_aura_alpha(DESELECTED_AURA_ALPHA);
        Ok(())
    }

    fn blocking_delay(&self) -> Result<BlockingDelay, StateError> {
        Ok(BlockingDelay::Millis(ANIMATION_TICK_MS))
    }

    fn save(&self, map: &mut SaveMap) -> Result<(), SaveError> {
        map.put("ballistics_power", self.power)?;
        map.put("ballistics_weapon", self.weapon.key())
    }
}
