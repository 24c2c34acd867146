//! Projectiles in flight: ballistic shells and rolling payloads.

use glam::Vec2;

use salvo_core::constants::{
    FIELD_HEIGHT, FIELD_WIDTH, GRAVITY, MAX_PROJECTILE_STEPS, PLAYER_COLLISION_RADIUS,
    PROJECTILE_COLLISION_RADIUS, PROJECTILE_RADIUS, ROLLER_SPEED, WIND_DIVISOR,
};
use salvo_core::enums::WeaponKind;
use salvo_core::state::ProjectileView;
use salvo_terrain::{circle_chord, distance, Terrain};

use crate::player::Player;

/// How a projectile moves each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Free flight under gravity and wind.
    Ballistic,
    /// Hugging the ground, one column per step. `direction` is -1 or 1.
    Rolling { direction: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    position: Vec2,
    velocity: Vec2,
    wind_accel: f32,
    steps: u32,
    weapon: WeaponKind,
    motion: Motion,
    exploded: bool,
}

impl Projectile {
    /// A shell in free flight. `wind` is the round's integer wind.
    pub fn launch(weapon: WeaponKind, position: Vec2, velocity: Vec2, wind: i32) -> Self {
        Self {
            position,
            velocity,
            wind_accel: wind as f32 / WIND_DIVISOR,
            steps: 0,
            weapon,
            motion: Motion::Ballistic,
            exploded: false,
        }
    }

    /// A payload rolling along the surface from `position`.
    pub fn roller(weapon: WeaponKind, position: Vec2, direction: i32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            wind_accel: 0.0,
            steps: 0,
            weapon,
            motion: Motion::Rolling {
                direction: direction.signum(),
            },
            exploded: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn weapon(&self) -> WeaponKind {
        self.weapon
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Advance one step and report whether the projectile has exploded.
    pub fn step(&mut self, terrain: &Terrain, players: &[Player]) -> bool {
        if self.exploded {
            return true;
        }
        self.steps += 1;
        match self.motion {
            Motion::Ballistic => {
                self.position += self.velocity;
                self.velocity.y += GRAVITY;
                self.velocity.x += self.wind_accel;
                self.has_exploded(terrain, players);
            }
            Motion::Rolling { direction } => self.roll(direction, terrain, players),
        }
        if self.steps > MAX_PROJECTILE_STEPS {
            self.exploded = true;
        }
        self.exploded
    }

    fn roll(&mut self, direction: i32, terrain: &Terrain, players: &[Player]) {
        let here = self.position.x as i32;
        let next = here + direction * ROLLER_SPEED;
        if !(0..FIELD_WIDTH).contains(&next) {
            self.exploded = true;
            return;
        }
        // Heights grow downward: a smaller value ahead is rising ground.
        if terrain.safe_get(next) < terrain.safe_get(here) {
            self.exploded = true;
            return;
        }
        let ground = terrain.safe_get(next);
        self.position = Vec2::new(next as f32, (ground - PROJECTILE_COLLISION_RADIUS) as f32);
        if self.touches_player(players) {
            self.exploded = true;
        }
    }

    /// Collision test for a shell in flight. Sticky: once it reports true it
    /// stays true without looking at the world again.
    pub fn has_exploded(&mut self, terrain: &Terrain, players: &[Player]) -> bool {
        if self.exploded {
            return true;
        }
        let Vec2 { x, y } = self.position;
        self.exploded = x < 0.0
            || x > FIELD_WIDTH as f32
            || y > FIELD_HEIGHT as f32
            || self.touches_terrain(terrain)
            || self.touches_player(players);
        self.exploded
    }

    fn touches_terrain(&self, terrain: &Terrain) -> bool {
        let cx = self.position.x as i32;
        let cy = self.position.y as i32;
        let start = (cx - PROJECTILE_RADIUS).max(0);
        let end = (cx + PROJECTILE_RADIUS).min(FIELD_WIDTH);
        (start..end).any(|col| {
            circle_chord(cx, cy, PROJECTILE_COLLISION_RADIUS, col)
                .is_some_and(|chord| terrain.safe_get(col) < chord.y_lower)
        })
    }

    fn touches_player(&self, players: &[Player]) -> bool {
        let reach = (PLAYER_COLLISION_RADIUS + PROJECTILE_COLLISION_RADIUS) as f32;
        players.iter().filter(|p| p.is_alive()).any(|p| {
            distance(self.position.x, self.position.y, p.x() as f32, p.y() as f32) < reach
        })
    }

    pub fn view(&self) -> ProjectileView {
        ProjectileView {
            position: self.position,
            weapon: self.weapon,
        }
    }
}
