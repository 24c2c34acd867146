//! Terrain generation profiles.
//!
//! All randomness comes from the caller's RNG so a seeded game always
//! produces the same ground.

use rand::Rng;
use tracing::debug;

use salvo_core::constants::{FIELD_HEIGHT, FIELD_WIDTH};
use salvo_core::enums::TerrainProfile;

use crate::heightfield::Terrain;

/// Smoothing window for each noise-based profile.
pub fn window_size(profile: TerrainProfile) -> Option<usize> {
    match profile {
        TerrainProfile::Jagged => Some(3),
        TerrainProfile::Hilly => Some(10),
        TerrainProfile::Rolling => Some(45),
        TerrainProfile::Triangular | TerrainProfile::Flat => None,
    }
}

/// Build a fresh heightfield for one round.
pub fn generate(profile: TerrainProfile, rng: &mut impl Rng) -> Terrain {
    let heights = match profile {
        TerrainProfile::Triangular => (0..FIELD_WIDTH)
            .map(|i| (FIELD_HEIGHT * i / FIELD_WIDTH) as i16)
            .collect(),
        TerrainProfile::Flat => {
            let h = random_elevation(rng, 0.4, 0.6);
            vec![h; FIELD_WIDTH as usize]
        }
        TerrainProfile::Jagged | TerrainProfile::Hilly | TerrainProfile::Rolling => {
            let samples: Vec<i16> = (0..FIELD_WIDTH)
                .map(|_| rng.gen_range(0..FIELD_HEIGHT) as i16)
                .collect();
            let window = window_size(profile).unwrap_or(1);
            moving_average(&samples, window)
        }
    };
    debug!(?profile, "generated terrain");
    Terrain::from_generated(heights)
}

/// A height whose distance from the top of the field lies between
/// `bot` and `top` fractions of the field height.
fn random_elevation(rng: &mut impl Rng, bot: f32, top: f32) -> i16 {
    let span = ((FIELD_HEIGHT as f32 * (top - bot)) as i32).max(1);
    let offset = rng.gen_range(0..span) + (bot * FIELD_HEIGHT as f32) as i32;
    (FIELD_HEIGHT - offset) as i16
}

/// Forward moving average with wrap-around at the right edge.
pub fn moving_average(input: &[i16], window: usize) -> Vec<i16> {
    let n = input.len();
    if n == 0 || window == 0 {
        return input.to_vec();
    }
    (0..n)
        .map(|i| {
            let sum: i32 = (0..window).map(|j| input[(i + j) % n] as i32).sum();
            (sum / window as i32) as i16
        })
        .collect()
}
