//! Fundamental value types.

use serde::{Deserialize, Serialize};

/// Packed 32-bit color, `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argb(pub u32);

impl Argb {
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(0xff, r, g, b)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Same color with the alpha channel replaced.
    pub fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00ff_ffff) | ((alpha as u32) << 24))
    }

    /// Per-channel blend toward `other`. `percent` is clamped to `0..=100`.
    pub fn blend(self, other: Argb, percent: u32) -> Self {
        let p = percent.min(100) as i32;
        let mix = |a: u8, b: u8| -> u8 {
            let (a, b) = (a as i32, b as i32);
            (a + (b - a) * p / 100) as u8
        };
        Self::new(
            mix(self.alpha(), other.alpha()),
            mix(self.red(), other.red()),
            mix(self.green(), other.green()),
            mix(self.blue(), other.blue()),
        )
    }
}

/// Round bookkeeping shared by snapshots and the leaderboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundInfo {
    /// Current round, counting from 1.
    pub round: u32,
    pub total_rounds: u32,
}

impl RoundInfo {
    pub fn more_rounds_remaining(&self) -> bool {
        self.round < self.total_rounds
    }
}
