//! Terrain: the 1-D heightfield the round is played on.

use salvo_core::constants::{FIELD_HEIGHT, FIELD_WIDTH, TERRAIN_ANGLE_DELTA};

use crate::error::TerrainError;
use crate::geometry::circle_chord;

/// Ground height per column, `FIELD_WIDTH` columns wide.
///
/// Larger values are lower on screen. Every value stays in
/// `[0, FIELD_HEIGHT]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terrain {
    heights: Vec<i16>,
}

impl Terrain {
    /// Validate and wrap a heightfield.
    pub fn from_heights(heights: Vec<i16>) -> Result<Self, TerrainError> {
        if heights.len() != FIELD_WIDTH as usize {
            return Err(TerrainError::WrongWidth {
                expected: FIELD_WIDTH as usize,
                actual: heights.len(),
            });
        }
        if let Some((column, &height)) = heights
            .iter()
            .enumerate()
            .find(|(_, &h)| !(0..=FIELD_HEIGHT).contains(&(h as i32)))
        {
            return Err(TerrainError::HeightOutOfRange { column, height });
        }
        Ok(Self { heights })
    }

    /// Generators only ever produce in-range heights of the right width.
    pub(crate) fn from_generated(heights: Vec<i16>) -> Self {
        debug_assert_eq!(heights.len(), FIELD_WIDTH as usize);
        let heights = heights
            .into_iter()
            .map(|h| h.clamp(0, FIELD_HEIGHT as i16))
            .collect();
        Self { heights }
    }

    /// Level ground. `height` is clamped into the field.
    pub fn flat(height: i32) -> Self {
        let h = height.clamp(0, FIELD_HEIGHT) as i16;
        Self {
            heights: vec![h; FIELD_WIDTH as usize],
        }
    }

    pub fn heights(&self) -> &[i16] {
        &self.heights
    }

    /// Height at column `x`, treating anything off either edge as the edge
    /// column.
    pub fn safe_get(&self, x: i32) -> i32 {
        let last = self.heights.len() as i32 - 1;
        self.heights[x.clamp(0, last) as usize] as i32
    }

    /// Mean height over columns `a..=b`, edge-clamped.
    pub fn average_value(&self, a: i32, b: i32) -> Result<f32, TerrainError> {
        if a > b {
            return Err(TerrainError::InvertedRange { a, b });
        }
        Ok(self.mean_clamped(a, b))
    }

    fn mean_clamped(&self, a: i32, b: i32) -> f32 {
        let sum: i64 = (a..=b).map(|x| self.safe_get(x) as i64).sum();
        sum as f32 / (b - a + 1) as f32
    }

    /// Local slope at `x` in radians.
    ///
    /// Compares the mean of the `TERRAIN_ANGLE_DELTA` columns to the left of
    /// `x` with the mean of those to the right. Positive when the ground
    /// falls away to the right.
    pub fn terrain_angle(&self, x: i32) -> f32 {
        let y0 = self.mean_clamped(x - TERRAIN_ANGLE_DELTA, x);
        let y1 = self.mean_clamped(x, x + TERRAIN_ANGLE_DELTA);
        (y1 - y0).atan2((TERRAIN_ANGLE_DELTA * 2) as f32)
    }

    /// True if the first non-level step to the right of `x` goes downhill.
    /// Returns false if the ground stays level up to the right wall.
    pub fn has_downward_tangent(&self, x: i32) -> bool {
        let here = self.safe_get(x);
        for next in (x + 1)..FIELD_WIDTH {
            let diff = here - self.safe_get(next);
            if diff > 0 {
                return false;
            }
            if diff < 0 {
                return true;
            }
        }
        false
    }

    /// Blast a circular crater centered at `(cx, cy)`.
    ///
    /// Dirt above the blast is left alone. A blast fully below the surface
    /// collapses the ground by the chord length. A blast straddling the
    /// surface lowers the ground to the bottom of the circle.
    pub fn carve(&mut self, cx: i32, cy: i32, radius: i32) {
        let start = (cx - radius).max(0);
        let end = (cx + radius).min(FIELD_WIDTH);
        for slice in start..end {
            let Some(chord) = circle_chord(cx, cy, radius, slice) else {
                continue;
            };
            let h = self.heights[slice as usize] as i32;
            if chord.y_lower < h {
                continue;
            }
            let carved = if chord.y_upper > h {
                h + (chord.y_lower - chord.y_upper)
            } else {
                chord.y_lower
            };
            self.heights[slice as usize] = carved.clamp(0, FIELD_HEIGHT) as i16;
        }
    }
}
