//! Terrain system for SALVO.
//!
//! The destructible heightfield, the circle geometry used for collisions and
//! craters, and the per-round terrain generators.

pub use salvo_core as core;

pub mod error;
pub mod generate;
pub mod geometry;
pub mod heightfield;

// Re-export key types for convenience.
pub use error::TerrainError;
pub use generate::generate;
pub use geometry::{circle_chord, distance, linear_interpolation, Chord};
pub use heightfield::Terrain;
