//! Player input delivered to the active turn state.
//!
//! Handlers report whether the controller thread should be woken up.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    /// A discrete button press or release.
    Button { button: GameButton },
    /// Pointer held or dragged on the playing field, in field coordinates.
    /// Aims the current player's turret at the point.
    PointerDrag { x: f32, y: f32 },
    /// Absolute turret angle from a slider. Clamped to `[0, 180]`.
    SetAngle { degrees: i32 },
    /// Buy one unit of a weapon for a player during the shopping phase.
    Buy { player: usize, kind: WeaponKind },
}

impl InputEvent {
    pub fn button(button: GameButton) -> Self {
        InputEvent::Button { button }
    }
}
