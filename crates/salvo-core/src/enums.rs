//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::types::Argb;

/// Terrain generation profile, chosen at game setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainProfile {
    /// Straight ramp from the top-left to the bottom-right.
    Triangular,
    /// Level ground at a random elevation.
    Flat,
    /// Short smoothing window: spiky ground.
    Jagged,
    /// Medium smoothing window.
    Hilly,
    /// Long smoothing window: broad, gentle hills.
    #[default]
    Rolling,
}

impl TerrainProfile {
    pub const ALL: [TerrainProfile; 5] = [
        TerrainProfile::Triangular,
        TerrainProfile::Flat,
        TerrainProfile::Jagged,
        TerrainProfile::Hilly,
        TerrainProfile::Rolling,
    ];
}

/// Who drives a player's turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerKind {
    #[default]
    Human,
    Computer,
}

/// The fixed palette players pick their colors from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    #[default]
    Red,
    Orange,
    Brown,
    Yellow,
    Green,
    Cyan,
    Blue,
    Pink,
    Purple,
    Grey,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 10] = [
        PlayerColor::Red,
        PlayerColor::Orange,
        PlayerColor::Brown,
        PlayerColor::Yellow,
        PlayerColor::Green,
        PlayerColor::Cyan,
        PlayerColor::Blue,
        PlayerColor::Pink,
        PlayerColor::Purple,
        PlayerColor::Grey,
    ];

    /// Opaque base color.
    pub fn argb(self) -> Argb {
        match self {
            PlayerColor::Red => Argb::rgb(0xef, 0x29, 0x29),
            PlayerColor::Orange => Argb::rgb(0xff, 0xbb, 0x44),
            PlayerColor::Brown => Argb::rgb(0xa6, 0x7a, 0x3e),
            PlayerColor::Yellow => Argb::rgb(0xfc, 0xe9, 0x4f),
            PlayerColor::Green => Argb::rgb(0x06, 0xd0, 0x30),
            PlayerColor::Cyan => Argb::rgb(0x8d, 0xef, 0xef),
            PlayerColor::Blue => Argb::rgb(0x72, 0x9f, 0xcf),
            PlayerColor::Pink => Argb::rgb(0xff, 0x83, 0xe9),
            PlayerColor::Purple => Argb::rgb(0xad, 0x7f, 0xa8),
            PlayerColor::Grey => Argb::rgb(0xd3, 0xd7, 0xcf),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerColor::Red => "red",
            PlayerColor::Orange => "orange",
            PlayerColor::Brown => "brown",
            PlayerColor::Yellow => "yellow",
            PlayerColor::Green => "green",
            PlayerColor::Cyan => "cyan",
            PlayerColor::Blue => "blue",
            PlayerColor::Pink => "pink",
            PlayerColor::Purple => "purple",
            PlayerColor::Grey => "grey",
        }
    }
}

/// Discrete buttons delivered by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameButton {
    ArmoryLeft,
    ArmoryRight,
    Done,
    Ok,
    PressFire,
    ReleaseFire,
}

/// Identifies a turn-state variant. The numeric tag is stable and is what
/// save maps record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateId {
    Leaderboard,
    AnnounceWinner,
    BuyWeapons,
    #[default]
    TurnStart,
    HumanMove,
    ComputerMove,
    Ballistics,
    Teleport,
    ExtraArmor,
}

impl StateId {
    pub fn tag(self) -> u8 {
        match self {
            StateId::Leaderboard => 0,
            StateId::AnnounceWinner => 1,
            StateId::BuyWeapons => 5,
            StateId::TurnStart => 10,
            StateId::HumanMove => 15,
            StateId::ComputerMove => 16,
            StateId::Ballistics => 20,
            StateId::Teleport => 25,
            StateId::ExtraArmor => 26,
        }
    }

    pub fn from_tag(tag: u8) -> Option<StateId> {
        match tag {
            0 => Some(StateId::Leaderboard),
            1 => Some(StateId::AnnounceWinner),
            5 => Some(StateId::BuyWeapons),
            10 => Some(StateId::TurnStart),
            15 => Some(StateId::HumanMove),
            16 => Some(StateId::ComputerMove),
            20 => Some(StateId::Ballistics),
            25 => Some(StateId::Teleport),
            26 => Some(StateId::ExtraArmor),
            _ => None,
        }
    }
}

/// Every kind of weapon, in the fixed order the armory cycles through.
///
/// The last four kinds are payloads created by other weapons; they can never
/// be owned, bought, or selected.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum WeaponKind {
    #[default]
    SmallMissile,
    MediumMissile,
    LargeMissile,
    Earthmover,
    LargeEarthmover,
    ExtraArmor,
    Teleporter,
    Doomhammer,
    Roller,
    LargeRoller,
    ClusterBomb,
    ExtraLargeClusterBomb,
    RollerPayload,
    LargeRollerPayload,
    ClusterFragment,
    PlayerDeath,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 16] = [
        WeaponKind::SmallMissile,
        WeaponKind::MediumMissile,
        WeaponKind::LargeMissile,
        WeaponKind::Earthmover,
        WeaponKind::LargeEarthmover,
        WeaponKind::ExtraArmor,
        WeaponKind::Teleporter,
        WeaponKind::Doomhammer,
        WeaponKind::Roller,
        WeaponKind::LargeRoller,
        WeaponKind::ClusterBomb,
        WeaponKind::ExtraLargeClusterBomb,
        WeaponKind::RollerPayload,
        WeaponKind::LargeRollerPayload,
        WeaponKind::ClusterFragment,
        WeaponKind::PlayerDeath,
    ];

    /// Position in `ALL`.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Stable key used in save maps.
    pub fn key(self) -> &'static str {
        match self {
            WeaponKind::SmallMissile => "small_missile",
            WeaponKind::MediumMissile => "medium_missile",
            WeaponKind::LargeMissile => "large_missile",
            WeaponKind::Earthmover => "earthmover",
            WeaponKind::LargeEarthmover => "large_earthmover",
            WeaponKind::ExtraArmor => "extra_armor",
            WeaponKind::Teleporter => "teleporter",
            WeaponKind::Doomhammer => "doomhammer",
            WeaponKind::Roller => "roller",
            WeaponKind::LargeRoller => "large_roller",
            WeaponKind::ClusterBomb => "cluster_bomb",
            WeaponKind::ExtraLargeClusterBomb => "extra_large_cluster_bomb",
            WeaponKind::RollerPayload => "roller_payload",
            WeaponKind::LargeRollerPayload => "large_roller_payload",
            WeaponKind::ClusterFragment => "cluster_fragment",
            WeaponKind::PlayerDeath => "player_death",
        }
    }

    pub fn from_key(key: &str) -> Option<WeaponKind> {
        WeaponKind::ALL.into_iter().find(|k| k.key() == key)
    }
}

/// What happens when a weapon's carrier collides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetonationKind {
    #[default]
    Explode,
    MakeRoller,
    MakeCluster,
    /// Consumed by a state transition instead of detonating.
    None,
}
