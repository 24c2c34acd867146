//! Weapon catalog and per-player armory.
//!
//! The catalog is a static table indexed by `WeaponKind` ordinal. Behavior
//! dispatch elsewhere matches on `DetonationKind` and tests trait flags; it
//! never looks weapons up by name.

use std::collections::BTreeMap;
use std::ops::BitOr;

use tracing::debug;

use salvo_core::enums::{DetonationKind, WeaponKind};
use salvo_core::types::Argb;

use crate::error::ArmoryError;

/// Small set of weapon trait flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeaponTraits(u16);

impl WeaponTraits {
    pub const NONE: Self = Self(0);
    /// Fired ballistically from the turret.
    pub const PROJECTILE: Self = Self(1 << 0);
    pub const TELEPORTER: Self = Self(1 << 1);
    pub const EXTRA_ARMOR: Self = Self(1 << 2);
    /// Slides downhill after landing.
    pub const ROLLER: Self = Self(1 << 3);
    /// Splits into fragments on impact.
    pub const CLUSTER: Self = Self(1 << 4);
    /// Moves dirt without hurting anyone.
    pub const EARTHMOVER: Self = Self(1 << 5);
    pub const LARGE: Self = Self(1 << 6);
    pub const EXTRA_LARGE: Self = Self(1 << 7);
    /// Payload created by another weapon; never owned.
    pub const PAYLOAD: Self = Self(1 << 8);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for WeaponTraits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// How many of a weapon a player holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stock {
    Unlimited,
    Count(u32),
}

impl Stock {
    pub fn is_available(self) -> bool {
        match self {
            Stock::Unlimited => true,
            Stock::Count(n) => n > 0,
        }
    }

    /// Save-map encoding: `-1` means unlimited.
    pub fn to_raw(self) -> i64 {
        match self {
            Stock::Unlimited => -1,
            Stock::Count(n) => n as i64,
        }
    }

    pub fn from_raw(raw: i64) -> Option<Stock> {
        match raw {
            -1 => Some(Stock::Unlimited),
            n if (0..=u32::MAX as i64).contains(&n) => Some(Stock::Count(n as u32)),
            _ => None,
        }
    }
}

/// Blast profile for weapons that explode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplosionAttributes {
    pub radius: i32,
    pub full_damage: u32,
    pub color: Argb,
}

const RED: Argb = Argb::rgb(0xff, 0, 0);
const GREY: Argb = Argb::rgb(0xaa, 0xaa, 0xaa);

const fn blast(radius: i32, full_damage: u32) -> Option<ExplosionAttributes> {
    Some(ExplosionAttributes {
        radius,
        full_damage,
        color: if full_damage == 0 { GREY } else { RED },
    })
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    pub name: &'static str,
    pub price: i64,
    pub starting: Stock,
    /// Present iff `detonation` is `Explode`.
    pub explosion: Option<ExplosionAttributes>,
    pub detonation: DetonationKind,
    pub traits: WeaponTraits,
    pub description: &'static str,
}

impl WeaponSpec {
    pub fn is_projectile(&self) -> bool {
        self.traits.contains(WeaponTraits::PROJECTILE)
    }

    pub fn is_teleporter(&self) -> bool {
        self.traits.contains(WeaponTraits::TELEPORTER)
    }

    pub fn is_extra_armor(&self) -> bool {
        self.traits.contains(WeaponTraits::EXTRA_ARMOR)
    }

    /// Can be owned, bought, and selected.
    pub fn is_selectable(&self) -> bool {
        !self.traits.contains(WeaponTraits::PAYLOAD)
    }
}

const T_PROJ: WeaponTraits = WeaponTraits::PROJECTILE;

static CATALOG: [WeaponSpec; 16] = [
    WeaponSpec {
        kind: WeaponKind::SmallMissile,
        name: "Small Missile",
        price: 0,
        starting: Stock::Unlimited,
        explosion: blast(10, 125),
        detonation: DetonationKind::Explode,
        traits: T_PROJ,
        description: "A small but reliable missile. You never run out.",
    },
    WeaponSpec {
        kind: WeaponKind::MediumMissile,
        name: "Medium Missile",
        price: 300,
        starting: Stock::Count(2),
        explosion: blast(20, 175),
        detonation: DetonationKind::Explode,
        traits: T_PROJ,
        description: "A bigger blast for a modest price.",
    },
    WeaponSpec {
        kind: WeaponKind::LargeMissile,
        name: "Large Missile",
        price: 750,
        starting: Stock::Count(0),
        explosion: blast(35, 200),
        detonation: DetonationKind::Explode,
        traits: T_PROJ,
        description: "Wide radius, heavy damage.",
    },
    WeaponSpec {
        kind: WeaponKind::Earthmover,
        name: "Earthmover",
        price: 250,
        starting: Stock::Count(0),
        explosion: blast(25, 0),
        detonation: DetonationKind::Explode,
        traits: T_PROJ.union(WeaponTraits::EARTHMOVER),
        description: "Digs a crater without hurting anyone. Good for dropping enemies.",
    },
    WeaponSpec {
        kind: WeaponKind::LargeEarthmover,
        name: "Large Earthmover",
        price: 500,
        starting: Stock::Count(0),
        explosion: blast(42, 0),
        detonation: DetonationKind::Explode,
        traits: T_PROJ
            .union(WeaponTraits::EARTHMOVER)
            .union(WeaponTraits::LARGE),
        description: "Digs a very large crater.",
    },
    WeaponSpec {
        kind: WeaponKind::ExtraArmor,
        name: "Extra Armor",
        price: 500,
        starting: Stock::Count(0),
        explosion: None,
        detonation: DetonationKind::None,
        traits: WeaponTraits::EXTRA_ARMOR,
        description: "Restores 100 life, up to the maximum.",
    },
    WeaponSpec {
        kind: WeaponKind::Teleporter,
        name: "Teleporter",
        price: 400,
        starting: Stock::Count(0),
        explosion: None,
        detonation: DetonationKind::None,
        traits: WeaponTraits::TELEPORTER,
        description: "Swap places with another tank.",
    },
    WeaponSpec {
        kind: WeaponKind::Doomhammer,
        name: "Doomhammer",
        price: 2500,
        starting: Stock::Count(0),
        explosion: blast(60, 300),
        detonation: DetonationKind::Explode,
        traits: T_PROJ.union(WeaponTraits::EXTRA_LARGE),
        description: "Flattens everything nearby.",
    },
    WeaponSpec {
        kind: WeaponKind::Roller,
        name: "Roller",
        price: 400,
        starting: Stock::Count(0),
        explosion: None,
        detonation: DetonationKind::MakeRoller,
        traits: T_PROJ.union(WeaponTraits::ROLLER),
        description: "Lands, then rolls downhill until it hits something.",
    },
    WeaponSpec {
        kind: WeaponKind::LargeRoller,
        name: "Large Roller",
        price: 800,
        starting: Stock::Count(0),
        explosion: None,
        detonation: DetonationKind::MakeRoller,
        traits: T_PROJ
            .union(WeaponTraits::ROLLER)
            .union(WeaponTraits::LARGE),
        description: "A roller with a larger warhead.",
    },
    WeaponSpec {
        kind: WeaponKind::ClusterBomb,
        name: "Cluster Bomb",
        price: 600,
        starting: Stock::Count(0),
        explosion: None,
        detonation: DetonationKind::MakeCluster,
        traits: T_PROJ
            .union(WeaponTraits::CLUSTER)
            .union(WeaponTraits::LARGE),
        description: "Bursts into four fragments on impact.",
    },
    WeaponSpec {
        kind: WeaponKind::ExtraLargeClusterBomb,
        name: "Extra-Large Cluster Bomb",
        price: 1200,
        starting: Stock::Count(0),
        explosion: None,
        detonation: DetonationKind::MakeCluster,
        traits: T_PROJ
            .union(WeaponTraits::CLUSTER)
            .union(WeaponTraits::EXTRA_LARGE),
        description: "Bursts into five fast fragments on impact.",
    },
    WeaponSpec {
        kind: WeaponKind::RollerPayload,
        name: "Roller Payload",
        price: 0,
        starting: Stock::Count(0),
        explosion: blast(20, 150),
        detonation: DetonationKind::Explode,
        traits: T_PROJ.union(WeaponTraits::PAYLOAD),
        description: "",
    },
    WeaponSpec {
        kind: WeaponKind::LargeRollerPayload,
        name: "Large Roller Payload",
        price: 0,
        starting: Stock::Count(0),
        explosion: blast(30, 200),
        detonation: DetonationKind::Explode,
        traits: T_PROJ.union(WeaponTraits::PAYLOAD),
        description: "",
    },
    WeaponSpec {
        kind: WeaponKind::ClusterFragment,
        name: "Cluster Fragment",
        price: 0,
        starting: Stock::Count(0),
        explosion: blast(15, 100),
        detonation: DetonationKind::Explode,
        traits: T_PROJ.union(WeaponTraits::PAYLOAD),
        description: "",
    },
    WeaponSpec {
        kind: WeaponKind::PlayerDeath,
        name: "Player Death",
        price: 0,
        starting: Stock::Count(0),
        explosion: blast(30, 100),
        detonation: DetonationKind::Explode,
        traits: WeaponTraits::PAYLOAD,
        description: "",
    },
];

/// Catalog entry for `kind`.
pub fn spec(kind: WeaponKind) -> &'static WeaponSpec {
    &CATALOG[kind.ordinal()]
}

/// Convenience access to the catalog from a `WeaponKind`.
pub trait WeaponKindExt {
    fn spec(self) -> &'static WeaponSpec;
}

impl WeaponKindExt for WeaponKind {
    fn spec(self) -> &'static WeaponSpec {
        spec(self)
    }
}

/// Weapons owned by one player. Entries with no stock are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Armory {
    stock: BTreeMap<WeaponKind, Stock>,
}

impl Default for Armory {
    fn default() -> Self {
        Self::starting()
    }
}

impl Armory {
    /// What every player owns at the start of a game.
    pub fn starting() -> Self {
        let stock = CATALOG
            .iter()
            .filter(|s| s.is_selectable() && s.starting.is_available())
            .map(|s| (s.kind, s.starting))
            .collect();
        Self { stock }
    }

    /// Rebuild from saved entries. Small missiles stay unlimited no matter
    /// what the entries say.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (WeaponKind, Stock)>,
    ) -> Result<Self, ArmoryError> {
        let mut stock = BTreeMap::new();
        for (kind, amount) in entries {
            if !spec(kind).is_selectable() {
                return Err(ArmoryError::NotSelectable(kind));
            }
            if amount.is_available() {
                stock.insert(kind, amount);
            }
        }
        stock.insert(WeaponKind::SmallMissile, Stock::Unlimited);
        Ok(Self { stock })
    }

    pub fn amount(&self, kind: WeaponKind) -> Option<Stock> {
        self.stock.get(&kind).copied()
    }

    pub fn has(&self, kind: WeaponKind) -> bool {
        self.amount(kind).is_some_and(Stock::is_available)
    }

    /// Owned weapons in cycle order.
    pub fn iter(&self) -> impl Iterator<Item = (WeaponKind, Stock)> + '_ {
        self.stock.iter().map(|(k, s)| (*k, *s))
    }

    /// Next owned weapon after `cur`, wrapping. Returns `cur` itself when it
    /// is the only weapon left.
    pub fn next_weapon(&self, cur: WeaponKind) -> Result<WeaponKind, ArmoryError> {
        self.scan(cur, 1)
    }

    /// Previous owned weapon before `cur`, wrapping.
    pub fn prev_weapon(&self, cur: WeaponKind) -> Result<WeaponKind, ArmoryError> {
        self.scan(cur, WeaponKind::ALL.len() - 1)
    }

    fn scan(&self, cur: WeaponKind, stride: usize) -> Result<WeaponKind, ArmoryError> {
        let n = WeaponKind::ALL.len();
        let mut idx = cur.ordinal();
        for _ in 0..n {
            idx = (idx + stride) % n;
            let kind = WeaponKind::ALL[idx];
            if self.has(kind) {
                return Ok(kind);
            }
        }
        Err(ArmoryError::Empty)
    }

    /// Add one unit. Unlimited weapons are unaffected.
    pub fn buy(&mut self, kind: WeaponKind) -> Result<(), ArmoryError> {
        if !spec(kind).is_selectable() {
            return Err(ArmoryError::NotPurchasable(kind));
        }
        let entry = self.stock.entry(kind).or_insert(Stock::Count(0));
        if let Stock::Count(n) = entry {
            *n += 1;
        }
        debug!(?kind, stock = ?self.stock.get(&kind), "bought weapon");
        Ok(())
    }

    /// Spend one unit and return the weapon that should be selected
    /// afterwards: `kind` itself while any remain, otherwise the next one.
    pub fn use_weapon(&mut self, kind: WeaponKind) -> Result<WeaponKind, ArmoryError> {
        if !spec(kind).is_selectable() {
            return Err(ArmoryError::NotSelectable(kind));
        }
        match self.stock.get_mut(&kind) {
            Some(Stock::Unlimited) => Ok(kind),
            Some(Stock::Count(n)) if *n > 1 => {
                *n -= 1;
                Ok(kind)
            }
            Some(Stock::Count(1)) => {
                self.stock.remove(&kind);
                self.next_weapon(kind)
            }
            _ => Err(ArmoryError::Exhausted(kind)),
        }
    }
}
