//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Weapon family striking the shield.
///
/// The discriminant is the visual type code the field compositor keys its
/// overlays on (laser shimmer at 0, EMP scanlines at 4, ion streaks at 5).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    #[default]
    Laser = 0,
    Plasma = 1,
    Kinetic = 2,
    Railgun = 3,
    Emp = 4,
    Ion = 5,
}

impl WeaponKind {
    /// Every weapon in type-code order.
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::Laser,
        WeaponKind::Plasma,
        WeaponKind::Kinetic,
        WeaponKind::Railgun,
        WeaponKind::Emp,
        WeaponKind::Ion,
    ];

    /// Visual type code (0..5).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a weapon by its type code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Lowercase identifier, as used by configs and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Laser => "laser",
            WeaponKind::Plasma => "plasma",
            WeaponKind::Kinetic => "kinetic",
            WeaponKind::Railgun => "railgun",
            WeaponKind::Emp => "emp",
            WeaponKind::Ion => "ion",
        }
    }

    /// Look up a weapon by its lowercase identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.name() == name)
    }
}

/// Base pattern family drawn across the whole shield surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Fresnel, flow noise and impacts only.
    #[default]
    None = 0,
    /// Hexagonal cell grid that lights up around impacts.
    HexCells = 1,
    /// Crossed longitude/latitude field lines.
    MagneticField = 2,
    /// Glass-like shell with a hard fresnel edge.
    HardLight = 3,
    /// Slow plasma turbulence bands.
    Plasma = 4,
    /// Triangular geodesic lattice.
    Geodesic = 5,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::None,
        Preset::HexCells,
        Preset::MagneticField,
        Preset::HardLight,
        Preset::Plasma,
        Preset::Geodesic,
    ];

    pub fn index(self) -> u32 {
        self as u32
    }

    /// Look up a preset by its selector index.
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// How a shot gets from the muzzle to the shield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TravelBehavior {
    /// Instantaneous beam: the impact lands the moment the weapon fires.
    Beam,
    /// Finite-speed projectile reaching the target after `travel_secs`.
    /// A zero travel time lands on the projectile's first update.
    Projectile { travel_secs: f64 },
}

impl TravelBehavior {
    /// Flight time in seconds (zero for beams).
    pub fn travel_secs(self) -> f64 {
        match self {
            TravelBehavior::Beam => 0.0,
            TravelBehavior::Projectile { travel_secs } => travel_secs,
        }
    }

    pub fn is_beam(self) -> bool {
        matches!(self, TravelBehavior::Beam)
    }
}

/// Lifecycle phase of a scheduled effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectPhase {
    /// Registered but not yet admitted to the active set.
    #[default]
    Spawned,
    /// Receiving per-tick updates.
    Active,
    /// Expired or force-cleared; no further updates.
    Retired,
}
