//! Weapon table and the pure weapon-to-effect mapping.
//!
//! Consolidates per-weapon numbers: how hard each weapon hits, how much heat
//! it dumps into the shield, how it travels and what its transient visuals
//! look like.

use shieldlab_core::constants::*;
use shieldlab_core::enums::{TravelBehavior, WeaponKind};
use shieldlab_core::events::FireOutcome;
use shieldlab_core::types::Rgb;

/// Static description of one weapon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    /// Damage per unit of base damage.
    pub damage_mult: f64,
    /// Heat added per unit of damage.
    pub heat_rate: f64,
    /// Extra heat per unit of damage, on top of `heat_rate`.
    pub heat_surcharge: f64,
    pub travel: TravelBehavior,
    /// Spark density in [0, 1]; drives burst size, spread and life.
    pub spark: f64,
    /// Beam or projectile color.
    pub color: Rgb,
    /// Beam radius (world units). Unused by projectiles.
    pub beam_thickness: f64,
    /// How long a beam stays visible (seconds).
    pub beam_life: f64,
    /// Beam opacity at the moment of firing.
    pub beam_peak_opacity: f64,
    /// Projectile core radius (world units). Unused by beams.
    pub projectile_radius: f64,
}

/// Get the table entry for a weapon.
pub fn weapon_spec(kind: WeaponKind) -> WeaponSpec {
    match kind {
        WeaponKind::Laser => WeaponSpec {
            kind,
            damage_mult: 0.55,
            heat_rate: HEAT_RATE_LASER,
            heat_surcharge: 0.0,
            travel: TravelBehavior::Beam,
            spark: 0.18,
            color: Rgb::from_u32(0x66d9ff),
            beam_thickness: 0.035,
            beam_life: 0.09,
            beam_peak_opacity: 0.85,
            projectile_radius: 0.06,
        },
        WeaponKind::Plasma => WeaponSpec {
            kind,
            damage_mult: 0.9,
            heat_rate: HEAT_RATE_DEFAULT,
            heat_surcharge: HEAT_SURCHARGE_PLASMA,
            travel: TravelBehavior::Projectile { travel_secs: 0.55 },
            spark: 0.25,
            color: Rgb::from_u32(0xff7a3c),
            beam_thickness: 0.035,
            beam_life: 0.09,
            beam_peak_opacity: 0.85,
            projectile_radius: 0.095,
        },
        WeaponKind::Kinetic => WeaponSpec {
            kind,
            damage_mult: 1.05,
            heat_rate: HEAT_RATE_DEFAULT,
            heat_surcharge: 0.0,
            travel: TravelBehavior::Projectile { travel_secs: 0.22 },
            spark: 0.55,
            color: Rgb::WHITE,
            beam_thickness: 0.035,
            beam_life: 0.09,
            beam_peak_opacity: 0.85,
            projectile_radius: 0.06,
        },
        WeaponKind::Railgun => WeaponSpec {
            kind,
            damage_mult: 1.55,
            heat_rate: HEAT_RATE_DEFAULT,
            heat_surcharge: HEAT_SURCHARGE_RAILGUN,
            travel: TravelBehavior::Beam,
            spark: 0.65,
            color: Rgb::from_u32(0xb6f7ff),
            beam_thickness: 0.055,
            beam_life: 0.14,
            beam_peak_opacity: 0.95,
            projectile_radius: 0.06,
        },
        // Zero travel: the shell lands on its first scheduler update.
        WeaponKind::Emp => WeaponSpec {
            kind,
            damage_mult: 0.65,
            heat_rate: HEAT_RATE_EMP,
            heat_surcharge: 0.0,
            travel: TravelBehavior::Projectile { travel_secs: 0.0 },
            spark: 0.1,
            color: Rgb::from_u32(0xb6f7ff),
            beam_thickness: 0.035,
            beam_life: 0.09,
            beam_peak_opacity: 0.85,
            projectile_radius: 0.06,
        },
        WeaponKind::Ion => WeaponSpec {
            kind,
            damage_mult: 0.95,
            heat_rate: HEAT_RATE_DEFAULT,
            heat_surcharge: 0.0,
            travel: TravelBehavior::Beam,
            spark: 0.35,
            color: Rgb::from_u32(0x66ffcc),
            beam_thickness: 0.045,
            beam_life: 0.09,
            beam_peak_opacity: 0.85,
            projectile_radius: 0.06,
        },
    }
}

/// Deltas one shot at `base_damage` applies to the shield.
///
/// Negative or non-finite base damage counts as zero.
pub fn compute_effect(spec: &WeaponSpec, base_damage: f64) -> FireOutcome {
    let base_damage = if base_damage.is_finite() {
        base_damage.max(0.0)
    } else {
        0.0
    };
    let damage = base_damage * spec.damage_mult;

    let emp_delta = if spec.kind == WeaponKind::Emp {
        EMP_CHARGE_BUMP
    } else {
        0.0
    };

    FireOutcome {
        energy_drain: damage * ENERGY_DRAIN_PER_DAMAGE,
        heat_delta: damage * spec.heat_rate + damage * spec.heat_surcharge,
        emp_delta,
        impact_strength: (damage * IMPACT_STRENGTH_PER_DAMAGE)
            .clamp(IMPACT_STRENGTH_MIN, IMPACT_STRENGTH_MAX),
    }
}
