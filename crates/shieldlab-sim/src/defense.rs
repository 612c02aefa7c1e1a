//! Continuous energy, overheat and EMP model of the shield.

use serde::{Deserialize, Serialize};

use shieldlab_core::constants::*;
use shieldlab_core::events::FireOutcome;

use crate::weapons::{compute_effect, WeaponSpec};

/// Scalar shield condition. Overload is derived from overheat, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldDefenseState {
    energy: f64,
    overheat: f64,
    emp_charge: f64,
    overload_threshold: f64,
}

impl ShieldDefenseState {
    /// Fully charged and cold.
    pub fn new(overload_threshold: f64) -> Self {
        Self {
            energy: 1.0,
            overheat: 0.0,
            emp_charge: 0.0,
            overload_threshold,
        }
    }

    /// Apply one shot and return the deltas used.
    pub fn apply_fire(&mut self, spec: &WeaponSpec, base_damage: f64) -> FireOutcome {
        let outcome = compute_effect(spec, base_damage);

        self.energy = (self.energy - outcome.energy_drain).clamp(0.0, 1.0);
        self.overheat += outcome.heat_delta;
        if outcome.emp_delta > 0.0 {
            self.emp_charge = (self.emp_charge + outcome.emp_delta).clamp(0.0, EMP_CHARGE_MAX);
        }

        outcome
    }

    /// Integrate recovery, cooling, EMP decay and overload drain over `dt`.
    ///
    /// Cooling reads the energy recovered in the same step, and the overload
    /// drain reads the overheat left after cooling.
    pub fn advance(&mut self, dt: f64, recovery_rate: f64) {
        let recovery_rate = recovery_rate.max(0.0);

        self.energy = (self.energy + recovery_rate * dt * ENERGY_RECOVERY_SCALE).clamp(0.0, 1.0);

        let cool = (COOLING_BASE + COOLING_ENERGY_GAIN * self.energy) * recovery_rate;
        self.overheat = (self.overheat - cool * dt * COOLING_SCALE).max(0.0);

        self.emp_charge = (self.emp_charge - dt * EMP_DECAY_RATE).max(0.0);

        let overload = self.overload();
        if overload > 0.0 {
            self.energy = (self.energy - overload * dt * OVERLOAD_ENERGY_DRAIN).clamp(0.0, 1.0);
        }
    }

    pub fn reset(&mut self) {
        self.energy = 1.0;
        self.overheat = 0.0;
        self.emp_charge = 0.0;
    }

    /// Overload level in [0, 1].
    pub fn overload(&self) -> f64 {
        ((self.overheat - self.overload_threshold) / OVERLOAD_SPAN).clamp(0.0, 1.0)
    }

    /// HUD overload flag: overheat clearly above the threshold.
    pub fn is_overloaded(&self) -> bool {
        self.overheat > self.overload_threshold + OVERLOAD_HUD_MARGIN
    }

    /// EMP charge as a [0, 1] flicker level for the field.
    pub fn emp_level(&self) -> f64 {
        self.emp_charge.clamp(0.0, 1.0)
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn overheat(&self) -> f64 {
        self.overheat
    }

    pub fn emp_charge(&self) -> f64 {
        self.emp_charge
    }

    pub fn overload_threshold(&self) -> f64 {
        self.overload_threshold
    }

    pub fn set_overload_threshold(&mut self, threshold: f64) {
        self.overload_threshold = threshold;
    }
}
