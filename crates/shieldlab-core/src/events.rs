//! Fire results and events emitted by the simulation for the HUD and logs.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Deltas a single shot applies to the shield, as computed by the weapon model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireOutcome {
    /// Energy removed from the shield.
    pub energy_drain: f64,
    /// Heat added to the overheat accumulator.
    pub heat_delta: f64,
    /// EMP charge added (fixed bump for EMP, zero otherwise).
    pub emp_delta: f64,
    /// Strength of the impact recorded on the surface.
    pub impact_strength: f64,
}

/// What `fire` hands back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireReport {
    pub weapon: WeaponKind,
    pub impact_strength: f64,
    pub energy_after: f64,
    pub overheat_after: f64,
    /// Unit direction of the strike in the shield frame.
    pub impact_direction: DVec3,
    /// Beam or projectile, with the flight time the caller animates over.
    pub travel: TravelBehavior,
}

/// Discrete events for the HUD, collected between snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShieldEvent {
    /// A weapon hit the shield.
    Fired {
        weapon: WeaponKind,
        impact_strength: f64,
        energy_after: f64,
    },
    /// Overheat crossed the overload threshold.
    OverloadEntered { overheat: f64 },
    /// Overheat fell back under the overload threshold.
    OverloadCleared { energy: f64 },
    /// The base pattern changed.
    PresetChanged { preset: Preset },
    /// Shield state, impacts and transients were cleared.
    Reset,
}
