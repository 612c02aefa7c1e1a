//! Snapshots of the shield state handed to the host each frame.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::Preset;
use crate::events::ShieldEvent;
use crate::types::SimTime;

/// Complete HUD-visible state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShieldSnapshot {
    pub time: SimTime,
    /// Shield capacity in [0, 1].
    pub energy: f64,
    /// Energy rounded to a whole percentage for display.
    pub energy_percent: u32,
    pub overheat: f64,
    /// Derived overload level in [0, 1].
    pub overload: f64,
    /// Whether overheat sits clearly above the overload threshold.
    pub overloaded: bool,
    pub emp_charge: f64,
    pub preset: Preset,
    pub impact_count: usize,
    pub active_effects: usize,
    /// Impact flash level in [0, 1], kicked by every hit.
    pub flash: f64,
    /// Opacity of the outer halo shell.
    pub halo_opacity: f64,
    pub events: Vec<ShieldEvent>,
}

/// Final shaded value of one shield surface point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSample {
    /// Linear RGB, each channel in [0, 6].
    pub color: DVec3,
    /// Opacity in [0.02, 0.96].
    pub opacity: f64,
}
