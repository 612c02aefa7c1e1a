//! Simulation engine for the shield lab.
//!
//! Owns the impact ledger, the energy/overheat/EMP model and the transient
//! effect registry, applies weapon fire, and produces ShieldSnapshots and
//! FieldFrames for the host.

pub mod defense;
pub mod effects;
pub mod engine;
pub mod fx;
pub mod ledger;
pub mod weapons;

pub use engine::{LabConfig, ShieldLab};
pub use shieldlab_core as core;
pub use shieldlab_field as field;

#[cfg(test)]
mod tests;
