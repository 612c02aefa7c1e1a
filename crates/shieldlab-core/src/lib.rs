//! Core types and definitions for the shield lab.
//!
//! This crate defines the vocabulary shared across the other crates:
//! weapons, presets, impacts, fire reports, snapshots, configuration
//! and tuning constants. It has no dependency on any renderer or host shell.

pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod math;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
