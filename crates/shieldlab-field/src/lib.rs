//! Procedural shield field for the shield lab.
//!
//! Pure functions turning the impact ledger, the defense state and the
//! shield configuration into a per-point color and opacity. Evaluated on the
//! CPU over `glam::DVec3`; nothing here owns mutable simulation state.

pub mod compositor;
pub mod environment;
pub mod noise;
pub mod patterns;

pub use compositor::{FieldFrame, FieldParams, FieldState, SurfacePoint};
pub use environment::{EnvironmentSampler, StarfieldEnvironment, UniformEnvironment};
pub use shieldlab_core as core;
